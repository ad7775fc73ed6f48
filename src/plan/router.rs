//! Sub-task routing: maps a [`SubTaskSpec`] to the concrete internal service
//! call that fulfills it.
//!
//! The dispatch table is priority-ordered and total: every sub-task resolves
//! to exactly one target, and anything unrecognized falls through to the
//! avatar-listing default. Availability over strict validation - a typo in an
//! agent name degrades to a harmless listing call instead of failing the
//! whole plan.

use serde::{Deserialize, Serialize};

use super::{AgentKind, SubTaskSpec};

/// HTTP method of a delegation target.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum HttpMethod {
    GET,
    POST,
}

/// The concrete internal service call chosen for one sub-task.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DelegationTarget {
    pub endpoint: String,
    pub method: HttpMethod,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body: Option<serde_json::Value>,
}

impl DelegationTarget {
    fn get(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            method: HttpMethod::GET,
            body: None,
        }
    }

    fn post(endpoint: impl Into<String>, body: serde_json::Value) -> Self {
        Self {
            endpoint: endpoint.into(),
            method: HttpMethod::POST,
            body: Some(body),
        }
    }
}

/// Resolve the delegation target for a sub-task. First match wins.
pub fn route_subtask(spec: &SubTaskSpec) -> DelegationTarget {
    let goal = spec.input_goal().unwrap_or_default();

    match &spec.agent {
        AgentKind::BusinessAgent => DelegationTarget::get("/api/business-agent/projects"),
        AgentKind::SocialMedia => DelegationTarget::post(
            "/api/chat/completions",
            serde_json::json!({
                "prompt": format!("Draft social media content for this goal: {}", goal),
            }),
        ),
        AgentKind::VoiceLab => {
            let language = spec
                .input
                .get("language")
                .and_then(|v| v.as_str())
                .unwrap_or("en");
            DelegationTarget::post(
                "/api/voice/jobs",
                serde_json::json!({
                    "text": goal,
                    "language": language,
                }),
            )
        }
        AgentKind::Marketplace => DelegationTarget::get("/api/marketplace/listings?limit=3"),
        // Default branch: avatar-builder and anything unrecognized.
        AgentKind::AvatarBuilder => DelegationTarget::get("/api/avatars?limit=1"),
        AgentKind::Other(label) => {
            tracing::debug!(agent = %label, "unrecognized agent, routing to avatar default");
            DelegationTarget::get("/api/avatars?limit=1")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plan::SubTaskSpec;

    fn spec(agent: AgentKind, goal: &str) -> SubTaskSpec {
        SubTaskSpec::new(agent, "any", goal)
    }

    #[test]
    fn test_routing_is_deterministic_per_agent() {
        let cases = [
            (AgentKind::BusinessAgent, "/api/business-agent/projects"),
            (AgentKind::SocialMedia, "/api/chat/completions"),
            (AgentKind::VoiceLab, "/api/voice/jobs"),
            (AgentKind::Marketplace, "/api/marketplace/listings?limit=3"),
            (AgentKind::AvatarBuilder, "/api/avatars?limit=1"),
        ];
        for (agent, endpoint) in cases {
            let first = route_subtask(&spec(agent.clone(), "goal"));
            let second = route_subtask(&spec(agent, "goal"));
            assert_eq!(first.endpoint, endpoint);
            assert_eq!(second.endpoint, endpoint);
            assert_eq!(first.method, second.method);
        }
    }

    #[test]
    fn test_social_prompt_embeds_goal() {
        let target = route_subtask(&spec(AgentKind::SocialMedia, "grow my channel"));
        assert_eq!(target.method, HttpMethod::POST);
        let prompt = target.body.unwrap()["prompt"].as_str().unwrap().to_string();
        assert!(prompt.contains("grow my channel"));
    }

    #[test]
    fn test_voice_language_defaults_to_en() {
        let target = route_subtask(&spec(AgentKind::VoiceLab, "read this aloud"));
        let body = target.body.unwrap();
        assert_eq!(body["text"], "read this aloud");
        assert_eq!(body["language"], "en");
    }

    #[test]
    fn test_voice_language_override_is_honored() {
        let mut s = spec(AgentKind::VoiceLab, "lies das vor");
        s.input.insert(
            "language".to_string(),
            serde_json::Value::String("de".to_string()),
        );
        let target = route_subtask(&s);
        assert_eq!(target.body.unwrap()["language"], "de");
    }

    #[test]
    fn test_unknown_agent_falls_back_to_avatar_listing() {
        let target = route_subtask(&spec(
            AgentKind::Other("bussiness-agent".to_string()),
            "whatever",
        ));
        assert_eq!(target.endpoint, "/api/avatars?limit=1");
        assert_eq!(target.method, HttpMethod::GET);
        assert!(target.body.is_none());
    }
}
