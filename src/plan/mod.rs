//! Task planning - turns a free-text goal into a structured plan of typed
//! sub-tasks.
//!
//! The builder is a pure keyword classifier: it never calls out to a model
//! and never fails. Validation of the goal itself (length 3..=3000) is the
//! API layer's job; the builder assumes any string it receives is usable.

pub mod router;

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

pub use router::{route_subtask, DelegationTarget, HttpMethod};

/// Sub-agent capability a sub-task is targeted at.
///
/// Unrecognized labels are preserved verbatim in [`AgentKind::Other`] rather
/// than rejected; the router sends them to its default branch.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum AgentKind {
    BusinessAgent,
    SocialMedia,
    VoiceLab,
    AvatarBuilder,
    Marketplace,
    Other(String),
}

impl AgentKind {
    pub fn parse(label: &str) -> Self {
        match label {
            "business-agent" => AgentKind::BusinessAgent,
            "social-media" => AgentKind::SocialMedia,
            "voice-lab" => AgentKind::VoiceLab,
            "avatar-builder" => AgentKind::AvatarBuilder,
            "marketplace" => AgentKind::Marketplace,
            other => AgentKind::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            AgentKind::BusinessAgent => "business-agent",
            AgentKind::SocialMedia => "social-media",
            AgentKind::VoiceLab => "voice-lab",
            AgentKind::AvatarBuilder => "avatar-builder",
            AgentKind::Marketplace => "marketplace",
            AgentKind::Other(label) => label,
        }
    }
}

impl Serialize for AgentKind {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for AgentKind {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let label = String::deserialize(deserializer)?;
        Ok(AgentKind::parse(&label))
    }
}

/// Overall classification of a goal.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum TaskType {
    Business,
    Social,
    Voice,
    Avatar,
    Marketplace,
    Hybrid,
}

/// One unit of delegated work within a plan.
///
/// Insertion order in `TaskPlan::sub_tasks` is priority order; execution
/// order is up to the dispatcher.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubTaskSpec {
    pub agent: AgentKind,
    pub action: String,
    #[serde(default)]
    pub input: serde_json::Map<String, serde_json::Value>,
}

impl SubTaskSpec {
    pub fn new(agent: AgentKind, action: impl Into<String>, goal: &str) -> Self {
        let mut input = serde_json::Map::new();
        input.insert("goal".to_string(), serde_json::Value::String(goal.to_string()));
        Self {
            agent,
            action: action.into(),
            input,
        }
    }

    /// The `goal` entry of this sub-task's input, if it is a string.
    pub fn input_goal(&self) -> Option<&str> {
        self.input.get("goal").and_then(|v| v.as_str())
    }
}

/// A structured plan derived from one user goal. Immutable after creation;
/// persistence, if any, is a collaborator's concern.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskPlan {
    pub main_goal: String,
    pub task_type: TaskType,
    pub sub_tasks: Vec<SubTaskSpec>,
    pub expected_outputs: BTreeSet<String>,
}

// Keyword lexicon for classification. A goal matching several groups becomes
// a hybrid plan with one sub-task per matched group, in this order.
const BUSINESS_KEYWORDS: &[&str] = &[
    "business", "project", "strategy", "launch", "startup", "revenue",
    "pitch", "roadmap", "plan",
];
const SOCIAL_KEYWORDS: &[&str] = &[
    "social", "post", "instagram", "tiktok", "tweet", "campaign", "content",
    "followers",
];
const VOICE_KEYWORDS: &[&str] = &[
    "voice", "audio", "narrat", "speak", "podcast", "song", "music", "call",
];
const AVATAR_KEYWORDS: &[&str] = &["avatar", "character", "persona", "portrait", "face"];
const MARKETPLACE_KEYWORDS: &[&str] = &[
    "marketplace", "sell", "buy", "shop", "listing", "product", "order",
];

fn matches_any(goal: &str, keywords: &[&str]) -> bool {
    keywords.iter().any(|k| goal.contains(k))
}

/// Build a [`TaskPlan`] from a free-text goal.
///
/// Total function: every goal yields a plan with at least one sub-task.
/// A goal matching no keyword group falls back to a single business-agent
/// analysis sub-task.
pub fn build_task_plan(goal: &str) -> TaskPlan {
    let lowered = goal.to_lowercase();
    let mut sub_tasks = Vec::new();
    let mut matched_types = Vec::new();

    if matches_any(&lowered, BUSINESS_KEYWORDS) {
        matched_types.push(TaskType::Business);
        sub_tasks.push(SubTaskSpec::new(
            AgentKind::BusinessAgent,
            "draft_business_plan",
            goal,
        ));
    }
    if matches_any(&lowered, SOCIAL_KEYWORDS) {
        matched_types.push(TaskType::Social);
        sub_tasks.push(SubTaskSpec::new(
            AgentKind::SocialMedia,
            "draft_social_content",
            goal,
        ));
    }
    if matches_any(&lowered, VOICE_KEYWORDS) {
        matched_types.push(TaskType::Voice);
        let mut spec = SubTaskSpec::new(AgentKind::VoiceLab, "generate_narration", goal);
        spec.input.insert(
            "language".to_string(),
            serde_json::Value::String("en".to_string()),
        );
        sub_tasks.push(spec);
    }
    if matches_any(&lowered, AVATAR_KEYWORDS) {
        matched_types.push(TaskType::Avatar);
        sub_tasks.push(SubTaskSpec::new(
            AgentKind::AvatarBuilder,
            "prepare_avatar",
            goal,
        ));
    }
    if matches_any(&lowered, MARKETPLACE_KEYWORDS) {
        matched_types.push(TaskType::Marketplace);
        sub_tasks.push(SubTaskSpec::new(
            AgentKind::Marketplace,
            "find_listings",
            goal,
        ));
    }

    // No lexical match: treat as a general request for the business agent so
    // the plan is never empty.
    if sub_tasks.is_empty() {
        matched_types.push(TaskType::Business);
        sub_tasks.push(SubTaskSpec::new(AgentKind::BusinessAgent, "analyze_goal", goal));
    }

    let task_type = if matched_types.len() > 1 {
        TaskType::Hybrid
    } else {
        matched_types[0]
    };

    let mut expected_outputs: BTreeSet<String> =
        ["text", "pdf", "zip"].iter().map(|s| s.to_string()).collect();
    if sub_tasks.iter().any(|s| s.agent == AgentKind::VoiceLab) {
        expected_outputs.insert("audio".to_string());
    }

    TaskPlan {
        main_goal: goal.to_string(),
        task_type,
        sub_tasks,
        expected_outputs,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_business_goal_classifies_as_business() {
        let plan = build_task_plan("Launch a new business strategy");
        assert_eq!(plan.task_type, TaskType::Business);
        assert_eq!(plan.sub_tasks.len(), 1);
        assert_eq!(plan.sub_tasks[0].agent, AgentKind::BusinessAgent);
    }

    #[test]
    fn test_voice_goal_gets_language_default() {
        let plan = build_task_plan("Narrate my story as audio");
        let voice = plan
            .sub_tasks
            .iter()
            .find(|s| s.agent == AgentKind::VoiceLab)
            .expect("voice sub-task");
        assert_eq!(
            voice.input.get("language").and_then(|v| v.as_str()),
            Some("en")
        );
        assert!(plan.expected_outputs.contains("audio"));
    }

    #[test]
    fn test_multi_domain_goal_is_hybrid() {
        let plan = build_task_plan("Launch a product and post it on instagram");
        assert_eq!(plan.task_type, TaskType::Hybrid);
        assert!(plan.sub_tasks.len() >= 2);
    }

    #[test]
    fn test_unmatched_goal_still_yields_a_plan() {
        let plan = build_task_plan("qwerty");
        assert_eq!(plan.sub_tasks.len(), 1);
        assert_eq!(plan.sub_tasks[0].action, "analyze_goal");
        assert_eq!(plan.main_goal, "qwerty");
    }

    #[test]
    fn test_subtask_order_is_stable() {
        let plan = build_task_plan("Launch a business and sell an avatar on the marketplace");
        let agents: Vec<AgentKind> = plan.sub_tasks.iter().map(|s| s.agent.clone()).collect();
        assert_eq!(
            agents,
            vec![
                AgentKind::BusinessAgent,
                AgentKind::AvatarBuilder,
                AgentKind::Marketplace
            ]
        );
    }

    #[test]
    fn test_expected_outputs_always_include_documents() {
        let plan = build_task_plan("anything at all");
        for kind in ["text", "pdf", "zip"] {
            assert!(plan.expected_outputs.contains(kind));
        }
        assert!(!plan.expected_outputs.contains("audio"));
    }
}
