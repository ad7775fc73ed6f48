//! Result aggregation - folds executed sub-tasks into one user-facing result.
//!
//! Total function: any mix of completed/failed/partial sub-tasks produces a
//! summary, a markdown report, and an output manifest. Detail blocks follow
//! the input order exactly; no reordering by status or completion time.

use serde::{Deserialize, Serialize};

use crate::plan::{AgentKind, SubTaskSpec};

/// Lifecycle of one dispatched sub-task.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SubtaskStatus {
    Queued,
    Processing,
    Completed,
    Failed,
    Partial,
}

impl SubtaskStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            SubtaskStatus::Queued => "queued",
            SubtaskStatus::Processing => "processing",
            SubtaskStatus::Completed => "completed",
            SubtaskStatus::Failed => "failed",
            SubtaskStatus::Partial => "partial",
        }
    }
}

/// An executed sub-task: the spec it was dispatched from plus its outcome.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Subtask {
    pub id: String,
    pub agent: AgentKind,
    pub action: String,
    #[serde(default)]
    pub input: serde_json::Map<String, serde_json::Value>,
    pub status: SubtaskStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl Subtask {
    /// Create a freshly-dispatched sub-task from its spec.
    pub fn dispatched(id: impl Into<String>, spec: &SubTaskSpec) -> Self {
        Self {
            id: id.into(),
            agent: spec.agent.clone(),
            action: spec.action.clone(),
            input: spec.input.clone(),
            status: SubtaskStatus::Queued,
            output: None,
            error: None,
        }
    }
}

/// Which deliverable kinds the aggregated result can produce.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct OutputManifest {
    pub text: bool,
    pub pdf: bool,
    pub zip: bool,
    pub audio: bool,
    pub video: bool,
}

/// The merged outcome of a plan's execution.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AggregatedResult {
    pub summary: String,
    pub markdown: String,
    pub subtasks: Vec<Subtask>,
    pub outputs: OutputManifest,
}

/// Merge executed sub-tasks plus the original goal into one result.
pub fn aggregate_results(goal: &str, subtasks: &[Subtask]) -> AggregatedResult {
    let total = subtasks.len();
    let completed = subtasks
        .iter()
        .filter(|s| s.status == SubtaskStatus::Completed)
        .count();
    let failed = subtasks
        .iter()
        .filter(|s| s.status == SubtaskStatus::Failed)
        .count();

    let mut summary = format!("Main goal: {}\n", goal);
    summary.push_str(&format!("Completed subtasks: {}/{}\n", completed, total));
    if failed > 0 {
        summary.push_str(&format!("Failed subtasks: {}", failed));
    } else {
        summary.push_str("No failed subtasks");
    }

    let mut markdown = format!("# Task Results\n\n{}\n", summary);
    for (index, subtask) in subtasks.iter().enumerate() {
        markdown.push_str(&format!(
            "\n## {}. {}: {}\n\nStatus: {}\n",
            index + 1,
            subtask.agent.as_str(),
            subtask.action,
            subtask.status.as_str()
        ));
        if let Some(error) = &subtask.error {
            markdown.push_str(&format!("Error: {}\n", error));
        }
        match &subtask.output {
            Some(output) => {
                let rendered = serde_json::to_string_pretty(output)
                    .unwrap_or_else(|_| output.to_string());
                markdown.push_str(&format!("Output:\n```json\n{}\n```\n", rendered));
            }
            None => markdown.push_str("No output\n"),
        }
    }

    let audio = subtasks
        .iter()
        .any(|s| s.agent == AgentKind::VoiceLab && s.status == SubtaskStatus::Completed);

    AggregatedResult {
        summary,
        markdown,
        subtasks: subtasks.to_vec(),
        outputs: OutputManifest {
            text: true,
            pdf: true,
            zip: true,
            audio,
            // Video aggregation is not wired up yet; kept false on purpose.
            video: false,
        },
    }
}
