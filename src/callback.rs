//! Callback script building - turns a goal and its aggregated result into a
//! single spoken-style message for telephony delivery.
//!
//! Five fixed segments joined by single spaces: greeting with the goal, the
//! summary, the sub-agent actions, a dashboard pointer, and a suggested next
//! step. Total function: however sparse the results, the script is non-empty
//! and carries the goal and dashboard URL verbatim.

use crate::aggregate::AggregatedResult;

/// Spoken fallback when a segment has nothing to say.
pub const FALLBACK_PHRASE: &str = "Your request has been processed.";

const NEXT_STEP_LINE: &str =
    "Suggested next step: review the outputs and reply if you would like any changes.";

/// Render up to the first five sub-tasks as `<agent>: <action> (<status>)`.
fn action_lines(results: &AggregatedResult) -> String {
    results
        .subtasks
        .iter()
        .take(5)
        .map(|s| format!("{}: {} ({})", s.agent.as_str(), s.action, s.status.as_str()))
        .collect::<Vec<_>>()
        .join("; ")
}

/// Build the callback script for a task.
pub fn build_callback_script(
    goal: &str,
    results: Option<&AggregatedResult>,
    dashboard_url: &str,
) -> String {
    let greeting = format!(
        "Hello! This is Agent G with an update on your request: \"{}\".",
        goal
    );

    // Summaries carry newlines for the dashboard; flatten for speech.
    let summary = results
        .map(|r| r.summary.replace('\n', " ").trim().to_string())
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| FALLBACK_PHRASE.to_string());

    let actions = results
        .map(action_lines)
        .filter(|a| !a.is_empty())
        .map(|a| format!("Here is what the agents did: {}.", a))
        .unwrap_or_else(|| FALLBACK_PHRASE.to_string());

    let dashboard = format!(
        "You can review the full results on your dashboard at {}.",
        dashboard_url
    );

    [greeting, summary, actions, dashboard, NEXT_STEP_LINE.to_string()].join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregate::{aggregate_results, Subtask, SubtaskStatus};
    use crate::plan::AgentKind;

    const DASHBOARD: &str = "https://avatarg.example.com/dashboard";

    fn subtask(index: usize, status: SubtaskStatus) -> Subtask {
        Subtask {
            id: format!("sub-{}", index),
            agent: AgentKind::BusinessAgent,
            action: format!("step_{}", index),
            input: serde_json::Map::new(),
            status,
            output: None,
            error: None,
        }
    }

    #[test]
    fn test_script_contains_goal_and_dashboard_verbatim() {
        let results = aggregate_results("Plan my launch", &[subtask(1, SubtaskStatus::Completed)]);
        let script = build_callback_script("Plan my launch", Some(&results), DASHBOARD);
        assert!(script.contains("Plan my launch"));
        assert!(script.contains(DASHBOARD));
    }

    #[test]
    fn test_no_results_uses_fallback_phrase() {
        let script = build_callback_script("anything", None, DASHBOARD);
        assert!(!script.is_empty());
        assert!(script.contains(FALLBACK_PHRASE));
        assert!(script.contains("anything"));
        assert!(script.contains(DASHBOARD));
    }

    #[test]
    fn test_zero_subtasks_still_falls_back_on_actions() {
        let results = aggregate_results("quiet goal", &[]);
        let script = build_callback_script("quiet goal", Some(&results), DASHBOARD);
        assert!(script.contains(FALLBACK_PHRASE));
        // The summary itself is present even with no sub-tasks.
        assert!(script.contains("Completed subtasks: 0/0"));
    }

    #[test]
    fn test_actions_are_capped_at_five() {
        let subtasks: Vec<Subtask> =
            (1..=8).map(|i| subtask(i, SubtaskStatus::Completed)).collect();
        let results = aggregate_results("big goal", &subtasks);
        let script = build_callback_script("big goal", Some(&results), DASHBOARD);
        assert!(script.contains("step_5"));
        assert!(!script.contains("step_6"));
    }

    #[test]
    fn test_action_rendering_format() {
        let results = aggregate_results("g", &[subtask(1, SubtaskStatus::Failed)]);
        let script = build_callback_script("g", Some(&results), DASHBOARD);
        assert!(script.contains("business-agent: step_1 (failed)"));
    }
}
