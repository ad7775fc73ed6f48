//! Delegation dispatch - issues the collaborator service calls a plan's
//! sub-tasks were routed to.
//!
//! Calls run concurrently; the returned vector keeps plan order regardless of
//! completion order. A failed call becomes a `failed` sub-task carrying the
//! error string - dispatch itself never errors and never retries.

use futures::future::join_all;
use uuid::Uuid;

use crate::aggregate::{Subtask, SubtaskStatus};
use crate::plan::{route_subtask, HttpMethod, SubTaskSpec, TaskPlan};

pub struct Dispatcher {
    client: reqwest::Client,
    base_url: String,
}

impl Dispatcher {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into(),
        }
    }

    /// Dispatch every sub-task of a plan and collect the executed results in
    /// plan order.
    pub async fn dispatch_plan(&self, plan: &TaskPlan) -> Vec<Subtask> {
        join_all(plan.sub_tasks.iter().map(|spec| self.dispatch_one(spec))).await
    }

    async fn dispatch_one(&self, spec: &SubTaskSpec) -> Subtask {
        let target = route_subtask(spec);
        let mut subtask = Subtask::dispatched(Uuid::new_v4().to_string(), spec);
        subtask.status = SubtaskStatus::Processing;

        let url = format!("{}{}", self.base_url, target.endpoint);
        tracing::debug!(agent = spec.agent.as_str(), %url, "dispatching sub-task");

        let request = match target.method {
            HttpMethod::GET => self.client.get(&url),
            HttpMethod::POST => {
                let builder = self.client.post(&url);
                match &target.body {
                    Some(body) => builder.json(body),
                    None => builder,
                }
            }
        };

        match request.send().await {
            Ok(resp) => {
                let status = resp.status();
                let body = resp.text().await.unwrap_or_default();
                if status.is_success() {
                    subtask.status = SubtaskStatus::Completed;
                    subtask.output = Some(
                        serde_json::from_str(&body)
                            .unwrap_or_else(|_| serde_json::json!({ "text": body })),
                    );
                } else {
                    subtask.status = SubtaskStatus::Failed;
                    subtask.error = Some(format!("{} returned {}: {}", target.endpoint, status, body));
                }
            }
            Err(e) => {
                subtask.status = SubtaskStatus::Failed;
                subtask.error = Some(format!("{} unreachable: {}", target.endpoint, e));
            }
        }

        subtask
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plan::build_task_plan;

    // No collaborator is listening on this port; every dispatch fails, which
    // exercises the degrade-not-fail path and the ordering guarantee.
    #[tokio::test]
    async fn test_failed_dispatch_preserves_plan_order() {
        let plan = build_task_plan("Launch a business and narrate the pitch as audio");
        let dispatcher = Dispatcher::new("http://127.0.0.1:1");

        let results = dispatcher.dispatch_plan(&plan).await;

        assert_eq!(results.len(), plan.sub_tasks.len());
        for (result, spec) in results.iter().zip(&plan.sub_tasks) {
            assert_eq!(result.agent, spec.agent);
            assert_eq!(result.action, spec.action);
            assert_eq!(result.status, SubtaskStatus::Failed);
            assert!(result.error.is_some());
            assert!(result.output.is_none());
        }
    }
}
