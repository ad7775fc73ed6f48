//! Planning and orchestration endpoints.

use axum::{
    extract::{Extension, State},
    http::StatusCode,
    Json,
};
use std::sync::Arc;

use crate::aggregate::{aggregate_results, AggregatedResult};
use crate::plan::{build_task_plan, TaskPlan};

use super::auth::AuthUser;
use super::routes::AppState;
use super::types::PlanRequest;

const MIN_GOAL_CHARS: usize = 3;
const MAX_GOAL_CHARS: usize = 3000;

/// Length gate for incoming goals; the plan builder itself assumes this has
/// already passed.
fn validate_goal(goal: &str) -> Result<&str, (StatusCode, String)> {
    let trimmed = goal.trim();
    let length = trimmed.chars().count();
    if !(MIN_GOAL_CHARS..=MAX_GOAL_CHARS).contains(&length) {
        return Err((
            StatusCode::BAD_REQUEST,
            format!(
                "Goal must be between {} and {} characters",
                MIN_GOAL_CHARS, MAX_GOAL_CHARS
            ),
        ));
    }
    Ok(trimmed)
}

/// POST /api/plan - classify a goal into a task plan.
pub async fn create_plan(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Json(req): Json<PlanRequest>,
) -> Result<Json<TaskPlan>, (StatusCode, String)> {
    if !state.limiter.check(&user.id, "plan").await {
        return Err((
            StatusCode::TOO_MANY_REQUESTS,
            "Rate limit exceeded".to_string(),
        ));
    }

    let goal = validate_goal(&req.goal)?;
    Ok(Json(build_task_plan(goal)))
}

/// POST /api/orchestrate - plan, dispatch, and aggregate in one pass.
pub async fn orchestrate(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Json(req): Json<PlanRequest>,
) -> Result<Json<AggregatedResult>, (StatusCode, String)> {
    if !state.limiter.check(&user.id, "orchestrate").await {
        return Err((
            StatusCode::TOO_MANY_REQUESTS,
            "Rate limit exceeded".to_string(),
        ));
    }

    let goal = validate_goal(&req.goal)?;
    let plan = build_task_plan(goal);
    tracing::info!(
        goal_len = goal.len(),
        sub_tasks = plan.sub_tasks.len(),
        "orchestrating goal"
    );

    let subtasks = state.dispatcher.dispatch_plan(&plan).await;
    Ok(Json(aggregate_results(goal, &subtasks)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_goal_length_bounds() {
        assert!(validate_goal("ok?").is_ok());
        assert!(validate_goal("  padded  ").is_ok());
        assert!(validate_goal("ab").is_err());
        assert!(validate_goal("").is_err());
        assert!(validate_goal(&"x".repeat(3000)).is_ok());
        assert!(validate_goal(&"x".repeat(3001)).is_err());
    }
}
