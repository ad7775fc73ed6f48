//! Request/response DTOs shared by the API handlers.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::aggregate::AggregatedResult;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub dev_mode: bool,
    pub auth_required: bool,
    pub calls_provider: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub token: String,
    pub exp: i64,
}

/// Body for `POST /api/plan` and `POST /api/orchestrate`.
#[derive(Debug, Deserialize)]
pub struct PlanRequest {
    pub goal: String,
}

/// Body for `POST /api/calls/callback`.
#[derive(Debug, Deserialize)]
pub struct QueueCallbackRequest {
    pub task_id: Uuid,
    pub summary: String,
    #[serde(default)]
    pub force: bool,
    /// Original goal text; falls back to the summary when absent.
    pub goal: Option<String>,
    /// Aggregated result to speak from, when the caller has one.
    pub results: Option<AggregatedResult>,
}

#[derive(Debug, Serialize)]
pub struct QueueCallbackResponse {
    pub id: Option<Uuid>,
    pub task_id: Uuid,
    pub status: String,
    pub script: String,
}
