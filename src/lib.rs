//! # Agent G
//!
//! Task orchestration and multi-channel delegation core for the Agent G
//! assistant.
//!
//! ## Pipeline
//!
//! ```text
//!   goal text
//!      │
//!      ▼
//!  ┌──────────────┐    ┌──────────────┐    ┌──────────────┐
//!  │ Plan Builder │ ─▶ │    Router    │ ─▶ │  Dispatcher  │
//!  └──────────────┘    └──────────────┘    └──────┬───────┘
//!                                                 │ per-subtask results
//!                                                 ▼
//!  ┌──────────────┐    ┌──────────────┐    ┌──────────────┐
//!  │ Calls        │ ◀─ │  Callback    │ ◀─ │  Aggregator  │
//!  │ Provider     │    │  Script      │    └──────────────┘
//!  └──────────────┘    └──────────────┘
//! ```
//!
//! ## Modules
//! - `plan`: goal classification into typed sub-tasks, plus the sub-task
//!   router (sub-task → delegation target)
//! - `delegate`: concurrent dispatch of delegation targets
//! - `aggregate`: merging executed sub-tasks into one result manifest
//! - `callback`: spoken callback script building
//! - `calls`: pluggable telephony providers (mock, Twilio, Telegram)
//! - `channels`: per-channel readiness reporting
//! - `store`: Supabase persistence collaborator + bounded fallback log
//! - `ratelimit`: fixed-window request limiting
//! - `api`: the HTTP surface

pub mod aggregate;
pub mod api;
pub mod callback;
pub mod calls;
pub mod channels;
pub mod config;
pub mod delegate;
pub mod plan;
pub mod ratelimit;
pub mod store;

pub use aggregate::{aggregate_results, AggregatedResult, Subtask, SubtaskStatus};
pub use callback::build_callback_script;
pub use calls::{select_provider, CallsProvider};
pub use config::Config;
pub use plan::{build_task_plan, route_subtask, DelegationTarget, TaskPlan};
