//! HTTP API surface.

pub mod auth;
pub mod calls;
pub mod channels;
pub mod planning;
pub mod routes;
pub mod types;

pub use routes::{serve, AppState};
