//! Wealthplan Remote - REST client for the remote copy of the plan.
//!
//! Implements the core persistence and audit traits over HTTP so the
//! dispatcher can keep the remote plan in step with the local one.

pub mod client;
pub mod error;
pub mod types;

pub use client::PlanApiClient;
pub use error::{RemoteError, Result};
pub use types::RemoteConfig;
