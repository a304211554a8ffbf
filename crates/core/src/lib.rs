//! Wealthplan Core - plan model, projection engine and intent mutation.
//!
//! This crate holds the deterministic parts of the planner: the in-memory
//! plan aggregate, the multi-year net-worth projection, and the layer that
//! turns structured intent actions into plan edits. It is transport-agnostic
//! and defines the traits implemented by the `remote` crate.

pub mod constants;
pub mod errors;
pub mod events;
pub mod intents;
pub mod plan;
pub mod projection;
pub mod store;
pub mod utils;

// Re-export the aggregate and projection types
pub use plan::*;
pub use projection::*;

// Re-export error types
pub use errors::Error;
pub use errors::Result;
