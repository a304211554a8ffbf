//! Projection module - yearly net-worth timeline from a plan snapshot.

mod projection_calculator;
mod projection_model;

pub use projection_calculator::{project, project_plan, projection_horizon};
pub use projection_model::*;
