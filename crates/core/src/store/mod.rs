//! Plan store - the single owner of the local plan, timeline and settings.

mod plan_store;

pub use plan_store::PlanStore;
