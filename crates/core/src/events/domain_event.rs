//! Domain event types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Facts about plan state changes, emitted after the change is visible.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DomainEvent {
    /// A plan was loaded (initial fetch or remote refresh).
    PlanLoaded { net_worth: f64 },

    /// A mutated plan replaced the authoritative local plan.
    PlanCommitted {
        last_updated: DateTime<Utc>,
        net_worth: f64,
    },

    /// The timeline was regenerated from the current plan and settings.
    TimelineRecomputed { points: usize },

    /// Projection settings were changed.
    SettingsChanged,

    /// The local plan was dropped.
    PlanCleared,
}

impl DomainEvent {
    /// Creates a PlanLoaded event.
    pub fn plan_loaded(net_worth: f64) -> Self {
        Self::PlanLoaded { net_worth }
    }

    /// Creates a PlanCommitted event.
    pub fn plan_committed(last_updated: DateTime<Utc>, net_worth: f64) -> Self {
        Self::PlanCommitted {
            last_updated,
            net_worth,
        }
    }

    /// Creates a TimelineRecomputed event.
    pub fn timeline_recomputed(points: usize) -> Self {
        Self::TimelineRecomputed { points }
    }
}
