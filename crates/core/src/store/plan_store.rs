//! Single-owner state container for the local plan.
//!
//! All writes go through `load`, `commit`, `update_settings` or `clear`.
//! Each of them recomputes the derived summary and the timeline before the
//! new state becomes visible, and readers only ever receive clones. Plan and
//! timeline are swapped under one lock so they are never observed out of step.

use chrono::Utc;
use log::debug;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::errors::Result;
use crate::events::{DomainEvent, DomainEventSink, NoOpDomainEventSink};
use crate::plan::Plan;
use crate::projection::{project_plan, ProjectionSettings, Timeline};

#[derive(Debug, Default)]
struct StoreState {
    plan: Option<Plan>,
    timeline: Timeline,
    settings: ProjectionSettings,
}

pub struct PlanStore {
    state: RwLock<StoreState>,
    event_sink: Arc<dyn DomainEventSink>,
    start_year: Option<i32>,
}

impl Default for PlanStore {
    fn default() -> Self {
        Self::new(ProjectionSettings::default(), Arc::new(NoOpDomainEventSink))
    }
}

impl PlanStore {
    pub fn new(settings: ProjectionSettings, event_sink: Arc<dyn DomainEventSink>) -> Self {
        Self {
            state: RwLock::new(StoreState {
                settings,
                ..StoreState::default()
            }),
            event_sink,
            start_year: None,
        }
    }

    /// Pins the first projected year instead of using the current year.
    pub fn with_start_year(mut self, year: i32) -> Self {
        self.start_year = Some(year);
        self
    }

    fn read(&self) -> RwLockReadGuard<'_, StoreState> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, StoreState> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Returns a copy of the local plan, if one is loaded.
    pub fn plan(&self) -> Option<Plan> {
        self.read().plan.clone()
    }

    pub fn has_plan(&self) -> bool {
        self.read().plan.is_some()
    }

    /// Returns a copy of the current timeline (empty without a plan).
    pub fn timeline(&self) -> Timeline {
        self.read().timeline.clone()
    }

    pub fn settings(&self) -> ProjectionSettings {
        self.read().settings.clone()
    }

    /// Installs a plan fetched from the remote copy.
    ///
    /// The plan is validated, its derived fields are recomputed and its
    /// `last_updated` stamp is kept when present.
    pub fn load(&self, mut plan: Plan) -> Result<()> {
        plan.validate()?;
        plan.recompute_summary();
        plan.recompute_cashflow();
        if plan.last_updated.is_none() {
            plan.last_updated = Some(Utc::now());
        }
        let net_worth = plan.summary.net_worth;
        let points = self.install(plan);

        self.event_sink.emit_batch(vec![
            DomainEvent::plan_loaded(net_worth),
            DomainEvent::timeline_recomputed(points),
        ]);
        Ok(())
    }

    /// Replaces the local plan with a mutated copy.
    ///
    /// Recomputes the summary and cashflow wholesale, stamps `last_updated`
    /// and regenerates the timeline.
    pub fn commit(&self, mut plan: Plan) {
        plan.recompute_summary();
        plan.recompute_cashflow();
        let last_updated = Utc::now();
        plan.last_updated = Some(last_updated);
        let net_worth = plan.summary.net_worth;
        let points = self.install(plan);

        self.event_sink.emit_batch(vec![
            DomainEvent::plan_committed(last_updated, net_worth),
            DomainEvent::timeline_recomputed(points),
        ]);
    }

    /// Changes the projection settings and regenerates the timeline.
    pub fn update_settings(&self, settings: ProjectionSettings) -> Result<()> {
        settings.validate()?;
        let points = {
            let mut state = self.write();
            state.timeline = match &state.plan {
                Some(plan) => project_plan(plan, &settings, self.start_year),
                None => Vec::new(),
            };
            state.settings = settings;
            state.timeline.len()
        };

        self.event_sink.emit_batch(vec![
            DomainEvent::SettingsChanged,
            DomainEvent::timeline_recomputed(points),
        ]);
        Ok(())
    }

    /// Drops the local plan and its timeline.
    pub fn clear(&self) {
        {
            let mut state = self.write();
            state.plan = None;
            state.timeline = Vec::new();
        }
        self.event_sink.emit(DomainEvent::PlanCleared);
    }

    /// Projects and swaps in `plan`; returns the number of timeline points.
    fn install(&self, plan: Plan) -> usize {
        let mut state = self.write();
        let timeline = project_plan(&plan, &state.settings, self.start_year);
        let points = timeline.len();
        debug!(
            "Installing plan: net worth {:.2}, {} timeline points",
            plan.summary.net_worth, points
        );
        state.plan = Some(plan);
        state.timeline = timeline;
        points
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::RecordingEventSink;
    use crate::plan::plan_fixtures::{asset, expense, income};
    use crate::plan::Frequency;

    fn settings() -> ProjectionSettings {
        ProjectionSettings {
            current_age: 40,
            retirement_age: 43,
            projection_years: 30,
            inflation_rate: 0.0,
            average_return_rate: 0.0,
        }
    }

    fn store(sink: Arc<RecordingEventSink>) -> PlanStore {
        PlanStore::new(settings(), sink).with_start_year(2024)
    }

    #[test]
    fn test_new_store_is_empty() {
        let store = PlanStore::default();
        assert!(!store.has_plan());
        assert!(store.plan().is_none());
        assert!(store.timeline().is_empty());
    }

    #[test]
    fn test_load_recomputes_and_projects() {
        let sink = Arc::new(RecordingEventSink::new());
        let store = store(sink.clone());

        let mut plan = Plan {
            assets: vec![asset("a1", "Savings", 5_000.0)],
            incomes: vec![income("i1", "Salary", 3_000.0, Frequency::Monthly)],
            expenses: vec![expense("e1", "Rent", 1_000.0, Frequency::Monthly)],
            ..Plan::default()
        };
        // Hand-edited summary is ignored
        plan.summary.net_worth = 1.0;

        store.load(plan).unwrap();

        let loaded = store.plan().unwrap();
        assert_eq!(loaded.summary.net_worth, 5_000.0);
        assert_eq!(loaded.cashflow.net_monthly, 2_000.0);
        assert!(loaded.last_updated.is_some());

        let timeline = store.timeline();
        assert_eq!(timeline.len(), 4);
        assert_eq!(timeline[0].year, 2024);
        assert_eq!(timeline[3].total_assets, 77_000.0);

        assert_eq!(
            sink.events(),
            vec![
                DomainEvent::plan_loaded(5_000.0),
                DomainEvent::timeline_recomputed(4)
            ]
        );
    }

    #[test]
    fn test_load_rejects_invalid_plan() {
        let store = PlanStore::default();
        let plan = Plan {
            assets: vec![asset("a1", "Savings", -5.0)],
            ..Plan::default()
        };
        assert!(store.load(plan).is_err());
        assert!(!store.has_plan());
    }

    #[test]
    fn test_commit_stamps_and_publishes() {
        let sink = Arc::new(RecordingEventSink::new());
        let store = store(sink.clone());
        store.load(Plan::default()).unwrap();
        sink.clear();

        let mut next = store.plan().unwrap();
        next.assets.push(asset("a1", "Stocks", 10_000.0));
        store.commit(next);

        let committed = store.plan().unwrap();
        assert_eq!(committed.summary.total_assets, 10_000.0);
        assert_eq!(store.timeline()[0].total_assets, 10_000.0);

        let events = sink.events();
        assert_eq!(events.len(), 2);
        assert!(matches!(
            events[0],
            DomainEvent::PlanCommitted { net_worth, .. } if net_worth == 10_000.0
        ));
    }

    #[test]
    fn test_update_settings_reprojects() {
        let sink = Arc::new(RecordingEventSink::new());
        let store = store(sink.clone());
        store
            .load(Plan::new(vec![asset("a1", "Stocks", 10_000.0)], vec![], vec![], vec![]))
            .unwrap();

        let mut next = settings();
        next.retirement_age = 50;
        next.average_return_rate = 0.05;
        store.update_settings(next.clone()).unwrap();

        assert_eq!(store.settings(), next);
        assert_eq!(store.timeline().len(), 11);
        assert_eq!(store.timeline()[1].total_assets, 10_500.0);
        assert!(sink.events().contains(&DomainEvent::SettingsChanged));
    }

    #[test]
    fn test_update_settings_rejects_invalid() {
        let store = PlanStore::default();
        let bad = ProjectionSettings {
            projection_years: 0,
            ..ProjectionSettings::default()
        };
        assert!(store.update_settings(bad).is_err());
        assert_eq!(store.settings(), ProjectionSettings::default());
    }

    #[test]
    fn test_clear_drops_plan_and_timeline() {
        let store = PlanStore::default();
        store.load(Plan::default()).unwrap();
        assert!(store.has_plan());

        store.clear();
        assert!(!store.has_plan());
        assert!(store.timeline().is_empty());
    }
}
