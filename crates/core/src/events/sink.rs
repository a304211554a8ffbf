//! Receivers for plan store events.

use log::debug;

use super::DomainEvent;

/// Receives the events a [`crate::store::PlanStore`] publishes.
///
/// Called synchronously after the new state is visible, while no store lock
/// is held. A sink cannot veto or fail a state change.
pub trait DomainEventSink: Send + Sync {
    fn emit(&self, event: DomainEvent);

    /// Events from one state change, in order.
    fn emit_batch(&self, events: Vec<DomainEvent>) {
        for event in events {
            self.emit(event);
        }
    }
}

/// Discards every event.
#[derive(Clone, Default)]
pub struct NoOpDomainEventSink;

impl DomainEventSink for NoOpDomainEventSink {
    fn emit(&self, _event: DomainEvent) {}
}

/// Writes every event to the `log` facade at debug level.
#[derive(Clone, Default)]
pub struct LogDomainEventSink;

impl DomainEventSink for LogDomainEventSink {
    fn emit(&self, event: DomainEvent) {
        match &event {
            DomainEvent::PlanLoaded { net_worth } => {
                debug!("Plan loaded, net worth {:.2}", net_worth)
            }
            DomainEvent::PlanCommitted {
                last_updated,
                net_worth,
            } => debug!("Plan committed at {}, net worth {:.2}", last_updated, net_worth),
            DomainEvent::TimelineRecomputed { points } => {
                debug!("Timeline recomputed with {} points", points)
            }
            DomainEvent::SettingsChanged => debug!("Projection settings changed"),
            DomainEvent::PlanCleared => debug!("Plan cleared"),
        }
    }
}

#[cfg(test)]
pub(crate) use recording::RecordingEventSink;


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_emit_batch_preserves_order() {
        let sink = RecordingEventSink::new();
        sink.emit(DomainEvent::plan_loaded(1_000.0));
        sink.emit_batch(vec![DomainEvent::SettingsChanged, DomainEvent::PlanCleared]);

        assert_eq!(
            sink.events(),
            vec![
                DomainEvent::plan_loaded(1_000.0),
                DomainEvent::SettingsChanged,
                DomainEvent::PlanCleared,
            ]
        );

        sink.clear();
        assert!(sink.is_empty());
    }

    #[test]
    fn test_log_sink_accepts_every_event() {
        let sink = LogDomainEventSink;
        sink.emit_batch(vec![
            DomainEvent::plan_loaded(1.0),
            DomainEvent::plan_committed(chrono::Utc::now(), 2.0),
            DomainEvent::timeline_recomputed(3),
            DomainEvent::SettingsChanged,
            DomainEvent::PlanCleared,
        ]);
    }
}
