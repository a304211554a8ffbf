//! Domain events module.
//!
//! Provides the events the plan store publishes after its state changes and
//! the sink trait callers implement to push them into their own reactive
//! state holder (UI store, websocket, log).

mod domain_event;
mod sink;

pub use domain_event::*;
pub use sink::*;

#[cfg(test)]
pub(crate) use sink::RecordingEventSink;
