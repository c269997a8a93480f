//! Event system for phasekeeper
//!
//! This crate provides the event bus and event types used to notify
//! dashboards about unit registrations, status changes and phase
//! transitions as they happen.

mod bus;
mod types;

pub use bus::EventBus;
pub use types::*;
