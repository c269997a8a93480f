//! Phase lifecycle engine for franchise units.
//!
//! [`PhaseManager`] drives units through the fixed phase chain, gates the
//! moderation assistant's auto-responses by phase and keeps the transition
//! audit trail. Persistence goes through the [`UnitStore`] seam.

pub mod behavior;
pub mod config;
pub mod documentation;
pub mod error;
pub mod manager;
pub mod resources;
pub mod state_machine;
pub mod store;
pub mod transition_log;

pub use behavior::BehaviorResolver;
pub use config::PhaseManagerConfig;
pub use documentation::{DocumentationActivator, NoopDocumentation};
pub use error::{OrchestratorError, Result};
pub use manager::PhaseManager;
pub use resources::{TransitionGuard, TransitionRegistry};
pub use state_machine::PhaseLifecycle;
pub use store::{SqliteStore, StoreError, StoreResult, UnitStore};
pub use transition_log::TransitionLogStore;
