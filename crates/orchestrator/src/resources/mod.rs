//! RAII resource guards.
//!
//! - [`TransitionGuard`] - per-unit exclusion while a phase change runs

mod transition_guard;

pub use transition_guard::{TransitionGuard, TransitionRegistry};
