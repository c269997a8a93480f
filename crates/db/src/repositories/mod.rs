mod behavior_group_repository;
mod phase_repository;
mod transition_log_repository;
mod unit_repository;

pub use behavior_group_repository::*;
pub use phase_repository::*;
pub use transition_log_repository::*;
pub use unit_repository::*;
