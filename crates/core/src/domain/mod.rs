mod behavior;
mod phase;
mod transition_log;
mod unit;

pub use behavior::*;
pub use phase::*;
pub use transition_log::*;
pub use unit::*;
