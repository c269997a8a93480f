mod health;
pub mod phases;
pub mod sse;
pub mod transitions;
pub mod units;

pub use health::*;
