mod error;
pub mod models;
mod pool;
pub mod repositories;
mod seed;

pub use error::*;
pub use pool::*;
pub use repositories::*;
pub use seed::seed_phase_catalog;
