mod behavior_group;
mod phase;
mod transition_log;
mod unit;

pub use behavior_group::BehaviorGroupRow;
pub use phase::PhaseRow;
pub use transition_log::TransitionLogRow;
pub use unit::UnitRow;

use chrono::{DateTime, TimeZone, Utc};
use uuid::Uuid;

use crate::error::DbError;

pub(crate) fn timestamp_to_datetime(ts: i64) -> DateTime<Utc> {
    Utc.timestamp_opt(ts, 0).single().unwrap_or_default()
}

pub(crate) fn datetime_to_timestamp(dt: DateTime<Utc>) -> i64 {
    dt.timestamp()
}

pub(crate) fn millis_to_datetime(ms: i64) -> DateTime<Utc> {
    Utc.timestamp_millis_opt(ms).single().unwrap_or_default()
}

/// A malformed id is an error, never `None`: `None` carries meaning for every
/// optional id column (no phase, terminal phase, initial assignment).
pub(crate) fn parse_optional_id(
    table: &'static str,
    field: &str,
    value: Option<String>,
) -> Result<Option<Uuid>, DbError> {
    value
        .map(|s| {
            Uuid::parse_str(&s)
                .map_err(|e| DbError::invalid_row(table, format!("bad {} {}: {}", field, s, e)))
        })
        .transpose()
}
