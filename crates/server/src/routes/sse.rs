use std::collections::VecDeque;
use std::convert::Infallible;
use std::sync::{Arc, RwLock};
use std::time::Duration;

use axum::extract::{Query, State};
use axum::response::sse::{Event, KeepAlive, Sse};
use futures::stream::{Stream, StreamExt};
use serde::Deserialize;
use tokio_stream::wrappers::BroadcastStream;
use uuid::Uuid;

use crate::state::AppState;

pub const DEFAULT_EVENT_BUFFER_SIZE: usize = 1000;
pub const SSE_KEEP_ALIVE_INTERVAL: Duration = Duration::from_secs(15);

#[derive(Debug, Deserialize)]
pub struct EventsQuery {
    pub unit_ids: Option<String>,
}

pub struct EventBuffer {
    events: VecDeque<events::EventEnvelope>,
    max_size: usize,
}

impl EventBuffer {
    pub fn new(max_size: usize) -> Self {
        Self {
            events: VecDeque::with_capacity(max_size),
            max_size,
        }
    }

    pub fn push(&mut self, envelope: events::EventEnvelope) {
        if self.events.len() >= self.max_size {
            self.events.pop_front();
        }
        self.events.push_back(envelope);
    }

    pub fn events_after(&self, event_id: Uuid) -> Vec<events::EventEnvelope> {
        self.events
            .iter()
            .skip_while(|envelope| envelope.id != event_id)
            .skip(1)
            .cloned()
            .collect()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

pub type SharedEventBuffer = Arc<RwLock<EventBuffer>>;

fn parse_unit_ids(unit_ids: Option<&str>) -> Option<Vec<Uuid>> {
    unit_ids.map(|s| {
        s.split(',')
            .filter_map(|id| id.trim().parse().ok())
            .collect()
    })
}

/// Events without a unit (catalog edits, errors) pass every filter.
fn matches_filter(envelope: &events::EventEnvelope, unit_ids: Option<&[Uuid]>) -> bool {
    match (unit_ids, envelope.event.unit_id()) {
        (Some(ids), Some(unit_id)) => ids.contains(&unit_id),
        _ => true,
    }
}

fn envelope_to_sse_event(envelope: &events::EventEnvelope) -> Result<Event, Infallible> {
    let data = serde_json::to_string(&envelope).unwrap_or_else(|_| "{}".to_string());

    Ok(Event::default()
        .id(envelope.id.to_string())
        .event(envelope.event.event_type())
        .data(data))
}

#[utoipa::path(
    get,
    path = "/api/events",
    params(
        ("unit_ids" = Option<String>, Query, description = "Comma-separated unit IDs to filter events"),
    ),
    responses(
        (status = 200, description = "SSE event stream"),
    ),
    tag = "events"
)]
pub async fn events_stream(
    State(state): State<AppState>,
    Query(query): Query<EventsQuery>,
    headers: axum::http::HeaderMap,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let unit_ids = parse_unit_ids(query.unit_ids.as_deref());
    let last_event_id = headers
        .get("Last-Event-ID")
        .and_then(|v| v.to_str().ok())
        .and_then(|s| s.parse::<Uuid>().ok());

    let rx = state.event_bus.subscribe();

    let missed_events = match last_event_id {
        Some(event_id) => state
            .event_buffer
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .events_after(event_id),
        None => vec![],
    };

    let missed_filter = unit_ids.clone();
    let missed_stream = futures::stream::iter(
        missed_events
            .into_iter()
            .filter(move |e| matches_filter(e, missed_filter.as_deref()))
            .map(|e| envelope_to_sse_event(&e)),
    );

    let live_stream = BroadcastStream::new(rx).filter_map(move |result| {
        let unit_ids = unit_ids.clone();

        async move {
            match result {
                Ok(envelope) if matches_filter(&envelope, unit_ids.as_deref()) => {
                    Some(envelope_to_sse_event(&envelope))
                }
                Ok(_) => None,
                Err(e) => {
                    tracing::warn!("SSE broadcast error: {:?}", e);
                    None
                }
            }
        }
    });

    let stream = missed_stream.chain(live_stream);

    Sse::new(stream).keep_alive(
        KeepAlive::new()
            .interval(SSE_KEEP_ALIVE_INTERVAL)
            .text("keep-alive"),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use events::EventEnvelope;

    fn registered(unit_id: Uuid) -> EventEnvelope {
        EventEnvelope::new(events::Event::UnitRegistered {
            unit_id,
            code: "CENTRAL".to_string(),
            phase_id: Uuid::new_v4(),
        })
    }

    #[test]
    fn test_parse_unit_ids_none() {
        assert!(parse_unit_ids(None).is_none());
    }

    #[test]
    fn test_parse_unit_ids_empty() {
        assert!(parse_unit_ids(Some("")).unwrap().is_empty());
    }

    #[test]
    fn test_parse_unit_ids_with_spaces_and_garbage() {
        let uuid1 = Uuid::new_v4();
        let uuid2 = Uuid::new_v4();
        let input = format!("{} ,invalid, {}", uuid1, uuid2);
        let result = parse_unit_ids(Some(&input)).unwrap();
        assert_eq!(result, vec![uuid1, uuid2]);
    }

    #[test]
    fn test_filter_passes_unitless_events() {
        let wanted = Uuid::new_v4();
        let ids = vec![wanted];

        assert!(matches_filter(&registered(wanted), Some(&ids)));
        assert!(!matches_filter(&registered(Uuid::new_v4()), Some(&ids)));
        assert!(matches_filter(&registered(Uuid::new_v4()), None));

        let phase_event = EventEnvelope::new(events::Event::PhaseUpdated {
            phase_id: Uuid::new_v4(),
        });
        assert!(matches_filter(&phase_event, Some(&ids)));
    }

    #[test]
    fn test_event_buffer_events_after() {
        let mut buffer = EventBuffer::new(3);

        let e1 = registered(Uuid::new_v4());
        let e2 = registered(Uuid::new_v4());
        let e3 = registered(Uuid::new_v4());
        let id1 = e1.id;
        let id2 = e2.id;
        let id3 = e3.id;

        buffer.push(e1);
        buffer.push(e2);
        buffer.push(e3);

        let after_first = buffer.events_after(id1);
        assert_eq!(after_first.len(), 2);
        assert_eq!(after_first[0].id, id2);

        let after_second = buffer.events_after(id2);
        assert_eq!(after_second.len(), 1);
        assert_eq!(after_second[0].id, id3);

        assert!(buffer.events_after(Uuid::new_v4()).is_empty());
    }

    #[test]
    fn test_event_buffer_evicts_oldest() {
        let mut buffer = EventBuffer::new(2);

        let e1 = registered(Uuid::new_v4());
        let e2 = registered(Uuid::new_v4());
        let e3 = registered(Uuid::new_v4());
        let id1 = e1.id;
        let id2 = e2.id;
        let id3 = e3.id;

        buffer.push(e1);
        buffer.push(e2);
        buffer.push(e3);

        assert_eq!(buffer.len(), 2);
        assert!(buffer.events_after(id1).is_empty());
        let after_e2 = buffer.events_after(id2);
        assert_eq!(after_e2.len(), 1);
        assert_eq!(after_e2[0].id, id3);
    }

    #[test]
    fn test_envelope_to_sse_event_does_not_panic() {
        let _event = envelope_to_sse_event(&registered(Uuid::new_v4())).unwrap();
    }
}
