use crate::routes::sse::{EventBuffer, SharedEventBuffer, DEFAULT_EVENT_BUFFER_SIZE};
use events::EventBus;
use orchestrator::{PhaseManager, PhaseManagerConfig, SqliteStore};
use sqlx::SqlitePool;
use std::sync::{Arc, RwLock};
use tokio::sync::broadcast::error::RecvError;
use tokio::task::JoinHandle;

#[derive(Clone)]
pub struct AppState {
    pub pool: SqlitePool,
    pub manager: Arc<PhaseManager>,
    pub event_bus: EventBus,
    pub event_buffer: SharedEventBuffer,
}

impl AppState {
    pub fn new(pool: SqlitePool, config: PhaseManagerConfig) -> Self {
        let event_bus = EventBus::new();
        let manager = PhaseManager::new(Arc::new(SqliteStore::new(pool.clone())), config)
            .with_event_bus(event_bus.clone());

        Self::with_manager(pool, Arc::new(manager), event_bus)
    }

    /// `manager` must publish on `event_bus` for the SSE stream to see its events.
    pub fn with_manager(pool: SqlitePool, manager: Arc<PhaseManager>, event_bus: EventBus) -> Self {
        Self {
            pool,
            manager,
            event_bus,
            event_buffer: Arc::new(RwLock::new(EventBuffer::new(DEFAULT_EVENT_BUFFER_SIZE))),
        }
    }

    /// Copies every published event into the replay buffer used for
    /// `Last-Event-ID` reconnects. Runs until the bus is dropped.
    pub fn spawn_event_recorder(&self) -> JoinHandle<()> {
        let mut rx = self.event_bus.subscribe();
        let buffer = Arc::clone(&self.event_buffer);

        tokio::spawn(async move {
            loop {
                match rx.recv().await {
                    Ok(envelope) => buffer
                        .write()
                        .unwrap_or_else(|poisoned| poisoned.into_inner())
                        .push(envelope),
                    Err(RecvError::Lagged(skipped)) => {
                        tracing::warn!(skipped, "Event recorder lagged behind the bus");
                    }
                    Err(RecvError::Closed) => break,
                }
            }
        })
    }
}
