use std::time::Duration;

pub const DEFAULT_SETTLE_DELAY: Duration = Duration::from_millis(1000);

#[derive(Debug, Clone)]
pub struct PhaseManagerConfig {
    /// Pause between marking a unit `transitioning` and writing its new phase.
    pub settle_delay: Duration,
}

impl Default for PhaseManagerConfig {
    fn default() -> Self {
        Self {
            settle_delay: DEFAULT_SETTLE_DELAY,
        }
    }
}

impl PhaseManagerConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_settle_delay(mut self, settle_delay: Duration) -> Self {
        self.settle_delay = settle_delay;
        self
    }

    pub fn with_settle_delay_ms(self, millis: u64) -> Self {
        self.with_settle_delay(Duration::from_millis(millis))
    }
}
