use std::sync::Mutex;

/// Session counters, shared between the actor and whoever reports on it.
pub struct SessionMetrics {
    inner: Mutex<MetricsSnapshot>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MetricsSnapshot {
    pub connections_opened: u64,
    pub updates_applied: u64,
    pub messages_skipped: u64,
    pub transport_errors: u64,
}

impl SessionMetrics {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(MetricsSnapshot::default()),
        }
    }

    pub fn record_connection(&self) {
        self.bump(|m| m.connections_opened += 1);
    }

    pub fn record_update(&self) {
        self.bump(|m| m.updates_applied += 1);
    }

    pub fn record_skipped(&self) {
        self.bump(|m| m.messages_skipped += 1);
    }

    pub fn record_transport_error(&self) {
        self.bump(|m| m.transport_errors += 1);
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        if let Ok(metrics) = self.inner.lock() {
            *metrics
        } else {
            MetricsSnapshot::default()
        }
    }

    fn bump(&self, apply: impl FnOnce(&mut MetricsSnapshot)) {
        if let Ok(mut metrics) = self.inner.lock() {
            apply(&mut metrics);
        }
    }
}

impl Default for SessionMetrics {
    fn default() -> Self {
        Self::new()
    }
}
