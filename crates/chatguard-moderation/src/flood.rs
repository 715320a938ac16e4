//! Per-sender flood delay

use std::collections::HashMap;

/// Tracks the last accepted message time of each sender
#[derive(Debug, Default)]
pub struct FloodGuard {
    last_accepted: HashMap<String, u64>,
}

impl FloodGuard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Milliseconds the sender still has to wait, if any
    pub fn check(&self, sender: &str, sent_at_ms: u64, delay_ms: u64) -> Option<u64> {
        let last = *self.last_accepted.get(sender)?;
        let elapsed = sent_at_ms.saturating_sub(last);
        (elapsed < delay_ms).then(|| delay_ms - elapsed)
    }

    /// Remember an accepted message
    pub fn record(&mut self, sender: &str, sent_at_ms: u64) {
        self.last_accepted.insert(sender.to_string(), sent_at_ms);
    }

    pub fn clear(&mut self) {
        self.last_accepted.clear();
    }
}
