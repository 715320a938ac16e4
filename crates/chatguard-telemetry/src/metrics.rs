//! Moderation metrics
//!
//! Counters are kept locally for snapshots and mirrored to the `metrics`
//! facade, so an installed recorder (e.g. Prometheus) sees them too.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Metrics collector for ChatGuard moderation
#[derive(Clone, Default)]
pub struct MetricsCollector {
    inner: Arc<MetricsInner>,
}

#[derive(Default)]
struct MetricsInner {
    messages_classified: AtomicU64,
    blocked_caps: AtomicU64,
    blocked_repeats: AtomicU64,
    signal_flags: AtomicU64,
    rejected_banned: AtomicU64,
    rejected_locked: AtomicU64,
    rejected_flood: AtomicU64,
    reclassifications: AtomicU64,
    classifier_latency_us: AtomicU64,
}

impl MetricsCollector {
    /// Create a new metrics collector
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a message run through the filter
    pub fn record_classified(&self, latency_us: u64) {
        self.inner.messages_classified.fetch_add(1, Ordering::Relaxed);
        self.inner
            .classifier_latency_us
            .fetch_add(latency_us, Ordering::Relaxed);
        ::metrics::counter!("chatguard_messages_classified_total").increment(1);
        ::metrics::histogram!("chatguard_classifier_latency_us").record(latency_us as f64);
    }

    /// Record a filter verdict that newly blocks a message, by reason code
    /// (`CAPS`, `REPEATS`). A message that stays blocked across a profile
    /// switch is not counted again.
    pub fn record_blocked(&self, reason_code: &'static str) {
        match reason_code {
            "CAPS" => self.inner.blocked_caps.fetch_add(1, Ordering::Relaxed),
            _ => self.inner.blocked_repeats.fetch_add(1, Ordering::Relaxed),
        };
        ::metrics::counter!("chatguard_blocked_total", "reason" => reason_code).increment(1);
    }

    /// Record a flag raised by a content signal
    pub fn record_signal_flag(&self, signal: &str) {
        self.inner.signal_flags.fetch_add(1, Ordering::Relaxed);
        ::metrics::counter!("chatguard_signal_flags_total", "signal" => signal.to_string())
            .increment(1);
    }

    /// Record a message rejected because its sender is banned
    pub fn record_rejected_banned(&self) {
        self.inner.rejected_banned.fetch_add(1, Ordering::Relaxed);
        ::metrics::counter!("chatguard_rejected_total", "cause" => "banned").increment(1);
    }

    /// Record a message rejected because chat is locked
    pub fn record_rejected_locked(&self) {
        self.inner.rejected_locked.fetch_add(1, Ordering::Relaxed);
        ::metrics::counter!("chatguard_rejected_total", "cause" => "locked").increment(1);
    }

    /// Record a message rejected by the flood delay
    pub fn record_rejected_flood(&self) {
        self.inner.rejected_flood.fetch_add(1, Ordering::Relaxed);
        ::metrics::counter!("chatguard_rejected_total", "cause" => "flood").increment(1);
    }

    /// Record verdicts changed by a profile switch
    pub fn record_reclassifications(&self, changed: u64) {
        self.inner
            .reclassifications
            .fetch_add(changed, Ordering::Relaxed);
        ::metrics::counter!("chatguard_reclassifications_total").increment(changed);
    }

    /// Get current metrics snapshot
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            messages_classified: self.inner.messages_classified.load(Ordering::Relaxed),
            blocked_caps: self.inner.blocked_caps.load(Ordering::Relaxed),
            blocked_repeats: self.inner.blocked_repeats.load(Ordering::Relaxed),
            signal_flags: self.inner.signal_flags.load(Ordering::Relaxed),
            rejected_banned: self.inner.rejected_banned.load(Ordering::Relaxed),
            rejected_locked: self.inner.rejected_locked.load(Ordering::Relaxed),
            rejected_flood: self.inner.rejected_flood.load(Ordering::Relaxed),
            reclassifications: self.inner.reclassifications.load(Ordering::Relaxed),
            classifier_latency_us: self.inner.classifier_latency_us.load(Ordering::Relaxed),
        }
    }
}

/// Snapshot of current metrics
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MetricsSnapshot {
    pub messages_classified: u64,
    pub blocked_caps: u64,
    pub blocked_repeats: u64,
    pub signal_flags: u64,
    pub rejected_banned: u64,
    pub rejected_locked: u64,
    pub rejected_flood: u64,
    pub reclassifications: u64,
    pub classifier_latency_us: u64,
}

impl MetricsSnapshot {
    /// Messages blocked by the filter
    pub fn blocked(&self) -> u64 {
        self.blocked_caps + self.blocked_repeats
    }

    /// Share of classified messages the filter blocked
    pub fn block_rate(&self) -> f64 {
        if self.messages_classified == 0 {
            0.0
        } else {
            self.blocked() as f64 / self.messages_classified as f64
        }
    }

    /// Calculate average classifier latency per message
    pub fn avg_classifier_latency_us(&self) -> u64 {
        if self.messages_classified == 0 {
            0
        } else {
            self.classifier_latency_us / self.messages_classified
        }
    }
}
