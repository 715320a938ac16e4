//! Hash-chained moderation audit trail

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;
use std::time::SystemTime;
use tracing::debug;

/// Audit trail with hash-chained events for tamper detection
#[derive(Debug, Default)]
pub struct AuditTrail {
    events: Vec<AuditEvent>,
    chain_hash: Option<String>,
}

impl AuditTrail {
    /// Create a new audit trail
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an event to the audit trail
    pub fn add_event(&mut self, mut event: AuditEvent) {
        event.previous_hash = self.chain_hash.clone();

        let hash = Self::compute_hash(&event);
        event.hash = Some(hash.clone());

        debug!(kind = %event.kind, hash = %hash, "audit event recorded");

        self.chain_hash = Some(hash);
        self.events.push(event);
    }

    /// Verify the integrity of the audit trail
    pub fn verify(&self) -> bool {
        let mut prev_hash: Option<&String> = None;

        for event in &self.events {
            if event.previous_hash.as_ref() != prev_hash {
                return false;
            }

            let computed_hash = Self::compute_hash(event);
            if event.hash.as_ref() != Some(&computed_hash) {
                return false;
            }

            prev_hash = event.hash.as_ref();
        }

        true
    }

    /// Get all events
    pub fn events(&self) -> &[AuditEvent] {
        &self.events
    }

    /// Events of one kind
    pub fn events_of(&self, kind: AuditEventKind) -> impl Iterator<Item = &AuditEvent> {
        self.events.iter().filter(move |e| e.kind == kind)
    }

    /// Hash of the newest event
    pub fn head(&self) -> Option<&str> {
        self.chain_hash.as_deref()
    }

    fn compute_hash(event: &AuditEvent) -> String {
        let mut hasher = Sha256::new();

        // Everything except the hash field itself
        hasher.update(event.kind.as_str().as_bytes());
        if let Some(ref subject) = event.subject {
            hasher.update(subject.as_bytes());
        }
        if let Some(ref data) = event.data {
            hasher.update(data.as_bytes());
        }
        hasher.update(format!("{:?}", event.timestamp).as_bytes());
        hasher.update(event.severity.as_str().as_bytes());
        if let Some(ref prev) = event.previous_hash {
            hasher.update(prev.as_bytes());
        }

        format!("{:x}", hasher.finalize())
    }
}

/// Kind of moderation event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditEventKind {
    MessageFlagged,
    MessageRejected,
    ManualFlag,
    ProfileChanged,
    MessageReclassified,
    ChatLocked,
    ChatUnlocked,
    ChatCleared,
    PlayerBanned,
    PlayerUnbanned,
    PlayerMuted,
    PlayerUnmuted,
}

impl AuditEventKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::MessageFlagged => "message_flagged",
            Self::MessageRejected => "message_rejected",
            Self::ManualFlag => "manual_flag",
            Self::ProfileChanged => "profile_changed",
            Self::MessageReclassified => "message_reclassified",
            Self::ChatLocked => "chat_locked",
            Self::ChatUnlocked => "chat_unlocked",
            Self::ChatCleared => "chat_cleared",
            Self::PlayerBanned => "player_banned",
            Self::PlayerUnbanned => "player_unbanned",
            Self::PlayerMuted => "player_muted",
            Self::PlayerUnmuted => "player_unmuted",
        }
    }
}

impl fmt::Display for AuditEventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single audit event in the trail
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditEvent {
    /// Event kind
    pub kind: AuditEventKind,

    /// Message id or sender the event is about
    pub subject: Option<String>,

    /// Event data (JSON serialized)
    pub data: Option<String>,

    /// Timestamp
    pub timestamp: SystemTime,

    /// Hash of this event
    pub hash: Option<String>,

    /// Hash of previous event (for chaining)
    pub previous_hash: Option<String>,

    /// Severity level
    pub severity: AuditSeverity,
}

impl AuditEvent {
    /// Create a new audit event
    pub fn new(kind: AuditEventKind) -> Self {
        Self {
            kind,
            subject: None,
            data: None,
            timestamp: SystemTime::now(),
            hash: None,
            previous_hash: None,
            severity: AuditSeverity::Info,
        }
    }

    /// Set the subject (message id, sender)
    pub fn with_subject(mut self, subject: impl Into<String>) -> Self {
        self.subject = Some(subject.into());
        self
    }

    /// Set event data
    pub fn with_data(mut self, data: impl Serialize) -> Self {
        self.data = serde_json::to_string(&data).ok();
        self
    }

    /// Set severity
    pub fn with_severity(mut self, severity: AuditSeverity) -> Self {
        self.severity = severity;
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AuditSeverity {
    Info,
    Warning,
    High,
}

impl AuditSeverity {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Info => "info",
            Self::Warning => "warning",
            Self::High => "high",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_audit_trail() {
        let mut trail = AuditTrail::new();

        trail.add_event(
            AuditEvent::new(AuditEventKind::MessageFlagged)
                .with_subject("msg-1")
                .with_data(serde_json::json!({ "reason": "SPAM: REPEATS" })),
        );
        trail.add_event(AuditEvent::new(AuditEventKind::ProfileChanged));

        assert!(trail.verify());
        assert_eq!(trail.events().len(), 2);
        assert_eq!(trail.events()[1].previous_hash, trail.events()[0].hash);
        assert_eq!(trail.head(), trail.events()[1].hash.as_deref());
        assert_eq!(trail.events_of(AuditEventKind::MessageFlagged).count(), 1);
    }

    #[test]
    fn test_tamper_detection() {
        let mut trail = AuditTrail::new();

        trail.add_event(AuditEvent::new(AuditEventKind::ChatLocked));
        trail.add_event(AuditEvent::new(AuditEventKind::ChatUnlocked));

        trail.events[0].kind = AuditEventKind::ChatCleared;

        assert!(!trail.verify());
    }

    #[test]
    fn test_tampered_subject_detected() {
        let mut trail = AuditTrail::new();

        trail.add_event(
            AuditEvent::new(AuditEventKind::ManualFlag)
                .with_subject("msg-7")
                .with_severity(AuditSeverity::Warning),
        );
        trail.events[0].subject = Some("msg-8".to_string());

        assert!(!trail.verify());
    }

    #[test]
    fn test_empty_trail_verifies() {
        let trail = AuditTrail::new();
        assert!(trail.verify());
        assert_eq!(trail.head(), None);
    }
}
