//! Chat room moderation
//!
//! A [`ChatRoom`] keeps the message history of one chat channel and decides
//! what happens to each submitted message:
//!
//! 1. staff senders bypass every check;
//! 2. a banned sender is rejected;
//! 3. a locked chat rejects the message;
//! 4. the sender's flood delay (per profile) rejects the message;
//! 5. content signals run in order, the first one over its threshold flags;
//! 6. otherwise the caps / repeat filter decides.
//!
//! Switching the strictness profile re-evaluates every message whose status
//! belongs to the filter. Flags raised by signals or moderators, and staff
//! messages, are never touched by re-evaluation.
//!
//! What a viewer sees is decided separately by [`ChatRoom::visible_to`]:
//! with shadow mute on, signal-flagged messages are shown only to their
//! sender, and shadow-muted players are only ever seen by themselves. Staff
//! see everything.

use crate::config::GuardConfig;
use crate::flood::FloodGuard;
use chatguard_classifiers::{
    ClassificationResult, Classifier, PatternClassifier, SpamFilter, StrictnessProfile,
    ToxicityClassifier,
};
use chatguard_core::{ChatMessage, Error, Flag, FlagOrigin, Result};
use chatguard_telemetry::{AuditEvent, AuditEventKind, AuditSeverity, AuditTrail, MetricsCollector};
use serde_json::json;
use std::collections::HashSet;
use std::time::Instant;
use tracing::{debug, info, warn};
use uuid::Uuid;

/// A content signal and the score at which it flags a message
pub struct SignalHook {
    classifier: Box<dyn Classifier>,
    threshold: f32,
}

impl SignalHook {
    pub fn new(classifier: Box<dyn Classifier>, threshold: f32) -> Self {
        Self {
            classifier,
            threshold,
        }
    }

    pub fn name(&self) -> &str {
        self.classifier.name()
    }
}

/// Outcome of submitting a message
#[derive(Debug, Clone, PartialEq)]
pub enum SubmitOutcome {
    /// Stored in history, possibly flagged
    Accepted { id: String, flag: Option<Flag> },

    /// Not stored
    Rejected(Rejection),
}

impl SubmitOutcome {
    /// Whether the message was stored without a flag
    pub fn is_clear(&self) -> bool {
        matches!(self, Self::Accepted { flag: None, .. })
    }
}

/// Why a message was not accepted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    /// Sender was banned by a moderator
    Banned,

    /// Chat is locked for non-staff senders
    ChatLocked,

    /// Sender must wait before posting again
    Flood { retry_after_ms: u64 },
}

/// Moderated chat channel
pub struct ChatRoom {
    profile: StrictnessProfile,
    filter: SpamFilter,
    signals: Vec<SignalHook>,
    staff: HashSet<String>,
    banned: HashSet<String>,
    muted: HashSet<String>,
    shadow_mute: bool,
    locked: bool,
    history: Vec<ChatMessage>,
    flood: FloodGuard,
    audit: Option<AuditTrail>,
    metrics: MetricsCollector,
}

impl ChatRoom {
    /// Create a room with the given filter, the default profile and no signals
    pub fn new(filter: SpamFilter) -> Self {
        Self {
            profile: StrictnessProfile::default(),
            filter,
            signals: Vec::new(),
            staff: HashSet::new(),
            banned: HashSet::new(),
            muted: HashSet::new(),
            shadow_mute: false,
            locked: false,
            history: Vec::new(),
            flood: FloodGuard::new(),
            audit: None,
            metrics: MetricsCollector::new(),
        }
    }

    /// Build a room from configuration
    pub fn from_config(config: &GuardConfig) -> Result<Self> {
        config.validate()?;

        let mut room = Self::new(SpamFilter::new(config.thresholds)?)
            .with_profile(config.profile)
            .with_staff(config.staff.iter().cloned())
            .with_shadow_mute(config.shadow_mute);

        if config.toxicity.enabled {
            room = room.with_signal(
                Box::new(ToxicityClassifier::new()?),
                config.toxicity.threshold,
            );
        }

        if !config.blocked_phrases.is_empty() {
            room = room.with_signal(
                Box::new(PatternClassifier::new(
                    "blocked_phrases",
                    &config.blocked_phrases,
                )?),
                1.0,
            );
        }

        if config.audit {
            room = room.with_audit();
        }

        Ok(room)
    }

    pub fn with_profile(mut self, profile: StrictnessProfile) -> Self {
        self.profile = profile;
        self
    }

    pub fn with_staff(mut self, staff: impl IntoIterator<Item = String>) -> Self {
        self.staff.extend(staff);
        self
    }

    /// Hide signal-flagged messages from everyone but their sender
    pub fn with_shadow_mute(mut self, enabled: bool) -> Self {
        self.shadow_mute = enabled;
        self
    }

    /// Add a content signal; signals run in insertion order
    pub fn with_signal(mut self, classifier: Box<dyn Classifier>, threshold: f32) -> Self {
        self.signals.push(SignalHook::new(classifier, threshold));
        self
    }

    /// Keep an audit trail of moderation events
    pub fn with_audit(mut self) -> Self {
        self.audit = Some(AuditTrail::new());
        self
    }

    /// Share an existing metrics collector
    pub fn with_metrics(mut self, metrics: MetricsCollector) -> Self {
        self.metrics = metrics;
        self
    }

    /// Submit a new message
    pub fn submit(&mut self, sender: &str, content: &str, sent_at_ms: u64) -> Result<SubmitOutcome> {
        let staff = self.is_staff(sender);

        if !staff {
            if let Some(rejection) = self.admission(sender, sent_at_ms) {
                self.reject(sender, rejection);
                return Ok(SubmitOutcome::Rejected(rejection));
            }
        }

        let flag = if staff { None } else { self.evaluate(content)? };

        let id = Uuid::new_v4().to_string();
        let mut message = ChatMessage::new(id.clone(), sender, content, sent_at_ms);
        message.flag = flag.clone();

        if let Some(flag) = &flag {
            debug!(id = %id, sender, reason = %flag.reason, "message flagged");
            self.record_event(
                AuditEvent::new(AuditEventKind::MessageFlagged)
                    .with_subject(id.clone())
                    .with_data(json!({
                        "sender": sender,
                        "origin": flag.origin,
                        "reason": flag.reason,
                    })),
            );
        }

        self.flood.record(sender, sent_at_ms);
        self.history.push(message);

        Ok(SubmitOutcome::Accepted { id, flag })
    }

    /// Append existing history without running any checks
    pub fn import(&mut self, messages: impl IntoIterator<Item = ChatMessage>) {
        let before = self.history.len();
        self.history.extend(messages);
        debug!(count = self.history.len() - before, "imported chat history");
    }

    /// Switch the strictness profile and re-evaluate filter-owned messages.
    ///
    /// Returns the number of messages whose flag changed.
    pub fn set_profile(&mut self, profile: StrictnessProfile) -> usize {
        if profile == self.profile {
            return 0;
        }

        let previous = std::mem::replace(&mut self.profile, profile);
        info!(from = %previous, to = %profile, "strictness profile changed");
        self.record_event(
            AuditEvent::new(AuditEventKind::ProfileChanged)
                .with_data(json!({ "from": previous, "to": profile })),
        );

        self.reevaluate()
    }

    /// Re-run the filter on every filter-owned, non-staff message under the
    /// active profile. Returns the number of messages whose flag changed.
    pub fn reevaluate(&mut self) -> usize {
        let profile = self.profile;
        let mut changed = 0;
        for message in self.history.iter_mut() {
            if !message.is_filter_owned() || self.staff.contains(&message.sender) {
                continue;
            }

            let result = filter_verdict(&self.filter, &self.metrics, profile, &message.content);
            let flag = filter_flag(&result);
            if flag == message.flag {
                continue;
            }

            changed += 1;
            if let Some(code) = result.reason_code() {
                self.metrics.record_blocked(code.as_str());
            }
            if let Some(audit) = self.audit.as_mut() {
                audit.add_event(
                    AuditEvent::new(AuditEventKind::MessageReclassified)
                        .with_subject(message.id.clone())
                        .with_data(json!({
                            "before": message.flag.as_ref().map(|f| &f.reason),
                            "after": flag.as_ref().map(|f| &f.reason),
                        })),
                );
            }
            message.flag = flag;
        }

        self.metrics.record_reclassifications(changed as u64);
        info!(changed, %profile, "history re-evaluated");
        changed
    }

    /// Check a message under the active profile without storing it
    pub fn preview(&self, content: &str) -> ClassificationResult {
        self.filter.classify(content, self.profile)
    }

    /// Flag a message by hand; the flag survives profile changes
    pub fn flag(&mut self, id: &str, moderator: &str, reason: &str) -> Result<()> {
        let message = self
            .history
            .iter_mut()
            .find(|m| m.id == id)
            .ok_or_else(|| Error::moderation(format!("unknown message id '{id}'")))?;

        message.flag = Some(Flag::manual(moderator, reason));
        info!(id, moderator, reason, "message flagged by moderator");

        let event = AuditEvent::new(AuditEventKind::ManualFlag)
            .with_subject(id)
            .with_data(json!({ "moderator": moderator, "reason": reason }))
            .with_severity(AuditSeverity::Warning);
        self.record_event(event);
        Ok(())
    }

    /// Ban a player: their future messages are rejected until unbanned
    pub fn ban(&mut self, player: &str, moderator: &str) -> Result<()> {
        self.ensure_not_staff(player, "ban")?;
        if self.banned.insert(player.to_string()) {
            warn!(player, moderator, "player banned");
            self.record_event(
                AuditEvent::new(AuditEventKind::PlayerBanned)
                    .with_subject(player)
                    .with_data(json!({ "moderator": moderator }))
                    .with_severity(AuditSeverity::High),
            );
        }
        Ok(())
    }

    pub fn unban(&mut self, player: &str) {
        if self.banned.remove(player) {
            info!(player, "player unbanned");
            self.record_event(AuditEvent::new(AuditEventKind::PlayerUnbanned).with_subject(player));
        }
    }

    pub fn is_banned(&self, player: &str) -> bool {
        self.banned.contains(player)
    }

    /// Shadow-mute a player: they keep posting, but only they and staff
    /// see their messages
    pub fn mute(&mut self, player: &str, moderator: &str) -> Result<()> {
        self.ensure_not_staff(player, "mute")?;
        if self.muted.insert(player.to_string()) {
            info!(player, moderator, "player shadow-muted");
            self.record_event(
                AuditEvent::new(AuditEventKind::PlayerMuted)
                    .with_subject(player)
                    .with_data(json!({ "moderator": moderator }))
                    .with_severity(AuditSeverity::Warning),
            );
        }
        Ok(())
    }

    pub fn unmute(&mut self, player: &str) {
        if self.muted.remove(player) {
            info!(player, "player unmuted");
            self.record_event(AuditEvent::new(AuditEventKind::PlayerUnmuted).with_subject(player));
        }
    }

    pub fn is_muted(&self, player: &str) -> bool {
        self.muted.contains(player)
    }

    pub fn shadow_mute(&self) -> bool {
        self.shadow_mute
    }

    /// History as seen by `viewer`
    pub fn visible_to<'a>(&'a self, viewer: &'a str) -> impl Iterator<Item = &'a ChatMessage> + 'a {
        let staff = self.is_staff(viewer);
        self.history
            .iter()
            .filter(move |m| staff || m.sender == viewer || !self.is_hidden(m))
    }

    /// Reject all non-staff messages until unlocked
    pub fn lock(&mut self) {
        if !self.locked {
            self.locked = true;
            warn!("chat locked");
            self.record_event(
                AuditEvent::new(AuditEventKind::ChatLocked).with_severity(AuditSeverity::High),
            );
        }
    }

    pub fn unlock(&mut self) {
        if self.locked {
            self.locked = false;
            info!("chat unlocked");
            self.record_event(AuditEvent::new(AuditEventKind::ChatUnlocked));
        }
    }

    pub fn is_locked(&self) -> bool {
        self.locked
    }

    /// Drop all history and flood state; bans and mutes stay
    pub fn clear(&mut self) {
        let dropped = self.history.len();
        self.history.clear();
        self.flood.clear();
        info!(dropped, "chat cleared");
        self.record_event(
            AuditEvent::new(AuditEventKind::ChatCleared).with_data(json!({ "dropped": dropped })),
        );
    }

    pub fn history(&self) -> &[ChatMessage] {
        &self.history
    }

    /// Look up a message by id
    pub fn message(&self, id: &str) -> Option<&ChatMessage> {
        self.history.iter().find(|m| m.id == id)
    }

    pub fn profile(&self) -> StrictnessProfile {
        self.profile
    }

    pub fn filter(&self) -> &SpamFilter {
        &self.filter
    }

    pub fn signals(&self) -> &[SignalHook] {
        &self.signals
    }

    pub fn is_staff(&self, sender: &str) -> bool {
        self.staff.contains(sender)
    }

    pub fn audit(&self) -> Option<&AuditTrail> {
        self.audit.as_ref()
    }

    pub fn metrics(&self) -> &MetricsCollector {
        &self.metrics
    }

    fn admission(&self, sender: &str, sent_at_ms: u64) -> Option<Rejection> {
        if self.banned.contains(sender) {
            return Some(Rejection::Banned);
        }
        if self.locked {
            return Some(Rejection::ChatLocked);
        }

        let delay_ms = self.filter.thresholds(self.profile).flood_delay_ms;
        self.flood
            .check(sender, sent_at_ms, delay_ms)
            .map(|retry_after_ms| Rejection::Flood { retry_after_ms })
    }

    fn reject(&mut self, sender: &str, rejection: Rejection) {
        let cause = match rejection {
            Rejection::Banned => {
                self.metrics.record_rejected_banned();
                json!({ "cause": "banned" })
            }
            Rejection::ChatLocked => {
                self.metrics.record_rejected_locked();
                json!({ "cause": "locked" })
            }
            Rejection::Flood { retry_after_ms } => {
                self.metrics.record_rejected_flood();
                json!({ "cause": "flood", "retry_after_ms": retry_after_ms })
            }
        };
        debug!(sender, ?rejection, "message rejected");
        self.record_event(
            AuditEvent::new(AuditEventKind::MessageRejected)
                .with_subject(sender)
                .with_data(cause),
        );
    }

    /// Signals first, then the filter
    fn evaluate(&self, content: &str) -> Result<Option<Flag>> {
        for hook in &self.signals {
            let result = hook.classifier.classify(content)?;
            if result.exceeds_threshold(hook.threshold) {
                let name = hook.name();
                self.metrics.record_signal_flag(name);
                return Ok(Some(Flag::signal(
                    name,
                    format!(
                        "{}: {} ({:.2})",
                        name.to_uppercase(),
                        result.label,
                        result.score
                    ),
                )));
            }
        }

        let result = filter_verdict(&self.filter, &self.metrics, self.profile, content);
        if let Some(code) = result.reason_code() {
            self.metrics.record_blocked(code.as_str());
        }
        Ok(filter_flag(&result))
    }

    fn is_hidden(&self, message: &ChatMessage) -> bool {
        if self.muted.contains(&message.sender) {
            return true;
        }
        self.shadow_mute
            && matches!(
                message.flag.as_ref().map(|f| &f.origin),
                Some(FlagOrigin::Signal { .. })
            )
    }

    fn ensure_not_staff(&self, player: &str, action: &str) -> Result<()> {
        if self.is_staff(player) {
            return Err(Error::moderation(format!(
                "cannot {action} staff sender '{player}'"
            )));
        }
        Ok(())
    }

    fn record_event(&mut self, event: AuditEvent) {
        if let Some(audit) = self.audit.as_mut() {
            audit.add_event(event);
        }
    }
}

fn filter_verdict(
    filter: &SpamFilter,
    metrics: &MetricsCollector,
    profile: StrictnessProfile,
    content: &str,
) -> ClassificationResult {
    let start = Instant::now();
    let result = filter.classify(content, profile);
    metrics.record_classified(start.elapsed().as_micros() as u64);
    result
}

fn filter_flag(result: &ClassificationResult) -> Option<Flag> {
    result.reason().map(|reason| Flag::filter(format!("SPAM: {reason}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn room() -> ChatRoom {
        ChatRoom::new(SpamFilter::default())
            .with_staff(["Admin".to_string()])
            .with_audit()
    }

    fn accepted_flag(outcome: SubmitOutcome) -> Option<Flag> {
        match outcome {
            SubmitOutcome::Accepted { flag, .. } => flag,
            SubmitOutcome::Rejected(r) => panic!("unexpected rejection: {r:?}"),
        }
    }

    #[test]
    fn test_submit_clean_and_spam() {
        let mut room = room();

        let outcome = room.submit("Newbie123", "How do I claim land?", 0).unwrap();
        assert!(outcome.is_clear());

        let flag = accepted_flag(room.submit("Loud", "HELLO WORLD", 0).unwrap()).unwrap();
        assert_eq!(flag.origin, FlagOrigin::Filter);
        assert_eq!(flag.reason, "SPAM: CAPS (91%)");

        let flag = accepted_flag(room.submit("Echo", "heyyyy", 0).unwrap()).unwrap();
        assert_eq!(flag.reason, "SPAM: REPEATS");

        assert_eq!(room.history().len(), 3);
        assert_eq!(room.metrics().snapshot().blocked(), 2);
    }

    #[test]
    fn test_staff_bypass_filter() {
        let mut room = room();
        let outcome = room.submit("Admin", "SERVER RESTART IN 5 MINUTES!!!", 0).unwrap();
        assert!(outcome.is_clear());
    }

    #[test]
    fn test_set_profile_reevaluates_history() {
        let mut room = room();
        room.submit("A", "nooooo way", 0).unwrap();
        room.submit("B", "Hi All", 0).unwrap();

        // run of five 'o' exceeds STRICT's limit of 2
        assert!(room.history()[0].is_flagged());
        // 2 of 6 characters upper-case: 33% > 15%
        assert!(room.history()[1].is_flagged());

        let changed = room.set_profile(StrictnessProfile::Low);
        assert_eq!(changed, 2);
        assert!(room.history().iter().all(|m| !m.is_flagged()));

        let changed = room.set_profile(StrictnessProfile::Medium);
        assert_eq!(changed, 1);
        assert_eq!(
            room.history()[0].flag.as_ref().map(|f| f.reason.as_str()),
            Some("SPAM: REPEATS")
        );
        assert!(!room.history()[1].is_flagged());
    }

    #[test]
    fn test_same_profile_is_noop() {
        let mut room = room();
        room.submit("A", "heyyyy", 0).unwrap();
        let events = room.audit().unwrap().events().len();

        assert_eq!(room.set_profile(StrictnessProfile::Strict), 0);
        assert_eq!(room.audit().unwrap().events().len(), events);
    }

    #[test]
    fn test_manual_flag_survives_reevaluation() {
        let mut room = room();
        let outcome = room.submit("Scammer99", "free ranks, msg me", 0).unwrap();
        let SubmitOutcome::Accepted { id, flag: None } = outcome else {
            panic!("expected a clear message");
        };

        room.flag(&id, "Mod_Sarah", "scam").unwrap();
        room.set_profile(StrictnessProfile::Low);

        let flag = room.message(&id).unwrap().flag.clone().unwrap();
        assert_eq!(
            flag.origin,
            FlagOrigin::Manual {
                moderator: "Mod_Sarah".to_string()
            }
        );
        assert_eq!(flag.reason, "scam");
    }

    #[test]
    fn test_flag_unknown_message() {
        let mut room = room();
        let err = room.flag("missing", "Mod_Sarah", "scam").unwrap_err();
        assert!(matches!(err, Error::Moderation(_)));
    }

    #[test]
    fn test_toxicity_signal_takes_precedence() {
        let mut room = room().with_signal(Box::new(ToxicityClassifier::new().unwrap()), 0.5);

        let flag = accepted_flag(
            room.submit("ToxicGuy", "SHUT UP you stupid noob", 0).unwrap(),
        )
        .unwrap();
        assert_eq!(
            flag.origin,
            FlagOrigin::Signal {
                name: "toxicity".to_string()
            }
        );
        assert_eq!(flag.reason, "TOXICITY: toxic (0.70)");

        // the signal flag is not the filter's to lift
        room.set_profile(StrictnessProfile::Low);
        assert!(room.history()[0].is_flagged());
    }

    #[test]
    fn test_locked_chat_rejects_players() {
        let mut room = room();
        room.lock();
        assert!(room.is_locked());

        let outcome = room.submit("Steve", "hello?", 0).unwrap();
        assert_eq!(outcome, SubmitOutcome::Rejected(Rejection::ChatLocked));
        assert!(room.history().is_empty());

        assert!(room.submit("Admin", "Chat is locked.", 0).unwrap().is_clear());

        room.unlock();
        assert!(room.submit("Steve", "hello?", 0).unwrap().is_clear());
        assert_eq!(room.metrics().snapshot().rejected_locked, 1);
    }

    #[test]
    fn test_flood_delay_follows_profile() {
        let mut room = room();

        assert!(room.submit("Steve", "hi", 1_000).unwrap().is_clear());
        assert_eq!(
            room.submit("Steve", "hi again", 3_000).unwrap(),
            SubmitOutcome::Rejected(Rejection::Flood {
                retry_after_ms: 4_000
            })
        );

        room.set_profile(StrictnessProfile::Low);
        assert!(room.submit("Steve", "hi again", 3_000).unwrap().is_clear());
    }

    #[test]
    fn test_rejected_message_does_not_reset_flood_clock() {
        let mut room = room();
        room.submit("Steve", "one", 0).unwrap();
        room.submit("Steve", "two", 5_000).unwrap();

        assert!(room.submit("Steve", "three", 6_000).unwrap().is_clear());
    }

    #[test]
    fn test_preview_stores_nothing() {
        let room = room();
        let result = room.preview("HELLO WORLD");
        assert!(result.is_blocked());
        assert!(room.history().is_empty());
        assert_eq!(room.metrics().snapshot().messages_classified, 0);
    }

    #[test]
    fn test_clear_resets_history_and_flood() {
        let mut room = room();
        room.submit("Steve", "hi", 0).unwrap();
        room.clear();

        assert!(room.history().is_empty());
        assert!(room.submit("Steve", "hi", 1).unwrap().is_clear());
    }

    #[test]
    fn test_audit_trail_records_moderation() {
        let mut room = room();
        room.submit("Loud", "HELLO WORLD", 0).unwrap();
        room.set_profile(StrictnessProfile::Low);
        room.lock();

        let audit = room.audit().unwrap();
        assert!(audit.verify());
        let kinds: Vec<_> = audit.events().iter().map(|e| e.kind).collect();
        assert_eq!(
            kinds,
            vec![
                AuditEventKind::MessageFlagged,
                AuditEventKind::ProfileChanged,
                AuditEventKind::ChatLocked,
            ]
        );
    }

    #[test]
    fn test_wildcard_blacklist_entry_flags_message() {
        let config = GuardConfig::from_yaml(
            r#"
toxicity: { enabled: false }
blocked_phrases:
  - { label: cheating, pattern: "cheat*" }
"#,
        )
        .unwrap();
        let mut room = ChatRoom::from_config(&config).unwrap();

        let flag = accepted_flag(room.submit("Steve", "selling cheats here", 0).unwrap()).unwrap();
        assert_eq!(flag.reason, "BLOCKED_PHRASES: cheating (1.00)");
        assert!(room.submit("Alex", "anticheat is on", 0).unwrap().is_clear());
    }

    #[test]
    fn test_shadow_mute_hides_signal_flags_from_others() {
        let mut room = room()
            .with_signal(Box::new(ToxicityClassifier::new().unwrap()), 0.5)
            .with_shadow_mute(true);
        room.submit("ToxicGuy", "shut up you stupid noob", 0).unwrap();
        room.submit("Loud", "HELLO WORLD", 0).unwrap();
        room.submit("Steve", "hi", 0).unwrap();

        let senders = |viewer: &str| -> Vec<String> {
            room.visible_to(viewer).map(|m| m.sender.clone()).collect()
        };
        assert_eq!(senders("Steve"), vec!["Loud", "Steve"]);
        assert_eq!(senders("ToxicGuy"), vec!["ToxicGuy", "Loud", "Steve"]);
        assert_eq!(senders("Admin"), vec!["ToxicGuy", "Loud", "Steve"]);
    }

    #[test]
    fn test_shadow_mute_off_shows_everything() {
        let mut room = room().with_signal(Box::new(ToxicityClassifier::new().unwrap()), 0.5);
        assert!(!room.shadow_mute());
        room.submit("ToxicGuy", "shut up you stupid noob", 0).unwrap();
        assert_eq!(room.visible_to("Steve").count(), 1);
    }

    #[test]
    fn test_muted_player_only_sees_themselves() {
        let mut room = room();
        room.submit("Spammer", "buy now", 0).unwrap();
        room.mute("Spammer", "Mod_Sarah").unwrap();
        assert!(room.is_muted("Spammer"));

        // muted players can still post
        assert!(room.submit("Spammer", "anyone?", 10_000).unwrap().is_clear());
        assert_eq!(room.visible_to("Spammer").count(), 2);
        assert_eq!(room.visible_to("Steve").count(), 0);
        assert_eq!(room.visible_to("Admin").count(), 2);

        room.unmute("Spammer");
        assert_eq!(room.visible_to("Steve").count(), 2);
    }

    #[test]
    fn test_banned_player_is_rejected() {
        let mut room = room();
        room.ban("Griefer", "Mod_Sarah").unwrap();
        assert!(room.is_banned("Griefer"));

        let outcome = room.submit("Griefer", "let me back in", 0).unwrap();
        assert_eq!(outcome, SubmitOutcome::Rejected(Rejection::Banned));
        assert!(room.history().is_empty());
        assert_eq!(room.metrics().snapshot().rejected_banned, 1);

        room.clear();
        assert!(room.is_banned("Griefer"));

        room.unban("Griefer");
        assert!(room.submit("Griefer", "sorry", 0).unwrap().is_clear());

        let kinds: Vec<_> = room.audit().unwrap().events().iter().map(|e| e.kind).collect();
        assert!(kinds.contains(&AuditEventKind::PlayerBanned));
        assert!(kinds.contains(&AuditEventKind::PlayerUnbanned));
    }

    #[test]
    fn test_staff_cannot_be_banned_or_muted() {
        let mut room = room();
        assert!(matches!(room.ban("Admin", "Mod_Sarah"), Err(Error::Moderation(_))));
        assert!(matches!(room.mute("Admin", "Mod_Sarah"), Err(Error::Moderation(_))));
        assert!(!room.is_banned("Admin"));
    }

    #[test]
    fn test_still_blocked_message_is_counted_once() {
        let mut room = room();
        room.submit("Loud", "HELLO WORLD", 0).unwrap();
        assert_eq!(room.metrics().snapshot().blocked_caps, 1);

        // 91% caps stays blocked under every profile
        room.set_profile(StrictnessProfile::Low);
        room.set_profile(StrictnessProfile::Medium);
        room.set_profile(StrictnessProfile::Strict);
        assert_eq!(room.metrics().snapshot().blocked_caps, 1);

        // a verdict that flips back to blocked counts again
        room.submit("Echo", "nooooo way", 0).unwrap();
        room.set_profile(StrictnessProfile::Low);
        room.set_profile(StrictnessProfile::Strict);
        let snapshot = room.metrics().snapshot();
        assert_eq!(snapshot.blocked_repeats, 2);
        assert_eq!(snapshot.blocked_caps, 1);
    }

    #[test]
    fn test_from_config() {
        let config = GuardConfig::from_yaml(
            r#"
profile: medium
staff: [Owner_Dave]
blocked_phrases:
  - label: advertising
    pattern: g0ld.com
"#,
        )
        .unwrap();

        let mut room = ChatRoom::from_config(&config).unwrap();
        assert_eq!(room.profile(), StrictnessProfile::Medium);
        assert!(room.is_staff("Owner_Dave"));
        assert!(!room.is_staff("Admin"));
        assert_eq!(room.signals().len(), 2);
        assert!(room.audit().is_some());

        let flag = accepted_flag(room.submit("Bot_User_99", "cheap gold at g0ld.com", 0).unwrap())
            .unwrap();
        assert_eq!(flag.reason, "BLOCKED_PHRASES: advertising (1.00)");
    }
}
