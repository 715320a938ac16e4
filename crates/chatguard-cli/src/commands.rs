//! Command implementations

use anyhow::Context;
use chatguard_classifiers::{ClassificationResult, SpamFilter, StrictnessProfile};
use chatguard_core::ChatMessage;
use chatguard_moderation::{ChatRoom, GuardConfig, Rejection, SubmitOutcome};
use serde::Serialize;
use std::io::Write;
use std::path::Path;
use tracing::{info, warn};

/// Totals printed at the end of `scan` and `replay`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RunSummary {
    pub messages: usize,
    pub flagged: usize,
    pub rejected: usize,
    pub reclassified: usize,
}

#[derive(Serialize)]
struct CheckRecord<'a> {
    message: &'a str,
    profile: StrictnessProfile,
    #[serde(flatten)]
    result: &'a ClassificationResult,
}

#[derive(Serialize)]
#[serde(tag = "outcome", rename_all = "lowercase")]
enum ReplayRecord<'a> {
    Accepted {
        sender: &'a str,
        content: &'a str,
        id: &'a str,
        #[serde(skip_serializing_if = "Option::is_none")]
        reason: Option<&'a str>,
    },
    Rejected {
        sender: &'a str,
        content: &'a str,
        cause: &'static str,
        #[serde(skip_serializing_if = "Option::is_none")]
        retry_after_ms: Option<u64>,
    },
}

/// Read a YAML list of chat messages
pub fn load_history(path: &Path) -> anyhow::Result<Vec<ChatMessage>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read history {}", path.display()))?;
    let messages: Vec<ChatMessage> = serde_yaml::from_str(&content)
        .with_context(|| format!("failed to parse history {}", path.display()))?;
    info!(count = messages.len(), path = %path.display(), "history loaded");
    Ok(messages)
}

/// Classify each message under the configured profile.
///
/// Returns whether any message was blocked.
pub fn check(
    config: &GuardConfig,
    messages: &[String],
    json: bool,
    out: &mut impl Write,
) -> anyhow::Result<bool> {
    let filter = SpamFilter::new(config.thresholds)?;
    let mut any_blocked = false;

    for message in messages {
        let result = filter.classify(message, config.profile);
        any_blocked |= result.is_blocked();

        if json {
            let record = CheckRecord {
                message,
                profile: config.profile,
                result: &result,
            };
            writeln!(out, "{}", serde_json::to_string(&record)?)?;
        } else {
            let status = if result.is_blocked() { "BLOCKED" } else { "ALLOWED" };
            writeln!(
                out,
                "{status:<8} {:<14} {message}",
                result.reason().unwrap_or_default()
            )?;
        }
    }

    Ok(any_blocked)
}

/// Import history and re-evaluate it under the configured profile
pub fn scan(
    config: &GuardConfig,
    history: Vec<ChatMessage>,
    json: bool,
    out: &mut impl Write,
) -> anyhow::Result<RunSummary> {
    let mut room = ChatRoom::from_config(config)?;
    room.import(history);
    let reclassified = room.reevaluate();

    if json {
        serde_json::to_writer_pretty(&mut *out, room.history())?;
        writeln!(out)?;
    } else {
        for message in room.history() {
            write_message(out, message)?;
        }
    }

    let summary = RunSummary {
        messages: room.history().len(),
        flagged: room.history().iter().filter(|m| m.is_flagged()).count(),
        rejected: 0,
        reclassified,
    };
    finish(&room, &summary);
    if !json {
        write_summary(out, room.profile(), &summary)?;
    }
    Ok(summary)
}

/// Submit each message through a fresh room, in file order
pub fn replay(
    config: &GuardConfig,
    history: Vec<ChatMessage>,
    json: bool,
    out: &mut impl Write,
) -> anyhow::Result<RunSummary> {
    let mut room = ChatRoom::from_config(config)?;
    let mut summary = RunSummary::default();

    for message in &history {
        let outcome = room.submit(&message.sender, &message.content, message.sent_at_ms)?;
        summary.messages += 1;

        let record = match &outcome {
            SubmitOutcome::Accepted { id, flag } => {
                if flag.is_some() {
                    summary.flagged += 1;
                }
                ReplayRecord::Accepted {
                    sender: &message.sender,
                    content: &message.content,
                    id,
                    reason: flag.as_ref().map(|f| f.reason.as_str()),
                }
            }
            SubmitOutcome::Rejected(rejection) => {
                summary.rejected += 1;
                let (cause, retry_after_ms) = match rejection {
                    Rejection::Banned => ("banned", None),
                    Rejection::ChatLocked => ("locked", None),
                    Rejection::Flood { retry_after_ms } => ("flood", Some(*retry_after_ms)),
                };
                ReplayRecord::Rejected {
                    sender: &message.sender,
                    content: &message.content,
                    cause,
                    retry_after_ms,
                }
            }
        };

        if json {
            writeln!(out, "{}", serde_json::to_string(&record)?)?;
        } else {
            write_replay_record(out, &record)?;
        }
    }

    finish(&room, &summary);
    if !json {
        write_summary(out, room.profile(), &summary)?;
    }
    Ok(summary)
}

/// Print the threshold table, marking the active profile
pub fn profiles(config: &GuardConfig, out: &mut impl Write) -> anyhow::Result<()> {
    writeln!(out, "  {:<8} {:>8} {:>12} {:>10}", "PROFILE", "CAPS MAX", "REPEAT MAX", "FLOOD")?;
    for profile in StrictnessProfile::ALL {
        let t = config.thresholds.get(profile);
        let marker = if profile == config.profile { '*' } else { ' ' };
        writeln!(
            out,
            "{marker} {:<8} {:>7.0}% {:>6} chars {:>9.1}s",
            profile.as_str(),
            t.caps_ratio_limit * 100.0,
            t.repeat_run_limit,
            t.flood_delay().as_secs_f64()
        )?;
    }
    Ok(())
}

fn write_message(out: &mut impl Write, message: &ChatMessage) -> std::io::Result<()> {
    match &message.flag {
        Some(flag) => writeln!(
            out,
            "[{}] {}: {}  -> BLOCKED: {}",
            message.id, message.sender, message.content, flag.reason
        ),
        None => writeln!(out, "[{}] {}: {}", message.id, message.sender, message.content),
    }
}

fn write_replay_record(out: &mut impl Write, record: &ReplayRecord<'_>) -> std::io::Result<()> {
    match record {
        ReplayRecord::Accepted {
            sender,
            content,
            reason: Some(reason),
            ..
        } => writeln!(out, "{sender}: {content}  -> BLOCKED: {reason}"),
        ReplayRecord::Accepted {
            sender, content, ..
        } => writeln!(out, "{sender}: {content}"),
        ReplayRecord::Rejected {
            sender,
            content,
            cause,
            retry_after_ms,
        } => match retry_after_ms {
            Some(ms) => writeln!(out, "{sender}: {content}  -> REJECTED: {cause} (retry in {ms}ms)"),
            None => writeln!(out, "{sender}: {content}  -> REJECTED: {cause}"),
        },
    }
}

fn write_summary(
    out: &mut impl Write,
    profile: StrictnessProfile,
    summary: &RunSummary,
) -> std::io::Result<()> {
    writeln!(
        out,
        "{} messages, {} blocked, {} rejected, {} re-evaluated (profile {profile})",
        summary.messages, summary.flagged, summary.rejected, summary.reclassified
    )
}

fn finish(room: &ChatRoom, summary: &RunSummary) {
    if let Some(audit) = room.audit() {
        if audit.verify() {
            info!(events = audit.events().len(), head = ?audit.head(), "audit chain verified");
        } else {
            warn!("audit chain failed verification");
        }
    }
    let snapshot = room.metrics().snapshot();
    info!(
        messages = summary.messages,
        flagged = summary.flagged,
        rejected = summary.rejected,
        avg_classifier_latency_us = snapshot.avg_classifier_latency_us(),
        "run complete"
    );
}
