//! Integration tests for the chatguard commands

use chatguard_classifiers::StrictnessProfile;
use chatguard_cli::commands::{self, RunSummary};
use chatguard_core::{ChatMessage, Flag};
use chatguard_moderation::GuardConfig;

fn config(profile: StrictnessProfile) -> GuardConfig {
    GuardConfig {
        profile,
        ..GuardConfig::default()
    }
}

fn output(buf: Vec<u8>) -> String {
    String::from_utf8(buf).unwrap()
}

#[test]
fn check_reports_verdicts() {
    let mut buf = Vec::new();
    let messages = vec![
        "HELLO WORLD".to_string(),
        "heyyyy".to_string(),
        "gg".to_string(),
    ];

    let any_blocked = commands::check(&config(StrictnessProfile::Strict), &messages, false, &mut buf)
        .unwrap();
    assert!(any_blocked);

    let text = output(buf);
    let lines: Vec<_> = text.lines().collect();
    assert_eq!(lines.len(), 3);
    assert!(lines[0].starts_with("BLOCKED") && lines[0].contains("CAPS (91%)"));
    assert!(lines[1].starts_with("BLOCKED") && lines[1].contains("REPEATS"));
    assert!(lines[2].starts_with("ALLOWED") && lines[2].ends_with("gg"));
}

#[test]
fn check_json_lines() {
    let mut buf = Vec::new();
    let messages = vec!["HELLO WORLD".to_string(), "gg".to_string()];

    commands::check(&config(StrictnessProfile::Strict), &messages, true, &mut buf).unwrap();

    let records: Vec<serde_json::Value> = output(buf)
        .lines()
        .map(|l| serde_json::from_str(l).unwrap())
        .collect();
    assert_eq!(
        records[0],
        serde_json::json!({
            "message": "HELLO WORLD",
            "profile": "STRICT",
            "blocked": true,
            "reason_code": "CAPS",
            "detail": "91%",
        })
    );
    assert_eq!(records[1]["blocked"], false);
}

#[test]
fn check_clean_messages_report_no_block() {
    let mut buf = Vec::new();
    let messages = vec!["How do I claim land?".to_string()];
    let any_blocked =
        commands::check(&config(StrictnessProfile::Low), &messages, false, &mut buf).unwrap();
    assert!(!any_blocked);
}

#[test]
fn scan_reevaluates_history_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("history.yaml");
    std::fs::write(
        &path,
        r#"
- id: "1"
  sender: Newbie123
  content: How do I claim land?
- id: "2"
  sender: ToxicGuy
  content: This server is tR@sh!!!
  flag:
    origin: { type: signal, name: toxicity }
    reason: "TOXICITY (SENTIMENT: -0.8)"
- id: "3"
  sender: Spammer
  content: lolololol!!!!
- id: "4"
  sender: Admin
  content: PLEASE RESPECT THE RULES.
"#,
    )
    .unwrap();

    let history = commands::load_history(&path).unwrap();
    let mut buf = Vec::new();
    let summary = commands::scan(&config(StrictnessProfile::Strict), history, false, &mut buf)
        .unwrap();

    assert_eq!(
        summary,
        RunSummary {
            messages: 4,
            flagged: 2,
            rejected: 0,
            reclassified: 1,
        }
    );
    let text = output(buf);
    assert!(text.contains("[3] Spammer: lolololol!!!!  -> BLOCKED: SPAM: REPEATS"));
    assert!(text.contains("[4] Admin: PLEASE RESPECT THE RULES.\n"));
    assert!(text.contains("(profile STRICT)"));
}

#[test]
fn scan_json_round_trips_history() {
    let history = vec![
        ChatMessage::new("1", "Steve", "woooow", 0),
        ChatMessage::new("2", "Alex", "nice", 0).with_flag(Flag::manual("Mod_Sarah", "alt account")),
    ];

    let mut buf = Vec::new();
    commands::scan(&config(StrictnessProfile::Strict), history, true, &mut buf).unwrap();

    let parsed: Vec<ChatMessage> = serde_json::from_slice(&buf).unwrap();
    assert_eq!(parsed[0].flag, Some(Flag::filter("SPAM: REPEATS")));
    assert_eq!(parsed[1].flag, Some(Flag::manual("Mod_Sarah", "alt account")));
}

#[test]
fn replay_applies_flood_delay_and_signals() {
    let history = vec![
        ChatMessage::new("a", "Steve", "hi all", 0),
        ChatMessage::new("b", "Steve", "anyone?", 1_000),
        ChatMessage::new("c", "ToxicGuy", "shut up you stupid noob", 2_000),
        ChatMessage::new("d", "Steve", "ok bye", 7_000),
    ];

    let mut buf = Vec::new();
    let summary = commands::replay(&config(StrictnessProfile::Strict), history, false, &mut buf)
        .unwrap();

    assert_eq!(summary.messages, 4);
    assert_eq!(summary.rejected, 1);
    assert_eq!(summary.flagged, 1);

    let text = output(buf);
    assert!(text.contains("Steve: anyone?  -> REJECTED: flood (retry in 5000ms)"));
    assert!(text.contains("ToxicGuy: shut up you stupid noob  -> BLOCKED: TOXICITY: toxic (0.70)"));
    assert!(text.contains("Steve: ok bye\n"));
}

#[test]
fn profiles_table_marks_active_profile() {
    let mut buf = Vec::new();
    commands::profiles(&config(StrictnessProfile::Medium), &mut buf).unwrap();

    let text = output(buf);
    let medium = text.lines().find(|l| l.contains("MEDIUM")).unwrap();
    assert!(medium.starts_with('*'));
    assert!(medium.contains("40%"));
    let strict = text.lines().find(|l| l.contains("STRICT")).unwrap();
    assert!(strict.starts_with(' '));
    assert!(strict.contains("15%"));
    assert!(strict.contains("6.0s"));
}

#[test]
fn demo_files_scan_under_each_profile() {
    let demos = std::path::Path::new(env!("CARGO_MANIFEST_DIR")).join("../../demos");
    let history = commands::load_history(&demos.join("chat_history.yaml")).unwrap();

    let mut config =
        chatguard_cli::load_config(&demos.join("chatguard.yaml"), Some(StrictnessProfile::Low))
            .unwrap();
    assert_eq!(config.staff, vec!["Admin", "Owner_Dave"]);

    let mut buf = Vec::new();
    let low = commands::scan(&config, history.clone(), false, &mut buf).unwrap();
    assert_eq!(low.flagged, 3);
    assert!(output(buf).contains("WHO WANTS TO DUEL  -> BLOCKED: SPAM: CAPS (82%)"));

    config.profile = StrictnessProfile::Strict;
    let mut buf = Vec::new();
    let strict = commands::scan(&config, history, false, &mut buf).unwrap();
    assert_eq!(strict.flagged, 5);
    assert_eq!(strict.reclassified, 3);
}
