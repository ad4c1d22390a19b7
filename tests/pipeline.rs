//! End-to-end pipeline tests over scratch archives.
//!
//! These build a small extracted-archive layout in a temp directory and
//! drive the whole import → link → render → write pipeline through
//! `run_export`. The fixtures reference no remote assets, so no network
//! traffic happens.

use std::fs;
use std::path::Path;

use slackview::config::{ExportConfig, Zone};
use slackview::export::run_export;

fn write_archive(dir: &Path, channel: &str, logs: &[(&str, &str)]) {
    let users = r#"[
      {"id": "U1", "profile": {"display_name": "alice", "real_name": "Alice A."}},
      {"id": "U2", "profile": {"display_name": "", "real_name": "Bob B."}}
    ]"#;
    fs::write(dir.join("users.json"), users).unwrap();

    let channels = format!(
        r#"[{{"id": "C1", "name": "{channel}", "purpose": {{"value": "testing ground"}}}}]"#
    );
    fs::write(dir.join("channels.json"), channels).unwrap();

    let channel_dir = dir.join(channel);
    fs::create_dir_all(&channel_dir).unwrap();
    for (name, content) in logs {
        fs::write(channel_dir.join(name), content).unwrap();
    }
}

fn config_for(dir: &Path) -> ExportConfig {
    ExportConfig::new()
        .with_work_dir(dir)
        .with_zone(Zone::parse("UTC").unwrap())
}

#[test]
fn test_full_export_of_one_channel() {
    let dir = tempfile::tempdir().unwrap();

    // Two log files; merged and ordered by key regardless of file split.
    let day1 = r#"[
      {"user": "U1", "text": "first", "ts": "1000.000000"},
      {"user": "U1", "text": "second", "ts": "1060.000000"},
      {"user": "U2", "subtype": "channel_join", "text": "", "ts": "1100.000000"}
    ]"#;
    let day2 = r#"[
      {"user": "U2", "text": "hello from bob", "ts": "2000.000000"},
      {"user": "U1", "text": "root of thread", "ts": "2100.000000",
       "replies": [{"user": "U2", "ts": "2200.000000"}]},
      {"user": "U2", "text": "threaded reply", "ts": "2200.000000", "thread_ts": "2100.000000"}
    ]"#;

    write_archive(dir.path(), "general", &[("day1.json", day1), ("day2.json", day2)]);

    let stats = run_export(&config_for(dir.path())).unwrap();
    assert_eq!(stats.channels, 1);
    assert_eq!(stats.messages, 6);
    assert_eq!(stats.cached_assets, 0);

    let html = fs::read_to_string(dir.path().join("general.html")).unwrap();

    // Root messages appear in ascending key order.
    let first = html.find("first").unwrap();
    let join = html.find("joined the channel").unwrap();
    let bob = html.find("hello from bob").unwrap();
    let root = html.find("root of thread").unwrap();
    assert!(first < join && join < bob && bob < root);

    // The thread reply is nested inside its root's container.
    let thread_open = html.find("<div class=\"threadcontainer\">").unwrap();
    let reply = html.find("threaded reply").unwrap();
    assert!(root < thread_open && thread_open < reply);

    // Grouping: "second" follows "first" by 60s, same author → compact.
    let second_line = html
        .lines()
        .find(|line| line.contains("second"))
        .unwrap();
    assert!(second_line.contains("imgplaceholder"));

    // Page shell is present, and the stylesheet was copied.
    assert!(html.starts_with("<!DOCTYPE html>"));
    assert!(dir.path().join("slackview.css").exists());
}

#[test]
fn test_each_channel_gets_its_own_page() {
    let dir = tempfile::tempdir().unwrap();
    let users = r#"[{"id": "U1", "profile": {"display_name": "alice"}}]"#;
    fs::write(dir.path().join("users.json"), users).unwrap();
    let channels = r#"[
      {"id": "C1", "name": "general", "purpose": {"value": ""}},
      {"id": "C2", "name": "random", "purpose": {"value": ""}}
    ]"#;
    fs::write(dir.path().join("channels.json"), channels).unwrap();

    for (channel, text) in [("general", "in general"), ("random", "in random")] {
        let channel_dir = dir.path().join(channel);
        fs::create_dir_all(&channel_dir).unwrap();
        fs::write(
            channel_dir.join("log.json"),
            format!(r#"[{{"user": "U1", "text": "{text}", "ts": "1.000000"}}]"#),
        )
        .unwrap();
    }

    let stats = run_export(&config_for(dir.path())).unwrap();
    assert_eq!(stats.channels, 2);

    assert!(fs::read_to_string(dir.path().join("general.html"))
        .unwrap()
        .contains("in general"));
    assert!(fs::read_to_string(dir.path().join("random.html"))
        .unwrap()
        .contains("in random"));
}

#[test]
fn test_markup_flows_into_the_page() {
    let dir = tempfile::tempdir().unwrap();
    let log = r#"[
      {"user": "U1", "text": "see <https://example.com|the docs> and :smile:", "ts": "1.000000"},
      {"user": "U2", "text": ":tada:", "ts": "400.000000"}
    ]"#;
    write_archive(dir.path(), "general", &[("log.json", log)]);

    run_export(&config_for(dir.path())).unwrap();
    let html = fs::read_to_string(dir.path().join("general.html")).unwrap();

    assert!(html.contains("<a href=\"https://example.com\">the docs</a>"));
    assert!(html.contains("😄"));
    // A message that is nothing but a shortcode renders big.
    assert!(html.contains("<span class=\"bigemoji\">🎉</span>"));
}

#[test]
fn test_inline_snippet_renders_preformatted() {
    let dir = tempfile::tempdir().unwrap();
    let log = r#"[
      {"user": "U1", "subtype": "file_share", "text": "", "ts": "1.000000",
       "file": {"mode": "snippet", "name": "hello.rs",
                "preview": "fn main() { println!(\"<hi>\"); }", "lines_more": 0}}
    ]"#;
    write_archive(dir.path(), "general", &[("log.json", log)]);

    run_export(&config_for(dir.path())).unwrap();
    let html = fs::read_to_string(dir.path().join("general.html")).unwrap();
    assert!(html.contains("<pre class=\"prettyprint linenums\">"));
    // Snippet bodies are escaped.
    assert!(html.contains("println!(&quot;&lt;hi&gt;&quot;)"));
}

#[test]
fn test_unresolved_reply_fails_the_run() {
    let dir = tempfile::tempdir().unwrap();
    let log = r#"[
      {"user": "U1", "text": "root", "ts": "100.000000",
       "replies": [{"user": "U2", "ts": "666.000000"}, {"user": "U2", "ts": "777.000000"}]}
    ]"#;
    write_archive(dir.path(), "general", &[("log.json", log)]);

    let err = run_export(&config_for(dir.path())).unwrap_err();
    assert!(err.is_graph());
    // The error names the missing key.
    assert!(err.to_string().contains("666.000000"));
    assert!(!dir.path().join("general.html").exists());
}

#[test]
fn test_unknown_subtype_fails_the_run() {
    let dir = tempfile::tempdir().unwrap();
    let log = r#"[{"user": "U1", "subtype": "pinned_item", "text": "", "ts": "1.000000"}]"#;
    write_archive(dir.path(), "general", &[("log.json", log)]);

    let err = run_export(&config_for(dir.path())).unwrap_err();
    assert!(err.is_schema());
    assert!(err.to_string().contains("pinned_item"));
}

#[test]
fn test_file_comment_entries_vanish_without_error() {
    let dir = tempfile::tempdir().unwrap();
    let log = r#"[
      {"user": "U1", "text": "kept", "ts": "1.000000"},
      {"user": "U1", "subtype": "file_comment", "text": "dropped", "ts": "2.000000"}
    ]"#;
    write_archive(dir.path(), "general", &[("log.json", log)]);

    let stats = run_export(&config_for(dir.path())).unwrap();
    assert_eq!(stats.messages, 1);
    let html = fs::read_to_string(dir.path().join("general.html")).unwrap();
    assert!(html.contains("kept"));
    assert!(!html.contains("dropped"));
}

#[test]
fn test_missing_archive_is_an_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let config = config_for(&dir.path().join("nonexistent"));
    let err = run_export(&config).unwrap_err();
    assert!(matches!(err, slackview::SlackviewError::Io(_)));
}
