#[path = "common/mod.rs"]
mod common;

use common::*;
use postfilter::{FileOutcome, FilterOptions, PostFilter, RecordSource, RecordStream};
use serde_json::json;
use std::fs;
use std::io::Read;
use std::path::Path;

fn filter_for(input: &Path, out: &Path) -> PostFilter {
    PostFilter::new().input(input).output(out).progress(false)
}

/// The three-record scenario from a single monthly archive:
/// - a1 in window, title "Houston flood update", by bob → kept
/// - a2 out of window → rejected before term matching
/// - a1 again with a different selftext → duplicate, dropped
#[test]
fn single_file_end_to_end() {
    let base = temp_base();
    let input = base.join("submissions").join("RS_2025-07.zst");
    let out = base.join("filtered_posts.json");
    write_zst_lines(&input, &[
        submission("a1", IN_WINDOW, "Houston flood update", "", "bob"),
        submission("a2", WINDOW_START - 86_400, "Houston flood", "", "alice"),
        submission("a1", IN_WINDOW + 60, "Houston flood update", "edited body", "bob"),
    ]);

    let summary = filter_for(&input, &out).run().unwrap();
    assert_eq!(summary.files_seen, 1);
    assert_eq!(summary.records_scanned, 3);
    assert_eq!(summary.matched, 1);

    let posts = read_output(&out);
    assert_eq!(posts.len(), 1);
    assert_eq!(posts[0]["id"], json!("a1"));
    assert_eq!(posts[0]["matched_term"], json!("houston flood"));
    assert_eq!(posts[0]["author"], json!("bob"));
    assert_eq!(posts[0]["selftext"], json!(""));
    assert_eq!(posts[0]["created_utc"], json!(IN_WINDOW));
    assert_eq!(posts[0]["subreddit"], json!("texas"));
}

/// Records without `created_utc` or without an id are dropped silently;
/// an empty author falls back to "[deleted]".
#[test]
fn missing_fields_are_silently_excluded() {
    let base = temp_base();
    let input = base.join("RS_2025-07.jsonl");
    let out = base.join("out.json");
    write_plain_lines(&input, &[
        json!({"id": "n1", "title": "texas flood"}).to_string(),
        json!({"id": "n2", "created_utc": null, "title": "texas flood"}).to_string(),
        json!({"created_utc": IN_WINDOW, "title": "texas flood"}).to_string(),
        json!({"id": "", "created_utc": IN_WINDOW, "title": "texas flood"}).to_string(),
        json!({"id": "n5", "created_utc": IN_WINDOW, "title": "flash flood", "author": null}).to_string(),
        String::new(),
    ]);

    let summary = filter_for(&input, &out).run().unwrap();
    assert_eq!(summary.records_scanned, 5);
    let posts = read_output(&out);
    assert_eq!(posts.len(), 1);
    assert_eq!(posts[0]["id"], json!("n5"));
    assert_eq!(posts[0]["author"], json!("[deleted]"));
    assert_eq!(posts[0]["url"], json!(null));
}

/// Duplicates across files collapse to the first occurrence in traversal order.
#[test]
fn dedup_spans_files() {
    let base = temp_base();
    let dir = base.join("dumps");
    let out = base.join("out.json");
    write_zst_lines(&dir.join("RS_2025-07.zst"), &[
        submission("d1", IN_WINDOW, "Flash flood in Kerr County", "", "u1"),
        submission("d2", IN_WINDOW, "rain damage claims", "", "u2"),
    ]);
    write_zst_lines(&dir.join("RS_2025-08.zst"), &[
        submission("d1", IN_WINDOW, "flash flood (repost)", "", "u9"),
        submission("d3", WINDOW_END, "TX flood relief", "", "u3"),
    ]);

    let mut pf = filter_for(&dir, &out).sorted_traversal(true);
    let summary = pf.run().unwrap();
    assert_eq!(summary.files_seen, 2);
    assert_eq!(summary.matched, 3);
    assert_eq!(pf.seen().len(), 3);

    assert_eq!(output_ids(&out), vec!["d1", "d2", "d3"]);
    let posts = read_output(&out);
    assert_eq!(posts[0]["author"], json!("u1"));
    assert_eq!(posts[2]["matched_term"], json!("tx flood"));
}

/// A directory with one archive and one unsupported file: the run completes,
/// the unsupported file is skipped and does not affect the output.
/// Non-recursive runs also hand subdirectories to per-file processing, where they are skipped.
#[test]
fn unrecognized_files_are_skipped() {
    let base = temp_base();
    let dir = base.join("dumps");
    let out = base.join("out.json");
    write_zst_lines(&dir.join("RS_2025-07.zst"), &[
        submission("v1", IN_WINDOW, "houston flood", "", "bob"),
    ]);
    fs::write(dir.join("README.txt"), "texas flood notes, not a dump").unwrap();
    write_zst_lines(&dir.join("nested").join("RS_2025-06.zst"), &[
        submission("v2", IN_WINDOW, "texas flood", "", "amy"),
    ]);

    let summary = filter_for(&dir, &out).run().unwrap();
    assert_eq!(summary.files_seen, 3);
    assert_eq!(summary.files_skipped, 2);
    assert_eq!(output_ids(&out), vec!["v1"]);
}

/// Recursive traversal descends into subdirectories and yields only files.
#[test]
fn recursive_walk_reaches_nested_archives() {
    let base = temp_base();
    let dir = base.join("reddit");
    let out = base.join("out.json");
    write_zst_lines(&dir.join("submissions").join("RS_2025-07.zst"), &[
        submission("r1", IN_WINDOW, "flash flood", "", "a"),
    ]);
    write_zst_lines(&dir.join("submissions").join("older").join("RS_2025-06.zst"), &[
        submission("r2", IN_WINDOW, "rain damage", "", "b"),
    ]);
    fs::write(dir.join("checksums.md5"), "deadbeef").unwrap();

    let summary = filter_for(&dir, &out).recursive(true).sorted_traversal(true).run().unwrap();
    assert_eq!(summary.files_seen, 3);
    assert_eq!(summary.files_skipped, 1);

    let mut ids = output_ids(&out);
    ids.sort();
    assert_eq!(ids, vec!["r1", "r2"]);
}

/// A corrupt record aborts the run; the document from the last completed file survives.
#[test]
fn malformed_record_halts_and_keeps_last_snapshot() {
    let base = temp_base();
    let dir = base.join("dumps");
    let out = base.join("out.json");
    write_plain_lines(&dir.join("a.jsonl"), &[
        submission("ok1", IN_WINDOW, "texas flood", "", "a"),
    ]);
    write_plain_lines(&dir.join("b.jsonl"), &[
        submission("ok2", IN_WINDOW, "texas flood", "", "b"),
        "{\"id\": \"broken\", \"title\": ".to_string(),
    ]);

    let err = filter_for(&dir, &out).sorted_traversal(true).run().unwrap_err();
    assert!(format!("{err:#}").contains("b.jsonl"), "unexpected error: {err:#}");
    assert_eq!(output_ids(&out), vec!["ok1"]);
}

/// A non-numeric `created_utc` is a hard failure, not a silent skip.
#[test]
fn non_numeric_timestamp_is_an_error() {
    let base = temp_base();
    let input = base.join("RS_bad.ndjson");
    let out = base.join("out.json");
    write_plain_lines(&input, &[
        json!({"id": "t1", "created_utc": "last tuesday", "title": "texas flood"}).to_string(),
    ]);
    assert!(filter_for(&input, &out).run().is_err());
    assert!(!out.exists());
}

/// Running twice over the same input replaces the prior document instead of merging.
#[test]
fn rerun_overwrites_previous_output() {
    let base = temp_base();
    let input = base.join("RS_2025-07.zst");
    let out = base.join("filtered_posts.json");
    fs::write(&out, "[{\"id\": \"from_an_old_run\"}]").unwrap();
    write_zst_lines(&input, &[submission("w1", IN_WINDOW, "flash flood", "", "x")]);

    filter_for(&input, &out).run().unwrap();
    filter_for(&input, &out).run().unwrap();
    assert_eq!(output_ids(&out), vec!["w1"]);
}

/// Custom window and terms via `FilterOptions`; term order decides `matched_term`.
#[test]
fn custom_options_drive_the_run() {
    let base = temp_base();
    let input = base.join("RC_2006-01.jsonl");
    let out = base.join("custom.json");
    write_plain_lines(&input, &[
        json!({"id": "c1", "created_utc": 1_136_074_600, "title": "Rust and Go", "selftext": "go rust"}).to_string(),
        json!({"id": "c2", "created_utc": 1_136_074_601, "title": "nothing here"}).to_string(),
    ]);

    let opts = FilterOptions::default()
        .with_window(postfilter::TimeWindow::from_epochs(1_136_073_600, 1_136_159_999).unwrap())
        .with_terms(["GO", "rust"])
        .with_input(&input)
        .with_output(&out)
        .with_progress(false);
    let summary = PostFilter::with_options(opts).run().unwrap();
    assert_eq!(summary.matched, 1);

    let posts = read_output(&out);
    assert_eq!(posts[0]["matched_term"], json!("go"));
}

/// Per-file outcomes count only the posts that file added to the run.
/// A directory handed to `process_file` is skipped even when its name looks like a dump.
#[test]
fn process_file_reports_per_file_matches() {
    let base = temp_base();
    let first = base.join("RS_2025-07.zst");
    let second = base.join("RS_2025-08.jsonl");
    let out = base.join("out.json");
    write_zst_lines(&first, &[
        submission("p1", IN_WINDOW, "texas flood", "", "a"),
        submission("p2", IN_WINDOW, "nothing to see", "", "b"),
    ]);
    write_plain_lines(&second, &[
        submission("p1", IN_WINDOW, "texas flood again", "", "a"),
        submission("p3", IN_WINDOW, "rain damage", "", "c"),
        submission("p4", IN_WINDOW, "flash flood", "", "d"),
    ]);
    fs::create_dir_all(base.join("looks_like.jsonl")).unwrap();

    let mut pf = filter_for(&first, &out);
    assert_eq!(pf.process_file(&first).unwrap(), FileOutcome::Processed { records: 2, matched: 1 });
    assert_eq!(pf.process_file(&second).unwrap(), FileOutcome::Processed { records: 3, matched: 2 });
    assert_eq!(pf.process_file(&base.join("looks_like.jsonl")).unwrap(), FileOutcome::Skipped);
    assert_eq!(output_ids(&out), vec!["p1", "p3", "p4"]);
}

/// The record-source seam: an "unrecognized" answer skips the file without writing output.
struct RejectAll;
impl RecordSource for RejectAll {
    fn classify(&self, _path: &Path, _reader: Box<dyn Read>) -> anyhow::Result<RecordStream> {
        Ok(RecordStream::Unrecognized)
    }
}

#[test]
fn custom_source_can_reject_files() {
    let base = temp_base();
    let input = base.join("RS_2025-07.zst");
    let out = base.join("out.json");
    write_zst_lines(&input, &[submission("s1", IN_WINDOW, "texas flood", "", "x")]);

    let opts = FilterOptions::default().with_input(&input).with_output(&out).with_progress(false);
    let mut pf = PostFilter::with_source(opts, RejectAll);
    assert_eq!(pf.process_file(&input).unwrap(), FileOutcome::Skipped);
    assert!(pf.matches().is_empty());
    assert!(!out.exists());
}
