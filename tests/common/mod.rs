#![allow(dead_code)]

use serde_json::{json, Value};
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

/// Default window bounds (2025-07-04T00:00:00Z ..= 2025-07-11T23:59:59Z).
pub const WINDOW_START: i64 = 1_751_587_200;
pub const WINDOW_END: i64 = 1_752_278_399;
/// Comfortably inside the window.
pub const IN_WINDOW: i64 = 1_751_900_000;

/// Fresh temporary directory that outlives the test (inspect on failure).
pub fn temp_base() -> PathBuf {
    tempfile::tempdir().unwrap().into_path()
}

/// Write a compressed `.zst` file containing the provided JSONL lines,
/// shaped like the RS_/RC_ monthly archives.
pub fn write_zst_lines(path: &Path, lines: &[String]) {
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    let f = File::create(path).unwrap();
    let mut enc = zstd::stream::write::Encoder::new(f, 3).unwrap();
    for l in lines {
        writeln!(&mut enc, "{}", l).unwrap();
    }
    enc.finish().unwrap();
}

/// Write an uncompressed JSONL file.
pub fn write_plain_lines(path: &Path, lines: &[String]) {
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    let mut f = File::create(path).unwrap();
    for l in lines {
        writeln!(&mut f, "{}", l).unwrap();
    }
}

/// A submission line with the fields the filter reads plus pass-through ones.
pub fn submission(id: &str, created_utc: i64, title: &str, selftext: &str, author: &str) -> String {
    json!({
        "id": id, "created_utc": created_utc, "title": title, "selftext": selftext,
        "author": author, "subreddit": "texas", "score": 12, "num_comments": 3,
        "url": format!("https://www.reddit.com/r/texas/comments/{id}/"),
        "is_self": true, "over_18": false
    })
    .to_string()
}

/// Parse the output document as a JSON array.
pub fn read_output(path: &Path) -> Vec<Value> {
    let s = fs::read_to_string(path).unwrap();
    match serde_json::from_str::<Value>(&s).unwrap() {
        Value::Array(v) => v,
        other => panic!("output is not a JSON array: {other}"),
    }
}

/// Ids in output order.
pub fn output_ids(path: &Path) -> Vec<String> {
    read_output(path)
        .iter()
        .map(|v| v["id"].as_str().unwrap().to_string())
        .collect()
}
