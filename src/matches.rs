//! Matched-post summaries and the run-wide buffer that is rewritten to disk
//! (as one pretty JSON array) after every processed file.

use crate::record_source::Record;
use crate::util::{create_with_backoff, replace_file_atomic_backoff};
use anyhow::{Context, Result};
use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use serde_json::Value;
use std::ffi::OsString;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

pub const DELETED_AUTHOR: &str = "[deleted]";

/// Fixed-shape summary of one accepted record. Field order is the output order.
/// Pass-through fields are copied verbatim (`null` when absent).
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct MatchedPost {
    pub id: Value,
    pub created_utc: Value,
    pub created_iso: String,
    pub author: Value,
    pub subreddit: Value,
    pub title: Value,
    pub selftext: Value,
    pub score: Value,
    pub num_comments: Value,
    pub url: Value,
    pub matched_term: String,
}

impl MatchedPost {
    /// Build the summary, consuming the record's fields.
    pub fn from_record(mut rec: Record, created_iso: String, matched_term: &str) -> Self {
        let mut take = |k: &str| rec.remove(k).unwrap_or(Value::Null);
        let id = take("id");
        let created_utc = take("created_utc");
        let author = match take("author") {
            v if is_falsy(&v) => Value::String(DELETED_AUTHOR.to_string()),
            v => v,
        };
        Self {
            id,
            created_utc,
            created_iso,
            author,
            subreddit: take("subreddit"),
            title: take("title"),
            selftext: take("selftext"),
            score: take("score"),
            num_comments: take("num_comments"),
            url: take("url"),
            matched_term: matched_term.to_string(),
        }
    }
}

/// null, false, 0, "", [] and {} count as missing.
fn is_falsy(v: &Value) -> bool {
    match v {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::Number(n) => n.as_f64() == Some(0.0),
        Value::String(s) => s.is_empty(),
        Value::Array(a) => a.is_empty(),
        Value::Object(o) => o.is_empty(),
    }
}

/// Ordered, append-only collection of accepted posts for the whole run.
/// Dedup is the caller's job (see `SeenIds`).
#[derive(Debug, Default)]
pub struct MatchBuffer {
    posts: Vec<MatchedPost>,
}

impl MatchBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&mut self, post: MatchedPost) {
        self.posts.push(post);
    }

    pub fn posts(&self) -> &[MatchedPost] {
        &self.posts
    }

    pub fn len(&self) -> usize {
        self.posts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.posts.is_empty()
    }

    /// Write every post so far to `path` as a 4-space indented JSON array,
    /// non-ASCII kept literal. Any previous file at `path` is replaced.
    ///
    /// With `atomic`, the array goes to `<path>.tmp` first and is renamed over
    /// `path`, so an interrupted write never leaves a truncated document behind.
    pub fn write_all(&self, path: &Path, atomic: bool) -> Result<()> {
        if !atomic {
            return self.write_to(path);
        }
        let tmp = tmp_path_for(path);
        self.write_to(&tmp)?;
        replace_file_atomic_backoff(&tmp, path)
    }

    fn write_to(&self, path: &Path) -> Result<()> {
        let f = create_with_backoff(path, 16, 50).with_context(|| format!("create {}", path.display()))?;
        let mut out = BufWriter::new(f);
        let mut ser = serde_json::Serializer::with_formatter(&mut out, PrettyFormatter::with_indent(b"    "));
        self.posts
            .serialize(&mut ser)
            .with_context(|| format!("serialize {}", path.display()))?;
        out.flush().with_context(|| format!("flush {}", path.display()))?;
        Ok(())
    }
}

fn tmp_path_for(path: &Path) -> PathBuf {
    let mut name: OsString = path.file_name().map(OsString::from).unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}
