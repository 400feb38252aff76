//! Record-level predicates: the inclusive creation-time window and the ordered
//! case-insensitive term match over `title` + `selftext`.

use crate::config::TimeWindow;
use crate::date::epoch_seconds;
use crate::record_source::Record;
use anyhow::Result;
use serde_json::Value;

/// True iff `created_utc` lies inside `window` (both ends inclusive).
/// Callers check presence first; a value that is present but not numeric is an error.
pub fn in_window(created_utc: &Value, window: &TimeWindow) -> Result<bool> {
    let ts = epoch_seconds(created_utc)?;
    Ok(window.contains_epoch(ts))
}

fn text_field<'a>(rec: &'a Record, key: &str) -> std::borrow::Cow<'a, str> {
    match rec.get(key) {
        Some(Value::String(s)) => s.as_str().into(),
        None | Some(Value::Null) => "".into(),
        Some(other) => other.to_string().into(),
    }
}

/// Lowercased `"{title} {selftext}"`, missing fields treated as empty text.
pub fn search_text(rec: &Record) -> String {
    let title = text_field(rec, "title");
    let selftext = text_field(rec, "selftext");
    let mut hay = String::with_capacity(title.len() + selftext.len() + 1);
    hay.push_str(&title);
    hay.push(' ');
    hay.push_str(&selftext);
    hay.to_lowercase()
}

/// First term (in configured order) contained in the record's search text.
/// `terms` are expected lowercase already (see `FilterOptions::with_terms`).
pub fn match_term<'t>(rec: &Record, terms: &'t [String]) -> Option<&'t str> {
    let hay = search_text(rec);
    terms.iter().find(|t| hay.contains(t.as_str())).map(String::as_str)
}
