//! Epoch handling for dump records: numeric coercion of `created_utc` and the
//! offset-naive local ISO rendering used for `created_iso`.

use anyhow::{anyhow, bail, Result};
use serde_json::Value;
use time::format_description::FormatItem;
use time::macros::format_description;
use time::{OffsetDateTime, UtcOffset};

const ISO_SECONDS: &[FormatItem<'static>] =
    format_description!("[year]-[month]-[day]T[hour]:[minute]:[second]");
const ISO_MICROS: &[FormatItem<'static>] =
    format_description!("[year]-[month]-[day]T[hour]:[minute]:[second].[subsecond digits:6]");

/// Coerce a `created_utc` value to fractional epoch seconds.
/// Older dumps store it as a string, newer ones as an integer or float.
pub fn epoch_seconds(v: &Value) -> Result<f64> {
    match v {
        Value::Number(n) => n
            .as_f64()
            .ok_or_else(|| anyhow!("created_utc out of range: {n}")),
        Value::String(s) => s
            .trim()
            .parse::<f64>()
            .map_err(|e| anyhow!("created_utc is not numeric ({s:?}): {e}")),
        other => bail!("created_utc is not numeric: {other}"),
    }
}

/// Render `ts` in local time without an offset suffix, e.g. `2025-07-05T14:03:11`.
/// Sub-second precision is kept to microseconds and only printed when non-zero.
/// When the local offset cannot be determined the instant is rendered in UTC.
pub fn local_iso(ts: f64) -> Result<String> {
    if !ts.is_finite() {
        bail!("timestamp is not finite: {ts}");
    }
    let micros = (ts * 1e6).round() as i128;
    let utc = OffsetDateTime::from_unix_timestamp_nanos(micros * 1_000)?;
    let offset = UtcOffset::local_offset_at(utc).unwrap_or(UtcOffset::UTC);
    let local = utc.to_offset(offset);
    let s = if local.microsecond() == 0 {
        local.format(ISO_SECONDS)?
    } else {
        local.format(ISO_MICROS)?
    };
    Ok(s)
}
