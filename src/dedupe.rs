use ahash::AHashSet;
use serde_json::Value;

/// Run-scoped set of record ids that have already been accepted.
/// Shared by every file of a run; it only ever grows.
#[derive(Debug, Default)]
pub struct SeenIds {
    ids: AHashSet<String>,
}

impl SeenIds {
    pub fn new() -> Self {
        Self::default()
    }

    /// True when `id` is absent/empty or already registered.
    /// Falsy ids report as accepted so callers stop processing the record.
    pub fn accepted(&self, id: Option<&str>) -> bool {
        match id {
            Some(s) if !s.is_empty() => self.ids.contains(s),
            _ => true,
        }
    }

    /// Insert `id`. Empty ids are ignored; repeated ids are a no-op.
    pub fn register(&mut self, id: &str) {
        if !id.is_empty() {
            self.ids.insert(id.to_owned());
        }
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

/// Dedup key for a record's `id` value. Returns `None` for falsy ids
/// (missing, null, empty string, zero). Non-scalar ids are never keys.
pub fn record_id(v: Option<&Value>) -> Option<String> {
    match v? {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) if n.as_f64() != Some(0.0) => Some(n.to_string()),
        _ => None,
    }
}
