mod config;
mod date;
mod paths;
mod record_source;

mod filters;
mod progress;
mod util;
mod pipeline;

mod dedupe;
mod matches;

pub use crate::config::{normalize_term, FilterOptions, TimeWindow};
pub use crate::date::{epoch_seconds, local_iso};
pub use crate::pipeline::{FileOutcome, PostFilter, RunSummary};

// Predicates, exposed so callers can reuse them outside a full run.
pub use crate::filters::{in_window, match_term, search_text};

// Run-scoped state.
pub use crate::dedupe::{record_id, SeenIds};
pub use crate::matches::{MatchBuffer, MatchedPost, DELETED_AUTHOR};

// Record decoding seam; implement `RecordSource` for other dump layouts.
pub use crate::record_source::{CountingReader, DumpFormat, DumpSource, Record, RecordSource, RecordStream, Records};

pub use crate::paths::discover_inputs;
pub use crate::progress::FileProgress;
pub use crate::util::{create_with_backoff, init_tracing_once, open_with_backoff, replace_file_atomic_backoff};
