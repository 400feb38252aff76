use crate::config::{FilterOptions, TimeWindow};
use crate::date::{epoch_seconds, local_iso};
use crate::dedupe::{record_id, SeenIds};
use crate::filters::{in_window, match_term};
use crate::matches::{MatchBuffer, MatchedPost};
use crate::paths::discover_inputs;
use crate::progress::FileProgress;
use crate::record_source::{CountingReader, DumpSource, Record, RecordSource, RecordStream};
use crate::util::{init_tracing_once, open_with_backoff};
use anyhow::{Context, Result};
use std::path::Path;

/// Totals for one `run()`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub files_seen: usize,
    pub files_skipped: usize,
    pub records_scanned: u64,
    pub matched: usize,
}

/// Outcome of processing a single path.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FileOutcome {
    Skipped,
    Processed { records: u64, matched: usize },
}

/// Owns one run: options, the dedup set and the match buffer.
/// Both collections live across every file handed to `process_file`.
pub struct PostFilter<S: RecordSource = DumpSource> {
    opts: FilterOptions,
    source: S,
    seen: SeenIds,
    buffer: MatchBuffer,
}

impl PostFilter<DumpSource> {
    pub fn new() -> Self {
        Self::with_options(FilterOptions::default())
    }

    pub fn with_options(opts: FilterOptions) -> Self {
        let source = DumpSource::new(opts.read_buffer_bytes);
        Self::with_source(opts, source)
    }
}

impl Default for PostFilter<DumpSource> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: RecordSource> PostFilter<S> {
    pub fn with_source(opts: FilterOptions, source: S) -> Self {
        Self { opts, source, seen: SeenIds::new(), buffer: MatchBuffer::new() }
    }

    // -------- Builder methods --------
    pub fn window(mut self, window: TimeWindow) -> Self { self.opts = self.opts.with_window(window); self }
    pub fn terms<I, T>(mut self, terms: I) -> Self where I: IntoIterator<Item = T>, T: AsRef<str> { self.opts = self.opts.with_terms(terms); self }
    pub fn input(mut self, path: impl AsRef<Path>) -> Self { self.opts = self.opts.with_input(path); self }
    pub fn recursive(mut self, yes: bool) -> Self { self.opts = self.opts.with_recursive(yes); self }
    pub fn output(mut self, path: impl AsRef<Path>) -> Self { self.opts = self.opts.with_output(path); self }
    pub fn progress(mut self, yes: bool) -> Self { self.opts = self.opts.with_progress(yes); self }
    pub fn atomic_output(mut self, yes: bool) -> Self { self.opts = self.opts.with_atomic_output(yes); self }
    pub fn sorted_traversal(mut self, yes: bool) -> Self { self.opts = self.opts.with_sorted_traversal(yes); self }

    pub fn options(&self) -> &FilterOptions { &self.opts }
    pub fn matches(&self) -> &[MatchedPost] { self.buffer.posts() }
    pub fn seen(&self) -> &SeenIds { &self.seen }

    /// Process the configured input: a single file directly, or every
    /// discovered entry of a directory in walk order.
    pub fn run(&mut self) -> Result<RunSummary> {
        init_tracing_once();
        let root = self.opts.input.clone();
        let mut summary = RunSummary::default();

        if root.is_dir() {
            let files = discover_inputs(&root, self.opts.recursive, self.opts.sorted_traversal)?;
            tracing::info!("Planned {} files under {}", files.len(), root.display());
            for (i, path) in files.iter().enumerate() {
                tracing::info!("Processing file {:>3} {}", i + 1, path.display());
                self.tally(&mut summary, path)?;
            }
        } else {
            self.tally(&mut summary, &root)?;
        }

        summary.matched = self.buffer.len();
        Ok(summary)
    }

    fn tally(&mut self, summary: &mut RunSummary, path: &Path) -> Result<()> {
        summary.files_seen += 1;
        match self.process_file(path)? {
            FileOutcome::Skipped => summary.files_skipped += 1,
            FileOutcome::Processed { records, .. } => summary.records_scanned += records,
        }
        Ok(())
    }

    /// Stream one file through the predicates. Unrecognized files are skipped
    /// without touching the output; otherwise the full buffer is rewritten
    /// once the file's records are exhausted.
    pub fn process_file(&mut self, path: &Path) -> Result<FileOutcome> {
        tracing::info!("Processing file {}", path.display());
        if path.is_dir() {
            tracing::warn!("Skipping unknown file {}", path.display());
            return Ok(FileOutcome::Skipped);
        }

        let file = open_with_backoff(path, 16, 50).with_context(|| format!("open {}", path.display()))?;
        let total_bytes = file.metadata().map(|m| m.len()).unwrap_or(0);
        let (reader, counter) = CountingReader::new(file);

        let records = match self.source.classify(path, Box::new(reader))? {
            RecordStream::Unrecognized => {
                tracing::warn!("Skipping unknown file {}", path.display());
                return Ok(FileOutcome::Skipped);
            }
            RecordStream::Records(records) => records,
        };

        let mut progress = FileProgress::new(path, total_bytes, counter, self.opts.progress);
        let before = self.buffer.len();
        for rec in records {
            let rec = rec.with_context(|| format!("decoding {}", path.display()))?;
            progress.on_record();
            self.consider(rec)?;
        }
        progress.finish();

        self.buffer.write_all(&self.opts.output, self.opts.atomic_output)?;
        tracing::info!("Filtered posts written to {}", self.opts.output.display());

        Ok(FileOutcome::Processed { records: progress.rows(), matched: self.buffer.len() - before })
    }

    /// Reject/accept chain for one record: window, then term, then id.
    fn consider(&mut self, rec: Record) -> Result<()> {
        let created = match rec.get("created_utc") {
            Some(v) if !v.is_null() => v,
            _ => return Ok(()),
        };
        if !in_window(created, &self.opts.window)? {
            return Ok(());
        }
        let term = match match_term(&rec, &self.opts.terms) {
            Some(t) => t,
            None => return Ok(()),
        };
        let id = record_id(rec.get("id"));
        if self.seen.accepted(id.as_deref()) {
            return Ok(());
        }
        let Some(id) = id else { return Ok(()) };

        let created_iso = local_iso(epoch_seconds(created)?)?;
        let post = MatchedPost::from_record(rec, created_iso, term);
        self.seen.register(&id);
        self.buffer.append(post);
        Ok(())
    }
}
