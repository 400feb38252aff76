//! Record decoding for dump files: format detection by file name, zstd or plain
//! JSON-lines decoding into a lazy record iterator, and compressed-byte counting
//! for progress.

use anyhow::{anyhow, Context, Result};
use serde_json::{Map, Value};
use std::io::{self, BufRead, BufReader, Read};
use std::path::{Path, PathBuf};
use std::sync::{
    atomic::{AtomicU64, Ordering},
    Arc,
};
use zstd::stream::read::Decoder;

/// One decoded dump line: field name → JSON value.
pub type Record = Map<String, Value>;

/// Supported on-disk layouts.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DumpFormat {
    /// `RS_YYYY-MM.zst` / `RC_YYYY-MM.zst` monthly archives.
    ZstJsonl,
    /// Uncompressed `.jsonl` / `.ndjson`.
    Jsonl,
}

impl DumpFormat {
    /// Classify by file name (case-insensitive extension).
    pub fn detect(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "zst" => Some(Self::ZstJsonl),
            "jsonl" | "ndjson" => Some(Self::Jsonl),
            _ => None,
        }
    }
}

/// Either a lazy record sequence or the explicit "format not recognized" outcome.
pub enum RecordStream {
    Records(Records),
    Unrecognized,
}

/// Produces record streams from an opened dump file.
pub trait RecordSource {
    fn classify(&self, path: &Path, reader: Box<dyn Read>) -> Result<RecordStream>;
}

/// Default source for Pushshift/Arctic-Shift style dumps.
#[derive(Clone, Debug)]
pub struct DumpSource {
    read_buf_bytes: usize,
}

impl DumpSource {
    pub fn new(read_buf_bytes: usize) -> Self {
        Self { read_buf_bytes: read_buf_bytes.max(8 * 1024) }
    }
}

impl Default for DumpSource {
    fn default() -> Self {
        Self::new(256 * 1024)
    }
}

impl RecordSource for DumpSource {
    fn classify(&self, path: &Path, reader: Box<dyn Read>) -> Result<RecordStream> {
        let lines: Box<dyn BufRead> = match DumpFormat::detect(path) {
            None => return Ok(RecordStream::Unrecognized),
            Some(DumpFormat::Jsonl) => Box::new(BufReader::with_capacity(self.read_buf_bytes, reader)),
            Some(DumpFormat::ZstJsonl) => {
                let mut decoder = Decoder::new(reader)
                    .with_context(|| format!("zstd init {}", path.display()))?;
                // Monthly archives are written with long windows; the default limit rejects them.
                decoder.window_log_max(31)?;
                Box::new(BufReader::with_capacity(self.read_buf_bytes, decoder))
            }
        };
        Ok(RecordStream::Records(Records::new(path, lines)))
    }
}

/// Forward-only iterator over the JSON objects of a line-delimited stream.
/// Blank lines are skipped. The first error ends the iteration.
pub struct Records {
    path: PathBuf,
    reader: Box<dyn BufRead>,
    buf: String,
    line_no: u64,
    done: bool,
}

impl Records {
    pub fn new(path: &Path, reader: Box<dyn BufRead>) -> Self {
        Self {
            path: path.to_path_buf(),
            reader,
            buf: String::with_capacity(16 * 1024),
            line_no: 0,
            done: false,
        }
    }

    fn next_record(&mut self) -> Result<Option<Record>> {
        loop {
            self.buf.clear();
            let n = self
                .reader
                .read_line(&mut self.buf)
                .with_context(|| format!("read {} (line {})", self.path.display(), self.line_no + 1))?;
            if n == 0 {
                return Ok(None);
            }
            self.line_no += 1;
            let line = self.buf.trim_end_matches(['\n', '\r']);
            if line.trim().is_empty() {
                continue;
            }
            let val: Value = serde_json::from_str(line)
                .with_context(|| format!("malformed JSON in {} at line {}", self.path.display(), self.line_no))?;
            return match val {
                Value::Object(map) => Ok(Some(map)),
                _ => Err(anyhow!(
                    "expected a JSON object in {} at line {}",
                    self.path.display(),
                    self.line_no
                )),
            };
        }
    }
}

impl Iterator for Records {
    type Item = Result<Record>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        match self.next_record() {
            Ok(Some(rec)) => Some(Ok(rec)),
            Ok(None) => {
                self.done = true;
                None
            }
            Err(e) => {
                self.done = true;
                Some(Err(e))
            }
        }
    }
}

/// A `Read` wrapper that counts raw (compressed) bytes read.
pub struct CountingReader<R: Read> {
    inner: R,
    counter: Arc<AtomicU64>,
}

impl<R: Read> CountingReader<R> {
    pub fn new(inner: R) -> (Self, Arc<AtomicU64>) {
        let counter = Arc::new(AtomicU64::new(0));
        (Self { inner, counter: counter.clone() }, counter)
    }
}

impl<R: Read> Read for CountingReader<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let n = self.inner.read(buf)?;
        self.counter.fetch_add(n as u64, Ordering::Relaxed);
        Ok(n)
    }
}
