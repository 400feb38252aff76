use anyhow::{Context, Result};
use std::fs::{self, File};
use std::io;
use std::path::Path;
use std::thread::sleep;
use std::time::Duration;

static INIT_ONCE: std::sync::Once = std::sync::Once::new();
pub fn init_tracing_once() {
    INIT_ONCE.call_once(|| {
        let env_filter = std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());
        let _ = tracing_subscriber::fmt().with_env_filter(env_filter).try_init();
    });
}

// -------- robust file ops with backoff (dump drives are often USB/NAS on Windows) --------

/// Return true for transient/retriable I/O errors often seen on Windows when
/// filter drivers (AV/backup), USB/NAS volumes, or sharing violations occur.
fn is_retriable_io_error(e: &io::Error) -> bool {
    // 5 access denied, 32 sharing violation, 33 lock violation, 21 device not ready,
    // 1006 volume externally altered, 1117 I/O device error, 1224 user-mapped section open
    matches!(e.raw_os_error(), Some(5 | 21 | 32 | 33 | 1006 | 1117 | 1224))
}

/// Run `op` up to `tries` times, sleeping a linearly growing delay between
/// attempts that failed with a retriable error.
fn with_backoff<T>(tries: usize, delay_ms: u64, mut op: impl FnMut() -> io::Result<T>) -> io::Result<T> {
    let tries = tries.max(1);
    let mut attempt = 0;
    loop {
        match op() {
            Ok(v) => return Ok(v),
            Err(e) if is_retriable_io_error(&e) && attempt + 1 < tries => {
                attempt += 1;
                sleep(Duration::from_millis(delay_ms.saturating_mul(attempt as u64)));
            }
            Err(e) => return Err(e),
        }
    }
}

/// Open a file with retries/backoff for transient errors.
pub fn open_with_backoff(path: &Path, tries: usize, delay_ms: u64) -> io::Result<File> {
    with_backoff(tries, delay_ms, || File::open(path))
}

/// Create (truncate) a file with retries/backoff for transient errors.
pub fn create_with_backoff(path: &Path, tries: usize, delay_ms: u64) -> io::Result<File> {
    with_backoff(tries, delay_ms, || File::create(path))
}

/// Move `tmp` over `dest`. Rename replaces the destination in one step on the
/// same volume; if it keeps failing (sharing on Windows) fall back to copy + remove.
pub fn replace_file_atomic_backoff(tmp: &Path, dest: &Path) -> Result<()> {
    let tries = 20usize;
    let delay_ms = 50u64;
    if with_backoff(tries, delay_ms, || fs::rename(tmp, dest)).is_ok() {
        return Ok(());
    }
    with_backoff(tries, delay_ms, || fs::copy(tmp, dest))
        .with_context(|| format!("copy {} -> {}", tmp.display(), dest.display()))?;
    with_backoff(tries, delay_ms, || fs::remove_file(tmp))
        .with_context(|| format!("remove {}", tmp.display()))?;
    Ok(())
}
