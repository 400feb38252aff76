use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Enumerate the inputs below `root` in walk order.
///
/// - A plain file yields itself.
/// - Non-recursive: every immediate child, subdirectories included (they are
///   later reported as unrecognized and skipped). Unreadable `root` is an error.
/// - Recursive: every regular file in the subtree; unreadable entries are
///   logged and skipped.
///
/// With `sorted`, siblings are visited by file name instead of filesystem order.
pub fn discover_inputs(root: &Path, recursive: bool, sorted: bool) -> Result<Vec<PathBuf>> {
    if !root.is_dir() {
        return Ok(vec![root.to_path_buf()]);
    }

    let mut walker = WalkDir::new(root).min_depth(1);
    if !recursive {
        walker = walker.max_depth(1);
    }
    if sorted {
        walker = walker.sort_by_file_name();
    }

    let mut out = Vec::new();
    for entry in walker {
        let ent = match entry {
            Ok(ent) => ent,
            Err(e) if recursive => {
                tracing::warn!(error=%e, "skipping unreadable entry");
                continue;
            }
            Err(e) => return Err(e).with_context(|| format!("list {}", root.display())),
        };
        if recursive && !ent.path().is_file() {
            continue;
        }
        out.push(ent.into_path());
    }
    Ok(out)
}
