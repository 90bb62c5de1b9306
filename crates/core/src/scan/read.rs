use std::fs;
use std::io::{self, Read};
use std::path::Path;

use crate::types::ScanStats;

fn count_open_error(err: &io::Error, path: &Path, stats: &mut ScanStats) {
    match err.kind() {
        io::ErrorKind::NotFound => {
            stats.skipped_not_found = stats.skipped_not_found.saturating_add(1);
        }
        io::ErrorKind::PermissionDenied => {
            stats.skipped_permission_denied = stats.skipped_permission_denied.saturating_add(1);
        }
        _ => {
            stats.skipped_walk_errors = stats.skipped_walk_errors.saturating_add(1);
        }
    }
    tracing::warn!(path = %path.display(), error = %err, "unable to read file, skipping");
}

/// Reads a source file as (lossy) UTF-8. Files over `max_file_size` or containing NUL bytes
/// are skipped and counted.
pub(crate) fn read_source_text(
    path: &Path,
    max_file_size: Option<u64>,
    stats: &mut ScanStats,
) -> Option<String> {
    let metadata = match fs::metadata(path) {
        Ok(m) => m,
        Err(err) => {
            count_open_error(&err, path, stats);
            return None;
        }
    };

    if let Some(max_file_size) = max_file_size
        && metadata.len() > max_file_size
    {
        tracing::debug!(path = %path.display(), size = metadata.len(), "file too large, skipping");
        stats.skipped_too_large = stats.skipped_too_large.saturating_add(1);
        return None;
    }

    let mut file = match fs::File::open(path) {
        Ok(f) => f,
        Err(err) => {
            count_open_error(&err, path, stats);
            return None;
        }
    };

    let mut bytes: Vec<u8> = Vec::with_capacity(metadata.len().min(1024 * 1024) as usize);
    let limit = max_file_size.map_or(u64::MAX, |max| max.saturating_add(1));
    if let Err(err) = file.by_ref().take(limit).read_to_end(&mut bytes) {
        count_open_error(&err, path, stats);
        return None;
    }

    stats.scanned_files = stats.scanned_files.saturating_add(1);
    stats.scanned_bytes = stats.scanned_bytes.saturating_add(bytes.len() as u64);

    if let Some(max_file_size) = max_file_size
        && bytes.len() as u64 > max_file_size
    {
        stats.skipped_too_large = stats.skipped_too_large.saturating_add(1);
        return None;
    }
    if bytes.contains(&0) {
        tracing::warn!(path = %path.display(), "binary file, skipping");
        stats.skipped_binary = stats.skipped_binary.saturating_add(1);
        return None;
    }

    Some(String::from_utf8_lossy(&bytes).into_owned())
}
