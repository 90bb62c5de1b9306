use std::collections::{BTreeSet, HashSet};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use rayon::prelude::*;

use crate::error::Result;
use crate::submission::Submission;
use crate::tokenize::{Language, Tokenizer};
use crate::types::{CollectOptions, ScanOutcome, ScanStats};

mod read;
mod walker;


pub(crate) use read::read_source_text;
pub(crate) use walker::visit_dir_files;

fn ignore_dirs_contains(ignore_dirs: &HashSet<String>, name: &str) -> bool {
    if ignore_dirs.contains(name) {
        return true;
    }
    #[cfg(windows)]
    {
        ignore_dirs.iter().any(|d| d.eq_ignore_ascii_case(name))
    }
    #[cfg(not(windows))]
    {
        false
    }
}

fn extension_allowed(extensions: &[String], path: &Path) -> bool {
    if extensions.is_empty() {
        return true;
    }
    let Some(ext) = path.extension().and_then(|e| e.to_str()) else {
        return false;
    };
    extensions
        .iter()
        .any(|want| want.trim_start_matches('.').eq_ignore_ascii_case(ext))
}

pub(crate) fn merge_stats(into: &mut ScanStats, from: &ScanStats) {
    into.candidate_files = into.candidate_files.saturating_add(from.candidate_files);
    into.scanned_files = into.scanned_files.saturating_add(from.scanned_files);
    into.scanned_bytes = into.scanned_bytes.saturating_add(from.scanned_bytes);
    into.skipped_missing_roots = into
        .skipped_missing_roots
        .saturating_add(from.skipped_missing_roots);
    into.skipped_not_found = into.skipped_not_found.saturating_add(from.skipped_not_found);
    into.skipped_permission_denied = into
        .skipped_permission_denied
        .saturating_add(from.skipped_permission_denied);
    into.skipped_too_large = into.skipped_too_large.saturating_add(from.skipped_too_large);
    into.skipped_binary = into.skipped_binary.saturating_add(from.skipped_binary);
    into.skipped_walk_errors = into
        .skipped_walk_errors
        .saturating_add(from.skipped_walk_errors);
}

/// Paths of every file to compare, sorted and deduplicated.
///
/// Missing roots and missing extra files are warned about and skipped.
pub fn collect_files(options: &CollectOptions, stats: &mut ScanStats) -> io::Result<Vec<PathBuf>> {
    let mut files: BTreeSet<PathBuf> = BTreeSet::new();

    for root in &options.roots {
        let meta = match fs::metadata(root) {
            Ok(meta) => meta,
            Err(err) => {
                tracing::warn!(root = %root.display(), error = %err, "directory not found, skipping");
                stats.skipped_missing_roots = stats.skipped_missing_roots.saturating_add(1);
                continue;
            }
        };
        if meta.is_file() {
            stats.candidate_files = stats.candidate_files.saturating_add(1);
            files.insert(root.clone());
            continue;
        }
        tracing::debug!(root = %root.display(), recurse = options.recurse, "walking directory");
        visit_dir_files(root, options, stats, |path| {
            files.insert(path);
        })?;
    }

    for file in &options.files {
        if file.is_file() {
            stats.candidate_files = stats.candidate_files.saturating_add(1);
            files.insert(file.clone());
        } else {
            tracing::warn!(file = %file.display(), "file not found, skipping");
            stats.skipped_not_found = stats.skipped_not_found.saturating_add(1);
        }
    }

    tracing::info!(files = files.len(), "collected files");
    Ok(files.into_iter().collect())
}

fn tokenizer_for(path: &Path) -> Tokenizer {
    let language = path
        .extension()
        .and_then(|e| e.to_str())
        .map(Language::from_extension)
        .unwrap_or_default();
    Tokenizer::new(language)
}

/// Collects files and tokenizes them in parallel. Unreadable and binary files are skipped
/// and counted; the returned order follows the sorted path list.
pub fn load_submissions(options: &CollectOptions) -> Result<ScanOutcome<Vec<Arc<Submission>>>> {
    let mut stats = ScanStats::default();
    let paths = collect_files(options, &mut stats)?;

    let parsed: Vec<(Option<Submission>, ScanStats)> = paths
        .par_iter()
        .map(|path| {
            let mut local = ScanStats::default();
            let submission = read_source_text(path, options.max_file_size, &mut local).map(|text| {
                Submission::from_source(
                    path.to_string_lossy().as_ref(),
                    &text,
                    &tokenizer_for(path),
                )
            });
            (submission, local)
        })
        .collect();

    let mut submissions = Vec::with_capacity(parsed.len());
    for (submission, local) in parsed {
        merge_stats(&mut stats, &local);
        if let Some(submission) = submission {
            if submission.is_empty() {
                tracing::debug!(path = submission.path(), "submission has no tokens");
            }
            submissions.push(Arc::new(submission));
        }
    }

    tracing::info!(
        submissions = submissions.len(),
        scanned_bytes = stats.scanned_bytes,
        "tokenized submissions"
    );
    Ok(ScanOutcome {
        result: submissions,
        stats,
    })
}
