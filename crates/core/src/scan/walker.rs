use std::io;
use std::path::{Path, PathBuf};

use ignore::WalkBuilder;
use ignore::overrides::{Override, OverrideBuilder};

use crate::types::{CollectOptions, ScanStats};

use super::{extension_allowed, ignore_dirs_contains};

fn build_overrides(root: &Path, options: &CollectOptions) -> io::Result<Override> {
    let invalid = |err: ignore::Error| io::Error::new(io::ErrorKind::InvalidInput, err.to_string());

    let mut builder = OverrideBuilder::new(root);
    for glob in &options.include {
        builder.add(glob).map_err(invalid)?;
    }
    for glob in &options.exclude {
        builder.add(&format!("!{glob}")).map_err(invalid)?;
    }
    builder.build().map_err(invalid)
}

pub(crate) fn visit_dir_files<F>(
    root: &Path,
    options: &CollectOptions,
    stats: &mut ScanStats,
    mut on_file: F,
) -> io::Result<()>
where
    F: FnMut(PathBuf),
{
    let overrides = build_overrides(root, options)?;
    let ignore_dirs = options.ignore_dirs.clone();
    let follow_symlinks = options.follow_symlinks;
    let is_git_repo = root.join(".git").exists();

    let mut builder = WalkBuilder::new(root);
    builder
        .hidden(false)
        .follow_links(follow_symlinks)
        .ignore(false)
        .git_ignore(options.respect_gitignore)
        .git_global(options.respect_gitignore && is_git_repo)
        .git_exclude(options.respect_gitignore && is_git_repo)
        .parents(false)
        .require_git(false)
        .overrides(overrides)
        .max_depth(if options.recurse { None } else { Some(1) });

    let walker = builder
        .filter_entry(move |entry| {
            if entry.depth() == 0 {
                return true;
            }
            if !follow_symlinks && entry.path_is_symlink() {
                return false;
            }
            let is_dir = entry.file_type().is_some_and(|ft| ft.is_dir());
            if !is_dir {
                return true;
            }
            !entry
                .file_name()
                .to_str()
                .is_some_and(|name| ignore_dirs_contains(&ignore_dirs, name))
        })
        .build();

    for result in walker {
        let entry = match result {
            Ok(e) => e,
            Err(err) => {
                if let Some(io_err) = err.io_error() {
                    match io_err.kind() {
                        io::ErrorKind::NotFound => {
                            stats.skipped_not_found = stats.skipped_not_found.saturating_add(1);
                            continue;
                        }
                        io::ErrorKind::PermissionDenied => {
                            stats.skipped_permission_denied =
                                stats.skipped_permission_denied.saturating_add(1);
                            continue;
                        }
                        _ => {}
                    }
                }
                tracing::warn!(root = %root.display(), error = %err, "walk error");
                stats.skipped_walk_errors = stats.skipped_walk_errors.saturating_add(1);
                continue;
            }
        };

        if entry.depth() == 0 {
            continue;
        }
        let Some(file_type) = entry.file_type() else {
            continue;
        };
        if !file_type.is_file() {
            continue;
        }
        if !extension_allowed(&options.extensions, entry.path()) {
            continue;
        }

        stats.candidate_files = stats.candidate_files.saturating_add(1);
        on_file(entry.into_path());
    }

    Ok(())
}
