use std::collections::HashSet;
use std::path::PathBuf;

#[derive(Debug, Clone)]
pub struct CollectOptions {
    pub roots: Vec<PathBuf>,
    pub files: Vec<PathBuf>,
    pub extensions: Vec<String>,
    pub recurse: bool,
    pub include: Vec<String>,
    pub exclude: Vec<String>,
    pub ignore_dirs: HashSet<String>,
    pub max_file_size: Option<u64>,
    pub respect_gitignore: bool,
    pub follow_symlinks: bool,
}

pub const DEFAULT_MAX_FILE_SIZE_BYTES: u64 = 10 * 1024 * 1024;

impl Default for CollectOptions {
    fn default() -> Self {
        Self {
            roots: Vec::new(),
            files: Vec::new(),
            extensions: Vec::new(),
            recurse: false,
            include: Vec::new(),
            exclude: Vec::new(),
            ignore_dirs: default_ignore_dirs(),
            max_file_size: Some(DEFAULT_MAX_FILE_SIZE_BYTES),
            respect_gitignore: true,
            follow_symlinks: false,
        }
    }
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ScanStats {
    pub candidate_files: u64,
    pub scanned_files: u64,
    pub scanned_bytes: u64,
    pub skipped_missing_roots: u64,
    pub skipped_not_found: u64,
    pub skipped_permission_denied: u64,
    pub skipped_too_large: u64,
    pub skipped_binary: u64,
    pub skipped_walk_errors: u64,
}

impl ScanStats {
    /// Files that were requested but could not be read. The size limit is a deliberate
    /// filter and does not count.
    pub fn has_skips(&self) -> bool {
        self.skipped_missing_roots > 0
            || self.skipped_not_found > 0
            || self.skipped_permission_denied > 0
            || self.skipped_binary > 0
            || self.skipped_walk_errors > 0
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanOutcome<T> {
    pub result: T,
    pub stats: ScanStats,
}

pub fn default_ignore_dirs() -> HashSet<String> {
    [
        ".git",
        ".hg",
        ".svn",
        "node_modules",
        "target",
        "dist",
        "build",
        "out",
        ".next",
        ".turbo",
        ".cache",
    ]
    .into_iter()
    .map(str::to_string)
    .collect()
}
