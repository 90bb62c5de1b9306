use std::io;
use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum ConfigError {
    #[error("min_match_length must be >= 1 (got {0})")]
    MinMatchLength(usize),

    #[error("min_common_token must be within (0, 1] (got {0})")]
    MinCommonToken(f64),

    #[error("min_similarity must be within [0, 1] (got {0})")]
    MinSimilarity(f64),

    #[error("min_friend_finder_similarity must be a finite number (got {0})")]
    FriendSimilarity(f64),
}

#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("config file {}: {source}", path.display())]
    ConfigFile {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("config file {}: {source}", path.display())]
    ConfigFormat {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error(transparent)]
    Io(#[from] io::Error),

    #[error("comparison cancelled after {completed} of {total} pairs")]
    Cancelled { completed: usize, total: usize },
}

pub type Result<T> = std::result::Result<T, Error>;
