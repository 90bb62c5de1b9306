use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, Error, Result};

/// Thresholds shared by the pair matcher, the aggregation step and the friend finder.
///
/// The value is built once (defaults, a JSON file, or CLI overrides), validated, and then
/// passed by reference into every comparison. Nothing in the crate mutates it afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Configuration {
    /// Minimum number of distinct token texts in a run, counting tolerated mismatches.
    pub min_match_length: usize,
    /// Consecutive mismatches that close a run. `1` means every paired token must match.
    pub max_match_distance: usize,
    /// Fraction of the run's distinct texts that must also occur on the other side.
    pub min_common_token: f64,
    /// Friend threshold; a negative value derives it from the similarity POI.
    pub min_friend_finder_similarity: f64,
    /// Reporting floor, also the lower bound of the friend threshold.
    pub min_similarity: f64,
}

pub const DEFAULT_MIN_MATCH_LENGTH: usize = 100;
pub const DEFAULT_MAX_MATCH_DISTANCE: usize = 2;
pub const DEFAULT_MIN_COMMON_TOKEN: f64 = 0.9;
pub const DEFAULT_MIN_SIMILARITY: f64 = 0.5;

impl Default for Configuration {
    fn default() -> Self {
        Self {
            min_match_length: DEFAULT_MIN_MATCH_LENGTH,
            max_match_distance: DEFAULT_MAX_MATCH_DISTANCE,
            min_common_token: DEFAULT_MIN_COMMON_TOKEN,
            min_friend_finder_similarity: -1.0,
            min_similarity: DEFAULT_MIN_SIMILARITY,
        }
    }
}

impl Configuration {
    pub fn validate(&self) -> std::result::Result<(), ConfigError> {
        if self.min_match_length == 0 {
            return Err(ConfigError::MinMatchLength(self.min_match_length));
        }
        if !self.min_common_token.is_finite()
            || self.min_common_token <= 0.0
            || self.min_common_token > 1.0
        {
            return Err(ConfigError::MinCommonToken(self.min_common_token));
        }
        if !self.min_similarity.is_finite() || !(0.0..=1.0).contains(&self.min_similarity) {
            return Err(ConfigError::MinSimilarity(self.min_similarity));
        }
        if !self.min_friend_finder_similarity.is_finite() {
            return Err(ConfigError::FriendSimilarity(
                self.min_friend_finder_similarity,
            ));
        }
        Ok(())
    }

    pub fn auto_friend_threshold(&self) -> bool {
        self.min_friend_finder_similarity < 0.0
    }

    pub fn load(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path).map_err(|source| Error::ConfigFile {
            path: path.to_path_buf(),
            source,
        })?;
        let cfg: Configuration =
            serde_json::from_str(&raw).map_err(|source| Error::ConfigFormat {
                path: path.to_path_buf(),
                source,
            })?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self).map_err(|source| Error::ConfigFormat {
            path: path.to_path_buf(),
            source,
        })?;
        fs::write(path, format!("{json}\n")).map_err(|source| Error::ConfigFile {
            path: path.to_path_buf(),
            source,
        })
    }
}
