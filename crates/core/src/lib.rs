mod compare;
mod config;
mod corpus;
mod error;
mod report;
mod scan;
mod submission;
mod tokenize;
mod types;
mod util;

pub use compare::{MatchRun, PairMatcher, PairResult};

pub use config::{
    Configuration, DEFAULT_MAX_MATCH_DISTANCE, DEFAULT_MIN_COMMON_TOKEN, DEFAULT_MIN_MATCH_LENGTH,
    DEFAULT_MIN_SIMILARITY,
};

pub use corpus::{CompareRunOptions, NoProgress, ProgressReporter, check, compare_all, pair_indices};

pub use error::{ConfigError, Error, Result};

pub use report::{
    AUTO_THRESHOLD_OFFSET, CorpusReport, CorpusStatistics, Distribution, FriendFinder, FriendOf,
    RankedResults, aggregate, generate_report, generate_report_with_stats,
};

pub use scan::{collect_files, load_submissions};

pub use submission::Submission;

pub use tokenize::{
    DEFAULT_SYMBOLS, Language, LanguageRules, Token, TokenBuilder, Tokenizer, split_with,
};

pub use types::{
    CollectOptions, DEFAULT_MAX_FILE_SIZE_BYTES, ScanOutcome, ScanStats, default_ignore_dirs,
};
