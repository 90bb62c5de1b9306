use std::env;
use std::path::PathBuf;

use plagcheck_core::{CollectOptions, Configuration};

const HELP_TEXT: &str = concat!(
    "plagcheck (source code plagiarism checker)\n",
    "\n",
    "Usage:\n",
    "  plagcheck [options] [file ...]\n",
    "\n",
    "Input:\n",
    "  -d, --dir <path>             Add a directory of submissions (repeatable)\n",
    "  -f, --ext <list>             Only compare files with these extensions, e.g. c,h\n",
    "  --recurse                    Descend into subdirectories\n",
    "  --include <glob>             Only collect files matching the glob (repeatable)\n",
    "  --exclude <glob>             Skip files matching the glob (repeatable)\n",
    "  --ignore-dir <name>          Add an ignored directory name (repeatable)\n",
    "  --no-gitignore               Do not respect .gitignore rules\n",
    "  --follow-symlinks            Follow symlinks (default: off)\n",
    "  --max-file-size <n>          Skip files larger than n bytes (default: 10485760)\n",
    "  --same-extension             Only compare files sharing an extension\n",
    "\n",
    "Matching:\n",
    "  -c, --config <path>          Load thresholds from a JSON file\n",
    "  --write-config <path>        Write the effective thresholds as JSON and exit\n",
    "  --min-match-length <n>       Distinct tokens a run needs (default: 100)\n",
    "  --max-match-distance <n>     Consecutive mismatches that end a run (default: 2)\n",
    "  --min-common-token <f>       Shared fraction of a run's tokens, 0..1 (default: 0.9)\n",
    "  --min-similarity <f>         Report floor and friend threshold floor, 0..1 (default: 0.5)\n",
    "  --min-friend-similarity <f>  Friend threshold; negative derives it from the data (default: -1)\n",
    "\n",
    "Output:\n",
    "  --summary                    Print statistics and friends only\n",
    "  --detailed                   Print each matching run's tokens\n",
    "  --json                       Output JSON\n",
    "  --limit <n>                  List at most n pairs\n",
    "  --stats                      Include scan stats (JSON) or print to stderr\n",
    "  --strict                     Exit non-zero if any file could not be read\n",
    "  -v, --verbose                Debug logging (PLAGCHECK_LOG overrides)\n",
    "  -V, --version                Show version\n",
    "  -h, --help                   Show help\n",
    "\n",
    "Examples:\n",
    "  plagcheck -d submissions -f c,h --recurse\n",
    "  plagcheck --min-match-length 30 --json a.c b.c c.c\n",
    "  plagcheck -d . --write-config plagcheck.json\n",
    "\n"
);

pub(crate) fn print_help() {
    print!("{HELP_TEXT}");
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub(crate) enum OutputMode {
    #[default]
    Table,
    Summary,
    Detailed,
}

/// Threshold flags given on the command line; applied on top of the config file.
#[derive(Debug, Clone, Default, PartialEq)]
pub(crate) struct ConfigOverrides {
    pub(crate) min_match_length: Option<usize>,
    pub(crate) max_match_distance: Option<usize>,
    pub(crate) min_common_token: Option<f64>,
    pub(crate) min_similarity: Option<f64>,
    pub(crate) min_friend_similarity: Option<f64>,
}

impl ConfigOverrides {
    pub(crate) fn apply(&self, cfg: &mut Configuration) {
        if let Some(v) = self.min_match_length {
            cfg.min_match_length = v;
        }
        if let Some(v) = self.max_match_distance {
            cfg.max_match_distance = v;
        }
        if let Some(v) = self.min_common_token {
            cfg.min_common_token = v;
        }
        if let Some(v) = self.min_similarity {
            cfg.min_similarity = v;
        }
        if let Some(v) = self.min_friend_similarity {
            cfg.min_friend_finder_similarity = v;
        }
    }
}

#[derive(Debug, Clone)]
pub(crate) struct ParsedArgs {
    pub(crate) help: bool,
    pub(crate) version: bool,
    pub(crate) json: bool,
    pub(crate) stats: bool,
    pub(crate) strict: bool,
    pub(crate) verbose: bool,
    pub(crate) mode: OutputMode,
    pub(crate) limit: Option<usize>,
    pub(crate) same_extension: bool,
    pub(crate) config_path: Option<PathBuf>,
    pub(crate) write_config: Option<PathBuf>,
    pub(crate) overrides: ConfigOverrides,
    pub(crate) collect: CollectOptions,
}

fn take_value<'a>(argv: &'a [String], i: usize, name: &str) -> Result<&'a str, String> {
    argv.get(i + 1)
        .map(String::as_str)
        .ok_or_else(|| format!("{name} requires a value"))
}

fn parse_usize(name: &str, raw: &str, min: usize) -> Result<usize, String> {
    let value = raw
        .parse::<usize>()
        .map_err(|_| format!("{name} must be an integer"))?;
    if value < min {
        return Err(format!("{name} must be >= {min}"));
    }
    Ok(value)
}

fn parse_u64(name: &str, raw: &str) -> Result<u64, String> {
    raw.parse::<u64>()
        .map_err(|_| format!("{name} must be an integer"))
}

fn parse_f64(name: &str, raw: &str) -> Result<f64, String> {
    let value = raw
        .parse::<f64>()
        .map_err(|_| format!("{name} must be a number"))?;
    if !value.is_finite() {
        return Err(format!("{name} must be a finite number"));
    }
    Ok(value)
}

fn parse_fraction(name: &str, raw: &str, allow_zero: bool) -> Result<f64, String> {
    let value = parse_f64(name, raw)?;
    let in_range = if allow_zero {
        (0.0..=1.0).contains(&value)
    } else {
        value > 0.0 && value <= 1.0
    };
    if !in_range {
        let lower = if allow_zero { "0" } else { "(0" };
        return Err(format!("{name} must be within {lower}..1"));
    }
    Ok(value)
}

fn push_extensions(extensions: &mut Vec<String>, raw: &str) {
    extensions.extend(
        raw.split(',')
            .map(|ext| ext.trim().trim_start_matches('.'))
            .filter(|ext| !ext.is_empty())
            .map(str::to_string),
    );
}

pub(crate) fn parse_args(argv: &[String]) -> Result<ParsedArgs, String> {
    let mut roots: Vec<PathBuf> = Vec::new();
    let mut files: Vec<PathBuf> = Vec::new();
    let mut extensions: Vec<String> = Vec::new();
    let mut include: Vec<String> = Vec::new();
    let mut exclude: Vec<String> = Vec::new();
    let mut ignore_dirs: Vec<String> = Vec::new();
    let mut recurse = false;
    let mut respect_gitignore = true;
    let mut follow_symlinks = false;
    let mut max_file_size: Option<u64> = None;
    let mut help = false;
    let mut version = false;
    let mut json = false;
    let mut stats = false;
    let mut strict = false;
    let mut verbose = false;
    let mut summary = false;
    let mut detailed = false;
    let mut limit: Option<usize> = None;
    let mut same_extension = false;
    let mut config_path: Option<PathBuf> = None;
    let mut write_config: Option<PathBuf> = None;
    let mut overrides = ConfigOverrides::default();

    let mut i = 0;
    while i < argv.len() {
        let arg = argv[i].as_str();
        if arg == "--" {
            files.extend(argv[(i + 1)..].iter().map(PathBuf::from));
            break;
        }
        match arg {
            "-h" | "--help" => help = true,
            "-V" | "--version" => version = true,
            "-v" | "--verbose" => verbose = true,
            "--json" => json = true,
            "--stats" => stats = true,
            "--strict" => strict = true,
            "--summary" => summary = true,
            "--detailed" => detailed = true,
            "--recurse" => recurse = true,
            "--same-extension" => same_extension = true,
            "--no-gitignore" => respect_gitignore = false,
            "--follow-symlinks" => follow_symlinks = true,
            "-d" | "--dir" => {
                roots.push(PathBuf::from(take_value(argv, i, arg)?));
                i += 1;
            }
            "-f" | "--ext" => {
                push_extensions(&mut extensions, take_value(argv, i, arg)?);
                i += 1;
            }
            "--include" => {
                include.push(take_value(argv, i, arg)?.to_string());
                i += 1;
            }
            "--exclude" => {
                exclude.push(take_value(argv, i, arg)?.to_string());
                i += 1;
            }
            "--ignore-dir" => {
                ignore_dirs.push(take_value(argv, i, arg)?.to_string());
                i += 1;
            }
            "--max-file-size" => {
                max_file_size = Some(parse_u64(arg, take_value(argv, i, arg)?)?);
                i += 1;
            }
            "-c" | "--config" => {
                config_path = Some(PathBuf::from(take_value(argv, i, arg)?));
                i += 1;
            }
            "--write-config" => {
                write_config = Some(PathBuf::from(take_value(argv, i, arg)?));
                i += 1;
            }
            "--limit" => {
                limit = Some(parse_usize(arg, take_value(argv, i, arg)?, 1)?);
                i += 1;
            }
            "--min-match-length" => {
                overrides.min_match_length = Some(parse_usize(arg, take_value(argv, i, arg)?, 1)?);
                i += 1;
            }
            "--max-match-distance" => {
                overrides.max_match_distance =
                    Some(parse_usize(arg, take_value(argv, i, arg)?, 1)?);
                i += 1;
            }
            "--min-common-token" => {
                overrides.min_common_token =
                    Some(parse_fraction(arg, take_value(argv, i, arg)?, false)?);
                i += 1;
            }
            "--min-similarity" => {
                overrides.min_similarity =
                    Some(parse_fraction(arg, take_value(argv, i, arg)?, true)?);
                i += 1;
            }
            "--min-friend-similarity" => {
                overrides.min_friend_similarity = Some(parse_f64(arg, take_value(argv, i, arg)?)?);
                i += 1;
            }
            _ if arg.starts_with('-') && arg.len() > 1 => {
                return Err(format!("Unknown option: {arg}"));
            }
            _ => files.push(PathBuf::from(arg)),
        }
        i += 1;
    }

    if summary && detailed {
        return Err("--summary conflicts with --detailed".to_string());
    }
    let mode = if summary {
        OutputMode::Summary
    } else if detailed {
        OutputMode::Detailed
    } else {
        OutputMode::Table
    };

    if roots.is_empty() && files.is_empty() && !help && !version {
        roots.push(env::current_dir().map_err(|e| format!("failed to get cwd: {e}"))?);
    }

    let mut collect = CollectOptions {
        roots,
        files,
        extensions,
        recurse,
        include,
        exclude,
        respect_gitignore,
        follow_symlinks,
        ..CollectOptions::default()
    };
    if let Some(max_file_size) = max_file_size {
        collect.max_file_size = Some(max_file_size);
    }
    collect.ignore_dirs.extend(ignore_dirs);

    Ok(ParsedArgs {
        help,
        version,
        json,
        stats,
        strict,
        verbose,
        mode,
        limit,
        same_extension,
        config_path,
        write_config,
        overrides,
        collect,
    })
}
