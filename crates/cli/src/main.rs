mod args;
mod json;
mod progress;
mod text;

use std::env;
use std::io;

use plagcheck_core::{CompareRunOptions, Configuration};
use tracing_subscriber::EnvFilter;

use crate::args::{OutputMode, ParsedArgs, parse_args, print_help};
use crate::json::{JsonScanStats, map_report, write_json};
use crate::progress::BarProgress;
use crate::text::{format_scan_stats, format_text_report};

const LOG_ENV: &str = "PLAGCHECK_LOG";

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(default));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr)
        .try_init();
}

fn main() {
    let args: Vec<String> = env::args().skip(1).collect();
    let parsed = match parse_args(&args) {
        Ok(parsed) => parsed,
        Err(message) => {
            eprintln!("Error: {message}\n");
            print_help();
            std::process::exit(2);
        }
    };
    if parsed.help {
        print_help();
        return;
    }
    if parsed.version {
        println!("plagcheck {}", env!("CARGO_PKG_VERSION"));
        return;
    }

    init_tracing(parsed.verbose);

    match run(&parsed) {
        Ok(exit_code) => std::process::exit(exit_code),
        Err(err) => {
            eprintln!("Error: {err}");
            std::process::exit(1);
        }
    }
}

/// Defaults, then the config file, then command-line overrides.
fn effective_config(parsed: &ParsedArgs) -> plagcheck_core::Result<Configuration> {
    let mut cfg = match &parsed.config_path {
        Some(path) => Configuration::load(path)?,
        None => Configuration::default(),
    };
    parsed.overrides.apply(&mut cfg);
    cfg.validate()?;
    tracing::debug!(?cfg, "effective configuration");
    Ok(cfg)
}

fn run(parsed: &ParsedArgs) -> plagcheck_core::Result<i32> {
    let cfg = effective_config(parsed)?;

    if let Some(path) = &parsed.write_config {
        cfg.save(path)?;
        eprintln!("wrote {}", path.display());
        return Ok(0);
    }

    let run = CompareRunOptions {
        same_extension_only: parsed.same_extension,
        ..CompareRunOptions::default()
    };
    let progress = if parsed.json {
        BarProgress::hidden()
    } else {
        BarProgress::new()
    };
    let outcome =
        plagcheck_core::generate_report_with_stats(&parsed.collect, &cfg, &run, &progress)?;
    let report = outcome.result;
    let scan_stats = outcome.stats;

    if parsed.json {
        let mut json = map_report(
            &report,
            &cfg,
            parsed.limit,
            parsed.mode == OutputMode::Detailed,
        );
        if parsed.mode == OutputMode::Summary {
            json.results.clear();
        }
        if parsed.stats {
            json.scan_stats = Some(JsonScanStats::from(&scan_stats));
        }
        write_json(&json)?;
    } else {
        print!(
            "{}",
            format_text_report(&report, &cfg, parsed.mode, parsed.limit)
        );
        if parsed.stats {
            eprint!("{}", format_scan_stats(&scan_stats));
        }
    }

    if parsed.strict && scan_stats.has_skips() {
        if !parsed.stats || parsed.json {
            eprint!("{}", format_scan_stats(&scan_stats));
        }
        return Ok(1);
    }

    Ok(0)
}
