mod args;
mod json;
mod tables;
mod text;

use std::env;
use std::io;
use std::str::FromStr;

use anyhow::Context;
use clap::Parser;
use dup_submission_check_core::{analyze_submissions_with_stats, load_submissions_csv};
use tracing_subscriber::filter::{EnvFilter, LevelFilter};

use crate::args::Cli;
use crate::json::{JsonAnalysisStats, JsonFeedStats, map_report, write_json};
use crate::tables::write_tables;
use crate::text::{format_skipped_sources, format_stats, has_skipped_sources};

fn init_tracing() {
    let log_level = env::var("RUST_LOG").unwrap_or(String::from("info"));
    let filter = EnvFilter::builder()
        .with_default_directive(
            LevelFilter::from_str(&log_level)
                .unwrap_or(LevelFilter::INFO)
                .into(),
        )
        .from_env_lossy();
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_ansi(false)
        .with_writer(io::stderr)
        .init();
}

fn main() {
    init_tracing();
    let cli = Cli::parse();

    match run(&cli) {
        Ok(exit_code) => std::process::exit(exit_code),
        Err(err) => {
            eprintln!("Error: {err:#}");
            std::process::exit(1);
        }
    }
}

fn run(cli: &Cli) -> anyhow::Result<i32> {
    let options = cli
        .analysis_options()
        .context("failed to build identifier stoplist")?;
    tracing::info!(
        stoplist_words = options.stoplist.len(),
        compare_identifiers = options.compare_identifiers,
        "options ready"
    );

    let feed = load_submissions_csv(&cli.submissions)?;
    let outcome = analyze_submissions_with_stats(feed.records, &feed.directory, &options);
    let report = &outcome.result;

    if cli.json {
        let mut json = map_report(report, &feed.directory);
        if cli.stats {
            json.stats = Some(JsonAnalysisStats::from(&outcome.stats));
            json.feed_stats = Some(JsonFeedStats::from(&feed.stats));
        }
        write_json(&cli.output, &json)
            .with_context(|| format!("failed to write {}", cli.output.display()))?;
    } else {
        let written = write_tables(&cli.output, report, &feed.directory)?;
        tracing::debug!(files = written.len(), "wrote report tables");
    }

    tracing::info!(
        users = report.users.len(),
        copy_cases = report.copy_edges.len(),
        output = %cli.output.display(),
        "report written"
    );

    if cli.stats {
        eprint!("{}", format_stats(&feed.stats, &outcome.stats));
    }
    if cli.strict && has_skipped_sources(&outcome.stats) {
        if !cli.stats {
            eprint!("{}", format_stats(&feed.stats, &outcome.stats));
        }
        eprint!("{}", format_skipped_sources(report, &feed.directory));
        return Ok(1);
    }

    Ok(0)
}
