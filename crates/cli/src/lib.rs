//! CLI for pgrapher.
//!
//! This crate provides the `pgrapher` command: the `report` subcommand that
//! regroups benchmark results by test and thread count, plus thin wrappers
//! over the other results API calls.

#![warn(missing_docs, rust_2018_idioms)]
#![deny(unsafe_code)]

pub mod alert;
pub mod dashboard;
pub mod logging;

use alert::StderrAlert;
use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand};
use logging::LogFormat;
use pgrapher_benchmarks::io::write_report_json;
use pgrapher_benchmarks::{key_string, BenchmarkRecord, NewRun};
use pgrapher_client::{ClientConfig, GrapherClient};
use std::fmt::Write as _;
use std::path::PathBuf;
use tracing::info;

/// pgrapher CLI.
#[derive(Parser, Debug)]
#[command(name = "pgrapher")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Root URL of the results API (overrides configuration).
    #[arg(long, global = true)]
    pub base_url: Option<String>,

    /// Configuration file (defaults to ./pgrapher.toml when present).
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Log line format.
    #[arg(long, global = true, value_enum, default_value_t = LogFormat::Text)]
    pub log_format: LogFormat,

    /// Verbose output.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Subcommand to run.
    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Fetch benchmark results and log them grouped by test and thread count.
    Report {
        /// Endpoint to fetch (defaults to the configured report path).
        #[arg(short, long)]
        path: Option<String>,

        /// Build the report from a saved response body instead of fetching.
        #[arg(short, long, conflicts_with = "path")]
        input: Option<PathBuf>,

        /// Also write the report as JSON to this file.
        #[arg(short, long)]
        save: Option<PathBuf>,
    },

    /// List machines that have submitted results.
    Machines,

    /// List averaged results, optionally for one machine.
    Tests {
        /// Only show results of this host.
        #[arg(long)]
        host: Option<String>,
    },

    /// Record one benchmark run.
    Submit {
        /// Machine that ran the benchmark.
        #[arg(long)]
        hostname: String,
        /// Test identifier.
        #[arg(long)]
        test: String,
        /// Thread count.
        #[arg(long)]
        threads: i32,
        /// Run number.
        #[arg(long)]
        run: i32,
        /// Measured result.
        #[arg(long)]
        result: f64,
    },

    /// Delete one recorded run.
    Delete {
        /// Run id.
        id: i64,
    },
}

/// Run the CLI with the process arguments.
///
/// # Errors
///
/// Returns an error if configuration cannot be loaded or the command fails.
pub async fn run() -> Result<()> {
    let cli = Cli::parse();
    logging::init(cli.log_format, cli.verbose);

    let mut config =
        ClientConfig::load(cli.config.as_deref()).context("failed to load configuration")?;
    if let Some(base_url) = cli.base_url {
        config.base_url = base_url;
    }

    execute(cli.command, &config).await
}

/// Execute one command against the configured API.
pub async fn execute(command: Commands, config: &ClientConfig) -> Result<()> {
    match command {
        Commands::Report { path, input, save } => {
            let report = match input {
                Some(file) => dashboard::report_from_file(&file)
                    .with_context(|| format!("failed to read {}", file.display()))?,
                None => {
                    let client = GrapherClient::from_config(config)?;
                    let path = path.as_deref().unwrap_or(&config.report_path);
                    dashboard::load_report(&client, path, &StderrAlert)
                        .await
                        .ok_or_else(|| anyhow!("report could not be built"))?
                }
            };

            if let Some(save) = save {
                write_report_json(&report, &save)
                    .with_context(|| format!("failed to write {}", save.display()))?;
                info!(path = %save.display(), "Report saved");
            }

            Ok(())
        }
        Commands::Machines => {
            let client = GrapherClient::from_config(config)?;
            let hostnames = client.machines().await.context("failed to list machines")?;

            if hostnames.is_empty() {
                println!("No machines have submitted results yet.");
            }
            for hostname in hostnames {
                println!("{hostname}");
            }

            Ok(())
        }
        Commands::Tests { host } => {
            let client = GrapherClient::from_config(config)?;
            let records = match host {
                Some(host) => client
                    .tests_for_host(&host)
                    .await
                    .with_context(|| format!("failed to list results of {host}"))?,
                None => client.tests().await.context("failed to list results")?,
            };

            print!("{}", format_records(&records));
            Ok(())
        }
        Commands::Submit {
            hostname,
            test,
            threads,
            run,
            result,
        } => {
            let client = GrapherClient::from_config(config)?;
            let id = client
                .submit_run(&NewRun {
                    hostname,
                    test,
                    threads,
                    run,
                    result,
                })
                .await
                .context("failed to submit run")?;

            println!("Recorded run {id}");
            Ok(())
        }
        Commands::Delete { id } => {
            let client = GrapherClient::from_config(config)?;
            client
                .delete_test(id)
                .await
                .with_context(|| format!("failed to delete run {id}"))?;

            println!("Deleted run {id}");
            Ok(())
        }
    }
}

/// Format result rows as an aligned table.
pub fn format_records(records: &[BenchmarkRecord]) -> String {
    let mut out = String::new();
    if records.is_empty() {
        out.push_str("No results.\n");
        return out;
    }

    let _ = writeln!(
        out,
        "{:<24}  {:>8}  {:>12}  HOSTNAME",
        "TEST", "THREADS", "AVERAGE"
    );
    let _ = writeln!(out, "{:-<24}  {:->8}  {:->12}  {:-<16}", "", "", "", "");

    for record in records {
        let _ = writeln!(
            out,
            "{:<24}  {:>8}  {:>12}  {}",
            record.test.as_deref().unwrap_or("-"),
            record
                .threads
                .as_ref()
                .map(|threads| threads.key())
                .unwrap_or_else(|| "-".to_string()),
            match (record.average(), &record.average_result) {
                (Some(avg), _) => format!("{avg:.3}"),
                (None, Some(other)) => key_string(other).unwrap_or_else(|| "-".to_string()),
                (None, None) => "-".to_string(),
            },
            record.hostname.as_deref().unwrap_or("-"),
        );
    }

    out
}
