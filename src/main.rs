//! Chain observer entry point.
//!
//! # Flow
//! 1. Loads and validates the observer configuration
//! 2. Registers the built-in collectors, providers and the configured filters
//! 3. Polls the node for new head blocks and runs one cycle per block
//! 4. Logs the verdicts and timings of every cycle
//! 5. Handles graceful shutdown on Ctrl+C

pub mod bootstrap;
pub mod models;
pub mod services;
pub mod utils;

use crate::{
	bootstrap::{build_observer, Result},
	models::ObserverConfig,
	services::{
		blockwatcher::{BlockWatcher, PollingBlockSource},
		chain::HttpChainClient,
		observer::{CycleOutcome, CycleReport, FilterId},
	},
	utils::{logging::setup_logging, metrics::gather_metrics, parse_string_to_bytes_size},
};

use clap::Parser;
use dotenvy::dotenv_override;
use std::{
	collections::BTreeMap,
	env::{set_var, var},
	path::PathBuf,
	sync::Arc,
};
use tokio::sync::{mpsc, watch};
use tracing::{debug, error, info};

const REPORT_CHANNEL_CAPACITY: usize = 64;

#[derive(Parser)]
#[command(
	name = "chain-observer",
	about = "Evaluates filters against every new block, fetching the chain data they need once per block.",
	version
)]
struct Cli {
	/// Path to the observer configuration file
	#[arg(long, value_name = "PATH", default_value = "config/observer.json")]
	config: PathBuf,

	/// Node URL, overrides the configuration file
	#[arg(long, value_name = "URL")]
	node_url: Option<String>,

	/// Write logs to file instead of stdout
	#[arg(long)]
	log_file: bool,

	/// Set log level (trace, debug, info, warn, error)
	#[arg(long, value_name = "LEVEL")]
	log_level: Option<String>,

	/// Path to store log files (default: logs/)
	#[arg(long, value_name = "PATH")]
	log_path: Option<String>,

	/// Maximum log file size before rolling (e.g., "1GB", "500MB", "1024KB")
	#[arg(long, value_name = "SIZE", value_parser = parse_string_to_bytes_size)]
	log_max_size: Option<u64>,

	/// Validate the configuration without starting the observer
	#[arg(long)]
	check: bool,
}

impl Cli {
	/// Apply CLI options to environment variables, overriding any existing values
	fn apply_to_env(&self) {
		dotenv_override().ok();

		if self.log_file {
			set_var("LOG_MODE", "file");
		}

		if let Ok(level) = var("RUST_LOG") {
			set_var("LOG_LEVEL", level);
		}

		if let Some(level) = &self.log_level {
			set_var("LOG_LEVEL", level);
			set_var("RUST_LOG", level);
		}

		if let Some(path) = &self.log_path {
			set_var("LOG_DATA_DIR", path);
		}

		if let Some(max_size) = &self.log_max_size {
			set_var("LOG_MAX_SIZE", max_size.to_string());
		}
	}

	fn load_config(&self) -> Result<ObserverConfig> {
		let mut config = ObserverConfig::load_from_path(&self.config)?;
		if let Some(node_url) = &self.node_url {
			config.node_url = node_url.clone();
			config.validate()?;
			config.validate_protocol();
		}
		Ok(config)
	}
}

fn log_report(report: &CycleReport, names: &BTreeMap<FilterId, String>) {
	match &report.outcome {
		CycleOutcome::Completed { verdicts } => {
			let matched: Vec<&str> = verdicts
				.iter()
				.filter(|(_, matched)| **matched)
				.filter_map(|(id, _)| names.get(id).map(String::as_str))
				.collect();
			info!(
				block = report.block_number,
				total_ms = report.timings.total().as_millis() as u64,
				matched = ?matched,
				"cycle completed"
			);
		}
		CycleOutcome::Aborted { reason } => {
			info!(block = report.block_number, reason = %reason, "cycle skipped");
		}
	}
	debug!(block = report.block_number, timings = ?report.timings.entries, "cycle timings");
}

/// Main entry point for the chain observer.
///
/// # Errors
/// Returns an error if the configuration is invalid, the observer cannot be
/// built or a cycle fails fatally.
#[tokio::main]
async fn main() -> Result<()> {
	let cli = Cli::parse();
	cli.apply_to_env();

	setup_logging().unwrap_or_else(|e| {
		error!("Failed to setup logging: {}", e);
	});

	let config = cli.load_config()?;
	if cli.check {
		info!(
			filters = config.filters.len(),
			"configuration {} is valid",
			cli.config.display()
		);
		return Ok(());
	}

	let client = Arc::new(HttpChainClient::new(
		&config.node_url,
		config.request_timeout(),
	)?);
	let (observer, filter_ids) = build_observer(&config, client.clone())?;
	let names: BTreeMap<FilterId, String> = filter_ids
		.iter()
		.filter_map(|id| {
			observer
				.filter(*id)
				.map(|filter| (*id, format!("{}({})", filter.name(), id)))
		})
		.collect();

	let (report_tx, mut report_rx) = mpsc::channel(REPORT_CHANNEL_CAPACITY);
	let (shutdown_tx, shutdown_rx) = watch::channel(false);
	let source = PollingBlockSource::new(client, config.poll_interval());
	let watcher = BlockWatcher::new(Arc::new(observer), source, report_tx);
	let mut watcher_handle = tokio::spawn(watcher.run(shutdown_rx));

	info!(node = %config.node_url, "Observer started. Press Ctrl+C to shutdown");

	let ctrl_c = tokio::signal::ctrl_c();
	tokio::pin!(ctrl_c);
	loop {
		tokio::select! {
			result = &mut ctrl_c => {
				if let Err(e) = result {
					error!("Error waiting for Ctrl+C: {}", e);
				}
				info!("Shutdown signal received, stopping observer...");
				break;
			}
			report = report_rx.recv() => match report {
				Some(report) => log_report(&report, &names),
				None => break,
			},
			result = &mut watcher_handle => {
				result??;
				return Ok(());
			}
		}
	}

	let _ = shutdown_tx.send(true);
	watcher_handle.await??;

	if let Ok(metrics) = gather_metrics() {
		debug!(metrics = %String::from_utf8_lossy(&metrics), "final metrics");
	}
	info!("Shutdown complete");
	Ok(())
}
