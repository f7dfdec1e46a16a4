//! Logging setup driven by environment variables.
//!
//! - `LOG_MODE`: `stdout` (default) or `file`
//! - `LOG_LEVEL`: `trace`, `debug`, `info` (default), `warn` or `error`
//! - `LOG_DATA_DIR`: directory for log files, defaults to `logs/`
//! - `LOG_MAX_SIZE`: size in bytes after which a new file is started, defaults to 1GB

pub mod error;

use chrono::Utc;
use lazy_static::lazy_static;
use regex::Regex;
use std::{
	env,
	fs::{create_dir_all, metadata},
	path::Path,
};
use tracing::{info, Event, Subscriber};
use tracing_subscriber::{
	filter::EnvFilter,
	fmt::{self, format::Writer, FmtContext, FormatEvent, FormatFields},
	prelude::*,
	registry::LookupSpan,
};

const DEFAULT_LOG_MAX_SIZE: u64 = 1_073_741_824;
const LOG_FILE_NAME: &str = "observer.log";

lazy_static! {
	static ref ANSI_ESCAPE: Regex = Regex::new(r"\x1b\[[0-9;]*[a-zA-Z]").expect("valid regex");
}

/// Where log events are written to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogMode {
	Stdout,
	File,
}

/// Logging settings resolved from the environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogSettings {
	pub mode: LogMode,
	pub level: tracing::Level,
	pub data_dir: String,
	pub max_size: u64,
}

impl LogSettings {
	/// Reads the settings from the process environment.
	///
	/// Unknown levels fall back to `info` and an unparsable `LOG_MAX_SIZE`
	/// falls back to the default size.
	pub fn from_env() -> Self {
		let mode = match env::var("LOG_MODE").map(|m| m.to_lowercase()) {
			Ok(mode) if mode == "file" => LogMode::File,
			_ => LogMode::Stdout,
		};

		let level = match env::var("LOG_LEVEL")
			.unwrap_or_default()
			.to_lowercase()
			.as_str()
		{
			"trace" => tracing::Level::TRACE,
			"debug" => tracing::Level::DEBUG,
			"warn" => tracing::Level::WARN,
			"error" => tracing::Level::ERROR,
			_ => tracing::Level::INFO,
		};

		let data_dir = env::var("LOG_DATA_DIR").unwrap_or_else(|_| "logs/".to_string());
		let max_size = env::var("LOG_MAX_SIZE")
			.ok()
			.and_then(|s| s.parse::<u64>().ok())
			.unwrap_or(DEFAULT_LOG_MAX_SIZE);

		Self {
			mode,
			level,
			data_dir: format!("{}/", data_dir.trim_end_matches('/')),
			max_size,
		}
	}
}

/// Formatter wrapper removing ANSI escape codes, used for file output.
struct StripAnsiFormatter<T> {
	inner: T,
}

impl<S, N, T> FormatEvent<S, N> for StripAnsiFormatter<T>
where
	S: Subscriber + for<'a> LookupSpan<'a>,
	N: for<'a> FormatFields<'a> + 'static,
	T: FormatEvent<S, N>,
{
	fn format_event(
		&self,
		ctx: &FmtContext<'_, S, N>,
		mut writer: Writer<'_>,
		event: &Event<'_>,
	) -> std::fmt::Result {
		let mut buf = String::new();
		self.inner.format_event(ctx, Writer::new(&mut buf), event)?;
		write!(writer, "{}", strip_ansi_escapes(&buf))
	}
}

fn strip_ansi_escapes(s: &str) -> String {
	ANSI_ESCAPE.replace_all(s, "").to_string()
}

/// Path of a rolled log file: `<base>-<date>.<index>.log`.
pub fn compute_rolled_file_path(base_file_path: &str, date_str: &str, index: u32) -> String {
	let trimmed = base_file_path
		.strip_suffix(".log")
		.unwrap_or(base_file_path);
	format!("{}-{}.{}.log", trimmed, date_str, index)
}

/// Returns the first rolled path at or after `file_path` that is below `max_size`.
pub fn space_based_rolling(
	file_path: &str,
	base_file_path: &str,
	date_str: &str,
	max_size: u64,
) -> String {
	let mut final_path = file_path.to_string();
	let mut index = 1;
	while let Ok(meta) = metadata(&final_path) {
		if meta.len() <= max_size {
			break;
		}
		index += 1;
		final_path = compute_rolled_file_path(base_file_path, date_str, index);
	}
	final_path
}

fn create_log_format(with_ansi: bool) -> fmt::format::Format<fmt::format::Compact> {
	fmt::format()
		.with_level(true)
		.with_target(true)
		.with_thread_ids(false)
		.with_thread_names(false)
		.with_ansi(with_ansi)
		.compact()
}

/// Installs the global tracing subscriber according to [`LogSettings::from_env`].
pub fn setup_logging() -> Result<(), Box<dyn std::error::Error>> {
	let settings = LogSettings::from_env();
	let subscriber =
		tracing_subscriber::registry().with(EnvFilter::new(settings.level.to_string()));

	match settings.mode {
		LogMode::File => {
			let date_str = Utc::now().format("%Y-%m-%d").to_string();
			let base_file_path = format!("{}{}", settings.data_dir, LOG_FILE_NAME);
			let dated_path = compute_rolled_file_path(&base_file_path, &date_str, 1);

			if let Some(parent) = Path::new(&dated_path).parent() {
				create_dir_all(parent)?;
			}

			let final_path =
				space_based_rolling(&dated_path, &base_file_path, &date_str, settings.max_size);
			let final_path = Path::new(&final_path);
			let appender = tracing_appender::rolling::never(
				final_path.parent().unwrap_or(Path::new(".")),
				final_path.file_name().unwrap_or_default(),
			);

			subscriber
				.with(
					fmt::layer()
						.event_format(StripAnsiFormatter {
							inner: create_log_format(false),
						})
						.with_writer(appender)
						.fmt_fields(fmt::format::PrettyFields::new()),
				)
				.try_init()?;
		}
		LogMode::Stdout => {
			subscriber
				.with(
					fmt::layer()
						.event_format(create_log_format(true))
						.fmt_fields(fmt::format::PrettyFields::new()),
				)
				.try_init()?;
		}
	}

	info!(
		"Logging configured (mode: {:?}, level: {})",
		settings.mode, settings.level
	);
	Ok(())
}
