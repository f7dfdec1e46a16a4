//! Parsing utilities for CLI arguments and chain payloads.

use byte_unit::Byte;
use chrono::{DateTime, NaiveDateTime, Utc};
use std::str::FromStr;

/// Chain timestamps are UTC without a zone designator, e.g. `2024-05-01T12:00:03`.
const CHAIN_TIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// Parses a human readable size ("1GB", "500MB", "1024KiB") into bytes.
pub fn parse_string_to_bytes_size(s: &str) -> Result<u64, String> {
	match Byte::from_str(s) {
		Ok(byte) => Ok(byte.as_u64()),
		Err(e) => Err(format!("Invalid size format: '{}'. Error: {}", s, e)),
	}
}

/// Normalizes an account name: trimmed and lowercase.
pub fn normalize_account_name(input: &str) -> String {
	input.trim().to_lowercase()
}

/// Parses a chain timestamp. Accepts an optional trailing `Z`.
pub fn parse_chain_time(input: &str) -> Option<DateTime<Utc>> {
	let trimmed = input.trim().trim_end_matches('Z');
	NaiveDateTime::parse_from_str(trimmed, CHAIN_TIME_FORMAT)
		.ok()
		.map(|naive| naive.and_utc())
}
