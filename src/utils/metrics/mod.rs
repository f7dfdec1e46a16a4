//! Prometheus metrics for block cycles.
//!
//! All metrics are registered in the global [`REGISTRY`] and can be rendered in
//! the text exposition format with [`gather_metrics`].

use lazy_static::lazy_static;
use prometheus::{
	Encoder, Histogram, HistogramOpts, HistogramVec, IntCounterVec, Opts, Registry, TextEncoder,
};

lazy_static! {
	/// Global Prometheus registry.
	pub static ref REGISTRY: Registry = Registry::new();

	/// Number of block cycles by outcome (`completed` or `aborted`).
	pub static ref CYCLES_TOTAL: IntCounterVec = {
		let counter = IntCounterVec::new(
			Opts::new("observer_cycles_total", "Number of block cycles by outcome"),
			&["outcome"],
		).unwrap();
		REGISTRY.register(Box::new(counter.clone())).unwrap();
		counter
	};

	/// Wall time of a full block cycle in seconds.
	pub static ref CYCLE_DURATION: Histogram = {
		let histogram = Histogram::with_opts(HistogramOpts::new(
			"observer_cycle_duration_seconds",
			"Wall time of a block cycle",
		)).unwrap();
		REGISTRY.register(Box::new(histogram.clone())).unwrap();
		histogram
	};

	/// Time spent in each collector or provider.
	pub static ref HANDLER_DURATION: HistogramVec = {
		let histogram = HistogramVec::new(
			HistogramOpts::new(
				"observer_handler_duration_seconds",
				"Time spent resolving a classifier, by handler",
			),
			&["handler"],
		).unwrap();
		REGISTRY.register(Box::new(histogram.clone())).unwrap();
		histogram
	};

	/// Number of positive verdicts per filter.
	pub static ref FILTER_MATCHES_TOTAL: IntCounterVec = {
		let counter = IntCounterVec::new(
			Opts::new("observer_filter_matches_total", "Number of matches by filter"),
			&["filter"],
		).unwrap();
		REGISTRY.register(Box::new(counter.clone())).unwrap();
		counter
	};
}

/// Gathers all metrics and encodes them in the text format.
pub fn gather_metrics() -> Result<Vec<u8>, Box<dyn std::error::Error>> {
	let encoder = TextEncoder::new();
	let mut buffer = Vec::new();
	encoder.encode(&REGISTRY.gather(), &mut buffer)?;
	Ok(buffer)
}
