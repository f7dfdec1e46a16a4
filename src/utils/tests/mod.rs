//! Test helper utilities
//!
//! - `builders`: Test helper utilities for creating test instances of models

pub mod builders {
	pub mod account;
	pub mod block;
}

pub use builders::*;
