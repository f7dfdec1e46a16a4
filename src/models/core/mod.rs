//! Core resolution models.
//!
//! - `classifier`: classifier kinds and identities
//! - `value`: values a classifier resolves to

mod classifier;
mod value;

pub use classifier::{format_chain, ClassifierIdentity, ClassifierKind};
pub use value::{FromResolved, ResolvedValue};
