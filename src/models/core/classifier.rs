//! Classifier identities, the addressing scheme of the resolver.
//!
//! A classifier names one kind of derivable chain data. Parameterized kinds
//! (one entry per tracked account, for instance) carry their option value in
//! the identity; unparameterized kinds always use empty options.

use serde::Serialize;
use std::fmt;

/// Kind of data a classifier resolves to.
///
/// Each kind is served by exactly one registered collector or provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum ClassifierKind {
	/// Header of the block that triggered the cycle
	BlockHeader,
	/// Transactions of the block that triggered the cycle
	Block,
	/// Tracked accounts, parameterized by account name
	Account,
	/// Chain-wide dynamic properties
	DynamicGlobalProperties,
	/// Block header and transactions combined
	BlockView,
	/// Kind defined outside of this crate
	Custom(&'static str),
}

impl ClassifierKind {
	/// Stable name of the kind, used in logs and error messages.
	pub fn name(&self) -> &'static str {
		match self {
			Self::BlockHeader => "block_header_classifier",
			Self::Block => "block_classifier",
			Self::Account => "account_classifier",
			Self::DynamicGlobalProperties => "dynamic_global_properties_classifier",
			Self::BlockView => "block_view_classifier",
			Self::Custom(name) => name,
		}
	}

	/// Whether identities of this kind may carry options.
	pub fn is_parameterized(&self) -> bool {
		matches!(self, Self::Account | Self::Custom(_))
	}
}

impl fmt::Display for ClassifierKind {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.name())
	}
}

/// Identity of a classifier: its kind plus its serialized options.
///
/// Two identities are equal iff both the kind and the options are equal.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct ClassifierIdentity {
	kind: ClassifierKind,
	options: Option<String>,
}

impl ClassifierIdentity {
	/// Identity without options.
	pub fn new(kind: ClassifierKind) -> Self {
		Self {
			kind,
			options: None,
		}
	}

	/// Identity carrying an option value.
	pub fn with_options(kind: ClassifierKind, options: impl Into<String>) -> Self {
		Self {
			kind,
			options: Some(options.into()),
		}
	}

	pub fn block_header() -> Self {
		Self::new(ClassifierKind::BlockHeader)
	}

	pub fn block() -> Self {
		Self::new(ClassifierKind::Block)
	}

	pub fn block_view() -> Self {
		Self::new(ClassifierKind::BlockView)
	}

	pub fn dynamic_global_properties() -> Self {
		Self::new(ClassifierKind::DynamicGlobalProperties)
	}

	/// Identity tracking a single account.
	pub fn account(name: &str) -> Self {
		Self::with_options(
			ClassifierKind::Account,
			crate::utils::normalize_account_name(name),
		)
	}

	pub fn kind(&self) -> ClassifierKind {
		self.kind
	}

	pub fn options(&self) -> Option<&str> {
		self.options.as_deref()
	}

	/// The unparameterized identity of the same kind.
	pub fn base(&self) -> Self {
		Self::new(self.kind)
	}

	pub fn is_base(&self) -> bool {
		self.options.is_none()
	}
}

impl fmt::Display for ClassifierIdentity {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match &self.options {
			Some(options) => write!(f, "{}[{}]", self.kind, options),
			None => write!(f, "{}", self.kind),
		}
	}
}

/// Renders a chain of identities as `a -> b -> a`.
pub fn format_chain(chain: &[ClassifierIdentity]) -> String {
	chain
		.iter()
		.map(ToString::to_string)
		.collect::<Vec<_>>()
		.join(" -> ")
}
