use serde_json::Value;
use std::sync::Arc;

use crate::models::{AccountData, BlockData, BlockHeaderData, BlockView, DynamicGlobalProperties};

/// Value a classifier resolves to within one cycle.
///
/// Payloads sit behind `Arc` so every consumer of a classifier shares the
/// single resolved value.
#[derive(Debug, Clone, PartialEq)]
pub enum ResolvedValue {
	BlockHeader(Arc<BlockHeaderData>),
	Block(Arc<BlockData>),
	Accounts(Arc<AccountData>),
	DynamicGlobalProperties(Arc<DynamicGlobalProperties>),
	BlockView(Arc<BlockView>),
	Custom(Arc<Value>),
}

impl ResolvedValue {
	/// Variant name, used when reporting a mismatch.
	pub fn variant_name(&self) -> &'static str {
		match self {
			Self::BlockHeader(_) => "BlockHeader",
			Self::Block(_) => "Block",
			Self::Accounts(_) => "Accounts",
			Self::DynamicGlobalProperties(_) => "DynamicGlobalProperties",
			Self::BlockView(_) => "BlockView",
			Self::Custom(_) => "Custom",
		}
	}
}

/// Typed extraction of a payload from a [`ResolvedValue`].
pub trait FromResolved: Sized {
	fn from_resolved(value: &ResolvedValue) -> Option<Arc<Self>>;
}

macro_rules! impl_from_resolved {
	($($variant:ident => $ty:ty),* $(,)?) => {
		$(
			impl FromResolved for $ty {
				fn from_resolved(value: &ResolvedValue) -> Option<Arc<Self>> {
					match value {
						ResolvedValue::$variant(inner) => Some(inner.clone()),
						_ => None,
					}
				}
			}

			impl From<$ty> for ResolvedValue {
				fn from(value: $ty) -> Self {
					ResolvedValue::$variant(Arc::new(value))
				}
			}
		)*
	};
}

impl_from_resolved! {
	BlockHeader => BlockHeaderData,
	Block => BlockData,
	Accounts => AccountData,
	DynamicGlobalProperties => DynamicGlobalProperties,
	BlockView => BlockView,
	Custom => Value,
}
