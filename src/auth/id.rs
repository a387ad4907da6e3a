//! Strongly typed Shopee identifiers.

// std
use std::num::ParseIntError;
// self
use crate::_prelude::*;

macro_rules! def_id {
	($name:ident, $doc:literal, $kind:literal) => {
		#[doc = $doc]
		#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
		#[serde(transparent)]
		pub struct $name(u64);
		impl $name {
			/// Wraps a raw Shopee identifier.
			pub const fn new(value: u64) -> Self {
				Self(value)
			}

			/// Returns the raw numeric identifier.
			pub const fn get(self) -> u64 {
				self.0
			}
		}
		impl From<u64> for $name {
			fn from(value: u64) -> Self {
				Self(value)
			}
		}
		impl From<$name> for u64 {
			fn from(value: $name) -> Self {
				value.0
			}
		}
		impl Debug for $name {
			fn fmt(&self, f: &mut Formatter) -> FmtResult {
				write!(f, concat!($kind, "({})"), self.0)
			}
		}
		impl Display for $name {
			fn fmt(&self, f: &mut Formatter) -> FmtResult {
				Display::fmt(&self.0, f)
			}
		}
		impl FromStr for $name {
			type Err = IdentifierError;

			fn from_str(s: &str) -> Result<Self, Self::Err> {
				parse_view($kind, s).map(Self)
			}
		}
	};
}

/// Error returned when parsing an identifier from text fails.
#[derive(Clone, Debug, PartialEq, Eq, ThisError)]
pub enum IdentifierError {
	/// The identifier was empty or whitespace.
	#[error("{kind} identifier cannot be empty.")]
	Empty {
		/// Kind of identifier (shop, partner).
		kind: &'static str,
	},
	/// The identifier is not an unsigned integer.
	#[error("{kind} identifier is not a valid unsigned integer.")]
	NotNumeric {
		/// Kind of identifier (shop, partner).
		kind: &'static str,
		/// Underlying parse failure.
		#[source]
		source: ParseIntError,
	},
}

def_id! { ShopId, "Marketplace-issued identifier of a merchant's shop.", "Shop" }
def_id! { PartnerId, "Marketplace-issued identifier of the partner application.", "Partner" }

fn parse_view(kind: &'static str, view: &str) -> Result<u64, IdentifierError> {
	let trimmed = view.trim();

	if trimmed.is_empty() {
		return Err(IdentifierError::Empty { kind });
	}

	trimmed.parse().map_err(|source| IdentifierError::NotNumeric { kind, source })
}
