//! Storage contract and built-in stores for per-shop token records.

pub mod file;
pub mod memory;

pub use file::FileStore;
pub use memory::MemoryStore;

// self
use crate::{
	_prelude::*,
	auth::{ShopId, TokenGrant, TokenRecord},
};

/// Boxed future returned by [`TokenStore`] operations.
pub type StoreFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T, StoreError>> + 'a + Send>>;

/// Storage backend contract for per-shop token records.
///
/// At most one record exists per shop; writes replace the previous record. Implementations must
/// tolerate concurrent access for the same shop with last-write-wins semantics.
pub trait TokenStore
where
	Self: Send + Sync,
{
	/// Loads the record for `shop_id`, failing with [`StoreError::NotFound`] if none exists.
	fn get_token(&self, shop_id: ShopId) -> StoreFuture<'_, TokenRecord>;

	/// Persists `grant` for `shop_id`, stamping `expires_at = issued_at + expires_in`.
	///
	/// Unstamped grants count from the store's clock.
	fn store_token(&self, shop_id: ShopId, grant: TokenGrant) -> StoreFuture<'_, ()>;

	/// Removes the record for `shop_id`. Clearing a missing record succeeds.
	fn clear_token(&self, shop_id: ShopId) -> StoreFuture<'_, ()>;
}

/// Error type produced by [`TokenStore`] implementations.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ThisError)]
pub enum StoreError {
	/// No record exists for the shop.
	#[error("No token record exists for shop {shop_id}.")]
	NotFound {
		/// Shop that was looked up.
		shop_id: ShopId,
	},
	/// Serialization failures surfaced by the backend.
	#[error("Serialization error: {message}.")]
	Serialization {
		/// Human-readable error payload.
		message: String,
	},
	/// The grant's expiry falls outside the representable calendar range.
	#[error("Token expiry for shop {shop_id} is out of range.")]
	ExpiryOutOfRange {
		/// Shop whose grant was rejected.
		shop_id: ShopId,
	},
	/// Backend-level failure for the storage engine.
	#[error("Backend failure: {message}.")]
	Backend {
		/// Human-readable error payload.
		message: String,
	},
}

type RecordMap = HashMap<ShopId, TokenRecord>;

fn get_now(map: &RecordMap, shop_id: ShopId) -> Result<TokenRecord, StoreError> {
	map.get(&shop_id).cloned().ok_or(StoreError::NotFound { shop_id })
}

fn store_now(
	map: &mut RecordMap,
	shop_id: ShopId,
	grant: TokenGrant,
	now: OffsetDateTime,
) -> Result<(), StoreError> {
	map.insert(shop_id, grant.into_record(shop_id, now)?);

	Ok(())
}
