//! Thread-safe in-memory [`TokenStore`] implementation for local development and tests.

// self
use crate::{
	_prelude::*,
	auth::{ShopId, TokenGrant, TokenRecord},
	clock::{self, Clock},
	store::{self, RecordMap, StoreFuture, TokenStore},
};

/// Thread-safe storage backend that keeps records in-process for tests and demos.
#[derive(Clone)]
pub struct MemoryStore {
	map: Arc<RwLock<RecordMap>>,
	clock: Arc<dyn Clock>,
}
impl MemoryStore {
	/// Creates an empty store that stamps records with `clock`.
	pub fn with_clock(clock: Arc<dyn Clock>) -> Self {
		Self { map: Default::default(), clock }
	}

	/// Number of shops with a stored record.
	pub fn len(&self) -> usize {
		self.map.read().len()
	}

	/// Returns `true` when no shop has a stored record.
	pub fn is_empty(&self) -> bool {
		self.map.read().is_empty()
	}
}
impl Default for MemoryStore {
	fn default() -> Self {
		Self::with_clock(clock::system())
	}
}
impl Debug for MemoryStore {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("MemoryStore").field("records", &self.len()).finish()
	}
}
impl TokenStore for MemoryStore {
	fn get_token(&self, shop_id: ShopId) -> StoreFuture<'_, TokenRecord> {
		let map = self.map.clone();

		Box::pin(async move { store::get_now(&map.read(), shop_id) })
	}

	fn store_token(&self, shop_id: ShopId, grant: TokenGrant) -> StoreFuture<'_, ()> {
		let map = self.map.clone();
		let now = self.clock.now();

		Box::pin(async move { store::store_now(&mut map.write(), shop_id, grant, now) })
	}

	fn clear_token(&self, shop_id: ShopId) -> StoreFuture<'_, ()> {
		let map = self.map.clone();

		Box::pin(async move {
			map.write().remove(&shop_id);

			Ok(())
		})
	}
}
