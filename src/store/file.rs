//! Simple file-backed [`TokenStore`] for single-process deployments.

// std
use std::{
	fs::{self, File},
	io::Write,
	path::{Path, PathBuf},
};
// self
use crate::{
	_prelude::*,
	auth::{ShopId, TokenGrant, TokenRecord},
	clock::{self, Clock},
	store::{self, RecordMap, StoreError, StoreFuture, TokenStore},
};

/// Persists token records to a JSON file after each mutation.
#[derive(Clone)]
pub struct FileStore {
	path: PathBuf,
	inner: Arc<RwLock<RecordMap>>,
	clock: Arc<dyn Clock>,
}
impl FileStore {
	/// Opens (or creates) a store at the provided path, eagerly loading existing data.
	pub fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
		let path = path.into();

		Self::ensure_parent_exists(&path)?;

		let snapshot = Self::load_snapshot(&path)?;

		Ok(Self { path, inner: Arc::new(RwLock::new(snapshot)), clock: clock::system() })
	}

	/// Replaces the clock used to stamp new records.
	pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
		self.clock = clock;

		self
	}

	/// Location of the JSON snapshot.
	pub fn path(&self) -> &Path {
		&self.path
	}

	fn load_snapshot(path: &Path) -> Result<RecordMap, StoreError> {
		if !path.exists() {
			return Ok(RecordMap::new());
		}

		let bytes = fs::read(path).map_err(|e| StoreError::Backend {
			message: format!("Failed to read {}: {e}", path.display()),
		})?;

		if bytes.is_empty() {
			return Ok(RecordMap::new());
		}

		let records: Vec<TokenRecord> =
			serde_json::from_slice(&bytes).map_err(|e| StoreError::Serialization {
				message: format!("Failed to parse {}: {e}", path.display()),
			})?;

		Ok(records.into_iter().map(|record| (record.shop_id, record)).collect())
	}

	fn ensure_parent_exists(path: &Path) -> Result<(), StoreError> {
		if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
			fs::create_dir_all(parent).map_err(|e| StoreError::Backend {
				message: format!("Failed to create store directory {}: {e}", parent.display()),
			})?;
		}

		Ok(())
	}

	fn persist_locked(&self, contents: &RecordMap) -> Result<(), StoreError> {
		Self::ensure_parent_exists(&self.path)?;

		let mut snapshot: Vec<&TokenRecord> = contents.values().collect();

		snapshot.sort_by_key(|record| record.shop_id);

		let serialized =
			serde_json::to_vec_pretty(&snapshot).map_err(|e| StoreError::Serialization {
				message: format!("Failed to serialize store snapshot: {e}"),
			})?;
		let mut tmp_path = self.path.clone();

		tmp_path.set_extension("tmp");

		{
			let mut file = File::create(&tmp_path).map_err(|e| StoreError::Backend {
				message: format!("Failed to create {}: {e}", tmp_path.display()),
			})?;

			file.write_all(&serialized).map_err(|e| StoreError::Backend {
				message: format!("Failed to write {}: {e}", tmp_path.display()),
			})?;
			file.sync_all().map_err(|e| StoreError::Backend {
				message: format!("Failed to sync {}: {e}", tmp_path.display()),
			})?;
		}

		fs::rename(&tmp_path, &self.path).map_err(|e| StoreError::Backend {
			message: format!("Failed to replace {}: {e}", self.path.display()),
		})
	}
}
impl Debug for FileStore {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("FileStore")
			.field("path", &self.path)
			.field("records", &self.inner.read().len())
			.finish()
	}
}
impl TokenStore for FileStore {
	fn get_token(&self, shop_id: ShopId) -> StoreFuture<'_, TokenRecord> {
		Box::pin(async move { store::get_now(&self.inner.read(), shop_id) })
	}

	fn store_token(&self, shop_id: ShopId, grant: TokenGrant) -> StoreFuture<'_, ()> {
		let now = self.clock.now();

		Box::pin(async move {
			let mut guard = self.inner.write();
			let previous = guard.get(&shop_id).cloned();

			store::store_now(&mut guard, shop_id, grant, now)?;

			if let Err(e) = self.persist_locked(&guard) {
				match previous {
					Some(record) => guard.insert(shop_id, record),
					None => guard.remove(&shop_id),
				};

				return Err(e);
			}

			Ok(())
		})
	}

	fn clear_token(&self, shop_id: ShopId) -> StoreFuture<'_, ()> {
		Box::pin(async move {
			let mut guard = self.inner.write();

			if let Some(removed) = guard.remove(&shop_id) {
				if let Err(e) = self.persist_locked(&guard) {
					guard.insert(shop_id, removed);

					return Err(e);
				}
			}

			Ok(())
		})
	}
}

#[cfg(test)]
mod tests {
	// std
	use std::{env, process};
	// crates.io
	use time::macros;
	use tokio::runtime::Runtime;
	// self
	use super::*;
	use crate::clock::ManualClock;

	fn temp_path(label: &str) -> PathBuf {
		let unique = format!(
			"shopee_auth_file_store_{label}_{}_{}.json",
			process::id(),
			OffsetDateTime::now_utc().unix_timestamp_nanos(),
		);

		env::temp_dir().join(unique)
	}

	#[test]
	fn save_and_reload_round_trip() {
		let path = temp_path("reload");
		let clock = ManualClock::at(macros::datetime!(2025-06-01 12:00 UTC));
		let store = FileStore::open(&path)
			.expect("Failed to open file store snapshot.")
			.with_clock(Arc::new(clock));
		let shop_id = ShopId::new(123_456);
		let rt = Runtime::new().expect("Failed to build Tokio runtime for file store test.");

		rt.block_on(store.store_token(
			shop_id,
			TokenGrant::new("access-token", "refresh-token", Duration::hours(4)),
		))
		.expect("Failed to store fixture record in file store.");
		drop(store);

		let reopened = FileStore::open(&path).expect("Failed to reopen file store snapshot.");
		let fetched = rt
			.block_on(reopened.get_token(shop_id))
			.expect("File store lost record after reopen.");

		assert_eq!(fetched.access_token.expose(), "access-token");
		assert_eq!(fetched.refresh_token.expose(), "refresh-token");
		assert_eq!(fetched.expires_at, macros::datetime!(2025-06-01 16:00 UTC));

		fs::remove_file(&path).unwrap_or_else(|e| {
			panic!("Failed to remove temporary file store snapshot {}: {e}", path.display())
		});
	}

	#[test]
	fn clear_persists_and_is_idempotent() {
		let path = temp_path("clear");
		let store = FileStore::open(&path).expect("Failed to open file store snapshot.");
		let shop_id = ShopId::new(77);
		let rt = Runtime::new().expect("Failed to build Tokio runtime for file store test.");

		rt.block_on(store.store_token(shop_id, TokenGrant::new("a", "r", Duration::hours(1))))
			.expect("Failed to store fixture record in file store.");
		rt.block_on(store.clear_token(shop_id)).expect("First clear should succeed.");
		rt.block_on(store.clear_token(shop_id)).expect("Second clear should also succeed.");

		let reopened = FileStore::open(&path).expect("Failed to reopen file store snapshot.");
		let err = rt
			.block_on(reopened.get_token(shop_id))
			.expect_err("Cleared record must stay cleared after reopen.");

		assert_eq!(err, StoreError::NotFound { shop_id });

		fs::remove_file(&path).unwrap_or_else(|e| {
			panic!("Failed to remove temporary file store snapshot {}: {e}", path.display())
		});
	}

	#[test]
	fn failed_clear_keeps_the_record() {
		let dir = temp_path("clear_rollback");
		let store = FileStore::open(dir.join("tokens.json"))
			.expect("Failed to open file store snapshot.");
		let shop_id = ShopId::new(78);
		let rt = Runtime::new().expect("Failed to build Tokio runtime for file store test.");

		rt.block_on(store.store_token(shop_id, TokenGrant::new("a", "r", Duration::hours(1))))
			.expect("Failed to store fixture record in file store.");
		fs::remove_dir_all(&dir).expect("Failed to remove the store directory.");
		File::create(&dir).expect("Failed to put a file where the store directory was.");

		let err = rt
			.block_on(store.clear_token(shop_id))
			.expect_err("Clearing should fail when the snapshot cannot be written.");

		assert!(matches!(err, StoreError::Backend { .. }));
		assert_eq!(
			rt.block_on(store.get_token(shop_id))
				.expect("Record should survive the failed clear.")
				.access_token
				.expose(),
			"a"
		);

		fs::remove_file(&dir).unwrap_or_else(|e| {
			panic!("Failed to remove temporary blocker file {}: {e}", dir.display())
		});
	}

	#[test]
	fn empty_file_opens_as_empty_store() {
		let path = temp_path("empty");

		File::create(&path).expect("Failed to create empty snapshot file.");

		let store = FileStore::open(&path).expect("Empty snapshot should open.");

		assert_eq!(store.inner.read().len(), 0);

		fs::remove_file(&path).unwrap_or_else(|e| {
			panic!("Failed to remove temporary file store snapshot {}: {e}", path.display())
		});
	}
}
