//! Signed Shopee Open Platform authorization for Rust services: build shop-authorization URLs,
//! exchange codes, persist per-shop tokens, and hand out access tokens that refresh themselves
//! before they expire.

#![deny(clippy::all, missing_docs)]

pub mod api;
pub mod auth;
pub mod client;
pub mod clock;
pub mod config;
pub mod error;
pub mod http;
pub mod obs;
pub mod sign;
pub mod store;
#[cfg(all(any(test, feature = "test"), feature = "reqwest"))]
pub mod _preludet {
	//! Convenience re-exports and helpers for tests; enabled via `cfg(test)` or the `test` crate
	//! feature.

	pub use crate::_prelude::*;

	// self
	use crate::{
		auth::PartnerId,
		client::ReqwestAuthClient,
		clock::{Clock, ManualClock},
		config::ShopeeConfig,
		store::{MemoryStore, TokenStore},
	};

	/// Partner identifier used by test fixtures.
	pub const TEST_PARTNER_ID: u64 = 2_001_887;
	/// Partner key used by test fixtures.
	pub const TEST_PARTNER_KEY: &str = "shpk-test-partner-key";

	/// Builds a config pointing at `base_url` with the test partner credentials.
	pub fn test_config(base_url: &str) -> ShopeeConfig {
		ShopeeConfig::builder()
			.api_base_url(Url::parse(base_url).expect("Failed to parse test API base URL."))
			.partner_id(PartnerId::new(TEST_PARTNER_ID))
			.partner_key(TEST_PARTNER_KEY)
			.build()
			.expect("Failed to build test Shopee config.")
	}

	/// Constructs a reqwest-backed [`ReqwestAuthClient`] whose client and in-memory store share
	/// one [`ManualClock`].
	pub fn build_test_client(
		base_url: &str,
	) -> (ReqwestAuthClient, Arc<MemoryStore>, ManualClock) {
		let clock = ManualClock::default();
		let shared: Arc<dyn Clock> = Arc::new(clock.clone());
		let store_backend = Arc::new(MemoryStore::with_clock(shared.clone()));
		let store: Arc<dyn TokenStore> = store_backend.clone();
		let client = ReqwestAuthClient::new(test_config(base_url), store).with_clock(shared);

		(client, store_backend, clock)
	}
}

mod _prelude {
	pub use std::{
		collections::HashMap,
		error::Error as StdError,
		fmt::{Debug, Display, Formatter, Result as FmtResult},
		future::Future,
		pin::Pin,
		str::FromStr,
		sync::Arc,
	};

	pub use async_lock::Mutex as AsyncMutex;
	pub use parking_lot::{Mutex, RwLock};
	#[cfg(feature = "reqwest")]
	pub use reqwest::{Client as ReqwestClient, Error as ReqwestError};
	pub use serde::{Deserialize, Serialize};
	pub use thiserror::Error as ThisError;
	pub use time::{Duration, OffsetDateTime};
	pub use url::Url;

	pub use crate::error::{Error, Result};
}

#[cfg(feature = "reqwest")] pub use reqwest;
pub use url;
