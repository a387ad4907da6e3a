//! Shopee auth client: signed authorization URLs, code exchange, and self-refreshing tokens.

pub mod authorize;
pub mod exchange;
pub mod refresh;

mod common;

pub use refresh::{RefreshMetrics, RefreshSnapshot};

// self
use crate::{
	_prelude::*,
	auth::{ShopId, TokenStatus},
	clock::{self, Clock},
	config::ShopeeConfig,
	http::ApiHttpClient,
	obs::{self, OpKind},
	store::TokenStore,
};
#[cfg(feature = "reqwest")] use crate::http::ReqwestHttpClient;

#[cfg(feature = "reqwest")]
/// Client specialized for the crate's default reqwest transport.
pub type ReqwestAuthClient = AuthClient<ReqwestHttpClient>;

/// Window before expiry in which a stored access token is refreshed instead of returned.
pub const DEFAULT_REFRESH_BUFFER: Duration = Duration::minutes(5);

/// Authenticated Shopee client bound to one partner configuration.
///
/// The client owns the HTTP transport, token store, and clock references so each operation
/// only deals with its endpoint. Clones share the store, metrics, and per-shop refresh guards.
pub struct AuthClient<C>
where
	C: ?Sized + ApiHttpClient,
{
	/// Immutable partner configuration.
	pub config: Arc<ShopeeConfig>,
	/// HTTP transport used for every outbound call.
	pub http_client: Arc<C>,
	/// Token store holding one record per shop.
	pub store: Arc<dyn TokenStore>,
	/// Clock used for request timestamps and expiry checks.
	pub clock: Arc<dyn Clock>,
	/// Tokens with this much time left or less are refreshed before use.
	pub refresh_buffer: Duration,
	/// Shared counters for refresh outcomes.
	pub refresh_metrics: Arc<RefreshMetrics>,
	shop_guards: Arc<Mutex<HashMap<ShopId, Arc<AsyncMutex<()>>>>>,
}
impl<C> AuthClient<C>
where
	C: ?Sized + ApiHttpClient,
{
	/// Creates a client that reuses the caller-provided transport.
	pub fn with_http_client(
		config: ShopeeConfig,
		store: Arc<dyn TokenStore>,
		http_client: impl Into<Arc<C>>,
	) -> Self {
		Self {
			config: Arc::new(config),
			http_client: http_client.into(),
			store,
			clock: clock::system(),
			refresh_buffer: DEFAULT_REFRESH_BUFFER,
			refresh_metrics: Default::default(),
			shop_guards: Default::default(),
		}
	}

	/// Replaces the clock used for timestamps and expiry checks.
	///
	/// Grants written through the client are stamped with this clock, so `issued_at` and
	/// `expires_at` follow it whatever clock the store was built with.
	pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
		self.clock = clock;

		self
	}

	/// Overrides the refresh buffer (defaults to five minutes; negative values clamp to zero).
	pub fn with_refresh_buffer(mut self, buffer: Duration) -> Self {
		self.refresh_buffer = if buffer.is_negative() { Duration::ZERO } else { buffer };

		self
	}

	/// Returns the refresh counters shared by every clone of this client.
	pub fn refresh_metrics(&self) -> &RefreshMetrics {
		&self.refresh_metrics
	}

	/// Reports the lifecycle status of the stored token for `shop_id` without refreshing.
	pub async fn token_status(&self, shop_id: ShopId) -> Result<TokenStatus> {
		let record = self.store.get_token(shop_id).await?;

		Ok(record.status_at(self.clock.now(), self.refresh_buffer))
	}

	/// Removes the stored tokens for `shop_id`, e.g. on logout or revocation.
	///
	/// Clearing a shop that has no stored tokens succeeds.
	pub async fn clear_tokens(&self, shop_id: ShopId) -> Result<()> {
		obs::observe(OpKind::Clear, "clear_tokens", async move {
			self.store.clear_token(shop_id).await?;

			Ok(())
		})
		.await
	}
}
#[cfg(feature = "reqwest")]
impl AuthClient<ReqwestHttpClient> {
	/// Creates a new client with its own reqwest-backed transport.
	pub fn new(config: ShopeeConfig, store: Arc<dyn TokenStore>) -> Self {
		Self::with_http_client(config, store, ReqwestHttpClient::default())
	}
}
impl<C> Clone for AuthClient<C>
where
	C: ?Sized + ApiHttpClient,
{
	fn clone(&self) -> Self {
		Self {
			config: self.config.clone(),
			http_client: self.http_client.clone(),
			store: self.store.clone(),
			clock: self.clock.clone(),
			refresh_buffer: self.refresh_buffer,
			refresh_metrics: self.refresh_metrics.clone(),
			shop_guards: self.shop_guards.clone(),
		}
	}
}
impl<C> Debug for AuthClient<C>
where
	C: ?Sized + ApiHttpClient,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("AuthClient")
			.field("api_base_url", &self.config.api_base_url.as_str())
			.field("partner_id", &self.config.partner_id)
			.field("refresh_buffer", &self.refresh_buffer)
			.finish()
	}
}
