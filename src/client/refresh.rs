//! Refresh token exchange and the self-refreshing valid-token lookup.
//!
//! [`AuthClient::get_valid_access_token`] returns the stored access token while it has more than
//! the refresh buffer left. Otherwise it takes the shop's single-flight guard, re-reads the store
//! so callers that queued behind another refresh reuse its result, and rotates the pair through
//! Shopee's `access_token/get` endpoint. A failed refresh never touches the stored record.

mod metrics;

pub use metrics::{RefreshMetrics, RefreshSnapshot};

// self
use crate::{
	_prelude::*,
	api::{ACCESS_TOKEN_GET_PATH, RefreshAccessTokenBody, TokenResponse},
	auth::{ShopId, TokenSecret},
	client::{AuthClient, common},
	http::ApiHttpClient,
	obs::{self, OpKind},
};

impl<C> AuthClient<C>
where
	C: ?Sized + ApiHttpClient,
{
	/// Trades `refresh_token` for a new token pair and stores it for `shop_id`.
	///
	/// Shopee rotates the refresh token on every call, so the previous one stops working once
	/// this returns successfully.
	pub async fn refresh_access_token(
		&self,
		refresh_token: &str,
		shop_id: ShopId,
	) -> Result<TokenResponse> {
		obs::observe(OpKind::Refresh, "refresh_access_token", async move {
			self.perform_refresh(refresh_token, shop_id).await
		})
		.await
	}

	/// Returns an access token for `shop_id` that is valid for longer than the refresh buffer.
	///
	/// Fails with [`Error::NotFound`] when the shop was never authorized, and with
	/// [`Error::RefreshFailed`] when Shopee rejects the stored refresh token; both mean the
	/// merchant has to authorize again.
	pub async fn get_valid_access_token(&self, shop_id: ShopId) -> Result<TokenSecret> {
		obs::observe(OpKind::ValidToken, "get_valid_access_token", async move {
			let record = self.store.get_token(shop_id).await?;

			if !record.needs_refresh_at(self.clock.now(), self.refresh_buffer) {
				self.refresh_metrics.record_reuse();

				return Ok(record.access_token);
			}

			let guard = common::shop_guard(self, shop_id);
			let _singleflight = guard.lock().await;
			let record = self.store.get_token(shop_id).await?;

			if !record.needs_refresh_at(self.clock.now(), self.refresh_buffer) {
				self.refresh_metrics.record_reuse();

				return Ok(record.access_token);
			}

			self.perform_refresh(record.refresh_token.expose(), shop_id).await?;

			Ok(self.store.get_token(shop_id).await?.access_token)
		})
		.await
	}

	async fn perform_refresh(&self, refresh_token: &str, shop_id: ShopId) -> Result<TokenResponse> {
		self.refresh_metrics.record_exchange();

		let result = self.rotate(refresh_token, shop_id).await;

		self.refresh_metrics.record_result(&result);

		result
	}

	async fn rotate(&self, refresh_token: &str, shop_id: ShopId) -> Result<TokenResponse> {
		let body =
			RefreshAccessTokenBody { shop_id, partner_id: self.config.partner_id, refresh_token };
		let response = common::post_token(self, ACCESS_TOKEN_GET_PATH, &body, |source| {
			Error::RefreshFailed { shop_id, source }
		})
		.await?;
		let grant = response.grant()?.stamped_at(self.clock.now());

		self.store.store_token(shop_id, grant).await?;

		Ok(response)
	}
}
