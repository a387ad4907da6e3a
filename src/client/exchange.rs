//! Authorization code exchange.

// self
use crate::{
	_prelude::*,
	api::{GetAccessTokenBody, TOKEN_GET_PATH, TokenResponse},
	auth::ShopId,
	client::{AuthClient, common},
	http::ApiHttpClient,
	obs::{self, OpKind},
};

impl<C> AuthClient<C>
where
	C: ?Sized + ApiHttpClient,
{
	/// Exchanges a one-time authorization `code` for the shop's first token pair.
	///
	/// On success the pair is written to the store and the raw response is returned. A rejected
	/// code surfaces as [`Error::ExchangeFailed`] and is never retried, since a used or invalid
	/// code cannot succeed on a second attempt.
	pub async fn get_access_token(&self, code: &str, shop_id: ShopId) -> Result<TokenResponse> {
		obs::observe(OpKind::CodeExchange, "get_access_token", async move {
			let body = GetAccessTokenBody { shop_id, partner_id: self.config.partner_id, code };
			let response = common::post_token(self, TOKEN_GET_PATH, &body, |source| {
				Error::ExchangeFailed { shop_id, source }
			})
			.await?;
			let grant = response.grant()?.stamped_at(self.clock.now());

			self.store.store_token(shop_id, grant).await?;

			Ok(response)
		})
		.await
	}
}
