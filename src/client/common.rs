//! Shared helpers for client operations (signed URLs, token POSTs, per-shop guards).

// self
use crate::{
	_prelude::*,
	api::{self, ShopeeApiError, TokenResponse},
	auth::ShopId,
	client::AuthClient,
	error::ConfigError,
	http::ApiHttpClient,
	sign::SignedParams,
};

/// Builds `{api_base_url}{path}` carrying freshly signed query parameters.
pub(crate) fn signed_url<C>(client: &AuthClient<C>, path: &'static str) -> Result<Url>
where
	C: ?Sized + ApiHttpClient,
{
	let mut url = client.config.endpoint(path)?;

	SignedParams::new(&client.config, path, client.clock.unix_timestamp()).append_to(&mut url);

	Ok(url)
}

/// POSTs `body` to a signed token endpoint and classifies the response.
///
/// A Shopee error envelope is turned into an error by `reject`.
pub(crate) async fn post_token<C, B, F>(
	client: &AuthClient<C>,
	path: &'static str,
	body: &B,
	reject: F,
) -> Result<TokenResponse>
where
	C: ?Sized + ApiHttpClient,
	B: Serialize,
	F: FnOnce(ShopeeApiError) -> Error,
{
	let url = signed_url(client, path)?;
	let payload =
		serde_json::to_vec(body).map_err(|source| ConfigError::RequestBody { path, source })?;
	let response = client.http_client.post_json(url, payload).await?;

	api::decode_token_response(&response, reject)
}

/// Returns (and creates on demand) the single-flight refresh guard for a shop.
pub(crate) fn shop_guard<C>(client: &AuthClient<C>, shop_id: ShopId) -> Arc<AsyncMutex<()>>
where
	C: ?Sized + ApiHttpClient,
{
	let mut guards = client.shop_guards.lock();

	guards.entry(shop_id).or_insert_with(|| Arc::new(AsyncMutex::new(()))).clone()
}
