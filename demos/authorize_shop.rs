//! Prints the Shopee authorization URL for a merchant shop and, when handed the `code` and
//! `shop_id` from the callback, exchanges them and reads back a valid access token.
//!
//! ```sh
//! SHOPEE_API_BASE_URL=https://partner.test-stable.shopeemobile.com \
//! SHOPEE_PARTNER_ID=2001887 SHOPEE_PARTNER_KEY=... \
//! cargo run --example authorize_shop -- https://app.example.com my-shop [code shop_id]
//! ```

// std
use std::{env, sync::Arc};
// crates.io
use color_eyre::{Result, eyre::eyre};
// self
use shopee_auth::{
	auth::ShopId,
	client::ReqwestAuthClient,
	config::ShopeeConfig,
	store::{FileStore, TokenStore},
};

#[tokio::main]
async fn main() -> Result<()> {
	color_eyre::install()?;

	let mut args = env::args().skip(1);
	let app_url = args.next().unwrap_or_else(|| "http://localhost:3000".into());
	let shop = args.next().unwrap_or_else(|| "demo-shop".into());
	let config = ShopeeConfig::from_env()?;
	let store: Arc<dyn TokenStore> =
		Arc::new(FileStore::open(env::temp_dir().join("shopee_auth_demo.json"))?);
	let client = ReqwestAuthClient::new(config, store.clone());
	let redirect = format!("{}/api/shopee/auth-callback/{shop}", app_url.trim_end_matches('/'));

	println!("Send the merchant to {}.", client.auth_url(&redirect)?);

	let (Some(code), Some(shop_id)) = (args.next(), args.next()) else {
		println!("Re-run with the callback's `code` and `shop_id` to finish authorization.");

		return Ok(());
	};
	let shop_id = shop_id.parse::<ShopId>()?;
	let response = client.get_access_token(&code, shop_id).await?;

	println!(
		"Authorized shop {shop_id}; access token lives for {}s (request {}).",
		response.expire_in,
		response.request_id.as_deref().unwrap_or("-"),
	);

	let token = client.get_valid_access_token(shop_id).await?;
	let status = client.token_status(shop_id).await?;
	let record = store.get_token(shop_id).await?;

	if token.is_empty() {
		return Err(eyre!("Shopee returned an empty access token for shop {shop_id}."));
	}

	println!("Stored token for shop {shop_id} is {status:?} until {}.", record.expires_at);

	Ok(())
}
