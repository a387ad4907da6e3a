//! Shop authorization URL construction.

// self
use crate::{
	_prelude::*,
	api::AUTH_PARTNER_PATH,
	client::{AuthClient, common},
	http::ApiHttpClient,
};

impl<C> AuthClient<C>
where
	C: ?Sized + ApiHttpClient,
{
	/// Builds the URL that sends a merchant to Shopee's shop-authorization page.
	///
	/// After the merchant approves, Shopee redirects to `redirect_url` with `code` and `shop_id`
	/// query parameters for [`AuthClient::get_access_token`]. The signature embeds the current
	/// timestamp, so build the URL right before handing it out.
	pub fn auth_url(&self, redirect_url: &str) -> Result<Url> {
		let mut url = common::signed_url(self, AUTH_PARTNER_PATH)?;

		url.query_pairs_mut().append_pair("redirect", redirect_url);

		Ok(url)
	}
}
