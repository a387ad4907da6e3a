//! Wire model for the Shopee auth endpoints and response classification.
//!
//! Shopee reports failures through an `{error, message, request_id}` envelope, sometimes with a
//! 2xx status. Any response whose `error` field is non-empty is treated as a rejection of the
//! presented credential; only responses without an envelope fall back to HTTP-status handling.

// self
use crate::{
	_prelude::*,
	auth::{PartnerId, ShopId, TokenGrant, TokenSecret},
	error::{ConfigError, TransportError},
	http::ApiResponse,
};

/// Shop authorization page handed to the merchant's browser.
pub const AUTH_PARTNER_PATH: &str = "/api/v2/shop/auth_partner";
/// Authorization code exchange endpoint.
pub const TOKEN_GET_PATH: &str = "/api/v2/auth/token/get";
/// Refresh token exchange endpoint.
pub const ACCESS_TOKEN_GET_PATH: &str = "/api/v2/auth/access_token/get";

/// Longest access token lifetime accepted from Shopee (one year, in seconds).
pub const MAX_EXPIRE_IN_SECS: i64 = 366 * 24 * 60 * 60;

const BODY_PREVIEW_LEN: usize = 256;

/// JSON body for [`TOKEN_GET_PATH`].
#[derive(Clone, Debug, Serialize)]
pub struct GetAccessTokenBody<'a> {
	/// Shop that granted the code.
	pub shop_id: ShopId,
	/// Partner identifier.
	pub partner_id: PartnerId,
	/// One-time authorization code.
	pub code: &'a str,
}

/// JSON body for [`ACCESS_TOKEN_GET_PATH`].
#[derive(Clone, Serialize)]
pub struct RefreshAccessTokenBody<'a> {
	/// Shop whose token is refreshed.
	pub shop_id: ShopId,
	/// Partner identifier.
	pub partner_id: PartnerId,
	/// Refresh token issued by the previous exchange.
	pub refresh_token: &'a str,
}
impl Debug for RefreshAccessTokenBody<'_> {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("RefreshAccessTokenBody")
			.field("shop_id", &self.shop_id)
			.field("partner_id", &self.partner_id)
			.field("refresh_token", &"<redacted>")
			.finish()
	}
}

/// Successful token payload returned by both exchange endpoints.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenResponse {
	/// New access token.
	pub access_token: TokenSecret,
	/// New refresh token; Shopee rotates it on every exchange.
	pub refresh_token: TokenSecret,
	/// Access token lifetime in seconds.
	pub expire_in: i64,
	/// Shopee request identifier, useful for support tickets.
	#[serde(default)]
	pub request_id: Option<String>,
	/// Partner identifier echoed by the refresh endpoint.
	#[serde(default)]
	pub partner_id: Option<PartnerId>,
	/// Shop identifier echoed by the refresh endpoint.
	#[serde(default)]
	pub shop_id: Option<ShopId>,
	/// Shops covered by a main-account authorization.
	#[serde(default)]
	pub shop_id_list: Vec<ShopId>,
	/// Merchants covered by a main-account authorization.
	#[serde(default)]
	pub merchant_id_list: Vec<u64>,
}
impl TokenResponse {
	/// Converts the payload into a [`TokenGrant`] for the token store.
	pub fn grant(&self) -> Result<TokenGrant, ConfigError> {
		if self.expire_in <= 0 {
			return Err(ConfigError::NonPositiveExpiresIn { value: self.expire_in });
		}
		if self.expire_in > MAX_EXPIRE_IN_SECS {
			return Err(ConfigError::ExpiresInTooLarge {
				value: self.expire_in,
				max: MAX_EXPIRE_IN_SECS,
			});
		}

		Ok(TokenGrant::new(
			self.access_token.clone(),
			self.refresh_token.clone(),
			Duration::seconds(self.expire_in),
		))
	}
}

/// Error envelope returned by Shopee when it rejects a request.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ThisError)]
#[error("{error} ({message})")]
pub struct ShopeeApiError {
	/// Machine-readable error code, e.g. `error_auth` or `error_param`.
	pub error: String,
	/// Human-readable description.
	#[serde(default)]
	pub message: String,
	/// Shopee request identifier.
	#[serde(default)]
	pub request_id: Option<String>,
}

#[derive(Deserialize)]
struct ErrorEnvelope {
	#[serde(default)]
	error: Option<String>,
	#[serde(default)]
	message: Option<String>,
	#[serde(default)]
	request_id: Option<String>,
}

/// Classifies a raw token endpoint response.
///
/// An error envelope becomes whatever `reject` builds from it; non-2xx responses without one
/// become [`TransportError::Status`]; malformed 2xx bodies become [`TransportError::Decode`].
pub(crate) fn decode_token_response<F>(response: &ApiResponse, reject: F) -> Result<TokenResponse>
where
	F: FnOnce(ShopeeApiError) -> Error,
{
	if let Some(api_error) = parse_error_envelope(&response.body) {
		return Err(reject(api_error));
	}
	if !response.is_success() {
		return Err(TransportError::Status {
			status: response.status,
			body: body_preview(&response.body),
			retry_after: response.retry_after,
		}
		.into());
	}

	let mut deserializer = serde_json::Deserializer::from_slice(&response.body);

	serde_path_to_error::deserialize(&mut deserializer)
		.map_err(|source| TransportError::Decode { source, status: response.status }.into())
}

fn parse_error_envelope(body: &[u8]) -> Option<ShopeeApiError> {
	let envelope = serde_json::from_slice::<ErrorEnvelope>(body).ok()?;
	let error = envelope.error.filter(|code| !code.trim().is_empty())?;

	Some(ShopeeApiError {
		error,
		message: envelope.message.unwrap_or_default(),
		request_id: envelope.request_id,
	})
}

fn body_preview(body: &[u8]) -> String {
	String::from_utf8_lossy(body).chars().take(BODY_PREVIEW_LEN).collect()
}
