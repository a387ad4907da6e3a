//! Transport primitives for signed Shopee API calls.
//!
//! The module exposes [`ApiHttpClient`] as the client's only dependency on an HTTP stack.
//! Implementations POST a JSON body to a fully signed URL and hand back the raw
//! [`ApiResponse`]; classifying that response (token payload, Shopee error envelope, or
//! transport failure) stays in [`crate::api`] so custom transports behave identically.

// std
#[cfg(feature = "reqwest")] use std::ops::Deref;
// crates.io
#[cfg(feature = "reqwest")]
use reqwest::header::{CONTENT_TYPE, HeaderMap, HeaderValue, RETRY_AFTER};
#[cfg(feature = "reqwest")] use time::format_description::well_known::Rfc2822;
// self
use crate::{_prelude::*, error::TransportError};

/// Boxed future returned by [`ApiHttpClient::post_json`].
pub type HttpFuture<'a> =
	Pin<Box<dyn Future<Output = Result<ApiResponse, TransportError>> + 'a + Send>>;

/// Abstraction over HTTP transports capable of executing signed Shopee API calls.
///
/// Implementations must be `Send + Sync + 'static` so a single transport can be shared across
/// client clones, and the futures they return must be `Send` so client operations can hop
/// executors.
pub trait ApiHttpClient
where
	Self: 'static + Send + Sync,
{
	/// POSTs `body` (already-serialized JSON) to `url`.
	///
	/// Implementations return `Ok` for every HTTP response, successful or not, and reserve
	/// `Err` for failures where no response was received.
	fn post_json(&self, url: Url, body: Vec<u8>) -> HttpFuture<'_>;
}

/// Raw HTTP response captured from the transport.
///
/// Additional metadata fields may be added in future releases, so downstream code should
/// construct values using field names instead of struct update syntax.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ApiResponse {
	/// HTTP status code.
	pub status: u16,
	/// Retry-After hint expressed as a relative duration.
	pub retry_after: Option<Duration>,
	/// Response body bytes.
	pub body: Vec<u8>,
}
impl ApiResponse {
	/// Returns `true` for 2xx statuses.
	pub fn is_success(&self) -> bool {
		(200..300).contains(&self.status)
	}
}

/// Thin wrapper around [`ReqwestClient`] so shared HTTP behavior lives in one place.
///
/// Shopee's auth endpoints answer directly, so any custom [`ReqwestClient`] should disable
/// redirect following and set the request timeout the caller wants to surface as
/// [`TransportError::Timeout`].
#[cfg(feature = "reqwest")]
#[derive(Clone, Default)]
pub struct ReqwestHttpClient(pub ReqwestClient);
#[cfg(feature = "reqwest")]
impl ReqwestHttpClient {
	/// Wraps an existing reqwest [`ReqwestClient`].
	pub fn with_client(client: ReqwestClient) -> Self {
		Self(client)
	}
}
#[cfg(feature = "reqwest")]
impl AsRef<ReqwestClient> for ReqwestHttpClient {
	fn as_ref(&self) -> &ReqwestClient {
		&self.0
	}
}
#[cfg(feature = "reqwest")]
impl Deref for ReqwestHttpClient {
	type Target = ReqwestClient;

	fn deref(&self) -> &Self::Target {
		&self.0
	}
}
#[cfg(feature = "reqwest")]
impl ApiHttpClient for ReqwestHttpClient {
	fn post_json(&self, url: Url, body: Vec<u8>) -> HttpFuture<'_> {
		let client = self.0.clone();

		Box::pin(async move {
			let response = client
				.post(url)
				.header(CONTENT_TYPE, HeaderValue::from_static("application/json"))
				.body(body)
				.send()
				.await?;
			let status = response.status().as_u16();
			let retry_after = parse_retry_after(response.headers());
			let body = response.bytes().await?.to_vec();

			Ok(ApiResponse { status, retry_after, body })
		})
	}
}

#[cfg(feature = "reqwest")]
fn parse_retry_after(headers: &HeaderMap) -> Option<Duration> {
	let value = headers.get(RETRY_AFTER)?;
	let raw = value.to_str().ok()?.trim();

	if let Ok(secs) = raw.parse::<u32>() {
		return Some(Duration::seconds(i64::from(secs)));
	}
	if let Ok(moment) = OffsetDateTime::parse(raw, &Rfc2822) {
		let delta = moment - OffsetDateTime::now_utc();

		if delta.is_positive() {
			return Some(delta);
		}
	}

	None
}
