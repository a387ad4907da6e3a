//! Client-level error types shared across the signer, transport, stores, and auth operations.

// self
use crate::{
	_prelude::*, api::ShopeeApiError, auth::ShopId, config::ShopeeConfigError, store::StoreError,
};

/// Crate-wide result type alias returning [`Error`] by default.
pub type Result<T, E = Error> = std::result::Result<T, E>;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Canonical error exposed by public APIs.
#[derive(Debug, ThisError)]
pub enum Error {
	/// Storage-layer failure other than a missing record.
	#[error("{0}")]
	Storage(#[source] StoreError),
	/// Local configuration or request construction problem.
	#[error(transparent)]
	Config(#[from] ConfigError),
	/// Network, timeout, or unexpected HTTP response unrelated to token validity.
	///
	/// Callers may retry at their discretion; the client never retries internally.
	#[error(transparent)]
	Transport(#[from] TransportError),

	/// The shop was never authorized, or its tokens were cleared.
	#[error("No token is stored for shop {shop_id}; the shop must be authorized again.")]
	NotFound {
		/// Shop whose record is missing.
		shop_id: ShopId,
	},
	/// Shopee rejected the authorization code (invalid, expired, or already used).
	#[error("Shopee rejected the authorization code for shop {shop_id}: {source}.")]
	ExchangeFailed {
		/// Shop the code was issued for.
		shop_id: ShopId,
		/// Error envelope returned by Shopee.
		source: ShopeeApiError,
	},
	/// Shopee rejected the refresh token (revoked, rotated, or expired).
	#[error("Shopee rejected the refresh token for shop {shop_id}: {source}.")]
	RefreshFailed {
		/// Shop whose refresh failed.
		shop_id: ShopId,
		/// Error envelope returned by Shopee.
		source: ShopeeApiError,
	},
}
impl Error {
	/// Returns `true` when the caller should send the shop through authorization again.
	pub fn requires_reauthorization(&self) -> bool {
		matches!(self, Self::NotFound { .. } | Self::RefreshFailed { .. })
	}
}
impl From<StoreError> for Error {
	fn from(e: StoreError) -> Self {
		match e {
			StoreError::NotFound { shop_id } => Self::NotFound { shop_id },
			other => Self::Storage(other),
		}
	}
}

/// Configuration and request construction failures.
#[derive(Debug, ThisError)]
pub enum ConfigError {
	/// HTTP client could not be constructed.
	#[error("HTTP client could not be constructed.")]
	HttpClientBuild {
		/// Underlying transport builder failure.
		#[source]
		source: BoxError,
	},
	/// Client configuration failed validation.
	#[error(transparent)]
	InvalidConfig(#[from] ShopeeConfigError),
	/// An endpoint URL could not be derived from the configured base URL.
	#[error("Endpoint `{path}` cannot be joined onto the API base URL.")]
	InvalidEndpoint {
		/// API path that failed to join.
		path: &'static str,
		/// Underlying parsing failure.
		#[source]
		source: url::ParseError,
	},
	/// Request body could not be serialized.
	#[error("Request body for `{path}` could not be serialized.")]
	RequestBody {
		/// API path the body was meant for.
		path: &'static str,
		/// Underlying serialization failure.
		#[source]
		source: serde_json::Error,
	},
	/// Token endpoint returned a non-positive `expire_in`.
	#[error("The expire_in value must be positive, got {value}.")]
	NonPositiveExpiresIn {
		/// Raw value returned by Shopee.
		value: i64,
	},
	/// Token endpoint returned an `expire_in` beyond the accepted token lifetime.
	#[error("The expire_in value {value} exceeds the maximum of {max} seconds.")]
	ExpiresInTooLarge {
		/// Raw value returned by Shopee.
		value: i64,
		/// Largest accepted lifetime in seconds.
		max: i64,
	},
}
impl ConfigError {
	/// Wraps a transport's builder failure inside [`ConfigError`].
	pub fn http_client_build(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::HttpClientBuild { source: Box::new(src) }
	}
}

/// Transport-level failures (network, timeout, unexpected HTTP responses).
#[derive(Debug, ThisError)]
pub enum TransportError {
	/// Underlying HTTP client reported a network failure.
	#[error("Network error occurred while calling the Shopee API.")]
	Network {
		/// Transport-specific network error.
		#[source]
		source: BoxError,
	},
	/// The request timed out inside the transport.
	#[error("Request to the Shopee API timed out.")]
	Timeout,
	/// Shopee answered with a non-success status and no error envelope.
	#[error("Shopee API returned HTTP {status}: {body}.")]
	Status {
		/// HTTP status code.
		status: u16,
		/// Truncated response body for diagnostics.
		body: String,
		/// Retry-After hint from upstream, if supplied.
		retry_after: Option<Duration>,
	},
	/// A success response could not be decoded into the expected shape.
	#[error("Shopee API returned a malformed response body (HTTP {status}).")]
	Decode {
		/// Structured parsing failure naming the offending path.
		#[source]
		source: serde_path_to_error::Error<serde_json::Error>,
		/// HTTP status code.
		status: u16,
	},
}
impl TransportError {
	/// Wraps a transport-specific network error.
	pub fn network(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::Network { source: Box::new(src) }
	}

	/// Returns the HTTP status attached to the failure, if any.
	pub fn status(&self) -> Option<u16> {
		match self {
			Self::Status { status, .. } | Self::Decode { status, .. } => Some(*status),
			Self::Network { .. } | Self::Timeout => None,
		}
	}
}
#[cfg(feature = "reqwest")]
impl From<ReqwestError> for TransportError {
	fn from(e: ReqwestError) -> Self {
		if e.is_timeout() { Self::Timeout } else { Self::network(e) }
	}
}
#[cfg(feature = "reqwest")]
impl From<ReqwestError> for ConfigError {
	fn from(e: ReqwestError) -> Self {
		Self::http_client_build(e)
	}
}
