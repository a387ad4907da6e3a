//! Per-shop token records, the grants that produce them, and lifecycle helpers.

// self
use crate::{
	_prelude::*,
	auth::{ShopId, token::secret::TokenSecret},
	store::StoreError,
};

/// Lifecycle status of a token record relative to an instant and a refresh buffer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum TokenStatus {
	/// Token stays valid for longer than the refresh buffer.
	Active,
	/// Token is still valid but expires within the refresh buffer.
	ExpiringSoon,
	/// Token reached its expiry instant.
	Expired,
}

/// Token pair returned by Shopee, ready to be written to a store.
///
/// Shopee only reports a relative TTL, so the absolute expiry is fixed when the record is written.
/// The auth client stamps grants with its own clock; unstamped grants take the store's clock.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TokenGrant {
	/// Access token value.
	pub access_token: TokenSecret,
	/// Refresh token value.
	pub refresh_token: TokenSecret,
	/// Lifetime of the access token, counted from `issued_at`.
	pub expires_in: Duration,
	/// Instant the pair was received, if already known.
	pub issued_at: Option<OffsetDateTime>,
}
impl TokenGrant {
	/// Creates an unstamped grant from raw token values and a TTL.
	pub fn new(
		access_token: impl Into<TokenSecret>,
		refresh_token: impl Into<TokenSecret>,
		expires_in: Duration,
	) -> Self {
		Self {
			access_token: access_token.into(),
			refresh_token: refresh_token.into(),
			expires_in,
			issued_at: None,
		}
	}

	/// Pins the instant the lifetime counts from.
	pub fn stamped_at(mut self, issued_at: OffsetDateTime) -> Self {
		self.issued_at = Some(issued_at);

		self
	}

	/// Builds the stored record, counting the TTL from the grant's stamp or else from `now`.
	///
	/// Fails with [`StoreError::ExpiryOutOfRange`] when `issued_at + expires_in` cannot be
	/// represented.
	pub fn into_record(
		self,
		shop_id: ShopId,
		now: OffsetDateTime,
	) -> Result<TokenRecord, StoreError> {
		let issued_at = self.issued_at.unwrap_or(now);
		let expires_at = issued_at
			.checked_add(self.expires_in)
			.ok_or(StoreError::ExpiryOutOfRange { shop_id })?;

		Ok(TokenRecord {
			shop_id,
			access_token: self.access_token,
			refresh_token: self.refresh_token,
			issued_at,
			expires_at,
		})
	}
}

/// Stored token pair for a single shop.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenRecord {
	/// Shop the tokens were issued for.
	pub shop_id: ShopId,
	/// Access token secret; callers must avoid logging it.
	pub access_token: TokenSecret,
	/// Refresh token secret.
	pub refresh_token: TokenSecret,
	/// Instant the record was written.
	pub issued_at: OffsetDateTime,
	/// Expiry instant derived from `issued_at` plus the TTL reported by Shopee.
	pub expires_at: OffsetDateTime,
}
impl TokenRecord {
	/// Time left before the access token expires; negative once expired.
	pub fn remaining_at(&self, instant: OffsetDateTime) -> Duration {
		self.expires_at - instant
	}

	/// Computes the lifecycle status at `instant` using `buffer` as the expiring-soon window.
	pub fn status_at(&self, instant: OffsetDateTime, buffer: Duration) -> TokenStatus {
		let remaining = self.remaining_at(instant);

		if !remaining.is_positive() {
			return TokenStatus::Expired;
		}
		if remaining <= buffer {
			return TokenStatus::ExpiringSoon;
		}

		TokenStatus::Active
	}

	/// Returns `true` if the record must be refreshed before use at `instant`.
	///
	/// The buffer boundary is inclusive: a token with exactly `buffer` left is refreshed.
	pub fn needs_refresh_at(&self, instant: OffsetDateTime, buffer: Duration) -> bool {
		!matches!(self.status_at(instant, buffer), TokenStatus::Active)
	}

	/// Returns `true` if the record has expired at `instant`.
	pub fn is_expired_at(&self, instant: OffsetDateTime) -> bool {
		matches!(self.status_at(instant, Duration::ZERO), TokenStatus::Expired)
	}
}
impl Debug for TokenRecord {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("TokenRecord")
			.field("shop_id", &self.shop_id)
			.field("access_token", &"<redacted>")
			.field("refresh_token", &"<redacted>")
			.field("issued_at", &self.issued_at)
			.field("expires_at", &self.expires_at)
			.finish()
	}
}
