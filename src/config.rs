//! Immutable partner configuration handed to the auth client at construction.

// std
use std::env;
// self
use crate::{
	_prelude::*,
	auth::{IdentifierError, PartnerId, PartnerKey},
	error::ConfigError,
};

/// Production Open Platform host.
pub const SHOPEE_LIVE_API_BASE_URL: &str = "https://partner.shopeemobile.com";
/// Sandbox Open Platform host.
pub const SHOPEE_SANDBOX_API_BASE_URL: &str = "https://partner.test-stable.shopeemobile.com";

/// Environment variable holding the API base URL.
pub const ENV_API_BASE_URL: &str = "SHOPEE_API_BASE_URL";
/// Environment variable holding the partner identifier.
pub const ENV_PARTNER_ID: &str = "SHOPEE_PARTNER_ID";
/// Environment variable holding the partner key.
pub const ENV_PARTNER_KEY: &str = "SHOPEE_PARTNER_KEY";

/// Errors raised while constructing or validating [`ShopeeConfig`].
#[derive(Debug, PartialEq, Eq, ThisError)]
pub enum ShopeeConfigError {
	/// API base URL was not supplied.
	#[error("Missing API base URL.")]
	MissingApiBaseUrl,
	/// Partner identifier was not supplied.
	#[error("Missing partner identifier.")]
	MissingPartnerId,
	/// Partner key was not supplied or is empty.
	#[error("Missing partner key.")]
	MissingPartnerKey,
	/// API base URL must be HTTP(S).
	#[error("The API base URL must use http or https: {url}.")]
	UnsupportedScheme {
		/// URL that failed validation.
		url: String,
	},
	/// API base URL must not carry a query string or fragment.
	#[error("The API base URL must not contain a query or fragment: {url}.")]
	BaseUrlHasQuery {
		/// URL that failed validation.
		url: String,
	},
	/// API base URL could not be parsed.
	#[error("The API base URL `{value}` is not a valid URL.")]
	InvalidBaseUrl {
		/// Raw value that failed to parse.
		value: String,
		/// Underlying parsing failure.
		#[source]
		source: url::ParseError,
	},
	/// Partner identifier could not be parsed.
	#[error("The partner identifier `{value}` is invalid.")]
	InvalidPartnerId {
		/// Raw value that failed to parse.
		value: String,
		/// Underlying parsing failure.
		#[source]
		source: IdentifierError,
	},
	/// A required environment variable is unset.
	#[error("Environment variable {var} is not set.")]
	MissingEnv {
		/// Name of the missing variable.
		var: &'static str,
	},
}

/// Partner credentials and API host used for every signed request.
#[derive(Clone, Debug)]
pub struct ShopeeConfig {
	/// Base URL of the Open Platform API, without a trailing slash.
	pub api_base_url: Url,
	/// Partner identifier issued by Shopee.
	pub partner_id: PartnerId,
	/// Partner key used to sign requests.
	pub partner_key: PartnerKey,
}
impl ShopeeConfig {
	/// Returns a builder for [`ShopeeConfig`].
	pub fn builder() -> ShopeeConfigBuilder {
		ShopeeConfigBuilder::default()
	}

	/// Loads the configuration from `SHOPEE_API_BASE_URL`, `SHOPEE_PARTNER_ID`, and
	/// `SHOPEE_PARTNER_KEY`.
	pub fn from_env() -> Result<Self, ShopeeConfigError> {
		Self::from_lookup(|var| env::var(var).ok())
	}

	/// Loads the configuration through an arbitrary variable lookup.
	pub fn from_lookup<F>(lookup: F) -> Result<Self, ShopeeConfigError>
	where
		F: Fn(&str) -> Option<String>,
	{
		let require = |var: &'static str| {
			lookup(var)
				.filter(|value| !value.trim().is_empty())
				.ok_or(ShopeeConfigError::MissingEnv { var })
		};
		let raw_url = require(ENV_API_BASE_URL)?;
		let raw_partner = require(ENV_PARTNER_ID)?;
		let partner_key = require(ENV_PARTNER_KEY)?;
		let api_base_url = Url::parse(raw_url.trim()).map_err(|source| {
			ShopeeConfigError::InvalidBaseUrl { value: raw_url.clone(), source }
		})?;
		let partner_id = raw_partner.parse::<PartnerId>().map_err(|source| {
			ShopeeConfigError::InvalidPartnerId { value: raw_partner.clone(), source }
		})?;

		Self::builder()
			.api_base_url(api_base_url)
			.partner_id(partner_id)
			.partner_key(partner_key)
			.build()
	}

	/// Joins an API path (e.g. `/api/v2/auth/token/get`) onto the base URL.
	pub fn endpoint(&self, path: &'static str) -> Result<Url, ConfigError> {
		let base = self.api_base_url.as_str().trim_end_matches('/');

		Url::parse(&format!("{base}{path}"))
			.map_err(|source| ConfigError::InvalidEndpoint { path, source })
	}
}

/// Builder for [`ShopeeConfig`] values.
#[derive(Debug, Default)]
pub struct ShopeeConfigBuilder {
	api_base_url: Option<Url>,
	partner_id: Option<PartnerId>,
	partner_key: Option<PartnerKey>,
}
impl ShopeeConfigBuilder {
	/// Sets the API base URL.
	pub fn api_base_url(mut self, url: Url) -> Self {
		self.api_base_url = Some(url);

		self
	}

	/// Sets the partner identifier.
	pub fn partner_id(mut self, partner_id: PartnerId) -> Self {
		self.partner_id = Some(partner_id);

		self
	}

	/// Sets the partner key.
	pub fn partner_key(mut self, key: impl Into<PartnerKey>) -> Self {
		self.partner_key = Some(key.into());

		self
	}

	/// Consumes the builder and validates the resulting config.
	pub fn build(self) -> Result<ShopeeConfig, ShopeeConfigError> {
		let api_base_url = self.api_base_url.ok_or(ShopeeConfigError::MissingApiBaseUrl)?;
		let partner_id = self.partner_id.ok_or(ShopeeConfigError::MissingPartnerId)?;
		let partner_key = self
			.partner_key
			.filter(|key| !key.is_empty())
			.ok_or(ShopeeConfigError::MissingPartnerKey)?;

		validate_base_url(&api_base_url)?;

		Ok(ShopeeConfig { api_base_url, partner_id, partner_key })
	}
}

fn validate_base_url(url: &Url) -> Result<(), ShopeeConfigError> {
	if !matches!(url.scheme(), "http" | "https") {
		return Err(ShopeeConfigError::UnsupportedScheme { url: url.to_string() });
	}
	if url.query().is_some() || url.fragment().is_some() {
		return Err(ShopeeConfigError::BaseUrlHasQuery { url: url.to_string() });
	}

	Ok(())
}
