#![cfg(feature = "reqwest")]

// std
use std::{collections::HashMap, sync::Arc};
// crates.io
use httpmock::prelude::*;
use serde_json::json;
use time::{Duration, macros};
// self
use shopee_auth::{
	auth::{PartnerId, PartnerKey, ShopId},
	client::ReqwestAuthClient,
	clock::{Clock, ManualClock},
	config::ShopeeConfig,
	error::{Error, TransportError},
	sign,
	store::{MemoryStore, TokenStore},
	url::Url,
};

const PARTNER_ID: u64 = 1_000_777;
const PARTNER_KEY: &str = "shpk-exchange-key";
const SHOP_ID: u64 = 220_011;

fn build_client(server: &MockServer) -> (ReqwestAuthClient, Arc<MemoryStore>, ManualClock) {
	let clock = ManualClock::at(macros::datetime!(2025-06-01 08:00 UTC));
	let shared: Arc<dyn Clock> = Arc::new(clock.clone());
	let store = Arc::new(MemoryStore::with_clock(shared.clone()));
	let config = ShopeeConfig::builder()
		.api_base_url(Url::parse(&server.base_url()).expect("Mock server URL should parse."))
		.partner_id(PartnerId::new(PARTNER_ID))
		.partner_key(PARTNER_KEY)
		.build()
		.expect("Exchange test config should build.");
	let client = ReqwestAuthClient::new(config, store.clone()).with_clock(shared);

	(client, store, clock)
}

fn expected_sign(path: &str, timestamp: i64) -> String {
	sign::sign(path, PartnerId::new(PARTNER_ID), timestamp, &PartnerKey::new(PARTNER_KEY))
}

#[tokio::test]
async fn code_exchange_sends_signed_request_and_stores_tokens() {
	let server = MockServer::start_async().await;
	let (client, store, clock) = build_client(&server);
	let timestamp = clock.unix_timestamp();
	let mock = server
		.mock_async(|when, then| {
			when.method(POST)
				.path("/api/v2/auth/token/get")
				.header("content-type", "application/json")
				.query_param("partner_id", PARTNER_ID.to_string())
				.query_param("timestamp", timestamp.to_string())
				.query_param("sign", expected_sign("/api/v2/auth/token/get", timestamp))
				.json_body(json!({
					"shop_id": SHOP_ID,
					"partner_id": PARTNER_ID,
					"code": "code-abc",
				}));
			then.status(200).header("content-type", "application/json").json_body(json!({
				"access_token": "access-1",
				"refresh_token": "refresh-1",
				"expire_in": 14_400,
				"request_id": "req-exchange",
				"error": "",
				"message": "",
			}));
		})
		.await;
	let response = client
		.get_access_token("code-abc", ShopId::new(SHOP_ID))
		.await
		.expect("Code exchange should succeed.");

	mock.assert_async().await;

	assert_eq!(response.access_token.expose(), "access-1");
	assert_eq!(response.expire_in, 14_400);
	assert_eq!(response.request_id.as_deref(), Some("req-exchange"));

	let record =
		store.get_token(ShopId::new(SHOP_ID)).await.expect("Exchange should store a record.");

	assert_eq!(record.access_token.expose(), "access-1");
	assert_eq!(record.refresh_token.expose(), "refresh-1");
	assert_eq!(record.issued_at, macros::datetime!(2025-06-01 08:00 UTC));
	assert_eq!(record.expires_at, macros::datetime!(2025-06-01 12:00 UTC));
}

#[tokio::test]
async fn rejected_code_is_exchange_failure_and_stores_nothing() {
	let server = MockServer::start_async().await;
	let (client, store, _clock) = build_client(&server);
	let mock = server
		.mock_async(|when, then| {
			when.method(POST).path("/api/v2/auth/token/get");
			then.status(200).header("content-type", "application/json").json_body(json!({
				"error": "error_auth",
				"message": "Invalid code",
				"request_id": "req-bad-code",
			}));
		})
		.await;
	let err = client
		.get_access_token("used-code", ShopId::new(SHOP_ID))
		.await
		.expect_err("A rejected code should fail the exchange.");

	mock.assert_async().await;

	match err {
		Error::ExchangeFailed { shop_id, source } => {
			assert_eq!(shop_id, ShopId::new(SHOP_ID));
			assert_eq!(source.error, "error_auth");
			assert_eq!(source.request_id.as_deref(), Some("req-bad-code"));
		},
		other => panic!("Unexpected error variant: {other:?}."),
	}

	assert!(store.is_empty());
}

#[tokio::test]
async fn exchange_replaces_existing_record() {
	let server = MockServer::start_async().await;
	let (client, store, clock) = build_client(&server);
	let first = server
		.mock_async(|when, then| {
			when.method(POST).path("/api/v2/auth/token/get").json_body(json!({
				"shop_id": SHOP_ID,
				"partner_id": PARTNER_ID,
				"code": "first",
			}));
			then.status(200).json_body(json!({
				"access_token": "access-first",
				"refresh_token": "refresh-first",
				"expire_in": 600,
			}));
		})
		.await;
	let second = server
		.mock_async(|when, then| {
			when.method(POST).path("/api/v2/auth/token/get").json_body(json!({
				"shop_id": SHOP_ID,
				"partner_id": PARTNER_ID,
				"code": "second",
			}));
			then.status(200).json_body(json!({
				"access_token": "access-second",
				"refresh_token": "refresh-second",
				"expire_in": 3_600,
			}));
		})
		.await;

	client
		.get_access_token("first", ShopId::new(SHOP_ID))
		.await
		.expect("First exchange should succeed.");
	clock.advance(Duration::minutes(1));
	client
		.get_access_token("second", ShopId::new(SHOP_ID))
		.await
		.expect("Second exchange should succeed.");

	first.assert_async().await;
	second.assert_async().await;

	let record = store.get_token(ShopId::new(SHOP_ID)).await.expect("Record should exist.");

	assert_eq!(store.len(), 1);
	assert_eq!(record.access_token.expose(), "access-second");
	assert_eq!(record.expires_at, macros::datetime!(2025-06-01 09:01 UTC));
}

#[tokio::test]
async fn gateway_failure_is_transport_error() {
	let server = MockServer::start_async().await;
	let (client, store, _clock) = build_client(&server);
	let mock = server
		.mock_async(|when, then| {
			when.method(POST).path("/api/v2/auth/token/get");
			then.status(503).header("retry-after", "30").body("upstream unavailable");
		})
		.await;
	let err = client
		.get_access_token("code-abc", ShopId::new(SHOP_ID))
		.await
		.expect_err("A 503 without an envelope should fail.");

	mock.assert_async().await;

	assert!(!err.requires_reauthorization());

	match err {
		Error::Transport(TransportError::Status { status, body, retry_after }) => {
			assert_eq!(status, 503);
			assert_eq!(body, "upstream unavailable");
			assert_eq!(retry_after, Some(Duration::seconds(30)));
		},
		other => panic!("Unexpected error variant: {other:?}."),
	}

	assert!(store.is_empty());
}

#[tokio::test]
async fn auth_url_targets_auth_partner_with_redirect() {
	let server = MockServer::start_async().await;
	let (client, _store, clock) = build_client(&server);
	let url = client
		.auth_url("https://app.example.com/api/shopee/auth-callback/demo")
		.expect("Authorization URL should build.");
	let pairs: HashMap<String, String> = url.query_pairs().into_owned().collect();
	let timestamp = clock.unix_timestamp();

	assert!(url.as_str().starts_with(&server.url("/api/v2/shop/auth_partner?")));
	assert_eq!(pairs["partner_id"], PARTNER_ID.to_string());
	assert_eq!(pairs["timestamp"], timestamp.to_string());
	assert_eq!(pairs["sign"], expected_sign("/api/v2/shop/auth_partner", timestamp));
	assert_eq!(pairs["redirect"], "https://app.example.com/api/shopee/auth-callback/demo");
}
