// crates.io
use httpmock::prelude::*;
use serde_json::json;
// self
use pesapal_gateway::{
	_preludet::*,
	error::ValidationError,
	model::{NotificationMethod, NotificationTarget},
};

const FUTURE_EXPIRY: &str = "2099-01-01T00:00:00Z";

async fn mock_token(server: &MockServer) {
	server
		.mock_async(|when, then| {
			when.method(POST).path("/api/Auth/RequestToken");
			then.status(200)
				.header("content-type", "application/json")
				.body(token_body("ipn-token", FUTURE_EXPIRY));
		})
		.await;
}

#[tokio::test]
async fn register_ipn_appends_the_returned_record() {
	let server = MockServer::start_async().await;
	let (client, diagnostics) = build_reqwest_test_client(test_config(&server.base_url()));

	mock_token(&server).await;

	let mock = server
		.mock_async(|when, then| {
			when.method(POST)
				.path("/api/URLSetup/RegisterIPN")
				.header("authorization", "Bearer ipn-token")
				.json_body(json!({ "url": TEST_IPN_URL, "ipn_notification_type": "GET" }));
			then.status(200).header("content-type", "application/json").body(
				"{\"url\":\"https://example.com/ipn\",\"created_date\":\"2022-03-03T17:29:03.7208266Z\",\"ipn_id\":\"abc123\",\"error\":null,\"status\":\"200\"}",
			);
		})
		.await;
	let record = client
		.register_ipn(TEST_IPN_URL, NotificationMethod::Get)
		.await
		.expect("Registration should succeed against the mock.");

	mock.assert_async().await;

	assert_eq!(record.ipn_id, "abc123");

	let ipns = client.ipns();

	assert_eq!(ipns.len(), 1);
	assert_eq!(ipns[0].ipn_id, "abc123");
	assert_eq!(ipns[0].url, TEST_IPN_URL);
	assert_eq!(diagnostics.labels(), vec!["token_acquired", "ipn_registered"]);
}

#[tokio::test]
async fn register_ipn_sends_post_method() {
	let server = MockServer::start_async().await;
	let (client, _) = build_reqwest_test_client(test_config(&server.base_url()));

	mock_token(&server).await;

	let mock = server
		.mock_async(|when, then| {
			when.method(POST).path("/api/URLSetup/RegisterIPN").json_body(json!({
				"url": "https://shop.example.com/ipn/post",
				"ipn_notification_type": "POST",
			}));
			then.status(200)
				.header("content-type", "application/json")
				.body("{\"url\":\"https://shop.example.com/ipn/post\",\"ipn_id\":\"post-1\",\"status\":\"200\"}");
		})
		.await;

	client
		.register_ipn("https://shop.example.com/ipn/post", NotificationMethod::Post)
		.await
		.expect("POST registration should succeed.");

	mock.assert_async().await;
}

#[tokio::test]
async fn register_ipn_splits_remote_errors_by_shape() {
	let server = MockServer::start_async().await;
	let (client, _) = build_reqwest_test_client(test_config(&server.base_url()));

	mock_token(&server).await;

	let mut structured = server
		.mock_async(|when, then| {
			when.method(POST).path("/api/URLSetup/RegisterIPN");
			then.status(200).header("content-type", "application/json").body(
				"{\"error\":{\"error_type\":\"api_error\",\"code\":\"invalid_ipn_url\",\"message\":\"IPN URL is invalid\"},\"status\":\"500\"}",
			);
		})
		.await;
	let err = client
		.register_ipn(TEST_IPN_URL, NotificationMethod::Get)
		.await
		.expect_err("Structured error should fail the registration.");

	assert!(matches!(
		&err,
		Error::Gateway(details) if details.code.as_deref() == Some("invalid_ipn_url")
	));

	structured.delete_async().await;
	server
		.mock_async(|when, then| {
			when.method(POST).path("/api/URLSetup/RegisterIPN");
			then.status(200)
				.header("content-type", "application/json")
				.body("{\"error\":\"duplicate registration\",\"status\":\"500\"}");
		})
		.await;

	let err = client
		.register_ipn(TEST_IPN_URL, NotificationMethod::Get)
		.await
		.expect_err("String error should fail the registration.");

	assert!(matches!(&err, Error::Remote { message } if message == "duplicate registration"));
	assert!(client.ipns().is_empty());
}

#[tokio::test]
async fn register_ipn_stringifies_unstructured_errors() {
	let server = MockServer::start_async().await;
	let (client, _) = build_reqwest_test_client(test_config(&server.base_url()));

	mock_token(&server).await;
	server
		.mock_async(|when, then| {
			when.method(POST).path("/api/URLSetup/RegisterIPN");
			then.status(200)
				.header("content-type", "application/json")
				.body("{\"error\":[\"url\",\"rejected\"],\"status\":\"500\"}");
		})
		.await;

	let err = client
		.register_ipn(TEST_IPN_URL, NotificationMethod::Get)
		.await
		.expect_err("Array error should fail the registration.");

	assert!(matches!(&err, Error::Remote { message } if message == r#"["url","rejected"]"#));
	assert!(client.ipns().is_empty());
}

#[tokio::test]
async fn register_ipn_rejects_records_without_an_id() {
	let server = MockServer::start_async().await;
	let (client, diagnostics) = build_reqwest_test_client(test_config(&server.base_url()));

	mock_token(&server).await;
	server
		.mock_async(|when, then| {
			when.method(POST).path("/api/URLSetup/RegisterIPN");
			then.status(200)
				.header("content-type", "application/json")
				.body("{\"url\":\"https://example.com/ipn\",\"ipn_id\":null,\"error\":null,\"status\":\"200\"}");
		})
		.await;

	let err = client
		.register_ipn(TEST_IPN_URL, NotificationMethod::Get)
		.await
		.expect_err("A registration without an id should fail.");

	assert!(matches!(err, Error::IncompleteResponse { operation: "register_ipn", field: "ipn_id" }));
	assert!(client.ipns().is_empty());
	assert_eq!(diagnostics.count("ipn_registered"), 0);
	assert!(matches!(
		client.resolve_notification_id(Some(&NotificationTarget::Url(TEST_IPN_URL.into()))),
		Err(ValidationError::NoRegisteredIpns)
	));
}

#[tokio::test]
async fn register_ipn_rejects_invalid_urls_before_network() {
	let server = MockServer::start_async().await;
	let (client, _) = build_reqwest_test_client(test_config(&server.base_url()));
	let token = server
		.mock_async(|when, then| {
			when.method(POST).path("/api/Auth/RequestToken");
			then.status(200).body(token_body("unused", FUTURE_EXPIRY));
		})
		.await;
	let err = client
		.register_ipn("ftp://example.com/ipn", NotificationMethod::Get)
		.await
		.expect_err("Non-HTTP IPN URL should be rejected.");

	token.assert_calls_async(0).await;

	assert!(matches!(err, Error::Config(_)));
}

#[tokio::test]
async fn list_ipns_replaces_the_local_collection() {
	let server = MockServer::start_async().await;
	let (client, diagnostics) = build_reqwest_test_client(test_config(&server.base_url()));

	mock_token(&server).await;

	let mock = server
		.mock_async(|when, then| {
			when.method(GET)
				.path("/api/URLSetup/GetIpnList")
				.header("authorization", "Bearer ipn-token");
			then.status(200).header("content-type", "application/json").body(
				"[{\"url\":\"https://example.com/ipn\",\"created_date\":\"2022-03-03T17:29:03.7208266Z\",\"ipn_id\":\"first\",\"ipn_notification_type_description\":\"GET\",\"ipn_status_description\":\"Active\",\"error\":null,\"status\":\"200\"},{\"url\":\"https://example.com/ipn/other\",\"created_date\":\"2022-03-04T17:29:03.7208266Z\",\"ipn_id\":\"second\",\"ipn_notification_type_description\":\"POST\",\"ipn_status_description\":\"Active\",\"error\":null,\"status\":\"200\"}]",
			);
		})
		.await;
	let records = client.list_ipns().await.expect("Listing should succeed against the mock.");

	mock.assert_async().await;

	assert_eq!(records.len(), 2);
	assert_eq!(
		client.ipns().iter().map(|ipn| ipn.ipn_id.as_str()).collect::<Vec<_>>(),
		vec!["first", "second"]
	);
	assert_eq!(diagnostics.count("ipn_list_refreshed"), 1);
}

#[tokio::test]
async fn list_ipns_drops_records_without_an_id() {
	let server = MockServer::start_async().await;
	let (client, _) = build_reqwest_test_client(test_config(&server.base_url()));

	mock_token(&server).await;
	server
		.mock_async(|when, then| {
			when.method(GET).path("/api/URLSetup/GetIpnList");
			then.status(200).header("content-type", "application/json").body(
				"[{\"url\":\"https://example.com/ipn\",\"ipn_id\":\"\",\"error\":null},{\"url\":\"https://example.com/ipn\",\"ipn_id\":\"usable\",\"error\":null}]",
			);
		})
		.await;

	let records = client.list_ipns().await.expect("Listing should succeed against the mock.");

	assert_eq!(records.len(), 1);
	assert_eq!(
		client
			.resolve_notification_id(Some(&NotificationTarget::Url(TEST_IPN_URL.into())))
			.expect("The URL should resolve to the record that carries an id."),
		"usable"
	);
}

#[tokio::test]
async fn list_ipns_error_keeps_previous_collection() {
	let server = MockServer::start_async().await;
	let (client, _) = build_reqwest_test_client(test_config(&server.base_url()));

	mock_token(&server).await;
	server
		.mock_async(|when, then| {
			when.method(POST).path("/api/URLSetup/RegisterIPN");
			then.status(200)
				.header("content-type", "application/json")
				.body("{\"url\":\"https://example.com/ipn\",\"ipn_id\":\"kept\",\"status\":\"200\"}");
		})
		.await;
	server
		.mock_async(|when, then| {
			when.method(GET).path("/api/URLSetup/GetIpnList");
			then.status(200).header("content-type", "application/json").body(
				"[{\"error\":{\"type\":\"api_error\",\"code\":\"unauthorized\",\"message\":\"Token expired\"},\"status\":\"401\"}]",
			);
		})
		.await;

	client
		.register_ipn(TEST_IPN_URL, NotificationMethod::Get)
		.await
		.expect("Registration should succeed.");

	let err = client.list_ipns().await.expect_err("Error-shaped listing should fail.");

	assert!(matches!(
		&err,
		Error::Gateway(details) if details.message.as_deref() == Some("Token expired")
	));
	assert_eq!(client.ipns().len(), 1);
	assert_eq!(client.ipns()[0].ipn_id, "kept");
}

#[tokio::test]
async fn malformed_listing_reports_decode_error() {
	let server = MockServer::start_async().await;
	let (client, _) = build_reqwest_test_client(test_config(&server.base_url()));

	mock_token(&server).await;
	server
		.mock_async(|when, then| {
			when.method(GET).path("/api/URLSetup/GetIpnList");
			then.status(500).body("Internal Server Error");
		})
		.await;

	let err = client.list_ipns().await.expect_err("Non-JSON listing should fail.");

	assert!(matches!(err, Error::Decode { operation: "list_ipns", status: 500, .. }));
}
