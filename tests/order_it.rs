// crates.io
use httpmock::prelude::*;
use serde_json::json;
// self
use pesapal_gateway::{
	_preludet::*,
	client::ReqwestPesapalClient,
	error::ValidationError,
	model::{
		BillingAddress, Frequency, NotificationMethod, NotificationTarget, PaymentDetails,
		SubscriptionDetails,
	},
};

const FUTURE_EXPIRY: &str = "2099-01-01T00:00:00Z";

fn details(notification: NotificationTarget) -> PaymentDetails {
	PaymentDetails {
		id: "TEST1515111119".into(),
		currency: "KES".into(),
		amount: 100.0,
		description: "Payment description goes here".into(),
		callback_url: "https://shop.example.com/response-page".into(),
		notification: Some(notification),
		billing_address: BillingAddress {
			email_address: Some("john.doe@example.com".into()),
			phone_number: Some("0723xxxxxx".into()),
			country_code: Some("KE".into()),
			first_name: Some("John".into()),
			last_name: Some("Doe".into()),
			..Default::default()
		},
		..Default::default()
	}
}

async fn registered_client(
	server: &MockServer,
) -> (ReqwestPesapalClient, Arc<RecordingDiagnostics>) {
	let (client, diagnostics) = build_reqwest_test_client(test_config(&server.base_url()));

	server
		.mock_async(|when, then| {
			when.method(POST).path("/api/Auth/RequestToken");
			then.status(200)
				.header("content-type", "application/json")
				.body(token_body("order-token", FUTURE_EXPIRY));
		})
		.await;
	server
		.mock_async(|when, then| {
			when.method(POST).path("/api/URLSetup/RegisterIPN");
			then.status(200)
				.header("content-type", "application/json")
				.body("{\"url\":\"https://example.com/ipn\",\"ipn_id\":\"ipn-abc\",\"status\":\"200\"}");
		})
		.await;

	client
		.register_ipn(TEST_IPN_URL, NotificationMethod::Get)
		.await
		.expect("Registration should succeed against the mock.");

	(client, diagnostics)
}

#[tokio::test]
async fn submit_order_resolves_ipn_url_and_returns_redirect() {
	let server = MockServer::start_async().await;
	let (client, diagnostics) = registered_client(&server).await;
	let mock = server
		.mock_async(|when, then| {
			when.method(POST)
				.path("/api/Transactions/SubmitOrderRequest")
				.header("authorization", "Bearer order-token")
				.json_body(json!({
					"id": "TEST1515111119",
					"currency": "KES",
					"amount": 100.0,
					"description": "Payment description goes here",
					"callback_url": "https://shop.example.com/response-page",
					"notification_id": "ipn-abc",
					"billing_address": {
						"email_address": "john.doe@example.com",
						"phone_number": "0723xxxxxx",
						"country_code": "KE",
						"first_name": "John",
						"last_name": "Doe",
					},
				}));
			then.status(200).header("content-type", "application/json").body(
				"{\"order_tracking_id\":\"b945e4af-80a5-4ec1-8706-e03f8332fb04\",\"merchant_reference\":\"TEST1515111119\",\"redirect_url\":\"https://cybqa.pesapal.com/pesapaliframe/PesapalIframe3/Index/?OrderTrackingId=b945e4af-80a5-4ec1-8706-e03f8332fb04\",\"error\":null,\"status\":\"200\"}",
			);
		})
		.await;
	let submission = client
		.submit_order(&details(NotificationTarget::Url(TEST_IPN_URL.into())), None, None)
		.await
		.expect("Order submission should succeed against the mock.");

	mock.assert_async().await;

	assert_eq!(submission.http_status, 200);
	assert_eq!(submission.order_tracking_id, "b945e4af-80a5-4ec1-8706-e03f8332fb04");
	assert_eq!(submission.merchant_reference, "TEST1515111119");
	assert!(submission.redirect_url.contains("OrderTrackingId="));
	assert_eq!(submission.status.as_deref(), Some("200"));
	assert_eq!(diagnostics.count("order_submitted"), 1);
}

#[tokio::test]
async fn submit_order_prefers_explicit_product_id_and_description() {
	let server = MockServer::start_async().await;
	let (client, _) = registered_client(&server).await;
	let mock = server
		.mock_async(|when, then| {
			when.method(POST)
				.path("/api/Transactions/SubmitOrderRequest")
				.body_includes("\"id\":\"product-42\"")
				.body_includes("\"description\":\"Override\"")
				.body_includes("\"notification_id\":\"direct-id\"");
			then.status(200)
				.header("content-type", "application/json")
				.body("{\"order_tracking_id\":\"t-1\",\"merchant_reference\":\"product-42\",\"redirect_url\":\"https://pay.example.com/t-1\",\"status\":\"200\"}");
		})
		.await;

	client
		.submit_order(
			&details(NotificationTarget::Id("direct-id".into())),
			Some("product-42"),
			Some("Override"),
		)
		.await
		.expect("Order submission with overrides should succeed.");

	mock.assert_async().await;
}

#[tokio::test]
async fn account_number_without_schedule_fails_before_network() {
	let server = MockServer::start_async().await;
	let (client, _) = registered_client(&server).await;
	let mock = server
		.mock_async(|when, then| {
			when.method(POST).path("/api/Transactions/SubmitOrderRequest");
			then.status(200).body("{}");
		})
		.await;
	let mut recurring = details(NotificationTarget::Url(TEST_IPN_URL.into()));

	recurring.account_number = Some("ACC-001".into());

	let err = client
		.submit_order(&recurring, None, None)
		.await
		.expect_err("Account number without schedule should be rejected.");

	assert!(matches!(err, Error::Validation(ValidationError::MissingSubscriptionDetails)));

	recurring.subscription_details = Some(SubscriptionDetails {
		start_date: Some("24-01-2025".into()),
		end_date: None,
		frequency: Some(Frequency::Monthly),
	});

	let err = client
		.submit_order(&recurring, None, None)
		.await
		.expect_err("Partial schedule should be rejected.");

	assert!(matches!(
		err,
		Error::Validation(ValidationError::IncompleteSubscriptionDetails { field: "end_date" })
	));

	mock.assert_calls_async(0).await;
}

#[tokio::test]
async fn recurring_order_sends_subscription_details() {
	let server = MockServer::start_async().await;
	let (client, _) = registered_client(&server).await;
	let mock = server
		.mock_async(|when, then| {
			when.method(POST)
				.path("/api/Transactions/SubmitOrderRequest")
				.body_includes("\"account_number\":\"ACC-001\"")
				.body_includes("\"frequency\":\"MONTHLY\"");
			then.status(200)
				.header("content-type", "application/json")
				.body("{\"order_tracking_id\":\"t-2\",\"merchant_reference\":\"TEST1515111119\",\"redirect_url\":\"https://pay.example.com/t-2\",\"status\":\"200\"}");
		})
		.await;
	let mut recurring = details(NotificationTarget::Url(TEST_IPN_URL.into()));

	recurring.account_number = Some("ACC-001".into());
	recurring.subscription_details =
		Some(SubscriptionDetails::new("24-01-2025", "31-12-2025", Frequency::Monthly));

	client
		.submit_order(&recurring, None, None)
		.await
		.expect("Complete recurring order should be submitted.");

	mock.assert_async().await;
}

#[tokio::test]
async fn unknown_ipn_url_is_an_explicit_mismatch() {
	let server = MockServer::start_async().await;
	let (client, _) = registered_client(&server).await;
	let err = client
		.submit_order(
			&details(NotificationTarget::Url("https://example.com/unregistered".into())),
			None,
			None,
		)
		.await
		.expect_err("Unregistered IPN URL should be rejected.");

	assert!(matches!(
		&err,
		Error::Validation(ValidationError::IpnUrlMismatch { url })
			if url == "https://example.com/unregistered"
	));
	assert_eq!(
		err.to_string(),
		"Notification IPN URL does not match: https://example.com/unregistered."
	);
}

#[tokio::test]
async fn missing_ids_and_ipns_fail_locally() {
	let server = MockServer::start_async().await;
	let (client, diagnostics) = build_reqwest_test_client(test_config(&server.base_url()));
	let token = server
		.mock_async(|when, then| {
			when.method(POST).path("/api/Auth/RequestToken");
			then.status(200).body(token_body("unused", FUTURE_EXPIRY));
		})
		.await;
	let mut blank = details(NotificationTarget::Id("direct-id".into()));

	blank.id = " ".into();

	assert!(matches!(
		client.submit_order(&blank, None, Some("described")).await,
		Err(Error::Validation(ValidationError::MissingProductId))
	));

	blank.id = "order-1".into();
	blank.description = String::new();

	assert!(matches!(
		client.submit_order(&blank, None, None).await,
		Err(Error::Validation(ValidationError::MissingDescription))
	));
	assert!(matches!(
		client
			.submit_order(&details(NotificationTarget::Id("direct-id".into())), None, None)
			.await,
		Err(Error::Validation(ValidationError::NoRegisteredIpns))
	));

	token.assert_calls_async(0).await;

	assert_eq!(diagnostics.count("operation_failed"), 3);
}

#[tokio::test]
async fn missing_notification_target_is_rejected() {
	let server = MockServer::start_async().await;
	let (client, _) = registered_client(&server).await;
	let mut order = details(NotificationTarget::Id(String::new()));

	assert!(matches!(
		client.submit_order(&order, None, None).await,
		Err(Error::Validation(ValidationError::MissingNotificationTarget))
	));

	order.notification = None;

	assert!(matches!(
		client.submit_order(&order, None, None).await,
		Err(Error::Validation(ValidationError::MissingNotificationTarget))
	));
}

#[tokio::test]
async fn structured_order_error_becomes_gateway_error() {
	let server = MockServer::start_async().await;
	let (client, _) = registered_client(&server).await;

	server
		.mock_async(|when, then| {
			when.method(POST).path("/api/Transactions/SubmitOrderRequest");
			then.status(200).header("content-type", "application/json").body(
				"{\"order_tracking_id\":null,\"merchant_reference\":null,\"redirect_url\":null,\"error\":{\"error_type\":\"api_error\",\"code\":\"payment_details_not_found\",\"message\":\"Payment details not found\"},\"status\":\"500\"}",
			);
		})
		.await;

	let err = client
		.submit_order(&details(NotificationTarget::Url(TEST_IPN_URL.into())), None, None)
		.await
		.expect_err("Structured order error should fail the submission.");

	assert!(matches!(
		&err,
		Error::Gateway(details) if details.code.as_deref() == Some("payment_details_not_found")
	));
}
