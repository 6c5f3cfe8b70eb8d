//! Demonstrates connecting a client to a mock gateway, submitting an order against the
//! registered IPN, and polling the transaction status once the customer has paid.

// crates.io
use color_eyre::Result;
use httpmock::prelude::*;
use url::Url;
// self
use pesapal_gateway::{
	client::PesapalClient,
	config::ClientConfig,
	http::ReqwestHttpClient,
	model::{BillingAddress, NotificationTarget, PaymentDetails},
	reqwest::Client,
};

const IPN_URL: &str = "https://shop.example.com/ipn";
const TRACKING_ID: &str = "b945e4af-80a5-4ec1-8706-e03f8332fb04";

#[tokio::main]
async fn main() -> Result<()> {
	color_eyre::install()?;

	let server = MockServer::start_async().await;

	server
		.mock_async(|when, then| {
			when.method(POST).path("/api/Auth/RequestToken");
			then.status(200).header("content-type", "application/json").body(
				"{\"token\":\"demo-token\",\"expiryDate\":\"2099-01-01T00:00:00Z\",\"error\":null,\"status\":\"200\"}",
			);
		})
		.await;
	server
		.mock_async(|when, then| {
			when.method(POST).path("/api/URLSetup/RegisterIPN");
			then.status(200)
				.header("content-type", "application/json")
				.body("{\"url\":\"https://shop.example.com/ipn\",\"ipn_id\":\"demo-ipn\",\"status\":\"200\"}");
		})
		.await;
	server
		.mock_async(|when, then| {
			when.method(GET).path("/api/URLSetup/GetIpnList");
			then.status(200)
				.header("content-type", "application/json")
				.body("[{\"url\":\"https://shop.example.com/ipn\",\"ipn_id\":\"demo-ipn\"}]");
		})
		.await;

	let order_mock = server
		.mock_async(|when, then| {
			when.method(POST)
				.path("/api/Transactions/SubmitOrderRequest")
				.header("authorization", "Bearer demo-token")
				.body_includes("\"notification_id\":\"demo-ipn\"");
			then.status(200).header("content-type", "application/json").body(format!(
				"{{\"order_tracking_id\":\"{TRACKING_ID}\",\"merchant_reference\":\"ORDER-1001\",\"redirect_url\":\"https://pay.example.com/{TRACKING_ID}\",\"status\":\"200\"}}"
			));
		})
		.await;
	let status_mock = server
		.mock_async(|when, then| {
			when.method(GET)
				.path("/api/Transactions/GetTransactionStatus")
				.query_param("orderTrackingId", TRACKING_ID);
			then.status(200).header("content-type", "application/json").body(
				"{\"payment_method\":\"Visa\",\"amount\":2500,\"confirmation_code\":\"6513008693186320103009\",\"payment_status_description\":\"Completed\",\"merchant_reference\":\"ORDER-1001\",\"currency\":\"UGX\",\"error\":null,\"status\":\"200\"}",
			);
		})
		.await;
	let config = ClientConfig::builder()
		.environment_label("sandbox")
		.base_url(Url::parse(&server.base_url())?)
		.consumer_key("demo-key")
		.consumer_secret("demo-secret")
		.ipn_url(IPN_URL)
		.build()?;
	let http_client = ReqwestHttpClient::with_client(
		Client::builder()
			.danger_accept_invalid_certs(true)
			.danger_accept_invalid_hostnames(true)
			.build()?,
	);
	let client =
		<PesapalClient<ReqwestHttpClient>>::connect_with_http_client(config, http_client).await?;
	let details = PaymentDetails {
		id: "ORDER-1001".into(),
		currency: "UGX".into(),
		amount: 2500.0,
		description: "Two coffees".into(),
		callback_url: "https://shop.example.com/thanks".into(),
		notification: Some(NotificationTarget::Url(IPN_URL.into())),
		billing_address: BillingAddress {
			email_address: Some("customer@example.com".into()),
			..Default::default()
		},
		..Default::default()
	};
	let submission = client.submit_order(&details, None, None).await?;

	println!("Redirect the customer to {}.", submission.redirect_url);

	let status = client.get_transaction_status(&submission.order_tracking_id).await?;

	println!(
		"Order {} is {} ({}).",
		submission.merchant_reference,
		status.description(),
		status.confirmation_code.as_deref().unwrap_or("no confirmation code"),
	);

	order_mock.assert_async().await;
	status_mock.assert_async().await;

	Ok(())
}
