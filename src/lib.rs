//! Async Pesapal v3 client: bearer-token lifecycle, IPN registration, order submission,
//! transaction-status polling, and refunds over a pluggable HTTP transport.

#![deny(clippy::all, missing_docs, unused_crate_dependencies)]

pub mod auth;
pub mod client;
pub mod config;
pub mod endpoint;
pub mod error;
pub mod http;
pub mod model;
pub mod obs;
#[cfg(all(any(test, feature = "test"), feature = "reqwest"))]
pub mod _preludet {
	//! Convenience re-exports and helpers for integration tests; enabled via `cfg(test)` or the
	//! `test` crate feature.

	pub use crate::_prelude::*;

	// self
	use crate::{
		client::ReqwestPesapalClient,
		config::{ClientConfig, IpnUrl},
		http::ReqwestHttpClient,
		obs::{DiagnosticEvent, Diagnostics},
	};

	/// Consumer key used by test configurations.
	pub const TEST_CONSUMER_KEY: &str = "qkio1BGGYAXTu2JOfm7XSXNruoZsrqEW";
	/// Consumer secret used by test configurations.
	pub const TEST_CONSUMER_SECRET: &str = "osGQ364R49cXKeOYSpaOnT++rHs=";
	/// IPN URL registered by test configurations.
	pub const TEST_IPN_URL: &str = "https://example.com/ipn";

	/// Diagnostics sink that keeps the label of every recorded event.
	#[derive(Debug, Default)]
	pub struct RecordingDiagnostics(Mutex<Vec<&'static str>>);
	impl RecordingDiagnostics {
		/// Returns the labels recorded so far, in order.
		pub fn labels(&self) -> Vec<&'static str> {
			self.0.lock().clone()
		}

		/// Counts how many events carried the provided label.
		pub fn count(&self, label: &str) -> usize {
			self.0.lock().iter().filter(|recorded| **recorded == label).count()
		}
	}
	impl Diagnostics for RecordingDiagnostics {
		fn record(&self, event: &DiagnosticEvent<'_>) {
			self.0.lock().push(event.label());
		}
	}

	/// Builds a reqwest HTTP client that accepts the self-signed certificates produced by
	/// `httpmock` during tests.
	pub fn test_reqwest_http_client() -> ReqwestHttpClient {
		let client = ReqwestClient::builder()
			.danger_accept_invalid_certs(true)
			.danger_accept_invalid_hostnames(true)
			.build()
			.expect("Failed to build insecure Reqwest client for tests.");

		ReqwestHttpClient::with_client(client)
	}

	/// Builds a configuration that targets `base_url` with one GET IPN and no pacing delay.
	pub fn test_config(base_url: &str) -> ClientConfig {
		ClientConfig::builder()
			.environment_label("sandbox")
			.base_url(Url::parse(base_url).expect("Mock gateway base URL should parse."))
			.consumer_key(TEST_CONSUMER_KEY)
			.consumer_secret(TEST_CONSUMER_SECRET)
			.ipn_url(IpnUrl::new(TEST_IPN_URL))
			.registration_delay(StdDuration::ZERO)
			.build()
			.expect("Test configuration should be valid.")
	}

	/// Constructs a client over [`test_reqwest_http_client`] with recording diagnostics
	/// attached.
	pub fn build_reqwest_test_client(
		config: ClientConfig,
	) -> (ReqwestPesapalClient, Arc<RecordingDiagnostics>) {
		let diagnostics = Arc::new(RecordingDiagnostics::default());
		let client = ReqwestPesapalClient::with_http_client(config, test_reqwest_http_client())
			.with_diagnostics(diagnostics.clone());

		(client, diagnostics)
	}

	/// Token endpoint body carrying `token` and the raw `expiry` string.
	pub fn token_body(token: &str, expiry: &str) -> String {
		format!(
			"{{\"token\":\"{token}\",\"expiryDate\":\"{expiry}\",\"error\":null,\"status\":\"200\",\"message\":\"Request processed successfully\"}}"
		)
	}
}

mod _prelude {
	pub use std::{
		error::Error as StdError,
		fmt::{Debug, Display, Formatter, Result as FmtResult},
		future::Future,
		pin::Pin,
		str::FromStr,
		sync::Arc,
		time::Duration as StdDuration,
	};

	pub use async_lock::Mutex as AsyncMutex;
	pub use parking_lot::{Mutex, RwLock};
	#[cfg(feature = "reqwest")]
	pub use reqwest::{Client as ReqwestClient, Error as ReqwestError};
	pub use serde::{Deserialize, Serialize};
	pub use thiserror::Error as ThisError;
	pub use time::{Duration, OffsetDateTime};
	pub use url::Url;

	pub use crate::error::{Error, Result};
}

#[cfg(feature = "reqwest")] pub use reqwest;
pub use url;
#[cfg(all(test, feature = "reqwest"))] use {color_eyre as _, httpmock as _};
