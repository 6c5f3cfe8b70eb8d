//! Gateway endpoint catalog.

// crates.io
use http::Method;
// self
use crate::{_prelude::*, error::ConfigError};

/// Gateway endpoints used by the client.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Endpoint {
	/// Bearer token exchange.
	RequestToken,
	/// IPN registration.
	RegisterIpn,
	/// IPN listing.
	ListIpns,
	/// Order submission.
	SubmitOrder,
	/// Transaction status lookup.
	TransactionStatus,
	/// Refund request.
	Refund,
}
impl Endpoint {
	/// Returns the HTTP method the endpoint expects.
	pub fn method(self) -> Method {
		match self {
			Self::ListIpns | Self::TransactionStatus => Method::GET,
			Self::RequestToken | Self::RegisterIpn | Self::SubmitOrder | Self::Refund =>
				Method::POST,
		}
	}

	/// Returns the path relative to the gateway base URL.
	pub const fn path(self) -> &'static str {
		match self {
			Self::RequestToken => "api/Auth/RequestToken",
			Self::RegisterIpn => "api/URLSetup/RegisterIPN",
			Self::ListIpns => "api/URLSetup/GetIpnList",
			Self::SubmitOrder => "api/Transactions/SubmitOrderRequest",
			Self::TransactionStatus => "api/Transactions/GetTransactionStatus",
			// The gateway really spells it this way.
			Self::Refund => "api/Transactions/RefundRequestt",
		}
	}

	/// Joins the endpoint path onto `base`, keeping any path prefix the base carries.
	pub fn url(self, base: &Url) -> Result<Url, ConfigError> {
		let mut url = base.clone();

		url.path_segments_mut()
			.map_err(|_| ConfigError::InvalidBaseUrl { url: base.to_string(), source: None })?
			.pop_if_empty()
			.extend(self.path().split('/'));

		Ok(url)
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;
	use crate::config::{LIVE_BASE_URL, SANDBOX_BASE_URL};

	#[test]
	fn urls_keep_the_base_path_prefix() {
		let sandbox = Url::parse(SANDBOX_BASE_URL).expect("Sandbox base URL should parse.");
		let live = Url::parse(&format!("{LIVE_BASE_URL}/")).expect("Live base URL should parse.");

		assert_eq!(
			Endpoint::RequestToken.url(&sandbox).expect("Token URL should build.").as_str(),
			"https://cybqa.pesapal.com/pesapalv3/api/Auth/RequestToken"
		);
		assert_eq!(
			Endpoint::Refund.url(&live).expect("Refund URL should build.").as_str(),
			"https://pay.pesapal.com/v3/api/Transactions/RefundRequestt"
		);
	}

	#[test]
	fn lookups_use_get() {
		assert_eq!(Endpoint::ListIpns.method(), Method::GET);
		assert_eq!(Endpoint::TransactionStatus.method(), Method::GET);
		assert_eq!(Endpoint::SubmitOrder.method(), Method::POST);
	}

	#[test]
	fn opaque_base_is_rejected() {
		let base = Url::parse("mailto:ops@example.com").expect("Opaque URL should parse.");

		assert!(matches!(
			Endpoint::ListIpns.url(&base),
			Err(ConfigError::InvalidBaseUrl { source: None, .. })
		));
	}
}
