//! Transaction status payloads.

// self
use crate::{
	_prelude::*,
	model::{RemoteError, lenient_string, remote::remote_error},
};

/// Status description the gateway reports for settled payments.
pub const COMPLETED_STATUS: &str = "completed";

/// Transaction status response.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct TransactionStatus {
	/// Payment method used (e.g. `Visa`, `MpesaKE`).
	#[serde(default)]
	pub payment_method: Option<String>,
	/// Amount paid.
	#[serde(default)]
	pub amount: Option<f64>,
	/// Transaction creation timestamp.
	#[serde(default)]
	pub created_date: Option<String>,
	/// Payment confirmation code, required for refunds.
	#[serde(default)]
	pub confirmation_code: Option<String>,
	/// Status description (`Completed`, `Pending`, `Failed`, `Reversed`, ...).
	#[serde(default)]
	pub payment_status_description: Option<String>,
	/// Status details.
	#[serde(default)]
	pub description: Option<String>,
	/// Gateway message.
	#[serde(default)]
	pub message: Option<String>,
	/// Masked payer account.
	#[serde(default)]
	pub payment_account: Option<String>,
	/// Callback URL of the order.
	#[serde(default)]
	pub call_back_url: Option<String>,
	/// Numeric status code.
	#[serde(default, deserialize_with = "lenient_string")]
	pub status_code: Option<String>,
	/// Merchant reference of the order.
	#[serde(default)]
	pub merchant_reference: Option<String>,
	/// Payment status code.
	#[serde(default, deserialize_with = "lenient_string")]
	pub payment_status_code: Option<String>,
	/// ISO 4217 currency code.
	#[serde(default)]
	pub currency: Option<String>,
	/// Remote error, if the lookup was rejected.
	#[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "remote_error")]
	pub error: Option<RemoteError>,
	/// Gateway status code.
	#[serde(default, deserialize_with = "lenient_string")]
	pub status: Option<String>,
}
impl TransactionStatus {
	/// Returns the status description, or an empty string when absent.
	pub fn description(&self) -> &str {
		self.payment_status_description.as_deref().unwrap_or_default()
	}

	/// Returns `true` only when the description lower-cases to exactly `completed`.
	pub fn is_completed(&self) -> bool {
		self.description().to_lowercase() == COMPLETED_STATUS
	}
}
