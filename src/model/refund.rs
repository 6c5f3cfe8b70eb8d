//! Refund payloads.

// self
use crate::{_prelude::*, model::lenient_string};

/// Refund request body.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RefundRequest {
	/// Confirmation code of the payment being refunded.
	pub confirmation_code: String,
	/// Amount to refund.
	pub amount: String,
	/// Merchant user requesting the refund.
	pub username: String,
	/// Reason for the refund.
	pub remarks: String,
}

/// Refund response body.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RefundResponse {
	/// Gateway status code (`200` accepted, `500` rejected).
	#[serde(default, deserialize_with = "lenient_string")]
	pub status: Option<String>,
	/// Gateway message.
	#[serde(default)]
	pub message: Option<String>,
}
