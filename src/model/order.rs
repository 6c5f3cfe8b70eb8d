//! Order submission payloads and local validation of recurring-payment data.

// self
use crate::{
	_prelude::*,
	error::ValidationError,
	model::{RemoteError, lenient_string, null_as_default, remote::remote_error},
};

/// Country code sent when the billing address leaves it empty.
pub const DEFAULT_COUNTRY_CODE: &str = "UG";
/// Currency sent when the payment details leave it empty.
pub const DEFAULT_CURRENCY: &str = "UGX";

/// How an order references the IPN the gateway should notify.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum NotificationTarget {
	/// Gateway-assigned IPN id, used as-is.
	Id(String),
	/// IPN URL, resolved against the client's registered IPNs.
	Url(String),
}

/// Billing cadence of a recurring payment.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Frequency {
	/// Every day.
	Daily,
	/// Every week.
	Weekly,
	/// Every month.
	Monthly,
	/// Every year.
	Yearly,
}

/// Recurring-payment schedule. Every field must be present once the block is supplied.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubscriptionDetails {
	/// First billing date.
	pub start_date: Option<String>,
	/// Last billing date.
	pub end_date: Option<String>,
	/// Billing cadence.
	pub frequency: Option<Frequency>,
}
impl SubscriptionDetails {
	/// Creates a fully populated schedule.
	pub fn new(
		start_date: impl Into<String>,
		end_date: impl Into<String>,
		frequency: Frequency,
	) -> Self {
		Self {
			start_date: Some(start_date.into()),
			end_date: Some(end_date.into()),
			frequency: Some(frequency),
		}
	}

	/// Ensures every field is populated.
	pub fn validate(&self) -> Result<(), ValidationError> {
		if is_blank(self.start_date.as_deref()) {
			return Err(ValidationError::IncompleteSubscriptionDetails { field: "start_date" });
		}
		if is_blank(self.end_date.as_deref()) {
			return Err(ValidationError::IncompleteSubscriptionDetails { field: "end_date" });
		}
		if self.frequency.is_none() {
			return Err(ValidationError::IncompleteSubscriptionDetails { field: "frequency" });
		}

		Ok(())
	}
}

/// Customer billing information.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BillingAddress {
	/// Customer email; the gateway requires either this or the phone number.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub email_address: Option<String>,
	/// Customer phone number.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub phone_number: Option<String>,
	/// ISO 3166 country code.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub country_code: Option<String>,
	/// First name.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub first_name: Option<String>,
	/// Middle name.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub middle_name: Option<String>,
	/// Last name.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub last_name: Option<String>,
	/// Address line 1.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub line_1: Option<String>,
	/// Address line 2.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub line_2: Option<String>,
	/// City.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub city: Option<String>,
	/// State or region.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub state: Option<String>,
	/// Postal code.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub postal_code: Option<String>,
	/// Zip code.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub zip_code: Option<String>,
}

/// Caller-supplied order data.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PaymentDetails {
	/// Merchant order id; used when no product id argument is given.
	pub id: String,
	/// ISO 4217 currency code.
	pub currency: String,
	/// Amount in `currency`.
	pub amount: f64,
	/// Order description; used when no description argument is given.
	pub description: String,
	/// URL the customer is redirected to after payment.
	pub callback_url: String,
	/// URL the customer is redirected to after cancelling.
	pub cancellation_url: Option<String>,
	/// IPN the gateway should notify about this order.
	pub notification: Option<NotificationTarget>,
	/// Customer billing information.
	pub billing_address: BillingAddress,
	/// Customer account number for recurring payments.
	pub account_number: Option<String>,
	/// Recurring-payment schedule.
	pub subscription_details: Option<SubscriptionDetails>,
}
impl PaymentDetails {
	/// Checks the recurring-payment invariant: an account number requires a schedule, and any
	/// schedule must be complete.
	pub fn validate_recurring(&self) -> Result<(), ValidationError> {
		match (&self.account_number, &self.subscription_details) {
			(_, Some(schedule)) => schedule.validate(),
			(Some(account), None) if !account.trim().is_empty() =>
				Err(ValidationError::MissingSubscriptionDetails),
			_ => Ok(()),
		}
	}
}

/// Body of an order submission request.
#[derive(Clone, Debug, Serialize)]
pub struct OrderRequest<'a> {
	/// Merchant order id.
	pub id: &'a str,
	/// ISO 4217 currency code.
	pub currency: &'a str,
	/// Amount in `currency`.
	pub amount: f64,
	/// Order description.
	pub description: &'a str,
	/// Post-payment redirect.
	pub callback_url: &'a str,
	/// Post-cancellation redirect.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub cancellation_url: Option<&'a str>,
	/// Resolved IPN id.
	pub notification_id: &'a str,
	/// Billing information with defaults applied.
	pub billing_address: BillingAddress,
	/// Recurring account number.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub account_number: Option<&'a str>,
	/// Recurring schedule.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub subscription_details: Option<&'a SubscriptionDetails>,
}
impl<'a> OrderRequest<'a> {
	/// Assembles the wire body from validated inputs.
	pub fn new(
		details: &'a PaymentDetails,
		id: &'a str,
		description: &'a str,
		notification_id: &'a str,
	) -> Self {
		let mut billing_address = details.billing_address.clone();

		if is_blank(billing_address.country_code.as_deref()) {
			billing_address.country_code = Some(DEFAULT_COUNTRY_CODE.into());
		}

		Self {
			id,
			currency: if details.currency.trim().is_empty() {
				DEFAULT_CURRENCY
			} else {
				details.currency.as_str()
			},
			amount: details.amount,
			description,
			callback_url: &details.callback_url,
			cancellation_url: details.cancellation_url.as_deref(),
			notification_id,
			billing_address,
			account_number: details.account_number.as_deref().filter(|value| !value.is_empty()),
			subscription_details: details.subscription_details.as_ref(),
		}
	}
}

/// Order submission response.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct OrderResponse {
	/// Gateway order tracking id.
	#[serde(default, deserialize_with = "null_as_default")]
	pub order_tracking_id: String,
	/// Merchant reference echoed by the gateway.
	#[serde(default, deserialize_with = "null_as_default")]
	pub merchant_reference: String,
	/// Hosted payment page URL.
	#[serde(default, deserialize_with = "null_as_default")]
	pub redirect_url: String,
	/// Remote error, if the order was rejected.
	#[serde(default, deserialize_with = "remote_error")]
	pub error: Option<RemoteError>,
	/// Gateway status code.
	#[serde(default, deserialize_with = "lenient_string")]
	pub status: Option<String>,
}

/// Successful order submission.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OrderSubmission {
	/// HTTP status of the submission response.
	pub http_status: u16,
	/// Gateway order tracking id, used for status lookups.
	pub order_tracking_id: String,
	/// Merchant reference echoed by the gateway.
	pub merchant_reference: String,
	/// Hosted payment page URL to send the customer to.
	pub redirect_url: String,
	/// Gateway status code.
	pub status: Option<String>,
}

fn is_blank(value: Option<&str>) -> bool {
	value.is_none_or(|value| value.trim().is_empty())
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	fn details() -> PaymentDetails {
		PaymentDetails {
			id: "order-1".into(),
			amount: 1000.0,
			description: "Coffee beans".into(),
			callback_url: "https://shop.example.com/callback".into(),
			notification: Some(NotificationTarget::Id("ipn-1".into())),
			billing_address: BillingAddress {
				email_address: Some("buyer@example.com".into()),
				..Default::default()
			},
			..Default::default()
		}
	}

	#[test]
	fn account_number_requires_schedule() {
		let mut details = details();

		details.account_number = Some("ACC-1".into());

		assert_eq!(details.validate_recurring(), Err(ValidationError::MissingSubscriptionDetails));

		details.subscription_details =
			Some(SubscriptionDetails::new("24-01-2025", "31-12-2025", Frequency::Monthly));

		assert_eq!(details.validate_recurring(), Ok(()));
	}

	#[test]
	fn partial_schedule_is_rejected_even_without_account() {
		let mut details = details();

		details.subscription_details = Some(SubscriptionDetails {
			start_date: Some("24-01-2025".into()),
			end_date: None,
			frequency: Some(Frequency::Daily),
		});

		assert_eq!(
			details.validate_recurring(),
			Err(ValidationError::IncompleteSubscriptionDetails { field: "end_date" })
		);
	}

	#[test]
	fn order_request_applies_defaults() {
		let details = details();
		let body = serde_json::to_value(OrderRequest::new(&details, "product-9", "Beans", "ipn-1"))
			.expect("Order request should serialize.");

		assert_eq!(body["id"], "product-9");
		assert_eq!(body["description"], "Beans");
		assert_eq!(body["currency"], DEFAULT_CURRENCY);
		assert_eq!(body["notification_id"], "ipn-1");
		assert_eq!(body["billing_address"]["country_code"], DEFAULT_COUNTRY_CODE);
		assert_eq!(body["billing_address"]["email_address"], "buyer@example.com");
		assert!(body.get("subscription_details").is_none());
	}

	#[test]
	fn frequency_uses_uppercase_labels() {
		let schedule = SubscriptionDetails::new("24-01-2025", "31-12-2025", Frequency::Yearly);
		let body = serde_json::to_value(&schedule).expect("Schedule should serialize.");

		assert_eq!(body["frequency"], "YEARLY");
	}
}
