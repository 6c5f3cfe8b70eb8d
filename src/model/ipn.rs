//! IPN registration payloads.

// self
use crate::{
	_prelude::*,
	error::ConfigError,
	model::{RemoteError, lenient_string, null_as_default, remote::remote_error},
};

/// HTTP method the gateway uses when calling an IPN URL.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum NotificationMethod {
	/// Query-string notifications.
	#[default]
	Get,
	/// JSON body notifications.
	Post,
}
impl NotificationMethod {
	/// Returns the wire label.
	pub const fn as_str(self) -> &'static str {
		match self {
			Self::Get => "GET",
			Self::Post => "POST",
		}
	}
}
impl Display for NotificationMethod {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}
impl FromStr for NotificationMethod {
	type Err = ConfigError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s.trim() {
			value if value.eq_ignore_ascii_case("GET") => Ok(Self::Get),
			value if value.eq_ignore_ascii_case("POST") => Ok(Self::Post),
			value => Err(ConfigError::InvalidNotificationMethod { value: value.to_owned() }),
		}
	}
}

/// Body of an IPN registration request.
#[derive(Clone, Debug, Serialize)]
pub struct IpnRegistrationRequest<'a> {
	/// URL the gateway should notify.
	pub url: &'a str,
	/// Delivery method.
	pub ipn_notification_type: NotificationMethod,
}

/// IPN record returned by registration and listing calls.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IpnRegistration {
	/// Registered URL.
	#[serde(default, deserialize_with = "null_as_default")]
	pub url: String,
	/// Creation timestamp as reported by the gateway.
	#[serde(default)]
	pub created_date: Option<String>,
	/// Gateway-assigned IPN identifier, referenced when submitting orders.
	#[serde(default, deserialize_with = "null_as_default")]
	pub ipn_id: String,
	/// Delivery method description (`GET`/`POST`), reported by listings.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub ipn_notification_type_description: Option<String>,
	/// IPN status description (e.g. `Active`), reported by listings.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub ipn_status_description: Option<String>,
	/// Remote error, if the call was rejected.
	#[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "remote_error")]
	pub error: Option<RemoteError>,
	/// Gateway status code.
	#[serde(default, deserialize_with = "lenient_string")]
	pub status: Option<String>,
}

/// Listing payload; the gateway answers with an array, or a single object on failure.
#[derive(Clone, Debug, Deserialize)]
#[serde(untagged)]
pub enum IpnListResponse {
	/// Regular listing.
	Many(Vec<IpnRegistration>),
	/// Single record, typically an error envelope.
	One(IpnRegistration),
}
impl IpnListResponse {
	/// Flattens the payload into an ordered list.
	pub fn into_vec(self) -> Vec<IpnRegistration> {
		match self {
			Self::Many(records) => records,
			Self::One(record) => vec![record],
		}
	}
}
