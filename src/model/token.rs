//! Token endpoint payloads.

// crates.io
use time::{
	PrimitiveDateTime,
	format_description::well_known::{Iso8601, Rfc3339},
};
// self
use crate::{
	_prelude::*,
	auth::Secret,
	model::{RemoteError, lenient_string, remote::remote_error},
};

/// Consumer credentials exchanged for a bearer token.
#[derive(Clone, Debug, Serialize)]
pub struct TokenRequest<'a> {
	/// Application consumer key.
	pub consumer_key: &'a str,
	/// Application consumer secret.
	pub consumer_secret: &'a Secret,
}

/// Token endpoint response.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct TokenResponse {
	/// Bearer token, absent on failure.
	#[serde(default)]
	pub token: Option<String>,
	/// Expiry instant as an ISO 8601 string.
	#[serde(default, rename = "expiryDate")]
	pub expiry_date: Option<String>,
	/// Remote error, if the exchange was rejected.
	#[serde(default, deserialize_with = "remote_error")]
	pub error: Option<RemoteError>,
	/// Gateway status code.
	#[serde(default, deserialize_with = "lenient_string")]
	pub status: Option<String>,
	/// Gateway status message.
	#[serde(default)]
	pub message: Option<String>,
}
impl TokenResponse {
	/// Returns the token value if it is non-blank.
	pub fn token(&self) -> Option<&str> {
		self.token.as_deref().filter(|token| !token.trim().is_empty())
	}

	/// Parses the expiry instant.
	pub fn expires_at(&self) -> Option<OffsetDateTime> {
		self.expiry_date.as_deref().and_then(parse_expiry)
	}
}

/// Parses an expiry timestamp. Offset-less timestamps are interpreted as UTC.
pub fn parse_expiry(raw: &str) -> Option<OffsetDateTime> {
	let raw = raw.trim();

	if let Ok(instant) = OffsetDateTime::parse(raw, &Rfc3339) {
		return Some(instant);
	}

	PrimitiveDateTime::parse(raw, &Iso8601::DEFAULT).ok().map(PrimitiveDateTime::assume_utc)
}
