//! Remote error payloads.

// crates.io
use serde::{Deserializer, de::Error as DeError};
use serde_json::Value;
// self
use crate::{_prelude::*, model::lenient_string};

/// Error payload returned by the gateway: a bare string, a structured object, or any other
/// JSON value kept verbatim.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum RemoteError {
	/// Plain string error.
	Message(String),
	/// Structured error carrying code/type/message.
	Structured(RemoteErrorDetails),
	/// Numbers, booleans, and arrays; rendered as their JSON text.
	Other(Value),
}
impl RemoteError {
	fn is_blank(&self) -> bool {
		match self {
			Self::Message(message) => message.trim().is_empty(),
			Self::Structured(details) => details.is_blank(),
			Self::Other(value) => value.is_null(),
		}
	}
}
impl Display for RemoteError {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		match self {
			Self::Message(message) => f.write_str(message),
			Self::Structured(details) => Display::fmt(details, f),
			Self::Other(value) => Display::fmt(value, f),
		}
	}
}
impl<'de> Deserialize<'de> for RemoteError {
	fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
	where
		D: Deserializer<'de>,
	{
		// Branch on the JSON shape so arrays never bind positionally to the structured fields.
		match Value::deserialize(deserializer)? {
			Value::String(message) => Ok(Self::Message(message)),
			value @ Value::Object(_) =>
				RemoteErrorDetails::deserialize(value).map(Self::Structured).map_err(DeError::custom),
			value => Ok(Self::Other(value)),
		}
	}
}

/// Structured remote error.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteErrorDetails {
	/// Error category (`type` or `error_type` on the wire).
	#[serde(default, rename = "type", alias = "error_type", deserialize_with = "lenient_string")]
	pub error_type: Option<String>,
	/// Gateway error code.
	#[serde(default, deserialize_with = "lenient_string")]
	pub code: Option<String>,
	/// Human-readable message.
	#[serde(default, deserialize_with = "lenient_string")]
	pub message: Option<String>,
	/// Callback URL the error refers to, reported by status lookups.
	#[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "lenient_string")]
	pub call_back_url: Option<String>,
}
impl RemoteErrorDetails {
	/// Returns `true` when every field is absent or empty.
	pub fn is_blank(&self) -> bool {
		[&self.error_type, &self.code, &self.message, &self.call_back_url]
			.into_iter()
			.all(|field| field.as_deref().is_none_or(|value| value.trim().is_empty()))
	}
}
impl Display for RemoteErrorDetails {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		let message = self.message.as_deref().unwrap_or("unknown error");

		match (&self.code, &self.error_type) {
			(Some(code), Some(kind)) => write!(f, "[{code}/{kind}] {message}")?,
			(Some(code), None) => write!(f, "[{code}] {message}")?,
			(None, Some(kind)) => write!(f, "[{kind}] {message}")?,
			(None, None) => f.write_str(message)?,
		}
		if let Some(url) = &self.call_back_url {
			write!(f, " on {url}")?;
		}

		Ok(())
	}
}

/// Reads an optional `error` field, treating `null`, empty strings, and all-null objects as
/// "no error". Status lookups send an all-null error object alongside successful payloads.
pub(crate) fn remote_error<'de, D>(deserializer: D) -> Result<Option<RemoteError>, D::Error>
where
	D: Deserializer<'de>,
{
	Ok(Option::<RemoteError>::deserialize(deserializer)?.filter(|error| !error.is_blank()))
}
