//! Request and response shapes exchanged with the gateway.
//!
//! Remote payloads are loosely typed (an `error` field may be a string or an object, status
//! codes may arrive as strings or numbers). Those variations are resolved here, during
//! deserialization, so the client only ever branches on typed values.

pub mod ipn;
pub mod order;
pub mod refund;
pub mod remote;
pub mod token;
pub mod transaction;

pub use ipn::*;
pub use order::*;
pub use refund::*;
pub use remote::*;
pub use token::*;
pub use transaction::*;

// crates.io
use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Accepts a string, number, or boolean and renders it as a string; `null` becomes `None`.
pub(crate) fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
	D: Deserializer<'de>,
{
	Ok(match Option::<Value>::deserialize(deserializer)? {
		None | Some(Value::Null) => None,
		Some(Value::String(value)) => Some(value),
		Some(other) => Some(other.to_string()),
	})
}

/// Reads a value that the gateway may send as `null`, falling back to its default.
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
	D: Deserializer<'de>,
	T: Default + Deserialize<'de>,
{
	Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[derive(Debug, Deserialize)]
	struct Fixture {
		#[serde(default, deserialize_with = "lenient_string")]
		status: Option<String>,
		#[serde(default, deserialize_with = "null_as_default")]
		id: String,
	}

	#[test]
	fn loose_scalars_are_normalized() {
		let numeric: Fixture = serde_json::from_str(r#"{"status":200,"id":null}"#)
			.expect("Numeric status should parse.");

		assert_eq!(numeric.status.as_deref(), Some("200"));
		assert_eq!(numeric.id, "");

		let missing: Fixture = serde_json::from_str("{}").expect("Empty object should parse.");

		assert!(missing.status.is_none());
		assert!(missing.id.is_empty());
	}
}
