//! Client-level error types shared across the token lifecycle and gateway operations.

// self
use crate::{
	_prelude::*,
	model::{RemoteError, RemoteErrorDetails, TransactionStatus},
};

/// Client-wide result type alias returning [`Error`] by default.
pub type Result<T, E = Error> = std::result::Result<T, E>;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Canonical client error exposed by public APIs.
#[derive(Debug, ThisError)]
pub enum Error {
	/// Local configuration problem, raised before any network activity.
	#[error(transparent)]
	Config(#[from] ConfigError),
	/// Request is missing required data; raised before any network activity.
	#[error(transparent)]
	Validation(#[from] ValidationError),
	/// Transport failure (DNS, TCP, TLS, IO).
	#[error(transparent)]
	Transport(#[from] TransportError),

	/// Gateway rejected the consumer credentials.
	#[error("Gateway rejected the token request: {0}.")]
	Authentication(RemoteError),
	/// Token endpoint answered with neither a token nor an error.
	#[error("Token request failed with an unknown error.")]
	UnknownAuthentication {
		/// HTTP status code, when a response was received.
		status: Option<u16>,
	},
	/// Gateway returned a structured business error.
	#[error("Gateway returned an error: {0}.")]
	Gateway(RemoteErrorDetails),
	/// Gateway returned an unstructured error payload.
	#[error("{message}")]
	Remote {
		/// Stringified remote payload.
		message: String,
	},
	/// Gateway responded with a body that does not match the expected shape.
	#[error("Gateway returned a malformed {operation} response (HTTP {status}).")]
	Decode {
		/// Operation label whose response failed to decode.
		operation: &'static str,
		/// HTTP status code of the response.
		status: u16,
		/// Structured parsing failure.
		#[source]
		source: serde_path_to_error::Error<serde_json::Error>,
	},
	/// Transaction exists but its status description is not `completed`.
	#[error("Transaction status is `{description}`, not completed.")]
	TransactionIncomplete {
		/// Raw `payment_status_description` reported by the gateway.
		description: String,
		/// Full status response for callers that need to inspect it.
		response: Box<TransactionStatus>,
	},
	/// Gateway returned an empty body where a payload was required.
	#[error("Gateway returned an empty {operation} response.")]
	EmptyResponse {
		/// Operation label that received the empty body.
		operation: &'static str,
	},
	/// Gateway returned a success-shaped payload without a field the client relies on.
	#[error("Gateway {operation} response is missing `{field}`.")]
	IncompleteResponse {
		/// Operation label that received the payload.
		operation: &'static str,
		/// Wire name of the blank field.
		field: &'static str,
	},
}
impl Error {
	/// Translates a remote error payload from a non-auth call into a client error.
	pub fn from_remote(error: RemoteError) -> Self {
		match error {
			RemoteError::Message(message) => Self::Remote { message },
			RemoteError::Structured(details) => Self::Gateway(details),
			RemoteError::Other(value) => Self::Remote { message: value.to_string() },
		}
	}
}

/// Configuration failures raised while building a client configuration or request.
#[derive(Debug, ThisError)]
pub enum ConfigError {
	/// HTTP client could not be constructed.
	#[error("HTTP client could not be constructed.")]
	HttpClientBuild {
		/// Underlying transport builder failure.
		#[source]
		source: BoxError,
	},
	/// HTTP request construction failed.
	#[error(transparent)]
	HttpRequest(#[from] ::http::Error),
	/// Request payload could not be encoded as JSON.
	#[error("Request body could not be encoded.")]
	RequestEncoding(#[source] serde_json::Error),

	/// A required configuration field is absent or blank.
	#[error("Invalid configuration: missing required field `{field}`.")]
	MissingField {
		/// Name of the missing field.
		field: &'static str,
	},
	/// No IPN URLs were configured.
	#[error("Invalid IPN URLs: at least one URL is required.")]
	NoIpnUrls,
	/// An IPN URL failed validation.
	#[error("Invalid IPN URL `{url}`: {reason}.")]
	InvalidIpnUrl {
		/// Offending URL as supplied.
		url: String,
		/// Validation rule that failed.
		reason: &'static str,
	},
	/// Notification method is neither GET nor POST.
	#[error("Invalid IPN notification method `{value}`.")]
	InvalidNotificationMethod {
		/// Offending value as supplied.
		value: String,
	},
	/// Registration delay could not be parsed.
	#[error("Invalid IPN registration delay `{value}`.")]
	InvalidDelay {
		/// Offending value as supplied.
		value: String,
	},
	/// Base URL cannot be parsed or cannot carry path segments.
	#[error("Gateway base URL `{url}` is invalid.")]
	InvalidBaseUrl {
		/// Offending URL as supplied.
		url: String,
		/// Underlying parsing failure, if parsing was the problem.
		#[source]
		source: Option<url::ParseError>,
	},
}
impl ConfigError {
	/// Wraps a transport's builder failure inside [`ConfigError`].
	pub fn http_client_build(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::HttpClientBuild { source: Box::new(src) }
	}
}
impl From<::http::header::InvalidHeaderValue> for ConfigError {
	fn from(e: ::http::header::InvalidHeaderValue) -> Self {
		Self::HttpRequest(e.into())
	}
}
#[cfg(feature = "reqwest")]
impl From<ReqwestError> for ConfigError {
	fn from(e: ReqwestError) -> Self {
		Self::http_client_build(e)
	}
}

/// Request validation failures detected locally.
#[derive(Clone, Debug, PartialEq, Eq, ThisError)]
pub enum ValidationError {
	/// Neither the product id argument nor the payment details carry an id.
	#[error("Product ID is required.")]
	MissingProductId,
	/// Neither the description argument nor the payment details carry a description.
	#[error("Description is required.")]
	MissingDescription,
	/// A recurring account number was given without subscription details.
	#[error("Subscription details are required when an account number is provided.")]
	MissingSubscriptionDetails,
	/// Subscription details are only partially populated.
	#[error("Subscription details are missing `{field}`.")]
	IncompleteSubscriptionDetails {
		/// First missing subscription field.
		field: &'static str,
	},
	/// No IPN has been registered or listed yet.
	#[error("No IPN endpoints are available.")]
	NoRegisteredIpns,
	/// Neither an IPN id nor an IPN URL was supplied.
	#[error("Notification IPN URL is required.")]
	MissingNotificationTarget,
	/// Supplied IPN URL is not among the registered endpoints.
	#[error("Notification IPN URL does not match: {url}.")]
	IpnUrlMismatch {
		/// IPN URL that failed to resolve.
		url: String,
	},
	/// Transaction status lookup requires an order tracking id.
	#[error("Order tracking ID is required.")]
	MissingOrderTrackingId,
}

/// Transport-level failures (network, IO).
#[derive(Debug, ThisError)]
pub enum TransportError {
	/// Underlying HTTP client reported a network failure.
	#[error("Network error occurred while calling the gateway.")]
	Network {
		/// Transport-specific network error.
		#[source]
		source: BoxError,
	},
	/// Underlying IO failure surfaced during transport.
	#[error("I/O error occurred while calling the gateway.")]
	Io(#[from] std::io::Error),
}
impl TransportError {
	/// Wraps a transport-specific network error.
	pub fn network(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::Network { source: Box::new(src) }
	}
}
#[cfg(feature = "reqwest")]
impl From<ReqwestError> for TransportError {
	fn from(e: ReqwestError) -> Self {
		Self::network(e)
	}
}
