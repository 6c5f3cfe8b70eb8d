//! Transport primitives for gateway calls.
//!
//! The client's only dependency on an HTTP stack is [`GatewayHttpClient`], which executes
//! fully-built [`HttpRequest`] values and hands back buffered [`HttpResponse`] values. The
//! default implementation wraps reqwest; tests and embedders may supply their own.

// std
#[cfg(feature = "reqwest")] use std::ops::Deref;
// crates.io
use ::http::{
	HeaderValue, Method,
	header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE},
};
// self
use crate::{_prelude::*, auth::Secret, error::ConfigError};

/// Outbound request with a buffered JSON body.
pub type HttpRequest = ::http::Request<Vec<u8>>;
/// Inbound response with a buffered body.
pub type HttpResponse = ::http::Response<Vec<u8>>;
/// Boxed future returned by [`GatewayHttpClient::execute`].
pub type HttpFuture<'a, E> = Pin<Box<dyn Future<Output = Result<HttpResponse, E>> + 'a + Send>>;

/// Abstraction over HTTP transports capable of executing gateway requests.
///
/// Implementations must be `Send + Sync + 'static` so a single transport can be shared by every
/// clone of a client, and the returned futures must be `Send` so client futures can hop
/// executors. Timeouts, proxies, and TLS settings are the transport's concern.
pub trait GatewayHttpClient
where
	Self: 'static + Send + Sync,
{
	/// Concrete error emitted by the underlying transport.
	type TransportError: 'static + Send + Sync + StdError;

	/// Executes `request` and buffers the full response body.
	fn execute(&self, request: HttpRequest) -> HttpFuture<'_, Self::TransportError>;
}

/// Thin wrapper around [`ReqwestClient`] so shared HTTP behavior lives in one place.
#[cfg(feature = "reqwest")]
#[derive(Clone, Debug, Default)]
pub struct ReqwestHttpClient(pub ReqwestClient);
#[cfg(feature = "reqwest")]
impl ReqwestHttpClient {
	/// Wraps an existing reqwest [`ReqwestClient`].
	pub fn with_client(client: ReqwestClient) -> Self {
		Self(client)
	}
}
#[cfg(feature = "reqwest")]
impl AsRef<ReqwestClient> for ReqwestHttpClient {
	fn as_ref(&self) -> &ReqwestClient {
		&self.0
	}
}
#[cfg(feature = "reqwest")]
impl Deref for ReqwestHttpClient {
	type Target = ReqwestClient;

	fn deref(&self) -> &Self::Target {
		&self.0
	}
}
#[cfg(feature = "reqwest")]
impl GatewayHttpClient for ReqwestHttpClient {
	type TransportError = ReqwestError;

	fn execute(&self, request: HttpRequest) -> HttpFuture<'_, Self::TransportError> {
		Box::pin(async move {
			let response = self.0.execute(reqwest::Request::try_from(request)?).await?;
			let status = response.status();
			let headers = response.headers().to_owned();
			let mut response_new = HttpResponse::new(response.bytes().await?.to_vec());

			*response_new.status_mut() = status;
			*response_new.headers_mut() = headers;

			Ok(response_new)
		})
	}
}

/// Serializes a request body as JSON.
pub(crate) fn encode<T>(body: &T) -> Result<Vec<u8>, ConfigError>
where
	T: ?Sized + Serialize,
{
	serde_json::to_vec(body).map_err(ConfigError::RequestEncoding)
}

/// Builds a JSON request, attaching the bearer token when one is supplied.
pub(crate) fn build_request(
	method: Method,
	url: &Url,
	body: Vec<u8>,
	bearer: Option<&Secret>,
) -> Result<HttpRequest, ConfigError> {
	let json = HeaderValue::from_static("application/json");
	let mut builder = ::http::Request::builder()
		.method(method)
		.uri(url.as_str())
		.header(ACCEPT, json.clone())
		.header(CONTENT_TYPE, json);

	if let Some(token) = bearer {
		let mut value = HeaderValue::try_from(format!("Bearer {}", token.expose()))?;

		value.set_sensitive(true);

		builder = builder.header(AUTHORIZATION, value);
	}

	Ok(builder.body(body)?)
}
