//! Shared helpers for gateway operations (dispatch, bearer attachment, decoding, bookkeeping).

// crates.io
use serde::de::DeserializeOwned;
// self
use crate::{
	_prelude::*,
	client::PesapalClient,
	endpoint::Endpoint,
	error::TransportError,
	http::{self, GatewayHttpClient, HttpRequest, HttpResponse},
	obs::{self, DiagnosticEvent, OperationKind, OperationOutcome},
};

impl<C> PesapalClient<C>
where
	C: ?Sized + GatewayHttpClient,
{
	/// Dispatches a request through the transport, wrapping transport failures.
	pub(crate) async fn send(&self, request: HttpRequest) -> Result<HttpResponse> {
		self.http_client.execute(request).await.map_err(|e| TransportError::network(e).into())
	}

	/// Ensures a valid token, then dispatches `body` to `url` with the bearer attached.
	pub(crate) async fn send_authorized(
		&self,
		endpoint: Endpoint,
		url: &Url,
		body: Vec<u8>,
	) -> Result<HttpResponse> {
		let (_, credential) = self.authorize().await?;
		let request = http::build_request(endpoint.method(), url, body, Some(&credential.token))?;

		self.send(request).await
	}

	/// Records the operation outcome and reports failures to the diagnostics sink.
	pub(crate) fn finish<T>(&self, kind: OperationKind, result: Result<T>) -> Result<T> {
		match &result {
			Ok(_) => obs::record_operation_outcome(kind, OperationOutcome::Success),
			Err(error) => {
				self.diagnostics.record(&DiagnosticEvent::OperationFailed { operation: kind, error });
				obs::record_operation_outcome(kind, OperationOutcome::Failure);
			},
		}

		result
	}
}

/// Decodes a JSON response body, reporting the failing path on mismatch.
pub(crate) fn decode<T>(kind: OperationKind, response: &HttpResponse) -> Result<T>
where
	T: DeserializeOwned,
{
	let mut deserializer = serde_json::Deserializer::from_slice(response.body());

	serde_path_to_error::deserialize(&mut deserializer).map_err(|source| Error::Decode {
		operation: kind.as_str(),
		status: response.status().as_u16(),
		source,
	})
}

/// Returns `true` when the body is empty or only whitespace.
pub(crate) fn is_empty_body(response: &HttpResponse) -> bool {
	response.body().iter().all(u8::is_ascii_whitespace)
}
