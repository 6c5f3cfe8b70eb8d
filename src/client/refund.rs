//! Refund requests.

// self
use crate::{
	_prelude::*,
	client::{PesapalClient, common},
	endpoint::Endpoint,
	http::{self, GatewayHttpClient},
	model::{RefundRequest, RefundResponse},
	obs::{self, DiagnosticEvent, OperationKind, OperationOutcome, OperationSpan},
};

impl<C> PesapalClient<C>
where
	C: ?Sized + GatewayHttpClient,
{
	/// Requests a refund for a completed payment.
	///
	/// An empty or `null` body fails with [`Error::EmptyResponse`]; any other payload is returned
	/// as-is, including gateway rejections reported through its `status` field.
	pub async fn request_refund(&self, request: &RefundRequest) -> Result<RefundResponse> {
		const KIND: OperationKind = OperationKind::Refund;

		let span = OperationSpan::new(KIND, "request_refund");

		obs::record_operation_outcome(KIND, OperationOutcome::Attempt);

		let result = span
			.instrument(async move {
				let endpoint = Endpoint::Refund;
				let target = endpoint.url(&self.config.base_url)?;
				let body = http::encode(request)?;
				let response = self.send_authorized(endpoint, &target, body).await?;

				if common::is_empty_body(&response) {
					return Err(Error::EmptyResponse { operation: KIND.as_str() });
				}

				let refund = common::decode::<Option<RefundResponse>>(KIND, &response)?
					.ok_or(Error::EmptyResponse { operation: KIND.as_str() })?;

				self.diagnostics
					.record(&DiagnosticEvent::RefundRequested { status: refund.status.as_deref() });

				Ok(refund)
			})
			.await;

		self.finish(KIND, result)
	}
}
