//! Transaction status lookup.

// self
use crate::{
	_prelude::*,
	client::{PesapalClient, common},
	endpoint::Endpoint,
	error::ValidationError,
	http::GatewayHttpClient,
	model::TransactionStatus,
	obs::{self, DiagnosticEvent, OperationKind, OperationOutcome, OperationSpan},
};

impl<C> PesapalClient<C>
where
	C: ?Sized + GatewayHttpClient,
{
	/// Fetches the status of an order and succeeds only when the payment is completed.
	///
	/// Any other status description fails with [`Error::TransactionIncomplete`], which keeps the
	/// raw description and the full response so callers can tell pending payments from failed
	/// ones.
	pub async fn get_transaction_status(&self, order_tracking_id: &str) -> Result<TransactionStatus> {
		const KIND: OperationKind = OperationKind::TransactionStatus;

		let span = OperationSpan::new(KIND, "get_transaction_status");

		obs::record_operation_outcome(KIND, OperationOutcome::Attempt);

		let result = span
			.instrument(async move {
				let order_tracking_id = order_tracking_id.trim();

				if order_tracking_id.is_empty() {
					return Err(Error::from(ValidationError::MissingOrderTrackingId));
				}

				let endpoint = Endpoint::TransactionStatus;
				let mut target = endpoint.url(&self.config.base_url)?;

				target.query_pairs_mut().append_pair("orderTrackingId", order_tracking_id);

				let response = self.send_authorized(endpoint, &target, Vec::new()).await?;
				let status = common::decode::<TransactionStatus>(KIND, &response)?;

				if let Some(error) = status.error.clone() {
					return Err(Error::from_remote(error));
				}

				self.diagnostics.record(&DiagnosticEvent::TransactionStatusFetched {
					order_tracking_id,
					description: status.description(),
				});

				if !status.is_completed() {
					return Err(Error::TransactionIncomplete {
						description: status.description().to_owned(),
						response: Box::new(status),
					});
				}

				Ok(status)
			})
			.await;

		self.finish(KIND, result)
	}
}
