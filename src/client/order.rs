//! Order submission.

// self
use crate::{
	_prelude::*,
	client::{PesapalClient, common},
	endpoint::Endpoint,
	error::ValidationError,
	http::{self, GatewayHttpClient},
	model::{NotificationTarget, OrderRequest, OrderResponse, OrderSubmission, PaymentDetails},
	obs::{self, DiagnosticEvent, OperationKind, OperationOutcome, OperationSpan},
};

impl<C> PesapalClient<C>
where
	C: ?Sized + GatewayHttpClient,
{
	/// Submits an order and returns the hosted payment page to redirect the customer to.
	///
	/// `product_id` and `description` fall back to `details.id` and `details.description`
	/// when absent or blank. Every local check (ids, recurring invariant, IPN resolution) runs
	/// before the first network call.
	pub async fn submit_order(
		&self,
		details: &PaymentDetails,
		product_id: Option<&str>,
		description: Option<&str>,
	) -> Result<OrderSubmission> {
		const KIND: OperationKind = OperationKind::SubmitOrder;

		let span = OperationSpan::new(KIND, "submit_order");

		obs::record_operation_outcome(KIND, OperationOutcome::Attempt);

		let result = span
			.instrument(async move {
				let id = non_blank(product_id)
					.or_else(|| non_blank(Some(details.id.as_str())))
					.ok_or(ValidationError::MissingProductId)?;
				let description = non_blank(description)
					.or_else(|| non_blank(Some(details.description.as_str())))
					.ok_or(ValidationError::MissingDescription)?;

				details.validate_recurring()?;

				let notification_id = self.resolve_notification_id(details.notification.as_ref())?;
				let endpoint = Endpoint::SubmitOrder;
				let target = endpoint.url(&self.config.base_url)?;
				let body =
					http::encode(&OrderRequest::new(details, id, description, &notification_id))?;
				let response = self.send_authorized(endpoint, &target, body).await?;
				let payload = common::decode::<OrderResponse>(KIND, &response)?;

				if let Some(error) = payload.error {
					return Err(Error::from_remote(error));
				}

				self.diagnostics.record(&DiagnosticEvent::OrderSubmitted {
					order_tracking_id: &payload.order_tracking_id,
					merchant_reference: &payload.merchant_reference,
				});

				Ok(OrderSubmission {
					http_status: response.status().as_u16(),
					order_tracking_id: payload.order_tracking_id,
					merchant_reference: payload.merchant_reference,
					redirect_url: payload.redirect_url,
					status: payload.status,
				})
			})
			.await;

		self.finish(KIND, result)
	}

	/// Resolves the IPN id an order should reference.
	///
	/// At least one IPN must be cached. Ids are used as-is; URLs must match a cached
	/// registration exactly.
	pub fn resolve_notification_id(
		&self,
		target: Option<&NotificationTarget>,
	) -> Result<String, ValidationError> {
		let ipns = self.ipns.read();

		if ipns.is_empty() {
			return Err(ValidationError::NoRegisteredIpns);
		}

		match target {
			Some(NotificationTarget::Id(id)) if !id.trim().is_empty() => Ok(id.clone()),
			Some(NotificationTarget::Url(url)) if !url.trim().is_empty() => ipns
				.iter()
				.find(|ipn| ipn.url == *url)
				.map(|ipn| ipn.ipn_id.clone())
				.ok_or_else(|| ValidationError::IpnUrlMismatch { url: url.clone() }),
			_ => Err(ValidationError::MissingNotificationTarget),
		}
	}
}

fn non_blank(value: Option<&str>) -> Option<&str> {
	value.filter(|value| !value.trim().is_empty())
}
