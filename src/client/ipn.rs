//! IPN registration and listing.

// self
use crate::{
	_prelude::*,
	client::{PesapalClient, common},
	config,
	endpoint::Endpoint,
	http::{self, GatewayHttpClient},
	model::{IpnListResponse, IpnRegistration, IpnRegistrationRequest, NotificationMethod},
	obs::{self, DiagnosticEvent, OperationKind, OperationOutcome, OperationSpan},
};

impl<C> PesapalClient<C>
where
	C: ?Sized + GatewayHttpClient,
{
	/// Registers `url` as an IPN endpoint and appends the returned record to the local
	/// collection.
	///
	/// The URL is validated locally first. A structured remote error becomes
	/// [`Error::Gateway`]; any other remote error becomes [`Error::Remote`]. A record without an
	/// `ipn_id` fails with [`Error::IncompleteResponse`] and is not cached.
	pub async fn register_ipn(
		&self,
		url: &str,
		method: NotificationMethod,
	) -> Result<IpnRegistration> {
		const KIND: OperationKind = OperationKind::RegisterIpn;

		let span = OperationSpan::new(KIND, "register_ipn");

		obs::record_operation_outcome(KIND, OperationOutcome::Attempt);

		let result = span
			.instrument(async move {
				config::validate_ipn_url(url)?;

				let endpoint = Endpoint::RegisterIpn;
				let target = endpoint.url(&self.config.base_url)?;
				let body =
					http::encode(&IpnRegistrationRequest { url, ipn_notification_type: method })?;
				let response = self.send_authorized(endpoint, &target, body).await?;
				let record = common::decode::<IpnRegistration>(KIND, &response)?;

				if let Some(error) = record.error.clone() {
					return Err(Error::from_remote(error));
				}
				if record.ipn_id.trim().is_empty() {
					return Err(Error::IncompleteResponse { operation: KIND.as_str(), field: "ipn_id" });
				}

				self.ipns.write().push(record.clone());
				self.diagnostics.record(&DiagnosticEvent::IpnRegistered {
					ipn_id: &record.ipn_id,
					url: &record.url,
				});

				Ok(record)
			})
			.await;

		self.finish(KIND, result)
	}

	/// Fetches every IPN registered for the merchant and replaces the local collection.
	///
	/// An error-shaped first element fails the call and leaves the collection untouched. Records
	/// without an `ipn_id` are dropped, since orders cannot reference them.
	pub async fn list_ipns(&self) -> Result<Vec<IpnRegistration>> {
		const KIND: OperationKind = OperationKind::ListIpns;

		let span = OperationSpan::new(KIND, "list_ipns");

		obs::record_operation_outcome(KIND, OperationOutcome::Attempt);

		let result = span
			.instrument(async move {
				let endpoint = Endpoint::ListIpns;
				let target = endpoint.url(&self.config.base_url)?;
				let response = self.send_authorized(endpoint, &target, Vec::new()).await?;
				let mut records = common::decode::<IpnListResponse>(KIND, &response)?.into_vec();

				if let Some(error) = records.first().and_then(|record| record.error.clone()) {
					return Err(Error::from_remote(error));
				}

				records.retain(|record| !record.ipn_id.trim().is_empty());

				*self.ipns.write() = records.clone();
				self.diagnostics.record(&DiagnosticEvent::IpnListRefreshed { count: records.len() });

				Ok(records)
			})
			.await;

		self.finish(KIND, result)
	}
}
