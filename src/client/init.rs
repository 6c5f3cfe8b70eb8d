//! Startup sequence: register every configured IPN URL, then refresh the IPN list.

// self
use crate::{
	_prelude::*,
	client::PesapalClient,
	http::GatewayHttpClient,
	model::IpnRegistration,
	obs::{self, DiagnosticEvent, OperationKind, OperationOutcome, OperationSpan},
};

impl<C> PesapalClient<C>
where
	C: ?Sized + GatewayHttpClient,
{
	/// Registers each configured IPN URL in order, then replaces the local IPN collection with
	/// a fresh listing.
	///
	/// Registrations are spaced by the configured delay (none after the last one) to stay under
	/// the gateway's rate limit. The first failure aborts the sequence.
	pub async fn initialize(&self) -> Result<Vec<IpnRegistration>> {
		const KIND: OperationKind = OperationKind::Initialize;

		let span = OperationSpan::new(KIND, "initialize");

		obs::record_operation_outcome(KIND, OperationOutcome::Attempt);

		let result = span
			.instrument(async move {
				let delay = self.config.registration_delay;

				for (idx, ipn) in self.config.ipn_urls.iter().enumerate() {
					if idx > 0 && !delay.is_zero() {
						self.diagnostics.record(&DiagnosticEvent::RegistrationPaused { delay });

						tokio::time::sleep(delay).await;
					}

					self.register_ipn(&ipn.url, ipn.method).await?;
				}

				self.list_ipns().await
			})
			.await;

		self.finish(KIND, result)
	}
}
