//! Gateway client: token lifecycle coordination plus the authenticated gateway operations.

pub mod token;

mod common;
mod init;
mod ipn;
mod order;
mod refund;
mod transaction;

pub use token::*;

// self
use crate::{
	_prelude::*,
	auth::CredentialStore,
	config::ClientConfig,
	http::GatewayHttpClient,
	model::IpnRegistration,
	obs::{Diagnostics, NoopDiagnostics},
};
#[cfg(feature = "reqwest")] use crate::http::ReqwestHttpClient;

#[cfg(feature = "reqwest")]
/// Client specialized for the crate's default reqwest transport.
pub type ReqwestPesapalClient = PesapalClient<ReqwestHttpClient>;

/// Coordinates bearer tokens and gateway calls for a single merchant configuration.
///
/// The client owns the HTTP transport, the validated configuration, the credential store, and
/// the cached IPN registrations. Clones share all of them, so a token acquired through one clone
/// is reused by every other clone. Locks guarding shared state are never held across `.await`.
pub struct PesapalClient<C>
where
	C: ?Sized + GatewayHttpClient,
{
	/// HTTP transport used for every outbound gateway request.
	pub http_client: Arc<C>,
	/// Validated configuration.
	pub config: Arc<ClientConfig>,
	/// Sink receiving lifecycle events.
	pub diagnostics: Arc<dyn Diagnostics>,
	/// How concurrent token acquisitions are coordinated.
	pub refresh_policy: RefreshPolicy,
	/// Shared counters for token acquisitions.
	pub acquisition_metrics: Arc<AcquisitionMetrics>,
	credentials: Arc<CredentialStore>,
	ipns: Arc<RwLock<Vec<IpnRegistration>>>,
	acquire_guard: Arc<AsyncMutex<()>>,
}
impl<C> PesapalClient<C>
where
	C: ?Sized + GatewayHttpClient,
{
	/// Creates a client that reuses the caller-provided transport.
	pub fn with_http_client(config: ClientConfig, http_client: impl Into<Arc<C>>) -> Self {
		Self {
			http_client: http_client.into(),
			config: Arc::new(config),
			diagnostics: Arc::new(NoopDiagnostics),
			refresh_policy: RefreshPolicy::default(),
			acquisition_metrics: Default::default(),
			credentials: Default::default(),
			ipns: Default::default(),
			acquire_guard: Default::default(),
		}
	}

	/// Creates a client over the caller-provided transport and runs
	/// [`PesapalClient::initialize`] on it.
	pub async fn connect_with_http_client(
		config: ClientConfig,
		http_client: impl Into<Arc<C>>,
	) -> Result<Self> {
		let client = Self::with_http_client(config, http_client);

		client.initialize().await?;

		Ok(client)
	}

	/// Replaces the diagnostics sink.
	pub fn with_diagnostics(mut self, diagnostics: Arc<dyn Diagnostics>) -> Self {
		self.diagnostics = diagnostics;

		self
	}

	/// Replaces the refresh policy.
	pub fn with_refresh_policy(mut self, policy: RefreshPolicy) -> Self {
		self.refresh_policy = policy;

		self
	}

	/// Returns the credential store shared by every clone of this client.
	pub fn credentials(&self) -> &CredentialStore {
		&self.credentials
	}

	/// Returns a snapshot of the cached IPN registrations, in registration/listing order.
	pub fn ipns(&self) -> Vec<IpnRegistration> {
		self.ipns.read().clone()
	}

	/// Returns the validated configuration.
	pub fn config(&self) -> &ClientConfig {
		&self.config
	}
}
#[cfg(feature = "reqwest")]
impl PesapalClient<ReqwestHttpClient> {
	/// Creates a client backed by a default reqwest transport. No network activity happens
	/// until the first operation.
	pub fn new(config: ClientConfig) -> Self {
		Self::with_http_client(config, ReqwestHttpClient::default())
	}

	/// Creates a reqwest-backed client and runs [`PesapalClient::initialize`] on it.
	pub async fn connect(config: ClientConfig) -> Result<Self> {
		Self::connect_with_http_client(config, ReqwestHttpClient::default()).await
	}
}
impl<C> Clone for PesapalClient<C>
where
	C: ?Sized + GatewayHttpClient,
{
	fn clone(&self) -> Self {
		Self {
			http_client: self.http_client.clone(),
			config: self.config.clone(),
			diagnostics: self.diagnostics.clone(),
			refresh_policy: self.refresh_policy,
			acquisition_metrics: self.acquisition_metrics.clone(),
			credentials: self.credentials.clone(),
			ipns: self.ipns.clone(),
			acquire_guard: self.acquire_guard.clone(),
		}
	}
}
impl<C> Debug for PesapalClient<C>
where
	C: ?Sized + GatewayHttpClient,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("PesapalClient")
			.field("environment", &self.config.environment)
			.field("base_url", &self.config.base_url.as_str())
			.field("refresh_policy", &self.refresh_policy)
			.field("credential_present", &self.credentials.present())
			.field("ipns", &self.ipns.read().len())
			.finish()
	}
}
