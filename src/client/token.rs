//! Bearer token acquisition and lifecycle coordination.
//!
//! [`PesapalClient::ensure_valid`] runs before every authenticated call. It reuses a cached
//! token until its expiry and otherwise exchanges the consumer credentials for a new one.
//! Any failed exchange clears the credential store, so the state machine only ever moves
//! `Absent -> Valid -> Expired -> Valid`, falling back to `Absent` on failure.

// std
use std::sync::atomic::{AtomicU64, Ordering};
// self
use crate::{
	_prelude::*,
	auth::Credential,
	client::PesapalClient,
	endpoint::Endpoint,
	http::{self, GatewayHttpClient},
	model::{TokenRequest, TokenResponse},
	obs::{self, DiagnosticEvent, OperationKind, OperationOutcome, OperationSpan},
};

/// How concurrent callers coordinate token acquisition.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum RefreshPolicy {
	/// Check-then-act without a lock: concurrent callers that all observe a missing or
	/// expired token each acquire one, and the last write wins.
	#[default]
	Unguarded,
	/// Acquisitions are serialized behind one async lock and the store is re-checked once the
	/// lock is held, so concurrent callers share a single acquisition.
	Coalesce,
}

/// Result of a successful [`PesapalClient::ensure_valid`] call.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TokenDecision {
	/// The cached token was still valid; no network call was made.
	Reused,
	/// No token was cached, so one was acquired.
	Acquired,
	/// The cached token had expired, so it was replaced.
	Refreshed,
}
impl TokenDecision {
	/// Returns `true` when an expired token was replaced.
	pub const fn refreshed(self) -> bool {
		matches!(self, Self::Refreshed)
	}
}

/// Thread-safe counters for token acquisitions.
#[derive(Debug, Default)]
pub struct AcquisitionMetrics {
	attempts: AtomicU64,
	success: AtomicU64,
	failure: AtomicU64,
}
impl AcquisitionMetrics {
	/// Returns the total number of token requests sent.
	pub fn attempts(&self) -> u64 {
		self.attempts.load(Ordering::Relaxed)
	}

	/// Returns the number of token requests that produced a credential.
	pub fn successes(&self) -> u64 {
		self.success.load(Ordering::Relaxed)
	}

	/// Returns the number of failed token requests.
	pub fn failures(&self) -> u64 {
		self.failure.load(Ordering::Relaxed)
	}

	fn record_attempt(&self) {
		self.attempts.fetch_add(1, Ordering::Relaxed);
	}

	fn record_success(&self) {
		self.success.fetch_add(1, Ordering::Relaxed);
	}

	fn record_failure(&self) {
		self.failure.fetch_add(1, Ordering::Relaxed);
	}
}

impl<C> PesapalClient<C>
where
	C: ?Sized + GatewayHttpClient,
{
	/// Exchanges the consumer credentials for a bearer token and stores it.
	///
	/// The response's `error` field wins over its `token` field. A rejected exchange yields
	/// [`Error::Authentication`]; a body carrying neither a token with a parseable expiry nor an
	/// error yields [`Error::UnknownAuthentication`]. Every failure, transport failures
	/// included, clears the credential store.
	pub async fn acquire_token(&self) -> Result<Credential> {
		const KIND: OperationKind = OperationKind::AcquireToken;

		let span = OperationSpan::new(KIND, "acquire_token");
		let refreshed = self.credentials.present();

		obs::record_operation_outcome(KIND, OperationOutcome::Attempt);
		self.acquisition_metrics.record_attempt();

		let result = span.instrument(self.request_token()).await;

		match &result {
			Ok(credential) => {
				self.credentials.replace(credential.clone());
				self.acquisition_metrics.record_success();
				self.diagnostics.record(&DiagnosticEvent::TokenAcquired {
					expires_at: credential.expires_at,
					refreshed,
				});
				obs::record_operation_outcome(KIND, OperationOutcome::Success);
			},
			Err(error) => {
				self.credentials.clear();
				self.acquisition_metrics.record_failure();
				self.diagnostics.record(&DiagnosticEvent::TokenAcquisitionFailed { error });
				obs::record_operation_outcome(KIND, OperationOutcome::Failure);
			},
		}

		result
	}

	/// Guarantees a valid token is cached, acquiring one when it is absent or expired.
	pub async fn ensure_valid(&self) -> Result<TokenDecision> {
		self.authorize().await.map(|(decision, _)| decision)
	}

	/// Same as [`PesapalClient::ensure_valid`], also returning the credential to attach.
	pub(crate) async fn authorize(&self) -> Result<(TokenDecision, Credential)> {
		match self.refresh_policy {
			RefreshPolicy::Unguarded => self.authorize_unguarded().await,
			RefreshPolicy::Coalesce => {
				let _singleflight = self.acquire_guard.lock().await;

				self.authorize_unguarded().await
			},
		}
	}

	async fn authorize_unguarded(&self) -> Result<(TokenDecision, Credential)> {
		let now = OffsetDateTime::now_utc();
		let decision = match self.credentials.current() {
			Some(current) if current.is_valid_at(now) => {
				self.diagnostics
					.record(&DiagnosticEvent::TokenReused { expires_at: current.expires_at });

				return Ok((TokenDecision::Reused, current));
			},
			Some(current) if current.is_present() => TokenDecision::Refreshed,
			_ => TokenDecision::Acquired,
		};
		let credential = self.acquire_token().await?;

		Ok((decision, credential))
	}

	async fn request_token(&self) -> Result<Credential> {
		let endpoint = Endpoint::RequestToken;
		let url = endpoint.url(&self.config.base_url)?;
		let body = http::encode(&TokenRequest {
			consumer_key: &self.config.consumer_key,
			consumer_secret: &self.config.consumer_secret,
		})?;
		let request = http::build_request(endpoint.method(), &url, body, None)?;
		let response = self.send(request).await?;
		let unknown = || Error::UnknownAuthentication { status: Some(response.status().as_u16()) };
		let payload = serde_json::from_slice::<TokenResponse>(response.body())
			.map_err(|_| unknown())?;

		if let Some(error) = payload.error.clone() {
			return Err(Error::Authentication(error));
		}

		let token = payload.token().ok_or_else(unknown)?;
		let expires_at = payload.expires_at().ok_or_else(unknown)?;

		Ok(Credential::new(token, expires_at))
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn only_refreshed_decisions_report_refresh() {
		assert!(TokenDecision::Refreshed.refreshed());
		assert!(!TokenDecision::Acquired.refreshed());
		assert!(!TokenDecision::Reused.refreshed());
	}

	#[test]
	fn metrics_count_each_outcome() {
		let metrics = AcquisitionMetrics::default();

		metrics.record_attempt();
		metrics.record_attempt();
		metrics.record_success();
		metrics.record_failure();

		assert_eq!(metrics.attempts(), 2);
		assert_eq!(metrics.successes(), 1);
		assert_eq!(metrics.failures(), 1);
	}
}
