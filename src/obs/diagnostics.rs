//! Injected diagnostics sink.
//!
//! Clients report noteworthy lifecycle events to an `Arc<dyn Diagnostics>` supplied at
//! construction instead of writing to a process-wide logger. Messages never carry secrets:
//! tokens stay inside [`crate::auth::Secret`] and only expiries are reported.

// self
use crate::{_prelude::*, obs::OperationKind};

/// Lifecycle event reported by the client.
#[derive(Clone, Copy, Debug)]
pub enum DiagnosticEvent<'a> {
	/// A new bearer token was stored.
	TokenAcquired {
		/// Expiry of the new token.
		expires_at: OffsetDateTime,
		/// `true` when an expired token was replaced.
		refreshed: bool,
	},
	/// The cached bearer token was still valid.
	TokenReused {
		/// Expiry of the cached token.
		expires_at: OffsetDateTime,
	},
	/// Token acquisition failed and the credential store was cleared.
	TokenAcquisitionFailed {
		/// Failure returned to the caller.
		error: &'a Error,
	},
	/// An IPN URL was registered.
	IpnRegistered {
		/// Gateway-assigned IPN id.
		ipn_id: &'a str,
		/// Registered URL.
		url: &'a str,
	},
	/// The local IPN collection was replaced by a fresh listing.
	IpnListRefreshed {
		/// Number of IPNs now cached.
		count: usize,
	},
	/// An order was accepted by the gateway.
	OrderSubmitted {
		/// Gateway order tracking id.
		order_tracking_id: &'a str,
		/// Merchant reference echoed by the gateway.
		merchant_reference: &'a str,
	},
	/// A transaction status lookup returned a payload.
	TransactionStatusFetched {
		/// Order tracking id that was queried.
		order_tracking_id: &'a str,
		/// Raw status description.
		description: &'a str,
	},
	/// A refund request was answered.
	RefundRequested {
		/// Gateway status code, if reported.
		status: Option<&'a str>,
	},
	/// Initialization paused between IPN registrations.
	RegistrationPaused {
		/// Length of the pause.
		delay: StdDuration,
	},
	/// An operation failed.
	OperationFailed {
		/// Operation that failed.
		operation: OperationKind,
		/// Failure returned to the caller.
		error: &'a Error,
	},
}
impl DiagnosticEvent<'_> {
	/// Returns a stable label for the event kind.
	pub const fn label(&self) -> &'static str {
		match self {
			Self::TokenAcquired { .. } => "token_acquired",
			Self::TokenReused { .. } => "token_reused",
			Self::TokenAcquisitionFailed { .. } => "token_acquisition_failed",
			Self::IpnRegistered { .. } => "ipn_registered",
			Self::IpnListRefreshed { .. } => "ipn_list_refreshed",
			Self::OrderSubmitted { .. } => "order_submitted",
			Self::TransactionStatusFetched { .. } => "transaction_status_fetched",
			Self::RefundRequested { .. } => "refund_requested",
			Self::RegistrationPaused { .. } => "registration_paused",
			Self::OperationFailed { .. } => "operation_failed",
		}
	}

	/// Returns `true` for events describing a failure.
	pub const fn is_failure(&self) -> bool {
		matches!(self, Self::TokenAcquisitionFailed { .. } | Self::OperationFailed { .. })
	}
}
impl Display for DiagnosticEvent<'_> {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		match self {
			Self::TokenAcquired { expires_at, refreshed: true } =>
				write!(f, "Token refreshed; expires at {expires_at}."),
			Self::TokenAcquired { expires_at, refreshed: false } =>
				write!(f, "Token acquired; expires at {expires_at}."),
			Self::TokenReused { expires_at } =>
				write!(f, "Token still valid; expires at {expires_at}."),
			Self::TokenAcquisitionFailed { error } => write!(f, "Token acquisition failed: {error}"),
			Self::IpnRegistered { ipn_id, url } => write!(f, "IPN {ipn_id} registered for {url}."),
			Self::IpnListRefreshed { count } => write!(f, "IPN list refreshed with {count} entries."),
			Self::OrderSubmitted { order_tracking_id, merchant_reference } => write!(
				f,
				"Order {merchant_reference} submitted with tracking id {order_tracking_id}."
			),
			Self::TransactionStatusFetched { order_tracking_id, description } =>
				write!(f, "Transaction {order_tracking_id} status is `{description}`."),
			Self::RefundRequested { status } =>
				write!(f, "Refund answered with status {}.", status.unwrap_or("unknown")),
			Self::RegistrationPaused { delay } =>
				write!(f, "Waiting {}ms before the next IPN registration.", delay.as_millis()),
			Self::OperationFailed { operation, error } => write!(f, "{operation} failed: {error}"),
		}
	}
}

/// Sink for [`DiagnosticEvent`] values.
pub trait Diagnostics
where
	Self: Send + Sync,
{
	/// Receives one event. Implementations must not block.
	fn record(&self, event: &DiagnosticEvent<'_>);
}

/// Diagnostics sink that discards every event.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopDiagnostics;
impl Diagnostics for NoopDiagnostics {
	fn record(&self, _: &DiagnosticEvent<'_>) {}
}

/// Diagnostics sink that forwards events to `tracing` (failures at `WARN`, the rest at `DEBUG`).
#[cfg(feature = "tracing")]
#[derive(Clone, Copy, Debug, Default)]
pub struct TracingDiagnostics;
#[cfg(feature = "tracing")]
impl Diagnostics for TracingDiagnostics {
	fn record(&self, event: &DiagnosticEvent<'_>) {
		if event.is_failure() {
			tracing::warn!(event = event.label(), "{event}");
		} else {
			tracing::debug!(event = event.label(), "{event}");
		}
	}
}
