//! Optional observability helpers for gateway operations.
//!
//! # Feature Flags
//!
//! - Enable `tracing` to emit structured spans named `pesapal_gateway.operation` with the
//!   `operation` and `stage` fields, and to use [`TracingDiagnostics`].
//! - Enable `metrics` to increment the `pesapal_gateway_operation_total` counter for every
//!   attempt/success/failure, labeled by `operation` + `outcome`.
//!
//! Independently of both features, every client carries an injected [`Diagnostics`] sink
//! ([`NoopDiagnostics`] unless replaced) that receives typed [`DiagnosticEvent`] values.

mod diagnostics;
mod metrics;
mod tracing;

pub use diagnostics::*;
pub use metrics::*;
pub use tracing::*;

// self
use crate::_prelude::*;

/// Gateway operations observed by the client.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum OperationKind {
	/// Bearer token exchange.
	AcquireToken,
	/// IPN registration.
	RegisterIpn,
	/// IPN listing.
	ListIpns,
	/// Order submission.
	SubmitOrder,
	/// Transaction status lookup.
	TransactionStatus,
	/// Refund request.
	Refund,
	/// Startup registration sequence.
	Initialize,
}
impl OperationKind {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			OperationKind::AcquireToken => "acquire_token",
			OperationKind::RegisterIpn => "register_ipn",
			OperationKind::ListIpns => "list_ipns",
			OperationKind::SubmitOrder => "submit_order",
			OperationKind::TransactionStatus => "transaction_status",
			OperationKind::Refund => "refund",
			OperationKind::Initialize => "initialize",
		}
	}
}
impl Display for OperationKind {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Outcome labels recorded for each attempt.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum OperationOutcome {
	/// Entry to a client operation.
	Attempt,
	/// Successful completion.
	Success,
	/// Failure propagated back to the caller.
	Failure,
}
impl OperationOutcome {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			OperationOutcome::Attempt => "attempt",
			OperationOutcome::Success => "success",
			OperationOutcome::Failure => "failure",
		}
	}
}
impl Display for OperationOutcome {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}
