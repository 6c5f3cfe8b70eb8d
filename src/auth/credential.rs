//! Bearer credential, lifecycle states, and the lock-guarded store the client consults.

// self
use crate::{_prelude::*, auth::secret::Secret};

/// Lifecycle state of the stored credential at a given instant.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum CredentialState {
	/// No usable token is stored.
	Absent,
	/// A token is stored and the instant is strictly before its expiry.
	Valid,
	/// A token is stored but its expiry has been reached.
	Expired,
}

/// Bearer token issued by the gateway together with its expiry instant.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential {
	/// Bearer token; callers must avoid logging it.
	pub token: Secret,
	/// Instant from which the token is no longer accepted.
	pub expires_at: OffsetDateTime,
}
impl Credential {
	/// Creates a credential from a raw token and its expiry.
	pub fn new(token: impl Into<Secret>, expires_at: OffsetDateTime) -> Self {
		Self { token: token.into(), expires_at }
	}

	/// Returns `true` if the token value is non-empty.
	pub fn is_present(&self) -> bool {
		!self.token.is_blank()
	}

	/// Computes the lifecycle state at the provided instant.
	pub fn state_at(&self, instant: OffsetDateTime) -> CredentialState {
		if !self.is_present() {
			return CredentialState::Absent;
		}
		if instant >= self.expires_at {
			return CredentialState::Expired;
		}

		CredentialState::Valid
	}

	/// Returns `true` if the credential is usable at the provided instant.
	pub fn is_valid_at(&self, instant: OffsetDateTime) -> bool {
		matches!(self.state_at(instant), CredentialState::Valid)
	}
}
impl Debug for Credential {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("Credential")
			.field("token", &"<redacted>")
			.field("expires_at", &self.expires_at)
			.finish()
	}
}

/// Holds the current credential, replaced wholesale on acquisition and cleared on failure.
///
/// Reads hand out clones so no lock is ever held across an `.await` point.
#[derive(Debug, Default)]
pub struct CredentialStore(RwLock<Option<Credential>>);
impl CredentialStore {
	/// Returns `true` if a non-empty token is stored.
	pub fn present(&self) -> bool {
		self.0.read().as_ref().is_some_and(Credential::is_present)
	}

	/// Returns `true` if no token is stored or the stored token has expired.
	pub fn expired(&self) -> bool {
		self.expired_at(OffsetDateTime::now_utc())
	}

	/// Same as [`CredentialStore::expired`] relative to the provided instant.
	pub fn expired_at(&self, instant: OffsetDateTime) -> bool {
		!matches!(self.state_at(instant), CredentialState::Valid)
	}

	/// Computes the lifecycle state of the stored credential at the provided instant.
	pub fn state_at(&self, instant: OffsetDateTime) -> CredentialState {
		self.0
			.read()
			.as_ref()
			.map_or(CredentialState::Absent, |credential| credential.state_at(instant))
	}

	/// Returns a snapshot of the stored credential, if any.
	pub fn current(&self) -> Option<Credential> {
		self.0.read().clone()
	}

	/// Replaces the stored credential.
	pub fn replace(&self, credential: Credential) {
		*self.0.write() = Some(credential);
	}

	/// Drops the stored credential.
	pub fn clear(&self) {
		*self.0.write() = None;
	}
}
