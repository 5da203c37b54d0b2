//! License activation.
//!
//! Activation takes the raw license file from configuration and walks it
//! through parsing, canonical encoding, signature verification and the
//! revocation check. Only a license that passes every step is installed in
//! [`ActiveLicenseState`]; any failure leaves the state as it was.

use crate::canonical;
use crate::error::{LicenseError, LicenseResult, RejectionKind};
use crate::license::{License, LicenseEnvelope};
use crate::revocation::RevocationList;
use crate::state::ActiveLicenseState;
use crate::verifier::{self, TrustAnchor};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{error, info};

/// Component name attached to every activation event.
const COMPONENT: &str = "license";

/// Supplies the raw license file contents. An empty string means no license
/// is configured.
pub trait LicenseSource {
    fn license_file(&self) -> String;
}

impl LicenseSource for str {
    fn license_file(&self) -> String {
        self.to_string()
    }
}

impl LicenseSource for String {
    fn license_file(&self) -> String {
        self.clone()
    }
}

/// Terminal result of one activation attempt.
#[derive(Debug)]
pub enum ActivationOutcome {
    /// No license configured; the active license was cleared.
    Unconfigured,
    /// The license was verified and installed.
    Active(Arc<License>),
    /// The license was rejected; the active license was not changed.
    Rejected(LicenseError),
}

impl ActivationOutcome {
    #[must_use]
    pub fn is_active(&self) -> bool {
        matches!(self, Self::Active(_))
    }

    /// Returns the installed license, if activation succeeded.
    #[must_use]
    pub fn license(&self) -> Option<&Arc<License>> {
        match self {
            Self::Active(license) => Some(license),
            _ => None,
        }
    }

    /// Returns the rejection cause, if activation failed.
    #[must_use]
    pub fn error(&self) -> Option<&LicenseError> {
        match self {
            Self::Rejected(err) => Some(err),
            _ => None,
        }
    }

    /// Returns a comparable summary of this outcome.
    #[must_use]
    pub fn status(&self) -> ActivationStatus {
        match self {
            Self::Unconfigured => ActivationStatus::Unconfigured,
            Self::Active(_) => ActivationStatus::Active,
            Self::Rejected(err) => ActivationStatus::Rejected { kind: err.kind() },
        }
    }
}

/// Summary of an [`ActivationOutcome`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivationStatus {
    Unconfigured,
    Active,
    Rejected { kind: RejectionKind },
}

/// Verifies license files and owns the active license state.
#[derive(Debug, Clone)]
pub struct LicenseActivator {
    trust_anchor: Arc<TrustAnchor>,
    revocations: Arc<RevocationList>,
    state: Arc<ActiveLicenseState>,
}

impl LicenseActivator {
    /// Creates an activator using the embedded trust anchor and the built-in
    /// revocation list.
    ///
    /// # Errors
    ///
    /// Returns [`LicenseError::InvalidTrustAnchor`] if the embedded key does
    /// not decode.
    pub fn new() -> LicenseResult<Self> {
        Ok(Self::with_trust_anchor(TrustAnchor::embedded()?))
    }

    /// Creates an activator trusting `trust_anchor`, with the built-in
    /// revocation list.
    #[must_use]
    pub fn with_trust_anchor(trust_anchor: impl Into<Arc<TrustAnchor>>) -> Self {
        Self {
            trust_anchor: trust_anchor.into(),
            revocations: Arc::new(RevocationList::builtin().clone()),
            state: Arc::new(ActiveLicenseState::new()),
        }
    }

    /// Replaces the revocation list.
    #[must_use]
    pub fn with_revocations(mut self, revocations: RevocationList) -> Self {
        self.revocations = Arc::new(revocations);
        self
    }

    /// Returns a handle to the active license state.
    #[must_use]
    pub fn state(&self) -> Arc<ActiveLicenseState> {
        Arc::clone(&self.state)
    }

    /// Activates whatever license `source` currently supplies.
    pub fn activate_from<S>(&self, source: &S) -> ActivationOutcome
    where
        S: LicenseSource + ?Sized,
    {
        self.activate(&source.license_file())
    }

    /// Activates the license file `raw`.
    ///
    /// Emits exactly one event: info when a license is installed or none is
    /// configured, error with the cause when it is rejected.
    pub fn activate(&self, raw: &str) -> ActivationOutcome {
        if raw.is_empty() {
            info!(component = COMPONENT, "skipping activation check, no license installed");
            self.state.clear();
            return ActivationOutcome::Unconfigured;
        }

        match self.verify(raw) {
            Ok(license) => {
                let license = self.state.set(license);
                info!(
                    component = COMPONENT,
                    license_id = %license.license_id,
                    "setting license"
                );
                ActivationOutcome::Active(license)
            }
            Err(err) => {
                error!(
                    component = COMPONENT,
                    kind = ?err.kind(),
                    cause = %err,
                    "{}",
                    rejection_message(&err)
                );
                ActivationOutcome::Rejected(err)
            }
        }
    }

    /// Checks the license file `raw` without touching the active state.
    ///
    /// # Errors
    ///
    /// Returns the first failing step: malformed envelope, encoding failure,
    /// signature failure, or revocation.
    pub fn verify(&self, raw: &str) -> LicenseResult<License> {
        let envelope = LicenseEnvelope::parse(raw)?;

        let canonical = canonical::encode(envelope.license())?;
        verifier::verify(&canonical, envelope.signature(), &self.trust_anchor).into_result()?;

        let license_id = &envelope.license().license_id;
        if self.revocations.is_revoked(license_id) {
            return Err(LicenseError::Revoked(license_id.clone()));
        }

        Ok(envelope.into_license())
    }
}

fn rejection_message(err: &LicenseError) -> &'static str {
    match err {
        LicenseError::MalformedEnvelope(_) => "could not parse license from config",
        LicenseError::Encoding(_) => "could not encode license data",
        LicenseError::MalformedSignature(_) => "could not decode license signature",
        LicenseError::SignatureMismatch => "failed to verify license",
        LicenseError::InvalidTrustAnchor(_) => "could not parse public key",
        LicenseError::Revoked(_) => "failed to enable license",
    }
}
