//! License activation and signature verification for Tollgate.
//!
//! This crate decides whether a configured license file is authentic and
//! unrevoked, and holds the resulting license for the rest of the server.
//!
//! # Verification
//!
//! A license file is a JSON envelope holding a license payload and a
//! signature. The payload is re-encoded canonically, hashed with SHA-256, and
//! the RSA PKCS#1 v1.5 signature is checked against the public key embedded in
//! this binary. A license whose ID is on the revocation list is rejected even
//! when its signature is valid.
//!
//! # Activation
//!
//! [`LicenseActivator::activate`] runs the whole check and, on success,
//! replaces the [`ActiveLicenseState`]. Activation never panics and never
//! retries; a rejected license leaves the server running unlicensed.

mod activation;
pub mod canonical;
mod error;
mod license;
mod revocation;
mod state;
pub mod verifier;

pub use activation::{ActivationOutcome, ActivationStatus, LicenseActivator, LicenseSource};
pub use error::{LicenseError, LicenseResult, RejectionKind};
pub use license::{License, LicenseEnvelope};
pub use revocation::{RevocationList, REVOKED_LICENSE_IDS};
pub use state::ActiveLicenseState;
pub use verifier::{TrustAnchor, Verdict, EMBEDDED_PUBLIC_KEY_PEM};
