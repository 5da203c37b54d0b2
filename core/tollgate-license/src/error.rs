//! Error types for license activation.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Why an activation attempt was rejected.
///
/// Coarser than [`LicenseError`]: malformed signatures, cryptographic
/// mismatches and a broken trust anchor all report as
/// [`RejectionKind::SignatureInvalid`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RejectionKind {
    /// The configured license file is not a valid envelope.
    MalformedEnvelope,
    /// The payload could not be canonically encoded.
    EncodingFailure,
    /// The signature does not authenticate the payload.
    SignatureInvalid,
    /// The signature is valid but the license ID is deny-listed.
    Revoked,
}

/// Licensing-specific errors.
#[derive(Debug, Error)]
pub enum LicenseError {
    /// License file JSON is malformed or missing the envelope keys.
    #[error("invalid license envelope: {0}")]
    MalformedEnvelope(#[source] serde_json::Error),

    /// Canonical encoding of the payload failed.
    #[error("license encoding failed: {0}")]
    Encoding(#[source] serde_json::Error),

    /// Signature is not valid URL-safe base64.
    #[error("invalid signature encoding: {0}")]
    MalformedSignature(#[from] base64::DecodeError),

    /// RSA signature verification failed.
    #[error("license signature invalid")]
    SignatureMismatch,

    /// The trusted public key could not be decoded.
    #[error("invalid trust anchor: {0}")]
    InvalidTrustAnchor(String),

    /// License ID is on the revocation list.
    #[error("license ID '{0}' has been revoked")]
    Revoked(String),
}

impl LicenseError {
    /// Returns the rejection category for this error.
    #[must_use]
    pub fn kind(&self) -> RejectionKind {
        match self {
            Self::MalformedEnvelope(_) => RejectionKind::MalformedEnvelope,
            Self::Encoding(_) => RejectionKind::EncodingFailure,
            Self::MalformedSignature(_) | Self::SignatureMismatch | Self::InvalidTrustAnchor(_) => {
                RejectionKind::SignatureInvalid
            }
            Self::Revoked(_) => RejectionKind::Revoked,
        }
    }
}

/// Result type for license operations.
pub type LicenseResult<T> = Result<T, LicenseError>;
