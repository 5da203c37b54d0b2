//! License payload and the envelope it is shipped in.
//!
//! A license file is a JSON object:
//!
//! ```json
//! {
//!   "license": { "clientId": "...", "licenseId": "...", ... },
//!   "signature": "<base64url of RSA signature>"
//! }
//! ```
//!
//! The signature covers the canonical encoding of `license`
//! (see [`crate::canonical`]), not the bytes as they appear in the file.

use crate::error::{LicenseError, LicenseResult};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The license payload (matches the issuer's JSON structure).
///
/// Field declaration order is the canonical encoding order and must not be
/// changed. Missing fields decode to their zero value; unknown fields are
/// dropped and are not covered by the signature.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct License {
    /// Client (customer) identifier.
    pub client_id: String,
    /// Free-form extension data agreed with the issuer.
    pub extension: String,
    /// Stable license identifier, checked against the revocation list.
    pub license_id: String,
    /// Number of licensed logins.
    pub login_count: i64,
    /// Name of the licensee.
    pub registered_for: String,
    /// Expiry as seconds since epoch.
    pub valid_until: i64,
}

impl License {
    /// Creates an otherwise empty license with the given ID.
    #[must_use]
    pub fn new(license_id: impl Into<String>) -> Self {
        Self {
            license_id: license_id.into(),
            ..Self::default()
        }
    }

    /// Returns `valid_until` as a UTC timestamp, or None if out of range.
    #[must_use]
    pub fn valid_until_utc(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.valid_until, 0)
    }
}

/// A parsed, not yet verified, license file.
#[derive(Debug, Clone, Deserialize)]
pub struct LicenseEnvelope {
    #[serde(alias = "payload")]
    license: License,
    signature: String,
}

impl LicenseEnvelope {
    /// Parses a raw license file.
    ///
    /// # Errors
    ///
    /// Returns [`LicenseError::MalformedEnvelope`] if the input is not JSON or
    /// lacks the `license` object or the `signature` string.
    pub fn parse(raw: &str) -> LicenseResult<Self> {
        serde_json::from_str(raw).map_err(LicenseError::MalformedEnvelope)
    }

    /// Returns the license payload.
    #[must_use]
    pub fn license(&self) -> &License {
        &self.license
    }

    /// Returns the transport-encoded signature.
    #[must_use]
    pub fn signature(&self) -> &str {
        &self.signature
    }

    /// Consumes the envelope, returning the payload.
    #[must_use]
    pub fn into_license(self) -> License {
        self.license
    }
}
