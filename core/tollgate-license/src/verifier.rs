//! RSA signature verification against the embedded trust anchor.
//!
//! A license is authentic when its signature is a valid RSASSA-PKCS1-v1_5
//! signature, made with the issuer's private key, over the SHA-256 digest of
//! the payload's canonical encoding. The signature travels as URL-safe base64
//! with padding.

use crate::error::{LicenseError, LicenseResult};
use base64::{engine::general_purpose::URL_SAFE, Engine};
use rsa::pkcs1::DecodeRsaPublicKey;
use rsa::pkcs8::DecodePublicKey;
use rsa::traits::PublicKeyParts;
use rsa::{Pkcs1v15Sign, RsaPublicKey};
use sha2::{Digest, Sha256};
use std::fmt;
use std::sync::{Arc, LazyLock};

/// Public key of the license issuer (PKCS#1, 4096 bit).
pub const EMBEDDED_PUBLIC_KEY_PEM: &str = "-----BEGIN RSA PUBLIC KEY-----\n\
MIICCgKCAgEAr6OcDoMUeg9HC/YgCl4lp9dp95YxWpRbcyVvCD/xHX3ThP0AbtFV\n\
UNo3M/XOpn8xHUVHQSdzFArxOc3Flk+szirsDKeS3j6PDRWTWVfJtWaP5xX5iWs1\n\
aUnLzX+SwFSfZLRglA92IyiShg3cM7cb2ZpewDnHfVfsnl9zEiOJc5vUDSQo2dOV\n\
aygqPfeSP+IyaHo8AnXF2QF3BkcO9P4RaKN+nzkHMRQ91UrfuAK6w7X8y8kk3ytI\n\
OI52Sm0LaM0Ce97ZzQg+snyQgr9Nmn7ODyi8lkNLwiq1qb0aY81vZAgULJosbwrf\n\
+fFAARodWYQJDxxH0e3qF2MAJFZSwET6NAzUGK3KCxzoB9hNh2ki7NdhRTdziKcf\n\
PcJs2bMmLkrQX17Elq263O7Pr33lUcS93sIzUtmqiimcDG+Y1Smb2SPk3XP3/Sdr\n\
uHhGd7ZCf7MDe2ZCikQym0B4oSK5ChdIt7P4GD/Et0zY0PMa8311gTnI2JSgH48Z\n\
k6f/HwAW+uIk07yKKwyk31/0a80wieS0rLwW2kcV+GrgrRGCvRRDjNcOjtRqXgs/\n\
q1uhVClBgT6LsdzMjwd3SleM8WxwWVBhhoJmsOH0xwnTPQ2BtfA0qy+X/hU0VbIV\n\
xMnFqSZdXyLz69vW24mTT9QCA61TwXWsP9l3UnGzFGCoPhFveJYXU90CAwEAAQ==\n\
-----END RSA PUBLIC KEY-----";

static EMBEDDED_ANCHOR: LazyLock<Result<Arc<TrustAnchor>, String>> =
    LazyLock::new(|| parse_pem(EMBEDDED_PUBLIC_KEY_PEM).map(|key| Arc::new(TrustAnchor { key })));

/// The public key trusted to sign licenses.
#[derive(Clone, PartialEq, Eq)]
pub struct TrustAnchor {
    key: RsaPublicKey,
}

impl TrustAnchor {
    /// Returns the trust anchor compiled into this binary.
    ///
    /// The key is decoded once per process and shared.
    ///
    /// # Errors
    ///
    /// Returns [`LicenseError::InvalidTrustAnchor`] if the embedded key block
    /// does not decode. This means the binary was built wrong and callers
    /// should refuse to start.
    pub fn embedded() -> LicenseResult<Arc<Self>> {
        EMBEDDED_ANCHOR
            .as_ref()
            .map(Arc::clone)
            .map_err(|e| LicenseError::InvalidTrustAnchor(e.clone()))
    }

    /// Decodes a PEM public key block, `RSA PUBLIC KEY` (PKCS#1) or
    /// `PUBLIC KEY` (SPKI).
    ///
    /// # Errors
    ///
    /// Returns [`LicenseError::InvalidTrustAnchor`] if neither form decodes.
    pub fn from_pem(pem: &str) -> LicenseResult<Self> {
        parse_pem(pem)
            .map(|key| Self { key })
            .map_err(LicenseError::InvalidTrustAnchor)
    }

    /// Wraps an already decoded public key.
    #[must_use]
    pub fn from_public_key(key: RsaPublicKey) -> Self {
        Self { key }
    }

    /// Returns the modulus size in bits.
    #[must_use]
    pub fn key_bits(&self) -> usize {
        self.key.size() * 8
    }
}

impl fmt::Debug for TrustAnchor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TrustAnchor")
            .field("bits", &self.key_bits())
            .finish()
    }
}

fn parse_pem(pem: &str) -> Result<RsaPublicKey, String> {
    let pem = pem.trim();
    RsaPublicKey::from_pkcs1_pem(pem).or_else(|pkcs1_err| {
        RsaPublicKey::from_public_key_pem(pem)
            .map_err(|_| format!("could not parse public key: {pkcs1_err}"))
    })
}

/// Result of checking a signature.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    /// The signature authenticates the payload.
    Valid,
    /// The signature decoded but does not match.
    Invalid,
    /// The signature is not valid URL-safe base64.
    Malformed(base64::DecodeError),
}

impl Verdict {
    /// Returns true only for [`Verdict::Valid`].
    #[must_use]
    pub fn is_valid(&self) -> bool {
        matches!(self, Self::Valid)
    }

    /// Converts the verdict into a result.
    ///
    /// # Errors
    ///
    /// [`LicenseError::SignatureMismatch`] for `Invalid`,
    /// [`LicenseError::MalformedSignature`] for `Malformed`.
    pub fn into_result(self) -> LicenseResult<()> {
        match self {
            Self::Valid => Ok(()),
            Self::Invalid => Err(LicenseError::SignatureMismatch),
            Self::Malformed(e) => Err(LicenseError::MalformedSignature(e)),
        }
    }
}

/// Verifies `signature` over `canonical` with the trust anchor's key.
///
/// Line breaks inside the signature are ignored, so a signature wrapped by
/// a text editor or mail client still decodes.
#[must_use]
pub fn verify(canonical: &[u8], signature: &str, anchor: &TrustAnchor) -> Verdict {
    let decoded = if signature.contains(['\r', '\n']) {
        let unwrapped: String = signature.chars().filter(|c| !matches!(c, '\r' | '\n')).collect();
        URL_SAFE.decode(unwrapped)
    } else {
        URL_SAFE.decode(signature)
    };
    let signature = match decoded {
        Ok(bytes) => bytes,
        Err(e) => return Verdict::Malformed(e),
    };

    let digest = Sha256::digest(canonical);

    match anchor
        .key
        .verify(Pkcs1v15Sign::new::<Sha256>(), &digest, &signature)
    {
        Ok(()) => Verdict::Valid,
        Err(_) => Verdict::Invalid,
    }
}
