//! Shared test helpers for license tests.

#![allow(dead_code)]

use base64::{engine::general_purpose::URL_SAFE, Engine};
use rsa::pkcs1::DecodeRsaPrivateKey;
use rsa::{Pkcs1v15Sign, RsaPrivateKey};
use sha2::{Digest, Sha256};
use std::sync::{Arc, LazyLock, Mutex};
use tollgate_license::{canonical, License, LicenseActivator, RevocationList, TrustAnchor};
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::layer::{Context, Layer, SubscriberExt};

pub const ISSUER_PUBLIC_PEM: &str = include_str!("../fixtures/issuer.pub.pem");
pub const ISSUER_SPKI_PEM: &str = include_str!("../fixtures/issuer.spki.pem");
pub const OPENSSL_ENVELOPE: &str = include_str!("../fixtures/openssl_envelope.json");

static ISSUER_KEY: LazyLock<RsaPrivateKey> = LazyLock::new(|| {
    RsaPrivateKey::from_pkcs1_pem(include_str!("../fixtures/issuer.pem")).unwrap()
});

static ROGUE_KEY: LazyLock<RsaPrivateKey> = LazyLock::new(|| {
    RsaPrivateKey::from_pkcs1_pem(include_str!("../fixtures/rogue.pem")).unwrap()
});

/// The key the test trust anchor accepts.
pub fn issuer_key() -> &'static RsaPrivateKey {
    &ISSUER_KEY
}

/// A well-formed key the test trust anchor does not accept.
pub fn rogue_key() -> &'static RsaPrivateKey {
    &ROGUE_KEY
}

pub fn issuer_anchor() -> TrustAnchor {
    TrustAnchor::from_pem(ISSUER_PUBLIC_PEM).unwrap()
}

/// Activator trusting the test issuer, with the built-in revocation list.
pub fn activator() -> LicenseActivator {
    LicenseActivator::with_trust_anchor(issuer_anchor())
}

pub fn activator_revoking(ids: &[&str]) -> LicenseActivator {
    activator().with_revocations(RevocationList::from_ids(ids.iter().copied()))
}

pub fn sample_license(license_id: &str) -> License {
    License {
        client_id: "client-7".into(),
        extension: String::new(),
        license_id: license_id.into(),
        login_count: 10,
        registered_for: "Example <Ops> & Co".into(),
        valid_until: 1_893_456_000,
    }
}

/// Signs the canonical encoding of `license`, returning URL-safe base64.
pub fn sign(key: &RsaPrivateKey, license: &License) -> String {
    sign_bytes(key, &canonical::encode(license).unwrap())
}

pub fn sign_bytes(key: &RsaPrivateKey, bytes: &[u8]) -> String {
    let digest = Sha256::digest(bytes);
    let signature = key.sign(Pkcs1v15Sign::new::<Sha256>(), &digest).unwrap();
    URL_SAFE.encode(signature)
}

/// Builds a license file carrying `license` and `signature`.
pub fn envelope(license: &License, signature: &str) -> String {
    serde_json::json!({ "license": license, "signature": signature }).to_string()
}

/// Builds a license file for `license` signed by the test issuer.
pub fn signed_envelope(license: &License) -> String {
    envelope(license, &sign(issuer_key(), license))
}

/// Records the level of every event emitted by this crate.
#[derive(Clone, Default)]
pub struct EventRecorder {
    events: Arc<Mutex<Vec<(Level, String)>>>,
}

impl EventRecorder {
    pub fn levels(&self) -> Vec<Level> {
        self.events.lock().unwrap().iter().map(|(l, _)| *l).collect()
    }
}

impl<S: Subscriber> Layer<S> for EventRecorder {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let meta = event.metadata();
        if meta.target().starts_with("tollgate_license") {
            self.events
                .lock()
                .unwrap()
                .push((*meta.level(), meta.target().to_string()));
        }
    }
}

/// Runs `f` with a recording subscriber, returning its result and the
/// levels of the events it emitted.
pub fn with_recorded_events<R>(f: impl FnOnce() -> R) -> (R, Vec<Level>) {
    let recorder = EventRecorder::default();
    let subscriber = tracing_subscriber::registry().with(recorder.clone());
    let result = tracing::subscriber::with_default(subscriber, f);
    (result, recorder.levels())
}
