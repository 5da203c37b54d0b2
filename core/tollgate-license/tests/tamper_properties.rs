//! Property-based tests for tamper detection.
//!
//! A license signed by the trusted issuer must stop verifying after any
//! single-bit change to its signature or to its canonical payload, and the
//! activator must then leave the active license empty.

mod common;

use base64::{engine::general_purpose::URL_SAFE, Engine};
use common::{activator, envelope, issuer_anchor, issuer_key, sample_license, sign};
use proptest::prelude::*;
use tollgate_license::{canonical, verifier, License, RevocationList, Verdict};

fn license_strategy() -> impl Strategy<Value = License> {
    (
        "[A-Za-z0-9-]{0,16}",
        "[ -~]{0,24}",
        "[A-Z]{2}[0-9]{8}",
        any::<i64>(),
        "\\PC{0,24}",
        any::<i64>(),
    )
        .prop_map(
            |(client_id, extension, license_id, login_count, registered_for, valid_until)| License {
                client_id,
                extension,
                license_id,
                login_count,
                registered_for,
                valid_until,
            },
        )
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(48))]

    /// Correctly signed licenses always activate with exactly their payload.
    #[test]
    fn signed_license_activates(license in license_strategy()) {
        prop_assume!(!RevocationList::builtin().is_revoked(&license.license_id));
        let activator = activator();
        let outcome = activator.activate(&envelope(&license, &sign(issuer_key(), &license)));
        prop_assert!(outcome.is_active());
        let active = activator.state().snapshot();
        prop_assert_eq!(active.as_deref(), Some(&license));
    }

    /// Flipping any bit of the decoded signature invalidates it.
    #[test]
    fn signature_bit_flip_is_invalid(bit in 0usize..2048) {
        let license = sample_license("ABC123");
        let bytes = canonical::encode(&license).unwrap();
        let mut raw = URL_SAFE.decode(sign(issuer_key(), &license)).unwrap();
        raw[bit / 8] ^= 1 << (bit % 8);
        let verdict = verifier::verify(&bytes, &URL_SAFE.encode(&raw), &issuer_anchor());
        prop_assert_eq!(verdict, Verdict::Invalid);

        let activator = activator();
        activator.activate(&envelope(&license, &URL_SAFE.encode(&raw)));
        prop_assert!(activator.state().snapshot().is_none());
    }

    /// Flipping any bit of the canonical payload invalidates the signature.
    #[test]
    fn payload_bit_flip_is_invalid(index in any::<prop::sample::Index>(), bit in 0u8..8) {
        let license = sample_license("ABC123");
        let signature = sign(issuer_key(), &license);
        let mut bytes = canonical::encode(&license).unwrap();
        let i = index.index(bytes.len());
        bytes[i] ^= 1 << bit;
        prop_assert_eq!(
            verifier::verify(&bytes, &signature, &issuer_anchor()),
            Verdict::Invalid
        );
    }

    /// Changing any payload field after signing is rejected.
    #[test]
    fn field_change_is_rejected(field in 0usize..6, delta in 1i64..1_000_000) {
        let license = sample_license("ABC123");
        let signature = sign(issuer_key(), &license);
        let mut tampered = license.clone();
        match field {
            0 => tampered.client_id.push('x'),
            1 => tampered.extension.push('x'),
            2 => tampered.license_id.push('x'),
            3 => tampered.login_count = tampered.login_count.wrapping_add(delta),
            4 => tampered.registered_for.push('x'),
            _ => tampered.valid_until = tampered.valid_until.wrapping_add(delta),
        }
        let activator = activator();
        prop_assert!(activator.activate(&envelope(&tampered, &signature)).error().is_some());
        prop_assert!(!activator.state().is_active());
    }

    /// Canonical encoding is stable across a parse of its own output.
    #[test]
    fn canonical_encoding_is_stable(license in license_strategy()) {
        let bytes = canonical::encode(&license).unwrap();
        let reparsed: License = serde_json::from_slice(&bytes).unwrap();
        prop_assert_eq!(canonical::encode(&reparsed).unwrap(), bytes);
    }
}
