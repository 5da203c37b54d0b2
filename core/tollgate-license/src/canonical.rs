//! Canonical encoding of the license payload.
//!
//! The issuer signs the SHA-256 digest of the payload serialized as compact
//! JSON, fields in declaration order, with its JSON encoder's HTML-safe string
//! escaping. Any byte of difference here fails every valid license, so the
//! escaping below mirrors that encoder exactly: on top of the usual JSON
//! escapes, `<`, `>`, `&`, U+2028 and U+2029 are written as `\uXXXX`.

use crate::error::{LicenseError, LicenseResult};
use crate::license::License;
use serde::Serialize;
use serde_json::ser::Formatter;
use std::io;

/// Encodes a license into the exact bytes covered by its signature.
///
/// # Errors
///
/// Returns [`LicenseError::Encoding`] if serialization fails.
pub fn encode(license: &License) -> LicenseResult<Vec<u8>> {
    let mut out = Vec::with_capacity(256);
    let mut ser = serde_json::Serializer::with_formatter(&mut out, CanonicalFormatter);
    license
        .serialize(&mut ser)
        .map_err(LicenseError::Encoding)?;
    Ok(out)
}

/// Compact formatter with HTML-safe string escaping.
struct CanonicalFormatter;

impl Formatter for CanonicalFormatter {
    fn write_string_fragment<W>(&mut self, writer: &mut W, fragment: &str) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        let mut start = 0;
        for (i, ch) in fragment.char_indices() {
            let escaped = match ch {
                '<' => "\\u003c",
                '>' => "\\u003e",
                '&' => "\\u0026",
                '\u{2028}' => "\\u2028",
                '\u{2029}' => "\\u2029",
                _ => continue,
            };
            writer.write_all(fragment[start..i].as_bytes())?;
            writer.write_all(escaped.as_bytes())?;
            start = i + ch.len_utf8();
        }
        writer.write_all(fragment[start..].as_bytes())
    }
}
