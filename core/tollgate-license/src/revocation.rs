//! License revocation list.

use std::collections::HashSet;
use std::sync::LazyLock;

/// License IDs revoked by the issuer, baked into this binary.
pub const REVOKED_LICENSE_IDS: &[&str] = &["LI00334231"];

static BUILTIN: LazyLock<RevocationList> =
    LazyLock::new(|| RevocationList::from_ids(REVOKED_LICENSE_IDS.iter().copied()));

/// A fixed set of revoked license IDs.
///
/// Matching is exact and case-sensitive. The list is not refreshed from any
/// live source.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RevocationList {
    ids: HashSet<String>,
}

impl RevocationList {
    /// Returns the list compiled into this binary.
    #[must_use]
    pub fn builtin() -> &'static Self {
        &BUILTIN
    }

    /// Builds a list from the given IDs.
    pub fn from_ids<I, S>(ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            ids: ids.into_iter().map(Into::into).collect(),
        }
    }

    /// Returns true if `license_id` has been revoked.
    #[must_use]
    pub fn is_revoked(&self, license_id: &str) -> bool {
        self.ids.contains(license_id)
    }

    /// Returns the number of revoked IDs.
    #[must_use]
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    /// Returns true if no IDs are revoked.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}
