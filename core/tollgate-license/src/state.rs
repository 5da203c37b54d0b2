//! The process-wide active license.

use crate::license::License;
use arc_swap::ArcSwapOption;
use std::sync::Arc;

/// Holds the last successfully activated license, if any.
///
/// Writes replace the whole value with a single pointer swap, so a reader
/// sees either the previous license or the new one, never a mix. Readers do
/// not block the writer.
#[derive(Debug)]
pub struct ActiveLicenseState {
    current: ArcSwapOption<License>,
}

impl ActiveLicenseState {
    /// Creates an empty state.
    #[must_use]
    pub fn new() -> Self {
        Self {
            current: ArcSwapOption::empty(),
        }
    }

    /// Installs `license` as the active license, returning the shared copy.
    pub fn set(&self, license: License) -> Arc<License> {
        let license = Arc::new(license);
        self.current.store(Some(Arc::clone(&license)));
        license
    }

    /// Removes the active license.
    pub fn clear(&self) {
        self.current.store(None);
    }

    /// Returns an immutable snapshot of the active license.
    #[must_use]
    pub fn snapshot(&self) -> Option<Arc<License>> {
        self.current.load_full()
    }

    /// Returns true if a license is active.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.current.load().is_some()
    }
}

impl Default for ActiveLicenseState {
    fn default() -> Self {
        Self::new()
    }
}
