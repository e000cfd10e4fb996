use crate::region::DEFAULT_REGION_SECONDS;

/// Options that shape a session's gesture handling.
///
/// This is *library-level configuration*, not UI settings: the host maps user
/// preferences into this type so other frontends (tests, CLIs, batch tools)
/// can construct sessions programmatically.
#[derive(Debug, Clone)]
pub struct SessionOpts {
    /// Length given to a region created from a degenerate gesture (marker
    /// double-click, zero-width drag).
    pub default_region_seconds: f64,
}

impl Default for SessionOpts {
    fn default() -> Self {
        Self {
            default_region_seconds: DEFAULT_REGION_SECONDS,
        }
    }
}
