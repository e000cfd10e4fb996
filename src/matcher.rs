//! Region recovery for save-completion events that carry only a filename.
//!
//! Saving and highlighting are decoupled: by the time a highlight is attempted,
//! the region may or may not still be in the store (the save could have
//! completed through a different path, or the store could have been reloaded).
//! The matcher degrades through three tiers instead of failing outright:
//!
//! 1. exact filename match against the store;
//! 2. a `/get_fragment_data` round-trip, trusting the service's copy;
//! 3. fuzzy match on saved regions whose comment or captured text contains the
//!    sought text as a substring.

use tracing::debug;

use crate::persistence::FragmentService;
use crate::store::RegionStore;

/// The interval and text recovered for a fragment.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedRegion {
    pub start: f64,
    pub end: f64,
    pub text: Option<String>,
}

/// Resolve `filename` to a full region, falling back tier by tier.
///
/// `sought_text` only participates in the fuzzy tier; it may be empty, in which
/// case that tier is skipped.
pub fn resolve<S: FragmentService>(
    store: &RegionStore,
    service: &S,
    filename: &str,
    sought_text: &str,
) -> Option<ResolvedRegion> {
    if let Some(region) = store.find_by_filename(filename) {
        debug!(%filename, "resolved fragment from the store");
        return Some(ResolvedRegion {
            start: region.start,
            end: region.end,
            text: region.binding_text().map(str::to_owned),
        });
    }

    match service.fragment_data(filename) {
        Ok(fragment) => {
            debug!(%filename, "resolved fragment from the service");
            return Some(ResolvedRegion {
                start: fragment.start_time,
                end: fragment.end_time,
                text: fragment.selected_text,
            });
        }
        Err(err) => {
            debug!(%filename, error = %err, "fragment data fetch failed, trying fuzzy match");
        }
    }

    let sought = sought_text.trim();
    if sought.is_empty() {
        return None;
    }

    store
        .saved()
        .find(|r| {
            r.comment.as_deref().is_some_and(|c| c.contains(sought))
                || r.selected_text.as_deref().is_some_and(|t| t.contains(sought))
        })
        .map(|region| {
            debug!(%filename, "resolved fragment by fuzzy text match");
            ResolvedRegion {
                start: region.start,
                end: region.end,
                text: region.binding_text().map(str::to_owned),
            }
        })
}
