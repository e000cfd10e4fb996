//! The region data model: a time interval on the audio timeline, optionally
//! annotated and persisted.
//!
//! Lifecycle:
//! - created pending by a user gesture (drag-select or double-click)
//! - bounds stay mutable while pending
//! - promoted to saved once the persistence service assigns a fragment
//!   filename, after which the bounds are frozen

use serde::Serialize;
use uuid::Uuid;

/// Default length applied when a gesture produces a degenerate interval
/// (marker double-click, or a drag that never moved).
pub const DEFAULT_REGION_SECONDS: f64 = 1.0;

/// Labels longer than this are truncated on the waveform surface.
const MAX_LABEL_CHARS: usize = 20;

/// Stable identity for a region while it lives in the store.
///
/// Saved regions are additionally keyed by their server-assigned fragment
/// filename; pending regions only have this id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RegionId(Uuid);

impl RegionId {
    pub(crate) fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl std::fmt::Display for RegionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

/// A region on the audio timeline.
///
/// Invariant: `0 <= start < end` at all times. Mutation goes through
/// [`crate::store::RegionStore`], which enforces the invariant and rejects
/// bound changes once `saved` is true.
#[derive(Debug, Clone, Serialize)]
pub struct Region {
    #[serde(skip)]
    pub(crate) id: RegionId,
    pub start: f64,
    pub end: f64,
    /// User-supplied annotation from the save dialog.
    pub comment: Option<String>,
    /// Text captured from a document selection gesture. Distinct from the
    /// comment; preferred over it when binding the region to the document.
    pub selected_text: Option<String>,
    /// Server-assigned fragment filename. Present iff saved.
    pub filename: Option<String>,
    pub(crate) saved: bool,
    /// Monotonic save order, used to tie-break overlapping saved regions.
    #[serde(skip)]
    pub(crate) save_seq: Option<u64>,
}

impl Region {
    pub(crate) fn pending(start: f64, end: f64) -> Self {
        Self {
            id: RegionId::new(),
            start,
            end,
            comment: None,
            selected_text: None,
            filename: None,
            saved: false,
            save_seq: None,
        }
    }

    pub fn id(&self) -> RegionId {
        self.id
    }

    pub fn saved(&self) -> bool {
        self.saved
    }

    pub fn duration(&self) -> f64 {
        self.end - self.start
    }

    /// Whether `[start, end]` contains `t` (both ends inclusive).
    pub fn contains(&self, t: f64) -> bool {
        t >= self.start && t <= self.end
    }

    /// Whether this region's interval intersects `[start, end]`.
    pub fn overlaps(&self, start: f64, end: f64) -> bool {
        (self.start <= start && self.end >= start)
            || (self.start <= end && self.end >= end)
            || (start <= self.start && end >= self.end)
    }

    /// The text to bind against the document: the captured selection when one
    /// exists, the comment otherwise.
    pub fn binding_text(&self) -> Option<&str> {
        self.selected_text
            .as_deref()
            .filter(|t| !t.trim().is_empty())
            .or_else(|| self.comment.as_deref().filter(|t| !t.trim().is_empty()))
    }
}

/// Label shown on a saved region: the comment truncated to 20 characters, or
/// "Saved" when there is no comment.
pub fn saved_label(comment: &str) -> String {
    let comment = comment.trim();
    if comment.is_empty() {
        return "Saved".to_owned();
    }
    if comment.chars().count() > MAX_LABEL_CHARS {
        let head: String = comment.chars().take(MAX_LABEL_CHARS - 3).collect();
        format!("{head}...")
    } else {
        comment.to_owned()
    }
}
