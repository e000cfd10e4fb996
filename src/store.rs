//! The authoritative in-memory collection of regions for the loaded audio file.
//!
//! The store owns both the pending set and the saved list. The waveform surface
//! holds a visual copy of the same regions; [`crate::session::Session`] keeps
//! the two synchronized by mirroring every store mutation onto the surface.

use tracing::debug;

use crate::error::{Error, Result};
use crate::persistence::SavedRegionRecord;
use crate::region::{Region, RegionId};

#[derive(Debug, Default)]
pub struct RegionStore {
    regions: Vec<Region>,
    next_save_seq: u64,
}

impl RegionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a pending region from a user gesture.
    ///
    /// A degenerate interval (missing end, or `end <= start`) is clamped to
    /// `start + fallback_len`; a negative start is clamped to zero. The result
    /// always satisfies `0 <= start < end`.
    pub fn create_pending(&mut self, start: f64, end: Option<f64>, fallback_len: f64) -> RegionId {
        let start = start.max(0.0);
        let end = match end {
            Some(end) if end > start => end,
            _ => start + fallback_len,
        };

        let region = Region::pending(start, end);
        let id = region.id();
        debug!(%id, start, end, "created pending region");
        self.regions.push(region);
        id
    }

    pub fn get(&self, id: RegionId) -> Option<&Region> {
        self.regions.iter().find(|r| r.id() == id)
    }

    /// Move a pending region's bounds (drag or resize).
    ///
    /// Saved regions are frozen; attempts to move them return `RegionFrozen`.
    pub fn update_bounds(&mut self, id: RegionId, start: f64, end: f64) -> Result<()> {
        let region = self
            .regions
            .iter_mut()
            .find(|r| r.id() == id)
            .ok_or(Error::UnknownRegion)?;
        if region.saved {
            return Err(Error::RegionFrozen);
        }

        let start = start.max(0.0);
        if end <= start {
            return Err(Error::msg(format!(
                "invalid region bounds: start {start} must precede end {end}"
            )));
        }

        region.start = start;
        region.end = end;
        Ok(())
    }

    /// Attach document text captured by a selection gesture.
    pub fn set_selected_text(&mut self, id: RegionId, text: impl Into<String>) -> Result<()> {
        let region = self
            .regions
            .iter_mut()
            .find(|r| r.id() == id)
            .ok_or(Error::UnknownRegion)?;
        region.selected_text = Some(text.into());
        Ok(())
    }

    /// Promote a pending region to saved.
    ///
    /// Attaches the server-assigned fragment filename and the dialog comment,
    /// freezes the bounds, and stamps the save order. Calling this twice for
    /// the same region only bumps the metadata; the store never grows a second
    /// entry for the same identity.
    pub fn mark_saved(
        &mut self,
        id: RegionId,
        filename: impl Into<String>,
        comment: impl Into<String>,
    ) -> Result<&Region> {
        let index = self
            .regions
            .iter()
            .position(|r| r.id() == id)
            .ok_or(Error::UnknownRegion)?;

        let seq = self.next_save_seq;
        let region = &mut self.regions[index];
        region.saved = true;
        region.filename = Some(filename.into());
        let comment = comment.into();
        region.comment = if comment.trim().is_empty() {
            None
        } else {
            Some(comment)
        };
        if region.save_seq.is_none() {
            region.save_seq = Some(seq);
            self.next_save_seq += 1;
        }

        Ok(&self.regions[index])
    }

    /// Insert an already-saved region reloaded from the listing endpoint.
    pub fn insert_saved(&mut self, record: &SavedRegionRecord) -> RegionId {
        let mut region = Region::pending(record.start, record.end);
        region.saved = true;
        region.filename = Some(record.filename.clone());
        region.comment = if record.comment.trim().is_empty() {
            None
        } else {
            Some(record.comment.clone())
        };
        region.save_seq = Some(self.next_save_seq);
        self.next_save_seq += 1;

        let id = region.id();
        self.regions.push(region);
        id
    }

    /// Remove a pending region. Saved regions cannot be removed.
    pub fn remove(&mut self, id: RegionId) -> Result<()> {
        let index = self
            .regions
            .iter()
            .position(|r| r.id() == id)
            .ok_or(Error::UnknownRegion)?;
        if self.regions[index].saved {
            return Err(Error::RegionFrozen);
        }
        self.regions.remove(index);
        Ok(())
    }

    /// Remove every pending region, returning the removed ids so the caller
    /// can drop the matching visual regions and fix its selection pointer.
    pub fn clear_unsaved(&mut self) -> Vec<RegionId> {
        let removed: Vec<RegionId> = self
            .regions
            .iter()
            .filter(|r| !r.saved)
            .map(|r| r.id())
            .collect();
        self.regions.retain(|r| r.saved);
        debug!(count = removed.len(), "cleared pending regions");
        removed
    }

    /// The saved region containing `t`, if any.
    ///
    /// Overlapping saved regions are permitted; when several contain `t`, the
    /// most-recently-saved one wins.
    pub fn find_by_time(&self, t: f64) -> Option<&Region> {
        self.regions
            .iter()
            .filter(|r| r.saved && r.contains(t))
            .max_by_key(|r| r.save_seq)
    }

    pub fn find_by_filename(&self, name: &str) -> Option<&Region> {
        self.regions
            .iter()
            .find(|r| r.filename.as_deref() == Some(name))
    }

    pub fn saved(&self) -> impl Iterator<Item = &Region> {
        self.regions.iter().filter(|r| r.saved)
    }

    pub fn pending(&self) -> impl Iterator<Item = &Region> {
        self.regions.iter().filter(|r| !r.saved)
    }

    /// The most recently created pending region, used as a fallback when the
    /// user asks to save without an explicit selection.
    pub fn last_pending(&self) -> Option<&Region> {
        self.regions.iter().rev().find(|r| !r.saved)
    }

    pub fn len(&self) -> usize {
        self.regions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }
}
