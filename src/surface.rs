//! Collaborator traits for the waveform rendering surface.
//!
//! The engine never talks to a renderer directly; it drives these traits and
//! consumes [`AudioEvent`] notifications the host pumps back in. This keeps the
//! region/text logic testable with plain in-memory doubles.

use crate::error::Result;
use crate::region::{Region, RegionId};

/// Playback-capable audio surface (load state, transport, zoom).
pub trait AudioSurface {
    fn play(&mut self) -> Result<()>;
    fn pause(&mut self) -> Result<()>;
    /// Stop playback and return the playhead to the start.
    fn stop(&mut self) -> Result<()>;
    fn seek_to(&mut self, seconds: f64) -> Result<()>;
    fn current_time(&self) -> f64;
    fn duration(&self) -> f64;
    fn set_zoom(&mut self, level: u32) -> Result<()>;
}

/// Audio surface that can additionally render regions.
///
/// The visual list must stay one-to-one with the store: the session mirrors
/// every store mutation here and never leaves a dangling visual region.
pub trait RegionSurface: AudioSurface {
    fn add_region(&mut self, region: &Region) -> Result<()>;
    fn remove_region(&mut self, id: RegionId) -> Result<()>;
    /// Render a region as saved: locked against drag/resize, distinct color,
    /// and the given label.
    fn mark_region_saved(&mut self, region: &Region, label: &str) -> Result<()>;
    fn set_drag_selection(&mut self, enabled: bool) -> Result<()>;
}

/// Notifications the audio surface delivers back to the engine.
///
/// The host forwards these to [`crate::session::Session::handle_audio_event`].
/// Bounded region playback rides on `TimeUpdate` instead of a free-running
/// timer, so there is no poll loop to orphan.
#[derive(Debug, Clone, PartialEq)]
pub enum AudioEvent {
    Ready { duration: f64 },
    TimeUpdate { seconds: f64 },
    Finished,
    Error { message: String },
}
