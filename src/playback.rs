//! Thin transport wrapper over the audio surface.
//!
//! All operations are guarded no-ops until the surface reports ready. Bounded
//! region playback installs a watch that is checked from `TimeUpdate`
//! notifications; the watch is cancelled on *any* pause/stop/finish so a
//! playback state change can never leave a stale end-bound behind.

use tracing::debug;

use crate::error::Result;
use crate::surface::AudioSurface;

/// End bound for an in-flight region playback.
#[derive(Debug, Clone, Copy, PartialEq)]
struct RegionWatch {
    end: f64,
}

#[derive(Debug, Default)]
pub struct PlaybackController {
    audio_loaded: bool,
    duration: f64,
    is_playing: bool,
    watch: Option<RegionWatch>,
}

impl PlaybackController {
    pub fn new() -> Self {
        Self::default()
    }

    /// Called when the audio surface reports ready.
    pub fn set_loaded(&mut self, duration: f64) {
        self.audio_loaded = true;
        self.duration = duration;
    }

    pub fn audio_loaded(&self) -> bool {
        self.audio_loaded
    }

    pub fn is_playing(&self) -> bool {
        self.is_playing
    }

    pub fn duration(&self) -> f64 {
        self.duration
    }

    /// Whether a bounded region playback is currently being watched.
    pub fn watching_region(&self) -> bool {
        self.watch.is_some()
    }

    pub fn play<A: AudioSurface + ?Sized>(&mut self, surface: &mut A) -> Result<()> {
        if !self.audio_loaded {
            return Ok(());
        }
        surface.play()?;
        self.is_playing = true;
        Ok(())
    }

    pub fn pause<A: AudioSurface + ?Sized>(&mut self, surface: &mut A) -> Result<()> {
        if !self.is_playing {
            return Ok(());
        }
        surface.pause()?;
        self.is_playing = false;
        self.watch = None;
        Ok(())
    }

    pub fn stop<A: AudioSurface + ?Sized>(&mut self, surface: &mut A) -> Result<()> {
        if !self.audio_loaded {
            return Ok(());
        }
        surface.stop()?;
        self.is_playing = false;
        self.watch = None;
        Ok(())
    }

    pub fn toggle<A: AudioSurface + ?Sized>(&mut self, surface: &mut A) -> Result<()> {
        if self.is_playing {
            self.pause(surface)
        } else {
            self.play(surface)
        }
    }

    pub fn seek_to<A: AudioSurface + ?Sized>(&mut self, surface: &mut A, seconds: f64) -> Result<()> {
        if !self.audio_loaded {
            return Ok(());
        }
        surface.seek_to(seconds.clamp(0.0, self.duration))
    }

    /// Seek relative to the current position, clamped to `[0, duration]`.
    pub fn seek_by<A: AudioSurface + ?Sized>(&mut self, surface: &mut A, delta: f64) -> Result<()> {
        if !self.audio_loaded {
            return Ok(());
        }
        let target = (surface.current_time() + delta).clamp(0.0, self.duration);
        surface.seek_to(target)
    }

    /// Seek to `start`, begin playback, and pause when the playhead passes
    /// `end` (detected from time updates).
    pub fn play_region<A: AudioSurface + ?Sized>(
        &mut self,
        surface: &mut A,
        start: f64,
        end: f64,
    ) -> Result<()> {
        if !self.audio_loaded {
            return Ok(());
        }
        surface.seek_to(start)?;
        surface.play()?;
        self.is_playing = true;
        self.watch = Some(RegionWatch { end });
        debug!(start, end, "bounded region playback started");
        Ok(())
    }

    /// Degraded playback for a binding whose region has vanished: start at
    /// `start` with no enforced end bound.
    pub fn play_from<A: AudioSurface + ?Sized>(&mut self, surface: &mut A, start: f64) -> Result<()> {
        if !self.audio_loaded {
            return Ok(());
        }
        surface.seek_to(start)?;
        surface.play()?;
        self.is_playing = true;
        self.watch = None;
        Ok(())
    }

    /// Feed a time update from the surface. Pauses when a watched region ends.
    pub fn on_time_update<A: AudioSurface + ?Sized>(
        &mut self,
        surface: &mut A,
        seconds: f64,
    ) -> Result<()> {
        if !self.is_playing {
            return Ok(());
        }
        if let Some(watch) = self.watch {
            if seconds >= watch.end {
                debug!(end = watch.end, "region end reached, pausing");
                self.pause(surface)?;
            }
        }
        Ok(())
    }

    /// Playback ran off the end of the audio.
    pub fn on_finish(&mut self) {
        self.is_playing = false;
        self.watch = None;
    }
}
