//! Waveform zoom level state.
//!
//! This is a stateless clamp-and-step helper: the engine tracks the current
//! level here and pushes the clamped value to the waveform surface. Out-of-range
//! requests clamp rather than error.

/// Minimum zoom level accepted by the waveform surface.
pub const MIN_ZOOM: u32 = 10;

/// Maximum zoom level accepted by the waveform surface.
pub const MAX_ZOOM: u32 = 200;

/// Level change per zoom gesture (button click or wheel tick).
pub const ZOOM_STEP: u32 = 20;

/// Default zoom level on load and after a reset.
pub const DEFAULT_ZOOM: u32 = 50;

/// Current zoom level, always within `[MIN_ZOOM, MAX_ZOOM]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ZoomState {
    level: u32,
}

impl ZoomState {
    pub fn new() -> Self {
        Self {
            level: DEFAULT_ZOOM,
        }
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    /// Step in by one gesture; returns the new level.
    pub fn zoom_in(&mut self) -> u32 {
        self.level = (self.level + ZOOM_STEP).min(MAX_ZOOM);
        self.level
    }

    /// Step out by one gesture; returns the new level.
    pub fn zoom_out(&mut self) -> u32 {
        self.level = self.level.saturating_sub(ZOOM_STEP).max(MIN_ZOOM);
        self.level
    }

    /// Reset to the default level; returns it.
    pub fn reset(&mut self) -> u32 {
        self.level = DEFAULT_ZOOM;
        self.level
    }

    /// Set an explicit level, clamping out-of-range requests.
    pub fn set(&mut self, level: i64) -> u32 {
        self.level = level.clamp(MIN_ZOOM as i64, MAX_ZOOM as i64) as u32;
        self.level
    }
}

impl Default for ZoomState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_at_default() {
        assert_eq!(ZoomState::new().level(), DEFAULT_ZOOM);
    }

    #[test]
    fn steps_by_twenty_and_clamps_at_max() {
        let mut zoom = ZoomState::new();
        assert_eq!(zoom.zoom_in(), 70);
        for _ in 0..20 {
            zoom.zoom_in();
        }
        assert_eq!(zoom.level(), MAX_ZOOM);
    }

    #[test]
    fn steps_down_and_clamps_at_min() {
        let mut zoom = ZoomState::new();
        assert_eq!(zoom.zoom_out(), 30);
        assert_eq!(zoom.zoom_out(), MIN_ZOOM);
        assert_eq!(zoom.zoom_out(), MIN_ZOOM);
    }

    #[test]
    fn set_clamps_out_of_range_requests() {
        let mut zoom = ZoomState::new();
        assert_eq!(zoom.set(500), 200);
        assert_eq!(zoom.set(-50), 10);
        assert_eq!(zoom.set(90), 90);
    }

    #[test]
    fn reset_returns_to_default() {
        let mut zoom = ZoomState::new();
        zoom.set(180);
        assert_eq!(zoom.reset(), DEFAULT_ZOOM);
    }
}
