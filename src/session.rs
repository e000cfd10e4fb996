//! The application context: one object owning the region store, playback
//! state, zoom, highlighter, persistence client, and the waveform surface.
//!
//! The lifecycle is explicit, with no process-wide singletons: construct with
//! collaborators, drive with [`Command`]s and [`AudioEvent`]s, observe through
//! subscribed [`EngineEvent`] listeners, drop to tear down.
//!
//! Everything runs on the caller's thread; each `dispatch` call is atomic with
//! respect to store state. A save's store mutation and surface sync complete
//! strictly before the dependent highlight attempt, because the save flow is
//! one sequential function rather than an observed-completion callback.

use tracing::{debug, error, info, warn};

use crate::command::Command;
use crate::error::{Error, Result};
use crate::events::{EngineEvent, ListenerHandle, Listeners};
use crate::highlight::{HighlightId, HighlightTarget, TextHighlighter};
use crate::matcher;
use crate::opts::SessionOpts;
use crate::persistence::{FragmentService, SaveRegionRequest};
use crate::playback::PlaybackController;
use crate::region::{RegionId, saved_label};
use crate::store::RegionStore;
use crate::surface::{AudioEvent, RegionSurface};
use crate::zoom::ZoomState;

pub struct Session<S: FragmentService, W: RegionSurface> {
    audio_filename: String,
    service: S,
    surface: W,
    store: RegionStore,
    playback: PlaybackController,
    zoom: ZoomState,
    highlighter: TextHighlighter,
    listeners: Listeners<EngineEvent>,
    opts: SessionOpts,
    /// Weak pointer: at most one region is active for UI purposes.
    selected: Option<RegionId>,
    dialog_open: bool,
    drag_selection: bool,
}

impl<S: FragmentService, W: RegionSurface> Session<S, W> {
    pub fn new(
        service: S,
        surface: W,
        audio_filename: impl Into<String>,
        document: impl Into<String>,
    ) -> Self {
        Self::with_opts(service, surface, audio_filename, document, SessionOpts::default())
    }

    pub fn with_opts(
        service: S,
        surface: W,
        audio_filename: impl Into<String>,
        document: impl Into<String>,
        opts: SessionOpts,
    ) -> Self {
        Self {
            audio_filename: audio_filename.into(),
            service,
            surface,
            store: RegionStore::new(),
            playback: PlaybackController::new(),
            zoom: ZoomState::new(),
            highlighter: TextHighlighter::new(document),
            listeners: Listeners::new(),
            opts,
            selected: None,
            dialog_open: false,
            drag_selection: false,
        }
    }

    pub fn subscribe(&mut self, listener: impl FnMut(&EngineEvent) + 'static) -> ListenerHandle {
        self.listeners.subscribe(listener)
    }

    pub fn unsubscribe(&mut self, handle: ListenerHandle) -> bool {
        self.listeners.unsubscribe(handle)
    }

    pub fn store(&self) -> &RegionStore {
        &self.store
    }

    pub fn highlighter(&self) -> &TextHighlighter {
        &self.highlighter
    }

    pub fn selected(&self) -> Option<RegionId> {
        self.selected
    }

    pub fn dialog_open(&self) -> bool {
        self.dialog_open
    }

    pub fn drag_selection(&self) -> bool {
        self.drag_selection
    }

    pub fn is_playing(&self) -> bool {
        self.playback.is_playing()
    }

    pub fn audio_loaded(&self) -> bool {
        self.playback.audio_loaded()
    }

    pub fn zoom_level(&self) -> u32 {
        self.zoom.level()
    }

    /// Feed a notification from the audio surface.
    pub fn handle_audio_event(&mut self, event: AudioEvent) -> Result<()> {
        match event {
            AudioEvent::Ready { duration } => {
                self.playback.set_loaded(duration);
                debug!(duration, "audio ready");
                Ok(())
            }
            AudioEvent::TimeUpdate { seconds } => {
                let was_playing = self.playback.is_playing();
                self.playback.on_time_update(&mut self.surface, seconds)?;
                if was_playing && !self.playback.is_playing() {
                    self.listeners.emit(&EngineEvent::PlaybackPaused);
                }
                Ok(())
            }
            AudioEvent::Finished => {
                self.playback.on_finish();
                self.listeners.emit(&EngineEvent::PlaybackStopped);
                Ok(())
            }
            AudioEvent::Error { message } => {
                error!(%message, "audio surface error");
                Ok(())
            }
        }
    }

    /// Run one UI command. Each invocation is atomic with respect to store
    /// state; an error leaves the session in its previous consistent state.
    pub fn dispatch(&mut self, command: Command) -> Result<()> {
        match command {
            Command::TogglePlayback => {
                let was_playing = self.playback.is_playing();
                self.playback.toggle(&mut self.surface)?;
                self.emit_playback_flip(was_playing);
                Ok(())
            }
            Command::StopPlayback => {
                let was_playing = self.playback.is_playing();
                self.playback.stop(&mut self.surface)?;
                if was_playing {
                    self.listeners.emit(&EngineEvent::PlaybackStopped);
                }
                Ok(())
            }
            Command::Cancel => {
                if self.dialog_open {
                    self.close_dialog();
                    Ok(())
                } else {
                    self.remove_selected_pending()
                }
            }
            Command::RemoveSelection => self.remove_selected_pending(),
            Command::PlaySelection => self.play_selection(),
            Command::BeginSave => self.begin_save(),
            Command::ConfirmSave { comment } => self.save_selection(&comment).map(|_| ()),
            Command::CloseDialog => {
                self.close_dialog();
                Ok(())
            }
            Command::SeekBy { seconds } => self.playback.seek_by(&mut self.surface, seconds),
            Command::Click { seconds } => self.click_at(seconds),
            Command::DoubleClick { seconds } => self.create_selection(seconds, None),
            Command::DragSelect { start, end } => self.create_selection(start, Some(end)),
            Command::ToggleDragSelection => {
                self.drag_selection = !self.drag_selection;
                self.surface.set_drag_selection(self.drag_selection)
            }
            Command::CaptureText { text } => self.capture_text(text),
            Command::ClearUnsaved => self.clear_unsaved(),
            Command::ZoomIn => {
                let level = self.zoom.zoom_in();
                self.apply_zoom(level)
            }
            Command::ZoomOut => {
                let level = self.zoom.zoom_out();
                self.apply_zoom(level)
            }
            Command::ResetZoom => {
                let level = self.zoom.reset();
                self.apply_zoom(level)
            }
        }
    }

    /// The surface moved or resized a pending region; follow it in the store.
    pub fn region_updated(&mut self, id: RegionId, start: f64, end: f64) -> Result<()> {
        self.store.update_bounds(id, start, end)
    }

    /// Pull the saved-region listing from the service and rebuild both the
    /// store's saved list and the text bindings.
    pub fn load_saved_regions(&mut self) -> Result<usize> {
        let records = self.service.saved_regions(&self.audio_filename)?;
        let count = records.len();

        for record in &records {
            let id = self.store.insert_saved(record);
            let label = saved_label(&record.comment);
            let region = self.store.get(id).ok_or(Error::UnknownRegion)?;
            self.surface.add_region(region)?;
            self.surface.mark_region_saved(region, &label)?;
        }

        // Bindings are never persisted; recompute them from each region's text.
        for record in &records {
            if !record.comment.trim().is_empty() {
                let filename = record.filename.clone();
                let text = record.comment.clone();
                let _ = self.try_bind_text(&filename, &text);
            }
        }

        info!(count, audio = %self.audio_filename, "loaded saved regions");
        self.listeners.emit(&EngineEvent::RegionsLoaded { count });
        Ok(count)
    }

    /// Persist the current selection with `comment`.
    ///
    /// On success the region is frozen, then the surface re-renders it as
    /// saved, then `RegionSaved` fires, then the text binding is attempted.
    /// On failure the region stays pending and untouched.
    pub fn save_selection(&mut self, comment: &str) -> Result<String> {
        let id = self.selection_or_last_pending()?;
        let (start, end, saved, selected_text) = {
            let region = self.store.get(id).ok_or(Error::UnknownRegion)?;
            (
                region.start,
                region.end,
                region.saved(),
                region.selected_text.clone(),
            )
        };
        if saved {
            return Err(Error::RegionFrozen);
        }

        let request = SaveRegionRequest {
            audio_filename: self.audio_filename.clone(),
            start,
            end,
            comment: comment.to_owned(),
        };
        let fragment = self.service.save_region(&request)?;

        let label = {
            let region = self.store.mark_saved(id, fragment.filename.clone(), comment)?;
            saved_label(region.comment.as_deref().unwrap_or(""))
        };
        {
            let region = self.store.get(id).ok_or(Error::UnknownRegion)?;
            self.surface.mark_region_saved(region, &label)?;
        }

        info!(filename = %fragment.filename, start, end, "region saved");
        self.listeners.emit(&EngineEvent::RegionSaved {
            region: id,
            filename: fragment.filename.clone(),
        });
        if self.dialog_open {
            self.close_dialog();
        }
        self.set_selected(None);

        // Best effort: the region stays usable even if the text never binds.
        let text = selected_text
            .filter(|t| !t.trim().is_empty())
            .or_else(|| {
                let trimmed = comment.trim();
                if trimmed.is_empty() {
                    None
                } else {
                    Some(trimmed.to_owned())
                }
            });
        if let Some(text) = text {
            let _ = self.try_bind_text(&fragment.filename, &text);
        }

        Ok(fragment.filename)
    }

    /// A highlighted span was clicked: replay its interval.
    ///
    /// If the originating region has vanished from the store, playback starts
    /// at the bound start with no enforced end.
    pub fn activate_highlight(&mut self, id: HighlightId) -> Result<()> {
        let (fragment, bound_start) = self
            .highlighter
            .get(id)
            .map(|h| (h.fragment.clone(), h.start))
            .ok_or_else(|| Error::msg("unknown highlight"))?;

        match self
            .store
            .find_by_filename(&fragment)
            .map(|r| (r.start, r.end))
        {
            Some((start, end)) => {
                self.playback.play_region(&mut self.surface, start, end)?;
            }
            None => {
                warn!(%fragment, "region for highlight is gone, playing without an end bound");
                self.playback.play_from(&mut self.surface, bound_start)?;
            }
        }
        if self.playback.is_playing() {
            self.listeners.emit(&EngineEvent::PlaybackStarted);
        }
        Ok(())
    }

    fn selection_or_last_pending(&self) -> Result<RegionId> {
        match self.selected {
            Some(id) => Ok(id),
            None => self
                .store
                .last_pending()
                .map(|r| r.id())
                .ok_or(Error::NoSelection),
        }
    }

    fn begin_save(&mut self) -> Result<()> {
        let id = self.selection_or_last_pending()?;
        let (start, end, saved) = self
            .store
            .get(id)
            .map(|r| (r.start, r.end, r.saved()))
            .ok_or(Error::UnknownRegion)?;
        if saved {
            return Err(Error::RegionFrozen);
        }
        if self.selected != Some(id) {
            self.set_selected(Some(id));
        }

        // Overlap with a saved region warns the user but does not block.
        let overlap = self
            .store
            .saved()
            .find(|r| r.overlaps(start, end))
            .map(|r| r.filename.clone());
        if let Some(filename) = overlap {
            self.listeners.emit(&EngineEvent::OverlapWarning { filename });
        }

        self.dialog_open = true;
        self.listeners.emit(&EngineEvent::DialogOpened);
        Ok(())
    }

    fn close_dialog(&mut self) {
        if self.dialog_open {
            self.dialog_open = false;
            self.listeners.emit(&EngineEvent::DialogClosed);
        }
    }

    fn remove_selected_pending(&mut self) -> Result<()> {
        // No selection: a second Escape after a clear is a plain no-op.
        let Some(id) = self.selected else {
            return Ok(());
        };
        if self.store.get(id).map(|r| r.saved()).unwrap_or(false) {
            return Ok(());
        }
        self.store.remove(id)?;
        self.surface.remove_region(id)?;
        self.set_selected(None);
        Ok(())
    }

    fn play_selection(&mut self) -> Result<()> {
        let Some(id) = self.selected else {
            return Ok(());
        };
        let Some((start, end)) = self.store.get(id).map(|r| (r.start, r.end)) else {
            return Ok(());
        };
        self.playback.play_region(&mut self.surface, start, end)?;
        if self.playback.is_playing() {
            self.listeners.emit(&EngineEvent::PlaybackStarted);
        }
        Ok(())
    }

    fn click_at(&mut self, seconds: f64) -> Result<()> {
        // A click inside a saved region selects it; elsewhere it seeks.
        match self.store.find_by_time(seconds).map(|r| r.id()) {
            Some(id) => {
                self.set_selected(Some(id));
                Ok(())
            }
            None => self.playback.seek_to(&mut self.surface, seconds),
        }
    }

    fn create_selection(&mut self, start: f64, end: Option<f64>) -> Result<()> {
        let id = self
            .store
            .create_pending(start, end, self.opts.default_region_seconds);
        {
            let region = self.store.get(id).ok_or(Error::UnknownRegion)?;
            self.surface.add_region(region)?;
        }
        self.set_selected(Some(id));
        Ok(())
    }

    fn capture_text(&mut self, text: String) -> Result<()> {
        let Some(id) = self.selected else {
            debug!("text selected with no active region");
            return Ok(());
        };
        self.store.set_selected_text(id, text)
    }

    fn clear_unsaved(&mut self) -> Result<()> {
        let removed = self.store.clear_unsaved();
        for id in &removed {
            self.surface.remove_region(*id)?;
        }
        if let Some(selected) = self.selected {
            if removed.contains(&selected) {
                self.set_selected(None);
            }
        }
        Ok(())
    }

    fn apply_zoom(&mut self, level: u32) -> Result<()> {
        self.surface.set_zoom(level)?;
        self.listeners.emit(&EngineEvent::ZoomChanged { level });
        Ok(())
    }

    fn set_selected(&mut self, region: Option<RegionId>) {
        if self.selected != region {
            self.selected = region;
            self.listeners.emit(&EngineEvent::SelectionChanged { region });
        }
    }

    fn emit_playback_flip(&mut self, was_playing: bool) {
        let now_playing = self.playback.is_playing();
        if now_playing != was_playing {
            self.listeners.emit(if now_playing {
                &EngineEvent::PlaybackStarted
            } else {
                &EngineEvent::PlaybackPaused
            });
        }
    }

    /// Re-run text binding for one fragment, recovering its region data
    /// through the matcher tiers. Returns the highlight id on success.
    pub fn bind_fragment(&mut self, filename: &str, text: &str) -> Option<HighlightId> {
        self.try_bind_text(filename, text)
    }

    fn try_bind_text(&mut self, filename: &str, text: &str) -> Option<HighlightId> {
        let Some(resolved) = matcher::resolve(&self.store, &self.service, filename, text) else {
            warn!(%filename, "could not recover region data for highlighting");
            return None;
        };
        let target = HighlightTarget {
            fragment: filename.to_owned(),
            start: resolved.start,
            end: resolved.end,
        };
        let bound = self
            .highlighter
            .bind(text, &target)
            .map(|h| (h.id, h.strategy));
        if let Some((id, strategy)) = bound {
            self.listeners.emit(&EngineEvent::HighlightBound {
                fragment: filename.to_owned(),
                strategy,
            });
            Some(id)
        } else {
            None
        }
    }
}
