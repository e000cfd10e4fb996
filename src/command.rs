//! The interaction layer: keyboard and UI gestures mapped onto engine commands.
//!
//! The host translates raw input into [`Command`] values and feeds them to
//! [`crate::session::Session::dispatch`]. Keyboard shortcuts go through
//! [`command_for_key`] so the bindings live in one place.

/// Keys the engine binds shortcuts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Space,
    Escape,
    Delete,
    Enter,
    KeyS,
    ArrowLeft,
    ArrowRight,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Modifiers {
    pub shift: bool,
    /// Ctrl on most platforms, Cmd on macOS.
    pub ctrl_or_cmd: bool,
}

/// Everything the UI surface can ask the engine to do.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    TogglePlayback,
    /// Stop playback and return the playhead to the start.
    StopPlayback,
    /// Escape: close the save dialog if open, otherwise clear the selection.
    Cancel,
    /// Delete: remove the selected region if it is still unsaved.
    RemoveSelection,
    PlaySelection,
    /// Open the save dialog for the current selection.
    BeginSave,
    /// Commit the save dialog with the entered comment.
    ConfirmSave { comment: String },
    CloseDialog,
    SeekBy { seconds: f64 },
    /// Single click on the waveform at a time position.
    Click { seconds: f64 },
    /// Double click: drop a marker region of default length.
    DoubleClick { seconds: f64 },
    /// Drag-select gesture over a time range.
    DragSelect { start: f64, end: f64 },
    ToggleDragSelection,
    /// Text selected in the document while a region is active.
    CaptureText { text: String },
    ClearUnsaved,
    ZoomIn,
    ZoomOut,
    ResetZoom,
}

/// Seek step for plain arrow keys, in seconds.
pub const SEEK_STEP: f64 = 1.0;
/// Seek step with Shift held, in seconds.
pub const SEEK_STEP_FAST: f64 = 5.0;

/// The keyboard shortcut table.
///
/// Returns `None` for chords the engine does not bind (e.g. a bare `S`).
pub fn command_for_key(key: Key, modifiers: Modifiers) -> Option<Command> {
    let seek_step = if modifiers.shift {
        SEEK_STEP_FAST
    } else {
        SEEK_STEP
    };

    match key {
        Key::Space => Some(Command::TogglePlayback),
        Key::Escape => Some(Command::Cancel),
        Key::Delete => Some(Command::RemoveSelection),
        Key::Enter => Some(Command::PlaySelection),
        Key::KeyS if modifiers.ctrl_or_cmd => Some(Command::BeginSave),
        Key::KeyS => None,
        Key::ArrowLeft => Some(Command::SeekBy {
            seconds: -seek_step,
        }),
        Key::ArrowRight => Some(Command::SeekBy { seconds: seek_step }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn space_toggles_playback() {
        assert_eq!(
            command_for_key(Key::Space, Modifiers::default()),
            Some(Command::TogglePlayback)
        );
    }

    #[test]
    fn save_requires_the_chord() {
        assert_eq!(command_for_key(Key::KeyS, Modifiers::default()), None);
        assert_eq!(
            command_for_key(
                Key::KeyS,
                Modifiers {
                    ctrl_or_cmd: true,
                    ..Default::default()
                }
            ),
            Some(Command::BeginSave)
        );
    }

    #[test]
    fn arrows_seek_one_second_or_five_with_shift() {
        assert_eq!(
            command_for_key(Key::ArrowLeft, Modifiers::default()),
            Some(Command::SeekBy { seconds: -1.0 })
        );
        assert_eq!(
            command_for_key(
                Key::ArrowRight,
                Modifiers {
                    shift: true,
                    ..Default::default()
                }
            ),
            Some(Command::SeekBy { seconds: 5.0 })
        );
    }

    #[test]
    fn escape_and_delete_map_to_selection_commands() {
        assert_eq!(
            command_for_key(Key::Escape, Modifiers::default()),
            Some(Command::Cancel)
        );
        assert_eq!(
            command_for_key(Key::Delete, Modifiers::default()),
            Some(Command::RemoveSelection)
        );
    }
}
