//! Engine event notifications.
//!
//! The session notifies its host (UI layer, tests) through an arena of
//! listeners with indexed, generation-tagged handles. Unsubscribing with a
//! stale handle is a no-op, so a handle kept past its listener's removal can
//! never detach a listener that later reused the slot.

use crate::highlight::MatchStrategy;
use crate::region::RegionId;

/// Notifications emitted by the session as it mutates state.
///
/// Hosts observe state changes here instead of watching the transport or the
/// rendered surface. The save flow in particular emits `RegionSaved` from the
/// engine itself, strictly after the store mutation and strictly before the
/// highlight attempt.
#[derive(Debug, Clone, PartialEq)]
pub enum EngineEvent {
    SelectionChanged { region: Option<RegionId> },
    DialogOpened,
    DialogClosed,
    /// The selection being saved intersects an already-saved region. A warning,
    /// not a veto: the save proceeds.
    OverlapWarning { filename: Option<String> },
    RegionSaved { region: RegionId, filename: String },
    RegionsLoaded { count: usize },
    HighlightBound { fragment: String, strategy: MatchStrategy },
    ZoomChanged { level: u32 },
    PlaybackStarted,
    PlaybackPaused,
    PlaybackStopped,
}

/// Handle to a subscribed listener. Index plus generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListenerHandle {
    index: usize,
    generation: u32,
}

struct Slot<E> {
    generation: u32,
    callback: Option<Box<dyn FnMut(&E)>>,
}

/// Arena of active listeners for events of type `E`.
pub struct Listeners<E> {
    slots: Vec<Slot<E>>,
}

impl<E> Listeners<E> {
    pub fn new() -> Self {
        Self { slots: Vec::new() }
    }

    /// Register a listener and return its handle.
    pub fn subscribe(&mut self, callback: impl FnMut(&E) + 'static) -> ListenerHandle {
        // Reuse the first vacant slot, bumping its generation.
        if let Some(index) = self.slots.iter().position(|s| s.callback.is_none()) {
            let slot = &mut self.slots[index];
            slot.generation = slot.generation.wrapping_add(1);
            slot.callback = Some(Box::new(callback));
            return ListenerHandle {
                index,
                generation: slot.generation,
            };
        }

        self.slots.push(Slot {
            generation: 0,
            callback: Some(Box::new(callback)),
        });
        ListenerHandle {
            index: self.slots.len() - 1,
            generation: 0,
        }
    }

    /// Remove a listener. Returns false for stale or unknown handles.
    pub fn unsubscribe(&mut self, handle: ListenerHandle) -> bool {
        match self.slots.get_mut(handle.index) {
            Some(slot) if slot.generation == handle.generation && slot.callback.is_some() => {
                slot.callback = None;
                true
            }
            _ => false,
        }
    }

    /// Invoke every active listener with `event`.
    pub fn emit(&mut self, event: &E) {
        for slot in &mut self.slots {
            if let Some(callback) = slot.callback.as_mut() {
                callback(event);
            }
        }
    }

    pub fn len(&self) -> usize {
        self.slots.iter().filter(|s| s.callback.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<E> Default for Listeners<E> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn emit_reaches_every_subscriber() {
        let mut listeners: Listeners<u32> = Listeners::new();
        let seen = Rc::new(RefCell::new(Vec::new()));

        let a = seen.clone();
        listeners.subscribe(move |v| a.borrow_mut().push(*v));
        let b = seen.clone();
        listeners.subscribe(move |v| b.borrow_mut().push(*v * 10));

        listeners.emit(&7);
        assert_eq!(*seen.borrow(), vec![7, 70]);
    }

    #[test]
    fn unsubscribe_detaches_and_reports_stale_handles() {
        let mut listeners: Listeners<u32> = Listeners::new();
        let seen = Rc::new(RefCell::new(0u32));

        let s = seen.clone();
        let handle = listeners.subscribe(move |v| *s.borrow_mut() += *v);

        assert!(listeners.unsubscribe(handle));
        assert!(!listeners.unsubscribe(handle));
        listeners.emit(&5);
        assert_eq!(*seen.borrow(), 0);
    }

    #[test]
    fn stale_handle_cannot_detach_a_reused_slot() {
        let mut listeners: Listeners<u32> = Listeners::new();
        let first = listeners.subscribe(|_| {});
        listeners.unsubscribe(first);

        // Reuses the slot with a new generation.
        let second = listeners.subscribe(|_| {});
        assert!(!listeners.unsubscribe(first));
        assert_eq!(listeners.len(), 1);
        assert!(listeners.unsubscribe(second));
        assert!(listeners.is_empty());
    }
}
