//! `fragmark`, an annotation engine for audio fragments.
//!
//! This crate provides:
//! - A region store with a pending/saved lifecycle and overlap-aware lookups
//! - A persistence client for the fragment backend (save, list, fetch-one)
//! - Tiered text matching that links saved regions to spans of a transcript
//! - Bounded region playback and zoom control over an abstract waveform surface
//! - A session object tying it all together behind commands and events
//!
//! The waveform renderer and the document view are collaborators, not
//! dependencies: hosts implement [`surface::RegionSurface`], pump
//! [`surface::AudioEvent`]s in, and observe [`events::EngineEvent`]s out.

// High-level API (most consumers should start here).
pub mod opts;
pub mod session;

// The region data model and its authoritative store.
pub mod region;
pub mod store;

// Recovering full region data from partial save-completion information.
pub mod matcher;

// The fragment persistence service client.
pub mod persistence;

// Linking region text to the accompanying document.
pub mod highlight;

// Transport, zoom, and the collaborator traits they drive.
pub mod playback;
pub mod surface;
pub mod zoom;

// The interaction layer and the engine's outbound notifications.
pub mod command;
pub mod events;

// Time display helpers.
pub mod timefmt;

// Errors.
pub mod error;

// Logging configuration and control.
#[cfg(feature = "logging")]
pub mod logging;

pub use error::{Error, Result};
pub use persistence::{FragmentService, HttpFragmentService};
pub use region::{Region, RegionId};
pub use session::Session;
