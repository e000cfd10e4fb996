//! Client for the fragment persistence service.
//!
//! The backend is an opaque HTTP service with a fixed contract:
//! - `POST /save_region` with `{audio_filename, start, end, comment}`
//! - `GET /get_saved_regions?audio_filename=<name>`
//! - `GET /get_fragment_data?filename=<name>`
//!
//! Every response carries a `success` flag; `success: false` plus an `error`
//! string maps to [`Error::Service`] so callers can leave local state untouched
//! and surface the message.
//!
//! The trait exists so the session and matcher can run against an in-memory
//! double in tests; [`HttpFragmentService`] is the real implementation.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Error, Result};

/// Body of `POST /save_region`.
#[derive(Debug, Clone, Serialize)]
pub struct SaveRegionRequest {
    pub audio_filename: String,
    pub start: f64,
    pub end: f64,
    pub comment: String,
}

/// A successful save: the server-assigned fragment filename.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SavedFragment {
    pub filename: String,
}

/// One entry from the `/get_saved_regions` listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavedRegionRecord {
    pub start: f64,
    pub end: f64,
    #[serde(default)]
    pub comment: String,
    pub filename: String,
}

/// Payload of `/get_fragment_data` for a single fragment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FragmentData {
    pub start_time: f64,
    pub end_time: f64,
    pub duration: f64,
    #[serde(default)]
    pub selected_text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct SaveEnvelope {
    success: bool,
    filename: Option<String>,
    error: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ListEnvelope {
    success: bool,
    #[serde(default)]
    regions: Vec<SavedRegionRecord>,
    error: Option<String>,
}

#[derive(Debug, Deserialize)]
struct FragmentEnvelope {
    success: bool,
    fragment: Option<FragmentData>,
    error: Option<String>,
}

/// The persistence operations the engine needs.
pub trait FragmentService {
    fn save_region(&self, request: &SaveRegionRequest) -> Result<SavedFragment>;
    fn saved_regions(&self, audio_filename: &str) -> Result<Vec<SavedRegionRecord>>;
    fn fragment_data(&self, filename: &str) -> Result<FragmentData>;
}

/// `FragmentService` over HTTP, blocking.
///
/// The engine is single-threaded and event-driven; a blocking client keeps the
/// suspension points (save, fetch) explicit without dragging in a runtime.
pub struct HttpFragmentService {
    base_url: String,
    client: reqwest::blocking::Client,
}

impl HttpFragmentService {
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        let base_url = base_url.into().trim_end_matches('/').to_owned();
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()?;
        Ok(Self { base_url, client })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

impl FragmentService for HttpFragmentService {
    fn save_region(&self, request: &SaveRegionRequest) -> Result<SavedFragment> {
        debug!(
            audio = %request.audio_filename,
            start = request.start,
            end = request.end,
            "saving region"
        );
        let envelope: SaveEnvelope = self
            .client
            .post(self.url("/save_region"))
            .json(request)
            .send()?
            .error_for_status()?
            .json()?;

        match (envelope.success, envelope.filename) {
            (true, Some(filename)) => Ok(SavedFragment { filename }),
            _ => Err(service_error("/save_region", envelope.error)),
        }
    }

    fn saved_regions(&self, audio_filename: &str) -> Result<Vec<SavedRegionRecord>> {
        let envelope: ListEnvelope = self
            .client
            .get(self.url("/get_saved_regions"))
            .query(&[("audio_filename", audio_filename)])
            .send()?
            .error_for_status()?
            .json()?;

        if envelope.success {
            Ok(envelope.regions)
        } else {
            Err(service_error("/get_saved_regions", envelope.error))
        }
    }

    fn fragment_data(&self, filename: &str) -> Result<FragmentData> {
        let envelope: FragmentEnvelope = self
            .client
            .get(self.url("/get_fragment_data"))
            .query(&[("filename", filename)])
            .send()?
            .error_for_status()?
            .json()?;

        match (envelope.success, envelope.fragment) {
            (true, Some(fragment)) => Ok(fragment),
            _ => Err(service_error("/get_fragment_data", envelope.error)),
        }
    }
}

fn service_error(endpoint: &'static str, message: Option<String>) -> Error {
    Error::Service {
        endpoint,
        message: message.unwrap_or_else(|| "malformed response".to_owned()),
    }
}
