/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

//! Background decoding of layout preview images.
//!
//! Requests go to a single worker thread; results come back over a channel and
//! are applied on the UI thread by [`PreviewLoader::poll`]. A result that lands
//! after [`PreviewLoader::cancel_pending`] still updates the cache but is not
//! reported for redraw, unless the name was requested again since.

use std::collections::BTreeMap;
use std::time::{Duration, Instant};

use crossbeam_channel::{Receiver, Sender, unbounded};
use image::GenericImageView;
use log::{debug, warn};

use crate::resources::PreviewSource;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PreviewStatus {
    Loading,
    Complete { width: u32, height: u32 },
    Failed,
}

impl PreviewStatus {
    pub fn is_loading(self) -> bool {
        matches!(self, Self::Loading)
    }
}

struct PreviewRequest {
    name: String,
    source: PreviewSource,
    generation: u64,
}

struct PreviewResult {
    name: String,
    generation: u64,
    status: PreviewStatus,
}

pub struct PreviewLoader {
    request_tx: Sender<PreviewRequest>,
    result_rx: Receiver<PreviewResult>,
    statuses: BTreeMap<String, PreviewStatus>,
    /// Names being decoded, tagged with the generation that last asked for them.
    in_flight: BTreeMap<String, u64>,
    generation: u64,
}

impl PreviewLoader {
    pub fn new() -> Self {
        let (request_tx, request_rx) = unbounded::<PreviewRequest>();
        let (result_tx, result_rx) = unbounded();
        std::thread::spawn(move || {
            for request in request_rx {
                let status = decode(&request.name, &request.source);
                let result = PreviewResult {
                    name: request.name,
                    generation: request.generation,
                    status,
                };
                if result_tx.send(result).is_err() {
                    break;
                }
            }
        });
        Self {
            request_tx,
            result_rx,
            statuses: BTreeMap::new(),
            in_flight: BTreeMap::new(),
            generation: 0,
        }
    }

    /// Queue `name` for decoding unless it is already known or in flight. A
    /// name still in flight is claimed by the current generation, so its
    /// result is reported even if it was requested before a cancel.
    pub fn request(&mut self, name: &str, source: &PreviewSource) -> PreviewStatus {
        if let Some(status) = self.statuses.get(name) {
            if let Some(tag) = self.in_flight.get_mut(name) {
                *tag = self.generation;
            }
            return *status;
        }
        let request = PreviewRequest {
            name: name.to_string(),
            source: source.clone(),
            generation: self.generation,
        };
        if self.request_tx.send(request).is_err() {
            warn!("Preview worker is gone; {name} will render without a preview");
            self.statuses.insert(name.to_string(), PreviewStatus::Failed);
            return PreviewStatus::Failed;
        }
        self.in_flight.insert(name.to_string(), self.generation);
        self.statuses.insert(name.to_string(), PreviewStatus::Loading);
        PreviewStatus::Loading
    }

    pub fn status(&self, name: &str) -> Option<PreviewStatus> {
        self.statuses.get(name).copied()
    }

    pub fn is_loading(&self) -> bool {
        !self.in_flight.is_empty()
    }

    /// Results arriving after this call are cached silently.
    pub fn cancel_pending(&mut self) {
        self.generation += 1;
    }

    /// Apply finished decodes; returns the names that need a redraw.
    pub fn poll(&mut self) -> Vec<String> {
        let mut redraw = Vec::new();
        while let Ok(result) = self.result_rx.try_recv() {
            self.apply(result, &mut redraw);
        }
        redraw
    }

    /// Block until nothing is in flight or `timeout` elapses.
    pub fn wait_idle(&mut self, timeout: Duration) -> Vec<String> {
        let deadline = Instant::now() + timeout;
        let mut redraw = Vec::new();
        while self.is_loading() {
            let remaining = deadline.saturating_duration_since(Instant::now());
            match self.result_rx.recv_timeout(remaining) {
                Ok(result) => self.apply(result, &mut redraw),
                Err(_) => break,
            }
        }
        redraw
    }

    fn apply(&mut self, result: PreviewResult, redraw: &mut Vec<String>) {
        let tag = self.in_flight.remove(&result.name).unwrap_or(result.generation);
        self.statuses.insert(result.name.clone(), result.status);
        if tag == self.generation {
            redraw.push(result.name);
        } else {
            debug!("Dropping redraw for cancelled preview {}", result.name);
        }
    }
}

impl Default for PreviewLoader {
    fn default() -> Self {
        Self::new()
    }
}

fn decode(name: &str, source: &PreviewSource) -> PreviewStatus {
    let bytes = match source {
        PreviewSource::Bytes(bytes) => bytes.to_vec(),
        PreviewSource::File(path) => match std::fs::read(path) {
            Ok(bytes) => bytes,
            Err(error) => {
                warn!("Could not read preview for {name} at {}: {error}", path.display());
                return PreviewStatus::Failed;
            }
        },
    };
    match image::load_from_memory(&bytes) {
        Ok(image) => {
            let (width, height) = image.dimensions();
            PreviewStatus::Complete { width, height }
        }
        Err(error) => {
            warn!("Could not decode preview for {name}: {error}");
            PreviewStatus::Failed
        }
    }
}

#[cfg(test)]
pub(crate) fn encode_test_png(width: u32, height: u32) -> Vec<u8> {
    let image = image::RgbaImage::new(width, height);
    let mut cursor = std::io::Cursor::new(Vec::new());
    image::DynamicImage::ImageRgba8(image)
        .write_to(&mut cursor, image::ImageFormat::Png)
        .unwrap();
    cursor.into_inner()
}
