/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

//! User-placed positions, persisted per graph file.
//!
//! Positions are keyed by file name, then by the path of nested navigation
//! ids down to the focused graph, then by destination id. They are stored
//! without the normalization offset, so moving one destination never shifts
//! the stored positions of the others.

use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;

use log::{debug, warn};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

use super::{GridLayoutAlgorithm, LayoutAlgorithm, normalize};
use crate::scene::{Scene, SceneComponent};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

/// Positions for one navigation and, recursively, its nested navigations.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayoutPositions {
    #[serde(default)]
    pub positions: BTreeMap<String, Position>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub nested: BTreeMap<String, LayoutPositions>,
}

impl LayoutPositions {
    fn at(&self, path: &[String]) -> Option<&LayoutPositions> {
        path.iter().try_fold(self, |positions, id| positions.nested.get(id))
    }

    fn at_path_mut(&mut self, path: &[String]) -> Option<&mut LayoutPositions> {
        path.iter()
            .try_fold(self, |positions, id| positions.nested.get_mut(id))
    }

    fn at_mut(&mut self, path: &[String]) -> &mut LayoutPositions {
        path.iter()
            .fold(self, |positions, id| positions.nested.entry(id.clone()).or_default())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManualPositions {
    files: BTreeMap<String, LayoutPositions>,
}

/// Process-wide position map, mutated only from the UI thread.
pub type SharedPositions = Arc<RwLock<ManualPositions>>;

impl ManualPositions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn shared(self) -> SharedPositions {
        Arc::new(RwLock::new(self))
    }

    pub fn get(&self, file: &str, path: &[String], id: &str) -> Option<Position> {
        self.files
            .get(file)?
            .at(path)?
            .positions
            .get(id)
            .copied()
    }

    pub fn set(&mut self, file: &str, path: &[String], id: &str, position: Position) {
        self.files
            .entry(file.to_string())
            .or_default()
            .at_mut(path)
            .positions
            .insert(id.to_string(), position);
    }

    pub fn remove(&mut self, file: &str, path: &[String], id: &str) -> Option<Position> {
        self.files.get_mut(file)?.at_path_mut(path)?.positions.remove(id)
    }

    /// Move the entries stored under `old` to `new`, including the positions
    /// nested under a renamed navigation.
    pub fn rename(&mut self, file: &str, path: &[String], old: &str, new: &str) {
        let Some(positions) = self.files.get_mut(file).and_then(|layout| layout.at_path_mut(path))
        else {
            return;
        };
        if let Some(position) = positions.positions.remove(old) {
            positions.positions.insert(new.to_string(), position);
        }
        if let Some(nested) = positions.nested.remove(old) {
            positions.nested.insert(new.to_string(), nested);
        }
    }

    pub fn to_json(&self) -> Result<String, PositionsError> {
        serde_json::to_string_pretty(self).map_err(|e| PositionsError::Json(e.to_string()))
    }

    pub fn from_json(text: &str) -> Result<Self, PositionsError> {
        serde_json::from_str(text).map_err(|e| PositionsError::Json(e.to_string()))
    }

    /// Missing files load as an empty map.
    pub fn load(path: &Path) -> Result<Self, PositionsError> {
        match std::fs::read_to_string(path) {
            Ok(text) => Self::from_json(&text),
            Err(error) if error.kind() == std::io::ErrorKind::NotFound => Ok(Self::new()),
            Err(error) => Err(PositionsError::Io(error.to_string())),
        }
    }

    pub fn save(&self, path: &Path) -> Result<(), PositionsError> {
        std::fs::write(path, self.to_json()?).map_err(|e| PositionsError::Io(e.to_string()))
    }
}

#[derive(Debug)]
pub enum PositionsError {
    Io(String),
    Json(String),
}

impl std::fmt::Display for PositionsError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PositionsError::Io(e) => write!(f, "IO error: {e}"),
            PositionsError::Json(e) => write!(f, "JSON error: {e}"),
        }
    }
}

impl std::error::Error for PositionsError {}

/// Stored positions first, grid placement for everything else.
pub struct ManualLayoutAlgorithm {
    file: String,
    positions: SharedPositions,
    fallback: GridLayoutAlgorithm,
}

impl ManualLayoutAlgorithm {
    pub fn new(file: impl Into<String>, positions: SharedPositions, fallback: GridLayoutAlgorithm) -> Self {
        Self {
            file: file.into(),
            positions,
            fallback,
        }
    }

    pub fn file(&self) -> &str {
        &self.file
    }

    pub fn positions(&self) -> &SharedPositions {
        &self.positions
    }

    /// Store where `component` currently is. Components without an id cannot
    /// be keyed and are ignored.
    pub fn save(&self, scene: &Scene, component: &SceneComponent) -> bool {
        let Some(id) = component.id() else {
            debug!("Ignoring position save for a destination without an id");
            return false;
        };
        let stored = component.position() - scene.layout_offset();
        self.positions.write().set(
            &self.file,
            scene.navigation_path(),
            id,
            Position {
                x: stored.x,
                y: stored.y,
            },
        );
        true
    }

    /// Move what is stored for `old` under the navigation at `path` to `new`.
    pub fn rename(&self, path: &[String], old: &str, new: &str) {
        self.positions.write().rename(&self.file, path, old, new);
    }

    pub fn persist(&self, path: &Path) -> Result<(), PositionsError> {
        let result = self.positions.read().save(path);
        if let Err(error) = &result {
            warn!("Could not save destination positions to {}: {error}", path.display());
        }
        result
    }
}

impl LayoutAlgorithm for ManualLayoutAlgorithm {
    fn layout(&mut self, scene: &mut Scene) {
        scene.reset_layout_offset();
        let path = scene.navigation_path().to_vec();
        let mut placed = vec![false; scene.components().len()];
        {
            let stored = self.positions.read();
            for (component, placed) in scene.components_mut().iter_mut().zip(placed.iter_mut()) {
                let Some(position) = component
                    .id()
                    .and_then(|id| stored.get(&self.file, &path, id))
                else {
                    continue;
                };
                component.set_position(position.x, position.y);
                *placed = true;
            }
        }
        self.fallback.place(scene, &placed);
        normalize(scene, self.fallback.padding);
    }
}
