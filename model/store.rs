/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

//! Owner of the live navigation model.
//!
//! Every mutation goes through [`ModelStore::edit`], which snapshots the model
//! for undo and broadcasts a [`ModelEvent`] to each subscriber. Subscribers
//! drain their receiver on the UI thread and re-query the model; nothing they
//! cached before the event is valid afterwards.

use std::path::Path;

use crossbeam_channel::{Receiver, Sender, unbounded};
use log::debug;

use super::{ModelError, NavModel};

const MAX_UNDO_DEPTH: usize = 128;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeType {
    Edit,
    Add,
    Delete,
    Undo,
    Redo,
    Reload,
}

/// Notification sent after the model changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModelEvent {
    /// Monotonic counter; reads are consistent within one epoch.
    pub epoch: u64,
    pub change: ChangeType,
}

pub struct ModelStore {
    model: NavModel,
    file_name: String,
    undo_stack: Vec<NavModel>,
    redo_stack: Vec<NavModel>,
    subscribers: Vec<Sender<ModelEvent>>,
    epoch: u64,
}

impl ModelStore {
    pub fn new(model: NavModel, file_name: impl Into<String>) -> Self {
        Self {
            model,
            file_name: file_name.into(),
            undo_stack: Vec::new(),
            redo_stack: Vec::new(),
            subscribers: Vec::new(),
            epoch: 0,
        }
    }

    pub fn open(path: &Path) -> Result<Self, ModelError> {
        let text = std::fs::read_to_string(path).map_err(|e| ModelError::Io(e.to_string()))?;
        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        Ok(Self::new(NavModel::parse(&text)?, file_name))
    }

    pub fn save(&self, path: &Path) -> Result<(), ModelError> {
        std::fs::write(path, self.model.to_xml()?).map_err(|e| ModelError::Io(e.to_string()))
    }

    pub fn model(&self) -> &NavModel {
        &self.model
    }

    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    /// Register a listener. Disconnected receivers are pruned on the next event.
    pub fn subscribe(&mut self) -> Receiver<ModelEvent> {
        let (tx, rx) = unbounded();
        self.subscribers.push(tx);
        rx
    }

    /// Apply a mutation as one undoable step.
    pub fn edit<R>(&mut self, change: ChangeType, mutate: impl FnOnce(&mut NavModel) -> R) -> R {
        self.undo_stack.push(self.model.clone());
        if self.undo_stack.len() > MAX_UNDO_DEPTH {
            self.undo_stack.remove(0);
        }
        self.redo_stack.clear();
        let result = mutate(&mut self.model);
        self.notify(change);
        result
    }

    /// Swap in a model edited outside the store (e.g. the file changed on disk).
    /// History is dropped because it no longer describes this document.
    pub fn replace(&mut self, model: NavModel) {
        self.model = model;
        self.undo_stack.clear();
        self.redo_stack.clear();
        self.notify(ChangeType::Reload);
    }

    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    pub fn undo(&mut self) -> bool {
        let Some(previous) = self.undo_stack.pop() else {
            return false;
        };
        let current = std::mem::replace(&mut self.model, previous);
        self.redo_stack.push(current);
        self.notify(ChangeType::Undo);
        true
    }

    pub fn redo(&mut self) -> bool {
        let Some(next) = self.redo_stack.pop() else {
            return false;
        };
        let current = std::mem::replace(&mut self.model, next);
        self.undo_stack.push(current);
        self.notify(ChangeType::Redo);
        true
    }

    fn notify(&mut self, change: ChangeType) {
        self.epoch += 1;
        let event = ModelEvent {
            epoch: self.epoch,
            change,
        };
        debug!("model {} changed: {:?}", self.file_name, event);
        self.subscribers.retain(|tx| tx.send(event).is_ok());
    }
}
