/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

//! State of the "new destination" dialog.
//!
//! The dialog offers four kinds. Fragments, activities and nested graphs take
//! an id and a label; includes only take a source graph file. Committing a
//! valid dialog yields a [`NewDestination`] for the editor to insert.

use std::collections::BTreeSet;
use std::path::Path;

use crate::model::builder::ComponentDescriptor;
use crate::model::schema::DestinationKind;
use crate::model::{ComponentKey, NavModel};
use crate::preview::{PreviewLoader, PreviewStatus};
use crate::resources::PreviewSource;

/// Kinds offered by the dialog, in display order.
pub const KIND_OPTIONS: [DestinationKind; 4] = [
    DestinationKind::Fragment,
    DestinationKind::Activity,
    DestinationKind::Navigation,
    DestinationKind::Include,
];

pub fn kind_display_name(kind: DestinationKind) -> &'static str {
    match kind {
        DestinationKind::Fragment => "Fragment",
        DestinationKind::Activity => "Activity",
        DestinationKind::Navigation => "Nested Graph",
        DestinationKind::Include => "Include Graph",
    }
}

/// Destination the editor will insert into the focused navigation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewDestination {
    pub tag: String,
    pub id: Option<String>,
    pub label: Option<String>,
    pub class_name: Option<String>,
    pub layout: Option<String>,
    /// Navigation resource name for includes.
    pub graph: Option<String>,
}

impl NewDestination {
    pub fn descriptor(&self) -> ComponentDescriptor {
        let mut descriptor = ComponentDescriptor::new(&self.tag);
        if let Some(id) = &self.id {
            descriptor = descriptor.id(id);
        }
        if let Some(label) = &self.label {
            descriptor = descriptor.label(label);
        }
        if let Some(class_name) = &self.class_name {
            descriptor = descriptor.name(class_name);
        }
        if let Some(layout) = &self.layout {
            descriptor = descriptor.layout(layout);
        }
        if let Some(graph) = &self.graph {
            descriptor = descriptor.graph(graph);
        }
        descriptor
    }

    pub fn insert(&self, model: &mut NavModel, navigation: ComponentKey) -> Option<ComponentKey> {
        self.descriptor().add_to(model, navigation)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Thumbnail {
    pub name: String,
    pub source: PreviewSource,
}

/// A ready-made destination offered next to the dialog, typically an
/// activity or fragment class found in the project.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaletteDestination {
    pub kind: DestinationKind,
    pub simple_name: String,
    pub qualified_name: String,
    pub layout: Option<String>,
    pub thumbnail: Option<Thumbnail>,
}

/// Spinner shown while palette thumbnails decode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadingOverlay {
    pending: BTreeSet<String>,
}

impl LoadingOverlay {
    pub fn is_loading(&self) -> bool {
        !self.pending.is_empty()
    }
}

#[derive(Debug, Clone)]
pub struct AddDestinationMenu {
    kind: DestinationKind,
    id: String,
    suggested_id: Option<String>,
    label: String,
    source: Option<String>,
    sources: Vec<String>,
    existing_ids: BTreeSet<String>,
    validation_error: Option<&'static str>,
    destinations: Vec<PaletteDestination>,
    loading: Option<LoadingOverlay>,
}

impl AddDestinationMenu {
    /// Open the dialog for `navigation`. Thumbnails not yet decoded are queued
    /// on `previews`; the loading overlay exists only if any are still pending.
    pub fn open(
        model: &NavModel,
        navigation: ComponentKey,
        sources: Vec<String>,
        destinations: Vec<PaletteDestination>,
        previews: &mut PreviewLoader,
    ) -> Self {
        let pending: BTreeSet<String> = destinations
            .iter()
            .filter_map(|destination| destination.thumbnail.as_ref())
            .filter(|thumbnail| previews.request(&thumbnail.name, &thumbnail.source).is_loading())
            .map(|thumbnail| thumbnail.name.clone())
            .collect();
        let mut menu = Self {
            kind: DestinationKind::Fragment,
            id: String::new(),
            suggested_id: None,
            label: String::new(),
            source: sources.first().cloned(),
            sources,
            existing_ids: ids_in_navigation(model, navigation),
            validation_error: None,
            destinations,
            loading: (!pending.is_empty()).then_some(LoadingOverlay { pending }),
        };
        menu.select_kind(DestinationKind::Fragment);
        menu
    }

    pub fn kind(&self) -> DestinationKind {
        self.kind
    }

    /// Switch kind. An id the user has not edited is replaced by a fresh
    /// suggestion for the new kind.
    pub fn select_kind(&mut self, kind: DestinationKind) {
        self.kind = kind;
        if self.id.is_empty() || self.suggested_id.as_deref() == Some(self.id.as_str()) {
            let suggestion = unique_id(&self.existing_ids, kind.tag());
            self.id = suggestion.clone();
            self.suggested_id = Some(suggestion);
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn set_id(&mut self, id: &str) {
        self.id = id.to_string();
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn set_label(&mut self, label: &str) {
        self.label = label.to_string();
    }

    pub fn sources(&self) -> &[String] {
        &self.sources
    }

    pub fn source(&self) -> Option<&str> {
        self.source.as_deref()
    }

    /// Only names listed in [`sources`](Self::sources) can be picked.
    pub fn select_source(&mut self, source: &str) -> bool {
        if !self.sources.iter().any(|candidate| candidate == source) {
            return false;
        }
        self.source = Some(source.to_string());
        true
    }

    pub fn is_id_visible(&self) -> bool {
        self.kind != DestinationKind::Include
    }

    pub fn is_label_visible(&self) -> bool {
        self.kind != DestinationKind::Include
    }

    pub fn is_source_visible(&self) -> bool {
        self.kind == DestinationKind::Include
    }

    pub fn validate(&mut self) -> bool {
        self.validation_error = if self.kind == DestinationKind::Include {
            self.source
                .as_deref()
                .is_none_or(str::is_empty)
                .then_some("Source must be set")
        } else if self.id.trim().is_empty() {
            Some("ID must be set")
        } else if self.label.trim().is_empty() {
            Some("Label must be set")
        } else {
            None
        };
        self.validation_error.is_none()
    }

    /// Message shown under the fields after a failed [`validate`](Self::validate).
    pub fn validation_message(&self) -> Option<&'static str> {
        self.validation_error
    }

    pub fn commit(&mut self) -> Option<NewDestination> {
        if !self.validate() {
            return None;
        }
        let destination = match self.kind {
            DestinationKind::Include => NewDestination {
                tag: self.kind.tag().to_string(),
                graph: self.source.as_deref().map(graph_name),
                ..NewDestination::default()
            },
            DestinationKind::Fragment | DestinationKind::Activity | DestinationKind::Navigation => {
                NewDestination {
                    tag: self.kind.tag().to_string(),
                    id: Some(self.id.trim().to_string()),
                    label: Some(self.label.clone()),
                    ..NewDestination::default()
                }
            }
        };
        Some(destination)
    }

    pub fn destinations(&self) -> &[PaletteDestination] {
        &self.destinations
    }

    pub fn loading_overlay(&self) -> Option<&LoadingOverlay> {
        self.loading.as_ref()
    }

    /// Clear thumbnails that finished decoding from the overlay.
    pub fn refresh(&mut self, previews: &PreviewLoader) {
        if let Some(overlay) = &mut self.loading {
            overlay
                .pending
                .retain(|name| previews.status(name).is_none_or(PreviewStatus::is_loading));
        }
    }
}

/// Destination for a palette entry, with an id derived from its class name.
pub fn palette_destination(
    model: &NavModel,
    navigation: ComponentKey,
    destination: &PaletteDestination,
) -> NewDestination {
    let existing = ids_in_navigation(model, navigation);
    NewDestination {
        tag: destination.kind.tag().to_string(),
        id: Some(unique_id(&existing, &lower_camel(&destination.simple_name))),
        class_name: Some(destination.qualified_name.clone()),
        layout: destination.layout.clone(),
        ..NewDestination::default()
    }
}

/// Every id declared inside `navigation`, whatever the tag.
pub fn ids_in_navigation(model: &NavModel, navigation: ComponentKey) -> BTreeSet<String> {
    std::iter::once(navigation)
        .chain(model.descendants(navigation))
        .filter_map(|key| model.id_of(key))
        .map(str::to_string)
        .collect()
}

/// `base`, or `base2`, `base3`, ... for the first one not in `existing`.
pub fn unique_id(existing: &BTreeSet<String>, base: &str) -> String {
    if !existing.contains(base) {
        return base.to_string();
    }
    (2..)
        .map(|n| format!("{base}{n}"))
        .find(|candidate| !existing.contains(candidate))
        .unwrap_or_else(|| base.to_string())
}

fn lower_camel(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_lowercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// `navigation.xml` -> `navigation`
fn graph_name(source: &str) -> String {
    Path::new(source)
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_else(|| source.to_string())
}
