/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

//! Lookup of the project resources a navigation graph refers to.
//!
//! `@layout/` references resolve to preview images and `@navigation/`
//! references resolve to the root of another graph file. A reference that does
//! not resolve is reported as `None` and the scene simply draws less.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use log::warn;

use crate::model::schema::{ANDROID_URI, ATTR_ID, ATTR_LABEL, TAG_NAVIGATION, strip_id_prefix};

const LAYOUT_DIR: &str = "layout";
const NAVIGATION_DIR: &str = "navigation";
const PREVIEW_EXTENSION: &str = "png";
const NAVIGATION_EXTENSION: &str = "xml";

/// Where the encoded preview of a layout lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PreviewSource {
    Bytes(Arc<[u8]>),
    File(PathBuf),
}

/// Root of an included navigation graph.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IncludedGraph {
    pub id: String,
    pub label: Option<String>,
}

pub trait ResourceResolver {
    /// Preview image for the layout resource `name`, if the layout exists.
    fn layout_preview(&self, name: &str) -> Option<PreviewSource>;

    /// Root id and label of the navigation resource `name`.
    fn navigation_graph(&self, name: &str) -> Option<IncludedGraph>;

    /// Navigation graph file names offered as include sources, sorted.
    fn navigation_sources(&self) -> Vec<String>;
}

#[derive(Debug, Clone, Default)]
pub struct InMemoryResources {
    layouts: BTreeMap<String, Arc<[u8]>>,
    graphs: BTreeMap<String, IncludedGraph>,
}

impl InMemoryResources {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_layout(mut self, name: &str, png_bytes: impl Into<Arc<[u8]>>) -> Self {
        self.layouts.insert(name.to_string(), png_bytes.into());
        self
    }

    pub fn with_graph(mut self, name: &str, id: &str, label: Option<&str>) -> Self {
        self.graphs.insert(
            name.to_string(),
            IncludedGraph {
                id: id.to_string(),
                label: label.map(str::to_string),
            },
        );
        self
    }
}

impl ResourceResolver for InMemoryResources {
    fn layout_preview(&self, name: &str) -> Option<PreviewSource> {
        self.layouts.get(name).cloned().map(PreviewSource::Bytes)
    }

    fn navigation_graph(&self, name: &str) -> Option<IncludedGraph> {
        self.graphs.get(name).cloned()
    }

    fn navigation_sources(&self) -> Vec<String> {
        self.graphs
            .keys()
            .map(|name| format!("{name}.{NAVIGATION_EXTENSION}"))
            .collect()
    }
}

/// Resource tree on disk laid out as `layout/<name>.png` and
/// `navigation/<name>.xml`.
#[derive(Debug, Clone)]
pub struct ResourceDirectory {
    root: PathBuf,
}

impl ResourceDirectory {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn resource_path(&self, dir: &str, name: &str, extension: &str) -> PathBuf {
        self.root.join(dir).join(format!("{name}.{extension}"))
    }
}

impl ResourceResolver for ResourceDirectory {
    fn layout_preview(&self, name: &str) -> Option<PreviewSource> {
        let path = self.resource_path(LAYOUT_DIR, name, PREVIEW_EXTENSION);
        path.is_file().then_some(PreviewSource::File(path))
    }

    fn navigation_graph(&self, name: &str) -> Option<IncludedGraph> {
        let path = self.resource_path(NAVIGATION_DIR, name, NAVIGATION_EXTENSION);
        let text = std::fs::read_to_string(&path).ok()?;
        match read_graph_root(&text) {
            Ok(graph) => graph,
            Err(error) => {
                warn!("Could not read navigation graph {}: {error}", path.display());
                None
            }
        }
    }

    fn navigation_sources(&self) -> Vec<String> {
        let Ok(entries) = std::fs::read_dir(self.root.join(NAVIGATION_DIR)) else {
            return Vec::new();
        };
        let mut names: Vec<String> = entries
            .filter_map(Result::ok)
            .map(|entry| entry.path())
            .filter(|path| {
                path.extension()
                    .is_some_and(|extension| extension == NAVIGATION_EXTENSION)
            })
            .filter_map(|path| path.file_name().map(|name| name.to_string_lossy().into_owned()))
            .collect();
        names.sort();
        names
    }
}

/// Reads only the root element; the rest of the included file is irrelevant here.
fn read_graph_root(text: &str) -> Result<Option<IncludedGraph>, roxmltree::Error> {
    let document = roxmltree::Document::parse(text)?;
    let root = document.root_element();
    if root.tag_name().name() != TAG_NAVIGATION {
        return Ok(None);
    }
    Ok(root
        .attribute((ANDROID_URI, ATTR_ID))
        .map(strip_id_prefix)
        .filter(|id| !id.is_empty())
        .map(|id| IncludedGraph {
            id: id.to_string(),
            label: root.attribute((ANDROID_URI, ATTR_LABEL)).map(str::to_string),
        }))
}
