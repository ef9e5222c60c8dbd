/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

//! Read/write view over a navigation graph document.
//!
//! Core structures:
//! - `NavModel`: arena-backed component tree (root `<navigation>` plus children)
//! - `NavComponent`: one XML element with namespaced attributes
//! - `ModelStore`: owner of the live model, undo/redo history and change events
//!
//! Reads never fail: a missing component or attribute is reported as `None`.

use crate::model::schema::{ANDROID_URI, ATTR_ID, DestinationKind, NEW_ID_PREFIX, strip_id_prefix};

pub mod builder;
pub mod schema;
pub mod store;
mod xml;

pub use store::{ChangeType, ModelEvent, ModelStore};
pub use xml::ModelError;

/// Stable handle to a component in a [`NavModel`].
///
/// Keys survive unrelated removals and are preserved by model snapshots, so a
/// restored snapshot hands out the same keys it had before. The key of a
/// removed component may be reused by a later insertion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ComponentKey(usize);

impl ComponentKey {
    pub fn index(self) -> usize {
        self.0
    }
}

/// Namespaced attribute name. `namespace` is the full URI.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AttributeName {
    pub namespace: Option<String>,
    pub name: String,
}

impl AttributeName {
    pub fn new(namespace: Option<&str>, name: &str) -> Self {
        Self {
            namespace: namespace.map(str::to_string),
            name: name.to_string(),
        }
    }

    fn matches(&self, namespace: Option<&str>, name: &str) -> bool {
        self.namespace.as_deref() == namespace && self.name == name
    }
}

/// One element of the navigation document.
#[derive(Debug, Clone, PartialEq)]
pub struct NavComponent {
    tag: String,
    attributes: Vec<(AttributeName, String)>,
    parent: Option<ComponentKey>,
    children: Vec<ComponentKey>,
}

impl NavComponent {
    fn new(tag: &str, parent: Option<ComponentKey>) -> Self {
        Self {
            tag: tag.to_string(),
            attributes: Vec::new(),
            parent,
            children: Vec::new(),
        }
    }

    pub fn tag(&self) -> &str {
        &self.tag
    }

    pub fn parent(&self) -> Option<ComponentKey> {
        self.parent
    }

    pub fn children(&self) -> &[ComponentKey] {
        &self.children
    }

    /// Attributes in document order.
    pub fn attributes(&self) -> impl Iterator<Item = (&AttributeName, &str)> {
        self.attributes.iter().map(|(name, value)| (name, value.as_str()))
    }

    pub fn attribute(&self, namespace: Option<&str>, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(attr, _)| attr.matches(namespace, name))
            .map(|(_, value)| value.as_str())
    }

    fn set_attribute(&mut self, namespace: Option<&str>, name: &str, value: String) {
        if let Some((_, existing)) = self
            .attributes
            .iter_mut()
            .find(|(attr, _)| attr.matches(namespace, name))
        {
            *existing = value;
        } else {
            self.attributes.push((AttributeName::new(namespace, name), value));
        }
    }
}

/// Navigation document as a component tree.
#[derive(Debug, Clone, PartialEq)]
pub struct NavModel {
    slots: Vec<Option<NavComponent>>,
    /// Vacated slots, reused by the next insertion.
    free: Vec<usize>,
    root: ComponentKey,
    /// Extra `(prefix, uri)` declarations read from the source document.
    namespaces: Vec<(String, String)>,
}

impl NavModel {
    /// Create a model holding an empty root `<navigation>`.
    pub fn new() -> Self {
        Self {
            slots: vec![Some(NavComponent::new(schema::TAG_NAVIGATION, None))],
            free: Vec::new(),
            root: ComponentKey(0),
            namespaces: Vec::new(),
        }
    }

    /// Parse a navigation XML document.
    pub fn parse(text: &str) -> Result<Self, ModelError> {
        xml::parse(text)
    }

    /// Serialize back to XML with `android`/`app`/`tools` prefixes. Other
    /// namespaces keep the prefix they were read with.
    pub fn to_xml(&self) -> Result<String, ModelError> {
        xml::write(self)
    }

    /// Records a prefix for a namespace outside the android/app/tools trio.
    /// A prefix or uri that is already bound is left alone.
    pub fn declare_namespace(&mut self, prefix: &str, uri: &str) -> bool {
        let reserved = [ANDROID_URI, schema::AUTO_URI, schema::TOOLS_URI]
            .into_iter()
            .any(|known| uri == known || schema::namespace_prefix(known) == Some(prefix));
        let bound = self
            .namespaces
            .iter()
            .any(|(declared_prefix, declared_uri)| declared_prefix == prefix || declared_uri == uri);
        if reserved || bound || prefix.is_empty() {
            return false;
        }
        self.namespaces.push((prefix.to_string(), uri.to_string()));
        true
    }

    /// Namespace declarations recorded by [`declare_namespace`](Self::declare_namespace).
    pub fn namespaces(&self) -> impl Iterator<Item = (&str, &str)> {
        self.namespaces
            .iter()
            .map(|(prefix, uri)| (prefix.as_str(), uri.as_str()))
    }

    pub fn root(&self) -> ComponentKey {
        self.root
    }

    pub fn component(&self, key: ComponentKey) -> Option<&NavComponent> {
        self.slots.get(key.0).and_then(Option::as_ref)
    }

    fn component_mut(&mut self, key: ComponentKey) -> Option<&mut NavComponent> {
        self.slots.get_mut(key.0).and_then(Option::as_mut)
    }

    pub fn contains(&self, key: ComponentKey) -> bool {
        self.component(key).is_some()
    }

    pub fn tag_of(&self, key: ComponentKey) -> Option<&str> {
        self.component(key).map(NavComponent::tag)
    }

    pub fn destination_kind(&self, key: ComponentKey) -> Option<DestinationKind> {
        self.tag_of(key).and_then(DestinationKind::from_tag)
    }

    pub fn parent_of(&self, key: ComponentKey) -> Option<ComponentKey> {
        self.component(key).and_then(NavComponent::parent)
    }

    pub fn children_of(&self, key: ComponentKey) -> &[ComponentKey] {
        self.component(key).map(NavComponent::children).unwrap_or(&[])
    }

    pub fn attribute(&self, key: ComponentKey, namespace: Option<&str>, name: &str) -> Option<&str> {
        self.component(key)?.attribute(namespace, name)
    }

    /// Sets an attribute; returns `false` when `key` is not in the model.
    pub fn set_attribute(
        &mut self,
        key: ComponentKey,
        namespace: Option<&str>,
        name: &str,
        value: impl Into<String>,
    ) -> bool {
        match self.component_mut(key) {
            Some(component) => {
                component.set_attribute(namespace, name, value.into());
                true
            }
            None => false,
        }
    }

    pub fn remove_attribute(&mut self, key: ComponentKey, namespace: Option<&str>, name: &str) -> bool {
        let Some(component) = self.component_mut(key) else {
            return false;
        };
        let before = component.attributes.len();
        component.attributes.retain(|(attr, _)| !attr.matches(namespace, name));
        component.attributes.len() != before
    }

    /// The `android:id` of `key` without its `@+id/` prefix.
    pub fn id_of(&self, key: ComponentKey) -> Option<&str> {
        self.attribute(key, Some(ANDROID_URI), ATTR_ID)
            .map(strip_id_prefix)
            .filter(|id| !id.is_empty())
    }

    pub fn assign_id(&mut self, key: ComponentKey, id: &str) -> bool {
        self.set_attribute(key, Some(ANDROID_URI), ATTR_ID, format!("{NEW_ID_PREFIX}{id}"))
    }

    /// Component carrying `id` anywhere in the document. When an id is
    /// declared more than once the last declaration in document order wins.
    pub fn find(&self, id: &str) -> Option<ComponentKey> {
        std::iter::once(self.root)
            .chain(self.descendants(self.root))
            .filter(|key| self.id_of(*key) == Some(id))
            .last()
    }

    /// Like [`find`](Self::find) but restricted to the direct children of `container`.
    pub fn find_child(&self, container: ComponentKey, id: &str) -> Option<ComponentKey> {
        self.children_of(container)
            .iter()
            .copied()
            .filter(|key| self.id_of(*key) == Some(id))
            .last()
    }

    /// Ids declared by the direct children of `container`, in document order.
    pub fn ids_in(&self, container: ComponentKey) -> Vec<&str> {
        self.children_of(container)
            .iter()
            .filter_map(|key| self.id_of(*key))
            .collect()
    }

    /// All descendants of `key` in document (pre-)order, excluding `key`.
    pub fn descendants(&self, key: ComponentKey) -> Vec<ComponentKey> {
        let mut out = Vec::new();
        let mut stack: Vec<ComponentKey> = self.children_of(key).iter().rev().copied().collect();
        while let Some(next) = stack.pop() {
            out.push(next);
            stack.extend(self.children_of(next).iter().rev().copied());
        }
        out
    }

    pub fn add_child(&mut self, parent: ComponentKey, tag: &str) -> Option<ComponentKey> {
        let index = self.children_of(parent).len();
        self.insert_child(parent, index, tag)
    }

    /// Inserts a new empty element under `parent` at `index` (clamped).
    pub fn insert_child(&mut self, parent: ComponentKey, index: usize, tag: &str) -> Option<ComponentKey> {
        if !self.contains(parent) {
            return None;
        }
        let component = Some(NavComponent::new(tag, Some(parent)));
        let key = match self.free.pop() {
            Some(index) => {
                self.slots[index] = component;
                ComponentKey(index)
            }
            None => {
                self.slots.push(component);
                ComponentKey(self.slots.len() - 1)
            }
        };
        let children = &mut self.component_mut(parent)?.children;
        let index = index.min(children.len());
        children.insert(index, key);
        Some(key)
    }

    /// Removes `key` and its subtree. The root cannot be removed. Vacated
    /// slots are handed out again by later insertions.
    pub fn remove(&mut self, key: ComponentKey) -> bool {
        if key == self.root || !self.contains(key) {
            return false;
        }
        let doomed: Vec<ComponentKey> = std::iter::once(key).chain(self.descendants(key)).collect();
        if let Some(parent) = self.parent_of(key).and_then(|parent| self.component_mut(parent)) {
            parent.children.retain(|child| *child != key);
        }
        for key in doomed {
            self.slots[key.0] = None;
            self.free.push(key.0);
        }
        true
    }
}

impl Default for NavModel {
    fn default() -> Self {
        Self::new()
    }
}
