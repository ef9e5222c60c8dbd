/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

//! In-memory mirror of the focused navigation, with geometry.
//!
//! Core structures:
//! - `Scene`: one `SceneComponent` per destination child of the focused
//!   `<navigation>`, in model order, plus selection and highlight by id
//! - `SceneComponent`: destination kind, labels, actions, deep-link count,
//!   preview and a position in dp
//!
//! The scene never holds its own history. After any model change it is
//! rebuilt with [`Scene::reconcile`]; components are reused by model key so
//! positions survive, and selection is kept by id.

use std::collections::{BTreeSet, HashMap};

use euclid::default::{Point2D, Rect, Size2D, Vector2D};
use log::{debug, error, warn};

use crate::model::schema::{
    ANDROID_URI, ATTR_DESTINATION, ATTR_GRAPH, ATTR_LABEL, ATTR_LAYOUT, ATTR_POP_UP_TO,
    ATTR_START_DESTINATION, AUTO_URI, DestinationKind, LAYOUT_RESOURCE_PREFIX,
    NAVIGATION_RESOURCE_PREFIX, TAG_ACTION, TAG_DEEP_LINK, TOOLS_URI, resource_name,
    strip_id_prefix,
};
use crate::model::{ComponentKey, NavModel};
use crate::resources::{PreviewSource, ResourceResolver};

pub mod layout;

pub type DpPoint = Point2D<i32>;
pub type DpSize = Size2D<i32>;
pub type DpRect = Rect<i32>;
pub type DpVector = Vector2D<i32>;

/// Fragments and activities render as phone-sized screens.
pub const FULL_SIZE: DpSize = Size2D::new(192, 320);
/// Nested graphs and includes render as a labelled box.
pub const COMPACT_SIZE: DpSize = Size2D::new(100, 25);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionStyle {
    Normal,
    SelfAction,
}

impl ActionStyle {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Normal => "NORMAL",
            Self::SelfAction => "SELF",
        }
    }
}

/// How the arrow ends. `Pop` marks actions that pop the back stack.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EndStyle {
    Normal,
    Pop,
}

impl EndStyle {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Normal => "NORMAL",
            Self::Pop => "POP",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SceneAction {
    pub id: Option<String>,
    /// Target destination id, resolved against the scene at draw time.
    pub target: String,
    pub style: ActionStyle,
    pub end: EndStyle,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PreviewState {
    Loading,
    Ready,
    Failed,
}

/// Preview of a destination whose layout resource exists.
#[derive(Debug, Clone, PartialEq)]
pub struct Preview {
    pub layout: String,
    pub source: PreviewSource,
    pub state: PreviewState,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SceneComponent {
    key: ComponentKey,
    kind: DestinationKind,
    id: Option<String>,
    screen_label: String,
    text: String,
    preview: Option<Preview>,
    actions: Vec<SceneAction>,
    deep_links: usize,
    position: DpPoint,
    selected: bool,
    highlighted: bool,
    start: bool,
}

impl SceneComponent {
    pub fn key(&self) -> ComponentKey {
        self.key
    }

    pub fn kind(&self) -> DestinationKind {
        self.kind
    }

    /// Scene id. For an include this is the root id of the included graph.
    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    /// Caption drawn above the destination.
    pub fn screen_label(&self) -> &str {
        &self.screen_label
    }

    /// Text drawn inside compact destinations.
    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn preview(&self) -> Option<&Preview> {
        self.preview.as_ref()
    }

    pub fn set_preview_state(&mut self, state: PreviewState) {
        if let Some(preview) = &mut self.preview {
            preview.state = state;
        }
    }

    pub fn actions(&self) -> &[SceneAction] {
        &self.actions
    }

    pub fn deep_link_count(&self) -> usize {
        self.deep_links
    }

    pub fn is_compact(&self) -> bool {
        self.kind.is_compact()
    }

    pub fn size(&self) -> DpSize {
        if self.is_compact() { COMPACT_SIZE } else { FULL_SIZE }
    }

    pub fn position(&self) -> DpPoint {
        self.position
    }

    pub fn set_position(&mut self, x: i32, y: i32) {
        self.position = Point2D::new(x, y);
    }

    pub fn rect(&self) -> DpRect {
        Rect::new(self.position, self.size())
    }

    pub fn is_selected(&self) -> bool {
        self.selected
    }

    pub fn is_highlighted(&self) -> bool {
        self.highlighted
    }

    pub fn is_start(&self) -> bool {
        self.start
    }
}

#[derive(Debug, Clone)]
pub struct Scene {
    navigation: ComponentKey,
    path: Vec<String>,
    components: Vec<SceneComponent>,
    selection: BTreeSet<String>,
    highlight: BTreeSet<String>,
    layout_offset: DpVector,
}

impl Scene {
    /// An empty scene focused on the model root. Call [`reconcile`](Self::reconcile) to populate it.
    pub fn new(model: &NavModel) -> Self {
        Self {
            navigation: model.root(),
            path: Vec::new(),
            components: Vec::new(),
            selection: BTreeSet::new(),
            highlight: BTreeSet::new(),
            layout_offset: Vector2D::zero(),
        }
    }

    pub fn build(model: &NavModel, resources: &dyn ResourceResolver) -> Self {
        let mut scene = Self::new(model);
        scene.reconcile(model, resources);
        scene
    }

    pub fn reconcile(&mut self, model: &NavModel, resources: &dyn ResourceResolver) {
        if model.destination_kind(self.navigation) != Some(DestinationKind::Navigation) {
            debug!("Focused navigation is gone; returning to the root graph");
            self.navigation = model.root();
        }
        self.path = navigation_path(model, self.navigation);

        let mut previous: HashMap<ComponentKey, SceneComponent> = self
            .components
            .drain(..)
            .map(|component| (component.key, component))
            .collect();
        for &key in model.children_of(self.navigation) {
            let Some(kind) = model.destination_kind(key) else {
                continue;
            };
            let mut component = describe(model, resources, key, kind);
            // A reused key may belong to a different element than before.
            if let Some(old) = previous.remove(&key).filter(|old| old.kind == kind) {
                component.position = old.position;
                if let (Some(preview), Some(old_preview)) = (&mut component.preview, &old.preview) {
                    if preview.layout == old_preview.layout {
                        preview.state = old_preview.state;
                    }
                }
            }
            self.components.push(component);
        }

        let mut seen = BTreeSet::new();
        for id in self.components.iter().filter_map(SceneComponent::id) {
            if !seen.insert(id) {
                warn!("Duplicate destination id {id} in navigation graph");
            }
        }

        let start_id = model
            .attribute(self.navigation, Some(AUTO_URI), ATTR_START_DESTINATION)
            .map(strip_id_prefix);
        let start_index = start_id.and_then(|id| self.index_of(id));
        for (index, component) in self.components.iter_mut().enumerate() {
            component.start = Some(index) == start_index;
        }
        self.refresh_flags();
        self.validate(model);
    }

    /// Drop components that no longer map onto a destination of the focused
    /// navigation. Reaching this is a bug in the caller.
    pub fn validate(&mut self, model: &NavModel) {
        let navigation = self.navigation;
        self.components.retain(|component| {
            let valid = model.destination_kind(component.key) == Some(component.kind)
                && model.parent_of(component.key) == Some(navigation);
            if !valid {
                debug_assert!(valid, "scene component {:?} has no model node", component.key);
                error!("Dropping scene component {:?} without a model node", component.key);
            }
            valid
        });
    }

    pub fn components(&self) -> &[SceneComponent] {
        &self.components
    }

    pub(crate) fn components_mut(&mut self) -> &mut [SceneComponent] {
        &mut self.components
    }

    /// Last component carrying `id`.
    pub fn component(&self, id: &str) -> Option<&SceneComponent> {
        self.index_of(id).map(|index| &self.components[index])
    }

    pub fn component_mut(&mut self, id: &str) -> Option<&mut SceneComponent> {
        self.index_of(id).map(|index| &mut self.components[index])
    }

    pub fn component_by_key(&self, key: ComponentKey) -> Option<&SceneComponent> {
        self.components.iter().find(|component| component.key == key)
    }

    pub(crate) fn index_of(&self, id: &str) -> Option<usize> {
        self.components.iter().rposition(|component| component.id() == Some(id))
    }

    pub fn set_selection<I, S>(&mut self, ids: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.selection = ids.into_iter().map(Into::into).collect();
        self.refresh_flags();
    }

    pub fn selection(&self) -> impl Iterator<Item = &str> {
        self.selection.iter().map(String::as_str)
    }

    pub fn set_highlighted<I, S>(&mut self, ids: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.highlight = ids.into_iter().map(Into::into).collect();
        self.refresh_flags();
    }

    fn refresh_flags(&mut self) {
        for component in &mut self.components {
            let id = component.id.as_deref();
            component.selected = id.is_some_and(|id| self.selection.contains(id));
            component.highlighted = id.is_some_and(|id| self.highlight.contains(id));
        }
    }

    /// Focus the nested navigation `id`. Reconcile afterwards.
    pub fn enter_navigation(&mut self, model: &NavModel, id: &str) -> bool {
        let Some(key) = model
            .find(id)
            .filter(|key| model.destination_kind(*key) == Some(DestinationKind::Navigation))
        else {
            return false;
        };
        self.focus(model, key);
        true
    }

    /// Focus the parent of the current navigation. Reconcile afterwards.
    pub fn exit(&mut self, model: &NavModel) -> bool {
        let Some(parent) = model.parent_of(self.navigation) else {
            return false;
        };
        self.focus(model, parent);
        true
    }

    fn focus(&mut self, model: &NavModel, key: ComponentKey) {
        self.navigation = key;
        self.path = navigation_path(model, key);
        self.components.clear();
        self.highlight.clear();
        self.layout_offset = Vector2D::zero();
    }

    pub fn navigation(&self) -> ComponentKey {
        self.navigation
    }

    /// Ids of the nested navigations from the root down to the focused one.
    pub fn navigation_path(&self) -> &[String] {
        &self.path
    }

    /// Union of all component rects.
    pub fn bounds(&self) -> Option<DpRect> {
        self.components
            .iter()
            .map(SceneComponent::rect)
            .reduce(|bounds, rect| bounds.union(&rect))
    }

    /// Translation applied by the last layout pass on top of stored positions.
    pub fn layout_offset(&self) -> DpVector {
        self.layout_offset
    }

    pub(crate) fn reset_layout_offset(&mut self) {
        self.layout_offset = Vector2D::zero();
    }

    pub(crate) fn translate(&mut self, delta: DpVector) {
        for component in &mut self.components {
            component.position += delta;
        }
        self.layout_offset += delta;
    }
}

fn navigation_path(model: &NavModel, navigation: ComponentKey) -> Vec<String> {
    let mut path = Vec::new();
    let mut current = navigation;
    while let Some(parent) = model.parent_of(current) {
        path.push(model.id_of(current).unwrap_or_default().to_string());
        current = parent;
    }
    path.reverse();
    path
}

fn describe(
    model: &NavModel,
    resources: &dyn ResourceResolver,
    key: ComponentKey,
    kind: DestinationKind,
) -> SceneComponent {
    let own_id = model.id_of(key);
    let own_label = model.attribute(key, Some(ANDROID_URI), ATTR_LABEL);
    let included = (kind == DestinationKind::Include)
        .then(|| model.attribute(key, Some(AUTO_URI), ATTR_GRAPH))
        .flatten()
        .and_then(|graph| resource_name(graph, NAVIGATION_RESOURCE_PREFIX))
        .and_then(|name| resources.navigation_graph(name));

    let id = match &included {
        Some(graph) => Some(graph.id.clone()),
        None => own_id.map(str::to_string),
    };
    let text = match kind {
        DestinationKind::Navigation => own_label.or(own_id).unwrap_or_default().to_string(),
        DestinationKind::Include => included
            .as_ref()
            .and_then(|graph| graph.label.clone())
            .unwrap_or_default(),
        DestinationKind::Fragment | DestinationKind::Activity => String::new(),
    };
    let preview = if kind.is_compact() {
        None
    } else {
        model
            .attribute(key, Some(TOOLS_URI), ATTR_LAYOUT)
            .and_then(|layout| resource_name(layout, LAYOUT_RESOURCE_PREFIX))
            .and_then(|layout| {
                resources.layout_preview(layout).map(|source| Preview {
                    layout: layout.to_string(),
                    source,
                    state: PreviewState::Loading,
                })
            })
    };

    let mut actions = actions_of(model, key, id.as_deref());
    if kind == DestinationKind::Navigation {
        actions.extend(exit_actions(model, key));
    }
    let deep_links = model
        .children_of(key)
        .iter()
        .filter(|child| model.tag_of(**child) == Some(TAG_DEEP_LINK))
        .count();

    SceneComponent {
        key,
        kind,
        id,
        screen_label: own_label.or(own_id).unwrap_or_default().to_string(),
        text,
        preview,
        actions,
        deep_links,
        position: Point2D::zero(),
        selected: false,
        highlighted: false,
        start: false,
    }
}

fn actions_of(model: &NavModel, key: ComponentKey, source_id: Option<&str>) -> Vec<SceneAction> {
    model
        .children_of(key)
        .iter()
        .filter(|child| model.tag_of(**child) == Some(TAG_ACTION))
        .filter_map(|action| {
            let target = model
                .attribute(*action, Some(AUTO_URI), ATTR_DESTINATION)
                .map(strip_id_prefix)
                .filter(|target| !target.is_empty())?;
            Some(SceneAction {
                id: model.id_of(*action).map(str::to_string),
                target: target.to_string(),
                style: if Some(target) == source_id {
                    ActionStyle::SelfAction
                } else {
                    ActionStyle::Normal
                },
                end: if model.attribute(*action, Some(AUTO_URI), ATTR_POP_UP_TO).is_some() {
                    EndStyle::Pop
                } else {
                    EndStyle::Normal
                },
            })
        })
        .collect()
}

/// Actions of destinations inside `navigation` that leave it.
fn exit_actions(model: &NavModel, navigation: ComponentKey) -> Vec<SceneAction> {
    let descendants = model.descendants(navigation);
    let internal: BTreeSet<&str> = std::iter::once(navigation)
        .chain(descendants.iter().copied())
        .filter_map(|key| model.id_of(key))
        .collect();
    descendants
        .iter()
        .filter(|key| model.destination_kind(**key).is_some())
        .flat_map(|key| actions_of(model, *key, None))
        .filter(|action| !internal.contains(action.target.as_str()))
        .collect()
}
