/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

//! Navigation editor session: the single owner of model store, scene, layout,
//! view and preview loader.
//!
//! User actions arrive as [`NavIntent`]s and are applied in order by
//! [`NavEditor::apply_intents`]. Model mutations go through the store; the
//! scene only catches up when the resulting [`ModelEvent`]s are drained, so
//! every rebuild reads one consistent model epoch.

use std::collections::BTreeMap;
use std::path::Path;

use crossbeam_channel::Receiver;
use euclid::default::Size2D;
use log::{debug, warn};

use crate::config::SceneConfig;
use crate::model::schema::{
    ATTR_DESTINATION, ATTR_POP_UP_TO, ATTR_START_DESTINATION, AUTO_URI, DestinationKind, ID_PREFIX,
    strip_id_prefix,
};
use crate::model::{ChangeType, ComponentKey, ModelEvent, ModelStore, NavModel};
use crate::preview::{PreviewLoader, PreviewStatus};
use crate::render::{DisplayList, Palette, build_display_list};
use crate::resources::ResourceResolver;
use crate::scene::layout::{
    GridLayoutAlgorithm, LayoutAlgorithm, ManualLayoutAlgorithm, PositionsError, SharedPositions,
};
use crate::scene::{PreviewState, Scene};
use crate::view::{NavView, ZoomType};

pub mod add_menu;

pub use add_menu::{AddDestinationMenu, NewDestination, PaletteDestination};

#[derive(Debug, Clone, PartialEq)]
pub enum NavIntent {
    Select { ids: Vec<String> },
    Highlight { ids: Vec<String> },
    EnterNavigation { id: String },
    ExitNavigation,
    Zoom(ZoomType),
    SetSurfaceSize { width: i32, height: i32 },
    /// Drop a destination at `(x, y)` in scene dp and remember the spot.
    Move { id: String, x: i32, y: i32 },
    Delete { ids: Vec<String> },
    Rename { old: String, new: String },
    AddDestination(NewDestination),
    Undo,
    Redo,
}

pub struct NavEditor {
    store: ModelStore,
    events: Receiver<ModelEvent>,
    resources: Box<dyn ResourceResolver>,
    scene: Scene,
    layout: ManualLayoutAlgorithm,
    view: NavView,
    previews: PreviewLoader,
    palette_destinations: Vec<PaletteDestination>,
    add_menu: Option<AddDestinationMenu>,
    display_list: Option<DisplayList>,
}

impl NavEditor {
    pub fn new(
        mut store: ModelStore,
        resources: Box<dyn ResourceResolver>,
        positions: SharedPositions,
        config: &SceneConfig,
    ) -> Self {
        let events = store.subscribe();
        let layout = ManualLayoutAlgorithm::new(
            store.file_name(),
            positions,
            GridLayoutAlgorithm::from_config(config),
        );
        let scene = Scene::new(store.model());
        let mut editor = Self {
            store,
            events,
            resources,
            scene,
            layout,
            view: NavView::new(config),
            previews: PreviewLoader::new(),
            palette_destinations: Vec::new(),
            add_menu: None,
            display_list: None,
        };
        editor.rebuild();
        editor
    }

    pub fn model(&self) -> &NavModel {
        self.store.model()
    }

    pub fn store(&self) -> &ModelStore {
        &self.store
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn view(&self) -> &NavView {
        &self.view
    }

    pub fn view_mut(&mut self) -> &mut NavView {
        self.display_list = None;
        &mut self.view
    }

    /// Whether any layout preview is still decoding.
    pub fn is_loading(&self) -> bool {
        self.previews.is_loading()
    }

    pub fn set_palette_destinations(&mut self, destinations: Vec<PaletteDestination>) {
        self.palette_destinations = destinations;
    }

    pub fn apply_intents<I>(&mut self, intents: I)
    where
        I: IntoIterator<Item = NavIntent>,
    {
        for intent in intents {
            self.apply_intent(intent);
        }
        self.drain_model_events();
    }

    fn apply_intent(&mut self, intent: NavIntent) {
        match intent {
            NavIntent::Select { ids } => {
                self.scene.set_selection(ids);
                self.invalidate();
            }
            NavIntent::Highlight { ids } => {
                self.scene.set_highlighted(ids);
                self.invalidate();
            }
            NavIntent::EnterNavigation { id } => {
                if self.scene.enter_navigation(self.store.model(), &id) {
                    self.change_focus();
                } else {
                    warn!("Cannot enter {id}: not a nested navigation");
                }
            }
            NavIntent::ExitNavigation => {
                if self.scene.exit(self.store.model()) {
                    self.change_focus();
                }
            }
            NavIntent::Zoom(zoom) => {
                let extent = self.scene.bounds().map(|bounds| {
                    Size2D::new(
                        bounds.max_x() + self.view.padding(),
                        bounds.max_y() + self.view.padding(),
                    )
                });
                if self.view.zoom(zoom, extent) {
                    self.invalidate();
                }
            }
            NavIntent::SetSurfaceSize { width, height } => {
                self.view.set_surface_size(width, height);
                self.invalidate();
            }
            NavIntent::Move { id, x, y } => self.move_destination(&id, x, y),
            NavIntent::Delete { ids } => self.delete(&ids),
            NavIntent::Rename { old, new } => self.rename(&old, &new),
            NavIntent::AddDestination(destination) => {
                self.add_destination(&destination);
            }
            NavIntent::Undo => {
                let before = destination_ids(self.store.model());
                if self.store.undo() {
                    self.follow_renames(&before);
                } else {
                    debug!("Nothing to undo");
                }
            }
            NavIntent::Redo => {
                let before = destination_ids(self.store.model());
                if self.store.redo() {
                    self.follow_renames(&before);
                } else {
                    debug!("Nothing to redo");
                }
            }
        }
    }

    /// Catch up with model changes and finished previews. Returns whether the
    /// display list has to be redrawn.
    pub fn update(&mut self) -> bool {
        let model_changed = self.drain_model_events();
        let redraw = self.previews.poll();
        if !redraw.is_empty() {
            self.refresh_preview_states();
            self.invalidate();
        }
        model_changed || !redraw.is_empty()
    }

    /// Complete list for the current state, built on demand and cached until
    /// something visible changes.
    pub fn display_list(&mut self) -> &DisplayList {
        let scene = &self.scene;
        let view = &self.view;
        self.display_list
            .get_or_insert_with(|| build_display_list(scene, view, Palette::global()))
    }

    pub fn open_add_menu(&mut self) -> &mut AddDestinationMenu {
        let menu = AddDestinationMenu::open(
            self.store.model(),
            self.scene.navigation(),
            self.resources.navigation_sources(),
            self.palette_destinations.clone(),
            &mut self.previews,
        );
        self.add_menu.insert(menu)
    }

    pub fn add_menu(&self) -> Option<&AddDestinationMenu> {
        self.add_menu.as_ref()
    }

    pub fn add_menu_mut(&mut self) -> Option<&mut AddDestinationMenu> {
        let previews = &self.previews;
        self.add_menu.as_mut().map(|menu| {
            menu.refresh(previews);
            menu
        })
    }

    /// Commit the open dialog. An invalid dialog stays open.
    pub fn commit_add_menu(&mut self) -> Option<ComponentKey> {
        let destination = self.add_menu.as_mut()?.commit()?;
        self.add_menu = None;
        self.add_destination(&destination)
    }

    pub fn add_from_palette(&mut self, destination: &PaletteDestination) -> Option<ComponentKey> {
        let new = add_menu::palette_destination(
            self.store.model(),
            self.scene.navigation(),
            destination,
        );
        self.add_destination(&new)
    }

    pub fn save_positions(&self, path: &Path) -> Result<(), PositionsError> {
        self.layout.persist(path)
    }

    fn add_destination(&mut self, destination: &NewDestination) -> Option<ComponentKey> {
        let navigation = self.scene.navigation();
        let key = self
            .store
            .edit(ChangeType::Add, |model| destination.insert(model, navigation))?;
        self.drain_model_events();
        let id = self
            .scene
            .component_by_key(key)
            .and_then(|component| component.id())
            .map(str::to_string);
        self.scene.set_selection(id);
        self.invalidate();
        Some(key)
    }

    fn move_destination(&mut self, id: &str, x: i32, y: i32) {
        let Some(component) = self.scene.component_mut(id) else {
            warn!("Cannot move unknown destination {id}");
            return;
        };
        component.set_position(x, y);
        if let Some(component) = self.scene.component(id) {
            self.layout.save(&self.scene, component);
        }
        self.layout.layout(&mut self.scene);
        self.invalidate();
    }

    /// Model key of a destination at the focused level. Includes are known
    /// in the scene by the id of the graph they pull in, not by their own.
    fn destination_key(&self, id: &str) -> Option<ComponentKey> {
        self.scene
            .component(id)
            .map(|component| component.key())
            .or_else(|| self.store.model().find_child(self.scene.navigation(), id))
    }

    fn delete(&mut self, ids: &[String]) {
        let keys: Vec<ComponentKey> = ids
            .iter()
            .filter_map(|id| self.destination_key(id))
            .collect();
        if keys.is_empty() {
            return;
        }
        self.store.edit(ChangeType::Delete, |model| {
            for key in keys {
                model.remove(key);
            }
        });
        let remaining: Vec<String> = self
            .scene
            .selection()
            .filter(|selected| !ids.iter().any(|id| id == selected))
            .map(str::to_string)
            .collect();
        self.scene.set_selection(remaining);
    }

    fn rename(&mut self, old: &str, new: &str) {
        let Some(key) = self.destination_key(old) else {
            warn!("Cannot rename unknown destination {old}");
            return;
        };
        if self.store.model().destination_kind(key) == Some(DestinationKind::Include) {
            warn!("Cannot rename {old}: its id belongs to the included graph");
            return;
        }
        if new.is_empty() || self.destination_key(new).is_some() {
            warn!("Cannot rename {old} to {new}: id is empty or taken");
            return;
        }
        let before = destination_ids(self.store.model());
        self.store.edit(ChangeType::Edit, |model| {
            model.assign_id(key, new);
            retarget_references(model, old, new);
        });
        self.follow_renames(&before);
        let selection: Vec<String> = self
            .scene
            .selection()
            .map(|id| (if id == old { new } else { id }).to_string())
            .collect();
        self.scene.set_selection(selection);
    }

    /// Move stored positions along with destinations whose id changed since
    /// `before`, so undo and redo of a rename land where the user left them.
    fn follow_renames(&self, before: &BTreeMap<ComponentKey, (Vec<String>, String)>) {
        let after = destination_ids(self.store.model());
        for (key, (path, old)) in before {
            let Some((new_path, new)) = after.get(key) else {
                continue;
            };
            if new_path == path && new != old {
                debug!("Moving stored position of {old} to {new}");
                self.layout.rename(path, old, new);
            }
        }
    }

    fn change_focus(&mut self) {
        self.previews.cancel_pending();
        self.rebuild();
    }

    fn drain_model_events(&mut self) -> bool {
        let mut latest = None;
        while let Ok(event) = self.events.try_recv() {
            latest = Some(event);
        }
        let Some(event) = latest else {
            return false;
        };
        debug!("Rebuilding scene at model epoch {}", event.epoch);
        self.rebuild();
        true
    }

    fn rebuild(&mut self) {
        self.scene.reconcile(self.store.model(), self.resources.as_ref());
        for component in self.scene.components_mut() {
            let Some(preview) = component.preview() else {
                continue;
            };
            let status = self.previews.request(&preview.layout, &preview.source);
            component.set_preview_state(preview_state(status));
        }
        self.layout.layout(&mut self.scene);
        self.invalidate();
    }

    fn refresh_preview_states(&mut self) {
        for component in self.scene.components_mut() {
            let Some(status) = component
                .preview()
                .and_then(|preview| self.previews.status(&preview.layout))
            else {
                continue;
            };
            component.set_preview_state(preview_state(status));
        }
    }

    fn invalidate(&mut self) {
        self.display_list = None;
    }
}

fn preview_state(status: PreviewStatus) -> PreviewState {
    match status {
        PreviewStatus::Loading => PreviewState::Loading,
        PreviewStatus::Complete { .. } => PreviewState::Ready,
        PreviewStatus::Failed => PreviewState::Failed,
    }
}

/// Id and enclosing navigation path of every destination that can be
/// addressed in the position map.
fn destination_ids(model: &NavModel) -> BTreeMap<ComponentKey, (Vec<String>, String)> {
    let mut ids = BTreeMap::new();
    let mut pending = vec![(model.root(), Vec::new())];
    while let Some((navigation, path)) = pending.pop() {
        for &key in model.children_of(navigation) {
            let (Some(kind), Some(id)) = (model.destination_kind(key), model.id_of(key)) else {
                continue;
            };
            if kind == DestinationKind::Navigation {
                let mut nested = path.clone();
                nested.push(id.to_string());
                pending.push((key, nested));
            }
            ids.insert(key, (path.clone(), id.to_string()));
        }
    }
    ids
}

/// Point every `@id/old` reference in the document at `new`.
fn retarget_references(model: &mut NavModel, old: &str, new: &str) {
    let root = model.root();
    let keys: Vec<ComponentKey> = std::iter::once(root).chain(model.descendants(root)).collect();
    for key in keys {
        for name in [ATTR_DESTINATION, ATTR_POP_UP_TO, ATTR_START_DESTINATION] {
            let refers_to_old = model
                .attribute(key, Some(AUTO_URI), name)
                .is_some_and(|value| strip_id_prefix(value) == old);
            if refers_to_old {
                model.set_attribute(key, Some(AUTO_URI), name, format!("{ID_PREFIX}{new}"));
            }
        }
    }
}
