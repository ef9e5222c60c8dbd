/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

//! Declarative construction of navigation models.
//!
//! ```
//! use naveditor::model::builder::{action, fragment, root};
//!
//! let model = root()
//!     .start_destination("home")
//!     .children([fragment("home")
//!         .layout("activity_main")
//!         .children([action("toDetail").destination("detail")])])
//!     .build();
//! assert!(model.find("home").is_some());
//! ```

use super::schema::{
    ANDROID_URI, ATTR_DESTINATION, ATTR_GRAPH, ATTR_LABEL, ATTR_LAYOUT, ATTR_NAME, ATTR_POP_UP_TO,
    ATTR_START_DESTINATION, ATTR_URI, AUTO_URI, ID_PREFIX, LAYOUT_RESOURCE_PREFIX,
    NAVIGATION_RESOURCE_PREFIX, TAG_ACTION, TAG_ACTIVITY, TAG_DEEP_LINK, TAG_FRAGMENT,
    TAG_INCLUDE, TAG_NAVIGATION, TOOLS_URI,
};
use super::{ComponentKey, NavModel};

#[derive(Debug, Clone)]
pub struct ComponentDescriptor {
    tag: String,
    id: Option<String>,
    attributes: Vec<(Option<&'static str>, &'static str, String)>,
    children: Vec<ComponentDescriptor>,
}

impl ComponentDescriptor {
    pub fn new(tag: &str) -> Self {
        Self {
            tag: tag.to_string(),
            id: None,
            attributes: Vec::new(),
            children: Vec::new(),
        }
    }

    pub fn id(mut self, id: &str) -> Self {
        self.id = Some(id.to_string());
        self
    }

    fn with(mut self, namespace: Option<&'static str>, name: &'static str, value: String) -> Self {
        self.attributes.push((namespace, name, value));
        self
    }

    pub fn label(self, label: &str) -> Self {
        self.with(Some(ANDROID_URI), ATTR_LABEL, label.to_string())
    }

    pub fn name(self, class_name: &str) -> Self {
        self.with(Some(ANDROID_URI), ATTR_NAME, class_name.to_string())
    }

    pub fn layout(self, layout: &str) -> Self {
        self.with(Some(TOOLS_URI), ATTR_LAYOUT, format!("{LAYOUT_RESOURCE_PREFIX}{layout}"))
    }

    pub fn start_destination(self, id: &str) -> Self {
        self.with(Some(AUTO_URI), ATTR_START_DESTINATION, format!("{ID_PREFIX}{id}"))
    }

    pub fn destination(self, id: &str) -> Self {
        self.with(Some(AUTO_URI), ATTR_DESTINATION, format!("{ID_PREFIX}{id}"))
    }

    /// `app:graph="@navigation/{name}"`
    pub fn graph(self, name: &str) -> Self {
        self.with(Some(AUTO_URI), ATTR_GRAPH, format!("{NAVIGATION_RESOURCE_PREFIX}{name}"))
    }

    pub fn pop_up_to(self, id: &str) -> Self {
        self.with(Some(AUTO_URI), ATTR_POP_UP_TO, format!("{ID_PREFIX}{id}"))
    }

    pub fn children(mut self, children: impl IntoIterator<Item = ComponentDescriptor>) -> Self {
        self.children.extend(children);
        self
    }

    pub fn add_child(&mut self, child: ComponentDescriptor) {
        self.children.push(child);
    }

    /// Build a fresh model with this descriptor as its root `<navigation>`.
    pub fn build(&self) -> NavModel {
        let mut model = NavModel::new();
        let root = model.root();
        self.apply_to(&mut model, root);
        model
    }

    /// Append this descriptor as a new child of `parent`.
    pub fn add_to(&self, model: &mut NavModel, parent: ComponentKey) -> Option<ComponentKey> {
        let key = model.add_child(parent, &self.tag)?;
        self.apply_to(model, key);
        Some(key)
    }

    fn apply_to(&self, model: &mut NavModel, key: ComponentKey) {
        if let Some(id) = &self.id {
            model.assign_id(key, id);
        }
        for (namespace, name, value) in &self.attributes {
            model.set_attribute(key, *namespace, name, value.clone());
        }
        for child in &self.children {
            child.add_to(model, key);
        }
    }
}

pub fn root() -> ComponentDescriptor {
    ComponentDescriptor::new(TAG_NAVIGATION)
}

pub fn fragment(id: &str) -> ComponentDescriptor {
    ComponentDescriptor::new(TAG_FRAGMENT).id(id)
}

pub fn activity(id: &str) -> ComponentDescriptor {
    ComponentDescriptor::new(TAG_ACTIVITY).id(id)
}

pub fn navigation(id: &str) -> ComponentDescriptor {
    ComponentDescriptor::new(TAG_NAVIGATION).id(id)
}

pub fn include(graph: &str) -> ComponentDescriptor {
    ComponentDescriptor::new(TAG_INCLUDE).graph(graph)
}

pub fn action(id: &str) -> ComponentDescriptor {
    ComponentDescriptor::new(TAG_ACTION).id(id)
}

pub fn deep_link(uri: &str) -> ComponentDescriptor {
    ComponentDescriptor::new(TAG_DEEP_LINK).with(Some(AUTO_URI), ATTR_URI, uri.to_string())
}
