/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

use std::io::Cursor;

use quick_xml::Writer;
use quick_xml::escape::escape;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, Event};

use super::schema::{ANDROID_URI, AUTO_URI, TAG_NAVIGATION, TOOLS_URI, namespace_prefix};
use super::{ComponentKey, NavModel};

const XML_URI: &str = "http://www.w3.org/XML/1998/namespace";

#[derive(Debug)]
pub enum ModelError {
    Xml(String),
    UnexpectedRoot(String),
    Io(String),
}

impl std::fmt::Display for ModelError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ModelError::Xml(e) => write!(f, "XML error: {e}"),
            ModelError::UnexpectedRoot(tag) => {
                write!(f, "Expected <navigation> root element, found <{tag}>")
            }
            ModelError::Io(e) => write!(f, "IO error: {e}"),
        }
    }
}

impl std::error::Error for ModelError {}

impl From<std::io::Error> for ModelError {
    fn from(error: std::io::Error) -> Self {
        ModelError::Io(error.to_string())
    }
}

impl From<roxmltree::Error> for ModelError {
    fn from(error: roxmltree::Error) -> Self {
        ModelError::Xml(error.to_string())
    }
}

pub(super) fn parse(text: &str) -> Result<NavModel, ModelError> {
    let document = roxmltree::Document::parse(text)?;
    let root_element = document.root_element();
    let root_tag = root_element.tag_name().name();
    if root_tag != TAG_NAVIGATION {
        return Err(ModelError::UnexpectedRoot(root_tag.to_string()));
    }

    let mut model = NavModel::new();
    for element in root_element.descendants().filter(roxmltree::Node::is_element) {
        for namespace in element.namespaces() {
            let Some(prefix) = namespace.name() else {
                continue;
            };
            if prefix != "xml" && namespace_prefix(namespace.uri()).is_none() {
                model.declare_namespace(prefix, namespace.uri());
            }
        }
    }
    let root = model.root();
    copy_attributes(&mut model, root, root_element);
    copy_children(&mut model, root, root_element);
    Ok(model)
}

fn copy_children(model: &mut NavModel, parent: ComponentKey, element: roxmltree::Node<'_, '_>) {
    for child in element.children().filter(roxmltree::Node::is_element) {
        let Some(key) = model.add_child(parent, child.tag_name().name()) else {
            continue;
        };
        copy_attributes(model, key, child);
        copy_children(model, key, child);
    }
}

fn copy_attributes(model: &mut NavModel, key: ComponentKey, element: roxmltree::Node<'_, '_>) {
    for attribute in element.attributes() {
        model.set_attribute(key, attribute.namespace(), attribute.name(), attribute.value());
    }
}

pub(super) fn write(model: &NavModel) -> Result<String, ModelError> {
    let prefixes = Prefixes::collect(model);
    let mut writer = Writer::new_with_indent(Cursor::new(Vec::new()), b' ', 4);
    writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("utf-8"), None)))?;
    write_element(&mut writer, model, model.root(), &prefixes)?;
    let mut text = String::from_utf8(writer.into_inner().into_inner())
        .map_err(|error| ModelError::Xml(error.to_string()))?;
    text.push('\n');
    Ok(text)
}

fn write_element(
    writer: &mut Writer<Cursor<Vec<u8>>>,
    model: &NavModel,
    key: ComponentKey,
    prefixes: &Prefixes<'_>,
) -> Result<(), ModelError> {
    let Some(component) = model.component(key) else {
        return Ok(());
    };
    let mut element = BytesStart::new(component.tag());
    if key == model.root() {
        for (prefix, uri) in &prefixes.declared {
            let name = format!("xmlns:{prefix}");
            element.push_attribute((name.as_str(), *uri));
        }
    }
    for (name, value) in component.attributes() {
        let qualified = match name.namespace.as_deref().and_then(|uri| prefixes.prefix(uri)) {
            Some(prefix) => format!("{prefix}:{}", name.name),
            None => name.name.clone(),
        };
        let value = escape_attribute(value);
        element.push_attribute((qualified.as_bytes(), value.as_bytes()));
    }

    if component.children().is_empty() {
        writer.write_event(Event::Empty(element))?;
        return Ok(());
    }
    writer.write_event(Event::Start(element))?;
    for child in component.children() {
        write_element(writer, model, *child, prefixes)?;
    }
    writer.write_event(Event::End(BytesEnd::new(component.tag())))?;
    Ok(())
}

/// Attribute values keep line breaks and tabs as character references;
/// written raw they would be normalized to spaces on the next read.
fn escape_attribute(value: &str) -> String {
    escape(value)
        .replace('\n', "&#10;")
        .replace('\r', "&#13;")
        .replace('\t', "&#9;")
}

/// Namespace prefixes declared on the root element: the android/app/tools
/// trio, prefixes read from the source document, then generated ones for any
/// other namespace an attribute uses.
struct Prefixes<'a> {
    declared: Vec<(String, &'a str)>,
}

impl<'a> Prefixes<'a> {
    fn collect(model: &'a NavModel) -> Self {
        let mut declared: Vec<(String, &'a str)> = [ANDROID_URI, AUTO_URI, TOOLS_URI]
            .into_iter()
            .filter_map(|uri| namespace_prefix(uri).map(|prefix| (prefix.to_string(), uri)))
            .collect();
        for (prefix, uri) in model.namespaces() {
            declared.push((prefix.to_string(), uri));
        }

        let mut prefixes = Self { declared };
        let keys = std::iter::once(model.root()).chain(model.descendants(model.root()));
        for key in keys {
            let Some(component) = model.component(key) else {
                continue;
            };
            for (name, _) in component.attributes() {
                let Some(uri) = name.namespace.as_deref() else {
                    continue;
                };
                if prefixes.prefix(uri).is_none() {
                    let prefix = prefixes.unused_prefix();
                    prefixes.declared.push((prefix, uri));
                }
            }
        }
        prefixes
    }

    fn prefix(&self, uri: &str) -> Option<&str> {
        if uri == XML_URI {
            return Some("xml");
        }
        self.declared
            .iter()
            .find(|(_, declared)| *declared == uri)
            .map(|(prefix, _)| prefix.as_str())
    }

    fn unused_prefix(&self) -> String {
        (0..)
            .map(|n| format!("ns{n}"))
            .find(|candidate| self.declared.iter().all(|(prefix, _)| prefix != candidate))
            .unwrap_or_default()
    }
}
