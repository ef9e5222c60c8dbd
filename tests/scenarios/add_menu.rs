/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use naveditor::editor::PaletteDestination;
use naveditor::editor::add_menu::Thumbnail;
use naveditor::model::builder::{fragment, root};
use naveditor::model::schema::{
    ANDROID_URI, ATTR_GRAPH, ATTR_ID, ATTR_LABEL, ATTR_LAYOUT, ATTR_NAME, AUTO_URI, DestinationKind,
    TOOLS_URI,
};
use naveditor::resources::PreviewSource;

use crate::{editor, png, resources};

#[test]
fn fragment_from_dialog_is_added_and_selected() {
    let mut editor = editor(root().children([fragment("fragment")]).build(), resources());
    let menu = editor.open_add_menu();
    assert_eq!(menu.kind(), DestinationKind::Fragment);
    assert_eq!(menu.id(), "fragment2");
    menu.set_label("Details");

    let key = editor.commit_add_menu().unwrap();
    let model = editor.model();
    assert_eq!(model.tag_of(key), Some("fragment"));
    assert_eq!(model.attribute(key, Some(ANDROID_URI), ATTR_ID), Some("@+id/fragment2"));
    assert_eq!(model.attribute(key, Some(ANDROID_URI), ATTR_LABEL), Some("Details"));
    assert_eq!(model.attribute(key, Some(TOOLS_URI), ATTR_LAYOUT), None);
    assert!(editor.scene().component("fragment2").unwrap().is_selected());
}

#[test]
fn include_from_dialog_references_the_source_graph() {
    let mut editor = editor(root().build(), resources());
    let menu = editor.open_add_menu();
    assert_eq!(menu.sources(), ["navigation.xml".to_string()]);
    menu.select_kind(DestinationKind::Include);
    assert!(!menu.is_id_visible());
    assert!(menu.is_source_visible());

    let key = editor.commit_add_menu().unwrap();
    assert_eq!(
        editor.model().attribute(key, Some(AUTO_URI), ATTR_GRAPH),
        Some("@navigation/navigation")
    );
    // The scene knows the include by the root id of the included graph.
    assert!(editor.scene().component("nav").unwrap().is_selected());
}

#[test]
fn palette_activity_gets_class_layout_and_derived_id() {
    let mut editor = editor(root().build(), resources());
    let key = editor
        .add_from_palette(&PaletteDestination {
            kind: DestinationKind::Activity,
            simple_name: "MainActivity".to_string(),
            qualified_name: "mytest.navtest.MainActivity".to_string(),
            layout: Some("activity_main".to_string()),
            thumbnail: None,
        })
        .unwrap();
    let model = editor.model();
    assert_eq!(model.tag_of(key), Some("activity"));
    assert_eq!(model.attribute(key, Some(ANDROID_URI), ATTR_ID), Some("@+id/mainActivity"));
    assert_eq!(
        model.attribute(key, Some(ANDROID_URI), ATTR_NAME),
        Some("mytest.navtest.MainActivity")
    );
    assert_eq!(
        model.attribute(key, Some(TOOLS_URI), ATTR_LAYOUT),
        Some("@layout/activity_main")
    );
    assert!(editor.scene().component("mainActivity").unwrap().is_selected());
}

#[test]
fn loading_overlay_disappears_once_thumbnails_are_decoded() {
    let mut editor = editor(root().build(), resources());
    editor.set_palette_destinations(vec![PaletteDestination {
        kind: DestinationKind::Activity,
        simple_name: "MainActivity".to_string(),
        qualified_name: "mytest.navtest.MainActivity".to_string(),
        layout: None,
        thumbnail: Some(Thumbnail {
            name: "thumbnail_main".to_string(),
            source: PreviewSource::Bytes(Arc::from(png(8, 8))),
        }),
    }]);
    assert!(editor.open_add_menu().loading_overlay().is_some());

    let deadline = Instant::now() + Duration::from_secs(10);
    while editor.is_loading() && Instant::now() < deadline {
        editor.update();
        thread::sleep(Duration::from_millis(5));
    }
    assert!(!editor.is_loading());
    let menu = editor.add_menu_mut().unwrap();
    assert!(!menu.loading_overlay().unwrap().is_loading());

    assert!(editor.open_add_menu().loading_overlay().is_none());
}
