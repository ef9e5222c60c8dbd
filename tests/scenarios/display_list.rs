/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

use naveditor::editor::NavIntent;
use naveditor::model::builder::{action, activity, deep_link, fragment, include, navigation, root};
use naveditor::resources::InMemoryResources;
use naveditor::scene::Scene;
use naveditor::scene::layout::{GridLayoutAlgorithm, LayoutAlgorithm};

use crate::{editor, light_view, render, resources};

fn laid_out(model: &naveditor::model::NavModel, resources: &InMemoryResources) -> Scene {
    let mut scene = Scene::build(model, resources);
    GridLayoutAlgorithm::default().layout(&mut scene);
    scene
}

#[test]
fn three_destinations_with_nested_graph() {
    let model = root()
        .start_destination("fragment1")
        .children([
            fragment("fragment1")
                .layout("activity_main")
                .children([action("action1").destination("subnav"), action("action2").destination("activity")]),
            navigation("subnav").children([fragment("fragment2")
                .layout("activity_main2")
                .children([action("action3").destination("activity")])]),
            activity("activity"),
        ])
        .build();
    let scene = laid_out(&model, &resources());

    assert_eq!(
        render(&scene, &light_view()),
        "Clip,0,0,720,420\n\
         DrawComponentBackground,570,50,100,25,1,true\n\
         DrawTextRegion,570,50,100,25,0,17,true,false,4,4,30,0.5,\"subnav\"\n\
         DrawComponentFrame,570,50,100,25,1,true\n\
         DrawAction,21,NORMAL,570x50x100x25,50x50x192x320,NORMAL\n\
         DrawActionHandle,25,670,62,0,0,ffa7a7a7,fff5f5f5\n\
         DrawScreenLabel,22,570,46,ff000000,java.awt.Font[family=Dialog,name=Default,style=plain,size=8],subnav\n\
         \n\
         DrawComponentBackground,50,50,192,320,1,false\n\
         DrawComponentFrame,50,50,192,320,1,false\n\
         DrawActionHandle,25,242,210,0,0,ffa7a7a7,fff5f5f5\n\
         DrawScreenLabel,22,50,46,ff000000,java.awt.Font[family=Dialog,name=Default,style=plain,size=8],activity\n\
         \n\
         DrawComponentBackground,310,50,192,320,1,false\n\
         DrawNavScreen,24,311,51,191,319\n\
         DrawComponentFrame,310,50,192,320,1,false\n\
         DrawAction,21,NORMAL,310x50x192x320,570x50x100x25,NORMAL\n\
         DrawAction,21,NORMAL,310x50x192x320,50x50x192x320,NORMAL\n\
         DrawActionHandle,25,502,210,0,0,ffa7a7a7,fff5f5f5\n\
         DrawIcon,23,310x38x12x12,START_DESTINATION\n\
         DrawScreenLabel,22,326,46,ff000000,java.awt.Font[family=Dialog,name=Default,style=plain,size=8],fragment1\n\
         \n\
         UNClip\n"
    );
}

#[test]
fn included_graph_shows_its_label_and_receives_actions() {
    let model = root()
        .children([
            fragment("fragment1").children([action("action1").destination("nav")]),
            include("navigation"),
        ])
        .build();
    let scene = laid_out(&model, &resources());

    assert_eq!(
        render(&scene, &light_view()),
        "Clip,0,0,460,420\n\
         DrawComponentBackground,50,50,192,320,1,false\n\
         DrawComponentFrame,50,50,192,320,1,false\n\
         DrawAction,21,NORMAL,50x50x192x320,310x50x100x25,NORMAL\n\
         DrawActionHandle,25,242,210,0,0,ffa7a7a7,fff5f5f5\n\
         DrawScreenLabel,22,50,46,ff000000,java.awt.Font[family=Dialog,name=Default,style=plain,size=8],fragment1\n\
         \n\
         DrawComponentBackground,310,50,100,25,1,true\n\
         DrawTextRegion,310,50,100,25,0,17,true,false,4,4,30,0.5,\"myCoolLabel\"\n\
         DrawComponentFrame,310,50,100,25,1,true\n\
         DrawActionHandle,25,410,62,0,0,ffa7a7a7,fff5f5f5\n\
         DrawScreenLabel,22,310,46,ff000000,java.awt.Font[family=Dialog,name=Default,style=plain,size=8],\n\
         \n\
         UNClip\n"
    );
}

#[test]
fn unresolved_include_is_an_empty_box() {
    let model = root()
        .children([
            fragment("fragment1").children([action("action1").destination("nav")]),
            include("navigation"),
        ])
        .build();
    let text = render(&laid_out(&model, &InMemoryResources::new()), &light_view());
    assert!(text.contains("DrawTextRegion,310,50,100,25,0,17,true,false,4,4,30,0.5,\"\"\n"));
    assert!(!text.contains("DrawAction,"));
}

#[test]
fn nonexistent_layout_draws_no_screen() {
    let model = root()
        .children([fragment("fragment1").layout("activity_nonexistent")])
        .build();
    assert_eq!(
        render(&laid_out(&model, &resources()), &light_view()),
        "Clip,0,0,292,420\n\
         DrawComponentBackground,50,50,192,320,1,false\n\
         DrawComponentFrame,50,50,192,320,1,false\n\
         DrawActionHandle,25,242,210,0,0,ffa7a7a7,fff5f5f5\n\
         DrawScreenLabel,22,50,46,ff000000,java.awt.Font[family=Dialog,name=Default,style=plain,size=8],fragment1\n\
         \n\
         UNClip\n"
    );
}

#[test]
fn self_action_loops_on_its_source() {
    let model = root()
        .start_destination("fragment1")
        .children([fragment("fragment1")
            .layout("activity_main")
            .children([action("action1").destination("fragment1")])])
        .build();
    assert_eq!(
        render(&laid_out(&model, &resources()), &light_view()),
        "Clip,0,0,292,420\n\
         DrawComponentBackground,50,50,192,320,1,false\n\
         DrawNavScreen,24,51,51,191,319\n\
         DrawComponentFrame,50,50,192,320,1,false\n\
         DrawAction,21,SELF,50x50x192x320,50x50x192x320,NORMAL\n\
         DrawActionHandle,25,242,210,0,0,ffa7a7a7,fff5f5f5\n\
         DrawIcon,23,50x38x12x12,START_DESTINATION\n\
         DrawScreenLabel,22,66,46,ff000000,java.awt.Font[family=Dialog,name=Default,style=plain,size=8],fragment1\n\
         \n\
         UNClip\n"
    );
}

#[test]
fn deep_link_icon_follows_the_label() {
    let model = root()
        .start_destination("fragment1")
        .children([fragment("fragment1")
            .layout("activity_main")
            .children([deep_link("https://www.android.com/")])])
        .build();
    assert_eq!(
        render(&laid_out(&model, &resources()), &light_view()),
        "Clip,0,0,292,420\n\
         DrawComponentBackground,50,50,192,320,1,false\n\
         DrawNavScreen,24,51,51,191,319\n\
         DrawComponentFrame,50,50,192,320,1,false\n\
         DrawActionHandle,25,242,210,0,0,ffa7a7a7,fff5f5f5\n\
         DrawIcon,23,50x38x12x12,START_DESTINATION\n\
         DrawScreenLabel,22,66,46,ff000000,java.awt.Font[family=Dialog,name=Default,style=plain,size=8],fragment1\n\
         DrawIcon,23,230x38x12x12,DEEPLINK\n\
         \n\
         UNClip\n"
    );
}

fn start_on_fragment2() -> naveditor::model::NavModel {
    root()
        .start_destination("fragment2")
        .children([
            fragment("fragment1")
                .layout("activity_main")
                .children([action("action1").destination("fragment2")]),
            fragment("fragment2").layout("activity_main2"),
        ])
        .build()
}

#[test]
fn added_destination_lands_in_the_next_free_cell() {
    let mut editor = editor(start_on_fragment2(), resources());
    editor.apply_intents([NavIntent::AddDestination(naveditor::editor::NewDestination {
        tag: "fragment".to_string(),
        id: Some("fragment3".to_string()),
        ..Default::default()
    })]);
    editor.apply_intents([NavIntent::Select { ids: Vec::new() }]);

    assert_eq!(
        editor.display_list().serialize(),
        "Clip,0,0,812,420\n\
         DrawComponentBackground,310,50,192,320,1,false\n\
         DrawNavScreen,24,311,51,191,319\n\
         DrawComponentFrame,310,50,192,320,1,false\n\
         DrawAction,21,NORMAL,310x50x192x320,50x50x192x320,NORMAL\n\
         DrawActionHandle,25,502,210,0,0,ffa7a7a7,fff5f5f5\n\
         DrawScreenLabel,22,310,46,ff000000,java.awt.Font[family=Dialog,name=Default,style=plain,size=8],fragment1\n\
         \n\
         DrawComponentBackground,570,50,192,320,1,false\n\
         DrawComponentFrame,570,50,192,320,1,false\n\
         DrawActionHandle,25,762,210,0,0,ffa7a7a7,fff5f5f5\n\
         DrawScreenLabel,22,570,46,ff000000,java.awt.Font[family=Dialog,name=Default,style=plain,size=8],fragment3\n\
         \n\
         DrawComponentBackground,50,50,192,320,1,false\n\
         DrawNavScreen,24,51,51,191,319\n\
         DrawComponentFrame,50,50,192,320,1,false\n\
         DrawActionHandle,25,242,210,0,0,ffa7a7a7,fff5f5f5\n\
         DrawIcon,23,50x38x12x12,START_DESTINATION\n\
         DrawScreenLabel,22,66,46,ff000000,java.awt.Font[family=Dialog,name=Default,style=plain,size=8],fragment2\n\
         \n\
         UNClip\n"
    );
}

#[test]
fn undoing_a_delete_restores_the_list_byte_for_byte() {
    let mut editor = editor(start_on_fragment2(), resources());
    let before = editor.display_list().serialize();

    editor.apply_intents([NavIntent::Delete {
        ids: vec!["fragment2".to_string()],
    }]);
    assert_eq!(
        editor.display_list().serialize(),
        "Clip,0,0,292,420\n\
         DrawComponentBackground,50,50,192,320,1,false\n\
         DrawNavScreen,24,51,51,191,319\n\
         DrawComponentFrame,50,50,192,320,1,false\n\
         DrawActionHandle,25,242,210,0,0,ffa7a7a7,fff5f5f5\n\
         DrawScreenLabel,22,50,46,ff000000,java.awt.Font[family=Dialog,name=Default,style=plain,size=8],fragment1\n\
         \n\
         UNClip\n"
    );

    editor.apply_intents([NavIntent::Undo]);
    let after = editor.display_list().serialize();
    assert_eq!(after, before);
    assert!(after.starts_with("Clip,0,0,552,420\n"));
}
