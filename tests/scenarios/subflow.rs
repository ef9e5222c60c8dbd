/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

use std::thread;
use std::time::{Duration, Instant};

use naveditor::editor::{NavEditor, NavIntent};
use naveditor::model::NavModel;
use naveditor::model::builder::{action, fragment, navigation, root};
use naveditor::render::DrawCommand;
use naveditor::view::ZoomType;

use crate::{editor, resources};

fn subflow() -> NavModel {
    root()
        .start_destination("fragment2")
        .children([
            fragment("fragment1").children([action("action1").destination("fragment2")]),
            fragment("fragment2")
                .layout("activity_main2")
                .children([action("action2").destination("fragment3")]),
            navigation("subnav").children([
                fragment("fragment3").children([action("action3").destination("fragment4")]),
                fragment("fragment4").children([action("action4").destination("fragment1")]),
            ]),
        ])
        .build()
}

#[test]
fn nested_graph_at_actual_size_then_focused() {
    let mut editor = editor(subflow(), resources());
    editor.apply_intents([
        NavIntent::SetSurfaceSize {
            width: 1000,
            height: 1000,
        },
        NavIntent::Zoom(ZoomType::Actual),
    ]);

    assert_eq!(
        editor.display_list().serialize(),
        "Clip,0,0,1440,840\n\
         DrawComponentBackground,620,100,384,640,1,false\n\
         DrawComponentFrame,620,100,384,640,1,false\n\
         DrawAction,21,NORMAL,620x100x384x640,100x100x384x640,NORMAL\n\
         DrawActionHandle,25,1004,420,0,0,ffa7a7a7,fff5f5f5\n\
         DrawScreenLabel,22,620,92,ff000000,java.awt.Font[family=Dialog,name=Default,style=plain,size=16],fragment1\n\
         \n\
         DrawComponentBackground,1140,100,200,50,1,true\n\
         DrawTextRegion,1140,100,200,50,0,35,true,false,4,4,30,1.0,\"subnav\"\n\
         DrawComponentFrame,1140,100,200,50,1,true\n\
         DrawAction,21,NORMAL,1140x100x200x50,620x100x384x640,NORMAL\n\
         DrawActionHandle,25,1340,124,0,0,ffa7a7a7,fff5f5f5\n\
         DrawScreenLabel,22,1140,92,ff000000,java.awt.Font[family=Dialog,name=Default,style=plain,size=16],subnav\n\
         \n\
         DrawComponentBackground,100,100,384,640,1,false\n\
         DrawNavScreen,24,101,101,383,639\n\
         DrawComponentFrame,100,100,384,640,1,false\n\
         DrawActionHandle,25,484,420,0,0,ffa7a7a7,fff5f5f5\n\
         DrawIcon,23,100x76x24x24,START_DESTINATION\n\
         DrawScreenLabel,22,132,92,ff000000,java.awt.Font[family=Dialog,name=Default,style=plain,size=16],fragment2\n\
         \n\
         UNClip\n"
    );

    editor.apply_intents([NavIntent::EnterNavigation {
        id: "subnav".to_string(),
    }]);
    assert_eq!(
        editor.display_list().serialize(),
        "Clip,0,0,1104,840\n\
         DrawComponentBackground,620,100,384,640,1,false\n\
         DrawComponentFrame,620,100,384,640,1,false\n\
         DrawAction,21,NORMAL,620x100x384x640,100x100x384x640,NORMAL\n\
         DrawActionHandle,25,1004,420,0,0,ffa7a7a7,fff5f5f5\n\
         DrawScreenLabel,22,620,92,ff000000,java.awt.Font[family=Dialog,name=Default,style=plain,size=16],fragment3\n\
         \n\
         DrawComponentBackground,100,100,384,640,1,false\n\
         DrawComponentFrame,100,100,384,640,1,false\n\
         DrawActionHandle,25,484,420,0,0,ffa7a7a7,fff5f5f5\n\
         DrawScreenLabel,22,100,92,ff000000,java.awt.Font[family=Dialog,name=Default,style=plain,size=16],fragment4\n\
         \n\
         UNClip\n"
    );
}

#[test]
fn leaving_the_nested_graph_restores_the_outer_level() {
    let mut editor = editor(subflow(), resources());
    let outer = editor.display_list().serialize();
    editor.apply_intents([NavIntent::EnterNavigation {
        id: "subnav".to_string(),
    }]);
    assert!(!editor.display_list().serialize().contains("fragment1"));
    editor.apply_intents([NavIntent::ExitNavigation]);
    assert_eq!(editor.display_list().serialize(), outer);
}

fn settle(editor: &mut NavEditor) {
    let deadline = Instant::now() + Duration::from_secs(10);
    while editor.is_loading() && Instant::now() < deadline {
        editor.update();
        thread::sleep(Duration::from_millis(5));
    }
    editor.update();
}

fn screens(editor: &mut NavEditor) -> usize {
    editor
        .display_list()
        .commands()
        .filter(|command| matches!(command, DrawCommand::NavScreen { .. }))
        .count()
}

#[test]
fn preview_failing_while_focus_changes_is_not_drawn() {
    let model = root()
        .children([
            fragment("fragment1").layout("broken"),
            fragment("fragment2").layout("activity_main"),
            navigation("subnav").children([
                fragment("fragment3").layout("broken"),
                fragment("fragment4").layout("activity_main2"),
            ]),
        ])
        .build();
    let mut editor = editor(model, resources().with_layout("broken", b"not a png".to_vec()));
    editor.apply_intents([NavIntent::EnterNavigation {
        id: "subnav".to_string(),
    }]);
    settle(&mut editor);
    assert_eq!(screens(&mut editor), 1);

    editor.apply_intents([NavIntent::ExitNavigation]);
    settle(&mut editor);
    assert_eq!(screens(&mut editor), 1);
}
