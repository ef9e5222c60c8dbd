/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

use naveditor::editor::NavIntent;
use naveditor::model::NavModel;
use naveditor::model::builder::{fragment, navigation, root};
use naveditor::scene::Scene;
use naveditor::scene::layout::{
    GridLayoutAlgorithm, LayoutAlgorithm, ManualLayoutAlgorithm, ManualPositions,
};
use rstest::rstest;

use crate::{editor, light_view, render, resources};

const THREE_SCREENS: &str = "Clip,0,0,792,820\n\
     DrawComponentBackground,50,250,192,320,1,false\n\
     DrawNavScreen,24,51,251,191,319\n\
     DrawComponentFrame,50,250,192,320,1,false\n\
     DrawActionHandle,25,242,410,0,0,ffa7a7a7,fff5f5f5\n\
     DrawScreenLabel,22,50,246,ff000000,java.awt.Font[family=Dialog,name=Default,style=plain,size=8],fragment2\n\
     \n\
     DrawComponentBackground,550,450,192,320,1,false\n\
     DrawNavScreen,24,551,451,191,319\n\
     DrawComponentFrame,550,450,192,320,1,false\n\
     DrawActionHandle,25,742,610,0,0,ffa7a7a7,fff5f5f5\n\
     DrawScreenLabel,22,550,446,ff000000,java.awt.Font[family=Dialog,name=Default,style=plain,size=8],fragment3\n\
     \n\
     DrawComponentBackground,250,50,192,320,1,false\n\
     DrawNavScreen,24,251,51,191,319\n\
     DrawComponentFrame,250,50,192,320,1,false\n\
     DrawActionHandle,25,442,210,0,0,ffa7a7a7,fff5f5f5\n\
     DrawIcon,23,250x38x12x12,START_DESTINATION\n\
     DrawScreenLabel,22,266,46,ff000000,java.awt.Font[family=Dialog,name=Default,style=plain,size=8],fragment1\n\
     \n\
     UNClip\n";

fn three_fragments() -> NavModel {
    root()
        .start_destination("fragment1")
        .children([
            fragment("fragment1").layout("activity_main"),
            fragment("fragment2").layout("activity_main"),
            fragment("fragment3").layout("activity_main"),
        ])
        .build()
}

/// Drop each destination at the given spot, save it, then lay out again.
fn placed(model: &NavModel, spots: [(&str, i32, i32); 3]) -> (Scene, ManualLayoutAlgorithm) {
    let resources = resources();
    let mut scene = Scene::build(model, &resources);
    let mut algorithm = ManualLayoutAlgorithm::new(
        "nav.xml",
        ManualPositions::new().shared(),
        GridLayoutAlgorithm::default(),
    );
    algorithm.layout(&mut scene);
    for (id, x, y) in spots {
        scene.component_mut(id).unwrap().set_position(x, y);
        assert!(algorithm.save(&scene, scene.component(id).unwrap()));
    }
    scene.reconcile(model, &resources);
    algorithm.layout(&mut scene);
    (scene, algorithm)
}

#[rstest]
#[case::negative([("fragment1", -100, -200), ("fragment2", -300, 0), ("fragment3", 200, 200)])]
#[case::very_positive([("fragment1", 1900, 1800), ("fragment2", 1700, 2000), ("fragment3", 2200, 2200)])]
fn stored_positions_are_normalized_to_the_padding(#[case] spots: [(&str, i32, i32); 3]) {
    let model = three_fragments();
    let (scene, _) = placed(&model, spots);
    assert_eq!(render(&scene, &light_view()), THREE_SCREENS);
}

#[test]
fn positions_survive_a_save_and_reload() {
    let model = three_fragments();
    let (scene, algorithm) = placed(
        &model,
        [("fragment1", -100, -200), ("fragment2", -300, 0), ("fragment3", 200, 200)],
    );
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("positions.json");
    algorithm.persist(&path).unwrap();

    let reloaded = ManualPositions::load(&path).unwrap();
    let mut fresh = Scene::build(&model, &resources());
    ManualLayoutAlgorithm::new("nav.xml", reloaded.shared(), GridLayoutAlgorithm::default())
        .layout(&mut fresh);
    assert_eq!(render(&fresh, &light_view()), render(&scene, &light_view()));
}

#[test]
fn positions_of_other_files_do_not_apply() {
    let model = three_fragments();
    let (_, algorithm) = placed(
        &model,
        [("fragment1", -100, -200), ("fragment2", -300, 0), ("fragment3", 200, 200)],
    );
    let mut other = Scene::build(&model, &resources());
    ManualLayoutAlgorithm::new("other.xml", algorithm.positions().clone(), GridLayoutAlgorithm::default())
        .layout(&mut other);
    let xs: Vec<i32> = other.components().iter().map(|c| c.position().x).collect();
    assert_eq!(xs, vec![50, 310, 570]);
}

#[test]
fn renamed_destination_keeps_its_spot_through_undo_and_redo() {
    let mut editor = editor(three_fragments(), resources());
    editor.apply_intents([NavIntent::Move {
        id: "fragment3".to_string(),
        x: 900,
        y: 700,
    }]);
    let moved = editor.display_list().serialize();

    editor.apply_intents([NavIntent::Rename {
        old: "fragment3".to_string(),
        new: "details".to_string(),
    }]);
    assert_eq!(editor.display_list().serialize(), moved.replace(",fragment3\n", ",details\n"));

    editor.apply_intents([NavIntent::Undo]);
    assert_eq!(editor.display_list().serialize(), moved);

    editor.apply_intents([NavIntent::Redo]);
    assert_eq!(editor.display_list().serialize(), moved.replace(",fragment3\n", ",details\n"));
}

#[test]
fn nested_positions_follow_a_renamed_navigation() {
    let model = root()
        .children([
            fragment("fragment1"),
            navigation("subnav").children([fragment("inner1"), fragment("inner2")]),
        ])
        .build();
    let mut editor = editor(model, resources());
    let enter = |id: &str| NavIntent::EnterNavigation { id: id.to_string() };

    editor.apply_intents([
        enter("subnav"),
        NavIntent::Move {
            id: "inner2".to_string(),
            x: 700,
            y: 700,
        },
    ]);
    let nested = editor.display_list().serialize();
    editor.apply_intents([
        NavIntent::ExitNavigation,
        NavIntent::Rename {
            old: "subnav".to_string(),
            new: "flow".to_string(),
        },
        enter("flow"),
    ]);
    assert_eq!(editor.display_list().serialize(), nested);

    editor.apply_intents([NavIntent::ExitNavigation, NavIntent::Undo, enter("subnav")]);
    assert_eq!(editor.scene().navigation_path(), ["subnav".to_string()]);
    assert_eq!(editor.display_list().serialize(), nested);
}
