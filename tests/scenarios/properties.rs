/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

use naveditor::editor::NavIntent;
use naveditor::model::NavModel;
use naveditor::model::builder::{action, activity, fragment, navigation, root};
use naveditor::render::{DisplayList, DrawCommand, IconKind, Palette, build_display_list};
use naveditor::resources::InMemoryResources;
use naveditor::scene::Scene;
use naveditor::scene::layout::{
    GridLayoutAlgorithm, LayoutAlgorithm, ManualLayoutAlgorithm, ManualPositions, Position,
};
use naveditor::view::ZoomType;
use proptest::prelude::*;

use crate::{editor, light_view};

#[derive(Debug, Clone)]
struct Graph {
    screens: usize,
    actions: Vec<(usize, usize)>,
    start: Option<usize>,
    nested: bool,
}

impl Graph {
    fn id(index: usize) -> String {
        format!("screen{index}")
    }

    fn model(&self) -> NavModel {
        let mut root = root();
        if let Some(start) = self.start {
            root = root.start_destination(&Self::id(start));
        }
        for index in 0..self.screens {
            let id = Self::id(index);
            let mut screen = if index % 3 == 2 { activity(&id) } else { fragment(&id) };
            for (n, (_, target)) in self.actions.iter().enumerate().filter(|(_, (s, _))| *s == index) {
                screen.add_child(action(&format!("action{n}")).destination(&Self::id(*target)));
            }
            root.add_child(screen);
        }
        if self.nested {
            root.add_child(navigation("nested").children([fragment("inner")
                .children([action("out").destination(&Self::id(0))])]));
        }
        root.build()
    }
}

prop_compose! {
    fn graphs()(screens in 1usize..6)(
        screens in Just(screens),
        actions in prop::collection::vec((0..screens, 0..screens), 0..8),
        start in prop::option::of(0..screens),
        nested in any::<bool>(),
    ) -> Graph {
        Graph { screens, actions, start, nested }
    }
}

fn zooms() -> impl Strategy<Value = Vec<ZoomType>> {
    prop::collection::vec(
        prop_oneof![Just(ZoomType::Actual), Just(ZoomType::In), Just(ZoomType::Out)],
        0..4,
    )
}

fn count(list: &DisplayList, predicate: impl Fn(&DrawCommand) -> bool) -> usize {
    list.commands().filter(|command| predicate(command)).count()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn rebuilding_is_idempotent(graph in graphs(), zooms in zooms()) {
        let model = graph.model();
        let resources = InMemoryResources::new();
        let mut view = light_view();
        for zoom in zooms {
            view.zoom(zoom, None);
        }
        let mut scene = Scene::build(&model, &resources);
        let mut layout = GridLayoutAlgorithm::default();
        layout.layout(&mut scene);
        let first = build_display_list(&scene, &view, Palette::global());

        scene.reconcile(&model, &resources);
        layout.layout(&mut scene);
        prop_assert_eq!(build_display_list(&scene, &view, Palette::global()), first);
    }

    #[test]
    fn per_destination_commands_match_visible_count(graph in graphs()) {
        let model = graph.model();
        let mut scene = Scene::build(&model, &InMemoryResources::new());
        GridLayoutAlgorithm::default().layout(&mut scene);
        let list = build_display_list(&scene, &light_view(), Palette::global());
        let visible = scene.components().len();

        prop_assert_eq!(count(&list, |c| matches!(c, DrawCommand::ActionHandle { .. })), visible);
        prop_assert_eq!(count(&list, |c| matches!(c, DrawCommand::ComponentBackground { .. })), visible);
        prop_assert_eq!(count(&list, |c| matches!(c, DrawCommand::ComponentFrame { .. })), visible);
        let start_icons = count(&list, |c| {
            matches!(c, DrawCommand::Icon { icon: IconKind::StartDestination, .. })
        });
        prop_assert!(start_icons <= 1);
        prop_assert_eq!(start_icons, usize::from(graph.start.is_some()));
    }

    #[test]
    fn translating_stored_positions_changes_nothing(
        graph in graphs(),
        spots in prop::collection::vec((-2000i32..2000, -2000i32..2000), 6),
        dx in -5000i32..5000,
        dy in -5000i32..5000,
    ) {
        let model = graph.model();
        let render = |shift: (i32, i32)| {
            let mut positions = ManualPositions::new();
            for index in 0..graph.screens {
                let (x, y) = spots[index];
                let position = Position { x: x + shift.0, y: y + shift.1 };
                positions.set("nav.xml", &[], &Graph::id(index), position);
            }
            if graph.nested {
                let (x, y) = spots[5];
                positions.set("nav.xml", &[], "nested", Position { x: x + shift.0, y: y + shift.1 });
            }
            let mut scene = Scene::build(&model, &InMemoryResources::new());
            ManualLayoutAlgorithm::new("nav.xml", positions.shared(), GridLayoutAlgorithm::default())
                .layout(&mut scene);
            build_display_list(&scene, &light_view(), Palette::global()).serialize()
        };
        let unshifted = render((0, 0));
        let shifted = render((dx, dy));
        prop_assert_eq!(unshifted.lines().skip(1).collect::<Vec<_>>(), shifted.lines().skip(1).collect::<Vec<_>>());
    }

    #[test]
    fn delete_then_undo_is_identity(graph in graphs(), victim in any::<prop::sample::Index>()) {
        let mut editor = editor(graph.model(), InMemoryResources::new());
        let before = editor.display_list().serialize();
        let id = Graph::id(victim.index(graph.screens));

        editor.apply_intents([NavIntent::Delete { ids: vec![id.clone()] }]);
        prop_assert!(editor.scene().component(&id).is_none());
        editor.apply_intents([NavIntent::Undo]);
        prop_assert_eq!(editor.display_list().serialize(), before);
    }
}
