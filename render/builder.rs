/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

use euclid::default::{Point2D, Rect, Size2D};

use super::{
    ColorSlot, DRAW_ACTION_HANDLE_LEVEL, DRAW_ACTION_LEVEL, DRAW_ICON_LEVEL, DRAW_NAV_SCREEN_LEVEL,
    DRAW_SCREEN_LABEL_LEVEL, DisplayList, DrawCommand, FontDescriptor, IconKind, Palette, Scale,
    SurfaceRect,
};
use crate::scene::{ActionStyle, PreviewState, Scene, SceneComponent};
use crate::view::NavView;

const ICON_SIZE: i32 = 12;
const START_LABEL_SHIFT: i32 = 16;
const LABEL_BASELINE_GAP: i32 = 4;
const LABEL_FONT_SIZE: i32 = 8;
const HANDLE_INNER_RADIUS: i32 = 4;
const HANDLE_OUTER_RADIUS: i32 = 7;
const TEXT_LEFT_MARGIN: i32 = 4;
const TEXT_RIGHT_MARGIN: i32 = 4;
const TEXT_FONT_SIZE: i32 = 30;

/// Emit the display list for `scene` as seen through `view`.
///
/// Destinations are drawn unselected first, then the start destination, then
/// the selected ones, so emphasized destinations paint on top.
pub fn build_display_list(scene: &Scene, view: &NavView, palette: &Palette) -> DisplayList {
    let mut list = DisplayList::new();
    let (width, height) = match scene.bounds() {
        Some(bounds) => (
            view.to_surface_length(bounds.max_x() + view.padding()),
            view.to_surface_length(bounds.max_y() + view.padding()),
        ),
        None => (0, 0),
    };
    list.push(DrawCommand::Clip {
        rect: Rect::new(view.origin(), Size2D::new(width, height)),
    });

    let components = scene.components();
    let background = components.iter().filter(|c| !c.is_selected() && !c.is_start());
    let start = components.iter().filter(|c| c.is_start());
    let selected = components.iter().filter(|c| c.is_selected() && !c.is_start());
    for component in background.chain(start).chain(selected) {
        emit_component(&mut list, scene, component, view, palette);
        list.end_component();
    }

    list.push(DrawCommand::Unclip);
    list
}

fn emit_component(
    list: &mut DisplayList,
    scene: &Scene,
    component: &SceneComponent,
    view: &NavView,
    palette: &Palette,
) {
    let theme = view.theme();
    let dp = component.rect();
    let rect = view.scene_to_surface(dp);
    let compact = component.is_compact();
    let emphasized = component.is_selected() || component.is_highlighted();
    let stroke = if emphasized { 2 } else { 1 };

    list.push(DrawCommand::ComponentBackground {
        rect,
        stroke,
        compact,
    });
    let has_preview = component
        .preview()
        .is_some_and(|preview| preview.state != PreviewState::Failed);
    if !compact && has_preview {
        list.push(DrawCommand::NavScreen {
            level: DRAW_NAV_SCREEN_LEVEL,
            rect: Rect::new(
                Point2D::new(rect.origin.x + 1, rect.origin.y + 1),
                Size2D::new(rect.size.width - 1, rect.size.height - 1),
            ),
        });
    }
    if compact {
        list.push(DrawCommand::TextRegion {
            rect,
            padding: 0,
            text_height: rect.size.height * 7 / 10,
            compact: true,
            bold: false,
            left_margin: TEXT_LEFT_MARGIN,
            right_margin: TEXT_RIGHT_MARGIN,
            font_size: TEXT_FONT_SIZE,
            scale: Scale(view.scale()),
            text: component.text().to_string(),
        });
    }
    list.push(DrawCommand::ComponentFrame {
        rect,
        stroke,
        compact,
    });

    for action in component.actions() {
        let destination: SurfaceRect = match action.style {
            ActionStyle::SelfAction => rect,
            ActionStyle::Normal => match scene.component(&action.target) {
                Some(target) => view.scene_to_surface(target.rect()),
                None => continue,
            },
        };
        list.push(DrawCommand::Action {
            level: DRAW_ACTION_LEVEL,
            style: action.style,
            source: rect,
            destination,
            end: action.end,
        });
    }

    let (inner_radius, outer_radius) = if emphasized {
        (
            view.to_surface_length(HANDLE_INNER_RADIUS),
            view.to_surface_length(HANDLE_OUTER_RADIUS),
        )
    } else {
        (0, 0)
    };
    let frame_slot = if component.is_selected() {
        ColorSlot::SelectedFrame
    } else if component.is_highlighted() {
        ColorSlot::HighlightedFrame
    } else {
        ColorSlot::Frame
    };
    list.push(DrawCommand::ActionHandle {
        level: DRAW_ACTION_HANDLE_LEVEL,
        x: view.to_surface_x(dp.max_x()),
        y: view.to_surface_y(dp.min_y() + dp.size.height / 2),
        inner_radius,
        outer_radius,
        frame: palette.resolve(frame_slot, theme),
        background: palette.resolve(ColorSlot::Background, theme),
    });

    let icon_size = view.to_surface_length(ICON_SIZE);
    if component.is_start() {
        list.push(DrawCommand::Icon {
            level: DRAW_ICON_LEVEL,
            rect: Rect::new(
                Point2D::new(view.to_surface_x(dp.min_x()), view.to_surface_y(dp.min_y() - ICON_SIZE)),
                Size2D::new(icon_size, icon_size),
            ),
            icon: IconKind::StartDestination,
        });
    }

    let label_shift = if component.is_start() { START_LABEL_SHIFT } else { 0 };
    let label_slot = if component.is_selected() {
        ColorSlot::SelectedText
    } else {
        ColorSlot::ScreenLabel
    };
    list.push(DrawCommand::ScreenLabel {
        level: DRAW_SCREEN_LABEL_LEVEL,
        x: view.to_surface_x(dp.min_x() + label_shift),
        y: view.to_surface_y(dp.min_y() - LABEL_BASELINE_GAP),
        color: palette.resolve(label_slot, theme),
        font: FontDescriptor::dialog(view.to_surface_length(LABEL_FONT_SIZE)),
        text: component.screen_label().to_string(),
    });

    for _ in 0..component.deep_link_count() {
        list.push(DrawCommand::Icon {
            level: DRAW_ICON_LEVEL,
            rect: Rect::new(
                Point2D::new(
                    view.to_surface_x(dp.max_x() - ICON_SIZE),
                    view.to_surface_y(dp.min_y() - ICON_SIZE),
                ),
                Size2D::new(icon_size, icon_size),
            ),
            icon: IconKind::DeepLink,
        });
    }
}
