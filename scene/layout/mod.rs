/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

//! Position assignment for scene components.
//!
//! A layout pass assigns every component a position and then normalizes the
//! whole set so its top-left corner sits at the padding origin. Passes are
//! idempotent: running one twice yields the same positions.

use euclid::default::Vector2D;

use super::Scene;

mod grid;
mod manual;

pub use grid::GridLayoutAlgorithm;
pub use manual::{
    LayoutPositions, ManualLayoutAlgorithm, ManualPositions, Position, PositionsError,
    SharedPositions,
};

pub trait LayoutAlgorithm {
    fn layout(&mut self, scene: &mut Scene);
}

/// Translate the scene so its minimum x and y land on `padding`.
pub fn normalize(scene: &mut Scene, padding: i32) {
    let Some(bounds) = scene.bounds() else {
        return;
    };
    let delta = Vector2D::new(padding - bounds.min_x(), padding - bounds.min_y());
    if delta != Vector2D::zero() {
        scene.translate(delta);
    }
}
