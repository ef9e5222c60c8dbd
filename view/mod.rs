/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

//! Viewport state: zoom, scroll origin and the active theme.
//!
//! Scene geometry is in dp. A dp becomes `scale * density` surface pixels,
//! rounded to the nearest integer, offset by the scroll origin.

use std::sync::atomic::{AtomicBool, Ordering};

use euclid::default::{Point2D, Rect, Size2D};

use crate::config::SceneConfig;
use crate::scene::DpRect;

pub const MIN_SCALE: f64 = 0.1;
pub const MAX_SCALE: f64 = 10.0;

const ZOOM_LADDER: [f64; 12] = [0.1, 0.25, 0.33, 0.5, 0.67, 0.75, 1.0, 1.5, 2.0, 3.0, 5.0, 10.0];

static DARK_THEME: AtomicBool = AtomicBool::new(false);

/// Process-wide theme used by views that have not picked one.
pub fn set_dark_theme(dark: bool) {
    DARK_THEME.store(dark, Ordering::Relaxed);
}

pub fn is_dark_theme() -> bool {
    DARK_THEME.load(Ordering::Relaxed)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Theme {
    Light,
    Dark,
}

impl Theme {
    pub fn current() -> Self {
        if is_dark_theme() { Theme::Dark } else { Theme::Light }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ZoomType {
    /// One scene dp per device-independent pixel.
    Actual,
    In,
    Out,
    /// Largest scale, up to actual size, that shows the whole scene.
    Fit,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NavView {
    scale: f64,
    density: f64,
    padding: i32,
    origin: Point2D<i32>,
    surface_size: Size2D<i32>,
    theme: Option<Theme>,
}

impl NavView {
    pub fn new(config: &SceneConfig) -> Self {
        Self {
            scale: config.default_scale.clamp(MIN_SCALE, MAX_SCALE),
            density: config.density,
            padding: config.padding,
            origin: Point2D::zero(),
            surface_size: Size2D::zero(),
            theme: config.dark_theme.then_some(Theme::Dark),
        }
    }

    pub fn scale(&self) -> f64 {
        self.scale
    }

    pub fn set_scale(&mut self, scale: f64) -> bool {
        let scale = scale.clamp(MIN_SCALE, MAX_SCALE);
        let changed = scale != self.scale;
        self.scale = scale;
        changed
    }

    pub fn density(&self) -> f64 {
        self.density
    }

    /// Padding kept to the right of and below the scene, in dp.
    pub fn padding(&self) -> i32 {
        self.padding
    }

    pub fn origin(&self) -> Point2D<i32> {
        self.origin
    }

    pub fn set_origin(&mut self, x: i32, y: i32) {
        self.origin = Point2D::new(x, y);
    }

    pub fn surface_size(&self) -> Size2D<i32> {
        self.surface_size
    }

    pub fn set_surface_size(&mut self, width: i32, height: i32) {
        self.surface_size = Size2D::new(width, height);
    }

    /// Explicit theme, or the process-wide one.
    pub fn theme(&self) -> Theme {
        self.theme.unwrap_or_else(Theme::current)
    }

    pub fn set_theme(&mut self, theme: Option<Theme>) {
        self.theme = theme;
    }

    /// Apply a zoom step. `scene_extent` is the padded scene size in dp and is
    /// only consulted by [`ZoomType::Fit`]. Returns whether the scale changed.
    pub fn zoom(&mut self, zoom: ZoomType, scene_extent: Option<Size2D<i32>>) -> bool {
        let target = match zoom {
            ZoomType::Actual => 1.0,
            ZoomType::In => ZOOM_LADDER
                .iter()
                .copied()
                .find(|step| *step > self.scale + f64::EPSILON)
                .unwrap_or(MAX_SCALE),
            ZoomType::Out => ZOOM_LADDER
                .iter()
                .rev()
                .copied()
                .find(|step| *step < self.scale - f64::EPSILON)
                .unwrap_or(MIN_SCALE),
            ZoomType::Fit => {
                let Some(extent) = scene_extent.filter(|extent| !extent.is_empty()) else {
                    return false;
                };
                if self.surface_size.is_empty() {
                    return false;
                }
                let horizontal = self.surface_size.width as f64 / (extent.width as f64 * self.density);
                let vertical = self.surface_size.height as f64 / (extent.height as f64 * self.density);
                horizontal.min(vertical).min(1.0)
            }
        };
        self.set_scale(target)
    }

    fn factor(&self) -> f64 {
        self.scale * self.density
    }

    pub fn to_surface_length(&self, dp: i32) -> i32 {
        (dp as f64 * self.factor()).round() as i32
    }

    pub fn to_surface_x(&self, dp: i32) -> i32 {
        self.origin.x + self.to_surface_length(dp)
    }

    pub fn to_surface_y(&self, dp: i32) -> i32 {
        self.origin.y + self.to_surface_length(dp)
    }

    pub fn scene_to_surface(&self, rect: DpRect) -> Rect<i32> {
        Rect::new(
            Point2D::new(self.to_surface_x(rect.origin.x), self.to_surface_y(rect.origin.y)),
            Size2D::new(
                self.to_surface_length(rect.size.width),
                self.to_surface_length(rect.size.height),
            ),
        )
    }
}

impl Default for NavView {
    fn default() -> Self {
        Self::new(&SceneConfig::default())
    }
}
