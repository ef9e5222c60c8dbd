/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

//! Semantic colors of the navigation editor.
//!
//! Every slot has a light and a dark variant. The palette is read-only once
//! built; [`Palette::global`] is the process-wide instance.

use std::collections::HashMap;
use std::sync::OnceLock;

use super::Color;
use crate::view::Theme;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ColorSlot {
    Frame,
    HighlightedFrame,
    SelectedFrame,
    SubduedFrame,
    Background,
    SubduedBackground,
    ComponentBackground,
    Text,
    SelectedText,
    SubduedText,
    ScreenLabel,
    Action,
    HighlightedAction,
    SelectedAction,
    ActivityBorder,
    PlaceholderBorder,
    PlaceholderText,
    PlaceholderBackground,
}

impl ColorSlot {
    pub const ALL: [ColorSlot; 18] = [
        ColorSlot::Frame,
        ColorSlot::HighlightedFrame,
        ColorSlot::SelectedFrame,
        ColorSlot::SubduedFrame,
        ColorSlot::Background,
        ColorSlot::SubduedBackground,
        ColorSlot::ComponentBackground,
        ColorSlot::Text,
        ColorSlot::SelectedText,
        ColorSlot::SubduedText,
        ColorSlot::ScreenLabel,
        ColorSlot::Action,
        ColorSlot::HighlightedAction,
        ColorSlot::SelectedAction,
        ColorSlot::ActivityBorder,
        ColorSlot::PlaceholderBorder,
        ColorSlot::PlaceholderText,
        ColorSlot::PlaceholderBackground,
    ];
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColorPair {
    pub light: Color,
    pub dark: Color,
}

impl ColorPair {
    pub fn pick(self, theme: Theme) -> Color {
        match theme {
            Theme::Light => self.light,
            Theme::Dark => self.dark,
        }
    }
}

/// Drawn when a slot was never registered.
const FALLBACK: ColorPair = ColorPair {
    light: Color::opaque(0x000000),
    dark: Color::opaque(0xffffff),
};

#[derive(Debug, Clone)]
pub struct Palette {
    colors: HashMap<ColorSlot, ColorPair>,
}

impl Palette {
    pub fn empty() -> Self {
        Self {
            colors: HashMap::new(),
        }
    }

    pub fn global() -> &'static Palette {
        static GLOBAL: OnceLock<Palette> = OnceLock::new();
        GLOBAL.get_or_init(Palette::default)
    }

    pub fn register(&mut self, slot: ColorSlot, light: Color, dark: Color) {
        self.colors.insert(slot, ColorPair { light, dark });
    }

    fn register_opaque(&mut self, slot: ColorSlot, light: u32, dark: u32) {
        self.register(slot, Color::opaque(light), Color::opaque(dark));
    }

    pub fn register_defaults(&mut self) {
        self.register_opaque(ColorSlot::Frame, 0xa7a7a7, 0x2d2f31);
        self.register_opaque(ColorSlot::HighlightedFrame, 0xa7a7a7, 0xa1a1a1);
        self.register_opaque(ColorSlot::SelectedFrame, 0x1886f7, 0x9ccdff);
        self.register_opaque(ColorSlot::SubduedFrame, 0xa7a7a7, 0xa1a1a1);
        self.register_opaque(ColorSlot::Background, 0xf5f5f5, 0x2d2f31);
        self.register_opaque(ColorSlot::SubduedBackground, 0xfcfcfc, 0x313435);
        self.register_opaque(ColorSlot::ComponentBackground, 0xfafafa, 0x515658);
        self.register_opaque(ColorSlot::Text, 0xa7a7a7, 0x888888);
        self.register_opaque(ColorSlot::SelectedText, 0x1886f7, 0x9ccdff);
        self.register_opaque(ColorSlot::SubduedText, 0x656565, 0xbababb);
        self.register_opaque(ColorSlot::ScreenLabel, 0x000000, 0xbababb);
        self.register(ColorSlot::Action, Color(0xb2a7_a7a7), Color(0xb288_8888));
        self.register_opaque(ColorSlot::HighlightedAction, 0xa7a7a7, 0x888888);
        self.register_opaque(ColorSlot::SelectedAction, 0x1886f7, 0x9ccdff);
        self.register_opaque(ColorSlot::ActivityBorder, 0xa7a7a7, 0x2d2f31);
        self.register_opaque(ColorSlot::PlaceholderBorder, 0xcccccc, 0x3f4244);
        self.register_opaque(ColorSlot::PlaceholderText, 0xcccccc, 0x888888);
        self.register_opaque(ColorSlot::PlaceholderBackground, 0xfdfdfd, 0x515658);
    }

    pub fn pair(&self, slot: ColorSlot) -> ColorPair {
        self.colors.get(&slot).copied().unwrap_or(FALLBACK)
    }

    pub fn resolve(&self, slot: ColorSlot, theme: Theme) -> Color {
        self.pair(slot).pick(theme)
    }
}

impl Default for Palette {
    fn default() -> Self {
        let mut palette = Self::empty();
        palette.register_defaults();
        palette
    }
}
