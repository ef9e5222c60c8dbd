/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

//! Headless navigation-graph editor.
//!
//! A navigation XML document is loaded into a [`model::NavModel`], mirrored for
//! the focused `<navigation>` as a [`scene::Scene`], laid out in dp by
//! [`scene::layout`], and turned into a deterministic
//! [`render::DisplayList`] through a [`view::NavView`]. [`editor::NavEditor`]
//! wires these together behind an intent reducer.

pub mod config;
pub mod editor;
pub mod model;
pub mod preview;
pub mod render;
pub mod resources;
pub mod scene;
pub mod view;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
