/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

//! Scene tuning loaded from `naveditor.toml`.
//!
//! Every key is optional; missing keys take the defaults below.
//!
//! ```toml
//! padding = 50
//! column_gap = 68
//! row_gap = 68
//! wrap_width = 1300
//! density = 2.0
//! default_scale = 0.5
//! dark_theme = false
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::scene::FULL_SIZE;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneConfig {
    /// Space kept around the laid-out destinations, in dp.
    pub padding: i32,
    pub column_gap: i32,
    pub row_gap: i32,
    /// Grid rows wrap once this many dp of columns are used.
    pub wrap_width: i32,
    /// Surface pixels per dp at scale 1.0.
    pub density: f64,
    pub default_scale: f64,
    pub dark_theme: bool,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            padding: 50,
            column_gap: 68,
            row_gap: 68,
            wrap_width: 1300,
            density: 2.0,
            default_scale: 0.5,
            dark_theme: false,
        }
    }
}

impl SceneConfig {
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(text).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Grid cells must have room in both directions, and the view needs a
    /// positive scale and density.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if FULL_SIZE.width + self.column_gap <= 0 {
            return Err(ConfigError::Invalid(format!(
                "column_gap {} leaves no room for a grid column",
                self.column_gap
            )));
        }
        if FULL_SIZE.height + self.row_gap <= 0 {
            return Err(ConfigError::Invalid(format!(
                "row_gap {} leaves no room for a grid row",
                self.row_gap
            )));
        }
        if self.wrap_width <= 0 {
            return Err(ConfigError::Invalid(format!(
                "wrap_width must be positive, got {}",
                self.wrap_width
            )));
        }
        if self.padding < 0 {
            return Err(ConfigError::Invalid(format!(
                "padding must not be negative, got {}",
                self.padding
            )));
        }
        for (key, value) in [("density", self.density), ("default_scale", self.default_scale)] {
            if !(value.is_finite() && value > 0.0) {
                return Err(ConfigError::Invalid(format!("{key} must be positive, got {value}")));
            }
        }
        Ok(())
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|e| ConfigError::Io(e.to_string()))?;
        Self::from_toml_str(&text)
    }

    pub fn to_toml_string(&self) -> Result<String, ConfigError> {
        toml::to_string(self).map_err(|e| ConfigError::Parse(e.to_string()))
    }
}

#[derive(Debug)]
pub enum ConfigError {
    Io(String),
    Parse(String),
    Invalid(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "IO error: {e}"),
            ConfigError::Parse(e) => write!(f, "Config parse error: {e}"),
            ConfigError::Invalid(e) => write!(f, "Invalid config: {e}"),
        }
    }
}

impl std::error::Error for ConfigError {}
