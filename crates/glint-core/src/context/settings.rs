// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Context configuration, loadable from RON.

use serde::{Deserialize, Serialize};
use std::path::Path;

/// Initial state and behavior switches of a [`Context`](crate::Context).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ContextSettings {
    /// Texture unit used for uploads. Defaults to the last available unit.
    pub default_texture_unit: Option<u32>,
    /// Enable fixed-index primitive restart at creation.
    pub primitive_restart: bool,
    /// Set the `SRC_ALPHA, ONE_MINUS_SRC_ALPHA` blend function at creation.
    pub alpha_blending_func: bool,
    /// Poll the driver error flag after every creation and log what it reports.
    pub check_errors: bool,
}

impl Default for ContextSettings {
    fn default() -> Self {
        Self {
            default_texture_unit: None,
            primitive_restart: true,
            alpha_blending_func: true,
            check_errors: false,
        }
    }
}

/// Errors raised while loading [`ContextSettings`].
#[derive(thiserror::Error, Debug)]
pub enum SettingsError {
    /// The settings file could not be read.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The text is not valid settings RON.
    #[error("Parse error: {0}")]
    Parse(#[from] ron::error::SpannedError),
}

impl ContextSettings {
    /// Parses settings from RON text. Missing fields take their default value.
    pub fn from_ron_str(text: &str) -> Result<Self, SettingsError> {
        Ok(ron::from_str(text)?)
    }

    /// Reads and parses a RON settings file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_ron_str(&text)
    }

    /// Serializes the settings to pretty RON.
    pub fn to_ron_string(&self) -> Result<String, ron::Error> {
        ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_enable_restart_and_blending() {
        let settings = ContextSettings::default();
        assert!(settings.primitive_restart);
        assert!(settings.alpha_blending_func);
        assert!(!settings.check_errors);
        assert_eq!(settings.default_texture_unit, None);
    }

    #[test]
    fn partial_ron_keeps_defaults() {
        let settings =
            ContextSettings::from_ron_str("(default_texture_unit: Some(3), check_errors: true)")
                .unwrap();
        assert_eq!(settings.default_texture_unit, Some(3));
        assert!(settings.check_errors);
        assert!(settings.primitive_restart);
    }

    #[test]
    fn round_trips_through_ron() {
        let settings = ContextSettings {
            default_texture_unit: Some(7),
            primitive_restart: false,
            alpha_blending_func: true,
            check_errors: true,
        };
        let text = settings.to_ron_string().unwrap();
        assert_eq!(ContextSettings::from_ron_str(&text).unwrap(), settings);
    }

    #[test]
    fn unknown_fields_are_rejected() {
        let err = ContextSettings::from_ron_str("(vsync: true)").unwrap_err();
        assert!(matches!(err, SettingsError::Parse(_)));
    }

    #[test]
    fn loads_from_a_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("glint.ron");
        std::fs::write(&path, "(primitive_restart: false)").unwrap();

        let settings = ContextSettings::load(&path).unwrap();

        assert!(!settings.primitive_restart);
        assert!(settings.alpha_blending_func);
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let err = ContextSettings::load("/nonexistent/glint.ron").unwrap_err();
        assert!(matches!(err, SettingsError::Io(_)));
    }
}
