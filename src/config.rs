//! Layered settings for the parens front end.
//!
//! `defaults/parens.default.yaml` is embedded into the binary so the documented defaults and
//! runtime behavior stay in sync. Callers layer user files and command-line overrides on top
//! of those defaults via [`SettingsLoader`] before deserializing into [`Settings`].

use crate::formats::Format;
use crate::parsing::Matcher;
use config::builder::DefaultState;
use config::{Config, ConfigBuilder, ConfigError, File, FileFormat, ValueKind};
use serde::Deserialize;
use std::path::Path;
use thiserror::Error;
use tracing::debug;

const DEFAULT_YAML: &str = include_str!("../defaults/parens.default.yaml");

/// Top-level settings consumed by the binary.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Settings {
    pub parser: ParserSettings,
    pub output: OutputSettings,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ParserSettings {
    /// Nested rule applications allowed before a parse is aborted.
    pub max_depth: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OutputSettings {
    pub format: Format,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            parser: ParserSettings {
                max_depth: Matcher::DEFAULT_MAX_DEPTH,
            },
            output: OutputSettings {
                format: Format::Tree,
            },
        }
    }
}

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("invalid settings: {0}")]
    Config(#[from] ConfigError),
}

/// Helper for layering user settings over the built-in defaults.
#[derive(Debug, Clone)]
pub struct SettingsLoader {
    builder: ConfigBuilder<DefaultState>,
}

impl SettingsLoader {
    /// Start a loader seeded with the embedded defaults.
    pub fn new() -> Self {
        let builder = Config::builder().add_source(File::from_str(DEFAULT_YAML, FileFormat::Yaml));
        Self { builder }
    }

    /// Layer a settings file. Missing files trigger an error.
    pub fn with_file(mut self, path: impl AsRef<Path>) -> Self {
        debug!(path = %path.as_ref().display(), "layering settings file");
        let source = File::from(path.as_ref())
            .format(FileFormat::Yaml)
            .required(true);
        self.builder = self.builder.add_source(source);
        self
    }

    /// Layer an optional settings file (ignored if the file is absent).
    pub fn with_optional_file(mut self, path: impl AsRef<Path>) -> Self {
        let source = File::from(path.as_ref())
            .format(FileFormat::Yaml)
            .required(false);
        self.builder = self.builder.add_source(source);
        self
    }

    /// Apply a single key/value override, e.g. `output.format` from the command line.
    pub fn set_override<I>(mut self, key: &str, value: I) -> Result<Self, SettingsError>
    where
        I: Into<ValueKind>,
    {
        self.builder = self.builder.set_override(key, value)?;
        Ok(self)
    }

    /// Finalize the builder and deserialize the resulting settings.
    pub fn build(self) -> Result<Settings, SettingsError> {
        Ok(self.builder.build()?.try_deserialize()?)
    }
}

impl Default for SettingsLoader {
    fn default() -> Self {
        Self::new()
    }
}

/// Convenience helper for callers that only need the defaults.
pub fn load_defaults() -> Result<Settings, SettingsError> {
    SettingsLoader::new().build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn settings_file(text: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(text.as_bytes()).unwrap();
        file
    }

    #[test]
    fn loads_default_settings() {
        let settings = load_defaults().expect("defaults to deserialize");
        assert_eq!(settings, Settings::default());
        assert_eq!(settings.parser.max_depth, 256);
        assert_eq!(settings.output.format, Format::Tree);
    }

    #[test]
    fn user_file_overrides_single_keys() {
        let file = settings_file("output:\n  format: json\n");
        let settings = SettingsLoader::new().with_file(file.path()).build().unwrap();
        assert_eq!(settings.output.format, Format::Json);
        assert_eq!(settings.parser.max_depth, 256);
    }

    #[test]
    fn later_layers_win() {
        let first = settings_file("parser:\n  max_depth: 10\n");
        let second = settings_file("parser:\n  max_depth: 20\n");
        let settings = SettingsLoader::new()
            .with_file(first.path())
            .with_file(second.path())
            .build()
            .unwrap();
        assert_eq!(settings.parser.max_depth, 20);
    }

    #[test]
    fn overrides_apply_over_files() {
        let file = settings_file("parser:\n  max_depth: 10\noutput:\n  format: json\n");
        let settings = SettingsLoader::new()
            .with_file(file.path())
            .set_override("parser.max_depth", 32u64)
            .expect("override to apply")
            .set_override("output.format", Format::Yaml.name())
            .expect("override to apply")
            .build()
            .unwrap();
        assert_eq!(settings.parser.max_depth, 32);
        assert_eq!(settings.output.format, Format::Yaml);
    }

    #[test]
    fn empty_file_keeps_defaults() {
        let file = settings_file("");
        let settings = SettingsLoader::new().with_file(file.path()).build().unwrap();
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn missing_required_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing.yaml");
        assert!(SettingsLoader::new().with_file(&path).build().is_err());
    }

    #[test]
    fn missing_optional_file_is_ignored() {
        let dir = tempfile::tempdir().unwrap();
        let settings = SettingsLoader::new()
            .with_optional_file(dir.path().join("missing.yaml"))
            .build()
            .unwrap();
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn rejects_unknown_format() {
        let file = settings_file("output:\n  format: xml\n");
        let err = SettingsLoader::new().with_file(file.path()).build().unwrap_err();
        assert!(matches!(err, SettingsError::Config(_)));
    }

    #[test]
    fn rejects_malformed_yaml() {
        let file = settings_file("parser: [unclosed\n");
        assert!(SettingsLoader::new().with_file(file.path()).build().is_err());
    }
}
