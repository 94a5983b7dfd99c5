//! Shared configuration loader for the tkit toolchain.
//!
//! `defaults/tkit.default.toml` is embedded into every binary so that docs and
//! runtime behavior stay in sync. Applications layer user-specific files on top
//! of those defaults via [`Loader`] before deserializing into [`TkitConfig`].

use config::builder::DefaultState;
use config::{Config, ConfigBuilder, ConfigError, File, FileFormat, ValueKind};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::Path;
use tkit_skeleton::encoder::EncoderManager;
use tkit_skeleton::layer::BilingualLayer;
use tkit_skeleton::{LocaleId, OutputOptions};

const DEFAULT_TOML: &str = include_str!("../defaults/tkit.default.toml");

/// Top-level configuration consumed by tkit applications.
#[derive(Debug, Clone, Deserialize)]
pub struct TkitConfig {
    pub writer: WriterConfig,
    pub simplifier: SimplifierConfig,
    pub layer: LayerConfig,
    pub encoders: EncodersConfig,
}

/// Output settings. Empty strings defer to the StartDocument event.
#[derive(Debug, Clone, Deserialize)]
pub struct WriterConfig {
    pub output_locale: String,
    pub output_encoding: String,
    pub line_break: String,
    pub referent_copies: usize,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SimplifierConfig {
    pub enabled: bool,
}

/// Mirrors the markers of [`BilingualLayer`].
#[derive(Debug, Clone, Deserialize)]
pub struct LayerConfig {
    pub enabled: bool,
    pub start_code: String,
    pub end_code: String,
    pub start_inline: String,
    pub end_inline: String,
    pub start_segment: String,
    pub mid_segment: String,
    pub end_segment: String,
    pub escape_braces: bool,
}

impl From<&LayerConfig> for BilingualLayer {
    fn from(config: &LayerConfig) -> Self {
        BilingualLayer {
            start_code: config.start_code.clone(),
            end_code: config.end_code.clone(),
            start_inline: config.start_inline.clone(),
            end_inline: config.end_inline.clone(),
            start_segment: config.start_segment.clone(),
            mid_segment: config.mid_segment.clone(),
            end_segment: config.end_segment.clone(),
            escape_braces: config.escape_braces,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct EncodersConfig {
    pub escape_gt: bool,
    /// MIME type to encoder name.
    #[serde(default)]
    pub mappings: BTreeMap<String, String>,
}

impl From<&EncodersConfig> for EncoderManager {
    fn from(config: &EncodersConfig) -> Self {
        let mut manager = EncoderManager::with_defaults();
        for (mime, name) in &config.mappings {
            manager.set_mapping(mime, name);
        }
        manager.options_mut().escape_gt = config.escape_gt;
        manager
    }
}

impl TkitConfig {
    /// Writer options for this configuration, layer included when enabled.
    pub fn output_options(&self) -> OutputOptions {
        let writer = &self.writer;
        let mut options = OutputOptions {
            locale: non_empty(&writer.output_locale).map(LocaleId::new),
            encoding: non_empty(&writer.output_encoding).map(str::to_string),
            line_break: non_empty(&writer.line_break).map(str::to_string),
            ..OutputOptions::default()
        }
        .with_encoders(EncoderManager::from(&self.encoders))
        .with_referent_copies(writer.referent_copies);
        if self.layer.enabled {
            options = options.with_layer(BilingualLayer::from(&self.layer));
        }
        options
    }
}

fn non_empty(value: &str) -> Option<&str> {
    let value = value.trim();
    (!value.is_empty()).then_some(value)
}

/// Helper for layering user overrides over the built-in defaults.
#[derive(Debug, Clone)]
pub struct Loader {
    builder: ConfigBuilder<DefaultState>,
}

impl Loader {
    /// Start a loader seeded with the embedded defaults.
    pub fn new() -> Self {
        let builder = Config::builder().add_source(File::from_str(DEFAULT_TOML, FileFormat::Toml));
        Self { builder }
    }

    /// Layer a configuration file. Missing files trigger an error.
    pub fn with_file(mut self, path: impl AsRef<Path>) -> Self {
        let source = File::from(path.as_ref())
            .format(FileFormat::Toml)
            .required(true);
        self.builder = self.builder.add_source(source);
        self
    }

    /// Layer an optional configuration file (ignored if the file is absent).
    pub fn with_optional_file(mut self, path: impl AsRef<Path>) -> Self {
        let source = File::from(path.as_ref())
            .format(FileFormat::Toml)
            .required(false);
        self.builder = self.builder.add_source(source);
        self
    }

    /// Apply a single key/value override (useful for CLI settings).
    pub fn set_override<I>(mut self, key: &str, value: I) -> Result<Self, ConfigError>
    where
        I: Into<ValueKind>,
    {
        self.builder = self.builder.set_override(key, value)?;
        Ok(self)
    }

    /// Finalize the builder and deserialize the resulting configuration.
    pub fn build(self) -> Result<TkitConfig, ConfigError> {
        self.builder.build()?.try_deserialize()
    }
}

impl Default for Loader {
    fn default() -> Self {
        Self::new()
    }
}

/// Convenience helper for callers that only need the defaults.
pub fn load_defaults() -> Result<TkitConfig, ConfigError> {
    Loader::new().build()
}
