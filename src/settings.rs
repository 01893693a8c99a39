//! Settings loader.
//!
//! `defaults/rulelex.default.toml` is embedded into the crate so the documented defaults
//! and the runtime defaults cannot drift apart. Callers layer their own files and
//! overrides on top with [`Loader`] before deserializing into [`Settings`].

use crate::engine::RunOptions;
use config::builder::DefaultState;
use config::{Config, ConfigBuilder, File, FileFormat, ValueKind};
use serde::Deserialize;
use std::path::Path;
use std::str::FromStr;

pub use config::ConfigError as SettingsError;

const DEFAULT_TOML: &str = include_str!("../defaults/rulelex.default.toml");

/// Top-level settings.
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub tokenizer: TokenizerSettings,
    pub output: OutputSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TokenizerSettings {
    pub max_null_steps: usize,
    pub coalesce: bool,
}

impl TokenizerSettings {
    pub fn run_options(&self) -> RunOptions {
        RunOptions {
            max_null_steps: self.max_null_steps,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct OutputSettings {
    pub format: OutputFormat,
    pub show_depth: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OutputFormat {
    Text,
    Json,
}

impl OutputFormat {
    pub fn as_str(self) -> &'static str {
        match self {
            OutputFormat::Text => "text",
            OutputFormat::Json => "json",
        }
    }
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "text" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            other => Err(format!("unknown output format `{}`", other)),
        }
    }
}

/// Layers user files and overrides over the built-in defaults.
#[derive(Debug, Clone)]
pub struct Loader {
    builder: ConfigBuilder<DefaultState>,
}

impl Loader {
    /// Starts from the embedded defaults.
    pub fn new() -> Self {
        let builder = Config::builder().add_source(File::from_str(DEFAULT_TOML, FileFormat::Toml));
        Self { builder }
    }

    /// Layers a settings file. A missing file is an error.
    pub fn with_file(self, path: impl AsRef<Path>) -> Self {
        self.layer(path.as_ref(), true)
    }

    /// Layers a settings file if it exists.
    pub fn with_optional_file(self, path: impl AsRef<Path>) -> Self {
        self.layer(path.as_ref(), false)
    }

    fn layer(mut self, path: &Path, required: bool) -> Self {
        let source = File::from(path).format(FileFormat::Toml).required(required);
        self.builder = self.builder.add_source(source);
        self
    }

    /// Pins the tokenizer options of every run, over any file layer.
    pub fn with_run_options(self, options: RunOptions) -> Result<Self, SettingsError> {
        self.set_override("tokenizer.max_null_steps", options.max_null_steps as u64)
    }

    pub fn with_coalesce(self, coalesce: bool) -> Result<Self, SettingsError> {
        self.set_override("tokenizer.coalesce", coalesce)
    }

    pub fn with_output_format(self, format: OutputFormat) -> Result<Self, SettingsError> {
        self.set_override("output.format", format.as_str())
    }

    pub fn with_show_depth(self, show_depth: bool) -> Result<Self, SettingsError> {
        self.set_override("output.show_depth", show_depth)
    }

    /// Overrides one dotted key, e.g. `tokenizer.coalesce`.
    pub fn set_override<I>(mut self, key: &str, value: I) -> Result<Self, SettingsError>
    where
        I: Into<ValueKind>,
    {
        self.builder = self.builder.set_override(key, value)?;
        Ok(self)
    }

    pub fn build(self) -> Result<Settings, SettingsError> {
        self.builder.build()?.try_deserialize()
    }
}

impl Default for Loader {
    fn default() -> Self {
        Self::new()
    }
}

pub fn load_defaults() -> Result<Settings, SettingsError> {
    Loader::new().build()
}
