//! Shared configuration loader for the delta-babel toolchain.
//!
//! `defaults/delta.default.toml` is embedded into every binary so that docs and
//! runtime behavior stay in sync. Applications layer user-specific files on top
//! of those defaults via [`Loader`] before deserializing into [`DeltaConfig`].
//!
//! Besides conversion options, a configuration can declare a format catalog under
//! `[formats.<attribute>]`. Only declarative descriptors can be configured; formats
//! with custom callbacks have to be registered in code.
//!
//! The `config` crate matches keys in lower case, which would fold attribute names such
//! as `codeBlock`. Format tables are therefore read from the same layers with `toml`
//! directly, keeping names exactly as written. A later layer replaces a format of the
//! same name as a whole.

use config::builder::DefaultState;
use config::{Config, ConfigBuilder, File, FileFormat, ValueKind};
use delta_babel::{ConvertOptions, FormatDescriptor, FormatRegistry, UnknownAttributes};
use serde::Deserialize;
use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

pub use config::ConfigError;

const DEFAULT_TOML: &str = include_str!("../defaults/delta.default.toml");

/// Top-level configuration consumed by delta applications.
#[derive(Debug, Clone, Deserialize)]
pub struct DeltaConfig {
    pub convert: ConvertConfig,
    /// Declarative format catalog keyed by attribute name
    #[serde(skip)]
    pub formats: HashMap<String, FormatDescriptor>,
}

impl DeltaConfig {
    /// Registry holding the configured formats
    pub fn registry(&self) -> FormatRegistry {
        self.formats.clone().into_iter().collect()
    }

    /// Engine options for the configured conversion knobs
    pub fn options(&self) -> ConvertOptions {
        ConvertOptions::from(&self.convert)
    }
}

/// Mirrors the knobs exposed by the converter.
#[derive(Debug, Clone, Deserialize)]
pub struct ConvertConfig {
    pub block_tag: String,
    pub inline_tag: String,
    pub unknown_attributes: UnknownAttributes,
    pub embed_placeholder: Option<String>,
}

impl From<ConvertConfig> for ConvertOptions {
    fn from(config: ConvertConfig) -> Self {
        ConvertOptions {
            block_tag: config.block_tag,
            inline_tag: config.inline_tag,
            embed_placeholder: config.embed_placeholder,
            unknown_attributes: config.unknown_attributes,
        }
    }
}

impl From<&ConvertConfig> for ConvertOptions {
    fn from(config: &ConvertConfig) -> Self {
        ConvertOptions {
            block_tag: config.block_tag.clone(),
            inline_tag: config.inline_tag.clone(),
            embed_placeholder: config.embed_placeholder.clone(),
            unknown_attributes: config.unknown_attributes,
        }
    }
}

/// Where a layer's `[formats]` tables come from
#[derive(Debug, Clone)]
enum FormatSource {
    Embedded,
    File { path: PathBuf, required: bool },
}

#[derive(Debug, Default, Deserialize)]
struct FormatTables {
    #[serde(default)]
    formats: HashMap<String, FormatDescriptor>,
}

/// Helper for layering user overrides over the built-in defaults.
#[derive(Debug, Clone)]
pub struct Loader {
    builder: ConfigBuilder<DefaultState>,
    format_sources: Vec<FormatSource>,
}

impl Loader {
    /// Start a loader seeded with the embedded defaults.
    pub fn new() -> Self {
        let builder = Config::builder().add_source(File::from_str(DEFAULT_TOML, FileFormat::Toml));
        Self {
            builder,
            format_sources: vec![FormatSource::Embedded],
        }
    }

    /// Layer a configuration file. Missing files trigger an error.
    pub fn with_file(mut self, path: impl AsRef<Path>) -> Self {
        let source = File::from(path.as_ref())
            .format(FileFormat::Toml)
            .required(true);
        self.builder = self.builder.add_source(source);
        self.format_sources.push(FormatSource::File {
            path: path.as_ref().to_path_buf(),
            required: true,
        });
        self
    }

    /// Layer an optional configuration file (ignored if the file is absent).
    pub fn with_optional_file(mut self, path: impl AsRef<Path>) -> Self {
        let source = File::from(path.as_ref())
            .format(FileFormat::Toml)
            .required(false);
        self.builder = self.builder.add_source(source);
        self.format_sources.push(FormatSource::File {
            path: path.as_ref().to_path_buf(),
            required: false,
        });
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
    pub fn build(self) -> Result<DeltaConfig, ConfigError> {
        let mut config: DeltaConfig = self.builder.build()?.try_deserialize()?;
        config.formats = read_formats(&self.format_sources)?;
        Ok(config)
    }
}

fn read_formats(
    sources: &[FormatSource],
) -> Result<HashMap<String, FormatDescriptor>, ConfigError> {
    let mut formats = HashMap::new();
    for source in sources {
        let text = match source {
            FormatSource::Embedded => DEFAULT_TOML.to_string(),
            FormatSource::File { path, required } => match fs::read_to_string(path) {
                Ok(text) => text,
                Err(err) if err.kind() == io::ErrorKind::NotFound && !required => continue,
                Err(err) => return Err(ConfigError::Foreign(Box::new(err))),
            },
        };
        let tables: FormatTables =
            toml::from_str(&text).map_err(|err| ConfigError::Foreign(Box::new(err)))?;
        formats.extend(tables.formats);
    }
    Ok(formats)
}

impl Default for Loader {
    fn default() -> Self {
        Self::new()
    }
}

/// Convenience helper for callers that only need the defaults.
pub fn load_defaults() -> Result<DeltaConfig, ConfigError> {
    Loader::new().build()
}
