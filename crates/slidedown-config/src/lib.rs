//! Configuration management for slidedown.
//!
//! Parses `slidedown.toml` configuration files with serde and provides
//! auto-discovery of config files in parent directories.
//!
//! ```toml
//! [build]
//! source = "slides.sd"
//! output_dir = "html"
//!
//! [assets]
//! dir = "assets"
//!
//! [parser]
//! validate_directives = true
//!
//! [compile]
//! strict = false
//! ```
//!
//! CLI settings can be applied during load via [`CliSettings`].
//!
//! ## Environment Variable Expansion
//!
//! Path values support environment variable expansion:
//!
//! - `${VAR}` - expands to the value of VAR, errors if unset
//! - `${VAR:-default}` - expands to VAR if set, otherwise uses default
//!
//! Expanded fields:
//! - `build.source`
//! - `build.output_dir`
//! - `assets.dir`

mod expand;

use serde::Deserialize;
use std::path::{Path, PathBuf};

/// CLI settings that override configuration file values.
///
/// All fields are optional. Only non-None values override the loaded config.
#[derive(Debug, Default)]
pub struct CliSettings {
    /// Override the source deck.
    pub source: Option<PathBuf>,
    /// Override the output directory.
    pub output_dir: Option<PathBuf>,
    /// Override the assets directory.
    pub assets_dir: Option<PathBuf>,
    /// Override directive name validation.
    pub validate_directives: Option<bool>,
    /// Override strict mode.
    pub strict: Option<bool>,
}

/// Configuration filename to search for.
const CONFIG_FILENAME: &str = "slidedown.toml";

const DEFAULT_SOURCE: &str = "slides.sd";
const DEFAULT_OUTPUT_DIR: &str = "html";
const DEFAULT_ASSETS_DIR: &str = "assets";

/// Application configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Build paths (relative strings from TOML).
    build: BuildConfigRaw,
    /// Assets location (relative string from TOML).
    assets: AssetsConfigRaw,
    /// Parser settings.
    pub parser: ParserConfig,
    /// Compile settings.
    pub compile: CompileConfig,

    /// Resolved build configuration (set after loading).
    #[serde(skip)]
    pub build_resolved: BuildConfig,
    /// Path to the config file (set after loading).
    #[serde(skip)]
    pub config_path: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self::default_with_base(Path::new("."))
    }
}

/// Raw build configuration as parsed from TOML (paths as strings).
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct BuildConfigRaw {
    source: Option<String>,
    output_dir: Option<String>,
}

/// Raw assets configuration as parsed from TOML.
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct AssetsConfigRaw {
    dir: Option<String>,
}

/// Resolved build configuration with absolute paths.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct BuildConfig {
    /// Source deck.
    pub source: PathBuf,
    /// Directory receiving `index.html` and copied assets.
    pub output_dir: PathBuf,
    /// Directory holding `html/` templates and runtime assets.
    pub assets_dir: PathBuf,
}

impl BuildConfig {
    /// Path of the generated page.
    #[must_use]
    pub fn output_file(&self) -> PathBuf {
        self.output_dir.join("index.html")
    }
}

/// Parser settings.
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(default)]
pub struct ParserConfig {
    /// Only treat registered directive names as directives.
    pub validate_directives: bool,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            validate_directives: true,
        }
    }
}

/// Compile settings.
#[derive(Debug, Deserialize, Default, Clone, Copy, PartialEq, Eq)]
#[serde(default)]
pub struct CompileConfig {
    /// Fail the build when compilation produced warnings.
    pub strict: bool,
}

/// Configuration error.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// File not found.
    #[error("Configuration file not found: {}", .0.display())]
    NotFound(PathBuf),
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// TOML parsing error.
    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),
    /// Validation error.
    #[error("Configuration error: {0}")]
    Validation(String),
    /// Environment variable error during expansion.
    #[error("Environment variable error in {field}: {message}")]
    EnvVar {
        /// Config field path (e.g., "`build.output_dir`").
        field: String,
        /// Error message (e.g., "${`OUT_DIR`} not set").
        message: String,
    },
}

/// Require an optional string field to be non-empty when present.
fn require_non_empty(value: Option<&str>, field: &str) -> Result<(), ConfigError> {
    if value.is_some_and(|v| v.trim().is_empty()) {
        return Err(ConfigError::Validation(format!("{field} cannot be empty")));
    }
    Ok(())
}

impl Config {
    /// Load configuration from file with optional CLI settings.
    ///
    /// If `config_path` is provided, loads from that file.
    /// Otherwise, searches for `slidedown.toml` in current directory and parents.
    ///
    /// CLI settings are applied after loading and path resolution, allowing CLI
    /// arguments to take precedence over config file values.
    ///
    /// # Errors
    ///
    /// Returns error if explicit `config_path` doesn't exist or parsing fails.
    pub fn load(
        config_path: Option<&Path>,
        cli_settings: Option<&CliSettings>,
    ) -> Result<Self, ConfigError> {
        let mut config = if let Some(path) = config_path {
            if !path.exists() {
                return Err(ConfigError::NotFound(path.to_path_buf()));
            }
            Self::load_from_file(path)?
        } else if let Some(discovered) = Self::discover_config() {
            Self::load_from_file(&discovered)?
        } else {
            Self::default_with_cwd()
        };

        if let Some(settings) = cli_settings {
            config.apply_cli_settings(settings);
        }

        Ok(config)
    }

    /// Apply CLI settings to the configuration.
    fn apply_cli_settings(&mut self, settings: &CliSettings) {
        if let Some(source) = &settings.source {
            self.build_resolved.source.clone_from(source);
        }
        if let Some(output_dir) = &settings.output_dir {
            self.build_resolved.output_dir.clone_from(output_dir);
        }
        if let Some(assets_dir) = &settings.assets_dir {
            self.build_resolved.assets_dir.clone_from(assets_dir);
        }
        if let Some(validate) = settings.validate_directives {
            self.parser.validate_directives = validate;
        }
        if let Some(strict) = settings.strict {
            self.compile.strict = strict;
        }
    }

    /// Search for config file in current directory and parents.
    fn discover_config() -> Option<PathBuf> {
        Self::discover_config_from(&std::env::current_dir().ok()?)
    }

    /// Search for config file in `start` and its parents.
    fn discover_config_from(start: &Path) -> Option<PathBuf> {
        let mut current = start.to_path_buf();
        loop {
            let candidate = current.join(CONFIG_FILENAME);
            if candidate.exists() {
                return Some(candidate);
            }
            if !current.pop() {
                return None;
            }
        }
    }

    /// Create default config with paths relative to current working directory.
    fn default_with_cwd() -> Self {
        let cwd = std::env::current_dir().unwrap_or_default();
        Self::default_with_base(&cwd)
    }

    /// Create default config with paths relative to given base directory.
    fn default_with_base(base: &Path) -> Self {
        Self {
            build: BuildConfigRaw::default(),
            assets: AssetsConfigRaw::default(),
            parser: ParserConfig::default(),
            compile: CompileConfig::default(),
            build_resolved: BuildConfig {
                source: base.join(DEFAULT_SOURCE),
                output_dir: base.join(DEFAULT_OUTPUT_DIR),
                assets_dir: base.join(DEFAULT_ASSETS_DIR),
            },
            config_path: None,
        }
    }

    /// Load configuration from a specific file.
    fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let mut config: Self = toml::from_str(&content)?;

        // Expand environment variables before path resolution
        config.expand_env_vars()?;
        config.validate()?;

        let config_dir = path.parent().unwrap_or(Path::new("."));
        config.resolve_paths(config_dir);
        config.config_path = Some(path.to_path_buf());

        Ok(config)
    }

    /// Validate configuration values.
    ///
    /// Called automatically after loading from file.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` if any validation fails.
    pub fn validate(&self) -> Result<(), ConfigError> {
        require_non_empty(self.build.source.as_deref(), "build.source")?;
        require_non_empty(self.build.output_dir.as_deref(), "build.output_dir")?;
        require_non_empty(self.assets.dir.as_deref(), "assets.dir")?;
        Ok(())
    }

    /// Expand environment variable references in configuration strings.
    fn expand_env_vars(&mut self) -> Result<(), ConfigError> {
        let expand_field = |value: &mut Option<String>, field: &str| -> Result<(), ConfigError> {
            if let Some(raw) = value {
                *raw = expand::expand_env(raw, field)?;
            }
            Ok(())
        };

        expand_field(&mut self.build.source, "build.source")?;
        expand_field(&mut self.build.output_dir, "build.output_dir")?;
        expand_field(&mut self.assets.dir, "assets.dir")?;

        Ok(())
    }

    /// Resolve relative paths to absolute paths based on config directory.
    fn resolve_paths(&mut self, config_dir: &Path) {
        let resolve = |path: Option<&str>, default: &str| config_dir.join(path.unwrap_or(default));

        self.build_resolved = BuildConfig {
            source: resolve(self.build.source.as_deref(), DEFAULT_SOURCE),
            output_dir: resolve(self.build.output_dir.as_deref(), DEFAULT_OUTPUT_DIR),
            assets_dir: resolve(self.assets.dir.as_deref(), DEFAULT_ASSETS_DIR),
        };
    }
}
