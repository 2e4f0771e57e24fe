//! Configuration management for folio.
//!
//! Parses `folio.toml` configuration files with serde and provides
//! auto-discovery of config files in parent directories.
//!
//! CLI settings can be applied during load via [`CliSettings`]. Precedence
//! is CLI settings, then the config file, then built-in defaults.
//!
//! ## Environment Variable Expansion
//!
//! String configuration values support environment variable expansion:
//!
//! - `${VAR}` - expands to the value of VAR, errors if unset
//! - `${VAR:-default}` - expands to VAR if set, otherwise uses default
//!
//! Path values (`document.styles_dir`, `diagrams.cache_dir`) additionally
//! expand a leading `~` and are resolved relative to the config file.

mod expand;

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

/// Configuration filename to search for.
const CONFIG_FILENAME: &str = "folio.toml";

/// Directory under the system temp dir used when no cache dir is configured.
const DEFAULT_CACHE_DIRNAME: &str = "folio-diagram-cache";

/// Largest accepted diagram scale factor.
const MAX_SCALE: u32 = 10;

/// CLI settings that override configuration file values.
///
/// All fields are optional. Only non-None values override the loaded config.
#[derive(Debug, Default)]
pub struct CliSettings {
    /// Override theme name.
    pub theme: Option<String>,
    /// Override landscape orientation.
    pub landscape: Option<bool>,
    /// Override running page header.
    pub header: Option<String>,
    /// Override styles directory.
    pub styles_dir: Option<PathBuf>,
    /// Override diagram tool executable.
    pub diagram_command: Option<String>,
    /// Override diagram cache directory.
    pub cache_dir: Option<PathBuf>,
    /// Override math tool executable.
    pub math_command: Option<String>,
    /// Override paginated renderer executable.
    pub pdf_command: Option<String>,
}

/// Application configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Document composition settings.
    pub document: DocumentConfig,
    /// Diagram rendering settings.
    pub diagrams: DiagramsConfig,
    /// Math rendering settings.
    pub math: MathConfig,
    /// Paginated rendering settings.
    pub pdf: PdfConfig,

    /// Path to the config file (set after loading).
    #[serde(skip)]
    pub config_path: Option<PathBuf>,
}

/// Document composition configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct DocumentConfig {
    /// Theme stylesheet name.
    pub theme: String,
    /// Lay pages out in landscape orientation.
    pub landscape: bool,
    /// Running page header; empty means the document title.
    pub header: String,
    /// Directory holding `<theme>.css` stylesheets.
    pub styles_dir: PathBuf,
}

impl Default for DocumentConfig {
    fn default() -> Self {
        Self {
            theme: "default".to_owned(),
            landscape: false,
            header: String::new(),
            styles_dir: PathBuf::from("styles"),
        }
    }
}

impl DocumentConfig {
    /// Configured header, or `None` when empty.
    #[must_use]
    pub fn header(&self) -> Option<&str> {
        Some(self.header.as_str()).filter(|header| !header.trim().is_empty())
    }
}

/// Diagram rendering configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct DiagramsConfig {
    /// Diagram tool executable.
    pub command: String,
    /// Visual theme passed to the tool.
    pub theme: String,
    /// Background color passed to the tool.
    pub background: String,
    /// Scale factor passed to the tool.
    pub scale: u32,
    /// Cache directory; empty means `<system temp>/folio-diagram-cache`.
    pub cache_dir: PathBuf,
    /// Render time limit in seconds; 0 means no limit.
    pub timeout_secs: u64,
}

impl Default for DiagramsConfig {
    fn default() -> Self {
        Self {
            command: "mmdc".to_owned(),
            theme: "neutral".to_owned(),
            background: "white".to_owned(),
            scale: 2,
            cache_dir: PathBuf::new(),
            timeout_secs: 0,
        }
    }
}

impl DiagramsConfig {
    /// Effective cache directory.
    #[must_use]
    pub fn cache_dir(&self) -> PathBuf {
        if self.cache_dir.as_os_str().is_empty() {
            std::env::temp_dir().join(DEFAULT_CACHE_DIRNAME)
        } else {
            self.cache_dir.clone()
        }
    }

    /// Effective render time limit.
    #[must_use]
    pub fn timeout(&self) -> Option<Duration> {
        (self.timeout_secs > 0).then(|| Duration::from_secs(self.timeout_secs))
    }
}

/// Math rendering configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct MathConfig {
    /// TeX-to-SVG executable; empty means Unicode fallback only.
    pub command: String,
}

impl MathConfig {
    /// Configured command, or `None` when math rendering is disabled.
    #[must_use]
    pub fn command(&self) -> Option<&str> {
        non_empty(&self.command)
    }
}

/// Paginated rendering configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct PdfConfig {
    /// Renderer executable; empty means the HTML document is written instead.
    pub command: String,
    /// Arguments placed before the input and output paths.
    pub args: Vec<String>,
}

impl PdfConfig {
    /// Configured command, or `None` when no renderer is configured.
    #[must_use]
    pub fn command(&self) -> Option<&str> {
        non_empty(&self.command)
    }
}

fn non_empty(value: &str) -> Option<&str> {
    let value = value.trim();
    (!value.is_empty()).then_some(value)
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
        /// Config field path (e.g., "`diagrams.command`").
        field: String,
        /// Error message (e.g., "${`MMDC`} not set").
        message: String,
    },
}

/// Require a string field to be non-empty.
fn require_non_empty(value: &str, field: &str) -> Result<(), ConfigError> {
    if value.trim().is_empty() {
        return Err(ConfigError::Validation(format!("{field} cannot be empty")));
    }
    Ok(())
}

impl Config {
    /// Load configuration from file with optional CLI settings.
    ///
    /// If `config_path` is provided, loads from that file.
    /// Otherwise, searches for `folio.toml` in current directory and parents,
    /// falling back to defaults relative to the current directory.
    ///
    /// # Errors
    ///
    /// Returns error if explicit `config_path` doesn't exist, parsing or
    /// expansion fails, or the resulting configuration is invalid.
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
        config.validate()?;

        Ok(config)
    }

    /// Apply CLI settings to the configuration.
    fn apply_cli_settings(&mut self, settings: &CliSettings) {
        if let Some(theme) = &settings.theme {
            self.document.theme.clone_from(theme);
        }
        if let Some(landscape) = settings.landscape {
            self.document.landscape = landscape;
        }
        if let Some(header) = &settings.header {
            self.document.header.clone_from(header);
        }
        if let Some(styles_dir) = &settings.styles_dir {
            self.document.styles_dir.clone_from(styles_dir);
        }
        if let Some(command) = &settings.diagram_command {
            self.diagrams.command.clone_from(command);
        }
        if let Some(cache_dir) = &settings.cache_dir {
            self.diagrams.cache_dir.clone_from(cache_dir);
        }
        if let Some(command) = &settings.math_command {
            self.math.command.clone_from(command);
        }
        if let Some(command) = &settings.pdf_command {
            self.pdf.command.clone_from(command);
        }
    }

    /// Search for config file in current directory and parents.
    fn discover_config() -> Option<PathBuf> {
        let current = std::env::current_dir().ok()?;
        Self::discover_from(&current)
    }

    /// Search for config file in `start` and its parents.
    fn discover_from(start: &Path) -> Option<PathBuf> {
        let mut current = start.to_path_buf();
        loop {
            let candidate = current.join(CONFIG_FILENAME);
            if candidate.is_file() {
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
        let mut config = Self::default();
        config.resolve_paths(base);
        config
    }

    /// Load configuration from a specific file.
    fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let mut config: Self = toml::from_str(&content)?;

        // Expand environment variables before path resolution
        config.expand_env_vars()?;

        let config_dir = path.parent().unwrap_or(Path::new("."));
        config.resolve_paths(config_dir);
        config.config_path = Some(path.to_path_buf());

        Ok(config)
    }

    /// Validate configuration values.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` if any validation fails.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.validate_document()?;
        self.validate_diagrams()?;
        Ok(())
    }

    fn validate_document(&self) -> Result<(), ConfigError> {
        require_non_empty(&self.document.theme, "document.theme")
    }

    fn validate_diagrams(&self) -> Result<(), ConfigError> {
        require_non_empty(&self.diagrams.command, "diagrams.command")?;

        let scale = self.diagrams.scale;
        if scale == 0 || scale > MAX_SCALE {
            return Err(ConfigError::Validation(format!(
                "diagrams.scale must be between 1 and {MAX_SCALE}, got {scale}"
            )));
        }

        Ok(())
    }

    /// Expand environment variable references in configuration strings.
    fn expand_env_vars(&mut self) -> Result<(), ConfigError> {
        self.document.theme = expand::expand_env(&self.document.theme, "document.theme")?;
        self.document.header = expand::expand_env(&self.document.header, "document.header")?;
        self.document.styles_dir =
            expand::expand_path(&self.document.styles_dir, "document.styles_dir")?;

        self.diagrams.command = expand::expand_env(&self.diagrams.command, "diagrams.command")?;
        self.diagrams.cache_dir =
            expand::expand_path(&self.diagrams.cache_dir, "diagrams.cache_dir")?;

        self.math.command = expand::expand_env(&self.math.command, "math.command")?;

        self.pdf.command = expand::expand_env(&self.pdf.command, "pdf.command")?;
        for arg in &mut self.pdf.args {
            *arg = expand::expand_env(arg, "pdf.args")?;
        }

        Ok(())
    }

    /// Resolve relative paths against the config directory.
    fn resolve_paths(&mut self, config_dir: &Path) {
        self.document.styles_dir = config_dir.join(&self.document.styles_dir);
        if !self.diagrams.cache_dir.as_os_str().is_empty() {
            self.diagrams.cache_dir = config_dir.join(&self.diagrams.cache_dir);
        }
    }
}
