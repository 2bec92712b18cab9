//! Configuration for the Qeike level editor
//!
//! This module provides the configuration system with:
//! - XDG-compliant config file location
//! - CLI argument overrides
//! - Environment variable support
//! - Config precedence: CLI > env > file > defaults
//! - Validation with the offending field named in the error

use clap::Parser;
use qeike_core::Dimensions;
use qeike_map::{ExportFormat, DEFAULT_BASE_NAME};
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use crate::prompt;

/// CLI arguments for the editor
#[derive(Parser, Debug, Clone, Default)]
#[command(name = "qeike")]
#[command(version)]
#[command(about = "A terminal editor for small voxel levels", long_about = None)]
pub struct CliArgs {
    /// Path to custom config file
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Directory exported maps are written to
    #[arg(short = 'd', long, value_name = "DIR")]
    pub export_dir: Option<PathBuf>,

    /// Export format (qkm, vxl)
    #[arg(short, long, value_name = "FORMAT")]
    pub format: Option<String>,

    /// Base file name used when the export prompt is left empty
    #[arg(short, long, value_name = "NAME")]
    pub name: Option<String>,

    /// Start editing a new map right away, e.g. 16x16x4
    #[arg(short, long, value_name = "WxHxD")]
    pub size: Option<String>,

    /// Write log output to this file instead of stderr
    #[arg(long, value_name = "FILE")]
    pub log_file: Option<PathBuf>,

    /// Write exports in place instead of through a temporary file
    #[arg(long)]
    pub no_atomic: bool,

    /// Hide the key help panel
    #[arg(long)]
    pub no_help: bool,
}

/// Export configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportConfig {
    /// Base name used for an empty file name
    #[serde(default = "default_name")]
    pub default_name: String,
    /// Directory maps are written to (None = working directory)
    #[serde(default)]
    pub directory: Option<PathBuf>,
    /// Output format
    #[serde(default)]
    pub format: ExportFormat,
    /// Write through a temporary file and rename on success
    #[serde(default = "default_true")]
    pub atomic_write: bool,
}

fn default_name() -> String {
    DEFAULT_BASE_NAME.to_string()
}
fn default_true() -> bool {
    true
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            default_name: default_name(),
            directory: None,
            format: ExportFormat::Qkm,
            atomic_write: true,
        }
    }
}

/// Editor configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EditorConfig {
    /// Show the key help panel beside the map
    #[serde(default = "default_true")]
    pub show_help: bool,
    /// Largest grid (in cells) the dimension prompt accepts
    #[serde(default = "default_max_cells")]
    pub max_cells: usize,
}

fn default_max_cells() -> usize {
    1 << 24
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            show_help: true,
            max_cells: default_max_cells(),
        }
    }
}

/// Editor configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Config {
    /// Export settings
    #[serde(default)]
    pub export: ExportConfig,

    /// Editor settings
    #[serde(default)]
    pub editor: EditorConfig,

    /// Log file (None = stderr)
    #[serde(default)]
    pub log_file: Option<PathBuf>,

    /// Grid size given on the command line; skips the start screen
    #[serde(skip)]
    pub initial_size: Option<Dimensions>,
}

/// Configuration error
#[derive(Debug, Clone)]
pub struct ConfigError {
    pub message: String,
    pub field: Option<String>,
}

impl ConfigError {
    fn field(field: &str, message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            field: Some(field.to_string()),
        }
    }
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if let Some(field) = &self.field {
            write!(f, "Config error in '{}': {}", field, self.message)
        } else {
            write!(f, "Config error: {}", self.message)
        }
    }
}

impl std::error::Error for ConfigError {}

impl Config {
    /// Load configuration with full precedence:
    /// CLI args > environment variables > config file > defaults
    pub fn load_with_args(args: &CliArgs) -> Result<Self, ConfigError> {
        // Start with defaults
        let mut config = Config::default();

        // Load from config file (if exists)
        let config_path = args.config.clone().or_else(Self::default_config_path);
        if let Some(path) = &config_path {
            if path.exists() {
                match Self::load_from_file(path) {
                    Ok(file_config) => config = file_config,
                    Err(e) => {
                        log::warn!("Failed to load config from {:?}: {}", path, e);
                        // Continue with defaults if config file is invalid
                    }
                }
            } else if args.config.is_some() {
                log::warn!("Config file {:?} does not exist, using defaults", path);
            }
        }

        // Apply environment variables
        config.apply_env_vars();

        // Apply CLI arguments (highest priority)
        config.apply_cli_args(args)?;

        // Validate the final configuration
        config.validate()?;

        Ok(config)
    }

    /// Load configuration from a specific file
    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|e| ConfigError {
            message: format!("Failed to read config file: {}", e),
            field: None,
        })?;

        toml::from_str(&content).map_err(|e| ConfigError {
            message: format!("Failed to parse config file: {}", e),
            field: None,
        })
    }

    /// Apply environment variables to config
    fn apply_env_vars(&mut self) {
        if let Ok(val) = env::var("QEIKE_EXPORT_DIR") {
            self.export.directory = Some(PathBuf::from(val));
        }
        if let Ok(val) = env::var("QEIKE_EXPORT_FORMAT") {
            match ExportFormat::from_str(&val) {
                Some(format) => self.export.format = format,
                None => log::warn!("Ignoring unknown QEIKE_EXPORT_FORMAT {:?}", val),
            }
        }
        if let Ok(val) = env::var("QEIKE_DEFAULT_NAME") {
            self.export.default_name = val;
        }
        if let Ok(val) = env::var("QEIKE_ATOMIC_WRITE") {
            self.export.atomic_write = val == "1" || val.to_lowercase() == "true";
        }
    }

    /// Apply CLI arguments to config
    fn apply_cli_args(&mut self, args: &CliArgs) -> Result<(), ConfigError> {
        if let Some(dir) = &args.export_dir {
            self.export.directory = Some(dir.clone());
        }
        if let Some(format_str) = &args.format {
            self.export.format = ExportFormat::from_str(format_str).ok_or_else(|| {
                ConfigError::field(
                    "format",
                    format!("Unknown format '{}'. Expected qkm or vxl", format_str),
                )
            })?;
        }
        if let Some(name) = &args.name {
            self.export.default_name = name.clone();
        }
        if let Some(size) = &args.size {
            let dims = prompt::parse_size(size).map_err(|e| ConfigError::field("size", e.to_string()))?;
            self.initial_size = Some(dims);
        }
        if let Some(path) = &args.log_file {
            self.log_file = Some(path.clone());
        }
        if args.no_atomic {
            self.export.atomic_write = false;
        }
        if args.no_help {
            self.editor.show_help = false;
        }
        Ok(())
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        let name = self.export.default_name.trim();
        if name.is_empty() {
            return Err(ConfigError::field(
                "export.default_name",
                "Default file name must not be empty",
            ));
        }
        if name.contains('/') || name.contains('\\') {
            return Err(ConfigError::field(
                "export.default_name",
                "Default file name must not contain path separators (use export.directory)",
            ));
        }

        if self.editor.max_cells == 0 {
            return Err(ConfigError::field(
                "editor.max_cells",
                "Maximum grid size must be at least 1 cell",
            ));
        }

        if let Some(dims) = self.initial_size {
            prompt::check_grid_size(dims, self.editor.max_cells)
                .map_err(|e| ConfigError::field("size", e.to_string()))?;
        }

        Ok(())
    }

    /// Get the default configuration file path
    pub fn default_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("qeike").join("config.toml"))
    }
}
