use crate::error::{GitImportError, Result};
use crate::git::BackendKind;
use crate::workspace::{ImportLayout, DEFAULT_WORKSPACE_PREFIX};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// File name looked up in the current directory
pub const LOCAL_CONFIG_FILE: &str = "gitimport.toml";

/// File name looked up in the user config directory
pub const USER_CONFIG_FILE: &str = ".gitimport.toml";

/// Represents the complete configuration for git-import.
///
/// Contains the repository layout to import and git access settings.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Default)]
pub struct Config {
    #[serde(default)]
    pub layout: LayoutConfig,

    #[serde(default)]
    pub git: GitConfig,
}

fn default_source_suffix() -> String {
    "rb".to_string()
}

fn default_optional_dirs() -> Vec<String> {
    vec!["actions".to_string(), "helper".to_string()]
}

fn default_import_dirs() -> Vec<String> {
    vec!["helper".to_string()]
}

fn default_workspace_prefix() -> String {
    DEFAULT_WORKSPACE_PREFIX.to_string()
}

/// Which files are checked out and imported.
///
/// `optional_dirs` are checked out when present; only `import_dirs` are
/// handed to the consumer. By default `actions` is checked out but not imported.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct LayoutConfig {
    #[serde(default = "default_source_suffix")]
    pub source_suffix: String,

    #[serde(default = "default_optional_dirs")]
    pub optional_dirs: Vec<String>,

    #[serde(default = "default_import_dirs")]
    pub import_dirs: Vec<String>,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        LayoutConfig {
            source_suffix: default_source_suffix(),
            optional_dirs: default_optional_dirs(),
            import_dirs: default_import_dirs(),
        }
    }
}

/// Repository access settings.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct GitConfig {
    #[serde(default)]
    pub backend: BackendKind,

    #[serde(default = "default_workspace_prefix")]
    pub workspace_prefix: String,
}

impl Default for GitConfig {
    fn default() -> Self {
        GitConfig {
            backend: BackendKind::default(),
            workspace_prefix: default_workspace_prefix(),
        }
    }
}

fn is_plain_name(name: &str) -> bool {
    !name.is_empty() && !name.contains(['/', '\\']) && name != "." && name != ".."
}

impl Config {
    /// Reject values that would escape the clone directory or match nothing
    pub fn validate(&self) -> Result<()> {
        let suffix = self.layout.source_suffix.trim_start_matches('.');
        if !is_plain_name(suffix) || suffix.contains('*') {
            return Err(GitImportError::config(format!(
                "invalid source_suffix '{}'",
                self.layout.source_suffix
            )));
        }

        for dir in self.layout.optional_dirs.iter().chain(&self.layout.import_dirs) {
            if !is_plain_name(dir) {
                return Err(GitImportError::config(format!(
                    "layout directories must be plain folder names, got '{}'",
                    dir
                )));
            }
        }

        if !is_plain_name(&self.git.workspace_prefix) {
            return Err(GitImportError::config(format!(
                "invalid workspace_prefix '{}'",
                self.git.workspace_prefix
            )));
        }

        Ok(())
    }

    /// The layout the import pipeline runs with
    pub fn layout(&self) -> ImportLayout {
        ImportLayout {
            source_suffix: self.layout.source_suffix.trim_start_matches('.').to_string(),
            optional_dirs: self.layout.optional_dirs.clone(),
            import_dirs: self.layout.import_dirs.clone(),
        }
    }
}

/// Loads configuration from file or returns defaults.
///
/// Attempts to load configuration in the following order:
/// 1. Custom path provided as parameter
/// 2. `gitimport.toml` in current directory
/// 3. `.gitimport.toml` in user config directory
/// 4. Default configuration if no file found
///
/// # Arguments
/// * `config_path` - Optional path to custom configuration file
///
/// # Returns
/// * `Ok(Config)` - Loaded or default configuration
/// * `Err` - If file exists but cannot be read, parsed or validated
pub fn load_config(config_path: Option<&str>) -> Result<Config> {
    let config_str = if let Some(path) = config_path {
        read_config_file(Path::new(path))?
    } else if Path::new(LOCAL_CONFIG_FILE).exists() {
        read_config_file(Path::new(LOCAL_CONFIG_FILE))?
    } else if let Some(config_dir) = dirs::config_dir() {
        let config_path = config_dir.join(USER_CONFIG_FILE);
        if config_path.exists() {
            read_config_file(&config_path)?
        } else {
            return Ok(Config::default());
        }
    } else {
        return Ok(Config::default());
    };

    let config: Config = toml::from_str(&config_str)
        .map_err(|e| GitImportError::config(format!("cannot parse configuration: {}", e)))?;
    config.validate()?;
    Ok(config)
}

fn read_config_file(path: &Path) -> Result<String> {
    fs::read_to_string(path)
        .map_err(|e| GitImportError::config(format!("cannot read {}: {}", path.display(), e)))
}
