use serde::{Deserialize, Serialize};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::error::{ChangelogError, Result};
use crate::provider::ProviderKind;

/// Config file looked up in the current directory
pub const LOCAL_CONFIG_FILE: &str = "changelog-pr.toml";

/// Represents the complete configuration for changelog-pr.
///
/// Selects the hosting provider and holds host and token settings for each one.
#[derive(Debug, Deserialize, Serialize, Clone, Default, PartialEq)]
pub struct Config {
    #[serde(default)]
    pub git_provider: ProviderKind,

    #[serde(default)]
    pub github: HostConfig,

    #[serde(default)]
    pub gitlab: HostConfig,
}

/// Host and access token for one provider
#[derive(Debug, Deserialize, Serialize, Clone, Default, PartialEq)]
pub struct HostConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub host: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
}

/// Values given on the command line that take precedence over the file
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConfigOverrides {
    pub git_provider: Option<ProviderKind>,
    pub github_host: Option<String>,
    pub github_token: Option<String>,
    pub gitlab_host: Option<String>,
    pub gitlab_token: Option<String>,
}

impl Config {
    fn host_config(&self, kind: ProviderKind) -> &HostConfig {
        match kind {
            ProviderKind::GitHub => &self.github,
            ProviderKind::GitLab => &self.gitlab,
        }
    }

    /// Configured host for a provider, or its public default
    pub fn host_for(&self, kind: ProviderKind) -> String {
        self.host_config(kind)
            .host
            .clone()
            .filter(|h| !h.is_empty())
            .unwrap_or_else(|| kind.default_host().to_string())
    }

    /// Apply command line overrides.
    ///
    /// # Returns
    /// `true` if any value changed and the file should be saved
    pub fn apply(&mut self, overrides: ConfigOverrides) -> bool {
        fn set(slot: &mut Option<String>, value: Option<String>) -> bool {
            match value.filter(|v| !v.is_empty()) {
                Some(v) if slot.as_deref() != Some(v.as_str()) => {
                    *slot = Some(v);
                    true
                }
                _ => false,
            }
        }

        let mut changed = false;
        if let Some(kind) = overrides.git_provider {
            changed |= self.git_provider != kind;
            self.git_provider = kind;
        }
        changed |= set(&mut self.github.host, overrides.github_host);
        changed |= set(&mut self.github.token, overrides.github_token);
        changed |= set(&mut self.gitlab.host, overrides.gitlab_host);
        changed |= set(&mut self.gitlab.token, overrides.gitlab_token);
        changed
    }

    /// Resolve the access token for a provider: config file first, then environment.
    ///
    /// # Returns
    /// * `Ok(token)` - Token found
    /// * `Err(Config)` - No token configured or exported
    pub fn resolve_token(&self, kind: ProviderKind) -> Result<String> {
        self.resolve_token_with(kind, |name| std::env::var(name).ok())
    }

    /// Same as [`Config::resolve_token`] with a custom environment lookup
    pub fn resolve_token_with<F>(&self, kind: ProviderKind, env: F) -> Result<String>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(token) = self.host_config(kind).token.clone().filter(|t| !t.is_empty()) {
            return Ok(token);
        }

        env(kind.token_env_var())
            .filter(|t| !t.is_empty())
            .ok_or_else(|| {
                ChangelogError::config(format!(
                    "Please provide a {} token via --{}-token or the {} environment variable",
                    kind,
                    kind,
                    kind.token_env_var()
                ))
            })
    }
}

/// Determines which config file to use.
///
/// Checked in the following order:
/// 1. Custom path provided as parameter
/// 2. `changelog-pr.toml` in current directory
/// 3. `changelog-pr/config.toml` in the user config directory
pub fn config_path(custom: Option<&str>) -> Option<PathBuf> {
    if let Some(path) = custom {
        return Some(PathBuf::from(path));
    }

    let local = Path::new(LOCAL_CONFIG_FILE);
    if local.exists() {
        return Some(local.to_path_buf());
    }

    dirs::config_dir().map(|dir| dir.join("changelog-pr").join("config.toml"))
}

/// Loads configuration from file or returns defaults.
///
/// # Returns
/// * `Ok(Config)` - Loaded or default configuration
/// * `Err` - If file exists but cannot be read or parsed
pub fn load_config(path: Option<&Path>) -> Result<Config> {
    let path = match path {
        Some(path) if path.exists() => path,
        Some(path) => {
            debug!("No config file at {}, using defaults", path.display());
            return Ok(Config::default());
        }
        None => return Ok(Config::default()),
    };

    let config_str = fs::read_to_string(path)?;
    let config: Config = toml::from_str(&config_str)?;
    debug!("Loaded config from {}", path.display());
    Ok(config)
}

/// Writes the configuration, creating the file readable only by its owner
pub fn save_config(config: &Config, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }

    let contents = toml::to_string_pretty(config)?;
    let mut file = open_private(path)?;
    file.write_all(contents.as_bytes())?;
    info!("Saved config to {}", path.display());
    Ok(())
}

/// Open `path` for writing, created (or narrowed) to owner-only access before any write
#[cfg(unix)]
fn open_private(path: &Path) -> Result<fs::File> {
    use std::os::unix::fs::{OpenOptionsExt, PermissionsExt};

    let file = fs::OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .mode(0o600)
        .open(path)?;
    // mode() only applies when the file is created
    file.set_permissions(fs::Permissions::from_mode(0o600))?;
    Ok(file)
}

#[cfg(not(unix))]
fn open_private(path: &Path) -> Result<fs::File> {
    Ok(fs::OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .open(path)?)
}
