use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::models::SshHost;

#[derive(Debug, Serialize, Deserialize)]
pub struct AppConfig {
    pub ssh_file_config: String,
}

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct HostsConfig {
    pub hosts: Vec<SshHost>,
}

impl Default for AppConfig {
    fn default() -> Self {
        // Set default ssh config path
        let ssh_config_path = dirs::home_dir()
            .unwrap_or_default()
            .join(".ssh")
            .join("config");
        Self {
            ssh_file_config: ssh_config_path.to_string_lossy().to_string(),
        }
    }
}

/// Owns the application's config directory: the app config itself, the
/// custom host list, and the log directory all live under it.
#[derive(Debug)]
pub struct ConfigManager {
    config_dir: PathBuf,
    config_file: PathBuf,
    hosts_file: PathBuf,
}

impl ConfigManager {
    pub fn new() -> Result<Self> {
        let config_dir = dirs::config_dir()
            .context("Could not find config directory")?
            .join("sshgo");

        Self::with_config_dir(config_dir)
    }

    pub fn with_config_dir(config_dir: PathBuf) -> Result<Self> {
        // Create config directory if it doesn't exist
        if !config_dir.exists() {
            fs::create_dir_all(&config_dir).context("Failed to create config directory")?;
        }

        let config_file = config_dir.join("sshgo.toml");
        let hosts_file = config_dir.join("hosts.toml");

        Ok(Self {
            config_dir,
            config_file,
            hosts_file,
        })
    }

    pub fn get_config_dir(&self) -> &Path {
        &self.config_dir
    }

    pub fn load_config(&self) -> Result<AppConfig> {
        // If config file doesn't exist, create it with default values
        if !self.config_file.exists() {
            let default_config = AppConfig::default();
            self.save_config(&default_config)?;
        }

        let content =
            fs::read_to_string(&self.config_file).context("Failed to read config file")?;

        let config: AppConfig = toml::from_str(&content).context("Failed to parse config file")?;

        Ok(config)
    }

    pub fn save_config(&self, config: &AppConfig) -> Result<()> {
        let toml = toml::to_string_pretty(config).context("Failed to serialize config")?;
        fs::write(&self.config_file, toml).context("Failed to write config file")?;
        Ok(())
    }

    pub fn load_hosts(&self) -> Result<Vec<SshHost>> {
        // If hosts file doesn't exist, return empty vector
        if !self.hosts_file.exists() {
            return Ok(Vec::new());
        }

        let content = fs::read_to_string(&self.hosts_file).context("Failed to read hosts file")?;

        let config: HostsConfig = toml::from_str(&content).context("Failed to parse hosts file")?;

        Ok(config.hosts)
    }

    pub fn save_hosts(&self, hosts: &[SshHost]) -> Result<()> {
        let config = HostsConfig {
            hosts: hosts.to_vec(),
        };

        let toml = toml::to_string_pretty(&config).context("Failed to serialize hosts")?;

        fs::write(&self.hosts_file, toml).context("Failed to write hosts file")?;

        Ok(())
    }

    pub fn get_hosts_path(&self) -> &Path {
        &self.hosts_file
    }
}
