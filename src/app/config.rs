use crate::app::models::{RuntimeConfig, DEFAULT_THRESHOLD};
use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

/// Settings stored in config.toml. Every key is optional.
#[derive(Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    pub exclude: Option<Vec<String>>,
    pub threshold: Option<f64>,
    pub verbose: Option<bool>,
}

/// Flags from the command line that can override the config file.
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub exclude: Option<Vec<String>>,
    pub threshold: Option<f64>,
    pub verbose: bool,
}

fn default_config_path() -> Result<PathBuf> {
    let home = dirs::home_dir().context("Could not determine home directory")?;
    Ok(home.join(".config").join("code_apply").join("config.toml"))
}

/// Loads the config file. A missing default file means "no settings"; a
/// missing explicitly requested file is an error.
pub fn load_config_file(explicit: Option<&Path>) -> Result<ConfigFile> {
    let config_path = match explicit {
        Some(path) => path.to_path_buf(),
        None => {
            let path = default_config_path()?;
            if !path.exists() {
                return Ok(ConfigFile::default());
            }
            path
        }
    };

    let content = fs::read_to_string(&config_path)
        .context(format!("Failed to read config at {:?}", config_path))?;

    toml::from_str(&content).context(format!("Failed to parse {:?}", config_path))
}

fn merge_vecs(file_vec: Option<Vec<String>>, cli_vec: Option<Vec<String>>) -> Vec<String> {
    let mut combined = file_vec.unwrap_or_default();
    if let Some(mut cli_items) = cli_vec {
        combined.append(&mut cli_items);
    }
    // Deduplicate while keeping order
    let mut seen = std::collections::HashSet::new();
    combined.retain(|item| seen.insert(item.clone()));
    combined
}

/// CLI flag > config file > built-in default.
pub fn merge_config(file: ConfigFile, cli: CliOverrides) -> RuntimeConfig {
    RuntimeConfig {
        exclude: merge_vecs(file.exclude, cli.exclude),
        threshold: cli.threshold.or(file.threshold).unwrap_or(DEFAULT_THRESHOLD),
        verbose: cli.verbose || file.verbose.unwrap_or(false),
    }
}

pub fn resolve_config(explicit: Option<&Path>, cli: CliOverrides) -> Result<RuntimeConfig> {
    let file = load_config_file(explicit)?;
    Ok(merge_config(file, cli))
}
