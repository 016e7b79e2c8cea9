use std::{
    env,
    path::{Path, PathBuf},
};

use config::{Config, File};
use log::debug;
use serde::Deserialize;

use crate::cli::{Args, Backend};

#[derive(Debug, Deserialize, Clone, Default, PartialEq)]
pub struct Settings {
    pub backend: Option<Backend>,
    pub store_dir: Option<PathBuf>,
    pub remote_url: Option<String>,
    pub remote_token: Option<String>,
    pub collection: Option<String>,
    pub telemetry_url: Option<String>,
}

const CONFIG_FILE_NAME: &str = env!("CARGO_PKG_NAME");

// Function to get the XDG_CONFIG_HOME path
fn get_xdg_config_path() -> Option<PathBuf> {
    // First check XDG_CONFIG_HOME environment variable
    if let Ok(xdg_config) = env::var("XDG_CONFIG_HOME") {
        return Some(PathBuf::from(xdg_config));
    }

    // If XDG_CONFIG_HOME is not set, fall back to $HOME/.config
    if let Ok(home) = env::var("HOME") {
        return Some(PathBuf::from(home).join(".config"));
    }

    None
}

/// Local store directory used when neither the command line nor the config file sets one.
pub fn default_store_dir() -> PathBuf {
    if let Ok(xdg_data) = env::var("XDG_DATA_HOME") {
        return PathBuf::from(xdg_data).join(CONFIG_FILE_NAME);
    }

    if let Ok(home) = env::var("HOME") {
        return PathBuf::from(home)
            .join(".local")
            .join("share")
            .join(CONFIG_FILE_NAME);
    }

    PathBuf::from(".")
}

pub fn load_settings_from(config_path: &Path) -> anyhow::Result<Settings> {
    if !config_path.exists() {
        return Ok(Settings::default());
    }

    Config::builder()
        .add_source(File::from(config_path.to_path_buf()).required(false))
        .build()?
        .try_deserialize()
        .map_err(|e| {
            anyhow::anyhow!(
                "Failed to deserialize config file {}: {}",
                config_path.display(),
                e
            )
        })
}

/// Fill every option the command line left unset from `settings`.
pub fn merge_settings(args: &Args, settings: Settings) -> Args {
    let mut new_args = args.clone();

    macro_rules! apply_if_none {
        ($args:expr, $field:ident, $config:expr) => {
            if $args.$field.is_none() {
                $args.$field = $config.$field;
            }
        };
    }

    apply_if_none!(new_args, backend, settings);
    apply_if_none!(new_args, store_dir, settings);
    apply_if_none!(new_args, remote_url, settings);
    apply_if_none!(new_args, remote_token, settings);
    apply_if_none!(new_args, collection, settings);
    apply_if_none!(new_args, telemetry_url, settings);

    new_args
}

pub fn merge_settings_with_args(args: &Args) -> anyhow::Result<Args> {
    let settings = match get_xdg_config_path() {
        Some(xdg_config) => {
            load_settings_from(&xdg_config.join(CONFIG_FILE_NAME).join("config.toml"))?
        }
        None => Settings::default(),
    };

    let new_args = merge_settings(args, settings);
    debug!("merged backend: {:?}", new_args.backend);

    Ok(new_args)
}
