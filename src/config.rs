// Config layer: the YAML file that lives next to the executable and holds
// one entry per user account on the image host.

use crate::error::{Error, Result};
use log::{debug, warn};
use serde::Deserialize;
use std::path::{Path, PathBuf};

pub const CONFIG_FILE_NAME: &str = "config.yml";

/// Environment variable that, when set, points to the config file to use
/// instead of `config.yml` next to the executable.
pub const CONFIG_ENV: &str = "IMGUP_CONFIG";

/// Whole config file. `users` keeps file order, which matters for
/// selection.
#[derive(Deserialize, Debug, Default, Clone)]
pub struct Configuration {
    #[serde(default)]
    pub active: String,
    #[serde(default)]
    pub users: Vec<UserProfile>,
}

/// One account on the image host. Numeric settings are optional; a value
/// of 0 is treated as "not set" when building the upload form.
#[derive(Deserialize, Debug, Default, Clone, PartialEq, Eq)]
pub struct UserProfile {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub host: String,
    #[serde(default)]
    pub token: String,
    #[serde(default)]
    pub strategy: Option<i64>,
    #[serde(default)]
    pub album: Option<i64>,
    #[serde(default)]
    pub permission: Option<i64>,
}

/// Location of the config file: `$IMGUP_CONFIG` if set, otherwise
/// `config.yml` in the directory of the running executable.
pub fn default_path() -> Result<PathBuf> {
    if let Some(path) = std::env::var_os(CONFIG_ENV).filter(|p| !p.is_empty()) {
        return Ok(PathBuf::from(path));
    }
    let exe = std::env::current_exe()
        .map_err(|e| Error::Config(format!("cannot locate executable: {}", e)))?;
    let dir = exe
        .parent()
        .ok_or_else(|| Error::Config(format!("{} has no parent directory", exe.display())))?;
    Ok(dir.join(CONFIG_FILE_NAME))
}

impl Configuration {
    pub fn load(path: &Path) -> Result<Self> {
        debug!("loading config from {}", path.display());
        let data = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("cannot read {}: {}", path.display(), e)))?;
        Self::from_yaml(&data)
    }

    pub fn from_yaml(data: &str) -> Result<Self> {
        serde_yaml::from_str(data).map_err(|e| Error::Config(e.to_string()))
    }

    /// First profile whose name equals `active`. Later duplicates are
    /// ignored.
    pub fn select_profile(&self) -> Option<&UserProfile> {
        self.users.iter().find(|u| u.name == self.active)
    }

    /// Like `select_profile`, but falls back to an empty profile. Uploads
    /// made with the fallback fail at the HTTP layer.
    pub fn active_profile(&self) -> UserProfile {
        match self.select_profile() {
            Some(profile) => profile.clone(),
            None => {
                warn!("no user named {:?} in config, using an empty profile", self.active);
                UserProfile::default()
            }
        }
    }
}

impl UserProfile {
    /// Optional form fields to send with the file, in request order.
    /// Unset and zero values are skipped.
    pub fn form_fields(&self) -> Vec<(&'static str, String)> {
        [
            ("strategy_id", self.strategy),
            ("album_id", self.album),
            ("permission", self.permission),
        ]
        .into_iter()
        .filter_map(|(key, value)| match value {
            Some(v) if v != 0 => Some((key, v.to_string())),
            _ => None,
        })
        .collect()
    }
}
