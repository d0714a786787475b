//! On-disk settings for the `ixichat` binary: username, secret key, contacts.

use std::collections::{BTreeSet, HashSet};
use std::path::{Path, PathBuf};

use anyhow::{anyhow, bail, Context, Result};
use serde::{Deserialize, Serialize};
use tokio::fs;

use crate::identity::{KeyPair, USERID_LENGTH};
use crate::policy::{DefaultUsernamePolicy, UsernamePolicy};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    pub username: String,
    /// 64 hex characters
    pub secret_key: String,
    #[serde(default)]
    pub contacts: BTreeSet<String>,
}

impl Config {
    pub fn new(username: &str, keys: &KeyPair) -> Result<Self> {
        DefaultUsernamePolicy.validate(username)?;
        Ok(Self {
            username: username.to_string(),
            secret_key: keys.secret_hex(),
            contacts: BTreeSet::new(),
        })
    }

    /// `<config_dir>/ixichat/config.toml`
    pub fn default_path() -> PathBuf {
        let config_dir = dirs::config_dir()
            .or_else(|| dirs::home_dir().map(|h| h.join(".config")))
            .unwrap_or_else(|| PathBuf::from(".config"));

        config_dir.join("ixichat").join("config.toml")
    }

    pub async fn load(path: &Path) -> Result<Self> {
        let content = match fs::read_to_string(path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                bail!(
                    "no config at {}, run `ixichat init` first",
                    path.display()
                )
            }
            Err(e) => {
                return Err(e).with_context(|| format!("failed to read {}", path.display()))
            }
        };
        let config: Config = toml::from_str(&content)
            .with_context(|| format!("failed to parse {}", path.display()))?;
        tracing::debug!("loaded config from {}", path.display());
        Ok(config)
    }

    pub async fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await?;
        }

        let content = toml::to_string_pretty(self)?;
        fs::write(path, content)
            .await
            .with_context(|| format!("failed to write {}", path.display()))?;
        tracing::debug!("saved config to {}", path.display());
        Ok(())
    }

    pub fn keypair(&self) -> Result<KeyPair> {
        Ok(KeyPair::from_secret(&self.secret_key)?)
    }

    /// Returns false if the userid was already a contact
    pub fn add_contact(&mut self, userid: &str) -> Result<bool> {
        if userid.chars().count() != USERID_LENGTH {
            return Err(anyhow!(
                "userid must be {} characters, got '{}'",
                USERID_LENGTH,
                userid
            ));
        }
        Ok(self.contacts.insert(userid.to_string()))
    }

    pub fn remove_contact(&mut self, userid: &str) -> bool {
        self.contacts.remove(userid)
    }

    /// Contact set in the shape the message layer takes
    pub fn contact_set(&self) -> HashSet<String> {
        self.contacts.iter().cloned().collect()
    }
}
