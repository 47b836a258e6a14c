use gateway::config::Listener;
use serde::Deserialize;
use std::collections::HashSet;
use std::fs::File;
use std::sync::Arc;
use store::memory::MemoryStore;
use store::StoreSet;

#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("could not load config from file: {0}")]
    LoadError(#[from] std::io::Error),
    #[error("could not parse config: {0}")]
    ParseError(#[from] serde_yaml::Error),
    #[error("invalid listener: {0}")]
    InvalidListener(#[from] gateway::config::ValidationError),
    #[error("empty store name")]
    EmptyStoreName,
    #[error("duplicate store name: {0}")]
    DuplicateStore(String),
}

/// Backend implementations a binding name can point at.
#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum StoreType {
    Memory,
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct StoreConfig {
    /// Binding name namespaces refer to.
    pub name: String,
    #[serde(flatten)]
    pub r#type: StoreType,
}

#[derive(Debug, Deserialize)]
pub struct Config {
    pub listener: Listener,
    /// Raw namespace mapping, handed to the gateway unparsed: a JSON array
    /// of `{"id", "binding"}` objects. The registry owns its validation.
    pub namespaces: Option<String>,
    #[serde(default)]
    pub stores: Vec<StoreConfig>,
}

impl Config {
    pub fn from_file(path: &std::path::Path) -> Result<Self, ConfigError> {
        let file = File::open(path)?;
        let config: Config = serde_yaml::from_reader(file)?;
        config.validate()?;

        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.listener.validate()?;

        let mut names = HashSet::new();
        for store in &self.stores {
            if store.name.is_empty() {
                return Err(ConfigError::EmptyStoreName);
            }
            if !names.insert(&store.name) {
                return Err(ConfigError::DuplicateStore(store.name.clone()));
            }
        }

        Ok(())
    }

    /// Construct the backends this process hosts. These live for the whole
    /// process; the gateway's registry only resolves binding names against
    /// them.
    pub fn build_stores(&self) -> StoreSet {
        let mut set = StoreSet::new();
        for store in &self.stores {
            match store.r#type {
                StoreType::Memory => set.insert(&*store.name, Arc::new(MemoryStore::new())),
            }
        }
        set
    }
}
