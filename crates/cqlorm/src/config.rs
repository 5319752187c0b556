//! Cluster configuration: named hosts and their contact points.
//!
//! ```toml
//! [hosts.default]
//! host = "127.0.0.1"
//!
//! [hosts.analytics]
//! host = ["10.0.0.1", "10.0.0.2"]
//! ```

use crate::error::{OrmError, OrmResult};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::Path;

/// Name used when no host name is given.
pub const DEFAULT_HOST: &str = "default";

/// One contact point or a list of them.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum ContactPoints {
    One(String),
    Many(Vec<String>),
}

impl ContactPoints {
    pub fn to_vec(&self) -> Vec<String> {
        match self {
            ContactPoints::One(host) => vec![host.clone()],
            ContactPoints::Many(hosts) => hosts.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct HostConfig {
    pub host: ContactPoints,
}

impl HostConfig {
    pub fn new(contact_points: Vec<String>) -> Self {
        Self {
            host: ContactPoints::Many(contact_points),
        }
    }

    pub fn contact_points(&self) -> Vec<String> {
        self.host.to_vec()
    }
}

/// All named hosts a [`ConnectionPool`](crate::ConnectionPool) may connect to.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ClusterConfig {
    #[serde(default)]
    pub hosts: BTreeMap<String, HostConfig>,
}

impl ClusterConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a named host (builder form).
    pub fn host(mut self, name: &str, contact_points: &[&str]) -> Self {
        self.hosts.insert(
            name.to_string(),
            HostConfig::new(contact_points.iter().map(|s| s.to_string()).collect()),
        );
        self
    }

    /// Parse and validate a TOML document.
    pub fn from_toml_str(raw: &str) -> OrmResult<Self> {
        let config: ClusterConfig = toml::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a TOML file.
    pub fn from_path(path: impl AsRef<Path>) -> OrmResult<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|e| {
            OrmError::Config(format!(
                "failed to read config file {}: {e}",
                path.display()
            ))
        })?;
        Self::from_toml_str(&raw)
    }

    /// Every host needs at least one non-empty contact point.
    pub fn validate(&self) -> OrmResult<()> {
        for (name, host) in &self.hosts {
            let points = host.contact_points();
            if points.is_empty() || points.iter().any(|p| p.trim().is_empty()) {
                return Err(OrmError::Config(format!(
                    "host '{name}' needs at least one non-empty contact point"
                )));
            }
        }
        Ok(())
    }

    /// Look up a host by name, defaulting to [`DEFAULT_HOST`].
    pub fn get(&self, name: Option<&str>) -> Option<&HostConfig> {
        self.hosts.get(name.unwrap_or(DEFAULT_HOST))
    }
}
