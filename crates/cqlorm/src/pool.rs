//! Connection pool keyed by contact-point set.

use crate::client::Connection;
use crate::config::{ClusterConfig, DEFAULT_HOST};
use crate::error::{OrmError, OrmResult};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

/// Opens a driver connection for a set of contact points.
pub trait Connector: Send + Sync {
    type Connection: Connection;

    fn connect(&self, contact_points: &[String]) -> OrmResult<Self::Connection>;
}

/// Owns one connection per distinct contact-point set and hands out shared handles.
///
/// Connections are opened lazily on first request and live as long as the pool.
///
/// # Example
///
/// ```ignore
/// let config = ClusterConfig::from_path("cluster.toml")?;
/// let pool = Arc::new(ConnectionPool::new(config, MyDriver::default()));
/// let conn = pool.get_connection(None)?; // the "default" host
/// ```
pub struct ConnectionPool<K: Connector> {
    config: ClusterConfig,
    connector: K,
    connections: Mutex<HashMap<String, Arc<K::Connection>>>,
}

impl<K: Connector> ConnectionPool<K> {
    pub fn new(config: ClusterConfig, connector: K) -> Self {
        Self {
            config,
            connector,
            connections: Mutex::new(HashMap::new()),
        }
    }

    pub fn config(&self) -> &ClusterConfig {
        &self.config
    }

    /// Get (or open) the connection for a named host; `None` means `"default"`.
    pub fn get_connection(&self, host_name: Option<&str>) -> OrmResult<Arc<K::Connection>> {
        let name = host_name.unwrap_or(DEFAULT_HOST);
        let Some(host) = self.config.get(Some(name)) else {
            tracing::error!(target: "cqlorm.pool", host = name, "no configuration for host");
            return Err(OrmError::UnknownHost(name.to_string()));
        };

        let contact_points = host.contact_points();
        let key = contact_points.join("|");

        let mut connections = self
            .connections
            .lock()
            .map_err(|_| OrmError::Connection("connection cache lock poisoned".to_string()))?;
        if let Some(conn) = connections.get(&key) {
            return Ok(Arc::clone(conn));
        }

        let conn = Arc::new(self.connector.connect(&contact_points).inspect_err(|e| {
            tracing::error!(target: "cqlorm.pool", hosts = %key, error = %e, "connect failed");
        })?);
        tracing::info!(target: "cqlorm.pool", hosts = %key, "connected");
        connections.insert(key, Arc::clone(&conn));
        Ok(conn)
    }

    /// Number of open connections.
    pub fn len(&self) -> usize {
        self.connections.lock().map(|c| c.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<K: Connector + std::fmt::Debug> std::fmt::Debug for ConnectionPool<K> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConnectionPool")
            .field("config", &self.config)
            .field("connector", &self.connector)
            .field("open", &self.len())
            .finish()
    }
}
