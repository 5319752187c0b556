#![allow(dead_code)]

use cqlorm::{
    ClusterConfig, Connection, ConnectionPool, Connector, ExecOptions, OrmError, OrmResult,
    ResultSet, Row, SchemaMap, Value,
};
use std::sync::{Arc, Mutex};

/// One statement as seen by the driver.
#[derive(Debug, Clone, PartialEq)]
pub struct Call {
    pub cql: String,
    pub params: Vec<Value>,
    pub options: ExecOptions,
}

/// In-memory connection that records every statement and replays canned rows.
#[derive(Default)]
pub struct RecordingConnection {
    pub hosts: Vec<String>,
    calls: Mutex<Vec<Call>>,
    rows: Mutex<Vec<Row>>,
    fail_with: Mutex<Option<String>>,
}

impl RecordingConnection {
    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn last(&self) -> Call {
        self.calls().pop().expect("no statement was executed")
    }

    pub fn respond_with(&self, rows: Vec<Row>) {
        *self.rows.lock().unwrap() = rows;
    }

    pub fn fail_with(&self, message: &str) {
        *self.fail_with.lock().unwrap() = Some(message.to_string());
    }
}

impl Connection for RecordingConnection {
    async fn execute(
        &self,
        cql: &str,
        params: &[Value],
        options: &ExecOptions,
    ) -> OrmResult<ResultSet> {
        self.calls.lock().unwrap().push(Call {
            cql: cql.to_string(),
            params: params.to_vec(),
            options: *options,
        });
        if let Some(message) = self.fail_with.lock().unwrap().clone() {
            return Err(OrmError::query(message));
        }
        Ok(ResultSet::new(self.rows.lock().unwrap().clone()))
    }
}

/// Connector that hands out [`RecordingConnection`]s.
#[derive(Debug, Default)]
pub struct RecordingConnector;

impl Connector for RecordingConnector {
    type Connection = RecordingConnection;

    fn connect(&self, contact_points: &[String]) -> OrmResult<RecordingConnection> {
        Ok(RecordingConnection {
            hosts: contact_points.to_vec(),
            ..RecordingConnection::default()
        })
    }
}

pub fn pool() -> Arc<ConnectionPool<RecordingConnector>> {
    let config = ClusterConfig::from_toml_str(
        r#"
        [hosts.default]
        host = "127.0.0.1"

        [hosts.analytics]
        host = ["10.0.0.1", "10.0.0.2"]
        "#,
    )
    .unwrap();
    Arc::new(ConnectionPool::new(config, RecordingConnector))
}

pub fn schema() -> SchemaMap {
    SchemaMap::new("ks", "t")
        .field("key1", "text", true)
        .field("key2", "text", false)
        .primary_keys(&["key1"])
}
