//! Convenient imports for typical `cqlorm` usage.
//!
//! ```ignore
//! use cqlorm::prelude::*;
//! ```

pub use crate::{
    ClusterConfig, Connection, ConnectionPool, Connector, CqlQb, ExecOptions, Filter,
    FindOptions, FromRow, FromValue, Model, OrmError, OrmResult, ResultSet, Row, SchemaMap,
    SortOrder, Value, ValueMap, WriteOptions,
};
pub use std::sync::Arc;
