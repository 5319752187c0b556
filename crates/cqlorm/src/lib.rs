//! # cqlorm
//!
//! Schema-aware statement building and CRUD for wide-column (CQL) stores.
//!
//! ## Features
//!
//! - **Parameterized values**: filter, insert and SET values are bound positionally; only integer `TTL`/`TIMESTAMP` options are inlined
//! - **Deterministic output**: clause order follows filter order; builders emit fragments in a fixed order
//! - **Schema restrictions**: readable columns bound the projection, update allow-lists bound SET
//! - **Driver-agnostic**: plug any driver in through the [`Connection`] and [`Connector`] traits
//! - **Explicit pooling**: one [`ConnectionPool`] per application, shared by reference
//!
//! ## Query Builder (qb)
//!
//! ```ignore
//! use cqlorm::qb::{self, CqlQb};
//! use cqlorm::{Filter, ValueMap};
//!
//! let rows = qb::select("ks", "users")?
//!     .select(None)?
//!     .filter(&Filter::new().eq("id", 1))?
//!     .execute(&*conn)
//!     .await?;
//!
//! qb::update("ks", "users")?
//!     .set(&ValueMap::new().set("status", "inactive"))?
//!     .filter(&Filter::new().eq("id", 1))?
//!     .execute(&*conn)
//!     .await?;
//! ```
//!
//! ## Model
//!
//! ```ignore
//! use cqlorm::prelude::*;
//!
//! let pool = Arc::new(ConnectionPool::new(ClusterConfig::from_path("cluster.toml")?, driver));
//! let users = Model::new(SchemaMap::from_json_str(USERS)?, pool, None)?;
//!
//! let active = users
//!     .find(&Filter::new().eq("status", "active"), &FindOptions::new().limit(20))
//!     .await?;
//! ```

pub mod client;
pub mod condition;
pub mod config;
pub mod error;
pub mod model;
pub mod param;
pub mod pool;
pub mod prelude;
pub mod qb;
pub mod row;
pub mod schema;
pub mod statement;
pub mod value;

pub use client::{Connection, ExecOptions, RowStream};
pub use condition::{Clause, ClauseValue, Filter, FilterValue, Op};
pub use config::{ClusterConfig, ContactPoints, DEFAULT_HOST, HostConfig};
pub use error::{OrmError, OrmResult};
pub use model::{FindOptions, Model, WriteOptions};
pub use param::ParamList;
pub use pool::{ConnectionPool, Connector};
pub use row::{FromRow, ResultSet, Row};
pub use schema::{FieldDef, SchemaMap};
pub use value::{FromValue, Value, ValueMap};

// Re-export qb module for easy access
pub use qb::{BuiltQuery, CqlQb, DeleteQb, InsertQb, SelectQb, SortOrder, UpdateQb};
