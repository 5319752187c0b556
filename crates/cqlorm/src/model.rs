//! Schema-bound CRUD facade.
//!
//! A [`Model`] wraps one validated [`SchemaMap`] and a shared [`ConnectionPool`]. Every
//! operation validates its arguments and renders its statement before asking the pool
//! for a connection, so a malformed call never reaches the network.
//!
//! ```ignore
//! let users = Model::new(schema, Arc::clone(&pool), None)?;
//!
//! let rows = users
//!     .find(&Filter::new().eq("id", 1), &FindOptions::new().limit(1))
//!     .await?;
//!
//! users
//!     .update(
//!         &Filter::new().eq("id", 1),
//!         &ValueMap::new().set("name", "alice"),
//!         &WriteOptions::new().ttl(3600),
//!     )
//!     .await?;
//! ```

use crate::condition::{self, Filter};
use crate::error::{OrmError, OrmResult};
use crate::pool::{ConnectionPool, Connector};
use crate::qb::{CqlQb, DeleteQb, InsertQb, SelectQb, SortOrder, UpdateQb};
use crate::row::{FromRow, ResultSet, Row};
use crate::schema::{SchemaMap, validate_keyspace};
use crate::statement;
use crate::value::ValueMap;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;

/// Read options for [`Model::find`] and friends.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FindOptions {
    /// Explicit projection; must be a subset of the schema's readable columns.
    pub columns: Option<Vec<String>>,
    pub limit: Option<i64>,
    pub sort_by: Option<String>,
    /// Only used together with `sort_by`.
    pub sort_order: SortOrder,
    pub allow_filtering: bool,
    /// Flatten driver-native UUID and 64-bit values in every returned row.
    pub post_process: bool,
}

impl FindOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn columns(mut self, columns: &[&str]) -> Self {
        self.columns = Some(columns.iter().map(|c| c.to_string()).collect());
        self
    }

    pub fn limit(mut self, size: i64) -> Self {
        self.limit = Some(size);
        self
    }

    pub fn sort_by(mut self, field: &str, order: SortOrder) -> Self {
        self.sort_by = Some(field.to_string());
        self.sort_order = order;
        self
    }

    pub fn allow_filtering(mut self) -> Self {
        self.allow_filtering = true;
        self
    }

    pub fn post_process(mut self) -> Self {
        self.post_process = true;
        self
    }

    /// Read `{columns, limit, sortBy, sortOrder, allowFiltering, postProcess}`.
    ///
    /// Unrecognized keys are ignored. `null` counts as absent.
    pub fn from_json(value: &serde_json::Value) -> OrmResult<Self> {
        let Some(object) = value.as_object() else {
            return Err(OrmError::InvalidOptions(format!(
                "expected an object, got {value}"
            )));
        };

        let mut options = Self::new();
        for (key, value) in object.iter().filter(|(_, v)| !v.is_null()) {
            match key.as_str() {
                "columns" => options.columns = Some(string_list(key, value)?),
                "limit" => options.limit = Some(statement::parse_limit(value)?),
                "sortBy" => options.sort_by = Some(string_field(key, value)?.to_string()),
                "sortOrder" => options.sort_order = string_field(key, value)?.parse()?,
                "allowFiltering" => options.allow_filtering = bool_field(key, value)?,
                "postProcess" => options.post_process = bool_field(key, value)?,
                _ => {}
            }
        }
        Ok(options)
    }
}

/// USING options for writes: `TTL` and/or `TIMESTAMP`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WriteOptions {
    using: ValueMap,
}

impl WriteOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Time to live in seconds.
    pub fn ttl(mut self, seconds: i64) -> Self {
        self.using.insert("TTL", seconds);
        self
    }

    /// Write timestamp in microseconds.
    pub fn timestamp(mut self, micros: i64) -> Self {
        self.using.insert("TIMESTAMP", micros);
        self
    }

    /// Keep the entries as given; unsupported keys and non-integer values fail when the
    /// statement is built.
    pub fn from_json(value: &serde_json::Value) -> OrmResult<Self> {
        if !value.is_object() {
            return Err(OrmError::InvalidOptions(format!(
                "expected an object, got {value}"
            )));
        }
        Ok(Self {
            using: ValueMap::from_json(value)?,
        })
    }

    pub fn is_empty(&self) -> bool {
        self.using.is_empty()
    }

    pub fn as_map(&self) -> &ValueMap {
        &self.using
    }
}

impl From<ValueMap> for WriteOptions {
    fn from(using: ValueMap) -> Self {
        Self { using }
    }
}

/// CRUD operations for one table.
pub struct Model<K: Connector> {
    schema: SchemaMap,
    pool: Arc<ConnectionPool<K>>,
    host: Option<String>,
}

impl<K: Connector> Model<K> {
    /// Bind a schema to a pool. `host` names the cluster entry to use (`None` = `"default"`).
    pub fn new(schema: SchemaMap, pool: Arc<ConnectionPool<K>>, host: Option<&str>) -> OrmResult<Self> {
        schema.validate()?;
        Ok(Self {
            schema,
            pool,
            host: host.map(str::to_string),
        })
    }

    /// Borrow the schema map.
    pub fn schema_map(&self) -> &SchemaMap {
        &self.schema
    }

    /// Deep copy of the schema map.
    pub fn schema_map_owned(&self) -> SchemaMap {
        self.schema.clone()
    }

    /// Point every later statement at another keyspace.
    pub fn set_keyspace(&mut self, keyspace: &str) -> OrmResult<()> {
        validate_keyspace(keyspace)?;
        self.schema.keyspace = keyspace.to_string();
        Ok(())
    }

    pub fn host(&self) -> Option<&str> {
        self.host.as_deref()
    }

    /// Rows matching `filter`; an empty filter reads the whole table.
    pub async fn find(&self, filter: &Filter, options: &FindOptions) -> OrmResult<Vec<Row>> {
        let query = self.read_query(filter, options)?;
        let conn = self.pool.get_connection(self.host())?;
        let mut rows = query.execute(&*conn).await?.into_rows();
        if options.post_process {
            rows.iter_mut().for_each(Row::post_process);
        }
        Ok(rows)
    }

    /// Every row, with default options.
    pub async fn find_all(&self) -> OrmResult<Vec<Row>> {
        self.find(&Filter::new(), &FindOptions::default()).await
    }

    /// Like [`find`](Self::find), mapping each row to `T`.
    pub async fn find_as<T: FromRow>(&self, filter: &Filter, options: &FindOptions) -> OrmResult<Vec<T>> {
        let rows = self.find(filter, options).await?;
        rows.iter().map(T::from_row).collect()
    }

    /// First matching row, or `None`.
    pub async fn find_one(&self, filter: &Filter, options: &FindOptions) -> OrmResult<Option<Row>> {
        Ok(self.find(filter, options).await?.into_iter().next())
    }

    /// Matching rows keyed by `keys`, where `keys[i]` names the i-th row.
    ///
    /// Keys must be distinct. Fails with [`OrmError::KeyCountMismatch`] when the row count
    /// differs from the key count.
    pub async fn find_map(
        &self,
        keys: &[String],
        filter: &Filter,
        options: &FindOptions,
    ) -> OrmResult<HashMap<String, Row>> {
        if keys.is_empty() {
            return Err(OrmError::EmptyKeys);
        }
        let mut seen = HashSet::with_capacity(keys.len());
        if let Some(dup) = keys.iter().find(|k| !seen.insert(k.as_str())) {
            return Err(OrmError::DuplicateKey(dup.clone()));
        }
        let rows = self.find(filter, options).await?;
        if rows.len() != keys.len() {
            return Err(OrmError::KeyCountMismatch {
                keys: keys.len(),
                rows: rows.len(),
            });
        }
        Ok(keys.iter().cloned().zip(rows).collect())
    }

    pub async fn insert(&self, values: &ValueMap, options: &WriteOptions) -> OrmResult<ResultSet> {
        let mut query = InsertQb::new(&self.schema.keyspace, &self.schema.table)?.insert_values(values)?;
        if !options.is_empty() {
            query = query.using_options(options.as_map())?;
        }
        let conn = self.pool.get_connection(self.host())?;
        query.execute(&*conn).await
    }

    /// Update matching rows. Columns outside the schema's update allow-list are rejected.
    pub async fn update(
        &self,
        filter: &Filter,
        values: &ValueMap,
        options: &WriteOptions,
    ) -> OrmResult<ResultSet> {
        if condition::clauses(filter)?.is_empty() {
            return Err(OrmError::MissingFilter("update"));
        }
        if values.is_empty() {
            return Err(OrmError::EmptyUpdateMap);
        }

        let mut query = UpdateQb::new(
            &self.schema.keyspace,
            &self.schema.table,
            self.schema.update_allow_list(),
        )?
        .set(values)?
        .filter(filter)?;
        if !options.is_empty() {
            query = query.using_options(options.as_map())?;
        }
        let conn = self.pool.get_connection(self.host())?;
        query.execute(&*conn).await
    }

    pub async fn delete(&self, filter: &Filter, options: &WriteOptions) -> OrmResult<ResultSet> {
        if condition::clauses(filter)?.is_empty() {
            return Err(OrmError::MissingFilter("delete"));
        }

        let mut query = DeleteQb::new(&self.schema.keyspace, &self.schema.table)?.filter(filter)?;
        if !options.is_empty() {
            query = query.using_options(options.as_map())?;
        }
        let conn = self.pool.get_connection(self.host())?;
        query.execute(&*conn).await
    }

    fn read_query(&self, filter: &Filter, options: &FindOptions) -> OrmResult<SelectQb> {
        let mut query = SelectQb::new(
            &self.schema.keyspace,
            &self.schema.table,
            self.schema.readable.as_deref(),
        )?
        .select(options.columns.as_deref())?
        .filter(filter)?;

        if let Some(size) = options.limit {
            query = query.limit(size)?;
        }
        if let Some(field) = &options.sort_by {
            query = query.order_by(field, options.sort_order)?;
        }
        if options.allow_filtering {
            query = query.allow_filtering();
        }
        Ok(query)
    }
}

impl<K: Connector> std::fmt::Debug for Model<K> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Model")
            .field("keyspace", &self.schema.keyspace)
            .field("table", &self.schema.table)
            .field("host", &self.host)
            .finish()
    }
}

fn string_field<'a>(key: &str, value: &'a serde_json::Value) -> OrmResult<&'a str> {
    value
        .as_str()
        .ok_or_else(|| OrmError::InvalidOptions(format!("{key} must be a string")))
}

fn bool_field(key: &str, value: &serde_json::Value) -> OrmResult<bool> {
    value
        .as_bool()
        .ok_or_else(|| OrmError::InvalidOptions(format!("{key} must be a boolean")))
}

fn string_list(key: &str, value: &serde_json::Value) -> OrmResult<Vec<String>> {
    let invalid = || OrmError::InvalidOptions(format!("{key} must be a list of strings"));
    value
        .as_array()
        .ok_or_else(invalid)?
        .iter()
        .map(|v| v.as_str().map(str::to_string).ok_or_else(invalid))
        .collect()
}
