//! INSERT query builder.

use crate::error::{OrmError, OrmResult};
use crate::param::ParamList;
use crate::qb::traits::{BuiltQuery, CqlQb, Fragment};
use crate::schema::{validate_keyspace, validate_table};
use crate::statement;
use crate::value::ValueMap;
use std::fmt;

/// INSERT query builder. Renders `INSERT [USING ...]`.
#[derive(Clone, Debug)]
pub struct InsertQb {
    keyspace: String,
    table: String,
    insert: Option<Fragment>,
    using: Option<Fragment>,
}

impl InsertQb {
    pub fn new(keyspace: &str, table: &str) -> OrmResult<Self> {
        validate_keyspace(keyspace)?;
        validate_table(table)?;
        Ok(Self {
            keyspace: keyspace.to_string(),
            table: table.to_string(),
            insert: None,
            using: None,
        })
    }

    /// Set the inserted columns and values, in map order.
    pub fn insert_values(mut self, values: &ValueMap) -> OrmResult<Self> {
        let mut params = ParamList::new();
        let text = statement::insert_values(&self.keyspace, &self.table, values, &mut params)?;
        self.insert = Some(Fragment::with_params(text, params));
        Ok(self)
    }

    /// Set `USING TTL ... AND TIMESTAMP ...`.
    pub fn using_options(mut self, options: &ValueMap) -> OrmResult<Self> {
        self.using = Some(Fragment::text(statement::using_options(options)?));
        Ok(self)
    }
}

impl CqlQb for InsertQb {
    fn validate(&self) -> OrmResult<()> {
        if self.insert.is_none() {
            return Err(OrmError::MissingFragment("INSERT"));
        }
        Ok(())
    }

    fn build(&self) -> BuiltQuery {
        BuiltQuery::from_fragments([&self.insert, &self.using].into_iter().flatten())
    }
}

impl fmt::Display for InsertQb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_cql())
    }
}
