//! DELETE query builder.

use crate::condition::Filter;
use crate::error::OrmResult;
use crate::param::ParamList;
use crate::qb::traits::{BuiltQuery, CqlQb, Fragment};
use crate::schema::{validate_keyspace, validate_table};
use crate::statement;
use crate::value::ValueMap;
use std::fmt;

/// DELETE query builder. Renders `DELETE [USING ...] [WHERE ...]`.
#[derive(Clone, Debug)]
pub struct DeleteQb {
    delete: Fragment,
    using: Option<Fragment>,
    where_: Option<Fragment>,
}

impl DeleteQb {
    pub fn new(keyspace: &str, table: &str) -> OrmResult<Self> {
        validate_keyspace(keyspace)?;
        validate_table(table)?;
        Ok(Self {
            delete: Fragment::text(statement::delete(keyspace, table)),
            using: None,
            where_: None,
        })
    }

    /// Set `USING TIMESTAMP ...`.
    pub fn using_options(mut self, options: &ValueMap) -> OrmResult<Self> {
        self.using = Some(Fragment::text(statement::using_options(options)?));
        Ok(self)
    }

    pub fn filter(mut self, filter: &Filter) -> OrmResult<Self> {
        let mut params = ParamList::new();
        let text = statement::where_clause(filter, &mut params)?;
        self.where_ = (!text.is_empty()).then(|| Fragment::with_params(text, params));
        Ok(self)
    }
}

impl CqlQb for DeleteQb {
    fn validate(&self) -> OrmResult<()> {
        Ok(())
    }

    fn build(&self) -> BuiltQuery {
        BuiltQuery::from_fragments(
            std::iter::once(&self.delete).chain([&self.using, &self.where_].into_iter().flatten()),
        )
    }
}

impl fmt::Display for DeleteQb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_cql())
    }
}
