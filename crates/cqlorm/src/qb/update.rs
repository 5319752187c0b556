//! UPDATE query builder.

use crate::condition::Filter;
use crate::error::{OrmError, OrmResult};
use crate::param::ParamList;
use crate::qb::traits::{BuiltQuery, CqlQb, Fragment};
use crate::schema::{validate_keyspace, validate_restrictions, validate_table};
use crate::statement;
use crate::value::ValueMap;
use std::fmt;

/// UPDATE query builder. Renders `UPDATE [USING ...] [SET ...] [WHERE ...]`.
///
/// When built with a restriction list, `set` rejects any column outside it.
#[derive(Clone, Debug)]
pub struct UpdateQb {
    /// SET allow-list
    restrictions: Option<Vec<String>>,
    update: Fragment,
    using: Option<Fragment>,
    set: Option<Fragment>,
    where_: Option<Fragment>,
}

impl UpdateQb {
    pub fn new(keyspace: &str, table: &str, restrictions: Option<&[String]>) -> OrmResult<Self> {
        validate_keyspace(keyspace)?;
        validate_table(table)?;
        validate_restrictions(restrictions)?;
        Ok(Self {
            restrictions: restrictions.map(<[String]>::to_vec),
            update: Fragment::text(statement::update(keyspace, table)),
            using: None,
            set: None,
            where_: None,
        })
    }

    /// Set `USING TTL ... AND TIMESTAMP ...`.
    pub fn using_options(mut self, options: &ValueMap) -> OrmResult<Self> {
        self.using = Some(Fragment::text(statement::using_options(options)?));
        Ok(self)
    }

    /// Set the assigned columns, in map order.
    pub fn set(mut self, values: &ValueMap) -> OrmResult<Self> {
        let mut params = ParamList::new();
        let text = statement::set(values, &mut params, self.restrictions.as_deref())?;
        self.set = Some(Fragment::with_params(text, params));
        Ok(self)
    }

    pub fn filter(mut self, filter: &Filter) -> OrmResult<Self> {
        let mut params = ParamList::new();
        let text = statement::where_clause(filter, &mut params)?;
        self.where_ = (!text.is_empty()).then(|| Fragment::with_params(text, params));
        Ok(self)
    }
}

impl CqlQb for UpdateQb {
    fn validate(&self) -> OrmResult<()> {
        if self.set.is_none() {
            return Err(OrmError::MissingFragment("SET"));
        }
        Ok(())
    }

    fn build(&self) -> BuiltQuery {
        BuiltQuery::from_fragments(
            std::iter::once(&self.update)
                .chain([&self.using, &self.set, &self.where_].into_iter().flatten()),
        )
    }
}

impl fmt::Display for UpdateQb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_cql())
    }
}
