//! SELECT query builder.

use crate::client::{Connection, ExecOptions, RowStream};
use crate::condition::Filter;
use crate::error::{OrmError, OrmResult};
use crate::param::ParamList;
use crate::qb::traits::{BuiltQuery, CqlQb, Fragment};
use crate::row::Row;
use crate::schema::{validate_keyspace, validate_table};
use crate::statement;
use std::fmt;
use std::str::FromStr;

/// ORDER BY direction.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

impl SortOrder {
    pub fn as_str(self) -> &'static str {
        match self {
            SortOrder::Asc => "ASC",
            SortOrder::Desc => "DESC",
        }
    }
}

impl FromStr for SortOrder {
    type Err = OrmError;

    /// Exactly `ASC` or `DESC`; lower-case spellings are rejected.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ASC" => Ok(SortOrder::Asc),
            "DESC" => Ok(SortOrder::Desc),
            other => Err(OrmError::InvalidDirection(other.to_string())),
        }
    }
}

/// SELECT query builder.
///
/// Renders `SELECT [WHERE] [ORDER BY] [LIMIT] [ALLOW FILTERING]` regardless of the order
/// the fragment methods were called in.
#[derive(Clone, Debug)]
pub struct SelectQb {
    keyspace: String,
    table: String,
    /// Projection allow-list from the schema
    readable: Option<Vec<String>>,
    select: Option<Fragment>,
    where_: Option<Fragment>,
    order_by: Option<Fragment>,
    limit: Option<Fragment>,
    allow_filtering: Option<Fragment>,
}

impl SelectQb {
    /// Create a new SELECT builder for `keyspace.table`.
    pub fn new(keyspace: &str, table: &str, readable: Option<&[String]>) -> OrmResult<Self> {
        validate_keyspace(keyspace)?;
        validate_table(table)?;
        if matches!(readable, Some(r) if r.is_empty()) {
            return Err(OrmError::EmptyReadableSet);
        }
        Ok(Self {
            keyspace: keyspace.to_string(),
            table: table.to_string(),
            readable: readable.map(<[String]>::to_vec),
            select: None,
            where_: None,
            order_by: None,
            limit: None,
            allow_filtering: None,
        })
    }

    /// Set the projection. `None` selects the readable columns, or `*`.
    pub fn select(mut self, columns: Option<&[String]>) -> OrmResult<Self> {
        let text = statement::select(
            &self.keyspace,
            &self.table,
            columns,
            self.readable.as_deref(),
        )?;
        self.select = Some(Fragment::text(text));
        Ok(self)
    }

    /// Set the WHERE conditions. An empty filter leaves the statement unfiltered.
    pub fn filter(mut self, filter: &Filter) -> OrmResult<Self> {
        let mut params = ParamList::new();
        let text = statement::where_clause(filter, &mut params)?;
        self.where_ = (!text.is_empty()).then(|| Fragment::with_params(text, params));
        Ok(self)
    }

    pub fn order_by(mut self, field: &str, order: SortOrder) -> OrmResult<Self> {
        self.order_by = Some(Fragment::text(statement::order_by(field, order.as_str())?));
        Ok(self)
    }

    pub fn limit(mut self, size: i64) -> OrmResult<Self> {
        self.limit = Some(Fragment::text(statement::limit(size)?));
        Ok(self)
    }

    /// Append `ALLOW FILTERING`.
    pub fn allow_filtering(mut self) -> Self {
        self.allow_filtering = Some(Fragment::text("ALLOW FILTERING"));
        self
    }

    /// Stream result rows straight from the connection.
    pub fn stream<C: Connection>(self, conn: &C) -> OrmResult<RowStream<'_>> {
        self.validate()?;
        let built = self.build();
        tracing::debug!(target: "cqlorm.query", cql = %built.cql, "stream");
        Ok(conn.stream(built.cql, built.params.into_vec(), ExecOptions::prepared()))
    }

    /// Call `on_row(index, row)` for every result row; returns the row count.
    ///
    /// `options` are passed to the driver as given, except that `prepare` is forced on.
    pub async fn each_row<C, F>(self, conn: &C, options: ExecOptions, on_row: F) -> OrmResult<u64>
    where
        C: Connection,
        F: FnMut(usize, Row) + Send,
    {
        self.validate()?;
        let built = self.build();
        let options = ExecOptions {
            prepare: true,
            ..options
        };
        tracing::debug!(target: "cqlorm.query", cql = %built.cql, "each_row");
        conn.each_row(&built.cql, built.params.as_slice(), &options, on_row)
            .await
            .inspect_err(|e| built.log_failure(e))
    }
}

impl CqlQb for SelectQb {
    fn validate(&self) -> OrmResult<()> {
        if self.select.is_none() {
            return Err(OrmError::MissingFragment("SELECT"));
        }
        Ok(())
    }

    fn build(&self) -> BuiltQuery {
        BuiltQuery::from_fragments(
            [
                &self.select,
                &self.where_,
                &self.order_by,
                &self.limit,
                &self.allow_filtering,
            ]
            .into_iter()
            .flatten(),
        )
    }
}

impl fmt::Display for SelectQb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_cql())
    }
}
