//! Trait definitions for query builders.

use crate::client::{Connection, ExecOptions};
use crate::error::OrmResult;
use crate::param::ParamList;
use crate::row::ResultSet;

/// One rendered fragment slot: its text plus the values it binds.
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct Fragment {
    text: String,
    params: ParamList,
}

impl Fragment {
    /// A fragment that binds nothing.
    pub(crate) fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            params: ParamList::new(),
        }
    }

    pub(crate) fn with_params(text: String, params: ParamList) -> Self {
        Self { text, params }
    }
}

/// Base trait for all query builders.
///
/// Builders only hold rendered fragments; `build` assembles them in the builder's fixed
/// emission order, so calling it (or `to_cql`) any number of times gives the same output.
pub trait CqlQb: Send + Sync {
    /// Check that every mandatory fragment is present.
    fn validate(&self) -> OrmResult<()>;

    /// Assemble the statement text and its bind values.
    fn build(&self) -> BuiltQuery;

    /// Debug helper to get the CQL string.
    fn to_cql(&self) -> String {
        self.build().cql
    }

    /// Bind values in placeholder order.
    fn params(&self) -> ParamList {
        self.build().params
    }

    /// Validate, build and run the statement as a prepared statement.
    ///
    /// Driver errors are logged and returned unchanged; on success the raw result
    /// set is returned with no post-processing.
    fn execute<C: Connection>(
        self,
        conn: &C,
    ) -> impl std::future::Future<Output = OrmResult<ResultSet>> + Send
    where
        Self: Sized,
    {
        async move {
            self.validate()?;
            self.build().execute(conn).await
        }
    }
}

/// The result of building a query.
#[derive(Debug, Clone, PartialEq)]
pub struct BuiltQuery {
    pub cql: String,
    pub params: ParamList,
}

impl BuiltQuery {
    /// Create a new built query.
    pub fn new(cql: String, params: ParamList) -> Self {
        Self { cql, params }
    }

    /// Join the set slots with single spaces, concatenating their params in the same order.
    pub(crate) fn from_fragments<'a>(fragments: impl IntoIterator<Item = &'a Fragment>) -> Self {
        let mut parts = Vec::new();
        let mut params = ParamList::new();
        for fragment in fragments {
            parts.push(fragment.text.as_str());
            params.extend(&fragment.params);
        }
        Self::new(parts.join(" "), params)
    }

    /// Run on `conn` with prepare forced on.
    pub async fn execute<C: Connection>(&self, conn: &C) -> OrmResult<ResultSet> {
        tracing::debug!(target: "cqlorm.query", cql = %self.cql, "execute");
        conn.execute(&self.cql, self.params.as_slice(), &ExecOptions::prepared())
            .await
            .inspect_err(|e| self.log_failure(e))
    }

    pub(crate) fn log_failure(&self, err: &crate::error::OrmError) {
        let params = serde_json::to_string(&self.params).unwrap_or_default();
        tracing::error!(
            target: "cqlorm.query",
            cql = %self.cql,
            params = %params,
            "{err}"
        );
    }
}
