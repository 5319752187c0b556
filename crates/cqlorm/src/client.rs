//! The connection seam between statement building and the wire.

use crate::error::OrmResult;
use crate::row::{ResultSet, Row};
use crate::value::Value;
use futures_core::Stream;
use futures_util::StreamExt;
use futures_util::stream;
use std::pin::Pin;

/// A boxed stream of result rows.
pub type RowStream<'a> = Pin<Box<dyn Stream<Item = OrmResult<Row>> + Send + 'a>>;

/// Per-request execution options handed to the driver.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExecOptions {
    /// Ask the driver to prepare (and cache) the statement server-side.
    pub prepare: bool,
    /// Page size for streamed reads. `None` leaves the driver default.
    pub fetch_size: Option<i32>,
}

impl Default for ExecOptions {
    fn default() -> Self {
        Self::prepared()
    }
}

impl ExecOptions {
    /// Options used for every statement this crate issues.
    pub const fn prepared() -> Self {
        Self {
            prepare: true,
            fetch_size: None,
        }
    }

    /// Override the page size for streamed reads.
    pub fn fetch_size(mut self, size: i32) -> Self {
        self.fetch_size = Some(size);
        self
    }
}

/// A live handle to the store, supplied by a driver integration.
///
/// Only [`Connection::execute`] is required. `stream` and `each_row` default to
/// buffering one `execute` call; drivers with real paging should override them.
pub trait Connection: Send + Sync {
    /// Run one parameterized statement.
    fn execute(
        &self,
        cql: &str,
        params: &[Value],
        options: &ExecOptions,
    ) -> impl std::future::Future<Output = OrmResult<ResultSet>> + Send;

    /// Run a read and yield rows as they arrive.
    fn stream<'a>(&'a self, cql: String, params: Vec<Value>, options: ExecOptions) -> RowStream<'a> {
        let response = async move { self.execute(&cql, &params, &options).await };
        Box::pin(stream::once(response).flat_map(|res| match res {
            Ok(rs) => stream::iter(rs.rows.into_iter().map(Ok)).left_stream(),
            Err(err) => stream::iter(std::iter::once(Err(err))).right_stream(),
        }))
    }

    /// Run a read and call `on_row(index, row)` for every row. Returns the row count.
    fn each_row<F>(
        &self,
        cql: &str,
        params: &[Value],
        options: &ExecOptions,
        mut on_row: F,
    ) -> impl std::future::Future<Output = OrmResult<u64>> + Send
    where
        F: FnMut(usize, Row) + Send,
    {
        async move {
            let mut rows = self.stream(cql.to_string(), params.to_vec(), *options);
            let mut count = 0usize;
            while let Some(row) = rows.next().await {
                on_row(count, row?);
                count += 1;
            }
            Ok(count as u64)
        }
    }
}
