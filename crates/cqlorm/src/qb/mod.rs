//! Query builders for cqlorm.
//!
//! Each builder owns one rendered fragment per clause slot. Fragment methods consume the
//! builder and hand it back on success, so a builder that failed mid-chain is dropped
//! rather than left half-built. Output order is fixed per statement type; call order
//! never changes it.
//!
//! # Usage
//!
//! ```ignore
//! use cqlorm::qb::{self, CqlQb};
//! use cqlorm::{Filter, ValueMap};
//!
//! // SELECT
//! let rows = qb::select("ks", "users")?
//!     .select(None)?
//!     .filter(&Filter::new().in_list("id", vec![1, 2]))?
//!     .limit(10)?
//!     .execute(&*conn)
//!     .await?;
//!
//! // INSERT
//! qb::insert("ks", "users")?
//!     .insert_values(&ValueMap::new().set("id", 3).set("name", "carol"))?
//!     .using_options(&ValueMap::new().set("TTL", 3600))?
//!     .execute(&*conn)
//!     .await?;
//!
//! // UPDATE
//! qb::update("ks", "users")?
//!     .set(&ValueMap::new().set("name", "caroline"))?
//!     .filter(&Filter::new().eq("id", 3))?
//!     .execute(&*conn)
//!     .await?;
//!
//! // DELETE
//! qb::delete("ks", "users")?
//!     .filter(&Filter::new().eq("id", 3))?
//!     .execute(&*conn)
//!     .await?;
//! ```

mod delete;
mod insert;
mod select;
mod traits;
mod update;

pub use delete::DeleteQb;
pub use insert::InsertQb;
pub use select::{SelectQb, SortOrder};
pub use traits::{BuiltQuery, CqlQb};
pub use update::UpdateQb;

/// Create a SELECT builder with no readable restriction.
///
/// # Example
/// ```ignore
/// let qb = cqlorm::qb::select("ks", "users")?.select(None)?;
/// assert_eq!(qb.to_cql(), "SELECT * FROM ks.users");
/// ```
pub fn select(keyspace: &str, table: &str) -> crate::OrmResult<SelectQb> {
    SelectQb::new(keyspace, table, None)
}

/// Create an INSERT builder.
pub fn insert(keyspace: &str, table: &str) -> crate::OrmResult<InsertQb> {
    InsertQb::new(keyspace, table)
}

/// Create an UPDATE builder with no SET restriction.
pub fn update(keyspace: &str, table: &str) -> crate::OrmResult<UpdateQb> {
    UpdateQb::new(keyspace, table, None)
}

/// Create a DELETE builder.
pub fn delete(keyspace: &str, table: &str) -> crate::OrmResult<DeleteQb> {
    DeleteQb::new(keyspace, table)
}

#[cfg(test)]
mod tests;
