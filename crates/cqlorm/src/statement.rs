//! Stateless statement fragments.
//!
//! Every function here renders one fragment of statement text and, where the fragment
//! carries values, appends them to a caller-owned [`ParamList`] left to right. Nothing
//! here touches a connection, so each fragment is deterministic for a given input.
//!
//! ```ignore
//! use cqlorm::{statement, Filter, ParamList};
//!
//! let mut params = ParamList::new();
//! let cql = format!(
//!     "{} {}",
//!     statement::select("ks", "users", None, None)?,
//!     statement::where_clause(&Filter::new().eq("id", 1), &mut params)?,
//! );
//! assert_eq!(cql, "SELECT * FROM ks.users WHERE id = ?");
//! ```

use crate::condition::{self, Clause, ClauseValue, Filter};
use crate::error::{OrmError, OrmResult};
use crate::param::ParamList;
use crate::value::{Value, ValueMap};

/// Options accepted by the USING fragment (compared case-insensitively).
pub const USING_KEYS: [&str; 2] = ["TTL", "TIMESTAMP"];

/// `SELECT <cols> FROM <keyspace>.<table>`.
///
/// Columns default to the readable list, then to `*`. When both are given every
/// requested column must be readable.
pub fn select(
    keyspace: &str,
    table: &str,
    columns: Option<&[String]>,
    readable: Option<&[String]>,
) -> OrmResult<String> {
    if matches!(columns, Some(cols) if cols.is_empty()) {
        return Err(OrmError::EmptyColumnSet);
    }
    if matches!(readable, Some(r) if r.is_empty()) {
        return Err(OrmError::EmptyReadableSet);
    }

    let cols = match (columns, readable) {
        (Some(cols), Some(readable)) => {
            if let Some(bad) = cols.iter().find(|c| !readable.contains(*c)) {
                return Err(OrmError::UnreadableColumn(bad.clone()));
            }
            cols.join(", ")
        }
        (Some(cols), None) => cols.join(", "),
        (None, Some(readable)) => readable.join(", "),
        (None, None) => "*".to_string(),
    };

    Ok(format!("SELECT {} FROM {}.{}", cols, keyspace, table))
}

/// `WHERE a = ? AND b IN (?, ?)`, or `""` for an empty filter.
pub fn where_clause(filter: &Filter, params: &mut ParamList) -> OrmResult<String> {
    let clauses = condition::clauses(filter)?;
    if clauses.is_empty() {
        return Ok(String::new());
    }

    let rendered: Vec<String> = clauses
        .iter()
        .map(|clause| render_clause(clause, params))
        .collect();
    Ok(format!("WHERE {}", rendered.join(" AND ")))
}

fn render_clause(clause: &Clause<'_>, params: &mut ParamList) -> String {
    match clause.value {
        ClauseValue::Many(values) => {
            let placeholders: Vec<&str> = values
                .iter()
                .map(|v| {
                    params.push(v.clone());
                    "?"
                })
                .collect();
            format!(
                "{} {} ({})",
                clause.field,
                clause.op.symbol(),
                placeholders.join(", ")
            )
        }
        ClauseValue::One(value) => {
            params.push(value.clone());
            format!("{} {} ?", clause.field, clause.op.symbol())
        }
    }
}

/// `ORDER BY <field> <direction>`; direction is exactly `ASC` or `DESC`.
pub fn order_by(field: &str, direction: &str) -> OrmResult<String> {
    if direction != "ASC" && direction != "DESC" {
        return Err(OrmError::InvalidDirection(direction.to_string()));
    }
    Ok(format!("ORDER BY {} {}", field, direction))
}

/// `LIMIT <size>`; size must be at least 1.
pub fn limit(size: i64) -> OrmResult<String> {
    if size < 1 {
        return Err(OrmError::InvalidLimit(size.to_string()));
    }
    Ok(format!("LIMIT {}", size))
}

/// Read a limit out of a dynamic value. Only integral numbers are accepted.
pub fn parse_limit(value: &serde_json::Value) -> OrmResult<i64> {
    let invalid = || OrmError::InvalidLimit(value.to_string());
    let serde_json::Value::Number(n) = value else {
        return Err(invalid());
    };
    let size = match n.as_i64() {
        Some(i) => i,
        None => {
            let f = n.as_f64().ok_or_else(invalid)?;
            if f.fract() != 0.0 || f < 1.0 || f > i64::MAX as f64 {
                return Err(invalid());
            }
            f as i64
        }
    };
    if size < 1 {
        return Err(invalid());
    }
    Ok(size)
}

/// `INSERT INTO <keyspace>.<table> (a, b) VALUES (?, ?)`, in map order.
pub fn insert_values(
    keyspace: &str,
    table: &str,
    insert_map: &ValueMap,
    params: &mut ParamList,
) -> OrmResult<String> {
    if insert_map.is_empty() {
        return Err(OrmError::EmptyInsertMap);
    }

    let mut columns = Vec::with_capacity(insert_map.len());
    let mut placeholders = Vec::with_capacity(insert_map.len());
    for (column, value) in insert_map.iter() {
        columns.push(column);
        params.push(value.clone());
        placeholders.push("?");
    }

    Ok(format!(
        "INSERT INTO {}.{} ({}) VALUES ({})",
        keyspace,
        table,
        columns.join(", "),
        placeholders.join(", ")
    ))
}

/// `USING TTL 10 AND TIMESTAMP 20`. Keys are upper-cased; values are inlined.
///
/// Only integers are accepted, and `TTL` must not be negative.
pub fn using_options(options: &ValueMap) -> OrmResult<String> {
    if options.is_empty() {
        return Err(OrmError::EmptyOptions);
    }

    let mut parts = Vec::with_capacity(options.len());
    for (key, value) in options.iter() {
        let key = key.to_uppercase();
        if !USING_KEYS.contains(&key.as_str()) {
            return Err(OrmError::UnsupportedOption(key));
        }
        let n = match value {
            Value::Int(n) | Value::BigInt(n) => *n,
            other => {
                return Err(OrmError::InvalidOptions(format!(
                    "{key} must be an integer, got {}",
                    other.kind()
                )));
            }
        };
        if key == "TTL" && n < 0 {
            return Err(OrmError::InvalidOptions(format!(
                "TTL must not be negative, got {n}"
            )));
        }
        parts.push(format!("{} {}", key, n));
    }
    Ok(format!("USING {}", parts.join(" AND ")))
}

/// `UPDATE <keyspace>.<table>`.
pub fn update(keyspace: &str, table: &str) -> String {
    format!("UPDATE {}.{}", keyspace, table)
}

/// `SET a = ?, b = ?`, in map order.
///
/// With `restrictions`, every key must appear in the list. The check runs before any
/// value is appended, so a rejected map leaves `params` untouched.
pub fn set(
    name_values: &ValueMap,
    params: &mut ParamList,
    restrictions: Option<&[String]>,
) -> OrmResult<String> {
    if name_values.is_empty() {
        return Err(OrmError::EmptySetMap);
    }
    if let Some(allowed) = restrictions {
        if let Some(bad) = name_values
            .keys()
            .find(|k| !allowed.iter().any(|a| a.as_str() == *k))
        {
            return Err(OrmError::RestrictedField(bad.to_string()));
        }
    }

    let assignments: Vec<String> = name_values
        .iter()
        .map(|(name, value)| {
            params.push(value.clone());
            format!("{} = ?", name)
        })
        .collect();
    Ok(format!("SET {}", assignments.join(", ")))
}

/// `DELETE FROM <keyspace>.<table>`.
pub fn delete(keyspace: &str, table: &str) -> String {
    format!("DELETE FROM {}.{}", keyspace, table)
}
