//! Filter objects and their translation into clauses.
//!
//! A [`Filter`] is an ordered conjunction of per-field conditions. Each field maps to
//! either a scalar (`=`), a list (`IN`), or a set of explicit operators:
//!
//! ```ignore
//! use cqlorm::{Filter, Op};
//!
//! let filter = Filter::new()
//!     .eq("user_id", "u1")                 // user_id = ?
//!     .in_list("status", vec!["a", "b"])   // status IN (?, ?)
//!     .gte("created", 1_700_000_000i64)    // created >= ?
//!     .lt("created", 1_800_000_000i64);    // created < ?
//! ```
//!
//! Field order is preserved exactly, so generated statement text and bind positions are
//! deterministic.

use crate::error::{OrmError, OrmResult};
use crate::value::Value;
use std::fmt;
use std::str::FromStr;

/// Comparison operator. The target language has no OR, so every clause is AND-joined.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Op {
    Eq,
    Lt,
    Lte,
    Gt,
    Gte,
    In,
}

impl Op {
    /// Rendered operator symbol.
    pub fn symbol(self) -> &'static str {
        match self {
            Op::Eq => "=",
            Op::Lt => "<",
            Op::Lte => "<=",
            Op::Gt => ">",
            Op::Gte => ">=",
            Op::In => "IN",
        }
    }

    /// Name used as a key inside nested filter objects.
    pub fn name(self) -> &'static str {
        match self {
            Op::Eq => "eq",
            Op::Lt => "lt",
            Op::Lte => "lte",
            Op::Gt => "gt",
            Op::Gte => "gte",
            Op::In => "in",
        }
    }
}

impl FromStr for Op {
    type Err = OrmError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "eq" => Ok(Op::Eq),
            "lt" => Ok(Op::Lt),
            "lte" => Ok(Op::Lte),
            "gt" => Ok(Op::Gt),
            "gte" => Ok(Op::Gte),
            "in" => Ok(Op::In),
            other => Err(OrmError::UnknownOperator(other.to_string())),
        }
    }
}

impl fmt::Display for Op {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// The condition attached to one filter field.
#[derive(Debug, Clone, PartialEq)]
pub enum FilterValue {
    /// `field = ?`
    Scalar(Value),
    /// `field IN (?, ...)`
    List(Vec<Value>),
    /// One clause per operator, in insertion order.
    Ops(Vec<(Op, Value)>),
}

/// An ordered conjunction of field conditions.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Filter {
    entries: Vec<(String, FilterValue)>,
}

impl Filter {
    /// Create an empty filter (matches everything).
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a dynamic filter object.
    ///
    /// The outer value must be a JSON object. Arrays become `IN` lists, nested objects
    /// are read as `{operator: value}` maps, anything else is an equality.
    pub fn from_json(value: &serde_json::Value) -> OrmResult<Self> {
        let serde_json::Value::Object(map) = value else {
            return Err(OrmError::InvalidFilter(format!(
                "expected an object, got {}",
                json_kind(value)
            )));
        };

        let mut filter = Filter::new();
        for (field, cond) in map {
            let entry = match cond {
                serde_json::Value::Array(items) => FilterValue::List(
                    items
                        .iter()
                        .map(Value::from_json)
                        .collect::<OrmResult<Vec<_>>>()?,
                ),
                serde_json::Value::Object(ops) => {
                    if ops.is_empty() {
                        return Err(OrmError::InvalidFilter(format!(
                            "'{field}' has an empty operator object"
                        )));
                    }
                    let mut parsed = Vec::with_capacity(ops.len());
                    for (op, v) in ops {
                        parsed.push((op.parse::<Op>()?, Value::from_json(v)?));
                    }
                    FilterValue::Ops(parsed)
                }
                scalar => FilterValue::Scalar(Value::from_json(scalar)?),
            };
            filter.entries.push((field.clone(), entry));
        }
        Ok(filter)
    }

    /// Set `field` to an equality condition.
    pub fn eq(self, field: &str, value: impl Into<Value>) -> Self {
        self.put(field, FilterValue::Scalar(value.into()))
    }

    /// Set `field` to an `IN` list.
    pub fn in_list<T: Into<Value>>(self, field: &str, values: Vec<T>) -> Self {
        self.put(
            field,
            FilterValue::List(values.into_iter().map(Into::into).collect()),
        )
    }

    /// Add `field < value`.
    pub fn lt(self, field: &str, value: impl Into<Value>) -> Self {
        self.op(field, Op::Lt, value)
    }

    /// Add `field <= value`.
    pub fn lte(self, field: &str, value: impl Into<Value>) -> Self {
        self.op(field, Op::Lte, value)
    }

    /// Add `field > value`.
    pub fn gt(self, field: &str, value: impl Into<Value>) -> Self {
        self.op(field, Op::Gt, value)
    }

    /// Add `field >= value`.
    pub fn gte(self, field: &str, value: impl Into<Value>) -> Self {
        self.op(field, Op::Gte, value)
    }

    /// Add an explicit operator on `field`.
    ///
    /// Operators on the same field collect into one nested entry, keeping the field's
    /// original position. Repeating an operator overwrites its value.
    pub fn op(mut self, field: &str, op: Op, value: impl Into<Value>) -> Self {
        let value = value.into();
        match self.entries.iter_mut().find(|(name, _)| name == field) {
            Some((_, FilterValue::Ops(ops))) => match ops.iter_mut().find(|(o, _)| *o == op) {
                Some(slot) => slot.1 = value,
                None => ops.push((op, value)),
            },
            Some((_, other)) => *other = FilterValue::Ops(vec![(op, value)]),
            None => self
                .entries
                .push((field.to_string(), FilterValue::Ops(vec![(op, value)]))),
        }
        self
    }

    fn put(mut self, field: &str, value: FilterValue) -> Self {
        match self.entries.iter_mut().find(|(name, _)| name == field) {
            Some((_, slot)) => *slot = value,
            None => self.entries.push((field.to_string(), value)),
        }
        self
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of fields (not clauses).
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &FilterValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }
}

/// Right-hand side of a clause.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ClauseValue<'a> {
    /// Bound as one parameter.
    One(&'a Value),
    /// Bound element by element (`IN`).
    Many(&'a [Value]),
}

/// One `field op value` comparison.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Clause<'a> {
    pub op: Op,
    pub field: &'a str,
    pub value: ClauseValue<'a>,
}

/// Translate a filter into its clauses, one per field (or per nested operator), in order.
///
/// Empty `IN` lists are rejected here rather than rendered as `IN ()`.
pub fn clauses(filter: &Filter) -> OrmResult<Vec<Clause<'_>>> {
    let mut out = Vec::with_capacity(filter.len());
    for (field, cond) in filter.iter() {
        match cond {
            FilterValue::Scalar(value) => out.push(Clause {
                op: Op::Eq,
                field,
                value: ClauseValue::One(value),
            }),
            FilterValue::List(values) => out.push(in_clause(field, values)?),
            FilterValue::Ops(ops) => {
                for (op, value) in ops {
                    let clause = match (op, value) {
                        (Op::In, Value::List(items)) => in_clause(field, items)?,
                        (Op::In, other) => {
                            return Err(OrmError::InvalidFilter(format!(
                                "'in' on '{field}' expects a list, got {}",
                                other.kind()
                            )));
                        }
                        (op, value) => Clause {
                            op: *op,
                            field,
                            value: ClauseValue::One(value),
                        },
                    };
                    out.push(clause);
                }
            }
        }
    }
    Ok(out)
}

fn in_clause<'a>(field: &'a str, values: &'a [Value]) -> OrmResult<Clause<'a>> {
    if values.is_empty() {
        return Err(OrmError::EmptyInList(field.to_string()));
    }
    Ok(Clause {
        op: Op::In,
        field,
        value: ClauseValue::Many(values),
    })
}

fn json_kind(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "a boolean",
        serde_json::Value::Number(_) => "a number",
        serde_json::Value::String(_) => "a string",
        serde_json::Value::Array(_) => "an array",
        serde_json::Value::Object(_) => "an object",
    }
}
