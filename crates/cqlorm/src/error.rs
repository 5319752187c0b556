//! Error types for cqlorm

use thiserror::Error;

/// Result type alias for cqlorm operations
pub type OrmResult<T> = Result<T, OrmError>;

/// Error types for statement construction and execution
#[derive(Debug, Error)]
pub enum OrmError {
    /// A filter argument was not a mapping of field → condition
    #[error("Invalid filter: {0}")]
    InvalidFilter(String),

    /// A nested filter used an operator outside the supported set
    #[error("Unknown operator '{0}' (expected one of eq, lt, lte, gt, gte, in)")]
    UnknownOperator(String),

    /// An IN condition was given no values
    #[error("IN condition on '{0}' has no values")]
    EmptyInList(String),

    /// An explicit projection was empty
    #[error("Column list cannot be empty")]
    EmptyColumnSet,

    /// A readable allow-list was empty
    #[error("Readable column list cannot be empty")]
    EmptyReadableSet,

    /// A requested column is not in the readable allow-list
    #[error("Column '{0}' is not readable")]
    UnreadableColumn(String),

    /// ORDER BY direction was not exactly ASC or DESC
    #[error("Invalid sort direction '{0}' (expected ASC or DESC)")]
    InvalidDirection(String),

    /// LIMIT was not a positive integer
    #[error("Invalid limit '{0}' (expected a positive integer)")]
    InvalidLimit(String),

    /// INSERT was given no columns
    #[error("Insert map cannot be empty")]
    EmptyInsertMap,

    /// USING was given no options
    #[error("USING options cannot be empty")]
    EmptyOptions,

    /// USING was given something other than TTL / TIMESTAMP
    #[error("Unsupported option '{0}' (expected TTL or TIMESTAMP)")]
    UnsupportedOption(String),

    /// SET was given no assignments
    #[error("SET map cannot be empty")]
    EmptySetMap,

    /// SET touched a field outside the update allow-list
    #[error("Field '{0}' may not be updated")]
    RestrictedField(String),

    /// Keyspace name was empty
    #[error("Invalid keyspace: {0}")]
    InvalidKeyspace(String),

    /// Table name was empty
    #[error("Invalid table: {0}")]
    InvalidTable(String),

    /// Update restriction list was present but empty
    #[error("Invalid update restrictions: {0}")]
    InvalidRestrictions(String),

    /// Schema map failed validation
    #[error("Invalid schema: {0}")]
    InvalidSchema(String),

    /// A dynamic value could not be converted into a bind value
    #[error("Invalid value: {0}")]
    InvalidValue(String),

    /// An options argument was malformed
    #[error("Invalid options: {0}")]
    InvalidOptions(String),

    /// UPDATE/DELETE was called without any filter
    #[error("{0} requires a non-empty filter")]
    MissingFilter(&'static str),

    /// UPDATE was given no assignments
    #[error("Update map cannot be empty")]
    EmptyUpdateMap,

    /// find_map was given no keys
    #[error("Key list cannot be empty")]
    EmptyKeys,

    /// find_map was given the same key twice
    #[error("Duplicate key '{0}' in key list")]
    DuplicateKey(String),

    /// find_map keys and result rows disagree in length
    #[error("Expected {keys} rows to match the key list, got {rows}")]
    KeyCountMismatch { keys: usize, rows: usize },

    /// A mandatory fragment was never set on a query builder
    #[error("{0} fragment must be set before the query is built")]
    MissingFragment(&'static str),

    /// No cluster configuration exists for the requested host name
    #[error("Unknown host '{0}'")]
    UnknownHost(String),

    /// Connection setup error
    #[error("Connection error: {0}")]
    Connection(String),

    /// Statement execution error reported by the driver
    #[error("Query error: {0}")]
    Query(String),

    /// Configuration file error
    #[error("Config error: {0}")]
    Config(String),

    /// Row decode/mapping error
    #[error("Decode error on column '{column}': {message}")]
    Decode { column: String, message: String },
}

impl OrmError {
    /// Create a decode error for a specific column
    pub fn decode(column: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Decode {
            column: column.into(),
            message: message.into(),
        }
    }

    /// Create a driver-side query error
    pub fn query(message: impl Into<String>) -> Self {
        Self::Query(message.into())
    }

    /// Check if this error came back from the driver
    pub fn is_query_error(&self) -> bool {
        matches!(self, Self::Query(_))
    }

    /// Check if this error was raised while building a statement, before any I/O
    pub fn is_statement_error(&self) -> bool {
        !matches!(
            self,
            Self::Query(_)
                | Self::Connection(_)
                | Self::Config(_)
                | Self::Decode { .. }
                | Self::UnknownHost(_)
                | Self::KeyCountMismatch { .. }
        )
    }
}

impl From<toml::de::Error> for OrmError {
    fn from(err: toml::de::Error) -> Self {
        Self::Config(err.to_string())
    }
}
