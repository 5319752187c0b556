//! Table schema maps and their validation.

use crate::error::{OrmError, OrmResult};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Declared type and requiredness of one column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldDef {
    #[serde(rename = "type")]
    pub field_type: String,
    #[serde(default)]
    pub required: bool,
}

impl FieldDef {
    pub fn new(field_type: &str, required: bool) -> Self {
        Self {
            field_type: field_type.to_string(),
            required,
        }
    }
}

/// Describes one table and which of its columns may be read or written.
///
/// Accepts camelCase keys (`primaryKeys`, `updateRestrictions`, ...) when deserialized,
/// so existing JSON schema files load unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SchemaMap {
    pub keyspace: String,
    pub table: String,
    #[serde(default)]
    pub fields: BTreeMap<String, FieldDef>,
    #[serde(default)]
    pub primary_keys: Vec<String>,
    #[serde(default)]
    pub primary_indices: Vec<String>,
    #[serde(default)]
    pub secondary_indices: Vec<String>,
    /// Projection allow-list; `None` means every column.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub readable: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub writable: Option<Vec<String>>,
    /// SET allow-list for updates.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub update_restrictions: Option<Vec<String>>,
}

impl SchemaMap {
    pub fn new(keyspace: &str, table: &str) -> Self {
        Self {
            keyspace: keyspace.to_string(),
            table: table.to_string(),
            ..Self::default()
        }
    }

    /// Add a column definition (builder form).
    pub fn field(mut self, name: &str, field_type: &str, required: bool) -> Self {
        self.fields
            .insert(name.to_string(), FieldDef::new(field_type, required));
        self
    }

    pub fn primary_keys(mut self, keys: &[&str]) -> Self {
        self.primary_keys = to_strings(keys);
        self
    }

    pub fn readable(mut self, columns: &[&str]) -> Self {
        self.readable = Some(to_strings(columns));
        self
    }

    pub fn writable(mut self, columns: &[&str]) -> Self {
        self.writable = Some(to_strings(columns));
        self
    }

    pub fn update_restrictions(mut self, columns: &[&str]) -> Self {
        self.update_restrictions = Some(to_strings(columns));
        self
    }

    /// Parse and validate a JSON schema document.
    pub fn from_json_str(raw: &str) -> OrmResult<Self> {
        let schema: SchemaMap =
            serde_json::from_str(raw).map_err(|e| OrmError::InvalidSchema(e.to_string()))?;
        schema.validate()?;
        Ok(schema)
    }

    /// Parse and validate a TOML schema document.
    pub fn from_toml_str(raw: &str) -> OrmResult<Self> {
        let schema: SchemaMap =
            toml::from_str(raw).map_err(|e| OrmError::InvalidSchema(e.to_string()))?;
        schema.validate()?;
        Ok(schema)
    }

    pub fn validate(&self) -> OrmResult<()> {
        validate_keyspace(&self.keyspace)?;
        validate_table(&self.table)?;
        if matches!(&self.readable, Some(r) if r.is_empty()) {
            return Err(OrmError::EmptyReadableSet);
        }
        if matches!(&self.writable, Some(w) if w.is_empty()) {
            return Err(OrmError::InvalidSchema(
                "writable must be omitted or non-empty".to_string(),
            ));
        }
        validate_restrictions(self.update_restrictions.as_deref())?;
        Ok(())
    }

    /// The SET allow-list for updates: `update_restrictions`, falling back to `writable`.
    pub fn update_allow_list(&self) -> Option<&[String]> {
        self.update_restrictions
            .as_deref()
            .or(self.writable.as_deref())
    }
}

pub(crate) fn validate_keyspace(keyspace: &str) -> OrmResult<()> {
    if keyspace.trim().is_empty() {
        return Err(OrmError::InvalidKeyspace(
            "keyspace must be a non-empty string".to_string(),
        ));
    }
    Ok(())
}

pub(crate) fn validate_table(table: &str) -> OrmResult<()> {
    if table.trim().is_empty() {
        return Err(OrmError::InvalidTable(
            "table must be a non-empty string".to_string(),
        ));
    }
    Ok(())
}

pub(crate) fn validate_restrictions(restrictions: Option<&[String]>) -> OrmResult<()> {
    if matches!(restrictions, Some(r) if r.is_empty()) {
        return Err(OrmError::InvalidRestrictions(
            "restriction list must be omitted or non-empty".to_string(),
        ));
    }
    Ok(())
}

fn to_strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn loads_camel_case_json() {
        let schema = SchemaMap::from_json_str(
            r#"{
                "keyspace": "ks",
                "table": "users",
                "fields": {
                    "id": {"type": "uuid", "required": true},
                    "name": {"type": "text"}
                },
                "primaryKeys": ["id"],
                "readable": ["id", "name"],
                "updateRestrictions": ["name"]
            }"#,
        )
        .unwrap();

        assert_eq!(schema.primary_keys, vec!["id".to_string()]);
        assert!(schema.fields["id"].required);
        assert!(!schema.fields["name"].required);
        assert_eq!(schema.update_allow_list(), Some(&["name".to_string()][..]));
    }

    #[test]
    fn loads_toml() {
        let schema = SchemaMap::from_toml_str(
            r#"
            keyspace = "ks"
            table = "events"
            writable = ["payload"]

            [fields.payload]
            type = "text"
            "#,
        )
        .unwrap();
        assert_eq!(schema.table, "events");
        assert_eq!(schema.update_allow_list(), Some(&["payload".to_string()][..]));
    }

    #[test]
    fn rejects_blank_names_and_empty_lists() {
        assert!(matches!(
            SchemaMap::new("", "t").validate(),
            Err(OrmError::InvalidKeyspace(_))
        ));
        assert!(matches!(
            SchemaMap::new("ks", " ").validate(),
            Err(OrmError::InvalidTable(_))
        ));
        assert!(matches!(
            SchemaMap::new("ks", "t").readable(&[]).validate(),
            Err(OrmError::EmptyReadableSet)
        ));
        assert!(matches!(
            SchemaMap::new("ks", "t").writable(&[]).validate(),
            Err(OrmError::InvalidSchema(_))
        ));
        assert!(matches!(
            SchemaMap::new("ks", "t").update_restrictions(&[]).validate(),
            Err(OrmError::InvalidRestrictions(_))
        ));
    }

    #[test]
    fn missing_keyspace_field_is_a_schema_error() {
        let err = SchemaMap::from_json_str(r#"{"table": "t"}"#).unwrap_err();
        assert!(matches!(err, OrmError::InvalidSchema(_)));
    }
}
