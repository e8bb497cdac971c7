//! Resolution of logical names to physical ones.

use std::collections::BTreeMap;

use oxide_tql_core::ast::JsonColumnType;
use oxide_tql_core::types::ColumnType;
use serde::{Deserialize, Serialize};

/// How one logical column is stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnTranslation {
    /// Name of the column in the physical table.
    pub physical_name: String,
    pub column_type: ColumnType,
    /// Maximum string length, for string and string-list columns.
    #[serde(default)]
    pub max_size: Option<u32>,
}

impl ColumnTranslation {
    #[must_use]
    pub fn new(physical_name: impl Into<String>, column_type: ColumnType) -> Self {
        Self {
            physical_name: physical_name.into(),
            column_type,
            max_size: None,
        }
    }

    #[must_use]
    pub const fn with_max_size(mut self, max_size: u32) -> Self {
        self.max_size = Some(max_size);
        self
    }

    /// Returns the `JSON_TABLE` type of one element of this list column, or
    /// `None` for a scalar column.
    #[must_use]
    pub fn element_json_type(&self, default_max_string_length: u32) -> Option<JsonColumnType> {
        let element = self.column_type.non_list_type()?;
        Some(match element {
            ColumnType::String => {
                JsonColumnType::Varchar(self.max_size.unwrap_or(default_max_string_length))
            }
            ColumnType::Boolean => JsonColumnType::Boolean,
            _ => JsonColumnType::Bigint,
        })
    }
}

/// Answers what a query's logical names stand for.
pub trait SchemaLookup {
    /// Looks up a column by the name used in the query.
    fn column(&self, name: &str) -> Option<ColumnTranslation>;

    /// Returns the physical table behind a table name used in the query.
    fn table_name(&self, table: &str) -> Option<String>;
}

/// A [`SchemaLookup`] backed by two maps.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MappedSchema {
    pub columns: BTreeMap<String, ColumnTranslation>,
    pub tables: BTreeMap<String, String>,
}

impl MappedSchema {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_column(mut self, name: impl Into<String>, translation: ColumnTranslation) -> Self {
        self.columns.insert(name.into(), translation);
        self
    }

    #[must_use]
    pub fn with_table(mut self, name: impl Into<String>, physical_name: impl Into<String>) -> Self {
        self.tables.insert(name.into(), physical_name.into());
        self
    }
}

impl SchemaLookup for MappedSchema {
    fn column(&self, name: &str) -> Option<ColumnTranslation> {
        self.columns.get(name).cloned()
    }

    fn table_name(&self, table: &str) -> Option<String> {
        self.tables.get(table).cloned()
    }
}

impl<T: SchemaLookup + ?Sized> SchemaLookup for &T {
    fn column(&self, name: &str) -> Option<ColumnTranslation> {
        (**self).column(name)
    }

    fn table_name(&self, table: &str) -> Option<String> {
        (**self).table_name(table)
    }
}
