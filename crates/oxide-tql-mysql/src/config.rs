//! Translation settings.

use serde::{Deserialize, Serialize};

/// Names and limits used when translating a query.
///
/// Every field has a default, so a partial JSON document is enough:
///
/// ```rust
/// use oxide_tql_mysql::TranslationConfig;
///
/// let config: TranslationConfig =
///     serde_json::from_str(r#"{"max_rows_per_page": 1000}"#).unwrap();
/// assert_eq!(config.search_column, "ROW_SEARCH_CONTENT");
/// assert_eq!(config.max_rows_per_page, Some(1000));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TranslationConfig {
    /// Full-text indexed column that `TEXT_MATCHES` searches.
    pub search_column: String,
    /// Row id column; never mapped through the schema.
    pub row_id_column: String,
    /// Appended to a list column's name to name its unnested values.
    pub unnest_suffix: String,
    /// Prefix of generated bind parameter names.
    pub bind_prefix: String,
    /// Upper bound on `LIMIT`.
    pub max_rows_per_page: Option<u64>,
    /// `VARCHAR` size of unnested string values whose column declares none.
    pub default_max_string_length: u32,
    /// Value substituted for `CURRENT_USER()`.
    pub current_user_id: Option<i64>,
}

impl Default for TranslationConfig {
    fn default() -> Self {
        Self {
            search_column: String::from("ROW_SEARCH_CONTENT"),
            row_id_column: String::from("ROW_ID"),
            unnest_suffix: String::from("_UNNEST"),
            bind_prefix: String::from("b"),
            max_rows_per_page: None,
            default_max_string_length: 50,
            current_user_id: None,
        }
    }
}

impl TranslationConfig {
    /// Returns the name of the unnested-value column of `column`.
    #[must_use]
    pub fn unnested_name(&self, column: &str) -> String {
        format!("{column}{}", self.unnest_suffix)
    }
}
