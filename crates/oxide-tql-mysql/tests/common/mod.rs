#![allow(dead_code)]

use oxide_tql_core::types::ColumnType;
use oxide_tql_mysql::{
    translate_sql, ColumnTranslation, MappedSchema, Result, TranslatedQuery, TranslationConfig,
};

/// A table `syn123` stored as `T123`, with one column of most types.
pub fn schema() -> MappedSchema {
    MappedSchema::new()
        .with_table("syn123", "T123")
        .with_table("syn456", "T456")
        .with_column("foo", ColumnTranslation::new("_C1_", ColumnType::String))
        .with_column("bar", ColumnTranslation::new("_C2_", ColumnType::Integer))
        .with_column("score", ColumnTranslation::new("_C3_", ColumnType::Double))
        .with_column("born", ColumnTranslation::new("_C4_", ColumnType::Date))
        .with_column("owner", ColumnTranslation::new("_C5_", ColumnType::UserId))
        .with_column(
            "tags",
            ColumnTranslation::new("_C6_", ColumnType::StringList).with_max_size(20),
        )
        .with_column("ids", ColumnTranslation::new("_C7_", ColumnType::IntegerList))
        .with_column("flags", ColumnTranslation::new("_C8_", ColumnType::BooleanList))
}

pub fn translate(sql: &str) -> TranslatedQuery {
    translate_with(sql, &TranslationConfig::default()).unwrap()
}

pub fn translate_with(sql: &str, config: &TranslationConfig) -> Result<TranslatedQuery> {
    translate_sql(sql, &schema(), config)
}
