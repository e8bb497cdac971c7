//! Column value types and function return-type resolution.
//!
//! Every column of a queried table has a [`ColumnType`]. Function-call nodes
//! do not carry a fixed type; instead each function name maps to a
//! [`FunctionReturnType`] whose [`ReturnTypeStrategy`] decides the type of the
//! call given the type of its argument.

mod function;

pub use function::{
    ArrayFunctionType, BooleanFunctionName, CurrentUserFunctionName, FunctionReturnType,
    MySqlFunctionName, ReturnTypeStrategy, SetFunctionType,
};

use core::fmt;
use core::str::FromStr;

use serde::{Deserialize, Serialize};

/// The value type of a column.
///
/// List types hold multi-valued annotations. Each list type has a scalar
/// element type reachable through [`ColumnType::non_list_type`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ColumnType {
    String,
    Double,
    Integer,
    Boolean,
    Date,
    #[serde(rename = "FILEHANDLEID")]
    FileHandleId,
    #[serde(rename = "ENTITYID")]
    EntityId,
    #[serde(rename = "SUBMISSIONID")]
    SubmissionId,
    #[serde(rename = "EVALUATIONID")]
    EvaluationId,
    Link,
    #[serde(rename = "MEDIUMTEXT")]
    MediumText,
    #[serde(rename = "LARGETEXT")]
    LargeText,
    #[serde(rename = "USERID")]
    UserId,
    Json,
    StringList,
    IntegerList,
    BooleanList,
    DateList,
    #[serde(rename = "ENTITYID_LIST")]
    EntityIdList,
    #[serde(rename = "USERID_LIST")]
    UserIdList,
}

impl ColumnType {
    /// All column types, scalars first.
    pub const ALL: [Self; 20] = [
        Self::String,
        Self::Double,
        Self::Integer,
        Self::Boolean,
        Self::Date,
        Self::FileHandleId,
        Self::EntityId,
        Self::SubmissionId,
        Self::EvaluationId,
        Self::Link,
        Self::MediumText,
        Self::LargeText,
        Self::UserId,
        Self::Json,
        Self::StringList,
        Self::IntegerList,
        Self::BooleanList,
        Self::DateList,
        Self::EntityIdList,
        Self::UserIdList,
    ];

    /// Returns the canonical upper-case name of the type.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::String => "STRING",
            Self::Double => "DOUBLE",
            Self::Integer => "INTEGER",
            Self::Boolean => "BOOLEAN",
            Self::Date => "DATE",
            Self::FileHandleId => "FILEHANDLEID",
            Self::EntityId => "ENTITYID",
            Self::SubmissionId => "SUBMISSIONID",
            Self::EvaluationId => "EVALUATIONID",
            Self::Link => "LINK",
            Self::MediumText => "MEDIUMTEXT",
            Self::LargeText => "LARGETEXT",
            Self::UserId => "USERID",
            Self::Json => "JSON",
            Self::StringList => "STRING_LIST",
            Self::IntegerList => "INTEGER_LIST",
            Self::BooleanList => "BOOLEAN_LIST",
            Self::DateList => "DATE_LIST",
            Self::EntityIdList => "ENTITYID_LIST",
            Self::UserIdList => "USERID_LIST",
        }
    }

    /// Returns true for multi-valued column types.
    #[must_use]
    pub const fn is_list(&self) -> bool {
        matches!(
            self,
            Self::StringList
                | Self::IntegerList
                | Self::BooleanList
                | Self::DateList
                | Self::EntityIdList
                | Self::UserIdList
        )
    }

    /// Returns the element type of a list type, or `None` for scalars.
    #[must_use]
    pub const fn non_list_type(&self) -> Option<Self> {
        match self {
            Self::StringList => Some(Self::String),
            Self::IntegerList => Some(Self::Integer),
            Self::BooleanList => Some(Self::Boolean),
            Self::DateList => Some(Self::Date),
            Self::EntityIdList => Some(Self::EntityId),
            Self::UserIdList => Some(Self::UserId),
            _ => None,
        }
    }

    /// Returns the list type whose elements are of this type, if one exists.
    #[must_use]
    pub const fn list_type(&self) -> Option<Self> {
        match self {
            Self::String => Some(Self::StringList),
            Self::Integer => Some(Self::IntegerList),
            Self::Boolean => Some(Self::BooleanList),
            Self::Date => Some(Self::DateList),
            Self::EntityId => Some(Self::EntityIdList),
            Self::UserId => Some(Self::UserIdList),
            _ => None,
        }
    }

    /// Returns the type itself for scalars, or the element type for lists.
    #[must_use]
    pub const fn scalar_type(&self) -> Self {
        match self.non_list_type() {
            Some(element) => element,
            None => *self,
        }
    }

    /// Returns true for types stored as numbers.
    #[must_use]
    pub const fn is_numeric(&self) -> bool {
        matches!(
            self,
            Self::Double
                | Self::Integer
                | Self::Date
                | Self::FileHandleId
                | Self::EntityId
                | Self::SubmissionId
                | Self::EvaluationId
                | Self::UserId
        )
    }
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a type name is not recognized.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown column type: {0}")]
pub struct UnknownColumnType(pub String);

impl FromStr for ColumnType {
    type Err = UnknownColumnType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let upper = s.to_ascii_uppercase();
        Self::ALL
            .into_iter()
            .find(|t| t.as_str() == upper)
            .ok_or_else(|| UnknownColumnType(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_list_types_round_trip() {
        for column_type in ColumnType::ALL {
            if let Some(element) = column_type.non_list_type() {
                assert!(column_type.is_list());
                assert_eq!(element.list_type(), Some(column_type));
            } else {
                assert!(!column_type.is_list());
            }
        }
    }

    #[test]
    fn test_scalar_type() {
        assert_eq!(ColumnType::StringList.scalar_type(), ColumnType::String);
        assert_eq!(ColumnType::Double.scalar_type(), ColumnType::Double);
    }

    #[test]
    fn test_from_str() {
        assert_eq!("string_list".parse::<ColumnType>(), Ok(ColumnType::StringList));
        assert_eq!("ENTITYID".parse::<ColumnType>(), Ok(ColumnType::EntityId));
        assert!("VARCHAR".parse::<ColumnType>().is_err());
    }

    #[test]
    fn test_serde_names_match_display() {
        for column_type in ColumnType::ALL {
            let json = serde_json::to_string(&column_type).unwrap();
            assert_eq!(json, format!("\"{column_type}\""));
        }
    }
}
