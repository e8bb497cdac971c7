//! Clause nodes: select list, FROM, WHERE, GROUP BY, ORDER BY, pagination.

use serde::{Deserialize, Serialize};

use super::NodeId;

/// `*` or a list of [`DerivedColumn`] nodes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectList {
    Asterisk,
    Columns(Vec<NodeId>),
}

/// `value [AS alias]`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DerivedColumn {
    pub value: NodeId,
    /// An identifier node.
    pub alias: Option<NodeId>,
}

/// `FROM table_reference`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FromClause {
    pub table: NodeId,
}

/// Join flavours.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum JoinType {
    Inner,
    Left,
    Right,
    Cross,
}

impl JoinType {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Inner => "INNER JOIN",
            Self::Left => "LEFT JOIN",
            Self::Right => "RIGHT JOIN",
            Self::Cross => "CROSS JOIN",
        }
    }
}

/// SQL type of a `JSON_TABLE` output column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum JsonColumnType {
    Varchar(u32),
    Bigint,
    Double,
    Boolean,
    MediumText,
}

impl JsonColumnType {
    #[must_use]
    pub fn to_sql(&self) -> String {
        match self {
            Self::Varchar(size) => format!("VARCHAR({size})"),
            Self::Bigint => String::from("BIGINT"),
            Self::Double => String::from("DOUBLE"),
            Self::Boolean => String::from("BOOLEAN"),
            Self::MediumText => String::from("MEDIUMTEXT"),
        }
    }
}

/// One `name TYPE PATH '$' ERROR ON ERROR` entry of a `JSON_TABLE`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JsonTableColumn {
    pub name: String,
    pub data_type: JsonColumnType,
}

/// A table reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TableReference {
    /// `name [AS alias]` where `name` is an identifier or an entity id.
    Table { name: NodeId, alias: Option<NodeId> },
    /// `left JOIN right [ON condition]`
    Join {
        left: NodeId,
        join_type: JoinType,
        right: NodeId,
        /// A search condition node.
        condition: Option<NodeId>,
    },
    /// `JSON_TABLE(column, '$[*]' COLUMNS(...)) [AS alias]`
    JsonTable {
        /// The list column being unnested.
        column: NodeId,
        columns: Vec<JsonTableColumn>,
        alias: Option<NodeId>,
    },
}

impl TableReference {
    /// Returns true for `JSON_TABLE(...)` references.
    #[must_use]
    pub const fn is_json_table(&self) -> bool {
        matches!(self, Self::JsonTable { .. })
    }
}

/// `WHERE condition`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WhereClause {
    pub condition: NodeId,
}

/// `GROUP BY a, b`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupByClause {
    pub columns: Vec<NodeId>,
}

/// `ASC` / `DESC`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum OrderingSpecification {
    Asc,
    Desc,
}

impl OrderingSpecification {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Asc => "ASC",
            Self::Desc => "DESC",
        }
    }
}

/// `ORDER BY spec, ...`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderByClause {
    /// [`SortSpecification`] nodes.
    pub specifications: Vec<NodeId>,
}

/// `key [ASC|DESC]`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortSpecification {
    pub key: NodeId,
    pub ordering: Option<OrderingSpecification>,
}

/// `LIMIT limit [OFFSET offset]`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    /// A literal node.
    pub limit: NodeId,
    /// A literal node.
    pub offset: Option<NodeId>,
}

/// FROM, WHERE, GROUP BY, ORDER BY and pagination, in that order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TableExpression {
    pub from: NodeId,
    pub where_clause: Option<NodeId>,
    pub group_by: Option<NodeId>,
    pub order_by: Option<NodeId>,
    pub pagination: Option<NodeId>,
}
