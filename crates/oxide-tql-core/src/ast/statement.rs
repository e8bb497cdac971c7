//! Statement roots: query specifications, unions and CTEs.

use super::NodeId;

/// `DISTINCT` / `ALL`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SetQuantifier {
    Distinct,
    All,
}

impl SetQuantifier {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Distinct => "DISTINCT",
            Self::All => "ALL",
        }
    }
}

/// `SELECT [quantifier] select_list table_expression`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuerySpecification {
    pub quantifier: Option<SetQuantifier>,
    pub select_list: NodeId,
    pub table_expression: NodeId,
}

/// Set operators joining two query bodies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SetOperator {
    Union,
    UnionAll,
    UnionDistinct,
}

impl SetOperator {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Union => "UNION",
            Self::UnionAll => "UNION ALL",
            Self::UnionDistinct => "UNION DISTINCT",
        }
    }
}

/// `left UNION [ALL] right`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SetOperation {
    pub left: NodeId,
    pub operator: SetOperator,
    pub right: NodeId,
}

/// `name [(columns)] AS (query)`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WithListElement {
    /// An identifier node.
    pub name: NodeId,
    /// Identifier nodes.
    pub columns: Vec<NodeId>,
    /// A query expression node.
    pub query: NodeId,
}

/// `[WITH element, ...] body`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryExpression {
    /// [`WithListElement`] nodes.
    pub with_list: Vec<NodeId>,
    /// A query specification or set operation node.
    pub body: NodeId,
}
