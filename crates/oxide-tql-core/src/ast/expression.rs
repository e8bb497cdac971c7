//! Value expression nodes.

use super::NodeId;
use crate::types::{
    ArrayFunctionType, ColumnType, CurrentUserFunctionName, MySqlFunctionName, SetFunctionType,
};

/// `[qualifier.]name`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnReference {
    /// Table, alias or CTE qualifier (an identifier node).
    pub qualifier: Option<NodeId>,
    /// Column name (an identifier node).
    pub name: NodeId,
}

/// A row value constructor: one value, or a parenthesized tuple.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowValue {
    pub values: Vec<NodeId>,
}

/// The value list of an `IN` or `HAS` predicate.
///
/// Rendered and enumerated in canonical order; duplicates are kept.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InValueList {
    pub values: Vec<NodeId>,
}

/// Binary arithmetic operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ArithmeticOperator {
    Add,
    Subtract,
    Multiply,
    Divide,
    Modulo,
}

impl ArithmeticOperator {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Add => "+",
            Self::Subtract => "-",
            Self::Multiply => "*",
            Self::Divide => "/",
            Self::Modulo => "%",
        }
    }
}

/// `left op right`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Arithmetic {
    pub left: NodeId,
    pub operator: ArithmeticOperator,
    pub right: NodeId,
}

/// Unary sign.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Sign {
    Plus,
    Minus,
}

impl Sign {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Plus => "+",
            Self::Minus => "-",
        }
    }
}

/// `-value`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SignedValue {
    pub sign: Sign,
    pub value: NodeId,
}

/// `( inner )`: a grouped value expression or search condition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Parenthesized {
    pub inner: NodeId,
}

/// An aggregate call such as `COUNT(*)` or `COUNT(DISTINCT foo)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SetFunction {
    pub function: SetFunctionType,
    pub distinct: bool,
    /// `None` stands for `*`.
    pub argument: Option<NodeId>,
}

/// A scalar MySQL function call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MySqlFunction {
    pub name: MySqlFunctionName,
    pub arguments: Vec<NodeId>,
}

/// A function over a list-typed column, e.g. `UNNEST(genes)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ArrayFunction {
    pub function: ArrayFunctionType,
    /// A column reference node.
    pub column: NodeId,
}

/// `CURRENT_USER()`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CurrentUserFunction {
    pub name: CurrentUserFunctionName,
}

/// `CASE [operand] WHEN ... THEN ... [ELSE ...] END`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaseExpression {
    /// Present for a simple case, absent for a searched case.
    pub operand: Option<NodeId>,
    /// [`WhenClause`] nodes.
    pub whens: Vec<NodeId>,
    pub otherwise: Option<NodeId>,
}

/// `WHEN condition THEN result`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WhenClause {
    /// A search condition for searched cases, a value for simple cases.
    pub condition: NodeId,
    pub result: NodeId,
}

/// `CAST(operand AS type)`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cast {
    pub operand: NodeId,
    pub target: ColumnType,
}

/// `( query )` used as a value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Subquery {
    /// A query expression node.
    pub query: NodeId,
}
