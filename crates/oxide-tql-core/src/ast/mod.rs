//! Node kinds of the table-query AST.
//!
//! Nodes live in an [`Ast`](crate::Ast) arena and refer to their children by
//! [`NodeId`]. Each node is one [`NodeKind`] variant; variants are grouped by
//! syntactic category into the submodules below.

mod clause;
mod expression;
mod leaf;
mod predicate;
mod statement;

use core::fmt;

pub use clause::{
    DerivedColumn, FromClause, GroupByClause, JoinType, JsonColumnType, JsonTableColumn,
    OrderByClause, OrderingSpecification, Pagination, SelectList, SortSpecification,
    TableExpression, TableReference, WhereClause,
};
pub use expression::{
    Arithmetic, ArithmeticOperator, ArrayFunction, CaseExpression, Cast, ColumnReference,
    CurrentUserFunction, InValueList, MySqlFunction, Parenthesized, RowValue, SetFunction, Sign,
    SignedValue, Subquery, WhenClause,
};
pub use leaf::{
    CharacterString, Delimiter, EntityId, Identifier, Literal, NullSpecification, TruthValue,
    MAX_CHARACTER_STRING_LENGTH,
};
pub use predicate::{
    ArrayHasKind, ArrayHasPredicate, BetweenPredicate, BooleanFactor, BooleanFunctionPredicate,
    BooleanTerm, ComparisonOperator, ComparisonPredicate, InPredicate, IsCompareValue,
    IsPredicate, LikePredicate, MatchAgainstPredicate, Predicate, SearchCondition,
    TextMatchesPredicate, UnnestedHasPredicate,
};
pub use statement::{
    QueryExpression, QuerySpecification, SetOperation, SetOperator, SetQuantifier,
    WithListElement,
};

/// Handle of a node inside an [`Ast`](crate::Ast).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(pub(crate) u32);

impl NodeId {
    /// Returns the arena index of the node.
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A node of the tree.
#[derive(Debug, Clone, PartialEq)]
pub enum NodeKind {
    // Leaves
    Identifier(Identifier),
    Literal(Literal),
    EntityId(EntityId),
    TruthValue(TruthValue),
    NullSpecification(NullSpecification),

    // Value expressions
    ColumnReference(ColumnReference),
    RowValue(RowValue),
    InValueList(InValueList),
    Arithmetic(Arithmetic),
    SignedValue(SignedValue),
    Parenthesized(Parenthesized),
    SetFunction(SetFunction),
    MySqlFunction(MySqlFunction),
    ArrayFunction(ArrayFunction),
    CurrentUserFunction(CurrentUserFunction),
    Case(CaseExpression),
    WhenClause(WhenClause),
    Cast(Cast),
    Subquery(Subquery),

    // Conditions
    Predicate(Predicate),
    SearchCondition(SearchCondition),
    BooleanTerm(BooleanTerm),
    BooleanFactor(BooleanFactor),

    // Clauses
    SelectList(SelectList),
    DerivedColumn(DerivedColumn),
    FromClause(FromClause),
    TableReference(TableReference),
    WhereClause(WhereClause),
    GroupByClause(GroupByClause),
    OrderByClause(OrderByClause),
    SortSpecification(SortSpecification),
    Pagination(Pagination),
    TableExpression(TableExpression),

    // Statements
    QuerySpecification(QuerySpecification),
    SetOperation(SetOperation),
    WithListElement(WithListElement),
    QueryExpression(QueryExpression),
}

/// Broad syntactic category of a node.
///
/// A node may only be replaced by a node of the same category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeCategory {
    /// Identifiers and entity ids.
    Name,
    /// Anything usable where a value is expected.
    Value,
    /// Predicates, truth values and parenthesized conditions.
    Predicate,
    /// AND/OR structure.
    Condition,
    TableReference,
    /// Query specifications, set operations and query expressions.
    Query,
    /// A structural node that can only be replaced by its own kind.
    Structure(&'static str),
}

impl fmt::Display for NodeCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Name => f.write_str("name"),
            Self::Value => f.write_str("value"),
            Self::Predicate => f.write_str("predicate"),
            Self::Condition => f.write_str("condition"),
            Self::TableReference => f.write_str("table reference"),
            Self::Query => f.write_str("query"),
            Self::Structure(name) => f.write_str(name),
        }
    }
}

impl NodeKind {
    /// Returns the name of the kind, e.g. `"SelectList"`.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Identifier(_) => "Identifier",
            Self::Literal(_) => "Literal",
            Self::EntityId(_) => "EntityId",
            Self::TruthValue(_) => "TruthValue",
            Self::NullSpecification(_) => "NullSpecification",
            Self::ColumnReference(_) => "ColumnReference",
            Self::RowValue(_) => "RowValue",
            Self::InValueList(_) => "InValueList",
            Self::Arithmetic(_) => "Arithmetic",
            Self::SignedValue(_) => "SignedValue",
            Self::Parenthesized(_) => "Parenthesized",
            Self::SetFunction(_) => "SetFunction",
            Self::MySqlFunction(_) => "MySqlFunction",
            Self::ArrayFunction(_) => "ArrayFunction",
            Self::CurrentUserFunction(_) => "CurrentUserFunction",
            Self::Case(_) => "Case",
            Self::WhenClause(_) => "WhenClause",
            Self::Cast(_) => "Cast",
            Self::Subquery(_) => "Subquery",
            Self::Predicate(_) => "Predicate",
            Self::SearchCondition(_) => "SearchCondition",
            Self::BooleanTerm(_) => "BooleanTerm",
            Self::BooleanFactor(_) => "BooleanFactor",
            Self::SelectList(_) => "SelectList",
            Self::DerivedColumn(_) => "DerivedColumn",
            Self::FromClause(_) => "FromClause",
            Self::TableReference(_) => "TableReference",
            Self::WhereClause(_) => "WhereClause",
            Self::GroupByClause(_) => "GroupByClause",
            Self::OrderByClause(_) => "OrderByClause",
            Self::SortSpecification(_) => "SortSpecification",
            Self::Pagination(_) => "Pagination",
            Self::TableExpression(_) => "TableExpression",
            Self::QuerySpecification(_) => "QuerySpecification",
            Self::SetOperation(_) => "SetOperation",
            Self::WithListElement(_) => "WithListElement",
            Self::QueryExpression(_) => "QueryExpression",
        }
    }

    /// Returns the category of the kind in isolation.
    ///
    /// A parenthesized search condition reports [`NodeCategory::Value`]
    /// here; [`Ast::category`](crate::Ast::category) looks inside it.
    #[must_use]
    pub const fn category(&self) -> NodeCategory {
        match self {
            Self::Identifier(_) | Self::EntityId(_) => NodeCategory::Name,
            Self::Literal(_)
            | Self::NullSpecification(_)
            | Self::ColumnReference(_)
            | Self::RowValue(_)
            | Self::InValueList(_)
            | Self::Arithmetic(_)
            | Self::SignedValue(_)
            | Self::Parenthesized(_)
            | Self::SetFunction(_)
            | Self::MySqlFunction(_)
            | Self::ArrayFunction(_)
            | Self::CurrentUserFunction(_)
            | Self::Case(_)
            | Self::Cast(_)
            | Self::Subquery(_) => NodeCategory::Value,
            Self::Predicate(_) | Self::TruthValue(_) => NodeCategory::Predicate,
            Self::SearchCondition(_) | Self::BooleanTerm(_) | Self::BooleanFactor(_) => {
                NodeCategory::Condition
            }
            Self::TableReference(_) => NodeCategory::TableReference,
            Self::QuerySpecification(_) | Self::SetOperation(_) | Self::QueryExpression(_) => {
                NodeCategory::Query
            }
            Self::WhenClause(_)
            | Self::SelectList(_)
            | Self::DerivedColumn(_)
            | Self::FromClause(_)
            | Self::WhereClause(_)
            | Self::GroupByClause(_)
            | Self::OrderByClause(_)
            | Self::SortSpecification(_)
            | Self::Pagination(_)
            | Self::TableExpression(_)
            | Self::WithListElement(_) => NodeCategory::Structure(self.name()),
        }
    }

    /// Returns true for leaves.
    #[must_use]
    pub const fn is_leaf(&self) -> bool {
        matches!(
            self,
            Self::Identifier(_)
                | Self::Literal(_)
                | Self::EntityId(_)
                | Self::TruthValue(_)
                | Self::NullSpecification(_)
        )
    }

    /// Returns true when this node, by itself, makes a query aggregate.
    ///
    /// The flag is local: children are not consulted.
    #[must_use]
    pub const fn is_aggregate(&self) -> bool {
        match self {
            Self::SetFunction(_) | Self::GroupByClause(_) => true,
            Self::QuerySpecification(q) => matches!(q.quantifier, Some(SetQuantifier::Distinct)),
            _ => false,
        }
    }
}

/// A payload type that can be found by typed search.
///
/// Implemented for every payload and for the [`Predicate`] and
/// [`TableReference`] category enums, so searching for `Predicate` matches
/// every predicate form.
pub trait NodeType {
    /// Returns the payload when `kind` holds this type.
    fn cast(kind: &NodeKind) -> Option<&Self>;
}

impl NodeType for NodeKind {
    fn cast(kind: &NodeKind) -> Option<&Self> {
        Some(kind)
    }
}

macro_rules! node_type {
    ($($variant:ident => $ty:ty),* $(,)?) => {
        $(
            impl NodeType for $ty {
                fn cast(kind: &NodeKind) -> Option<&Self> {
                    match kind {
                        NodeKind::$variant(payload) => Some(payload),
                        _ => None,
                    }
                }
            }

            impl From<$ty> for NodeKind {
                fn from(payload: $ty) -> Self {
                    Self::$variant(payload)
                }
            }
        )*
    };
}

node_type! {
    Identifier => Identifier,
    Literal => Literal,
    EntityId => EntityId,
    TruthValue => TruthValue,
    NullSpecification => NullSpecification,
    ColumnReference => ColumnReference,
    RowValue => RowValue,
    InValueList => InValueList,
    Arithmetic => Arithmetic,
    SignedValue => SignedValue,
    Parenthesized => Parenthesized,
    SetFunction => SetFunction,
    MySqlFunction => MySqlFunction,
    ArrayFunction => ArrayFunction,
    CurrentUserFunction => CurrentUserFunction,
    Case => CaseExpression,
    WhenClause => WhenClause,
    Cast => Cast,
    Subquery => Subquery,
    Predicate => Predicate,
    SearchCondition => SearchCondition,
    BooleanTerm => BooleanTerm,
    BooleanFactor => BooleanFactor,
    SelectList => SelectList,
    DerivedColumn => DerivedColumn,
    FromClause => FromClause,
    TableReference => TableReference,
    WhereClause => WhereClause,
    GroupByClause => GroupByClause,
    OrderByClause => OrderByClause,
    SortSpecification => SortSpecification,
    Pagination => Pagination,
    TableExpression => TableExpression,
    QuerySpecification => QuerySpecification,
    SetOperation => SetOperation,
    WithListElement => WithListElement,
    QueryExpression => QueryExpression,
}

macro_rules! predicate_type {
    ($($variant:ident => $ty:ty),* $(,)?) => {
        $(
            impl NodeType for $ty {
                fn cast(kind: &NodeKind) -> Option<&Self> {
                    match kind {
                        NodeKind::Predicate(Predicate::$variant(payload)) => Some(payload),
                        _ => None,
                    }
                }
            }

            impl From<$ty> for NodeKind {
                fn from(payload: $ty) -> Self {
                    Self::Predicate(Predicate::$variant(payload))
                }
            }
        )*
    };
}

predicate_type! {
    Comparison => ComparisonPredicate,
    Between => BetweenPredicate,
    In => InPredicate,
    Like => LikePredicate,
    Is => IsPredicate,
    ArrayHas => ArrayHasPredicate,
    BooleanFunction => BooleanFunctionPredicate,
    TextMatches => TextMatchesPredicate,
    MatchAgainst => MatchAgainstPredicate,
    UnnestedHas => UnnestedHasPredicate,
}
