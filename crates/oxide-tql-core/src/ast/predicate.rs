//! Predicates and the boolean structure that combines them.

use super::NodeId;
use crate::types::BooleanFunctionName;

/// Comparison operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ComparisonOperator {
    Equal,
    NotEqual,
    Less,
    Greater,
    LessOrEqual,
    GreaterOrEqual,
}

impl ComparisonOperator {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Equal => "=",
            Self::NotEqual => "<>",
            Self::Less => "<",
            Self::Greater => ">",
            Self::LessOrEqual => "<=",
            Self::GreaterOrEqual => ">=",
        }
    }
}

/// `left op right`, where `right` is a row value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ComparisonPredicate {
    pub left: NodeId,
    pub operator: ComparisonOperator,
    pub right: NodeId,
}

/// `left [NOT] BETWEEN low AND high`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BetweenPredicate {
    pub left: NodeId,
    pub not: bool,
    pub low: NodeId,
    pub high: NodeId,
}

/// `left [NOT] IN (values)`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InPredicate {
    pub left: NodeId,
    pub not: bool,
    /// An [`InValueList`](super::InValueList) or a
    /// [`Subquery`](super::Subquery).
    pub values: NodeId,
}

/// `left [NOT] LIKE pattern [ESCAPE escape]`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LikePredicate {
    pub left: NodeId,
    pub not: bool,
    pub pattern: NodeId,
    pub escape: Option<NodeId>,
}

/// The right-hand keyword of an `IS` test.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IsCompareValue {
    Null,
    True,
    False,
    Unknown,
}

impl IsCompareValue {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Null => "NULL",
            Self::True => "TRUE",
            Self::False => "FALSE",
            Self::Unknown => "UNKNOWN",
        }
    }
}

/// `left IS [NOT] {NULL | TRUE | FALSE | UNKNOWN}`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IsPredicate {
    pub left: NodeId,
    pub not: bool,
    pub compare: IsCompareValue,
}

/// Which list-membership operator an array predicate uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ArrayHasKind {
    /// `HAS`: exact element match.
    Has,
    /// `HAS_LIKE`: element matches one of the patterns.
    HasLike,
}

impl ArrayHasKind {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Has => "HAS",
            Self::HasLike => "HAS_LIKE",
        }
    }
}

/// `left [NOT] HAS (values)` or `left [NOT] HAS_LIKE (values) [ESCAPE c]`
///
/// `left` must be a list-typed column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ArrayHasPredicate {
    pub kind: ArrayHasKind,
    pub left: NodeId,
    pub not: bool,
    /// An [`InValueList`](super::InValueList).
    pub values: NodeId,
    pub escape: Option<NodeId>,
}

/// `ISNAN(column)` or `ISINFINITY(column)`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BooleanFunctionPredicate {
    pub function: BooleanFunctionName,
    pub column: NodeId,
}

/// `TEXT_MATCHES(value)`: full-text search over the whole row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextMatchesPredicate {
    pub value: NodeId,
}

/// `MATCH(column) AGAINST(value)`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MatchAgainstPredicate {
    pub column: NodeId,
    pub value: NodeId,
}

/// `[NOT] EXISTS (subquery)` over an unnested list column.
///
/// This is the engine-native form of an [`ArrayHasPredicate`]. The subquery
/// selects from a `JSON_TABLE` whose source column is the original
/// left-hand side.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UnnestedHasPredicate {
    pub not: bool,
    /// A query specification node.
    pub subquery: NodeId,
}

/// Every predicate form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Predicate {
    Comparison(ComparisonPredicate),
    Between(BetweenPredicate),
    In(InPredicate),
    Like(LikePredicate),
    Is(IsPredicate),
    ArrayHas(ArrayHasPredicate),
    BooleanFunction(BooleanFunctionPredicate),
    TextMatches(TextMatchesPredicate),
    MatchAgainst(MatchAgainstPredicate),
    UnnestedHas(UnnestedHasPredicate),
}

impl Predicate {
    /// Returns the name of this predicate form, e.g. `"ArrayHas"`.
    #[must_use]
    pub const fn form(&self) -> &'static str {
        match self {
            Self::Comparison(_) => "Comparison",
            Self::Between(_) => "Between",
            Self::In(_) => "In",
            Self::Like(_) => "Like",
            Self::Is(_) => "Is",
            Self::ArrayHas(_) => "ArrayHas",
            Self::BooleanFunction(_) => "BooleanFunction",
            Self::TextMatches(_) => "TextMatches",
            Self::MatchAgainst(_) => "MatchAgainst",
            Self::UnnestedHas(_) => "UnnestedHas",
        }
    }

    /// Returns the node in the left-hand position, when the predicate has
    /// one directly.
    ///
    /// [`UnnestedHasPredicate`] keeps its left-hand side inside the subquery;
    /// use [`Ast::left_hand_side`](crate::Ast::left_hand_side) to resolve it.
    #[must_use]
    pub const fn left(&self) -> Option<NodeId> {
        match self {
            Self::Comparison(p) => Some(p.left),
            Self::Between(p) => Some(p.left),
            Self::In(p) => Some(p.left),
            Self::Like(p) => Some(p.left),
            Self::Is(p) => Some(p.left),
            Self::ArrayHas(p) => Some(p.left),
            Self::BooleanFunction(p) => Some(p.column),
            Self::MatchAgainst(p) => Some(p.column),
            Self::TextMatches(_) | Self::UnnestedHas(_) => None,
        }
    }

    /// Returns the nodes in right-hand positions, escape included.
    #[must_use]
    pub fn right(&self) -> Vec<NodeId> {
        match self {
            Self::Comparison(p) => vec![p.right],
            Self::Between(p) => vec![p.low, p.high],
            Self::In(p) => vec![p.values],
            Self::Like(p) => std::iter::once(p.pattern).chain(p.escape).collect(),
            Self::ArrayHas(p) => std::iter::once(p.values).chain(p.escape).collect(),
            Self::TextMatches(p) => vec![p.value],
            Self::MatchAgainst(p) => vec![p.value],
            Self::UnnestedHas(p) => vec![p.subquery],
            Self::Is(_) | Self::BooleanFunction(_) => vec![],
        }
    }

    /// Returns true when the predicate is negated with `NOT`.
    #[must_use]
    pub const fn is_negated(&self) -> bool {
        match self {
            Self::Between(p) => p.not,
            Self::In(p) => p.not,
            Self::Like(p) => p.not,
            Self::Is(p) => p.not,
            Self::ArrayHas(p) => p.not,
            Self::UnnestedHas(p) => p.not,
            Self::Comparison(_)
            | Self::BooleanFunction(_)
            | Self::TextMatches(_)
            | Self::MatchAgainst(_) => false,
        }
    }
}

/// An OR-list of [`BooleanTerm`] nodes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchCondition {
    pub terms: Vec<NodeId>,
}

/// An AND-list of [`BooleanFactor`] nodes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BooleanTerm {
    pub factors: Vec<NodeId>,
}

/// `[NOT] primary`
///
/// The primary is a predicate, a truth value, or a parenthesized search
/// condition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BooleanFactor {
    pub not: bool,
    pub primary: NodeId,
}
