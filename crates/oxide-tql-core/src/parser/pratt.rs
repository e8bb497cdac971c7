//! Operator precedence for value expressions.
//!
//! Only arithmetic is parsed by precedence climbing. Boolean structure
//! (`AND`, `OR`, `NOT`) has its own recursive-descent rules because it builds
//! [`SearchCondition`](crate::ast::SearchCondition) and
//! [`BooleanTerm`](crate::ast::BooleanTerm) lists rather than binary nodes.

use crate::ast::{ArithmeticOperator, ComparisonOperator, Sign};
use crate::lexer::TokenKind;

/// Binding power of a unary sign.
pub const PREFIX_BINDING_POWER: u8 = 15;

/// Returns `(left_bp, right_bp)` for an infix arithmetic operator.
///
/// All operators are left associative.
#[must_use]
pub const fn infix_binding_power(kind: &TokenKind) -> Option<(u8, u8)> {
    match kind {
        TokenKind::Plus | TokenKind::Minus => Some((13, 14)),
        TokenKind::Star | TokenKind::Slash | TokenKind::Percent => Some((15, 16)),
        _ => None,
    }
}

#[must_use]
pub const fn token_to_arithmetic_op(kind: &TokenKind) -> Option<ArithmeticOperator> {
    match kind {
        TokenKind::Plus => Some(ArithmeticOperator::Add),
        TokenKind::Minus => Some(ArithmeticOperator::Subtract),
        TokenKind::Star => Some(ArithmeticOperator::Multiply),
        TokenKind::Slash => Some(ArithmeticOperator::Divide),
        TokenKind::Percent => Some(ArithmeticOperator::Modulo),
        _ => None,
    }
}

#[must_use]
pub const fn token_to_sign(kind: &TokenKind) -> Option<Sign> {
    match kind {
        TokenKind::Plus => Some(Sign::Plus),
        TokenKind::Minus => Some(Sign::Minus),
        _ => None,
    }
}

#[must_use]
pub const fn token_to_comparison_op(kind: &TokenKind) -> Option<ComparisonOperator> {
    match kind {
        TokenKind::Eq => Some(ComparisonOperator::Equal),
        TokenKind::NotEq => Some(ComparisonOperator::NotEqual),
        TokenKind::Lt => Some(ComparisonOperator::Less),
        TokenKind::LtEq => Some(ComparisonOperator::LessOrEqual),
        TokenKind::Gt => Some(ComparisonOperator::Greater),
        TokenKind::GtEq => Some(ComparisonOperator::GreaterOrEqual),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_precedence_ordering() {
        let add = infix_binding_power(&TokenKind::Plus).unwrap();
        let mul = infix_binding_power(&TokenKind::Star).unwrap();
        assert!(mul.0 > add.0);
        assert!(PREFIX_BINDING_POWER >= mul.0);
    }

    #[test]
    fn test_left_associativity() {
        let (left, right) = infix_binding_power(&TokenKind::Minus).unwrap();
        assert!(left < right);
    }

    #[test]
    fn test_operator_tokens() {
        assert_eq!(
            token_to_arithmetic_op(&TokenKind::Percent),
            Some(ArithmeticOperator::Modulo)
        );
        assert_eq!(token_to_sign(&TokenKind::Star), None);
        assert_eq!(
            token_to_comparison_op(&TokenKind::NotEq),
            Some(ComparisonOperator::NotEqual)
        );
        assert_eq!(token_to_comparison_op(&TokenKind::Comma), None);
    }
}
