//! Parser implementation.

use super::error::ParseError;
use super::pratt::{
    infix_binding_power, token_to_arithmetic_op, token_to_comparison_op, token_to_sign,
    PREFIX_BINDING_POWER,
};
use crate::ast::{
    Arithmetic, ArrayFunction, ArrayHasKind, ArrayHasPredicate, BetweenPredicate, BooleanFactor,
    BooleanFunctionPredicate, BooleanTerm, CaseExpression, Cast, ColumnReference,
    ComparisonPredicate, CurrentUserFunction, DerivedColumn, EntityId, FromClause,
    GroupByClause, Identifier, InPredicate, InValueList, IsCompareValue, IsPredicate, JoinType,
    JsonColumnType, JsonTableColumn, LikePredicate, Literal, MatchAgainstPredicate,
    MySqlFunction, NodeId, NullSpecification, OrderByClause, OrderingSpecification, Pagination,
    Parenthesized, QueryExpression, QuerySpecification, RowValue, SearchCondition, SelectList,
    SetFunction, SetOperation, SetOperator, SetQuantifier, Sign, SignedValue, SortSpecification,
    Subquery, TableExpression, TableReference, TextMatchesPredicate, TruthValue,
    UnnestedHasPredicate, WhenClause, WhereClause, WithListElement,
};
use crate::lexer::{Keyword, Lexer, Span, Token, TokenKind};
use crate::tree::Ast;
use crate::types::{
    ArrayFunctionType, BooleanFunctionName, ColumnType, CurrentUserFunctionName,
    MySqlFunctionName, SetFunctionType,
};

/// Parser for the table-query dialect.
///
/// Each entry point consumes the parser and returns the [`Ast`] it built,
/// linked and with its root recorded.
pub struct Parser<'a> {
    lexer: Lexer<'a>,
    current: Token,
    previous: Token,
    ast: Ast,
}

impl<'a> Parser<'a> {
    #[must_use]
    pub fn new(input: &'a str) -> Self {
        let mut lexer = Lexer::new(input);
        let current = lexer.next_token();
        Self {
            lexer,
            current,
            previous: Token::new(TokenKind::Eof, Span::default()),
            ast: Ast::new(),
        }
    }

    /// Parses a complete query: `[WITH ...] SELECT ... [UNION SELECT ...]`.
    ///
    /// The root is a [`QueryExpression`].
    ///
    /// # Errors
    ///
    /// Returns a `ParseError` if the input is not a valid query.
    pub fn parse_query(mut self) -> Result<Ast, ParseError> {
        let root = self.parse_query_expression()?;
        self.finish(root)
    }

    /// Parses a standalone search condition such as `a = 1 OR b HAS ('x')`.
    ///
    /// # Errors
    ///
    /// Returns a `ParseError` if the input is not a valid search condition.
    pub fn parse_search_condition(mut self) -> Result<Ast, ParseError> {
        let root = self.parse_condition()?;
        self.finish(root)
    }

    /// Parses a standalone value expression such as `COUNT(DISTINCT a)`.
    ///
    /// # Errors
    ///
    /// Returns a `ParseError` if the input is not a valid value expression.
    pub fn parse_value_expression(mut self) -> Result<Ast, ParseError> {
        let root = self.parse_expression(0)?;
        self.finish(root)
    }

    fn finish(mut self, root: NodeId) -> Result<Ast, ParseError> {
        if self.check(&TokenKind::Semicolon) {
            self.advance();
        }
        if !self.current.is_eof() {
            return Err(self.error_expected("end of input"));
        }
        let span = Span::new(0, self.current.span.end);
        self.ast
            .recursive_set_parent(root)
            .map_err(|e| ParseError::tree(&e, span))?;
        self.ast.set_root(root);
        Ok(self.ast)
    }

    // Statements

    fn parse_query_expression(&mut self) -> Result<NodeId, ParseError> {
        let mut with_list = vec![];
        if self.check_keyword(Keyword::With) {
            self.advance();
            loop {
                with_list.push(self.parse_with_list_element()?);
                if !self.check(&TokenKind::Comma) {
                    break;
                }
                self.advance();
            }
        }
        let body = self.parse_query_body()?;
        Ok(self.ast.add(QueryExpression { with_list, body }))
    }

    fn parse_with_list_element(&mut self) -> Result<NodeId, ParseError> {
        let name = self.parse_identifier()?;
        let mut columns = vec![];
        if self.check(&TokenKind::LeftParen) {
            self.advance();
            loop {
                columns.push(self.parse_identifier()?);
                if !self.check(&TokenKind::Comma) {
                    break;
                }
                self.advance();
            }
            self.expect(&TokenKind::RightParen)?;
        }
        self.expect_keyword(Keyword::As)?;
        self.expect(&TokenKind::LeftParen)?;
        let query = self.parse_query_expression()?;
        self.expect(&TokenKind::RightParen)?;
        Ok(self.ast.add(WithListElement {
            name,
            columns,
            query,
        }))
    }

    fn parse_query_body(&mut self) -> Result<NodeId, ParseError> {
        let mut left = self.parse_query_specification()?;
        while self.check_keyword(Keyword::Union) {
            self.advance();
            let operator = if self.eat_keyword(Keyword::All) {
                SetOperator::UnionAll
            } else if self.eat_keyword(Keyword::Distinct) {
                SetOperator::UnionDistinct
            } else {
                SetOperator::Union
            };
            let right = self.parse_query_specification()?;
            left = self.ast.add(SetOperation {
                left,
                operator,
                right,
            });
        }
        Ok(left)
    }

    fn parse_query_specification(&mut self) -> Result<NodeId, ParseError> {
        self.expect_keyword(Keyword::Select)?;
        let quantifier = if self.eat_keyword(Keyword::Distinct) {
            Some(SetQuantifier::Distinct)
        } else if self.eat_keyword(Keyword::All) {
            Some(SetQuantifier::All)
        } else {
            None
        };
        let select_list = self.parse_select_list()?;
        let table_expression = self.parse_table_expression()?;
        Ok(self.ast.add(QuerySpecification {
            quantifier,
            select_list,
            table_expression,
        }))
    }

    // Clauses

    fn parse_select_list(&mut self) -> Result<NodeId, ParseError> {
        if self.check(&TokenKind::Star) {
            self.advance();
            return Ok(self.ast.add(SelectList::Asterisk));
        }
        let mut columns = vec![];
        loop {
            let value = self.parse_expression(0)?;
            let alias = self.parse_optional_alias()?;
            columns.push(self.ast.add(DerivedColumn { value, alias }));
            if !self.check(&TokenKind::Comma) {
                break;
            }
            self.advance();
        }
        Ok(self.ast.add(SelectList::Columns(columns)))
    }

    fn parse_table_expression(&mut self) -> Result<NodeId, ParseError> {
        self.expect_keyword(Keyword::From)?;
        let table = self.parse_table_reference()?;
        let from = self.ast.add(FromClause { table });

        let where_clause = if self.eat_keyword(Keyword::Where) {
            let condition = self.parse_condition()?;
            Some(self.ast.add(WhereClause { condition }))
        } else {
            None
        };

        let group_by = if self.eat_keyword(Keyword::Group) {
            self.expect_keyword(Keyword::By)?;
            let columns = self.parse_expression_list()?;
            Some(self.ast.add(GroupByClause { columns }))
        } else {
            None
        };

        let order_by = if self.eat_keyword(Keyword::Order) {
            self.expect_keyword(Keyword::By)?;
            let mut specifications = vec![];
            loop {
                specifications.push(self.parse_sort_specification()?);
                if !self.check(&TokenKind::Comma) {
                    break;
                }
                self.advance();
            }
            Some(self.ast.add(OrderByClause { specifications }))
        } else {
            None
        };

        let pagination = if self.eat_keyword(Keyword::Limit) {
            let limit = self.parse_pagination_value()?;
            let offset = if self.eat_keyword(Keyword::Offset) {
                Some(self.parse_pagination_value()?)
            } else {
                None
            };
            Some(self.ast.add(Pagination { limit, offset }))
        } else {
            None
        };

        Ok(self.ast.add(TableExpression {
            from,
            where_clause,
            group_by,
            order_by,
            pagination,
        }))
    }

    fn parse_sort_specification(&mut self) -> Result<NodeId, ParseError> {
        let key = self.parse_expression(0)?;
        let ordering = if self.eat_keyword(Keyword::Asc) {
            Some(OrderingSpecification::Asc)
        } else if self.eat_keyword(Keyword::Desc) {
            Some(OrderingSpecification::Desc)
        } else {
            None
        };
        Ok(self.ast.add(SortSpecification { key, ordering }))
    }

    fn parse_pagination_value(&mut self) -> Result<NodeId, ParseError> {
        match self.current.kind {
            TokenKind::Integer(n) => {
                self.advance();
                Ok(self.ast.add(Literal::Integer(n)))
            }
            TokenKind::Colon => self.parse_bind(),
            _ => Err(self.error_expected("integer")),
        }
    }

    fn parse_optional_alias(&mut self) -> Result<Option<NodeId>, ParseError> {
        if self.eat_keyword(Keyword::As) || self.at_identifier() {
            Ok(Some(self.parse_identifier()?))
        } else {
            Ok(None)
        }
    }

    // Table references

    fn parse_table_reference(&mut self) -> Result<NodeId, ParseError> {
        let mut left = self.parse_table_primary()?;
        while self.is_join_keyword() {
            let join_type = self.parse_join_type()?;
            let right = self.parse_table_primary()?;
            let condition = if join_type != JoinType::Cross && self.eat_keyword(Keyword::On) {
                Some(self.parse_condition()?)
            } else {
                None
            };
            left = self.ast.add(TableReference::Join {
                left,
                join_type,
                right,
                condition,
            });
        }
        Ok(left)
    }

    fn parse_table_primary(&mut self) -> Result<NodeId, ParseError> {
        if self.check_name("JSON_TABLE") && self.peek_kind() == TokenKind::LeftParen {
            return self.parse_json_table();
        }
        let name = self.parse_table_name()?;
        let alias = self.parse_optional_alias()?;
        Ok(self.ast.add(TableReference::Table { name, alias }))
    }

    /// Parses `syn123`, `syn123.4` or an identifier.
    fn parse_table_name(&mut self) -> Result<NodeId, ParseError> {
        let TokenKind::Identifier(text) = &self.current.kind else {
            return self.parse_identifier();
        };
        let Some(mut entity) = EntityId::parse(text) else {
            return self.parse_identifier();
        };
        self.advance();
        if self.check(&TokenKind::Dot) {
            self.advance();
            let TokenKind::Integer(version) = self.current.kind else {
                return Err(self.error_expected("version number"));
            };
            let version = u64::try_from(version)
                .map_err(|e| ParseError::new(e.to_string(), self.current.span))?;
            entity.version = Some(version);
            self.advance();
        }
        Ok(self.ast.add(entity))
    }

    fn is_join_keyword(&self) -> bool {
        matches!(
            &self.current.kind,
            TokenKind::Keyword(
                Keyword::Join | Keyword::Inner | Keyword::Left | Keyword::Right | Keyword::Cross
            )
        )
    }

    fn parse_join_type(&mut self) -> Result<JoinType, ParseError> {
        let join_type = match &self.current.kind {
            TokenKind::Keyword(Keyword::Join) => {
                self.advance();
                return Ok(JoinType::Inner);
            }
            TokenKind::Keyword(Keyword::Inner) => JoinType::Inner,
            TokenKind::Keyword(Keyword::Left) => JoinType::Left,
            TokenKind::Keyword(Keyword::Right) => JoinType::Right,
            TokenKind::Keyword(Keyword::Cross) => JoinType::Cross,
            _ => return Err(self.error_expected("JOIN keyword")),
        };
        self.advance();
        if matches!(join_type, JoinType::Left | JoinType::Right) {
            self.eat_keyword(Keyword::Outer);
        }
        self.expect_keyword(Keyword::Join)?;
        Ok(join_type)
    }

    /// Parses `JSON_TABLE(column, '$[*]' COLUMNS(...)) [AS alias]`.
    fn parse_json_table(&mut self) -> Result<NodeId, ParseError> {
        self.advance();
        self.expect(&TokenKind::LeftParen)?;
        let column = self.parse_column_reference()?;
        self.expect(&TokenKind::Comma)?;
        self.expect_string("$[*]")?;
        self.expect_name("COLUMNS")?;
        self.expect(&TokenKind::LeftParen)?;
        let mut columns = vec![];
        loop {
            columns.push(self.parse_json_table_column()?);
            if !self.check(&TokenKind::Comma) {
                break;
            }
            self.advance();
        }
        self.expect(&TokenKind::RightParen)?;
        self.expect(&TokenKind::RightParen)?;
        let alias = self.parse_optional_alias()?;
        Ok(self.ast.add(TableReference::JsonTable {
            column,
            columns,
            alias,
        }))
    }

    fn parse_json_table_column(&mut self) -> Result<JsonTableColumn, ParseError> {
        let TokenKind::Identifier(name) = &self.current.kind else {
            return Err(self.error_expected("column name"));
        };
        let name = name.clone();
        self.advance();
        let data_type = self.parse_json_column_type()?;
        self.expect_name("PATH")?;
        self.expect_string("$")?;
        self.expect_name("ERROR")?;
        self.expect_keyword(Keyword::On)?;
        self.expect_name("ERROR")?;
        Ok(JsonTableColumn { name, data_type })
    }

    fn parse_json_column_type(&mut self) -> Result<JsonColumnType, ParseError> {
        let TokenKind::Identifier(name) = &self.current.kind else {
            return Err(self.error_expected("column type"));
        };
        let name = name.to_ascii_uppercase();
        let span = self.current.span;
        self.advance();
        match name.as_str() {
            "VARCHAR" => {
                self.expect(&TokenKind::LeftParen)?;
                let TokenKind::Integer(size) = self.current.kind else {
                    return Err(self.error_expected("size"));
                };
                let size = u32::try_from(size)
                    .map_err(|e| ParseError::new(e.to_string(), self.current.span))?;
                self.advance();
                self.expect(&TokenKind::RightParen)?;
                Ok(JsonColumnType::Varchar(size))
            }
            "BIGINT" => Ok(JsonColumnType::Bigint),
            "DOUBLE" => Ok(JsonColumnType::Double),
            "BOOLEAN" => Ok(JsonColumnType::Boolean),
            "MEDIUMTEXT" => Ok(JsonColumnType::MediumText),
            _ => Err(ParseError::new(
                format!("Unknown JSON_TABLE column type: {name}"),
                span,
            )),
        }
    }

    // Search conditions

    fn parse_condition(&mut self) -> Result<NodeId, ParseError> {
        let mut terms = vec![self.parse_boolean_term()?];
        while self.eat_keyword(Keyword::Or) {
            terms.push(self.parse_boolean_term()?);
        }
        Ok(self.ast.add(SearchCondition { terms }))
    }

    fn parse_boolean_term(&mut self) -> Result<NodeId, ParseError> {
        let mut factors = vec![self.parse_boolean_factor()?];
        while self.eat_keyword(Keyword::And) {
            factors.push(self.parse_boolean_factor()?);
        }
        Ok(self.ast.add(BooleanTerm { factors }))
    }

    fn parse_boolean_factor(&mut self) -> Result<NodeId, ParseError> {
        // `NOT EXISTS` is a single predicate form, not a negated factor.
        let not = self.check_keyword(Keyword::Not)
            && self.peek_kind() != TokenKind::Keyword(Keyword::Exists);
        if not {
            self.advance();
        }
        let primary = self.parse_boolean_primary()?;
        Ok(self.ast.add(BooleanFactor { not, primary }))
    }

    fn parse_boolean_primary(&mut self) -> Result<NodeId, ParseError> {
        let kind = self.current.kind.clone();
        match kind {
            TokenKind::LeftParen => {
                self.advance();
                let inner = self.parse_condition()?;
                self.expect(&TokenKind::RightParen)?;
                Ok(self.ast.add(Parenthesized { inner }))
            }
            TokenKind::Keyword(Keyword::True | Keyword::False | Keyword::Unknown) => {
                self.parse_truth_value()
            }
            TokenKind::Keyword(Keyword::Not) => {
                self.advance();
                self.parse_exists(true)
            }
            TokenKind::Keyword(Keyword::Exists) => self.parse_exists(false),
            TokenKind::Identifier(name) if self.peek_kind() == TokenKind::LeftParen => {
                if name.eq_ignore_ascii_case("TEXT_MATCHES") {
                    self.advance();
                    self.expect(&TokenKind::LeftParen)?;
                    let value = self.parse_expression(0)?;
                    self.expect(&TokenKind::RightParen)?;
                    Ok(self.ast.add(TextMatchesPredicate { value }))
                } else if name.eq_ignore_ascii_case("MATCH") {
                    self.parse_match_against()
                } else if let Some(function) = BooleanFunctionName::from_name(&name) {
                    self.advance();
                    self.expect(&TokenKind::LeftParen)?;
                    let column = self.parse_column_reference()?;
                    self.expect(&TokenKind::RightParen)?;
                    Ok(self.ast.add(BooleanFunctionPredicate { function, column }))
                } else {
                    self.parse_predicate()
                }
            }
            _ => self.parse_predicate(),
        }
    }

    fn parse_truth_value(&mut self) -> Result<NodeId, ParseError> {
        let value = match self.current.kind {
            TokenKind::Keyword(Keyword::True) => TruthValue::True,
            TokenKind::Keyword(Keyword::False) => TruthValue::False,
            TokenKind::Keyword(Keyword::Unknown) => TruthValue::Unknown,
            _ => return Err(self.error_expected("TRUE, FALSE or UNKNOWN")),
        };
        self.advance();
        Ok(self.ast.add(value))
    }

    /// Parses `EXISTS (SELECT ...)`; a leading `NOT` is already consumed.
    fn parse_exists(&mut self, not: bool) -> Result<NodeId, ParseError> {
        self.expect_keyword(Keyword::Exists)?;
        self.expect(&TokenKind::LeftParen)?;
        let subquery = self.parse_query_specification()?;
        self.expect(&TokenKind::RightParen)?;
        Ok(self.ast.add(UnnestedHasPredicate { not, subquery }))
    }

    /// Parses `MATCH(column) AGAINST(value)`.
    fn parse_match_against(&mut self) -> Result<NodeId, ParseError> {
        self.advance();
        self.expect(&TokenKind::LeftParen)?;
        let column = self.parse_column_reference()?;
        self.expect(&TokenKind::RightParen)?;
        self.expect_name("AGAINST")?;
        self.expect(&TokenKind::LeftParen)?;
        let value = self.parse_expression(0)?;
        self.expect(&TokenKind::RightParen)?;
        Ok(self.ast.add(MatchAgainstPredicate { column, value }))
    }

    /// Parses a column-anchored predicate.
    fn parse_predicate(&mut self) -> Result<NodeId, ParseError> {
        let left = self.parse_column_reference()?;

        if let Some(operator) = token_to_comparison_op(&self.current.kind) {
            self.advance();
            let right = self.parse_expression(0)?;
            return Ok(self.ast.add(ComparisonPredicate {
                left,
                operator,
                right,
            }));
        }

        if self.eat_keyword(Keyword::Is) {
            let not = self.eat_keyword(Keyword::Not);
            let compare = match self.current.kind {
                TokenKind::Keyword(Keyword::Null) => IsCompareValue::Null,
                TokenKind::Keyword(Keyword::True) => IsCompareValue::True,
                TokenKind::Keyword(Keyword::False) => IsCompareValue::False,
                TokenKind::Keyword(Keyword::Unknown) => IsCompareValue::Unknown,
                _ => return Err(self.error_expected("NULL, TRUE, FALSE or UNKNOWN")),
            };
            self.advance();
            return Ok(self.ast.add(IsPredicate { left, not, compare }));
        }

        let not = self.eat_keyword(Keyword::Not);
        match self.current.kind {
            TokenKind::Keyword(Keyword::Between) => {
                self.advance();
                let low = self.parse_expression(0)?;
                self.expect_keyword(Keyword::And)?;
                let high = self.parse_expression(0)?;
                Ok(self.ast.add(BetweenPredicate {
                    left,
                    not,
                    low,
                    high,
                }))
            }
            TokenKind::Keyword(Keyword::In) => {
                self.advance();
                let values = self.parse_in_values()?;
                Ok(self.ast.add(InPredicate { left, not, values }))
            }
            TokenKind::Keyword(Keyword::Like) => {
                self.advance();
                let pattern = self.parse_expression(0)?;
                let escape = self.parse_optional_escape()?;
                Ok(self.ast.add(LikePredicate {
                    left,
                    not,
                    pattern,
                    escape,
                }))
            }
            TokenKind::Keyword(keyword @ (Keyword::Has | Keyword::HasLike)) => {
                self.advance();
                let kind = if keyword == Keyword::Has {
                    ArrayHasKind::Has
                } else {
                    ArrayHasKind::HasLike
                };
                self.expect(&TokenKind::LeftParen)?;
                let values = self.parse_expression_list()?;
                self.expect(&TokenKind::RightParen)?;
                let values = self.ast.add(InValueList { values });
                let escape = self.parse_optional_escape()?;
                Ok(self.ast.add(ArrayHasPredicate {
                    kind,
                    left,
                    not,
                    values,
                    escape,
                }))
            }
            _ => Err(self.error_expected("predicate operator")),
        }
    }

    /// Parses `(v1, v2, ...)` or `(SELECT ...)` after `IN`.
    fn parse_in_values(&mut self) -> Result<NodeId, ParseError> {
        self.expect(&TokenKind::LeftParen)?;
        let values = if self.check_keyword(Keyword::Select) || self.check_keyword(Keyword::With) {
            let query = self.parse_query_expression()?;
            self.ast.add(Subquery { query })
        } else {
            let values = self.parse_expression_list()?;
            self.ast.add(InValueList { values })
        };
        self.expect(&TokenKind::RightParen)?;
        Ok(values)
    }

    fn parse_optional_escape(&mut self) -> Result<Option<NodeId>, ParseError> {
        if self.eat_keyword(Keyword::Escape) {
            Ok(Some(self.parse_expression(0)?))
        } else {
            Ok(None)
        }
    }

    // Value expressions

    /// Parses a value expression using Pratt parsing.
    fn parse_expression(&mut self, min_bp: u8) -> Result<NodeId, ParseError> {
        let mut lhs = self.parse_prefix()?;

        while let Some((l_bp, r_bp)) = infix_binding_power(&self.current.kind) {
            if l_bp < min_bp {
                break;
            }
            let Some(operator) = token_to_arithmetic_op(&self.current.kind) else {
                break;
            };
            self.advance();
            let right = self.parse_expression(r_bp)?;
            lhs = self.ast.add(Arithmetic {
                left: lhs,
                operator,
                right,
            });
        }

        Ok(lhs)
    }

    fn parse_prefix(&mut self) -> Result<NodeId, ParseError> {
        let Some(sign) = token_to_sign(&self.current.kind) else {
            return self.parse_primary();
        };
        self.advance();
        // A signed number is a single literal.
        let negate = sign == Sign::Minus;
        match self.current.kind {
            TokenKind::Integer(n) => {
                self.advance();
                Ok(self.ast.add(Literal::Integer(if negate { -n } else { n })))
            }
            TokenKind::Float(f) => {
                self.advance();
                Ok(self.ast.add(Literal::Decimal(if negate { -f } else { f })))
            }
            _ => {
                let value = self.parse_expression(PREFIX_BINDING_POWER)?;
                Ok(self.ast.add(SignedValue { sign, value }))
            }
        }
    }

    fn parse_primary(&mut self) -> Result<NodeId, ParseError> {
        let token = self.current.clone();
        match token.kind {
            TokenKind::Integer(n) => {
                self.advance();
                Ok(self.ast.add(Literal::Integer(n)))
            }
            TokenKind::Float(f) => {
                self.advance();
                Ok(self.ast.add(Literal::Decimal(f)))
            }
            TokenKind::String(value) => {
                self.advance();
                let literal = Literal::string(value).map_err(|e| ParseError::tree(&e, token.span))?;
                Ok(self.ast.add(literal))
            }
            TokenKind::Colon => self.parse_bind(),
            TokenKind::Keyword(Keyword::Null) => {
                self.advance();
                Ok(self.ast.add(NullSpecification))
            }
            TokenKind::Keyword(Keyword::True | Keyword::False | Keyword::Unknown) => {
                self.parse_truth_value()
            }
            TokenKind::Keyword(Keyword::Case) => self.parse_case_expression(),
            TokenKind::Keyword(Keyword::Cast) => self.parse_cast_expression(),
            TokenKind::LeftParen => {
                self.advance();
                if self.check_keyword(Keyword::Select) || self.check_keyword(Keyword::With) {
                    let query = self.parse_query_expression()?;
                    self.expect(&TokenKind::RightParen)?;
                    return Ok(self.ast.add(Subquery { query }));
                }
                let values = self.parse_expression_list()?;
                self.expect(&TokenKind::RightParen)?;
                match values.as_slice() {
                    [inner] => Ok(self.ast.add(Parenthesized { inner: *inner })),
                    _ => Ok(self.ast.add(RowValue { values })),
                }
            }
            TokenKind::Identifier(name) if self.peek_kind() == TokenKind::LeftParen => {
                self.parse_function_call(&name, token.span)
            }
            TokenKind::Identifier(name) => {
                match MySqlFunctionName::from_name(&name).filter(MySqlFunctionName::is_niladic) {
                    Some(name) => {
                        self.advance();
                        Ok(self.ast.add(MySqlFunction {
                            name,
                            arguments: vec![],
                        }))
                    }
                    None => self.parse_column_reference(),
                }
            }
            TokenKind::DelimitedIdentifier { .. } => self.parse_column_reference(),
            _ => Err(self.error_expected("value expression")),
        }
    }

    fn parse_bind(&mut self) -> Result<NodeId, ParseError> {
        self.expect(&TokenKind::Colon)?;
        let TokenKind::Identifier(name) = &self.current.kind else {
            return Err(self.error_expected("bind variable name"));
        };
        let literal = Literal::Bind(name.clone());
        self.advance();
        Ok(self.ast.add(literal))
    }

    fn parse_function_call(&mut self, name: &str, span: Span) -> Result<NodeId, ParseError> {
        self.advance();
        self.expect(&TokenKind::LeftParen)?;

        let node = if let Some(function) = SetFunctionType::from_name(name) {
            let distinct = self.eat_keyword(Keyword::Distinct);
            let argument = if !distinct && self.check(&TokenKind::Star) {
                self.advance();
                None
            } else {
                let values = self.parse_expression_list()?;
                Some(match values.as_slice() {
                    [single] => *single,
                    _ => self.ast.add(RowValue { values }),
                })
            };
            self.ast.add(SetFunction {
                function,
                distinct,
                argument,
            })
        } else if let Some(function) = ArrayFunctionType::from_name(name) {
            let column = self.parse_column_reference()?;
            self.ast.add(ArrayFunction { function, column })
        } else if let Some(name) = CurrentUserFunctionName::from_name(name) {
            self.ast.add(CurrentUserFunction { name })
        } else if let Some(name) = MySqlFunctionName::from_name(name) {
            let arguments = if self.check(&TokenKind::RightParen) {
                vec![]
            } else {
                self.parse_expression_list()?
            };
            self.ast.add(MySqlFunction { name, arguments })
        } else {
            return Err(ParseError::new(format!("Unknown function: {name}"), span));
        };

        self.expect(&TokenKind::RightParen)?;
        Ok(node)
    }

    fn parse_case_expression(&mut self) -> Result<NodeId, ParseError> {
        self.expect_keyword(Keyword::Case)?;
        let operand = if self.check_keyword(Keyword::When) {
            None
        } else {
            Some(self.parse_expression(0)?)
        };

        let mut whens = vec![];
        while self.eat_keyword(Keyword::When) {
            // A simple case compares values; a searched case tests conditions.
            let condition = if operand.is_some() {
                self.parse_expression(0)?
            } else {
                self.parse_condition()?
            };
            self.expect_keyword(Keyword::Then)?;
            let result = self.parse_expression(0)?;
            whens.push(self.ast.add(WhenClause { condition, result }));
        }
        if whens.is_empty() {
            return Err(self.error_expected("WHEN"));
        }

        let otherwise = if self.eat_keyword(Keyword::Else) {
            Some(self.parse_expression(0)?)
        } else {
            None
        };
        self.expect_keyword(Keyword::End)?;
        Ok(self.ast.add(CaseExpression {
            operand,
            whens,
            otherwise,
        }))
    }

    fn parse_cast_expression(&mut self) -> Result<NodeId, ParseError> {
        self.expect_keyword(Keyword::Cast)?;
        self.expect(&TokenKind::LeftParen)?;
        let operand = self.parse_expression(0)?;
        self.expect_keyword(Keyword::As)?;
        let TokenKind::Identifier(name) = &self.current.kind else {
            return Err(self.error_expected("column type"));
        };
        let target = name
            .parse::<ColumnType>()
            .map_err(|e| ParseError::new(e.to_string(), self.current.span))?;
        self.advance();
        self.expect(&TokenKind::RightParen)?;
        Ok(self.ast.add(Cast { operand, target }))
    }

    fn parse_column_reference(&mut self) -> Result<NodeId, ParseError> {
        let first = self.parse_identifier()?;
        if !self.check(&TokenKind::Dot) {
            return Ok(self.ast.add(ColumnReference {
                qualifier: None,
                name: first,
            }));
        }
        self.advance();
        let name = self.parse_identifier()?;
        Ok(self.ast.add(ColumnReference {
            qualifier: Some(first),
            name,
        }))
    }

    fn parse_expression_list(&mut self) -> Result<Vec<NodeId>, ParseError> {
        let mut values = vec![self.parse_expression(0)?];
        while self.check(&TokenKind::Comma) {
            self.advance();
            values.push(self.parse_expression(0)?);
        }
        Ok(values)
    }

    fn parse_identifier(&mut self) -> Result<NodeId, ParseError> {
        let identifier = match &self.current.kind {
            TokenKind::Identifier(name) => Identifier::regular(name.clone()),
            TokenKind::DelimitedIdentifier { value, delimiter } => Identifier::Delimited {
                value: value.clone(),
                delimiter: *delimiter,
            },
            _ => return Err(self.error_expected("identifier")),
        };
        self.advance();
        Ok(self.ast.add(identifier))
    }

    // Token helpers

    fn advance(&mut self) {
        self.previous = core::mem::replace(&mut self.current, self.lexer.next_token());
    }

    /// Returns the kind of the token after the current one.
    fn peek_kind(&self) -> TokenKind {
        self.lexer.clone().next_token().kind
    }

    fn check(&self, kind: &TokenKind) -> bool {
        core::mem::discriminant(&self.current.kind) == core::mem::discriminant(kind)
    }

    fn check_keyword(&self, keyword: Keyword) -> bool {
        matches!(&self.current.kind, TokenKind::Keyword(kw) if *kw == keyword)
    }

    /// Checks for a non-reserved word such as `COLUMNS` or `AGAINST`.
    fn check_name(&self, name: &str) -> bool {
        matches!(&self.current.kind, TokenKind::Identifier(text) if text.eq_ignore_ascii_case(name))
    }

    fn at_identifier(&self) -> bool {
        matches!(
            &self.current.kind,
            TokenKind::Identifier(_) | TokenKind::DelimitedIdentifier { .. }
        )
    }

    /// Consumes the keyword if it is current.
    fn eat_keyword(&mut self, keyword: Keyword) -> bool {
        let found = self.check_keyword(keyword);
        if found {
            self.advance();
        }
        found
    }

    fn expect(&mut self, kind: &TokenKind) -> Result<(), ParseError> {
        if self.check(kind) {
            self.advance();
            Ok(())
        } else {
            Err(self.error_expected(&format!("{kind:?}")))
        }
    }

    fn expect_keyword(&mut self, keyword: Keyword) -> Result<(), ParseError> {
        if self.eat_keyword(keyword) {
            Ok(())
        } else {
            Err(self.error_expected(keyword.as_str()))
        }
    }

    fn expect_name(&mut self, name: &str) -> Result<(), ParseError> {
        if self.check_name(name) {
            self.advance();
            Ok(())
        } else {
            Err(self.error_expected(name))
        }
    }

    fn expect_string(&mut self, value: &str) -> Result<(), ParseError> {
        if matches!(&self.current.kind, TokenKind::String(s) if s == value) {
            self.advance();
            Ok(())
        } else {
            Err(self.error_expected(&format!("'{value}'")))
        }
    }

    fn error_expected(&self, expected: &str) -> ParseError {
        match &self.current.kind {
            TokenKind::Eof => ParseError::unexpected_eof(expected, self.current.span),
            TokenKind::Error(message) => ParseError::new(message.clone(), self.current.span),
            kind => ParseError::unexpected(expected, kind.clone(), self.current.span),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{NodeKind, Predicate};

    fn parse(sql: &str) -> Result<Ast, ParseError> {
        Parser::new(sql).parse_query()
    }

    fn round_trip(sql: &str) -> String {
        let ast = parse(sql).unwrap();
        ast.to_sql(ast.root().unwrap())
    }

    #[test]
    fn test_simple_select() {
        assert_eq!(round_trip("select a, b from syn123"), "SELECT a, b FROM syn123");
    }

    #[test]
    fn test_root_is_linked() {
        let ast = parse("SELECT * FROM syn123 WHERE a = 1").unwrap();
        let root = ast.root().unwrap();
        assert!(ast.get::<QueryExpression>(root).is_some());
        assert_eq!(ast.parent(root), None);
        for id in ast.descendants(root).skip(1) {
            assert!(ast.parent(id).is_some());
        }
    }

    #[test]
    fn test_entity_id_with_version() {
        let ast = parse("SELECT * FROM SYN123.4").unwrap();
        let root = ast.root().unwrap();
        let entity = ast.first_element_of_type::<EntityId>(root).unwrap();
        assert_eq!(ast.get::<EntityId>(entity), Some(&EntityId::new(123, Some(4))));
        assert_eq!(ast.to_sql(root), "SELECT * FROM syn123.4");
    }

    #[test]
    fn test_clauses_in_order() {
        assert_eq!(
            round_trip(
                "select distinct a, count(*) as c from T where a > 1 group by a \
                 order by c desc, a limit 10 offset 5"
            ),
            "SELECT DISTINCT a, COUNT(*) AS c FROM T WHERE a > 1 GROUP BY a \
             ORDER BY c DESC, a LIMIT 10 OFFSET 5"
        );
    }

    #[test]
    fn test_expression_precedence() {
        let ast = Parser::new("1 + 2 * 3").parse_value_expression().unwrap();
        let root = ast.root().unwrap();
        let Some(NodeKind::Arithmetic(add)) = ast.node(root) else {
            panic!("expected arithmetic");
        };
        assert_eq!(add.operator, crate::ast::ArithmeticOperator::Add);
        assert!(matches!(ast.node(add.right), Some(NodeKind::Arithmetic(_))));
    }

    #[test]
    fn test_negative_number_is_one_literal() {
        let ast = Parser::new("-5").parse_value_expression().unwrap();
        assert_eq!(ast.get::<Literal>(ast.root().unwrap()), Some(&Literal::Integer(-5)));
    }

    #[test]
    fn test_predicates() {
        let cases = [
            "a BETWEEN 1 AND 2",
            "a NOT IN (1, 2)",
            "a LIKE 'x%' ESCAPE '\\'",
            "a IS NOT NULL",
            "a IS TRUE",
            "tags HAS ('a', 'b')",
            "tags NOT HAS_LIKE ('a%') ESCAPE '!'",
            "ISNAN(d)",
            "TEXT_MATCHES('cancer')",
            "MATCH(ROW_SEARCH_CONTENT) AGAINST('cancer')",
        ];
        for sql in cases {
            let ast = Parser::new(sql).parse_search_condition().unwrap();
            assert_eq!(ast.to_sql(ast.root().unwrap()), sql);
        }
    }

    #[test]
    fn test_predicate_needs_column_on_the_left() {
        assert!(Parser::new("(a, b) = (1, 2)").parse_search_condition().is_err());
        assert!(Parser::new("1 = a").parse_search_condition().is_err());
    }

    #[test]
    fn test_tuple_comparison() {
        let ast = Parser::new("a = (1, 2)").parse_search_condition().unwrap();
        let root = ast.root().unwrap();
        assert!(ast.first_element_of_type::<RowValue>(root).is_some());
        assert_eq!(ast.to_sql(root), "a = (1, 2)");
    }

    #[test]
    fn test_not_exists_is_one_predicate() {
        let sql = "NOT EXISTS (SELECT 1 FROM JSON_TABLE(tags, '$[*]' COLUMNS(tags_UNNEST \
                   VARCHAR(50) PATH '$' ERROR ON ERROR)) AS J0 WHERE tags_UNNEST IN ('a'))";
        let ast = Parser::new(sql).parse_search_condition().unwrap();
        let root = ast.root().unwrap();
        let factor = ast.first_element_of_type::<BooleanFactor>(root).unwrap();
        assert!(!ast.get::<BooleanFactor>(factor).unwrap().not);
        let predicate = ast.first_element_of_type::<UnnestedHasPredicate>(root).unwrap();
        assert!(ast.get::<UnnestedHasPredicate>(predicate).unwrap().not);
        assert_eq!(ast.to_sql(root), sql);
    }

    #[test]
    fn test_nested_conditions() {
        let ast = Parser::new("NOT (b = 1 OR a = 2) AND TRUE")
            .parse_search_condition()
            .unwrap();
        assert_eq!(
            ast.to_sql(ast.root().unwrap()),
            "NOT (a = 2 OR b = 1) AND TRUE"
        );
    }

    #[test]
    fn test_joins() {
        assert_eq!(
            round_trip("select * from syn1 a left outer join syn2 b on a.id = b.id cross join syn3"),
            "SELECT * FROM syn1 AS a LEFT JOIN syn2 AS b ON a.id = b.id CROSS JOIN syn3"
        );
    }

    #[test]
    fn test_with_and_union() {
        assert_eq!(
            round_trip(
                "with c (x) as (select a from syn1) select x from c union all select b from syn2"
            ),
            "WITH c (x) AS (SELECT a FROM syn1) SELECT x FROM c UNION ALL SELECT b FROM syn2"
        );
    }

    #[test]
    fn test_functions() {
        assert_eq!(
            round_trip(
                "select count(distinct a, b), unnest(tags), current_user(), \
                 current_timestamp, upper(x) from syn1"
            ),
            "SELECT COUNT(DISTINCT a, b), UNNEST(tags), CURRENT_USER(), \
             CURRENT_TIMESTAMP(), UPPER(x) FROM syn1"
        );
    }

    #[test]
    fn test_case_and_cast() {
        assert_eq!(
            round_trip(
                "select case when a > 1 then 'big' else 'small' end, cast(b as integer) from T"
            ),
            "SELECT CASE WHEN a > 1 THEN 'big' ELSE 'small' END, CAST(b AS INTEGER) FROM T"
        );
    }

    #[test]
    fn test_delimited_identifiers_keep_their_quotes() {
        assert_eq!(
            round_trip("select \"a b\", `c` from T where \"a b\" = 'it''s'"),
            "SELECT \"a b\", `c` FROM T WHERE \"a b\" = 'it''s'"
        );
    }

    #[test]
    fn test_bind_variables() {
        let ast = parse("select * from T where a = :b0 limit :b1").unwrap();
        let root = ast.root().unwrap();
        let binds: Vec<_> = ast
            .elements_of_type::<Literal>(root)
            .filter(|(_, l)| matches!(l, Literal::Bind(_)))
            .collect();
        assert_eq!(binds.len(), 2);
        assert_eq!(ast.to_sql(root), "SELECT * FROM T WHERE a = :b0 LIMIT :b1");
    }

    #[test]
    fn test_in_subquery() {
        let ast = Parser::new("a IN (SELECT b FROM T)")
            .parse_search_condition()
            .unwrap();
        let root = ast.root().unwrap();
        let Some((_, Predicate::In(p))) = ast.elements_of_type::<Predicate>(root).next() else {
            panic!("expected IN");
        };
        assert!(ast.get::<Subquery>(p.values).is_some());
        assert_eq!(ast.to_sql(root), "a IN (SELECT b FROM T)");
    }

    #[test]
    fn test_errors() {
        let error = parse("SELECT FROM T").unwrap_err();
        assert!(error.message.contains("value expression"), "{error}");

        let error = parse("SELECT * FROM T WHERE").unwrap_err();
        assert_eq!(error.found, Some(TokenKind::Eof));

        let error = parse("SELECT * FROM T WHERE a = 'open").unwrap_err();
        assert_eq!(error.message, "Unterminated string literal");

        let error = parse("SELECT foo(a) FROM T").unwrap_err();
        assert_eq!(error.message, "Unknown function: foo");

        let error = parse("SELECT * FROM T extra junk").unwrap_err();
        assert_eq!(error.expected.as_deref(), Some("end of input"));
    }

    #[test]
    fn test_oversized_string_is_rejected() {
        let sql = format!(
            "SELECT * FROM T WHERE a = '{}'",
            "x".repeat(crate::ast::MAX_CHARACTER_STRING_LENGTH + 1)
        );
        let error = parse(&sql).unwrap_err();
        assert!(error.message.starts_with("String literal of"));
    }
}
