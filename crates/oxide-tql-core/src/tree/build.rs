//! Typed constructors for common node shapes.
//!
//! Each helper adds detached nodes bottom-up and returns the id of the
//! topmost one. Link the finished subtree with [`Ast::recursive_set_parent`]
//! or hand it to a rewrite operation, which links it.

use super::{slot, Ast};
use crate::ast::{
    BooleanFactor, BooleanTerm, ColumnReference, ComparisonOperator, ComparisonPredicate,
    DerivedColumn, FromClause, Identifier, InPredicate, InValueList, JsonTableColumn, Literal,
    NodeId, Pagination, QuerySpecification, SearchCondition, SelectList, TableExpression,
    TableReference, WhereClause,
};
use crate::error::{Result, TreeError};

impl Ast {
    /// Adds a regular identifier.
    pub fn identifier(&mut self, name: impl Into<String>) -> NodeId {
        self.add(Identifier::regular(name))
    }

    /// Adds an unqualified column reference.
    pub fn column(&mut self, name: impl Into<String>) -> NodeId {
        let name = self.identifier(name);
        self.add(ColumnReference {
            qualifier: None,
            name,
        })
    }

    /// Adds `qualifier.name`.
    pub fn qualified_column(
        &mut self,
        qualifier: impl Into<String>,
        name: impl Into<String>,
    ) -> NodeId {
        let qualifier = self.identifier(qualifier);
        let name = self.identifier(name);
        self.add(ColumnReference {
            qualifier: Some(qualifier),
            name,
        })
    }

    /// Adds a string literal.
    ///
    /// # Errors
    ///
    /// Fails when the value exceeds the maximum literal size.
    pub fn string_literal(&mut self, value: impl Into<String>) -> Result<NodeId> {
        Ok(self.add(Literal::string(value)?))
    }

    pub fn integer(&mut self, value: i64) -> NodeId {
        self.add(Literal::Integer(value))
    }

    /// Adds `left op right`.
    pub fn comparison(&mut self, left: NodeId, operator: ComparisonOperator, right: NodeId) -> NodeId {
        self.add(ComparisonPredicate {
            left,
            operator,
            right,
        })
    }

    /// Adds `left [NOT] IN (values)`.
    pub fn in_list(&mut self, left: NodeId, not: bool, values: Vec<NodeId>) -> NodeId {
        let values = self.add(InValueList { values });
        self.add(InPredicate { left, not, values })
    }

    /// Adds an un-negated boolean factor around `primary`.
    pub fn factor(&mut self, primary: NodeId) -> NodeId {
        self.add(BooleanFactor {
            not: false,
            primary,
        })
    }

    /// Adds `p1 AND p2 AND ...` as a search condition.
    pub fn conjunction(&mut self, primaries: Vec<NodeId>) -> NodeId {
        let factors = primaries.into_iter().map(|p| self.factor(p)).collect();
        let term = self.add(BooleanTerm { factors });
        self.add(SearchCondition { terms: vec![term] })
    }

    /// Adds `p1 OR p2 OR ...` as a search condition.
    pub fn disjunction(&mut self, primaries: Vec<NodeId>) -> NodeId {
        let terms = primaries
            .into_iter()
            .map(|p| {
                let factor = self.factor(p);
                self.add(BooleanTerm {
                    factors: vec![factor],
                })
            })
            .collect();
        self.add(SearchCondition { terms })
    }

    /// Adds a plain table reference with an optional alias.
    pub fn table(&mut self, name: NodeId, alias: Option<&str>) -> NodeId {
        let alias = alias.map(|a| self.identifier(a));
        self.add(TableReference::Table { name, alias })
    }

    /// Adds `JSON_TABLE(column, '$[*]' COLUMNS(...)) AS alias`.
    pub fn json_table(&mut self, column: NodeId, columns: Vec<JsonTableColumn>, alias: &str) -> NodeId {
        let alias = self.identifier(alias);
        self.add(TableReference::JsonTable {
            column,
            columns,
            alias: Some(alias),
        })
    }

    /// Adds `SELECT values FROM table [WHERE condition]`.
    ///
    /// `values` become derived columns without aliases.
    pub fn select(&mut self, values: Vec<NodeId>, table: NodeId, condition: Option<NodeId>) -> NodeId {
        let columns = values
            .into_iter()
            .map(|value| self.add(DerivedColumn { value, alias: None }))
            .collect();
        let select_list = self.add(SelectList::Columns(columns));
        let from = self.add(FromClause { table });
        let where_clause = condition.map(|condition| self.add(WhereClause { condition }));
        let table_expression = self.add(TableExpression {
            from,
            where_clause,
            group_by: None,
            order_by: None,
            pagination: None,
        });
        self.add(QuerySpecification {
            quantifier: None,
            select_list,
            table_expression,
        })
    }

    /// Adds `LIMIT limit [OFFSET offset]`.
    pub fn pagination(&mut self, limit: i64, offset: Option<i64>) -> NodeId {
        let limit = self.integer(limit);
        let offset = offset.map(|o| self.integer(o));
        self.add(Pagination { limit, offset })
    }

    /// Adds a detached deep copy of the subtree under `root`.
    ///
    /// # Errors
    ///
    /// Returns [`TreeError::UnknownNode`] if `root` is not in this arena.
    pub fn duplicate(&mut self, root: NodeId) -> Result<NodeId> {
        let mut kind = self.node(root).cloned().ok_or(TreeError::UnknownNode(root))?;
        for (slot, child) in self.slots(root) {
            let copy = self.duplicate(child)?;
            if let Some(target) = slot::child_mut(&mut kind, slot) {
                *target = copy;
            }
        }
        Ok(self.add(kind))
    }

    /// Copies the subtree under `root` of another arena into this one.
    ///
    /// # Errors
    ///
    /// Returns [`TreeError::UnknownNode`] if `root` is not in `other`.
    pub fn graft(&mut self, other: &Self, root: NodeId) -> Result<NodeId> {
        let mut kind = other.node(root).cloned().ok_or(TreeError::UnknownNode(root))?;
        for (slot, child) in other.slots(root) {
            let copy = self.graft(other, child)?;
            if let Some(target) = slot::child_mut(&mut kind, slot) {
                *target = copy;
            }
        }
        Ok(self.add(kind))
    }
}
