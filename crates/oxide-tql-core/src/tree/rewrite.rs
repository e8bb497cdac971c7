//! In-place subtree replacement.
//!
//! Every edit goes through [`Ast::set_slot`]: it validates the whole edit
//! first, then swaps the id stored in the parent's slot, detaches the old
//! subtree and links the new one. A failed edit leaves the tree untouched.

use tracing::trace;

use super::{slot, Ast, ChildSlot};
use crate::ast::{
    GroupByClause, NodeCategory, NodeId, NodeKind, NodeType, OrderByClause, Pagination,
    SetQuantifier, WhereClause,
};
use crate::error::{Result, TreeError};

impl Ast {
    /// Replaces `old` with `new` in `old`'s parent.
    ///
    /// Replacing a node with itself does nothing. `new` may contain `old` or
    /// nodes of `old`'s subtree; those are moved.
    ///
    /// # Errors
    ///
    /// - [`TreeError::UnknownNode`] if either id is foreign to the arena.
    /// - [`TreeError::NoParent`] if `old` is a root.
    /// - [`TreeError::CategoryMismatch`] if `new` cannot stand where `old`
    ///   stands.
    /// - [`TreeError::ReplacementIsAncestor`] if `new` lies above `old`.
    /// - [`TreeError::AlreadyAttached`] if `new` or one of its nodes belongs
    ///   to another part of the tree.
    pub fn replace_element(&mut self, old: NodeId, new: NodeId) -> Result<()> {
        if old == new {
            return Ok(());
        }
        for id in [old, new] {
            if !self.contains(id) {
                return Err(TreeError::UnknownNode(id));
            }
        }
        let parent = self.parent(old).ok_or(TreeError::NoParent(old))?;
        let slot = self.slot_of(parent, old).ok_or(TreeError::NoParent(old))?;
        self.set_slot(parent, slot, Some(new))
    }

    /// Stores `new` in `slot` of `parent`, detaching whatever was there.
    ///
    /// `None` empties an optional slot such as [`ChildSlot::Where`].
    ///
    /// # Errors
    ///
    /// [`TreeError::MissingSlot`] if `parent` has no such slot or the slot
    /// cannot be emptied, plus the errors of [`Ast::replace_element`].
    pub fn set_slot(&mut self, parent: NodeId, slot: ChildSlot, new: Option<NodeId>) -> Result<()> {
        if !self.contains(parent) {
            return Err(TreeError::UnknownNode(parent));
        }
        let old = self
            .slots(parent)
            .into_iter()
            .find_map(|(s, id)| (s == slot).then_some(id));
        if old == new {
            return Ok(());
        }

        let links = match new {
            Some(new) => self.check_replacement(parent, old, new)?,
            None => Vec::new(),
        };

        let kind = self
            .kind_mut(parent)
            .ok_or(TreeError::UnknownNode(parent))?;
        if let Some(field) = slot::optional_mut(kind, slot) {
            *field = new;
        } else {
            match (slot::child_mut(kind, slot), new) {
                (Some(target), Some(new)) => *target = new,
                _ => return Err(TreeError::MissingSlot { parent, slot }),
            }
        }

        if let Some(old) = old {
            self.recursive_clear_parent(old);
        }
        if let Some(new) = new {
            self.set_parent(new, Some(parent));
            for (child, child_parent) in links {
                self.set_parent(child, Some(child_parent));
            }
        }
        trace!(%parent, ?slot, ?old, ?new, "replaced child");
        Ok(())
    }

    fn check_replacement(
        &self,
        parent: NodeId,
        old: Option<NodeId>,
        new: NodeId,
    ) -> Result<Vec<(NodeId, NodeId)>> {
        if !self.contains(new) {
            return Err(TreeError::UnknownNode(new));
        }
        if self.is_ancestor(new, parent) {
            return Err(TreeError::ReplacementIsAncestor {
                node: old.unwrap_or(parent),
                replacement: new,
            });
        }
        if let Some(old) = old {
            let replaced = self.category(old);
            let replacement = self.category(new);
            if replaced != replacement {
                return Err(TreeError::CategoryMismatch {
                    replaced,
                    replacement,
                });
            }
        }
        if let Some(current) = self.parent(new) {
            if !old.is_some_and(|old| self.is_ancestor(old, current)) {
                return Err(TreeError::AlreadyAttached(new));
            }
        }
        self.subtree_links(new, old)
    }

    fn expect_kind<T: NodeType>(&self, node: Option<NodeId>, name: &'static str) -> Result<()> {
        match node {
            Some(id) if self.contains(id) && self.get::<T>(id).is_none() => {
                Err(TreeError::CategoryMismatch {
                    replaced: NodeCategory::Structure(name),
                    replacement: self.category(id),
                })
            }
            _ => Ok(()),
        }
    }

    /// Sets or removes the WHERE clause of a table expression.
    ///
    /// # Errors
    ///
    /// Fails if `where_clause` is not a [`WhereClause`] or is attached
    /// elsewhere.
    pub fn set_where(&mut self, table_expression: NodeId, where_clause: Option<NodeId>) -> Result<()> {
        self.expect_kind::<WhereClause>(where_clause, "WhereClause")?;
        self.set_slot(table_expression, ChildSlot::Where, where_clause)
    }

    /// Sets or removes the GROUP BY clause of a table expression.
    ///
    /// # Errors
    ///
    /// Fails if `group_by` is not a [`GroupByClause`] or is attached
    /// elsewhere.
    pub fn set_group_by(&mut self, table_expression: NodeId, group_by: Option<NodeId>) -> Result<()> {
        self.expect_kind::<GroupByClause>(group_by, "GroupByClause")?;
        self.set_slot(table_expression, ChildSlot::GroupBy, group_by)
    }

    /// Sets or removes the ORDER BY clause of a table expression.
    ///
    /// # Errors
    ///
    /// Fails if `order_by` is not an [`OrderByClause`] or is attached
    /// elsewhere.
    pub fn set_order_by(&mut self, table_expression: NodeId, order_by: Option<NodeId>) -> Result<()> {
        self.expect_kind::<OrderByClause>(order_by, "OrderByClause")?;
        self.set_slot(table_expression, ChildSlot::OrderBy, order_by)
    }

    /// Sets or removes the pagination of a table expression.
    ///
    /// # Errors
    ///
    /// Fails if `pagination` is not a [`Pagination`] or is attached
    /// elsewhere.
    pub fn set_pagination(
        &mut self,
        table_expression: NodeId,
        pagination: Option<NodeId>,
    ) -> Result<()> {
        self.expect_kind::<Pagination>(pagination, "Pagination")?;
        self.set_slot(table_expression, ChildSlot::Pagination, pagination)
    }

    /// Replaces the select list of a query specification.
    ///
    /// # Errors
    ///
    /// Fails if `select_list` is not a select list or is attached elsewhere.
    pub fn replace_select_list(&mut self, query: NodeId, select_list: NodeId) -> Result<()> {
        self.set_slot(query, ChildSlot::SelectList, Some(select_list))
    }

    /// Sets or clears the `DISTINCT`/`ALL` quantifier of a query
    /// specification.
    ///
    /// # Errors
    ///
    /// Returns [`TreeError::UnknownNode`] or [`TreeError::CategoryMismatch`]
    /// when `query` is not a query specification of this tree.
    pub fn set_quantifier(&mut self, query: NodeId, quantifier: Option<SetQuantifier>) -> Result<()> {
        match self.kind_mut(query) {
            Some(NodeKind::QuerySpecification(q)) => {
                q.quantifier = quantifier;
                Ok(())
            }
            Some(_) => Err(TreeError::CategoryMismatch {
                replaced: NodeCategory::Query,
                replacement: self.category(query),
            }),
            None => Err(TreeError::UnknownNode(query)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{
        BooleanFactor, ColumnReference, ComparisonOperator, Identifier, Literal, Parenthesized,
    };

    /// Builds `foo = 1` as a linked tree and returns (ast, factor, predicate,
    /// column).
    fn comparison() -> (Ast, NodeId, NodeId, NodeId) {
        let mut ast = Ast::new();
        let column = ast.column("foo");
        let one = ast.add(Literal::Integer(1));
        let predicate = ast.comparison(column, ComparisonOperator::Equal, one);
        let factor = ast.add(BooleanFactor {
            not: false,
            primary: predicate,
        });
        ast.recursive_set_parent(factor).unwrap();
        (ast, factor, predicate, column)
    }

    #[test]
    fn test_replace_moves_links() {
        let (mut ast, _, predicate, column) = comparison();
        let bar = ast.column("bar");
        ast.replace_element(column, bar).unwrap();
        assert_eq!(ast.parent(bar), Some(predicate));
        assert_eq!(ast.parent(column), None);
        assert!(ast.descendants(predicate).any(|id| id == bar));
        assert!(!ast.descendants(predicate).any(|id| id == column));
        assert_eq!(ast.to_sql(predicate), "bar = 1");
    }

    #[test]
    fn test_self_replace_is_noop() {
        let (mut ast, _, predicate, column) = comparison();
        ast.replace_element(column, column).unwrap();
        assert_eq!(ast.parent(column), Some(predicate));
        let name = ast.get::<ColumnReference>(column).unwrap().name;
        assert_eq!(ast.parent(name), Some(column));
    }

    #[test]
    fn test_root_cannot_be_replaced() {
        let (mut ast, factor, ..) = comparison();
        let other = ast.add(BooleanFactor {
            not: true,
            primary: factor,
        });
        assert_eq!(
            ast.replace_element(factor, other),
            Err(TreeError::NoParent(factor))
        );
    }

    #[test]
    fn test_category_mismatch_changes_nothing() {
        let (mut ast, _, predicate, column) = comparison();
        let name = ast.add(Identifier::regular("x"));
        assert!(matches!(
            ast.replace_element(column, name),
            Err(TreeError::CategoryMismatch { .. })
        ));
        assert_eq!(ast.parent(column), Some(predicate));
        assert_eq!(ast.to_sql(predicate), "foo = 1");
    }

    #[test]
    fn test_ancestor_replacement_is_rejected() {
        let (mut ast, factor, _, column) = comparison();
        assert_eq!(
            ast.replace_element(column, factor),
            Err(TreeError::ReplacementIsAncestor {
                node: column,
                replacement: factor,
            })
        );
    }

    #[test]
    fn test_attached_replacement_is_rejected() {
        let (mut ast, _, predicate, column) = comparison();
        let Some(crate::ast::Predicate::Comparison(p)) = ast.get(predicate).copied() else {
            panic!("expected comparison");
        };
        assert_eq!(
            ast.replace_element(column, p.right),
            Err(TreeError::AlreadyAttached(p.right))
        );
    }

    #[test]
    fn test_wrap_existing_node() {
        let (mut ast, _, _, column) = comparison();
        let wrapper = ast.add(Parenthesized { inner: column });
        ast.replace_element(column, wrapper).unwrap();
        assert_eq!(ast.parent(column), Some(wrapper));
    }

    #[test]
    fn test_unwrap_nested_node() {
        let mut ast = Ast::new();
        let column = ast.column("foo");
        let wrapper = ast.add(Parenthesized { inner: column });
        let one = ast.add(Literal::Integer(1));
        let predicate = ast.comparison(wrapper, ComparisonOperator::Equal, one);
        ast.recursive_set_parent(predicate).unwrap();
        ast.replace_element(wrapper, column).unwrap();
        assert_eq!(ast.parent(column), Some(predicate));
        assert_eq!(ast.parent(wrapper), None);
        assert_eq!(ast.to_sql(predicate), "foo = 1");
    }

    #[test]
    fn test_optional_slots() {
        let mut ast = crate::parse_query("select * from syn123 where a = 1 limit 10").unwrap();
        let root = ast.root().unwrap();
        let table_expression = ast
            .first_element_of_type::<crate::ast::TableExpression>(root)
            .unwrap();
        let old_where = ast
            .get::<crate::ast::TableExpression>(table_expression)
            .and_then(|t| t.where_clause)
            .unwrap();
        ast.set_where(table_expression, None).unwrap();
        assert_eq!(ast.parent(old_where), None);
        assert_eq!(ast.to_sql(root), "SELECT * FROM syn123 LIMIT 10");

        let limit = ast.add(Literal::Integer(5));
        let pagination = ast.add(Pagination {
            limit,
            offset: None,
        });
        ast.set_pagination(table_expression, Some(pagination)).unwrap();
        assert_eq!(ast.to_sql(root), "SELECT * FROM syn123 LIMIT 5");

        let wrong = ast.add(Literal::Integer(1));
        assert!(ast.set_group_by(table_expression, Some(wrong)).is_err());
    }

    #[test]
    fn test_required_slot_cannot_be_emptied() {
        let (mut ast, _, predicate, _) = comparison();
        assert_eq!(
            ast.set_slot(predicate, ChildSlot::Left, None),
            Err(TreeError::MissingSlot {
                parent: predicate,
                slot: ChildSlot::Left,
            })
        );
    }
}
