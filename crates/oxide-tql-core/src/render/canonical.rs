//! Canonical ordering of commutative lists.

use std::collections::HashMap;

use super::writer::Renderer;
use crate::ast::NodeId;
use crate::tree::Ast;

impl Ast {
    /// Sorts `ids` by their quote-stripped SQL, then by their quoted SQL.
    ///
    /// The sort is stable and keeps duplicates, so `a AND a` stays two terms.
    #[must_use]
    pub fn canonical_order(&self, ids: &[NodeId]) -> Vec<NodeId> {
        let mut renderer = Renderer::new(self);
        let mut keyed: Vec<_> = ids.iter().map(|id| (renderer.render(*id), *id)).collect();
        keyed.sort_by(|a, b| a.0.key().cmp(&b.0.key()));
        keyed.into_iter().map(|(_, id)| id).collect()
    }

    /// Returns the canonical child order of every commutative list under
    /// `root` (inclusive), from a single render of the subtree.
    pub(crate) fn canonical_orders(&self, root: NodeId) -> HashMap<NodeId, Vec<NodeId>> {
        let mut renderer = Renderer::recording(self);
        renderer.render(root);
        renderer.into_orders()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{ComparisonOperator, NodeKind};

    fn condition(ast: &mut Ast, names: &[&str]) -> NodeId {
        let predicates = names
            .iter()
            .map(|name| {
                let column = ast.column(*name);
                let one = ast.integer(1);
                ast.comparison(column, ComparisonOperator::Equal, one)
            })
            .collect();
        let condition = ast.conjunction(predicates);
        ast.recursive_set_parent(condition).unwrap();
        condition
    }

    #[test]
    fn test_and_order_is_canonical() {
        let mut ast = Ast::new();
        let ab = condition(&mut ast, &["a", "b"]);
        let ba = condition(&mut ast, &["b", "a"]);
        assert_eq!(ast.to_sql(ab), "a = 1 AND b = 1");
        assert_eq!(ast.to_sql(ab), ast.to_sql(ba));
        assert!(ast.equivalent(ab, ba));
    }

    #[test]
    fn test_duplicates_are_kept() {
        let mut ast = Ast::new();
        let aa = condition(&mut ast, &["a", "a"]);
        assert_eq!(ast.to_sql(aa), "a = 1 AND a = 1");
    }

    #[test]
    fn test_tie_is_broken_by_quoted_text() {
        let mut ast = Ast::new();
        let quoted = ast.add(crate::ast::Identifier::double_quoted("a"));
        let plain = ast.identifier("a");
        assert_eq!(ast.canonical_order(&[plain, quoted]), vec![quoted, plain]);
    }

    #[test]
    fn test_nested_lists_are_recorded() {
        let mut ast = Ast::new();
        let inner = condition(&mut ast, &["d", "c"]);
        let column = ast.column("b");
        let one = ast.integer(1);
        let b = ast.comparison(column, ComparisonOperator::Equal, one);
        let outer = ast.disjunction(vec![inner, b]);
        ast.recursive_set_parent(outer).unwrap();

        let orders = ast.canonical_orders(outer);
        let lists: Vec<NodeId> = ast
            .descendants(outer)
            .filter(|id| {
                matches!(
                    ast.node(*id),
                    Some(NodeKind::SearchCondition(_) | NodeKind::BooleanTerm(_))
                )
            })
            .collect();
        assert_eq!(orders.len(), lists.len());
        for list in lists {
            assert_eq!(orders[&list], ast.children(list));
        }
        assert_eq!(ast.to_sql(outer), "b = 1 OR c = 1 AND d = 1");
    }
}
