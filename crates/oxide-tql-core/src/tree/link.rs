//! Parent linking.

use tracing::trace;

use super::Ast;
use crate::ast::NodeId;
use crate::error::{Result, TreeError};

impl Ast {
    /// Points the parent of every node under `root` at its structural parent.
    ///
    /// The root's own parent is left alone. Either every link is set or none
    /// is.
    ///
    /// # Errors
    ///
    /// Returns [`TreeError::SharedNode`] when a node is reachable twice and
    /// [`TreeError::AlreadyAttached`] when a node already belongs to another
    /// parent.
    pub fn recursive_set_parent(&mut self, root: NodeId) -> Result<()> {
        if !self.contains(root) {
            return Err(TreeError::UnknownNode(root));
        }
        let links = self.subtree_links(root, None)?;
        trace!(%root, links = links.len(), "linking subtree");
        for (child, parent) in links {
            self.set_parent(child, Some(parent));
        }
        Ok(())
    }

    /// Clears the parent of `root` and of every node under it.
    pub fn recursive_clear_parent(&mut self, root: NodeId) {
        for id in self.raw_subtree(root) {
            self.set_parent(id, None);
        }
    }

    /// Collects the `(child, parent)` links of the subtree under `root`.
    ///
    /// A node that currently hangs under another parent is accepted only when
    /// it lies inside `detaching`, the subtree about to be cut loose.
    pub(crate) fn subtree_links(
        &self,
        root: NodeId,
        detaching: Option<NodeId>,
    ) -> Result<Vec<(NodeId, NodeId)>> {
        let mut seen = vec![false; self.len()];
        let mut links = Vec::new();
        let mut stack = vec![root];
        seen[root.index()] = true;
        while let Some(parent) = stack.pop() {
            for (_, child) in self.slots(parent) {
                if !self.contains(child) {
                    return Err(TreeError::UnknownNode(child));
                }
                if seen[child.index()] {
                    return Err(TreeError::SharedNode(child));
                }
                seen[child.index()] = true;
                match self.parent(child) {
                    Some(current) if current != parent => {
                        let moving = detaching.is_some_and(|old| self.is_ancestor(old, child));
                        if !moving {
                            return Err(TreeError::AlreadyAttached(child));
                        }
                    }
                    _ => {}
                }
                links.push((child, parent));
                stack.push(child);
            }
        }
        Ok(links)
    }

    /// Returns `root` and every node under it in slot order, ignoring
    /// canonical ordering.
    pub(crate) fn raw_subtree(&self, root: NodeId) -> Vec<NodeId> {
        if !self.contains(root) {
            return vec![];
        }
        let mut seen = vec![false; self.len()];
        let mut out = Vec::new();
        let mut stack = vec![root];
        while let Some(id) = stack.pop() {
            if !self.contains(id) || seen[id.index()] {
                continue;
            }
            seen[id.index()] = true;
            out.push(id);
            stack.extend(self.slots(id).into_iter().rev().map(|(_, child)| child));
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{ColumnReference, Identifier, RowValue};

    #[test]
    fn test_set_parent_links_whole_subtree() {
        let mut ast = Ast::new();
        let name = ast.add(Identifier::regular("foo"));
        let column = ast.add(ColumnReference {
            qualifier: None,
            name,
        });
        let row = ast.add(RowValue {
            values: vec![column],
        });
        ast.recursive_set_parent(row).unwrap();
        assert_eq!(ast.parent(column), Some(row));
        assert_eq!(ast.parent(name), Some(column));
        assert_eq!(ast.parent(row), None);
    }

    #[test]
    fn test_shared_node_is_rejected_without_side_effects() {
        let mut ast = Ast::new();
        let name = ast.add(Identifier::regular("foo"));
        let first = ast.add(ColumnReference {
            qualifier: None,
            name,
        });
        let second = ast.add(ColumnReference {
            qualifier: None,
            name,
        });
        let row = ast.add(RowValue {
            values: vec![first, second],
        });
        assert_eq!(
            ast.recursive_set_parent(row),
            Err(TreeError::SharedNode(name))
        );
        assert_eq!(ast.parent(first), None);
    }

    #[test]
    fn test_node_of_other_tree_is_rejected() {
        let mut ast = Ast::new();
        let name = ast.add(Identifier::regular("foo"));
        let column = ast.add(ColumnReference {
            qualifier: None,
            name,
        });
        ast.recursive_set_parent(column).unwrap();
        let other = ast.add(ColumnReference {
            qualifier: None,
            name,
        });
        assert_eq!(
            ast.recursive_set_parent(other),
            Err(TreeError::AlreadyAttached(name))
        );
    }

    #[test]
    fn test_clear_parent() {
        let mut ast = Ast::new();
        let name = ast.add(Identifier::regular("foo"));
        let column = ast.add(ColumnReference {
            qualifier: None,
            name,
        });
        let row = ast.add(RowValue {
            values: vec![column],
        });
        ast.recursive_set_parent(row).unwrap();
        ast.recursive_clear_parent(column);
        assert_eq!(ast.parent(column), None);
        assert_eq!(ast.parent(name), None);
    }
}
