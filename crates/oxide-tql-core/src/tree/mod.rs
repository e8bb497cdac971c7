//! The node arena and its navigation primitives.
//!
//! An [`Ast`] owns every node of one query. Children are stored as
//! [`NodeId`]s inside their parent's [`NodeKind`]; each node additionally
//! records its parent as a non-owning back-reference. Parent links are set
//! by [`Ast::recursive_set_parent`] once a subtree is complete and are kept
//! consistent by the rewriting operations.

mod build;
mod link;
mod rewrite;
mod slot;

pub use slot::ChildSlot;

use std::collections::HashMap;

use crate::ast::{NodeCategory, NodeId, NodeKind, NodeType};

#[derive(Debug, Clone)]
struct Entry {
    kind: NodeKind,
    parent: Option<NodeId>,
}

/// Arena holding the nodes of one query tree.
///
/// Nodes are never removed; a detached subtree stays in the arena with its
/// parent links cleared.
#[derive(Debug, Clone, Default)]
pub struct Ast {
    entries: Vec<Entry>,
    root: Option<NodeId>,
}

impl Ast {
    /// Creates an empty arena.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
            root: None,
        }
    }

    /// Returns the statement root recorded by the parser, if any.
    #[must_use]
    pub const fn root(&self) -> Option<NodeId> {
        self.root
    }

    /// Records `root` as the statement root.
    pub fn set_root(&mut self, root: NodeId) {
        self.root = Some(root);
    }

    /// Adds a detached node and returns its id.
    #[allow(clippy::cast_possible_truncation)]
    pub fn add(&mut self, kind: impl Into<NodeKind>) -> NodeId {
        let id = NodeId(self.entries.len() as u32);
        self.entries.push(Entry {
            kind: kind.into(),
            parent: None,
        });
        id
    }

    /// Returns the number of nodes in the arena, detached ones included.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns true if `id` was issued by this arena.
    #[must_use]
    pub fn contains(&self, id: NodeId) -> bool {
        id.index() < self.entries.len()
    }

    /// Returns the node, or `None` for an id from another arena.
    #[must_use]
    pub fn node(&self, id: NodeId) -> Option<&NodeKind> {
        self.entries.get(id.index()).map(|e| &e.kind)
    }

    /// Returns the node.
    ///
    /// # Panics
    ///
    /// Panics if `id` was not issued by this arena.
    #[must_use]
    pub fn kind(&self, id: NodeId) -> &NodeKind {
        &self.entries[id.index()].kind
    }

    pub(crate) fn kind_mut(&mut self, id: NodeId) -> Option<&mut NodeKind> {
        self.entries.get_mut(id.index()).map(|e| &mut e.kind)
    }

    /// Returns the payload of `id` if it is a `T`.
    #[must_use]
    pub fn get<T: NodeType>(&self, id: NodeId) -> Option<&T> {
        self.node(id).and_then(T::cast)
    }

    /// Returns the parent of `id`, or `None` for roots and detached nodes.
    #[must_use]
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.entries.get(id.index()).and_then(|e| e.parent)
    }

    pub(crate) fn set_parent(&mut self, id: NodeId, parent: Option<NodeId>) {
        if let Some(entry) = self.entries.get_mut(id.index()) {
            entry.parent = parent;
        }
    }

    /// Returns the immediate children of `id` with their slots, in syntactic
    /// order.
    #[must_use]
    pub fn slots(&self, id: NodeId) -> Vec<(ChildSlot, NodeId)> {
        self.node(id).map(slot::child_slots).unwrap_or_default()
    }

    /// Returns the slot of `parent` that holds `child`.
    #[must_use]
    pub fn slot_of(&self, parent: NodeId, child: NodeId) -> Option<ChildSlot> {
        self.slots(parent)
            .into_iter()
            .find_map(|(slot, id)| (id == child).then_some(slot))
    }

    /// Returns the immediate children of `id`.
    ///
    /// AND-lists, OR-lists and value lists yield their children in canonical
    /// order; every other node yields them in syntactic order. Leaves have no
    /// children.
    #[must_use]
    pub fn children(&self, id: NodeId) -> Vec<NodeId> {
        let ids: Vec<NodeId> = self.slots(id).into_iter().map(|(_, child)| child).collect();
        if is_commutative_list(self.node(id)) {
            self.canonical_order(&ids)
        } else {
            ids
        }
    }

    /// Walks the subtree rooted at `root` in pre-order, `root` first.
    #[must_use]
    pub fn descendants(&self, root: NodeId) -> Descendants<'_> {
        Descendants {
            ast: self,
            stack: if self.contains(root) {
                vec![root]
            } else {
                vec![]
            },
            orders: HashMap::new(),
        }
    }

    /// Returns every node under `root` (inclusive) whose payload is a `T`,
    /// in document order.
    pub fn create_iterable<T: NodeType>(&self, root: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        self.descendants(root)
            .filter(move |id| T::cast(self.kind(*id)).is_some())
    }

    /// Like [`Ast::create_iterable`] but yields the payloads as well.
    pub fn elements_of_type<'a, T: NodeType + 'a>(
        &'a self,
        root: NodeId,
    ) -> impl Iterator<Item = (NodeId, &'a T)> + 'a {
        self.descendants(root)
            .filter_map(move |id| T::cast(self.kind(id)).map(|payload| (id, payload)))
    }

    /// Returns the first `T` under `root` (inclusive) in document order.
    #[must_use]
    pub fn first_element_of_type<T: NodeType>(&self, root: NodeId) -> Option<NodeId> {
        self.create_iterable::<T>(root).next()
    }

    /// Walks the parent chain of `id`, nearest first, excluding `id`.
    #[must_use]
    pub fn ancestors(&self, id: NodeId) -> Ancestors<'_> {
        Ancestors {
            ast: self,
            next: self.parent(id),
        }
    }

    /// Returns the nearest ancestor of `id` whose payload is a `T`.
    #[must_use]
    pub fn context<T: NodeType>(&self, id: NodeId) -> Option<NodeId> {
        self.ancestors(id)
            .find(|ancestor| T::cast(self.kind(*ancestor)).is_some())
    }

    /// Returns true if some ancestor of `id` is a `T`.
    #[must_use]
    pub fn is_in_context<T: NodeType>(&self, id: NodeId) -> bool {
        self.context::<T>(id).is_some()
    }

    /// Returns the topmost ancestor of `id`, or `id` itself when detached.
    #[must_use]
    pub fn root_of(&self, id: NodeId) -> NodeId {
        self.ancestors(id).last().unwrap_or(id)
    }

    /// Returns true if `ancestor` is `node` or lies on its parent chain.
    #[must_use]
    pub fn is_ancestor(&self, ancestor: NodeId, node: NodeId) -> bool {
        ancestor == node || self.ancestors(node).any(|a| a == ancestor)
    }

    /// Returns the category used to check replacements.
    ///
    /// A parenthesized search condition counts as a predicate.
    #[must_use]
    pub fn category(&self, id: NodeId) -> NodeCategory {
        match self.kind(id) {
            NodeKind::Parenthesized(p) => match self.node(p.inner).map(NodeKind::category) {
                Some(NodeCategory::Condition) => NodeCategory::Predicate,
                _ => NodeCategory::Value,
            },
            kind => kind.category(),
        }
    }

    /// Syntactic equivalence: same concrete kind and identical unquoted SQL.
    ///
    /// No evaluation takes place, so `1 + 1` and `2` are not equivalent.
    #[must_use]
    pub fn equivalent(&self, a: NodeId, b: NodeId) -> bool {
        self.equivalent_to(a, self, b)
    }

    /// Like [`Ast::equivalent`] for a node of another arena.
    #[must_use]
    pub fn equivalent_to(&self, a: NodeId, other: &Self, b: NodeId) -> bool {
        match (self.node(a), other.node(b)) {
            (Some(left), Some(right)) => {
                same_kind(left, right)
                    && self.to_sql_without_quotes(a) == other.to_sql_without_quotes(b)
            }
            _ => false,
        }
    }
}

fn same_kind(a: &NodeKind, b: &NodeKind) -> bool {
    use core::mem::discriminant;

    match (a, b) {
        (NodeKind::Predicate(x), NodeKind::Predicate(y)) => discriminant(x) == discriminant(y),
        (NodeKind::TableReference(x), NodeKind::TableReference(y)) => {
            discriminant(x) == discriminant(y)
        }
        (x, y) => discriminant(x) == discriminant(y),
    }
}

fn is_commutative_list(kind: Option<&NodeKind>) -> bool {
    matches!(
        kind,
        Some(NodeKind::SearchCondition(_) | NodeKind::BooleanTerm(_) | NodeKind::InValueList(_))
    )
}

/// Pre-order iterator over a subtree.
///
/// The first list met renders its subtree once and remembers the order of
/// every list inside it, so the walk never renders a node twice.
#[derive(Debug)]
pub struct Descendants<'a> {
    ast: &'a Ast,
    stack: Vec<NodeId>,
    orders: HashMap<NodeId, Vec<NodeId>>,
}

impl Iterator for Descendants<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.stack.pop()?;
        let children = if is_commutative_list(self.ast.node(id)) {
            if !self.orders.contains_key(&id) {
                self.orders.extend(self.ast.canonical_orders(id));
            }
            self.orders.remove(&id).unwrap_or_default()
        } else {
            self.ast.slots(id).into_iter().map(|(_, child)| child).collect()
        };
        self.stack.extend(children.into_iter().rev());
        Some(id)
    }
}

/// Iterator over a parent chain.
#[derive(Debug)]
pub struct Ancestors<'a> {
    ast: &'a Ast,
    next: Option<NodeId>,
}

impl Iterator for Ancestors<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.next?;
        self.next = self.ast.parent(id);
        Some(id)
    }
}
