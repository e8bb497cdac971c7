//! Errors raised while constructing or restructuring a tree.

use crate::ast::{NodeCategory, NodeId};
use crate::tree::ChildSlot;

/// Construction and structural-operation errors.
///
/// These are programmer errors in the caller: the query being compiled must
/// be abandoned, never patched up into a partially built tree.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TreeError {
    /// An identifier was given both a regular and a delimited form.
    #[error("An identifier cannot be both regular and delimited")]
    ConflictingIdentifier,

    /// An identifier was given neither a regular nor a delimited form.
    #[error("An identifier must be either regular or delimited")]
    MissingIdentifier,

    /// A string literal exceeds the maximum literal size.
    #[error("String literal of {length} characters exceeds the maximum of {max}")]
    StringLiteralTooLarge {
        /// Length of the rejected literal in characters.
        length: usize,
        /// Maximum allowed length.
        max: usize,
    },

    /// The node to replace is a root.
    #[error("Cannot replace a root with no parent: {0}")]
    NoParent(NodeId),

    /// The id does not belong to this tree.
    #[error("Unknown node: {0}")]
    UnknownNode(NodeId),

    /// The replacement cannot stand where the replaced node stood.
    #[error("Cannot replace a {replaced} with a {replacement}")]
    CategoryMismatch {
        /// Category of the node being replaced.
        replaced: NodeCategory,
        /// Category of the offered replacement.
        replacement: NodeCategory,
    },

    /// The replacement contains the node it would replace.
    #[error("Replacement {replacement} is an ancestor of {node}")]
    ReplacementIsAncestor {
        /// The node being replaced.
        node: NodeId,
        /// The offered replacement.
        replacement: NodeId,
    },

    /// The replacement is already attached elsewhere in the tree.
    #[error("Node {0} already has a parent")]
    AlreadyAttached(NodeId),

    /// A node is reachable from two parents.
    #[error("Node {0} is shared between two parents")]
    SharedNode(NodeId),

    /// The order-by key names a function the renderer cannot sort on.
    #[error("Unsupported function in ORDER BY: {0}")]
    UnsupportedOrderByFunction(String),

    /// The parent has no child in the given slot.
    #[error("Node {parent} has no {slot:?} slot")]
    MissingSlot {
        /// The parent node.
        parent: NodeId,
        /// The requested slot.
        slot: ChildSlot,
    },
}

/// Result type for tree operations.
pub type Result<T> = std::result::Result<T, TreeError>;
