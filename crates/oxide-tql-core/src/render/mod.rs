//! SQL text generation.
//!
//! Rendering is a single exhaustive match over [`NodeKind`] that produces
//! the quoted and quote-stripped text together. Leaves decide their own
//! quoting through [`ToSqlParameters`]; composite nodes only lay out
//! keywords and punctuation. AND-lists, OR-lists and value lists are
//! written in canonical order (see [`Ast::canonical_order`]).

mod canonical;
mod writer;

use core::fmt;

use serde::{Deserialize, Serialize};

use crate::ast::{NodeId, NodeKind};
use crate::tree::Ast;
use writer::Renderer;

/// Options controlling SQL generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ToSqlParameters {
    /// Whether identifiers and string literals keep their delimiters.
    pub include_quotes: bool,
}

impl ToSqlParameters {
    /// Quotes on: SQL suitable for execution.
    pub const WITH_QUOTES: Self = Self {
        include_quotes: true,
    };

    /// Quotes off: a quote-insensitive comparison key.
    pub const WITHOUT_QUOTES: Self = Self {
        include_quotes: false,
    };

    #[must_use]
    pub const fn new(include_quotes: bool) -> Self {
        Self { include_quotes }
    }
}

impl Default for ToSqlParameters {
    fn default() -> Self {
        Self::WITH_QUOTES
    }
}

impl Ast {
    /// Renders the subtree at `id` with quotes.
    #[must_use]
    pub fn to_sql(&self, id: NodeId) -> String {
        self.to_sql_with(id, &ToSqlParameters::WITH_QUOTES)
    }

    /// Renders the subtree at `id` with quotes stripped from every leaf.
    #[must_use]
    pub fn to_sql_without_quotes(&self, id: NodeId) -> String {
        self.to_sql_with(id, &ToSqlParameters::WITHOUT_QUOTES)
    }

    #[must_use]
    pub fn to_sql_with(&self, id: NodeId, parameters: &ToSqlParameters) -> String {
        Renderer::new(self).render(id).into_sql(parameters)
    }

    /// Returns a [`fmt::Display`] adapter rendering `id` with quotes.
    #[must_use]
    pub const fn display(&self, id: NodeId) -> SqlDisplay<'_> {
        SqlDisplay { ast: self, id }
    }

    /// Returns true if the node itself is a quoted leaf.
    #[must_use]
    pub fn has_quotes(&self, id: NodeId) -> bool {
        match self.node(id) {
            Some(NodeKind::Identifier(i)) => i.has_quotes(),
            Some(NodeKind::Literal(l)) => l.has_quotes(),
            _ => false,
        }
    }

    /// Returns true if any leaf under `id` (inclusive) is quoted.
    #[must_use]
    pub fn has_quotes_recursive(&self, id: NodeId) -> bool {
        self.descendants(id).any(|node| self.has_quotes(node))
    }

    /// Appends the SQL of the subtree at `id` to `out`.
    ///
    /// Ids foreign to the arena render as nothing.
    pub fn write_sql(&self, id: NodeId, out: &mut String, parameters: &ToSqlParameters) {
        out.push_str(&self.to_sql_with(id, parameters));
    }
}

/// Displays a subtree as SQL.
#[derive(Debug, Clone, Copy)]
pub struct SqlDisplay<'a> {
    ast: &'a Ast,
    id: NodeId,
}

impl fmt::Display for SqlDisplay<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.ast.to_sql(self.id))
    }
}
