//! SQL dialect support.
//!
//! The parser accepts both identifier delimiters. A [`Dialect`] decides
//! which one a rendered query uses and which dialect extensions it can run
//! natively.

mod generic;

pub use generic::GenericDialect;

use crate::ast::{Delimiter, Identifier, NodeId, NodeKind};
use crate::tree::Ast;

/// Trait for SQL dialect-specific behavior.
pub trait Dialect {
    /// Returns the name of the dialect.
    fn name(&self) -> &'static str;

    /// Returns the delimiter of quoted identifiers.
    fn identifier_delimiter(&self) -> Delimiter {
        Delimiter::DoubleQuote
    }

    /// Returns the identifier quote character (e.g., `"` for standard SQL, `` ` `` for MySQL).
    fn identifier_quote(&self) -> char {
        self.identifier_delimiter().quote()
    }

    /// Returns whether list columns can be unnested with `JSON_TABLE`.
    fn supports_json_table(&self) -> bool {
        false
    }

    /// Returns whether full-text search runs as `MATCH ... AGAINST`.
    fn supports_match_against(&self) -> bool {
        false
    }

    /// Quotes an identifier, doubling embedded quote characters.
    fn quote_identifier(&self, name: &str) -> String {
        let quote = self.identifier_quote();
        let mut out = String::with_capacity(name.len() + 2);
        out.push(quote);
        for c in name.chars() {
            if c == quote {
                out.push(quote);
            }
            out.push(c);
        }
        out.push(quote);
        out
    }
}

impl Ast {
    /// Rewrites every delimited identifier under `root` to the delimiter of
    /// `dialect`. Returns the number of identifiers changed.
    pub fn normalize_delimiters<D: Dialect + ?Sized>(&mut self, root: NodeId, dialect: &D) -> usize {
        let target = dialect.identifier_delimiter();
        let identifiers: Vec<NodeId> = self.create_iterable::<Identifier>(root).collect();
        let mut changed = 0;
        for id in identifiers {
            if let Some(NodeKind::Identifier(Identifier::Delimited { delimiter, .. })) =
                self.kind_mut(id)
            {
                if *delimiter != target {
                    *delimiter = target;
                    changed += 1;
                }
            }
        }
        changed
    }
}
