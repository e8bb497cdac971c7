//! # oxide-tql-core
//!
//! A mutable syntax tree for a SQL dialect used to query tables of
//! annotated entities.
//!
//! This crate provides:
//! - A hand-written recursive descent parser with Pratt expression parsing
//! - An arena [`Ast`] with parent links, typed search and atomic subtree
//!   replacement
//! - SQL generation with optional quoting and a canonical order for AND, OR
//!   and IN lists, so equivalent queries render identically
//! - Dialect extensions over list columns (`HAS`, `HAS_LIKE`, `UNNEST`) and
//!   full-text search (`TEXT_MATCHES`), left for a dialect crate to translate
//!
//! ## Parsing and rendering
//!
//! ```rust
//! use oxide_tql_core::parse_query;
//!
//! let ast = parse_query("select * from syn123 where b = 2 and a = 'x'").unwrap();
//! let root = ast.root().unwrap();
//! assert_eq!(ast.to_sql(root), "SELECT * FROM syn123 WHERE a = 'x' AND b = 2");
//! ```
//!
//! ## Rewriting
//!
//! Nodes are addressed by [`NodeId`]. A replacement is validated before
//! anything changes, so a failed rewrite leaves the tree as it was:
//!
//! ```rust
//! use oxide_tql_core::ast::ColumnReference;
//! use oxide_tql_core::parse_query;
//!
//! let mut ast = parse_query("select a from T where a > 1").unwrap();
//! let root = ast.root().unwrap();
//! let columns: Vec<_> = ast.create_iterable::<ColumnReference>(root).collect();
//! for column in columns {
//!     let renamed = ast.column("_C1_");
//!     ast.replace_element(column, renamed).unwrap();
//! }
//! assert_eq!(ast.to_sql(root), "SELECT _C1_ FROM T WHERE _C1_ > 1");
//! ```

mod analysis;
pub mod ast;
pub mod dialect;
mod error;
pub mod lexer;
pub mod parser;
mod query;
mod render;
mod tree;
pub mod types;
mod value;

pub use ast::{NodeId, NodeKind};
pub use dialect::{Dialect, GenericDialect};
pub use error::{Result, TreeError};
pub use parser::{ParseError, Parser};
pub use query::{SortItem, ROW_ID, ROW_VERSION};
pub use render::{SqlDisplay, ToSqlParameters};
pub use tree::{Ancestors, Ast, ChildSlot, Descendants};
pub use value::SqlValue;

/// Parses a complete query.
///
/// # Errors
///
/// Returns a [`ParseError`] describing the first token that does not fit the
/// grammar.
pub fn parse_query(sql: &str) -> core::result::Result<Ast, ParseError> {
    Parser::new(sql).parse_query()
}
