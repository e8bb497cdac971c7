//! Query parser.
//!
//! A hand-written recursive descent parser with Pratt parsing for arithmetic.
//! Nodes are added to an [`Ast`](crate::Ast) bottom-up; the finished tree is
//! linked once from its root.

mod error;
mod parser;
mod pratt;

pub use error::ParseError;
pub use parser::Parser;
