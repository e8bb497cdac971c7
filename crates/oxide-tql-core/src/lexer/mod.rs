//! Tokenizer for the table-query dialect.
//!
//! Identifiers keep track of their delimiter so the parser can build regular
//! or delimited [`Identifier`](crate::ast::Identifier) leaves.

mod token;
mod tokenizer;

pub use token::{Keyword, Span, Token, TokenKind};
pub use tokenizer::Lexer;
