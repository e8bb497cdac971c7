#![allow(dead_code)]

use oxide_tql_core::{Ast, NodeId, ParseError, Parser};

pub fn parse(sql: &str) -> Ast {
    Parser::new(sql)
        .parse_query()
        .unwrap_or_else(|e| panic!("Failed to parse: {sql}\nError: {e}"))
}

pub fn parse_err(sql: &str) -> ParseError {
    Parser::new(sql)
        .parse_query()
        .expect_err(&format!("Expected parse error for: {sql}"))
}

pub fn parse_condition(sql: &str) -> Ast {
    Parser::new(sql)
        .parse_search_condition()
        .unwrap_or_else(|e| panic!("Failed to parse: {sql}\nError: {e}"))
}

pub fn root(ast: &Ast) -> NodeId {
    ast.root().expect("parsed tree has a root")
}

pub fn render(sql: &str) -> String {
    let ast = parse(sql);
    ast.to_sql(root(&ast))
}

pub fn render_unquoted(sql: &str) -> String {
    let ast = parse(sql);
    ast.to_sql_without_quotes(root(&ast))
}

/// Verifies that rendering is a fixed point: the SQL of a parsed query
/// parses back into a tree that renders the same way.
pub fn round_trip(sql: &str) -> String {
    let rendered1 = render(sql);
    let rendered2 = render(&rendered1);
    assert_eq!(
        rendered1, rendered2,
        "Round-trip failed.\n  Input:    {sql}\n  First:    {rendered1}\n  Second:   {rendered2}"
    );
    rendered1
}
