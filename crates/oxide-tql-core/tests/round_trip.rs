//! Rendering fixed points and canonical ordering.

mod common;
use common::*;

use oxide_tql_core::ast::ColumnReference;

#[test]
fn round_trip_queries() {
    for sql in [
        "SELECT * FROM syn123",
        "SELECT DISTINCT a, b AS \"the b\" FROM syn123.4 WHERE a > 1",
        "SELECT a, COUNT(*) FROM T GROUP BY a ORDER BY a DESC LIMIT 10 OFFSET 20",
        "SELECT * FROM syn1 AS a INNER JOIN syn2 AS b ON a.id = b.id",
        "WITH c AS (SELECT a FROM syn1) SELECT * FROM c",
        "SELECT a FROM syn1 UNION SELECT a FROM syn2",
        "SELECT * FROM T WHERE tags HAS ('a', 'b') AND TEXT_MATCHES('x')",
        "SELECT * FROM T WHERE NOT (a = 1 OR b IS NULL)",
        "SELECT a * (b + 1) FROM T",
        "SELECT * FROM T WHERE a IN (SELECT b FROM U)",
    ] {
        round_trip(sql);
    }
}

#[test]
fn keywords_are_case_insensitive() {
    assert_eq!(
        render("select a from t where b is not null"),
        "SELECT a FROM t WHERE b IS NOT NULL"
    );
}

#[test]
fn and_lists_render_in_canonical_order() {
    assert_eq!(
        render("select * from T where b = 2 and a = 1"),
        render("select * from T where a = 1 and b = 2")
    );
    assert_eq!(
        render("select * from T where b = 2 or a = 1"),
        "SELECT * FROM T WHERE a = 1 OR b = 2"
    );
}

#[test]
fn in_lists_render_in_canonical_order() {
    assert_eq!(
        render("select * from T where a in ('z', 'b', 'm')"),
        "SELECT * FROM T WHERE a IN ('b', 'm', 'z')"
    );
    assert_eq!(
        render("select * from T where tags has (3, 1, 2)"),
        "SELECT * FROM T WHERE tags HAS (1, 2, 3)"
    );
}

#[test]
fn canonical_order_ignores_quotes_first() {
    assert_eq!(
        render("select * from T where \"b\" = 1 and a = 1"),
        "SELECT * FROM T WHERE a = 1 AND \"b\" = 1"
    );
}

#[test]
fn duplicates_are_kept() {
    assert_eq!(
        render("select * from T where a in (1, 1)"),
        "SELECT * FROM T WHERE a IN (1, 1)"
    );
}

#[test]
fn select_list_order_is_preserved() {
    assert_eq!(render("select b, a from T"), "SELECT b, a FROM T");
}

#[test]
fn escape_fidelity() {
    let ast = parse("select * from T where name = 'O''Brien'");
    assert_eq!(
        ast.to_sql(root(&ast)),
        "SELECT * FROM T WHERE name = 'O''Brien'"
    );
    assert_eq!(
        ast.to_sql_without_quotes(root(&ast)),
        "SELECT * FROM T WHERE name = O'Brien"
    );
}

#[test]
fn delimited_identifier_escapes() {
    assert_eq!(
        render("select \"say \"\"hi\"\"\" from T"),
        "SELECT \"say \"\"hi\"\"\" FROM T"
    );
    assert_eq!(render("select `a``b` from T"), "SELECT `a``b` FROM T");
    assert_eq!(render_unquoted("select `a``b` from T"), "SELECT a`b FROM T");
}

/// `a0 = 0 AND (a1 = 1 OR (a2 = 2 AND (...)))`, `depth` levels deep.
fn nested_condition(depth: usize) -> String {
    let mut sql = format!("a{depth} = {depth}");
    for level in (0..depth).rev() {
        let joiner = if level % 2 == 0 { "AND" } else { "OR" };
        sql = format!("a{level} = {level} {joiner} ({sql})");
    }
    format!("select * from T where {sql}")
}

#[test]
fn deeply_nested_conditions_render() {
    let sql = nested_condition(30);
    let rendered = round_trip(&sql);
    assert!(rendered.starts_with("SELECT * FROM T WHERE (("));
    assert!(rendered.ends_with(") AND a0 = 0"));

    let ast = parse(&sql);
    let root = root(&ast);
    assert_eq!(ast.create_iterable::<ColumnReference>(root).count(), 31);
    assert!(!ast.has_quotes_recursive(root));
}

#[test]
fn nested_signs_do_not_form_a_comment() {
    assert_eq!(
        round_trip("select - -b, - -1, -(-a) from T"),
        "SELECT - -b, - -1, -(-a) FROM T"
    );
}
