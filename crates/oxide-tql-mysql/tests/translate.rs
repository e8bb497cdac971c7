mod common;

use common::*;
use oxide_tql_core::ast::UnnestedHasPredicate;
use oxide_tql_core::{parse_query, SqlValue};
use oxide_tql_mysql::{translate_extensions, TranslateError, TranslationConfig};

#[test]
fn test_has_becomes_exists_over_json_table() {
    let query = translate("select * from syn123 where tags has ('b', 'a')");
    assert_eq!(
        query.sql,
        "SELECT * FROM T123 WHERE EXISTS (SELECT 1 FROM JSON_TABLE(_C6_, '$[*]' \
         COLUMNS(_C6__UNNEST VARCHAR(20) PATH '$' ERROR ON ERROR)) AS J0 \
         WHERE _C6__UNNEST IN (:b0, :b1))"
    );
    assert_eq!(query.parameters["b0"], SqlValue::Text("a".into()));
    assert_eq!(query.parameters["b1"], SqlValue::Text("b".into()));
}

#[test]
fn test_not_has_binds_element_type() {
    let query = translate("select * from syn123 where ids not has (1, 2)");
    assert_eq!(
        query.sql,
        "SELECT * FROM T123 WHERE NOT EXISTS (SELECT 1 FROM JSON_TABLE(_C7_, '$[*]' \
         COLUMNS(_C7__UNNEST BIGINT PATH '$' ERROR ON ERROR)) AS J0 \
         WHERE _C7__UNNEST IN (:b0, :b1))"
    );
    assert_eq!(query.parameters["b0"], SqlValue::Int(1));
    assert_eq!(query.parameters["b1"], SqlValue::Int(2));
}

#[test]
fn test_has_like_on_boolean_list() {
    let query = translate("select * from syn123 where flags has_like ('true')");
    assert_eq!(
        query.sql,
        "SELECT * FROM T123 WHERE EXISTS (SELECT 1 FROM JSON_TABLE(_C8_, '$[*]' \
         COLUMNS(_C8__UNNEST BOOLEAN PATH '$' ERROR ON ERROR)) AS J0 \
         WHERE _C8__UNNEST LIKE :b0)"
    );
    assert_eq!(query.parameters["b0"], SqlValue::Bool(true));
}

#[test]
fn test_two_has_predicates_get_distinct_aliases() {
    let query = translate("select * from syn123 where tags has ('a') or ids has (1)");
    assert!(query.sql.contains(") AS J0 "));
    assert!(query.sql.contains(") AS J1 "));
    assert_eq!(query.parameters.len(), 2);
}

#[test]
fn test_unnest_adds_one_join() {
    let query = translate(
        "select unnest(tags), count(*) from syn123 where bar in ('2', '1') \
         group by unnest(tags) order by unnest(tags)",
    );
    assert_eq!(
        query.sql,
        "SELECT _C6__UNNEST, COUNT(*) FROM T123 LEFT JOIN JSON_TABLE(_C6_, '$[*]' \
         COLUMNS(_C6__UNNEST VARCHAR(20) PATH '$' ERROR ON ERROR)) AS J0 ON TRUE \
         WHERE _C2_ IN (:b0, :b1) GROUP BY _C6__UNNEST ORDER BY _C6__UNNEST"
    );
    assert_eq!(query.parameters["b0"], SqlValue::Int(1));
    assert_eq!(query.parameters["b1"], SqlValue::Int(2));
    assert!(query.is_aggregate);
    assert_eq!(query.single_table.as_deref(), Some("syn123"));
}

#[test]
fn test_unnested_column_beside_has_binds_element_type() {
    let query = translate("select unnest(ids) from syn123 where ids has ('3')");
    assert_eq!(
        query.sql,
        "SELECT _C7__UNNEST FROM T123 LEFT JOIN JSON_TABLE(_C7_, '$[*]' \
         COLUMNS(_C7__UNNEST BIGINT PATH '$' ERROR ON ERROR)) AS J1 ON TRUE \
         WHERE EXISTS (SELECT 1 FROM JSON_TABLE(_C7_, '$[*]' \
         COLUMNS(_C7__UNNEST BIGINT PATH '$' ERROR ON ERROR)) AS J0 \
         WHERE _C7__UNNEST IN (:b0))"
    );
    assert_eq!(query.parameters["b0"], SqlValue::Int(3));
}

#[test]
fn test_text_matches_becomes_match_against() {
    let query = translate("select * from syn123 where text_matches('cancer')");
    assert_eq!(
        query.sql,
        "SELECT * FROM T123 WHERE MATCH(ROW_SEARCH_CONTENT) AGAINST(:b0)"
    );
    assert_eq!(query.parameters["b0"], SqlValue::Text("cancer".into()));
    assert!(query.includes_search);
}

#[test]
fn test_extension_translation_is_idempotent() {
    let mut ast = parse_query(
        "select unnest(tags) from syn123 where ids has (1) and text_matches('x')",
    )
    .unwrap();
    let root = ast.root().unwrap();
    let config = TranslationConfig::default();
    translate_extensions(&mut ast, root, &schema(), &config).unwrap();
    let once = ast.to_sql(root);
    translate_extensions(&mut ast, root, &schema(), &config).unwrap();
    assert_eq!(ast.to_sql(root), once);
    assert_eq!(ast.create_iterable::<UnnestedHasPredicate>(root).count(), 1);
}

#[test]
fn test_values_bind_by_column_type() {
    let config = TranslationConfig {
        current_user_id: Some(42),
        ..TranslationConfig::default()
    };
    let query = translate_with(
        "select * from syn123 where born > '2021-03-04' and score = 'NaN' \
         and owner = CURRENT_USER()",
        &config,
    )
    .unwrap();
    assert_eq!(
        query.sql,
        "SELECT * FROM T123 WHERE _C3_ = :b2 AND _C4_ > :b0 AND _C5_ = :b1"
    );
    assert_eq!(query.parameters["b0"], SqlValue::Int(1_614_816_000_000));
    assert_eq!(query.parameters["b1"], SqlValue::Int(42));
    assert!(matches!(query.parameters["b2"], SqlValue::Float(f) if f.is_nan()));
}

#[test]
fn test_unparsable_value_binds_as_text() {
    let query = translate("select * from syn123 where bar = 'abc'");
    assert_eq!(query.sql, "SELECT * FROM T123 WHERE _C2_ = :b0");
    assert_eq!(query.parameters["b0"], SqlValue::Text("abc".into()));
}

#[test]
fn test_current_user_requires_configured_user() {
    let error = translate_with(
        "select * from syn123 where owner = current_user()",
        &TranslationConfig::default(),
    )
    .unwrap_err();
    assert!(matches!(error, TranslateError::NoCurrentUser));
}

#[test]
fn test_page_size_is_capped() {
    let config = TranslationConfig {
        max_rows_per_page: Some(25),
        ..TranslationConfig::default()
    };
    let query = translate_with("select foo from syn123 limit 100 offset 5", &config).unwrap();
    assert_eq!(query.sql, "SELECT _C1_ FROM T123 LIMIT :b0 OFFSET :b1");
    assert_eq!(query.parameters["b0"], SqlValue::Int(25));
    assert_eq!(query.parameters["b1"], SqlValue::Int(5));

    let query = translate_with("select foo from syn123 limit 10", &config).unwrap();
    assert_eq!(query.sql, "SELECT _C1_ FROM T123 LIMIT :b0");
    assert_eq!(query.parameters["b0"], SqlValue::Int(10));
}

#[test]
fn test_delimited_identifiers_become_backticks() {
    let query = translate(r#"select "foo" as "the foo" from syn123 order by "the foo""#);
    assert_eq!(
        query.sql,
        "SELECT _C1_ AS `the foo` FROM T123 ORDER BY `the foo`"
    );
}

#[test]
fn test_alias_qualifier_is_kept() {
    let query = translate("select t.foo from syn123 as t where t.bar = 1");
    assert_eq!(
        query.sql,
        "SELECT t._C1_ FROM T123 AS t WHERE t._C2_ = :b0"
    );
}

#[test]
fn test_unknown_names_are_rejected() {
    let error = translate_with("select nope from syn123", &TranslationConfig::default())
        .unwrap_err();
    assert_eq!(error.to_string(), "Column does not exist: nope");

    let error = translate_with("select foo from syn999", &TranslationConfig::default())
        .unwrap_err();
    assert!(matches!(error, TranslateError::UnknownTable(ref t) if t == "syn999"));
}

#[test]
fn test_list_operator_on_scalar_column_is_rejected() {
    let error = translate_with(
        "select * from syn123 where foo has ('x')",
        &TranslationConfig::default(),
    )
    .unwrap_err();
    assert!(matches!(error, TranslateError::NotAListColumn(ref c) if c == "foo"));
}

#[test]
fn test_parse_errors_are_reported() {
    let error = translate_with("select from", &TranslationConfig::default()).unwrap_err();
    assert!(matches!(error, TranslateError::Parse(_)));
}

#[test]
fn test_translated_query_serializes() {
    let query = translate("select foo from syn123 where bar = 7");
    let json = serde_json::to_value(&query).unwrap();
    assert_eq!(json["sql"], "SELECT _C1_ FROM T123 WHERE _C2_ = :b0");
    assert_eq!(json["parameters"]["b0"], 7);
    assert_eq!(json["single_table"], "syn123");
    assert_eq!(json["is_aggregate"], false);
}
