//! Rewrites of the dialect extensions into MySQL.
//!
//! - `col [NOT] HAS (v, ...)` becomes
//!   `[NOT] EXISTS (SELECT 1 FROM JSON_TABLE(col, ...) AS J WHERE col_UNNEST IN (v, ...))`.
//! - `col [NOT] HAS_LIKE (p, ...) [ESCAPE e]` becomes the same subquery with
//!   `col_UNNEST LIKE p [ESCAPE e] OR ...` as its condition.
//! - `UNNEST(col)` becomes the column `col_UNNEST`, and the FROM of its query
//!   gains `LEFT JOIN JSON_TABLE(col, ...) AS J ON TRUE`.
//! - `TEXT_MATCHES(v)` becomes `MATCH(search_column) AGAINST(v)`.
//!
//! Every rewrite goes through [`Ast::replace_element`] or [`Ast::set_slot`],
//! so parent links stay consistent. None of the rewritten forms is an input
//! of another, which makes the pass idempotent.

use oxide_tql_core::ast::{
    ArrayFunction, ArrayHasKind, ArrayHasPredicate, FromClause, InPredicate, InValueList, JoinType,
    JsonColumnType, JsonTableColumn, LikePredicate, MatchAgainstPredicate, NodeId,
    QuerySpecification, TableExpression, TableReference, TextMatchesPredicate, TruthValue,
    UnnestedHasPredicate,
};
use oxide_tql_core::types::ArrayFunctionType;
use oxide_tql_core::{Ast, ChildSlot};
use tracing::debug;

use crate::config::TranslationConfig;
use crate::error::{Result, TranslateError};
use crate::lookup::SchemaLookup;

/// Translates every extension under `root` in place.
///
/// Running it again on its own output changes nothing.
///
/// # Errors
///
/// - [`TranslateError::UnknownColumn`] if an extension names a column the
///   lookup does not know.
/// - [`TranslateError::NotAListColumn`] if `HAS`, `HAS_LIKE` or `UNNEST` is
///   applied to a scalar column.
pub fn translate_extensions<L: SchemaLookup + ?Sized>(
    ast: &mut Ast,
    root: NodeId,
    lookup: &L,
    config: &TranslationConfig,
) -> Result<()> {
    let mut unnester = Unnester {
        ast,
        root,
        lookup,
        config,
    };
    unnester.translate_has()?;
    unnester.translate_unnest()?;
    unnester.translate_text_matches()
}

struct Unnester<'a, L: ?Sized> {
    ast: &'a mut Ast,
    root: NodeId,
    lookup: &'a L,
    config: &'a TranslationConfig,
}

impl<L: SchemaLookup + ?Sized> Unnester<'_, L> {
    /// Returns the unnested column name and element type of a list column.
    fn list_column(&self, column: NodeId) -> Result<(String, JsonColumnType)> {
        let name = self
            .ast
            .column_name(column)
            .map_or_else(|| self.ast.to_sql_without_quotes(column), str::to_string);
        let translation = self
            .lookup
            .column(&name)
            .ok_or_else(|| TranslateError::UnknownColumn(name.clone()))?;
        let data_type = translation
            .element_json_type(self.config.default_max_string_length)
            .ok_or(TranslateError::NotAListColumn(name))?;
        Ok((self.config.unnested_name(&translation.physical_name), data_type))
    }

    fn next_alias(&self) -> String {
        let count = self
            .ast
            .create_iterable::<TableReference>(self.root)
            .filter(|id| {
                self.ast
                    .get::<TableReference>(*id)
                    .is_some_and(TableReference::is_json_table)
            })
            .count();
        format!("J{count}")
    }

    fn translate_has(&mut self) -> Result<()> {
        let predicates: Vec<NodeId> = self
            .ast
            .create_iterable::<ArrayHasPredicate>(self.root)
            .collect();
        for id in predicates {
            let Some(has) = self.ast.get::<ArrayHasPredicate>(id).copied() else {
                continue;
            };
            let (unnested, data_type) = self.list_column(has.left)?;
            let alias = self.next_alias();
            let json_table = self.ast.json_table(
                has.left,
                vec![JsonTableColumn {
                    name: unnested.clone(),
                    data_type,
                }],
                &alias,
            );

            let condition = match has.kind {
                ArrayHasKind::Has => {
                    let left = self.ast.column(&unnested);
                    let membership = self.ast.add(InPredicate {
                        left,
                        not: false,
                        values: has.values,
                    });
                    self.ast.conjunction(vec![membership])
                }
                ArrayHasKind::HasLike => {
                    let patterns = self
                        .ast
                        .get::<InValueList>(has.values)
                        .map(|list| list.values.clone())
                        .unwrap_or_default();
                    let mut likes = Vec::with_capacity(patterns.len());
                    for (i, pattern) in patterns.into_iter().enumerate() {
                        let escape = match has.escape {
                            Some(escape) if i > 0 => Some(self.ast.duplicate(escape)?),
                            escape => escape,
                        };
                        let left = self.ast.column(&unnested);
                        likes.push(self.ast.add(LikePredicate {
                            left,
                            not: false,
                            pattern,
                            escape,
                        }));
                    }
                    self.ast.disjunction(likes)
                }
            };

            let one = self.ast.integer(1);
            let subquery = self.ast.select(vec![one], json_table, Some(condition));
            let exists = self.ast.add(UnnestedHasPredicate {
                not: has.not,
                subquery,
            });
            self.ast.replace_element(id, exists)?;
            debug!(predicate = %id, column = %unnested, kind = has.kind.as_str(), "rewrote list predicate");
        }
        Ok(())
    }

    fn translate_unnest(&mut self) -> Result<()> {
        let functions: Vec<NodeId> = self
            .ast
            .create_iterable::<ArrayFunction>(self.root)
            .collect();
        for id in functions {
            let Some(function) = self.ast.get::<ArrayFunction>(id).copied() else {
                continue;
            };
            if function.function != ArrayFunctionType::Unnest {
                continue;
            }
            let (unnested, data_type) = self.list_column(function.column)?;
            if let Some(query) = self.ast.context::<QuerySpecification>(id) {
                if !self.joins_unnested(query, &unnested) {
                    let column = self.ast.duplicate(function.column)?;
                    self.join_json_table(query, column, unnested.clone(), data_type)?;
                }
            }
            let replacement = self.ast.column(&unnested);
            self.ast.replace_element(id, replacement)?;
        }
        Ok(())
    }

    fn from_clause(&self, query: NodeId) -> Option<NodeId> {
        let specification = self.ast.get::<QuerySpecification>(query)?;
        Some(
            self.ast
                .get::<TableExpression>(specification.table_expression)?
                .from,
        )
    }

    fn joins_unnested(&self, query: NodeId, unnested: &str) -> bool {
        let Some(from) = self.from_clause(query) else {
            return false;
        };
        self.ast
            .elements_of_type::<TableReference>(from)
            .any(|(_, table)| match table {
                TableReference::JsonTable { columns, .. } => {
                    columns.iter().any(|c| c.name == unnested)
                }
                _ => false,
            })
    }

    fn join_json_table(
        &mut self,
        query: NodeId,
        column: NodeId,
        unnested: String,
        data_type: JsonColumnType,
    ) -> Result<()> {
        let Some(from) = self.from_clause(query) else {
            return Ok(());
        };
        let Some(left) = self.ast.get::<FromClause>(from).map(|f| f.table) else {
            return Ok(());
        };
        let alias = self.next_alias();
        let right = self.ast.json_table(
            column,
            vec![JsonTableColumn {
                name: unnested,
                data_type,
            }],
            &alias,
        );
        let always = self.ast.add(TruthValue::True);
        let condition = self.ast.conjunction(vec![always]);
        let join = self.ast.add(TableReference::Join {
            left,
            join_type: JoinType::Left,
            right,
            condition: Some(condition),
        });
        self.ast.set_slot(from, ChildSlot::Table, Some(join))?;
        debug!(%query, %alias, "joined unnested list column");
        Ok(())
    }

    fn translate_text_matches(&mut self) -> Result<()> {
        let predicates: Vec<NodeId> = self
            .ast
            .create_iterable::<TextMatchesPredicate>(self.root)
            .collect();
        for id in predicates {
            let Some(text) = self.ast.get::<TextMatchesPredicate>(id).copied() else {
                continue;
            };
            let column = self.ast.column(&self.config.search_column);
            let search = self.ast.add(MatchAgainstPredicate {
                column,
                value: text.value,
            });
            self.ast.replace_element(id, search)?;
            debug!(predicate = %id, "rewrote full-text search");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lookup::{ColumnTranslation, MappedSchema};
    use oxide_tql_core::parse_query;
    use oxide_tql_core::types::ColumnType;

    fn schema() -> MappedSchema {
        MappedSchema::new()
            .with_column("tags", ColumnTranslation::new("_C1_", ColumnType::StringList))
            .with_column("ids", ColumnTranslation::new("_C2_", ColumnType::EntityIdList))
            .with_column("name", ColumnTranslation::new("_C3_", ColumnType::String))
    }

    fn translated(sql: &str) -> String {
        let mut ast = parse_query(sql).unwrap();
        let root = ast.root().unwrap();
        translate_extensions(&mut ast, root, &schema(), &TranslationConfig::default()).unwrap();
        ast.to_sql(root)
    }

    #[test]
    fn test_has_becomes_exists() {
        assert_eq!(
            translated("select * from T where tags has ('b', 'a')"),
            "SELECT * FROM T WHERE EXISTS (SELECT 1 FROM JSON_TABLE(tags, '$[*]' \
             COLUMNS(_C1__UNNEST VARCHAR(50) PATH '$' ERROR ON ERROR)) AS J0 \
             WHERE _C1__UNNEST IN ('a', 'b'))"
        );
    }

    #[test]
    fn test_not_has_keeps_negation() {
        assert_eq!(
            translated("select * from T where ids not has (1)"),
            "SELECT * FROM T WHERE NOT EXISTS (SELECT 1 FROM JSON_TABLE(ids, '$[*]' \
             COLUMNS(_C2__UNNEST BIGINT PATH '$' ERROR ON ERROR)) AS J0 \
             WHERE _C2__UNNEST IN (1))"
        );
    }

    #[test]
    fn test_has_like_repeats_escape() {
        assert_eq!(
            translated("select * from T where tags has_like ('a%', 'b!%') escape '!'"),
            "SELECT * FROM T WHERE EXISTS (SELECT 1 FROM JSON_TABLE(tags, '$[*]' \
             COLUMNS(_C1__UNNEST VARCHAR(50) PATH '$' ERROR ON ERROR)) AS J0 \
             WHERE _C1__UNNEST LIKE 'a%' ESCAPE '!' OR _C1__UNNEST LIKE 'b!%' ESCAPE '!')"
        );
    }

    #[test]
    fn test_unnest_joins_once_per_column() {
        assert_eq!(
            translated(
                "select unnest(tags), count(*) from T where name = 'x' \
                 group by unnest(tags) order by unnest(tags)"
            ),
            "SELECT _C1__UNNEST, COUNT(*) FROM T LEFT JOIN JSON_TABLE(tags, '$[*]' \
             COLUMNS(_C1__UNNEST VARCHAR(50) PATH '$' ERROR ON ERROR)) AS J0 ON TRUE \
             WHERE name = 'x' GROUP BY _C1__UNNEST ORDER BY _C1__UNNEST"
        );
    }

    #[test]
    fn test_text_matches_becomes_match_against() {
        assert_eq!(
            translated("select * from T where text_matches('cancer')"),
            "SELECT * FROM T WHERE MATCH(ROW_SEARCH_CONTENT) AGAINST('cancer')"
        );
    }

    #[test]
    fn test_translation_is_idempotent() {
        let mut ast = parse_query(
            "select unnest(tags) from T where tags has ('a') and text_matches('x')",
        )
        .unwrap();
        let root = ast.root().unwrap();
        let config = TranslationConfig::default();
        translate_extensions(&mut ast, root, &schema(), &config).unwrap();
        let once = ast.to_sql(root);
        translate_extensions(&mut ast, root, &schema(), &config).unwrap();
        assert_eq!(ast.to_sql(root), once);
    }

    #[test]
    fn test_translated_has_keeps_left_hand_side() {
        let mut ast = parse_query("select * from T where tags has ('a', 'b')").unwrap();
        let root = ast.root().unwrap();
        let has = ast.first_element_of_type::<ArrayHasPredicate>(root).unwrap();
        let column = ast.left_hand_side(has).unwrap();
        translate_extensions(&mut ast, root, &schema(), &TranslationConfig::default()).unwrap();

        let exists = ast.first_element_of_type::<UnnestedHasPredicate>(root).unwrap();
        assert_eq!(ast.left_hand_side(exists), Some(column));
        assert_eq!(ast.root_of(column), root);
        let values: Vec<_> = ast
            .right_hand_side_values(exists)
            .into_iter()
            .map(|v| ast.to_sql(v))
            .collect();
        assert_eq!(values, vec!["'a'", "'b'"]);
    }

    #[test]
    fn test_scalar_column_is_rejected() {
        let mut ast = parse_query("select * from T where name has ('a')").unwrap();
        let root = ast.root().unwrap();
        let before = ast.to_sql(root);
        let error =
            translate_extensions(&mut ast, root, &schema(), &TranslationConfig::default())
                .unwrap_err();
        assert!(matches!(error, TranslateError::NotAListColumn(ref c) if c == "name"));
        assert_eq!(
            error.to_string(),
            "UNNEST() only works for columns that hold list values: name"
        );
        assert_eq!(ast.to_sql(root), before);
    }

    #[test]
    fn test_unknown_column_is_rejected() {
        let mut ast = parse_query("select unnest(nope) from T").unwrap();
        let root = ast.root().unwrap();
        let error =
            translate_extensions(&mut ast, root, &schema(), &TranslationConfig::default())
                .unwrap_err();
        assert!(matches!(error, TranslateError::UnknownColumn(ref c) if c == "nope"));
    }
}
