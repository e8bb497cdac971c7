//! Whole-query rewrites: paging, sorting and counting.
//!
//! Each operation takes the id of a [`QuerySpecification`] and edits it in
//! place through the slot operations of [`Ast`].

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::ast::{
    ColumnReference, DerivedColumn, GroupByClause, Identifier, Literal, NodeCategory, NodeId,
    NodeKind, OrderByClause, OrderingSpecification, Pagination, QuerySpecification, RowValue, SelectList,
    SetFunction, SetQuantifier, SortSpecification, TableExpression,
};
use crate::error::{Result, TreeError};
use crate::parser::Parser;
use crate::tree::Ast;
use crate::types::SetFunctionType;

/// Name of the row id column every table carries.
pub const ROW_ID: &str = "ROW_ID";
/// Name of the row version column every table carries.
pub const ROW_VERSION: &str = "ROW_VERSION";

/// A caller-requested sort on one column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortItem {
    /// Column name, or an aggregate expression such as `COUNT(a)`.
    pub column: String,
    /// `None` sorts ascending.
    #[serde(default)]
    pub direction: Option<OrderingSpecification>,
}

impl SortItem {
    #[must_use]
    pub fn new(column: impl Into<String>, direction: Option<OrderingSpecification>) -> Self {
        Self {
            column: column.into(),
            direction,
        }
    }
}

impl Ast {
    fn query_specification(&self, query: NodeId) -> Result<QuerySpecification> {
        match self.node(query) {
            Some(NodeKind::QuerySpecification(q)) => Ok(*q),
            Some(_) => Err(TreeError::CategoryMismatch {
                replaced: NodeCategory::Query,
                replacement: self.category(query),
            }),
            None => Err(TreeError::UnknownNode(query)),
        }
    }

    fn table_expression_of(&self, query: NodeId) -> Result<(NodeId, TableExpression)> {
        let id = self.query_specification(query)?.table_expression;
        match self.get::<TableExpression>(id) {
            Some(t) => Ok((id, *t)),
            None => Err(TreeError::UnknownNode(id)),
        }
    }

    /// Returns the integer `LIMIT` and `OFFSET` of a query, when present.
    ///
    /// Bound values are not known here and read as absent.
    #[must_use]
    pub fn pagination_values(&self, query: NodeId) -> Option<(Option<i64>, Option<i64>)> {
        let (_, table_expression) = self.table_expression_of(query).ok()?;
        let pagination = self.get::<Pagination>(table_expression.pagination?)?;
        let integer = |id: NodeId| match self.get::<Literal>(id) {
            Some(Literal::Integer(n)) => Some(*n),
            _ => None,
        };
        Some((integer(pagination.limit), pagination.offset.and_then(integer)))
    }

    fn replace_pagination(&mut self, query: NodeId, limit: i64, offset: i64) -> Result<()> {
        let (table_expression, _) = self.table_expression_of(query)?;
        let pagination = self.pagination(limit, Some(offset));
        self.set_pagination(table_expression, Some(pagination))
    }

    /// Applies a caller's page request on top of the query's own paging.
    ///
    /// The request pages within the rows the query already selects: offsets
    /// add up and the query's limit shrinks by the requested offset. Nothing
    /// changes when neither value is given.
    ///
    /// # Errors
    ///
    /// Fails if `query` is not a query specification.
    pub fn override_pagination(
        &mut self,
        query: NodeId,
        offset: Option<i64>,
        limit: Option<i64>,
    ) -> Result<()> {
        if offset.is_none() && limit.is_none() {
            return Ok(());
        }
        let limit_from_request = limit.unwrap_or(i64::MAX);
        let offset_from_request = offset.unwrap_or(0);
        let (limit_from_query, offset_from_query) = match self.pagination_values(query) {
            Some((limit, offset)) => (limit.unwrap_or(i64::MAX), offset.unwrap_or(0)),
            None => (i64::MAX, 0),
        };

        let paginated_offset = offset_from_query.saturating_add(offset_from_request);
        let limit_from_query = limit_from_query.saturating_sub(offset_from_request).max(0);
        let paginated_limit = limit_from_request.min(limit_from_query);
        self.replace_pagination(query, paginated_limit, paginated_offset)
    }

    /// Caps the page size of a query at `max_rows_per_page`.
    ///
    /// A query without paging gets `LIMIT max OFFSET 0`.
    ///
    /// # Errors
    ///
    /// Fails if `query` is not a query specification.
    pub fn limit_max_rows_per_page(
        &mut self,
        query: NodeId,
        max_rows_per_page: Option<i64>,
    ) -> Result<()> {
        let Some(max) = max_rows_per_page else {
            return Ok(());
        };
        match self.pagination_values(query) {
            None => self.replace_pagination(query, max, 0),
            Some((Some(limit), offset)) if limit > max => {
                debug!(limit, max, "capping page size");
                self.replace_pagination(query, max, offset.unwrap_or(0))
            }
            Some(_) => Ok(()),
        }
    }

    /// Adds `key [ordering]` as a detached sort specification.
    ///
    /// # Errors
    ///
    /// Returns [`TreeError::UnsupportedOrderByFunction`] when `key` is a
    /// function that cannot be sorted on.
    pub fn sort_specification(
        &mut self,
        key: NodeId,
        ordering: Option<OrderingSpecification>,
    ) -> Result<NodeId> {
        match self.node(key) {
            Some(NodeKind::CurrentUserFunction(f)) => Err(TreeError::UnsupportedOrderByFunction(
                f.name.as_str().to_string(),
            )),
            Some(_) => Ok(self.add(SortSpecification { key, ordering })),
            None => Err(TreeError::UnknownNode(key)),
        }
    }

    /// Builds the sort key for a requested column name.
    ///
    /// Aggregate expressions are kept as expressions. Anything else becomes a
    /// double-quoted column name, so names with spaces or keywords survive.
    fn sort_key(&mut self, column: &str) -> Result<NodeId> {
        if let Ok(parsed) = Parser::new(column).parse_value_expression() {
            if let Some(root) = parsed.root() {
                if parsed.has_any_aggregate_elements(root) {
                    return self.graft(&parsed, root);
                }
            }
        }
        let name = self.add(Identifier::double_quoted(column));
        Ok(self.add(ColumnReference {
            qualifier: None,
            name,
        }))
    }

    /// Puts the requested sort items in front of the query's ORDER BY.
    ///
    /// A requested column replaces an original sort on the same key; the
    /// remaining original sorts follow in their original order.
    ///
    /// # Errors
    ///
    /// Fails if `query` is not a query specification or a sort key cannot be
    /// sorted on.
    pub fn apply_sort(&mut self, query: NodeId, items: &[SortItem]) -> Result<()> {
        if items.is_empty() {
            return Ok(());
        }
        let (table_expression, t) = self.table_expression_of(query)?;
        let mut originals: Vec<(String, NodeId)> = t
            .order_by
            .and_then(|id| self.get::<OrderByClause>(id))
            .map(|o| o.specifications.clone())
            .unwrap_or_default()
            .into_iter()
            .filter_map(|id| {
                let key = self.get::<SortSpecification>(id)?.key;
                Some((self.to_sql(key), id))
            })
            .collect();

        let mut specifications = Vec::with_capacity(items.len() + originals.len());
        for item in items {
            originals.retain(|(key, _)| *key != item.column);
            let key = self.sort_key(&item.column)?;
            let ordering = item.direction.unwrap_or(OrderingSpecification::Asc);
            specifications.push(self.sort_specification(key, Some(ordering))?);
        }
        specifications.extend(originals.into_iter().map(|(_, id)| id));

        let order_by = self.add(OrderByClause { specifications });
        self.set_order_by(table_expression, Some(order_by))
    }

    /// Turns a query into one that counts the rows it would return.
    ///
    /// - A grouped query counts its distinct groups. Group keys naming a
    ///   select alias count the aliased expression.
    /// - A `DISTINCT` query counts its distinct rows.
    /// - Any other non-aggregate query becomes `COUNT(*)`.
    ///
    /// GROUP BY, ORDER BY and paging are removed. Returns `false`, leaving
    /// the query untouched, for an aggregate query that already returns a
    /// single row.
    ///
    /// # Errors
    ///
    /// Fails if `query` is not a query specification.
    pub fn to_count_query(&mut self, query: NodeId) -> Result<bool> {
        let specification = self.query_specification(query)?;
        let (table_expression, t) = self.table_expression_of(query)?;
        let columns = match self.get::<SelectList>(specification.select_list) {
            Some(SelectList::Columns(columns)) => columns.clone(),
            _ => vec![],
        };

        let count = if !self.has_any_aggregate_elements(query) {
            SetFunction {
                function: SetFunctionType::Count,
                distinct: false,
                argument: None,
            }
        } else {
            let values = if let Some(group_by) = t.group_by {
                self.group_keys_as_select_values(group_by, &columns)?
            } else if specification.quantifier == Some(SetQuantifier::Distinct) {
                let mut values = Vec::with_capacity(columns.len());
                for column in &columns {
                    if let Some(d) = self.get::<DerivedColumn>(*column).copied() {
                        values.push(self.duplicate(d.value)?);
                    }
                }
                values
            } else {
                vec![]
            };
            let argument = match values.len() {
                0 => return Ok(false),
                1 => values[0],
                _ => self.add(RowValue { values }),
            };
            SetFunction {
                function: SetFunctionType::Count,
                distinct: true,
                argument: Some(argument),
            }
        };

        let count = self.add(count);
        let derived = self.add(DerivedColumn {
            value: count,
            alias: None,
        });
        let select_list = self.add(SelectList::Columns(vec![derived]));
        self.replace_select_list(query, select_list)?;
        self.set_quantifier(query, None)?;
        self.set_pagination(table_expression, None)?;
        self.set_group_by(table_expression, None)?;
        self.set_order_by(table_expression, None)?;
        debug!(%query, "rewrote query to count rows");
        Ok(true)
    }

    fn group_keys_as_select_values(
        &mut self,
        group_by: NodeId,
        columns: &[NodeId],
    ) -> Result<Vec<NodeId>> {
        let aliased: Vec<(String, NodeId)> = columns
            .iter()
            .filter_map(|id| self.get::<DerivedColumn>(*id))
            .filter_map(|d| Some((self.to_sql_without_quotes(d.alias?), d.value)))
            .collect();
        let keys = self
            .get::<GroupByClause>(group_by)
            .map(|g| g.columns.clone())
            .unwrap_or_default();

        let mut values = Vec::with_capacity(keys.len());
        for key in keys {
            let unquoted = self.to_sql_without_quotes(key);
            let source = aliased
                .iter()
                .find_map(|(alias, value)| (*alias == unquoted).then_some(*value))
                .unwrap_or(key);
            values.push(self.duplicate(source)?);
        }
        Ok(values)
    }

    /// Returns `SELECT ROW_ID, ROW_VERSION` over the query's FROM and WHERE,
    /// limited to `max_limit` rows.
    ///
    /// Aggregate queries have no row ids and yield `None`.
    #[must_use]
    pub fn row_id_and_version_sql(&self, query: NodeId, max_limit: u64) -> Option<String> {
        if self.has_any_aggregate_elements(query) {
            return None;
        }
        let (_, t) = self.table_expression_of(query).ok()?;
        let filter = t
            .where_clause
            .map(|w| format!(" {}", self.to_sql(w)))
            .unwrap_or_default();
        Some(format!(
            "SELECT {ROW_ID}, {ROW_VERSION} {}{filter} LIMIT {max_limit}",
            self.to_sql(t.from)
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parsed(sql: &str) -> (Ast, NodeId, NodeId) {
        let ast = crate::parse_query(sql).unwrap();
        let root = ast.root().unwrap();
        let query = ast.first_element_of_type::<QuerySpecification>(root).unwrap();
        (ast, root, query)
    }

    #[test]
    fn test_override_pagination_without_request() {
        let (mut ast, root, query) = parsed("select * from T limit 10");
        ast.override_pagination(query, None, None).unwrap();
        assert_eq!(ast.to_sql(root), "SELECT * FROM T LIMIT 10");
    }

    #[test]
    fn test_override_pagination_pages_within_query() {
        let (mut ast, root, query) = parsed("select * from T limit 100 offset 10");
        ast.override_pagination(query, Some(5), Some(20)).unwrap();
        assert_eq!(ast.to_sql(root), "SELECT * FROM T LIMIT 20 OFFSET 15");

        let (mut ast, root, query) = parsed("select * from T limit 10 offset 0");
        ast.override_pagination(query, Some(8), Some(20)).unwrap();
        assert_eq!(ast.to_sql(root), "SELECT * FROM T LIMIT 2 OFFSET 8");

        let (mut ast, root, query) = parsed("select * from T limit 10");
        ast.override_pagination(query, Some(15), None).unwrap();
        assert_eq!(ast.to_sql(root), "SELECT * FROM T LIMIT 0 OFFSET 15");
    }

    #[test]
    fn test_override_pagination_without_query_paging() {
        let (mut ast, root, query) = parsed("select * from T");
        ast.override_pagination(query, None, Some(3)).unwrap();
        assert_eq!(ast.to_sql(root), "SELECT * FROM T LIMIT 3 OFFSET 0");
    }

    #[test]
    fn test_limit_max_rows_per_page() {
        let (mut ast, root, query) = parsed("select * from T");
        ast.limit_max_rows_per_page(query, Some(25)).unwrap();
        assert_eq!(ast.to_sql(root), "SELECT * FROM T LIMIT 25 OFFSET 0");

        let (mut ast, root, query) = parsed("select * from T limit 100 offset 7");
        ast.limit_max_rows_per_page(query, Some(25)).unwrap();
        assert_eq!(ast.to_sql(root), "SELECT * FROM T LIMIT 25 OFFSET 7");

        let (mut ast, root, query) = parsed("select * from T limit 10");
        ast.limit_max_rows_per_page(query, Some(25)).unwrap();
        assert_eq!(ast.to_sql(root), "SELECT * FROM T LIMIT 10");

        ast.limit_max_rows_per_page(query, None).unwrap();
        assert_eq!(ast.to_sql(root), "SELECT * FROM T LIMIT 10");
    }

    #[test]
    fn test_apply_sort() {
        let (mut ast, root, query) = parsed("select * from T order by b desc, c");
        ast.apply_sort(
            query,
            &[
                SortItem::new("a", None),
                SortItem::new("b", Some(OrderingSpecification::Asc)),
            ],
        )
        .unwrap();
        assert_eq!(
            ast.to_sql(root),
            "SELECT * FROM T ORDER BY \"a\" ASC, \"b\" ASC, c"
        );
    }

    #[test]
    fn test_apply_sort_keeps_aggregates_unquoted() {
        let (mut ast, root, query) = parsed("select a, count(b) from T group by a");
        ast.apply_sort(
            query,
            &[
                SortItem::new("count(b)", Some(OrderingSpecification::Desc)),
                SortItem::new("has space", None),
            ],
        )
        .unwrap();
        assert_eq!(
            ast.to_sql(root),
            "SELECT a, COUNT(b) FROM T GROUP BY a ORDER BY COUNT(b) DESC, \"has space\" ASC"
        );
    }

    #[test]
    fn test_apply_empty_sort_is_noop() {
        let (mut ast, root, query) = parsed("select * from T order by c");
        ast.apply_sort(query, &[]).unwrap();
        assert_eq!(ast.to_sql(root), "SELECT * FROM T ORDER BY c");
    }

    #[test]
    fn test_sort_on_current_user_is_rejected() {
        let mut ast = Ast::new();
        let key = ast.add(crate::ast::CurrentUserFunction {
            name: crate::types::CurrentUserFunctionName::CurrentUser,
        });
        assert_eq!(
            ast.sort_specification(key, None),
            Err(TreeError::UnsupportedOrderByFunction("CURRENT_USER".to_string()))
        );
    }

    #[test]
    fn test_sort_item_deserializes() {
        let item: SortItem = serde_json::from_str(r#"{"column": "a", "direction": "DESC"}"#).unwrap();
        assert_eq!(item, SortItem::new("a", Some(OrderingSpecification::Desc)));
        let item: SortItem = serde_json::from_str(r#"{"column": "a"}"#).unwrap();
        assert_eq!(item.direction, None);
    }

    #[test]
    fn test_count_plain_query() {
        let (mut ast, root, query) = parsed("select a, b from T where a > 1 order by b limit 10");
        assert!(ast.to_count_query(query).unwrap());
        assert_eq!(ast.to_sql(root), "SELECT COUNT(*) FROM T WHERE a > 1");
    }

    #[test]
    fn test_count_grouped_query_uses_select_expressions() {
        let (mut ast, root, query) =
            parsed("select upper(a) as x, b, count(*) from T group by x, b order by b");
        assert!(ast.to_count_query(query).unwrap());
        assert_eq!(ast.to_sql(root), "SELECT COUNT(DISTINCT UPPER(a), b) FROM T");
    }

    #[test]
    fn test_count_distinct_query() {
        let (mut ast, root, query) = parsed("select distinct a, b as y from T limit 5");
        assert!(ast.to_count_query(query).unwrap());
        assert_eq!(ast.to_sql(root), "SELECT COUNT(DISTINCT a, b) FROM T");
    }

    #[test]
    fn test_count_of_aggregate_is_refused() {
        let (mut ast, root, query) = parsed("select count(*) from T");
        assert!(!ast.to_count_query(query).unwrap());
        assert_eq!(ast.to_sql(root), "SELECT COUNT(*) FROM T");
    }

    #[test]
    fn test_row_id_and_version_sql() {
        let (ast, _, query) = parsed("select a from T where b = 1 order by a limit 3");
        assert_eq!(
            ast.row_id_and_version_sql(query, 1000).as_deref(),
            Some("SELECT ROW_ID, ROW_VERSION FROM T WHERE b = 1 LIMIT 1000")
        );
        let (ast, _, query) = parsed("select count(*) from T");
        assert_eq!(ast.row_id_and_version_sql(query, 1000), None);
    }
}
