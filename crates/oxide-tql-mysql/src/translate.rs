//! The full rewrite from a parsed table query to executable MySQL.

use std::collections::{BTreeMap, BTreeSet};

use oxide_tql_core::ast::{
    ColumnReference, CurrentUserFunction, Identifier, NodeId, NodeKind, QueryExpression,
    SelectList, TableReference, WithListElement,
};
use oxide_tql_core::lexer::Span;
use oxide_tql_core::types::ColumnType;
use oxide_tql_core::{parse_query, Ast, ParseError, SqlValue, ROW_VERSION};
use serde::Serialize;
use tracing::{debug, info_span};

use crate::bind::Binder;
use crate::config::TranslationConfig;
use crate::dialect::MySqlDialect;
use crate::error::{Result, TranslateError};
use crate::extension::translate_extensions;
use crate::lookup::SchemaLookup;

/// A query ready to run against MySQL.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TranslatedQuery {
    /// SQL text with `:name` placeholders.
    pub sql: String,
    /// Values for the placeholders in `sql`.
    pub parameters: BTreeMap<String, SqlValue>,
    /// True when the query returns aggregated rows.
    pub is_aggregate: bool,
    /// True when the query uses full-text search.
    pub includes_search: bool,
    /// The one table the query reads, by its logical name.
    pub single_table: Option<String>,
}

/// Parses and translates `sql`.
///
/// # Errors
///
/// Fails on a parse error or any error of [`translate_query`].
pub fn translate_sql<L: SchemaLookup + ?Sized>(
    sql: &str,
    lookup: &L,
    config: &TranslationConfig,
) -> Result<TranslatedQuery> {
    let mut ast = parse_query(sql)?;
    let Some(root) = ast.root() else {
        return Err(ParseError::new("empty query", Span::default()).into());
    };
    translate_query(&mut ast, root, lookup, config)
}

/// Translates the query under `root` in place and renders it.
///
/// # Errors
///
/// - [`TranslateError::UnknownColumn`] / [`TranslateError::UnknownTable`]
///   for names the lookup cannot map.
/// - [`TranslateError::NotAListColumn`] for list operators over scalar
///   columns.
/// - [`TranslateError::NoCurrentUser`] if the query calls `CURRENT_USER()`
///   and no user is configured.
pub fn translate_query<L: SchemaLookup + ?Sized>(
    ast: &mut Ast,
    root: NodeId,
    lookup: &L,
    config: &TranslationConfig,
) -> Result<TranslatedQuery> {
    let span = info_span!("translate_query", %root);
    let _guard = span.enter();

    let is_aggregate = ast.is_aggregate_query(root);
    let includes_search = ast.has_text_search(root);
    let single_table = ast
        .single_table_name(root)
        .map(|name| ast.to_sql_without_quotes(name));

    translate_extensions(ast, root, lookup, config)?;
    replace_current_user(ast, root, config)?;
    cap_page_size(ast, root, config)?;

    let unnested = unnested_columns(ast, root, lookup);
    let mut binder = Binder::new(config.bind_prefix.as_str());
    binder.bind_predicates(ast, root, |ast, left| {
        ast.infer_type(left, &|name: &str| {
            if name == config.search_column {
                Some(ColumnType::String)
            } else if let Some(element) = unnested.get(name) {
                Some(*element)
            } else {
                lookup.column(name).map(|c| c.column_type)
            }
        })
    })?;
    binder.bind_pagination(ast, root)?;

    let cte_names = map_columns(ast, root, lookup, config, &unnested)?;
    map_tables(ast, root, lookup, &cte_names)?;
    let normalized = ast.normalize_delimiters(root, &MySqlDialect::new());

    let sql = ast.to_sql(root);
    debug!(%sql, normalized, "translated query");
    Ok(TranslatedQuery {
        sql,
        parameters: binder.into_parameters(),
        is_aggregate,
        includes_search,
        single_table,
    })
}

fn replace_current_user(ast: &mut Ast, root: NodeId, config: &TranslationConfig) -> Result<()> {
    let calls: Vec<NodeId> = ast.create_iterable::<CurrentUserFunction>(root).collect();
    if calls.is_empty() {
        return Ok(());
    }
    let user = config.current_user_id.ok_or(TranslateError::NoCurrentUser)?;
    for call in calls {
        let literal = ast.integer(user);
        ast.replace_element(call, literal)?;
    }
    Ok(())
}

fn cap_page_size(ast: &mut Ast, root: NodeId, config: &TranslationConfig) -> Result<()> {
    let Some(max) = config.max_rows_per_page else {
        return Ok(());
    };
    let body = match ast.node(root) {
        Some(NodeKind::QueryExpression(QueryExpression { body, .. })) => *body,
        _ => root,
    };
    if !matches!(ast.node(body), Some(NodeKind::QuerySpecification(_))) {
        return Ok(());
    }
    let max = i64::try_from(max).unwrap_or(i64::MAX);
    ast.limit_max_rows_per_page(body, Some(max))?;
    Ok(())
}

/// Maps each `JSON_TABLE` output column to the element type of its source.
fn unnested_columns<L: SchemaLookup + ?Sized>(
    ast: &Ast,
    root: NodeId,
    lookup: &L,
) -> BTreeMap<String, ColumnType> {
    let mut unnested = BTreeMap::new();
    for (_, table) in ast.elements_of_type::<TableReference>(root) {
        let TableReference::JsonTable { column, columns, .. } = table else {
            continue;
        };
        let element = ast
            .column_name(*column)
            .and_then(|name| lookup.column(name))
            .and_then(|c| c.column_type.non_list_type());
        for definition in columns {
            if let Some(element) = element {
                unnested.insert(definition.name.clone(), element);
            }
        }
    }
    unnested
}

/// Renames column references to their physical names.
///
/// Returns the names declared by common table expressions, which are not
/// real tables.
fn map_columns<L: SchemaLookup + ?Sized>(
    ast: &mut Ast,
    root: NodeId,
    lookup: &L,
    config: &TranslationConfig,
    unnested: &BTreeMap<String, ColumnType>,
) -> Result<BTreeSet<String>> {
    let mut reserved: BTreeSet<String> = unnested.keys().cloned().collect();
    reserved.insert(config.search_column.clone());
    reserved.insert(config.row_id_column.clone());
    reserved.insert(ROW_VERSION.to_string());

    let select_lists: Vec<NodeId> = ast.create_iterable::<SelectList>(root).collect();
    for select_list in select_lists {
        reserved.extend(ast.select_aliases(select_list));
    }
    let mut cte_names = BTreeSet::new();
    for (_, element) in ast.elements_of_type::<WithListElement>(root) {
        let identifier = |id: &NodeId| ast.get::<Identifier>(*id).map(|i| i.value().to_string());
        reserved.extend(element.columns.iter().filter_map(identifier));
        cte_names.extend(identifier(&element.name));
    }

    let columns: Vec<(NodeId, ColumnReference)> = ast
        .elements_of_type::<ColumnReference>(root)
        .map(|(id, column)| (id, *column))
        .collect();
    for (id, column) in columns {
        let Some(name) = ast.column_name(id).map(str::to_string) else {
            continue;
        };
        if reserved.contains(&name) {
            continue;
        }
        let translation = lookup
            .column(&name)
            .ok_or_else(|| TranslateError::UnknownColumn(name.clone()))?;
        let physical = ast.identifier(translation.physical_name);
        ast.replace_element(column.name, physical)?;

        if let Some(qualifier) = column.qualifier {
            let table = ast
                .get::<Identifier>(qualifier)
                .map(|i| i.value().to_string())
                .filter(|t| !cte_names.contains(t))
                .and_then(|t| lookup.table_name(&t));
            if let Some(table) = table {
                let physical = ast.identifier(table);
                ast.replace_element(qualifier, physical)?;
            }
        }
    }
    Ok(cte_names)
}

fn map_tables<L: SchemaLookup + ?Sized>(
    ast: &mut Ast,
    root: NodeId,
    lookup: &L,
    cte_names: &BTreeSet<String>,
) -> Result<()> {
    let names: Vec<NodeId> = ast
        .elements_of_type::<TableReference>(root)
        .filter_map(|(_, table)| match table {
            TableReference::Table { name, .. } => Some(*name),
            _ => None,
        })
        .collect();
    for name in names {
        let logical = ast.to_sql_without_quotes(name);
        if cte_names.contains(&logical) {
            continue;
        }
        let physical = lookup
            .table_name(&logical)
            .ok_or(TranslateError::UnknownTable(logical))?;
        let replacement = ast.identifier(physical);
        ast.replace_element(name, replacement)?;
    }
    Ok(())
}
