//! Read-only questions about a tree.
//!
//! Nothing here mutates the arena. Every answer that can legitimately be
//! absent is an `Option`.

use crate::ast::{
    ColumnReference, DerivedColumn, Identifier, Literal, MatchAgainstPredicate, NodeId, NodeKind,
    Predicate, SelectList, TableReference, TextMatchesPredicate, TruthValue,
};
use crate::tree::Ast;
use crate::types::ColumnType;

impl Ast {
    /// Returns the column a predicate is anchored on.
    ///
    /// A translated `HAS` reports the column its `JSON_TABLE` unnests, so the
    /// answer survives translation. `TEXT_MATCHES` has no left-hand side.
    #[must_use]
    pub fn left_hand_side(&self, predicate: NodeId) -> Option<NodeId> {
        match self.get::<Predicate>(predicate)? {
            Predicate::UnnestedHas(p) => self
                .elements_of_type::<TableReference>(p.subquery)
                .find_map(|(_, table)| match table {
                    TableReference::JsonTable { column, .. } => Some(*column),
                    _ => None,
                }),
            p => p.left(),
        }
    }

    /// Returns the literal values a predicate compares against, escape
    /// characters included.
    ///
    /// Bind variables and literals inside subqueries are skipped. For a
    /// translated `HAS` the values come from the subquery's WHERE clause.
    #[must_use]
    pub fn right_hand_side_values(&self, predicate: NodeId) -> Vec<NodeId> {
        let Some(p) = self.get::<Predicate>(predicate) else {
            return vec![];
        };
        let roots = match p {
            Predicate::UnnestedHas(p) => self
                .elements_of_type::<crate::ast::TableExpression>(p.subquery)
                .next()
                .and_then(|(_, t)| t.where_clause)
                .into_iter()
                .collect(),
            p => p.right(),
        };
        let mut values = Vec::new();
        for root in roots {
            self.collect_literals(root, &mut values);
        }
        values
    }

    fn collect_literals(&self, root: NodeId, out: &mut Vec<NodeId>) {
        match self.node(root) {
            Some(NodeKind::Subquery(_)) | None => {}
            Some(NodeKind::Literal(Literal::Bind(_))) => {}
            Some(NodeKind::Literal(_)) => out.push(root),
            Some(_) => {
                for child in self.children(root) {
                    self.collect_literals(child, out);
                }
            }
        }
    }

    /// Returns true if any node under `root` is aggregate by itself.
    #[must_use]
    pub fn has_any_aggregate_elements(&self, root: NodeId) -> bool {
        self.descendants(root).any(|id| self.kind(id).is_aggregate())
    }

    /// Returns true when the query returns aggregated rows.
    #[must_use]
    pub fn is_aggregate_query(&self, root: NodeId) -> bool {
        self.has_any_aggregate_elements(root)
    }

    /// Returns true if the tree contains a full-text search predicate.
    #[must_use]
    pub fn has_text_search(&self, root: NodeId) -> bool {
        self.first_element_of_type::<TextMatchesPredicate>(root)
            .or_else(|| self.first_element_of_type::<MatchAgainstPredicate>(root))
            .is_some()
    }

    /// Returns every column reference under `root`, in document order.
    #[must_use]
    pub fn referenced_columns(&self, root: NodeId) -> Vec<NodeId> {
        self.create_iterable::<ColumnReference>(root).collect()
    }

    /// Returns the unquoted column name of a column reference.
    #[must_use]
    pub fn column_name(&self, column: NodeId) -> Option<&str> {
        let column = self.get::<ColumnReference>(column)?;
        self.get::<Identifier>(column.name).map(Identifier::value)
    }

    /// Returns the name a derived column is known by: its alias, or its
    /// unquoted SQL.
    #[must_use]
    pub fn derived_column_name(&self, derived: NodeId) -> Option<String> {
        let derived = self.get::<DerivedColumn>(derived)?;
        match derived.alias.and_then(|alias| self.get::<Identifier>(alias)) {
            Some(alias) => Some(alias.value().to_string()),
            None => Some(self.to_sql_without_quotes(derived.value)),
        }
    }

    /// Returns the aliases declared in a select list.
    #[must_use]
    pub fn select_aliases(&self, select_list: NodeId) -> Vec<String> {
        let Some(SelectList::Columns(columns)) = self.get::<SelectList>(select_list) else {
            return vec![];
        };
        columns
            .iter()
            .filter_map(|id| self.get::<DerivedColumn>(*id)?.alias)
            .filter_map(|alias| self.get::<Identifier>(alias))
            .map(|alias| alias.value().to_string())
            .collect()
    }

    /// Infers the type of a value expression.
    ///
    /// `lookup` resolves column names. Functions resolve through their
    /// [`FunctionReturnType`](crate::types::FunctionReturnType) using the
    /// type of their first argument.
    #[must_use]
    pub fn infer_type<F>(&self, id: NodeId, lookup: &F) -> Option<ColumnType>
    where
        F: Fn(&str) -> Option<ColumnType>,
    {
        match self.node(id)? {
            NodeKind::ColumnReference(_) => lookup(self.column_name(id)?),
            NodeKind::Literal(Literal::Integer(_)) => Some(ColumnType::Integer),
            NodeKind::Literal(Literal::Decimal(_)) => Some(ColumnType::Double),
            NodeKind::Literal(Literal::String(_)) => Some(ColumnType::String),
            NodeKind::TruthValue(TruthValue::True | TruthValue::False) => {
                Some(ColumnType::Boolean)
            }
            NodeKind::RowValue(row) => match row.values.as_slice() {
                [single] => self.infer_type(*single, lookup),
                _ => None,
            },
            NodeKind::SetFunction(f) => {
                let parameter = f.argument.and_then(|a| self.infer_type(a, lookup));
                f.function.function_return_type().column_type(parameter)
            }
            NodeKind::MySqlFunction(f) => {
                let parameter = f.arguments.first().and_then(|a| self.infer_type(*a, lookup));
                f.name.function_return_type().column_type(parameter)
            }
            NodeKind::ArrayFunction(f) => {
                let parameter = self.infer_type(f.column, lookup);
                f.function.function_return_type().column_type(parameter)
            }
            NodeKind::CurrentUserFunction(f) => f.name.function_return_type().column_type(None),
            NodeKind::Arithmetic(a) => {
                let left = self.infer_type(a.left, lookup)?;
                let right = self.infer_type(a.right, lookup)?;
                if left == ColumnType::Double || right == ColumnType::Double {
                    Some(ColumnType::Double)
                } else {
                    Some(ColumnType::Integer)
                }
            }
            NodeKind::SignedValue(s) => self.infer_type(s.value, lookup),
            NodeKind::Parenthesized(p) => self.infer_type(p.inner, lookup),
            NodeKind::Cast(c) => Some(c.target),
            NodeKind::Case(c) => {
                let when = c.whens.first()?;
                match self.node(*when)? {
                    NodeKind::WhenClause(w) => self.infer_type(w.result, lookup),
                    _ => None,
                }
            }
            NodeKind::DerivedColumn(d) => self.infer_type(d.value, lookup),
            _ => None,
        }
    }

    /// Returns the one table a query reads from.
    ///
    /// The answer is an `EntityId` or identifier node. Joins and unions
    /// yield a table only when every side names the same table.
    #[must_use]
    pub fn single_table_name(&self, root: NodeId) -> Option<NodeId> {
        match self.node(root)? {
            NodeKind::QueryExpression(q) => self.single_table_name(q.body),
            NodeKind::QuerySpecification(q) => self.single_table_name(q.table_expression),
            NodeKind::TableExpression(t) => self.single_table_name(t.from),
            NodeKind::FromClause(f) => self.single_table_name(f.table),
            NodeKind::TableReference(TableReference::Table { name, .. }) => Some(*name),
            NodeKind::TableReference(TableReference::JsonTable { .. }) => None,
            NodeKind::SetOperation(s) => self.same_table(s.left, s.right),
            NodeKind::TableReference(TableReference::Join { left, right, .. }) => {
                self.same_table(*left, *right)
            }
            _ => None,
        }
    }

    fn same_table(&self, left: NodeId, right: NodeId) -> Option<NodeId> {
        let left = self.single_table_name(left)?;
        let right = self.single_table_name(right)?;
        self.equivalent(left, right).then_some(left)
    }
}
