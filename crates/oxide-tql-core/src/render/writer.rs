//! The render pass.
//!
//! A [`Renderer`] produces the quoted and the quote-stripped SQL of a
//! subtree in one walk. Commutative lists are sorted by the renderings of
//! their children, so every node is rendered exactly once.

use std::collections::HashMap;

use super::ToSqlParameters;
use crate::ast::{NodeId, NodeKind, Predicate, SelectList, TableReference};
use crate::tree::Ast;

/// The quoted and quote-stripped SQL of one subtree.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(super) struct Fragment {
    pub(super) quoted: String,
    pub(super) plain: String,
}

impl Fragment {
    fn push(&mut self, c: char) {
        self.quoted.push(c);
        self.plain.push(c);
    }

    fn push_str(&mut self, s: &str) {
        self.quoted.push_str(s);
        self.plain.push_str(s);
    }

    fn append(&mut self, other: &Self) {
        self.quoted.push_str(&other.quoted);
        self.plain.push_str(&other.plain);
    }

    /// Lets a leaf write itself once per quoting mode.
    fn leaf(&mut self, write: impl Fn(&mut String, &ToSqlParameters)) {
        write(&mut self.quoted, &ToSqlParameters::WITH_QUOTES);
        write(&mut self.plain, &ToSqlParameters::WITHOUT_QUOTES);
    }

    /// Canonical sort key: quote-stripped text first, quoted text second.
    pub(super) fn key(&self) -> (&str, &str) {
        (&self.plain, &self.quoted)
    }

    pub(super) fn into_sql(self, parameters: &ToSqlParameters) -> String {
        if parameters.include_quotes {
            self.quoted
        } else {
            self.plain
        }
    }
}

#[derive(Debug)]
pub(super) struct Renderer<'a> {
    ast: &'a Ast,
    /// Canonical child order of every list rendered so far, when recording.
    orders: Option<HashMap<NodeId, Vec<NodeId>>>,
}

impl<'a> Renderer<'a> {
    pub(super) const fn new(ast: &'a Ast) -> Self {
        Self { ast, orders: None }
    }

    pub(super) fn recording(ast: &'a Ast) -> Self {
        Self {
            ast,
            orders: Some(HashMap::new()),
        }
    }

    pub(super) fn render(&mut self, id: NodeId) -> Fragment {
        let mut out = Fragment::default();
        self.write(id, &mut out);
        out
    }

    pub(super) fn into_orders(self) -> HashMap<NodeId, Vec<NodeId>> {
        self.orders.unwrap_or_default()
    }

    /// Appends both renderings of the subtree at `id` to `out`.
    ///
    /// Ids foreign to the arena render as nothing.
    #[allow(clippy::too_many_lines)]
    pub(super) fn write(&mut self, id: NodeId, out: &mut Fragment) {
        let ast = self.ast;
        let Some(kind) = ast.node(id) else {
            return;
        };

        match kind {
            NodeKind::Identifier(identifier) => out.leaf(|s, p| identifier.write_sql(s, p)),
            NodeKind::Literal(literal) => out.leaf(|s, p| literal.write_sql(s, p)),
            NodeKind::EntityId(entity) => out.push_str(&entity.to_string()),
            NodeKind::TruthValue(truth) => out.push_str(truth.as_str()),
            NodeKind::NullSpecification(_) => out.push_str("NULL"),
            NodeKind::ColumnReference(c) => {
                if let Some(qualifier) = c.qualifier {
                    self.write(qualifier, out);
                    out.push('.');
                }
                self.write(c.name, out);
            }
            NodeKind::RowValue(r) => {
                if let [single] = r.values.as_slice() {
                    self.write(*single, out);
                } else {
                    out.push('(');
                    self.write_list(&r.values, ", ", out);
                    out.push(')');
                }
            }
            NodeKind::InValueList(_)
            | NodeKind::SearchCondition(_)
            | NodeKind::BooleanTerm(_) => {
                let separator = match kind {
                    NodeKind::SearchCondition(_) => " OR ",
                    NodeKind::BooleanTerm(_) => " AND ",
                    _ => ", ",
                };
                self.write_canonical(id, separator, out);
            }
            NodeKind::Arithmetic(a) => {
                self.write(a.left, out);
                out.push(' ');
                out.push_str(a.operator.as_str());
                out.push(' ');
                self.write(a.right, out);
            }
            NodeKind::SignedValue(s) => {
                out.push_str(s.sign.as_str());
                let value = self.render(s.value);
                // `--` would start a comment.
                if value.plain.starts_with(['-', '+']) {
                    out.push(' ');
                }
                out.append(&value);
            }
            NodeKind::Parenthesized(p) => {
                out.push('(');
                self.write(p.inner, out);
                out.push(')');
            }
            NodeKind::SetFunction(f) => {
                out.push_str(f.function.as_str());
                out.push('(');
                if f.distinct {
                    out.push_str("DISTINCT ");
                }
                match f.argument.map(|argument| (argument, ast.node(argument))) {
                    // COUNT(DISTINCT a, b) takes its row without parentheses.
                    Some((_, Some(NodeKind::RowValue(row)))) => {
                        self.write_list(&row.values, ", ", out);
                    }
                    Some((argument, _)) => self.write(argument, out),
                    None => out.push('*'),
                }
                out.push(')');
            }
            NodeKind::MySqlFunction(f) => {
                out.push_str(f.name.as_str());
                out.push('(');
                self.write_list(&f.arguments, ", ", out);
                out.push(')');
            }
            NodeKind::ArrayFunction(f) => {
                out.push_str(f.function.as_str());
                out.push('(');
                self.write(f.column, out);
                out.push(')');
            }
            NodeKind::CurrentUserFunction(f) => {
                out.push_str(f.name.as_str());
                out.push_str("()");
            }
            NodeKind::Case(c) => {
                out.push_str("CASE ");
                if let Some(operand) = c.operand {
                    self.write(operand, out);
                    out.push(' ');
                }
                for when in &c.whens {
                    self.write(*when, out);
                    out.push(' ');
                }
                if let Some(otherwise) = c.otherwise {
                    out.push_str("ELSE ");
                    self.write(otherwise, out);
                    out.push(' ');
                }
                out.push_str("END");
            }
            NodeKind::WhenClause(when) => {
                out.push_str("WHEN ");
                self.write(when.condition, out);
                out.push_str(" THEN ");
                self.write(when.result, out);
            }
            NodeKind::Cast(c) => {
                out.push_str("CAST(");
                self.write(c.operand, out);
                out.push_str(" AS ");
                out.push_str(c.target.as_str());
                out.push(')');
            }
            NodeKind::Subquery(s) => {
                out.push('(');
                self.write(s.query, out);
                out.push(')');
            }
            NodeKind::Predicate(predicate) => self.write_predicate(predicate, out),
            NodeKind::BooleanFactor(f) => {
                if f.not {
                    out.push_str("NOT ");
                }
                self.write(f.primary, out);
            }
            NodeKind::SelectList(SelectList::Asterisk) => out.push('*'),
            NodeKind::SelectList(SelectList::Columns(columns)) => {
                self.write_list(columns, ", ", out);
            }
            NodeKind::DerivedColumn(d) => {
                self.write(d.value, out);
                if let Some(alias) = d.alias {
                    out.push_str(" AS ");
                    self.write(alias, out);
                }
            }
            NodeKind::FromClause(f) => {
                out.push_str("FROM ");
                self.write(f.table, out);
            }
            NodeKind::TableReference(TableReference::Table { name, alias }) => {
                self.write(*name, out);
                if let Some(alias) = alias {
                    out.push_str(" AS ");
                    self.write(*alias, out);
                }
            }
            NodeKind::TableReference(TableReference::Join {
                left,
                join_type,
                right,
                condition,
            }) => {
                self.write(*left, out);
                out.push(' ');
                out.push_str(join_type.as_str());
                out.push(' ');
                self.write(*right, out);
                if let Some(condition) = condition {
                    out.push_str(" ON ");
                    self.write(*condition, out);
                }
            }
            NodeKind::TableReference(TableReference::JsonTable {
                column,
                columns,
                alias,
            }) => {
                out.push_str("JSON_TABLE(");
                self.write(*column, out);
                out.push_str(", '$[*]' COLUMNS(");
                for (i, definition) in columns.iter().enumerate() {
                    if i > 0 {
                        out.push_str(", ");
                    }
                    out.push_str(&definition.name);
                    out.push(' ');
                    out.push_str(&definition.data_type.to_sql());
                    out.push_str(" PATH '$' ERROR ON ERROR");
                }
                out.push_str("))");
                if let Some(alias) = alias {
                    out.push_str(" AS ");
                    self.write(*alias, out);
                }
            }
            NodeKind::WhereClause(c) => {
                out.push_str("WHERE ");
                self.write(c.condition, out);
            }
            NodeKind::GroupByClause(g) => {
                out.push_str("GROUP BY ");
                self.write_list(&g.columns, ", ", out);
            }
            NodeKind::OrderByClause(o) => {
                out.push_str("ORDER BY ");
                self.write_list(&o.specifications, ", ", out);
            }
            NodeKind::SortSpecification(s) => {
                self.write(s.key, out);
                if let Some(ordering) = s.ordering {
                    out.push(' ');
                    out.push_str(ordering.as_str());
                }
            }
            NodeKind::Pagination(p) => {
                out.push_str("LIMIT ");
                self.write(p.limit, out);
                if let Some(offset) = p.offset {
                    out.push_str(" OFFSET ");
                    self.write(offset, out);
                }
            }
            NodeKind::TableExpression(t) => {
                self.write(t.from, out);
                for clause in [t.where_clause, t.group_by, t.order_by, t.pagination]
                    .into_iter()
                    .flatten()
                {
                    out.push(' ');
                    self.write(clause, out);
                }
            }
            NodeKind::QuerySpecification(q) => {
                out.push_str("SELECT ");
                if let Some(quantifier) = q.quantifier {
                    out.push_str(quantifier.as_str());
                    out.push(' ');
                }
                self.write(q.select_list, out);
                out.push(' ');
                self.write(q.table_expression, out);
            }
            NodeKind::SetOperation(s) => {
                self.write(s.left, out);
                out.push(' ');
                out.push_str(s.operator.as_str());
                out.push(' ');
                self.write(s.right, out);
            }
            NodeKind::WithListElement(e) => {
                self.write(e.name, out);
                if !e.columns.is_empty() {
                    out.push_str(" (");
                    self.write_list(&e.columns, ", ", out);
                    out.push(')');
                }
                out.push_str(" AS (");
                self.write(e.query, out);
                out.push(')');
            }
            NodeKind::QueryExpression(q) => {
                if !q.with_list.is_empty() {
                    out.push_str("WITH ");
                    self.write_list(&q.with_list, ", ", out);
                    out.push(' ');
                }
                self.write(q.body, out);
            }
        }
    }

    fn write_predicate(&mut self, predicate: &Predicate, out: &mut Fragment) {
        let not = |out: &mut Fragment, negated: bool| {
            if negated {
                out.push_str("NOT ");
            }
        };

        match predicate {
            Predicate::Comparison(p) => {
                self.write(p.left, out);
                out.push(' ');
                out.push_str(p.operator.as_str());
                out.push(' ');
                self.write(p.right, out);
            }
            Predicate::Between(p) => {
                self.write(p.left, out);
                out.push(' ');
                not(out, p.not);
                out.push_str("BETWEEN ");
                self.write(p.low, out);
                out.push_str(" AND ");
                self.write(p.high, out);
            }
            Predicate::In(p) => {
                self.write(p.left, out);
                out.push(' ');
                not(out, p.not);
                out.push_str("IN ");
                self.write_value_list(p.values, out);
            }
            Predicate::Like(p) => {
                self.write(p.left, out);
                out.push(' ');
                not(out, p.not);
                out.push_str("LIKE ");
                self.write(p.pattern, out);
                if let Some(escape) = p.escape {
                    out.push_str(" ESCAPE ");
                    self.write(escape, out);
                }
            }
            Predicate::Is(p) => {
                self.write(p.left, out);
                out.push_str(" IS ");
                not(out, p.not);
                out.push_str(p.compare.as_str());
            }
            Predicate::ArrayHas(p) => {
                self.write(p.left, out);
                out.push(' ');
                not(out, p.not);
                out.push_str(p.kind.as_str());
                out.push(' ');
                self.write_value_list(p.values, out);
                if let Some(escape) = p.escape {
                    out.push_str(" ESCAPE ");
                    self.write(escape, out);
                }
            }
            Predicate::BooleanFunction(p) => {
                out.push_str(p.function.as_str());
                out.push('(');
                self.write(p.column, out);
                out.push(')');
            }
            Predicate::TextMatches(p) => {
                out.push_str("TEXT_MATCHES(");
                self.write(p.value, out);
                out.push(')');
            }
            Predicate::MatchAgainst(p) => {
                out.push_str("MATCH(");
                self.write(p.column, out);
                out.push_str(") AGAINST(");
                self.write(p.value, out);
                out.push(')');
            }
            Predicate::UnnestedHas(p) => {
                not(out, p.not);
                out.push_str("EXISTS (");
                self.write(p.subquery, out);
                out.push(')');
            }
        }
    }

    /// Writes `(a, b)` for a value list; a subquery brings its own
    /// parentheses.
    fn write_value_list(&mut self, values: NodeId, out: &mut Fragment) {
        if matches!(self.ast.node(values), Some(NodeKind::InValueList(_))) {
            out.push('(');
            self.write(values, out);
            out.push(')');
        } else {
            self.write(values, out);
        }
    }

    fn write_list(&mut self, ids: &[NodeId], separator: &str, out: &mut Fragment) {
        for (i, id) in ids.iter().enumerate() {
            if i > 0 {
                out.push_str(separator);
            }
            self.write(*id, out);
        }
    }

    /// Writes the children of a commutative list sorted by their own
    /// renderings, each child rendered once.
    fn write_canonical(&mut self, id: NodeId, separator: &str, out: &mut Fragment) {
        let mut parts = Vec::new();
        for (_, child) in self.ast.slots(id) {
            let mut part = Fragment::default();
            self.write(child, &mut part);
            parts.push((part, child));
        }
        parts.sort_by(|a, b| a.0.key().cmp(&b.0.key()));
        if let Some(orders) = &mut self.orders {
            orders.insert(id, parts.iter().map(|(_, child)| *child).collect());
        }
        for (i, (part, _)) in parts.iter().enumerate() {
            if i > 0 {
                out.push_str(separator);
            }
            out.append(part);
        }
    }
}
