//! Named child positions.
//!
//! A parent with several replaceable children tells them apart by
//! [`ChildSlot`]: replacing a child swaps the id stored in that slot and
//! nothing else.

use crate::ast::{NodeId, NodeKind, Predicate, SelectList, TableReference};

/// A child position inside a parent node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChildSlot {
    Qualifier,
    Name,
    Alias,
    Value,
    Values,
    Left,
    Right,
    Low,
    High,
    Pattern,
    Escape,
    Operand,
    Argument,
    Column,
    Condition,
    Result,
    Otherwise,
    Query,
    Subquery,
    Table,
    Primary,
    Inner,
    From,
    Where,
    GroupBy,
    OrderBy,
    Pagination,
    Limit,
    Offset,
    SelectList,
    TableExpression,
    Body,
    Key,
    /// Position in a list of children.
    Item(usize),
}

/// Returns every child of `kind` with its slot, in syntactic order.
pub(crate) fn child_slots(kind: &NodeKind) -> Vec<(ChildSlot, NodeId)> {
    use ChildSlot as S;

    let mut slots = Vec::new();
    match kind {
        NodeKind::Identifier(_)
        | NodeKind::Literal(_)
        | NodeKind::EntityId(_)
        | NodeKind::TruthValue(_)
        | NodeKind::NullSpecification(_)
        | NodeKind::CurrentUserFunction(_)
        | NodeKind::SelectList(SelectList::Asterisk) => {}
        NodeKind::ColumnReference(c) => {
            if let Some(q) = c.qualifier {
                slots.push((S::Qualifier, q));
            }
            slots.push((S::Name, c.name));
        }
        NodeKind::RowValue(r) => items(&mut slots, &r.values),
        NodeKind::InValueList(l) => items(&mut slots, &l.values),
        NodeKind::Arithmetic(a) => {
            slots.push((S::Left, a.left));
            slots.push((S::Right, a.right));
        }
        NodeKind::SignedValue(s) => slots.push((S::Value, s.value)),
        NodeKind::Parenthesized(p) => slots.push((S::Inner, p.inner)),
        NodeKind::SetFunction(f) => {
            if let Some(argument) = f.argument {
                slots.push((S::Argument, argument));
            }
        }
        NodeKind::MySqlFunction(f) => items(&mut slots, &f.arguments),
        NodeKind::ArrayFunction(f) => slots.push((S::Column, f.column)),
        NodeKind::Case(c) => {
            if let Some(operand) = c.operand {
                slots.push((S::Operand, operand));
            }
            items(&mut slots, &c.whens);
            if let Some(otherwise) = c.otherwise {
                slots.push((S::Otherwise, otherwise));
            }
        }
        NodeKind::WhenClause(w) => {
            slots.push((S::Condition, w.condition));
            slots.push((S::Result, w.result));
        }
        NodeKind::Cast(c) => slots.push((S::Operand, c.operand)),
        NodeKind::Subquery(s) => slots.push((S::Query, s.query)),
        NodeKind::Predicate(p) => predicate_slots(p, &mut slots),
        NodeKind::SearchCondition(s) => items(&mut slots, &s.terms),
        NodeKind::BooleanTerm(t) => items(&mut slots, &t.factors),
        NodeKind::BooleanFactor(f) => slots.push((S::Primary, f.primary)),
        NodeKind::SelectList(SelectList::Columns(columns)) => items(&mut slots, columns),
        NodeKind::DerivedColumn(d) => {
            slots.push((S::Value, d.value));
            if let Some(alias) = d.alias {
                slots.push((S::Alias, alias));
            }
        }
        NodeKind::FromClause(f) => slots.push((S::Table, f.table)),
        NodeKind::TableReference(TableReference::Table { name, alias }) => {
            slots.push((S::Name, *name));
            if let Some(alias) = alias {
                slots.push((S::Alias, *alias));
            }
        }
        NodeKind::TableReference(TableReference::Join {
            left,
            right,
            condition,
            ..
        }) => {
            slots.push((S::Left, *left));
            slots.push((S::Right, *right));
            if let Some(condition) = condition {
                slots.push((S::Condition, *condition));
            }
        }
        NodeKind::TableReference(TableReference::JsonTable { column, alias, .. }) => {
            slots.push((S::Column, *column));
            if let Some(alias) = alias {
                slots.push((S::Alias, *alias));
            }
        }
        NodeKind::WhereClause(w) => slots.push((S::Condition, w.condition)),
        NodeKind::GroupByClause(g) => items(&mut slots, &g.columns),
        NodeKind::OrderByClause(o) => items(&mut slots, &o.specifications),
        NodeKind::SortSpecification(s) => slots.push((S::Key, s.key)),
        NodeKind::Pagination(p) => {
            slots.push((S::Limit, p.limit));
            if let Some(offset) = p.offset {
                slots.push((S::Offset, offset));
            }
        }
        NodeKind::TableExpression(t) => {
            slots.push((S::From, t.from));
            for (slot, id) in [
                (S::Where, t.where_clause),
                (S::GroupBy, t.group_by),
                (S::OrderBy, t.order_by),
                (S::Pagination, t.pagination),
            ] {
                if let Some(id) = id {
                    slots.push((slot, id));
                }
            }
        }
        NodeKind::QuerySpecification(q) => {
            slots.push((S::SelectList, q.select_list));
            slots.push((S::TableExpression, q.table_expression));
        }
        NodeKind::SetOperation(s) => {
            slots.push((S::Left, s.left));
            slots.push((S::Right, s.right));
        }
        NodeKind::WithListElement(w) => {
            slots.push((S::Name, w.name));
            items(&mut slots, &w.columns);
            slots.push((S::Query, w.query));
        }
        NodeKind::QueryExpression(q) => {
            items(&mut slots, &q.with_list);
            slots.push((S::Body, q.body));
        }
    }
    slots
}

fn items(slots: &mut Vec<(ChildSlot, NodeId)>, ids: &[NodeId]) {
    slots.extend(ids.iter().enumerate().map(|(i, id)| (ChildSlot::Item(i), *id)));
}

fn predicate_slots(predicate: &Predicate, slots: &mut Vec<(ChildSlot, NodeId)>) {
    use ChildSlot as S;

    match predicate {
        Predicate::Comparison(p) => slots.extend([(S::Left, p.left), (S::Right, p.right)]),
        Predicate::Between(p) => {
            slots.extend([(S::Left, p.left), (S::Low, p.low), (S::High, p.high)]);
        }
        Predicate::In(p) => slots.extend([(S::Left, p.left), (S::Values, p.values)]),
        Predicate::Like(p) => {
            slots.extend([(S::Left, p.left), (S::Pattern, p.pattern)]);
            slots.extend(p.escape.map(|e| (S::Escape, e)));
        }
        Predicate::Is(p) => slots.push((S::Left, p.left)),
        Predicate::ArrayHas(p) => {
            slots.extend([(S::Left, p.left), (S::Values, p.values)]);
            slots.extend(p.escape.map(|e| (S::Escape, e)));
        }
        Predicate::BooleanFunction(p) => slots.push((S::Column, p.column)),
        Predicate::TextMatches(p) => slots.push((S::Value, p.value)),
        Predicate::MatchAgainst(p) => slots.extend([(S::Column, p.column), (S::Value, p.value)]),
        Predicate::UnnestedHas(p) => slots.push((S::Subquery, p.subquery)),
    }
}

/// Returns the id stored in `slot`, mutably, or `None` when `kind` has no
/// such occupied slot.
pub(crate) fn child_mut(kind: &mut NodeKind, slot: ChildSlot) -> Option<&mut NodeId> {
    use ChildSlot as S;

    match (kind, slot) {
        (NodeKind::ColumnReference(c), S::Qualifier) => c.qualifier.as_mut(),
        (NodeKind::ColumnReference(c), S::Name) => Some(&mut c.name),
        (NodeKind::RowValue(r), S::Item(i)) => r.values.get_mut(i),
        (NodeKind::InValueList(l), S::Item(i)) => l.values.get_mut(i),
        (NodeKind::Arithmetic(a), S::Left) => Some(&mut a.left),
        (NodeKind::Arithmetic(a), S::Right) => Some(&mut a.right),
        (NodeKind::SignedValue(s), S::Value) => Some(&mut s.value),
        (NodeKind::Parenthesized(p), S::Inner) => Some(&mut p.inner),
        (NodeKind::SetFunction(f), S::Argument) => f.argument.as_mut(),
        (NodeKind::MySqlFunction(f), S::Item(i)) => f.arguments.get_mut(i),
        (NodeKind::ArrayFunction(f), S::Column) => Some(&mut f.column),
        (NodeKind::Case(c), S::Operand) => c.operand.as_mut(),
        (NodeKind::Case(c), S::Item(i)) => c.whens.get_mut(i),
        (NodeKind::Case(c), S::Otherwise) => c.otherwise.as_mut(),
        (NodeKind::WhenClause(w), S::Condition) => Some(&mut w.condition),
        (NodeKind::WhenClause(w), S::Result) => Some(&mut w.result),
        (NodeKind::Cast(c), S::Operand) => Some(&mut c.operand),
        (NodeKind::Subquery(s), S::Query) => Some(&mut s.query),
        (NodeKind::Predicate(p), slot) => predicate_child_mut(p, slot),
        (NodeKind::SearchCondition(s), S::Item(i)) => s.terms.get_mut(i),
        (NodeKind::BooleanTerm(t), S::Item(i)) => t.factors.get_mut(i),
        (NodeKind::BooleanFactor(f), S::Primary) => Some(&mut f.primary),
        (NodeKind::SelectList(SelectList::Columns(columns)), S::Item(i)) => columns.get_mut(i),
        (NodeKind::DerivedColumn(d), S::Value) => Some(&mut d.value),
        (NodeKind::DerivedColumn(d), S::Alias) => d.alias.as_mut(),
        (NodeKind::FromClause(f), S::Table) => Some(&mut f.table),
        (NodeKind::TableReference(TableReference::Table { name, .. }), S::Name) => Some(name),
        (
            NodeKind::TableReference(
                TableReference::Table { alias, .. } | TableReference::JsonTable { alias, .. },
            ),
            S::Alias,
        ) => alias.as_mut(),
        (NodeKind::TableReference(TableReference::Join { left, .. }), S::Left) => Some(left),
        (NodeKind::TableReference(TableReference::Join { right, .. }), S::Right) => Some(right),
        (NodeKind::TableReference(TableReference::Join { condition, .. }), S::Condition) => {
            condition.as_mut()
        }
        (NodeKind::TableReference(TableReference::JsonTable { column, .. }), S::Column) => {
            Some(column)
        }
        (NodeKind::WhereClause(w), S::Condition) => Some(&mut w.condition),
        (NodeKind::GroupByClause(g), S::Item(i)) => g.columns.get_mut(i),
        (NodeKind::OrderByClause(o), S::Item(i)) => o.specifications.get_mut(i),
        (NodeKind::SortSpecification(s), S::Key) => Some(&mut s.key),
        (NodeKind::Pagination(p), S::Limit) => Some(&mut p.limit),
        (NodeKind::Pagination(p), S::Offset) => p.offset.as_mut(),
        (NodeKind::TableExpression(t), S::From) => Some(&mut t.from),
        (NodeKind::TableExpression(t), S::Where) => t.where_clause.as_mut(),
        (NodeKind::TableExpression(t), S::GroupBy) => t.group_by.as_mut(),
        (NodeKind::TableExpression(t), S::OrderBy) => t.order_by.as_mut(),
        (NodeKind::TableExpression(t), S::Pagination) => t.pagination.as_mut(),
        (NodeKind::QuerySpecification(q), S::SelectList) => Some(&mut q.select_list),
        (NodeKind::QuerySpecification(q), S::TableExpression) => Some(&mut q.table_expression),
        (NodeKind::SetOperation(s), S::Left) => Some(&mut s.left),
        (NodeKind::SetOperation(s), S::Right) => Some(&mut s.right),
        (NodeKind::WithListElement(w), S::Name) => Some(&mut w.name),
        (NodeKind::WithListElement(w), S::Item(i)) => w.columns.get_mut(i),
        (NodeKind::WithListElement(w), S::Query) => Some(&mut w.query),
        (NodeKind::QueryExpression(q), S::Item(i)) => q.with_list.get_mut(i),
        (NodeKind::QueryExpression(q), S::Body) => Some(&mut q.body),
        _ => None,
    }
}

/// Returns the optional field behind `slot`, occupied or not.
pub(crate) fn optional_mut(kind: &mut NodeKind, slot: ChildSlot) -> Option<&mut Option<NodeId>> {
    use ChildSlot as S;

    match (kind, slot) {
        (NodeKind::ColumnReference(c), S::Qualifier) => Some(&mut c.qualifier),
        (NodeKind::SetFunction(f), S::Argument) => Some(&mut f.argument),
        (NodeKind::Case(c), S::Operand) => Some(&mut c.operand),
        (NodeKind::Case(c), S::Otherwise) => Some(&mut c.otherwise),
        (NodeKind::Predicate(Predicate::Like(p)), S::Escape) => Some(&mut p.escape),
        (NodeKind::Predicate(Predicate::ArrayHas(p)), S::Escape) => Some(&mut p.escape),
        (NodeKind::DerivedColumn(d), S::Alias) => Some(&mut d.alias),
        (
            NodeKind::TableReference(
                TableReference::Table { alias, .. } | TableReference::JsonTable { alias, .. },
            ),
            S::Alias,
        ) => Some(alias),
        (NodeKind::TableReference(TableReference::Join { condition, .. }), S::Condition) => {
            Some(condition)
        }
        (NodeKind::Pagination(p), S::Offset) => Some(&mut p.offset),
        (NodeKind::TableExpression(t), S::Where) => Some(&mut t.where_clause),
        (NodeKind::TableExpression(t), S::GroupBy) => Some(&mut t.group_by),
        (NodeKind::TableExpression(t), S::OrderBy) => Some(&mut t.order_by),
        (NodeKind::TableExpression(t), S::Pagination) => Some(&mut t.pagination),
        _ => None,
    }
}

fn predicate_child_mut(predicate: &mut Predicate, slot: ChildSlot) -> Option<&mut NodeId> {
    use ChildSlot as S;

    match (predicate, slot) {
        (Predicate::Comparison(p), S::Left) => Some(&mut p.left),
        (Predicate::Comparison(p), S::Right) => Some(&mut p.right),
        (Predicate::Between(p), S::Left) => Some(&mut p.left),
        (Predicate::Between(p), S::Low) => Some(&mut p.low),
        (Predicate::Between(p), S::High) => Some(&mut p.high),
        (Predicate::In(p), S::Left) => Some(&mut p.left),
        (Predicate::In(p), S::Values) => Some(&mut p.values),
        (Predicate::Like(p), S::Left) => Some(&mut p.left),
        (Predicate::Like(p), S::Pattern) => Some(&mut p.pattern),
        (Predicate::Like(p), S::Escape) => p.escape.as_mut(),
        (Predicate::Is(p), S::Left) => Some(&mut p.left),
        (Predicate::ArrayHas(p), S::Left) => Some(&mut p.left),
        (Predicate::ArrayHas(p), S::Values) => Some(&mut p.values),
        (Predicate::ArrayHas(p), S::Escape) => p.escape.as_mut(),
        (Predicate::BooleanFunction(p), S::Column) => Some(&mut p.column),
        (Predicate::TextMatches(p), S::Value) => Some(&mut p.value),
        (Predicate::MatchAgainst(p), S::Column) => Some(&mut p.column),
        (Predicate::MatchAgainst(p), S::Value) => Some(&mut p.value),
        (Predicate::UnnestedHas(p), S::Subquery) => Some(&mut p.subquery),
        _ => None,
    }
}
