//! Moving literals out of the SQL text into named parameters.

use std::collections::BTreeMap;

use chrono::{NaiveDate, NaiveDateTime};
use oxide_tql_core::ast::{EntityId, Literal, NodeId, Pagination, Predicate};
use oxide_tql_core::types::ColumnType;
use oxide_tql_core::{Ast, SqlValue};
use tracing::trace;

use crate::error::Result;

const DATE_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.f";
const DATE_FORMAT: &str = "%Y-%m-%d";

/// Parses `text` as a value of a column of type `column_type`.
///
/// Text that does not parse as the column type is kept as text, so the
/// database reports the mismatch.
///
/// ```rust
/// use oxide_tql_core::SqlValue;
/// use oxide_tql_core::types::ColumnType;
/// use oxide_tql_mysql::parse_value;
///
/// assert_eq!(parse_value("syn123.4", ColumnType::EntityId), SqlValue::Int(123));
/// assert_eq!(parse_value("1970-01-02", ColumnType::Date), SqlValue::Int(86_400_000));
/// assert_eq!(parse_value("abc", ColumnType::Integer), SqlValue::Text("abc".into()));
/// ```
#[must_use]
pub fn parse_value(text: &str, column_type: ColumnType) -> SqlValue {
    let column_type = column_type.non_list_type().unwrap_or(column_type);
    let parsed = match column_type {
        ColumnType::Integer
        | ColumnType::FileHandleId
        | ColumnType::UserId
        | ColumnType::SubmissionId
        | ColumnType::EvaluationId => text.trim().parse().ok().map(SqlValue::Int),
        ColumnType::EntityId => parse_entity_id(text.trim()).map(SqlValue::Int),
        ColumnType::Date => parse_date(text.trim()).map(SqlValue::Int),
        ColumnType::Double => parse_double(text.trim()).map(SqlValue::Float),
        ColumnType::Boolean => parse_boolean(text.trim()).map(SqlValue::Bool),
        _ => None,
    };
    parsed.unwrap_or_else(|| SqlValue::Text(text.to_string()))
}

fn parse_entity_id(text: &str) -> Option<i64> {
    match EntityId::parse(text) {
        Some(entity) => i64::try_from(entity.id).ok(),
        None => text.parse().ok(),
    }
}

/// Epoch milliseconds, or a UTC date with an optional time of day.
fn parse_date(text: &str) -> Option<i64> {
    if let Ok(millis) = text.parse() {
        return Some(millis);
    }
    if let Ok(date_time) = NaiveDateTime::parse_from_str(text, DATE_TIME_FORMAT) {
        return Some(date_time.and_utc().timestamp_millis());
    }
    let date = NaiveDate::parse_from_str(text, DATE_FORMAT).ok()?;
    Some(date.and_hms_opt(0, 0, 0)?.and_utc().timestamp_millis())
}

fn parse_double(text: &str) -> Option<f64> {
    match text {
        "NaN" => Some(f64::NAN),
        "Infinity" | "+Infinity" => Some(f64::INFINITY),
        "-Infinity" => Some(f64::NEG_INFINITY),
        _ => text.parse().ok().filter(|f: &f64| f.is_finite()),
    }
}

fn parse_boolean(text: &str) -> Option<bool> {
    if text.eq_ignore_ascii_case("true") {
        Some(true)
    } else if text.eq_ignore_ascii_case("false") {
        Some(false)
    } else {
        None
    }
}

/// Converts a literal without a known column type.
fn untyped_value(literal: &Literal) -> SqlValue {
    match literal {
        Literal::String(s) => SqlValue::Text(s.value().to_string()),
        Literal::Integer(n) => SqlValue::Int(*n),
        Literal::Decimal(f) => SqlValue::Float(*f),
        Literal::Bind(name) => SqlValue::Text(format!(":{name}")),
    }
}

/// Collects bound values under generated names.
#[derive(Debug)]
pub(crate) struct Binder {
    prefix: String,
    parameters: BTreeMap<String, SqlValue>,
}

impl Binder {
    pub(crate) fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            parameters: BTreeMap::new(),
        }
    }

    pub(crate) fn into_parameters(self) -> BTreeMap<String, SqlValue> {
        self.parameters
    }

    /// Replaces `literal` with a fresh placeholder bound to `value`.
    fn bind(&mut self, ast: &mut Ast, literal: NodeId, value: SqlValue) -> Result<()> {
        let key = format!("{}{}", self.prefix, self.parameters.len());
        let placeholder = ast.add(Literal::Bind(key.clone()));
        ast.replace_element(literal, placeholder)?;
        trace!(%key, %value, "bound literal");
        self.parameters.insert(key, value);
        Ok(())
    }

    /// Binds the right-hand values of every predicate under `root`.
    ///
    /// `value_type` names the type of values compared against a left-hand
    /// side; `None` binds the literal as written.
    pub(crate) fn bind_predicates<F>(&mut self, ast: &mut Ast, root: NodeId, value_type: F) -> Result<()>
    where
        F: Fn(&Ast, NodeId) -> Option<ColumnType>,
    {
        let predicates: Vec<NodeId> = ast.create_iterable::<Predicate>(root).collect();
        for predicate in predicates {
            let column_type = ast
                .left_hand_side(predicate)
                .and_then(|left| value_type(&*ast, left));
            // Read lazily: an outer predicate may already have bound the
            // values of an inner one.
            for literal in ast.right_hand_side_values(predicate) {
                let Some(value) = ast.get::<Literal>(literal) else {
                    continue;
                };
                let value = match (column_type, value) {
                    (_, Literal::Bind(_)) => continue,
                    (Some(column_type), value) => parse_value(&value.unquoted(), column_type),
                    (None, value) => untyped_value(value),
                };
                self.bind(ast, literal, value)?;
            }
        }
        Ok(())
    }

    /// Binds the `LIMIT` and `OFFSET` literals under `root`.
    pub(crate) fn bind_pagination(&mut self, ast: &mut Ast, root: NodeId) -> Result<()> {
        let paginations: Vec<Pagination> = ast
            .elements_of_type::<Pagination>(root)
            .map(|(_, pagination)| *pagination)
            .collect();
        for pagination in paginations {
            for literal in std::iter::once(pagination.limit).chain(pagination.offset) {
                if let Some(Literal::Integer(n)) = ast.get::<Literal>(literal) {
                    let value = SqlValue::Int(*n);
                    self.bind(ast, literal, value)?;
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use oxide_tql_core::parse_query;

    #[test]
    fn test_parse_integers() {
        assert_eq!(parse_value("42", ColumnType::Integer), SqlValue::Int(42));
        assert_eq!(parse_value("-7", ColumnType::IntegerList), SqlValue::Int(-7));
        assert_eq!(parse_value("3", ColumnType::UserId), SqlValue::Int(3));
        assert_eq!(parse_value("123", ColumnType::EntityId), SqlValue::Int(123));
        assert_eq!(parse_value("SYN9", ColumnType::EntityIdList), SqlValue::Int(9));
        assert_eq!(
            parse_value("4.5", ColumnType::Integer),
            SqlValue::Text("4.5".into())
        );
    }

    #[test]
    fn test_parse_dates() {
        assert_eq!(parse_value("1000", ColumnType::Date), SqlValue::Int(1000));
        assert_eq!(
            parse_value("2021-03-04 05:06:07.089", ColumnType::Date),
            SqlValue::Int(1_614_834_367_089)
        );
        assert_eq!(
            parse_value("2021-03-04 05:06:07", ColumnType::DateList),
            SqlValue::Int(1_614_834_367_000)
        );
        assert_eq!(
            parse_value("2021-03-04", ColumnType::Date),
            SqlValue::Int(1_614_816_000_000)
        );
        assert_eq!(
            parse_value("yesterday", ColumnType::Date),
            SqlValue::Text("yesterday".into())
        );
    }

    #[test]
    fn test_parse_doubles() {
        assert_eq!(parse_value("1.5", ColumnType::Double), SqlValue::Float(1.5));
        assert_eq!(
            parse_value("-Infinity", ColumnType::Double),
            SqlValue::Float(f64::NEG_INFINITY)
        );
        assert!(matches!(
            parse_value("NaN", ColumnType::Double),
            SqlValue::Float(f) if f.is_nan()
        ));
        assert_eq!(
            parse_value("inf", ColumnType::Double),
            SqlValue::Text("inf".into())
        );
    }

    #[test]
    fn test_parse_booleans_and_text() {
        assert_eq!(parse_value("TRUE", ColumnType::Boolean), SqlValue::Bool(true));
        assert_eq!(parse_value("false", ColumnType::BooleanList), SqlValue::Bool(false));
        assert_eq!(parse_value("yes", ColumnType::Boolean), SqlValue::Text("yes".into()));
        assert_eq!(parse_value("12", ColumnType::String), SqlValue::Text("12".into()));
        assert_eq!(parse_value(" a ", ColumnType::Link), SqlValue::Text(" a ".into()));
    }

    #[test]
    fn test_bind_predicates_by_column_type() {
        let mut ast =
            parse_query("select * from T where a = '5' and b between 1 and 2 and c like 'x%'")
                .unwrap();
        let root = ast.root().unwrap();
        let mut binder = Binder::new("b");
        binder
            .bind_predicates(&mut ast, root, |ast, left| match ast.column_name(left)? {
                "a" => Some(ColumnType::Integer),
                "b" => Some(ColumnType::Double),
                _ => None,
            })
            .unwrap();
        assert_eq!(
            ast.to_sql(root),
            "SELECT * FROM T WHERE a = :b0 AND b BETWEEN :b1 AND :b2 AND c LIKE :b3"
        );
        let parameters = binder.into_parameters();
        assert_eq!(parameters["b0"], SqlValue::Int(5));
        assert_eq!(parameters["b1"], SqlValue::Float(1.0));
        assert_eq!(parameters["b2"], SqlValue::Float(2.0));
        assert_eq!(parameters["b3"], SqlValue::Text("x%".into()));
    }

    #[test]
    fn test_bind_skips_existing_placeholders() {
        let mut ast = parse_query("select * from T where a = :given and b = 1").unwrap();
        let root = ast.root().unwrap();
        let mut binder = Binder::new("p");
        binder.bind_predicates(&mut ast, root, |_, _| None).unwrap();
        assert_eq!(ast.to_sql(root), "SELECT * FROM T WHERE a = :given AND b = :p0");
        assert_eq!(binder.into_parameters().len(), 1);
    }

    #[test]
    fn test_bind_pagination() {
        let mut ast = parse_query("select * from T limit 10 offset 20").unwrap();
        let root = ast.root().unwrap();
        let mut binder = Binder::new("b");
        binder.bind_pagination(&mut ast, root).unwrap();
        assert_eq!(ast.to_sql(root), "SELECT * FROM T LIMIT :b0 OFFSET :b1");
        let parameters = binder.into_parameters();
        assert_eq!(parameters["b0"], SqlValue::Int(10));
        assert_eq!(parameters["b1"], SqlValue::Int(20));
    }
}
