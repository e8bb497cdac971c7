//! Function names and their return-type strategies.

use super::ColumnType;

/// The declared return type of a function.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FunctionReturnType {
    /// Always a string.
    String,
    /// Always an integer.
    Long,
    /// Always a double.
    Double,
    /// Always a user id.
    UserId,
    /// Same type as the function's argument.
    MatchesParameter,
    /// Element type of the function's list-typed argument.
    UnnestParameter,
}

/// How a [`FunctionReturnType`] turns an argument type into a result type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReturnTypeStrategy {
    /// The argument is ignored.
    Constant(ColumnType),
    /// The argument type is echoed back.
    MatchesParameter,
    /// The scalar counterpart of a list-typed argument.
    UnnestParameter,
}

impl ReturnTypeStrategy {
    /// Resolves the result type for the given argument type.
    ///
    /// Returns `None` when the combination cannot be resolved, for example
    /// an unnest strategy over a scalar argument.
    #[must_use]
    pub const fn resolve(&self, parameter: Option<ColumnType>) -> Option<ColumnType> {
        match self {
            Self::Constant(column_type) => Some(*column_type),
            Self::MatchesParameter => parameter,
            Self::UnnestParameter => match parameter {
                Some(list) => list.non_list_type(),
                None => None,
            },
        }
    }
}

impl FunctionReturnType {
    /// Returns the resolution strategy of this return type.
    #[must_use]
    pub const fn strategy(&self) -> ReturnTypeStrategy {
        match self {
            Self::String => ReturnTypeStrategy::Constant(ColumnType::String),
            Self::Long => ReturnTypeStrategy::Constant(ColumnType::Integer),
            Self::Double => ReturnTypeStrategy::Constant(ColumnType::Double),
            Self::UserId => ReturnTypeStrategy::Constant(ColumnType::UserId),
            Self::MatchesParameter => ReturnTypeStrategy::MatchesParameter,
            Self::UnnestParameter => ReturnTypeStrategy::UnnestParameter,
        }
    }

    /// Resolves the type produced by a call whose argument has `parameter`
    /// type.
    #[must_use]
    pub const fn column_type(&self, parameter: Option<ColumnType>) -> Option<ColumnType> {
        self.strategy().resolve(parameter)
    }
}

/// Aggregate (set) functions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SetFunctionType {
    Count,
    Avg,
    Max,
    Min,
    Sum,
    GroupConcat,
}

impl SetFunctionType {
    pub const ALL: [Self; 6] = [
        Self::Count,
        Self::Avg,
        Self::Max,
        Self::Min,
        Self::Sum,
        Self::GroupConcat,
    ];

    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Count => "COUNT",
            Self::Avg => "AVG",
            Self::Max => "MAX",
            Self::Min => "MIN",
            Self::Sum => "SUM",
            Self::GroupConcat => "GROUP_CONCAT",
        }
    }

    /// Looks a set function up by name (case-insensitive).
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|f| f.as_str().eq_ignore_ascii_case(name))
    }

    #[must_use]
    pub const fn function_return_type(&self) -> FunctionReturnType {
        match self {
            Self::Count => FunctionReturnType::Long,
            Self::Avg => FunctionReturnType::Double,
            Self::Max | Self::Min | Self::Sum => FunctionReturnType::MatchesParameter,
            Self::GroupConcat => FunctionReturnType::String,
        }
    }
}

/// Scalar functions passed through to MySQL.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MySqlFunctionName {
    CurrentTimestamp,
    CurrentDate,
    CurrentTime,
    Now,
    UnixTimestamp,
    FromUnixtime,
    Concat,
    Replace,
    Upper,
    Lower,
    Trim,
    Length,
    Abs,
    Round,
    DayOfMonth,
    DayOfWeek,
    DayOfYear,
    WeekOfYear,
    Month,
    Year,
}

impl MySqlFunctionName {
    pub const ALL: [Self; 20] = [
        Self::CurrentTimestamp,
        Self::CurrentDate,
        Self::CurrentTime,
        Self::Now,
        Self::UnixTimestamp,
        Self::FromUnixtime,
        Self::Concat,
        Self::Replace,
        Self::Upper,
        Self::Lower,
        Self::Trim,
        Self::Length,
        Self::Abs,
        Self::Round,
        Self::DayOfMonth,
        Self::DayOfWeek,
        Self::DayOfYear,
        Self::WeekOfYear,
        Self::Month,
        Self::Year,
    ];

    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::CurrentTimestamp => "CURRENT_TIMESTAMP",
            Self::CurrentDate => "CURRENT_DATE",
            Self::CurrentTime => "CURRENT_TIME",
            Self::Now => "NOW",
            Self::UnixTimestamp => "UNIX_TIMESTAMP",
            Self::FromUnixtime => "FROM_UNIXTIME",
            Self::Concat => "CONCAT",
            Self::Replace => "REPLACE",
            Self::Upper => "UPPER",
            Self::Lower => "LOWER",
            Self::Trim => "TRIM",
            Self::Length => "LENGTH",
            Self::Abs => "ABS",
            Self::Round => "ROUND",
            Self::DayOfMonth => "DAYOFMONTH",
            Self::DayOfWeek => "DAYOFWEEK",
            Self::DayOfYear => "DAYOFYEAR",
            Self::WeekOfYear => "WEEKOFYEAR",
            Self::Month => "MONTH",
            Self::Year => "YEAR",
        }
    }

    /// Looks a function up by name (case-insensitive).
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|f| f.as_str().eq_ignore_ascii_case(name))
    }

    /// Returns true for functions that MySQL accepts without parentheses.
    #[must_use]
    pub const fn is_niladic(&self) -> bool {
        matches!(
            self,
            Self::CurrentTimestamp | Self::CurrentDate | Self::CurrentTime
        )
    }

    #[must_use]
    pub const fn function_return_type(&self) -> FunctionReturnType {
        match self {
            Self::CurrentTimestamp
            | Self::Now
            | Self::UnixTimestamp
            | Self::Length
            | Self::DayOfMonth
            | Self::DayOfWeek
            | Self::DayOfYear
            | Self::WeekOfYear
            | Self::Month
            | Self::Year => FunctionReturnType::Long,
            Self::CurrentDate
            | Self::CurrentTime
            | Self::FromUnixtime
            | Self::Concat
            | Self::Replace
            | Self::Upper
            | Self::Lower
            | Self::Trim => FunctionReturnType::String,
            Self::Abs | Self::Round => FunctionReturnType::MatchesParameter,
        }
    }
}

/// Functions operating on list-typed columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ArrayFunctionType {
    Unnest,
}

impl ArrayFunctionType {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Unnest => "UNNEST",
        }
    }

    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        name.eq_ignore_ascii_case("UNNEST").then_some(Self::Unnest)
    }

    #[must_use]
    pub const fn function_return_type(&self) -> FunctionReturnType {
        match self {
            Self::Unnest => FunctionReturnType::UnnestParameter,
        }
    }
}

/// Functions resolved from the caller's identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CurrentUserFunctionName {
    CurrentUser,
}

impl CurrentUserFunctionName {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::CurrentUser => "CURRENT_USER",
        }
    }

    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        name.eq_ignore_ascii_case("CURRENT_USER")
            .then_some(Self::CurrentUser)
    }

    #[must_use]
    pub const fn function_return_type(&self) -> FunctionReturnType {
        match self {
            Self::CurrentUser => FunctionReturnType::UserId,
        }
    }
}

/// Engine-level boolean test functions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BooleanFunctionName {
    IsNaN,
    IsInfinity,
}

impl BooleanFunctionName {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::IsNaN => "ISNAN",
            Self::IsInfinity => "ISINFINITY",
        }
    }

    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        if name.eq_ignore_ascii_case("ISNAN") {
            Some(Self::IsNaN)
        } else if name.eq_ignore_ascii_case("ISINFINITY") {
            Some(Self::IsInfinity)
        } else {
            None
        }
    }
}
