//! Condition operator catalog
//!
//! Fixed numeric codes understood by the dataset query layer, each tagged with
//! the category that decides the shape of its value.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Operator category, decides the wire-value shape
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OperatorCategory {
    /// Scalar value, exact match
    Equality,
    /// Scalar value, ordered comparison
    Comparison,
    /// Scalar string wrapped with a wildcard on the wire
    Pattern,
    /// No value
    NullCheck,
    /// No value, period relative to today
    RelativeDate,
    /// Scalar count of hours/days/weeks/months/years
    RelativeCount,
    /// Two nullable slots
    Range,
    /// Array of scalars
    MultiValue,
    /// Known on the wire, never editable here
    Other,
}

macro_rules! operator_catalog {
    ($($name:ident = $code:literal => $category:ident),+ $(,)?) => {
        /// Comparison operator with its platform code
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(try_from = "u16", into = "u16")]
        pub enum Operator {
            $($name),+
        }

        impl Operator {
            /// All operators in catalog order
            pub const ALL: &'static [Operator] = &[$(Operator::$name),+];

            pub fn code(self) -> u16 {
                match self {
                    $(Operator::$name => $code),+
                }
            }

            pub fn category(self) -> OperatorCategory {
                match self {
                    $(Operator::$name => OperatorCategory::$category),+
                }
            }

            pub fn as_str(self) -> &'static str {
                match self {
                    $(Operator::$name => stringify!($name)),+
                }
            }
        }

        impl TryFrom<u16> for Operator {
            type Error = UnknownOperator;

            fn try_from(code: u16) -> Result<Self, Self::Error> {
                match code {
                    $($code => Ok(Operator::$name),)+
                    other => Err(UnknownOperator(other)),
                }
            }
        }
    };
}

operator_catalog! {
    Equal = 0 => Equality,
    DoesNotEqual = 1 => Equality,
    GreaterThan = 2 => Comparison,
    LessThan = 3 => Comparison,
    GreaterThanOrEqual = 4 => Comparison,
    LessThanOrEqual = 5 => Comparison,
    Like = 6 => Pattern,
    NotLike = 7 => Pattern,
    In = 8 => MultiValue,
    NotIn = 9 => MultiValue,
    Between = 10 => Range,
    NotBetween = 11 => Range,
    DoesNotContainData = 12 => NullCheck,
    ContainsData = 13 => NullCheck,
    Yesterday = 14 => RelativeDate,
    Today = 15 => RelativeDate,
    Tomorrow = 16 => RelativeDate,
    Last7Days = 17 => RelativeDate,
    Next7Days = 18 => RelativeDate,
    LastWeek = 19 => RelativeDate,
    ThisWeek = 20 => RelativeDate,
    NextWeek = 21 => RelativeDate,
    LastMonth = 22 => RelativeDate,
    ThisMonth = 23 => RelativeDate,
    NextMonth = 24 => RelativeDate,
    On = 25 => Comparison,
    OnOrBefore = 26 => Comparison,
    OnOrAfter = 27 => Comparison,
    LastYear = 28 => RelativeDate,
    ThisYear = 29 => RelativeDate,
    NextYear = 30 => RelativeDate,
    LastXHours = 31 => RelativeCount,
    NextXHours = 32 => RelativeCount,
    LastXDays = 33 => RelativeCount,
    NextXDays = 34 => RelativeCount,
    LastXWeeks = 35 => RelativeCount,
    NextXWeeks = 36 => RelativeCount,
    LastXMonths = 37 => RelativeCount,
    NextXMonths = 38 => RelativeCount,
    LastXYears = 39 => RelativeCount,
    NextXYears = 40 => RelativeCount,
    EqualUserId = 41 => Other,
    NotEqualUserId = 42 => Other,
    EqualBusinessId = 43 => Other,
    NotEqualBusinessId = 44 => Other,
    ChildOf = 45 => Other,
    EqualUserLanguage = 51 => Other,
    NotOn = 52 => Comparison,
    OlderThanXMonths = 53 => RelativeCount,
    BeginsWith = 54 => Pattern,
    DoesNotBeginWith = 55 => Pattern,
    EndsWith = 56 => Pattern,
    DoesNotEndWith = 57 => Pattern,
    Under = 75 => Other,
    NotUnder = 76 => Other,
    UnderOrEqual = 77 => Other,
    Above = 78 => Other,
    AboveOrEqual = 79 => Other,
    ContainValues = 87 => MultiValue,
    DoesNotContainValues = 88 => MultiValue,
}

/// Operator code not present in the catalog
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UnknownOperator(pub u16);

impl fmt::Display for UnknownOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown condition operator code {}", self.0)
    }
}

impl std::error::Error for UnknownOperator {}

impl From<Operator> for u16 {
    fn from(op: Operator) -> Self {
        op.code()
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Operator {
    /// Operator takes no value (null-check or relative period)
    pub fn is_value_less(self) -> bool {
        matches!(
            self.category(),
            OperatorCategory::NullCheck | OperatorCategory::RelativeDate | OperatorCategory::Other
        )
    }

    pub fn is_pattern(self) -> bool {
        self.category() == OperatorCategory::Pattern
    }

    pub fn is_range(self) -> bool {
        self.category() == OperatorCategory::Range
    }

    /// Wildcards a pattern operator places around its value: (leading, trailing)
    pub fn wildcard_sides(self) -> (bool, bool) {
        match self {
            Operator::Like | Operator::NotLike => (true, true),
            Operator::BeginsWith | Operator::DoesNotBeginWith => (false, true),
            Operator::EndsWith | Operator::DoesNotEndWith => (true, false),
            _ => (false, false),
        }
    }

    /// Multi-valued form used on the wire for Equal/DoesNotEqual
    pub fn multi_valued(self) -> Option<Operator> {
        match self {
            Operator::Equal => Some(Operator::In),
            Operator::DoesNotEqual => Some(Operator::NotIn),
            _ => None,
        }
    }

    /// Canonical editor-facing form of In/NotIn
    pub fn single_valued(self) -> Option<Operator> {
        match self {
            Operator::In => Some(Operator::Equal),
            Operator::NotIn => Some(Operator::DoesNotEqual),
            _ => None,
        }
    }
}
