use std::fmt;

use super::column::ColumnRole;
use super::error::FormatError;

/// Column operator declared in a decision table's operator row.
///
/// The discriminant is the ordinal written into the artifact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Operator {
    RuleId,
    Priority,
    Set,
    Eq,
    Ne,
    Gt,
    Gte,
    Lt,
    Lte,
    BetweenInclusive,
    BetweenExclusive,
    NotBetweenInclusive,
    NotBetweenExclusive,
    In,
    NotIn,
}

const ALIASES: &[(&str, Operator)] = &[
    ("RULE_ID", Operator::RuleId),
    ("PRIORITY", Operator::Priority),
    ("SET", Operator::Set),
    ("EQ", Operator::Eq),
    ("=", Operator::Eq),
    ("NE", Operator::Ne),
    ("!=", Operator::Ne),
    ("NOT EQUAL", Operator::Ne),
    ("NOT_EQUAL", Operator::Ne),
    ("GT", Operator::Gt),
    (">", Operator::Gt),
    ("GTE", Operator::Gte),
    (">=", Operator::Gte),
    ("LT", Operator::Lt),
    ("<", Operator::Lt),
    ("LTE", Operator::Lte),
    ("<=", Operator::Lte),
    ("BETWEEN_INCLUSIVE", Operator::BetweenInclusive),
    ("BETWEEN", Operator::BetweenInclusive),
    ("BETWEEN_EXCLUSIVE", Operator::BetweenExclusive),
    ("NOT_BETWEEN_INCLUSIVE", Operator::NotBetweenInclusive),
    ("NOT BETWEEN", Operator::NotBetweenInclusive),
    ("NOT_BETWEEN_EXCLUSIVE", Operator::NotBetweenExclusive),
    ("IN", Operator::In),
    ("NOT_IN", Operator::NotIn),
    ("NOT IN", Operator::NotIn),
];

impl Operator {
    pub(crate) const ALL: [Operator; 15] = [
        Operator::RuleId,
        Operator::Priority,
        Operator::Set,
        Operator::Eq,
        Operator::Ne,
        Operator::Gt,
        Operator::Gte,
        Operator::Lt,
        Operator::Lte,
        Operator::BetweenInclusive,
        Operator::BetweenExclusive,
        Operator::NotBetweenInclusive,
        Operator::NotBetweenExclusive,
        Operator::In,
        Operator::NotIn,
    ];

    /// Resolve an operator-row token.
    ///
    /// Tokens are trimmed, upper-cased, and runs of whitespace collapse to a
    /// single space, so `"not   in"` resolves to [`Operator::NotIn`].
    #[must_use]
    pub fn from_token(token: &str) -> Option<Self> {
        let normalized = token
            .split_whitespace()
            .collect::<Vec<_>>()
            .join(" ")
            .to_ascii_uppercase();
        ALIASES
            .iter()
            .find(|(alias, _)| *alias == normalized)
            .map(|(_, op)| *op)
    }

    #[must_use]
    pub fn ordinal(self) -> u8 {
        self as u8
    }

    /// # Errors
    ///
    /// Returns [`FormatError::UnknownOrdinal`] for values outside `0..=14`.
    pub fn from_ordinal(value: u8) -> Result<Self, FormatError> {
        Self::ALL
            .get(usize::from(value))
            .copied()
            .ok_or(FormatError::UnknownOrdinal {
                field: "operator",
                value,
            })
    }

    /// `SET` marks the output columns; everything else is a condition or metadata.
    #[must_use]
    pub fn is_output(self) -> bool {
        self == Operator::Set
    }

    #[must_use]
    pub fn role(self) -> ColumnRole {
        match self {
            Operator::RuleId | Operator::Priority => ColumnRole::Metadata,
            Operator::Set => ColumnRole::Output,
            _ => ColumnRole::Input,
        }
    }

    /// Cell codec used for this operator's column, with the comparison it performs.
    #[must_use]
    pub fn codec(self) -> ColumnCodec {
        match self {
            Operator::RuleId | Operator::Priority | Operator::Set | Operator::Eq => {
                ColumnCodec::Scalar(ScalarOp::Eq)
            }
            Operator::Ne => ColumnCodec::Scalar(ScalarOp::Ne),
            Operator::Gt => ColumnCodec::Scalar(ScalarOp::Gt),
            Operator::Gte => ColumnCodec::Scalar(ScalarOp::Gte),
            Operator::Lt => ColumnCodec::Scalar(ScalarOp::Lt),
            Operator::Lte => ColumnCodec::Scalar(ScalarOp::Lte),
            Operator::BetweenInclusive => ColumnCodec::Range(RangeOp::BetweenInclusive),
            Operator::BetweenExclusive => ColumnCodec::Range(RangeOp::BetweenExclusive),
            Operator::NotBetweenInclusive => ColumnCodec::Range(RangeOp::NotBetweenInclusive),
            Operator::NotBetweenExclusive => ColumnCodec::Range(RangeOp::NotBetweenExclusive),
            Operator::In => ColumnCodec::Set(SetOp::In),
            Operator::NotIn => ColumnCodec::Set(SetOp::NotIn),
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Operator::RuleId => "RULE_ID",
            Operator::Priority => "PRIORITY",
            Operator::Set => "SET",
            Operator::Eq => "EQ",
            Operator::Ne => "NE",
            Operator::Gt => "GT",
            Operator::Gte => "GTE",
            Operator::Lt => "LT",
            Operator::Lte => "LTE",
            Operator::BetweenInclusive => "BETWEEN_INCLUSIVE",
            Operator::BetweenExclusive => "BETWEEN_EXCLUSIVE",
            Operator::NotBetweenInclusive => "NOT_BETWEEN_INCLUSIVE",
            Operator::NotBetweenExclusive => "NOT_BETWEEN_EXCLUSIVE",
            Operator::In => "IN",
            Operator::NotIn => "NOT_IN",
        };
        f.write_str(name)
    }
}

/// Which block layout a column uses, paired with its comparison.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnCodec {
    Scalar(ScalarOp),
    Range(RangeOp),
    Set(SetOp),
}

/// Comparison against a single stored value.
///
/// The input is the left operand: `Gt` holds when `input > stored`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScalarOp {
    Eq,
    Ne,
    Gt,
    Gte,
    Lt,
    Lte,
}

impl ScalarOp {
    #[must_use]
    pub fn test(self, stored: i32, input: i32) -> bool {
        match self {
            ScalarOp::Eq => input == stored,
            ScalarOp::Ne => input != stored,
            ScalarOp::Gt => input > stored,
            ScalarOp::Gte => input >= stored,
            ScalarOp::Lt => input < stored,
            ScalarOp::Lte => input <= stored,
        }
    }
}

/// Comparison against a stored `(min, max)` pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RangeOp {
    BetweenInclusive,
    BetweenExclusive,
    NotBetweenInclusive,
    NotBetweenExclusive,
}

impl RangeOp {
    #[must_use]
    pub fn test(self, min: i32, max: i32, input: i32) -> bool {
        match self {
            RangeOp::BetweenInclusive => min <= input && input <= max,
            RangeOp::BetweenExclusive => min < input && input < max,
            RangeOp::NotBetweenInclusive => input < min || input > max,
            RangeOp::NotBetweenExclusive => input <= min || input >= max,
        }
    }
}

/// Membership test against a stored value list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SetOp {
    In,
    NotIn,
}

impl SetOp {
    #[must_use]
    pub fn test(self, members: &[i32], input: i32) -> bool {
        let found = members.contains(&input);
        match self {
            SetOp::In => found,
            SetOp::NotIn => !found,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ordinals_round_trip() {
        for (i, op) in Operator::ALL.iter().enumerate() {
            assert_eq!(usize::from(op.ordinal()), i);
            assert_eq!(Operator::from_ordinal(op.ordinal()).unwrap(), *op);
        }
        assert!(Operator::from_ordinal(15).is_err());
    }

    #[test]
    fn tokens_and_aliases() {
        assert_eq!(Operator::from_token("EQ"), Some(Operator::Eq));
        assert_eq!(Operator::from_token("="), Some(Operator::Eq));
        assert_eq!(Operator::from_token(" gte "), Some(Operator::Gte));
        assert_eq!(Operator::from_token("not  equal"), Some(Operator::Ne));
        assert_eq!(Operator::from_token("between"), Some(Operator::BetweenInclusive));
        assert_eq!(Operator::from_token("NOT\tBETWEEN"), Some(Operator::NotBetweenInclusive));
        assert_eq!(Operator::from_token("not in"), Some(Operator::NotIn));
        assert_eq!(Operator::from_token("rule_id"), Some(Operator::RuleId));
        assert_eq!(Operator::from_token("ABOUT"), None);
        assert_eq!(Operator::from_token(""), None);
    }

    #[test]
    fn display_is_canonical_token() {
        for op in Operator::ALL {
            assert_eq!(Operator::from_token(&op.to_string()), Some(op));
        }
    }

    #[test]
    fn roles() {
        assert_eq!(Operator::RuleId.role(), ColumnRole::Metadata);
        assert_eq!(Operator::Priority.role(), ColumnRole::Metadata);
        assert_eq!(Operator::Set.role(), ColumnRole::Output);
        assert!(Operator::Set.is_output());
        assert_eq!(Operator::NotIn.role(), ColumnRole::Input);
    }

    #[test]
    fn codecs() {
        assert_eq!(Operator::Set.codec(), ColumnCodec::Scalar(ScalarOp::Eq));
        assert_eq!(
            Operator::NotBetweenExclusive.codec(),
            ColumnCodec::Range(RangeOp::NotBetweenExclusive)
        );
        assert_eq!(Operator::In.codec(), ColumnCodec::Set(SetOp::In));
    }

    #[test]
    fn scalar_comparisons_put_input_on_the_left() {
        assert!(ScalarOp::Gt.test(18, 25));
        assert!(!ScalarOp::Gt.test(18, 18));
        assert!(ScalarOp::Gte.test(18, 18));
        assert!(ScalarOp::Lt.test(18, 10));
        assert!(ScalarOp::Lte.test(18, 18));
        assert!(ScalarOp::Ne.test(1, 2));
        assert!(!ScalarOp::Eq.test(1, 2));
    }

    #[test]
    fn range_bounds() {
        assert!(RangeOp::BetweenInclusive.test(18, 30, 18));
        assert!(RangeOp::BetweenInclusive.test(18, 30, 30));
        assert!(!RangeOp::BetweenExclusive.test(18, 30, 18));
        assert!(RangeOp::BetweenExclusive.test(18, 30, 19));
        assert!(RangeOp::NotBetweenInclusive.test(18, 30, 31));
        assert!(!RangeOp::NotBetweenInclusive.test(18, 30, 30));
        assert!(RangeOp::NotBetweenExclusive.test(18, 30, 30));
        assert!(!RangeOp::NotBetweenExclusive.test(18, 30, 29));
    }

    #[test]
    fn set_membership() {
        assert!(SetOp::In.test(&[1, 2, 3], 2));
        assert!(!SetOp::In.test(&[], 2));
        assert!(SetOp::NotIn.test(&[1, 3], 2));
        assert!(SetOp::NotIn.test(&[], 2));
    }
}
