use chrono::{Datelike, NaiveDate};

use crate::dictionary::ValueDictionary;
use crate::types::{ColumnType, FormatError, Value};

/// `NaiveDate::num_days_from_ce` of 1970-01-01.
const UNIX_EPOCH_DAYS_FROM_CE: i32 = 719_163;

/// Days since 1970-01-01.
#[must_use]
pub fn epoch_days(date: NaiveDate) -> i32 {
    date.num_days_from_ce() - UNIX_EPOCH_DAYS_FROM_CE
}

#[must_use]
pub fn from_epoch_days(days: i32) -> Option<NaiveDate> {
    NaiveDate::from_num_days_from_ce_opt(days.checked_add(UNIX_EPOCH_DAYS_FROM_CE)?)
}

/// Parse an ISO `YYYY-MM-DD` date into epoch days.
///
/// # Errors
///
/// Returns [`FormatError::InvalidDate`] for anything else.
pub fn parse_date(raw: &str) -> Result<i32, FormatError> {
    raw.parse::<NaiveDate>()
        .map(epoch_days)
        .map_err(|_| FormatError::InvalidDate {
            value: raw.to_owned(),
        })
}

/// Encode one non-blank raw cell value as its stored 32-bit form.
///
/// String-like types are interned in `dictionary`; integers must fit `i32`;
/// booleans are true for `true`, `1`, or `yes` in any case; dates become
/// epoch days.
///
/// # Errors
///
/// Returns [`FormatError::InvalidInteger`] or [`FormatError::InvalidDate`].
pub fn encode_value(
    column_type: ColumnType,
    raw: &str,
    dictionary: &mut ValueDictionary,
) -> Result<i32, FormatError> {
    match column_type {
        ColumnType::String | ColumnType::Decimal | ColumnType::Timestamp => {
            Ok(dictionary.add(raw))
        }
        ColumnType::Integer => raw.parse::<i32>().map_err(|_| FormatError::InvalidInteger {
            value: raw.to_owned(),
        }),
        ColumnType::Boolean => Ok(i32::from(
            ["true", "1", "yes"]
                .iter()
                .any(|t| raw.eq_ignore_ascii_case(t)),
        )),
        ColumnType::Date => parse_date(raw),
    }
}

/// Decode a stored value back into a typed [`Value`].
///
/// Dictionary-encoded types resolve id 0 (and unknown ids) to `None`.
#[must_use]
pub fn decode_value(
    column_type: ColumnType,
    stored: i32,
    dictionary: &ValueDictionary,
) -> Option<Value> {
    match column_type {
        ColumnType::String | ColumnType::Decimal | ColumnType::Timestamp => {
            dictionary.resolve(stored).map(Value::from)
        }
        ColumnType::Integer => Some(Value::Int(i64::from(stored))),
        ColumnType::Boolean => Some(Value::Bool(stored != 0)),
        ColumnType::Date => from_epoch_days(stored).map(Value::Date),
    }
}
