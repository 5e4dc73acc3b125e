use chrono::NaiveDate;

use crate::codec::epoch_days;
use crate::dictionary::ValueDictionary;
use crate::types::{ColumnType, EvaluationError, Value};

/// Convert an input value into the 32-bit form stored for `column_type`.
///
/// A missing value becomes 0. Strings absent from the dictionary also become
/// 0, so they only ever match blank cells or negated conditions.
pub(crate) fn to_stored(
    value: Option<&Value>,
    column_type: ColumnType,
    dictionary: &ValueDictionary,
    column: &str,
) -> Result<i32, EvaluationError> {
    let Some(value) = value else {
        return Ok(ValueDictionary::NULL_ID);
    };
    let mismatch = |found: &'static str| EvaluationError::TypeCoercion {
        column: column.to_owned(),
        expected: column_type,
        found,
    };
    match (column_type, value) {
        (ColumnType::String | ColumnType::Timestamp | ColumnType::Decimal, Value::String(s)) => {
            Ok(dictionary.get(s))
        }
        (ColumnType::Decimal, Value::Int(i)) => Ok(dictionary.get(&i.to_string())),
        (ColumnType::Decimal, Value::Float(f)) => Ok(dictionary.get(&f.to_string())),
        (ColumnType::Integer | ColumnType::Date, Value::Int(i)) => {
            i32::try_from(*i).map_err(|_| mismatch("int outside the 32-bit range"))
        }
        (ColumnType::Boolean, Value::Bool(b)) => Ok(i32::from(*b)),
        (ColumnType::Date, Value::Date(d)) => Ok(epoch_days(*d)),
        (ColumnType::Date, Value::String(s)) => s
            .trim()
            .parse::<NaiveDate>()
            .map(epoch_days)
            .map_err(|_| mismatch("string that is not a YYYY-MM-DD date")),
        _ => Err(mismatch(value.type_name())),
    }
}
