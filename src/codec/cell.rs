use thiserror::Error;
use winnow::ascii::space0;
use winnow::combinator::{cut_err, opt, separated};
use winnow::error::{ModalResult, StrContext, StrContextValue};
use winnow::prelude::*;
use winnow::token::take_while;

use super::value::encode_value;
use crate::dictionary::ValueDictionary;
use crate::types::{ColumnType, FormatError};

/// Why a single raw cell could not be encoded.
#[derive(Debug, Error)]
pub(crate) enum CellError {
    #[error("expected a parenthesised list such as '(a,b)'")]
    Syntax,

    #[error("range needs exactly two bounds, found {found}")]
    RangeArity { found: usize },

    #[error("set has {len} members; at most 65535 are supported")]
    SetTooLarge { len: usize },

    #[error(transparent)]
    Value(#[from] FormatError),
}

// -- List grammar -----------------------------------------------------------

fn member<'i>(input: &mut &'i str) -> ModalResult<&'i str> {
    take_while(1.., |c: char| !matches!(c, ',' | '(' | ')'))
        .map(str::trim)
        .verify(|m: &&str| !m.is_empty())
        .context(StrContext::Expected(StrContextValue::Description("value")))
        .parse_next(input)
}

fn list<'i>(input: &mut &'i str) -> ModalResult<Vec<&'i str>> {
    ('(', space0).parse_next(input)?;
    if opt(')').parse_next(input)?.is_some() {
        return Ok(Vec::new());
    }
    let members: Vec<&'i str> = separated(1.., cut_err(member), ',').parse_next(input)?;
    cut_err(')')
        .context(StrContext::Expected(StrContextValue::CharLiteral(')')))
        .parse_next(input)?;
    Ok(members)
}

/// Split `(a, b, c)` into its trimmed members. `()` yields no members.
pub(crate) fn parse_list(raw: &str) -> Result<Vec<&str>, CellError> {
    list.parse(raw.trim()).map_err(|_| CellError::Syntax)
}

// -- Cell encoders ----------------------------------------------------------

pub(crate) fn parse_scalar(
    column_type: ColumnType,
    raw: &str,
    dictionary: &mut ValueDictionary,
) -> Result<i32, CellError> {
    Ok(encode_value(column_type, raw, dictionary)?)
}

pub(crate) fn parse_range(
    column_type: ColumnType,
    raw: &str,
    dictionary: &mut ValueDictionary,
) -> Result<(i32, i32), CellError> {
    let bounds = parse_list(raw)?;
    let [min, max] = bounds.as_slice() else {
        return Err(CellError::RangeArity {
            found: bounds.len(),
        });
    };
    Ok((
        encode_value(column_type, min, dictionary)?,
        encode_value(column_type, max, dictionary)?,
    ))
}

pub(crate) fn parse_set(
    column_type: ColumnType,
    raw: &str,
    dictionary: &mut ValueDictionary,
) -> Result<Vec<i32>, CellError> {
    let members = parse_list(raw)?;
    if members.len() > usize::from(u16::MAX) {
        return Err(CellError::SetTooLarge { len: members.len() });
    }
    members
        .into_iter()
        .map(|m| encode_value(column_type, m, dictionary).map_err(CellError::from))
        .collect()
}
