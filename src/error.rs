use thiserror::Error;

use crate::{CompileError, EvaluationError, FormatError, LoadError};

/// Unified error type covering compilation, loading, and evaluation.
///
/// Returned by convenience methods like
/// [`LoadedRuleset::from_table()`](crate::LoadedRuleset::from_table).
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Compile(#[from] CompileError),

    #[error(transparent)]
    Format(#[from] FormatError),

    #[error(transparent)]
    Load(#[from] LoadError),

    #[error(transparent)]
    Evaluation(#[from] EvaluationError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_pass_through() {
        let err = Error::from(EvaluationError::NoMatch);
        assert_eq!(err.to_string(), EvaluationError::NoMatch.to_string());

        let err = Error::from(CompileError::MissingRuleId);
        assert_eq!(err.to_string(), CompileError::MissingRuleId.to_string());
    }

    #[test]
    fn load_errors_keep_their_source() {
        let err = Error::from(LoadError::from(FormatError::TrailingBytes { count: 3 }));
        assert!(matches!(
            err,
            Error::Load(LoadError::Format(FormatError::TrailingBytes { count: 3 }))
        ));
    }
}
