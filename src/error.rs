use itertools::Itertools as _;
use thiserror::Error;

use crate::lr::StateId;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExpectedSymbols(Vec<String>);

impl ExpectedSymbols {
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }
}

impl std::fmt::Display for ExpectedSymbols {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.iter().join(", ").fmt(f)
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ErrorKind {
    #[error("unknown symbol {0}")]
    UnknownSymbol(String),

    #[error("a symbol with the same identifier already exists {0}")]
    DuplicatedSymbol(String),

    #[error("the rule of {0} has an empty right-hand side")]
    EmptyRule(String),

    #[error("the terminal symbol {0} cannot head a rule")]
    TerminalRuleHead(String),

    #[error("the grammar has no rule")]
    EmptyGrammar,

    #[error("ill-formed grammar for start symbol {start} and end symbol {end}: {reason}:\n{rules}")]
    GrammarShape {
        start: String,
        end: String,
        reason: &'static str,
        rules: String,
    },

    #[error("the algorithm is not supported (lookahead depth {0})")]
    UnsupportedAlgorithm(usize),

    #[error("state #{state} has neither shifts nor reductions\n{display}")]
    EmptyState { state: StateId, display: String },

    #[error("a shift-reduce conflict has occurred in state #{state}\n{display}")]
    ShiftReduceConflict { state: StateId, display: String },

    #[error("a reduce-reduce conflict has occurred in state #{state}\n{display}")]
    ReduceReduceConflict { state: StateId, display: String },

    #[error("unexpected symbol {got} in state #{state}, expecting {expecting}")]
    UnexpectedSymbol {
        got: String,
        state: StateId,
        expecting: ExpectedSymbols,
    },

    #[error("unexpected end of stream in state #{state}, expecting {expecting}")]
    UnexpectedEndOfStream {
        state: StateId,
        expecting: ExpectedSymbols,
    },

    #[error("remaining input after acceptance, starting with {0}")]
    ResidualInput(String),

    #[error("inconsistent automaton: {0}")]
    Inconsistent(String),
}

impl ErrorKind {
    pub fn unexpected_symbol<I, S>(got: &str, state: StateId, expecting: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: ToString,
    {
        Self::UnexpectedSymbol {
            got: got.to_string(),
            state,
            expecting: ExpectedSymbols(expecting.into_iter().map(|s| s.to_string()).collect()),
        }
    }

    pub fn unexpected_end_of_stream<I, S>(state: StateId, expecting: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: ToString,
    {
        Self::UnexpectedEndOfStream {
            state,
            expecting: ExpectedSymbols(expecting.into_iter().map(|s| s.to_string()).collect()),
        }
    }

    pub fn unknown_symbol(got: &str) -> Self {
        Self::UnknownSymbol(got.to_string())
    }

    pub fn inconsistent(reason: impl ToString) -> Self {
        Self::Inconsistent(reason.to_string())
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{kind}{}", .position.map(|pos| format!(" (token #{pos})")).unwrap_or_default())]
pub struct LrError {
    /// Kind of error
    kind: ErrorKind,
    /// Position of the offending token in the input, if any.
    pub(crate) position: Option<usize>,
}

impl LrError {
    pub fn new(kind: impl Into<ErrorKind>, position: Option<usize>) -> Self {
        Self {
            kind: kind.into(),
            position,
        }
    }

    pub fn kind(&self) -> &ErrorKind {
        &self.kind
    }

    pub fn position(&self) -> Option<usize> {
        self.position
    }
}

impl From<ErrorKind> for LrError {
    fn from(kind: ErrorKind) -> Self {
        Self {
            kind,
            position: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{ErrorKind, LrError};

    #[test]
    fn test_error_display_mentions_position() {
        let err = LrError::new(ErrorKind::unexpected_symbol("id", 4, ["+", "$"]), Some(1));
        assert_eq!(
            err.to_string(),
            "unexpected symbol id in state #4, expecting +, $ (token #1)"
        );

        let err = LrError::from(ErrorKind::EmptyGrammar);
        assert_eq!(err.to_string(), "the grammar has no rule");
        assert_eq!(err.position(), None);
    }
}
