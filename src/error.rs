use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GemError {
    #[error("line {line}, column {column}: {reason}")]
    MalformedInput {
        line: usize,
        column: usize,
        reason: String,
    },

    #[error("unknown {kind} '{value}', expected {expected}")]
    UnknownConfiguration {
        kind: &'static str,
        value: String,
        expected: &'static str,
    },

    #[error("{engine} cannot enumerate {variables} variables")]
    TooManyVariables {
        engine: &'static str,
        variables: usize,
    },

    #[error("external solver failed: {0}")]
    ExternalSolver(String),
}

impl GemError {
    pub(crate) fn malformed(line: usize, column: usize, reason: impl Into<String>) -> Self {
        GemError::MalformedInput {
            line,
            column,
            reason: reason.into(),
        }
    }
}
