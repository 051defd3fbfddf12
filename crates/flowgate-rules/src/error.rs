use flowgate_core::CoreEngineError;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum RuleError {
    #[error("parse error at {offset}: {message}")]
    Parse { offset: usize, message: String },
    #[error("cannot compare {left} {op} {right}")]
    TypeMismatch { left: String, op: &'static str, right: String },
    #[error("cannot negate {0}")]
    BadOperand(String),
}

impl RuleError {
    pub(crate) fn parse(offset: usize, message: impl Into<String>) -> Self {
        RuleError::Parse { offset,
                           message: message.into() }
    }
}

impl From<RuleError> for CoreEngineError {
    fn from(err: RuleError) -> Self {
        CoreEngineError::Evaluation(err.to_string())
    }
}
