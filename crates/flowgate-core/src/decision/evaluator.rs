use crate::errors::CoreEngineError;
use crate::model::ProcessData;

/// Evalúa una expresión de condición. Debe ser pura: sin efectos sobre la
/// instancia ni sobre `data`. Los fallos se reportan como
/// `CoreEngineError::Evaluation`.
pub trait ConditionEvaluator: Send + Sync {
    fn evaluate(&self, condition: &str, data: &ProcessData) -> Result<bool, CoreEngineError>;
}

impl<F> ConditionEvaluator for F
    where F: Fn(&str, &ProcessData) -> Result<bool, CoreEngineError> + Send + Sync
{
    fn evaluate(&self, condition: &str, data: &ProcessData) -> Result<bool, CoreEngineError> {
        self(condition, data)
    }
}
