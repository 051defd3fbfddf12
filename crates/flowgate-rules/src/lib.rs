//! flowgate-rules: lenguaje de condiciones para los nodos de decisión.
//!
//! Las condiciones son expresiones booleanas sobre `ProcessData`:
//! `amount > 1000 && requester.level != "director"`. Un identificador con
//! puntos recorre objetos y arreglos; si no existe se evalúa como `null`.
//! El resultado final se interpreta por veracidad (ver [`eval::truthy`]).

pub mod error;
pub mod eval;
pub mod lexer;
pub mod parser;

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use flowgate_core::{ConditionEvaluator, CoreEngineError, ProcessData};

pub use error::RuleError;
pub use parser::{parse, CmpOp, Expr};

/// Evaluador de expresiones con caché de ASTs por texto de condición.
#[derive(Debug, Default)]
pub struct ExpressionEvaluator {
    cache: Mutex<HashMap<String, Arc<Expr>>>,
}

impl ExpressionEvaluator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parsea (o recupera de caché) una condición.
    pub fn compile(&self, condition: &str) -> Result<Arc<Expr>, RuleError> {
        let mut cache = self.cache.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        if let Some(expr) = cache.get(condition) {
            return Ok(Arc::clone(expr));
        }
        let expr = Arc::new(parse(condition)?);
        log::trace!("compiled condition '{condition}'");
        cache.insert(condition.to_string(), Arc::clone(&expr));
        Ok(expr)
    }

    pub fn check(&self, condition: &str, data: &ProcessData) -> Result<bool, RuleError> {
        let expr = self.compile(condition)?;
        eval::eval(&expr, data).map(|v| eval::truthy(&v))
    }

    pub fn cached(&self) -> usize {
        self.cache.lock().map(|c| c.len()).unwrap_or(0)
    }
}

impl ConditionEvaluator for ExpressionEvaluator {
    fn evaluate(&self, condition: &str, data: &ProcessData) -> Result<bool, CoreEngineError> {
        self.check(condition, data).map_err(|e| {
                                        log::debug!("condition '{condition}' failed: {e}");
                                        CoreEngineError::from(e)
                                    })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn caches_compiled_conditions() {
        let ev = ExpressionEvaluator::new();
        let data = ProcessData::new().with("amount", 10);
        assert!(ev.check("amount > 5", &data).unwrap());
        assert!(!ev.check("amount > 50", &data).unwrap());
        assert!(ev.check("amount > 5", &data).unwrap());
        assert_eq!(ev.cached(), 2);
    }

    #[test]
    fn parse_errors_are_not_cached_and_map_to_evaluation() {
        let ev = ExpressionEvaluator::new();
        let err = ev.evaluate("amount >", &ProcessData::new()).unwrap_err();
        assert!(matches!(err, CoreEngineError::Evaluation(ref m) if m.contains("parse error at 8")));
        assert_eq!(ev.cached(), 0);
    }

    #[test]
    fn oversized_literal_fails_instead_of_matching_missing_value() {
        let ev = ExpressionEvaluator::new();
        let data = ProcessData::new().with("x", serde_json::Value::Null);
        let cond = format!("x == {}", "9".repeat(400));
        assert!(matches!(ev.check(&cond, &data), Err(RuleError::Parse { .. })));
        assert!(matches!(ev.check(&cond, &ProcessData::new()), Err(RuleError::Parse { .. })));
    }

    #[test]
    fn result_is_interpreted_by_truthiness() {
        let ev = ExpressionEvaluator::new();
        let data = ProcessData::new().with("note", "urgent").with("count", 0);
        assert!(ev.check("note", &data).unwrap());
        assert!(!ev.check("count", &data).unwrap());
    }
}
