use log::{debug, trace};

use super::ConditionEvaluator;
use crate::errors::CoreEngineError;
use crate::model::{Node, ProcessData, Transition};

/// Resolutor de decisiones sobre un evaluador prestado.
pub struct DecisionResolver<'a> {
    evaluator: &'a dyn ConditionEvaluator,
}

impl<'a> DecisionResolver<'a> {
    pub fn new(evaluator: &'a dyn ConditionEvaluator) -> Self {
        Self { evaluator }
    }

    /// Devuelve la transición de la primera regla (en orden de declaración)
    /// cuya condición es verdadera, o `None` si ninguna coincide. Un error del
    /// evaluador corta la resolución.
    pub fn resolve<'n>(&self, node: &'n Node, data: &ProcessData) -> Result<Option<&'n Transition>, CoreEngineError> {
        if !node.is_decision() {
            return Err(CoreEngineError::Internal(format!("node {} is not a decision", node.id)));
        }
        for rule in &node.rules {
            let matched = self.evaluator.evaluate(&rule.condition, data)?;
            trace!("decision {} rule '{}' -> {}", node.id, rule.condition, matched);
            if matched {
                let tran = node.transition(&rule.transition).ok_or_else(|| {
                    CoreEngineError::InvalidDefinition(format!("rule '{}' of node {} references unknown transition '{}'",
                                                               rule.condition, node.id, rule.transition))
                })?;
                debug!("decision {} selected transition '{}' -> {}", node.id, tran.tid, tran.to);
                return Ok(Some(tran));
            }
        }
        debug!("decision {} matched no rule", node.id);
        Ok(None)
    }
}
