use crate::errors::CoreEngineError;
use crate::instance::WorkflowInstance;
use crate::model::{Command, ProcessData};

/// Ejecuta el `Command` opaco de un nodo de decisión. Lo que devuelve se
/// mezcla sobre los datos del llamador antes de evaluar las reglas.
pub trait CommandExecutor: Send + Sync {
    fn execute(&self,
               command: &Command,
               instance: &WorkflowInstance,
               data: &ProcessData)
               -> Result<ProcessData, CoreEngineError>;
}
