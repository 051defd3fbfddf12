use crate::instance::WorkflowInstance;
use crate::model::{Node, ProcessData};

/// Contexto de un salto realizado, entregado a los observadores.
///
/// `from` y `to` nunca son nodos `Decision`. `instance` es el estado ya
/// confirmado (después de persistir).
#[derive(Debug, Clone)]
pub struct ExecutingContext {
    pub from: Node,
    pub to: Node,
    pub transition_id: String,
    pub instance: WorkflowInstance,
    pub data: ProcessData,
}
