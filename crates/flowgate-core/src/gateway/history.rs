//! Vista derivada del historial persistido de una instancia.
//!
//! El nodo actual puede reconstruirse sólo a partir de los registros: es el
//! destino del último `WorkflowProcess`, o el `Start` si no hay registros.

use super::WorkflowProcess;
use crate::errors::CoreEngineError;
use crate::graph::ProcessDefinition;
use crate::model::{NodeId, NodeKind};

#[derive(Debug, Clone)]
pub struct ProcessHistory {
    start: NodeId,
    records: Vec<WorkflowProcess>,
}

impl ProcessHistory {
    pub fn new(start: NodeId, records: Vec<WorkflowProcess>) -> Self {
        Self { start, records }
    }

    pub fn records(&self) -> &[WorkflowProcess] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Nodo actual derivado de los registros.
    pub fn current(&self) -> NodeId {
        self.records.last().map(|r| r.to).unwrap_or(self.start)
    }

    /// Camino recorrido: `Start` seguido del destino de cada registro.
    pub fn path(&self) -> Vec<NodeId> {
        std::iter::once(self.start).chain(self.records.iter().map(|r| r.to)).collect()
    }

    /// `true` si el último salto registrado llegó a un nodo `End`.
    pub fn is_completed(&self, definition: &ProcessDefinition) -> Result<bool, CoreEngineError> {
        match self.records.last() {
            Some(r) => Ok(definition.get_node(r.to)?.kind == NodeKind::End),
            None => Ok(false),
        }
    }
}
