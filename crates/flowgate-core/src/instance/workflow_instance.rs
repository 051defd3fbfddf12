use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::InstanceStatus;
use crate::graph::ProcessDefinition;
use crate::model::NodeId;

/// Una ejecución en curso de una definición.
///
/// Sólo el motor la modifica, y siempre después de que el gateway aceptó el
/// nuevo estado: `current` nunca apunta a un nodo `Decision`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkflowInstance {
    pub instance_id: Uuid,
    pub definition_id: String,
    pub definition_hash: String,
    pub current: NodeId,
    pub status: InstanceStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl WorkflowInstance {
    /// Nueva instancia `Running` posicionada en el nodo `Start`.
    pub fn new(definition: &ProcessDefinition) -> Self {
        let now = Utc::now();
        Self { instance_id: Uuid::new_v4(),
               definition_id: definition.id().to_string(),
               definition_hash: definition.definition_hash().to_string(),
               current: definition.start_node().id,
               status: InstanceStatus::Running,
               created_at: now,
               updated_at: now }
    }

    pub fn is_running(&self) -> bool {
        self.status == InstanceStatus::Running
    }

    /// Copia con el puntero/estado avanzados (todavía no confirmada).
    pub(crate) fn advanced(&self, current: NodeId, status: InstanceStatus) -> Self {
        Self { current,
               status,
               updated_at: Utc::now(),
               ..self.clone() }
    }
}
