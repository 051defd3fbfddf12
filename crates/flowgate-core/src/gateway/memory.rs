use std::collections::HashMap;

use log::debug;
use uuid::Uuid;

use super::{PersistenceGateway, WorkflowProcess};
use crate::errors::CoreEngineError;
use crate::graph::ProcessDefinition;
use crate::instance::WorkflowInstance;
use crate::model::NodeId;

/// Gateway en memoria. Mismo contrato que el de Postgres: `processing` y
/// `update_status` fallan si la instancia no fue iniciada, y con
/// `StaleInstance` si la fila guardada ya no está `Running` en el nodo de
/// origen de la escritura.
#[derive(Debug, Default, Clone)]
pub struct InMemoryGateway {
    pub instances: HashMap<Uuid, WorkflowInstance>,
    pub processes: HashMap<Uuid, Vec<WorkflowProcess>>,
}

impl InMemoryGateway {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fila guardada, sólo si sigue `Running` en `expected`.
    fn stored_at(&mut self, instance: &WorkflowInstance, expected: NodeId) -> Result<&mut WorkflowInstance, CoreEngineError> {
        let stored = self.instances
                         .get_mut(&instance.instance_id)
                         .ok_or_else(|| CoreEngineError::InstanceNotFound(instance.instance_id.to_string()))?;
        if stored.current != expected || !stored.is_running() {
            return Err(CoreEngineError::StaleInstance { instance: instance.instance_id.to_string(),
                                                        expected });
        }
        Ok(stored)
    }

    /// Total de registros persistidos (todas las instancias).
    pub fn process_count(&self) -> usize {
        self.processes.values().map(Vec::len).sum()
    }
}

impl PersistenceGateway for InMemoryGateway {
    fn start(&mut self, definition: &ProcessDefinition, instance: &WorkflowInstance) -> Result<(), CoreEngineError> {
        if self.instances.contains_key(&instance.instance_id) {
            return Err(CoreEngineError::Persistence(format!("instance {} already exists", instance.instance_id)));
        }
        debug!("memory:start instance={} definition={}", instance.instance_id, definition.id());
        self.instances.insert(instance.instance_id, instance.clone());
        self.processes.insert(instance.instance_id, Vec::new());
        Ok(())
    }

    fn processing(&mut self, process: &WorkflowProcess, instance: &WorkflowInstance) -> Result<(), CoreEngineError> {
        *self.stored_at(instance, process.from)? = instance.clone();
        self.processes.entry(instance.instance_id).or_default().push(process.clone());
        Ok(())
    }

    fn update_status(&mut self, instance: &WorkflowInstance) -> Result<(), CoreEngineError> {
        *self.stored_at(instance, instance.current)? = instance.clone();
        Ok(())
    }

    fn instance(&self, instance_id: Uuid) -> Result<Option<WorkflowInstance>, CoreEngineError> {
        Ok(self.instances.get(&instance_id).cloned())
    }

    fn processes(&self, instance_id: Uuid) -> Result<Vec<WorkflowProcess>, CoreEngineError> {
        Ok(self.processes.get(&instance_id).cloned().unwrap_or_default())
    }
}
