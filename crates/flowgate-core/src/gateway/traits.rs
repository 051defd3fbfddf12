use uuid::Uuid;

use super::WorkflowProcess;
use crate::errors::CoreEngineError;
use crate::graph::ProcessDefinition;
use crate::instance::WorkflowInstance;

/// Contrato de persistencia del motor.
///
/// Las escrituras reciben el estado YA avanzado de la instancia; el motor
/// sólo lo confirma en memoria si la llamada retorna `Ok`.
pub trait PersistenceGateway {
    /// Registra la creación de `instance` (en `Start`, `Running`).
    fn start(&mut self, definition: &ProcessDefinition, instance: &WorkflowInstance) -> Result<(), CoreEngineError>;

    /// Persiste el registro del salto y el nuevo estado de la instancia en
    /// una misma unidad de trabajo.
    fn processing(&mut self, process: &WorkflowProcess, instance: &WorkflowInstance) -> Result<(), CoreEngineError>;

    /// Escribe un cambio de estado sin recorrido del grafo.
    fn update_status(&mut self, instance: &WorkflowInstance) -> Result<(), CoreEngineError>;

    fn kill(&mut self, instance: &WorkflowInstance) -> Result<(), CoreEngineError> {
        self.update_status(instance)
    }

    fn terminate(&mut self, instance: &WorkflowInstance) -> Result<(), CoreEngineError> {
        self.update_status(instance)
    }

    fn revert(&mut self, instance: &WorkflowInstance) -> Result<(), CoreEngineError> {
        self.update_status(instance)
    }

    fn instance(&self, instance_id: Uuid) -> Result<Option<WorkflowInstance>, CoreEngineError>;

    /// Registros de la instancia en orden de persistencia.
    fn processes(&self, instance_id: Uuid) -> Result<Vec<WorkflowProcess>, CoreEngineError>;
}
