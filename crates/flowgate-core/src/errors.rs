//! Errores específicos del core.
//!
//! Todas las operaciones públicas del motor devuelven `CoreEngineError`. Las
//! negaciones de autorización y los callejones sin salida de una decisión NO
//! son errores: se reportan como `JumpOutcome` (ver `engine`).

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::instance::InstanceStatus;
use crate::model::NodeId;

#[derive(Debug, Error, PartialEq, Eq, Clone, Serialize, Deserialize)]
pub enum CoreEngineError {
    #[error("node {0} not found in definition")]
    NodeNotFound(NodeId),
    #[error("workflow instance {0} not found")]
    InstanceNotFound(String),
    #[error("process definition '{0}' not found")]
    DefinitionNotFound(String),
    #[error("invalid process definition: {0}")]
    InvalidDefinition(String),
    #[error("no transition '{tid}' from node {from} to node {to}")]
    InvalidTransition { tid: String, from: NodeId, to: NodeId },
    #[error("instance is {from:?}, cannot move to {to:?}")]
    InvalidState { from: InstanceStatus, to: InstanceStatus },
    /// El estado persistido ya no es el que el llamador leyó: otro escritor
    /// movió la instancia o el mismo salto ya fue registrado.
    #[error("instance {instance} is no longer running at node {expected}")]
    StaleInstance { instance: String, expected: NodeId },
    #[error("decision chain exceeded {max_hops} hops (last decision node {last})")]
    RoutingLoop { max_hops: usize, last: NodeId },
    #[error("condition evaluation failed: {0}")]
    Evaluation(String),
    #[error("persistence failure: {0}")]
    Persistence(String),
    #[error("internal: {0}")]
    Internal(String),
}

/// Clasificación gruesa de errores para hosts que deciden reintentar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorClass {
    /// Entrada inválida o referencia inexistente: reintentar no ayuda.
    Validation,
    /// Configuración del grafo (ciclos, reglas) que debe corregirse.
    Definition,
    /// Falla de un colaborador externo; un reintento puede tener éxito.
    Transient,
    /// Error interno del motor.
    Runtime,
}

pub fn classify_error(err: &CoreEngineError) -> ErrorClass {
    match err {
        CoreEngineError::NodeNotFound(_)
        | CoreEngineError::InstanceNotFound(_)
        | CoreEngineError::DefinitionNotFound(_)
        | CoreEngineError::InvalidTransition { .. }
        | CoreEngineError::InvalidState { .. }
        | CoreEngineError::StaleInstance { .. } => ErrorClass::Validation,
        CoreEngineError::InvalidDefinition(_) | CoreEngineError::RoutingLoop { .. } | CoreEngineError::Evaluation(_) => {
            ErrorClass::Definition
        }
        CoreEngineError::Persistence(_) => ErrorClass::Transient,
        CoreEngineError::Internal(_) => ErrorClass::Runtime,
    }
}
