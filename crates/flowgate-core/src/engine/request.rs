use serde::{Deserialize, Serialize};

use crate::constants::UNSET_ACTOR;
use crate::instance::InstanceStatus;
use crate::model::{ActorId, NodeId, ProcessData};

/// Pedido de salto.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JumpRequest {
    /// Token de la arista que el llamador pretende recorrer.
    pub transition_id: String,
    /// Nodo destino pedido (puede ser un `Decision`).
    pub to: NodeId,
    #[serde(default)]
    pub actor_id: ActorId,
    #[serde(default)]
    pub data: ProcessData,
}

impl JumpRequest {
    pub fn new(transition_id: impl Into<String>, to: NodeId) -> Self {
        Self { transition_id: transition_id.into(),
               to,
               actor_id: UNSET_ACTOR,
               data: ProcessData::new() }
    }

    pub fn actor(mut self, actor_id: ActorId) -> Self {
        self.actor_id = actor_id;
        self
    }

    pub fn data(mut self, data: ProcessData) -> Self {
        self.data = data;
        self
    }
}

/// Resultado de un `jump` que no falló.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum JumpOutcome {
    /// Salto persistido hacia un nodo no terminal.
    Progressed { to: NodeId },
    /// Salto persistido hacia un nodo `End`; la instancia quedó en `End`.
    Completed { to: NodeId },
    /// La política de autorización rechazó al actor.
    Denied,
    /// Ninguna regla del nodo `decision` se cumplió.
    NoRoute { decision: NodeId },
    /// La instancia no está `Running`.
    NotRunning { status: InstanceStatus },
}

impl JumpOutcome {
    /// `true` si el salto se persistió y notificó.
    pub fn is_realized(&self) -> bool {
        matches!(self, JumpOutcome::Progressed { .. } | JumpOutcome::Completed { .. })
    }
}
