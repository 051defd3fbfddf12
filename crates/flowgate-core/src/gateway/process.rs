use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::model::{ActorId, NodeId, NodeKind, ProcessData};

/// Registro de auditoría de un salto realizado (origen y destino no
/// `Decision`; las decisiones atravesadas no se registran).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkflowProcess {
    /// `nid` del nodo destino.
    pub rnid: String,
    pub from: NodeId,
    pub to: NodeId,
    pub tid: String,
    pub instance_id: Uuid,
    /// Tipo del nodo ORIGEN.
    pub node_type: NodeKind,
    pub actor_id: ActorId,
    pub data: ProcessData,
    pub created_at: DateTime<Utc>,
}
