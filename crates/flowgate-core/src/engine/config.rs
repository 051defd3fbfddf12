use serde::{Deserialize, Serialize};

use crate::constants::DEFAULT_MAX_DECISION_HOPS;

/// Parámetros del motor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Máximo de nodos `Decision` atravesados en un solo `jump`. Superarlo
    /// produce `RoutingLoop`.
    pub max_decision_hops: usize,
    /// Si es `true`, el destino pedido debe corresponder a una transición
    /// saliente del nodo actual con el `tid` del pedido.
    pub enforce_transitions: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self { max_decision_hops: DEFAULT_MAX_DECISION_HOPS,
               enforce_transitions: false }
    }
}
