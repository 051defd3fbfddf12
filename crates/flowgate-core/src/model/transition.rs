use serde::{Deserialize, Serialize};

use super::node::NodeId;

/// Arista dirigida del grafo. `tid` es el token que usan los llamadores para
/// pedir el salto.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transition {
    pub tid: String,
    #[serde(default)]
    pub name: String,
    /// Nodo origen (lo completa el builder a partir del nodo dueño).
    #[serde(default)]
    pub from: NodeId,
    pub to: NodeId,
}

impl Transition {
    pub fn new(tid: impl Into<String>, from: NodeId, to: NodeId) -> Self {
        Self { tid: tid.into(),
               name: String::new(),
               from,
               to }
    }
}

/// Regla de un nodo `Decision`: si `condition` se cumple se sigue la
/// transición saliente `transition` (por `tid`). Primera coincidencia gana.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rule {
    #[serde(default)]
    pub name: String,
    pub condition: String,
    pub transition: String,
}

impl Rule {
    pub fn new(condition: impl Into<String>, transition: impl Into<String>) -> Self {
        Self { name: String::new(),
               condition: condition.into(),
               transition: transition.into() }
    }
}

/// Acción opaca asociada a un nodo. El core no la interpreta: la ejecuta un
/// `CommandExecutor` provisto por el host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Command {
    #[serde(default)]
    pub connection: String,
    pub text: String,
}
