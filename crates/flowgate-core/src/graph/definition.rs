//! Definición inmutable de un proceso.
//!
//! Se construye una vez por definición (ver `ProcessDefinitionBuilder`) y se
//! comparte vía `Arc` entre todas las instancias. El motor sólo hace lookups.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::errors::CoreEngineError;
use crate::model::{Node, NodeId};

/// Forma serializable de una definición (lo que entrega la fuente externa ya
/// parseado). No está validada.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DefinitionDocument {
    pub id: String,
    #[serde(default)]
    pub name: String,
    pub nodes: Vec<Node>,
}

#[derive(Debug, Clone)]
pub struct ProcessDefinition {
    pub(crate) id: String,
    pub(crate) name: String,
    pub(crate) nodes: IndexMap<NodeId, Node>,
    pub(crate) start: NodeId,
    pub(crate) definition_hash: String,
}

impl ProcessDefinition {
    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Hash estable (blake3 sobre JSON canónico) del documento de origen.
    pub fn definition_hash(&self) -> &str {
        &self.definition_hash
    }

    /// Lookup de sólo lectura. Falla con `NodeNotFound` si el id no existe.
    pub fn get_node(&self, id: NodeId) -> Result<&Node, CoreEngineError> {
        self.nodes.get(&id).ok_or(CoreEngineError::NodeNotFound(id))
    }

    pub fn start_node(&self) -> &Node {
        // `start` se valida al construir
        &self.nodes[&self.start]
    }

    /// Nodos en orden de declaración.
    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.nodes.values()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn to_document(&self) -> DefinitionDocument {
        DefinitionDocument { id: self.id.clone(),
                             name: self.name.clone(),
                             nodes: self.nodes.values().cloned().collect() }
    }
}
