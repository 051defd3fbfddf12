//! Builder y validación de `ProcessDefinition`.
//!
//! Reglas que se verifican al construir:
//! - ids de nodo únicos;
//! - exactamente un nodo `Start` y al menos un `End`;
//! - todo destino de transición existe;
//! - sólo los nodos `Decision` llevan reglas, y todo `Decision` lleva al
//!   menos una;
//! - cada regla apunta a una transición saliente de su propio nodo.
//!
//! Los ciclos entre decisiones no se rechazan aquí (dependen de los datos);
//! el motor los corta con `max_decision_hops`.

use indexmap::IndexMap;

use super::definition::{DefinitionDocument, ProcessDefinition};
use crate::errors::CoreEngineError;
use crate::hashing::hash_value;
use crate::model::{Node, NodeKind};

#[derive(Debug, Default)]
pub struct ProcessDefinitionBuilder {
    id: String,
    name: String,
    nodes: Vec<Node>,
}

impl ProcessDefinitionBuilder {
    pub fn new(id: impl Into<String>) -> Self {
        Self { id: id.into(),
               ..Default::default() }
    }

    pub fn from_document(doc: DefinitionDocument) -> Self {
        Self { id: doc.id,
               name: doc.name,
               nodes: doc.nodes }
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    #[inline]
    pub fn node(mut self, node: Node) -> Self {
        self.nodes.push(node);
        self
    }

    pub fn build(self) -> Result<ProcessDefinition, CoreEngineError> {
        let invalid = |msg: String| CoreEngineError::InvalidDefinition(msg);
        let mut nodes: IndexMap<i64, Node> = IndexMap::with_capacity(self.nodes.len());
        for mut node in self.nodes {
            for t in node.transitions.iter_mut() {
                t.from = node.id;
            }
            if nodes.contains_key(&node.id) {
                return Err(invalid(format!("duplicate node id {}", node.id)));
            }
            nodes.insert(node.id, node);
        }

        let starts: Vec<i64> = nodes.values().filter(|n| n.kind == NodeKind::Start).map(|n| n.id).collect();
        let start = match starts.as_slice() {
            [only] => *only,
            [] => return Err(invalid("missing start node".into())),
            _ => return Err(invalid(format!("more than one start node: {starts:?}"))),
        };
        if !nodes.values().any(|n| n.kind == NodeKind::End) {
            return Err(invalid("missing end node".into()));
        }

        for node in nodes.values() {
            for t in &node.transitions {
                if !nodes.contains_key(&t.to) {
                    return Err(invalid(format!("transition '{}' of node {} targets unknown node {}", t.tid, node.id, t.to)));
                }
            }
            match node.kind {
                NodeKind::Decision if node.rules.is_empty() => {
                    return Err(invalid(format!("decision node {} has no rules", node.id)));
                }
                NodeKind::Decision => {
                    for r in &node.rules {
                        if node.transition(&r.transition).is_none() {
                            return Err(invalid(format!("rule '{}' of node {} references unknown transition '{}'",
                                                       r.condition, node.id, r.transition)));
                        }
                    }
                }
                _ if !node.rules.is_empty() => {
                    return Err(invalid(format!("only decision nodes may carry rules (node {})", node.id)));
                }
                _ => {}
            }
        }

        let doc = DefinitionDocument { id: self.id.clone(),
                                       name: self.name.clone(),
                                       nodes: nodes.values().cloned().collect() };
        let doc_json = serde_json::to_value(&doc).map_err(|e| CoreEngineError::Internal(format!("definition encode: {e}")))?;
        let definition_hash = hash_value(&doc_json);

        Ok(ProcessDefinition { id: self.id,
                               name: self.name,
                               nodes,
                               start,
                               definition_hash })
    }
}

impl ProcessDefinition {
    /// Atajo: valida un documento ya parseado.
    pub fn from_document(doc: DefinitionDocument) -> Result<Self, CoreEngineError> {
        ProcessDefinitionBuilder::from_document(doc).build()
    }
}
