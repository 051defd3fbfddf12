//! Fuente de definiciones de proceso (colaborador externo).
//!
//! El core nunca parsea documentos: recibe definiciones ya construidas.

use std::collections::HashMap;
use std::sync::Arc;

use super::definition::ProcessDefinition;
use crate::errors::CoreEngineError;

pub trait DefinitionSource {
    /// Falla con `DefinitionNotFound` si el id no está registrado.
    fn get_definition(&self, definition_id: &str) -> Result<Arc<ProcessDefinition>, CoreEngineError>;
}

/// Registro en memoria: cada definición se carga una vez y se comparte.
#[derive(Debug, Default, Clone)]
pub struct InMemoryDefinitionSource {
    inner: HashMap<String, Arc<ProcessDefinition>>,
}

impl InMemoryDefinitionSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, definition: ProcessDefinition) -> Arc<ProcessDefinition> {
        let def = Arc::new(definition);
        self.inner.insert(def.id().to_string(), Arc::clone(&def));
        def
    }

    pub fn with(mut self, definition: ProcessDefinition) -> Self {
        self.register(definition);
        self
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.inner.keys().map(String::as_str)
    }
}

impl DefinitionSource for InMemoryDefinitionSource {
    fn get_definition(&self, definition_id: &str) -> Result<Arc<ProcessDefinition>, CoreEngineError> {
        self.inner
            .get(definition_id)
            .cloned()
            .ok_or_else(|| CoreEngineError::DefinitionNotFound(definition_id.to_string()))
    }
}
