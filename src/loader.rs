//! Carga de definiciones desde JSON.

use std::fs;
use std::path::Path;

use flowgate_core::{DefinitionDocument, InMemoryDefinitionSource, ProcessDefinition};

use crate::errors::AppError;

pub fn parse_definition(raw: &str) -> Result<ProcessDefinition, AppError> {
    let doc: DefinitionDocument = serde_json::from_str(raw)?;
    Ok(ProcessDefinition::from_document(doc)?)
}

pub fn load_definition(path: &Path) -> Result<ProcessDefinition, AppError> {
    parse_definition(&fs::read_to_string(path)?)
}

/// Registra todos los `*.json` de un directorio.
pub fn load_directory(dir: &Path) -> Result<InMemoryDefinitionSource, AppError> {
    let mut source = InMemoryDefinitionSource::new();
    let mut paths: Vec<_> = fs::read_dir(dir)?.filter_map(|e| e.ok().map(|e| e.path()))
                                              .filter(|p| p.extension().is_some_and(|ext| ext == "json"))
                                              .collect();
    paths.sort();
    for path in paths {
        let def = load_definition(&path).map_err(|e| AppError::Definition(format!("{}: {e}", path.display())))?;
        log::info!("registered definition '{}' from {}", def.id(), path.display());
        source.register(def);
    }
    Ok(source)
}
