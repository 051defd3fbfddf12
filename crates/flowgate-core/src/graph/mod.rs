//! Modelo del grafo de proceso: definición inmutable, builder con validación
//! y fuente de definiciones (colaborador externo).

pub mod builder;
pub mod definition;
pub mod source;

pub use builder::ProcessDefinitionBuilder;
pub use definition::{DefinitionDocument, ProcessDefinition};
pub use source::{DefinitionSource, InMemoryDefinitionSource};
