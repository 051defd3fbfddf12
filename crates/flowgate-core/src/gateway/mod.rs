//! Gateway de persistencia (colaborador externo) y vistas derivadas.
//!
//! El motor llama al gateway de forma síncrona y lo trata como autoridad:
//! cada llamada debe ser durable al retornar. `InMemoryGateway` es la
//! implementación de referencia; `flowgate-persistence` provee Postgres.

mod history;
mod memory;
mod process;
mod traits;

pub use history::ProcessHistory;
pub use memory::InMemoryGateway;
pub use process::WorkflowProcess;
pub use traits::PersistenceGateway;
