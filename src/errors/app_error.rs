use flowgate_core::CoreEngineError;
use flowgate_persistence::PersistenceError;
use thiserror::Error;

/// Errores de la aplicación host (configuración, carga y motor).
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Error de configuración: {0}")]
    Config(String),
    #[error("Definición inválida: {0}")]
    Definition(String),
    #[error(transparent)]
    Engine(#[from] CoreEngineError),
    #[error(transparent)]
    Persistence(#[from] PersistenceError),
    #[error("Error en IO: {0}")]
    Io(#[from] std::io::Error),
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Definition(err.to_string())
    }
}
