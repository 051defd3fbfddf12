//! flowgate-rust
//!
//! Piezas del host alrededor del motor `flowgate-core`:
//! - `config`: configuración desde entorno / `.env`.
//! - `errors`: errores de la aplicación.
//! - `host`: locks por instancia para serializar saltos concurrentes.
//! - `loader`: carga de definiciones JSON.

pub mod config;
pub mod errors;
pub mod host;
pub mod loader;

pub use config::{app_config, AppConfig};
pub use errors::AppError;
pub use host::InstanceLocks;
