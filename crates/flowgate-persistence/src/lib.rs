//! flowgate-persistence
//!
//! Implementación Postgres del `PersistenceGateway` de `flowgate-core`,
//! con paridad respecto al `InMemoryGateway`.
//!
//! Módulos:
//! - `pg`: gateway Diesel, pool r2d2 y mapeo filas ↔ dominio.
//! - `migrations`: runner embebido de migraciones Diesel.
//! - `config`: configuración desde entorno / `.env`.
//! - `schema`: tablas Diesel.

pub mod config;
pub mod error;
pub mod migrations;
pub mod pg;
pub mod schema;

pub use config::{init_dotenv, DbConfig};
pub use error::PersistenceError;
pub use pg::{build_dev_pool_from_env, build_pool, ConnectionProvider, PgGateway, PgPool, PoolProvider};
