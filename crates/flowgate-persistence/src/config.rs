//! Configuración de conexión desde variables de entorno (`DATABASE_URL` y
//! tamaños opcionales del pool). Un `.env` se carga una sola vez.

use std::env;

use dotenvy::dotenv;
use once_cell::sync::Lazy;

use crate::error::PersistenceError;

static DOTENV_LOADED: Lazy<()> = Lazy::new(|| {
    let _ = dotenv();
});

pub const DEFAULT_MIN_CONNECTIONS: u32 = 2;
pub const DEFAULT_MAX_CONNECTIONS: u32 = 16;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DbConfig {
    pub url: String,
    pub min_connections: u32,
    pub max_connections: u32,
}

impl DbConfig {
    pub fn from_env() -> Result<Self, PersistenceError> {
        init_dotenv();
        let url = env::var("DATABASE_URL").map_err(|_| PersistenceError::Config("DATABASE_URL not set".into()))?;
        Ok(Self::with_url(url))
    }

    /// Usa `url` y toma los tamaños del pool del entorno (o los defaults).
    pub fn with_url(url: impl Into<String>) -> Self {
        init_dotenv();
        Self { url: url.into(),
               min_connections: env_u32("DATABASE_MIN_CONNECTIONS").unwrap_or(DEFAULT_MIN_CONNECTIONS),
               max_connections: env_u32("DATABASE_MAX_CONNECTIONS").unwrap_or(DEFAULT_MAX_CONNECTIONS) }
    }
}

fn env_u32(key: &str) -> Option<u32> {
    env::var(key).ok().and_then(|v| v.trim().parse().ok())
}

pub fn init_dotenv() {
    Lazy::force(&DOTENV_LOADED);
}
