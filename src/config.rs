//! Configuración central de la aplicación.
//!
//! Lee variables de entorno (y `.env` si existe) una sola vez y expone una
//! estructura inmutable (`app_config()`):
//! - `FLOWGATE_MAX_DECISION_HOPS` (entero positivo, default 32)
//! - `FLOWGATE_ENFORCE_TRANSITIONS` (`true/false/1/0/yes/no/on/off`)
//! - `DATABASE_URL` opcional; sin ella el host usa el gateway en memoria.

use std::env;

use flowgate_core::constants::DEFAULT_MAX_DECISION_HOPS;
use flowgate_core::EngineConfig;
use flowgate_persistence::config::{DEFAULT_MAX_CONNECTIONS, DEFAULT_MIN_CONNECTIONS};
use flowgate_persistence::DbConfig;
use once_cell::sync::Lazy;

use crate::errors::AppError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub engine: EngineConfig,
    /// `None` si no hay `DATABASE_URL`.
    pub database: Option<DbConfig>,
}

static CONFIG: Lazy<Result<AppConfig, String>> = Lazy::new(|| AppConfig::from_env().map_err(|e| e.to_string()));

/// Configuración global, evaluada una sola vez.
pub fn app_config() -> Result<&'static AppConfig, AppError> {
    CONFIG.as_ref().map_err(|msg| AppError::Config(msg.clone()))
}

impl AppConfig {
    pub fn from_env() -> Result<Self, AppError> {
        flowgate_persistence::init_dotenv();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Igual que `from_env` pero con una fuente de variables arbitraria.
    pub fn from_lookup<F>(get: F) -> Result<Self, AppError>
        where F: Fn(&str) -> Option<String>
    {
        let max_decision_hops = match get("FLOWGATE_MAX_DECISION_HOPS") {
            None => DEFAULT_MAX_DECISION_HOPS,
            Some(raw) => match raw.trim().parse::<usize>() {
                Ok(n) if n > 0 => n,
                _ => {
                    return Err(AppError::Config(format!("FLOWGATE_MAX_DECISION_HOPS must be a positive integer, got '{raw}'")))
                }
            },
        };
        let enforce_transitions = match get("FLOWGATE_ENFORCE_TRANSITIONS") {
            None => false,
            Some(raw) => parse_flag(&raw).ok_or_else(|| {
                                             AppError::Config(format!("FLOWGATE_ENFORCE_TRANSITIONS must be a boolean, got '{raw}'"))
                                         })?,
        };
        let database = get("DATABASE_URL").filter(|u| !u.trim().is_empty()).map(|url| {
                                               let size = |key: &str, default: u32| {
                                                   get(key).and_then(|v| v.trim().parse().ok()).unwrap_or(default)
                                               };
                                               DbConfig { url,
                                                          min_connections: size("DATABASE_MIN_CONNECTIONS",
                                                                                DEFAULT_MIN_CONNECTIONS),
                                                          max_connections: size("DATABASE_MAX_CONNECTIONS",
                                                                                DEFAULT_MAX_CONNECTIONS) }
                                           });
        Ok(Self { engine: EngineConfig { max_decision_hops,
                                         enforce_transitions },
                  database })
    }
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
