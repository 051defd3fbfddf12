//! Motor de ejecución.
//!
//! `WorkflowEngine` orquesta un salto de punta a punta: autorización,
//! resolución de la cadena de decisiones, persistencia (antes de confirmar el
//! puntero en memoria) y notificación de observadores.

pub mod authorization;
pub mod builder;
pub mod config;
pub mod context;
pub mod core;
pub mod request;

pub use authorization::{AllowAll, AuthorizationPolicy, NodeActorPolicy};
pub use builder::{EngineBuilder, EngineBuilderInit};
pub use config::EngineConfig;
pub use context::ExecutingContext;
pub use core::WorkflowEngine;
pub use request::{JumpOutcome, JumpRequest};
