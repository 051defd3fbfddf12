use serde::{Deserialize, Serialize};

use crate::engine::ExecutingContext;

/// Conjunto cerrado de tipos de evento suscribibles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventKind {
    /// Salto realizado hacia un nodo no terminal.
    Progressed,
    /// Salto que alcanzó un nodo `End`. Se emite una única vez por instancia.
    Completed,
}

#[derive(Debug, Clone)]
pub enum EngineEvent {
    Progressed(ExecutingContext),
    Completed(ExecutingContext),
}

impl EngineEvent {
    /// Evento correspondiente al destino del contexto.
    pub fn for_context(ctx: ExecutingContext) -> Self {
        if ctx.to.is_end() {
            EngineEvent::Completed(ctx)
        } else {
            EngineEvent::Progressed(ctx)
        }
    }

    pub fn kind(&self) -> EventKind {
        match self {
            EngineEvent::Progressed(_) => EventKind::Progressed,
            EngineEvent::Completed(_) => EventKind::Completed,
        }
    }

    pub fn context(&self) -> &ExecutingContext {
        match self {
            EngineEvent::Progressed(ctx) | EngineEvent::Completed(ctx) => ctx,
        }
    }
}
