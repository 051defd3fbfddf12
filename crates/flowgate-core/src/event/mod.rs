//! Notificaciones del motor.
//!
//! Un salto realizado emite exactamente un evento: `Progressed` si el destino
//! no es `End`, `Completed` si lo es. Los observadores se suscriben por tipo.

mod observers;
mod types;

pub use observers::{Observers, SubscriptionId};
pub use types::{EngineEvent, EventKind};
