//! Modelos neutrales del grafo de proceso (Node, Transition, Rule, Command)
//! y la bolsa de datos que acompaña cada salto.

pub mod data;
pub mod node;
pub mod transition;

pub use data::ProcessData;
pub use node::{ActorId, Node, NodeId, NodeKind};
pub use transition::{Command, Rule, Transition};
