//! Resolución de nodos `Decision`.
//!
//! - `ConditionEvaluator`: colaborador que evalúa una condición contra la
//!   bolsa de datos del salto.
//! - `CommandExecutor`: colaborador opcional que ejecuta el `Command` de un
//!   nodo de decisión y aporta datos para sus reglas.
//! - `DecisionResolver`: recorre las reglas en orden y devuelve la primera
//!   transición cuya condición se cumple.

mod command;
mod evaluator;
mod resolver;

pub use command::CommandExecutor;
pub use evaluator::ConditionEvaluator;
pub use resolver::DecisionResolver;
