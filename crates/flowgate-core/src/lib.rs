//! flowgate-core: motor de ejecución de procesos de aprobación.
//!
//! Avanza instancias sobre un grafo de nodos (`Start`, `Activity`,
//! `Decision`, `End`) a partir de pedidos de salto externos, con control de
//! autorización, resolución transparente de decisiones y registro de cada
//! transición realizada en un gateway de persistencia.

pub mod constants;
pub mod decision;
pub mod engine;
pub mod errors;
pub mod event;
pub mod gateway;
pub mod graph;
pub mod hashing;
pub mod instance;
pub mod model;

pub use decision::{CommandExecutor, ConditionEvaluator, DecisionResolver};
pub use engine::{AllowAll, AuthorizationPolicy, EngineConfig, ExecutingContext, JumpOutcome, JumpRequest, NodeActorPolicy,
                 WorkflowEngine};
pub use errors::CoreEngineError;
pub use event::{EngineEvent, EventKind, Observers, SubscriptionId};
pub use gateway::{InMemoryGateway, PersistenceGateway, ProcessHistory, WorkflowProcess};
pub use graph::{DefinitionDocument, DefinitionSource, InMemoryDefinitionSource, ProcessDefinition, ProcessDefinitionBuilder};
pub use instance::{InstanceStatus, WorkflowInstance};
pub use model::{ActorId, Command, Node, NodeId, NodeKind, ProcessData, Rule, Transition};
