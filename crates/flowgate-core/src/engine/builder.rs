//! Builder para `WorkflowEngine`.
//!
//! Inyección explícita de dependencias en dos etapas:
//! - `EngineBuilderInit` contiene los colaboradores obligatorios de datos
//!   (gateway de persistencia + fuente de definiciones).
//! - `evaluator(..)` fija el evaluador de condiciones (obligatorio) y pasa a
//!   `EngineBuilder`, donde el resto es opcional.
//!
//! ```ignore
//! let engine = WorkflowEngine::builder(InMemoryGateway::new(), source)
//!     .evaluator(ExpressionEvaluator::new())
//!     .authorization(AllowAll)
//!     .max_decision_hops(8)
//!     .build();
//! ```

use crate::decision::{CommandExecutor, ConditionEvaluator};
use crate::engine::{AuthorizationPolicy, EngineConfig, NodeActorPolicy, WorkflowEngine};
use crate::event::Observers;
use crate::gateway::PersistenceGateway;
use crate::graph::DefinitionSource;

/// Estado inicial del builder.
#[derive(Debug)]
pub struct EngineBuilderInit<G: PersistenceGateway, S: DefinitionSource> {
    pub gateway: G,
    pub definitions: S,
}

impl<G: PersistenceGateway, S: DefinitionSource> EngineBuilderInit<G, S> {
    /// Fija el evaluador de condiciones y transiciona al builder completo.
    #[inline]
    pub fn evaluator<C>(self, evaluator: C) -> EngineBuilder<G, S>
        where C: ConditionEvaluator + 'static
    {
        EngineBuilder { gateway: self.gateway,
                        definitions: self.definitions,
                        evaluator: Box::new(evaluator),
                        authorization: Box::new(NodeActorPolicy),
                        commands: None,
                        config: EngineConfig::default() }
    }
}

/// Builder principal. La autorización por defecto es `NodeActorPolicy`.
pub struct EngineBuilder<G: PersistenceGateway, S: DefinitionSource> {
    gateway: G,
    definitions: S,
    evaluator: Box<dyn ConditionEvaluator>,
    authorization: Box<dyn AuthorizationPolicy>,
    commands: Option<Box<dyn CommandExecutor>>,
    config: EngineConfig,
}

impl<G: PersistenceGateway, S: DefinitionSource> EngineBuilder<G, S> {
    /// Reemplaza la política de autorización.
    pub fn authorization<A>(mut self, policy: A) -> Self
        where A: AuthorizationPolicy + 'static
    {
        self.authorization = Box::new(policy);
        self
    }

    /// Ejecutor de `Command` para nodos de decisión.
    pub fn command_executor<X>(mut self, executor: X) -> Self
        where X: CommandExecutor + 'static
    {
        self.commands = Some(Box::new(executor));
        self
    }

    pub fn config(mut self, config: EngineConfig) -> Self {
        self.config = config;
        self
    }

    pub fn max_decision_hops(mut self, hops: usize) -> Self {
        self.config.max_decision_hops = hops;
        self
    }

    pub fn enforce_transitions(mut self, enforce: bool) -> Self {
        self.config.enforce_transitions = enforce;
        self
    }

    #[inline]
    pub fn build(self) -> WorkflowEngine<G, S> {
        WorkflowEngine { gateway: self.gateway,
                         definitions: self.definitions,
                         evaluator: self.evaluator,
                         authorization: self.authorization,
                         commands: self.commands,
                         observers: Observers::new(),
                         config: self.config }
    }
}
