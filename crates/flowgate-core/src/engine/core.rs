//! Core WorkflowEngine implementation

use std::sync::Arc;

use chrono::Utc;
use log::{debug, info, warn};
use uuid::Uuid;

use crate::decision::{CommandExecutor, ConditionEvaluator, DecisionResolver};
use crate::engine::{AuthorizationPolicy, EngineBuilderInit, EngineConfig, ExecutingContext, JumpOutcome, JumpRequest};
use crate::errors::CoreEngineError;
use crate::event::{EngineEvent, EventKind, Observers, SubscriptionId};
use crate::gateway::{PersistenceGateway, ProcessHistory, WorkflowProcess};
use crate::graph::{DefinitionSource, ProcessDefinition};
use crate::instance::{InstanceStatus, WorkflowInstance};
use crate::model::{Node, NodeId, ProcessData};

/// Destino de una cadena de decisiones.
enum Resolution<'d> {
    /// Primer nodo no `Decision` alcanzado.
    Landed(&'d Node),
    /// Decisión sin regla aplicable.
    DeadEnd(NodeId),
}

/// Motor de ejecución de procesos.
///
/// Todas sus dependencias se inyectan al construirlo (ver `EngineBuilder`).
/// Es síncrono y no sincroniza instancias compartidas: el host debe
/// serializar los `jump` de una misma instancia.
pub struct WorkflowEngine<G, S>
    where G: PersistenceGateway,
          S: DefinitionSource
{
    pub(crate) gateway: G,
    pub(crate) definitions: S,
    pub(crate) evaluator: Box<dyn ConditionEvaluator>,
    pub(crate) authorization: Box<dyn AuthorizationPolicy>,
    pub(crate) commands: Option<Box<dyn CommandExecutor>>,
    pub(crate) observers: Observers,
    pub(crate) config: EngineConfig,
}

impl<G, S> WorkflowEngine<G, S>
    where G: PersistenceGateway,
          S: DefinitionSource
{
    /// Crea un builder a partir de los colaboradores obligatorios.
    #[inline]
    pub fn builder(gateway: G, definitions: S) -> EngineBuilderInit<G, S> {
        EngineBuilderInit { gateway, definitions }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn gateway(&self) -> &G {
        &self.gateway
    }

    pub fn gateway_mut(&mut self) -> &mut G {
        &mut self.gateway
    }

    pub fn definitions(&self) -> &S {
        &self.definitions
    }

    /// Registra un observador para un tipo de evento.
    pub fn subscribe<F>(&mut self, kind: EventKind, callback: F) -> SubscriptionId
        where F: Fn(&ExecutingContext) + Send + Sync + 'static
    {
        self.observers.subscribe(kind, callback)
    }

    /// Atajo de `subscribe(EventKind::Progressed, ..)`.
    pub fn on_process<F>(&mut self, callback: F) -> SubscriptionId
        where F: Fn(&ExecutingContext) + Send + Sync + 'static
    {
        self.subscribe(EventKind::Progressed, callback)
    }

    /// Atajo de `subscribe(EventKind::Completed, ..)`.
    pub fn on_completed<F>(&mut self, callback: F) -> SubscriptionId
        where F: Fn(&ExecutingContext) + Send + Sync + 'static
    {
        self.subscribe(EventKind::Completed, callback)
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.observers.unsubscribe(id)
    }

    /// Inicia una instancia de la definición y devuelve su id.
    pub fn start(&mut self, definition_id: &str) -> Result<Uuid, CoreEngineError> {
        self.start_instance(definition_id).map(|i| i.instance_id)
    }

    /// Igual que `start` pero devuelve la instancia creada.
    pub fn start_instance(&mut self, definition_id: &str) -> Result<WorkflowInstance, CoreEngineError> {
        let definition = self.definitions.get_definition(definition_id)?;
        let instance = WorkflowInstance::new(&definition);
        self.gateway.start(&definition, &instance)?;
        info!("start instance={} definition={} node={}",
              instance.instance_id,
              definition.id(),
              instance.current);
        Ok(instance)
    }

    /// Avanza `instance` según `request`.
    ///
    /// Garantías:
    /// - Si el resultado no es `Progressed`/`Completed` (o es un error), la
    ///   instancia queda intacta, no se persiste nada y no se notifica.
    /// - Las decisiones se atraviesan dentro de esta misma llamada: se
    ///   persiste un único registro, desde el nodo actual hasta el primer
    ///   nodo no `Decision` alcanzado.
    /// - El puntero en memoria sólo cambia después de que el gateway aceptó
    ///   el registro.
    pub fn jump(&mut self, instance: &mut WorkflowInstance, request: JumpRequest) -> Result<JumpOutcome, CoreEngineError> {
        if !instance.is_running() {
            debug!("jump:skip instance={} status={}", instance.instance_id, instance.status);
            return Ok(JumpOutcome::NotRunning { status: instance.status });
        }

        let definition = self.definition_for(instance)?;
        let from = definition.get_node(instance.current)?;

        if !self.authorization.check_authorization(instance, from, request.actor_id) {
            warn!("jump:denied instance={} node={} actor={}",
                  instance.instance_id,
                  from.id,
                  request.actor_id);
            return Ok(JumpOutcome::Denied);
        }

        if self.config.enforce_transitions
           && !from.transitions.iter().any(|t| t.tid == request.transition_id && t.to == request.to)
        {
            return Err(CoreEngineError::InvalidTransition { tid: request.transition_id,
                                                            from: from.id,
                                                            to: request.to });
        }

        let to = match self.resolve_target(&definition, instance, request.to, &request.data)? {
            Resolution::Landed(node) => node,
            Resolution::DeadEnd(decision) => {
                warn!("jump:no-route instance={} decision={}", instance.instance_id, decision);
                return Ok(JumpOutcome::NoRoute { decision });
            }
        };

        let status = if to.is_end() { InstanceStatus::End } else { InstanceStatus::Running };
        let next = instance.advanced(to.id, status);
        let process = WorkflowProcess { rnid: to.nid.clone(),
                                        from: from.id,
                                        to: to.id,
                                        tid: request.transition_id.clone(),
                                        instance_id: instance.instance_id,
                                        node_type: from.kind,
                                        actor_id: request.actor_id,
                                        data: request.data.clone(),
                                        created_at: Utc::now() };

        self.gateway.processing(&process, &next)?;
        *instance = next;
        info!("jump:done instance={} {} -> {} tid={} status={}",
              instance.instance_id,
              from.id,
              to.id,
              process.tid,
              instance.status);

        let ctx = ExecutingContext { from: from.clone(),
                                     to: to.clone(),
                                     transition_id: request.transition_id,
                                     instance: instance.clone(),
                                     data: request.data };
        self.observers.notify(&EngineEvent::for_context(ctx));

        Ok(if to.is_end() { JumpOutcome::Completed { to: to.id } } else { JumpOutcome::Progressed { to: to.id } })
    }

    /// Recorre la cadena de decisiones a partir de `target` como un bucle
    /// explícito acotado por `max_decision_hops`. No modifica nada.
    fn resolve_target<'d>(&self,
                          definition: &'d ProcessDefinition,
                          instance: &WorkflowInstance,
                          target: NodeId,
                          data: &ProcessData)
                          -> Result<Resolution<'d>, CoreEngineError> {
        let resolver = DecisionResolver::new(self.evaluator.as_ref());
        let max_hops = self.config.max_decision_hops;
        let mut node = definition.get_node(target)?;
        let mut hops = 0usize;

        while node.is_decision() {
            hops += 1;
            if hops > max_hops {
                return Err(CoreEngineError::RoutingLoop { max_hops, last: node.id });
            }
            debug!("decision hop={} instance={} node={}", hops, instance.instance_id, node.id);

            let enriched;
            let rule_data = match (&node.command, &self.commands) {
                (Some(command), Some(executor)) => {
                    let mut merged = data.clone();
                    merged.merge(executor.execute(command, instance, data)?);
                    enriched = merged;
                    &enriched
                }
                _ => data,
            };

            match resolver.resolve(node, rule_data)? {
                Some(tran) => node = definition.get_node(tran.to)?,
                None => return Ok(Resolution::DeadEnd(node.id)),
            }
        }
        Ok(Resolution::Landed(node))
    }

    /// `Running` -> `Terminated`.
    pub fn kill(&mut self, instance: &mut WorkflowInstance) -> Result<(), CoreEngineError> {
        self.change_status(instance, InstanceStatus::Terminated, |g, i| g.kill(i))
    }

    /// `Running` -> `Terminated` (se diferencia de `kill` sólo aguas abajo).
    pub fn terminate(&mut self, instance: &mut WorkflowInstance) -> Result<(), CoreEngineError> {
        self.change_status(instance, InstanceStatus::Terminated, |g, i| g.terminate(i))
    }

    /// `Running` -> `Reverted`.
    pub fn revert(&mut self, instance: &mut WorkflowInstance) -> Result<(), CoreEngineError> {
        self.change_status(instance, InstanceStatus::Reverted, |g, i| g.revert(i))
    }

    fn change_status<F>(&mut self, instance: &mut WorkflowInstance, status: InstanceStatus, write: F) -> Result<(), CoreEngineError>
        where F: FnOnce(&mut G, &WorkflowInstance) -> Result<(), CoreEngineError>
    {
        if !instance.status.can_transition_to(status) {
            return Err(CoreEngineError::InvalidState { from: instance.status,
                                                       to: status });
        }
        let next = instance.advanced(instance.current, status);
        write(&mut self.gateway, &next)?;
        info!("status instance={} {} -> {}", instance.instance_id, instance.status, status);
        *instance = next;
        Ok(())
    }

    /// Definición de la instancia. Si el grafo registrado bajo ese id ya no
    /// tiene el hash con el que arrancó la instancia, falla con
    /// `InvalidDefinition`.
    fn definition_for(&self, instance: &WorkflowInstance) -> Result<Arc<ProcessDefinition>, CoreEngineError> {
        let definition = self.definitions.get_definition(&instance.definition_id)?;
        if definition.definition_hash() != instance.definition_hash {
            warn!("definition changed instance={} definition={} started={} now={}",
                  instance.instance_id,
                  instance.definition_id,
                  instance.definition_hash,
                  definition.definition_hash());
            return Err(CoreEngineError::InvalidDefinition(format!("definition '{}' changed since instance {} started",
                                                                  instance.definition_id, instance.instance_id)));
        }
        Ok(definition)
    }

    /// Lookup vía gateway. Falla con `InstanceNotFound` si no existe.
    pub fn get_workflow_instance(&self, instance_id: Uuid) -> Result<WorkflowInstance, CoreEngineError> {
        self.gateway
            .instance(instance_id)?
            .ok_or_else(|| CoreEngineError::InstanceNotFound(instance_id.to_string()))
    }

    /// Historial persistido de una instancia.
    pub fn history(&self, instance_id: Uuid) -> Result<ProcessHistory, CoreEngineError> {
        let instance = self.get_workflow_instance(instance_id)?;
        let definition = self.definition_for(&instance)?;
        let records = self.gateway.processes(instance_id)?;
        Ok(ProcessHistory::new(definition.start_node().id, records))
    }
}
