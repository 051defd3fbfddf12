//! Punto de extensión de autorización (`CheckAuthorization`).

use crate::instance::WorkflowInstance;
use crate::model::{ActorId, Node};

/// Decide si `actor` puede hacer avanzar `instance` desde su nodo actual.
/// Un `false` hace del salto un no-op (`JumpOutcome::Denied`).
pub trait AuthorizationPolicy: Send + Sync {
    fn check_authorization(&self, instance: &WorkflowInstance, current: &Node, actor: ActorId) -> bool;
}

/// Política por defecto: delega en los actores declarados por el nodo actual.
#[derive(Debug, Default, Clone, Copy)]
pub struct NodeActorPolicy;

impl AuthorizationPolicy for NodeActorPolicy {
    fn check_authorization(&self, _instance: &WorkflowInstance, current: &Node, actor: ActorId) -> bool {
        current.check_actor(actor)
    }
}

/// Acepta cualquier actor.
#[derive(Debug, Default, Clone, Copy)]
pub struct AllowAll;

impl AuthorizationPolicy for AllowAll {
    fn check_authorization(&self, _instance: &WorkflowInstance, _current: &Node, _actor: ActorId) -> bool {
        true
    }
}

impl<F> AuthorizationPolicy for F
    where F: Fn(&WorkflowInstance, &Node, ActorId) -> bool + Send + Sync
{
    fn check_authorization(&self, instance: &WorkflowInstance, current: &Node, actor: ActorId) -> bool {
        self(instance, current, actor)
    }
}
