use std::fmt;

use super::{EngineEvent, EventKind};
use crate::engine::ExecutingContext;

type Callback = Box<dyn Fn(&ExecutingContext) + Send + Sync>;

/// Handle devuelto por `subscribe`, sirve para cancelar la suscripción.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

/// Registro de observadores. Despacha en orden de suscripción y sólo a los
/// suscritos al tipo del evento.
#[derive(Default)]
pub struct Observers {
    next_id: u64,
    subscribers: Vec<(SubscriptionId, EventKind, Callback)>,
}

impl Observers {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe<F>(&mut self, kind: EventKind, callback: F) -> SubscriptionId
        where F: Fn(&ExecutingContext) + Send + Sync + 'static
    {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.subscribers.push((id, kind, Box::new(callback)));
        id
    }

    /// Devuelve `true` si la suscripción existía.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.subscribers.len();
        self.subscribers.retain(|(sid, _, _)| *sid != id);
        before != self.subscribers.len()
    }

    pub fn notify(&self, event: &EngineEvent) {
        let kind = event.kind();
        for (_, _, cb) in self.subscribers.iter().filter(|(_, k, _)| *k == kind) {
            cb(event.context());
        }
    }

    pub fn len(&self) -> usize {
        self.subscribers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.subscribers.is_empty()
    }
}

impl fmt::Debug for Observers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Observers").field("subscribers", &self.subscribers.len()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::ProcessDefinitionBuilder;
    use crate::instance::WorkflowInstance;
    use crate::model::{Node, NodeKind, ProcessData};
    use std::sync::{Arc, Mutex};

    fn ctx(to_kind: NodeKind) -> ExecutingContext {
        let def = ProcessDefinitionBuilder::new("p").node(Node::new(1, "s", NodeKind::Start))
                                                    .node(Node::new(2, "e", NodeKind::End))
                                                    .build()
                                                    .unwrap();
        ExecutingContext { from: Node::new(1, "s", NodeKind::Start),
                           to: Node::new(2, "x", to_kind),
                           transition_id: "t".into(),
                           instance: WorkflowInstance::new(&def),
                           data: ProcessData::new() }
    }

    #[test]
    fn dispatches_by_kind_in_subscription_order() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let mut obs = Observers::new();
        for (tag, kind) in [("p1", EventKind::Progressed), ("c1", EventKind::Completed), ("p2", EventKind::Progressed)] {
            let log = Arc::clone(&log);
            obs.subscribe(kind, move |_| log.lock().unwrap().push(tag));
        }

        obs.notify(&EngineEvent::for_context(ctx(NodeKind::Activity)));
        assert_eq!(*log.lock().unwrap(), vec!["p1", "p2"]);

        obs.notify(&EngineEvent::for_context(ctx(NodeKind::End)));
        assert_eq!(*log.lock().unwrap(), vec!["p1", "p2", "c1"]);
        assert_eq!(obs.len(), 3);
    }
}
