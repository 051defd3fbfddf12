//! Serialización de saltos por instancia para hosts concurrentes.
//!
//! El motor no sincroniza: dos `jump` simultáneos sobre la misma instancia
//! podrían partir del mismo puntero. `InstanceLocks` entrega un mutex por
//! `instance_id`; cada worker (con su propio `WorkflowEngine` sobre un
//! gateway compartido) recarga la instancia DENTRO del lock antes de saltar.

use std::sync::{Arc, Mutex};

use dashmap::DashMap;
use flowgate_core::{DefinitionSource, JumpOutcome, JumpRequest, PersistenceGateway, WorkflowEngine, WorkflowInstance};
use log::debug;
use uuid::Uuid;

use crate::errors::AppError;

#[derive(Debug, Default, Clone)]
pub struct InstanceLocks {
    locks: Arc<DashMap<Uuid, Arc<Mutex<()>>>>,
}

impl InstanceLocks {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock_for(&self, instance_id: Uuid) -> Arc<Mutex<()>> {
        Arc::clone(self.locks.entry(instance_id).or_default().value())
    }

    /// Ejecuta `f` con el lock exclusivo de la instancia tomado.
    pub fn with_instance<F, R>(&self, instance_id: Uuid, f: F) -> R
        where F: FnOnce() -> R
    {
        let lock = self.lock_for(instance_id);
        let _guard = lock.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        f()
    }

    /// Recarga la instancia, arma el pedido a partir de su estado actual y
    /// salta, todo bajo el lock de la instancia.
    pub fn jump<G, S, F>(&self,
                         engine: &mut WorkflowEngine<G, S>,
                         instance_id: Uuid,
                         request: F)
                         -> Result<JumpOutcome, AppError>
        where G: PersistenceGateway,
              S: DefinitionSource,
              F: FnOnce(&WorkflowInstance) -> JumpRequest
    {
        self.with_instance(instance_id, || -> Result<JumpOutcome, AppError> {
                let mut instance = engine.get_workflow_instance(instance_id)?;
                let request = request(&instance);
                debug!("locked jump instance={} at={} tid={}",
                       instance_id,
                       instance.current,
                       request.transition_id);
                Ok(engine.jump(&mut instance, request)?)
            })
    }

    /// Olvida el lock de una instancia que ya no recibirá saltos.
    pub fn release(&self, instance_id: Uuid) -> bool {
        self.locks.remove(&instance_id).is_some()
    }

    pub fn len(&self) -> usize {
        self.locks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.locks.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn same_instance_shares_one_lock() {
        let locks = InstanceLocks::new();
        let id = Uuid::new_v4();
        assert!(Arc::ptr_eq(&locks.lock_for(id), &locks.lock_for(id)));
        assert_eq!(locks.len(), 1);
        assert!(locks.release(id));
        assert!(locks.is_empty());
    }

    #[test]
    fn critical_sections_do_not_overlap() {
        let locks = InstanceLocks::new();
        let id = Uuid::new_v4();
        let inside = Arc::new(AtomicUsize::new(0));
        let handles: Vec<_> = (0..8).map(|_| {
                                        let locks = locks.clone();
                                        let inside = Arc::clone(&inside);
                                        std::thread::spawn(move || {
                                            for _ in 0..50 {
                                                locks.with_instance(id, || {
                                                         assert_eq!(inside.fetch_add(1, Ordering::SeqCst), 0);
                                                         std::thread::yield_now();
                                                         inside.fetch_sub(1, Ordering::SeqCst);
                                                     });
                                            }
                                        })
                                    })
                                    .collect();
        for h in handles {
            h.join().expect("worker panicked");
        }
    }
}
