//! Implementación Postgres (Diesel) de `PersistenceGateway`.
//!
//! - `workflow_instance`: una fila por instancia con el puntero y el estado.
//! - `workflow_process`: registros de auditoría append-only ordenados por
//!   `seq` (BIGSERIAL).
//! - `processing` inserta el registro y actualiza la instancia en la MISMA
//!   transacción: ambos quedan durables o ninguno.
//! - Errores transitorios (conflictos de serialización, IO del pool) se
//!   reintentan con un backoff corto.

use std::str::FromStr;

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use diesel::r2d2::{self, ConnectionManager};
use log::{debug, warn};
use serde_json::Value;
use uuid::Uuid;

use flowgate_core::{CoreEngineError, InstanceStatus, NodeKind, PersistenceGateway, ProcessData, ProcessDefinition,
                    WorkflowInstance, WorkflowProcess};

use crate::config::DbConfig;
use crate::error::PersistenceError;
use crate::migrations::run_pending_migrations;
use crate::schema::{workflow_instance, workflow_process};

/// Pool r2d2 de conexiones Postgres.
pub type PgPool = r2d2::Pool<ConnectionManager<PgConnection>>;
pub type PgPooledConnection = r2d2::PooledConnection<ConnectionManager<PgConnection>>;

/// Proveedor abstracto de conexiones (pool real o alternativo en tests).
pub trait ConnectionProvider: Send + Sync + 'static {
    fn connection(&self) -> Result<PgPooledConnection, PersistenceError>;
}

pub struct PoolProvider {
    pub pool: PgPool,
}

impl ConnectionProvider for PoolProvider {
    fn connection(&self) -> Result<PgPooledConnection, PersistenceError> {
        self.pool
            .get()
            .map_err(|e| PersistenceError::TransientIo(format!("pool error: {e}")))
    }
}

#[derive(Queryable, Insertable, Debug, Clone)]
#[diesel(table_name = workflow_instance)]
pub struct InstanceRow {
    pub instance_id: Uuid,
    pub definition_id: String,
    pub definition_hash: String,
    pub current_node: i64,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<&WorkflowInstance> for InstanceRow {
    fn from(inst: &WorkflowInstance) -> Self {
        Self { instance_id: inst.instance_id,
               definition_id: inst.definition_id.clone(),
               definition_hash: inst.definition_hash.clone(),
               current_node: inst.current,
               status: inst.status.as_str().to_string(),
               created_at: inst.created_at,
               updated_at: inst.updated_at }
    }
}

impl TryFrom<InstanceRow> for WorkflowInstance {
    type Error = PersistenceError;

    fn try_from(row: InstanceRow) -> Result<Self, Self::Error> {
        let status = InstanceStatus::from_str(&row.status).map_err(PersistenceError::CorruptRow)?;
        Ok(WorkflowInstance { instance_id: row.instance_id,
                              definition_id: row.definition_id,
                              definition_hash: row.definition_hash,
                              current: row.current_node,
                              status,
                              created_at: row.created_at,
                              updated_at: row.updated_at })
    }
}

/// Fila para insertar en `workflow_process` (`seq` lo asigna la base).
#[derive(Insertable, Debug)]
#[diesel(table_name = workflow_process)]
pub struct NewProcessRow<'a> {
    pub instance_id: Uuid,
    pub rnid: &'a str,
    pub from_node: i64,
    pub to_node: i64,
    pub tid: &'a str,
    pub node_type: &'a str,
    pub actor_id: i64,
    pub data: &'a Value,
    pub created_at: DateTime<Utc>,
}

impl<'a> NewProcessRow<'a> {
    pub fn from_process(process: &'a WorkflowProcess, data: &'a Value) -> Self {
        Self { instance_id: process.instance_id,
               rnid: &process.rnid,
               from_node: process.from,
               to_node: process.to,
               tid: &process.tid,
               node_type: process.node_type.as_str(),
               actor_id: process.actor_id,
               data,
               created_at: process.created_at }
    }
}

#[derive(Queryable, Debug, Clone)]
pub struct ProcessRow {
    pub seq: i64,
    pub instance_id: Uuid,
    pub rnid: String,
    pub from_node: i64,
    pub to_node: i64,
    pub tid: String,
    pub node_type: String,
    pub actor_id: i64,
    pub data: Value,
    pub created_at: DateTime<Utc>,
}

impl TryFrom<ProcessRow> for WorkflowProcess {
    type Error = PersistenceError;

    fn try_from(row: ProcessRow) -> Result<Self, Self::Error> {
        let node_type = NodeKind::from_str(&row.node_type).map_err(PersistenceError::CorruptRow)?;
        let data: ProcessData = serde_json::from_value(row.data)
            .map_err(|e| PersistenceError::CorruptRow(format!("process {} data: {e}", row.seq)))?;
        Ok(WorkflowProcess { rnid: row.rnid,
                             from: row.from_node,
                             to: row.to_node,
                             tid: row.tid,
                             instance_id: row.instance_id,
                             node_type,
                             actor_id: row.actor_id,
                             data,
                             created_at: row.created_at })
    }
}

/// Reintento con backoff lineal corto (hasta 3 reintentos: 15, 30, 45ms).
fn with_retry<F, T>(mut f: F) -> Result<T, PersistenceError>
    where F: FnMut() -> Result<T, PersistenceError>
{
    let mut attempts = 0;
    loop {
        match f() {
            Err(e) if e.is_retryable() && attempts < 3 => {
                let delay_ms = 15 * ((attempts + 1) as u64);
                warn!("retryable error (attempt {}): {:?} -> sleeping {}ms",
                      attempts + 1,
                      e,
                      delay_ms);
                std::thread::sleep(std::time::Duration::from_millis(delay_ms));
                attempts += 1;
            }
            r => return r,
        }
    }
}

/// `NotFound` de una escritura sobre la instancia se reporta como instancia
/// inexistente, `Stale` como `StaleInstance`; el resto como falla de
/// persistencia.
fn for_instance(instance_id: Uuid) -> impl Fn(PersistenceError) -> CoreEngineError {
    move |e| match e {
        PersistenceError::NotFound => CoreEngineError::InstanceNotFound(instance_id.to_string()),
        PersistenceError::Stale { expected } => CoreEngineError::StaleInstance { instance: instance_id.to_string(),
                                                                                 expected },
        other => other.into(),
    }
}

pub struct PgGateway<P: ConnectionProvider> {
    pub provider: P,
}

impl<P: ConnectionProvider> PgGateway<P> {
    pub fn new(provider: P) -> Self {
        Self { provider }
    }

    /// Compare-and-set: escribe puntero/estado sólo si la fila sigue
    /// `running` en `expected`. Sin fila afectada devuelve `Stale` (la fila
    /// existe) o `NotFound`. Un commit reintentado cuyo primer intento sí se
    /// aplicó cae en `Stale` y no duplica el registro.
    fn update_instance(conn: &mut PgConnection, inst: &WorkflowInstance, expected: i64) -> Result<(), PersistenceError> {
        let target = workflow_instance::table.find(inst.instance_id)
                                             .filter(workflow_instance::current_node.eq(expected))
                                             .filter(workflow_instance::status.eq(InstanceStatus::Running.as_str()));
        let updated = diesel::update(target).set((workflow_instance::current_node.eq(inst.current),
                                                  workflow_instance::status.eq(inst.status.as_str()),
                                                  workflow_instance::updated_at.eq(inst.updated_at)))
                                            .execute(conn)?;
        if updated == 1 {
            return Ok(());
        }
        let exists: bool = diesel::select(diesel::dsl::exists(workflow_instance::table.find(inst.instance_id))).get_result(conn)?;
        if exists {
            Err(PersistenceError::Stale { expected })
        } else {
            Err(PersistenceError::NotFound)
        }
    }
}

impl PgGateway<PoolProvider> {
    /// Construye pool + gateway desde `DbConfig` (migraciones incluidas).
    pub fn connect(cfg: &DbConfig) -> Result<Self, PersistenceError> {
        let pool = build_pool(&cfg.url, cfg.min_connections, cfg.max_connections)?;
        Ok(Self::new(PoolProvider { pool }))
    }
}

impl<P: ConnectionProvider> PersistenceGateway for PgGateway<P> {
    fn start(&mut self, definition: &ProcessDefinition, instance: &WorkflowInstance) -> Result<(), CoreEngineError> {
        debug!("start instance={} definition={}", instance.instance_id, definition.id());
        let row = InstanceRow::from(instance);
        with_retry(|| {
            let mut conn = self.provider.connection()?;
            diesel::insert_into(workflow_instance::table).values(&row)
                                                         .execute(&mut conn)
                                                         .map(|_| ())
                                                         .map_err(PersistenceError::from)
        }).map_err(CoreEngineError::from)
    }

    fn processing(&mut self, process: &WorkflowProcess, instance: &WorkflowInstance) -> Result<(), CoreEngineError> {
        debug!("processing instance={} {} -> {} tid={}",
               instance.instance_id,
               process.from,
               process.to,
               process.tid);
        let data = process.data.to_value();
        let row = NewProcessRow::from_process(process, &data);
        with_retry(|| {
            let mut conn = self.provider.connection()?;
            conn.build_transaction()
                .read_write()
                .run(|tx| {
                    Self::update_instance(tx, instance, process.from)?;
                    diesel::insert_into(workflow_process::table).values(&row).execute(tx)?;
                    Ok::<(), PersistenceError>(())
                })
        }).map_err(for_instance(instance.instance_id))
    }

    fn update_status(&mut self, instance: &WorkflowInstance) -> Result<(), CoreEngineError> {
        debug!("update_status instance={} status={}", instance.instance_id, instance.status);
        with_retry(|| {
            let mut conn = self.provider.connection()?;
            Self::update_instance(&mut conn, instance, instance.current)
        }).map_err(for_instance(instance.instance_id))
    }

    fn instance(&self, instance_id: Uuid) -> Result<Option<WorkflowInstance>, CoreEngineError> {
        let row: Option<InstanceRow> = with_retry(|| {
                                           let mut conn = self.provider.connection()?;
                                           workflow_instance::table.find(instance_id)
                                                                   .first::<InstanceRow>(&mut conn)
                                                                   .optional()
                                                                   .map_err(PersistenceError::from)
                                       })?;
        row.map(WorkflowInstance::try_from).transpose().map_err(CoreEngineError::from)
    }

    fn processes(&self, instance_id: Uuid) -> Result<Vec<WorkflowProcess>, CoreEngineError> {
        let rows: Vec<ProcessRow> = with_retry(|| {
                                        let mut conn = self.provider.connection()?;
                                        workflow_process::table.filter(workflow_process::instance_id.eq(instance_id))
                                                               .order(workflow_process::seq.asc())
                                                               .load::<ProcessRow>(&mut conn)
                                                               .map_err(PersistenceError::from)
                                    })?;
        debug!("processes instance={} count={}", instance_id, rows.len());
        rows.into_iter()
            .map(|r| WorkflowProcess::try_from(r).map_err(CoreEngineError::from))
            .collect()
    }
}

/// Construye un pool r2d2 y corre las migraciones pendientes una vez.
pub fn build_pool(database_url: &str, min_size: u32, max_size: u32) -> Result<PgPool, PersistenceError> {
    let max = max_size.max(1);
    let min = min_size.max(1);
    if min > max {
        warn!("min_size > max_size ({min} > {max}), using min=max");
    }
    let manager = ConnectionManager::<PgConnection>::new(database_url);
    let pool = r2d2::Pool::builder().min_idle(Some(min.min(max)))
                                    .max_size(max)
                                    .build(manager)
                                    .map_err(|e| PersistenceError::TransientIo(format!("pool build: {e}")))?;
    {
        let mut conn = pool.get()
                           .map_err(|e| PersistenceError::TransientIo(format!("pool get for migrations: {e}")))?;
        run_pending_migrations(&mut conn)?;
    }
    Ok(pool)
}

/// Carga `.env`, lee `DbConfig` y construye un pool ya migrado.
pub fn build_dev_pool_from_env() -> Result<PgPool, PersistenceError> {
    let cfg = DbConfig::from_env()?;
    build_pool(&cfg.url, cfg.min_connections, cfg.max_connections)
}
