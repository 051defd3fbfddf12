//! Demo: aprobación de compras sobre `demos/purchase.json`.
//!
//! Usa Postgres si `DATABASE_URL` está definido; si no, el gateway en
//! memoria. Nivel de log con `RUST_LOG` (default `info`).

use std::path::Path;

use flowgate_core::{DefinitionSource, EngineConfig, InMemoryGateway, JumpOutcome, JumpRequest,
                    PersistenceGateway, ProcessData, WorkflowEngine};
use flowgate_persistence::PgGateway;
use flowgate_rules::ExpressionEvaluator;
use flowgate_rust::{app_config, loader, AppError, InstanceLocks};
use tracing::info;
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), AppError> {
    tracing_subscriber::fmt().with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
                             .init();

    let config = app_config()?;
    let definitions = loader::load_directory(&Path::new(env!("CARGO_MANIFEST_DIR")).join("demos"))?;

    match &config.database {
        Some(db) => run(PgGateway::connect(db)?, definitions, config.engine),
        None => run(InMemoryGateway::new(), definitions, config.engine),
    }
}

fn run<G, S>(gateway: G, definitions: S, engine_config: EngineConfig) -> Result<(), AppError>
    where G: PersistenceGateway,
          S: DefinitionSource
{
    let mut engine = WorkflowEngine::builder(gateway, definitions).evaluator(ExpressionEvaluator::new())
                                                                  .config(engine_config)
                                                                  .build();
    engine.on_process(|ctx| info!(instance = %ctx.instance.instance_id, to = %ctx.to.name, "progressed"));
    engine.on_completed(|ctx| info!(instance = %ctx.instance.instance_id, "purchase approved"));

    let locks = InstanceLocks::new();
    let id = engine.start("purchase")?;
    let steps: [(&str, i64, i64, ProcessData); 4] =
        [("open", 2, 0, ProcessData::new()),
         ("submit", 3, 0, ProcessData::new().with("amount", 2500)),
         ("review", 6, 7, ProcessData::new().with("approved", true)),
         ("review", 6, 100, ProcessData::new().with("approved", true))];

    for (tid, to, actor, data) in steps {
        let outcome = locks.jump(&mut engine, id, |_| JumpRequest::new(tid, to).actor(actor).data(data))?;
        match outcome {
            JumpOutcome::Denied => info!(actor, tid, "jump denied"),
            other => info!(?other, tid, "jump"),
        }
    }

    let history = engine.history(id)?;
    let path: Vec<String> = history.path().iter().map(|n| n.to_string()).collect();
    info!(path = %path.join(" -> "), records = history.len(), "done");
    Ok(())
}
