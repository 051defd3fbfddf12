//! Implementación de los subcomandos sobre el motor.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use flowgate_core::{EngineConfig, InMemoryDefinitionSource, JumpOutcome, JumpRequest, NodeId, PersistenceGateway,
                    ProcessData, ProcessDefinition, WorkflowEngine, WorkflowInstance, WorkflowProcess};
use flowgate_rules::ExpressionEvaluator;
use tracing::info;

use crate::cli::JumpSpec;

pub fn load_definition(path: &Path) -> Result<ProcessDefinition> {
    let raw = fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    parse_definition(&raw).with_context(|| format!("loading definition {}", path.display()))
}

pub fn parse_definition(raw: &str) -> Result<ProcessDefinition> {
    let doc = serde_json::from_str(raw).context("definition is not valid JSON")?;
    Ok(ProcessDefinition::from_document(doc)?)
}

pub fn describe(definition: &ProcessDefinition) -> String {
    let mut out = format!("definition '{}' ({} nodes) hash={}\n",
                          definition.id(),
                          definition.len(),
                          definition.definition_hash());
    for node in definition.nodes() {
        let targets: Vec<String> = node.transitions.iter().map(|t| format!("{}->{}", t.tid, t.to)).collect();
        out.push_str(&format!("  [{}] {:<10} {:<20} {}\n", node.id, node.kind, node.nid, targets.join(", ")));
    }
    out
}

pub type CliEngine<G> = WorkflowEngine<G, InMemoryDefinitionSource>;

pub fn engine_with<G: PersistenceGateway>(gateway: G, definition: ProcessDefinition, config: EngineConfig) -> CliEngine<G> {
    let mut engine = WorkflowEngine::builder(gateway, InMemoryDefinitionSource::new().with(definition))
        .evaluator(ExpressionEvaluator::new())
        .config(config)
        .build();
    engine.on_process(|ctx| {
              info!(instance = %ctx.instance.instance_id, from = ctx.from.id, to = ctx.to.id, "progressed");
          });
    engine.on_completed(|ctx| {
              info!(instance = %ctx.instance.instance_id, end = ctx.to.id, "completed");
          });
    engine
}

#[derive(Debug)]
pub struct SimulationReport {
    pub instance: WorkflowInstance,
    pub steps: Vec<(JumpSpec, JumpOutcome)>,
    pub path: Vec<NodeId>,
}

/// Arranca una instancia y aplica los saltos en orden. Un error del motor
/// corta la simulación; las negaciones y callejones sin salida se reportan
/// como pasos.
pub fn simulate<G: PersistenceGateway>(engine: &mut CliEngine<G>,
                                       definition_id: &str,
                                       jumps: &[JumpSpec],
                                       default_actor: i64,
                                       data: &ProcessData)
                                       -> Result<SimulationReport> {
    let mut instance = engine.start_instance(definition_id)?;
    let mut steps = Vec::with_capacity(jumps.len());
    for spec in jumps {
        let request = JumpRequest::new(spec.tid.clone(), spec.to).actor(spec.actor.unwrap_or(default_actor))
                                                                 .data(data.clone());
        let outcome = engine.jump(&mut instance, request)
                            .with_context(|| format!("jump {}:{} from node {}", spec.tid, spec.to, instance.current))?;
        steps.push((spec.clone(), outcome));
    }
    let path = engine.history(instance.instance_id)?.path();
    Ok(SimulationReport { instance,
                          steps,
                          path })
}

pub fn render_report(report: &SimulationReport) -> String {
    let mut out = format!("instance {}\n", report.instance.instance_id);
    for (spec, outcome) in &report.steps {
        out.push_str(&format!("  {}:{} => {}\n", spec.tid, spec.to, render_outcome(outcome)));
    }
    let path: Vec<String> = report.path.iter().map(|n| n.to_string()).collect();
    out.push_str(&format!("status={} current={} path={}\n",
                          report.instance.status,
                          report.instance.current,
                          path.join(" -> ")));
    out
}

fn render_outcome(outcome: &JumpOutcome) -> String {
    match outcome {
        JumpOutcome::Progressed { to } => format!("progressed to {to}"),
        JumpOutcome::Completed { to } => format!("completed at {to}"),
        JumpOutcome::Denied => "denied".to_string(),
        JumpOutcome::NoRoute { decision } => format!("no route out of decision {decision}"),
        JumpOutcome::NotRunning { status } => format!("ignored, instance is {status}"),
    }
}

pub fn render_history(records: &[WorkflowProcess]) -> String {
    let mut out = String::new();
    for r in records {
        out.push_str(&format!("{} {} -> {} tid={} actor={} data={}\n",
                              r.created_at.to_rfc3339(),
                              r.from,
                              r.to,
                              r.tid,
                              r.actor_id,
                              r.data.to_value()));
    }
    out
}
