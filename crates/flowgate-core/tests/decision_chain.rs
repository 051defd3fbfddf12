//! Resolución de cadenas de decisiones dentro de un solo salto.


use std::sync::{Arc, Mutex};

use flowgate_core::{Command, CommandExecutor, CoreEngineError, EventKind, InMemoryDefinitionSource, InMemoryGateway,
                    InstanceStatus, JumpOutcome, JumpRequest, NodeKind, PersistenceGateway, ProcessData,
                    ProcessDefinition, ProcessDefinitionBuilder, WorkflowEngine, WorkflowInstance};
use test_support::*;

/// Start(1) -> A(2) -> D(10) -> D(11) -> ... -> D(10+n-1) -> B(5) -> E(9)
fn chain(n: i64) -> ProcessDefinition {
    let mut b = ProcessDefinitionBuilder::new("chain").node(node(1, NodeKind::Start, &[("t0", 2)]))
                                                      .node(node(2, NodeKind::Activity, &[("go", 10)]))
                                                      .node(node(5, NodeKind::Activity, &[("fin", 9)]))
                                                      .node(node(9, NodeKind::End, &[]));
    for i in 0..n {
        let id = 10 + i;
        let next = if i + 1 == n { 5 } else { id + 1 };
        b = b.node(decision(id, &[("true", "next", next)]));
    }
    b.build().expect("valid chain")
}

/// Instancia nueva ya posicionada en A(2).
fn started(engine: &mut TestEngine, definition_id: &str) -> WorkflowInstance {
    let mut inst = engine.start_instance(definition_id).unwrap();
    engine.jump(&mut inst, JumpRequest::new("t0", 2)).unwrap();
    inst
}

#[test]
fn chain_of_decisions_persists_one_record() {
    let mut engine = engine_for(chain(4));
    let mut inst = started(&mut engine, "chain");
    let (progressed, completed) = count_events(&mut engine);
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&seen);
    engine.subscribe(EventKind::Progressed, move |ctx| {
              sink.lock().unwrap().push((ctx.from.id, ctx.to.id, ctx.transition_id.clone()));
          });

    let out = engine.jump(&mut inst, JumpRequest::new("go", 10)).unwrap();

    assert_eq!(out, JumpOutcome::Progressed { to: 5 });
    assert_eq!(inst.current, 5);
    let records = engine.gateway().processes(inst.instance_id).unwrap();
    assert_eq!(records.len(), 2);
    assert_eq!((records[1].from, records[1].to), (2, 5));
    assert_eq!(load(&progressed), 1);
    assert_eq!(load(&completed), 0);
    assert_eq!(*seen.lock().unwrap(), vec![(2, 5, "go".to_string())]);
}

#[test]
fn hop_cap_is_inclusive() {
    let def = chain(3);
    let mut engine = WorkflowEngine::builder(InMemoryGateway::new(), InMemoryDefinitionSource::new().with(def))
        .evaluator(literal)
        .max_decision_hops(3)
        .build();
    let mut inst = started(&mut engine, "chain");
    assert_eq!(engine.jump(&mut inst, JumpRequest::new("go", 10)).unwrap(), JumpOutcome::Progressed { to: 5 });

    let mut engine = WorkflowEngine::builder(InMemoryGateway::new(), InMemoryDefinitionSource::new().with(chain(3)))
        .evaluator(literal)
        .max_decision_hops(2)
        .build();
    let mut inst = started(&mut engine, "chain");
    let before = inst.clone();
    let err = engine.jump(&mut inst, JumpRequest::new("go", 10)).unwrap_err();
    assert_eq!(err, CoreEngineError::RoutingLoop { max_hops: 2, last: 12 });
    assert_eq!(inst, before);
}

#[test]
fn decision_cycle_fails_with_routing_loop() {
    let def = ProcessDefinitionBuilder::new("loop").node(node(1, NodeKind::Start, &[("t0", 2)]))
                                                   .node(node(2, NodeKind::Activity, &[("go", 10)]))
                                                   .node(decision(10, &[("true", "ping", 11)]))
                                                   .node(decision(11, &[("true", "pong", 10)]))
                                                   .node(node(9, NodeKind::End, &[]))
                                                   .build()
                                                   .unwrap();
    let mut engine = engine_for(def);
    let mut inst = started(&mut engine, "loop");
    let (progressed, completed) = count_events(&mut engine);

    let err = engine.jump(&mut inst, JumpRequest::new("go", 10)).unwrap_err();

    assert!(matches!(err, CoreEngineError::RoutingLoop { max_hops: 32, .. }));
    assert_eq!(inst.current, 2);
    assert_eq!(engine.gateway().processes(inst.instance_id).unwrap().len(), 1);
    assert_eq!(load(&progressed) + load(&completed), 0);
}

#[test]
fn rule_order_is_declaration_order() {
    let def = ProcessDefinitionBuilder::new("chain").node(node(1, NodeKind::Start, &[("t0", 2)]))
                                                    .node(node(2, NodeKind::Activity, &[("go", 10)]))
                                                    .node(decision(10, &[("false", "r1", 3), ("true", "r2", 4), ("true", "r3", 5)]))
                                                    .node(node(3, NodeKind::Activity, &[]))
                                                    .node(node(4, NodeKind::Activity, &[]))
                                                    .node(node(5, NodeKind::Activity, &[]))
                                                    .node(node(9, NodeKind::End, &[]))
                                                    .build()
                                                    .unwrap();
    let mut engine = engine_for(def);
    let mut inst = started(&mut engine, "chain");

    assert_eq!(engine.jump(&mut inst, JumpRequest::new("go", 10)).unwrap(), JumpOutcome::Progressed { to: 4 });
}

#[test]
fn evaluation_error_aborts_without_persisting() {
    let mut engine = engine_for(approval("missing_flag"));
    let mut inst = engine.start_instance("approval").unwrap();
    engine.jump(&mut inst, JumpRequest::new("t0", 2)).unwrap();
    let before = inst.clone();

    let err = engine.jump(&mut inst, JumpRequest::new("t1", 3)).unwrap_err();

    assert!(matches!(err, CoreEngineError::Evaluation(_)));
    assert_eq!(inst, before);
    assert_eq!(engine.gateway().processes(inst.instance_id).unwrap().len(), 1);
}

#[test]
fn persistence_failure_keeps_pointer_and_skips_observers() {
    let mut engine = WorkflowEngine::builder(FlakyGateway::default(), InMemoryDefinitionSource::new().with(approval("true")))
        .evaluator(literal)
        .build();
    let mut inst = engine.start_instance("approval").unwrap();
    let (progressed, completed) = count_events(&mut engine);
    engine.gateway_mut().fail_processing = true;

    let err = engine.jump(&mut inst, JumpRequest::new("t0", 2)).unwrap_err();

    assert!(matches!(err, CoreEngineError::Persistence(_)));
    assert_eq!(engine.gateway().processing_calls, 1);
    assert_eq!(inst.current, 1);
    assert_eq!(inst.status, InstanceStatus::Running);
    assert_eq!(load(&progressed) + load(&completed), 0);

    engine.gateway_mut().fail_processing = false;
    assert_eq!(engine.jump(&mut inst, JumpRequest::new("t0", 2)).unwrap(), JumpOutcome::Progressed { to: 2 });
    assert_eq!(engine.gateway().processes(inst.instance_id).unwrap().len(), 1);
}

struct LimitLookup;

impl CommandExecutor for LimitLookup {
    fn execute(&self, command: &Command, _instance: &WorkflowInstance, data: &ProcessData) -> Result<ProcessData, CoreEngineError> {
        assert_eq!(command.text, "select over_limit");
        let amount = data.get("amount").and_then(|v| v.as_i64()).unwrap_or(0);
        Ok(ProcessData::new().with("over_limit", amount > 1000))
    }
}

#[test]
fn decision_command_enriches_rule_data() {
    let mut doc = approval("over_limit").to_document();
    doc.nodes.iter_mut().find(|n| n.id == 3).unwrap().command = Some(Command { connection: "erp".into(),
                                                                                 text: "select over_limit".into() });
    let def = ProcessDefinition::from_document(doc).unwrap();
    let mut engine = WorkflowEngine::builder(InMemoryGateway::new(), InMemoryDefinitionSource::new().with(def))
        .evaluator(literal)
        .command_executor(LimitLookup)
        .build();

    let mut small = engine.start_instance("approval").unwrap();
    engine.jump(&mut small, JumpRequest::new("t0", 2)).unwrap();
    let out = engine.jump(&mut small, JumpRequest::new("t1", 3).data(ProcessData::new().with("amount", 10))).unwrap();
    assert_eq!(out, JumpOutcome::NoRoute { decision: 3 });

    let out = engine.jump(&mut small, JumpRequest::new("t1", 3).data(ProcessData::new().with("amount", 5000))).unwrap();
    assert_eq!(out, JumpOutcome::Completed { to: 9 });
    let records = engine.gateway().processes(small.instance_id).unwrap();
    assert!(records[1].data.get("over_limit").is_none(), "command output is not part of the audit payload");
}
