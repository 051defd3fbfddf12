//! Decisiones resueltas con el lenguaje de condiciones de `flowgate-rules`.


use flowgate_core::{CoreEngineError, InMemoryDefinitionSource, InMemoryGateway, JumpOutcome, JumpRequest, NodeKind,
                    ProcessData, ProcessDefinition, ProcessDefinitionBuilder, WorkflowEngine};
use flowgate_rules::ExpressionEvaluator;
use serde_json::json;
use test_support::{decision, node};

/// Start(1) -> Submit(2) -> D(3): amount > 1000 -> Manager(5), else -> Auto(6).
/// Manager -> D(7): approved -> End(9), else -> Rework(2).
fn purchase() -> ProcessDefinition {
    ProcessDefinitionBuilder::new("purchase").node(node(1, NodeKind::Start, &[("open", 2)]))
                                             .node(node(2, NodeKind::Activity, &[("submit", 3)]))
                                             .node(decision(3,
                                                            &[("amount > 1000", "escalate", 5),
                                                              ("amount <= 1000", "auto", 6)]))
                                             .node(node(5, NodeKind::Activity, &[("review", 7)]))
                                             .node(node(6, NodeKind::Activity, &[("close", 9)]))
                                             .node(decision(7,
                                                            &[("review.approved == true", "accept", 9),
                                                              ("not review.approved", "rework", 2)]))
                                             .node(node(9, NodeKind::End, &[]))
                                             .build()
                                             .expect("valid purchase definition")
}

fn engine() -> WorkflowEngine<InMemoryGateway, InMemoryDefinitionSource> {
    WorkflowEngine::builder(InMemoryGateway::new(), InMemoryDefinitionSource::new().with(purchase()))
        .evaluator(ExpressionEvaluator::new())
        .build()
}

#[test]
fn large_amount_is_escalated_then_approved() {
    let mut engine = engine();
    let mut inst = engine.start_instance("purchase").unwrap();
    engine.jump(&mut inst, JumpRequest::new("open", 2)).unwrap();

    let out = engine.jump(&mut inst, JumpRequest::new("submit", 3).data(ProcessData::new().with("amount", 2500)))
                    .unwrap();
    assert_eq!(out, JumpOutcome::Progressed { to: 5 });

    let review = ProcessData::new().with("review", json!({ "approved": true }));
    let out = engine.jump(&mut inst, JumpRequest::new("review", 7).data(review)).unwrap();
    assert_eq!(out, JumpOutcome::Completed { to: 9 });
    assert_eq!(engine.history(inst.instance_id).unwrap().path(), vec![1, 2, 5, 9]);
}

#[test]
fn small_amount_goes_straight_to_auto_approval() {
    let mut engine = engine();
    let mut inst = engine.start_instance("purchase").unwrap();
    engine.jump(&mut inst, JumpRequest::new("open", 2)).unwrap();

    let out = engine.jump(&mut inst, JumpRequest::new("submit", 3).data(ProcessData::new().with("amount", 300)))
                    .unwrap();
    assert_eq!(out, JumpOutcome::Progressed { to: 6 });
}

#[test]
fn rejected_review_loops_back_to_submit() {
    let mut engine = engine();
    let mut inst = engine.start_instance("purchase").unwrap();
    engine.jump(&mut inst, JumpRequest::new("open", 2)).unwrap();
    engine.jump(&mut inst, JumpRequest::new("submit", 3).data(ProcessData::new().with("amount", 5000)))
          .unwrap();

    let out = engine.jump(&mut inst, JumpRequest::new("review", 7)).unwrap();
    assert_eq!(out, JumpOutcome::Progressed { to: 2 }, "missing review.approved is null, so not-approved");
}

#[test]
fn missing_amount_fails_evaluation() {
    let mut engine = engine();
    let mut inst = engine.start_instance("purchase").unwrap();
    engine.jump(&mut inst, JumpRequest::new("open", 2)).unwrap();

    let err = engine.jump(&mut inst, JumpRequest::new("submit", 3)).unwrap_err();
    assert!(matches!(err, CoreEngineError::Evaluation(_)), "null cannot be ordered against a number");
    assert_eq!(inst.current, 2);
}
