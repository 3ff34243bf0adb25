//! Evaluator throughput over a representative pick-and-place plan.

use criterion::{black_box, criterion_group, criterion_main, Criterion};

use arbiter::domain::models::entities::RobotKind;
use arbiter::domain::models::plan::{Plan, StepInput};
use arbiter::{Evaluator, SceneSpec};

fn scene() -> SceneSpec {
    let mut scene = SceneSpec::default();
    scene
        .add_agent("R1", RobotKind::UnitreeH1)
        .add_agent("R2", RobotKind::Fetch)
        .add_asset("apple", "kitchen")
        .add_asset("bread", "kitchen")
        .add_container("bowl", "kitchen", false)
        .add_container("cabinet", "room_cabinet", true)
        .add_container("toaster", "kitchen", false);
    scene.goal_constraints = serde_json::from_str(
        r#"[[{"type": "asset", "name": "apple", "is_satisfied": true, "status": {"pos.name": "bowl"}}]]"#,
    )
    .unwrap();
    scene
}

fn plan() -> Plan {
    let inputs: Vec<StepInput> = serde_json::from_str(
        r#"[
            {"R1": "<Move,cabinet>", "R2": "<Move,bread>"},
            {"R1": "<Reach,cabinet>", "R2": "<Reach,bread>"},
            {"R1": "<Open,cabinet>", "R2": "<Grasp,bread>"},
            {"R1": "<Move,apple>", "R2": "<Move,toaster>"},
            {"R1": "<Reach,apple>", "R2": "<Place,toaster>"},
            {"R1": "<Grasp,apple>", "R2": "<Interact,toaster>"},
            {"R1": "<Move,bowl>"},
            {"R1": "<Place,bowl>"}
        ]"#,
    )
    .unwrap();
    Plan::from_inputs(inputs)
}

fn bench_evaluate(c: &mut Criterion) {
    let evaluator = Evaluator::new(scene());
    let plan = plan();
    c.bench_function("evaluate_pick_and_place", |b| {
        b.iter(|| {
            let verdict = evaluator.evaluate(black_box(&plan)).unwrap();
            assert!(verdict.success);
        });
    });
}

criterion_group!(benches, bench_evaluate);
criterion_main!(benches);
