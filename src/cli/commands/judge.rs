//! `arbiter judge`: evaluate one plan against one ground-truth record.

use std::path::Path;

use anyhow::{Context, Result};
use console::style;
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde_json::Value;

use crate::application::ground_truth::GroundTruth;
use crate::domain::models::plan::{Plan, StepInput};
use crate::domain::models::verdict::Verdict;
use crate::services::evaluator::Evaluator;

/// Read the plan and ground truth, judge the plan, print the verdict.
pub fn handle_judge(plan_path: &Path, truth_path: &Path, seed: u64, json: bool) -> Result<()> {
    let verdict = judge_files(plan_path, truth_path, seed)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&verdict)?);
    } else if verdict.success {
        println!("{}", style("PASS").green().bold());
    } else {
        let kind = verdict.failure.map_or("", |k| k.code());
        println!(
            "{} {} {}",
            style("FAIL").red().bold(),
            style(kind).red(),
            style(verdict.description()).dim()
        );
    }
    Ok(())
}

/// File plumbing for [`handle_judge`], separated for testability.
pub fn judge_files(plan_path: &Path, truth_path: &Path, seed: u64) -> Result<Verdict> {
    let plan_text = std::fs::read_to_string(plan_path)
        .with_context(|| format!("Failed to read plan {}", plan_path.display()))?;
    let inputs: Vec<StepInput> = serde_json::from_str(&plan_text)
        .with_context(|| format!("Failed to parse plan {}", plan_path.display()))?;
    let plan = Plan::from_inputs(inputs);

    let truth_text = std::fs::read_to_string(truth_path)
        .with_context(|| format!("Failed to read ground truth {}", truth_path.display()))?;
    let record: Value = serde_json::from_str(&truth_text)
        .with_context(|| format!("Failed to parse ground truth {}", truth_path.display()))?;

    let gt = GroundTruth::from_value(&record)?;
    let mut rng = StdRng::seed_from_u64(seed);
    let scene = gt.scene(&mut rng)?;
    let verdict = Evaluator::new(scene).evaluate(&plan)?;
    Ok(verdict)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_file(dir: &tempfile::TempDir, name: &str, content: &str) -> std::path::PathBuf {
        let path = dir.path().join(name);
        let mut file = std::fs::File::create(&path).unwrap();
        file.write_all(content.as_bytes()).unwrap();
        path
    }

    #[test]
    fn test_judge_files_end_to_end() {
        let dir = tempfile::tempdir().unwrap();
        let plan = write_file(
            &dir,
            "plan.json",
            r#"[{"R1": "<Move,apple>"}, {"R1": "<Reach,apple>"}, {"R1": "<Grasp,apple>"},
                {"R1": "<Move,bowl>"}, {"R1": "<Place,bowl>"}]"#,
        );
        let truth = write_file(
            &dir,
            "truth.json",
            r#"{
                "task_id": "demo",
                "robots": {"R1": "unitree_h1"},
                "init_pos": {"apple_0": ["kitchen"], "bowl_0": ["kitchen"]},
                "goal_constraints": [[{
                    "type": "asset", "name": "apple",
                    "is_satisfied": true, "status": {"pos.name": "bowl"}
                }]],
                "temporal_constraints": []
            }"#,
        );

        let verdict = judge_files(&plan, &truth, 0).unwrap();
        assert!(verdict.success, "failure: {:?}", verdict.failure);
    }

    #[test]
    fn test_judge_files_rejects_bad_plan_json() {
        let dir = tempfile::tempdir().unwrap();
        let plan = write_file(&dir, "plan.json", "not json");
        let truth = write_file(&dir, "truth.json", r#"{"robots": {}}"#);
        assert!(judge_files(&plan, &truth, 0).is_err());
    }
}
