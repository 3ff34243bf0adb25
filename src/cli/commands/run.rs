//! `arbiter run`: batch-evaluate a dataset against its reference plans.

use std::path::Path;

use anyhow::Result;
use comfy_table::{presets, Cell, CellAlignment, ContentArrangement, Table};
use console::style;
use tracing::info;

use crate::application::batch::{evaluate_dataset, load_dataset, BatchReport};

/// Load the dataset, judge every record, print the summary.
pub fn handle_run(data_path: &Path, seed: u64, json: bool) -> Result<()> {
    let records = load_dataset(data_path)?;
    info!(records = records.len(), seed, "evaluating dataset");
    let report = evaluate_dataset(&records, seed);

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_summary(&report);
    }
    Ok(())
}

fn print_summary(report: &BatchReport) {
    println!(
        "{} records: {} passed, {} failed, {} invalid",
        report.total,
        style(report.succeeded).green().bold(),
        style(report.total - report.succeeded - report.invalid).red(),
        style(report.invalid).dim()
    );

    if report.failures.is_empty() {
        return;
    }
    let mut table = Table::new();
    table
        .load_preset(presets::NOTHING)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec![
            Cell::new("FAILURE").set_alignment(CellAlignment::Left),
            Cell::new("COUNT").set_alignment(CellAlignment::Right),
        ]);
    for (code, count) in &report.failures {
        table.add_row(vec![
            Cell::new(code),
            Cell::new(count).set_alignment(CellAlignment::Right),
        ]);
    }
    println!("{table}");
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_handle_run_with_dataset_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data.json");
        let mut file = std::fs::File::create(&path).unwrap();
        file.write_all(
            br#"[{
                "task_id": "demo",
                "robots": {"R1": "stompy"},
                "init_pos": {"apple_0": ["kitchen"]},
                "goal_constraints": [],
                "temporal_constraints": [],
                "time_steps": [{"step": 1, "actions": {"R1": ["Move", "apple"]}}]
            }]"#,
        )
        .unwrap();

        assert!(handle_run(&path, 0, true).is_ok());
    }

    #[test]
    fn test_handle_run_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.json");
        assert!(handle_run(&path, 0, true).is_err());
    }
}
