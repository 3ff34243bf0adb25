//! Plan input surfaces and normalization.
//!
//! Two equivalent wire forms are accepted:
//!
//! ```text
//! [{"step": 1, "actions": {"R1": ["Move", "apple"], "R2": null}}, ...]
//! [{"R1": "<Move,apple>"}, ...]
//! ```
//!
//! Both normalize to an ordered list of steps, each a map from acting agent
//! name to a `<op, arg, ...>` command string. Null actions are dropped.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// One step of a plan in either wire form.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum StepInput {
    /// `{"step": n, "actions": {robot: [op, arg, ...] | null}}`
    Record {
        #[serde(default)]
        step: Option<u64>,
        actions: BTreeMap<String, Option<Vec<String>>>,
    },
    /// `{robot: "<op,arg,...>" | null}`
    Map(BTreeMap<String, Option<String>>),
}

/// A normalized plan: per step, the command string for each acting agent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Plan {
    pub steps: Vec<BTreeMap<String, String>>,
}

impl Plan {
    /// Normalize a sequence of wire-form steps.
    pub fn from_inputs(inputs: Vec<StepInput>) -> Self {
        let steps = inputs
            .into_iter()
            .filter_map(|input| {
                let step: BTreeMap<String, String> = match input {
                    StepInput::Record { actions, .. } => actions
                        .into_iter()
                        .filter_map(|(robot, words)| {
                            words.map(|words| (robot, format!("<{}>", words.join(","))))
                        })
                        .collect(),
                    StepInput::Map(actions) => actions
                        .into_iter()
                        .filter_map(|(robot, text)| text.map(|text| (robot, text)))
                        .collect(),
                };
                (!step.is_empty()).then_some(step)
            })
            .collect();
        Self { steps }
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_record_form() {
        let inputs: Vec<StepInput> = serde_json::from_str(
            r#"[
                {"step": 1, "actions": {"R1": ["Move", "apple"], "R2": null}},
                {"step": 2, "actions": {"R1": ["Reach", "apple"]}}
            ]"#,
        )
        .unwrap();
        let plan = Plan::from_inputs(inputs);
        assert_eq!(plan.len(), 2);
        assert_eq!(plan.steps[0].get("R1").unwrap(), "<Move,apple>");
        assert!(!plan.steps[0].contains_key("R2"));
    }

    #[test]
    fn test_normalize_map_form() {
        let inputs: Vec<StepInput> = serde_json::from_str(
            r#"[{"R1": "<Move,apple>", "R2": "<Move,bowl>"}, {"R1": null, "R2": "<Reach,bowl>"}]"#,
        )
        .unwrap();
        let plan = Plan::from_inputs(inputs);
        assert_eq!(plan.len(), 2);
        assert_eq!(plan.steps[0].len(), 2);
        assert_eq!(plan.steps[1].get("R2").unwrap(), "<Reach,bowl>");
        assert!(!plan.steps[1].contains_key("R1"));
    }

    #[test]
    fn test_steps_with_no_actions_are_dropped() {
        let inputs: Vec<StepInput> = serde_json::from_str(
            r#"[{"step": 1, "actions": {"R1": null}}, {"step": 2, "actions": {"R1": ["Grasp", "apple"]}}]"#,
        )
        .unwrap();
        let plan = Plan::from_inputs(inputs);
        assert_eq!(plan.len(), 1);
    }
}
