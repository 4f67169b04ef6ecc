#![allow(dead_code)]

use std::collections::HashMap;

use proptest::prelude::*;
use proptest::test_runner::{Config as ProptestConfig, FileFailurePersistence};

pub fn proptest_config() -> ProptestConfig {
    let cases = std::env::var("PROPTEST_CASES")
        .ok()
        .and_then(|v| v.parse::<u32>().ok())
        .unwrap_or(64);

    let mut config = ProptestConfig::with_failure_persistence(FileFailurePersistence::WithSource(
        "proptest-regressions",
    ));
    config.cases = cases;
    config.max_shrink_iters = 1024;
    config
}

/// One generated label-graph line, kept structured so tests can compute the
/// expected extraction independently of the parser.
#[derive(Clone, Debug)]
pub enum GenLine {
    Object { id: String, label: String },
    BBox { id: String, corners: [f64; 4] },
    Relation { from: String, to: String },
    Comment,
}

impl GenLine {
    pub fn render(&self) -> String {
        match self {
            GenLine::Object { id, label } => format!("O, {id}, {label}, 1.0, 0"),
            GenLine::BBox { id, corners } => format!(
                "BB, {id}, {}, {}, {}, {}",
                corners[0], corners[1], corners[2], corners[3]
            ),
            GenLine::Relation { from, to } => format!("R, {from}, {to}, Right, 1.0"),
            GenLine::Comment => "# generated".to_string(),
        }
    }
}

pub fn arb_id() -> impl Strategy<Value = String> {
    "[a-z]{1,2}_[0-9]".prop_map(|s| s)
}

pub fn arb_label() -> impl Strategy<Value = String> {
    prop_oneof![
        "[a-zA-Z0-9]".prop_map(|s| s),
        Just("+".to_string()),
        Just("\\sqrt".to_string()),
        Just("\\frac".to_string()),
        Just("(".to_string()),
    ]
}

pub fn arb_coord() -> impl Strategy<Value = f64> {
    (0i32..2000).prop_map(|v| v as f64 / 4.0)
}

pub fn arb_line() -> impl Strategy<Value = GenLine> {
    prop_oneof![
        4 => (arb_id(), arb_label()).prop_map(|(id, label)| GenLine::Object { id, label }),
        4 => (arb_id(), prop::array::uniform4(arb_coord()))
            .prop_map(|(id, corners)| GenLine::BBox { id, corners }),
        1 => (arb_id(), arb_id()).prop_map(|(from, to)| GenLine::Relation { from, to }),
        1 => Just(GenLine::Comment),
    ]
}

pub fn arb_lines(max: usize) -> impl Strategy<Value = Vec<GenLine>> {
    prop::collection::vec(arb_line(), 0..max)
}

pub fn render(lines: &[GenLine]) -> String {
    let mut text = String::new();
    for line in lines {
        text.push_str(&line.render());
        text.push('\n');
    }
    text
}

/// Expected extraction: object ids in first-declaration order with the last
/// label and last box for each, keeping only ids that have both.
pub fn expected_objects(lines: &[GenLine]) -> Vec<(String, String, [f64; 4])> {
    let mut order: Vec<String> = Vec::new();
    let mut labels: HashMap<String, String> = HashMap::new();
    let mut boxes: HashMap<String, [f64; 4]> = HashMap::new();

    for line in lines {
        match line {
            GenLine::Object { id, label } => {
                if labels.insert(id.clone(), label.clone()).is_none() {
                    order.push(id.clone());
                }
            }
            GenLine::BBox { id, corners } => {
                let [x1, y1, x2, y2] = *corners;
                boxes.insert(
                    id.clone(),
                    [x1.min(x2), y1.min(y2), x1.max(x2), y1.max(y2)],
                );
            }
            GenLine::Relation { .. } | GenLine::Comment => {}
        }
    }

    order
        .into_iter()
        .filter_map(|id| {
            let bbox = *boxes.get(&id)?;
            let label = labels.get(&id)?.clone();
            Some((id, label, bbox))
        })
        .collect()
}
