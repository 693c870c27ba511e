use std::collections::BTreeMap;
use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};

use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TelemetryError {
    #[error("{context}: {source}")]
    Io {
        context: &'static str,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse telemetry JSON: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Default, Serialize)]
pub struct TelemetrySummary {
    pub planner: PlannerTelemetrySummary,
    pub decisions: DecisionTelemetrySummary,
}

#[derive(Debug, Default, Serialize)]
pub struct PlannerTelemetrySummary {
    pub count: usize,
    pub avg_simulations: Option<f64>,
    pub avg_belief_size: Option<f64>,
    pub avg_best_margin: Option<f64>,
    pub avg_elapsed_ms: Option<f64>,
    pub fallbacks: usize,
    pub reinvigorations: usize,
    pub chosen_counts: BTreeMap<String, usize>,
}

#[derive(Debug, Default, Serialize)]
pub struct DecisionTelemetrySummary {
    pub count: usize,
    pub agent_counts: BTreeMap<String, usize>,
    pub action_counts: BTreeMap<String, usize>,
}

#[derive(Debug)]
struct Average {
    sum: f64,
    count: usize,
}

impl Average {
    fn new() -> Self {
        Self { sum: 0.0, count: 0 }
    }

    fn add(&mut self, value: f64) {
        self.sum += value;
        self.count += 1;
    }

    fn mean(&self) -> Option<f64> {
        if self.count == 0 {
            None
        } else {
            Some(self.sum / self.count as f64)
        }
    }
}

/// Aggregate planner and per-decision events from a JSON tracing log.
pub fn summarise_telemetry(path: &Path) -> Result<TelemetrySummary, TelemetryError> {
    if !path.exists() {
        return Ok(TelemetrySummary::default());
    }

    let file = File::open(path).map_err(|source| TelemetryError::Io {
        context: "opening telemetry log",
        source,
    })?;
    let reader = BufReader::new(file);

    let mut planner = PlannerTelemetrySummary::default();
    let mut simulations_avg = Average::new();
    let mut belief_avg = Average::new();
    let mut margin_avg = Average::new();
    let mut elapsed_avg = Average::new();

    let mut decisions = DecisionTelemetrySummary::default();

    for line in reader.lines() {
        let line = line.map_err(|source| TelemetryError::Io {
            context: "reading telemetry line",
            source,
        })?;
        if line.trim().is_empty() {
            continue;
        }

        let payload: Value = serde_json::from_str(&line)?;
        let target = payload
            .get("target")
            .and_then(Value::as_str)
            .unwrap_or_default();
        let fields = payload
            .get("fields")
            .and_then(Value::as_object)
            .cloned()
            .unwrap_or_default();

        match target {
            "blackjack_bot::pomcp" => {
                planner.count += 1;

                if let Some(sims) = fields.get("simulations").and_then(Value::as_f64) {
                    simulations_avg.add(sims);
                }
                if let Some(size) = fields.get("belief_size").and_then(Value::as_f64) {
                    belief_avg.add(size);
                }
                if let Some(elapsed) = fields.get("elapsed_ms").and_then(Value::as_f64) {
                    elapsed_avg.add(elapsed);
                }
                if let Some(raw_values) = fields.get("child_values") {
                    if let Some(delta) = best_margin(raw_values) {
                        margin_avg.add(delta);
                    }
                }
                if flag(fields.get("fallback")) {
                    planner.fallbacks += 1;
                }
                if flag(fields.get("reinvigorated")) {
                    planner.reinvigorations += 1;
                }

                *planner
                    .chosen_counts
                    .entry(label(fields.get("chosen")).to_ascii_lowercase())
                    .or_insert(0) += 1;
            }
            "blackjack_bench::decision" => {
                decisions.count += 1;
                *decisions
                    .agent_counts
                    .entry(label(fields.get("agent")))
                    .or_insert(0) += 1;
                *decisions
                    .action_counts
                    .entry(label(fields.get("action")))
                    .or_insert(0) += 1;
            }
            _ => {}
        }
    }

    planner.avg_simulations = simulations_avg.mean();
    planner.avg_belief_size = belief_avg.mean();
    planner.avg_best_margin = margin_avg.mean();
    planner.avg_elapsed_ms = elapsed_avg.mean();

    Ok(TelemetrySummary { planner, decisions })
}

fn label(raw: Option<&Value>) -> String {
    raw.and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .unwrap_or("<unset>")
        .to_string()
}

fn flag(raw: Option<&Value>) -> bool {
    match raw {
        Some(Value::Bool(value)) => *value,
        Some(Value::String(text)) => text == "true",
        _ => false,
    }
}

fn best_margin(raw_values: &Value) -> Option<f64> {
    let mut values = parse_value_list(raw_values)?;
    if values.len() < 2 {
        return None;
    }
    values.sort_by(|a, b| b.partial_cmp(a).unwrap_or(std::cmp::Ordering::Equal));
    Some(values[0] - values[1])
}

fn parse_value_list(raw: &Value) -> Option<Vec<f64>> {
    if let Some(array) = raw.as_array() {
        return Some(array.iter().filter_map(Value::as_f64).collect::<Vec<f64>>());
    }

    let text = raw.as_str()?;
    serde_json::from_str::<Vec<f64>>(text).ok()
}

pub fn write_summary_outputs(
    telemetry_path: &Path,
    output_dir: &Path,
) -> Result<Option<TelemetryOutputs>, TelemetryError> {
    if !telemetry_path.exists() {
        return Ok(None);
    }

    let summary = summarise_telemetry(telemetry_path)?;
    let json_path = output_dir.join("telemetry_summary.json");
    let md_path = output_dir.join("telemetry_summary.md");

    std::fs::write(
        &json_path,
        serde_json::to_vec_pretty(&summary).map_err(TelemetryError::from)?,
    )
    .map_err(|source| TelemetryError::Io {
        context: "writing telemetry summary json",
        source,
    })?;

    let markdown = render_markdown(&summary, telemetry_path);
    std::fs::write(&md_path, markdown).map_err(|source| TelemetryError::Io {
        context: "writing telemetry summary markdown",
        source,
    })?;

    Ok(Some(TelemetryOutputs {
        summary,
        json_path,
        markdown_path: md_path,
    }))
}

pub fn append_highlights_to_markdown(
    summary_path: &Path,
    outputs: &TelemetryOutputs,
) -> Result<(), TelemetryError> {
    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(summary_path)
        .map_err(|source| TelemetryError::Io {
            context: "opening summary markdown for telemetry append",
            source,
        })?;

    let mut section = String::new();
    section.push_str("\n## Telemetry Highlights\n");
    let planner = &outputs.summary.planner;
    section.push_str(&format!("- Planner searches captured: {}\n", planner.count));
    if let Some(value) = planner.avg_simulations {
        section.push_str(&format!("- Avg simulations per search: {:.1}\n", value));
    }
    if let Some(value) = planner.avg_best_margin {
        section.push_str(&format!("- Avg best vs next value: {:.3}\n", value));
    }
    if planner.count > 0 {
        section.push_str(&format!(
            "- Fallback decisions: {} | Reinvigorated roots: {}\n",
            planner.fallbacks, planner.reinvigorations
        ));
    }
    if !planner.chosen_counts.is_empty() {
        section.push_str("- Planner choices:\n");
        for (action, count) in &planner.chosen_counts {
            section.push_str(&format!("  - {}: {}\n", action, count));
        }
    }

    let decisions = &outputs.summary.decisions;
    section.push_str("\n### Decisions per Agent\n");
    if decisions.agent_counts.is_empty() {
        section.push_str("- <none>\n");
    } else {
        for (agent, count) in &decisions.agent_counts {
            section.push_str(&format!("- {}: {}\n", agent, count));
        }
    }

    write!(file, "{section}").map_err(|source| TelemetryError::Io {
        context: "writing telemetry highlights",
        source,
    })?;

    Ok(())
}

fn render_markdown(summary: &TelemetrySummary, telemetry_path: &Path) -> String {
    let mut output = String::new();
    output.push_str("# Telemetry Summary\n\n");
    output.push_str(&format!("- Source: `{}`\n", telemetry_path.display()));
    output.push('\n');

    let planner = &summary.planner;
    output.push_str("## Planner Searches\n");
    output.push_str(&format!("- Events: {}\n", planner.count));
    if let Some(value) = planner.avg_simulations {
        output.push_str(&format!("- Avg simulations: {:.1}\n", value));
    }
    if let Some(value) = planner.avg_belief_size {
        output.push_str(&format!("- Avg root belief size: {:.1}\n", value));
    }
    if let Some(value) = planner.avg_best_margin {
        output.push_str(&format!("- Avg best vs next value: {:.3}\n", value));
    }
    if let Some(value) = planner.avg_elapsed_ms {
        output.push_str(&format!("- Avg search time: {:.2} ms\n", value));
    }
    output.push_str(&format!("- Fallbacks: {}\n", planner.fallbacks));
    output.push_str(&format!("- Reinvigorations: {}\n", planner.reinvigorations));
    if !planner.chosen_counts.is_empty() {
        output.push_str("- Chosen actions:\n");
        for (action, count) in &planner.chosen_counts {
            output.push_str(&format!("  - {}: {}\n", action, count));
        }
    }
    output.push('\n');

    output.push_str("## Table Decisions\n");
    output.push_str(&format!("- Events: {}\n", summary.decisions.count));
    if summary.decisions.action_counts.is_empty() {
        output.push_str("- <none>\n");
    } else {
        for (action, count) in &summary.decisions.action_counts {
            output.push_str(&format!("- {}: {}\n", action, count));
        }
    }
    output
}

#[derive(Debug)]
pub struct TelemetryOutputs {
    pub summary: TelemetrySummary,
    pub json_path: PathBuf,
    pub markdown_path: PathBuf,
}
