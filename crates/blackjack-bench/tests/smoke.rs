use std::fs;

use blackjack_bench::config::BenchmarkConfig;
use blackjack_bench::tournament::TournamentRunner;
use tempfile::tempdir;

fn load_config(output_dir: &std::path::Path, run_id: &str) -> BenchmarkConfig {
    let yaml = format!(
        r#"
run_id: "{run_id}"
table:
  seed: 4242
  rounds: 6
  rules:
    n_decks: 1
agents:
  - name: "house_style"
    policy:
      kind: "threshold"
      target: 17
  - name: "random"
    policy:
      kind: "random"
  - name: "pomcp"
    policy:
      kind: "pomcp"
      simulations: 60
      planner:
        n_particles: 24
        reinvigoration: 4
outputs:
  jsonl: "{jsonl}"
  summary_md: "{summary}"
logging:
  enable_structured: false
"#,
        jsonl = output_dir.join("rounds.jsonl").display(),
        summary = output_dir.join("summary.md").display(),
    );

    let mut cfg: BenchmarkConfig = serde_yaml::from_str(&yaml).expect("valid yaml");
    cfg.validate().expect("config validates");
    cfg
}

fn normalized_rows(path: &std::path::Path) -> Vec<serde_json::Value> {
    let jsonl = fs::read_to_string(path).expect("jsonl readable");
    jsonl
        .lines()
        .map(|line| {
            let mut value: serde_json::Value =
                serde_json::from_str(line).expect("row decodes to JSON");
            if let Some(obj) = value.as_object_mut() {
                if let Some(speed) = obj.get_mut("speed_ms_decision") {
                    *speed = serde_json::Value::Number(
                        serde_json::Number::from_f64(0.0).expect("number for normalized speed"),
                    );
                }
            }
            value
        })
        .collect()
}

#[test]
fn table_smoke_test_writes_one_row_per_seat_and_round() {
    let dir = tempdir().expect("temp dir");
    let config = load_config(dir.path(), "test_smoke");
    let outputs = config.resolved_outputs();

    let runner = TournamentRunner::new(config, outputs).expect("runner created");
    let summary = runner.run().expect("run completes");

    assert_eq!(summary.rounds_played, 6);
    assert_eq!(summary.rows_written, 18);
    assert!(summary.telemetry_path.is_none());

    let rows = normalized_rows(&summary.jsonl_path);
    assert_eq!(rows.len(), 18);
    for row in &rows {
        assert_eq!(row["run_id"], "test_smoke");
        let outcome = row["outcome"].as_str().expect("outcome string");
        assert!(["win", "loss", "push"].contains(&outcome));
        let score = row["score"].as_u64().expect("score");
        assert!(score <= 22);
        assert!(row["decisions"].as_u64().expect("decisions") >= 1);
        assert!(row["cards"].as_array().expect("cards").len() >= 2);
    }
    assert_eq!(rows[0]["round_id"], "R000000");
    assert_eq!(rows[17]["round_id"], "R000005");

    let markdown = fs::read_to_string(&summary.summary_path).expect("summary markdown");
    assert!(markdown.contains("# Table Summary"));
    assert!(markdown.contains("| pomcp | pomcp | 6 |"));
    assert!(markdown.contains("| house_style | threshold | 6 |"));
}

#[test]
fn seeded_runs_replay_identically() {
    let first_dir = tempdir().expect("temp dir");
    let second_dir = tempdir().expect("temp dir");

    let first = {
        let config = load_config(first_dir.path(), "replay");
        let outputs = config.resolved_outputs();
        TournamentRunner::new(config, outputs)
            .expect("runner")
            .run()
            .expect("first run")
    };
    let second = {
        let config = load_config(second_dir.path(), "replay");
        let outputs = config.resolved_outputs();
        TournamentRunner::new(config, outputs)
            .expect("runner")
            .run()
            .expect("second run")
    };

    assert_eq!(
        normalized_rows(&first.jsonl_path),
        normalized_rows(&second.jsonl_path),
        "seeded runs diverged"
    );
    assert_eq!(first.reshuffles, second.reshuffles);
}
