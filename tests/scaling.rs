use std::num::NonZeroU64;

use pi_scaling::{RunBudget, RunConfig, ScalingResult, SweepConfig, run_sweep};

#[test]
fn sweep_covers_every_worker_count_in_order() {
    const CHUNK_SIZE: u64 = 1_000;
    const BATCHES: u64 = 2;

    let config = SweepConfig {
        worker_counts: 1..=3,
        run: RunConfig {
            chunk_size: CHUNK_SIZE,
            budget: RunBudget::Batches(NonZeroU64::new(BATCHES).unwrap()),
        },
    };

    let results = run_sweep(&config).unwrap();

    let workers: Vec<usize> = results.iter().map(|r| r.workers).collect();
    assert_eq!(workers, vec![1, 2, 3]);
    for r in &results {
        assert_eq!(r.iterations, CHUNK_SIZE * r.workers as u64 * BATCHES);
    }
}

#[test]
fn results_artifact_keeps_its_field_names() {
    let results = vec![ScalingResult {
        workers: 4,
        iterations: 12_000_000,
        pi_estimate: 3.14159,
        elapsed_secs: 1.5,
    }];

    let json = serde_json::to_string(&results).unwrap();
    for field in ["workers", "iterations", "pi_estimate", "elapsed_secs"] {
        assert!(json.contains(field), "missing field {field} in {json}");
    }

    let back: Vec<ScalingResult> = serde_json::from_str(&json).unwrap();
    assert_eq!(back, results);
}
