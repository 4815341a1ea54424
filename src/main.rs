use std::{env, fmt, io, str::FromStr, time::Duration};

use log::info;

use pi_scaling::{
    RunBudget, RunConfig, SweepConfig,
    config::{DEFAULT_CHUNK_SIZE, DEFAULT_TIME_LIMIT},
    report, run_sweep,
};

const DEFAULT_MAX_WORKERS: usize = 20;
const DEFAULT_RESULTS_PATH: &str = "pi_scaling_results.json";

fn main() -> io::Result<()> {
    env_logger::init();

    let time_limit = match env::var("TIME_LIMIT_SECS") {
        Ok(raw) => {
            let secs: f64 = raw
                .parse()
                .map_err(|e| io::Error::other(format!("invalid TIME_LIMIT_SECS: {e}")))?;
            Duration::try_from_secs_f64(secs)
                .map_err(|e| io::Error::other(format!("invalid TIME_LIMIT_SECS: {e}")))?
        }
        Err(_) => DEFAULT_TIME_LIMIT,
    };
    let chunk_size: u64 = env_parsed("CHUNK_SIZE", DEFAULT_CHUNK_SIZE)?;
    let max_workers: usize = env_parsed("MAX_WORKERS", DEFAULT_MAX_WORKERS)?;
    if max_workers == 0 {
        return Err(io::Error::other("MAX_WORKERS must be at least 1"));
    }
    let results_path = env::var("RESULTS_PATH").unwrap_or_else(|_| DEFAULT_RESULTS_PATH.into());

    let config = SweepConfig {
        worker_counts: 1..=max_workers,
        run: RunConfig {
            chunk_size,
            budget: RunBudget::TimeLimit(time_limit),
        },
    };

    info!(
        "sweeping 1..={max_workers} worker(s), {:.0}s per run, chunk size {chunk_size}",
        time_limit.as_secs_f64()
    );
    let results = run_sweep(&config)?;

    print!("{}", report::render_table(&results));
    report::write_json(&results_path, &results)?;
    info!("results written to {results_path}");

    Ok(())
}

fn env_parsed<T>(key: &str, default: T) -> io::Result<T>
where
    T: FromStr,
    T::Err: fmt::Display,
{
    match env::var(key) {
        Ok(raw) => raw
            .parse()
            .map_err(|e| io::Error::other(format!("invalid {key}: {e}"))),
        Err(_) => Ok(default),
    }
}
