use std::{fs::File, io, path::Path};

use crate::sweep::ScalingResult;

/// Renders the sweep as an aligned text table, one row per worker count.
pub fn render_table(results: &[ScalingResult]) -> String {
    let mut out = String::new();
    out.push_str("Workers |     Iterations | Pi Estimate  | Time (s)\n");
    out.push_str(&"-".repeat(50));
    out.push('\n');

    for r in results {
        out.push_str(&format!(
            "{:7} | {:14} | {:.10} | {:8.2}\n",
            r.workers, r.iterations, r.pi_estimate, r.elapsed_secs
        ));
    }
    out
}

/// Writes the results artifact consumed by the plotting step.
pub fn write_json<P: AsRef<Path>>(path: P, results: &[ScalingResult]) -> io::Result<()> {
    let file = File::create(path)?;
    serde_json::to_writer_pretty(file, results)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_has_one_row_per_result() {
        let results = vec![
            ScalingResult {
                workers: 1,
                iterations: 4_000_000,
                pi_estimate: 3.1415924036,
                elapsed_secs: 60.01,
            },
            ScalingResult {
                workers: 2,
                iterations: 8_000_000,
                pi_estimate: 3.1415925286,
                elapsed_secs: 60.02,
            },
        ];

        let table = render_table(&results);
        let lines: Vec<&str> = table.lines().collect();

        assert_eq!(lines.len(), 4); // header, separator, two rows
        assert!(lines[2].contains("4000000"));
        assert!(lines[3].contains("3.1415925286"));
    }
}
