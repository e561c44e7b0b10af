use std::fs::File;
use std::io::{self, BufReader, Read, Write};

use anyhow::{Context, Result};

use restock_thresholds::{InputRecord, ThresholdJob};

mod config;

use config::CliConfig;

fn main() -> Result<()> {
    match std::env::var("RESTOCK_LOG_FORMAT").as_deref() {
        Ok("pretty") => restock_observability::init_pretty(),
        _ => restock_observability::init(),
    }

    let config = CliConfig::from_env().context("invalid RESTOCK_* configuration")?;

    // Rows as a JSON array, from the file given as the only argument or stdin.
    let records = match std::env::args().nth(1) {
        Some(path) => {
            let file = File::open(&path).with_context(|| format!("failed to open {path}"))?;
            read_records(BufReader::new(file)).with_context(|| format!("failed to read rows from {path}"))?
        }
        None => read_records(io::stdin().lock()).context("failed to read rows from stdin")?,
    };

    let report = ThresholdJob::new(&records, config.thresholds)
        .with_policy(config.policy)
        .with_parallel(config.parallel)
        .run()
        .context("threshold analysis failed")?;

    tracing::info!("{}", report.message());

    let mut out = io::stdout().lock();
    serde_json::to_writer_pretty(&mut out, &report).context("failed to write report")?;
    writeln!(out)?;
    Ok(())
}

fn read_records<R: Read>(reader: R) -> Result<Vec<InputRecord>> {
    let records: Vec<InputRecord> = serde_json::from_reader(reader)?;
    Ok(records)
}
