use std::path::Path;

use bicho_core::{GridSource, RoundReport};
use chrono::Utc;

/// Appends one CSV row per finished round.
pub struct History {
    wtr: csv::Writer<std::fs::File>,
    rows: usize,
}

impl History {
    pub fn create(path: &Path) -> anyhow::Result<Self> {
        let mut wtr = csv::Writer::from_path(path)?;
        wtr.write_record(["ts", "bet", "source", "win", "balance", "grid_json"])?;
        Ok(Self { wtr, rows: 0 })
    }

    pub fn record(&mut self, round: &RoundReport) -> anyhow::Result<()> {
        let source = match round.source {
            GridSource::Server => "server",
            GridSource::Fallback => "fallback",
        };
        self.wtr.write_record(&[
            Utc::now().to_rfc3339(),
            format!("{:.2}", round.bet),
            source.to_string(),
            format!("{:.2}", round.win_amount),
            format!("{:.2}", round.balance),
            serde_json::to_string(&round.grid)?,
        ])?;
        self.rows += 1;
        Ok(())
    }

    pub fn finish(mut self) -> anyhow::Result<usize> {
        self.wtr.flush()?;
        Ok(self.rows)
    }
}
