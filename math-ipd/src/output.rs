//! Output JSON for sweeps and step-size studies

use crate::config::IpdConfig;
use crate::error::Result;
use crate::study::StepSizeStudy;
use crate::sweep::SweepRecord;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Run metadata written alongside the results
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutputMetadata {
    /// Run description from the configuration
    pub description: String,
    /// Author from the configuration
    pub author: String,
    /// Local time the output was produced
    pub date: String,
    /// Library version
    pub version: String,
    /// Worker threads available to the cell evaluation
    pub threads: usize,
}

/// Complete results of one invocation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SweepOutput {
    /// Configuration the run used
    pub config: IpdConfig,
    /// One record per (frequency, strategy, standoff)
    pub records: Vec<SweepRecord>,
    /// Step-size study, when requested
    pub step_size: Option<StepSizeStudy>,
    pub metadata: OutputMetadata,
}

impl SweepOutput {
    /// Bundle results with a timestamp.
    pub fn new(config: &IpdConfig, records: Vec<SweepRecord>, step_size: Option<StepSizeStudy>) -> Self {
        Self {
            metadata: OutputMetadata {
                description: config.metadata.description.clone(),
                author: config.metadata.author.clone(),
                date: chrono::Local::now().format("%Y-%m-%d %H:%M:%S").to_string(),
                version: crate::version().to_string(),
                threads: math_em_numerics::parallel::num_threads(),
            },
            config: config.clone(),
            records,
            step_size,
        }
    }

    /// Save to JSON file
    pub fn save_json(&self, path: impl AsRef<Path>) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }

    /// Load from JSON file
    pub fn load_json(path: impl AsRef<Path>) -> Result<Self> {
        let json = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&json)?)
    }

    /// Print a per-record table to stdout
    pub fn print_summary(&self) {
        println!(
            "{:>12} {:>16} {:>10} {:>14} {:>12} {:>8}",
            "f (Hz)", "strategy", "d (m)", "S_ab (W/m²)", "rel. error", "ms"
        );
        for r in &self.records {
            let error = r
                .relative_error
                .map(|e| format!("{e:.3e}"))
                .unwrap_or_else(|| "-".to_string());
            println!(
                "{:>12.4e} {:>16} {:>10.4} {:>14.6e} {:>12} {:>8}",
                r.frequency, r.strategy, r.standoff, r.absorbed_power, error, r.duration_ms
            );
        }

        if let Some(study) = &self.step_size {
            println!();
            println!("step-size study ({:?}, {} samples)", study.precision, study.samples);
            for p in &study.fd_curve {
                println!("  δ = {:>9.2e}  RMSE = {:.3e}", p.delta, p.rmse);
            }
            if let Some(best) = study.optimal {
                println!("  optimal δ = {:.2e} (RMSE {:.3e})", best.delta, best.rmse);
            }
            println!("  AD RMSE = {:.3e}", study.ad_rmse);
        }
    }
}
