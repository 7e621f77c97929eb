//! Incident power density sweep: exact vs finite-difference gradients
//!
//! Usage:
//!     cargo run --release --bin ipd-sweep -- --config math-ipd/data/half_wave_1ghz.json
//!     cargo run --release --bin ipd-sweep -- --config cfg.json --study --output study.json

use anyhow::Context;
use clap::Parser;
use math_em_ipd::{IpdConfig, SweepOutput, SweepPlan, run_step_size_study, run_sweep};
use std::path::PathBuf;
use std::time::Instant;

#[derive(Parser, Debug)]
#[command(
    name = "ipd-sweep",
    about = "Estimate dipole incident power density with exact and finite-difference gradients"
)]
struct Cli {
    /// JSON configuration file
    #[arg(long)]
    config: PathBuf,

    /// Where to write the JSON results
    #[arg(long, default_value = "ipd_results.json")]
    output: PathBuf,

    /// Only run the finite-difference step-size study
    #[arg(long)]
    study: bool,

    /// Sample points over [-1, 1] for the step-size study
    #[arg(long, default_value_t = 201)]
    study_samples: usize,

    /// Number of worker threads (0 = use all available cores)
    #[arg(long, default_value_t = 0)]
    threads: usize,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let config = IpdConfig::from_file(&cli.config)
        .with_context(|| format!("loading {}", cli.config.display()))?;

    configure_threads(if config.parallel { cli.threads } else { 1 })?;

    let start = Instant::now();
    let study = run_step_size_study(config.precision, cli.study_samples)?;

    let records = if cli.study {
        Vec::new()
    } else {
        let source = config.antenna.to_source()?;
        let plan = SweepPlan {
            grid: config.target.to_grid()?,
            frequencies: config.frequencies.generate_frequencies(),
            strategies: config.derivatives.strategies(),
            options: config.estimator_options(),
        };
        run_sweep(source.as_ref(), &plan)?
    };
    log::info!("finished in {:.2} s", start.elapsed().as_secs_f64());

    let output = SweepOutput::new(&config, records, Some(study));
    output.print_summary();
    output
        .save_json(&cli.output)
        .with_context(|| format!("writing {}", cli.output.display()))?;
    println!("\nresults written to {}", cli.output.display());

    Ok(())
}

#[cfg(feature = "parallel")]
fn configure_threads(threads: usize) -> anyhow::Result<()> {
    if threads > 0 {
        rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .build_global()
            .context("configuring the thread pool")?;
    }
    Ok(())
}

#[cfg(not(feature = "parallel"))]
fn configure_threads(threads: usize) -> anyhow::Result<()> {
    if threads > 1 {
        log::warn!("built without the `parallel` feature; ignoring --threads {threads}");
    }
    Ok(())
}
