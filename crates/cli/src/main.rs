use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use indicatif::{ProgressBar, ProgressStyle};
use log::info;

use fibersweep_core::solver::{ModeSolver, SerialSolver};
use fibersweep_driver::{DiscoveryPolicy, SweepConfig, SweepDriver, SweepStats};
use fibersweep_solver_rayon::RayonSolver;

#[derive(Parser, Debug)]
#[command(name = "fibersweep", about = "Sweep fiber mode characteristics over a parameter grid")]
struct Cli {
    /// Path to a TOML sweep configuration file
    #[arg(short, long)]
    config: PathBuf,
    /// Override the output path from the configuration
    #[arg(short, long)]
    output: Option<PathBuf>,
    /// Solver execution strategy
    #[arg(long, value_enum, default_value_t = SolverArg::Rayon)]
    solver: SolverArg,
    /// Thread count for the parallel solver (defaults to all CPUs)
    #[arg(long)]
    threads: Option<usize>,
    /// Mode discovery policy
    #[arg(long, value_enum, default_value_t = DiscoveryArg::Extremal)]
    discovery: DiscoveryArg,
    /// Report the expanded sweep without solving anything
    #[arg(long)]
    dry_run: bool,
    /// Suppress progress output
    #[arg(long)]
    quiet: bool,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum SolverArg {
    Serial,
    Rayon,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum DiscoveryArg {
    /// Probe only the largest outer-radius configuration
    Extremal,
    /// Probe every outer-radius configuration
    EverySlice,
}

impl From<DiscoveryArg> for DiscoveryPolicy {
    fn from(value: DiscoveryArg) -> Self {
        match value {
            DiscoveryArg::Extremal => DiscoveryPolicy::LargestOuterRadius,
            DiscoveryArg::EverySlice => DiscoveryPolicy::EverySlice,
        }
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(if cli.quiet { "warn" } else { "info" }),
    )
    .init();

    let mut config = SweepConfig::from_file(&cli.config)?;
    if let Some(output) = cli.output.clone() {
        config.output.path = output;
    }
    info!("loaded sweep config from {}", cli.config.display());

    if cli.dry_run {
        print_summary(&config);
        println!("  [dry run - nothing will be solved]");
        return Ok(());
    }

    if !cli.quiet {
        print_summary(&config);
    }

    let discovery = cli.discovery.into();
    let stats = match cli.solver {
        SolverArg::Serial => run_sweep(config, SerialSolver, discovery, cli.quiet)?,
        SolverArg::Rayon => {
            let solver = RayonSolver::new(cli.threads)?;
            run_sweep(config, solver, discovery, cli.quiet)?
        }
    };

    println!(
        "done: {} slices computed, {} skipped, {} modes in {:.2}s",
        stats.slices_computed,
        stats.slices_skipped,
        stats.n_modes,
        stats.elapsed.as_secs_f64()
    );
    Ok(())
}

fn print_summary(config: &SweepConfig) {
    let grids = &config.grids;
    println!(
        "sweep: nrho={} nr2={} nc2={} ({} grid points)",
        grids.nrho,
        grids.r2.len(),
        grids.c2.len(),
        config.points()
    );
    println!(
        "  r2: {:.3}-{:.3} um   c2: {:.3}-{:.3}",
        grids.r2.start * 1e6,
        grids.r2.end * 1e6,
        grids.c2.start,
        grids.c2.end
    );
    println!("  output: {}", config.output.path.display());
}

fn run_sweep<S: ModeSolver>(
    config: SweepConfig,
    solver: S,
    discovery: DiscoveryPolicy,
    quiet: bool,
) -> Result<SweepStats, fibersweep_driver::DriverError> {
    let nr2 = config.grids.r2.len();
    let mut driver = SweepDriver::new(config, solver).with_discovery(discovery);

    let pb = if quiet {
        ProgressBar::hidden()
    } else {
        let pb = ProgressBar::new(nr2 as u64);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta}) {msg}")
                .unwrap()
                .progress_chars("█▓░"),
        );
        pb
    };

    let stats = driver.run_with_progress(|event| {
        pb.set_message(if event.skipped {
            format!("r2={:.3} um (resumed)", event.r2 * 1e6)
        } else {
            format!("r2={:.3} um", event.r2 * 1e6)
        });
        pb.inc(1);
    })?;
    pb.finish_and_clear();
    Ok(stats)
}
