use clap::Parser;
use nalgebra::DMatrix;
use tracing::{error, info};
use tracing_subscriber::filter::LevelFilter;

use wigner_bloch::{
    read_run_config, write_wignerfunction, BlochParams, PhaseSpaceGrid, Result, RunConfig,
    WignerBloch, WignerMoyal,
};

#[derive(Parser, Debug)]
#[command(version, about = "Gibbs state Wigner function by Bloch propagation", long_about = None)]
struct Args {
    #[arg(short, long, default_value = "config.yml")]
    config: String,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info")]
    log_level: String,
}

fn main() {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_max_level(args.log_level.parse::<LevelFilter>().unwrap_or(LevelFilter::INFO))
        .with_target(false)
        .with_thread_ids(false)
        .init();

    if let Err(e) = run(&args) {
        error!("{e}");
        std::process::exit(1);
    }
}

fn run(args: &Args) -> Result<()> {
    let config = read_run_config(&args.config)?;
    info!(config = %args.config, system = ?config.system, "configuration loaded");

    let mut bloch = WignerBloch::new(config.bloch_params())?;
    let gibbs = bloch.get_gibbs_state().clone();
    let grid = bloch.grid().clone();
    let schedule = *bloch.schedule();

    let norm = gibbs.sum() * grid.cell_area();
    let hamiltonian = bloch.propagator().hamiltonian().clone();
    let t = config.t;
    let energy = bloch.propagator().average(|x, p| hamiltonian.energy(x, p, t));
    info!(norm, energy, beta = schedule.beta(), "Gibbs state computed");

    if let Some(exact) = config.system.exact_gibbs_state(&grid, schedule.kt) {
        let error = (&gibbs - &exact).amax();
        info!(
            error,
            scaled_error = error * grid.cell_area(),
            "deviation from the analytic Gibbs state"
        );
    }

    if config.stationarity_steps > 0 {
        check_stationarity(&config, grid.clone(), &gibbs)?;
    }

    if let Some(path) = &config.output {
        write_wignerfunction(path, &grid, &gibbs)?;
        info!(path = %path.display(), "Gibbs state written");
    }
    Ok(())
}

/// Propagate the Gibbs state in real time; it should not change.
fn check_stationarity(
    config: &RunConfig,
    grid: PhaseSpaceGrid,
    gibbs: &DMatrix<f64>,
) -> Result<()> {
    let BlochParams { hamiltonian, t, boundary, .. } = config.bloch_params();
    let cell = grid.cell_area();
    let mut propagator = WignerMoyal::real_time(grid, hamiltonian, config.dt, t, boundary)?;
    propagator.set_wignerfunction(gibbs.clone())?;
    let evolved = propagator.propagate(config.stationarity_steps);
    let deviation = (evolved - gibbs).amax() * cell;
    info!(
        steps = config.stationarity_steps,
        dt = config.dt,
        deviation,
        "stationarity check"
    );
    Ok(())
}
