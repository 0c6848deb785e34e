//! Gibbs state of a harmonic oscillator by Bloch propagation
//!
//! Run with: cargo run --release --example gibbs_harmonic
//!
//! Draws a random frequency and temperature, projects the thermal Wigner
//! function and compares it with the analytic result. The Gibbs state is then
//! used as the initial condition of real-time Wigner–Moyal dynamics, under
//! which it must stay unchanged.

use rand_distr::{Distribution, Uniform};
use wigner_bloch::{
    harmonic_gibbs_state, harmonic_oscillator, AbsorbingBoundary, BlochParams, GridParams,
    WignerBloch, WignerMoyal,
};

fn main() -> wigner_bloch::Result<()> {
    let mut rng = rand::thread_rng();
    let omega = Uniform::new(0.5, 2.0).sample(&mut rng);
    let kt = Uniform::new(0.1, 1.0).sample(&mut rng);
    let grid_dim = 512;
    let amplitude = 10.0;
    let stationarity_steps = 3000;

    println!("╔══════════════════════════════════════════════════════════════╗");
    println!("║     Wigner Bloch - Harmonic Oscillator Gibbs State           ║");
    println!("║     Imaginary-time split-operator propagation                ║");
    println!("╚══════════════════════════════════════════════════════════════╝");
    println!();
    println!("  ω  = {omega:.4}");
    println!("  kT = {kt:.4}");
    println!("  grid: {grid_dim} × {grid_dim} on [-{amplitude}, {amplitude}]²");
    println!();

    let grid = GridParams::square(grid_dim, amplitude);
    let params = BlochParams::new(grid, harmonic_oscillator(omega)).with_kt(kt);
    let mut bloch = WignerBloch::new(params)?;
    let schedule = *bloch.schedule();
    println!("  β steps: {} (dβ = {:.6})", schedule.num_beta_steps, schedule.dbeta);

    let gibbs = bloch.get_gibbs_state().clone();
    let grid = bloch.grid().clone();
    let cell = grid.cell_area();

    let exact = harmonic_gibbs_state(&grid, omega, kt);
    println!(
        "  Infinity norm between analytical and numerical state: {:.3e}",
        (&gibbs - &exact).amax() * cell
    );

    let h = harmonic_oscillator(omega);
    let mut propagator =
        WignerMoyal::real_time(grid, h, 0.01, 0.0, AbsorbingBoundary::Transparent)?;
    propagator.set_wignerfunction(gibbs.clone())?;
    let evolved = propagator.propagate(stationarity_steps);
    println!(
        "  Infinity norm between initial and final states after {} steps: {:.3e}",
        stationarity_steps,
        (evolved - &gibbs).amax() * cell
    );

    println!();
    println!("╔══════════════════════════════════════════════════════════════╗");
    println!("║  Exact Gibbs state of the harmonic oscillator:               ║");
    println!("║    W(x,p) = tanh(ω/2kT)/π · exp(-2 tanh(ω/2kT) H(x,p)/ω)     ║");
    println!("╚══════════════════════════════════════════════════════════════╝");
    Ok(())
}
