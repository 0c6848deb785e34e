//! In-place Fourier transforms between phase space and its dual variables.
//!
//! Column-major storage makes every column of the matrix a contiguous run of
//! `p_grid_dim` samples at fixed x, so p ↔ θ transforms process all columns in
//! a single batched call. x ↔ λ transforms go through a row buffer.

use std::sync::Arc;

use nalgebra::DMatrix;
use num_complex::Complex64;
use rustfft::{Fft, FftPlanner};

use crate::grid::PhaseSpaceGrid;

pub struct PhaseSpaceTransform {
    p_forward: Arc<dyn Fft<f64>>,
    p_inverse: Arc<dyn Fft<f64>>,
    x_forward: Arc<dyn Fft<f64>>,
    x_inverse: Arc<dyn Fft<f64>>,
    scratch: Vec<Complex64>,
    row: Vec<Complex64>,
}

impl PhaseSpaceTransform {
    pub fn new(grid: &PhaseSpaceGrid) -> Self {
        let mut planner = FftPlanner::new();
        let p_forward = planner.plan_fft_forward(grid.p_grid_dim);
        let p_inverse = planner.plan_fft_inverse(grid.p_grid_dim);
        let x_forward = planner.plan_fft_forward(grid.x_grid_dim);
        let x_inverse = planner.plan_fft_inverse(grid.x_grid_dim);

        let scratch_len = [&p_forward, &p_inverse, &x_forward, &x_inverse]
            .iter()
            .map(|fft| fft.get_inplace_scratch_len())
            .max()
            .unwrap_or(0);

        Self {
            p_forward,
            p_inverse,
            x_forward,
            x_inverse,
            scratch: vec![Complex64::new(0.0, 0.0); scratch_len],
            row: vec![Complex64::new(0.0, 0.0); grid.x_grid_dim],
        }
    }

    /// (p, x) -> (θ, x)
    pub fn p_to_theta(&mut self, rep: &mut DMatrix<Complex64>) {
        self.p_forward
            .process_with_scratch(rep.as_mut_slice(), &mut self.scratch);
    }

    /// (θ, x) -> (p, x)
    pub fn theta_to_p(&mut self, rep: &mut DMatrix<Complex64>) {
        self.p_inverse
            .process_with_scratch(rep.as_mut_slice(), &mut self.scratch);
        let norm = 1.0 / rep.nrows() as f64;
        rep.iter_mut().for_each(|w| *w *= norm);
    }

    /// (p, x) -> (p, λ)
    pub fn x_to_lambda(&mut self, rep: &mut DMatrix<Complex64>) {
        let fft = Arc::clone(&self.x_forward);
        self.process_rows(fft.as_ref(), rep, 1.0);
    }

    /// (p, λ) -> (p, x)
    pub fn lambda_to_x(&mut self, rep: &mut DMatrix<Complex64>) {
        let fft = Arc::clone(&self.x_inverse);
        let norm = 1.0 / rep.ncols() as f64;
        self.process_rows(fft.as_ref(), rep, norm);
    }

    fn process_rows(&mut self, fft: &dyn Fft<f64>, rep: &mut DMatrix<Complex64>, norm: f64) {
        for i in 0..rep.nrows() {
            for (j, slot) in self.row.iter_mut().enumerate() {
                *slot = rep[(i, j)];
            }
            fft.process_with_scratch(&mut self.row, &mut self.scratch);
            for (j, value) in self.row.iter().enumerate() {
                rep[(i, j)] = *value * norm;
            }
        }
    }
}
