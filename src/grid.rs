//! Discretized phase space and its Fourier-dual coordinates.
//!
//! Arrays are stored as `DMatrix<f64>` with rows indexing momentum (or its
//! dual θ) and columns indexing position (or its dual λ):
//!
//!   x[(i, j)] = (j - Nx/2) dx        p[(i, j)] = (i - Np/2) dp
//!   λ[(i, j)] = fftfreq(j) dλ        θ[(i, j)] = fftfreq(i) dθ
//!
//! with dθ = 2π / (2 p_amplitude) and dλ = 2π / (2 x_amplitude), so that θ is
//! conjugate to p and λ is conjugate to x under the discrete Fourier transform.

use std::f64::consts::PI;

use nalgebra::DMatrix;
use serde::{Deserialize, Serialize};

use crate::error::{Result, WignerError};

/// Grid resolution and extents.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GridParams {
    pub x_grid_dim: usize,
    pub x_amplitude: f64,
    pub p_grid_dim: usize,
    pub p_amplitude: f64,
}

impl GridParams {
    pub fn new(x_grid_dim: usize, x_amplitude: f64, p_grid_dim: usize, p_amplitude: f64) -> Self {
        Self {
            x_grid_dim,
            x_amplitude,
            p_grid_dim,
            p_amplitude,
        }
    }

    /// Square grid with the same resolution and extent in x and p.
    pub fn square(grid_dim: usize, amplitude: f64) -> Self {
        Self::new(grid_dim, amplitude, grid_dim, amplitude)
    }
}

/// Phase-space lattice with coordinate arrays X, P, Theta and Lambda.
#[derive(Clone, Debug)]
pub struct PhaseSpaceGrid {
    pub x_grid_dim: usize,
    pub x_amplitude: f64,
    pub p_grid_dim: usize,
    pub p_amplitude: f64,
    pub dx: f64,
    pub dp: f64,
    pub dtheta: f64,
    pub dlambda: f64,
    pub x: DMatrix<f64>,
    pub p: DMatrix<f64>,
    pub theta: DMatrix<f64>,
    pub lambda: DMatrix<f64>,
}

impl PhaseSpaceGrid {
    pub fn new(params: GridParams) -> Result<Self> {
        check_axis("x", params.x_grid_dim, params.x_amplitude)?;
        check_axis("p", params.p_grid_dim, params.p_amplitude)?;

        let GridParams {
            x_grid_dim,
            x_amplitude,
            p_grid_dim,
            p_amplitude,
        } = params;

        let dx = 2.0 * x_amplitude / x_grid_dim as f64;
        let dp = 2.0 * p_amplitude / p_grid_dim as f64;
        let dtheta = 2.0 * PI / (2.0 * p_amplitude);
        let dlambda = 2.0 * PI / (2.0 * x_amplitude);

        let x_half = (x_grid_dim / 2) as f64;
        let p_half = (p_grid_dim / 2) as f64;
        let lambda_axis = fft_frequencies(x_grid_dim, dlambda);
        let theta_axis = fft_frequencies(p_grid_dim, dtheta);

        let x = DMatrix::from_fn(p_grid_dim, x_grid_dim, |_, j| (j as f64 - x_half) * dx);
        let p = DMatrix::from_fn(p_grid_dim, x_grid_dim, |i, _| (i as f64 - p_half) * dp);
        let lambda = DMatrix::from_fn(p_grid_dim, x_grid_dim, |_, j| lambda_axis[j]);
        let theta = DMatrix::from_fn(p_grid_dim, x_grid_dim, |i, _| theta_axis[i]);

        Ok(Self {
            x_grid_dim,
            x_amplitude,
            p_grid_dim,
            p_amplitude,
            dx,
            dp,
            dtheta,
            dlambda,
            x,
            p,
            theta,
            lambda,
        })
    }

    /// (rows, columns) = (p_grid_dim, x_grid_dim).
    pub fn shape(&self) -> (usize, usize) {
        (self.p_grid_dim, self.x_grid_dim)
    }

    /// Phase-space volume of one grid cell, dx·dp.
    pub fn cell_area(&self) -> f64 {
        self.dx * self.dp
    }

    #[inline]
    pub fn x_coordinate(&self, j: usize) -> f64 {
        (j as f64 - (self.x_grid_dim / 2) as f64) * self.dx
    }

    #[inline]
    pub fn p_coordinate(&self, i: usize) -> f64 {
        (i as f64 - (self.p_grid_dim / 2) as f64) * self.dp
    }

    /// Tabulate `f(x, p)` on the grid.
    pub fn evaluate<F: Fn(f64, f64) -> f64>(&self, f: F) -> DMatrix<f64> {
        DMatrix::from_fn(self.p_grid_dim, self.x_grid_dim, |i, j| {
            f(self.x_coordinate(j), self.p_coordinate(i))
        })
    }

    /// Fail unless `array` has the grid's shape.
    pub fn ensure_shape(&self, name: &str, array: &DMatrix<f64>) -> Result<()> {
        if array.shape() != self.shape() {
            return Err(WignerError::config(format!(
                "{name} has shape {:?}, expected {:?}",
                array.shape(),
                self.shape()
            )));
        }
        Ok(())
    }
}

fn check_axis(axis: &str, grid_dim: usize, amplitude: f64) -> Result<()> {
    if grid_dim < 2 || grid_dim % 2 != 0 {
        return Err(WignerError::config(format!(
            "{axis}_grid_dim must be even and at least 2, got {grid_dim}"
        )));
    }
    if !(amplitude.is_finite() && amplitude > 0.0) {
        return Err(WignerError::config(format!(
            "{axis}_amplitude must be positive, got {amplitude}"
        )));
    }
    Ok(())
}

/// Frequencies in FFT order: 0, 1, .., n/2 - 1, -n/2, .., -1, times `step`.
fn fft_frequencies(n: usize, step: f64) -> Vec<f64> {
    (0..n)
        .map(|k| {
            let k = if k < n / 2 { k as f64 } else { k as f64 - n as f64 };
            k * step
        })
        .collect()
}

/// Damping applied to the potential kernel near the x edges of the grid.
#[derive(Copy, Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub enum AbsorbingBoundary {
    /// No damping; the mask is one everywhere.
    #[default]
    Transparent,
    /// mask(x) = |cos(π x / (2 x_amplitude))|^exponent
    SineTaper { exponent: f64 },
}

impl AbsorbingBoundary {
    pub fn mask(&self, grid: &PhaseSpaceGrid) -> Result<DMatrix<f64>> {
        match *self {
            Self::Transparent => Ok(DMatrix::from_element(grid.p_grid_dim, grid.x_grid_dim, 1.0)),
            Self::SineTaper { exponent } => {
                if !(exponent.is_finite() && exponent >= 0.0) {
                    return Err(WignerError::config(format!(
                        "absorbing boundary exponent must be non-negative, got {exponent}"
                    )));
                }
                let scale = PI / (2.0 * grid.x_amplitude);
                Ok(grid.x.map(|x| (scale * x).cos().abs().powf(exponent)))
            }
        }
    }
}

/// Fail unless `mask` matches the grid and every value lies in [0, 1].
pub fn validate_mask(grid: &PhaseSpaceGrid, mask: &DMatrix<f64>) -> Result<()> {
    grid.ensure_shape("absorbing boundary mask", mask)?;
    if let Some(bad) = mask.iter().find(|m| !(0.0..=1.0).contains(*m)) {
        return Err(WignerError::config(format!(
            "absorbing boundary mask values must lie in [0, 1], found {bad}"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_grid_steps_and_shape() {
        let grid = PhaseSpaceGrid::new(GridParams::new(64, 8.0, 32, 4.0)).unwrap();
        assert_eq!(grid.shape(), (32, 64));
        assert_relative_eq!(grid.dx, 0.25, epsilon = 1e-14);
        assert_relative_eq!(grid.dp, 0.25, epsilon = 1e-14);
        assert_relative_eq!(grid.dtheta, PI / 4.0, epsilon = 1e-14);
        assert_relative_eq!(grid.dlambda, PI / 8.0, epsilon = 1e-14);
        assert_relative_eq!(grid.cell_area(), 0.0625, epsilon = 1e-14);
    }

    #[test]
    fn test_coordinates_layout() {
        let grid = PhaseSpaceGrid::new(GridParams::square(8, 2.0)).unwrap();
        // x varies along columns, p along rows
        assert_relative_eq!(grid.x[(3, 0)], -2.0);
        assert_relative_eq!(grid.x[(3, 4)], 0.0);
        assert_relative_eq!(grid.p[(0, 5)], -2.0);
        assert_relative_eq!(grid.p[(7, 5)], 1.5);
        // duals in FFT order
        assert_relative_eq!(grid.theta[(0, 2)], 0.0);
        assert_relative_eq!(grid.theta[(3, 2)], 3.0 * grid.dtheta);
        assert_relative_eq!(grid.theta[(4, 2)], -4.0 * grid.dtheta);
        assert_relative_eq!(grid.lambda[(1, 7)], -grid.dlambda);
        assert_relative_eq!(grid.x_coordinate(6), grid.x[(0, 6)]);
        assert_relative_eq!(grid.p_coordinate(6), grid.p[(6, 0)]);
    }

    #[test]
    fn test_invalid_grid_rejected() {
        assert!(matches!(
            PhaseSpaceGrid::new(GridParams::square(7, 1.0)),
            Err(WignerError::Configuration(_))
        ));
        assert!(matches!(
            PhaseSpaceGrid::new(GridParams::square(8, -1.0)),
            Err(WignerError::Configuration(_))
        ));
    }

    #[test]
    fn test_ensure_shape() {
        let grid = PhaseSpaceGrid::new(GridParams::new(16, 4.0, 8, 4.0)).unwrap();
        assert!(grid.ensure_shape("w", &DMatrix::zeros(8, 16)).is_ok());
        assert!(grid.ensure_shape("w", &DMatrix::zeros(16, 8)).is_err());
    }

    #[test]
    fn test_sine_taper_mask() {
        let grid = PhaseSpaceGrid::new(GridParams::square(16, 4.0)).unwrap();
        let mask = AbsorbingBoundary::SineTaper { exponent: 0.5 }.mask(&grid).unwrap();
        validate_mask(&grid, &mask).unwrap();
        assert_relative_eq!(mask[(0, 8)], 1.0, epsilon = 1e-14);
        assert!(mask[(0, 0)] < 1e-6);
        assert!(mask[(0, 1)] < mask[(0, 4)]);
    }

    #[test]
    fn test_validate_mask_range() {
        let grid = PhaseSpaceGrid::new(GridParams::square(8, 4.0)).unwrap();
        let mut mask = AbsorbingBoundary::Transparent.mask(&grid).unwrap();
        assert!(validate_mask(&grid, &mask).is_ok());
        mask[(2, 2)] = 1.5;
        assert!(validate_mask(&grid, &mask).is_err());
    }
}
