use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use nalgebra::DMatrix;

use crate::error::Result;
use crate::grid::PhaseSpaceGrid;

/// Write a Wigner function as `x p W` rows, one block per x separated by a blank line.
pub fn write_wignerfunction(
    path: impl AsRef<Path>,
    grid: &PhaseSpaceGrid,
    wignerfunction: &DMatrix<f64>,
) -> Result<()> {
    grid.ensure_shape("wigner function", wignerfunction)?;
    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);
    writeln!(writer, "# x p W")?;
    for j in 0..grid.x_grid_dim {
        let x = grid.x_coordinate(j);
        for i in 0..grid.p_grid_dim {
            writeln!(writer, "{} {} {:e}", x, grid.p_coordinate(i), wignerfunction[(i, j)])?;
        }
        writeln!(writer)?;
    }
    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::GridParams;

    #[test]
    fn test_write_and_read_back() {
        let grid = PhaseSpaceGrid::new(GridParams::new(4, 2.0, 2, 1.0)).unwrap();
        let w = grid.evaluate(|x, p| x + 10.0 * p);
        let name = format!("wigner_bloch_output_{}.txt", std::process::id());
        let path = std::env::temp_dir().join(name);
        write_wignerfunction(&path, &grid, &w).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        std::fs::remove_file(&path).unwrap();
        let rows: Vec<Vec<f64>> = text
            .lines()
            .filter(|l| !l.is_empty() && !l.starts_with('#'))
            .map(|l| l.split_whitespace().map(|v| v.parse().unwrap()).collect())
            .collect();
        assert_eq!(rows.len(), 8);
        for row in rows {
            assert_eq!(row[2], row[0] + 10.0 * row[1]);
        }
    }

    #[test]
    fn test_shape_mismatch_rejected() {
        let grid = PhaseSpaceGrid::new(GridParams::square(4, 2.0)).unwrap();
        let path = std::env::temp_dir().join("wigner_bloch_never_written.txt");
        assert!(write_wignerfunction(&path, &grid, &DMatrix::zeros(2, 2)).is_err());
        assert!(!path.exists());
    }
}
