#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum InterpolationError {
    #[error("interpolation grid '{axis}' requires at least 2 points, got {actual}")]
    InsufficientPoints { axis: &'static str, actual: usize },
    #[error("interpolation input length mismatch: grid={grid}, values={values}")]
    LengthMismatch { grid: usize, values: usize },
    #[error(
        "interpolation grid '{axis}' must be strictly increasing, index {index} has {current} after {previous}"
    )]
    NonIncreasingGrid {
        axis: &'static str,
        index: usize,
        previous: f64,
        current: f64,
    },
    #[error("interpolation grid '{axis}' must contain finite values, index {index} got {value}")]
    NonFiniteGridValue {
        axis: &'static str,
        index: usize,
        value: f64,
    },
    #[error("interpolation query must be finite, got {value}")]
    NonFiniteQuery { value: f64 },
}

/// `count` evenly spaced points from `start` to `stop` inclusive.
pub fn linspace(start: f64, stop: f64, count: usize) -> Vec<f64> {
    match count {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            let step = (stop - start) / (count - 1) as f64;
            (0..count)
                .map(|index| {
                    if index + 1 == count {
                        stop
                    } else {
                        start + step * index as f64
                    }
                })
                .collect()
        }
    }
}

/// Piecewise-linear interpolation; queries outside the grid are linearly
/// extrapolated from the first or last segment.
pub fn interpolate_linear(x: f64, grid: &[f64], values: &[f64]) -> Result<f64, InterpolationError> {
    validate_axis("x", grid)?;
    if grid.len() != values.len() {
        return Err(InterpolationError::LengthMismatch {
            grid: grid.len(),
            values: values.len(),
        });
    }
    if !x.is_finite() {
        return Err(InterpolationError::NonFiniteQuery { value: x });
    }

    let lower = segment_index(grid, x);
    Ok(lerp(grid[lower], grid[lower + 1], values[lower], values[lower + 1], x))
}

/// Values on a regular `x` by `y` grid, stored row-major by `x`.
#[derive(Debug, Clone, PartialEq)]
pub struct BilinearTable {
    x_grid: Vec<f64>,
    y_grid: Vec<f64>,
    values: Vec<f64>,
}

impl BilinearTable {
    pub fn new(
        x_grid: Vec<f64>,
        y_grid: Vec<f64>,
        values: Vec<f64>,
    ) -> Result<Self, InterpolationError> {
        validate_axis("x", &x_grid)?;
        validate_axis("y", &y_grid)?;
        let expected = x_grid.len() * y_grid.len();
        if values.len() != expected {
            return Err(InterpolationError::LengthMismatch {
                grid: expected,
                values: values.len(),
            });
        }
        Ok(Self {
            x_grid,
            y_grid,
            values,
        })
    }

    pub fn x_grid(&self) -> &[f64] {
        &self.x_grid
    }

    pub fn y_grid(&self) -> &[f64] {
        &self.y_grid
    }

    pub fn value_at(&self, x_index: usize, y_index: usize) -> f64 {
        self.values[x_index * self.y_grid.len() + y_index]
    }

    /// Bilinear interpolation with queries clamped to the grid boundary.
    /// Non-finite queries yield NaN so the table can back a parameter function.
    pub fn evaluate(&self, x: f64, y: f64) -> f64 {
        if !x.is_finite() || !y.is_finite() {
            return f64::NAN;
        }
        let x = x.clamp(self.x_grid[0], self.x_grid[self.x_grid.len() - 1]);
        let y = y.clamp(self.y_grid[0], self.y_grid[self.y_grid.len() - 1]);

        let i = segment_index(&self.x_grid, x);
        let j = segment_index(&self.y_grid, y);
        let tx = (x - self.x_grid[i]) / (self.x_grid[i + 1] - self.x_grid[i]);
        let ty = (y - self.y_grid[j]) / (self.y_grid[j + 1] - self.y_grid[j]);

        let v00 = self.value_at(i, j);
        let v01 = self.value_at(i, j + 1);
        let v10 = self.value_at(i + 1, j);
        let v11 = self.value_at(i + 1, j + 1);

        v00 * (1.0 - tx) * (1.0 - ty)
            + v10 * tx * (1.0 - ty)
            + v01 * (1.0 - tx) * ty
            + v11 * tx * ty
    }
}

fn validate_axis(axis: &'static str, grid: &[f64]) -> Result<(), InterpolationError> {
    if grid.len() < 2 {
        return Err(InterpolationError::InsufficientPoints {
            axis,
            actual: grid.len(),
        });
    }
    for (index, value) in grid.iter().copied().enumerate() {
        if !value.is_finite() {
            return Err(InterpolationError::NonFiniteGridValue { axis, index, value });
        }
        if index > 0 && value <= grid[index - 1] {
            return Err(InterpolationError::NonIncreasingGrid {
                axis,
                index,
                previous: grid[index - 1],
                current: value,
            });
        }
    }
    Ok(())
}

// Index of the segment [grid[i], grid[i + 1]] used for `x`; end segments
// cover everything outside the grid.
fn segment_index(grid: &[f64], x: f64) -> usize {
    let last_segment = grid.len() - 2;
    match grid.binary_search_by(|probe| probe.total_cmp(&x)) {
        Ok(index) => index.min(last_segment),
        Err(0) => 0,
        Err(upper) => (upper - 1).min(last_segment),
    }
}

fn lerp(x0: f64, x1: f64, y0: f64, y1: f64, x: f64) -> f64 {
    y0 + (y1 - y0) * (x - x0) / (x1 - x0)
}

#[cfg(test)]
mod tests {
    use super::{BilinearTable, InterpolationError, interpolate_linear, linspace};

    #[test]
    fn linspace_hits_both_endpoints() {
        let grid = linspace(0.0, 3.0, 4);
        assert_eq!(grid, vec![0.0, 1.0, 2.0, 3.0]);
        assert_eq!(linspace(0.0, 1.0, 1000).len(), 1000);
        assert_eq!(linspace(0.0, 1.0, 1000)[999], 1.0);
        assert!(linspace(0.0, 1.0, 0).is_empty());
    }

    #[test]
    fn linear_interpolation_inside_and_on_nodes() {
        let grid = [0.0, 1.0, 3.0];
        let values = [0.0, 2.0, 6.0];
        assert_eq!(interpolate_linear(0.5, &grid, &values).expect("inside"), 1.0);
        assert_eq!(interpolate_linear(1.0, &grid, &values).expect("node"), 2.0);
        assert_eq!(interpolate_linear(3.0, &grid, &values).expect("last node"), 6.0);
    }

    #[test]
    fn linear_interpolation_extrapolates_end_segments() {
        let grid = [1.0, 2.0, 4.0];
        let values = [10.0, 20.0, 30.0];
        assert!((interpolate_linear(0.0, &grid, &values).expect("below") - 0.0).abs() < 1e-12);
        assert!((interpolate_linear(6.0, &grid, &values).expect("above") - 40.0).abs() < 1e-12);
    }

    #[test]
    fn linear_interpolation_validates_inputs() {
        assert!(matches!(
            interpolate_linear(0.0, &[1.0], &[1.0]),
            Err(InterpolationError::InsufficientPoints { .. })
        ));
        assert!(matches!(
            interpolate_linear(0.0, &[0.0, 1.0], &[1.0]),
            Err(InterpolationError::LengthMismatch { .. })
        ));
        assert!(matches!(
            interpolate_linear(0.0, &[0.0, 0.0], &[1.0, 2.0]),
            Err(InterpolationError::NonIncreasingGrid { index: 1, .. })
        ));
        assert!(matches!(
            interpolate_linear(f64::NAN, &[0.0, 1.0], &[1.0, 2.0]),
            Err(InterpolationError::NonFiniteQuery { .. })
        ));
    }

    #[test]
    fn bilinear_table_reproduces_plane() {
        let x_grid = vec![0.0, 1.0, 2.0];
        let y_grid = vec![10.0, 20.0];
        let values = x_grid
            .iter()
            .flat_map(|x| y_grid.iter().map(move |y| 2.0 * x + 0.1 * y))
            .collect::<Vec<_>>();
        let table = BilinearTable::new(x_grid, y_grid, values).expect("valid table");

        assert!((table.evaluate(0.5, 15.0) - 2.5).abs() < 1e-12);
        assert!((table.evaluate(2.0, 20.0) - 6.0).abs() < 1e-12);
    }

    #[test]
    fn bilinear_table_clamps_outside_the_grid() {
        let table = BilinearTable::new(vec![0.0, 1.0], vec![0.0, 1.0], vec![0.0, 1.0, 2.0, 3.0])
            .expect("valid table");
        assert_eq!(table.evaluate(-5.0, -5.0), 0.0);
        assert_eq!(table.evaluate(5.0, 5.0), 3.0);
        assert!(table.evaluate(f64::NAN, 0.0).is_nan());
    }

    #[test]
    fn bilinear_table_checks_value_count() {
        assert!(matches!(
            BilinearTable::new(vec![0.0, 1.0], vec![0.0, 1.0], vec![0.0; 3]),
            Err(InterpolationError::LengthMismatch { grid: 4, values: 3 })
        ));
    }
}
