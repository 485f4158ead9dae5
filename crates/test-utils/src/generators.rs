//! Test data generators.
//!
//! Deterministic, dependency-free generators so that "for all" style
//! properties can be checked over a fixed sample.

/// Deterministic sweep of valid station coordinates.
///
/// Returns `count` `(latitude, longitude)` pairs spread over
/// [-85, 85] x [-180, 180] with irregular decimals, using a fixed-seed
/// linear congruential generator.
pub fn coordinate_sweep(count: usize) -> Vec<(f64, f64)> {
    let mut state: u64 = 0x2545_F491_4F6C_DD1D;
    let mut next = move || {
        state = state
            .wrapping_mul(6_364_136_223_846_793_005)
            .wrapping_add(1_442_695_040_888_963_407);
        (state >> 11) as f64 / (1u64 << 53) as f64
    };

    (0..count)
        .map(|_| {
            let lat = -85.0 + next() * 170.0;
            let lon = -180.0 + next() * 360.0;
            (lat, lon)
        })
        .collect()
}

/// Time-axis step values `0, 1, ..., count - 1`.
pub fn unit_steps(count: usize) -> Vec<f64> {
    (0..count).map(|i| i as f64).collect()
}

/// Uniformly sampled horizon with `count` directions.
///
/// With `closed`, a final 360° entry repeating the first elevation is added.
pub fn uniform_horizon(count: usize, elevation: f64, closed: bool) -> Vec<(f64, f64)> {
    let step = 360.0 / count as f64;
    let mut pairs: Vec<(f64, f64)> = (0..count).map(|i| (i as f64 * step, elevation)).collect();
    if closed {
        pairs.push((360.0, elevation));
    }
    pairs
}

/// Row-major grid where each cell is `base + row * 100 + col`.
///
/// Makes it trivial to check which cell an extraction picked.
pub fn indexed_grid(rows: usize, cols: usize, base: f64) -> Vec<f64> {
    let mut data = Vec::with_capacity(rows * cols);
    for row in 0..rows {
        for col in 0..cols {
            data.push(base + (row * 100 + col) as f64);
        }
    }
    data
}

/// Evenly spaced axis values starting at `first`.
pub fn axis(first: f64, step: f64, count: usize) -> Vec<f64> {
    (0..count).map(|i| first + step * i as f64).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_coordinate_sweep_in_range() {
        let coords = coordinate_sweep(500);
        assert_eq!(coords.len(), 500);
        for (lat, lon) in coords {
            assert!((-85.0..=85.0).contains(&lat));
            assert!((-180.0..=180.0).contains(&lon));
        }
    }

    #[test]
    fn test_coordinate_sweep_deterministic() {
        assert_eq!(coordinate_sweep(10), coordinate_sweep(10));
    }

    #[test]
    fn test_uniform_horizon_closed() {
        let pairs = uniform_horizon(4, 2.0, true);
        assert_eq!(pairs.len(), 5);
        assert_eq!(pairs[1], (90.0, 2.0));
        assert_eq!(pairs[4], (360.0, 2.0));
    }

    #[test]
    fn test_indexed_grid() {
        let grid = indexed_grid(3, 4, 0.0);
        assert_eq!(grid.len(), 12);
        assert_eq!(grid[4 + 2], 102.0);
    }

    #[test]
    fn test_axis() {
        assert_eq!(axis(10.0, -0.5, 3), vec![10.0, 9.5, 9.0]);
    }
}
