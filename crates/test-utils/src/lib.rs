//! Shared test utilities for the road-weather bridge workspace.
//!
//! This crate provides common testing infrastructure including:
//! - Approximate float assertions
//! - Fixtures (coordinates, unit strings, a station configuration)
//! - Generators for coordinate sweeps, time axes, horizons and grids
//!
//! It deliberately depends on no workspace crate, so any crate can take it
//! as a dev-dependency without a cycle.
//!
//! # Usage
//!
//! ```toml
//! [dev-dependencies]
//! test-utils = { path = "../test-utils" }
//! ```

pub mod fixtures;
pub mod generators;

pub use fixtures::*;
pub use generators::*;

/// Write `contents` to a fresh temporary file and return its handle.
///
/// The file is removed when the handle is dropped.
pub fn write_temp_file(suffix: &str, contents: &str) -> tempfile::NamedTempFile {
    use std::io::Write;

    let mut file = tempfile::Builder::new()
        .suffix(suffix)
        .tempfile()
        .unwrap_or_else(|e| panic!("failed to create temp file: {}", e));
    file.write_all(contents.as_bytes())
        .unwrap_or_else(|e| panic!("failed to write temp file: {}", e));
    file
}

/// Macro for approximate floating-point equality assertions.
///
/// ```ignore
/// use test_utils::assert_approx_eq;
///
/// assert_approx_eq!(1.0001_f64, 1.0_f64, 0.001_f64); // passes
/// ```
#[macro_export]
macro_rules! assert_approx_eq {
    ($left:expr, $right:expr, $epsilon:expr) => {{
        let left: f64 = $left as f64;
        let right: f64 = $right as f64;
        let epsilon: f64 = $epsilon as f64;
        let diff = (left - right).abs();
        if diff > epsilon {
            panic!(
                "assertion failed: `(left ≈ right)`\n  left: `{:?}`,\n right: `{:?}`,\n  diff: `{:?}` > epsilon `{:?}`",
                left, right, diff, epsilon
            );
        }
    }};
}

/// Approximate equality of `(lat, lon)` pairs.
#[macro_export]
macro_rules! assert_coords_approx_eq {
    (($lat1:expr, $lon1:expr), ($lat2:expr, $lon2:expr), $epsilon:expr) => {{
        $crate::assert_approx_eq!($lat1, $lat2, $epsilon);
        $crate::assert_approx_eq!($lon1, $lon2, $epsilon);
    }};
}
