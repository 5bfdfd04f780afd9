//! Shared helpers: Polars schema construction and the least-squares
//! estimator used by the standard-curve fitter.

mod stats;

use polars::prelude::*;

pub use stats::{least_squares, LinearFit};

/// Creates a schema from separate arrays of names and data types.
pub(crate) fn schema_from_arrays(
    names: &[&str],
    dtypes: &[DataType],
) -> Schema {
    Schema::from_iter(
        names
            .iter()
            .map(|n| PlSmallStr::from(*n))
            .zip(dtypes.iter().cloned()),
    )
}
