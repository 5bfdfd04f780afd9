//! # qpcurve
//!
//! `qpcurve` is a Rust library and command-line tool for absolute
//! quantification of qPCR runs. It ingests an instrument "Results"
//! export, reconciles it with a sample annotation table, fits a
//! log-linear standard curve (Cq vs. log10 concentration) over the
//! calibration ladder, and back-calculates raw, dilution-corrected and
//! fragment-size-normalized concentrations for every sample.
//!
//! ## Key features
//!
//! * **Typed well records**: raw export rows become
//!   [`WellRecord`](data_structs::WellRecord)s with a validated Cq
//!   (the UNDETERMINED sentinel stays an explicit absence, never zero)
//!   and a dilution factor resolved through the assay protocol.
//! * **Swappable dilution protocols**:
//!   [`DilutionScheme`](data_structs::DilutionScheme) is an ordered
//!   list of lookup strategies (plate column table first, standard
//!   ladder names second), loadable from JSON per assay.
//! * **Standard-curve fitting**: ordinary least squares over the
//!   ladder, with slope, intercept, r² and amplification efficiency
//!   ([`CurveFit`](data_structs::CurveFit)); an inverted
//!   (positive-slope) curve is flagged, not silently accepted.
//! * **Strict null propagation**: absent Cq, dilution or fragment size
//!   surface as absent outputs; rows are never dropped and values are
//!   never coerced to zero.
//! * **Polars tables throughout**: the pipeline stages exchange
//!   DataFrames, and the annotation join is a genuine full-outer merge
//!   so annotation gaps stay visible.
//!
//! ## Usage
//!
//! ```no_run
//! use std::path::Path;
//!
//! use qpcurve::prelude::*;
//!
//! fn main() -> anyhow::Result<()> {
//!     let raw = read_results("results.csv", ExportProfile::Da2)?;
//!     let annotation = read_annotation("annotation.csv")?;
//!
//!     let output = QpcrAnalysis::default().run(&raw, &annotation)?;
//!     println!("{}", output.fit);
//!     write_outputs(&output, Path::new("out.csv"))?;
//!     Ok(())
//! }
//! ```

pub mod data_structs;
pub mod io;
pub mod pipeline;
pub mod prelude;
pub mod utils;
