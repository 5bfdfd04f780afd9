//! Thin I/O wrappers around the core pipeline: CSV readers for the
//! instrument export and the annotation table, and CSV writers for the
//! detailed and summary outputs.

mod annotation;
mod results;
mod write;

pub use annotation::{read_annotation, read_annotation_from_handle};
pub use results::{read_results, read_results_from_handle, ExportProfile};
pub use write::{summary_path, write_outputs};
