//! Core data types of the analysis pipeline: per-well records, the
//! dilution protocol, the fitted standard curve and the canonical
//! column schemas shared by every stage.

pub mod curve;
pub mod protocol;
pub mod schema;
pub mod well;

pub use curve::CurveFit;
pub use protocol::{
    is_standard_like,
    is_standard_sample,
    DilutionScheme,
    LookupStrategy,
};
pub use schema::{QpcrCol, RawColumns, ANNOTATION_COLUMNS};
pub use well::{parse_cq, parse_well_column, WellRecord, UNDETERMINED};
