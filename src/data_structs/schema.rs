use polars::prelude::*;

use crate::utils::schema_from_arrays;

/// Columns expected in a raw instrument export after the header offset.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum RawColumns {
    Well,
    WellPosition,
    Sample,
    Target,
    Cq,
}

impl RawColumns {
    /// Returns the string representation of the column name.
    pub const fn as_str(&self) -> &'static str {
        match self {
            RawColumns::Well => "Well",
            RawColumns::WellPosition => "Well Position",
            RawColumns::Sample => "Sample",
            RawColumns::Target => "Target",
            RawColumns::Cq => "Cq",
        }
    }

    /// Returns an array containing all raw column names.
    pub const fn colnames() -> [&'static str; 5] {
        [
            RawColumns::Well.as_str(),
            RawColumns::WellPosition.as_str(),
            RawColumns::Sample.as_str(),
            RawColumns::Target.as_str(),
            RawColumns::Cq.as_str(),
        ]
    }

    /// Schema used when materializing raw rows in memory. Everything is
    /// read as text: Cq must survive the UNDETERMINED sentinel and the
    /// well id may or may not be numeric depending on the instrument.
    pub fn schema() -> Schema {
        schema_from_arrays(&Self::colnames(), &[
            DataType::String,
            DataType::String,
            DataType::String,
            DataType::String,
            DataType::String,
        ])
    }
}

/// Columns of the canonical pipeline tables (normalized, joined, detailed
/// and summary). Names are kept byte-compatible with the historical
/// spreadsheet outputs so downstream lab tooling keeps working.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum QpcrCol {
    Sample,
    Dilution,
    Cq,
    Index,
    SampleRight,
    SizeTape,
    Concentration,
    UndilutedConcentration,
    SizeAdjustedConc,
    MeanCq,
    MeanUndilutedConc,
    MeanSizeAdjustedConc,
    NumReplicates,
}

impl QpcrCol {
    /// Returns the string representation of the column name.
    pub const fn as_str(&self) -> &'static str {
        match self {
            QpcrCol::Sample => "Sample",
            QpcrCol::Dilution => "dilution",
            QpcrCol::Cq => "Cq",
            QpcrCol::Index => "INDEX",
            QpcrCol::SampleRight => "Sample_right",
            QpcrCol::SizeTape => "Size Tape station",
            QpcrCol::Concentration => "concentration",
            QpcrCol::UndilutedConcentration => "undiluted_concentration",
            QpcrCol::SizeAdjustedConc => "size_adjusted_conc",
            QpcrCol::MeanCq => "mean_Cq",
            QpcrCol::MeanUndilutedConc => "mean_undiluted_conc",
            QpcrCol::MeanSizeAdjustedConc => "mean_size_adjusted_conc",
            QpcrCol::NumReplicates => "num_replicates",
        }
    }

    /// Creates a Polars expression referencing this column.
    #[inline(always)]
    pub fn col(&self) -> Expr {
        col(self.as_str())
    }
}

/// Columns expected in the sample annotation table.
pub const ANNOTATION_COLUMNS: [&str; 3] = [
    QpcrCol::Index.as_str(),
    QpcrCol::Sample.as_str(),
    QpcrCol::SizeTape.as_str(),
];
