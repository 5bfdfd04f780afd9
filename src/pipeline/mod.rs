//! The analysis pipeline.
//!
//! The stages run strictly in order: [`normalize`] collapses raw wells
//! into per-(sample, dilution) mean Cq values, [`join_annotation`]
//! attaches the sample sheet, [`fit_standard_curve`] regresses the
//! dilution ladder, [`back_calculate`] derives the concentration tiers
//! and [`summarize`] collapses the result to one row per sample.
//! [`QpcrAnalysis::run`] wires them together.

mod backcalc;
mod fit;
mod normalize;
mod summary;

use anyhow::bail;
use log::*;
use polars::prelude::*;

pub use backcalc::{back_calculate, REFERENCE_FRAGMENT_SIZE};
pub use fit::{fit_standard_curve, StandardPoint};
pub use normalize::normalize;
pub use summary::summarize;

use crate::data_structs::curve::CurveFit;
use crate::data_structs::protocol::DilutionScheme;
use crate::data_structs::schema::{QpcrCol, ANNOTATION_COLUMNS};

/// Everything a finished run produces.
#[derive(Debug, Clone)]
pub struct AnalysisOutput {
    /// Per-(sample, dilution) table with annotation and all three
    /// concentration tiers.
    pub detailed: DataFrame,
    /// One row per biological sample.
    pub summary: DataFrame,
    /// The fitted standard curve.
    pub fit: CurveFit,
}

/// Configured entry point for a full run.
#[derive(Debug, Clone, Default)]
pub struct QpcrAnalysis {
    scheme: DilutionScheme,
}

impl QpcrAnalysis {
    pub fn new(scheme: DilutionScheme) -> Self {
        Self { scheme }
    }

    /// Runs the whole pipeline on an instrument export and its sample
    /// annotation.
    pub fn run(
        &self,
        raw: &DataFrame,
        annotation: &DataFrame,
    ) -> anyhow::Result<AnalysisOutput> {
        info!("starting analysis of {} raw wells", raw.height());
        let normalized = normalize(raw, &self.scheme)?;
        let joined = join_annotation(&normalized, annotation)?;
        let fit = fit_standard_curve(&joined)?;
        let detailed = back_calculate(joined, &fit)?;
        let summary = summarize(&detailed)?;
        Ok(AnalysisOutput { detailed, summary, fit })
    }
}

/// Outer-joins the normalized table with the sample annotation.
///
/// Measured samples without an annotation row and annotated samples
/// without a measurement both survive the join, with the other side's
/// columns absent. The annotation's own name column comes through as
/// `Sample_right` because it clashes with the measured name.
pub fn join_annotation(
    normalized: &DataFrame,
    annotation: &DataFrame,
) -> anyhow::Result<DataFrame> {
    for name in ANNOTATION_COLUMNS {
        if annotation.get_column_index(name).is_none() {
            bail!("annotation is missing required column '{}'", name);
        }
    }

    let joined = normalized
        .clone()
        .lazy()
        .join(
            annotation.select(ANNOTATION_COLUMNS)?.lazy(),
            [QpcrCol::Sample.col()],
            [QpcrCol::Index.col()],
            JoinArgs::new(JoinType::Full),
        )
        .collect()?;

    debug!(
        "{} rows after joining {} annotation entries",
        joined.height(),
        annotation.height()
    );
    Ok(joined)
}
