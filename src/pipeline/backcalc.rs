use anyhow::Context;
use log::*;
use polars::prelude::*;

use crate::data_structs::curve::CurveFit;
use crate::data_structs::schema::QpcrCol;

/// Fragment length the size-adjusted concentration is normalized to.
pub const REFERENCE_FRAGMENT_SIZE: f64 = 399.0;

/// Appends the three concentration tiers to the annotated table.
///
/// Every tier propagates absence strictly: a missing mean Cq yields a
/// missing concentration, a missing (or zero) dilution yields a missing
/// undiluted concentration, and a missing (or zero) fragment size
/// yields a missing size-adjusted concentration. No placeholder zeros
/// are ever written.
pub fn back_calculate(
    mut joined: DataFrame,
    fit: &CurveFit,
) -> anyhow::Result<DataFrame> {
    let cqs: Vec<Option<f64>> = joined
        .column(QpcrCol::Cq.as_str())?
        .f64()?
        .into_iter()
        .collect();
    let dilutions: Vec<Option<f64>> = joined
        .column(QpcrCol::Dilution.as_str())?
        .f64()?
        .into_iter()
        .collect();
    let sizes: Vec<Option<f64>> = joined
        .column(QpcrCol::SizeTape.as_str())?
        .cast(&DataType::Float64)
        .context("fragment size column is not numeric")?
        .f64()?
        .into_iter()
        .collect();

    let concentration: Vec<Option<f64>> =
        cqs.iter().map(|cq| cq.map(|cq| fit.concentration(cq))).collect();

    let undiluted: Vec<Option<f64>> = concentration
        .iter()
        .zip(dilutions.iter())
        .map(|(conc, dilution)| match (conc, dilution) {
            (Some(c), Some(d)) if *d != 0.0 => Some(c / d),
            _ => None,
        })
        .collect();

    let size_adjusted: Vec<Option<f64>> = undiluted
        .iter()
        .zip(sizes.iter())
        .map(|(undiluted, size)| match (undiluted, size) {
            (Some(u), Some(s)) if *s != 0.0 => {
                Some(u * (REFERENCE_FRAGMENT_SIZE / s))
            },
            _ => None,
        })
        .collect();

    debug!(
        "back-calculated {} rows ({} with undiluted concentration)",
        joined.height(),
        undiluted.iter().filter(|v| v.is_some()).count()
    );

    joined.with_column(Series::new(
        QpcrCol::Concentration.as_str().into(),
        concentration,
    ))?;
    joined.with_column(Series::new(
        QpcrCol::UndilutedConcentration.as_str().into(),
        undiluted,
    ))?;
    joined.with_column(Series::new(
        QpcrCol::SizeAdjustedConc.as_str().into(),
        size_adjusted,
    ))?;
    Ok(joined)
}
