use anyhow::{bail, Context};
use log::*;
use polars::prelude::*;

use crate::data_structs::curve::CurveFit;
use crate::data_structs::protocol::is_standard_sample;
use crate::data_structs::schema::QpcrCol;
use crate::utils::least_squares;

/// One usable point of the dilution ladder.
#[derive(Debug, Clone, PartialEq)]
pub struct StandardPoint {
    pub sample: String,
    pub log10_conc: f64,
    pub cq: f64,
}

/// Fits the log-linear standard curve from the normalized table.
///
/// Only rows whose sample name carries the ladder prefix contribute,
/// and only when both a positive known concentration (the resolved
/// dilution) and a measured mean Cq are present. Ladder wells that
/// never amplified simply drop out of the regression.
pub fn fit_standard_curve(normalized: &DataFrame) -> anyhow::Result<CurveFit> {
    let points = collect_standard_points(normalized)?;
    if points.is_empty() {
        bail!("no standard samples found in the data");
    }
    if points.len() < 2 {
        bail!("not enough valid standard points for regression");
    }
    debug!("fitting standard curve from {} ladder points", points.len());

    let x: Vec<f64> = points.iter().map(|p| p.log10_conc).collect();
    let y: Vec<f64> = points.iter().map(|p| p.cq).collect();
    let fit = least_squares(&x, &y)
        .context("standard curve regression failed")?;

    let curve = CurveFit::try_new(fit.slope, fit.intercept, fit.r_squared)?;
    info!(
        "standard curve: slope {:.4}, intercept {:.4}, R^2 {:.4}, efficiency {:.2}%",
        curve.slope(),
        curve.intercept(),
        curve.r_squared(),
        curve.efficiency() * 100.0
    );
    Ok(curve)
}

fn collect_standard_points(
    normalized: &DataFrame,
) -> anyhow::Result<Vec<StandardPoint>> {
    let samples = normalized.column(QpcrCol::Sample.as_str())?.str()?;
    let dilutions = normalized.column(QpcrCol::Dilution.as_str())?.f64()?;
    let cqs = normalized.column(QpcrCol::Cq.as_str())?.f64()?;

    let mut points = Vec::new();
    for idx in 0..normalized.height() {
        let Some(sample) = samples.get(idx) else { continue };
        if !is_standard_sample(sample) {
            continue;
        }
        let (Some(conc), Some(cq)) = (dilutions.get(idx), cqs.get(idx)) else {
            debug!("ladder point '{}' lacks concentration or Cq, skipped", sample);
            continue;
        };
        if conc <= 0.0 {
            warn!("ladder point '{}' has non-positive concentration, skipped", sample);
            continue;
        }
        points.push(StandardPoint {
            sample: sample.to_string(),
            log10_conc: conc.log10(),
            cq,
        });
    }
    Ok(points)
}
