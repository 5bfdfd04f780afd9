use anyhow::{bail, Context};
use itertools::izip;
use log::*;
use polars::prelude::*;

use crate::data_structs::protocol::DilutionScheme;
use crate::data_structs::schema::{QpcrCol, RawColumns};
use crate::data_structs::well::WellRecord;

/// Turns raw export rows into typed [`WellRecord`]s and collapses the
/// replicate wells into a (Sample, dilution) -> mean Cq table.
///
/// Absent Cq values are ignored inside each group; a group whose wells
/// all failed to amplify keeps an absent mean instead of zero. Rows
/// whose dilution no strategy could resolve stay in the table with a
/// null dilution and are skipped by the curve fit later.
pub fn normalize(
    raw: &DataFrame,
    scheme: &DilutionScheme,
) -> anyhow::Result<DataFrame> {
    for name in RawColumns::colnames() {
        if raw.get_column_index(name).is_none() {
            bail!("instrument export is missing required column '{}'", name);
        }
    }

    let records = parse_records(raw, scheme)?;
    info!("normalized {} wells from instrument export", records.len());

    let samples: Vec<Option<String>> = records
        .iter()
        .map(|r| r.sample_name.clone())
        .collect();
    let dilutions: Vec<Option<f64>> = records
        .iter()
        .map(|r| r.dilution_factor)
        .collect();
    let cqs: Vec<Option<f64>> = records.iter().map(|r| r.cq).collect();

    let per_well = df!(
        QpcrCol::Sample.as_str() => samples,
        QpcrCol::Dilution.as_str() => dilutions,
        QpcrCol::Cq.as_str() => cqs,
    )?;

    let grouped = per_well
        .lazy()
        .group_by([QpcrCol::Sample.col(), QpcrCol::Dilution.col()])
        .agg([QpcrCol::Cq.col().mean()])
        .collect()
        .context("failed to aggregate replicate wells")?;

    debug!(
        "{} (sample, dilution) groups after replicate averaging",
        grouped.height()
    );
    Ok(grouped)
}

/// Parses every raw row into a typed record. Any structural problem
/// (missing position, malformed Cq) aborts the run.
fn parse_records(
    raw: &DataFrame,
    scheme: &DilutionScheme,
) -> anyhow::Result<Vec<WellRecord>> {
    // The export may type these columns as numbers or text depending on
    // the instrument software version, so everything goes through a
    // string cast before parsing.
    let well = raw
        .column(RawColumns::Well.as_str())?
        .cast(&DataType::String)?;
    let position = raw
        .column(RawColumns::WellPosition.as_str())?
        .cast(&DataType::String)?;
    let sample = raw
        .column(RawColumns::Sample.as_str())?
        .cast(&DataType::String)?;
    let target = raw
        .column(RawColumns::Target.as_str())?
        .cast(&DataType::String)?;
    let cq = raw
        .column(RawColumns::Cq.as_str())?
        .cast(&DataType::String)?;

    let mut records = Vec::with_capacity(raw.height());
    for (well_id, position, sample, target, cq) in izip!(
        well.str()?.into_iter(),
        position.str()?.into_iter(),
        sample.str()?.into_iter(),
        target.str()?.into_iter(),
        cq.str()?.into_iter()
    ) {
        let record =
            WellRecord::from_raw(well_id, position, sample, target, cq, scheme)?;
        if record.dilution_factor.is_none() {
            debug!(
                "well {} (sample {:?}) has no dilution lookup match",
                record.well_position, record.sample_name
            );
        }
        records.push(record);
    }
    Ok(records)
}
