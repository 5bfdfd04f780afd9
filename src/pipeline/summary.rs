use anyhow::Context;
use log::*;
use polars::prelude::*;

use crate::data_structs::protocol::is_standard_like;
use crate::data_structs::schema::QpcrCol;

/// Collapses the detailed per-dilution table into one row per
/// biological sample.
///
/// Standard-curve rows are excluded first; the remainder is grouped by
/// the measured name, the annotation name and the fragment size, so a
/// sample measured at several dilutions contributes each dilution's
/// value to the means. Aggregation ignores absent values, and a group
/// whose values are all absent keeps an absent mean.
pub fn summarize(detailed: &DataFrame) -> anyhow::Result<DataFrame> {
    let samples = detailed.column(QpcrCol::Sample.as_str())?.str()?;
    let mask: BooleanChunked = samples
        .into_iter()
        .map(|name| match name {
            Some(name) => Some(!is_standard_like(name)),
            // Annotation-only rows carry no measurement and are
            // dropped from the summary.
            None => Some(false),
        })
        .collect();

    let experimental = detailed
        .filter(&mask)
        .context("failed to filter out standard rows")?;
    debug!(
        "{} of {} detailed rows enter the summary",
        experimental.height(),
        detailed.height()
    );

    let summary = experimental
        .lazy()
        .group_by([
            QpcrCol::Sample.col(),
            QpcrCol::SampleRight.col(),
            QpcrCol::SizeTape.col(),
        ])
        .agg([
            QpcrCol::Cq.col().mean().alias(QpcrCol::MeanCq.as_str()),
            QpcrCol::UndilutedConcentration
                .col()
                .mean()
                .alias(QpcrCol::MeanUndilutedConc.as_str()),
            QpcrCol::SizeAdjustedConc
                .col()
                .mean()
                .alias(QpcrCol::MeanSizeAdjustedConc.as_str()),
            QpcrCol::Cq
                .col()
                .count()
                .alias(QpcrCol::NumReplicates.as_str()),
        ])
        .sort(
            [QpcrCol::Sample.as_str()],
            SortMultipleOptions::default(),
        )
        .collect()
        .context("failed to aggregate the per-sample summary")?;

    info!("summary holds {} samples", summary.height());
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use assert_approx_eq::assert_approx_eq;

    use super::*;

    fn detailed() -> DataFrame {
        df!(
            "Sample" => [Some("S1"), Some("S1"), Some("std 1"), None, Some("S2")],
            "Sample_right" => [Some("S1"), Some("S1"), None, Some("S3"), Some("S2")],
            "Size Tape station" => [Some(399.0), Some(399.0), None, Some(150.0), Some(200.0)],
            "dilution" => [Some(1e-4), Some(1e-5), Some(1e-1), None, Some(1e-4)],
            "Cq" => [Some(24.0), Some(27.4), Some(14.7), None, Some(25.0)],
            "undiluted_concentration" => [Some(10.0), Some(12.0), Some(1.0), None, None],
            "size_adjusted_conc" => [Some(10.0), Some(12.0), Some(1.0), None, None],
        )
        .unwrap()
    }

    #[test]
    fn dilutions_average_per_sample() {
        let summary = summarize(&detailed()).unwrap();
        assert_eq!(summary.height(), 2);

        let samples: Vec<Option<&str>> = summary
            .column("Sample")
            .unwrap()
            .str()
            .unwrap()
            .into_iter()
            .collect();
        assert_eq!(samples, vec![Some("S1"), Some("S2")]);

        let mean_cq = summary.column("mean_Cq").unwrap().f64().unwrap();
        assert_approx_eq!(mean_cq.get(0).unwrap(), 25.7, 1e-9);
        let mean_undiluted = summary
            .column("mean_undiluted_conc")
            .unwrap()
            .f64()
            .unwrap();
        assert_approx_eq!(mean_undiluted.get(0).unwrap(), 11.0, 1e-9);
    }

    #[test]
    fn standard_and_annotation_only_rows_are_excluded() {
        let summary = summarize(&detailed()).unwrap();
        let samples: Vec<Option<&str>> = summary
            .column("Sample")
            .unwrap()
            .str()
            .unwrap()
            .into_iter()
            .collect();
        assert!(!samples.contains(&Some("std 1")));
        assert!(!samples.contains(&None));
    }

    #[test]
    fn replicate_count_ignores_absent_values() {
        let summary = summarize(&detailed()).unwrap();
        let counts = summary.column("num_replicates").unwrap();
        let counts = counts.cast(&DataType::UInt32).unwrap();
        let counts = counts.u32().unwrap();
        assert_eq!(counts.get(0), Some(2));
        assert_eq!(counts.get(1), Some(1));
    }

    #[test]
    fn all_absent_group_keeps_absent_mean() {
        let summary = summarize(&detailed()).unwrap();
        let mean_undiluted = summary
            .column("mean_undiluted_conc")
            .unwrap()
            .f64()
            .unwrap();
        assert_eq!(mean_undiluted.get(1), None);
    }
}
