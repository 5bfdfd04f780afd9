use std::fs::File;
use std::path::{Path, PathBuf};

use anyhow::Context;
use log::*;
use polars::prelude::*;

use crate::data_structs::schema::QpcrCol;
use crate::pipeline::AnalysisOutput;

/// Derives the summary output path from the detailed output path by
/// inserting `_summ` before the extension: `run.csv` -> `run_summ.csv`.
pub fn summary_path(path: &Path) -> PathBuf {
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let mut name = format!("{}_summ", stem);
    if let Some(ext) = path.extension() {
        name.push('.');
        name.push_str(&ext.to_string_lossy());
    }
    path.with_file_name(name)
}

/// Writes the detailed table (sorted by sample and dilution) to `path`
/// and the summary table to the `_summ` sibling path.
pub fn write_outputs(
    output: &AnalysisOutput,
    path: &Path,
) -> anyhow::Result<()> {
    let mut detailed = output
        .detailed
        .sort(
            [QpcrCol::Sample.as_str(), QpcrCol::Dilution.as_str()],
            SortMultipleOptions::default(),
        )
        .context("failed to sort detailed table")?;
    write_csv(&mut detailed, path)?;

    let summ_path = summary_path(path);
    let mut summary = output.summary.clone();
    write_csv(&mut summary, &summ_path)?;

    info!(
        "wrote detailed table to {:?} and summary to {:?}",
        path, summ_path
    );
    Ok(())
}

fn write_csv(
    df: &mut DataFrame,
    path: &Path,
) -> anyhow::Result<()> {
    let file = File::create(path)
        .with_context(|| format!("failed to create output file {:?}", path))?;
    CsvWriter::new(file)
        .include_header(true)
        .finish(df)
        .with_context(|| format!("failed to write output file {:?}", path))?;
    Ok(())
}
