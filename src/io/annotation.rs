use std::fs::File;
use std::path::Path;

use anyhow::{bail, Context};
use log::*;
use polars::io::mmap::MmapBytesReader;
use polars::prelude::*;

use crate::data_structs::schema::ANNOTATION_COLUMNS;

/// Reads the sample annotation table from a file path.
pub fn read_annotation<P: AsRef<Path>>(path: P) -> anyhow::Result<DataFrame> {
    let path = path.as_ref();
    let handle = File::open(path).with_context(|| {
        format!("failed to open annotation file {:?}", path)
    })?;
    let df = read_annotation_from_handle(handle).with_context(|| {
        format!("failed to read annotation file {:?}", path)
    })?;
    Ok(df)
}

/// Reads the annotation table from any seekable handle and keeps the
/// three columns the pipeline joins on.
pub fn read_annotation_from_handle<R: MmapBytesReader + 'static>(
    handle: R
) -> anyhow::Result<DataFrame> {
    let df = CsvReadOptions::default()
        .with_has_header(true)
        .with_infer_schema_length(None)
        .into_reader_with_file_handle(handle)
        .finish()
        .context("malformed annotation table layout")?;

    for name in ANNOTATION_COLUMNS {
        if df.get_column_index(name).is_none() {
            bail!("annotation table is missing required column '{}'", name);
        }
    }
    let df = df.select(ANNOTATION_COLUMNS)?;
    info!("read {} annotation rows", df.height());
    Ok(df)
}
