use std::fs::File;
use std::path::Path;
use std::sync::Arc;

use anyhow::{bail, Context};
use log::*;
use polars::io::mmap::MmapBytesReader;
use polars::prelude::*;

use crate::data_structs::schema::RawColumns;

/// Known instrument export layouts. An export profile fixes how many
/// leading non-data lines precede the header row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExportProfile {
    /// DA2 "Results" export: a 24-line metadata block before the header.
    #[default]
    Da2,
    /// Header on the first line; used for pre-trimmed tables.
    Plain,
}

impl ExportProfile {
    /// Number of raw lines to skip before the header row.
    pub const fn skip_rows(&self) -> usize {
        match self {
            ExportProfile::Da2 => 24,
            ExportProfile::Plain => 0,
        }
    }

    /// CSV read options for this profile. The required columns are
    /// pinned to text so the UNDETERMINED sentinel and mixed well ids
    /// can never derail their dtypes.
    pub fn read_options(&self) -> CsvReadOptions {
        CsvReadOptions::default()
            .with_has_header(true)
            .with_skip_rows(self.skip_rows())
            .with_infer_schema_length(None)
            .with_schema_overwrite(Some(Arc::new(RawColumns::schema())))
            .with_parse_options(
                CsvParseOptions::default().with_try_parse_dates(false),
            )
    }
}

/// Reads a raw instrument export from a file path.
pub fn read_results<P: AsRef<Path>>(
    path: P,
    profile: ExportProfile,
) -> anyhow::Result<DataFrame> {
    let path = path.as_ref();
    let handle = File::open(path)
        .with_context(|| format!("failed to open results file {:?}", path))?;
    let df = read_results_from_handle(handle, profile)
        .with_context(|| format!("failed to read results file {:?}", path))?;
    Ok(df)
}

/// Reads a raw instrument export from any seekable handle. Only the
/// five required columns are kept; a missing one is a fatal
/// input-shape error.
pub fn read_results_from_handle<R: MmapBytesReader + 'static>(
    handle: R,
    profile: ExportProfile,
) -> anyhow::Result<DataFrame> {
    let df = profile
        .read_options()
        .into_reader_with_file_handle(handle)
        .finish()
        .context("malformed instrument export layout")?;

    for name in RawColumns::colnames() {
        if df.get_column_index(name).is_none() {
            bail!("instrument export is missing required column '{}'", name);
        }
    }
    let df = df.select(RawColumns::colnames())?;
    info!("read {} export rows", df.height());
    Ok(df)
}
