use anyhow::bail;
use once_cell::sync::Lazy;
use regex_lite::Regex;

use crate::data_structs::protocol::DilutionScheme;

/// Sentinel the instrument writes when a well never crossed the
/// fluorescence threshold.
pub const UNDETERMINED: &str = "UNDETERMINED";

static WELL_COLUMN_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(\d+)$").expect("invalid well position regex"));

/// Parses a raw Cq cell into an optional cycle count.
///
/// The UNDETERMINED sentinel (case-insensitive, surrounding whitespace
/// ignored) and an empty cell both mean "no amplification" and map to
/// `None`, never to zero or NaN. Anything else must parse as a finite
/// non-negative number.
pub fn parse_cq(raw: &str) -> anyhow::Result<Option<f64>> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed.eq_ignore_ascii_case(UNDETERMINED) {
        return Ok(None);
    }
    let value: f64 = match trimmed.parse() {
        Ok(v) => v,
        Err(_) => bail!("unparseable Cq value '{}'", raw),
    };
    if !value.is_finite() || value < 0.0 {
        bail!("Cq value '{}' is not a finite non-negative number", raw);
    }
    Ok(Some(value))
}

/// Extracts the plate column number from a well position string, e.g.
/// "A6" -> 6 or "H12" -> 12. A position without a trailing digit group
/// is a structural error in the export.
pub fn parse_well_column(position: &str) -> anyhow::Result<u32> {
    let Some(captures) = WELL_COLUMN_RE.captures(position.trim()) else {
        bail!(
            "well position '{}' has no trailing column number",
            position
        );
    };
    // The regex guarantees the capture is all digits; overflow is the
    // only remaining failure mode.
    match captures[1].parse() {
        Ok(v) => Ok(v),
        Err(_) => {
            bail!(
                "well position '{}' column number is out of range",
                position
            )
        },
    }
}

/// One physical well measurement, parsed from a raw export row.
#[derive(Debug, Clone, PartialEq)]
pub struct WellRecord {
    /// Instrument well identifier, if present.
    pub well_id: Option<String>,
    /// Row+column encoding of the well location, e.g. "A6".
    pub well_position: String,
    /// Sample the well belongs to. Empty wells carry no name.
    pub sample_name: Option<String>,
    /// Assay target, if present.
    pub target_name: Option<String>,
    /// Quantification cycle; `None` means no amplification.
    pub cq: Option<f64>,
    /// Plate column number derived from the well position.
    pub column_number: u32,
    /// Dilution factor resolved during normalization; `None` when no
    /// lookup strategy matched.
    pub dilution_factor: Option<f64>,
}

impl WellRecord {
    /// Builds a record from raw export cells and resolves its dilution
    /// factor through the scheme's prioritized lookup strategies.
    pub fn from_raw(
        well_id: Option<&str>,
        well_position: Option<&str>,
        sample_name: Option<&str>,
        target_name: Option<&str>,
        cq: Option<&str>,
        scheme: &DilutionScheme,
    ) -> anyhow::Result<Self> {
        let Some(position) = well_position else {
            bail!("export row is missing its well position");
        };
        let column_number = parse_well_column(position)?;
        let cq = match cq {
            Some(raw) => parse_cq(raw)?,
            None => None,
        };

        let mut record = WellRecord {
            well_id: well_id.map(str::to_owned),
            well_position: position.to_owned(),
            sample_name: sample_name.map(str::to_owned),
            target_name: target_name.map(str::to_owned),
            cq,
            column_number,
            dilution_factor: None,
        };
        record.dilution_factor = scheme.resolve(&record);
        Ok(record)
    }
}
