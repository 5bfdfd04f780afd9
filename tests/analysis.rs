use assert_approx_eq::assert_approx_eq;
use polars::prelude::*;
use qpcurve::prelude::*;
use rstest::*;

const SLOPE0: f64 = -3.3219;
const INTERCEPT0: f64 = 20.0;

/// Cq a perfect ladder well would report for a known concentration.
fn ladder_cq(conc: f64) -> String {
    format!("{}", INTERCEPT0 + SLOPE0 * conc.log10())
}

/// Seven-point ladder in plate column 1 (outside the dilution table so
/// the name lookup resolves the concentrations) plus two unknown
/// samples in the diluted plate columns.
fn raw_export() -> DataFrame {
    df!(
        "Well" => ["1", "2", "3", "4", "5", "6", "7", "8", "9", "10"],
        "Well Position" => ["A1", "B1", "C1", "D1", "E1", "F1", "G1", "A6", "B6", "A10"],
        "Sample" => [
            "std 0", "std 1", "std 2", "std 3", "std 4", "std 5", "std 6",
            "S1", "S1", "S2",
        ],
        "Target" => ["lib"; 10].to_vec(),
        "Cq" => [
            "UNDETERMINED".to_owned(),
            ladder_cq(100.0),
            ladder_cq(10.0),
            ladder_cq(1.0),
            ladder_cq(0.1),
            ladder_cq(0.01),
            ladder_cq(0.001),
            "24.1".to_owned(),
            "24.3".to_owned(),
            "27.5".to_owned(),
        ],
    )
    .unwrap()
}

fn annotation() -> DataFrame {
    df!(
        "INDEX" => ["S1", "S2", "S3"],
        "Sample" => ["sample one", "sample two", "sample three"],
        "Size Tape station" => [399.0, 200.0, 150.0],
    )
    .unwrap()
}

fn f64_at(
    df: &DataFrame,
    column: &str,
    idx: usize,
) -> Option<f64> {
    df.column(column).unwrap().f64().unwrap().get(idx)
}

#[rstest]
fn end_to_end_quantifies_the_two_unknowns() -> anyhow::Result<()> {
    let output = QpcrAnalysis::default().run(&raw_export(), &annotation())?;

    // The synthetic ladder is exact, so the regression recovers the
    // generating parameters.
    assert_approx_eq!(output.fit.slope(), SLOPE0, SLOPE0.abs() * 1e-6);
    assert_approx_eq!(output.fit.intercept(), INTERCEPT0, INTERCEPT0 * 1e-6);
    assert_approx_eq!(output.fit.r_squared(), 1.0, 1e-9);
    assert_approx_eq!(output.fit.efficiency(), 1.0, 0.01);
    assert!(!output.fit.is_inverted());

    // Standards are excluded; S3 exists only in the annotation and has
    // no measurement, so exactly the two unknowns remain.
    let summary = &output.summary;
    let names: Vec<Option<&str>> = summary
        .column("Sample")
        .unwrap()
        .str()
        .unwrap()
        .into_iter()
        .collect();
    assert_eq!(names, vec![Some("S1"), Some("S2")]);

    // S1: replicates averaged before back-calculation.
    let mean_cq_s1 = (24.1 + 24.3) / 2.0;
    assert_approx_eq!(
        f64_at(summary, "mean_Cq", 0).unwrap(),
        mean_cq_s1,
        1e-9
    );
    let conc_s1 = 10f64.powf((mean_cq_s1 - INTERCEPT0) / SLOPE0) * 1e-3;
    let undiluted_s1 = conc_s1 / 1e-4;
    assert_approx_eq!(
        f64_at(summary, "mean_undiluted_conc", 0).unwrap(),
        undiluted_s1,
        undiluted_s1 * 1e-4
    );
    // Reference-size fragment, so the size adjustment is a no-op.
    assert_approx_eq!(
        f64_at(summary, "mean_size_adjusted_conc", 0).unwrap(),
        undiluted_s1,
        undiluted_s1 * 1e-4
    );

    // S2: single replicate in the 1e-5 column, 200 bp fragment.
    let conc_s2 = 10f64.powf((27.5 - INTERCEPT0) / SLOPE0) * 1e-3;
    let undiluted_s2 = conc_s2 / 1e-5;
    let adjusted_s2 = undiluted_s2 * (399.0 / 200.0);
    assert_approx_eq!(
        f64_at(summary, "mean_undiluted_conc", 1).unwrap(),
        undiluted_s2,
        undiluted_s2 * 1e-4
    );
    assert_approx_eq!(
        f64_at(summary, "mean_size_adjusted_conc", 1).unwrap(),
        adjusted_s2,
        adjusted_s2 * 1e-4
    );

    let replicates = summary.column("num_replicates").unwrap().u32().unwrap();
    assert_eq!(replicates.get(0), Some(1));
    assert_eq!(replicates.get(1), Some(1));
    Ok(())
}

#[rstest]
fn outer_join_and_null_propagation_stay_visible() -> anyhow::Result<()> {
    // S9 is measured but not annotated.
    let raw = raw_export()
        .vstack(
            &df!(
                "Well" => ["11"],
                "Well Position" => ["B10"],
                "Sample" => ["S9"],
                "Target" => ["lib"],
                "Cq" => ["26.0"],
            )
            .unwrap(),
        )
        .unwrap();

    let output = QpcrAnalysis::default().run(&raw, &annotation())?;
    let detailed = &output.detailed;

    let samples = detailed.column("Sample").unwrap().str().unwrap();
    let indices = detailed.column("INDEX").unwrap().str().unwrap();

    // Annotation-only S3 survives the join with a null measurement side.
    let s3_row = indices
        .into_iter()
        .position(|v| v == Some("S3"))
        .expect("S3 row kept");
    assert_eq!(samples.get(s3_row), None);
    assert_eq!(f64_at(detailed, "Cq", s3_row), None);

    // S9 has a present undiluted concentration but no fragment size,
    // so only the size-adjusted tier is absent.
    let s9_row = samples
        .into_iter()
        .position(|v| v == Some("S9"))
        .expect("S9 row kept");
    assert!(f64_at(detailed, "undiluted_concentration", s9_row).is_some());
    assert_eq!(f64_at(detailed, "size_adjusted_conc", s9_row), None);

    // S9 still reaches the summary; the annotation-only S3 row has no
    // sample name and stays out.
    let names: Vec<Option<&str>> = output
        .summary
        .column("Sample")
        .unwrap()
        .str()
        .unwrap()
        .into_iter()
        .collect();
    assert_eq!(names, vec![Some("S1"), Some("S2"), Some("S9")]);
    Ok(())
}

#[rstest]
fn fit_runs_on_the_annotated_table() -> anyhow::Result<()> {
    // One ladder point lies off the ideal line, so repeating it through
    // the join moves the regression measurably.
    let raw = df!(
        "Well" => ["1", "2", "3", "4"],
        "Well Position" => ["A1", "B1", "C1", "A6"],
        "Sample" => ["std 1", "std 2", "std 3", "S1"],
        "Target" => ["lib"; 4].to_vec(),
        "Cq" => [
            ladder_cq(100.0),
            ladder_cq(10.0),
            format!("{}", INTERCEPT0 + SLOPE0 * 1f64.log10() + 0.5),
            "24.0".to_owned(),
        ],
    )
    .unwrap();
    // A duplicated annotation index duplicates the matching ladder row.
    let ann = df!(
        "INDEX" => ["std 3", "std 3", "S1"],
        "Sample" => ["ladder mid", "ladder mid repeat", "sample one"],
        "Size Tape station" => [0.0, 0.0, 399.0],
    )
    .unwrap();

    let output = QpcrAnalysis::default().run(&raw, &ann)?;

    let normalized = normalize(&raw, &DilutionScheme::default())?;
    let joined = join_annotation(&normalized, &ann)?;
    let joined_fit = fit_standard_curve(&joined)?;
    let unjoined_fit = fit_standard_curve(&normalized)?;

    assert_approx_eq!(output.fit.slope(), joined_fit.slope(), 1e-9);
    assert_approx_eq!(output.fit.intercept(), joined_fit.intercept(), 1e-9);
    assert!((output.fit.slope() - unjoined_fit.slope()).abs() > 1e-6);
    Ok(())
}

#[rstest]
fn undetermined_standard_is_absent_from_the_fit_not_zero() -> anyhow::Result<()> {
    let output = QpcrAnalysis::default().run(&raw_export(), &annotation())?;
    let detailed = &output.detailed;

    let samples = detailed.column("Sample").unwrap().str().unwrap();
    let std0_row = samples
        .into_iter()
        .position(|v| v == Some("std 0"))
        .expect("std 0 row kept");
    assert_eq!(f64_at(detailed, "Cq", std0_row), None);
    assert_eq!(f64_at(detailed, "concentration", std0_row), None);
    Ok(())
}

#[rstest]
fn no_standards_aborts_without_partial_output() {
    let raw = df!(
        "Well" => ["1", "2"],
        "Well Position" => ["A6", "A10"],
        "Sample" => ["S1", "S2"],
        "Target" => ["lib", "lib"],
        "Cq" => ["24.0", "27.0"],
    )
    .unwrap();

    let err = QpcrAnalysis::default()
        .run(&raw, &annotation())
        .unwrap_err();
    assert!(err.to_string().contains("no standard samples"));
}

#[rstest]
fn single_valid_standard_aborts() {
    // std 0 has zero concentration and the rest of the ladder never
    // amplified, leaving one usable point.
    let raw = df!(
        "Well" => ["1", "2", "3", "4"],
        "Well Position" => ["A1", "B1", "C1", "A6"],
        "Sample" => ["std 0", "std 1", "std 2", "S1"],
        "Target" => ["lib", "lib", "lib", "lib"],
        "Cq" => ["35.0", "13.36", "UNDETERMINED", "24.0"],
    )
    .unwrap();

    let err = QpcrAnalysis::default()
        .run(&raw, &annotation())
        .unwrap_err();
    assert!(err
        .to_string()
        .contains("not enough valid standard points"));
}

#[rstest]
fn outputs_land_next_to_each_other() -> anyhow::Result<()> {
    let output = QpcrAnalysis::default().run(&raw_export(), &annotation())?;

    let dir = tempfile::tempdir()?;
    let detailed_path = dir.path().join("run.csv");
    write_outputs(&output, &detailed_path)?;

    let summ_path = summary_path(&detailed_path);
    assert!(detailed_path.exists());
    assert!(summ_path.exists());
    assert!(summ_path.to_string_lossy().ends_with("run_summ.csv"));

    let summary = read_annotation_roundtrip(&summ_path)?;
    assert_eq!(summary.height(), output.summary.height());
    Ok(())
}

fn read_annotation_roundtrip(
    path: &std::path::Path
) -> anyhow::Result<DataFrame> {
    let df = CsvReadOptions::default()
        .with_has_header(true)
        .try_into_reader_with_file_path(Some(path.to_path_buf()))?
        .finish()?;
    Ok(df)
}
