use std::fs::File;
use std::path::PathBuf;

use anyhow::Context;
use clap::Args;
use console::style;
use qpcurve::prelude::*;

#[derive(Args, Debug, Clone)]
pub(crate) struct AnalyzeArgs {
    #[arg(short, long, help = "Path of the instrument results export.")]
    results: PathBuf,

    #[arg(short, long, help = "Path of the sample annotation table.")]
    annotation: PathBuf,

    #[arg(
        short,
        long,
        help = "Path for the detailed output table. The summary lands next \
                to it with a _summ suffix."
    )]
    output: Option<PathBuf>,

    #[arg(
        short,
        long,
        help = "JSON dilution scheme overriding the built-in DA2 plate \
                layout."
    )]
    scheme: Option<PathBuf>,

    #[arg(
        long,
        default_value = "da2",
        help = "Export layout profile: da2 (24 metadata lines before the \
                header) or plain."
    )]
    profile: ProfileArg,
}

#[derive(Debug, Clone, clap::ValueEnum)]
enum ProfileArg {
    Da2,
    Plain,
}

impl From<&ProfileArg> for ExportProfile {
    fn from(value: &ProfileArg) -> Self {
        match value {
            ProfileArg::Da2 => ExportProfile::Da2,
            ProfileArg::Plain => ExportProfile::Plain,
        }
    }
}

impl AnalyzeArgs {
    pub(crate) fn run(&self) -> anyhow::Result<()> {
        let scheme = match &self.scheme {
            Some(path) => {
                let file = File::open(path).with_context(|| {
                    format!("failed to open scheme file {:?}", path)
                })?;
                DilutionScheme::from_json(file)?
            },
            None => DilutionScheme::default(),
        };

        let raw = read_results(&self.results, (&self.profile).into())?;
        let annotation = read_annotation(&self.annotation)?;

        let output = QpcrAnalysis::new(scheme).run(&raw, &annotation)?;

        println!("{}", style("Standard Curve Metrics:").bold());
        println!("  Slope: {:.4}", output.fit.slope());
        println!("  Y-intercept: {:.4}", output.fit.intercept());
        println!("  R-squared: {:.4}", output.fit.r_squared());
        println!(
            "  PCR Efficiency: {:.2}%",
            output.fit.efficiency() * 100.0
        );
        if output.fit.is_inverted() {
            println!(
                "{}",
                style(
                    "  WARNING: positive slope; the standard ladder looks \
                     inverted and concentrations are unreliable."
                )
                .red()
            );
        }

        println!("{}", output.summary);

        if let Some(path) = &self.output {
            write_outputs(&output, path)?;
        }
        Ok(())
    }
}
