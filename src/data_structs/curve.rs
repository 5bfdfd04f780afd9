use std::fmt;

use anyhow::bail;
use log::*;

/// Slope magnitudes below this are treated as a flat curve: the
/// efficiency term 10^(-1/slope) is numerically meaningless.
const SLOPE_TOLERANCE: f64 = 1e-12;

/// A fitted log-linear standard curve together with its quality
/// metrics. Computed once per run and immutable afterwards.
///
/// A theoretically perfect ten-fold ladder fits with
/// slope = -1/log10(2) = -3.3219 and efficiency 1.0.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CurveFit {
    slope: f64,
    intercept: f64,
    r_squared: f64,
    efficiency: f64,
}

impl CurveFit {
    /// Derives the amplification efficiency from regression output.
    ///
    /// A near-zero slope is a hard error. A positive slope (Cq rising
    /// with concentration) marks the fit as inverted and logs a
    /// warning, but the run continues so the diagnostic tables still
    /// reach the technician.
    pub fn try_new(
        slope: f64,
        intercept: f64,
        r_squared: f64,
    ) -> anyhow::Result<Self> {
        if !slope.is_finite() || slope.abs() < SLOPE_TOLERANCE {
            bail!(
                "standard curve slope ({}) is zero or non-finite; amplification \
                 efficiency is undefined",
                slope
            );
        }
        let efficiency = 10f64.powf(-1.0 / slope) - 1.0;
        if slope > 0.0 {
            warn!(
                "standard curve slope is positive ({:.4}); the ladder looks \
                 inverted and efficiency ({:.4}) is not meaningful",
                slope, efficiency
            );
        }
        Ok(Self {
            slope,
            intercept,
            r_squared,
            efficiency,
        })
    }

    pub fn slope(&self) -> f64 {
        self.slope
    }

    pub fn intercept(&self) -> f64 {
        self.intercept
    }

    pub fn r_squared(&self) -> f64 {
        self.r_squared
    }

    /// Fraction of template doubling achieved per cycle; 1.0 is the
    /// theoretical ideal.
    pub fn efficiency(&self) -> f64 {
        self.efficiency
    }

    /// True when the fitted slope is positive, i.e. the standard ladder
    /// produced an inverted curve and the fit should not be trusted.
    pub fn is_inverted(&self) -> bool {
        self.slope > 0.0
    }

    /// Back-calculates the concentration (nM) for a measured Cq.
    pub fn concentration(
        &self,
        cq: f64,
    ) -> f64 {
        10f64.powf((cq - self.intercept) / self.slope) * 1e-3
    }
}

impl fmt::Display for CurveFit {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        writeln!(f, "Standard Curve Metrics:")?;
        writeln!(f, "  Slope: {:.4}", self.slope)?;
        writeln!(f, "  Y-intercept: {:.4}", self.intercept)?;
        writeln!(f, "  R-squared: {:.4}", self.r_squared)?;
        write!(f, "  PCR Efficiency: {:.2}%", self.efficiency * 100.0)
    }
}
