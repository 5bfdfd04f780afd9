use anyhow::bail;
use log::*;

/// Result of an ordinary least-squares fit of y against x.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearFit {
    /// Slope of the fitted line.
    pub slope: f64,
    /// Y-intercept of the fitted line.
    pub intercept: f64,
    /// Squared Pearson correlation coefficient of the fit.
    pub r_squared: f64,
}

/// Fits `y = intercept + slope * x` by ordinary (unweighted) least squares
/// in the sum-of-squares formulation, double precision throughout.
///
/// Fails when fewer than two points are supplied or when all x values
/// coincide (the slope is undefined in both cases).
pub fn least_squares(
    x: &[f64],
    y: &[f64],
) -> anyhow::Result<LinearFit> {
    if x.len() != y.len() {
        bail!(
            "least squares: x length ({}) doesn't match y length ({})",
            x.len(),
            y.len()
        );
    }
    if x.len() < 2 {
        bail!(
            "least squares: need at least 2 points, got {}",
            x.len()
        );
    }

    let n = x.len() as f64;
    let x_mean = x.iter().sum::<f64>() / n;
    let y_mean = y.iter().sum::<f64>() / n;

    let mut sxx = 0.0;
    let mut sxy = 0.0;
    let mut syy = 0.0;
    for (&xi, &yi) in x.iter().zip(y.iter()) {
        let dx = xi - x_mean;
        let dy = yi - y_mean;
        sxx += dx * dx;
        sxy += dx * dy;
        syy += dy * dy;
    }

    if sxx == 0.0 {
        bail!("least squares: all x values are identical, slope is undefined");
    }

    let slope = sxy / sxx;
    let intercept = y_mean - slope * x_mean;
    // Degenerate y spread means the fit is exact by construction.
    let r_squared = if syy == 0.0 {
        1.0
    }
    else {
        (sxy * sxy) / (sxx * syy)
    };

    debug!(
        "least squares over {} points: slope={:.6}, intercept={:.6}, r2={:.6}",
        x.len(),
        slope,
        intercept,
        r_squared
    );

    Ok(LinearFit {
        slope,
        intercept,
        r_squared,
    })
}
