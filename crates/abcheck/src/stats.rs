//! Two-sample statistics: means and Welch's t-test.

use serde::{Deserialize, Serialize};
use statrs::distribution::{ContinuousCDF, StudentsT};

use crate::error::{AbError, Result};

/// Result of a two-sample t-test.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TTestResult {
    /// The t-statistic (first sample minus second).
    pub statistic: f64,
    /// Two-sided p-value.
    pub p_value: f64,
    /// Welch-Satterthwaite degrees of freedom; `None` when both samples have
    /// zero variance.
    pub degrees_of_freedom: Option<f64>,
}

/// Arithmetic mean. `None` for an empty slice.
pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

/// Unbiased sample variance (n - 1 denominator).
pub fn sample_variance(values: &[f64]) -> Option<f64> {
    if values.len() < 2 {
        return None;
    }
    let m = mean(values)?;
    let ss: f64 = values.iter().map(|v| (v - m).powi(2)).sum();
    Some(ss / (values.len() - 1) as f64)
}

/// Two-sided Welch's t-test (unequal variances) of `x` against `y`.
///
/// Both samples need at least two values. When both variances are zero the
/// statistic degenerates: equal means give `t = 0, p = 1`, different means
/// give an infinite statistic with `p = 0`. Inputs whose moments overflow
/// `f64` are a `NumericOverflow` error.
pub fn welch_t_test(x: &[f64], y: &[f64]) -> Result<TTestResult> {
    if x.len() < 2 || y.len() < 2 {
        return Err(AbError::InsufficientData(format!(
            "t-test needs at least two values per group (got {} and {})",
            x.len(),
            y.len()
        )));
    }

    let n1 = x.len() as f64;
    let n2 = y.len() as f64;
    let (mean1, var1) = (mean(x).unwrap_or_default(), sample_variance(x).unwrap_or_default());
    let (mean2, var2) = (mean(y).unwrap_or_default(), sample_variance(y).unwrap_or_default());

    let mean_diff = mean1 - mean2;
    let term1 = var1 / n1;
    let term2 = var2 / n2;
    let combined_var = term1 + term2;

    if !(mean_diff.is_finite() && combined_var.is_finite()) {
        return Err(overflow(mean_diff, combined_var));
    }

    if combined_var == 0.0 {
        let result = if mean_diff == 0.0 {
            TTestResult {
                statistic: 0.0,
                p_value: 1.0,
                degrees_of_freedom: None,
            }
        } else {
            TTestResult {
                statistic: mean_diff.signum() * f64::INFINITY,
                p_value: 0.0,
                degrees_of_freedom: None,
            }
        };
        return Ok(result);
    }

    let t = mean_diff / combined_var.sqrt();
    let df = combined_var * combined_var
        / (term1 * term1 / (n1 - 1.0) + term2 * term2 / (n2 - 1.0));
    if !(t.is_finite() && df.is_finite()) {
        return Err(overflow(t, df));
    }

    let dist = StudentsT::new(0.0, 1.0, df)
        .map_err(|e| AbError::NumericOverflow(format!("invalid t distribution: {}", e)))?;
    let p_value = (2.0 * dist.sf(t.abs())).min(1.0);

    Ok(TTestResult {
        statistic: t,
        p_value,
        degrees_of_freedom: Some(df),
    })
}

fn overflow(a: f64, b: f64) -> AbError {
    AbError::NumericOverflow(format!(
        "t-test terms are not finite ({} and {}); order values are too large",
        a, b
    ))
}
