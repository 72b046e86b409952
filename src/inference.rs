//! Inferential statistics: confidence interval for a population mean and the
//! one-sample t-test, both under Student's t with `n − 1` degrees of freedom.
//!
//! Samples of fewer than two values produce [`Estimate::Insufficient`]
//! rather than an error, so the presentation layer can render a placeholder.

use serde::Serialize;
use statrs::distribution::{ContinuousCDF, StudentsT};

use crate::{descriptive::mean, error::InferenceError};

/// Fixed decision threshold for the t-test. Policy constant, not
/// user-configurable.
pub const SIGNIFICANCE_LEVEL: f64 = 0.05;

/// Minimum sample size for any inferential computation.
pub const MIN_SAMPLE_SIZE: usize = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Alternative {
    TwoSided,
    Greater,
    Less,
}

impl Alternative {
    pub fn label(self) -> &'static str {
        match self {
            Alternative::TwoSided => "two-sided",
            Alternative::Greater => "greater",
            Alternative::Less => "less",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Estimate<T> {
    Computed(T),
    Insufficient { observed: usize, required: usize },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConfidenceInterval {
    pub confidence: f64,
    pub lower: f64,
    pub upper: f64,
    pub sample_mean: f64,
    pub sample_size: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TTest {
    pub t_statistic: f64,
    pub p_value: f64,
    pub alternative: Alternative,
    pub hypothesized_mean: f64,
    pub sample_mean: f64,
    pub sample_size: usize,
    /// True iff `p_value < SIGNIFICANCE_LEVEL`.
    pub reject_null: bool,
}

/// Confidence interval for the population mean, centered at the sample mean
/// and scaled by the standard error `s / √n`. Accepts any confidence level
/// strictly between 0 and 1.
pub fn confidence_interval(
    sample: &[f64],
    confidence: f64,
) -> Result<Estimate<ConfidenceInterval>, InferenceError> {
    if !(confidence > 0.0 && confidence < 1.0) {
        return Err(InferenceError::InvalidConfidence(confidence));
    }
    let n = sample.len();
    if n < MIN_SAMPLE_SIZE {
        return Ok(Estimate::Insufficient {
            observed: n,
            required: MIN_SAMPLE_SIZE,
        });
    }

    let sample_mean = mean(sample);
    let std_err = sample_std_dev(sample, sample_mean) / (n as f64).sqrt();
    let dist = students_t((n - 1) as f64)?;
    let half_width = dist.inverse_cdf(0.5 + confidence / 2.0) * std_err;

    Ok(Estimate::Computed(ConfidenceInterval {
        confidence,
        lower: sample_mean - half_width,
        upper: sample_mean + half_width,
        sample_mean,
        sample_size: n,
    }))
}

/// One-sample t-test of the sample mean against `hypothesized_mean` under
/// the chosen alternative. Rejects the null iff `p < SIGNIFICANCE_LEVEL`.
pub fn one_sample_t_test(
    sample: &[f64],
    hypothesized_mean: f64,
    alternative: Alternative,
) -> Result<Estimate<TTest>, InferenceError> {
    let n = sample.len();
    if n < MIN_SAMPLE_SIZE {
        return Ok(Estimate::Insufficient {
            observed: n,
            required: MIN_SAMPLE_SIZE,
        });
    }

    let sample_mean = mean(sample);
    let std_err = sample_std_dev(sample, sample_mean) / (n as f64).sqrt();
    let difference = sample_mean - hypothesized_mean;

    // Zero-variance sample: the statistic degenerates to 0 or ±∞.
    let t_statistic = if std_err == 0.0 {
        if difference == 0.0 {
            0.0
        } else if difference > 0.0 {
            f64::INFINITY
        } else {
            f64::NEG_INFINITY
        }
    } else {
        difference / std_err
    };

    let dist = students_t((n - 1) as f64)?;
    let p_value = match alternative {
        Alternative::TwoSided => 2.0 * (1.0 - dist.cdf(t_statistic.abs())),
        Alternative::Greater => 1.0 - dist.cdf(t_statistic),
        Alternative::Less => dist.cdf(t_statistic),
    }
    .clamp(0.0, 1.0);

    Ok(Estimate::Computed(TTest {
        t_statistic,
        p_value,
        alternative,
        hypothesized_mean,
        sample_mean,
        sample_size: n,
        reject_null: p_value < SIGNIFICANCE_LEVEL,
    }))
}

fn students_t(df: f64) -> Result<StudentsT, InferenceError> {
    StudentsT::new(0.0, 1.0, df).map_err(|_| InferenceError::Distribution { df })
}

fn sample_std_dev(values: &[f64], mean: f64) -> f64 {
    let sum_squares: f64 = values.iter().map(|v| (v - mean) * (v - mean)).sum();
    (sum_squares / (values.len() as f64 - 1.0)).max(0.0).sqrt()
}
