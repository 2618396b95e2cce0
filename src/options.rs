use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::error::{ConfigError, WeightError};
use crate::normalization::Normalization;
use crate::weight::TfIdfWeight;

/// Tuning parameters of the pivoted wdf normalization.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct TuningParams {
    #[serde(default = "TuningParams::default_slope")]
    #[validate(range(exclusive_min = 0.0))]
    pub slope: f64,
    #[serde(default = "TuningParams::default_delta")]
    #[validate(range(exclusive_min = 0.0))]
    pub delta: f64,
}

impl TuningParams {
    pub const DEFAULT_SLOPE: f64 = 0.2;
    pub const DEFAULT_DELTA: f64 = 1.0;

    pub fn new(slope: f64, delta: f64) -> Self {
        Self { slope, delta }
    }

    fn default_slope() -> f64 {
        Self::DEFAULT_SLOPE
    }

    fn default_delta() -> f64 {
        Self::DEFAULT_DELTA
    }
}

impl Default for TuningParams {
    fn default() -> Self {
        Self {
            slope: Self::default_slope(),
            delta: Self::default_delta(),
        }
    }
}

/// Weighting options, represented as a TOML string, e.g.
///
/// ```toml
/// normalization = "Lpn"
/// slope = 0.25
/// ```
///
/// or with explicit variants:
///
/// ```toml
/// normalization = { wdf = "pivoted", idf = "prob" }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TfIdfOption {
    #[serde(default)]
    pub normalization: NormalizationOption,
    #[serde(default = "TuningParams::default_slope")]
    pub slope: f64,
    #[serde(default = "TuningParams::default_delta")]
    pub delta: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum NormalizationOption {
    Code(String),
    Explicit(Normalization),
}

impl Default for NormalizationOption {
    fn default() -> Self {
        NormalizationOption::Code(String::new())
    }
}

impl NormalizationOption {
    pub fn resolve(&self) -> Result<Normalization, ConfigError> {
        match self {
            NormalizationOption::Code(code) if code.is_empty() => Ok(Normalization::default()),
            NormalizationOption::Code(code) => code.parse(),
            NormalizationOption::Explicit(norm) => Ok(*norm),
        }
    }
}

impl Default for TfIdfOption {
    fn default() -> Self {
        Self {
            normalization: NormalizationOption::default(),
            slope: TuningParams::default_slope(),
            delta: TuningParams::default_delta(),
        }
    }
}

impl TfIdfOption {
    pub fn from_toml(s: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(s)?)
    }

    pub fn params(&self) -> TuningParams {
        TuningParams::new(self.slope, self.delta)
    }

    pub fn build(&self) -> Result<TfIdfWeight, WeightError> {
        let norm = self.normalization.resolve()?;
        TfIdfWeight::from_normalization(norm, self.params())
    }
}
