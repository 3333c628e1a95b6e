use crate::consts::{DEFAULT_CONVERGENCE_SPHERE, DEFAULT_GRACE_PERIOD};
use crate::error::{SsptError, SsptResult};
use clap::Args;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::str::FromStr;
use strum_macros::{Display, EnumIter, EnumString};

/// Where the "good" vertex of a fresh simplex comes from.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum StartMode {
    /// Drawn at random like the other two vertices.
    Random,
    /// The seed model's own configuration.
    #[default]
    Warm,
}

impl StartMode {
    pub fn parse(s: &str) -> SsptResult<Self> {
        Self::from_str(s.trim()).map_err(|_| {
            SsptError::Config(format!(
                "'start' must be either '{}' or '{}', got '{}'",
                StartMode::Random,
                StartMode::Warm,
                s
            ))
        })
    }
}

#[derive(Args, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TunerOptions {
    /// Samples per evaluation window.
    #[arg(long, default_value_t = DEFAULT_GRACE_PERIOD)]
    pub grace_period: usize,

    #[arg(long, default_value_t = StartMode::Warm)]
    pub start: StartMode,

    /// Simplex radius (unit-cube scale) below which the search stops.
    #[arg(long, default_value_t = DEFAULT_CONVERGENCE_SPHERE)]
    pub convergence_sphere: f64,

    #[arg(long)]
    pub seed: Option<u64>,
}

impl Default for TunerOptions {
    fn default() -> Self {
        Self {
            grace_period: DEFAULT_GRACE_PERIOD,
            start: StartMode::Warm,
            convergence_sphere: DEFAULT_CONVERGENCE_SPHERE,
            seed: None,
        }
    }
}

impl TunerOptions {
    pub fn validate(&self) -> SsptResult<()> {
        if self.grace_period == 0 {
            return Err(SsptError::Config(
                "grace_period must be a positive integer".to_string(),
            ));
        }
        if !self.convergence_sphere.is_finite() || self.convergence_sphere <= 0.0 {
            return Err(SsptError::Config(format!(
                "convergence_sphere must be a positive real, got {}",
                self.convergence_sphere
            )));
        }
        Ok(())
    }

    /// Parses JSON options. An unknown `start` name is a `Config` error,
    /// same as [`StartMode::parse`].
    pub fn from_json_str(s: &str) -> SsptResult<Self> {
        let mut value: serde_json::Value = serde_json::from_str(s)?;
        if let Some(start) = value.get_mut("start") {
            if let Some(name) = start.as_str() {
                let mode = StartMode::parse(name)?;
                *start = serde_json::Value::from(mode.to_string());
            }
        }

        let opts: TunerOptions = serde_json::from_value(value)?;
        opts.validate()?;
        Ok(opts)
    }

    pub fn load_from_file<P: AsRef<Path>>(path: P) -> SsptResult<Self> {
        let content = fs::read_to_string(path)?;
        Self::from_json_str(&content)
    }
}
