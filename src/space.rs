use crate::error::{SsptError, SsptResult};
use fastrand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::fs;
use std::path::Path;
use strum_macros::{Display, EnumIter, EnumString};

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, EnumIter,
)]
#[serde(rename_all = "snake_case")]
pub enum ParamKind {
    #[serde(alias = "int")]
    #[strum(to_string = "integer", serialize = "int")]
    Integer,
    #[serde(alias = "float")]
    #[strum(to_string = "real", serialize = "float")]
    Real,
}

/// One tunable hyperparameter: its kind and inclusive range.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParamDef {
    pub name: String,
    pub kind: ParamKind,
    pub range: (f64, f64),
}

impl ParamDef {
    #[inline(always)]
    pub fn lo(&self) -> f64 {
        self.range.0
    }

    #[inline(always)]
    pub fn hi(&self) -> f64 {
        self.range.1
    }

    #[inline(always)]
    pub fn width(&self) -> f64 {
        self.range.1 - self.range.0
    }

    pub fn sample(&self, rng: &mut Rng) -> f64 {
        match self.kind {
            ParamKind::Integer => rng.i64(self.lo() as i64..=self.hi() as i64) as f64,
            ParamKind::Real => (self.lo() + rng.f64() * self.width()).min(self.hi()),
        }
    }

    /// Clips into range, then rounds integer parameters (ties to even).
    #[inline(always)]
    pub fn clamp_and_round(&self, value: f64) -> f64 {
        let clipped = value.max(self.lo()).min(self.hi());
        match self.kind {
            ParamKind::Integer => clipped.round_ties_even(),
            ParamKind::Real => clipped,
        }
    }

    #[inline(always)]
    pub fn normalize(&self, value: f64) -> f64 {
        (value - self.lo()) / self.width()
    }

    fn validate(&self) -> SsptResult<()> {
        let (lo, hi) = self.range;
        if !lo.is_finite() || !hi.is_finite() {
            return Err(SsptError::Domain(format!(
                "Parameter '{}' has a non-finite range [{}, {}]",
                self.name, lo, hi
            )));
        }
        if lo > hi {
            return Err(SsptError::Domain(format!(
                "Parameter '{}' has an inverted range [{}, {}]",
                self.name, lo, hi
            )));
        }
        if lo == hi {
            return Err(SsptError::Domain(format!(
                "Parameter '{}' has a zero-width range [{}, {}] and cannot be normalized",
                self.name, lo, hi
            )));
        }
        if self.kind == ParamKind::Integer && (lo.fract() != 0.0 || hi.fract() != 0.0) {
            return Err(SsptError::Domain(format!(
                "Integer parameter '{}' needs integral bounds, got [{}, {}]",
                self.name, lo, hi
            )));
        }
        Ok(())
    }
}

/// A concrete hyperparameter assignment. Integer parameters hold integral values.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ParamConfig(BTreeMap<String, f64>);

impl ParamConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: &str, value: f64) {
        self.0.insert(name.to_string(), value);
    }

    pub fn with(mut self, name: &str, value: f64) -> Self {
        self.insert(name, value);
        self
    }

    pub fn get(&self, name: &str) -> Option<f64> {
        self.0.get(name).copied()
    }

    pub fn get_i64(&self, name: &str) -> Option<i64> {
        self.get(name).map(|v| v as i64)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.0.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.0.iter().map(|(k, &v)| (k.as_str(), v))
    }
}

impl<S: Into<String>> FromIterator<(S, f64)> for ParamConfig {
    fn from_iter<I: IntoIterator<Item = (S, f64)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }
}

/// The hyperparameter search domain. Parameters keep their insertion order,
/// which fixes the order of random draws for a given seed.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ParamSpace {
    params: Vec<ParamDef>,
}

impl ParamSpace {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, name: &str, kind: ParamKind, lo: f64, hi: f64) -> Self {
        self.params.push(ParamDef {
            name: name.to_string(),
            kind,
            range: (lo, hi),
        });
        self
    }

    pub fn integer(self, name: &str, lo: i64, hi: i64) -> Self {
        self.with(name, ParamKind::Integer, lo as f64, hi as f64)
    }

    pub fn real(self, name: &str, lo: f64, hi: f64) -> Self {
        self.with(name, ParamKind::Real, lo, hi)
    }

    /// Adds a parameter whose kind is given by name ("integer"/"int", "real"/"float").
    pub fn with_named_kind(self, name: &str, kind: &str, lo: f64, hi: f64) -> SsptResult<Self> {
        let kind: ParamKind = kind.parse().map_err(|_| {
            SsptError::Config(format!(
                "Parameter '{}' has unsupported kind '{}' (expected integer or real)",
                name, kind
            ))
        })?;
        Ok(self.with(name, kind, lo, hi))
    }

    pub fn from_json_str(s: &str) -> SsptResult<Self> {
        let space: ParamSpace = serde_json::from_str(s)?;
        space.validate()?;
        Ok(space)
    }

    pub fn load_from_file<P: AsRef<Path>>(path: P) -> SsptResult<Self> {
        let content = fs::read_to_string(path)?;
        Self::from_json_str(&content)
    }

    pub fn validate(&self) -> SsptResult<()> {
        if self.params.is_empty() {
            return Err(SsptError::Config(
                "Parameter space must declare at least one parameter".to_string(),
            ));
        }

        let mut seen = HashSet::new();
        for def in &self.params {
            if !seen.insert(def.name.as_str()) {
                return Err(SsptError::Config(format!(
                    "Parameter '{}' is declared more than once",
                    def.name
                )));
            }
            def.validate()?;
        }
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.params.len()
    }

    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ParamDef> {
        self.params.iter()
    }

    pub fn get(&self, name: &str) -> Option<&ParamDef> {
        self.params.iter().find(|d| d.name == name)
    }

    pub fn sample_random(&self, rng: &mut Rng) -> ParamConfig {
        self.params
            .iter()
            .map(|def| (def.name.as_str(), def.sample(rng)))
            .collect()
    }

    pub fn clamp_and_round(&self, name: &str, value: f64) -> Option<f64> {
        self.get(name).map(|def| def.clamp_and_round(value))
    }

    /// Maps a configuration into the unit cube, one coordinate per parameter.
    pub fn normalize(&self, config: &ParamConfig) -> Vec<f64> {
        self.params
            .iter()
            .map(|def| def.normalize(config.get(&def.name).unwrap_or(def.lo())))
            .collect()
    }

    /// Names of parameters that `config` does not assign.
    pub fn missing_in<'a>(&'a self, config: &ParamConfig) -> Vec<&'a str> {
        self.params
            .iter()
            .filter(|def| !config.contains(&def.name))
            .map(|def| def.name.as_str())
            .collect()
    }

    /// Restricts `config` to this space, clamping and rounding each value.
    /// Parameters absent from `config` receive a random draw.
    pub fn project(&self, config: &ParamConfig, rng: &mut Rng) -> ParamConfig {
        self.params
            .iter()
            .map(|def| {
                let value = match config.get(&def.name) {
                    Some(v) => def.clamp_and_round(v),
                    None => def.sample(rng),
                };
                (def.name.as_str(), value)
            })
            .collect()
    }
}
