#![allow(dead_code)]

use sspt::{DriftDetector, Mae, Model, ParamConfig, ParamSpace, Sspt, TunerBuildParams, TunerOptions};

/// Regressor whose error is a fixed bowl over its hyperparameters,
/// minimal at a=3, b=1, k=7. It never improves with training.
#[derive(Debug, Clone)]
pub struct Bowl {
    pub a: f64,
    pub b: f64,
    pub k: i64,
    pub seen: u64,
}

impl Bowl {
    pub fn new(a: f64, b: f64, k: i64) -> Self {
        Self { a, b, k, seen: 0 }
    }

    pub fn penalty(&self) -> f64 {
        let da = (self.a - 3.0) / 10.0;
        let db = (self.b - 1.0) / 10.0;
        let dk = (self.k - 7) as f64 / 20.0;
        da * da + db * db + dk * dk
    }
}

impl Default for Bowl {
    fn default() -> Self {
        Self::new(5.0, 0.0, 10)
    }
}

impl Model for Bowl {
    type Input = f64;
    type Target = f64;

    fn configure(&self, config: &ParamConfig) -> Self {
        Self::new(
            config.get("a").unwrap_or(self.a),
            config.get("b").unwrap_or(self.b),
            config.get_i64("k").unwrap_or(self.k),
        )
    }

    fn current_config(&self) -> ParamConfig {
        ParamConfig::new()
            .with("a", self.a)
            .with("b", self.b)
            .with("k", self.k as f64)
    }

    fn predict_one(&self, x: &f64) -> f64 {
        x + self.penalty()
    }

    fn learn_one(&mut self, _x: &f64, _y: &f64) {
        self.seen += 1;
    }
}

/// Fires whenever the latest input exceeds `limit`.
#[derive(Debug, Clone)]
pub struct Threshold {
    pub limit: f64,
    pub updates: usize,
    fired: bool,
}

impl Threshold {
    pub fn new(limit: f64) -> Self {
        Self {
            limit,
            updates: 0,
            fired: false,
        }
    }
}

impl DriftDetector for Threshold {
    fn update(&mut self, value: f64) {
        self.updates += 1;
        self.fired = value > self.limit;
    }

    fn drift_detected(&self) -> bool {
        self.fired
    }
}

/// Real `a`, real `b`, integer `k`.
pub fn bowl_space() -> ParamSpace {
    ParamSpace::new()
        .real("a", 0.0, 10.0)
        .real("b", -5.0, 5.0)
        .integer("k", 0, 20)
}

/// Real-only slice of the bowl; `k` stays at the prototype's value.
pub fn smooth_space() -> ParamSpace {
    ParamSpace::new().real("a", 0.0, 10.0).real("b", -5.0, 5.0)
}

pub fn options(grace_period: usize, convergence_sphere: f64, seed: u64) -> TunerOptions {
    TunerOptions {
        grace_period,
        convergence_sphere,
        seed: Some(seed),
        ..Default::default()
    }
}

pub fn build(space: ParamSpace, opts: TunerOptions) -> Sspt<Bowl, Mae, Threshold> {
    TunerBuildParams::builder()
        .model(Bowl::default())
        .metric(Mae::new())
        .space(space)
        .drift_detector(Threshold::new(50.0))
        .options(opts)
        .build()
        .build_tuner()
        .expect("Failed to build tuner")
}

/// Deterministic input stream; the truth equals the input.
pub fn sample(i: usize) -> f64 {
    (i as f64 * 0.37).sin() * 4.0
}

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .with_test_writer()
        .try_init();
}
