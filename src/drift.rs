use crate::consts::{
    DEFAULT_PH_ALPHA, DEFAULT_PH_DELTA, DEFAULT_PH_MIN_INSTANCES, DEFAULT_PH_THRESHOLD,
};
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};

/// Concept drift detector fed with one scalar per sample.
pub trait DriftDetector {
    fn update(&mut self, value: f64);

    /// True exactly when the most recent update flagged a drift.
    fn drift_detected(&self) -> bool;
}

/// How the best model's error is turned into a detector input.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Task {
    /// 1.0 for a wrong label, 0.0 for a right one.
    Classification,
    /// Absolute residual.
    #[default]
    Regression,
}

impl Task {
    #[inline]
    pub fn drift_input<T: TaskTarget>(&self, y_true: &T, y_pred: &T) -> f64 {
        match self {
            Task::Classification => {
                if y_true.matches(y_pred) {
                    0.0
                } else {
                    1.0
                }
            }
            Task::Regression => y_true.residual(y_pred),
        }
    }
}

/// Target types that can be mapped to a drift signal.
pub trait TaskTarget {
    fn matches(&self, other: &Self) -> bool;
    fn residual(&self, other: &Self) -> f64;
}

macro_rules! numeric_target {
    ($($t:ty),*) => {
        $(
            impl TaskTarget for $t {
                #[inline(always)]
                fn matches(&self, other: &Self) -> bool {
                    self == other
                }

                #[inline(always)]
                fn residual(&self, other: &Self) -> f64 {
                    (*self as f64 - *other as f64).abs()
                }
            }
        )*
    };
}

numeric_target!(f64, f32, i8, i16, i32, i64, isize, u8, u16, u32, u64, usize);

macro_rules! label_target {
    ($($t:ty),*) => {
        $(
            impl TaskTarget for $t {
                #[inline(always)]
                fn matches(&self, other: &Self) -> bool {
                    self == other
                }

                #[inline(always)]
                fn residual(&self, other: &Self) -> f64 {
                    if self == other { 0.0 } else { 1.0 }
                }
            }
        )*
    };
}

label_target!(bool, char, String);

/// Routes the frozen best model's errors into a detector.
#[derive(Debug, Clone)]
pub struct DriftGate<D> {
    detector: D,
    task: Task,
}

impl<D: DriftDetector> DriftGate<D> {
    pub fn new(detector: D, task: Task) -> Self {
        Self { detector, task }
    }

    /// Feeds one (truth, prediction) pair. Returns true when drift fired.
    pub fn observe<T: TaskTarget>(&mut self, y_true: &T, y_pred: &T) -> bool {
        let signal = self.task.drift_input(y_true, y_pred);
        self.detector.update(signal);
        self.detector.drift_detected()
    }

    pub fn detector(&self) -> &D {
        &self.detector
    }
}

/// Page-Hinkley test for an increase in the mean of the input.
///
/// The cumulative deviation is discounted by `alpha` each step. After a
/// drift is flagged the statistics restart on the next update.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageHinkley {
    pub min_instances: usize,
    pub delta: f64,
    pub threshold: f64,
    pub alpha: f64,

    #[serde(skip)]
    n: usize,
    #[serde(skip)]
    mean: f64,
    #[serde(skip)]
    sum: f64,
    #[serde(skip)]
    min_sum: f64,
    #[serde(skip)]
    drift: bool,
}

impl Default for PageHinkley {
    fn default() -> Self {
        Self::new(
            DEFAULT_PH_MIN_INSTANCES,
            DEFAULT_PH_DELTA,
            DEFAULT_PH_THRESHOLD,
            DEFAULT_PH_ALPHA,
        )
    }
}

impl PageHinkley {
    pub fn new(min_instances: usize, delta: f64, threshold: f64, alpha: f64) -> Self {
        Self {
            min_instances,
            delta,
            threshold,
            alpha,
            n: 0,
            mean: 0.0,
            sum: 0.0,
            min_sum: 0.0,
            drift: false,
        }
    }

    fn reset_stats(&mut self) {
        self.n = 0;
        self.mean = 0.0;
        self.sum = 0.0;
        self.min_sum = 0.0;
        self.drift = false;
    }

    pub fn n_seen(&self) -> usize {
        self.n
    }
}

impl DriftDetector for PageHinkley {
    fn update(&mut self, value: f64) {
        if self.drift {
            self.reset_stats();
        }

        self.n += 1;
        self.mean += (value - self.mean) / self.n as f64;
        self.sum = self.alpha * self.sum + (value - self.mean - self.delta);
        self.min_sum = self.min_sum.min(self.sum);

        self.drift = self.n >= self.min_instances && (self.sum - self.min_sum) > self.threshold;
    }

    fn drift_detected(&self) -> bool {
        self.drift
    }
}
