use std::marker::PhantomData;

/// A running performance measure over (truth, prediction) pairs.
pub trait Metric: Clone {
    type Target;

    fn update(&mut self, y_true: &Self::Target, y_pred: &Self::Target);
    fn get(&self) -> f64;
    fn bigger_is_better(&self) -> bool;

    /// A zeroed instance with the same settings.
    fn fresh(&self) -> Self;

    /// Strict, direction-aware comparison of current values.
    fn is_better_than(&self, other: &Self) -> bool {
        if self.bigger_is_better() {
            self.get() > other.get()
        } else {
            self.get() < other.get()
        }
    }
}

/// Mean absolute error.
#[derive(Debug, Clone, Default)]
pub struct Mae {
    sum: f64,
    n: u64,
}

impl Mae {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Metric for Mae {
    type Target = f64;

    fn update(&mut self, y_true: &f64, y_pred: &f64) {
        self.sum += (y_true - y_pred).abs();
        self.n += 1;
    }

    fn get(&self) -> f64 {
        if self.n == 0 {
            0.0
        } else {
            self.sum / self.n as f64
        }
    }

    fn bigger_is_better(&self) -> bool {
        false
    }

    fn fresh(&self) -> Self {
        Self::default()
    }
}

/// Fraction of exact label matches.
#[derive(Debug)]
pub struct Accuracy<T> {
    correct: u64,
    n: u64,
    _label: PhantomData<T>,
}

impl<T> Accuracy<T> {
    pub fn new() -> Self {
        Self {
            correct: 0,
            n: 0,
            _label: PhantomData,
        }
    }
}

impl<T> Default for Accuracy<T> {
    fn default() -> Self {
        Self::new()
    }
}

// Manual impl so labels need not be Clone.
impl<T> Clone for Accuracy<T> {
    fn clone(&self) -> Self {
        Self {
            correct: self.correct,
            n: self.n,
            _label: PhantomData,
        }
    }
}

impl<T: PartialEq> Metric for Accuracy<T> {
    type Target = T;

    fn update(&mut self, y_true: &T, y_pred: &T) {
        if y_true == y_pred {
            self.correct += 1;
        }
        self.n += 1;
    }

    fn get(&self) -> f64 {
        if self.n == 0 {
            0.0
        } else {
            self.correct as f64 / self.n as f64
        }
    }

    fn bigger_is_better(&self) -> bool {
        true
    }

    fn fresh(&self) -> Self {
        Self::new()
    }
}
