/// Number of vertices kept in the search simplex (best, good, worst).
pub const SIMPLEX_SIZE: usize = 3;

/// Default number of samples per evaluation window.
pub const DEFAULT_GRACE_PERIOD: usize = 500;

/// Default radius below which the simplex counts as collapsed.
pub const DEFAULT_CONVERGENCE_SPHERE: f64 = 0.01;

// Page-Hinkley defaults
pub const DEFAULT_PH_MIN_INSTANCES: usize = 30;
pub const DEFAULT_PH_DELTA: f64 = 0.005;
pub const DEFAULT_PH_THRESHOLD: f64 = 50.0;
pub const DEFAULT_PH_ALPHA: f64 = 1.0 - 0.0001;
