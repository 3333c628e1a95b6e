pub mod config;
pub mod consts;
pub mod drift;
pub mod error;
pub mod metrics;
pub mod model;
pub mod optimizer;
pub mod space;
pub mod tuner;

pub use config::{StartMode, TunerOptions};
pub use drift::{DriftDetector, PageHinkley, Task, TaskTarget};
pub use error::{SsptError, SsptResult};
pub use metrics::{Accuracy, Mae, Metric};
pub use model::{Model, ModelVariant};
pub use space::{ParamConfig, ParamKind, ParamSpace};
pub use tuner::{Sspt, TunerBuildParams, TunerSnapshot};
