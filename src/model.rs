use crate::metrics::Metric;
use crate::space::ParamConfig;

/// The streaming estimator being tuned.
///
/// `configure` builds a new replica with the given hyperparameters; the
/// receiver is left untouched.
pub trait Model: Clone {
    type Input;
    type Target;

    fn configure(&self, config: &ParamConfig) -> Self;
    fn current_config(&self) -> ParamConfig;
    fn predict_one(&self, x: &Self::Input) -> Self::Target;
    fn learn_one(&mut self, x: &Self::Input, y: &Self::Target);
}

/// One configured replica together with its own running metric.
#[derive(Debug, Clone)]
pub struct ModelVariant<M, Mt> {
    pub model: M,
    pub metric: Mt,
    config: ParamConfig,
}

impl<M, Mt> ModelVariant<M, Mt>
where
    M: Model,
    Mt: Metric<Target = M::Target>,
{
    /// Configures a replica of `prototype` and pairs it with a zeroed copy of `metric`.
    pub fn spawn(prototype: &M, metric: &Mt, config: ParamConfig) -> Self {
        Self {
            model: prototype.configure(&config),
            metric: metric.fresh(),
            config,
        }
    }

    pub fn from_parts(model: M, metric: Mt, config: ParamConfig) -> Self {
        Self {
            model,
            metric,
            config,
        }
    }

    /// The configuration this replica was built with.
    pub fn config(&self) -> &ParamConfig {
        &self.config
    }

    pub fn score(&self) -> f64 {
        self.metric.get()
    }

    /// Test-then-train on one sample.
    #[inline]
    pub fn step(&mut self, x: &M::Input, y: &M::Target) {
        let y_pred = self.model.predict_one(x);
        self.metric.update(y, &y_pred);
        self.model.learn_one(x, y);
    }
}
