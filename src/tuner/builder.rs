use crate::config::{StartMode, TunerOptions};
use crate::drift::{DriftDetector, Task, TaskTarget};
use crate::error::{SsptError, SsptResult};
use crate::metrics::Metric;
use crate::model::Model;
use crate::optimizer::simplex::Simplex;
use crate::space::ParamSpace;
use crate::tuner::{SearchState, Sspt};
use fastrand::Rng;
use tracing::debug;
use typed_builder::TypedBuilder;

#[derive(TypedBuilder)]
pub struct TunerBuildParams<M, Mt, D> {
    /// Prototype every replica is configured from.
    pub model: M,
    /// Prototype metric; each replica gets a zeroed copy.
    pub metric: Mt,
    pub space: ParamSpace,
    /// Prototype detector, cloned afresh for every converged episode.
    pub drift_detector: D,
    #[builder(default)]
    pub task: Task,
    #[builder(default)]
    pub options: TunerOptions,
}

impl<M, Mt, D> TunerBuildParams<M, Mt, D>
where
    M: Model,
    M::Target: TaskTarget,
    Mt: Metric<Target = M::Target>,
    D: DriftDetector + Clone,
{
    pub fn build_tuner(self) -> SsptResult<Sspt<M, Mt, D>> {
        let TunerBuildParams {
            model,
            metric,
            space,
            drift_detector,
            task,
            options,
        } = self;

        // 1. Validate the configuration surface
        options.validate()?;
        space.validate()?;

        // 2. Warm starts need the base model to expose every tuned parameter
        let seed_config = model.current_config();
        if options.start == StartMode::Warm {
            let missing = space.missing_in(&seed_config);
            if !missing.is_empty() {
                return Err(SsptError::Validation(format!(
                    "Warm start requires the base model to report {:?}",
                    missing
                )));
            }
        }

        // 3. Private random source
        let mut rng = match options.seed {
            Some(s) => Rng::with_seed(s),
            None => Rng::new(),
        };

        // 4. Initial simplex
        let simplex = Simplex::initialize(
            &model,
            &metric,
            &space,
            options.start,
            &seed_config,
            &mut rng,
        );

        debug!(
            "Tuner ready: {} params, grace_period={}, start={}, sphere={}",
            space.len(),
            options.grace_period,
            options.start,
            options.convergence_sphere
        );

        Ok(Sspt {
            model,
            metric,
            space,
            drift_detector,
            task,
            options,
            rng,
            state: SearchState::Exploring {
                simplex,
                expanded: None,
                n: 0,
            },
            samples_seen: 0,
            selection_passes: 0,
            drift_resets: 0,
        })
    }
}
