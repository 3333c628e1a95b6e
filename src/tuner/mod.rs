pub mod builder;

pub use builder::TunerBuildParams;

use crate::config::TunerOptions;
use crate::drift::{DriftDetector, DriftGate, Task, TaskTarget};
use crate::metrics::Metric;
use crate::model::Model;
use crate::optimizer::expansion::ExpandedSet;
use crate::optimizer::simplex::{Simplex, Vertex};
use crate::optimizer::{convergence, selection};
use crate::space::{ParamConfig, ParamSpace};
use fastrand::Rng;
use serde::{Deserialize, Serialize};
use strum::IntoEnumIterator;
use tracing::{debug, info, trace};

pub enum SearchState<M, Mt, D> {
    /// Simplex search. `n` counts samples in the current evaluation window.
    Exploring {
        simplex: Simplex<M, Mt>,
        expanded: Option<ExpandedSet<M, Mt>>,
        n: usize,
    },
    /// A single frozen model watched by a drift detector.
    Converged {
        best: M,
        config: ParamConfig,
        gate: DriftGate<D>,
    },
}

/// Single-pass self parameter tuning.
///
/// Keeps a three-vertex Nelder-Mead simplex of model replicas plus the five
/// candidates derived from it, evaluates all of them test-then-train on each
/// sample, and moves the simplex every `grace_period` samples. Once the
/// simplex collapses below `convergence_sphere`, only the best replica is kept
/// and a drift detector decides when to restart the search.
///
/// Build one through [`TunerBuildParams`].
pub struct Sspt<M, Mt, D> {
    model: M,
    metric: Mt,
    space: ParamSpace,
    drift_detector: D,
    task: Task,
    options: TunerOptions,
    rng: Rng,

    state: SearchState<M, Mt, D>,

    samples_seen: u64,
    selection_passes: u64,
    drift_resets: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VertexSnapshot {
    pub vertex: Vertex,
    pub config: ParamConfig,
    pub score: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum SearchSnapshot {
    Exploring {
        samples_in_window: usize,
        vertices: Vec<VertexSnapshot>,
    },
    Converged {
        best: ParamConfig,
    },
}

/// Point-in-time view of the tuner. Vertex labels follow the slot order,
/// which is only a ranking right after a sort.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TunerSnapshot {
    pub samples_seen: u64,
    pub selection_passes: u64,
    pub drift_resets: u64,
    pub search: SearchSnapshot,
}

impl<M, Mt, D> Sspt<M, Mt, D>
where
    M: Model,
    M::Target: TaskTarget,
    Mt: Metric<Target = M::Target>,
    D: DriftDetector + Clone,
{
    pub fn learn_one(&mut self, x: &M::Input, y: &M::Target) {
        self.samples_seen += 1;
        let bigger_is_better = self.metric.bigger_is_better();

        let next = match &mut self.state {
            SearchState::Exploring {
                simplex,
                expanded,
                n,
            } => {
                *n += 1;
                trace!("Exploring sample {} of window", n);

                for variant in simplex.iter_mut() {
                    variant.step(x, y);
                }

                let candidates = expanded
                    .get_or_insert_with(|| ExpandedSet::expand(simplex, &self.metric, &self.space));
                for variant in candidates.iter_mut() {
                    variant.step(x, y);
                }

                if *n == self.options.grace_period {
                    *n = 0;
                    simplex.sort_by_metric(bigger_is_better);

                    if let Some(candidates) = expanded.take() {
                        let action = selection::decide(simplex, &candidates);
                        debug!(
                            "Window closed: {:?} (b={:.4}, g={:.4}, w={:.4}, r={:.4})",
                            action,
                            simplex.get(Vertex::Best).score(),
                            simplex.get(Vertex::Good).score(),
                            simplex.get(Vertex::Worst).score(),
                            candidates.reflection.score()
                        );
                        selection::apply(action, simplex, candidates);
                        self.selection_passes += 1;
                    }
                }

                if convergence::is_converged(
                    &self.space,
                    simplex.configs(),
                    self.options.convergence_sphere,
                ) {
                    let radius = convergence::simplex_radius(&self.space, simplex.configs());
                    simplex.sort_by_metric(bigger_is_better);
                    let best = simplex.best();
                    info!(
                        "Search converged after {} samples: radius={:.5}, best={:?}",
                        self.samples_seen,
                        radius,
                        best.config()
                    );

                    Some(SearchState::Converged {
                        best: best.model.clone(),
                        config: best.config().clone(),
                        gate: DriftGate::new(self.drift_detector.clone(), self.task),
                    })
                } else {
                    None
                }
            }
            SearchState::Converged { best, gate, .. } => {
                let y_pred = best.predict_one(x);

                if gate.observe(y, &y_pred) {
                    let seed = best.current_config();
                    info!(
                        "Drift detected after {} samples; restarting search from {:?}",
                        self.samples_seen, seed
                    );
                    self.drift_resets += 1;

                    Some(SearchState::Exploring {
                        simplex: Simplex::initialize(
                            &self.model,
                            &self.metric,
                            &self.space,
                            self.options.start,
                            &seed,
                            &mut self.rng,
                        ),
                        expanded: None,
                        n: 0,
                    })
                } else {
                    best.learn_one(x, y);
                    None
                }
            }
        };

        if let Some(state) = next {
            self.state = state;
        }
    }

    /// The current best model. While exploring this ranks the simplex first.
    pub fn best_model(&mut self) -> &M {
        let bigger_is_better = self.metric.bigger_is_better();
        match &mut self.state {
            SearchState::Exploring { simplex, .. } => {
                simplex.sort_by_metric(bigger_is_better);
                &simplex.best().model
            }
            SearchState::Converged { best, .. } => best,
        }
    }

    pub fn predict_one(&mut self, x: &M::Input) -> M::Target {
        self.best_model().predict_one(x)
    }
}

impl<M, Mt, D> Sspt<M, Mt, D>
where
    M: Model,
    Mt: Metric<Target = M::Target>,
{
    pub fn converged(&self) -> bool {
        matches!(self.state, SearchState::Converged { .. })
    }

    pub fn state(&self) -> &SearchState<M, Mt, D> {
        &self.state
    }

    pub fn simplex(&self) -> Option<&Simplex<M, Mt>> {
        match &self.state {
            SearchState::Exploring { simplex, .. } => Some(simplex),
            SearchState::Converged { .. } => None,
        }
    }

    pub fn has_expanded(&self) -> bool {
        matches!(
            self.state,
            SearchState::Exploring {
                expanded: Some(_),
                ..
            }
        )
    }

    /// Samples seen in the current window, or `None` once converged.
    pub fn samples_in_window(&self) -> Option<usize> {
        match self.state {
            SearchState::Exploring { n, .. } => Some(n),
            SearchState::Converged { .. } => None,
        }
    }

    pub fn samples_seen(&self) -> u64 {
        self.samples_seen
    }

    pub fn selection_passes(&self) -> u64 {
        self.selection_passes
    }

    pub fn drift_resets(&self) -> u64 {
        self.drift_resets
    }

    pub fn space(&self) -> &ParamSpace {
        &self.space
    }

    pub fn options(&self) -> &TunerOptions {
        &self.options
    }

    pub fn task(&self) -> Task {
        self.task
    }

    pub fn snapshot(&self) -> TunerSnapshot {
        let search = match &self.state {
            SearchState::Exploring { simplex, n, .. } => SearchSnapshot::Exploring {
                samples_in_window: *n,
                vertices: Vertex::iter()
                    .map(|vertex| {
                        let v = simplex.get(vertex);
                        VertexSnapshot {
                            vertex,
                            config: v.config().clone(),
                            score: v.score(),
                        }
                    })
                    .collect(),
            },
            SearchState::Converged { config, .. } => SearchSnapshot::Converged {
                best: config.clone(),
            },
        };

        TunerSnapshot {
            samples_seen: self.samples_seen,
            selection_passes: self.selection_passes,
            drift_resets: self.drift_resets,
            search,
        }
    }
}
