use crate::config::StartMode;
use crate::consts::SIMPLEX_SIZE;
use crate::metrics::Metric;
use crate::model::{Model, ModelVariant};
use crate::space::{ParamConfig, ParamSpace};
use fastrand::Rng;
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumIter};
use tracing::warn;

/// Rank of a simplex slot. Only meaningful right after a sort.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumIter)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Vertex {
    Best,
    Good,
    Worst,
}

impl Vertex {
    #[inline(always)]
    pub fn index(self) -> usize {
        self as usize
    }
}

/// Three model variants searched over as one geometric simplex.
#[derive(Debug, Clone)]
pub struct Simplex<M, Mt> {
    variants: [ModelVariant<M, Mt>; SIMPLEX_SIZE],
}

impl<M, Mt> Simplex<M, Mt>
where
    M: Model,
    Mt: Metric<Target = M::Target>,
{
    /// Builds a fresh simplex. Best and worst always start at random points;
    /// the good vertex starts at `seed` under [`StartMode::Warm`].
    pub fn initialize(
        prototype: &M,
        metric: &Mt,
        space: &ParamSpace,
        start: StartMode,
        seed: &ParamConfig,
        rng: &mut Rng,
    ) -> Self {
        let best = ModelVariant::spawn(prototype, metric, space.sample_random(rng));
        let worst = ModelVariant::spawn(prototype, metric, space.sample_random(rng));

        let good_config = match start {
            StartMode::Random => space.sample_random(rng),
            StartMode::Warm => {
                let missing = space.missing_in(seed);
                if !missing.is_empty() {
                    warn!(
                        "Warm start config lacks {:?}; drawing those parameters at random",
                        missing
                    );
                }
                space.project(seed, rng)
            }
        };
        let good = ModelVariant::spawn(prototype, metric, good_config);

        Self {
            variants: [best, good, worst],
        }
    }

    pub fn from_variants(variants: [ModelVariant<M, Mt>; SIMPLEX_SIZE]) -> Self {
        Self { variants }
    }

    /// Stable sort into best, good, worst order. A NaN score ranks last
    /// in either direction.
    pub fn sort_by_metric(&mut self, bigger_is_better: bool) {
        let rank = |v: &ModelVariant<M, Mt>| {
            let score = v.score();
            if score.is_nan() {
                f64::INFINITY
            } else if bigger_is_better {
                -score
            } else {
                score
            }
        };
        self.variants.sort_by(|a, b| rank(a).total_cmp(&rank(b)));
    }

    #[inline(always)]
    pub fn get(&self, vertex: Vertex) -> &ModelVariant<M, Mt> {
        &self.variants[vertex.index()]
    }

    #[inline(always)]
    pub fn best(&self) -> &ModelVariant<M, Mt> {
        self.get(Vertex::Best)
    }

    /// Swaps in a whole variant, returning the one it displaced.
    pub fn replace(&mut self, vertex: Vertex, variant: ModelVariant<M, Mt>) -> ModelVariant<M, Mt> {
        std::mem::replace(&mut self.variants[vertex.index()], variant)
    }

    pub fn iter(&self) -> impl Iterator<Item = &ModelVariant<M, Mt>> {
        self.variants.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut ModelVariant<M, Mt>> {
        self.variants.iter_mut()
    }

    pub fn configs(&self) -> [&ParamConfig; SIMPLEX_SIZE] {
        [
            self.variants[0].config(),
            self.variants[1].config(),
            self.variants[2].config(),
        ]
    }
}
