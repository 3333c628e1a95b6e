use crate::metrics::Metric;
use crate::model::{Model, ModelVariant};
use crate::optimizer::simplex::{Simplex, Vertex};
use crate::space::{ParamConfig, ParamSpace};
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumIter};

/// Nelder-Mead candidate points, in derivation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumIter)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Candidate {
    Midpoint,
    Reflection,
    Expansion,
    Shrink,
    Contraction,
}

/// Per-parameter binary operator used to derive a candidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    /// (h1 + h2) / 2
    Average,
    /// 2 * h1 - h2
    Reflect,
}

impl Operator {
    #[inline(always)]
    pub fn apply(self, h1: f64, h2: f64) -> f64 {
        match self {
            Operator::Average => (h1 + h2) / 2.0,
            Operator::Reflect => 2.0 * h1 - h2,
        }
    }
}

/// Applies `op` parameter-wise, then clamps and rounds into `space`.
pub fn derive_config(
    space: &ParamSpace,
    c1: &ParamConfig,
    c2: &ParamConfig,
    op: Operator,
) -> ParamConfig {
    space
        .iter()
        .map(|def| {
            let h1 = c1.get(&def.name).unwrap_or(def.lo());
            let h2 = c2.get(&def.name).unwrap_or(def.lo());
            (def.name.as_str(), def.clamp_and_round(op.apply(h1, h2)))
        })
        .collect()
}

/// The five candidates evaluated during one window.
#[derive(Debug, Clone)]
pub struct ExpandedSet<M, Mt> {
    pub midpoint: ModelVariant<M, Mt>,
    pub reflection: ModelVariant<M, Mt>,
    pub expansion: ModelVariant<M, Mt>,
    pub shrink: ModelVariant<M, Mt>,
    pub contraction: ModelVariant<M, Mt>,
}

impl<M, Mt> ExpandedSet<M, Mt>
where
    M: Model,
    Mt: Metric<Target = M::Target>,
{
    /// Derives all candidates from the simplex in its current slot order.
    /// Every candidate is a reconfigured replica of the best slot's model.
    pub fn expand(simplex: &Simplex<M, Mt>, metric: &Mt, space: &ParamSpace) -> Self {
        let b = simplex.get(Vertex::Best).config();
        let g = simplex.get(Vertex::Good).config();
        let w = simplex.get(Vertex::Worst).config();

        let midpoint = derive_config(space, b, g, Operator::Average);
        let reflection = derive_config(space, &midpoint, w, Operator::Reflect);
        let expansion = derive_config(space, &reflection, &midpoint, Operator::Reflect);
        let shrink = derive_config(space, b, w, Operator::Average);
        let contraction = derive_config(space, &midpoint, w, Operator::Average);

        let base = &simplex.best().model;
        Self {
            midpoint: ModelVariant::spawn(base, metric, midpoint),
            reflection: ModelVariant::spawn(base, metric, reflection),
            expansion: ModelVariant::spawn(base, metric, expansion),
            shrink: ModelVariant::spawn(base, metric, shrink),
            contraction: ModelVariant::spawn(base, metric, contraction),
        }
    }

    pub fn get(&self, candidate: Candidate) -> &ModelVariant<M, Mt> {
        match candidate {
            Candidate::Midpoint => &self.midpoint,
            Candidate::Reflection => &self.reflection,
            Candidate::Expansion => &self.expansion,
            Candidate::Shrink => &self.shrink,
            Candidate::Contraction => &self.contraction,
        }
    }

    pub fn into_variant(self, candidate: Candidate) -> ModelVariant<M, Mt> {
        match candidate {
            Candidate::Midpoint => self.midpoint,
            Candidate::Reflection => self.reflection,
            Candidate::Expansion => self.expansion,
            Candidate::Shrink => self.shrink,
            Candidate::Contraction => self.contraction,
        }
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut ModelVariant<M, Mt>> {
        [
            &mut self.midpoint,
            &mut self.reflection,
            &mut self.expansion,
            &mut self.shrink,
            &mut self.contraction,
        ]
        .into_iter()
    }
}
