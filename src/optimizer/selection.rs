use crate::metrics::Metric;
use crate::model::Model;
use crate::optimizer::expansion::{Candidate, ExpandedSet};
use crate::optimizer::simplex::{Simplex, Vertex};

/// Outcome of one Nelder-Mead update step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// The worst vertex is replaced by the given candidate.
    ReplaceWorst(Candidate),
    /// Neither reflection nor contraction beat the worst vertex. Each flag
    /// says whether that candidate is swapped in (shrink → worst, midpoint → good).
    Fallback { shrink: bool, midpoint: bool },
}

impl Action {
    pub fn changes_simplex(&self) -> bool {
        !matches!(
            self,
            Action::Fallback {
                shrink: false,
                midpoint: false
            }
        )
    }
}

/// Picks the update for a simplex that has already been sorted.
pub fn decide<M, Mt>(simplex: &Simplex<M, Mt>, expanded: &ExpandedSet<M, Mt>) -> Action
where
    M: Model,
    Mt: Metric<Target = M::Target>,
{
    let b = &simplex.get(Vertex::Best).metric;
    let g = &simplex.get(Vertex::Good).metric;
    let w = &simplex.get(Vertex::Worst).metric;
    let r = &expanded.reflection.metric;

    if r.is_better_than(g) {
        if b.is_better_than(r) {
            Action::ReplaceWorst(Candidate::Reflection)
        } else if expanded.expansion.metric.is_better_than(b) {
            Action::ReplaceWorst(Candidate::Expansion)
        } else {
            Action::ReplaceWorst(Candidate::Reflection)
        }
    } else if r.is_better_than(w) {
        Action::ReplaceWorst(Candidate::Reflection)
    } else if expanded.contraction.metric.is_better_than(w) {
        Action::ReplaceWorst(Candidate::Contraction)
    } else {
        Action::Fallback {
            shrink: expanded.shrink.metric.is_better_than(w),
            midpoint: expanded.midpoint.metric.is_better_than(g),
        }
    }
}

/// Moves the chosen candidates into the simplex, consuming the window's set.
pub fn apply<M, Mt>(action: Action, simplex: &mut Simplex<M, Mt>, expanded: ExpandedSet<M, Mt>)
where
    M: Model,
    Mt: Metric<Target = M::Target>,
{
    match action {
        Action::ReplaceWorst(candidate) => {
            simplex.replace(Vertex::Worst, expanded.into_variant(candidate));
        }
        Action::Fallback { shrink, midpoint } => {
            let ExpandedSet {
                shrink: s,
                midpoint: m,
                ..
            } = expanded;
            if shrink {
                simplex.replace(Vertex::Worst, s);
            }
            if midpoint {
                simplex.replace(Vertex::Good, m);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ModelVariant;
    use crate::space::ParamConfig;
    use rstest::rstest;

    #[derive(Debug, Clone)]
    struct Stub;

    impl Model for Stub {
        type Input = ();
        type Target = f64;

        fn configure(&self, _config: &ParamConfig) -> Self {
            Stub
        }
        fn current_config(&self) -> ParamConfig {
            ParamConfig::new()
        }
        fn predict_one(&self, _x: &()) -> f64 {
            0.0
        }
        fn learn_one(&mut self, _x: &(), _y: &f64) {}
    }

    /// Metric frozen at a preset value; bigger is better.
    #[derive(Debug, Clone)]
    struct Score(f64);

    impl Metric for Score {
        type Target = f64;

        fn update(&mut self, _y_true: &f64, _y_pred: &f64) {}
        fn get(&self) -> f64 {
            self.0
        }
        fn bigger_is_better(&self) -> bool {
            true
        }
        fn fresh(&self) -> Self {
            Score(0.0)
        }
    }

    fn variant(tag: f64, score: f64) -> ModelVariant<Stub, Score> {
        ModelVariant::from_parts(Stub, Score(score), ParamConfig::new().with("tag", tag))
    }

    // Tags: b=0 g=1 w=2, m=10 r=11 e=12 s=13 c=14
    fn setup(
        [b, g, w]: [f64; 3],
        [m, r, e, s, c]: [f64; 5],
    ) -> (Simplex<Stub, Score>, ExpandedSet<Stub, Score>) {
        let simplex = Simplex::from_variants([variant(0.0, b), variant(1.0, g), variant(2.0, w)]);
        let expanded = ExpandedSet {
            midpoint: variant(10.0, m),
            reflection: variant(11.0, r),
            expansion: variant(12.0, e),
            shrink: variant(13.0, s),
            contraction: variant(14.0, c),
        };
        (simplex, expanded)
    }

    fn tags(simplex: &Simplex<Stub, Score>) -> Vec<f64> {
        simplex.iter().map(|v| v.config().get("tag").unwrap()).collect()
    }

    #[rstest]
    // r beats g, b beats r
    #[case([0.9, 0.5, 0.1], [0.0, 0.7, 0.0, 0.0, 0.0], Action::ReplaceWorst(Candidate::Reflection))]
    // r beats g and b, e beats b
    #[case([0.9, 0.5, 0.1], [0.0, 0.95, 0.99, 0.0, 0.0], Action::ReplaceWorst(Candidate::Expansion))]
    // r beats g and ties b, e does not beat b
    #[case([0.9, 0.5, 0.1], [0.0, 0.9, 0.8, 0.0, 0.0], Action::ReplaceWorst(Candidate::Reflection))]
    // r between w and g
    #[case([0.9, 0.5, 0.1], [0.0, 0.3, 1.0, 1.0, 1.0], Action::ReplaceWorst(Candidate::Reflection))]
    // r no better than w, c beats w
    #[case([0.9, 0.5, 0.1], [1.0, 0.1, 1.0, 1.0, 0.2], Action::ReplaceWorst(Candidate::Contraction))]
    // fallback: both
    #[case([0.9, 0.5, 0.1], [0.6, 0.0, 1.0, 0.2, 0.0], Action::Fallback { shrink: true, midpoint: true })]
    // fallback: shrink only
    #[case([0.9, 0.5, 0.1], [0.5, 0.0, 1.0, 0.2, 0.0], Action::Fallback { shrink: true, midpoint: false })]
    // fallback: midpoint only
    #[case([0.9, 0.5, 0.1], [0.6, 0.0, 1.0, 0.1, 0.1], Action::Fallback { shrink: false, midpoint: true })]
    // fallback: nothing
    #[case([0.9, 0.5, 0.1], [0.0, 0.0, 0.0, 0.0, 0.0], Action::Fallback { shrink: false, midpoint: false })]
    fn test_decision_table(
        #[case] simplex_scores: [f64; 3],
        #[case] expanded_scores: [f64; 5],
        #[case] expected: Action,
    ) {
        let (simplex, expanded) = setup(simplex_scores, expanded_scores);
        assert_eq!(decide(&simplex, &expanded), expected);
    }

    #[test]
    fn test_reflection_replaces_only_worst() {
        let (mut simplex, expanded) = setup([0.9, 0.5, 0.1], [0.0, 0.7, 0.0, 0.0, 0.0]);
        let action = decide(&simplex, &expanded);
        assert_eq!(action, Action::ReplaceWorst(Candidate::Reflection));

        apply(action, &mut simplex, expanded);
        assert_eq!(tags(&simplex), vec![0.0, 1.0, 11.0]);
        assert_eq!(simplex.get(Vertex::Worst).score(), 0.7);
    }

    #[test]
    fn test_fallback_applies_both_sub_actions() {
        let (mut simplex, expanded) = setup([0.9, 0.5, 0.1], [0.6, 0.0, 1.0, 0.2, 0.0]);
        let action = decide(&simplex, &expanded);
        assert!(action.changes_simplex());

        apply(action, &mut simplex, expanded);
        assert_eq!(tags(&simplex), vec![0.0, 10.0, 13.0]);
    }

    #[test]
    fn test_empty_fallback_leaves_simplex() {
        let (mut simplex, expanded) = setup([0.9, 0.5, 0.1], [0.0; 5]);
        let action = decide(&simplex, &expanded);
        assert!(!action.changes_simplex());

        apply(action, &mut simplex, expanded);
        assert_eq!(tags(&simplex), vec![0.0, 1.0, 2.0]);
    }
}
