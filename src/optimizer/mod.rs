pub mod convergence;
pub mod expansion;
pub mod selection;
pub mod simplex;

pub use expansion::{Candidate, ExpandedSet, Operator};
pub use selection::Action;
pub use simplex::{Simplex, Vertex};
