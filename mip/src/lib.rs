//! Event-graph MILP encoding (`spec.md` §4.5): translates every line's
//! event graph into the variables/constraints/objective of an integer
//! program, invokes a MIP solver, and hands back the raw decision values
//! for `decoder` to walk into routes.

pub mod builder;
pub mod solver;

pub use builder::{build_milp, VariableIndex};
pub use solver::{EventMilpModel, MipError, MipSolution, SolverParams};

#[cfg(test)]
mod tests;
