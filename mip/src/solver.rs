//! The MIP solver exposed as a small interface (`spec.md` §9, Design Note
//! 6: `add_binary_var`, `add_continuous_var`, `add_linear_constraint`,
//! `set_linear_objective`, `set_parameters`, `solve`, `get_value`,
//! `get_objective`, `get_gap`), so `crate::builder` depends on this module
//! rather than on `good_lp` directly. One backend only, `good_lp`'s
//! `coin_cbc`, grounded in `nsg-ethz-Chameleon`'s
//! `decomposition::ilp_scheduler` use of the same crate for an equivalent
//! binary/continuous-variable ILP.

use std::time::Duration;

use good_lp::solvers::coin_cbc::coin_cbc;
use good_lp::{variable, Expression, ProblemVariables, Solution as GoodLpSolution, SolverModel, Variable};

#[derive(Debug, thiserror::Error)]
pub enum MipError {
    #[error("solver found no feasible solution: {0}")]
    Infeasible(String),
}

/// Solver invocation parameters (`spec.md` §4.5/§9): per-solve time limit,
/// thread count, and the `ratioGap` parameter coin_cbc uses both as a
/// termination criterion and a tolerance ("zero MIP gap tolerance").
/// Gomory cuts are left on (coin_cbc's default), matching the source's
/// "Gomory cuts on"; logging verbosity is moderate, matched in
/// `EventMilpModel::solve` below.
#[derive(Debug, Clone)]
pub struct SolverParams {
    pub time_limit: Duration,
    pub threads: u32,
    pub mip_gap: f64,
}

impl SolverParams {
    /// `spec.md` §4.5's default single-phase time limit.
    pub fn single_phase() -> Self {
        SolverParams {
            time_limit: Duration::from_secs(900),
            threads: 1,
            mip_gap: 0.0,
        }
    }

    /// `spec.md` §4.5's two-phase time limit for the first (count-
    /// maximizing) phase; the second phase gets whatever remains of the
    /// 900s budget plus its own 600s floor, per `spec.md` §5.
    pub fn two_phase_first() -> Self {
        SolverParams {
            time_limit: Duration::from_secs(600),
            threads: 1,
            mip_gap: 0.0,
        }
    }
}

impl Default for SolverParams {
    fn default() -> Self {
        SolverParams::single_phase()
    }
}

/// A binary or bounded-continuous MIP, built incrementally through the
/// interface named above and solved once, consumed in the process
/// (`good_lp`'s `ProblemVariables` is itself consumed by `.minimise`).
///
/// The objective is tracked twice: once as a `good_lp::Expression` (what
/// `coin_cbc` actually optimises) and once as the flat `(Variable, f64)`
/// term list `set_linear_objective` was given. `good_lp::Solution` has no
/// public way to re-evaluate an arbitrary `Expression` against a solved
/// point, so `solve` recomputes the objective value itself from the term
/// list rather than from the `Expression`.
pub struct EventMilpModel {
    vars: ProblemVariables,
    constraints: Vec<good_lp::Constraint>,
    objective: Expression,
    objective_terms: Vec<(Variable, f64)>,
    params: SolverParams,
}

impl EventMilpModel {
    pub fn new() -> Self {
        EventMilpModel {
            vars: ProblemVariables::new(),
            constraints: Vec::new(),
            objective: Expression::from(0.0),
            objective_terms: Vec::new(),
            params: SolverParams::default(),
        }
    }

    pub fn add_binary_var(&mut self) -> Variable {
        self.vars.add(variable().binary())
    }

    /// Bounds are exactly `[min, max]`; used for the `B^+`/`B^-` relative
    /// departure-offset variables (`spec.md` §4.5).
    pub fn add_continuous_var(&mut self, min: f64, max: f64) -> Variable {
        self.vars.add(variable().min(min).max(max))
    }

    pub fn add_linear_constraint(&mut self, constraint: good_lp::Constraint) {
        self.constraints.push(constraint);
    }

    /// `terms` is the objective as a flat sum of `coefficient * variable`
    /// (`spec.md` §4.5's objective has no quadratic or constant part).
    pub fn set_linear_objective(&mut self, terms: Vec<(Variable, f64)>) {
        self.objective = terms.iter().fold(Expression::from(0.0), |acc, &(var, coeff)| acc + coeff * var);
        self.objective_terms = terms;
    }

    pub fn set_parameters(&mut self, params: SolverParams) {
        self.params = params;
    }

    /// Hands the accumulated problem to coin_cbc and blocks until it
    /// returns, matching `spec.md` §5 ("no suspension points outside the
    /// solver call").
    pub fn solve(self) -> Result<MipSolution, MipError> {
        println!(
            "solving event-graph MILP ({} constraints, time limit {:.0}s)",
            self.constraints.len(),
            self.params.time_limit.as_secs_f64()
        );
        let start = std::time::Instant::now();
        let mut model = coin_cbc(self.vars.minimise(self.objective));
        model.set_parameter("logLevel", "0");
        model.set_parameter("threads", &self.params.threads.to_string());
        model.set_parameter("seconds", &self.params.time_limit.as_secs_f64().to_string());
        model.set_parameter("ratioGap", &self.params.mip_gap.to_string());
        for constraint in self.constraints {
            model.add_constraint(constraint);
        }
        let solution = model
            .solve()
            .map_err(|e| MipError::Infeasible(e.to_string()))?;
        let objective_value: f64 = self
            .objective_terms
            .iter()
            .map(|&(var, coeff)| coeff * solution.value(var))
            .sum();
        println!(
            "MILP solved (elapsed time for solver: {:0.2}sec, objective {:.2})",
            start.elapsed().as_secs_f64(),
            objective_value
        );
        Ok(MipSolution {
            solution: Box::new(solution),
            objective: objective_value,
            // coin_cbc's best-bound is not surfaced through good_lp's
            // `Solution` trait; see DESIGN.md "MIP integrality gap" for
            // the follow-up (read it back out via good_lp's raw CBC FFI,
            // once that accessor lands in `good_lp`) and
            // `model::Telemetry::integrality_gap_first`.
            gap: 0.0,
        })
    }
}

impl Default for EventMilpModel {
    fn default() -> Self {
        EventMilpModel::new()
    }
}

/// The solved values, boxed behind `good_lp::Solution` so `crate::builder`
/// and `decoder` never need to name the concrete coin_cbc solution type.
pub struct MipSolution {
    solution: Box<dyn GoodLpSolution>,
    objective: f64,
    gap: f64,
}

impl MipSolution {
    pub fn get_value(&self, variable: Variable) -> f64 {
        self.solution.value(variable)
    }

    pub fn get_objective(&self) -> f64 {
        self.objective
    }

    pub fn get_gap(&self) -> f64 {
        self.gap
    }
}
