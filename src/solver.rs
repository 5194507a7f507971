use good_lp::{
    constraint, default_solver, variable, Expression, ProblemVariables, ResolutionError,
    Solution, SolverModel, Variable,
};
use tracing::{debug, info};

use crate::problem::{ColoringProblem, Comparison, LinearExpr};

/** termination status of a MIP solve */
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SolveStatus {
    /// an optimal solution was found
    Optimal,
    /// the problem has no feasible solution
    Infeasible,
    /// the objective is unbounded
    Unbounded,
    /// the solver stopped without a conclusion
    NotSolved,
}

/** what a solver returns: a status and, when optimal, a value for every variable
(indexed by `VarId`) */
#[derive(Clone, Debug, PartialEq)]
pub enum SolverOutcome {
    /// optimal solution values
    Optimal(Vec<f64>),
    /// no feasible solution
    Infeasible,
    /// unbounded objective
    Unbounded,
    /// solver failure (message from the backend)
    NotSolved(String),
}

impl SolverOutcome {
    /// status of the outcome
    pub fn status(&self) -> SolveStatus {
        match self {
            SolverOutcome::Optimal(_) => SolveStatus::Optimal,
            SolverOutcome::Infeasible => SolveStatus::Infeasible,
            SolverOutcome::Unbounded => SolveStatus::Unbounded,
            SolverOutcome::NotSolved(_) => SolveStatus::NotSolved,
        }
    }
}

/** MIP solver able to solve a `ColoringProblem`. The call is synchronous and may
take arbitrarily long. */
pub trait MilpSolver {
    /// solves the problem
    fn solve(&self, problem:&ColoringProblem) -> SolverOutcome;
}


/** solves the problem with `good_lp` (the backend is selected by the crate
features, microlp by default). */
#[derive(Debug, Clone, Copy, Default)]
pub struct GoodLpSolver;

impl GoodLpSolver {
    fn expression(expr:&LinearExpr, vars:&[Variable]) -> Expression {
        let mut res = Expression::with_capacity(expr.terms().len());
        for (var,coef) in expr.terms() {
            res.add_mul(*coef, vars[var.0]);
        }
        res
    }
}

impl MilpSolver for GoodLpSolver {
    fn solve(&self, problem:&ColoringProblem) -> SolverOutcome {
        if problem.nb_variables() == 0 { // empty graph or no candidate color
            let feasible = problem.constraints().iter().all(|cst| cst.is_satisfied(&[], 1e-9));
            return if feasible { SolverOutcome::Optimal(vec![]) } else { SolverOutcome::Infeasible };
        }
        info!(
            name = problem.name(),
            nb_variables = problem.nb_variables(),
            nb_constraints = problem.constraints().len(),
            "solving MIP"
        );
        let mut model = ProblemVariables::new();
        let vars:Vec<Variable> = (0..problem.nb_variables())
            .map(|_| model.add(variable().binary()))
            .collect();
        let obj = Self::expression(problem.objective(), &vars);
        let mut lp = model.minimise(obj).using(default_solver);
        for cst in problem.constraints() {
            let lhs = Self::expression(&cst.expr, &vars);
            let rhs = cst.rhs;
            lp.add_constraint(match cst.cmp {
                Comparison::Eq => constraint!(lhs == rhs),
                Comparison::Le => constraint!(lhs <= rhs),
                Comparison::Ge => constraint!(lhs >= rhs),
            });
        }
        match lp.solve() {
            Ok(sol) => {
                let values:Vec<f64> = vars.iter().map(|v| sol.value(*v)).collect();
                debug!(objective = problem.objective_value(&values), "optimal solution found");
                SolverOutcome::Optimal(values)
            },
            Err(ResolutionError::Infeasible) => SolverOutcome::Infeasible,
            Err(ResolutionError::Unbounded) => SolverOutcome::Unbounded,
            Err(e) => SolverOutcome::NotSolved(e.to_string()),
        }
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    use crate::builder::{ProblemBuilder, DEFAULT_COLOR_ATTR, DEFAULT_RELEVANT_ATTR, DEFAULT_WEIGHT_ATTR};
    use crate::graph::{AttrValue, AttributedGraph, ColoringGraph};
    use crate::problem::ConstraintKind;

    fn graph(n:usize, edges:Vec<(usize,usize)>) -> AttributedGraph {
        let mut g = AttributedGraph::new(n, edges);
        g.fill_attribute(DEFAULT_WEIGHT_ATTR, AttrValue::Float(1.)).unwrap();
        g.fill_attribute(DEFAULT_RELEVANT_ATTR, AttrValue::Bool(true)).unwrap();
        g.fill_attribute(DEFAULT_COLOR_ATTR, AttrValue::Unset).unwrap();
        g
    }

    #[test]
    fn test_path_is_two_colored() {
        let g = graph(3, vec![(0,1),(1,2)]);
        let p = ProblemBuilder::new(3.).build(&g).unwrap();
        let values = match GoodLpSolver.solve(&p) {
            SolverOutcome::Optimal(values) => values,
            other => panic!("unexpected outcome {:?}", other),
        };
        assert_eq!(values.len(), p.nb_variables());
        // every constraint holds at the optimum
        for cst in p.constraints() {
            assert!(cst.is_satisfied(&values, 1e-6), "{:?}", cst.kind);
        }
        let sol = p.decode(&values).unwrap();
        assert_eq!(sol.get(&0), Some(&0));
        assert_eq!(sol.get(&1), Some(&1));
        assert_eq!(sol.get(&2), Some(&0));
        // unused colors are switched off at the optimum
        assert!(values[p.color_used_var(2).unwrap().0] < 0.5);
        let big = p.big_coefficient();
        assert!((p.objective_value(&values) - (2.*big + 1.)).abs() < 1e-6);
    }

    #[test]
    fn test_infeasible_with_restricted_colors() {
        let g = graph(3, vec![(0,1),(1,2),(0,2)]);
        let p = ProblemBuilder::new(3.).max_colors(Some(2)).build(&g).unwrap();
        assert_eq!(GoodLpSolver.solve(&p).status(), SolveStatus::Infeasible);
    }

    #[test]
    fn test_empty_graph() {
        let g = graph(0, vec![]);
        let p = ProblemBuilder::new(0.).build(&g).unwrap();
        assert_eq!(GoodLpSolver.solve(&p), SolverOutcome::Optimal(vec![]));
        assert_eq!(p.constraints_of(ConstraintKind::Capacity).count(), 0);
    }

    #[test]
    fn test_no_variables_checks_constraints() {
        let g = graph(2, vec![]);
        let p = ProblemBuilder::new(2.).max_colors(Some(0)).build(&g).unwrap();
        assert_eq!(p.nb_variables(), 0);
        // "exactly one color" rows cannot hold without any color
        assert_eq!(GoodLpSolver.solve(&p), SolverOutcome::Infeasible);
    }
}
