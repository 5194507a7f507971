use serde::{Serialize, Deserialize};
use tracing::{info, warn};

use crate::builder::{
    ProblemBuilder, read_relevant, read_weight, validate_capacity, validate_graph,
    DEFAULT_COLOR_ATTR, DEFAULT_RELEVANT_ATTR, DEFAULT_WEIGHT_ATTR,
};
use crate::color::{Solution, nb_colors};
use crate::error::Result;
use crate::graph::{AttrValue, ColoringGraph};
use crate::problem::ColoringProblem;
use crate::solver::{GoodLpSolver, MilpSolver, SolveStatus, SolverOutcome};

/** parameters of a coloring run */
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColoringOptions {
    /// maximum total weight per color (None: total weight of the graph).
    /// `Some(0.)` is a real bound, not "unset": only zero-weight vertices fit.
    pub capacity: Option<f64>,
    /// keep pre-existing colors of relevant vertices
    pub preserve: bool,
    /// name of the weight attribute
    pub weight_attr: String,
    /// name of the color attribute
    pub color_attr: String,
    /// name of the relevance attribute
    pub relevant_attr: String,
    /// size of the candidate color set (None: number of vertices)
    pub max_colors: Option<usize>,
}

impl Default for ColoringOptions {
    fn default() -> Self {
        Self {
            capacity: None,
            preserve: false,
            weight_attr: DEFAULT_WEIGHT_ATTR.to_string(),
            color_attr: DEFAULT_COLOR_ATTR.to_string(),
            relevant_attr: DEFAULT_RELEVANT_ATTR.to_string(),
            max_colors: None,
        }
    }
}

impl ColoringOptions {
    /// sets the capacity bound
    pub fn with_capacity(mut self, capacity:f64) -> Self { self.capacity = Some(capacity); self }

    /// sets the preservation mode
    pub fn with_preserve(mut self, preserve:bool) -> Self { self.preserve = preserve; self }

    /// sets the weight attribute name
    pub fn with_weight_attr(mut self, name:&str) -> Self { self.weight_attr = name.to_string(); self }

    /// sets the color attribute name
    pub fn with_color_attr(mut self, name:&str) -> Self { self.color_attr = name.to_string(); self }

    /// sets the relevance attribute name
    pub fn with_relevant_attr(mut self, name:&str) -> Self { self.relevant_attr = name.to_string(); self }

    /// restricts the candidate color set
    pub fn with_max_colors(mut self, k:usize) -> Self { self.max_colors = Some(k); self }
}

/** result of a coloring run */
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColoringStatus {
    /// optimal coloring written into the graph
    Optimal,
    /// the solver did not find a solution (infeasible, unbounded or not solved)
    NoSolution(SolveStatus),
}

impl ColoringStatus {
    /// 1 if optimal, 0 otherwise
    pub fn code(&self) -> u8 {
        match self {
            ColoringStatus::Optimal => 1,
            ColoringStatus::NoSolution(_) => 0,
        }
    }
}


/** creates the missing attributes (weight = 1, relevant = true, color unset)
and fills their unset entries */
pub fn normalize_attributes<G:ColoringGraph + ?Sized>(graph:&mut G, options:&ColoringOptions) -> Result<()> {
    graph.ensure_attribute(&options.color_attr, AttrValue::Unset)?;
    graph.ensure_attribute(&options.relevant_attr, AttrValue::Bool(true))?;
    graph.ensure_attribute(&options.weight_attr, AttrValue::Float(1.))?;
    Ok(())
}

/** capacity bound of a run: the given one, or the total weight of the graph
(a single color can then hold everything). Expects a normalized graph.

Weights of relevant vertices are validated. Irrelevant vertices only add their
weight when it is a finite non-negative number, they never make the run fail. */
pub fn capacity_bound<G:ColoringGraph + ?Sized>(graph:&G, options:&ColoringOptions) -> Result<f64> {
    match options.capacity {
        Some(capacity) => {
            validate_capacity(capacity)?;
            Ok(capacity)
        },
        None => {
            let mut total = 0.;
            for v in 0..graph.nb_vertices() {
                if read_relevant(graph, &options.relevant_attr, v)? {
                    total += read_weight(graph, &options.weight_attr, v)?;
                } else if let Ok(w) = read_weight(graph, &options.weight_attr, v) {
                    total += w;
                }
            }
            Ok(total)
        }
    }
}

/** validates the inputs, normalizes the attributes, clears the colors of
relevant vertices (unless `preserve` is set) and builds the problem.
Returns the problem and the capacity bound used. */
pub fn prepare_problem<G:ColoringGraph + ?Sized>(graph:&mut G, options:&ColoringOptions) -> Result<(ColoringProblem, f64)> {
    if let Some(capacity) = options.capacity {
        validate_capacity(capacity)?;
    }
    validate_graph(graph)?;
    normalize_attributes(graph, options)?;
    let capacity = capacity_bound(graph, options)?;
    if !options.preserve {
        for v in 0..graph.nb_vertices() {
            if read_relevant(graph, &options.relevant_attr, v)? {
                graph.set_attribute(&options.color_attr, v, AttrValue::Unset)?;
            }
        }
    }
    let problem = ProblemBuilder::new(capacity)
        .weight_attr(&options.weight_attr)
        .color_attr(&options.color_attr)
        .relevant_attr(&options.relevant_attr)
        .max_colors(options.max_colors)
        .build(graph)?;
    Ok((problem, capacity))
}


/** colors a graph: normalizes its attributes, builds the problem, calls the
solver and writes the colors back.

On failure to find a solution the color attributes stay as they were just
before solving (cleared unless `preserve` is set). Irrelevant vertices are
never read for colors nor written.
*/
#[derive(Debug, Clone, Default)]
pub struct GraphColorer<S:MilpSolver> {
    solver: S,
}

impl<S:MilpSolver> GraphColorer<S> {

    /// colorer using the given solver
    pub fn new(solver:S) -> Self { Self { solver } }

    /// the underlying solver
    pub fn solver(&self) -> &S { &self.solver }

    /// colors the graph, see `ColoringStatus`
    pub fn color<G:ColoringGraph + ?Sized>(&self, graph:&mut G, options:&ColoringOptions) -> Result<ColoringStatus> {
        let (problem, capacity) = prepare_problem(graph, options)?;
        let values = match self.solver.solve(&problem) {
            SolverOutcome::Optimal(values) => values,
            outcome => {
                warn!(status = ?outcome.status(), "no coloring found");
                return Ok(ColoringStatus::NoSolution(outcome.status()));
            }
        };
        let solution:Solution = problem.decode(&values)?;
        for (v,c) in &solution {
            graph.set_attribute(&options.color_attr, *v, AttrValue::from(Some(*c)))?;
        }
        info!(
            nb_colored = solution.len(),
            nb_colors = nb_colors(&solution),
            capacity,
            "optimal coloring found"
        );
        Ok(ColoringStatus::Optimal)
    }
}

/// colors the graph using the default `good_lp` solver
pub fn color_graph<G:ColoringGraph + ?Sized>(graph:&mut G, options:&ColoringOptions) -> Result<ColoringStatus> {
    GraphColorer::new(GoodLpSolver).color(graph, options)
}
