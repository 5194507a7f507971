use bit_set::BitSet;
use tracing::debug;

use crate::color::{ColorId, VertexId};
use crate::error::{ColoringError, Result};
use crate::graph::ColoringGraph;
use crate::problem::{ColoringProblem, Comparison, ConstraintKind, LinearExpr};

/// default name of the weight attribute
pub const DEFAULT_WEIGHT_ATTR:&str = "weight";
/// default name of the color attribute
pub const DEFAULT_COLOR_ATTR:&str = "color";
/// default name of the relevance attribute
pub const DEFAULT_RELEVANT_ATTR:&str = "relevant";

/// fails if the capacity bound is negative or not finite
pub fn validate_capacity(capacity:f64) -> Result<()> {
    if !capacity.is_finite() || capacity < 0. {
        return Err(ColoringError::InvalidCapacity(capacity));
    }
    Ok(())
}

/// fails if an edge references a missing vertex or is a self-loop
pub fn validate_graph<G:ColoringGraph + ?Sized>(graph:&G) -> Result<()> {
    let n = graph.nb_vertices();
    for (u,v) in graph.edges() {
        if *u >= n || *v >= n {
            return Err(ColoringError::EdgeOutOfRange {
                source_vertex: *u, target_vertex: *v, nb_vertices: n
            });
        }
        if u == v {
            return Err(ColoringError::SelfLoop(*u));
        }
    }
    Ok(())
}

/// reads the weight of vertex v (finite and non-negative)
pub fn read_weight<G:ColoringGraph + ?Sized>(graph:&G, attr:&str, v:VertexId) -> Result<f64> {
    let weight = graph.attribute(attr, v)?.as_f64()
        .ok_or_else(|| ColoringError::AttributeType {
            attribute: attr.to_string(), vertex: v, expected: "a number"
        })?;
    if !weight.is_finite() || weight < 0. {
        return Err(ColoringError::InvalidWeight { vertex: v, weight });
    }
    Ok(weight)
}

/// reads the relevance flag of vertex v
pub fn read_relevant<G:ColoringGraph + ?Sized>(graph:&G, attr:&str, v:VertexId) -> Result<bool> {
    graph.attribute(attr, v)?.as_bool()
        .ok_or_else(|| ColoringError::AttributeType {
            attribute: attr.to_string(), vertex: v, expected: "a boolean"
        })
}

/// reads the color of vertex v (None if unset)
pub fn read_color<G:ColoringGraph + ?Sized>(graph:&G, attr:&str, v:VertexId) -> Result<Option<ColorId>> {
    graph.attribute(attr, v)?.as_color()
        .ok_or_else(|| ColoringError::AttributeType {
            attribute: attr.to_string(), vertex: v, expected: "unset or a non-negative integer"
        })
}

/** coefficient of the "color used" variables in the objective.

The tie-break term ∑ c·x_{i,c} is at most |R|·(nb_colors-1), so any value above
it makes removing one color always worth more than any tie-break change.
*/
pub fn big_coefficient(nb_relevant:usize, nb_colors:usize) -> f64 {
    (2 * nb_relevant * nb_colors + 1) as f64
}


/** builds the 0/1 program of a capacitated coloring instance.

 - y_c = 1 iff color c is used, x_{i,c} = 1 iff relevant vertex i has color c
 - minimize ∑ BIG·y_c + ∑ c·x_{i,c} (fewest colors, then lowest indices)
 - each relevant vertex gets exactly one color
 - adjacent relevant vertices get different colors
 - each color class weighs at most the capacity
 - y_c >= x_{i,c}
 - relevant vertices with a color attribute keep it

Vertices whose relevance attribute is false get no variable and no
constraint. The graph is only read.
*/
#[derive(Debug, Clone)]
pub struct ProblemBuilder<'a> {
    capacity: f64,
    weight_attr: &'a str,
    color_attr: &'a str,
    relevant_attr: &'a str,
    max_colors: Option<usize>,
    name: &'a str,
}

impl<'a> ProblemBuilder<'a> {

    /// builder with the default attribute names
    pub fn new(capacity:f64) -> Self {
        Self {
            capacity,
            weight_attr: DEFAULT_WEIGHT_ATTR,
            color_attr: DEFAULT_COLOR_ATTR,
            relevant_attr: DEFAULT_RELEVANT_ATTR,
            max_colors: None,
            name: "NN",
        }
    }

    /// name of the weight attribute
    pub fn weight_attr(mut self, name:&'a str) -> Self { self.weight_attr = name; self }

    /// name of the color attribute
    pub fn color_attr(mut self, name:&'a str) -> Self { self.color_attr = name; self }

    /// name of the relevance attribute
    pub fn relevant_attr(mut self, name:&'a str) -> Self { self.relevant_attr = name; self }

    /// restricts the candidate colors to 0..k (default: 0..|V|)
    pub fn max_colors(mut self, k:Option<usize>) -> Self { self.max_colors = k; self }

    /// instance name used in exports
    pub fn name(mut self, name:&'a str) -> Self { self.name = name; self }

    /// creates the problem. Fails on invalid capacity, malformed graph or attributes.
    pub fn build<G:ColoringGraph + ?Sized>(&self, graph:&G) -> Result<ColoringProblem> {
        validate_capacity(self.capacity)?;
        validate_graph(graph)?;
        let n = graph.nb_vertices();
        let nb_colors = self.max_colors.unwrap_or(n);
        let mut relevant:Vec<VertexId> = Vec::new();
        let mut is_relevant = BitSet::with_capacity(n);
        for v in 0..n {
            if read_relevant(graph, self.relevant_attr, v)? {
                relevant.push(v);
                is_relevant.insert(v);
            }
        }
        let weights:Vec<f64> = relevant.iter()
            .map(|v| read_weight(graph, self.weight_attr, *v))
            .collect::<Result<_>>()?;
        let big = big_coefficient(relevant.len(), nb_colors.max(n));
        let mut problem = ColoringProblem::new(self.name, n, nb_colors, relevant.clone());
        // pos[v]: position of v among the relevant vertices
        let mut pos = vec![0 ; n];
        for (p,v) in relevant.iter().enumerate() { pos[*v] = p; }
        let x = |v:VertexId, c:ColorId| ColoringProblem::assign_var_at(nb_colors, pos[v], c);
        let y = ColoringProblem::color_used_var_at;
        // objective: ∑_c BIG·y_c + ∑_{i,c} c·x_{i,c}
        let mut obj = LinearExpr::with_capacity(nb_colors * (relevant.len()+1));
        for c in 0..nb_colors { obj.add_mul(big, y(c)); }
        for v in &relevant {
            for c in 0..nb_colors { obj.add_mul(c as f64, x(*v, c)); }
        }
        problem.set_objective(big, obj);
        // ∑_c x_{i,c} = 1      ∀ i ∈ R
        for v in &relevant {
            let mut cst = LinearExpr::with_capacity(nb_colors);
            for c in 0..nb_colors { cst.add_mul(1., x(*v, c)); }
            problem.add_constraint(ConstraintKind::ExactlyOneColor, cst, Comparison::Eq, 1.);
        }
        // x_{u,c} + x_{v,c} <= 1     ∀ (u,v) ∈ E, u,v ∈ R, ∀ c
        for (u,v) in graph.edges().iter()
        .filter(|(u,v)| is_relevant.contains(*u) && is_relevant.contains(*v)) {
            for c in 0..nb_colors {
                let mut cst = LinearExpr::with_capacity(2);
                cst.add_mul(1., x(*u, c));
                cst.add_mul(1., x(*v, c));
                problem.add_constraint(ConstraintKind::Adjacency, cst, Comparison::Le, 1.);
            }
        }
        // ∑_{i∈R} w_i·x_{i,c} <= W     ∀ c
        if !relevant.is_empty() {
            for c in 0..nb_colors {
                let mut cst = LinearExpr::with_capacity(relevant.len());
                for (v,w) in relevant.iter().zip(weights.iter()) {
                    cst.add_mul(*w, x(*v, c));
                }
                problem.add_constraint(ConstraintKind::Capacity, cst, Comparison::Le, self.capacity);
            }
        }
        // y_c - x_{i,c} >= 0     ∀ i ∈ R, ∀ c
        for v in &relevant {
            for c in 0..nb_colors {
                let mut cst = LinearExpr::with_capacity(2);
                cst.add_mul(1., y(c));
                cst.add_mul(-1., x(*v, c));
                problem.add_constraint(ConstraintKind::Linking, cst, Comparison::Ge, 0.);
            }
        }
        // x_{i,k} = 1     ∀ i ∈ R already colored k
        for v in &relevant {
            if let Some(k) = read_color(graph, self.color_attr, *v)? {
                if k >= nb_colors {
                    return Err(ColoringError::PreservedColorOutOfRange {
                        vertex: *v, color: k, nb_colors
                    });
                }
                let mut cst = LinearExpr::with_capacity(1);
                cst.add_mul(1., x(*v, k));
                problem.add_constraint(ConstraintKind::Preservation, cst, Comparison::Eq, 1.);
            }
        }
        debug!(
            nb_vertices = n,
            nb_relevant = relevant.len(),
            nb_colors,
            nb_variables = problem.nb_variables(),
            nb_constraints = problem.constraints().len(),
            big,
            "coloring problem built"
        );
        Ok(problem)
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    use crate::graph::{AttrValue, AttributedGraph};

    /// graph with the three default attributes initialized
    fn graph(n:usize, edges:Vec<(VertexId,VertexId)>) -> AttributedGraph {
        let mut g = AttributedGraph::new(n, edges);
        g.fill_attribute(DEFAULT_WEIGHT_ATTR, AttrValue::Float(1.)).unwrap();
        g.fill_attribute(DEFAULT_RELEVANT_ATTR, AttrValue::Bool(true)).unwrap();
        g.fill_attribute(DEFAULT_COLOR_ATTR, AttrValue::Unset).unwrap();
        g
    }

    #[test]
    fn test_constraint_counts_triangle() {
        let g = graph(3, vec![(0,1),(1,2),(0,2)]);
        let p = ProblemBuilder::new(3.).build(&g).unwrap();
        assert_eq!(p.nb_colors(), 3);
        assert_eq!(p.nb_variables(), 3 + 3*3);
        assert_eq!(p.constraints_of(ConstraintKind::ExactlyOneColor).count(), 3);
        assert_eq!(p.constraints_of(ConstraintKind::Adjacency).count(), 3*3);
        assert_eq!(p.constraints_of(ConstraintKind::Capacity).count(), 3);
        assert_eq!(p.constraints_of(ConstraintKind::Linking).count(), 3*3);
        assert_eq!(p.constraints_of(ConstraintKind::Preservation).count(), 0);
    }

    #[test]
    fn test_objective_coefficients() {
        let g = graph(3, vec![(0,1)]);
        let p = ProblemBuilder::new(3.).build(&g).unwrap();
        let big = p.big_coefficient();
        // strictly larger than the largest possible tie-break value |R|·(|V|-1)
        assert!(big > (3 * 2) as f64);
        assert!(big > (3 * 3 * 2) as f64);
        let obj = p.objective();
        for c in 0..3 {
            let y = p.color_used_var(c).unwrap();
            assert!(obj.terms().contains(&(y, big)));
            let x = p.assign_var(1, c).unwrap();
            assert!(obj.terms().contains(&(x, c as f64)));
        }
    }

    #[test]
    fn test_irrelevant_vertices_are_ignored() {
        let mut g = graph(4, vec![(0,1),(1,2),(2,3)]);
        g.set_attribute(DEFAULT_RELEVANT_ATTR, 2, AttrValue::Bool(false)).unwrap();
        g.set_attribute(DEFAULT_COLOR_ATTR, 2, AttrValue::Int(1)).unwrap();
        let p = ProblemBuilder::new(4.).build(&g).unwrap();
        assert_eq!(p.relevant_vertices(), &[0,1,3]);
        assert_eq!(p.nb_colors(), 4);
        assert_eq!(p.assign_var(2, 0), None);
        // only (0,1) has both endpoints relevant
        assert_eq!(p.constraints_of(ConstraintKind::Adjacency).count(), 4);
        // the color of the irrelevant vertex is not preserved
        assert_eq!(p.constraints_of(ConstraintKind::Preservation).count(), 0);
    }

    #[test]
    fn test_capacity_uses_weights() {
        let mut g = graph(2, vec![]);
        g.set_attribute(DEFAULT_WEIGHT_ATTR, 1, AttrValue::Float(2.5)).unwrap();
        let p = ProblemBuilder::new(3.).build(&g).unwrap();
        let cst = p.constraints_of(ConstraintKind::Capacity).next().unwrap();
        assert_eq!(cst.rhs, 3.);
        assert_eq!(cst.cmp, Comparison::Le);
        assert!(cst.expr.terms().contains(&(p.assign_var(1, 0).unwrap(), 2.5)));
        assert!(cst.expr.terms().contains(&(p.assign_var(0, 0).unwrap(), 1.)));
    }

    #[test]
    fn test_preservation_constraint() {
        let mut g = graph(3, vec![(0,1)]);
        g.set_attribute(DEFAULT_COLOR_ATTR, 1, AttrValue::Int(2)).unwrap();
        let p = ProblemBuilder::new(3.).build(&g).unwrap();
        let csts:Vec<_> = p.constraints_of(ConstraintKind::Preservation).collect();
        assert_eq!(csts.len(), 1);
        assert_eq!(csts[0].expr.terms(), &[(p.assign_var(1, 2).unwrap(), 1.)]);
        assert_eq!(csts[0].cmp, Comparison::Eq);
        assert_eq!(csts[0].rhs, 1.);
    }

    #[test]
    fn test_preserved_color_out_of_range() {
        let mut g = graph(3, vec![]);
        g.set_attribute(DEFAULT_COLOR_ATTR, 0, AttrValue::Int(2)).unwrap();
        let res = ProblemBuilder::new(3.).max_colors(Some(2)).build(&g);
        assert!(matches!(
            res,
            Err(ColoringError::PreservedColorOutOfRange { vertex: 0, color: 2, nb_colors: 2 })
        ));
    }

    #[test]
    fn test_custom_attribute_names() {
        let mut g = AttributedGraph::new(2, vec![(0,1)]);
        g.fill_attribute("load", AttrValue::Float(2.)).unwrap();
        g.fill_attribute("active", AttrValue::Bool(true)).unwrap();
        g.fill_attribute("slot", AttrValue::Unset).unwrap();
        let p = ProblemBuilder::new(4.)
            .weight_attr("load").color_attr("slot").relevant_attr("active")
            .build(&g).unwrap();
        assert_eq!(p.relevant_vertices(), &[0,1]);
        // default names are not looked up
        assert!(matches!(ProblemBuilder::new(4.).build(&g), Err(ColoringError::MissingAttribute(_))));
    }

    #[test]
    fn test_invalid_inputs() {
        let g = graph(2, vec![(0,1)]);
        assert!(matches!(ProblemBuilder::new(-1.).build(&g), Err(ColoringError::InvalidCapacity(_))));
        assert!(matches!(ProblemBuilder::new(f64::NAN).build(&g), Err(ColoringError::InvalidCapacity(_))));
        let g = graph(2, vec![(0,2)]);
        assert!(matches!(ProblemBuilder::new(1.).build(&g), Err(ColoringError::EdgeOutOfRange { .. })));
        let g = graph(2, vec![(1,1)]);
        assert!(matches!(ProblemBuilder::new(1.).build(&g), Err(ColoringError::SelfLoop(1))));
        let mut g = graph(2, vec![]);
        g.set_attribute(DEFAULT_WEIGHT_ATTR, 0, AttrValue::Float(-2.)).unwrap();
        assert!(matches!(ProblemBuilder::new(1.).build(&g), Err(ColoringError::InvalidWeight { vertex: 0, .. })));
        let mut g = graph(2, vec![]);
        g.set_attribute(DEFAULT_RELEVANT_ATTR, 1, AttrValue::Int(1)).unwrap();
        assert!(matches!(ProblemBuilder::new(1.).build(&g), Err(ColoringError::AttributeType { vertex: 1, .. })));
    }

    #[test]
    fn test_no_relevant_vertex() {
        let mut g = graph(2, vec![(0,1)]);
        g.fill_attribute(DEFAULT_RELEVANT_ATTR, AttrValue::Bool(false)).unwrap();
        let p = ProblemBuilder::new(1.).build(&g).unwrap();
        assert_eq!(p.nb_variables(), 2);
        assert!(p.constraints().is_empty());
    }
}
