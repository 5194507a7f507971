use std::fmt::Write;

use crate::color::{ColorId, Solution, VertexId};
use crate::error::{ColoringError, Result};

/// threshold above which a (near-)binary variable value is read as 1
pub const BINARY_TOLERANCE:f64 = 0.5;

/** index of a decision variable in a `ColoringProblem` */
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct VarId(pub usize);

/** binary decision variables of the formulation */
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Variable {
    /// y_c: one iff color c is used
    ColorUsed(ColorId),
    /// x_{i,c}: one iff vertex i uses color c
    Assign(VertexId, ColorId),
}

/** linear expression ∑ coef·var */
#[derive(Clone, Debug, Default, PartialEq)]
pub struct LinearExpr {
    terms: Vec<(VarId, f64)>,
}

impl LinearExpr {
    /// empty expression with preallocated terms
    pub fn with_capacity(capacity:usize) -> Self {
        Self { terms: Vec::with_capacity(capacity) }
    }

    /// adds coef·var
    pub fn add_mul(&mut self, coef:f64, var:VarId) {
        self.terms.push((var, coef));
    }

    /// (variable, coefficient) pairs
    pub fn terms(&self) -> &[(VarId, f64)] { &self.terms }

    /// true if the expression has no term
    pub fn is_empty(&self) -> bool { self.terms.is_empty() }

    /// value of the expression given variable values (missing values read as 0)
    pub fn evaluate(&self, values:&[f64]) -> f64 {
        self.terms.iter()
            .map(|(var,coef)| coef * values.get(var.0).copied().unwrap_or(0.))
            .sum()
    }
}

/** comparison operator of a linear constraint */
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Comparison {
    /// expr = rhs
    Eq,
    /// expr <= rhs
    Le,
    /// expr >= rhs
    Ge,
}

/** family of a constraint in the formulation */
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ConstraintKind {
    /// ∑_c x_{i,c} = 1
    ExactlyOneColor,
    /// x_{u,c} + x_{v,c} <= 1
    Adjacency,
    /// ∑_i w_i·x_{i,c} <= W
    Capacity,
    /// y_c - x_{i,c} >= 0
    Linking,
    /// x_{i,k} = 1
    Preservation,
}

/** linear constraint `expr (=|<=|>=) rhs` */
#[derive(Clone, Debug, PartialEq)]
pub struct LinearConstraint {
    /// constraint family
    pub kind: ConstraintKind,
    /// left hand side
    pub expr: LinearExpr,
    /// operator
    pub cmp: Comparison,
    /// right hand side
    pub rhs: f64,
}

impl LinearConstraint {
    /// true if the constraint holds (up to `eps`) for the given values
    pub fn is_satisfied(&self, values:&[f64], eps:f64) -> bool {
        let lhs = self.expr.evaluate(values);
        match self.cmp {
            Comparison::Eq => (lhs - self.rhs).abs() <= eps,
            Comparison::Le => lhs <= self.rhs + eps,
            Comparison::Ge => lhs >= self.rhs - eps,
        }
    }
}


/** 0/1 integer program of a capacitated coloring instance (minimization).

Variables are laid out as: y_c for c in 0..nb_colors, then x_{i,c} for each
relevant vertex i (in increasing id order) and each candidate color c.
*/
#[derive(Clone, Debug)]
pub struct ColoringProblem {
    /// instance name (used in exports)
    name: String,
    /// size of the candidate color set
    nb_colors: usize,
    /// relevant vertices in increasing order
    relevant: Vec<VertexId>,
    /// slot[v]: position of v in `relevant` if v is relevant
    slot: Vec<Option<usize>>,
    /// decision variables
    variables: Vec<Variable>,
    /// coefficient of the y_c variables in the objective
    big: f64,
    /// objective (minimized)
    objective: LinearExpr,
    /// constraint list
    constraints: Vec<LinearConstraint>,
}

impl ColoringProblem {

    /// creates the variables of the problem, without objective nor constraints
    pub(crate) fn new(name:&str, nb_vertices:usize, nb_colors:usize, relevant:Vec<VertexId>) -> Self {
        let mut slot = vec![None ; nb_vertices];
        for (pos,v) in relevant.iter().enumerate() {
            slot[*v] = Some(pos);
        }
        let mut variables = Vec::with_capacity(nb_colors * (relevant.len()+1));
        variables.extend((0..nb_colors).map(Variable::ColorUsed));
        for v in &relevant {
            variables.extend((0..nb_colors).map(|c| Variable::Assign(*v, c)));
        }
        Self {
            name: name.to_string(),
            nb_colors,
            relevant,
            slot,
            variables,
            big: 0.,
            objective: LinearExpr::default(),
            constraints: Vec::new(),
        }
    }

    pub(crate) fn set_objective(&mut self, big:f64, objective:LinearExpr) {
        self.big = big;
        self.objective = objective;
    }

    pub(crate) fn add_constraint(&mut self, kind:ConstraintKind, expr:LinearExpr, cmp:Comparison, rhs:f64) {
        self.constraints.push(LinearConstraint { kind, expr, cmp, rhs });
    }

    /// instance name
    pub fn name(&self) -> &str { &self.name }

    /// size of the candidate color set
    pub fn nb_colors(&self) -> usize { self.nb_colors }

    /// vertices taking part in the formulation
    pub fn relevant_vertices(&self) -> &[VertexId] { &self.relevant }

    /// number of decision variables
    pub fn nb_variables(&self) -> usize { self.variables.len() }

    /// decision variables (indexed by `VarId`)
    pub fn variables(&self) -> &[Variable] { &self.variables }

    /// variable y_c
    pub fn color_used_var(&self, c:ColorId) -> Option<VarId> {
        if c < self.nb_colors { Some(VarId(c)) } else { None }
    }

    /// variable x_{v,c}, None if v is not relevant or c not a candidate color
    pub fn assign_var(&self, v:VertexId, c:ColorId) -> Option<VarId> {
        if c >= self.nb_colors { return None; }
        let pos = (*self.slot.get(v)?)?;
        Some(Self::assign_var_at(self.nb_colors, pos, c))
    }

    /// x_{i,c} where i is the pos-th relevant vertex (unchecked)
    pub(crate) fn assign_var_at(nb_colors:usize, pos:usize, c:ColorId) -> VarId {
        VarId(nb_colors * (pos+1) + c)
    }

    /// y_c (unchecked)
    pub(crate) fn color_used_var_at(c:ColorId) -> VarId { VarId(c) }

    /// coefficient of the y_c variables in the objective
    pub fn big_coefficient(&self) -> f64 { self.big }

    /// objective function (minimized)
    pub fn objective(&self) -> &LinearExpr { &self.objective }

    /// constraints of the problem
    pub fn constraints(&self) -> &[LinearConstraint] { &self.constraints }

    /// constraints of a given family
    pub fn constraints_of(&self, kind:ConstraintKind) -> impl Iterator<Item=&LinearConstraint> {
        self.constraints.iter().filter(move |cst| cst.kind == kind)
    }

    /// objective value of an assignment
    pub fn objective_value(&self, values:&[f64]) -> f64 {
        self.objective.evaluate(values)
    }

    /** reads the coloring from variable values: vertex i gets the color c such
    that x_{i,c} > 0.5. Fails if there is not exactly one value per variable. */
    pub fn decode(&self, values:&[f64]) -> Result<Solution> {
        if values.len() != self.nb_variables() {
            return Err(ColoringError::SolutionSize {
                expected: self.nb_variables(), found: values.len()
            });
        }
        let mut res = Solution::new();
        for v in &self.relevant {
            let color = (0..self.nb_colors).find(|c| {
                self.assign_var(*v, *c)
                    .and_then(|var| values.get(var.0))
                    .map_or(false, |x| *x > BINARY_TOLERANCE)
            }).ok_or(ColoringError::InconsistentSolution(*v))?;
            res.insert(*v, color);
        }
        Ok(res)
    }

    /// LP-format name of a variable
    pub fn var_name(&self, var:VarId) -> String {
        match self.variables.get(var.0) {
            Some(Variable::ColorUsed(c)) => format!("y_{}", c),
            Some(Variable::Assign(v, c)) => format!("x_{}_{}", v, c),
            None => format!("v_{}", var.0),
        }
    }

    /** exports the problem in CPLEX LP format */
    pub fn to_lp_string(&self) -> String {
        let mut res = String::default();
        // writing into a String cannot fail
        let _ = writeln!(res, "\\ {}", self.name);
        let _ = writeln!(res, "Minimize");
        let _ = writeln!(res, " obj: {}", self.lp_expr(&self.objective));
        let _ = writeln!(res, "Subject To");
        for (i,cst) in self.constraints.iter().enumerate() {
            let op = match cst.cmp {
                Comparison::Eq => "=",
                Comparison::Le => "<=",
                Comparison::Ge => ">=",
            };
            let _ = writeln!(res, " c{}: {} {} {}", i, self.lp_expr(&cst.expr), op, cst.rhs);
        }
        let _ = writeln!(res, "Binary");
        for i in 0..self.nb_variables() {
            let _ = writeln!(res, " {}", self.var_name(VarId(i)));
        }
        res += "End\n";
        res
    }

    fn lp_expr(&self, expr:&LinearExpr) -> String {
        let mut res = String::default();
        for (var,coef) in expr.terms() {
            if *coef == 0. { continue; }
            let sign = if *coef < 0. { "-" } else { "+" };
            if res.is_empty() {
                if *coef < 0. { res += "- "; }
            } else {
                res += &format!(" {} ", sign);
            }
            res += &format!("{} {}", coef.abs(), self.var_name(*var));
        }
        if res.is_empty() { res += "0"; }
        res
    }
}
