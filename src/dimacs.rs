use std::collections::BTreeSet;
use std::fs;

use nom::IResult;
use nom::branch::alt;
use nom::bytes::complete::tag;
use nom::character::complete::{digit1, space0, space1};
use nom::combinator::{map_res, eof};
use nom::number::complete::double;
use nom::sequence::{pair, preceded, terminated};
use tracing::warn;

use crate::builder::DEFAULT_WEIGHT_ATTR;
use crate::color::VertexId;
use crate::error::{ColoringError, Result};
use crate::graph::{AttrValue, AttributedGraph, ColoringGraph};


/** reads a DIMACS instance (`p edge n m`, `e u v`, optional `n v w` weights)
from a file. Vertex ids are converted from 1-based to 0-based, duplicated
edges are removed. Weights (if any) are stored in the `weight` attribute.
*/
pub fn read_from_file(filename:&str) -> Result<AttributedGraph> {
    let s = fs::read_to_string(filename)?;
    read_from_str(&s)
}

/// reads a DIMACS instance from a string
pub fn read_from_str(s:&str) -> Result<AttributedGraph> {
    let mut header:Option<(usize,usize)> = None;
    let mut edges:BTreeSet<(VertexId,VertexId)> = BTreeSet::new();
    let mut weights:Vec<(VertexId,f64)> = Vec::new();
    let mut nb_edge_lines = 0;
    for (i,line) in s.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('c') { continue; }
        let err = || ColoringError::Parse(format!("line {}: unable to read '{}'", i+1, line));
        if line.starts_with('p') {
            header = Some(read_header(line).map_err(|_| err())?.1);
            continue;
        }
        let n = header.map(|(n,_)| n)
            .ok_or_else(|| ColoringError::Parse(format!("line {}: missing 'p' line", i+1)))?;
        if line.starts_with('e') {
            let (a,b) = read_edge(line).map_err(|_| err())?.1;
            let (a,b) = (to_vertex(a, n, i)?, to_vertex(b, n, i)?);
            edges.insert((a.min(b), a.max(b)));
            nb_edge_lines += 1;
        } else if line.starts_with('n') {
            let (v,w) = read_vertex_weight(line).map_err(|_| err())?.1;
            weights.push((to_vertex(v, n, i)?, w));
        } else {
            return Err(err());
        }
    }
    let (n,m) = header.ok_or_else(|| ColoringError::Parse("missing 'p' line".to_string()))?;
    if nb_edge_lines != m && nb_edge_lines != 2*m {
        warn!(nb_edge_lines, m, "number of edges differs from the header");
    }
    let mut res = AttributedGraph::new(n, edges.into_iter().collect());
    if !weights.is_empty() {
        res.fill_attribute(DEFAULT_WEIGHT_ATTR, AttrValue::Float(1.))?;
        for (v,w) in weights {
            res.set_attribute(DEFAULT_WEIGHT_ATTR, v, AttrValue::Float(w))?;
        }
    }
    Ok(res)
}

/// checks a 1-based id and converts it
fn to_vertex(id:usize, n:usize, line:usize) -> Result<VertexId> {
    if id == 0 || id > n {
        return Err(ColoringError::Parse(format!("line {}: vertex {} not in 1..{}", line+1, id, n)));
    }
    Ok(id-1)
}

/// reads a non-negative integer
fn integer(s:&str) -> IResult<&str, usize> {
    map_res(digit1, |d:&str| d.parse::<usize>())(s)
}

/// reads two numbers separated by spaces (end of line expected)
fn read_two_integers(s:&str) -> IResult<&str, (usize,usize)> {
    terminated(
        pair(preceded(space1, integer), preceded(space1, integer)),
        pair(space0, eof)
    )(s)
}

/// reads header containing (n,m)
pub fn read_header(s:&str) -> IResult<&str, (usize,usize)> {
    preceded(pair(tag("p"), pair(space1, alt((tag("edge"), tag("col"))))), read_two_integers)(s)
}

/// reads edge line (WARNING: indices start at 1 in the DIMACS format)
pub fn read_edge(s:&str) -> IResult<&str, (usize,usize)> {
    preceded(tag("e"), read_two_integers)(s)
}

/// reads a vertex weight line `n v w`
pub fn read_vertex_weight(s:&str) -> IResult<&str, (usize,f64)> {
    preceded(
        tag("n"),
        terminated(
            pair(preceded(space1, integer), preceded(space1, double)),
            pair(space0, eof)
        )
    )(s)
}
