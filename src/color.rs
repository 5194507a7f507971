use std::collections::BTreeMap;

use bit_set::BitSet;

/** Vertex Id */
pub type VertexId = usize;

/** Color Id (index in the candidate color set) */
pub type ColorId = usize;

/** Solution of a capacitated coloring problem: color of each relevant vertex.
Vertices that were not part of the problem are absent.
*/
pub type Solution = BTreeMap<VertexId, ColorId>;

/// number of distinct colors used by a solution
pub fn nb_colors(solution:&Solution) -> usize {
    let mut used = BitSet::new();
    for c in solution.values() { used.insert(*c); }
    used.len()
}

/// solution as a partition: classes[c] lists the vertices colored c
pub fn color_classes(solution:&Solution) -> Vec<Vec<VertexId>> {
    let nb_classes = solution.values().max().map_or(0, |c| c+1);
    let mut res = vec![vec![] ; nb_classes];
    for (v,c) in solution {
        res[*c].push(*v);
    }
    res
}

/// result of the solution checker
#[derive(Debug, Clone, PartialEq)]
pub enum CheckerResult {
    /// feasible solution (number of colors used)
    Ok(usize),
    /// vertex expected to be colored but is not
    VertexNotColored(VertexId),
    /// both endpoints of the edge share the same color
    ConflictingEdge(VertexId, VertexId),
    /// total weight of the color exceeds the capacity (color, total weight)
    CapacityExceeded(ColorId, f64),
}

/**
checks a solution against the instance:
 - every vertex of `colored` appears in the solution,
 - no edge whose both endpoints are colored shares a color,
 - the weight of each color class is at most `capacity`.

`weights[v]` is the weight of vertex v.
*/
pub fn checker(
    edges:&[(VertexId,VertexId)],
    weights:&[f64],
    colored:&[VertexId],
    solution:&Solution,
    capacity:f64
) -> CheckerResult {
    for v in colored {
        if !solution.contains_key(v) {
            return CheckerResult::VertexNotColored(*v);
        }
    }
    for (u,v) in edges {
        if let (Some(cu), Some(cv)) = (solution.get(u), solution.get(v)) {
            if cu == cv {
                return CheckerResult::ConflictingEdge(*u, *v);
            }
        }
    }
    let mut load:BTreeMap<ColorId, f64> = BTreeMap::new();
    for (v,c) in solution {
        *load.entry(*c).or_insert(0.) += weights[*v];
    }
    // small tolerance: weights are summed in floating point
    for (c,w) in load {
        if w > capacity + 1e-6 {
            return CheckerResult::CapacityExceeded(c, w);
        }
    }
    CheckerResult::Ok(nb_colors(solution))
}


#[cfg(test)]
mod tests {
    use super::*;

    fn sol(pairs:&[(VertexId,ColorId)]) -> Solution {
        pairs.iter().cloned().collect()
    }

    #[test]
    fn test_checker_ok() {
        let edges = [(0,1),(1,2)];
        let s = sol(&[(0,0),(1,1),(2,0)]);
        assert_eq!(checker(&edges, &[1.,1.,1.], &[0,1,2], &s, 2.), CheckerResult::Ok(2));
    }

    #[test]
    fn test_checker_conflict() {
        let edges = [(0,1),(1,2)];
        let s = sol(&[(0,0),(1,1),(2,1)]);
        assert_eq!(checker(&edges, &[1.,1.,1.], &[0,1,2], &s, 3.), CheckerResult::ConflictingEdge(1,2));
    }

    #[test]
    fn test_checker_capacity() {
        let s = sol(&[(0,0),(1,0),(2,1)]);
        assert_eq!(checker(&[], &[1.,1.5,1.], &[0,1,2], &s, 2.), CheckerResult::CapacityExceeded(0, 2.5));
    }

    #[test]
    fn test_checker_missing_vertex() {
        let s = sol(&[(0,0)]);
        assert_eq!(checker(&[], &[1.,1.], &[0,1], &s, 2.), CheckerResult::VertexNotColored(1));
    }

    #[test]
    fn test_classes() {
        let s = sol(&[(0,2),(3,0),(5,2)]);
        assert_eq!(color_classes(&s), vec![vec![3], vec![], vec![0,5]]);
        assert_eq!(nb_colors(&s), 2);
    }
}
