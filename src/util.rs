use clap::ArgMatches;
use serde_json::Value;

use crate::{
    builder::{read_color, read_relevant, read_weight},
    color::{checker, CheckerResult, Solution, VertexId},
    dimacs,
    error::{ColoringError, Result},
    graph::{AttributedGraph, ColoringGraph},
    orchestrator::ColoringOptions,
};

/** command line parameters of the coloring executable */
#[derive(Debug, Clone)]
pub struct Params {
    /// instance filename
    pub inst_filename: String,
    /// instance graph
    pub graph: AttributedGraph,
    /// coloring options
    pub options: ColoringOptions,
    /// where to write the colored graph
    pub sol_file: Option<String>,
    /// where to write the statistics
    pub perf_file: Option<String>,
    /// where to write the MIP model
    pub lp_file: Option<String>,
}

/// parses an optional numeric argument
fn parse_arg<T:std::str::FromStr>(main_args:&ArgMatches, name:&str) -> Result<Option<T>> {
    match main_args.value_of(name) {
        None => Ok(None),
        Some(s) => s.parse::<T>().map(Some)
            .map_err(|_| ColoringError::Parse(format!("unable to parse --{} '{}'", name, s))),
    }
}

/** reads command line input: instance (dimacs or json), options and output files */
pub fn read_params(main_args:&ArgMatches) -> Result<Params> {
    let inst_filename = main_args.value_of("instance")
        .ok_or_else(|| ColoringError::Parse("missing instance".to_string()))?;
    let graph = match main_args.value_of("type").unwrap_or("json") {
        "dimacs" => dimacs::read_from_file(inst_filename)?,
        "json" => AttributedGraph::from_json_file(inst_filename)?,
        t => return Err(ColoringError::Parse(format!("instance type unknown {}", t))),
    };
    let mut options = ColoringOptions::default().with_preserve(main_args.is_present("preserve"));
    options.capacity = parse_arg(main_args, "capacity")?;
    options.max_colors = parse_arg(main_args, "max-colors")?;
    if let Some(name) = main_args.value_of("weight-attr") { options.weight_attr = name.to_string(); }
    if let Some(name) = main_args.value_of("color-attr") { options.color_attr = name.to_string(); }
    if let Some(name) = main_args.value_of("relevant-attr") { options.relevant_attr = name.to_string(); }
    let sol_file = main_args.value_of("solution").map(|e| e.to_string());
    let perf_file = main_args.value_of("perf").map(|e| e.to_string());
    let lp_file = main_args.value_of("lp").map(|e| e.to_string());
    graph.display_statistics();
    println!("=======================");
    Ok(Params { inst_filename: inst_filename.to_string(), graph, options, sol_file, perf_file, lp_file })
}

/** checks the coloring stored in the graph attributes: relevant vertices are
colored, no conflict between relevant vertices, capacity respected */
pub fn check_coloring<G:ColoringGraph + ?Sized>(
    graph:&G,
    options:&ColoringOptions,
    capacity:f64
) -> Result<CheckerResult> {
    let n = graph.nb_vertices();
    let mut relevant:Vec<VertexId> = Vec::new();
    let mut weights:Vec<f64> = vec![0. ; n];
    let mut solution = Solution::new();
    for v in 0..n {
        if !read_relevant(graph, &options.relevant_attr, v)? { continue; }
        relevant.push(v);
        weights[v] = read_weight(graph, &options.weight_attr, v)?;
        if let Some(c) = read_color(graph, &options.color_attr, v)? {
            solution.insert(v, c);
        }
    }
    Ok(checker(graph.edges(), &weights, &relevant, &solution, capacity))
}

/// exports statistics and the colored graph to files
pub fn export_results(
    graph:&AttributedGraph,
    stats:&Value,
    perf_file:Option<&str>,
    sol_file:Option<&str>,
) -> Result<()> {
    if let Some(filename) = perf_file {
        std::fs::write(filename, serde_json::to_string(stats)?)?;
    }
    if let Some(filename) = sol_file {
        graph.write_json_file(filename)?;
    }
    Ok(())
}


#[cfg(test)]
mod tests {
    use super::*;

    use crate::graph::AttrValue;
    use crate::orchestrator::{color_graph, ColoringStatus};

    #[test]
    fn test_check_coloring_after_solve() {
        let mut g = AttributedGraph::new(4, vec![(0,1),(1,2),(2,3),(3,0)]);
        let options = ColoringOptions::default().with_capacity(2.);
        assert_eq!(color_graph(&mut g, &options).unwrap(), ColoringStatus::Optimal);
        assert_eq!(check_coloring(&g, &options, 2.).unwrap(), CheckerResult::Ok(2));
    }

    #[test]
    fn test_check_coloring_conflict() {
        let mut g = AttributedGraph::new(2, vec![(0,1)]);
        let options = ColoringOptions::default();
        g.fill_attribute(&options.relevant_attr, AttrValue::Bool(true)).unwrap();
        g.fill_attribute(&options.weight_attr, AttrValue::Float(1.)).unwrap();
        g.fill_attribute(&options.color_attr, AttrValue::Int(0)).unwrap();
        assert_eq!(check_coloring(&g, &options, 2.).unwrap(), CheckerResult::ConflictingEdge(0,1));
        // an irrelevant endpoint is not checked
        g.set_attribute(&options.relevant_attr, 1, AttrValue::Bool(false)).unwrap();
        assert_eq!(check_coloring(&g, &options, 2.).unwrap(), CheckerResult::Ok(1));
    }
}
