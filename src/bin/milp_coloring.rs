use std::time::Instant;

use clap::{App, load_yaml};
use serde_json::json;
use tracing_subscriber::EnvFilter;

use milp_coloring::color::CheckerResult;
use milp_coloring::error::Result;
use milp_coloring::orchestrator::{capacity_bound, prepare_problem, ColoringStatus, GraphColorer};
use milp_coloring::solver::GoodLpSolver;
use milp_coloring::util::{check_coloring, export_results, read_params};


/** colors an instance with the capacitated coloring MIP */
pub fn main() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("milp_coloring=info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();
    // parse arguments
    let yaml = load_yaml!("milp_coloring.yml");
    let main_args = App::from_yaml(yaml).get_matches();
    if let Err(e) = run(&main_args) {
        eprintln!("ERROR: {}", e);
        std::process::exit(1);
    }
}

fn run(main_args:&clap::ArgMatches) -> Result<()> {
    let mut params = read_params(main_args)?;
    if let Some(filename) = &params.lp_file {
        // the model is built on a copy: preparing clears colors
        let (problem, _) = prepare_problem(&mut params.graph.clone(), &params.options)?;
        std::fs::write(filename, problem.to_lp_string())?;
        println!("MIP model written in: {}", filename);
    }

    // solve it
    let t_start = Instant::now();
    let status = GraphColorer::new(GoodLpSolver).color(&mut params.graph, &params.options)?;
    let duration = t_start.elapsed().as_secs_f32();
    let capacity = capacity_bound(&params.graph, &params.options)?;
    let nb_colors = match status {
        ColoringStatus::Optimal => {
            match check_coloring(&params.graph, &params.options, capacity)? {
                CheckerResult::Ok(n) => Some(n),
                res => {
                    println!("invalid solution (reason: {:?})", res);
                    None
                }
            }
        },
        ColoringStatus::NoSolution(reason) => {
            println!("no solution ({:?})", reason);
            None
        }
    };
    println!("MIP took {:.3} seconds. Nb colors: {:?}", duration, nb_colors);
    let stats = json!({
        "inst_name": params.inst_filename,
        "status": status.code(),
        "nb_colors": nb_colors,
        "capacity": capacity,
        "time_searched": duration,
    });

    // export results
    export_results(
        &params.graph,
        &stats,
        params.perf_file.as_deref(),
        params.sol_file.as_deref(),
    )
}
