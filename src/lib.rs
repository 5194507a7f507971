//! Capacitated graph coloring through a 0/1 integer program
//!
//! Colors the relevant vertices of a graph so that adjacent vertices differ,
//! each color holds at most a given total weight, and the number of colors
//! is minimal (ties broken toward low color indices).

// #![warn(clippy::all, clippy::pedantic)]
// useful additional warnings if docs are missing, or crates imported but unused, etc.
#![warn(missing_debug_implementations)]
#![warn(missing_docs)]
#![warn(trivial_casts, trivial_numeric_casts)]
#![warn(unsafe_code)]
#![warn(unused_extern_crates)]
#![warn(variant_size_differences)]

// not sure if already by default in clippy
#![warn(clippy::similar_names)]
#![warn(clippy::shadow_unrelated)]
#![warn(clippy::shadow_same)]
#![warn(clippy::shadow_reuse)]


/// error type
pub mod error;

/// vertex/color ids, solutions and checker
pub mod color;

/// graph with named vertex attributes
pub mod graph;

/// read DIMACS formats
pub mod dimacs;

/// solver-independent MIP description
pub mod problem;

/// MIP formulation of the capacitated coloring problem
pub mod builder;

/// MIP solver interface and good_lp implementation
pub mod solver;

/// coloring entry point (normalize, build, solve, write back)
pub mod orchestrator;

/// helper and utility methods for executables
pub mod util;

pub use orchestrator::{color_graph, ColoringOptions, ColoringStatus, GraphColorer};
