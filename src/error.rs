use thiserror::Error;

use crate::color::{ColorId, VertexId};

/** errors raised while validating, formulating or decoding a coloring problem.

Solver statuses other than "optimal" are not errors, they are reported as
`ColoringStatus::NoSolution`.
*/
#[derive(Debug, Error)]
pub enum ColoringError {
    /// capacity bound is negative or not finite
    #[error("invalid capacity bound: {0} (must be finite and >= 0)")]
    InvalidCapacity(f64),

    /// an edge references a vertex that does not exist
    #[error("edge ({source_vertex},{target_vertex}) references a vertex outside 0..{nb_vertices}")]
    EdgeOutOfRange {
        /// first endpoint
        source_vertex: VertexId,
        /// second endpoint
        target_vertex: VertexId,
        /// number of vertices of the graph
        nb_vertices: usize,
    },

    /// the graph contains a self-loop (it must be simple)
    #[error("self-loop on vertex {0}")]
    SelfLoop(VertexId),

    /// attribute access on a vertex that does not exist
    #[error("vertex {vertex} does not exist (graph has {nb_vertices} vertices)")]
    VertexOutOfRange {
        /// requested vertex
        vertex: VertexId,
        /// number of vertices of the graph
        nb_vertices: usize,
    },

    /// the attribute column was never created
    #[error("missing vertex attribute '{0}'")]
    MissingAttribute(String),

    /// attribute value has the wrong type
    #[error("attribute '{attribute}' of vertex {vertex}: expected {expected}")]
    AttributeType {
        /// attribute name
        attribute: String,
        /// vertex holding the value
        vertex: VertexId,
        /// human readable expected type
        expected: &'static str,
    },

    /// negative or non-finite vertex weight
    #[error("vertex {vertex} has an invalid weight {weight}")]
    InvalidWeight {
        /// vertex holding the weight
        vertex: VertexId,
        /// offending weight
        weight: f64,
    },

    /// a color to preserve is not a candidate color
    #[error("vertex {vertex} is preset to color {color}, but only {nb_colors} colors are available")]
    PreservedColorOutOfRange {
        /// preset vertex
        vertex: VertexId,
        /// preset color
        color: ColorId,
        /// size of the candidate color set
        nb_colors: usize,
    },

    /// the solver claimed optimality but a relevant vertex got no color
    #[error("solver returned no color for relevant vertex {0}")]
    InconsistentSolution(VertexId),

    /// the solver returned a number of values different from the number of variables
    #[error("solver returned {found} values for {expected} variables")]
    SolutionSize {
        /// number of variables of the problem
        expected: usize,
        /// number of values returned
        found: usize,
    },

    /// file access error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON (de)serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// instance file could not be parsed
    #[error("parse error: {0}")]
    Parse(String),
}

/// Result type alias for coloring operations
pub type Result<T> = std::result::Result<T, ColoringError>;
