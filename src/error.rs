//! Error types for sphere sampling and mesh construction

/// Errors that can occur while sampling, triangulating or building a mesh
///
/// The pipeline entry points recover from both variants locally and return
/// an empty mesh; only the `try_*` functions and configuration validation
/// surface them to the caller.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum MeshError {
    /// A count, vector or option was outside its valid range
    #[error("invalid input: {0}")]
    InvalidInput(String),
    /// Triangulation collapsed to zero triangles
    #[error("degenerate geometry: {0}")]
    DegenerateGeometry(String),
}

/// Result type alias for sphere mesh operations
pub type Result<T> = std::result::Result<T, MeshError>;
