//! Error types for polyforge.
//!
//! Topology algorithms do not use these: when an operation does not apply to
//! the local topology they return an empty result and leave the mesh alone.
//! Errors are reserved for external input (files, serialized buffers,
//! builder parameters).

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using [`MeshError`].
pub type Result<T> = std::result::Result<T, MeshError>;

/// Errors that can occur while building, loading or saving meshes.
#[derive(Error, Debug)]
pub enum MeshError {
    /// The mesh has no faces.
    #[error("mesh has no faces")]
    EmptyMesh,

    /// A face references an invalid vertex index.
    #[error("face {face} references invalid vertex index {vertex}")]
    InvalidVertexIndex {
        /// The face index.
        face: usize,
        /// The invalid vertex index.
        vertex: usize,
    },

    /// A face has fewer than three corners or repeats a corner.
    #[error("face {face} is degenerate")]
    DegenerateFace {
        /// The face index.
        face: usize,
    },

    /// A serialized column references an entity that does not exist.
    #[error("{field} references index {index}, but only {len} entries exist")]
    InvalidIndex {
        /// Name of the column.
        field: &'static str,
        /// The offending index.
        index: i64,
        /// Number of entries available.
        len: usize,
    },

    /// Two parallel columns disagree in length.
    #[error("{field} has {actual} entries, expected {expected}")]
    LengthMismatch {
        /// Name of the column.
        field: &'static str,
        /// Expected number of entries.
        expected: usize,
        /// Actual number of entries.
        actual: usize,
    },

    /// More entities than the handle type can address.
    #[error("{field} needs {count} entries, but the index type holds at most {max}")]
    TooManyEntities {
        /// Name of the column.
        field: &'static str,
        /// Number of entries requested.
        count: usize,
        /// Largest count the index type can address.
        max: usize,
    },

    /// A serialized column could not be decoded.
    #[error("malformed {field} buffer: {message}")]
    MalformedBuffer {
        /// Name of the column.
        field: &'static str,
        /// What went wrong.
        message: String,
    },

    /// JSON (de)serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// File I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Error loading mesh from file.
    #[error("failed to load mesh from {path}: {message}")]
    LoadError {
        /// The file path.
        path: PathBuf,
        /// Error message.
        message: String,
    },

    /// Error saving mesh to file.
    #[error("failed to save mesh to {path}: {message}")]
    SaveError {
        /// The file path.
        path: PathBuf,
        /// Error message.
        message: String,
    },

    /// Unsupported file format.
    #[error("unsupported file format: {extension}")]
    UnsupportedFormat {
        /// The file extension.
        extension: String,
    },

    /// Invalid parameter value.
    #[error("invalid parameter: {name} = {value} ({reason})")]
    InvalidParameter {
        /// Parameter name.
        name: &'static str,
        /// The invalid value (as string).
        value: String,
        /// Reason the value is invalid.
        reason: &'static str,
    },
}

impl MeshError {
    /// Create an invalid parameter error.
    pub fn invalid_param<T: std::fmt::Display>(
        name: &'static str,
        value: T,
        reason: &'static str,
    ) -> Self {
        MeshError::InvalidParameter {
            name,
            value: value.to_string(),
            reason,
        }
    }
}
