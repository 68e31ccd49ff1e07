//! Error types for workspace planning operations.

use std::path::PathBuf;
use thiserror::Error;
use uuid::Uuid;

use crate::model::MarkerId;

/// Error codes for planner failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    /// File not found or unreadable (-1)
    FileNotFound = -1,
    /// Malformed project data (-3)
    ParseError = -3,
    /// Project has no version marker (-11)
    MissingVersion = -11,
    /// Referenced workpiece does not exist (E100)
    ItemNotFound = 100,
    /// Referenced catalog material does not exist (E101)
    MaterialNotFound = 101,
    /// Referenced guide or measurement does not exist (E102)
    MarkerNotFound = 102,
    /// Cut point outside the piece (E200)
    InvalidCut = 200,
    /// Operation needs a selection (E201)
    EmptySelection = 201,
    /// Project failed integrity checks (E300)
    InvalidProject = 300,
}

/// Main error type for the planner.
#[derive(Debug, Error)]
pub enum PlannerError {
    #[error("File not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error("Invalid project file: missing version")]
    MissingVersion,

    #[error("Invalid project file: invalid workspace items")]
    InvalidWorkspaceItems,

    #[error("Workpiece not found: {id}")]
    ItemNotFound { id: Uuid },

    #[error("Material not found in catalog: {id}")]
    MaterialNotFound { id: String },

    #[error("Guide not found: {id}")]
    GuideNotFound { id: MarkerId },

    #[error("Measurement not found: {id}")]
    MeasurementNotFound { id: MarkerId },

    #[error("Cut point {cut_point} is outside piece of length {length}")]
    InvalidCutPoint { cut_point: f64, length: f64 },

    #[error("Kerf {kerf} must be a finite, non-negative width")]
    InvalidKerf { kerf: f64 },

    #[error("Length {length} must be positive and at most the stock length {stock}")]
    InvalidLength { length: f64, stock: f64 },

    #[error("Quantity must be at least 1")]
    InvalidQuantity,

    #[error("Project failed validation: {}", errors.join("; "))]
    InvalidProject { errors: Vec<String> },

    #[error("Nothing selected")]
    EmptySelection,

    #[error("Unknown unit '{value}' (expected mm, cm, in or m)")]
    UnknownUnit { value: String },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl PlannerError {
    /// Get the error code for this error.
    pub fn code(&self) -> ErrorCode {
        match self {
            PlannerError::FileNotFound { .. } => ErrorCode::FileNotFound,
            PlannerError::MissingVersion => ErrorCode::MissingVersion,
            PlannerError::InvalidWorkspaceItems => ErrorCode::ParseError,
            PlannerError::ItemNotFound { .. } => ErrorCode::ItemNotFound,
            PlannerError::MaterialNotFound { .. } => ErrorCode::MaterialNotFound,
            PlannerError::GuideNotFound { .. } => ErrorCode::MarkerNotFound,
            PlannerError::MeasurementNotFound { .. } => ErrorCode::MarkerNotFound,
            PlannerError::InvalidCutPoint { .. } => ErrorCode::InvalidCut,
            PlannerError::InvalidKerf { .. } => ErrorCode::InvalidCut,
            PlannerError::InvalidLength { .. } => ErrorCode::InvalidCut,
            PlannerError::InvalidQuantity => ErrorCode::InvalidCut,
            PlannerError::InvalidProject { .. } => ErrorCode::InvalidProject,
            PlannerError::EmptySelection => ErrorCode::EmptySelection,
            PlannerError::UnknownUnit { .. } => ErrorCode::ParseError,
            PlannerError::Json(_) => ErrorCode::ParseError,
            PlannerError::Io(_) => ErrorCode::FileNotFound,
        }
    }

    /// Get the numeric error code value.
    pub fn code_value(&self) -> i32 {
        self.code() as i32
    }
}

/// Result type alias for planner operations.
pub type Result<T> = std::result::Result<T, PlannerError>;
