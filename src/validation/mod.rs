//! Project validation.

mod validate;

pub use validate::{
    validate_catalog, validate_items, validate_markers, validate_project, ValidationResult,
};
