// Validation errors reported back to the caller before any write

use thiserror::Error;

/// Input rejected by the store or by field parsing.
///
/// These travel inside `eyre::Report`; use `report.downcast_ref::<ValidationError>()`
/// to tell them apart from storage failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Title is required.")]
    EmptyTitle,

    #[error("Date must be in YYYY-MM-DD format (got {input:?}).")]
    InvalidDate { input: String },

    #[error("Priority must be one of High, Medium, Low (got {input:?}).")]
    InvalidPriority { input: String },

    #[error("Status must be one of All, Pending, Done (got {input:?}).")]
    InvalidStatus { input: String },
}

impl ValidationError {
    /// True if this report carries a validation error rather than a storage failure
    pub fn is_validation(report: &eyre::Report) -> bool {
        report.downcast_ref::<ValidationError>().is_some()
    }
}
