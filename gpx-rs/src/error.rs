//! Error types for the GPX element tree.

use thiserror::Error;

/// Result type alias for GPX tree operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while editing or rendering a GPX tree.
#[derive(Error, Debug)]
pub enum Error {
    /// A tree mutation would break single-parent ownership or acyclicity.
    ///
    /// Raised before anything is changed, so the tree is left as it was.
    #[error("Structural error: {0}")]
    Structural(String),

    /// An element's required state is missing or invalid at render time.
    #[error("Contract violation in <{element}>: {detail}")]
    ContractViolation {
        /// Name of the offending element kind.
        element: &'static str,
        /// What is missing or wrong.
        detail: String,
    },

    /// I/O error while writing rendered output.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    pub(crate) fn structural(detail: impl Into<String>) -> Self {
        Error::Structural(detail.into())
    }

    pub(crate) fn contract(element: &'static str, detail: impl Into<String>) -> Self {
        Error::ContractViolation {
            element,
            detail: detail.into(),
        }
    }

    /// Returns true for [`Error::Structural`].
    pub fn is_structural(&self) -> bool {
        matches!(self, Error::Structural(_))
    }

    /// Returns true for [`Error::ContractViolation`].
    pub fn is_contract_violation(&self) -> bool {
        matches!(self, Error::ContractViolation { .. })
    }
}
