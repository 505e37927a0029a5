//! Typed install outcomes.
//!
//! Detectors signal a non-match by returning false; install functions that
//! have already claimed an archive fail with one of these variants. The
//! message is user-facing; the pipeline surfaces it through a dialog before
//! returning the error to the host.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InstallError {
    /// No layout matched. Not an error; the pipeline moves on.
    #[error("no recognizable mod layout")]
    NoMatch,

    /// The layout could not be resolved into instructions.
    #[error("mod structure is not installable: {0}")]
    Structure(String),

    /// Schema or whitelist failure in an otherwise recognized layout.
    #[error("mod failed validation: {0}")]
    Validation(String),

    /// Multiple mutually exclusive layouts are present at once.
    #[error("conflicting mod layouts: {0}")]
    Conflict(String),

    /// The user declined to continue when prompted.
    #[error("installation cancelled")]
    Cancelled,

    /// A staged file could not be read.
    #[error("failed to read staged file: {0}")]
    Io(String),
}

impl InstallError {
    /// Dialog title matching the error kind.
    pub fn title(&self) -> &'static str {
        match self {
            InstallError::NoMatch => "Unrecognized Mod",
            InstallError::Structure(_) => "Mod Structure Error",
            InstallError::Validation(_) => "Mod Validation Failed",
            InstallError::Conflict(_) => "Conflicting Mod Layouts",
            InstallError::Cancelled => "Installation Cancelled",
            InstallError::Io(_) => "Mod Read Error",
        }
    }

    /// True for the non-error fallthrough case.
    pub fn is_no_match(&self) -> bool {
        matches!(self, InstallError::NoMatch)
    }
}
