// assetguard-core/src/error.rs

use std::fmt;

use crate::domain::error::DomainError;
use crate::infrastructure::error::InfrastructureError;
use miette::Diagnostic;
use thiserror::Error;

/// The stage of a verification run, used to label failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunStage {
    Load,
    Check,
    Report,
    Export,
}

impl fmt::Display for RunStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            RunStage::Load => "load",
            RunStage::Check => "check",
            RunStage::Report => "report",
            RunStage::Export => "export",
        };
        f.write_str(label)
    }
}

#[derive(Error, Debug, Diagnostic)]
pub enum AssetGuardError {
    // --- DOMAIN ERRORS (registry, tables, source contract) ---
    #[error(transparent)]
    #[diagnostic(transparent)]
    Domain(#[from] DomainError),

    // --- INFRASTRUCTURE ERRORS (IO, parsing, database) ---
    #[error(transparent)]
    #[diagnostic(transparent)]
    Infrastructure(#[from] InfrastructureError),

    // A check failed for a reason other than missing input.
    #[error("Check '{check_id}' failed: {source}")]
    #[diagnostic(
        code(assetguard::check_fault),
        help("This is a fault in the check itself, not a data finding.")
    )]
    CheckFault {
        check_id: String,
        #[source]
        source: DomainError,
    },

    #[error("{stage} stage failed: {source}")]
    #[diagnostic(code(assetguard::stage))]
    Stage {
        stage: RunStage,
        #[source]
        source: Box<AssetGuardError>,
    },

    #[error("Internal Error: {0}")]
    InternalError(String),
}

impl AssetGuardError {
    /// Labels an error with the stage it happened in. Already-labelled errors keep their stage.
    pub fn at_stage(stage: RunStage, err: impl Into<AssetGuardError>) -> Self {
        match err.into() {
            labelled @ AssetGuardError::Stage { .. } => labelled,
            other => AssetGuardError::Stage {
                stage,
                source: Box::new(other),
            },
        }
    }

    pub fn stage(&self) -> Option<RunStage> {
        match self {
            AssetGuardError::Stage { stage, .. } => Some(*stage),
            _ => None,
        }
    }
}

// Manual implementation to avoid a duplicate enum variant but keep `?` ergonomics
impl From<std::io::Error> for AssetGuardError {
    fn from(err: std::io::Error) -> Self {
        AssetGuardError::Infrastructure(InfrastructureError::Io(err))
    }
}
