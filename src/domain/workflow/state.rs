//! Workflow state machine

use std::fmt;
use thiserror::Error;

use crate::domain::upload::SelectedFile;

use super::failure::SubmissionError;
use super::submission::SubmissionResult;

/// Workflow stages
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum WorkflowStage {
    #[default]
    Idle,
    FileReady,
    Submitting,
    Completed,
    Failed,
}

impl WorkflowStage {
    /// Get the string representation
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::FileReady => "file_ready",
            Self::Submitting => "submitting",
            Self::Completed => "completed",
            Self::Failed => "failed",
        }
    }
}

impl fmt::Display for WorkflowStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Error when an invalid state transition is attempted
#[derive(Debug, Clone, Error)]
#[error("Invalid state transition: cannot {action} while in {current_state} state")]
pub struct InvalidStateTransition {
    pub current_state: WorkflowStage,
    pub action: String,
}

/// Workflow state: the stage plus whatever data that stage carries.
///
/// The shape makes the data invariants structural: there is no file in
/// `Idle`, a result only in `Completed`, an error only in `Failed`.
///
/// State machine:
///   IDLE | FILE_READY | COMPLETED | FAILED -> FILE_READY (select_file)
///   FILE_READY | COMPLETED | FAILED -> SUBMITTING (begin_submission)
///   SUBMITTING -> COMPLETED (complete)
///   SUBMITTING -> FAILED (fail)
///   any but SUBMITTING -> IDLE (clear)
///
/// Transitions are crate-private; only the workflow engine drives them.
#[derive(Debug, Clone, Default)]
pub enum WorkflowState {
    #[default]
    Idle,
    FileReady {
        file: SelectedFile,
    },
    Submitting {
        file: SelectedFile,
    },
    Completed {
        file: SelectedFile,
        result: SubmissionResult,
    },
    Failed {
        file: SelectedFile,
        error: SubmissionError,
    },
}

impl WorkflowState {
    /// Create a new workflow state in idle stage
    pub fn new() -> Self {
        Self::Idle
    }

    /// Get the current stage
    pub fn stage(&self) -> WorkflowStage {
        match self {
            Self::Idle => WorkflowStage::Idle,
            Self::FileReady { .. } => WorkflowStage::FileReady,
            Self::Submitting { .. } => WorkflowStage::Submitting,
            Self::Completed { .. } => WorkflowStage::Completed,
            Self::Failed { .. } => WorkflowStage::Failed,
        }
    }

    /// The selected file, absent only in idle
    pub fn file(&self) -> Option<&SelectedFile> {
        match self {
            Self::Idle => None,
            Self::FileReady { file }
            | Self::Submitting { file }
            | Self::Completed { file, .. }
            | Self::Failed { file, .. } => Some(file),
        }
    }

    /// The last result, present only when completed
    pub fn result(&self) -> Option<&SubmissionResult> {
        match self {
            Self::Completed { result, .. } => Some(result),
            _ => None,
        }
    }

    /// The last error classification, present only when failed
    pub fn error(&self) -> Option<&SubmissionError> {
        match self {
            Self::Failed { error, .. } => Some(error),
            _ => None,
        }
    }

    pub fn is_submitting(&self) -> bool {
        matches!(self, Self::Submitting { .. })
    }

    /// Store a newly accepted file, discarding any prior result or error
    pub(crate) fn select_file(&mut self, file: SelectedFile) -> Result<(), InvalidStateTransition> {
        if self.is_submitting() {
            return Err(self.invalid("select a file"));
        }
        *self = Self::FileReady { file };
        Ok(())
    }

    /// Move to submitting, dropping the previous result or error.
    /// Returns the file being submitted.
    pub(crate) fn begin_submission(&mut self) -> Result<SelectedFile, InvalidStateTransition> {
        match std::mem::take(self) {
            Self::FileReady { file } | Self::Completed { file, .. } | Self::Failed { file, .. } => {
                *self = Self::Submitting { file: file.clone() };
                Ok(file)
            }
            other => {
                let err = other.invalid("submit");
                *self = other;
                Err(err)
            }
        }
    }

    /// Record a successful submission
    pub(crate) fn complete(&mut self, result: SubmissionResult) -> Result<(), InvalidStateTransition> {
        match std::mem::take(self) {
            Self::Submitting { file } => {
                *self = Self::Completed { file, result };
                Ok(())
            }
            other => {
                let err = other.invalid("complete a submission");
                *self = other;
                Err(err)
            }
        }
    }

    /// Record a failed submission
    pub(crate) fn fail(&mut self, error: SubmissionError) -> Result<(), InvalidStateTransition> {
        match std::mem::take(self) {
            Self::Submitting { file } => {
                *self = Self::Failed { file, error };
                Ok(())
            }
            other => {
                let err = other.invalid("fail a submission");
                *self = other;
                Err(err)
            }
        }
    }

    /// Return to idle, discarding file, result and error
    pub(crate) fn clear(&mut self) -> Result<(), InvalidStateTransition> {
        if self.is_submitting() {
            return Err(self.invalid("clear the selection"));
        }
        *self = Self::Idle;
        Ok(())
    }

    fn invalid(&self, action: &str) -> InvalidStateTransition {
        InvalidStateTransition {
            current_state: self.stage(),
            action: action.to_string(),
        }
    }
}
