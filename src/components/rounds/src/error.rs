use crate::RoundNumber;
use std::{error::Error as StdError, num::NonZero};
use thiserror::Error;

/// An unrecoverable failure inside of a step. Never retried.
#[derive(Error, Debug)]
#[error("{message}")]
pub struct StepError {
    message: String,
    #[source]
    source: Option<Box<dyn StdError + Send + Sync>>,
}

impl StepError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            source: None,
        }
    }

    pub fn with_source(
        message: impl Into<String>,
        source: impl Into<Box<dyn StdError + Send + Sync>>,
    ) -> Self {
        Self {
            message: message.into(),
            source: Some(source.into()),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

#[derive(Error, Debug)]
pub enum RunError {
    #[error("step '{step}' failed in round {round}: {source}")]
    StepFailed {
        step: String,
        round: RoundNumber,
        #[source]
        source: StepError,
    },

    #[error("{count} deferred element(s) were never processed")]
    Unresolved { count: usize },

    #[error("gave up after {limit} rounds")]
    RoundLimit { limit: NonZero<usize> },

    #[error("round driver has already terminated")]
    AlreadyTerminated,
}

impl RunError {
    /// The step failure this run ended with, if any.
    pub fn step_error(&self) -> Option<&StepError> {
        match self {
            RunError::StepFailed { source, .. } => Some(source),
            _ => None,
        }
    }
}
