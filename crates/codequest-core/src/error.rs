//! Trainer error types.
//!
//! Most persistence failures travel as `anyhow::Error` with file context.
//! The variants here are the ones a caller has to tell apart: a broken
//! catalogue is fatal, a bad selection just means asking again.

use thiserror::Error;

use crate::model::Topic;

/// Errors that callers classify instead of just reporting.
#[derive(Debug, Error)]
pub enum TrainerError {
    /// The catalogue has no question at all for a declared topic.
    #[error("question catalogue has no question for topic {0}")]
    MissingTopic(Topic),

    /// Two questions in the catalogue share an id.
    #[error("duplicate question id: {0}")]
    DuplicateQuestion(String),

    /// A question id is empty or holds a comma or line break.
    #[error("question id {0:?} cannot be stored in the ledger")]
    InvalidQuestionId(String),

    /// No student with this id exists in the roster.
    #[error("unknown student: {0}")]
    UnknownStudent(String),

    /// The text does not name one of the known topics.
    #[error("unknown topic: {0}")]
    UnknownTopic(String),

    /// A ledger row could not be decoded.
    #[error("malformed attempt on line {line}: {reason}")]
    MalformedAttempt { line: usize, reason: String },
}

impl TrainerError {
    /// Returns `true` if the error came from user input and the caller
    /// should re-prompt without touching any state.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            TrainerError::UnknownStudent(_) | TrainerError::UnknownTopic(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn selection_errors_are_recoverable() {
        assert!(TrainerError::UnknownStudent("S404".into()).is_recoverable());
        assert!(TrainerError::UnknownTopic("Recursion".into()).is_recoverable());
        assert!(!TrainerError::MissingTopic(Topic::Loops).is_recoverable());
        assert!(!TrainerError::InvalidQuestionId(String::new()).is_recoverable());
        assert!(!TrainerError::MalformedAttempt {
            line: 3,
            reason: "bad".into()
        }
        .is_recoverable());
    }

    #[test]
    fn messages_name_the_offender() {
        let err = TrainerError::MissingTopic(Topic::Functions);
        assert_eq!(
            err.to_string(),
            "question catalogue has no question for topic Functions"
        );
        assert_eq!(
            TrainerError::InvalidQuestionId("V,1".into()).to_string(),
            "question id \"V,1\" cannot be stored in the ledger"
        );
    }
}
