use thiserror::Error;

use crate::models::QuestionId;

#[derive(Error, Debug)]
pub enum BoardError {
    #[error("{0}")]
    Validation(String),

    #[error("question {0} not found")]
    NotFound(QuestionId),

    #[error("storage failure: {0:#}")]
    Persistence(anyhow::Error),

    #[error("stored questions are unreadable: {0}")]
    Deserialization(String),
}

pub type BoardResult<T> = Result<T, BoardError>;

/// User-initiated operations on the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    SubmitQuestion,
    SubmitAnswer,
    LoadQuestions,
    RecordViews,
}

impl Action {
    /// Generic alert shown when the action fails for reasons other than input.
    pub fn failure_message(&self) -> &'static str {
        match self {
            Action::SubmitQuestion => "An error occurred while saving the question.",
            Action::SubmitAnswer => "An error occurred while saving the answer.",
            Action::LoadQuestions => "An error occurred while loading questions.",
            Action::RecordViews => "An error occurred while saving view counts.",
        }
    }

    pub fn error_type(&self) -> &'static str {
        match self {
            Action::SubmitQuestion => "question_submission_error",
            Action::SubmitAnswer => "answer_submission_error",
            Action::LoadQuestions => "questions_load_error",
            Action::RecordViews => "view_count_error",
        }
    }
}

impl BoardError {
    pub fn is_validation(&self) -> bool {
        matches!(self, BoardError::Validation(_))
    }

    /// Text for the user-facing alert raised by `action`.
    pub fn alert_message(&self, action: Action) -> String {
        match self {
            BoardError::Validation(message) => message.clone(),
            BoardError::NotFound(_) => "The question could not be found.".to_string(),
            BoardError::Persistence(_) | BoardError::Deserialization(_) => {
                action.failure_message().to_string()
            }
        }
    }
}

impl From<serde_json::Error> for BoardError {
    fn from(err: serde_json::Error) -> Self {
        BoardError::Persistence(err.into())
    }
}
