pub mod local;
pub mod remote;
pub mod slot;

use async_trait::async_trait;

use crate::error::BoardResult;
use crate::models::{Question, QuestionId};
use crate::validation::{NewAnswer, NewQuestion};

/// Persistence port the board is written against.
#[async_trait]
pub trait QuestionStore: Send + Sync {
    /// Store a new question with a fresh id, no answers and the current time.
    async fn insert(&self, question: NewQuestion) -> BoardResult<Question>;

    async fn get(&self, id: &QuestionId) -> BoardResult<Option<Question>>;

    /// Append an answer to an existing question. Fails with `NotFound` when
    /// the id is unknown, without creating anything.
    async fn append_answer(&self, id: &QuestionId, answer: NewAnswer) -> BoardResult<Question>;

    /// The full collection, newest first.
    async fn list(&self) -> BoardResult<Vec<Question>>;

    /// Count one more view for each of `ids`. Stores without view counters ignore it.
    async fn record_views(&self, _ids: &[QuestionId]) -> BoardResult<()> {
        Ok(())
    }
}
