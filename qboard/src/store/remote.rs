use async_trait::async_trait;
use chrono::{DateTime, Utc};
use log::{debug, warn};
use serde::{Deserialize, Serialize};

use super::QuestionStore;
use crate::api::collection::DocumentCollection;
use crate::error::{BoardError, BoardResult};
use crate::models::document::{Direction, Document};
use crate::models::{Answer, Question, QuestionId};
use crate::validation::{NewAnswer, NewQuestion};

const DATE_FIELD: &str = "date";
const ANSWERS_FIELD: &str = "answers";

/// Question fields as they are kept inside a remote document.
#[derive(Debug, Serialize, Deserialize)]
struct QuestionFields {
    title: String,
    content: String,
    detail: String,
    #[serde(default)]
    answers: Vec<Answer>,
    date: DateTime<Utc>,
}

impl QuestionFields {
    fn into_question(self, id: String) -> Question {
        Question {
            id: QuestionId::Key(id),
            title: self.title,
            content: self.content,
            detail: self.detail,
            date: self.date,
            answers: self.answers,
            views: None,
        }
    }
}

fn question_from(document: Document) -> BoardResult<Question> {
    let fields: QuestionFields = serde_json::from_value(document.fields).map_err(|e| {
        BoardError::Deserialization(format!("document {}: {}", document.id, e))
    })?;
    Ok(fields.into_question(document.id))
}

/// Questions kept in a remote document collection. Every call is one round trip.
pub struct RemoteStore<C: DocumentCollection> {
    collection: C,
}

impl<C: DocumentCollection> RemoteStore<C> {
    pub fn new(collection: C) -> Self {
        Self { collection }
    }
}

#[async_trait]
impl<C: DocumentCollection> QuestionStore for RemoteStore<C> {
    async fn insert(&self, question: NewQuestion) -> BoardResult<Question> {
        let fields = QuestionFields {
            title: question.title().to_string(),
            content: question.content().to_string(),
            detail: question.detail().to_string(),
            answers: Vec::new(),
            date: Utc::now(),
        };

        let value = serde_json::to_value(&fields)?;
        let id = self
            .collection
            .insert(&value)
            .await
            .map_err(BoardError::Persistence)?;
        debug!("inserted question document {}", id);

        Ok(fields.into_question(id))
    }

    async fn get(&self, id: &QuestionId) -> BoardResult<Option<Question>> {
        let document = self
            .collection
            .get(&id.to_string())
            .await
            .map_err(BoardError::Persistence)?;

        document.map(question_from).transpose()
    }

    // Read-modify-write of the answers field. Concurrent appends to the same
    // question can overwrite each other; the last write wins.
    async fn append_answer(&self, id: &QuestionId, answer: NewAnswer) -> BoardResult<Question> {
        let mut question = self
            .get(id)
            .await?
            .ok_or_else(|| BoardError::NotFound(id.clone()))?;

        question.answers.push(Answer {
            content: answer.content().to_string(),
            date: Utc::now(),
        });

        let answers = serde_json::to_value(&question.answers)?;
        self.collection
            .update_field(&id.to_string(), ANSWERS_FIELD, &answers)
            .await
            .map_err(BoardError::Persistence)?;

        Ok(question)
    }

    async fn list(&self) -> BoardResult<Vec<Question>> {
        let documents = self
            .collection
            .query_ordered(DATE_FIELD, Direction::Descending)
            .await
            .map_err(BoardError::Persistence)?;

        let questions = documents
            .into_iter()
            .filter_map(|document| match question_from(document) {
                Ok(question) => Some(question),
                Err(e) => {
                    warn!("skipping unreadable question: {}", e);
                    None
                }
            })
            .collect();

        Ok(questions)
    }
}
