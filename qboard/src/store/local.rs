use async_trait::async_trait;
use chrono::Utc;
use log::{debug, info, warn};
use std::sync::{Mutex, MutexGuard};

use super::slot::KeyValueSlot;
use super::QuestionStore;
use crate::error::{BoardError, BoardResult};
use crate::models::{Answer, Question, QuestionId};
use crate::validation::{NewAnswer, NewQuestion};

pub const STORAGE_KEY: &str = "questions";

/// In-memory question collection mirrored to a key-value slot after every mutation.
///
/// The in-memory list is the source of truth; the slot is rewritten wholesale
/// and a mutation only becomes visible once that write succeeded.
pub struct LocalStore<K: KeyValueSlot> {
    slot: K,
    questions: Mutex<Vec<Question>>,
}

pub fn encode(questions: &[Question]) -> BoardResult<String> {
    Ok(serde_json::to_string(questions)?)
}

pub fn decode(text: &str) -> BoardResult<Vec<Question>> {
    serde_json::from_str(text).map_err(|e| BoardError::Deserialization(e.to_string()))
}

impl<K: KeyValueSlot> LocalStore<K> {
    /// Load the stored collection. An absent slot or unreadable JSON both
    /// start from an empty board.
    pub fn open(slot: K) -> BoardResult<Self> {
        let stored = slot.read(STORAGE_KEY).map_err(BoardError::Persistence)?;

        let questions = match stored {
            Some(text) => match decode(&text) {
                Ok(questions) => questions,
                Err(e) => {
                    warn!("{}, starting with an empty board", e);
                    Vec::new()
                }
            },
            None => Vec::new(),
        };

        info!("loaded {} questions from local storage", questions.len());

        Ok(Self {
            slot,
            questions: Mutex::new(questions),
        })
    }

    fn lock(&self) -> BoardResult<MutexGuard<'_, Vec<Question>>> {
        self.questions
            .lock()
            .map_err(|_| BoardError::Persistence(anyhow::anyhow!("local store lock poisoned")))
    }

    fn commit(&self, current: &mut Vec<Question>, next: Vec<Question>) -> BoardResult<()> {
        let text = encode(&next)?;
        self.slot
            .write(STORAGE_KEY, &text)
            .map_err(BoardError::Persistence)?;
        debug!("wrote {} questions to local storage", next.len());
        *current = next;
        Ok(())
    }
}

fn next_stamp(questions: &[Question], now: i64) -> i64 {
    let latest = questions
        .iter()
        .filter_map(|q| match q.id {
            QuestionId::Stamp(stamp) => Some(stamp),
            QuestionId::Key(_) => None,
        })
        .max();

    match latest {
        Some(latest) if latest >= now => latest + 1,
        _ => now,
    }
}

#[async_trait]
impl<K: KeyValueSlot> QuestionStore for LocalStore<K> {
    async fn insert(&self, question: NewQuestion) -> BoardResult<Question> {
        let mut current = self.lock()?;
        let now = Utc::now();

        let question = Question {
            id: QuestionId::Stamp(next_stamp(&current, now.timestamp_millis())),
            title: question.title().to_string(),
            content: question.content().to_string(),
            detail: question.detail().to_string(),
            date: now,
            answers: Vec::new(),
            views: Some(0),
        };

        let mut next = Vec::with_capacity(current.len() + 1);
        next.push(question.clone());
        next.extend(current.iter().cloned());
        self.commit(&mut current, next)?;

        Ok(question)
    }

    async fn get(&self, id: &QuestionId) -> BoardResult<Option<Question>> {
        let current = self.lock()?;
        Ok(current.iter().find(|q| &q.id == id).cloned())
    }

    async fn append_answer(&self, id: &QuestionId, answer: NewAnswer) -> BoardResult<Question> {
        let mut current = self.lock()?;
        let index = current
            .iter()
            .position(|q| &q.id == id)
            .ok_or_else(|| BoardError::NotFound(id.clone()))?;

        let mut next = current.clone();
        next[index].answers.push(Answer {
            content: answer.content().to_string(),
            date: Utc::now(),
        });
        let updated = next[index].clone();
        self.commit(&mut current, next)?;

        Ok(updated)
    }

    async fn list(&self) -> BoardResult<Vec<Question>> {
        Ok(self.lock()?.clone())
    }

    async fn record_views(&self, ids: &[QuestionId]) -> BoardResult<()> {
        if ids.is_empty() {
            return Ok(());
        }

        let mut current = self.lock()?;
        let mut next = current.clone();
        for question in next.iter_mut().filter(|q| ids.contains(&q.id)) {
            question.views = Some(question.views.unwrap_or(0) + 1);
        }
        self.commit(&mut current, next)
    }
}
