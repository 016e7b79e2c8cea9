#![allow(dead_code)]

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Arc, Mutex,
};

use qboard::api::collection::DocumentCollection;
use qboard::api::telemetry::{Event, Telemetry};
use qboard::error::BoardResult;
use qboard::models::document::{Direction, Document};
use qboard::models::{Question, QuestionId};
use qboard::store::slot::KeyValueSlot;
use qboard::store::QuestionStore;
use qboard::validation::{NewAnswer, NewQuestion};

/// Document collection kept in memory, handing out `doc-N` ids.
#[derive(Default)]
pub struct MemoryCollection {
    documents: Mutex<Vec<Document>>,
    next_id: AtomicUsize,
}

impl MemoryCollection {
    pub fn with_documents(documents: Vec<Document>) -> Self {
        Self {
            documents: Mutex::new(documents),
            next_id: AtomicUsize::new(0),
        }
    }

    pub fn documents(&self) -> Vec<Document> {
        self.documents.lock().unwrap().clone()
    }
}

#[async_trait]
impl DocumentCollection for MemoryCollection {
    async fn insert(&self, fields: &serde_json::Value) -> Result<String> {
        let id = format!("doc-{}", self.next_id.fetch_add(1, Ordering::SeqCst));
        self.documents.lock().unwrap().push(Document {
            id: id.clone(),
            fields: fields.clone(),
        });
        Ok(id)
    }

    async fn get(&self, id: &str) -> Result<Option<Document>> {
        Ok(self
            .documents
            .lock()
            .unwrap()
            .iter()
            .find(|d| d.id == id)
            .cloned())
    }

    async fn update_field(&self, id: &str, field: &str, value: &serde_json::Value) -> Result<()> {
        let mut documents = self.documents.lock().unwrap();
        let document = documents
            .iter_mut()
            .find(|d| d.id == id)
            .ok_or_else(|| anyhow!("no document {id}"))?;
        document.fields[field] = value.clone();
        Ok(())
    }

    async fn query_ordered(&self, field: &str, direction: Direction) -> Result<Vec<Document>> {
        let mut documents = self.documents.lock().unwrap().clone();
        documents.sort_by(|a, b| {
            let (a, b) = (sort_value(&a.fields[field]), sort_value(&b.fields[field]));
            match direction {
                Direction::Ascending => a.cmp(&b),
                Direction::Descending => b.cmp(&a),
            }
        });
        Ok(documents)
    }
}

fn sort_value(value: &serde_json::Value) -> Option<DateTime<Utc>> {
    value.as_str().and_then(|s| s.parse().ok())
}

/// A collection whose every call fails, like an unreachable server.
pub struct FailingCollection;

#[async_trait]
impl DocumentCollection for FailingCollection {
    async fn insert(&self, _fields: &serde_json::Value) -> Result<String> {
        Err(anyhow!("connection refused"))
    }

    async fn get(&self, _id: &str) -> Result<Option<Document>> {
        Err(anyhow!("connection refused"))
    }

    async fn update_field(&self, _id: &str, _field: &str, _value: &serde_json::Value) -> Result<()> {
        Err(anyhow!("connection refused"))
    }

    async fn query_ordered(&self, _field: &str, _direction: Direction) -> Result<Vec<Document>> {
        Err(anyhow!("connection refused"))
    }
}

/// Telemetry sink remembering every event, shareable with the test body.
#[derive(Clone, Default)]
pub struct RecordingTelemetry {
    events: Arc<Mutex<Vec<Event>>>,
}

impl RecordingTelemetry {
    pub fn events(&self) -> Vec<Event> {
        self.events.lock().unwrap().clone()
    }
}

impl Telemetry for RecordingTelemetry {
    fn record(&self, event: Event) {
        self.events.lock().unwrap().push(event);
    }
}

/// Wraps a store and counts every call that reaches it.
pub struct CountingStore<S> {
    inner: S,
    calls: Arc<AtomicUsize>,
}

impl<S> CountingStore<S> {
    pub fn new(inner: S) -> (Self, Arc<AtomicUsize>) {
        let calls = Arc::new(AtomicUsize::new(0));
        (
            Self {
                inner,
                calls: calls.clone(),
            },
            calls,
        )
    }

    fn hit(&self) {
        self.calls.fetch_add(1, Ordering::SeqCst);
    }
}

#[async_trait]
impl<S: QuestionStore> QuestionStore for CountingStore<S> {
    async fn insert(&self, question: NewQuestion) -> BoardResult<Question> {
        self.hit();
        self.inner.insert(question).await
    }

    async fn get(&self, id: &QuestionId) -> BoardResult<Option<Question>> {
        self.hit();
        self.inner.get(id).await
    }

    async fn append_answer(&self, id: &QuestionId, answer: NewAnswer) -> BoardResult<Question> {
        self.hit();
        self.inner.append_answer(id, answer).await
    }

    async fn list(&self) -> BoardResult<Vec<Question>> {
        self.hit();
        self.inner.list().await
    }

    async fn record_views(&self, ids: &[QuestionId]) -> BoardResult<()> {
        self.hit();
        self.inner.record_views(ids).await
    }
}

/// Slot that serves fixed content and refuses every write, like a read-only disk.
pub struct ReadOnlySlot {
    pub content: String,
}

impl KeyValueSlot for ReadOnlySlot {
    fn read(&self, _key: &str) -> Result<Option<String>> {
        Ok(Some(self.content.clone()))
    }

    fn write(&self, _key: &str, _value: &str) -> Result<()> {
        Err(anyhow!("read-only file system"))
    }
}
