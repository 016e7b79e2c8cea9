use log::debug;
use reqwest::Client;
use serde::Serialize;
use serde_json::json;
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    QuestionSubmitted,
    AnswerSubmitted,
    QuestionsLoaded { count: usize },
    Error { error_type: &'static str },
}

#[derive(Debug, Serialize)]
struct EventPayload {
    name: &'static str,
    params: serde_json::Value,
}

impl Event {
    pub fn name(&self) -> &'static str {
        match self {
            Event::QuestionSubmitted => "question_submitted",
            Event::AnswerSubmitted => "answer_submitted",
            Event::QuestionsLoaded { .. } => "questions_loaded",
            Event::Error { .. } => "error",
        }
    }

    fn params(&self) -> serde_json::Value {
        match self {
            Event::QuestionSubmitted | Event::AnswerSubmitted => json!({}),
            Event::QuestionsLoaded { count } => json!({ "count": count }),
            Event::Error { error_type } => json!({ "error_type": error_type }),
        }
    }
}

/// Best-effort event sink. Recording never fails and never blocks.
pub trait Telemetry: Send + Sync {
    fn record(&self, event: Event);
}

impl<T: Telemetry + ?Sized> Telemetry for Box<T> {
    fn record(&self, event: Event) {
        (**self).record(event)
    }
}

pub struct NoopTelemetry;

impl Telemetry for NoopTelemetry {
    fn record(&self, _event: Event) {}
}

pub struct HttpTelemetry {
    client: Client,
    endpoint: String,
}

impl HttpTelemetry {
    pub fn new(endpoint: String) -> anyhow::Result<Self> {
        let client = Client::builder().timeout(Duration::from_secs(5)).build()?;
        Ok(Self { client, endpoint })
    }
}

impl Telemetry for HttpTelemetry {
    fn record(&self, event: Event) {
        let payload = EventPayload {
            name: event.name(),
            params: event.params(),
        };
        let request = self.client.post(&self.endpoint).json(&payload);

        // Fire and forget; requires a running tokio runtime.
        if let Ok(handle) = tokio::runtime::Handle::try_current() {
            handle.spawn(async move {
                if let Err(e) = request.send().await {
                    debug!("telemetry event {} dropped: {}", payload.name, e);
                }
            });
        } else {
            debug!("no runtime, telemetry event {} dropped", payload.name);
        }
    }
}
