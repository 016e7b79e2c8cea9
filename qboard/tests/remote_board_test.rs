mod common;

use common::{FailingCollection, MemoryCollection, RecordingTelemetry};
use qboard::api::telemetry::Event;
use qboard::board::Board;
use qboard::cli::Backend;
use qboard::error::{Action, BoardError};
use qboard::models::document::Document;
use qboard::models::QuestionId;
use qboard::render::PageOptions;
use qboard::services::question_id;
use qboard::store::remote::RemoteStore;
use qboard::store::QuestionStore;
use qboard::validation::{AnswerForm, QuestionForm};
use serde_json::json;

fn seeded_document(id: &str, title: &str, date: &str) -> Document {
    Document {
        id: id.to_string(),
        fields: json!({
            "title": title,
            "content": "content",
            "detail": "detail",
            "answers": [],
            "date": date,
        }),
    }
}

fn remote_board(
    collection: MemoryCollection,
) -> (Board<RemoteStore<MemoryCollection>, RecordingTelemetry>, RecordingTelemetry) {
    let telemetry = RecordingTelemetry::default();
    (
        Board::new(RemoteStore::new(collection), telemetry.clone()),
        telemetry,
    )
}

#[tokio::test]
async fn test_submit_question_inserts_document() {
    let (board, telemetry) = remote_board(MemoryCollection::default());

    let mut form = QuestionForm::new(" title ", "content", "detail");
    let question = board.submit_question(&mut form).await.unwrap();

    assert_eq!(question.id, QuestionId::Key("doc-0".to_string()));
    assert_eq!(question.title, "title");
    assert!(question.answers.is_empty());
    assert_eq!(question.views, None);
    assert!(form.is_empty());
    assert_eq!(telemetry.events(), vec![Event::QuestionSubmitted]);

    let stored = board.store().get(&question.id).await.unwrap().unwrap();
    assert_eq!(stored, question);
}

#[tokio::test]
async fn test_list_is_newest_first() {
    let collection = MemoryCollection::with_documents(vec![
        seeded_document("a", "oldest", "2024-01-01T00:00:00Z"),
        seeded_document("c", "newest", "2024-03-01T00:00:00Z"),
        seeded_document("b", "middle", "2024-02-01T00:00:00Z"),
    ]);
    let (board, telemetry) = remote_board(collection);

    let titles: Vec<String> = board
        .load()
        .await
        .unwrap()
        .into_iter()
        .map(|q| q.title)
        .collect();

    assert_eq!(titles, vec!["newest", "middle", "oldest"]);
    assert_eq!(telemetry.events(), vec![Event::QuestionsLoaded { count: 3 }]);
}

#[tokio::test]
async fn test_answers_are_appended_to_the_document() {
    let (board, telemetry) = remote_board(MemoryCollection::with_documents(vec![
        seeded_document("q1", "title", "2024-01-01T00:00:00Z"),
    ]));
    let id = QuestionId::Key("q1".to_string());

    for text in ["first", "second", "third"] {
        board
            .submit_answer(&id, &mut AnswerForm::new(text))
            .await
            .unwrap();
    }

    let stored = board.store().get(&id).await.unwrap().unwrap();
    let contents: Vec<&str> = stored.answers.iter().map(|a| a.content.as_str()).collect();
    assert_eq!(contents, vec!["first", "second", "third"]);
    assert_eq!(telemetry.events().len(), 3);
}

#[tokio::test]
async fn test_answer_to_missing_document_is_not_found() {
    let collection = MemoryCollection::default();
    let (board, telemetry) = remote_board(collection);

    let mut answer = AnswerForm::new("hello");
    let err = board
        .submit_answer(&QuestionId::Key("missing".to_string()), &mut answer)
        .await
        .unwrap_err();

    assert!(matches!(err, BoardError::NotFound(_)));
    assert_eq!(answer.content, "hello");
    assert!(board.load().await.unwrap().is_empty());
    assert_eq!(
        telemetry.events()[0],
        Event::Error {
            error_type: Action::SubmitAnswer.error_type()
        }
    );
}

#[tokio::test]
async fn test_unreadable_documents_are_skipped() {
    let collection = MemoryCollection::with_documents(vec![
        seeded_document("good", "title", "2024-01-01T00:00:00Z"),
        Document {
            id: "bad".to_string(),
            fields: json!({ "title": 7 }),
        },
        Document {
            id: "legacy".to_string(),
            fields: json!({
                "title": "no answers field",
                "content": "c",
                "detail": "d",
                "date": "2023-01-01T00:00:00Z",
            }),
        },
    ]);
    let (board, _) = remote_board(collection);

    let questions = board.load().await.unwrap();

    assert_eq!(questions.len(), 2);
    assert!(questions.iter().all(|q| q.id != QuestionId::Key("bad".to_string())));
    assert!(questions[1].answers.is_empty());
}

#[tokio::test]
async fn test_storage_failure_keeps_input_and_reports() {
    let telemetry = RecordingTelemetry::default();
    let board = Board::new(RemoteStore::new(FailingCollection), telemetry.clone());

    let mut form = QuestionForm::new("title", "content", "detail");
    let err = board.submit_question(&mut form).await.unwrap_err();

    assert!(matches!(err, BoardError::Persistence(_)));
    assert_eq!(
        err.alert_message(Action::SubmitQuestion),
        "An error occurred while saving the question."
    );
    assert_eq!(form, QuestionForm::new("title", "content", "detail"));

    let err = board.load().await.unwrap_err();
    assert!(matches!(err, BoardError::Persistence(_)));

    assert_eq!(
        telemetry.events(),
        vec![
            Event::Error {
                error_type: "question_submission_error"
            },
            Event::Error {
                error_type: "questions_load_error"
            },
        ]
    );
}

#[tokio::test]
async fn test_remote_render_escapes_and_has_no_view_counter() {
    let (board, _) = remote_board(MemoryCollection::default());

    board
        .submit_question(&mut QuestionForm::new(
            "<script>steal()</script>",
            "a & b",
            "it's",
        ))
        .await
        .unwrap();

    let page = board.render_board(&PageOptions::default()).await.unwrap().page;

    assert!(!page.contains("<script>"));
    assert!(page.contains("&lt;script&gt;steal()&lt;/script&gt;"));
    assert!(page.contains("a &amp; b"));
    assert!(!page.contains("Views:"));
    assert!(page.contains(r#"id="answer-doc-0""#));
}

#[tokio::test]
async fn test_answer_reaches_key_with_leading_zeros() {
    let (board, _) = remote_board(MemoryCollection::with_documents(vec![
        seeded_document("007", "zero-padded key", "2024-01-01T00:00:00Z"),
        seeded_document("7", "other", "2024-01-02T00:00:00Z"),
    ]));
    let id = question_id(Backend::Remote, "007");

    let question = board
        .submit_answer(&id, &mut AnswerForm::new("found it"))
        .await
        .unwrap();

    assert_eq!(question.title, "zero-padded key");
    let other = board.store().get(&QuestionId::remote("7")).await.unwrap().unwrap();
    assert!(other.answers.is_empty());
}
