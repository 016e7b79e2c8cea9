use log::{error, info};

use crate::api::telemetry::{Event, Telemetry};
use crate::error::{Action, BoardError, BoardResult};
use crate::models::{Question, QuestionId};
use crate::render::{render_page, PageOptions};
use crate::store::QuestionStore;
use crate::validation::{AnswerForm, QuestionForm};
use crate::view::{search, sort};

pub struct RenderedBoard {
    pub page: String,
    /// Set when the page was rendered but its views could not be counted.
    pub views_error: Option<BoardError>,
}

/// The board's user actions, written once against the persistence port.
///
/// Every action runs validate, then read or mutate, then persist. Failures are
/// logged and reported to telemetry before they reach the caller, and the
/// submitted form keeps its input.
pub struct Board<S: QuestionStore, T: Telemetry> {
    store: S,
    telemetry: T,
}

impl<S: QuestionStore, T: Telemetry> Board<S, T> {
    pub fn new(store: S, telemetry: T) -> Self {
        Self { store, telemetry }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    fn report(&self, action: Action, err: BoardError) -> BoardError {
        if !err.is_validation() {
            error!("{:?} failed: {}", action, err);
            self.telemetry.record(Event::Error {
                error_type: action.error_type(),
            });
        }
        err
    }

    pub async fn submit_question(&self, form: &mut QuestionForm) -> BoardResult<Question> {
        let draft = form
            .validate()
            .map_err(|e| self.report(Action::SubmitQuestion, e))?;

        let question = self
            .store
            .insert(draft)
            .await
            .map_err(|e| self.report(Action::SubmitQuestion, e))?;

        info!("question {} submitted", question.id);
        self.telemetry.record(Event::QuestionSubmitted);
        form.clear();

        Ok(question)
    }

    pub async fn submit_answer(
        &self,
        id: &QuestionId,
        form: &mut AnswerForm,
    ) -> BoardResult<Question> {
        let draft = form
            .validate()
            .map_err(|e| self.report(Action::SubmitAnswer, e))?;

        let question = self
            .store
            .append_answer(id, draft)
            .await
            .map_err(|e| self.report(Action::SubmitAnswer, e))?;

        info!(
            "answer submitted to question {} ({} answers)",
            id,
            question.answer_count()
        );
        self.telemetry.record(Event::AnswerSubmitted);
        form.clear();

        Ok(question)
    }

    pub async fn load(&self) -> BoardResult<Vec<Question>> {
        let questions = self
            .store
            .list()
            .await
            .map_err(|e| self.report(Action::LoadQuestions, e))?;

        self.telemetry.record(Event::QuestionsLoaded {
            count: questions.len(),
        });

        Ok(questions)
    }

    /// Load the collection and render it with the requested search and sort.
    ///
    /// Showing the whole, unfiltered board counts as one view of every question
    /// on it. Views are counted after rendering, so the page shows the count
    /// from before this view. A failed view-count write does not discard the page.
    pub async fn render_board(&self, options: &PageOptions) -> BoardResult<RenderedBoard> {
        let questions = self.load().await?;

        let found = search(&questions, options.search.as_deref().unwrap_or(""));
        let shown = match options.sort {
            Some(key) => sort(&found, key),
            None => found,
        };
        let page = render_page(&shown, options);

        let mut views_error = None;
        if options.is_unfiltered() {
            let ids: Vec<QuestionId> = questions.iter().map(|q| q.id.clone()).collect();
            if let Err(e) = self.store.record_views(&ids).await {
                views_error = Some(self.report(Action::RecordViews, e));
            }
        }

        Ok(RenderedBoard { page, views_error })
    }
}
