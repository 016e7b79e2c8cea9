use std::{fs, future::Future, path::PathBuf, time::Duration};

use anyhow::{Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use log::{info, warn};
use owo_colors::OwoColorize;

use crate::api::collection::HttpCollection;
use crate::api::telemetry::{HttpTelemetry, NoopTelemetry, Telemetry};
use crate::board::Board;
use crate::cli::{Args, Backend, Commands};
use crate::error::{Action, BoardError};
use crate::models::QuestionId;
use crate::render::PageOptions;
use crate::settings::{self, merge_settings_with_args};
use crate::store::local::LocalStore;
use crate::store::remote::RemoteStore;
use crate::store::slot::FileSlot;
use crate::store::QuestionStore;
use crate::validation::{AnswerForm, QuestionForm};

pub const DEFAULT_COLLECTION: &str = "questions";

/// How results reach the user.
struct Surface {
    backend: Backend,
    output: Option<PathBuf>,
    controls: bool,
    spinner: bool,
}

/// Interpret a question id typed by the user for `backend`.
pub fn question_id(backend: Backend, raw: &str) -> QuestionId {
    match backend {
        Backend::Local => QuestionId::local(raw),
        Backend::Remote => QuestionId::remote(raw),
    }
}

pub async fn run(args: Args) -> Result<()> {
    let args = merge_settings_with_args(&args)?;

    match args.backend.unwrap_or_default() {
        Backend::Local => {
            let store_dir = args
                .store_dir
                .clone()
                .unwrap_or_else(settings::default_store_dir);
            info!("using local store in {}", store_dir.display());

            let store = LocalStore::open(FileSlot::new(store_dir))
                .map_err(|e| alert(Action::LoadQuestions, e))?;
            let board = Board::new(store, NoopTelemetry);
            let surface = Surface {
                backend: Backend::Local,
                output: args.output.clone(),
                controls: true,
                spinner: false,
            };
            execute(&board, args.command, &surface).await
        }
        Backend::Remote => {
            let remote_url = args
                .remote_url
                .clone()
                .context("a remote URL is required for the remote backend (--remote-url)")?;
            let collection_name = args
                .collection
                .clone()
                .unwrap_or_else(|| DEFAULT_COLLECTION.to_string());
            info!("using remote collection {} at {}", collection_name, remote_url);

            let collection =
                HttpCollection::new(remote_url, args.remote_token.clone(), collection_name)?;
            let telemetry: Box<dyn Telemetry> = match args.telemetry_url.clone() {
                Some(endpoint) => Box::new(HttpTelemetry::new(endpoint)?),
                None => Box::new(NoopTelemetry),
            };
            let board = Board::new(RemoteStore::new(collection), telemetry);
            let surface = Surface {
                backend: Backend::Remote,
                output: args.output.clone(),
                controls: false,
                spinner: true,
            };
            execute(&board, args.command, &surface).await
        }
    }
}

async fn execute<S: QuestionStore, T: Telemetry>(
    board: &Board<S, T>,
    command: Commands,
    surface: &Surface,
) -> Result<()> {
    let page_options = PageOptions {
        controls: surface.controls,
        ..PageOptions::default()
    };

    match command {
        Commands::Ask {
            title,
            content,
            detail,
        } => {
            let mut form = QuestionForm::new(title, content, detail);
            let question = waiting(surface, "Saving question...", board.submit_question(&mut form))
                .await
                .map_err(|e| alert(Action::SubmitQuestion, e))?;

            println!(
                "{} Question {} posted",
                "✓".bright_green(),
                question.id.to_string().bright_cyan()
            );
            refresh(board, &page_options, surface, false).await
        }
        Commands::Answer { id, text } => {
            let id = question_id(surface.backend, &id);
            let mut form = AnswerForm::new(text);
            let question = waiting(surface, "Saving answer...", board.submit_answer(&id, &mut form))
                .await
                .map_err(|e| alert(Action::SubmitAnswer, e))?;

            println!(
                "{} Answer posted to {} ({} answers)",
                "✓".bright_green(),
                question.title.bright_cyan(),
                question.answer_count()
            );
            refresh(board, &page_options, surface, false).await
        }
        Commands::List { search, sort } => {
            let options = PageOptions {
                search,
                sort,
                ..page_options
            };
            refresh(board, &options, surface, true).await
        }
    }
}

/// Reload the board and render it again.
async fn refresh<S: QuestionStore, T: Telemetry>(
    board: &Board<S, T>,
    options: &PageOptions,
    surface: &Surface,
    print_page: bool,
) -> Result<()> {
    let rendered = waiting(surface, "Loading questions...", board.render_board(options))
        .await
        .map_err(|e| alert(Action::LoadQuestions, e))?;

    if let Some(err) = &rendered.views_error {
        notify(Action::RecordViews, err);
    }

    let page = rendered.page;
    match &surface.output {
        Some(path) => {
            fs::write(path, &page)
                .with_context(|| format!("cannot write board to {}", path.display()))?;
            println!("{} Board written to {}", "✓".bright_green(), path.display());
        }
        None if print_page => print!("{page}"),
        None => {}
    }

    Ok(())
}

fn notify(action: Action, err: &BoardError) {
    if err.is_validation() {
        warn!("{:?} rejected: {}", action, err);
    }
    eprintln!("{} {}", "✗".bright_red(), err.alert_message(action));
}

/// Show the user-facing alert for a failed action and hand the error on.
fn alert(action: Action, err: BoardError) -> anyhow::Error {
    notify(action, &err);
    err.into()
}

async fn waiting<F: Future>(surface: &Surface, message: &'static str, fut: F) -> F::Output {
    if !surface.spinner {
        return fut.await;
    }

    let spinner = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::default_spinner().template("{spinner} {msg}") {
        spinner.set_style(style);
    }
    spinner.set_message(message);
    spinner.enable_steady_tick(Duration::from_millis(100));

    let output = fut.await;
    spinner.finish_and_clear();
    output
}
