//! HTML rendering of the board.
//!
//! Every piece of user-supplied text passes through [`escape_html`] here, for
//! both stores. Nothing else in the crate produces markup.

use chrono::{DateTime, Local, Utc};

use crate::models::{Answer, Question};
use crate::view::SortKey;

/// Page-level controls and the view that was applied to the listed questions.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageOptions {
    /// Show the search box and sort selector.
    pub controls: bool,
    pub search: Option<String>,
    pub sort: Option<SortKey>,
}

impl PageOptions {
    /// True when the page shows the stored collection as is.
    pub fn is_unfiltered(&self) -> bool {
        self.sort.is_none() && self.search.as_deref().is_none_or(|s| s.trim().is_empty())
    }
}

pub fn escape_html(unsafe_text: &str) -> String {
    let mut escaped = String::with_capacity(unsafe_text.len());
    for c in unsafe_text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#039;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

fn format_date(date: &DateTime<Utc>) -> String {
    date.with_timezone(&Local)
        .format("%Y-%m-%d %H:%M:%S")
        .to_string()
}

fn render_answer(answer: &Answer) -> String {
    format!(
        r#"      <div class="answer">
        <div class="answer-content">{content}</div>
        <div class="answer-meta">Posted: {date}</div>
      </div>
"#,
        content = escape_html(&answer.content),
        date = format_date(&answer.date),
    )
}

pub fn render_card(question: &Question) -> String {
    let id = escape_html(&question.id.to_string());
    let views = question
        .views
        .map(|views| format!("\n      <span>Views: {views}</span>"))
        .unwrap_or_default();
    let answers: String = question.answers.iter().map(render_answer).collect();

    format!(
        r#"  <div class="question-card" data-question-id="{id}">
    <div class="question-title">{title}</div>
    <div class="question-meta">
      <span>Posted: {date}</span>{views}
      <span>Answers: {answer_count}</span>
    </div>
    <div class="question-content">{content}</div>
    <div class="question-detail">{detail}</div>
    <div class="answers-list">
{answers}    </div>
    <form class="answer-form" data-question-id="{id}">
      <textarea id="answer-{id}" name="answer" class="answer-input" placeholder="Write your answer"></textarea>
      <button type="submit" class="answer-btn">Post answer</button>
    </form>
  </div>
"#,
        id = id,
        title = escape_html(&question.title),
        date = format_date(&question.date),
        views = views,
        answer_count = question.answer_count(),
        content = escape_html(&question.content),
        detail = escape_html(&question.detail),
        answers = answers,
    )
}

fn render_controls(options: &PageOptions) -> String {
    let search = escape_html(options.search.as_deref().unwrap_or(""));
    let selected = options.sort.unwrap_or_default();
    let sort_options: String = SortKey::ALL
        .iter()
        .map(|key| {
            format!(
                r#"      <option value="{value}"{selected}>{label}</option>
"#,
                value = key.as_str(),
                selected = if *key == selected { " selected" } else { "" },
                label = key.label(),
            )
        })
        .collect();

    format!(
        r#"<div class="controls">
  <input id="searchInput" type="search" placeholder="Search questions" value="{search}">
  <select id="sortSelect">
{sort_options}  </select>
</div>
"#
    )
}

pub fn render_page(questions: &[&Question], options: &PageOptions) -> String {
    let controls = if options.controls {
        render_controls(options)
    } else {
        String::new()
    };
    let cards: String = questions.iter().map(|q| render_card(q)).collect();

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<title>Q&amp;A Board</title>
</head>
<body>
<form class="question-form">
  <input id="questionTitle" name="title" placeholder="Title">
  <textarea id="questionContent" name="content" placeholder="Question"></textarea>
  <textarea id="questionDetail" name="detail" placeholder="Details"></textarea>
  <button type="submit">Ask</button>
</form>
{controls}<div id="questionsContainer">
{cards}</div>
</body>
</html>
"#
    )
}
