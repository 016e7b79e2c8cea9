use clap::ValueEnum;
use std::{cmp::Ordering, fmt};

use crate::models::Question;

#[derive(Debug, Clone, Copy, Default, Eq, PartialEq, ValueEnum)]
pub enum SortKey {
    /// Most recently asked first.
    #[default]
    Newest,
    /// Oldest question first.
    Oldest,
    /// Questions with the most answers first.
    #[value(alias = "mostAnswers")]
    MostAnswers,
}

impl SortKey {
    pub const ALL: [SortKey; 3] = [SortKey::Newest, SortKey::Oldest, SortKey::MostAnswers];

    pub fn as_str(&self) -> &'static str {
        match self {
            SortKey::Newest => "newest",
            SortKey::Oldest => "oldest",
            SortKey::MostAnswers => "most-answers",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            SortKey::Newest => "Newest",
            SortKey::Oldest => "Oldest",
            SortKey::MostAnswers => "Most answers",
        }
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Questions whose title, content or detail contain `term`, ignoring case.
/// A blank term matches everything.
pub fn search<'a>(questions: &'a [Question], term: &str) -> Vec<&'a Question> {
    let term = term.trim().to_lowercase();
    if term.is_empty() {
        return questions.iter().collect();
    }

    questions
        .iter()
        .filter(|q| {
            [&q.title, &q.content, &q.detail]
                .iter()
                .any(|field| field.to_lowercase().contains(&term))
        })
        .collect()
}

fn created_order(a: &Question, b: &Question) -> Ordering {
    a.date.cmp(&b.date).then_with(|| a.id.cmp(&b.id))
}

/// A sorted copy of `questions`. The input order is left untouched.
/// Creation order is the date, then the id for questions created in the
/// same instant; answer-count ties keep their relative order.
pub fn sort<Q>(questions: &[Q], key: SortKey) -> Vec<Q>
where
    Q: AsRef<Question> + Clone,
{
    let mut sorted = questions.to_vec();
    match key {
        SortKey::Newest => sorted.sort_by(|a, b| created_order(b.as_ref(), a.as_ref())),
        SortKey::Oldest => sorted.sort_by(|a, b| created_order(a.as_ref(), b.as_ref())),
        SortKey::MostAnswers => sorted.sort_by(|a, b| {
            b.as_ref()
                .answer_count()
                .cmp(&a.as_ref().answer_count())
        }),
    }
    sorted
}

impl AsRef<Question> for Question {
    fn as_ref(&self) -> &Question {
        self
    }
}
