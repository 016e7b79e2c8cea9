use crate::error::{BoardError, BoardResult};

/// Question input that passed validation. Fields are trimmed and non-empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewQuestion {
    title: String,
    content: String,
    detail: String,
}

impl NewQuestion {
    pub fn parse(title: &str, content: &str, detail: &str) -> BoardResult<Self> {
        let (title, content, detail) = (title.trim(), content.trim(), detail.trim());

        let missing: Vec<&str> = [("title", title), ("content", content), ("detail", detail)]
            .into_iter()
            .filter(|(_, value)| value.is_empty())
            .map(|(name, _)| name)
            .collect();

        if !missing.is_empty() {
            return Err(BoardError::Validation(format!(
                "Please fill in all fields (missing: {}).",
                missing.join(", ")
            )));
        }

        Ok(Self {
            title: title.to_string(),
            content: content.to_string(),
            detail: detail.to_string(),
        })
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn detail(&self) -> &str {
        &self.detail
    }
}

/// Answer text that passed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewAnswer {
    content: String,
}

impl NewAnswer {
    pub fn parse(content: &str) -> BoardResult<Self> {
        let content = content.trim();
        if content.is_empty() {
            return Err(BoardError::Validation(
                "Please enter the answer content.".to_string(),
            ));
        }

        Ok(Self {
            content: content.to_string(),
        })
    }

    pub fn content(&self) -> &str {
        &self.content
    }
}

/// Raw input of the question form. Cleared only after a successful submit.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QuestionForm {
    pub title: String,
    pub content: String,
    pub detail: String,
}

impl QuestionForm {
    pub fn new(title: impl Into<String>, content: impl Into<String>, detail: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            content: content.into(),
            detail: detail.into(),
        }
    }

    pub fn validate(&self) -> BoardResult<NewQuestion> {
        NewQuestion::parse(&self.title, &self.content, &self.detail)
    }

    pub fn clear(&mut self) {
        self.title.clear();
        self.content.clear();
        self.detail.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.title.is_empty() && self.content.is_empty() && self.detail.is_empty()
    }
}

/// Raw input of one question's answer box.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AnswerForm {
    pub content: String,
}

impl AnswerForm {
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
        }
    }

    pub fn validate(&self) -> BoardResult<NewAnswer> {
        NewAnswer::parse(&self.content)
    }

    pub fn clear(&mut self) {
        self.content.clear();
    }
}
