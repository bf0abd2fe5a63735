use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Number of answer options every question carries.
pub const QUIZ_OPTION_COUNT: usize = 4;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum QuizQuestionError {
    #[error("question text cannot be empty")]
    EmptyText,

    #[error("expected 4 options, got {len}")]
    OptionCount { len: usize },

    #[error("options cannot be empty")]
    EmptyOption,

    #[error("options must be distinct")]
    DuplicateOption,

    #[error("answer does not match any option")]
    AnswerNotInOptions,
}

/// A validated multiple-choice question.
///
/// Invariants: non-empty text, exactly four distinct non-empty options,
/// and an answer equal to one of them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QuizQuestion {
    text: String,
    options: [String; QUIZ_OPTION_COUNT],
    answer: String,
    explanation: String,
}

/// Unvalidated question, as received from the relay or written in a bank.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct QuizQuestionDraft {
    pub text: String,
    pub options: Vec<String>,
    pub answer: String,
    #[serde(default)]
    pub explanation: String,
}

impl QuizQuestionDraft {
    /// Validate the draft into a question.
    ///
    /// Surrounding whitespace is trimmed from every field before checks.
    ///
    /// # Errors
    ///
    /// Returns `QuizQuestionError` when any invariant does not hold.
    pub fn validate(self) -> Result<QuizQuestion, QuizQuestionError> {
        let text = self.text.trim().to_string();
        if text.is_empty() {
            return Err(QuizQuestionError::EmptyText);
        }

        let options: Vec<String> = self
            .options
            .into_iter()
            .map(|opt| opt.trim().to_string())
            .collect();
        if options.iter().any(String::is_empty) {
            return Err(QuizQuestionError::EmptyOption);
        }
        for (idx, opt) in options.iter().enumerate() {
            if options[..idx].contains(opt) {
                return Err(QuizQuestionError::DuplicateOption);
            }
        }
        let len = options.len();
        let options: [String; QUIZ_OPTION_COUNT] = options
            .try_into()
            .map_err(|_| QuizQuestionError::OptionCount { len })?;

        let answer = self.answer.trim().to_string();
        if !options.contains(&answer) {
            return Err(QuizQuestionError::AnswerNotInOptions);
        }

        Ok(QuizQuestion {
            text,
            options,
            answer,
            explanation: self.explanation.trim().to_string(),
        })
    }
}

impl QuizQuestion {
    /// Question text. Also used as the key for mastery credit, so two
    /// questions with identical text count as the same question.
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    #[must_use]
    pub fn options(&self) -> &[String] {
        &self.options
    }

    #[must_use]
    pub fn answer(&self) -> &str {
        &self.answer
    }

    #[must_use]
    pub fn explanation(&self) -> &str {
        &self.explanation
    }

    #[must_use]
    pub fn is_correct(&self, option: &str) -> bool {
        self.answer == option
    }

    #[must_use]
    pub fn has_option(&self, option: &str) -> bool {
        self.options.iter().any(|opt| opt == option)
    }
}
