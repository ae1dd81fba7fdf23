//! Flat and hierarchical record types.
//!
//! The hierarchical types mirror the SQuAD v2 layout and (de)serialize with serde
//! straight to the JSON shape; field declaration order is the canonical order used
//! by the content hasher, so do not reorder fields casually.

use serde::{Deserialize, Serialize};

/// Offset written for a row that carries no answer.
pub const NO_ANSWER_START: i64 = -1;

/// Default `version` field of an emitted dataset.
pub const DATASET_VERSION: &str = "v2.0";

/// One context/question/answer triple, validated at the CSV boundary.
/// Row order is the position in the containing `Vec`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FlatRecord {
    pub title: String,
    pub context: String,
    pub question: String,
    pub answer: String,
    pub answer_start: i64,
    pub is_impossible: bool,
    pub id: Option<String>,
}

impl FlatRecord {
    /// Convenience constructor for a row without title or id.
    pub fn new(
        context: impl Into<String>,
        question: impl Into<String>,
        answer: impl Into<String>,
        answer_start: i64,
        is_impossible: bool,
    ) -> Self {
        Self {
            title: String::new(),
            context: context.into(),
            question: question.into(),
            answer: answer.into(),
            answer_start,
            is_impossible,
            id: None,
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Supplied id, if present and not blank.
    pub fn supplied_id(&self) -> Option<&str> {
        self.id.as_deref().filter(|s| !s.trim().is_empty())
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Answer {
    pub text: String,
    pub answer_start: i64,
}

/// Answers collected for one (context, question, impossibility) key.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct AnswerGroup {
    pub answers: Vec<Answer>,
    pub is_impossible: bool,
    pub id: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct QnA {
    pub id: String,
    pub question: String,
    #[serde(default)]
    pub answers: Vec<Answer>,
    /// Present (possibly empty) exactly when `is_impossible` is true.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub plausible_answers: Option<Vec<Answer>>,
    #[serde(default)]
    pub is_impossible: bool,
}

impl QnA {
    /// The answers a flattener should emit: plausible ones for impossible questions.
    pub fn effective_answers(&self) -> &[Answer] {
        if self.is_impossible {
            self.plausible_answers.as_deref().unwrap_or(&[])
        } else {
            &self.answers
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Paragraph {
    pub context: String,
    pub qas: Vec<QnA>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    pub title: String,
    pub paragraphs: Vec<Paragraph>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dataset {
    pub version: String,
    pub data: Vec<Document>,
}

impl Dataset {
    pub fn qna_count(&self) -> usize {
        self.data
            .iter()
            .flat_map(|d| d.paragraphs.iter())
            .map(|p| p.qas.len())
            .sum()
    }

    pub fn paragraph_count(&self) -> usize {
        self.data.iter().map(|d| d.paragraphs.len()).sum()
    }
}
