//! Nested dataset -> flat rows.

use crate::model::{Dataset, FlatRecord, NO_ANSWER_START};

/// One row per effective answer, in stored order. A QnA with no effective
/// answers still yields one row, with an empty answer and `NO_ANSWER_START`.
pub fn flatten(dataset: &Dataset) -> Vec<FlatRecord> {
    let mut rows = Vec::with_capacity(dataset.qna_count());
    for doc in &dataset.data {
        for paragraph in &doc.paragraphs {
            for qna in &paragraph.qas {
                let base = FlatRecord {
                    title: doc.title.clone(),
                    context: paragraph.context.clone(),
                    question: qna.question.clone(),
                    answer: String::new(),
                    answer_start: NO_ANSWER_START,
                    is_impossible: qna.is_impossible,
                    id: Some(qna.id.clone()),
                };
                let answers = qna.effective_answers();
                if answers.is_empty() {
                    rows.push(base);
                    continue;
                }
                for answer in answers {
                    rows.push(FlatRecord {
                        answer: answer.text.clone(),
                        answer_start: answer.answer_start,
                        ..base.clone()
                    });
                }
            }
        }
    }
    tracing::debug!(rows = rows.len(), "dataset flattened");
    rows
}
