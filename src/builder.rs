//! Flat rows -> nested dataset, as a fixed sequence of grouping passes.
//!
//!   1. row            -> Answer          (interned by content id)
//!   2. answer ids     -> AnswerGroup     (group by title, context, question, impossibility[, id])
//!   3. AnswerGroup    -> QnA
//!   4. QnA ids        -> context group   (group by title, context)
//!   5. context group  -> Paragraph
//!   6. paragraph ids  -> Document        (group by title)
//!
//! Each pass consumes the full output of the previous one. Values live in
//! per-run tables owned by the builder and are referenced by `Slot`; identical
//! values intern to one entry. Group order is first-seen input order throughout.

use crate::config::{ConvertOptions, IdPolicy, QuestionOrder};
use crate::error::Result;
use crate::grouping::{aggregate, group_by, reduce};
use crate::hasher::{content_id, ContentId};
use crate::model::{Answer, AnswerGroup, Dataset, Document, FlatRecord, Paragraph, QnA};
use crate::progress::ProgressScope;
use ahash::AHashMap;
use serde::Serialize;

/// Counters for one build.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct BuildReport {
    pub rows_in: usize,
    /// Rows dropped because context or question was blank.
    pub skipped_blank_key: usize,
    /// Rows that produced an Answer.
    pub answers: usize,
    /// Distinct Answer values after deduplication.
    pub distinct_answers: usize,
    pub answer_groups: usize,
    pub qnas: usize,
    pub paragraphs: usize,
    pub documents: usize,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
struct Slot(usize);

/// Content-addressed table: the first value stored under an id wins.
struct Table<T> {
    index: AHashMap<ContentId, Slot>,
    items: Vec<T>,
}

impl<T> Table<T> {
    fn new() -> Self {
        Self { index: AHashMap::new(), items: Vec::new() }
    }

    fn intern(&mut self, id: ContentId, value: T) -> Slot {
        let items = &mut self.items;
        *self.index.entry(id).or_insert_with(|| {
            items.push(value);
            Slot(items.len() - 1)
        })
    }

    fn get(&self, slot: Slot) -> &T {
        &self.items[slot.0]
    }

    fn len(&self) -> usize {
        self.items.len()
    }
}

/// Lookup tables for one conversion run.
struct Arena {
    answers: Table<Answer>,
    groups: Table<AnswerGroup>,
    qnas: Table<QnA>,
    paragraphs: Table<Paragraph>,
}

impl Arena {
    fn new() -> Self {
        Self { answers: Table::new(), groups: Table::new(), qnas: Table::new(), paragraphs: Table::new() }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
struct QuestionKey<'a> {
    title: &'a str,
    context: &'a str,
    question: &'a str,
    is_impossible: bool,
    id: Option<&'a str>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
struct ParagraphKey<'a> {
    title: &'a str,
    context: &'a str,
}

struct AnswerRow<'a> {
    title: &'a str,
    row: &'a FlatRecord,
    answer: Option<Slot>,
}

struct GroupedQuestion<'a> {
    key: QuestionKey<'a>,
    group: Slot,
}

struct QnaRef<'a> {
    key: ParagraphKey<'a>,
    qna: Slot,
}

struct ContextGroup<'a> {
    key: ParagraphKey<'a>,
    qnas: Vec<Slot>,
}

struct ParagraphRef<'a> {
    title: &'a str,
    paragraph: Slot,
}

/// What an AnswerGroup's fallback id is computed from. Also its table key, so
/// it has to cover every field of `QuestionKey`.
#[derive(Serialize)]
struct GroupIdentity<'a> {
    title: &'a str,
    context: &'a str,
    question: &'a str,
    answers: &'a [Answer],
    is_impossible: bool,
    id: Option<&'a str>,
}

/// Turns one batch of flat records into a [`Dataset`]. Single use.
pub struct HierarchyBuilder<'a> {
    opts: &'a ConvertOptions,
    arena: Arena,
    report: BuildReport,
}

impl<'a> HierarchyBuilder<'a> {
    pub fn new(opts: &'a ConvertOptions) -> Self {
        Self { opts, arena: Arena::new(), report: BuildReport::default() }
    }

    pub fn build(self, records: &'a [FlatRecord]) -> Result<(Dataset, BuildReport)> {
        self.build_with_progress(records, &ProgressScope::disabled())
    }

    pub fn build_with_progress(mut self, records: &'a [FlatRecord], pb: &ProgressScope) -> Result<(Dataset, BuildReport)> {
        self.report.rows_in = records.len();

        let answer_rows = self.register_answers(records, pb)?;
        let grouped = self.group_answers(answer_rows)?;
        let qnas = self.build_qnas(grouped)?;
        let contexts = self.group_by_context(qnas);
        let paragraphs = self.build_paragraphs(contexts)?;
        let data = self.build_documents(paragraphs);

        self.report.distinct_answers = self.arena.answers.len();
        self.report.answer_groups = self.arena.groups.len();
        self.report.qnas = data.iter().flat_map(|d| &d.paragraphs).map(|p| p.qas.len()).sum();
        self.report.paragraphs = data.iter().map(|d| d.paragraphs.len()).sum();
        self.report.documents = data.len();

        let dataset = Dataset { version: self.opts.version.clone(), data };
        Ok((dataset, self.report))
    }

    /// Pass 1. Rows with a blank key are dropped and counted; rows with an
    /// empty answer still take part in grouping but contribute no Answer.
    fn register_answers(&mut self, records: &'a [FlatRecord], pb: &ProgressScope) -> Result<Vec<AnswerRow<'a>>> {
        let opts: &'a ConvertOptions = self.opts;
        let mut out = Vec::with_capacity(records.len());
        for (idx, row) in records.iter().enumerate() {
            pb.inc_items(1);
            if row.context.trim().is_empty() || row.question.trim().is_empty() {
                self.report.skipped_blank_key += 1;
                tracing::warn!(row = idx + 1, "skipping row with blank context or question");
                continue;
            }
            let answer = if row.answer.is_empty() {
                None
            } else {
                let value = Answer { text: row.answer.clone(), answer_start: row.answer_start };
                let id = content_id(&value)?;
                self.report.answers += 1;
                Some(self.arena.answers.intern(id, value))
            };
            out.push(AnswerRow { title: opts.resolve_title(&row.title), row, answer });
        }
        tracing::debug!(rows = out.len(), answers = self.report.answers, "pass 1: answers registered");
        Ok(out)
    }

    /// Pass 2.
    fn group_answers(&mut self, rows: Vec<AnswerRow<'a>>) -> Result<Vec<GroupedQuestion<'a>>> {
        let keep_supplied = self.opts.id_policy == IdPolicy::PreferSupplied;
        let by_question = group_by(rows, |r| {
            let row: &'a FlatRecord = r.row;
            QuestionKey {
                title: r.title,
                context: &row.context,
                question: &row.question,
                is_impossible: row.is_impossible,
                id: if keep_supplied { row.supplied_id() } else { None },
            }
        });

        let arena = &mut self.arena;
        let grouped = aggregate(&by_question, |key, members| -> Result<GroupedQuestion<'a>> {
            let answer_slots = reduce::concat_distinct(members.iter().map(|m| m.answer));
            let answers: Vec<Answer> = answer_slots.iter().map(|s| arena.answers.get(*s).clone()).collect();

            let hash = content_id(&GroupIdentity {
                title: key.title,
                context: key.context,
                question: key.question,
                answers: &answers,
                is_impossible: key.is_impossible,
                id: key.id,
            })?;
            let id = match key.id {
                Some(supplied) => supplied.to_string(),
                None => hash.to_string(),
            };
            let group = arena.groups.intern(hash, AnswerGroup { answers, is_impossible: key.is_impossible, id });
            Ok(GroupedQuestion { key: key.clone(), group })
        })?;
        tracing::debug!(groups = grouped.len(), "pass 2: answer groups built");
        Ok(grouped)
    }

    /// Pass 3. Impossible questions keep only non-blank answers, as plausible ones.
    fn build_qnas(&mut self, grouped: Vec<GroupedQuestion<'a>>) -> Result<Vec<QnaRef<'a>>> {
        let mut out = Vec::with_capacity(grouped.len());
        for g in grouped {
            let group = self.arena.groups.get(g.group);
            let mut qna = if group.is_impossible {
                let plausible = group.answers.iter().filter(|a| !a.text.trim().is_empty()).cloned().collect();
                QnA {
                    id: String::new(),
                    question: g.key.question.to_string(),
                    answers: Vec::new(),
                    plausible_answers: Some(plausible),
                    is_impossible: true,
                }
            } else {
                QnA {
                    id: String::new(),
                    question: g.key.question.to_string(),
                    answers: group.answers.clone(),
                    plausible_answers: None,
                    is_impossible: false,
                }
            };
            qna.id = match self.opts.id_policy {
                IdPolicy::PreferSupplied => group.id.clone(),
                IdPolicy::ContentHash => content_id(&(g.key.title, g.key.context, &qna))?.into_string(),
            };

            let stored = content_id(&(g.key.title, g.key.context, &qna))?;
            let slot = self.arena.qnas.intern(stored, qna);
            out.push(QnaRef { key: ParagraphKey { title: g.key.title, context: g.key.context }, qna: slot });
        }
        tracing::debug!(qnas = out.len(), "pass 3: qnas built");
        Ok(out)
    }

    /// Pass 4.
    fn group_by_context(&self, qnas: Vec<QnaRef<'a>>) -> Vec<ContextGroup<'a>> {
        let by_context = group_by(qnas, |q| q.key);
        let arena = &self.arena;
        let order = self.opts.question_order;
        let contexts: Vec<ContextGroup<'a>> = by_context
            .iter()
            .map(|(key, members)| {
                let mut slots = reduce::concat_distinct(members.iter().map(|m| Some(m.qna)));
                if order == QuestionOrder::Alphabetical {
                    // stable: equal questions keep first-seen order
                    slots.sort_by(|a, b| arena.qnas.get(*a).question.cmp(&arena.qnas.get(*b).question));
                }
                ContextGroup { key: *key, qnas: slots }
            })
            .collect();
        tracing::debug!(contexts = contexts.len(), "pass 4: qnas grouped by context");
        contexts
    }

    /// Pass 5.
    fn build_paragraphs(&mut self, contexts: Vec<ContextGroup<'a>>) -> Result<Vec<ParagraphRef<'a>>> {
        let mut out = Vec::with_capacity(contexts.len());
        for c in contexts {
            let qas = c.qnas.iter().map(|s| self.arena.qnas.get(*s).clone()).collect();
            let paragraph = Paragraph { context: c.key.context.to_string(), qas };
            let id = content_id(&(c.key.title, &paragraph))?;
            let slot = self.arena.paragraphs.intern(id, paragraph);
            out.push(ParagraphRef { title: c.key.title, paragraph: slot });
        }
        tracing::debug!(paragraphs = out.len(), "pass 5: paragraphs built");
        Ok(out)
    }

    /// Pass 6.
    fn build_documents(&self, paragraphs: Vec<ParagraphRef<'a>>) -> Vec<Document> {
        let by_title = group_by(paragraphs, |p| p.title);
        let arena = &self.arena;
        let documents: Vec<Document> = by_title
            .iter()
            .map(|(title, members)| {
                let slots = reduce::concat_distinct(members.iter().map(|m| Some(m.paragraph)));
                Document {
                    title: title.to_string(),
                    paragraphs: slots.iter().map(|s| arena.paragraphs.get(*s).clone()).collect(),
                }
            })
            .collect();
        tracing::debug!(documents = documents.len(), "pass 6: documents built");
        documents
    }
}

/// Build a dataset with a fresh builder.
pub fn build_dataset(records: &[FlatRecord], opts: &ConvertOptions) -> Result<(Dataset, BuildReport)> {
    HierarchyBuilder::new(opts).build(records)
}
