mod config;
mod error;
mod model;

mod hasher;
mod normalize;
mod grouping;
mod builder;
mod flatten;

mod flat_csv;
mod squad_json;
mod fileio;

mod progress;
mod util;
mod pipeline;

pub use crate::config::{ConvertOptions, CsvColumns, IdPolicy, QuestionOrder};
pub use crate::error::{ConvertError, Result};
pub use crate::model::{Answer, AnswerGroup, Dataset, Document, FlatRecord, Paragraph, QnA, DATASET_VERSION, NO_ANSWER_START};
pub use crate::pipeline::{ConversionReport, Direction, SquadConverter};

// Core transform: content ids, text escaping, grouping, build and flatten.
pub use crate::hasher::{content_id, ContentId};
pub use crate::normalize::{from_safe_text, to_safe_text};
pub use crate::grouping::{aggregate, group_by, reduce, OrderedGroups};
pub use crate::builder::{build_dataset, BuildReport, HierarchyBuilder};
pub use crate::flatten::flatten;

// Codecs over arbitrary readers/writers.
pub use crate::flat_csv::{parse_offset, read_flat_records, write_flat_records, FlatBatch, RejectedRow};
pub use crate::squad_json::{read_dataset, write_dataset};
pub use crate::fileio::{open_input, write_atomic};

pub use crate::progress::ProgressScope;
pub use crate::util::init_tracing_once;
