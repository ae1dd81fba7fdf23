//! Flat CSV codec.
//!
//! Header: `context,question,answer,answer_start,is_impossible[,id,title]`.
//! Unknown columns (e.g. `answer_check`, `frag_text`) are ignored. Rows are
//! validated into [`FlatRecord`] here; a row whose non-empty answer carries an
//! unparseable `answer_start` is rejected and reported, not fatal.

use crate::config::ConvertOptions;
use crate::error::{ConvertError, Result};
use crate::model::{FlatRecord, NO_ANSWER_START};
use crate::normalize::{from_safe_text, to_safe_text};
use serde::Deserialize;
use std::io::{Read, Write};

const REQUIRED_COLUMNS: [&str; 2] = ["context", "question"];

#[derive(Debug, Deserialize)]
struct CsvRow {
    context: String,
    question: String,
    #[serde(default)]
    answer: String,
    #[serde(default)]
    answer_start: String,
    #[serde(default)]
    is_impossible: String,
    #[serde(default)]
    id: Option<String>,
    #[serde(default)]
    title: Option<String>,
}

/// A row that could not be turned into a record.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RejectedRow {
    /// 1-based data row number (the header is row 0).
    pub row: usize,
    pub reason: String,
}

/// Records read from one CSV input, plus the rows that were rejected.
#[derive(Clone, Debug, Default)]
pub struct FlatBatch {
    pub records: Vec<FlatRecord>,
    pub rejected: Vec<RejectedRow>,
}

/// Parse an `answer_start` cell: optional sign, `0x`/`0o`/`0b` prefix or decimal,
/// within the 32-bit signed range.
pub fn parse_offset(raw: &str) -> Option<i32> {
    let s = raw.trim();
    let (negative, body) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };
    let (radix, digits) = if let Some(rest) = body.strip_prefix("0x").or_else(|| body.strip_prefix("0X")) {
        (16, rest)
    } else if let Some(rest) = body.strip_prefix("0o").or_else(|| body.strip_prefix("0O")) {
        (8, rest)
    } else if let Some(rest) = body.strip_prefix("0b").or_else(|| body.strip_prefix("0B")) {
        (2, rest)
    } else {
        (10, body)
    };
    if digits.is_empty() || !digits.chars().all(|c| c.is_digit(radix)) {
        return None;
    }
    let magnitude = i64::from_str_radix(digits, radix).ok()?;
    i32::try_from(if negative { -magnitude } else { magnitude }).ok()
}

fn decode(opts: &ConvertOptions, s: String) -> String {
    if !opts.ascii_escapes || !s.contains('\\') {
        return s;
    }
    from_safe_text(&s).into_owned()
}

fn encode(opts: &ConvertOptions, s: &str) -> String {
    if opts.ascii_escapes { to_safe_text(s) } else { s.to_string() }
}

fn into_record(row: CsvRow, opts: &ConvertOptions) -> std::result::Result<FlatRecord, String> {
    let answer = decode(opts, row.answer);
    let answer_start = if answer.is_empty() {
        parse_offset(&row.answer_start).map_or(NO_ANSWER_START, i64::from)
    } else {
        match parse_offset(&row.answer_start) {
            Some(v) => i64::from(v),
            None => return Err(format!("malformed answer_start {:?}", row.answer_start)),
        }
    };
    Ok(FlatRecord {
        title: row.title.map(|t| decode(opts, t)).unwrap_or_default(),
        context: decode(opts, row.context),
        question: decode(opts, row.question),
        answer,
        answer_start,
        is_impossible: row.is_impossible.trim() == "true",
        id: row.id.map(|id| decode(opts, id)),
    })
}

/// Read every row of a CSV input. Structural CSV problems (missing required
/// columns, ragged rows, bad quoting) are fatal.
pub fn read_flat_records<R: Read>(input: R, opts: &ConvertOptions) -> Result<FlatBatch> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::Headers)
        .from_reader(input);

    let headers = rdr.headers()?.clone();
    for required in REQUIRED_COLUMNS {
        if !headers.iter().any(|h| h == required) {
            return Err(ConvertError::parse(format!("csv header is missing the `{required}` column")));
        }
    }

    let mut batch = FlatBatch::default();
    for (idx, row) in rdr.deserialize::<CsvRow>().enumerate() {
        let row = row?;
        match into_record(row, opts) {
            Ok(record) => batch.records.push(record),
            Err(reason) => {
                tracing::warn!(row = idx + 1, %reason, "skipping row");
                batch.rejected.push(RejectedRow { row: idx + 1, reason });
            }
        }
    }
    tracing::debug!(records = batch.records.len(), rejected = batch.rejected.len(), "csv read");
    Ok(batch)
}

/// Write records with the configured optional columns.
pub fn write_flat_records<W: Write>(output: W, records: &[FlatRecord], opts: &ConvertOptions) -> Result<usize> {
    let mut w = csv::WriterBuilder::new().has_headers(false).from_writer(output);

    let mut header = vec!["context", "question", "answer", "answer_start", "is_impossible"];
    if opts.csv_columns.id {
        header.push("id");
    }
    if opts.csv_columns.title {
        header.push("title");
    }
    w.write_record(&header)?;

    for r in records {
        let mut fields = vec![
            encode(opts, &r.context),
            encode(opts, &r.question),
            encode(opts, &r.answer),
            r.answer_start.to_string(),
            r.is_impossible.to_string(),
        ];
        if opts.csv_columns.id {
            fields.push(encode(opts, r.id.as_deref().unwrap_or("")));
        }
        if opts.csv_columns.title {
            fields.push(encode(opts, &r.title));
        }
        w.write_record(&fields)?;
    }
    w.flush().map_err(|e| ConvertError::io("<csv output>", e))?;
    Ok(records.len())
}
