use crate::builder::{BuildReport, HierarchyBuilder};
use crate::config::{ConvertOptions, CsvColumns, IdPolicy, QuestionOrder};
use crate::fileio::{open_input, write_atomic};
use crate::flat_csv::{read_flat_records, write_flat_records, FlatBatch};
use crate::flatten::flatten;
use crate::model::Dataset;
use crate::progress::ProgressScope;
use crate::squad_json::{read_dataset, write_dataset};
use crate::util::init_tracing_once;
use anyhow::{Context, Result};
use std::path::Path;

/// Conversion direction.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Direction {
    /// CSV -> JSON
    Forward,
    /// JSON -> CSV
    Reverse,
}

impl Direction {
    pub fn default_output(self) -> &'static str {
        match self {
            Direction::Forward => "out.json",
            Direction::Reverse => "out.csv",
        }
    }
}

/// Summary of one run.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ConversionReport {
    pub rows_read: usize,
    /// Rows rejected at the CSV boundary (malformed `answer_start`).
    pub skipped_bad_offset: usize,
    /// Rows dropped by the builder (blank context or question).
    pub skipped_blank_key: usize,
    /// Flat rows written (reverse direction only).
    pub rows_written: usize,
    pub documents: usize,
    pub paragraphs: usize,
    pub qnas: usize,
}

impl ConversionReport {
    pub fn skipped_rows(&self) -> usize {
        self.skipped_bad_offset + self.skipped_blank_key
    }

    fn from_build(batch: &FlatBatch, build: &BuildReport) -> Self {
        Self {
            rows_read: batch.records.len() + batch.rejected.len(),
            skipped_bad_offset: batch.rejected.len(),
            skipped_blank_key: build.skipped_blank_key,
            rows_written: 0,
            documents: build.documents,
            paragraphs: build.paragraphs,
            qnas: build.qnas,
        }
    }
}

#[derive(Clone, Default)]
pub struct SquadConverter {
    pub(crate) opts: ConvertOptions,
}

impl SquadConverter {
    pub fn new() -> Self {
        Self { opts: ConvertOptions::default() }
    }

    pub fn with_options(opts: ConvertOptions) -> Self {
        Self { opts }
    }

    pub fn options(&self) -> &ConvertOptions {
        &self.opts
    }

    // -------- Builder methods --------
    pub fn title(mut self, title: impl Into<String>) -> Self { self.opts = self.opts.with_title(title); self }
    pub fn id_policy(mut self, policy: IdPolicy) -> Self { self.opts = self.opts.with_id_policy(policy); self }
    pub fn question_order(mut self, order: QuestionOrder) -> Self { self.opts = self.opts.with_question_order(order); self }
    pub fn ascii_escapes(mut self, yes: bool) -> Self { self.opts = self.opts.with_ascii_escapes(yes); self }
    pub fn csv_columns(mut self, columns: CsvColumns) -> Self { self.opts = self.opts.with_csv_columns(columns); self }
    pub fn version(mut self, version: impl Into<String>) -> Self { self.opts = self.opts.with_version(version); self }
    pub fn pretty(mut self, yes: bool) -> Self { self.opts = self.opts.with_pretty(yes); self }
    pub fn progress(mut self, yes: bool) -> Self { self.opts = self.opts.with_progress(yes); self }
    pub fn io_buffers(mut self, read_bytes: usize, write_bytes: usize) -> Self { self.opts = self.opts.with_io_buffers(read_bytes, write_bytes); self }

    // -------- In-memory operations --------

    /// Build a dataset from already-read CSV rows.
    pub fn build(&self, batch: &FlatBatch) -> Result<(Dataset, ConversionReport)> {
        let pb = ProgressScope::count(self.opts.progress, "Build tree", batch.records.len() as u64);
        let (dataset, build) = HierarchyBuilder::new(&self.opts)
            .build_with_progress(&batch.records, &pb)
            .context("building dataset")?;
        pb.finish("tree built");
        Ok((dataset, ConversionReport::from_build(batch, &build)))
    }

    // -------- File operations --------

    /// Run in `direction` from `input` to `output`.
    pub fn convert(&self, direction: Direction, input: &Path, output: &Path) -> Result<ConversionReport> {
        match direction {
            Direction::Forward => self.csv_to_json(input, output),
            Direction::Reverse => self.json_to_csv(input, output),
        }
    }

    /// CSV rows -> nested JSON dataset.
    pub fn csv_to_json(&self, input: &Path, output: &Path) -> Result<ConversionReport> {
        init_tracing_once();
        let reader = open_input(input, self.opts.read_buffer_bytes)?;
        let batch = read_flat_records(reader, &self.opts)
            .with_context(|| format!("reading {}", input.display()))?;

        let (dataset, report) = self.build(&batch)?;

        write_atomic(output, self.opts.write_buffer_bytes, |w| write_dataset(w, &dataset, self.opts.pretty))
            .with_context(|| format!("writing {}", output.display()))?;

        if report.skipped_rows() > 0 {
            tracing::warn!(
                skipped = report.skipped_rows(),
                bad_offset = report.skipped_bad_offset,
                blank_key = report.skipped_blank_key,
                "some rows were skipped"
            );
        }
        tracing::info!(
            rows = report.rows_read,
            documents = report.documents,
            paragraphs = report.paragraphs,
            qnas = report.qnas,
            "wrote {}",
            output.display()
        );
        Ok(report)
    }

    /// Nested JSON dataset -> CSV rows.
    pub fn json_to_csv(&self, input: &Path, output: &Path) -> Result<ConversionReport> {
        init_tracing_once();
        let reader = open_input(input, self.opts.read_buffer_bytes)?;
        let dataset = read_dataset(reader).with_context(|| format!("reading {}", input.display()))?;

        let rows = flatten(&dataset);
        let mut written = 0;
        write_atomic(output, self.opts.write_buffer_bytes, |w| {
            written = write_flat_records(w, &rows, &self.opts)?;
            Ok(())
        })
        .with_context(|| format!("writing {}", output.display()))?;

        let report = ConversionReport {
            rows_written: written,
            documents: dataset.data.len(),
            paragraphs: dataset.paragraph_count(),
            qnas: dataset.qna_count(),
            ..Default::default()
        };
        tracing::info!(rows = report.rows_written, qnas = report.qnas, "wrote {}", output.display());
        Ok(report)
    }
}
