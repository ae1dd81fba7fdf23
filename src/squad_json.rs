//! Hierarchical JSON codec. Text is stored raw, never ASCII-escaped.

use crate::error::{ConvertError, Result};
use crate::model::Dataset;
use std::io::{Read, Write};

/// Parse a whole dataset; any malformation is fatal for the run.
pub fn read_dataset<R: Read>(input: R) -> Result<Dataset> {
    let dataset: Dataset = serde_json::from_reader(input).map_err(ConvertError::Json)?;
    tracing::debug!(documents = dataset.data.len(), qnas = dataset.qna_count(), "json read");
    Ok(dataset)
}

/// Write `dataset` followed by a newline; `pretty` indents with two spaces.
pub fn write_dataset<W: Write>(mut output: W, dataset: &Dataset, pretty: bool) -> Result<()> {
    if pretty {
        serde_json::to_writer_pretty(&mut output, dataset).map_err(ConvertError::Json)?;
    } else {
        serde_json::to_writer(&mut output, dataset).map_err(ConvertError::Json)?;
    }
    output
        .write_all(b"\n")
        .and_then(|_| output.flush())
        .map_err(|e| ConvertError::io("<json output>", e))
}
