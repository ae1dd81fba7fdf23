use crate::model::DATASET_VERSION;

/// Where QnA identifiers come from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum IdPolicy {
    /// A non-blank `id` column wins (and takes part in grouping); otherwise the
    /// answer group's content hash is passed through as the QnA id.
    #[default]
    PreferSupplied,
    /// The `id` column is ignored; the QnA id is the hash of the QnA content.
    ContentHash,
}

/// Order of QnAs inside a paragraph.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum QuestionOrder {
    /// Order in which each question first appeared in the input.
    #[default]
    FirstSeen,
    /// Stable sort on question text.
    Alphabetical,
}

/// Optional columns emitted when writing CSV.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CsvColumns {
    pub id: bool,
    pub title: bool,
}

impl Default for CsvColumns {
    fn default() -> Self {
        Self { id: true, title: true }
    }
}

/// Conversion options with defaults and builder chaining.
#[derive(Clone, Debug)]
pub struct ConvertOptions {
    pub title: Option<String>,        // used for rows without a title column value
    pub id_policy: IdPolicy,
    pub question_order: QuestionOrder,
    pub ascii_escapes: bool,          // decode on CSV read, escape on CSV write
    pub csv_columns: CsvColumns,
    pub version: String,
    pub pretty: bool,                 // two-space indented JSON
    pub progress: bool,

    // IO tuning
    pub read_buffer_bytes: usize,
    pub write_buffer_bytes: usize,
}

impl Default for ConvertOptions {
    fn default() -> Self {
        Self {
            title: None,
            id_policy: IdPolicy::default(),
            question_order: QuestionOrder::default(),
            ascii_escapes: true,
            csv_columns: CsvColumns::default(),
            version: DATASET_VERSION.to_string(),
            pretty: true,
            progress: false,

            read_buffer_bytes: 256 * 1024,
            write_buffer_bytes: 256 * 1024,
        }
    }
}

impl ConvertOptions {
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }
    pub fn with_id_policy(mut self, policy: IdPolicy) -> Self {
        self.id_policy = policy;
        self
    }
    pub fn with_question_order(mut self, order: QuestionOrder) -> Self {
        self.question_order = order;
        self
    }
    pub fn with_ascii_escapes(mut self, yes: bool) -> Self {
        self.ascii_escapes = yes;
        self
    }
    pub fn with_csv_columns(mut self, columns: CsvColumns) -> Self {
        self.csv_columns = columns;
        self
    }
    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = version.into();
        self
    }
    pub fn with_pretty(mut self, yes: bool) -> Self {
        self.pretty = yes;
        self
    }
    pub fn with_progress(mut self, yes: bool) -> Self {
        self.progress = yes;
        self
    }

    // IO buffers tuning
    pub fn with_io_buffers(mut self, read_bytes: usize, write_bytes: usize) -> Self {
        self.read_buffer_bytes = read_bytes.max(8 * 1024);
        self.write_buffer_bytes = write_bytes.max(8 * 1024);
        self
    }

    /// Title for a row: its own if non-blank, else the configured default, else "".
    pub fn resolve_title<'a>(&'a self, row_title: &'a str) -> &'a str {
        if !row_title.trim().is_empty() {
            row_title
        } else {
            self.title.as_deref().unwrap_or("")
        }
    }
}
