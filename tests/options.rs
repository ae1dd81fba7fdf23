use squadconv::{
    build_dataset, flatten, read_flat_records, write_flat_records, ConvertOptions, CsvColumns, FlatRecord, IdPolicy,
    QuestionOrder, SquadConverter,
};

/// With `PreferSupplied`, a non-blank `id` column becomes the QnA id and rows
/// with different ids stay separate QnAs even for the same question text.
#[test]
fn prefer_supplied_uses_id_column() {
    let rows = vec![
        FlatRecord::new("ctx", "q?", "a", 0, false).with_id("q-001"),
        FlatRecord::new("ctx", "q?", "b", 2, false).with_id("q-001"),
        FlatRecord::new("ctx", "q?", "c", 4, false).with_id("q-002"),
    ];
    let opts = ConvertOptions::default().with_id_policy(IdPolicy::PreferSupplied);
    let (ds, _) = build_dataset(&rows, &opts).unwrap();
    let qas = &ds.data[0].paragraphs[0].qas;
    assert_eq!(qas.len(), 2);
    assert_eq!(qas[0].id, "q-001");
    assert_eq!(qas[0].answers.len(), 2);
    assert_eq!(qas[1].id, "q-002");
}

/// Rows that differ only in their supplied id stay two QnAs with their own ids,
/// and the report counts what the dataset holds.
#[test]
fn prefer_supplied_keeps_identical_rows_with_distinct_ids() {
    let rows = vec![
        FlatRecord::new("ctx", "q?", "a", 0, false).with_id("q-001"),
        FlatRecord::new("ctx", "q?", "a", 0, false).with_id("q-002"),
    ];
    let (ds, report) = build_dataset(&rows, &ConvertOptions::default()).unwrap();
    let ids: Vec<&str> = ds.data[0].paragraphs[0].qas.iter().map(|q| q.id.as_str()).collect();
    assert_eq!(ids, vec!["q-001", "q-002"]);
    assert_eq!(report.qnas, ds.qna_count());
    assert_eq!(report.answer_groups, 2);
    assert_eq!(flatten(&ds).len(), 2);
}

/// The same holds for unanswerable questions without candidates.
#[test]
fn prefer_supplied_keeps_empty_impossible_rows_with_distinct_ids() {
    let rows = vec![
        FlatRecord::new("ctx", "q?", "", -1, true).with_id("u-1"),
        FlatRecord::new("ctx", "q?", "", -1, true).with_id("u-2"),
        FlatRecord::new("ctx", "q?", "", -1, true).with_id("u-1"),
    ];
    let (ds, report) = build_dataset(&rows, &ConvertOptions::default()).unwrap();
    let ids: Vec<&str> = ds.data[0].paragraphs[0].qas.iter().map(|q| q.id.as_str()).collect();
    assert_eq!(ids, vec!["u-1", "u-2"]);
    assert_eq!(report.qnas, 2);
}

/// Blank ids fall back to a content hash.
#[test]
fn prefer_supplied_falls_back_to_hash_for_blank_ids() {
    let rows = vec![FlatRecord::new("ctx", "q?", "a", 0, false).with_id("   ")];
    let (ds, _) = build_dataset(&rows, &ConvertOptions::default()).unwrap();
    let id = &ds.data[0].paragraphs[0].qas[0].id;
    assert_eq!(id.len(), 32);
    assert!(id.chars().all(|c| c.is_ascii_hexdigit()));
}

/// With `ContentHash`, the id column is ignored: rows merge by question and the
/// id is a hash.
#[test]
fn content_hash_ignores_id_column() {
    let rows = vec![
        FlatRecord::new("ctx", "q?", "a", 0, false).with_id("q-001"),
        FlatRecord::new("ctx", "q?", "c", 4, false).with_id("q-002"),
    ];
    let opts = ConvertOptions::default().with_id_policy(IdPolicy::ContentHash);
    let (ds, _) = build_dataset(&rows, &opts).unwrap();
    let qas = &ds.data[0].paragraphs[0].qas;
    assert_eq!(qas.len(), 1);
    assert_eq!(qas[0].answers.len(), 2);
    assert_ne!(qas[0].id, "q-001");
    assert_eq!(qas[0].id.len(), 32);
}

/// Two unanswerable questions with no candidates still get distinct hashed ids.
#[test]
fn hashed_ids_differ_between_empty_questions() {
    let rows = vec![
        FlatRecord::new("ctx", "first?", "", -1, true),
        FlatRecord::new("ctx", "second?", "", -1, true),
    ];
    for policy in [IdPolicy::PreferSupplied, IdPolicy::ContentHash] {
        let opts = ConvertOptions::default().with_id_policy(policy);
        let (ds, _) = build_dataset(&rows, &opts).unwrap();
        let qas = &ds.data[0].paragraphs[0].qas;
        assert_ne!(qas[0].id, qas[1].id, "{policy:?}");
    }
}

/// `Alphabetical` sorts questions within each paragraph; `FirstSeen` keeps input order.
#[test]
fn question_order_option() {
    let rows = vec![
        FlatRecord::new("ctx", "why?", "w", 0, false),
        FlatRecord::new("ctx", "how?", "h", 0, false),
        FlatRecord::new("ctx", "what?", "x", 0, false),
    ];
    let questions = |order| {
        let opts = ConvertOptions::default().with_question_order(order);
        let (ds, _) = build_dataset(&rows, &opts).unwrap();
        ds.data[0].paragraphs[0].qas.iter().map(|q| q.question.clone()).collect::<Vec<_>>()
    };
    assert_eq!(questions(QuestionOrder::FirstSeen), vec!["why?", "how?", "what?"]);
    assert_eq!(questions(QuestionOrder::Alphabetical), vec!["how?", "what?", "why?"]);
}

/// A `title` column splits rows into documents in first-seen order; blank titles
/// use the configured default.
#[test]
fn title_column_partitions_documents() {
    let csv = "title,context,question,answer,answer_start,is_impossible\n\
               History,c1,q1?,a,0,false\n\
               Science,c2,q2?,b,0,false\n\
               History,c3,q3?,c,0,false\n\
               ,c4,q4?,d,0,false\n";
    let opts = ConvertOptions::default().with_title("Misc");
    let batch = read_flat_records(csv.as_bytes(), &opts).unwrap();
    let (ds, report) = SquadConverter::with_options(opts).build(&batch).unwrap();

    assert_eq!(report.documents, 3);
    let titles: Vec<&str> = ds.data.iter().map(|d| d.title.as_str()).collect();
    assert_eq!(titles, vec!["History", "Science", "Misc"]);
    let history: Vec<&str> = ds.data[0].paragraphs.iter().map(|p| p.context.as_str()).collect();
    assert_eq!(history, vec!["c1", "c3"]);
}

/// Escaped CSV text is decoded on read; with escaping disabled it is kept verbatim.
#[test]
fn ascii_escape_toggle_on_read() {
    let csv = "context,question,answer,answer_start,is_impossible\n\
               caf\\u00e9 au lait,what?,caf\\u00e9,0,false\n";
    let decoded = read_flat_records(csv.as_bytes(), &ConvertOptions::default()).unwrap();
    assert_eq!(decoded.records[0].context, "café au lait");
    assert_eq!(decoded.records[0].answer, "café");

    let raw = read_flat_records(csv.as_bytes(), &ConvertOptions::default().with_ascii_escapes(false)).unwrap();
    assert_eq!(raw.records[0].context, r"caf\u00e9 au lait");
}

/// Optional id/title columns can be left out of the CSV output.
#[test]
fn csv_columns_option_controls_header() {
    let rows = vec![FlatRecord::new("ctx", "q?", "a", 0, false).with_id("x").with_title("T")];
    let opts = ConvertOptions::default().with_csv_columns(CsvColumns { id: false, title: false });
    let mut buf = Vec::new();
    write_flat_records(&mut buf, &rows, &opts).unwrap();
    let text = String::from_utf8(buf).unwrap();
    assert_eq!(text, "context,question,answer,answer_start,is_impossible\nctx,q?,a,0,false\n");
}

/// `answer_start` accepts signs and radix prefixes within the i32 range.
#[test]
fn offset_parsing() {
    use squadconv::parse_offset;
    assert_eq!(parse_offset("42"), Some(42));
    assert_eq!(parse_offset(" -1 "), Some(-1));
    assert_eq!(parse_offset("+7"), Some(7));
    assert_eq!(parse_offset("0x1F"), Some(31));
    assert_eq!(parse_offset("0o17"), Some(15));
    assert_eq!(parse_offset("0b101"), Some(5));
    assert_eq!(parse_offset("007"), Some(7));
    assert_eq!(parse_offset("abc"), None);
    assert_eq!(parse_offset(""), None);
    assert_eq!(parse_offset("--5"), None);
    assert_eq!(parse_offset("0x"), None);
    assert_eq!(parse_offset("2147483648"), None);
    assert_eq!(parse_offset("-2147483648"), Some(i32::MIN));
}
