#![allow(dead_code)]

use squadconv::{read_dataset, Dataset, FlatRecord};
use std::fs::{self, File};
use std::io::BufReader;
use std::path::{Path, PathBuf};

/// Write `content` to `dir/name` and return the path.
pub fn write_file(dir: &Path, name: &str, content: &str) -> PathBuf {
    let path = dir.join(name);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(&path, content).unwrap();
    path
}

/// Read a JSON dataset from disk.
pub fn read_json_dataset(path: &Path) -> Dataset {
    read_dataset(BufReader::new(File::open(path).unwrap())).unwrap()
}

/// Read a text file line-by-line (skips empty lines).
pub fn read_lines(path: &Path) -> Vec<String> {
    fs::read_to_string(path)
        .unwrap()
        .lines()
        .filter(|l| !l.is_empty())
        .map(str::to_string)
        .collect()
}

/// Projection used to compare rows regardless of synthesized ids.
pub fn shape(r: &FlatRecord) -> (String, String, String, String, i64, bool) {
    (r.title.clone(), r.context.clone(), r.question.clone(), r.answer.clone(), r.answer_start, r.is_impossible)
}

/// A small geography corpus, already in first-seen group order:
/// - context A: q1 with two answers, q2 impossible with one plausible answer
/// - context B: q3 with one answer, q4 impossible with no answer at all
pub fn geography_rows() -> Vec<FlatRecord> {
    let a = "Paris is the capital of France.";
    let b = "Zürich liegt am Zürichsee.";
    vec![
        FlatRecord::new(a, "What is the capital of France?", "Paris", 0, false).with_title("Geo"),
        FlatRecord::new(a, "What is the capital of France?", "Paris is", 0, false).with_title("Geo"),
        FlatRecord::new(a, "What is the capital of Spain?", "France", 24, true).with_title("Geo"),
        FlatRecord::new(b, "Woran liegt Zürich?", "Zürichsee", 16, false).with_title("Geo"),
        FlatRecord::new(b, "Wer regiert Zürich?", "", -1, true).with_title("Geo"),
    ]
}

/// The same corpus as CSV text (raw UTF-8, with an advisory column that must be ignored).
pub fn geography_csv() -> String {
    "context,question,answer,answer_start,is_impossible,answer_check\n\
     Paris is the capital of France.,What is the capital of France?,Paris,0,false,ok\n\
     Paris is the capital of France.,What is the capital of France?,Paris is,0,false,ok\n\
     Paris is the capital of France.,What is the capital of Spain?,France,24,true,\n\
     Zürich liegt am Zürichsee.,Woran liegt Zürich?,Zürichsee,16,false,ok\n\
     Zürich liegt am Zürichsee.,Wer regiert Zürich?,,,true,\n"
        .to_string()
}
