use anyhow::Result;
use clap::error::ErrorKind;
use clap::{ArgAction, Parser, ValueEnum};
use squadconv::{init_tracing_once, ConvertError, Direction, IdPolicy, QuestionOrder, SquadConverter};
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Clone, Copy, Debug, ValueEnum)]
enum IdPolicyArg {
    PreferSupplied,
    ContentHash,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum QuestionOrderArg {
    FirstSeen,
    Alphabetical,
}

/// Convert flat CSV question-answer rows into a SQuAD v2 style JSON dataset, or back.
#[derive(Parser, Debug)]
#[command(name = "squadconv", version, disable_version_flag = true)]
struct Cli {
    /// Print version and exit
    #[arg(short = 'v', long = "version", action = ArgAction::Version)]
    _version: Option<bool>,

    /// Input path (.csv / .json, optionally .zst compressed)
    #[arg(short = 'i', long = "input")]
    input: Option<PathBuf>,

    /// Output path [default: out.json, or out.csv with --reverse]
    #[arg(short = 'o', long = "output")]
    output: Option<PathBuf>,

    /// Reverse mode: JSON -> CSV
    #[arg(short = 'r', long = "reverse")]
    reverse: bool,

    /// Title for rows without a `title` column value
    #[arg(short = 't', long = "title")]
    title: Option<String>,

    /// Where QnA ids come from
    #[arg(long, value_enum, default_value = "prefer-supplied")]
    id_policy: IdPolicyArg,

    /// Order of questions within a paragraph
    #[arg(long, value_enum, default_value = "first-seen")]
    question_order: QuestionOrderArg,

    /// Keep raw text in CSV (no \uXXXX escaping or unescaping)
    #[arg(long)]
    no_escape: bool,

    /// Single-line JSON output
    #[arg(long)]
    compact: bool,

    /// Show a progress bar
    #[arg(long)]
    progress: bool,
}

fn run(cli: Cli) -> Result<()> {
    let input = cli
        .input
        .ok_or_else(|| ConvertError::configuration("an input path is required (-i)"))?;
    let direction = if cli.reverse { Direction::Reverse } else { Direction::Forward };
    let output = cli.output.unwrap_or_else(|| PathBuf::from(direction.default_output()));

    let mut converter = SquadConverter::new()
        .id_policy(match cli.id_policy {
            IdPolicyArg::PreferSupplied => IdPolicy::PreferSupplied,
            IdPolicyArg::ContentHash => IdPolicy::ContentHash,
        })
        .question_order(match cli.question_order {
            QuestionOrderArg::FirstSeen => QuestionOrder::FirstSeen,
            QuestionOrderArg::Alphabetical => QuestionOrder::Alphabetical,
        })
        .ascii_escapes(!cli.no_escape)
        .pretty(!cli.compact)
        .progress(cli.progress);
    if let Some(title) = cli.title {
        converter = converter.title(title);
    }

    let report = converter.convert(direction, &input, &output)?;
    if report.skipped_rows() > 0 {
        eprintln!("skipped {} row(s)", report.skipped_rows());
    }
    Ok(())
}

fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
            let _ = e.print();
            return ExitCode::SUCCESS;
        }
        Err(e) => {
            let _ = e.print();
            return ExitCode::FAILURE;
        }
    };

    init_tracing_once();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}
