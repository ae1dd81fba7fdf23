use squadconv::{from_safe_text, to_safe_text};

/// Every sample survives escape -> unescape unchanged, and the escaped form is pure ASCII.
#[test]
fn safe_text_round_trips_exactly() {
    let samples = [
        "plain ascii",
        "Zürich liegt am Zürichsee.",
        "日本語のテキスト",
        "emoji 😀 outside the BMP",
        "tabs\tand\nnewlines\r\n",
        r"C:\path\to\file",
        r"already escaped looking \u00e9 and \x41",
        "quotes \"inside\" and 'single'",
        "trailing backslash \\",
        "",
    ];
    for s in samples {
        let safe = to_safe_text(s);
        assert!(safe.is_ascii(), "not ascii: {safe}");
        assert_eq!(from_safe_text(&safe), s, "round trip failed for {s:?}");
    }
}

/// Concrete escape forms for each width, and for the backslash itself.
#[test]
fn escape_forms() {
    assert_eq!(to_safe_text("é"), r"\u00e9");
    assert_eq!(to_safe_text("😀"), r"\U0001f600");
    assert_eq!(to_safe_text("\n"), r"\x0a");
    assert_eq!(to_safe_text(r"a\b"), r"a\x5cb");
    assert_eq!(to_safe_text("say \"hi\""), "say \"hi\"");
}

/// Upper- and lower-case hex digits both decode.
#[test]
fn decodes_all_escape_widths() {
    assert_eq!(from_safe_text(r"caf\u00E9"), "café");
    assert_eq!(from_safe_text(r"\x41\x42"), "AB");
    assert_eq!(from_safe_text(r"\U0001F600!"), "😀!");
}

/// Backslashes not followed by a recognized escape pass through literally, as
/// do escapes naming an invalid scalar value.
#[test]
fn unrecognized_sequences_pass_through() {
    assert_eq!(from_safe_text(r"a\nb"), r"a\nb");
    assert_eq!(from_safe_text(r"lone \ here"), r"lone \ here");
    assert_eq!(from_safe_text(r"short \u12"), r"short \u12");
    assert_eq!(from_safe_text(r"\ud800 surrogate"), r"\ud800 surrogate");
    assert_eq!(from_safe_text(r"end\"), r"end\");
}
