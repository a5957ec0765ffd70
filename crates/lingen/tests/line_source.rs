//! Tests for the lookahead line source.

use lingen::LineSource;

#[test]
fn reads_lines_with_lookahead() {
    let mut lines = LineSource::new("one\ntwo\nthree\n".as_bytes(), true, false).unwrap();
    assert_eq!(lines.peek(), Some("one"));
    assert_eq!(lines.peek(), Some("one"));
    assert_eq!(lines.read_line().unwrap().as_deref(), Some("one"));
    assert_eq!(lines.peek(), Some("two"));
    assert_eq!(lines.read_line().unwrap().as_deref(), Some("two"));
    assert_eq!(lines.read_line().unwrap().as_deref(), Some("three"));
    assert_eq!(lines.read_line().unwrap(), None);
    assert_eq!(lines.peek(), None);
}

#[test]
fn line_numbers_are_physical_and_one_based() {
    let mut lines = LineSource::new("a\n\n\nb\n".as_bytes(), true, false).unwrap();
    assert_eq!(lines.line_number(), 0);
    lines.read_line().unwrap();
    assert_eq!(lines.line_number(), 1);
    // the two blank lines are skipped but still counted
    lines.read_line().unwrap();
    assert_eq!(lines.line_number(), 4);
}

#[test]
fn blank_lines_are_kept_when_not_skipping() {
    let mut lines = LineSource::new("a\n\nb\n".as_bytes(), false, false).unwrap();
    assert_eq!(lines.read_line().unwrap().as_deref(), Some("a"));
    assert_eq!(lines.read_line().unwrap().as_deref(), Some(""));
    assert_eq!(lines.read_line().unwrap().as_deref(), Some("b"));
}

#[test]
fn tabs_are_stripped_on_request() {
    let mut lines = LineSource::new("\tfield x\n".as_bytes(), true, true).unwrap();
    assert_eq!(lines.read_line().unwrap().as_deref(), Some("field x"));

    let mut kept = LineSource::new("\tfield x\n".as_bytes(), true, false).unwrap();
    assert_eq!(kept.read_line().unwrap().as_deref(), Some("\tfield x"));
}

#[test]
fn missing_trailing_newline_is_fine() {
    let mut lines = LineSource::new("only".as_bytes(), true, false).unwrap();
    assert_eq!(lines.read_line().unwrap().as_deref(), Some("only"));
    assert_eq!(lines.read_line().unwrap(), None);
}

#[test]
fn windows_line_endings_are_trimmed() {
    let mut lines = LineSource::new("a\r\nb\r\n".as_bytes(), true, false).unwrap();
    assert_eq!(lines.read_line().unwrap().as_deref(), Some("a"));
    assert_eq!(lines.read_line().unwrap().as_deref(), Some("b"));
}
