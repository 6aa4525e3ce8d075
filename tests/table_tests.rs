use rtimeledger::utils::table::{Table, pad_display};
use unicode_width::UnicodeWidthStr;

/// Display column at which the first separator of `line` starts.
fn separator_column(line: &str) -> usize {
    let (before, _) = line.split_once('│').expect("separator");
    UnicodeWidthStr::width(before)
}

#[test]
fn test_wide_characters_keep_columns_aligned() {
    let mut table = Table::new(&["name", "x"]);
    table.add_row(vec!["李雷".into(), "1".into()]);
    table.add_row(vec!["abcd".into(), "2".into()]);
    table.add_row(vec!["José".into(), "3".into()]);

    let out = table.render();
    let lines: Vec<&str> = out.lines().filter(|l| l.contains('│')).collect();
    assert_eq!(lines.len(), 4);

    let first = separator_column(lines[0]);
    for line in &lines {
        assert_eq!(separator_column(line), first, "misaligned: {line}");
    }
    assert!(out.contains("李雷 │ 1"));
}

#[test]
fn test_pad_display_counts_terminal_columns() {
    assert_eq!(pad_display("李", 4), "李  ");
    assert_eq!(pad_display("ab", 4), "ab  ");
    assert_eq!(pad_display("toolong", 3), "toolong");
}
