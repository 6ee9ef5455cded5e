use super::*;
use pretty_assertions::assert_eq;

fn quoted(text: &str) -> String {
    let mut out = String::new();
    write_quoted(&mut out, text);
    out
}

#[test]
fn test_letter_tables_agree() {
    for letter in ['a', 'b', 'e', 'f', 'n', 'r', 't', 'v'] {
        let c = resolve_letter(letter).unwrap();
        assert_eq!(escape_letter(c), Some(letter));
    }
    assert_eq!(resolve_letter('q'), None);
}

#[test]
fn test_needs_quotes() {
    assert!(needs_quotes(""));
    assert!(needs_quotes("nil"));
    assert!(needs_quotes("TRUE"));
    assert!(needs_quotes("42"));
    assert!(needs_quotes("-3.5e2"));
    assert!(needs_quotes("a b"));
    assert!(needs_quotes("f(x)"));
    assert!(needs_quotes("semi;colon"));
    assert!(needs_quotes("tab\there"));
    assert!(!needs_quotes("hello"));
    assert!(!needs_quotes("+"));
    assert!(!needs_quotes("=="));
    assert!(!needs_quotes("héllo"));
}

#[test]
fn test_write_quoted_escapes() {
    assert_eq!(quoted("say \"hi\"\n"), r#""say \"hi\"\n""#);
    assert_eq!(quoted("it's"), r#""it\'s""#);
    assert_eq!(quoted("a\\b"), r#""a\\b""#);
    assert_eq!(quoted("\x1b[0m"), r#""\e[0m""#);
}

#[test]
fn test_write_quoted_code_escapes() {
    assert_eq!(quoted("\x01"), r#""\x01""#);
    assert_eq!(quoted("\u{85}"), r#""\x85""#);
    assert_eq!(quoted("line\u{2028}break"), r#""line\u2028break""#);
}

#[test]
fn test_nul_before_octal_digit() {
    assert_eq!(quoted("\x007"), r#""\x007""#);
    assert_eq!(quoted("\0x"), r#""\0x""#);
}
