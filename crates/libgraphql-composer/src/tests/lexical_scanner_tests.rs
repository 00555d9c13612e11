use crate::LexicalScanner;
use crate::LexicalState;
use pretty_assertions::assert_eq;

const DOUBLE_QUOTED: LexicalState = LexicalState::StringLiteral { quote: '"' };
const SINGLE_QUOTED: LexicalState = LexicalState::StringLiteral { quote: '\'' };

// =============================================================================
// State classification
// =============================================================================

#[test]
fn empty_document_is_code() {
    assert_eq!(LexicalScanner::state_at("", 0), LexicalState::Code);
}

#[test]
fn double_quoted_literal_opens_and_closes() {
    let source = r#"a "b" c"#;
    assert_eq!(LexicalScanner::state_at(source, 2), LexicalState::Code);
    assert_eq!(LexicalScanner::state_at(source, 3), DOUBLE_QUOTED);
    assert_eq!(LexicalScanner::state_at(source, 4), DOUBLE_QUOTED);
    assert_eq!(LexicalScanner::state_at(source, 5), LexicalState::Code);
    assert_eq!(LexicalScanner::state_at(source, 6), LexicalState::Code);
}

#[test]
fn single_quoted_literal_ignores_double_quotes() {
    let source = r#"'a " b' c"#;
    let offset_of_b = source.find('b').unwrap();
    let offset_of_c = source.find('c').unwrap();
    assert_eq!(LexicalScanner::state_at(source, offset_of_b), SINGLE_QUOTED);
    assert_eq!(LexicalScanner::state_at(source, offset_of_c), LexicalState::Code);
}

#[test]
fn escaped_quote_does_not_close_literal() {
    let source = r#""a\"b" x"#;
    let offset_of_b = source.find('b').unwrap();
    let offset_of_x = source.find('x').unwrap();
    assert_eq!(LexicalScanner::state_at(source, offset_of_b), DOUBLE_QUOTED);
    assert_eq!(LexicalScanner::state_at(source, offset_of_x), LexicalState::Code);
}

/// An escaped backslash right before the closing quote is indistinguishable
/// from an escaped quote, so the literal stays open.
#[test]
fn escaped_backslash_before_quote_keeps_literal_open() {
    let source = r#""a\\" x"#;
    let offset_of_x = source.find('x').unwrap();
    assert_eq!(LexicalScanner::state_at(source, offset_of_x), DOUBLE_QUOTED);
}

#[test]
fn line_comment_closes_at_newline() {
    let source = "a # \"not a string\nb";
    let offset_in_comment = source.find("not").unwrap();
    let offset_of_b = source.find('b').unwrap();
    assert_eq!(
        LexicalScanner::state_at(source, offset_in_comment),
        LexicalState::LineComment,
    );
    assert_eq!(LexicalScanner::state_at(source, offset_of_b), LexicalState::Code);
}

#[test]
fn line_comment_closes_at_carriage_return() {
    let source = "# comment\rb";
    let offset_of_b = source.find('b').unwrap();
    assert_eq!(LexicalScanner::state_at(source, offset_of_b), LexicalState::Code);
}

#[test]
fn hash_inside_string_is_not_a_comment() {
    let source = r#""a # b" c"#;
    let offset_of_c = source.find('c').unwrap();
    assert_eq!(LexicalScanner::state_at(source, offset_of_c), LexicalState::Code);
}

#[test]
fn multibyte_characters_advance_by_byte_length() {
    let source = "\"🎉\" x";
    let offset_of_x = source.find('x').unwrap();
    assert_eq!(LexicalScanner::state_at(source, offset_of_x), LexicalState::Code);
}

// =============================================================================
// Iteration and matching
// =============================================================================

#[test]
fn iterator_reports_state_before_each_char() {
    let states: Vec<_> = LexicalScanner::new("a\"b\"#c")
        .map(|classified| (classified.ch, classified.state))
        .collect();

    assert_eq!(states, vec![
        ('a', LexicalState::Code),
        ('"', LexicalState::Code),
        ('b', DOUBLE_QUOTED),
        ('"', DOUBLE_QUOTED),
        ('#', LexicalState::Code),
        ('c', LexicalState::LineComment),
    ]);
}

#[test]
fn code_matches_skip_strings_and_comments() {
    let source = "...A \"...A\" # ...A\n...A";
    let matches: Vec<_> = LexicalScanner::code_matches(source, "...A").collect();
    assert_eq!(matches, vec![0, source.rfind("...A").unwrap()]);
}

#[test]
fn advance_to_is_incremental() {
    let source = "x \"y\" z";
    let mut scanner = LexicalScanner::new(source);
    assert_eq!(scanner.advance_to(3), DOUBLE_QUOTED);
    assert_eq!(scanner.offset(), 3);
    assert_eq!(scanner.advance_to(6), LexicalState::Code);
    assert_eq!(scanner.state(), LexicalState::Code);
}

#[test]
fn resume_in_code_scans_from_offset() {
    let source = "\"(\" (\")\")";
    let open = source.rfind("(\"").unwrap();
    let states: Vec<_> = LexicalScanner::resume_in_code(source, open)
        .map(|classified| classified.state)
        .collect();
    assert_eq!(states, vec![
        LexicalState::Code,
        LexicalState::Code,
        DOUBLE_QUOTED,
        DOUBLE_QUOTED,
        LexicalState::Code,
    ]);
}
