use std::fmt::Write;

use syntax::SyntaxKind;
use test_each_file::test_each_file;

fn print_tokens(source: &str) -> String {
    let lexed = lexing::lex(source);

    let mut snapshot = String::new();
    for index in 0..lexed.len() {
        let position = lexed.position(index);
        write!(
            snapshot,
            "{:?} {:?} {}:{}",
            lexed.kind(index),
            lexed.text(index),
            position.line,
            position.column
        )
        .unwrap();
        if let Some(error) = lexed.error(index) {
            write!(snapshot, " error={error:?}").unwrap();
        }
        writeln!(snapshot).unwrap();
    }
    snapshot
}

test_each_file! { in "./compiler-core/lexing/tests/fixtures" as reconstruction => |content: &str| {
    // This test asserts that the original content can be reconstructed from the lexed tokens.
    let lexed = lexing::lex(content);

    let mut result = String::new();
    for index in 0..lexed.len() {
        result.push_str(lexed.text(index));
    }

    assert_eq!(content, result);
    assert!(!lexed.has_errors());
}}

test_each_file! { in "./compiler-core/lexing/tests/fixtures" as significant => |content: &str| {
    let lexed = lexing::lex(content);
    let input = lexing::significant(&lexed);

    let trivia = (0..lexed.len()).filter(|&i| lexed.kind(i).is_whitespace_or_comment()).count();
    assert_eq!(input.len(), lexed.len() - trivia + 1);
    assert_eq!(input.kind(input.len() - 1), SyntaxKind::END_OF_FILE);
}}

#[test]
fn regex_or_division() {
    insta::assert_snapshot!(print_tokens("a / b; /c/g"), @r#"
    IDENTIFIER "a" 1:0
    WHITESPACE " " 1:1
    OPERATOR "/" 1:2
    WHITESPACE " " 1:3
    IDENTIFIER "b" 1:4
    SEMICOLON ";" 1:5
    WHITESPACE " " 1:6
    REGEX "/c/g" 1:7
    "#);
}

#[test]
fn template_substitutions() {
    insta::assert_snapshot!(print_tokens("`a${b}c${d}e`"), @r#"
    TEMPLATE_HEAD "`a${" 1:0
    IDENTIFIER "b" 1:4
    TEMPLATE_MIDDLE "}c${" 1:5
    IDENTIFIER "d" 1:9
    TEMPLATE_TAIL "}e`" 1:10
    "#);
}

#[test]
fn template_with_object_literal() {
    insta::assert_snapshot!(print_tokens("`${ {a: 1}.a }`"), @r#"
    TEMPLATE_HEAD "`${" 1:0
    WHITESPACE " " 1:3
    LEFT_CURLY "{" 1:4
    IDENTIFIER "a" 1:5
    COLON ":" 1:6
    WHITESPACE " " 1:7
    NUMBER "1" 1:8
    RIGHT_CURLY "}" 1:9
    DOT "." 1:10
    IDENTIFIER "a" 1:11
    WHITESPACE " " 1:12
    TEMPLATE_TAIL "}`" 1:13
    "#);
}

#[test]
fn loop_keywords() {
    insta::assert_snapshot!(print_tokens("for await (x of y) do;while(0)"), @r#"
    FOR "for" 1:0
    WHITESPACE " " 1:3
    AWAIT "await" 1:4
    WHITESPACE " " 1:9
    LEFT_PARENTHESIS "(" 1:10
    IDENTIFIER "x" 1:11
    WHITESPACE " " 1:12
    OF "of" 1:13
    WHITESPACE " " 1:15
    IDENTIFIER "y" 1:16
    RIGHT_PARENTHESIS ")" 1:17
    WHITESPACE " " 1:18
    DO "do" 1:19
    SEMICOLON ";" 1:21
    WHILE "while" 1:22
    LEFT_PARENTHESIS "(" 1:27
    NUMBER "0" 1:28
    RIGHT_PARENTHESIS ")" 1:29
    "#);
}

#[test]
fn utf16_columns() {
    insta::assert_snapshot!(print_tokens("s = '😀';\nt"), @r#"
    IDENTIFIER "s" 1:0
    WHITESPACE " " 1:1
    OPERATOR "=" 1:2
    WHITESPACE " " 1:3
    STRING "'😀'" 1:4
    SEMICOLON ";" 1:8
    WHITESPACE "\n" 1:9
    IDENTIFIER "t" 2:0
    "#);
}

#[test]
fn unterminated_literals() {
    insta::assert_snapshot!(print_tokens("'abc\n/* open"), @r#"
    STRING "'abc" 1:0 error="unterminated string literal"
    WHITESPACE "\n" 1:4
    BLOCK_COMMENT "/* open" 2:0 error="unterminated block comment"
    "#);
}

mod invariants {
    use syntax::SyntaxKind;

    #[test]
    fn newline_before_tracks_comments() {
        let lexed = lexing::lex("a /* one\ntwo */ b // tail\nc");
        let input = lexing::significant(&lexed);

        assert_eq!(input.kind(0), SyntaxKind::IDENTIFIER);
        assert!(!input.newline_before(0));
        assert!(input.newline_before(1));
        assert!(input.newline_before(2));
        assert_eq!(input.kind(3), SyntaxKind::END_OF_FILE);
    }

    #[test]
    fn position_at_offset() {
        let lexed = lexing::lex("let a;\n  while (a) {}");
        let position = lexed.position_at(9);
        assert_eq!((position.line, position.column), (2, 2));
    }

    #[test]
    fn unmatched_closing_brace() {
        let lexed = lexing::lex("}`");
        assert_eq!(lexed.kind(0), SyntaxKind::RIGHT_CURLY);
        assert_eq!(lexed.kind(1), SyntaxKind::TEMPLATE);
        assert!(lexed.error(1).is_some());
    }
}
