//! The core character-based lexer, inspired by `rustc_lexer`.

use std::str::Chars;

use syntax::SyntaxKind;
use unicode_categories::UnicodeCategories;

use crate::{Position, lexed::Lexed};

const EOF_CHAR: char = '\0';

/// What an open `{` belongs to, so that the matching `}` can resume a
/// template literal after a substitution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Brace {
    Block,
    Template,
}

pub(crate) struct Lexer<'a> {
    source: &'a str,
    chars: Chars<'a>,
    line: u32,
    column: u32,
    braces: Vec<Brace>,
    previous: Option<SyntaxKind>,
    lexed: Lexed<'a>,
}

impl<'a> Lexer<'a> {
    pub(crate) fn new(source: &'a str) -> Lexer<'a> {
        let chars = source.chars();
        let line = 1;
        let column = 0;
        let braces = vec![];
        let previous = None;
        let lexed = Lexed::new(source);
        Lexer { source, chars, line, column, braces, previous, lexed }
    }

    pub(crate) fn finish(mut self) -> Lexed<'a> {
        let position = self.position();
        self.lexed.push(SyntaxKind::END_OF_FILE, position, None);
        self.lexed
    }

    pub(crate) fn is_eof(&self) -> bool {
        self.chars.as_str().is_empty()
    }

    fn consumed(&self) -> usize {
        self.source.len() - self.chars.as_str().len()
    }

    fn position(&self) -> Position {
        let offset = self.consumed();
        let line = self.line;
        let column = self.column;
        Position { offset, line, column }
    }

    fn first(&self) -> char {
        self.chars.clone().next().unwrap_or(EOF_CHAR)
    }

    fn second(&self) -> char {
        let mut chars = self.chars.clone();
        chars.next();
        chars.next().unwrap_or(EOF_CHAR)
    }

    fn take(&mut self) -> char {
        let result = self.chars.next().unwrap_or(EOF_CHAR);
        match result {
            '\n' | '\u{2028}' | '\u{2029}' => {
                self.line += 1;
                self.column = 0;
            }
            '\r' if self.first() != '\n' => {
                self.line += 1;
                self.column = 0;
            }
            _ => {
                self.column += result.len_utf16() as u32;
            }
        }
        result
    }

    fn take_while(&mut self, predicate: impl Fn(char) -> bool) {
        while predicate(self.first()) && !self.is_eof() {
            self.take();
        }
    }

    fn take_while_max(&mut self, predicate: impl Fn(char) -> bool, max: u8) {
        for _ in 0..max {
            if predicate(self.first()) && !self.is_eof() {
                self.take();
            } else {
                return;
            }
        }
    }

    fn push(&mut self, kind: SyntaxKind, position: Position, error: Option<&str>) {
        if !kind.is_whitespace_or_comment() {
            self.previous = Some(kind);
        }
        self.lexed.push(kind, position, error);
    }
}

impl Lexer<'_> {
    pub(crate) fn take_token(&mut self) {
        match self.first() {
            '/' if self.second() == '/' => self.take_line_comment(),
            '/' if self.second() == '*' => self.take_block_comment(),
            '#' if self.second() == '!' && self.consumed() == 0 => self.take_line_comment(),
            '/' if self.regex_allowed() => self.take_regex(),

            '(' => self.take_single(SyntaxKind::LEFT_PARENTHESIS),
            ')' => self.take_single(SyntaxKind::RIGHT_PARENTHESIS),
            '[' => self.take_single(SyntaxKind::LEFT_SQUARE),
            ']' => self.take_single(SyntaxKind::RIGHT_SQUARE),
            '{' => {
                self.braces.push(Brace::Block);
                self.take_single(SyntaxKind::LEFT_CURLY)
            }
            '}' => {
                if self.braces.pop() == Some(Brace::Template) {
                    self.take_template_continuation()
                } else {
                    self.take_single(SyntaxKind::RIGHT_CURLY)
                }
            }

            ';' => self.take_single(SyntaxKind::SEMICOLON),
            ',' => self.take_single(SyntaxKind::COMMA),
            ':' => self.take_single(SyntaxKind::COLON),
            '~' => self.take_single(SyntaxKind::TILDE),

            '`' => self.take_template(),
            '"' | '\'' => self.take_string(),
            '#' if is_name_start(self.second()) => self.take_private_name(),
            '.' if self.second().is_ascii_digit() => self.take_number(),

            i => {
                if i.is_ascii_digit() {
                    self.take_number()
                } else if is_name_start(i) || i == '\\' {
                    self.take_name()
                } else if is_whitespace(i) {
                    self.take_whitespace()
                } else if is_punctuator_start(i) {
                    self.take_punctuator()
                } else {
                    self.take_unknown()
                }
            }
        }
    }

    /// Decides whether a `/` starts a regular expression or is a division,
    /// based on the last significant token.
    fn regex_allowed(&self) -> bool {
        let Some(previous) = self.previous else {
            return true;
        };
        !matches!(
            previous,
            SyntaxKind::IDENTIFIER
                | SyntaxKind::PRIVATE_NAME
                | SyntaxKind::ASYNC
                | SyntaxKind::LET
                | SyntaxKind::OF
                | SyntaxKind::STATIC
                | SyntaxKind::THIS
                | SyntaxKind::SUPER
                | SyntaxKind::NULL
                | SyntaxKind::TRUE
                | SyntaxKind::FALSE
                | SyntaxKind::NUMBER
                | SyntaxKind::STRING
                | SyntaxKind::REGEX
                | SyntaxKind::TEMPLATE
                | SyntaxKind::TEMPLATE_TAIL
                | SyntaxKind::RIGHT_PARENTHESIS
                | SyntaxKind::RIGHT_SQUARE
                | SyntaxKind::PLUS_PLUS
                | SyntaxKind::MINUS_MINUS
        )
    }

    #[inline]
    fn take_single(&mut self, kind: SyntaxKind) {
        let position = self.position();
        self.take();
        self.push(kind, position, None)
    }

    #[inline]
    fn take_unknown(&mut self) {
        let position = self.position();
        self.take();
        self.push(SyntaxKind::ERROR, position, Some("unexpected character"))
    }

    #[inline]
    fn take_whitespace(&mut self) {
        let position = self.position();
        self.take_while(is_whitespace);
        self.push(SyntaxKind::WHITESPACE, position, None)
    }

    #[inline]
    fn take_line_comment(&mut self) {
        let position = self.position();
        self.take();
        self.take();
        self.take_while(|c| !is_line_terminator(c));
        self.push(SyntaxKind::LINE_COMMENT, position, None)
    }

    #[inline]
    fn take_block_comment(&mut self) {
        let position = self.position();
        assert_eq!(self.take(), '/');
        assert_eq!(self.take(), '*');
        let error = loop {
            if self.is_eof() {
                break Some("unterminated block comment");
            }
            if self.first() == '*' && self.second() == '/' {
                self.take();
                self.take();
                break None;
            }
            self.take();
        };
        self.push(SyntaxKind::BLOCK_COMMENT, position, error)
    }

    #[inline]
    fn take_name(&mut self) {
        let position @ Position { offset, .. } = self.position();
        loop {
            let c = self.first();
            if c == '\\' {
                self.take_unicode_escape();
            } else if is_name_continue(c) && !self.is_eof() {
                self.take();
            } else {
                break;
            }
        }
        let end_offset = self.consumed();
        let kind = match &self.source[offset..end_offset] {
            "break" => SyntaxKind::BREAK,
            "case" => SyntaxKind::CASE,
            "catch" => SyntaxKind::CATCH,
            "class" => SyntaxKind::CLASS,
            "const" => SyntaxKind::CONST,
            "continue" => SyntaxKind::CONTINUE,
            "debugger" => SyntaxKind::DEBUGGER,
            "default" => SyntaxKind::DEFAULT,
            "delete" => SyntaxKind::DELETE,
            "do" => SyntaxKind::DO,
            "else" => SyntaxKind::ELSE,
            "export" => SyntaxKind::EXPORT,
            "extends" => SyntaxKind::EXTENDS,
            "false" => SyntaxKind::FALSE,
            "finally" => SyntaxKind::FINALLY,
            "for" => SyntaxKind::FOR,
            "function" => SyntaxKind::FUNCTION,
            "if" => SyntaxKind::IF,
            "import" => SyntaxKind::IMPORT,
            "in" => SyntaxKind::IN,
            "instanceof" => SyntaxKind::INSTANCEOF,
            "new" => SyntaxKind::NEW,
            "null" => SyntaxKind::NULL,
            "return" => SyntaxKind::RETURN,
            "super" => SyntaxKind::SUPER,
            "switch" => SyntaxKind::SWITCH,
            "this" => SyntaxKind::THIS,
            "throw" => SyntaxKind::THROW,
            "true" => SyntaxKind::TRUE,
            "try" => SyntaxKind::TRY,
            "typeof" => SyntaxKind::TYPEOF,
            "var" => SyntaxKind::VAR,
            "void" => SyntaxKind::VOID,
            "while" => SyntaxKind::WHILE,
            "with" => SyntaxKind::WITH,
            "yield" => SyntaxKind::YIELD,
            // NOTE: These are only keywords in specific positions, e.g. `let of = async`
            "async" => SyntaxKind::ASYNC,
            "await" => SyntaxKind::AWAIT,
            "let" => SyntaxKind::LET,
            "of" => SyntaxKind::OF,
            "static" => SyntaxKind::STATIC,
            _ => SyntaxKind::IDENTIFIER,
        };
        self.push(kind, position, None)
    }

    fn take_unicode_escape(&mut self) {
        assert_eq!(self.take(), '\\');
        if self.first() != 'u' {
            return;
        }
        self.take();
        if self.first() == '{' {
            self.take();
            self.take_while(|c| c.is_ascii_hexdigit());
            if self.first() == '}' {
                self.take();
            }
        } else {
            self.take_while_max(|c| c.is_ascii_hexdigit(), 4);
        }
    }

    #[inline]
    fn take_private_name(&mut self) {
        let position = self.position();
        assert_eq!(self.take(), '#');
        self.take_while(is_name_continue);
        self.push(SyntaxKind::PRIVATE_NAME, position, None)
    }

    #[inline]
    fn take_number(&mut self) {
        let position = self.position();

        if self.first() == '0' && matches!(self.second(), 'x' | 'X' | 'o' | 'O' | 'b' | 'B') {
            self.take();
            self.take();
            self.take_while(|c| c.is_ascii_hexdigit() || c == '_');
        } else {
            self.take_while(|c| c.is_ascii_digit() || c == '_');
            if self.first() == '.' {
                self.take();
                self.take_while(|c| c.is_ascii_digit() || c == '_');
            }
            if matches!(self.first(), 'e' | 'E') {
                self.take();
                if matches!(self.first(), '+' | '-') {
                    self.take();
                }
                self.take_while(|c| c.is_ascii_digit() || c == '_');
            }
        }

        // 10n
        if self.first() == 'n' {
            self.take();
        }

        let error = if is_name_start(self.first()) && !self.is_eof() {
            Some("identifier directly after number")
        } else {
            None
        };

        self.push(SyntaxKind::NUMBER, position, error);
    }

    #[inline]
    fn take_string(&mut self) {
        let position = self.position();
        let quote = self.take();
        let error = loop {
            if self.is_eof() {
                break Some("unterminated string literal");
            }
            match self.first() {
                c if c == quote => {
                    self.take();
                    break None;
                }
                '\n' | '\r' => {
                    break Some("unterminated string literal");
                }
                '\\' => {
                    self.take();
                    // "\<CR><LF>" is a single line continuation
                    if self.take() == '\r' && self.first() == '\n' {
                        self.take();
                    }
                }
                _ => {
                    self.take();
                }
            }
        };
        self.push(SyntaxKind::STRING, position, error);
    }

    #[inline]
    fn take_template(&mut self) {
        let position = self.position();
        assert_eq!(self.take(), '`');
        self.take_template_chunk(position, SyntaxKind::TEMPLATE, SyntaxKind::TEMPLATE_HEAD);
    }

    #[inline]
    fn take_template_continuation(&mut self) {
        let position = self.position();
        assert_eq!(self.take(), '}');
        self.take_template_chunk(position, SyntaxKind::TEMPLATE_TAIL, SyntaxKind::TEMPLATE_MIDDLE);
    }

    /// Takes template characters up to either the closing backtick, which
    /// produces `closed`, or the start of a substitution, which produces
    /// `substitution`.
    fn take_template_chunk(
        &mut self,
        position: Position,
        closed: SyntaxKind,
        substitution: SyntaxKind,
    ) {
        loop {
            if self.is_eof() {
                return self.push(closed, position, Some("unterminated template literal"));
            }
            match self.first() {
                '`' => {
                    self.take();
                    return self.push(closed, position, None);
                }
                '$' if self.second() == '{' => {
                    self.take();
                    self.take();
                    self.braces.push(Brace::Template);
                    return self.push(substitution, position, None);
                }
                '\\' => {
                    self.take();
                    self.take();
                }
                _ => {
                    self.take();
                }
            }
        }
    }

    #[inline]
    fn take_regex(&mut self) {
        let position = self.position();
        assert_eq!(self.take(), '/');

        let mut in_class = false;
        let error = loop {
            if self.is_eof() {
                break Some("unterminated regular expression");
            }
            match self.first() {
                c if is_line_terminator(c) => {
                    break Some("unterminated regular expression");
                }
                '\\' => {
                    self.take();
                    if !is_line_terminator(self.first()) {
                        self.take();
                    }
                }
                '[' => {
                    in_class = true;
                    self.take();
                }
                ']' => {
                    in_class = false;
                    self.take();
                }
                '/' if !in_class => {
                    self.take();
                    break None;
                }
                _ => {
                    self.take();
                }
            }
        };

        if error.is_none() {
            self.take_while(is_name_continue);
        }

        self.push(SyntaxKind::REGEX, position, error);
    }

    #[inline]
    fn take_punctuator(&mut self) {
        let position = self.position();
        let rest = self.chars.as_str();
        let matched = PUNCTUATORS.iter().find(|(text, _)| {
            rest.starts_with(text)
                // a?.5:b is a conditional, not an optional chain
                && !(*text == "?." && rest[2..].starts_with(|c: char| c.is_ascii_digit()))
        });
        match matched {
            Some(&(text, kind)) => {
                for _ in 0..text.len() {
                    self.take();
                }
                self.push(kind, position, None);
            }
            None => self.take_unknown(),
        }
    }
}

/// Longest first, so that the first match is the longest match.
const PUNCTUATORS: &[(&str, SyntaxKind)] = &[
    (">>>=", SyntaxKind::OPERATOR),
    ("...", SyntaxKind::OPERATOR),
    ("===", SyntaxKind::OPERATOR),
    ("!==", SyntaxKind::OPERATOR),
    ("**=", SyntaxKind::OPERATOR),
    ("<<=", SyntaxKind::OPERATOR),
    (">>=", SyntaxKind::OPERATOR),
    (">>>", SyntaxKind::OPERATOR),
    ("&&=", SyntaxKind::OPERATOR),
    ("||=", SyntaxKind::OPERATOR),
    ("??=", SyntaxKind::OPERATOR),
    ("=>", SyntaxKind::ARROW),
    ("?.", SyntaxKind::QUESTION_DOT),
    ("++", SyntaxKind::PLUS_PLUS),
    ("--", SyntaxKind::MINUS_MINUS),
    ("==", SyntaxKind::OPERATOR),
    ("!=", SyntaxKind::OPERATOR),
    ("<=", SyntaxKind::OPERATOR),
    (">=", SyntaxKind::OPERATOR),
    ("&&", SyntaxKind::OPERATOR),
    ("||", SyntaxKind::OPERATOR),
    ("??", SyntaxKind::OPERATOR),
    ("+=", SyntaxKind::OPERATOR),
    ("-=", SyntaxKind::OPERATOR),
    ("*=", SyntaxKind::OPERATOR),
    ("/=", SyntaxKind::OPERATOR),
    ("%=", SyntaxKind::OPERATOR),
    ("&=", SyntaxKind::OPERATOR),
    ("|=", SyntaxKind::OPERATOR),
    ("^=", SyntaxKind::OPERATOR),
    ("<<", SyntaxKind::OPERATOR),
    (">>", SyntaxKind::OPERATOR),
    ("**", SyntaxKind::OPERATOR),
    ("!", SyntaxKind::BANG),
    ("?", SyntaxKind::QUESTION),
    (".", SyntaxKind::DOT),
    ("=", SyntaxKind::OPERATOR),
    ("<", SyntaxKind::OPERATOR),
    (">", SyntaxKind::OPERATOR),
    ("+", SyntaxKind::OPERATOR),
    ("-", SyntaxKind::OPERATOR),
    ("*", SyntaxKind::OPERATOR),
    ("/", SyntaxKind::OPERATOR),
    ("%", SyntaxKind::OPERATOR),
    ("&", SyntaxKind::OPERATOR),
    ("|", SyntaxKind::OPERATOR),
    ("^", SyntaxKind::OPERATOR),
    ("@", SyntaxKind::OPERATOR),
];

fn is_punctuator_start(c: char) -> bool {
    matches!(
        c,
        '.' | '?' | '=' | '<' | '>' | '!' | '+' | '-' | '*' | '/' | '%' | '&' | '|' | '^' | '@'
    )
}

fn is_line_terminator(c: char) -> bool {
    matches!(c, '\n' | '\r' | '\u{2028}' | '\u{2029}')
}

fn is_whitespace(c: char) -> bool {
    c.is_whitespace() || c == '\u{feff}'
}

fn is_name_start(c: char) -> bool {
    c == '$' || c == '_' || c.is_letter() || c.is_number_letter()
}

fn is_name_continue(c: char) -> bool {
    is_name_start(c)
        || c.is_ascii_digit()
        || c.is_number_decimal_digit()
        || c.is_mark_nonspacing()
        || c.is_mark_spacing_combining()
        || c.is_punctuation_connector()
        || c == '\u{200c}'
        || c == '\u{200d}'
}
