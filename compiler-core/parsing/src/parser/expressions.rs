//! Expressions are kept as flat token runs.
//!
//! Only the structure that statements depend on is recovered: delimiters
//! are matched, function bodies nested in an expression are parsed as
//! statements, and the end of the expression is found using semicolons,
//! closing delimiters and automatic semicolon insertion.

use syntax::{SyntaxKind, TokenSet};

use super::{CLOSING, Parser, statements};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum Stop {
    Statement,
    /// `case x:` ends at a colon that doesn't belong to a conditional.
    CaseLabel,
    /// `class A extends B {` ends before the class body.
    ClassHeritage,
}

/// Keywords that can never appear inside an expression, except as a
/// property name after a dot.
const STATEMENT_KEYWORD: TokenSet = TokenSet::new(&[
    SyntaxKind::BREAK,
    SyntaxKind::CASE,
    SyntaxKind::CATCH,
    SyntaxKind::CONST,
    SyntaxKind::CONTINUE,
    SyntaxKind::DEBUGGER,
    SyntaxKind::DEFAULT,
    SyntaxKind::DO,
    SyntaxKind::ELSE,
    SyntaxKind::EXPORT,
    SyntaxKind::FINALLY,
    SyntaxKind::FOR,
    SyntaxKind::IF,
    SyntaxKind::RETURN,
    SyntaxKind::SWITCH,
    SyntaxKind::THROW,
    SyntaxKind::TRY,
    SyntaxKind::VAR,
    SyntaxKind::WHILE,
    SyntaxKind::WITH,
]);

const OPERAND_END: TokenSet = TokenSet::new(&[
    SyntaxKind::THIS,
    SyntaxKind::SUPER,
    SyntaxKind::NULL,
    SyntaxKind::TRUE,
    SyntaxKind::FALSE,
    SyntaxKind::PRIVATE_NAME,
    SyntaxKind::NUMBER,
    SyntaxKind::STRING,
    SyntaxKind::REGEX,
    SyntaxKind::TEMPLATE,
    SyntaxKind::TEMPLATE_TAIL,
    SyntaxKind::RIGHT_PARENTHESIS,
    SyntaxKind::RIGHT_SQUARE,
    SyntaxKind::RIGHT_CURLY,
]);

/// Tokens that carry an expression across a line break.
const CONTINUATION: TokenSet = TokenSet::new(&[
    SyntaxKind::OPERATOR,
    SyntaxKind::DOT,
    SyntaxKind::QUESTION_DOT,
    SyntaxKind::QUESTION,
    SyntaxKind::COLON,
    SyntaxKind::COMMA,
    SyntaxKind::ARROW,
    SyntaxKind::IN,
    SyntaxKind::INSTANCEOF,
    SyntaxKind::LEFT_PARENTHESIS,
    SyntaxKind::LEFT_SQUARE,
    SyntaxKind::TEMPLATE,
    SyntaxKind::TEMPLATE_HEAD,
]);

/// Tokens that carry an expression across a line break after a postfix
/// `++` or `--`.
const POSTFIX_CONTINUATION: TokenSet = TokenSet::new(&[
    SyntaxKind::OPERATOR,
    SyntaxKind::QUESTION,
    SyntaxKind::COLON,
    SyntaxKind::COMMA,
    SyntaxKind::IN,
    SyntaxKind::INSTANCEOF,
]);

/// What the last consumed element left the expression ending with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Tail {
    Nothing,
    /// An operator or keyword that still expects an operand.
    Open,
    Operand,
    /// An operand followed by `++` or `--`.
    Postfix,
}

/// Parses an expression, returning whether anything was consumed.
pub(super) fn expression(p: &mut Parser, stop: Stop) -> bool {
    let mut marker = p.start();
    let mut tail = Tail::Nothing;
    let mut conditionals = 0usize;

    while !at_expression_end(p, stop, tail, conditionals) {
        let current = p.nth(0);
        match current {
            SyntaxKind::QUESTION => conditionals += 1,
            SyntaxKind::COLON => conditionals = conditionals.saturating_sub(1),
            _ => (),
        }
        element(p);
        tail = match current {
            SyntaxKind::PLUS_PLUS | SyntaxKind::MINUS_MINUS => match tail {
                Tail::Operand => Tail::Postfix,
                _ => Tail::Open,
            },
            _ if p.previous().is_some_and(ends_operand) => Tail::Operand,
            _ => Tail::Open,
        };
    }

    let consumed = tail != Tail::Nothing;
    if consumed {
        marker.end(p, SyntaxKind::Expression);
    } else {
        marker.cancel(p);
    }

    consumed
}

fn at_expression_end(p: &Parser, stop: Stop, tail: Tail, conditionals: usize) -> bool {
    let current = p.nth(0);

    if matches!(current, SyntaxKind::END_OF_FILE | SyntaxKind::SEMICOLON) || CLOSING.contains(current)
    {
        return true;
    }

    match stop {
        Stop::Statement => (),
        Stop::CaseLabel => {
            if current == SyntaxKind::COLON && conditionals == 0 {
                return true;
            }
        }
        Stop::ClassHeritage => {
            if current == SyntaxKind::LEFT_CURLY {
                return true;
            }
        }
    }

    let Some(previous) = p.previous().filter(|_| tail != Tail::Nothing) else {
        return STATEMENT_KEYWORD.contains(current);
    };

    if STATEMENT_KEYWORD.contains(current)
        && !matches!(previous, SyntaxKind::DOT | SyntaxKind::QUESTION_DOT)
    {
        return true;
    }

    if !p.newline_before() {
        return false;
    }

    match tail {
        Tail::Nothing | Tail::Open => false,
        Tail::Operand => !continues_expression(current, previous),
        Tail::Postfix => !POSTFIX_CONTINUATION.contains(current),
    }
}

fn ends_operand(kind: SyntaxKind) -> bool {
    kind.is_name() || OPERAND_END.contains(kind)
}

fn continues_expression(current: SyntaxKind, previous: SyntaxKind) -> bool {
    if current == SyntaxKind::LEFT_CURLY {
        return previous == SyntaxKind::RIGHT_PARENTHESIS;
    }
    CONTINUATION.contains(current)
}

fn element(p: &mut Parser) {
    match p.nth(0) {
        SyntaxKind::LEFT_PARENTHESIS => delimited(p, SyntaxKind::RIGHT_PARENTHESIS),
        SyntaxKind::LEFT_SQUARE => delimited(p, SyntaxKind::RIGHT_SQUARE),
        SyntaxKind::LEFT_CURLY if at_function_body(p) => statements::function_body(p),
        SyntaxKind::LEFT_CURLY => delimited(p, SyntaxKind::RIGHT_CURLY),
        SyntaxKind::TEMPLATE_HEAD => template(p),
        _ => p.consume(),
    }
}

/// Braces that follow a parameter list, an arrow or `static` open statements
/// rather than an object literal.
fn at_function_body(p: &Parser) -> bool {
    matches!(
        p.previous(),
        Some(SyntaxKind::RIGHT_PARENTHESIS | SyntaxKind::ARROW | SyntaxKind::STATIC)
    )
}

/// Consumes an opening delimiter through its matching `close`.
pub(super) fn delimited(p: &mut Parser, close: SyntaxKind) {
    p.consume();
    loop {
        let current = p.nth(0);
        if current == close {
            p.consume();
            return;
        }
        if current == SyntaxKind::END_OF_FILE {
            p.error(format!("expected {close:?}"));
            return;
        }
        if CLOSING.contains(current) {
            p.error_recover("mismatched closing delimiter");
            continue;
        }
        element(p);
    }
}

fn template(p: &mut Parser) {
    p.consume();
    loop {
        match p.nth(0) {
            SyntaxKind::TEMPLATE_TAIL => {
                p.consume();
                return;
            }
            SyntaxKind::TEMPLATE_MIDDLE => p.consume(),
            SyntaxKind::END_OF_FILE => {
                p.error("unterminated template literal");
                return;
            }
            kind if CLOSING.contains(kind) => p.error_recover("mismatched closing delimiter"),
            _ => element(p),
        }
    }
}
