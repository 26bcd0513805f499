//! Guard insertion and detection on a mutable tree.

use rowan::ast::AstNode;
use syntax::{SyntaxElement, SyntaxKind, SyntaxNode, SyntaxToken, cst};
use tags::LoopKind;

use crate::make;

pub(crate) fn loop_kind(looping: &cst::Loop) -> LoopKind {
    match looping {
        cst::Loop::ForStatement(_) => LoopKind::For,
        cst::Loop::ForInStatement(_) => LoopKind::ForIn,
        cst::Loop::ForOfStatement(_) => LoopKind::ForOf,
        cst::Loop::WhileStatement(_) => LoopKind::While,
        cst::Loop::DoWhileStatement(_) => LoopKind::DoWhile,
    }
}

/// Whether `statement` is a call to `helper`, either bare or through
/// `globalThis`.
pub(crate) fn is_guard_call(statement: &cst::Statement, helper: &str) -> bool {
    let cst::Statement::ExpressionStatement(statement) = statement else {
        return false;
    };
    let Some(expression) = statement.expression() else {
        return false;
    };

    let tokens: Vec<SyntaxToken> = expression.significant_tokens().take(4).collect();
    match tokens.as_slice() {
        [global, dot, name, open, ..]
            if global.text() == "globalThis"
                && dot.kind() == SyntaxKind::DOT
                && name.text() == helper
                && open.kind() == SyntaxKind::LEFT_PARENTHESIS =>
        {
            true
        }
        [name, open, ..] => name.text() == helper && open.kind() == SyntaxKind::LEFT_PARENTHESIS,
        _ => false,
    }
}

/// Makes `guard` the first statement of the loop body, turning the body
/// into a block if needed. Returns false when the body is already guarded.
pub(crate) fn insert(looping: &cst::Loop, guard: &str, helper: &str) -> bool {
    let Some(body) = looping.body() else {
        return false;
    };

    match body {
        cst::Statement::Block(block) => {
            let first = block.statements().next();
            if first.is_some_and(|first| is_guard_call(&first, helper)) {
                return false;
            }
            insert_into_block(&block, guard)
        }
        cst::Statement::EmptyStatement(empty) => {
            replace_empty(empty.syntax(), guard);
            true
        }
        statement => {
            wrap(statement.syntax(), guard);
            true
        }
    }
}

fn insert_into_block(block: &cst::Block, guard: &str) -> bool {
    let Some(left_curly) = block.left_curly() else {
        return false;
    };

    let index = left_curly.index() + 1;
    let statement = make::statement(guard).syntax().clone();
    let whitespace = left_curly
        .next_sibling_or_token()
        .and_then(SyntaxElement::into_token)
        .filter(|token| token.kind() == SyntaxKind::WHITESPACE);

    let layout = whitespace.as_ref().and_then(line_layout);
    let to_insert: Vec<SyntaxElement> = match layout {
        Some((newline, mut indent)) => {
            let empty = whitespace
                .and_then(|token| token.next_sibling_or_token())
                .is_some_and(|next| next.kind() == SyntaxKind::RIGHT_CURLY);
            if empty {
                indent.push_str("  ");
            }
            let separator = make::whitespace(&format!("{newline}{indent}"));
            vec![separator.into(), statement.into()]
        }
        None => {
            let mut elements = vec![make::whitespace(" ").into(), statement.into()];
            if whitespace.is_none() {
                elements.push(make::whitespace(" ").into());
            }
            elements
        }
    };

    block.syntax().splice_children(index..index, to_insert);
    true
}

/// The line break and trailing indentation of a whitespace token, if it
/// spans lines.
fn line_layout(token: &SyntaxToken) -> Option<(&'static str, String)> {
    let text = token.text();
    let (index, terminator) =
        text.char_indices().filter(|(_, c)| is_line_terminator(*c)).last()?;
    let newline = if text.contains("\r\n") { "\r\n" } else { "\n" };
    let indent = text[index + terminator.len_utf8()..].to_string();
    Some((newline, indent))
}

fn is_line_terminator(c: char) -> bool {
    matches!(c, '\n' | '\r' | '\u{2028}' | '\u{2029}')
}

/// `while (x);` becomes `while (x) { guard }`.
fn replace_empty(empty: &SyntaxNode, guard: &str) {
    let Some(parent) = empty.parent() else {
        return;
    };

    let index = empty.index();
    let block = make::guarded_block(guard);

    let spaced = empty
        .prev_sibling_or_token()
        .is_some_and(|previous| previous.kind() == SyntaxKind::WHITESPACE);

    let mut to_insert: Vec<SyntaxElement> = vec![];
    if !spaced {
        to_insert.push(make::whitespace(" ").into());
    }
    to_insert.push(block.syntax().clone().into());

    parent.splice_children(index..index + 1, to_insert);
}

/// `while (x) y();` becomes `while (x) { guard y(); }`.
fn wrap(statement: &SyntaxNode, guard: &str) {
    let Some(parent) = statement.parent() else {
        return;
    };

    let index = statement.index();
    let block = make::guarded_block(guard);
    let replacement: Vec<SyntaxElement> = vec![block.syntax().clone().into()];
    parent.splice_children(index..index + 1, replacement);

    let Some(right_curly) = block.right_curly() else {
        return;
    };
    let index = right_curly.index() - 1;
    let to_insert: Vec<SyntaxElement> =
        vec![make::whitespace(" ").into(), statement.clone().into()];
    block.syntax().splice_children(index..index, to_insert);
}

/// Removes a guard statement along with the whitespace that separates it
/// from the previous element.
pub(crate) fn remove(statement: &SyntaxNode) {
    let whitespace = statement
        .prev_sibling_or_token()
        .and_then(SyntaxElement::into_token)
        .filter(|token| token.kind() == SyntaxKind::WHITESPACE);
    if let Some(whitespace) = whitespace {
        whitespace.detach();
    }
    statement.detach();
}
