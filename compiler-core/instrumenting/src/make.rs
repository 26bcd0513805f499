//! Detached, mutable syntax built from text.

use rowan::ast::AstNode;
use syntax::{SyntaxNode, SyntaxToken, cst};

fn parse_for_update(text: &str) -> SyntaxNode {
    let (parsed, _) = parsing::parse_source(text);
    parsed.syntax_node().clone_for_update()
}

/// The text of a guard call statement.
pub(crate) fn guard_call(helper: &str, tag: &str) -> String {
    if tag.is_empty() {
        return format!("globalThis.{helper}();");
    }
    let literal = serde_json::Value::String(tag.to_string());
    format!("globalThis.{helper}({literal});")
}

pub(crate) fn whitespace(text: &str) -> SyntaxToken {
    let root = parse_for_update(text);
    let token = root.first_token().expect("invariant violated: expected WHITESPACE");
    token.detach();
    token
}

pub(crate) fn statement(text: &str) -> cst::Statement {
    let root = parse_for_update(text);
    let statement = root
        .children()
        .find_map(cst::Statement::cast)
        .expect("invariant violated: expected a statement");
    statement.syntax().detach();
    statement
}

/// `{ <guard> }`
pub(crate) fn guarded_block(guard: &str) -> cst::Block {
    let root = parse_for_update(&format!("{{ {guard} }}"));
    let block = root
        .children()
        .find_map(cst::Block::cast)
        .expect("invariant violated: expected a block");
    block.syntax().detach();
    block
}
