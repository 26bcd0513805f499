use std::sync::Arc;

use lexing::{Input, Lexed, Position};
use rowan::{GreenNode, ast::AstNode};
use syntax::{SyntaxNode, cst};

mod builder;
mod parser;

#[derive(Debug, PartialEq, Eq)]
pub struct ParseError {
    pub offset: usize,
    pub position: Position,
    pub message: Arc<str>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedSource {
    node: GreenNode,
}

impl ParsedSource {
    pub(crate) fn new(node: GreenNode) -> ParsedSource {
        ParsedSource { node }
    }

    pub fn syntax_node(&self) -> SyntaxNode {
        let node = self.node.clone();
        SyntaxNode::new_root(node)
    }

    pub fn cst(&self) -> cst::Source {
        let node = self.syntax_node();
        cst::Source::cast(node).expect("invariant violated: expected cst::Source")
    }
}

pub type FullParsedSource = (ParsedSource, Arc<[ParseError]>);

pub fn parse(lexed: &Lexed<'_>, input: &Input) -> FullParsedSource {
    let mut parser = parser::Parser::new(input);
    parser::source(&mut parser);

    let output = parser.finish();
    let (parsed, errors) = builder::build(lexed, output);

    (parsed, Arc::from(errors))
}

/// Lexes and parses `source` in one step.
pub fn parse_source(source: &str) -> FullParsedSource {
    let lexed = lexing::lex(source);
    let input = lexing::significant(&lexed);
    parse(&lexed, &input)
}
