use std::sync::Arc;

use drop_bomb::DropBomb;
use lexing::Input;
use syntax::{SyntaxKind, TokenSet};

use crate::builder::Output;

mod expressions;
mod statements;

pub(crate) use statements::source;

pub(crate) struct Parser<'t> {
    index: usize,
    input: &'t Input,
    output: Vec<Output>,
}

impl<'t> Parser<'t> {
    pub(crate) fn new(input: &'t Input) -> Parser<'t> {
        let index = 0;
        let output = vec![];
        Parser { index, input, output }
    }

    pub(crate) fn finish(self) -> Vec<Output> {
        self.output
    }

    fn nth(&self, n: usize) -> SyntaxKind {
        self.input.kind(self.index + n)
    }

    /// The last significant token consumed.
    fn previous(&self) -> Option<SyntaxKind> {
        let index = self.index.checked_sub(1)?;
        Some(self.input.kind(index))
    }

    /// Whether a line break separates the current token from the previous one.
    fn newline_before(&self) -> bool {
        self.nth_newline_before(0)
    }

    fn nth_newline_before(&self, n: usize) -> bool {
        self.input.newline_before(self.index + n)
    }

    fn consume(&mut self) {
        if self.at_eof() {
            return;
        }
        let kind = self.nth(0);
        self.index += 1;
        self.output.push(Output::Token { kind });
    }

    fn start(&mut self) -> NodeMarker {
        let index = self.output.len();
        self.output.push(Output::Start { kind: SyntaxKind::Node });
        NodeMarker::new(index)
    }

    fn error(&mut self, message: impl Into<Arc<str>>) {
        let message = message.into();
        self.output.push(Output::Error { message });
    }

    fn error_recover(&mut self, message: impl Into<Arc<str>>) {
        let mut marker = self.start();
        self.error(message);
        self.consume();
        marker.end(self, SyntaxKind::ERROR);
    }

    fn at(&self, kind: SyntaxKind) -> bool {
        self.nth(0) == kind
    }

    fn at_eof(&self) -> bool {
        self.at(SyntaxKind::END_OF_FILE)
    }

    fn at_in(&self, set: TokenSet) -> bool {
        set.contains(self.nth(0))
    }

    fn eat(&mut self, kind: SyntaxKind) -> bool {
        if !self.at(kind) {
            return false;
        }
        self.consume();
        true
    }

    fn expect(&mut self, kind: SyntaxKind) -> bool {
        if self.eat(kind) {
            return true;
        }
        self.error(format!("expected {kind:?}"));
        false
    }
}

struct NodeMarker {
    index: usize,
    bomb: DropBomb,
}

impl NodeMarker {
    fn new(index: usize) -> NodeMarker {
        let bomb = DropBomb::new("failed to call end or cancel");
        NodeMarker { index, bomb }
    }

    fn end(&mut self, parser: &mut Parser, kind: SyntaxKind) {
        self.bomb.defuse();
        match &mut parser.output[self.index] {
            Output::Start { kind: marker } => {
                *marker = kind;
            }
            _ => unreachable!(),
        }
        parser.output.push(Output::Finish);
    }

    fn cancel(&mut self, parser: &mut Parser) {
        self.bomb.defuse();
        if self.index == parser.output.len() - 1 {
            match parser.output.pop() {
                Some(Output::Start { kind: SyntaxKind::Node }) => (),
                _ => unreachable!(),
            }
        }
    }
}

/// Tokens that close a delimited group.
const CLOSING: TokenSet = TokenSet::new(&[
    SyntaxKind::RIGHT_PARENTHESIS,
    SyntaxKind::RIGHT_SQUARE,
    SyntaxKind::RIGHT_CURLY,
    SyntaxKind::TEMPLATE_MIDDLE,
    SyntaxKind::TEMPLATE_TAIL,
]);
