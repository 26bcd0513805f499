use std::sync::Arc;

use lexing::Lexed;
use rowan::GreenNodeBuilder;
use syntax::SyntaxKind;

use crate::{ParseError, ParsedSource};

#[derive(Debug)]
pub(crate) enum Output {
    Start { kind: SyntaxKind },
    Token { kind: SyntaxKind },
    Error { message: Arc<str> },
    Finish,
}

struct Builder<'l, 's> {
    lexed: &'l Lexed<'s>,
    index: usize,
    depth: usize,
    builder: GreenNodeBuilder<'static>,
    errors: Vec<ParseError>,
}

impl<'l, 's> Builder<'l, 's> {
    fn new(lexed: &'l Lexed<'s>) -> Builder<'l, 's> {
        let index = 0;
        let depth = 0;
        let builder = GreenNodeBuilder::new();
        let errors = vec![];
        Builder { lexed, index, depth, builder, errors }
    }

    fn build(self) -> (ParsedSource, Vec<ParseError>) {
        let node = self.builder.finish();
        (ParsedSource::new(node), self.errors)
    }

    fn start(&mut self, kind: SyntaxKind) {
        if kind == SyntaxKind::Node {
            return;
        }
        // Leading trivia belongs to the root, everything else attaches
        // before the node that follows it.
        if self.depth > 0 {
            self.eat_trivia();
        }
        self.builder.start_node(kind.into());
        self.depth += 1;
    }

    fn token(&mut self, kind: SyntaxKind) {
        self.eat_trivia();
        self.push(kind);
    }

    fn error(&mut self, message: impl Into<Arc<str>>) {
        let index = self.next_significant();
        let position = self.lexed.position(index);
        let offset = position.offset;
        let message = message.into();
        self.builder.token(SyntaxKind::ERROR.into(), "");
        self.errors.push(ParseError { offset, position, message });
    }

    fn finish(&mut self) {
        if self.depth == 1 {
            self.eat_trivia();
        }
        self.builder.finish_node();
        self.depth -= 1;
    }

    fn push(&mut self, kind: SyntaxKind) {
        if let Some(message) = self.lexed.error(self.index) {
            let position = self.lexed.position(self.index);
            let offset = position.offset;
            let message = Arc::from(message);
            self.errors.push(ParseError { offset, position, message });
        }

        let text = self.lexed.text(self.index);
        self.builder.token(kind.into(), text);

        self.index += 1;
    }

    fn eat_trivia(&mut self) {
        while self.index < self.lexed.len() {
            let kind = self.lexed.kind(self.index);
            if !kind.is_whitespace_or_comment() {
                break;
            }
            self.push(kind);
        }
    }

    fn next_significant(&self) -> usize {
        let mut index = self.index;
        while index < self.lexed.len() && self.lexed.kind(index).is_whitespace_or_comment() {
            index += 1;
        }
        index
    }
}

pub(crate) fn build(lexed: &Lexed<'_>, output: Vec<Output>) -> (ParsedSource, Vec<ParseError>) {
    let mut builder = Builder::new(lexed);

    for event in output {
        match event {
            Output::Start { kind } => builder.start(kind),
            Output::Token { kind } => builder.token(kind),
            Output::Error { message } => builder.error(message),
            Output::Finish => builder.finish(),
        }
    }

    builder.build()
}
