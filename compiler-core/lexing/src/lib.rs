mod input;
mod lexed;
mod lexer;

pub use input::Input;
pub use lexed::Lexed;

/// A location in the source text.
///
/// Lines are 1-based. Columns are 0-based and counted in UTF-16 code units,
/// which is how JavaScript engines and tooling report them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Position {
    pub offset: usize,
    pub line: u32,
    pub column: u32,
}

pub fn lex(source: &str) -> Lexed<'_> {
    let mut lexer = lexer::Lexer::new(source);
    while !lexer.is_eof() {
        lexer.take_token();
    }
    lexer.finish()
}

/// Strips trivia from the lexed tokens, keeping track of line breaks for
/// automatic semicolon insertion.
pub fn significant(lexed: &Lexed) -> Input {
    Input::new(lexed)
}
