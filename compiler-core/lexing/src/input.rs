//! The input type for the parser.

use syntax::SyntaxKind;

use crate::Lexed;

/// Significant tokens, each paired with whether a line break precedes it.
///
/// The final element is always [`SyntaxKind::END_OF_FILE`].
pub struct Input {
    kinds: Vec<SyntaxKind>,
    newlines: Vec<bool>,
}

impl Input {
    pub(crate) fn new(lexed: &Lexed) -> Input {
        let mut kinds = vec![];
        let mut newlines = vec![];

        let mut newline = false;
        for index in 0..lexed.len() {
            let kind = lexed.kind(index);
            if kind.is_whitespace_or_comment() {
                let text = lexed.text(index);
                newline |= text.contains(['\n', '\r', '\u{2028}', '\u{2029}']);
            } else {
                kinds.push(kind);
                newlines.push(newline);
                newline = false;
            }
        }

        kinds.push(SyntaxKind::END_OF_FILE);
        newlines.push(newline);

        Input { kinds, newlines }
    }

    pub fn len(&self) -> usize {
        self.kinds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.kinds.len() == 1
    }

    pub fn kind(&self, index: usize) -> SyntaxKind {
        self.kinds.get(index).copied().unwrap_or(SyntaxKind::END_OF_FILE)
    }

    pub fn kinds(&self) -> &[SyntaxKind] {
        &self.kinds
    }

    /// Whether a line terminator appears between this token and the previous one.
    pub fn newline_before(&self, index: usize) -> bool {
        self.newlines.get(index).copied().unwrap_or(true)
    }
}
