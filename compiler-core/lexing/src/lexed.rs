//! The lexer's output type.

use std::ops::Range;

use syntax::SyntaxKind;

use crate::Position;

/// A sequence of [`SyntaxKind`]s.
pub struct Lexed<'a> {
    source: &'a str,
    kinds: Vec<SyntaxKind>,
    positions: Vec<Position>,
    errors: Vec<LexError>,
}

#[derive(Debug)]
pub struct LexError {
    message: String,
    index: u32,
}

impl<'a> Lexed<'a> {
    pub(crate) fn new(source: &'a str) -> Lexed<'a> {
        let kinds = vec![];
        let positions = vec![];
        let errors = vec![];
        Lexed { source, kinds, positions, errors }
    }

    pub(crate) fn push(&mut self, kind: SyntaxKind, position: Position, error: Option<&str>) {
        let index = self.kinds.len() as u32;

        self.kinds.push(kind);
        self.positions.push(position);

        if let Some(error) = error {
            let message = error.to_string();
            self.errors.push(LexError { message, index });
        }
    }

    pub fn source(&self) -> &'a str {
        self.source
    }

    /// # Invariant
    ///
    /// [`Lexed`] always contains [`SyntaxKind::END_OF_FILE`] as its final element.
    /// It exclusively serves as an anchor for the final offset such that methods
    /// can compute the range for a token in a given index. With this in mind, we
    /// make sure that this token is hidden.
    ///
    /// For example, given `"hello"`
    ///
    /// ```rs
    /// // with END_OF_FILE, 0..5
    /// [(IDENTIFIER, 0), (END_OF_FILE, 5)]
    ///
    /// // without END_OF_FILE, 0..?
    /// [(IDENTIFIER, 0)]
    /// ```
    pub fn len(&self) -> usize {
        self.kinds.len() - 1
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the kind for an index.
    pub fn kind(&self, index: usize) -> SyntaxKind {
        assert!(index < self.len());
        self.kinds[index]
    }

    /// Returns the position for an index, including the end of file anchor.
    pub fn position(&self, index: usize) -> Position {
        assert!(index <= self.len());
        self.positions[index]
    }

    /// Returns the position of the token starting at `offset`, or of the
    /// token containing it.
    pub fn position_at(&self, offset: usize) -> Position {
        let index = match self.positions.binary_search_by_key(&offset, |p| p.offset) {
            Ok(index) => index,
            Err(index) => index.saturating_sub(1),
        };
        self.positions[index]
    }

    /// Returns the text for an index.
    pub fn text(&self, index: usize) -> &'a str {
        self.text_in_range(index..index + 1)
    }

    /// Returns the text for a range.
    pub fn text_in_range(&self, range: Range<usize>) -> &'a str {
        assert!(range.start < range.end && range.end <= self.len());
        let low = self.positions[range.start].offset;
        let high = self.positions[range.end].offset;
        &self.source[low..high]
    }

    /// Returns the error for an index.
    pub fn error(&self, index: usize) -> Option<&str> {
        assert!(index <= self.len());
        let error_index = self.errors.binary_search_by_key(&(index as u32), |v| v.index).ok()?;
        Some(&self.errors[error_index].message)
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }
}
