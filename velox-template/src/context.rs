use crate::error::{ParseError, ParseErrorKind, Position};
use crate::options::CompilerOptions;

/// Cursor over the unconsumed template text.
///
/// Productions only ever move forward; `rest()` is always a suffix of the
/// template source, so the consumed length doubles as the error offset.
pub struct ParserContext<'a> {
    source: &'a str,
    offset: usize,
    pub options: &'a CompilerOptions,
}

impl<'a> ParserContext<'a> {
    pub fn new(source: &'a str, options: &'a CompilerOptions) -> Self {
        Self {
            source,
            offset: 0,
            options,
        }
    }

    pub fn rest(&self) -> &'a str {
        &self.source[self.offset..]
    }

    pub fn is_empty(&self) -> bool {
        self.offset >= self.source.len()
    }

    pub fn starts_with(&self, pat: &str) -> bool {
        self.rest().starts_with(pat)
    }

    pub fn offset(&self) -> usize {
        self.offset
    }

    pub fn advance_by(&mut self, n: usize) {
        self.offset = (self.offset + n).min(self.source.len());
    }

    /// Consume `n` bytes and return them.
    pub fn take(&mut self, n: usize) -> &'a str {
        let s = &self.rest()[..n];
        self.advance_by(n);
        s
    }

    pub fn advance_spaces(&mut self) {
        let n = self
            .rest()
            .bytes()
            .take_while(|b| is_html_space(*b))
            .count();
        self.advance_by(n);
    }

    pub fn error(&self, kind: ParseErrorKind) -> ParseError {
        self.error_at(kind, self.offset)
    }

    pub fn error_at(&self, kind: ParseErrorKind, offset: usize) -> ParseError {
        ParseError {
            kind,
            position: Position::locate(self.source, offset),
        }
    }
}

/// The HTML whitespace set: tab, LF, FF, CR and space.
pub fn is_html_space(b: u8) -> bool {
    matches!(b, b'\t' | b'\n' | b'\x0c' | b'\r' | b' ')
}
