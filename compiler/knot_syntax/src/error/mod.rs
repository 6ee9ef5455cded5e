//! Syntax errors with lazily computed positions.

use std::fmt;
use std::sync::Arc;

/// What went wrong while tokenizing.
#[derive(Copy, Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum SyntaxErrorKind {
    #[error("unexpected character")]
    UnexpectedChar,

    #[error("separator outside of an argument list")]
    UnexpectedSeparator,

    #[error("closing parenthesis without an open argument list")]
    UnexpectedClose,

    #[error("quote after unquoted text")]
    QuoteAfterToken,

    #[error("unterminated string")]
    UnterminatedString,

    #[error("escape does not resolve")]
    DanglingEscape,

    #[error("escape is not a valid code point")]
    InvalidCodePoint,

    #[error("missing ')'")]
    UnclosedList,
}

/// 1-based line and column (in characters).
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Location {
    pub line: usize,
    pub column: usize,
}

/// A parse failure.
///
/// Carries the byte offset, the offending character when there is one, and
/// the source text so the line and column can be derived on demand.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SyntaxError {
    pub kind: SyntaxErrorKind,
    pub offset: usize,
    pub found: Option<char>,
    source: Arc<str>,
}

impl SyntaxError {
    pub(crate) fn new(
        kind: SyntaxErrorKind,
        source: &str,
        offset: usize,
        found: Option<char>,
    ) -> Self {
        SyntaxError {
            kind,
            offset,
            found,
            source: Arc::from(source),
        }
    }

    pub fn source_text(&self) -> &str {
        &self.source
    }

    /// Scan for line breaks up to the offset.
    pub fn location(&self) -> Location {
        let bytes = self.source.as_bytes();
        let offset = self.offset.min(bytes.len());
        let line = 1 + memchr::memchr_iter(b'\n', &bytes[..offset]).count();
        let line_start = memchr::memrchr(b'\n', &bytes[..offset]).map_or(0, |nl| nl + 1);
        let column = 1 + self.source[line_start..offset].chars().count();
        Location { line, column }
    }
}

impl fmt::Display for SyntaxError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Location { line, column } = self.location();
        write!(f, "{}", self.kind)?;
        // The other kinds already name the character.
        if let (SyntaxErrorKind::UnexpectedChar | SyntaxErrorKind::QuoteAfterToken, Some(c)) =
            (self.kind, self.found)
        {
            write!(f, " '{}'", c.escape_debug())?;
        }
        write!(f, " at line {line}, column {column}")
    }
}

impl std::error::Error for SyntaxError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.kind)
    }
}
