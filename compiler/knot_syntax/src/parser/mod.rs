//! Character-driven state machine parser.
//!
//! Nodes are built bottom-up: an open argument list collects its children,
//! and the call node is allocated when the list closes. The parser never
//! recurses, so nesting depth is bounded by memory only.

use knot_ir::{NodeId, Scalar, Tree};

use crate::error::{SyntaxError, SyntaxErrorKind};
use crate::escape::{is_ignorable, resolve_letter};
use crate::literal::classify;

/// Tokenizer states.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum State {
    /// Accumulating a bare token, or between tokens.
    Expression,
    /// Just closed a list: only `,`, `)`, comments and blanks may follow.
    AfterClosingParen,
    /// Just closed a quoted string: only `(`, `,`, `)`, comments and blanks may follow.
    AfterQuotedString,
    /// After a `\` outside of a string.
    Escape,
    InString,
    /// After a `\` inside a string.
    InStringEscape,
    InStringEscapeOctal { value: u32, digits: u8 },
    InStringEscapeHex { letter: char, value: u32, digits: u8, width: u8 },
}

/// Whether the current character was consumed or must be fed again.
enum Step {
    Next,
    Again,
}

/// An argument list that has been opened but not yet closed.
struct OpenList {
    tag: Scalar,
    children: Vec<NodeId>,
    /// Byte offset of the `(`.
    start: usize,
}

struct Parser<'src, 'tree> {
    source: &'src str,
    tree: &'tree mut Tree,
    state: State,
    token: String,
    quoted: bool,
    quote: char,
    /// Byte offset of the opening quote of the current string.
    quote_start: usize,
    /// A `,` was seen since the innermost list opened or a child list closed.
    after_separator: bool,
    in_comment: bool,
    open: Vec<OpenList>,
    root: Option<NodeId>,
}

/// Parse `source` and append its nodes to `tree`.
///
/// Returns the root node, or `None` for a document without a program.
pub fn parse_into(tree: &mut Tree, source: &str) -> Result<Option<NodeId>, SyntaxError> {
    let mut parser = Parser::new(tree, source);
    for (offset, c) in source.char_indices() {
        loop {
            match parser.step(offset, c)? {
                Step::Next => break,
                Step::Again => {}
            }
        }
    }
    parser.finish()
}

impl<'src, 'tree> Parser<'src, 'tree> {
    fn new(tree: &'tree mut Tree, source: &'src str) -> Self {
        Parser {
            source,
            tree,
            state: State::Expression,
            token: String::new(),
            quoted: false,
            quote: '"',
            quote_start: 0,
            after_separator: false,
            in_comment: false,
            open: Vec::new(),
            root: None,
        }
    }

    fn error(&self, kind: SyntaxErrorKind, offset: usize, found: Option<char>) -> SyntaxError {
        SyntaxError::new(kind, self.source, offset, found)
    }

    fn step(&mut self, offset: usize, c: char) -> Result<Step, SyntaxError> {
        if self.in_comment {
            if c == '\n' {
                self.in_comment = false;
            }
            return Ok(Step::Next);
        }

        match self.state {
            State::Expression => self.expression(offset, c),
            State::AfterClosingParen => self.after_closing_paren(offset, c),
            State::AfterQuotedString => self.after_quoted_string(offset, c),
            State::Escape => {
                self.token.push(c);
                self.state = State::Expression;
                Ok(Step::Next)
            }
            State::InString => {
                if c == self.quote {
                    self.state = State::AfterQuotedString;
                } else if c == '\\' {
                    self.state = State::InStringEscape;
                } else {
                    self.token.push(c);
                }
                Ok(Step::Next)
            }
            State::InStringEscape => {
                self.string_escape(c);
                Ok(Step::Next)
            }
            State::InStringEscapeOctal { value, digits } => Ok(self.octal_escape(c, value, digits)),
            State::InStringEscapeHex {
                letter,
                value,
                digits,
                width,
            } => self.hex_escape(offset, c, letter, value, digits, width),
        }
    }

    fn expression(&mut self, offset: usize, c: char) -> Result<Step, SyntaxError> {
        match c {
            '(' => {
                if self.open.is_empty() && self.root.is_some() {
                    return Err(self.error(SyntaxErrorKind::UnexpectedChar, offset, Some(c)));
                }
                let tag = self.take_token().unwrap_or(Scalar::Nil);
                self.open.push(OpenList {
                    tag,
                    children: Vec::new(),
                    start: offset,
                });
                self.after_separator = false;
            }
            ',' => {
                if self.open.is_empty() {
                    return Err(self.error(SyntaxErrorKind::UnexpectedSeparator, offset, Some(c)));
                }
                let tag = self.take_token().unwrap_or(Scalar::Nil);
                let child = self.tree.new_node(tag);
                self.push_child(child);
                self.after_separator = true;
            }
            ')' => {
                let Some(list) = self.open.pop() else {
                    return Err(self.error(SyntaxErrorKind::UnexpectedClose, offset, Some(c)));
                };
                let mut children = list.children;
                match self.take_token() {
                    Some(tag) => children.push(self.tree.new_node(tag)),
                    // `f(a,)` keeps an explicit trailing empty argument; `f()` has none.
                    None if self.after_separator => children.push(self.tree.new_node(Scalar::Nil)),
                    None => {}
                }
                let node = self.tree.new_call(list.tag, &children);
                if self.open.is_empty() {
                    self.root = Some(node);
                } else {
                    self.push_child(node);
                }
                self.after_separator = false;
                self.state = State::AfterClosingParen;
            }
            '"' | '\'' => {
                if self.quoted || !self.token.chars().all(is_ignorable) {
                    return Err(self.error(SyntaxErrorKind::QuoteAfterToken, offset, Some(c)));
                }
                self.token.clear();
                self.quoted = true;
                self.quote = c;
                self.quote_start = offset;
                self.state = State::InString;
            }
            '\\' => self.state = State::Escape,
            ';' => self.in_comment = true,
            _ => self.token.push(c),
        }
        Ok(Step::Next)
    }

    fn after_closing_paren(&mut self, offset: usize, c: char) -> Result<Step, SyntaxError> {
        match c {
            ',' => {
                if self.open.is_empty() {
                    return Err(self.error(SyntaxErrorKind::UnexpectedSeparator, offset, Some(c)));
                }
                self.after_separator = true;
                self.state = State::Expression;
            }
            ')' => {
                self.state = State::Expression;
                return Ok(Step::Again);
            }
            ';' => self.in_comment = true,
            c if is_ignorable(c) => {}
            _ => return Err(self.error(SyntaxErrorKind::UnexpectedChar, offset, Some(c))),
        }
        Ok(Step::Next)
    }

    fn after_quoted_string(&mut self, offset: usize, c: char) -> Result<Step, SyntaxError> {
        match c {
            '(' | ',' | ')' => {
                self.state = State::Expression;
                return Ok(Step::Again);
            }
            ';' => self.in_comment = true,
            c if is_ignorable(c) => {}
            _ => return Err(self.error(SyntaxErrorKind::UnexpectedChar, offset, Some(c))),
        }
        Ok(Step::Next)
    }

    fn string_escape(&mut self, c: char) {
        self.state = match c {
            '0'..='7' => State::InStringEscapeOctal {
                value: u32::from(c) - u32::from('0'),
                digits: 1,
            },
            'x' | 'u' | 'U' => State::InStringEscapeHex {
                letter: c,
                value: 0,
                digits: 0,
                width: match c {
                    'x' => 2,
                    'u' => 4,
                    _ => 8,
                },
            },
            _ => {
                self.token.push(resolve_letter(c).unwrap_or(c));
                State::InString
            }
        };
    }

    /// Up to three octal digits in total.
    fn octal_escape(&mut self, c: char, value: u32, digits: u8) -> Step {
        match c.to_digit(8) {
            Some(digit) if digits < 3 => {
                let value = value * 8 + digit;
                if digits + 1 == 3 {
                    self.push_code(value);
                    self.state = State::InString;
                } else {
                    self.state = State::InStringEscapeOctal {
                        value,
                        digits: digits + 1,
                    };
                }
                Step::Next
            }
            _ => {
                self.push_code(value);
                self.state = State::InString;
                Step::Again
            }
        }
    }

    fn hex_escape(
        &mut self,
        offset: usize,
        c: char,
        letter: char,
        value: u32,
        digits: u8,
        width: u8,
    ) -> Result<Step, SyntaxError> {
        if let Some(digit) = c.to_digit(16) {
            let value = value * 16 + digit;
            if digits + 1 == width {
                self.push_code_point(offset, value)?;
                self.state = State::InString;
            } else {
                self.state = State::InStringEscapeHex {
                    letter,
                    value,
                    digits: digits + 1,
                    width,
                };
            }
            return Ok(Step::Next);
        }

        // A short run ends at the first non-hex character.
        if digits == 0 {
            self.token.push(letter);
        } else {
            self.push_code_point(offset, value)?;
        }
        self.state = State::InString;
        Ok(Step::Again)
    }

    /// Octal escapes never exceed `0o777`, which is always a valid char.
    fn push_code(&mut self, value: u32) {
        self.token
            .push(char::from_u32(value).unwrap_or(char::REPLACEMENT_CHARACTER));
    }

    fn push_code_point(&mut self, offset: usize, value: u32) -> Result<(), SyntaxError> {
        match char::from_u32(value) {
            Some(c) => {
                self.token.push(c);
                Ok(())
            }
            None => Err(self.error(SyntaxErrorKind::InvalidCodePoint, offset, None)),
        }
    }

    fn push_child(&mut self, child: NodeId) {
        if let Some(list) = self.open.last_mut() {
            list.children.push(child);
        }
    }

    /// Take the pending token as a tag, or `None` if nothing was written.
    fn take_token(&mut self) -> Option<Scalar> {
        let token = std::mem::take(&mut self.token);
        if std::mem::replace(&mut self.quoted, false) {
            return Some(Scalar::Str(token));
        }
        let trimmed = token.trim_matches(is_ignorable);
        if trimmed.is_empty() {
            None
        } else {
            Some(classify(trimmed))
        }
    }

    fn finish(mut self) -> Result<Option<NodeId>, SyntaxError> {
        match self.state {
            State::InString
            | State::InStringEscape
            | State::InStringEscapeOctal { .. }
            | State::InStringEscapeHex { .. } => {
                return Err(self.error(
                    SyntaxErrorKind::UnterminatedString,
                    self.quote_start,
                    Some(self.quote),
                ));
            }
            State::Escape => {
                return Err(self.error(
                    SyntaxErrorKind::DanglingEscape,
                    self.source.len(),
                    None,
                ));
            }
            State::Expression | State::AfterClosingParen | State::AfterQuotedString => {}
        }

        if let Some(list) = self.open.last() {
            return Err(self.error(SyntaxErrorKind::UnclosedList, list.start, Some('(')));
        }

        if let Some(root) = self.root {
            return Ok(Some(root));
        }
        Ok(self.take_token().map(|tag| self.tree.new_node(tag)))
    }
}
