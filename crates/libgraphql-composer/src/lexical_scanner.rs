//! A character-level scanner that classifies every position of a GraphQL
//! document as structural code, string-literal content, or line-comment
//! content.
//!
//! Every text substitution in this crate consults this scanner so that only
//! matches beginning in [`LexicalState::Code`] are rewritten. Text that
//! merely *mentions* a spread or field name inside a `"..."`/`'...'` literal
//! or after a `#` survives untouched.
//!
//! Only line comments and single-line quoted literals are recognized. A
//! quote closes its literal unless the character immediately before it is a
//! `\`, so a literal ending in `\\"` is treated as still open.
//!
//! # Usage
//!
//! ```rust
//! use libgraphql_composer::LexicalScanner;
//! use libgraphql_composer::LexicalState;
//!
//! let source = "{ a(s: \"...X\") # ...Y\n ...Z }";
//! let offset_in_string = source.find("...X").unwrap();
//! let offset_in_code = source.find("...Z").unwrap();
//!
//! assert!(matches!(
//!     LexicalScanner::state_at(source, offset_in_string),
//!     LexicalState::StringLiteral { quote: '"' },
//! ));
//! assert_eq!(
//!     LexicalScanner::state_at(source, offset_in_code),
//!     LexicalState::Code,
//! );
//! ```

use memchr::memmem;

/// The lexical context a position of a document lies in.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum LexicalState {
    Code,
    LineComment,
    StringLiteral { quote: char },
}

/// A single character of a document along with the [`LexicalState`] that
/// was in effect immediately before it was consumed.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct ClassifiedChar {
    pub ch: char,
    pub offset: usize,
    pub state: LexicalState,
}

/// Incremental scanner over a `&str` document.
///
/// The scanner only ever moves forward. Callers that need the state at many
/// increasing offsets (see [`LexicalScanner::code_matches`]) advance a single
/// scanner rather than rescanning from the start each time.
#[derive(Clone, Debug)]
pub struct LexicalScanner<'src> {
    /// The full document being scanned.
    source: &'src str,

    /// Byte offset of the next character to consume.
    curr_byte_offset: usize,

    /// State in effect at `curr_byte_offset`.
    state: LexicalState,

    /// The most recently consumed character, used for the one-character
    /// escape lookback inside string literals.
    prev_char: Option<char>,
}

impl<'src> LexicalScanner<'src> {
    /// Creates a scanner positioned at the start of `source`.
    pub fn new(source: &'src str) -> Self {
        Self {
            source,
            curr_byte_offset: 0,
            state: LexicalState::Code,
            prev_char: None,
        }
    }

    /// Creates a scanner positioned at `offset`, assuming that `offset` is
    /// already known to lie in [`LexicalState::Code`].
    ///
    /// `offset` must be a char boundary of `source`.
    pub fn resume_in_code(source: &'src str, offset: usize) -> Self {
        Self {
            source,
            curr_byte_offset: offset,
            state: LexicalState::Code,
            prev_char: source[..offset].chars().next_back(),
        }
    }

    /// Classifies `offset` by scanning `source` from its start.
    pub fn state_at(source: &'src str, offset: usize) -> LexicalState {
        LexicalScanner::new(source).advance_to(offset)
    }

    /// Returns every byte offset at which `needle` occurs in `source` and
    /// begins in [`LexicalState::Code`], in increasing order.
    ///
    /// Matches may overlap; callers performing replacements skip any offset
    /// that falls inside a previously replaced range.
    pub fn code_matches(
        source: &'src str,
        needle: &'src str,
    ) -> impl Iterator<Item = usize> + 'src {
        let mut scanner = LexicalScanner::new(source);
        memmem::find_iter(source.as_bytes(), needle.as_bytes())
            .filter(move |&offset| scanner.advance_to(offset) == LexicalState::Code)
    }

    /// Byte offset of the next character to be consumed.
    pub fn offset(&self) -> usize {
        self.curr_byte_offset
    }

    /// State in effect at [`LexicalScanner::offset`].
    pub fn state(&self) -> LexicalState {
        self.state
    }

    /// Consumes characters until the scanner reaches `offset` and returns
    /// the state in effect there.
    ///
    /// Offsets behind the current position are not revisited; the current
    /// state is returned as-is.
    pub fn advance_to(&mut self, offset: usize) -> LexicalState {
        debug_assert!(
            offset >= self.curr_byte_offset,
            "LexicalScanner cannot move backwards ({offset} < {})",
            self.curr_byte_offset,
        );
        while self.curr_byte_offset < offset {
            if self.consume().is_none() {
                break;
            }
        }
        self.state
    }

    // =========================================================================
    // Character consumption
    // =========================================================================

    /// Returns the remaining source text to be scanned.
    fn remaining(&self) -> &'src str {
        &self.source[self.curr_byte_offset..]
    }

    /// Peeks at the next character without consuming it.
    pub fn peek_char(&self) -> Option<char> {
        self.remaining().chars().next()
    }

    /// Consumes the next character and applies its state transition.
    ///
    /// Returns `None` at end of input.
    pub fn consume(&mut self) -> Option<ClassifiedChar> {
        let ch = self.peek_char()?;
        let classified = ClassifiedChar {
            ch,
            offset: self.curr_byte_offset,
            state: self.state,
        };

        self.state = match self.state {
            LexicalState::Code => match ch {
                '"' | '\'' => LexicalState::StringLiteral { quote: ch },
                '#' => LexicalState::LineComment,
                _ => LexicalState::Code,
            },

            LexicalState::StringLiteral { quote } => {
                if ch == quote && self.prev_char != Some('\\') {
                    LexicalState::Code
                } else {
                    self.state
                }
            },

            LexicalState::LineComment => match ch {
                '\n' | '\r' => LexicalState::Code,
                _ => LexicalState::LineComment,
            },
        };

        self.prev_char = Some(ch);
        self.curr_byte_offset += ch.len_utf8();
        Some(classified)
    }
}

impl<'src> Iterator for LexicalScanner<'src> {
    type Item = ClassifiedChar;

    fn next(&mut self) -> Option<Self::Item> {
        self.consume()
    }
}

// =============================================================================
// Helper functions
// =============================================================================

/// Returns `true` if `ch` can start a GraphQL name.
pub(crate) fn is_name_start(ch: char) -> bool {
    ch == '_' || ch.is_ascii_alphabetic()
}

/// Returns `true` if `ch` can continue a GraphQL name.
pub(crate) fn is_name_continue(ch: char) -> bool {
    ch == '_' || ch.is_ascii_alphanumeric()
}

/// Returns the byte length of the GraphQL name starting at the beginning of
/// `text`, or `0` if `text` does not start with a name.
pub(crate) fn name_len(text: &str) -> usize {
    let mut chars = text.char_indices();
    match chars.next() {
        Some((_, ch)) if is_name_start(ch) => (),
        _ => return 0,
    }
    chars
        .find(|(_, ch)| !is_name_continue(*ch))
        .map(|(idx, _)| idx)
        .unwrap_or(text.len())
}

/// Returns the number of leading whitespace bytes in `text`.
pub(crate) fn whitespace_len(text: &str) -> usize {
    text.len() - text.trim_start().len()
}

/// Returns the number of leading bytes in `text` taken up by whitespace and
/// `#` line comments.
pub(crate) fn ignored_len(text: &str) -> usize {
    let mut len = 0;
    loop {
        len += whitespace_len(&text[len..]);
        let rest = &text[len..];
        if !rest.starts_with('#') {
            return len;
        }
        len += rest.find(['\n', '\r']).unwrap_or(rest.len());
    }
}
