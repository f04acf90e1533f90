//! Scanner that splits text into positioned tokens.
//!
//! The scan recognizes three kinds of tokens:
//!
//! - **Words**: runs of letters, digits, `_` and `/`. A `.` or `-` is kept
//!   inside a word when another word character follows, so `1.04.02`,
//!   `4.VEL/123` and `e-mail` are single words while the full stop in `end.`
//!   is not.
//! - **Markup**: a `<...>` span, including any embedded whitespace, kept
//!   verbatim and flagged as ignored.
//! - **Punctuation**: any other single non-whitespace character.
//!
//! Only words advance the word position, the coordinate space shared by the
//! inverted index, phrase matching and highlighting.

use std::iter::Peekable;
use std::str::CharIndices;

use super::analyzer::{Analyzer, is_combining_mark};
use super::token::{Token, TokenStream};

/// Splits text into [`Token`]s, normalizing every word with an [`Analyzer`].
#[derive(Debug, Clone, Copy, Default)]
pub struct Tokenizer {
    analyzer: Analyzer,
}

impl Tokenizer {
    pub fn new() -> Self {
        Tokenizer {
            analyzer: Analyzer::new(),
        }
    }

    pub fn analyzer(&self) -> &Analyzer {
        &self.analyzer
    }

    /// Starts a new scan over `text`.
    ///
    /// The returned iterator is single-pass; positions start at 1 for every
    /// call.
    pub fn tokenize<'a>(&self, text: &'a str) -> TokenIter<'a> {
        TokenIter::new(text, self.analyzer)
    }

    /// Scans the complete text into a [`TokenStream`].
    pub fn collect_stream<'a>(&self, text: &'a str) -> TokenStream<'a> {
        self.tokenize(text).collect()
    }
}

/// Iterator over the tokens of one text.
pub struct TokenIter<'a> {
    input: &'a str,
    chars: Peekable<CharIndices<'a>>,
    analyzer: Analyzer,
    position: u32,
    word_position: u32,
}

impl<'a> TokenIter<'a> {
    fn new(input: &'a str, analyzer: Analyzer) -> Self {
        TokenIter {
            input,
            chars: input.char_indices().peekable(),
            analyzer,
            position: 0,
            word_position: 0,
        }
    }

    fn peek_char(&mut self) -> Option<char> {
        self.chars.peek().map(|&(_, ch)| ch)
    }

    fn current_offset(&mut self) -> usize {
        self.chars
            .peek()
            .map(|&(pos, _)| pos)
            .unwrap_or(self.input.len())
    }

    /// Consumes a word starting with the already consumed first character.
    fn scan_word(&mut self) {
        while let Some(ch) = self.peek_char() {
            if is_word_char(ch) {
                self.chars.next();
                continue;
            }
            if ch == '.' || ch == '-' {
                let mut ahead = self.chars.clone();
                ahead.next();
                if ahead.peek().is_some_and(|&(_, next)| is_word_char(next)) {
                    self.chars.next();
                    continue;
                }
            }
            break;
        }
    }

    /// Consumes a markup span up to and including the closing `>`.
    ///
    /// Returns `false` without consuming anything if the span is unterminated.
    fn scan_markup(&mut self, start: usize) -> bool {
        match self.input[start..].find('>') {
            Some(close) => {
                let end = start + close + 1;
                while self.current_offset() < end {
                    self.chars.next();
                }
                true
            }
            None => false,
        }
    }
}

impl<'a> Iterator for TokenIter<'a> {
    type Item = Token<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        while self.peek_char().is_some_and(char::is_whitespace) {
            self.chars.next();
        }
        let (start, first) = self.chars.next()?;

        let mut ignored = false;
        let mut punctuation = false;
        if first == '<' && self.scan_markup(start) {
            ignored = true;
        } else if is_word_char(first) {
            self.scan_word();
        } else {
            punctuation = true;
        }

        let end = self.current_offset();
        let raw_text = &self.input[start..end];
        self.position += 1;
        let word_position = if ignored || punctuation {
            0
        } else {
            self.word_position += 1;
            self.word_position
        };
        let normal = if ignored {
            String::new()
        } else {
            self.analyzer.transform(raw_text)
        };

        Some(Token {
            raw_text,
            normal,
            position: self.position,
            word_position,
            offset_start: start,
            offset_end: end,
            ignored,
            punctuation,
            trailing_space: self.peek_char().is_some_and(char::is_whitespace),
        })
    }
}

#[inline]
fn is_word_char(ch: char) -> bool {
    ch.is_alphanumeric() || ch == '_' || ch == '/' || is_combining_mark(ch)
}
