use std::fmt;

use ahash::AHashSet;

use crate::highlight::HighlighterConfig;

/// A single scanned unit of text.
///
/// Tokens borrow their raw text from the scanned input. Word tokens carry a
/// 1-based `word_position` that is the coordinate used by the inverted index;
/// punctuation and markup tokens have `word_position == 0`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token<'a> {
    pub(crate) raw_text: &'a str,
    pub(crate) normal: String,
    pub(crate) position: u32,
    pub(crate) word_position: u32,
    pub(crate) offset_start: usize,
    pub(crate) offset_end: usize,
    pub(crate) ignored: bool,
    pub(crate) punctuation: bool,
    pub(crate) trailing_space: bool,
}

impl<'a> Token<'a> {
    /// The token exactly as it appears in the input.
    pub fn raw_text(&self) -> &'a str {
        self.raw_text
    }

    /// The normalized term. Empty for markup tokens.
    pub fn normal(&self) -> &str {
        &self.normal
    }

    /// 1-based index of the token in the scan, counting every token.
    pub fn position(&self) -> u32 {
        self.position
    }

    /// 1-based index over word tokens only, `0` for punctuation and markup.
    pub fn word_position(&self) -> u32 {
        self.word_position
    }

    /// Byte offset of the first byte of the token.
    pub fn offset_start(&self) -> usize {
        self.offset_start
    }

    /// Byte offset one past the last byte of the token.
    pub fn offset_end(&self) -> usize {
        self.offset_end
    }

    /// Markup span (`<...>`) carried through verbatim.
    pub fn is_ignored(&self) -> bool {
        self.ignored
    }

    pub fn is_punctuation(&self) -> bool {
        self.punctuation
    }

    /// Whether the character following the token is whitespace.
    pub fn has_trailing_space(&self) -> bool {
        self.trailing_space
    }

    /// Whether the token contributes a term to an index.
    pub fn is_indexable(&self) -> bool {
        !self.ignored && !self.punctuation && !self.normal.is_empty()
    }
}

/// All tokens produced by one scan of a text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TokenStream<'a> {
    tokens: Vec<Token<'a>>,
}

impl<'a> TokenStream<'a> {
    pub fn new(tokens: Vec<Token<'a>>) -> Self {
        TokenStream { tokens }
    }

    pub fn tokens(&self) -> &[Token<'a>] {
        &self.tokens
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Token<'a>> {
        self.tokens.iter()
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Iterates over the tokens that contribute a term to an index.
    pub fn indexable(&self) -> impl Iterator<Item = &Token<'a>> {
        self.tokens.iter().filter(|token| token.is_indexable())
    }

    /// Rebuilds the text, wrapping each word token whose word position is in
    /// `positions` with the configured markup.
    ///
    /// Markup tokens are emitted verbatim and never wrapped. Spacing follows
    /// the `trailing_space` flag of each token.
    pub fn highlight(&self, positions: &AHashSet<u32>, config: &HighlighterConfig) -> String {
        let start_tag = config.start_tag();
        let end_tag = config.end_tag();
        let mut output = String::with_capacity(self.text_len_hint());
        for token in &self.tokens {
            let wrap = !token.ignored
                && token.word_position > 0
                && positions.contains(&token.word_position);
            if wrap {
                output.push_str(&start_tag);
                output.push_str(token.raw_text);
                output.push_str(&end_tag);
            } else {
                output.push_str(token.raw_text);
            }
            if token.trailing_space {
                output.push(' ');
            }
        }
        output
    }

    fn text_len_hint(&self) -> usize {
        self.tokens.last().map(|t| t.offset_end + 1).unwrap_or(0)
    }
}

impl<'a> IntoIterator for TokenStream<'a> {
    type Item = Token<'a>;
    type IntoIter = std::vec::IntoIter<Token<'a>>;

    fn into_iter(self) -> Self::IntoIter {
        self.tokens.into_iter()
    }
}

impl<'s, 'a> IntoIterator for &'s TokenStream<'a> {
    type Item = &'s Token<'a>;
    type IntoIter = std::slice::Iter<'s, Token<'a>>;

    fn into_iter(self) -> Self::IntoIter {
        self.tokens.iter()
    }
}

impl<'a> FromIterator<Token<'a>> for TokenStream<'a> {
    fn from_iter<I: IntoIterator<Item = Token<'a>>>(iter: I) -> Self {
        TokenStream::new(iter.into_iter().collect())
    }
}

/// Reconstructs the scanned text from raw token text and trailing spaces.
impl fmt::Display for TokenStream<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for token in &self.tokens {
            f.write_str(token.raw_text)?;
            if token.trailing_space {
                f.write_str(" ")?;
            }
        }
        Ok(())
    }
}
