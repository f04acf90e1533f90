//! Lexical scan of query strings.

use std::iter::Peekable;
use std::str::CharIndices;

use crate::analysis::analyzer::is_combining_mark;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Lexeme<'q> {
    Word(&'q str),
    /// Content between double quotes, without the quotes.
    Phrase(&'q str),
    And,
    Or,
    Not,
    LParen,
    RParen,
    Caret,
    Tilde,
    Star,
    Colon,
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Lexed<'q> {
    pub lexeme: Lexeme<'q>,
    /// Whitespace separates this lexeme from the previous one.
    pub spaced: bool,
}

pub(crate) struct Lexer<'q> {
    input: &'q str,
    chars: Peekable<CharIndices<'q>>,
}

impl<'q> Lexer<'q> {
    pub fn new(input: &'q str) -> Self {
        Lexer {
            input,
            chars: input.char_indices().peekable(),
        }
    }

    fn offset(&mut self) -> usize {
        self.chars
            .peek()
            .map(|&(pos, _)| pos)
            .unwrap_or(self.input.len())
    }

    fn scan_word(&mut self, start: usize) -> &'q str {
        while self
            .chars
            .peek()
            .is_some_and(|&(_, ch)| is_word_char(ch) || ch == '.' || ch == '-')
        {
            self.chars.next();
        }
        &self.input[start..self.offset()]
    }

    fn scan_phrase(&mut self, start: usize) -> &'q str {
        let content_start = start + 1;
        while let Some((pos, ch)) = self.chars.next() {
            match ch {
                '\\' => {
                    self.chars.next();
                }
                '"' => return &self.input[content_start..pos],
                _ => {}
            }
        }
        &self.input[content_start..]
    }
}

impl<'q> Iterator for Lexer<'q> {
    type Item = Lexed<'q>;

    fn next(&mut self) -> Option<Self::Item> {
        let mut spaced = false;
        while self.chars.peek().is_some_and(|&(_, ch)| ch.is_whitespace()) {
            self.chars.next();
            spaced = true;
        }
        let (start, first) = self.chars.next()?;
        let lexeme = match first {
            '"' => Lexeme::Phrase(self.scan_phrase(start)),
            '(' => Lexeme::LParen,
            ')' => Lexeme::RParen,
            '+' => Lexeme::And,
            '|' => Lexeme::Or,
            '-' => Lexeme::Not,
            '^' => Lexeme::Caret,
            '~' => Lexeme::Tilde,
            '*' => Lexeme::Star,
            ':' => Lexeme::Colon,
            ch if is_word_char(ch) => match self.scan_word(start) {
                "AND" => Lexeme::And,
                "OR" => Lexeme::Or,
                "NOT" => Lexeme::Not,
                word => Lexeme::Word(word),
            },
            _ => Lexeme::Other,
        };
        Some(Lexed { lexeme, spaced })
    }
}

#[inline]
fn is_word_char(ch: char) -> bool {
    ch.is_alphanumeric() || ch == '_' || ch == '/' || is_combining_mark(ch)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lexemes(input: &str) -> Vec<Lexeme<'_>> {
        Lexer::new(input).map(|l| l.lexeme).collect()
    }

    #[test]
    fn test_operators_and_words() {
        assert_eq!(
            lexemes("one AND (two | -three)"),
            vec![
                Lexeme::Word("one"),
                Lexeme::And,
                Lexeme::LParen,
                Lexeme::Word("two"),
                Lexeme::Or,
                Lexeme::Not,
                Lexeme::Word("three"),
                Lexeme::RParen,
            ]
        );
    }

    #[test]
    fn test_identifiers() {
        assert_eq!(lexemes("1.04.02"), vec![Lexeme::Word("1.04.02")]);
        assert_eq!(lexemes("4.VEL/123"), vec![Lexeme::Word("4.VEL/123")]);
        assert_eq!(lexemes("well-known"), vec![Lexeme::Word("well-known")]);
        assert_eq!(lexemes("and"), vec![Lexeme::Word("and")]);
    }

    #[test]
    fn test_modifiers_and_spacing() {
        let lexed: Vec<_> = Lexer::new("word~3 \"a b\"^2.5 *fix").collect();
        let kinds: Vec<_> = lexed.iter().map(|l| l.lexeme).collect();
        assert_eq!(
            kinds,
            vec![
                Lexeme::Word("word"),
                Lexeme::Tilde,
                Lexeme::Word("3"),
                Lexeme::Phrase("a b"),
                Lexeme::Caret,
                Lexeme::Word("2.5"),
                Lexeme::Star,
                Lexeme::Word("fix"),
            ]
        );
        let spaced: Vec<_> = lexed.iter().map(|l| l.spaced).collect();
        assert_eq!(
            spaced,
            vec![false, false, false, true, false, false, true, false]
        );
    }

    #[test]
    fn test_unterminated_phrase() {
        assert_eq!(lexemes("\"open end"), vec![Lexeme::Phrase("open end")]);
        assert_eq!(
            lexemes(r#""say \"hi\"" x"#),
            vec![Lexeme::Phrase(r#"say \"hi\""#), Lexeme::Word("x")]
        );
    }
}
