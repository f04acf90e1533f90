//! Text normalization shared by indexing and querying.
//!
//! Every term that enters the index and every value a query compares against
//! passes through the same [`Analyzer`], so both sides agree on a single
//! normal form:
//!
//! 1. Unicode lowercasing
//! 2. Removal of combining diacritical marks (U+0300..U+036F)
//! 3. ASCII folding of Latin-1 and Latin Extended-A letters
//! 4. Trimming of surrounding whitespace and [`TRIM_CHARS`]
//!
//! The transformation is idempotent: applying it to its own output returns
//! the output unchanged.

/// Punctuation removed from both ends of a term.
pub const TRIM_CHARS: &[char] = &[
    '.', ',', ';', ':', '!', '?', '\'', '"', '(', ')', '[', ']', '{', '}', '<', '>', '`',
];

/// Stateless text normalizer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Analyzer;

impl Analyzer {
    pub fn new() -> Self {
        Analyzer
    }

    /// Normalizes a single term.
    ///
    /// # Arguments
    /// * `text` - Raw term text, usually the raw text of one token
    ///
    /// # Returns
    /// The lowercased, ASCII-folded term with surrounding punctuation removed.
    /// Returns an empty string when nothing but punctuation remains.
    pub fn transform(&self, text: &str) -> String {
        let mut folded = String::with_capacity(text.len());
        for ch in text.chars().flat_map(char::to_lowercase) {
            if is_combining_mark(ch) {
                continue;
            }
            match fold_char(ch) {
                Some(ascii) => folded.push_str(ascii),
                None => folded.push(ch),
            }
        }
        let trimmed = folded.trim_matches(is_trimmed);
        if trimmed.len() == folded.len() {
            folded
        } else {
            trimmed.to_string()
        }
    }

    /// Normalizes a multi-word value word by word.
    ///
    /// The value is split on whitespace, each word goes through
    /// [`Analyzer::transform`], and the non-empty results are joined with
    /// single spaces.
    pub fn transform_phrase(&self, text: &str) -> String {
        let mut phrase = String::with_capacity(text.len());
        for word in text.split_whitespace() {
            let word = self.transform(word);
            if word.is_empty() {
                continue;
            }
            if !phrase.is_empty() {
                phrase.push(' ');
            }
            phrase.push_str(&word);
        }
        phrase
    }
}

#[inline]
fn is_trimmed(ch: char) -> bool {
    ch.is_whitespace() || TRIM_CHARS.contains(&ch)
}

#[inline]
pub(crate) fn is_combining_mark(ch: char) -> bool {
    ('\u{0300}'..='\u{036f}').contains(&ch)
}

/// Maps a lowercase Latin letter with diacritics to its ASCII spelling.
fn fold_char(ch: char) -> Option<&'static str> {
    if ch.is_ascii() {
        return None;
    }
    let folded = match ch {
        'à' | 'á' | 'â' | 'ã' | 'ä' | 'å' | 'ā' | 'ă' | 'ą' => "a",
        'æ' => "ae",
        'ç' | 'ć' | 'ĉ' | 'ċ' | 'č' => "c",
        'ð' | 'ď' | 'đ' => "d",
        'è' | 'é' | 'ê' | 'ë' | 'ē' | 'ĕ' | 'ė' | 'ę' | 'ě' => "e",
        'ĝ' | 'ğ' | 'ġ' | 'ģ' => "g",
        'ĥ' | 'ħ' => "h",
        'ì' | 'í' | 'î' | 'ï' | 'ĩ' | 'ī' | 'ĭ' | 'į' | 'ı' => "i",
        'ĳ' => "ij",
        'ĵ' => "j",
        'ķ' | 'ĸ' => "k",
        'ĺ' | 'ļ' | 'ľ' | 'ŀ' | 'ł' => "l",
        'ñ' | 'ń' | 'ņ' | 'ň' | 'ŉ' | 'ŋ' => "n",
        'ò' | 'ó' | 'ô' | 'õ' | 'ö' | 'ø' | 'ō' | 'ŏ' | 'ő' => "o",
        'œ' => "oe",
        'ŕ' | 'ŗ' | 'ř' => "r",
        'ś' | 'ŝ' | 'ş' | 'š' | 'ſ' => "s",
        'ß' => "ss",
        'ţ' | 'ť' | 'ŧ' => "t",
        'þ' => "th",
        'ù' | 'ú' | 'û' | 'ü' | 'ũ' | 'ū' | 'ŭ' | 'ů' | 'ű' | 'ų' => "u",
        'ŵ' => "w",
        'ý' | 'ÿ' | 'ŷ' => "y",
        'ź' | 'ż' | 'ž' => "z",
        _ => return None,
    };
    Some(folded)
}
