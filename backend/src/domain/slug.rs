//! Slug derivation and validation for article URLs.
//!
//! Slugs are trimmed, non-empty identifiers composed of lowercase ASCII
//! letters, digits, underscores, and hyphens.

use std::fmt;

/// Validation errors for [`ArticleSlug`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SlugValidationError {
    #[error("slug must contain at least one letter or digit")]
    Empty,
    #[error("slug may only contain lowercase letters, digits, '-' and '_'")]
    InvalidCharacters,
}

/// URL-safe article identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ArticleSlug(String);

impl ArticleSlug {
    /// Validate an existing slug, such as one taken from a request path.
    pub fn new(raw: impl Into<String>) -> Result<Self, SlugValidationError> {
        let raw = raw.into();
        if raw.is_empty() || raw.trim() != raw {
            return Err(SlugValidationError::Empty);
        }
        if !raw.chars().all(is_slug_char) {
            return Err(SlugValidationError::InvalidCharacters);
        }
        Ok(Self(raw))
    }

    /// Derive the base slug for a title.
    ///
    /// # Examples
    /// ```
    /// use gameconnect::domain::ArticleSlug;
    ///
    /// let slug = ArticleSlug::from_title("Test Game").unwrap();
    /// assert_eq!(slug.as_str(), "test-game");
    /// ```
    pub fn from_title(title: &str) -> Result<Self, SlugValidationError> {
        let slug = slugify(title);
        if slug.is_empty() {
            return Err(SlugValidationError::Empty);
        }
        Ok(Self(slug))
    }

    /// Slug with a numeric de-duplication suffix, e.g. `test-game-2`.
    #[must_use]
    pub fn with_suffix(&self, n: u32) -> Self {
        Self(format!("{}-{n}", self.0))
    }

    /// Borrow the slug as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for ArticleSlug {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

fn is_slug_char(ch: char) -> bool {
    ch.is_ascii_lowercase() || ch.is_ascii_digit() || ch == '-' || ch == '_'
}

/// Base letter of an accented Latin letter, as left by canonical
/// decomposition once the combining marks are removed.
fn strip_accent(ch: char) -> Option<char> {
    let base = match ch {
        'à'..='å' | 'ā' | 'ă' | 'ą' => 'a',
        'À'..='Å' | 'Ā' | 'Ă' | 'Ą' => 'A',
        'ç' | 'ć' | 'ĉ' | 'ċ' | 'č' => 'c',
        'Ç' | 'Ć' | 'Ĉ' | 'Ċ' | 'Č' => 'C',
        'ď' => 'd',
        'Ď' => 'D',
        'è'..='ë' | 'ē' | 'ĕ' | 'ė' | 'ę' | 'ě' => 'e',
        'È'..='Ë' | 'Ē' | 'Ĕ' | 'Ė' | 'Ę' | 'Ě' => 'E',
        'ĝ' | 'ğ' | 'ġ' | 'ģ' => 'g',
        'Ĝ' | 'Ğ' | 'Ġ' | 'Ģ' => 'G',
        'ĥ' => 'h',
        'Ĥ' => 'H',
        'ì'..='ï' | 'ĩ' | 'ī' | 'ĭ' | 'į' => 'i',
        'Ì'..='Ï' | 'Ĩ' | 'Ī' | 'Ĭ' | 'Į' | 'İ' => 'I',
        'ĵ' => 'j',
        'Ĵ' => 'J',
        'ķ' => 'k',
        'Ķ' => 'K',
        'ĺ' | 'ļ' | 'ľ' => 'l',
        'Ĺ' | 'Ļ' | 'Ľ' => 'L',
        'ñ' | 'ń' | 'ņ' | 'ň' => 'n',
        'Ñ' | 'Ń' | 'Ņ' | 'Ň' => 'N',
        'ò'..='ö' | 'ō' | 'ŏ' | 'ő' => 'o',
        'Ò'..='Ö' | 'Ō' | 'Ŏ' | 'Ő' => 'O',
        'ŕ' | 'ŗ' | 'ř' => 'r',
        'Ŕ' | 'Ŗ' | 'Ř' => 'R',
        'ś' | 'ŝ' | 'ş' | 'š' => 's',
        'Ś' | 'Ŝ' | 'Ş' | 'Š' => 'S',
        'ţ' | 'ť' => 't',
        'Ţ' | 'Ť' => 'T',
        'ù'..='ü' | 'ũ' | 'ū' | 'ŭ' | 'ů' | 'ű' | 'ų' => 'u',
        'Ù'..='Ü' | 'Ũ' | 'Ū' | 'Ŭ' | 'Ů' | 'Ű' | 'Ų' => 'U',
        'ŵ' => 'w',
        'Ŵ' => 'W',
        'ý' | 'ÿ' | 'ŷ' => 'y',
        'Ý' | 'Ŷ' | 'Ÿ' => 'Y',
        'ź' | 'ż' | 'ž' => 'z',
        'Ź' | 'Ż' | 'Ž' => 'Z',
        _ => return None,
    };
    Some(base)
}

/// Lower-case `title`, fold accents, drop punctuation and join words with
/// single hyphens.
///
/// Letters without an ASCII base (`ß`, `æ`, CJK) are dropped.
fn slugify(title: &str) -> String {
    let mut slug = String::with_capacity(title.len());
    let mut pending_separator = false;
    for ch in title.chars() {
        if ch.is_whitespace() || ch == '-' {
            pending_separator = true;
            continue;
        }
        let ch = strip_accent(ch).unwrap_or(ch);
        if !(ch.is_ascii_alphanumeric() || ch == '_') {
            continue;
        }
        if pending_separator && !slug.is_empty() {
            slug.push('-');
        }
        pending_separator = false;
        slug.push(ch.to_ascii_lowercase());
    }
    slug.trim_matches(|c| c == '-' || c == '_').to_owned()
}
