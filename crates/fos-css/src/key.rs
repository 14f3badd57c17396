//! Style keys
//!
//! A key names one scoped stylesheet. Keys are either given explicitly or
//! derived from the CSS text, so identical CSS always maps to one sheet.

use std::fmt;

use crate::CssError;

/// Attribute that carries a resolved key on styled elements
pub const STYLES_KEY_ATTR: &str = "styles-key";

/// Key of a scoped stylesheet
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StyleKey(String);

impl StyleKey {
    /// Explicit key, used verbatim
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    /// Content-derived key: 64-bit FNV-1a of the CSS text as 16 hex digits
    pub fn from_css(css: &str) -> Self {
        let mut hasher = ContentHasher::new();
        hasher.write(css.as_bytes());
        Self(format!("{:016x}", hasher.finish()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }

    /// Attribute selector matching elements that carry this key
    pub fn selector(&self) -> String {
        format!("[{}=\"{}\"]", STYLES_KEY_ATTR, self.0)
    }
}

impl fmt::Display for StyleKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for StyleKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Value of a `styles` attribute
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StylesValue {
    /// Raw CSS; the key is derived from the text
    Css(String),
    /// CSS under an explicit key
    Keyed { key: Option<String>, css: String },
}

impl StylesValue {
    pub fn css(css: impl Into<String>) -> Self {
        Self::Css(css.into())
    }

    pub fn keyed(key: impl Into<String>, css: impl Into<String>) -> Self {
        Self::Keyed {
            key: Some(key.into()),
            css: css.into(),
        }
    }

    pub fn css_text(&self) -> &str {
        match self {
            Self::Css(css) | Self::Keyed { css, .. } => css,
        }
    }
}

impl From<&str> for StylesValue {
    fn from(css: &str) -> Self {
        Self::Css(css.to_string())
    }
}

impl From<String> for StylesValue {
    fn from(css: String) -> Self {
        Self::Css(css)
    }
}

/// Resolve the key for a `styles` value. An object form needs a non-empty
/// key.
pub fn resolve_key(value: &StylesValue) -> Result<StyleKey, CssError> {
    match value {
        StylesValue::Css(css) => Ok(StyleKey::from_css(css)),
        StylesValue::Keyed { key: Some(key), .. } if !key.is_empty() => Ok(StyleKey::new(key.as_str())),
        StylesValue::Keyed { .. } => Err(CssError::MissingStyleKey),
    }
}

/// Replace every `&` with the key's attribute selector, including inside
/// at-rule blocks.
pub fn scope_selectors(css: &str, key: &StyleKey) -> String {
    css.replace('&', &key.selector())
}

/// FNV-1a hasher for content keys
struct ContentHasher {
    state: u64,
}

impl ContentHasher {
    fn new() -> Self {
        Self { state: 0xcbf29ce484222325 } // FNV offset basis
    }

    fn write(&mut self, bytes: &[u8]) {
        for byte in bytes {
            self.state ^= *byte as u64;
            self.state = self.state.wrapping_mul(0x100000001b3); // FNV prime
        }
    }

    fn finish(&self) -> u64 {
        self.state
    }
}
