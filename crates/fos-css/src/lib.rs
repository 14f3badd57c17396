//! fOS CSS - Scoped component styles
//!
//! Components carry their CSS in a `styles` attribute. The CSS is keyed
//! (explicitly or by content hash), scoped with a `[styles-key]` selector,
//! split into top-level rules and inserted once per document or shadow
//! root through a shared [`StyleRegistry`].

mod interceptor;
mod key;
mod registry;
mod splitter;
mod styled;
mod stylesheet;

#[cfg(test)]
mod css_strategies;

pub use interceptor::{
    AttrValue, AttributeInterceptor, InterceptContext, Intercepted, PassThrough, STYLES_ATTR,
    ShadowSource, StylesInterceptor,
};
pub use key::{STYLES_KEY_ATTR, StyleKey, StylesValue, resolve_key, scope_selectors};
pub use registry::{RegistryStats, StyleRegistry, StyleSheetEntry};
pub use splitter::{clean_css, split_rules};
pub use styled::{StyledTag, StyledTags, StyledTagsOptions, use_styled_tags};
pub use stylesheet::CssStyleSheet;

/// Style errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CssError {
    #[error("Malformed style rule `{rule}`: {message}")]
    MalformedRule { rule: String, message: String },
    #[error("Rule index {index} out of bounds for sheet of {len} rules")]
    IndexOutOfBounds { index: usize, len: usize },
    #[error("Keyed styles need a non-empty key")]
    MissingStyleKey,
}
