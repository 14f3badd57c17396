//! Attribute interceptors
//!
//! Element construction hands every attribute to an interceptor chain. The
//! `styles` interceptor turns CSS into an adopted, scoped sheet and
//! replaces the attribute with `styles-key`; everything else falls through
//! to the next interceptor.

use std::fmt;
use std::rc::Rc;

use fos_dom::{Document, ShadowRoot};

use crate::key::{STYLES_KEY_ATTR, StylesValue, resolve_key};
use crate::registry::StyleRegistry;

/// Attribute consumed by [`StylesInterceptor`]
pub const STYLES_ATTR: &str = "styles";

/// Attribute value as given to an element factory
#[derive(Clone)]
pub enum AttrValue {
    Text(String),
    Bool(bool),
    Number(f64),
    Styles(StylesValue),
    /// Deferred value, evaluated once per processing pass
    Thunk(Rc<dyn Fn() -> AttrValue>),
}

impl AttrValue {
    pub fn thunk<F>(f: F) -> Self
    where
        F: Fn() -> AttrValue + 'static,
    {
        Self::Thunk(Rc::new(f))
    }

    /// Evaluate thunks until a literal remains. Each thunk in the chain is
    /// called exactly once.
    pub fn resolve(self) -> AttrValue {
        let mut value = self;
        while let AttrValue::Thunk(f) = value {
            value = f();
        }
        value
    }

    /// Literal rendering of the value, `None` when it should be omitted
    pub fn as_text(&self) -> Option<String> {
        match self {
            Self::Text(text) => Some(text.clone()),
            Self::Bool(true) => Some(String::new()),
            Self::Bool(false) => None,
            Self::Number(n) => Some(n.to_string()),
            Self::Styles(styles) => Some(styles.css_text().to_string()),
            Self::Thunk(_) => self.clone().resolve().as_text(),
        }
    }
}

impl fmt::Debug for AttrValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(text) => f.debug_tuple("Text").field(text).finish(),
            Self::Bool(b) => f.debug_tuple("Bool").field(b).finish(),
            Self::Number(n) => f.debug_tuple("Number").field(n).finish(),
            Self::Styles(styles) => f.debug_tuple("Styles").field(styles).finish(),
            Self::Thunk(_) => f.write_str("Thunk(..)"),
        }
    }
}

impl From<&str> for AttrValue {
    fn from(text: &str) -> Self {
        Self::Text(text.to_string())
    }
}

impl From<String> for AttrValue {
    fn from(text: String) -> Self {
        Self::Text(text)
    }
}

impl From<bool> for AttrValue {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<f64> for AttrValue {
    fn from(n: f64) -> Self {
        Self::Number(n)
    }
}

impl From<i32> for AttrValue {
    fn from(n: i32) -> Self {
        Self::Number(n as f64)
    }
}

impl From<StylesValue> for AttrValue {
    fn from(styles: StylesValue) -> Self {
        Self::Styles(styles)
    }
}

/// Interceptor output
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Intercepted {
    /// Set this attribute on the element
    Attribute { name: String, value: String },
    /// Set nothing
    Omit,
}

/// Where shadow-scoped styles go
#[derive(Clone)]
pub enum ShadowSource {
    Root(ShadowRoot),
    /// Looked up lazily, once per processing pass
    Resolver(Rc<dyn Fn() -> Option<ShadowRoot>>),
}

impl ShadowSource {
    pub fn resolver<F>(f: F) -> Self
    where
        F: Fn() -> Option<ShadowRoot> + 'static,
    {
        Self::Resolver(Rc::new(f))
    }

    pub fn resolve(&self) -> Option<ShadowRoot> {
        match self {
            Self::Root(root) => Some(root.clone()),
            Self::Resolver(f) => f(),
        }
    }
}

impl fmt::Debug for ShadowSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Root(root) => f.debug_tuple("Root").field(root).finish(),
            Self::Resolver(_) => f.write_str("Resolver(..)"),
        }
    }
}

/// State shared by the interceptors of one processing pass
pub struct InterceptContext<'a> {
    pub document: &'a Document,
    /// Shadow root resolved for this pass
    pub shadow: Option<ShadowRoot>,
    pub registry: &'a mut StyleRegistry,
}

impl<'a> InterceptContext<'a> {
    /// Start a pass. A resolver is called here and nowhere else.
    pub fn new(
        document: &'a Document,
        shadow: Option<&ShadowSource>,
        registry: &'a mut StyleRegistry,
    ) -> Self {
        Self {
            document,
            shadow: shadow.and_then(ShadowSource::resolve),
            registry,
        }
    }
}

/// One link of an attribute interceptor chain
pub trait AttributeInterceptor {
    /// Map one resolved attribute to its replacement
    fn intercept(&self, cx: &mut InterceptContext<'_>, name: &str, value: AttrValue) -> Intercepted;
}

/// Renders values literally
#[derive(Debug, Clone, Copy, Default)]
pub struct PassThrough;

impl AttributeInterceptor for PassThrough {
    fn intercept(&self, _cx: &mut InterceptContext<'_>, name: &str, value: AttrValue) -> Intercepted {
        match value.as_text() {
            Some(value) => Intercepted::Attribute {
                name: name.to_string(),
                value,
            },
            None => Intercepted::Omit,
        }
    }
}

/// Turns `styles` into an adopted scoped sheet plus a `styles-key`
/// attribute
#[derive(Clone)]
pub struct StylesInterceptor {
    fallback: Rc<dyn AttributeInterceptor>,
}

impl Default for StylesInterceptor {
    fn default() -> Self {
        Self::new()
    }
}

impl StylesInterceptor {
    pub fn new() -> Self {
        Self {
            fallback: Rc::new(PassThrough),
        }
    }

    /// Hand non-`styles` attributes to `fallback`
    pub fn with_fallback(fallback: Rc<dyn AttributeInterceptor>) -> Self {
        Self { fallback }
    }

    fn styles(&self, cx: &mut InterceptContext<'_>, value: AttrValue) -> Intercepted {
        let styles = match value {
            AttrValue::Styles(styles) => styles,
            AttrValue::Text(css) => StylesValue::Css(css),
            other => {
                tracing::warn!(value = ?other, "`styles` expects CSS text or a keyed value; ignoring");
                return Intercepted::Omit;
            }
        };

        let key = match resolve_key(&styles) {
            Ok(key) => key,
            Err(err) => {
                tracing::warn!(error = %err, "element will render unstyled");
                return Intercepted::Omit;
            }
        };

        match &cx.shadow {
            Some(root) => cx.registry.ensure_styles(root, &key, styles.css_text()),
            None => cx.registry.ensure_styles(cx.document, &key, styles.css_text()),
        };

        Intercepted::Attribute {
            name: STYLES_KEY_ATTR.to_string(),
            value: key.into_string(),
        }
    }
}

impl AttributeInterceptor for StylesInterceptor {
    fn intercept(&self, cx: &mut InterceptContext<'_>, name: &str, value: AttrValue) -> Intercepted {
        let value = value.resolve();
        if name == STYLES_ATTR {
            self.styles(cx, value)
        } else {
            self.fallback.intercept(cx, name, value)
        }
    }
}

impl fmt::Debug for StylesInterceptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StylesInterceptor").finish_non_exhaustive()
    }
}
