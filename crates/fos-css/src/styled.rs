//! Styled element factories
//!
//! `use_styled_tags` returns a factory whose elements route every attribute
//! through a [`StylesInterceptor`], so a `styles` attribute becomes a
//! scoped, adopted sheet.

use std::rc::Rc;

use fos_dom::{Document, Element};

use crate::interceptor::{
    AttrValue, AttributeInterceptor, InterceptContext, Intercepted, ShadowSource, StylesInterceptor,
};
use crate::registry::StyleRegistry;

/// Options for [`use_styled_tags`]
#[derive(Clone, Default)]
pub struct StyledTagsOptions {
    /// Shadow root for the sheets; the document is used when absent
    pub shadow: Option<ShadowSource>,
    /// Interceptor for attributes other than `styles`
    pub fallback: Option<Rc<dyn AttributeInterceptor>>,
}

pub fn use_styled_tags(options: StyledTagsOptions) -> StyledTags {
    let interceptor = match options.fallback {
        Some(fallback) => StylesInterceptor::with_fallback(fallback),
        None => StylesInterceptor::new(),
    };
    StyledTags {
        interceptor: Rc::new(interceptor),
        shadow: options.shadow,
    }
}

/// Factory for styled elements
#[derive(Debug, Clone)]
pub struct StyledTags {
    interceptor: Rc<StylesInterceptor>,
    shadow: Option<ShadowSource>,
}

impl StyledTags {
    /// Creation function for one tag name
    pub fn tag(&self, name: &str) -> StyledTag {
        StyledTag {
            name: name.to_string(),
            tags: self.clone(),
        }
    }

    /// Create `tag` in `document`, intercepting each attribute in order
    pub fn create<I, N>(
        &self,
        tag: &str,
        document: &Document,
        registry: &mut StyleRegistry,
        attrs: I,
    ) -> Element
    where
        I: IntoIterator<Item = (N, AttrValue)>,
        N: AsRef<str>,
    {
        let element = document.create_element(tag);
        let mut cx = InterceptContext::new(document, self.shadow.as_ref(), registry);

        for (name, value) in attrs {
            match self.interceptor.intercept(&mut cx, name.as_ref(), value) {
                Intercepted::Attribute { name, value } => element.set_attribute(&name, &value),
                Intercepted::Omit => {}
            }
        }

        element
    }
}

/// Creation function bound to a tag name
#[derive(Debug, Clone)]
pub struct StyledTag {
    name: String,
    tags: StyledTags,
}

impl StyledTag {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn create<I, N>(&self, document: &Document, registry: &mut StyleRegistry, attrs: I) -> Element
    where
        I: IntoIterator<Item = (N, AttrValue)>,
        N: AsRef<str>,
    {
        self.tags.create(&self.name, document, registry, attrs)
    }
}
