//! Runtime - owns the element and style registries
//!
//! One runtime per application. Documents created through it share its
//! custom element registry, and every styled element it creates caches its
//! sheets in the runtime's [`StyleRegistry`].

use std::rc::Rc;

use fos_css::{AttrValue, StyleRegistry, StyledTags, StyledTagsOptions};
use fos_dom::{
    ComponentDefinition, CustomElementDefinition, CustomElementRegistry, Document, Element,
    RegisterOptions, ShadowRoot, SheetId,
};

use crate::Config;

/// Application root
pub struct Runtime {
    config: Config,
    elements: Rc<CustomElementRegistry>,
    styles: StyleRegistry,
}

impl Runtime {
    pub fn new(config: Config) -> Self {
        tracing::debug!(emit_events = config.emit_lifecycle_events, "runtime created");
        Self {
            config,
            elements: Rc::new(CustomElementRegistry::new()),
            styles: StyleRegistry::new(),
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// New document bound to this runtime's element registry
    pub fn create_document(&self) -> Document {
        Document::new(self.elements.clone())
    }

    /// Register a component with the configured default options.
    ///
    /// `None` means the tag was already taken or is not a valid name.
    pub fn register_custom_tag(
        &self,
        tag_name: &str,
        definition: ComponentDefinition,
    ) -> Option<Rc<CustomElementDefinition>> {
        let options = RegisterOptions {
            emit_events: self.config.emit_lifecycle_events,
        };
        self.register_custom_tag_with(tag_name, definition, options)
    }

    pub fn register_custom_tag_with(
        &self,
        tag_name: &str,
        definition: ComponentDefinition,
        options: RegisterOptions,
    ) -> Option<Rc<CustomElementDefinition>> {
        fos_dom::register_custom_tag(&self.elements, tag_name, definition, options)
    }

    pub fn use_styled_tags(&self, options: StyledTagsOptions) -> StyledTags {
        fos_css::use_styled_tags(options)
    }

    /// Create a styled element in `document`
    pub fn create_element<I, N>(
        &mut self,
        tags: &StyledTags,
        document: &Document,
        tag: &str,
        attrs: I,
    ) -> Element
    where
        I: IntoIterator<Item = (N, AttrValue)>,
        N: AsRef<str>,
    {
        tags.create(tag, document, &mut self.styles, attrs)
    }

    pub fn create_style_sheet(&mut self, document: &Document, id: &str) -> SheetId {
        self.styles.create_style_sheet(document, id)
    }

    pub fn create_shadow_style_sheet(&mut self, root: &ShadowRoot, id: &str) -> SheetId {
        self.styles.create_shadow_style_sheet(root, id)
    }

    /// Drop the style entries of a document that is going away, including
    /// those of shadow roots on its connected elements. Connected elements
    /// are disconnected so their scopes are released.
    pub fn close_document(&mut self, mut document: Document) {
        let owners = document.style_owners();
        let connected: Vec<Element> = document.children().to_vec();
        for element in &connected {
            document.remove_child(element);
        }
        let released: usize = owners
            .into_iter()
            .map(|owner| self.styles.release_owner(owner))
            .sum();
        tracing::debug!(document = ?document.id(), released, "document closed");
    }

    /// Drop the style entries of a shadow root that is going away
    pub fn release_shadow_root(&mut self, root: &ShadowRoot) -> usize {
        self.styles.release_shadow_root(root)
    }

    pub fn styles(&self) -> &StyleRegistry {
        &self.styles
    }

    pub fn styles_mut(&mut self) -> &mut StyleRegistry {
        &mut self.styles
    }

    pub fn elements(&self) -> &Rc<CustomElementRegistry> {
        &self.elements
    }
}

impl Default for Runtime {
    fn default() -> Self {
        Self::new(Config::default())
    }
}
