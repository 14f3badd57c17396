//! Document - connection point for elements
//!
//! Appending an element connects it and removing it disconnects it; both
//! run the matching custom element reactions.

use std::rc::Rc;

use crate::{
    AdoptedStyleSheets, CustomElementRegistry, DocumentId, Element, EventTarget, StyleOwner,
    StyleSheetOwner,
};

/// Document
pub struct Document {
    id: DocumentId,
    registry: Rc<CustomElementRegistry>,
    events: EventTarget,
    adopted: AdoptedStyleSheets,
    /// Connected elements in insertion order
    children: Vec<Element>,
}

impl Document {
    /// Create an empty document bound to a custom element registry
    pub fn new(registry: Rc<CustomElementRegistry>) -> Self {
        Self {
            id: DocumentId::next(),
            registry,
            events: EventTarget::new(),
            adopted: AdoptedStyleSheets::new(),
            children: Vec::new(),
        }
    }

    pub fn id(&self) -> DocumentId {
        self.id
    }

    pub fn event_target(&self) -> &EventTarget {
        &self.events
    }

    pub fn registry(&self) -> &Rc<CustomElementRegistry> {
        &self.registry
    }

    /// Create an element owned by this document. Defined tags are
    /// upgraded immediately.
    pub fn create_element(&self, tag_name: &str) -> Element {
        let element = Element::new(tag_name, self.id, Rc::downgrade(&self.registry));
        self.registry.upgrade(&element);
        element
    }

    /// Connect an element. Appending an element that is already connected
    /// here moves it to the end (disconnect, then connect). Elements owned
    /// by another document are adopted first; they must not be connected
    /// there.
    pub fn append_child(&mut self, element: &Element) -> bool {
        if element.owner_document() != self.id {
            if element.is_connected() {
                tracing::warn!(
                    node = ?element.id(),
                    "element is connected to another document; remove it first"
                );
                return false;
            }
            self.adopt(element);
        }

        if self.contains(element) {
            self.remove_child(element);
        }

        self.children.push(element.clone());
        element.set_connected(true);
        self.registry.connected(element);
        true
    }

    /// Disconnect an element. Removing an element that is not connected
    /// here is a no-op and runs no reactions.
    pub fn remove_child(&mut self, element: &Element) -> bool {
        let Some(pos) = self.children.iter().position(|c| c == element) else {
            return false;
        };
        self.children.remove(pos);
        element.set_connected(false);
        self.registry.disconnected(element);
        true
    }

    /// Move an element from another document into this one
    pub fn adopt_node(&mut self, element: &Element, from: &mut Document) {
        from.remove_child(element);
        if element.owner_document() != self.id {
            self.adopt(element);
        }
    }

    pub fn contains(&self, element: &Element) -> bool {
        self.children.iter().any(|c| c == element)
    }

    /// Connected elements in insertion order
    pub fn children(&self) -> &[Element] {
        &self.children
    }

    /// Style scopes that belong to this document: its own, then the shadow
    /// roots of connected elements (closed roots included)
    pub fn style_owners(&self) -> Vec<StyleOwner> {
        std::iter::once(self.style_owner())
            .chain(
                self.children
                    .iter()
                    .filter_map(Element::attached_shadow)
                    .map(|root| root.style_owner()),
            )
            .collect()
    }

    fn adopt(&self, element: &Element) {
        let old_document = element.owner_document();
        element.set_owner_document(self.id);
        self.registry.upgrade(element);
        self.registry.adopted(element, old_document, self.id);
    }
}

impl StyleSheetOwner for Document {
    fn style_owner(&self) -> StyleOwner {
        StyleOwner::Document(self.id)
    }

    fn adopted_style_sheets(&self) -> &AdoptedStyleSheets {
        &self.adopted
    }
}

impl std::fmt::Debug for Document {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Document")
            .field("id", &self.id)
            .field("children", &self.children.len())
            .field("adopted_style_sheets", &self.adopted.len())
            .finish()
    }
}
