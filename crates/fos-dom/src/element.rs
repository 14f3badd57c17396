//! Elements
//!
//! Reference-counted element handles. Attribute writes run the custom
//! element `attribute_changed` reaction when the tag is defined.

use std::any::Any;
use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::{Rc, Weak};

use crate::{
    CustomElementRegistry, DocumentId, Event, EventTarget, ListenerId, ListenerOptionsArg,
    NamedNodeMap, NodeId, ShadowRoot, ShadowRootMode,
};

/// Custom element state of an element
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CustomElementState {
    /// No definition has been applied (yet)
    #[default]
    Undefined,
    /// Upgraded with a registered definition
    Custom,
}

/// Element handle. Clones refer to the same element.
#[derive(Clone)]
pub struct Element {
    inner: Rc<ElementData>,
}

struct ElementData {
    id: NodeId,
    tag_name: String,
    attributes: RefCell<NamedNodeMap>,
    text_content: RefCell<String>,
    events: EventTarget,
    shadow_root: RefCell<Option<ShadowRoot>>,
    owner_document: Cell<DocumentId>,
    connected: Cell<bool>,
    custom_state: Cell<CustomElementState>,
    registry: Weak<CustomElementRegistry>,
    /// State owned by the element's custom element class
    instance: RefCell<Option<Rc<dyn Any>>>,
}

impl Element {
    pub(crate) fn new(
        tag_name: &str,
        owner_document: DocumentId,
        registry: Weak<CustomElementRegistry>,
    ) -> Self {
        Self {
            inner: Rc::new(ElementData {
                id: NodeId::next(),
                tag_name: tag_name.to_ascii_lowercase(),
                attributes: RefCell::new(NamedNodeMap::new()),
                text_content: RefCell::new(String::new()),
                events: EventTarget::new(),
                shadow_root: RefCell::new(None),
                owner_document: Cell::new(owner_document),
                connected: Cell::new(false),
                custom_state: Cell::new(CustomElementState::Undefined),
                registry,
                instance: RefCell::new(None),
            }),
        }
    }

    pub fn id(&self) -> NodeId {
        self.inner.id
    }

    /// Lowercased tag name
    pub fn tag_name(&self) -> &str {
        &self.inner.tag_name
    }

    pub fn get_attribute(&self, name: &str) -> Option<String> {
        self.inner.attributes.borrow().get(name).map(|v| v.to_string())
    }

    pub fn has_attribute(&self, name: &str) -> bool {
        self.inner.attributes.borrow().contains(name)
    }

    pub fn attribute_names(&self) -> Vec<String> {
        self.inner.attributes.borrow().names()
    }

    /// Set an attribute and run the `attribute_changed` reaction
    pub fn set_attribute(&self, name: &str, value: &str) {
        let old = self.inner.attributes.borrow_mut().set(name, value);
        self.attribute_changed(name, old.as_deref(), Some(value));
    }

    /// Remove an attribute and run the `attribute_changed` reaction
    pub fn remove_attribute(&self, name: &str) -> bool {
        let old = self.inner.attributes.borrow_mut().remove(name);
        match old {
            Some(old) => {
                self.attribute_changed(name, Some(&old), None);
                true
            }
            None => false,
        }
    }

    pub fn text_content(&self) -> String {
        self.inner.text_content.borrow().clone()
    }

    pub fn set_text_content(&self, text: &str) {
        *self.inner.text_content.borrow_mut() = text.to_string();
    }

    pub fn event_target(&self) -> &EventTarget {
        &self.inner.events
    }

    pub fn add_event_listener<F>(
        &self,
        event_type: &str,
        handler: F,
        options: impl Into<ListenerOptionsArg>,
    ) -> Option<ListenerId>
    where
        F: FnMut(&Event) + 'static,
    {
        self.inner.events.add_event_listener(event_type, handler, options)
    }

    pub fn dispatch_event(&self, event: &Event) -> usize {
        self.inner.events.dispatch_event(event)
    }

    /// Attach a shadow root. Returns the existing root if one is attached.
    pub fn attach_shadow(&self, mode: ShadowRootMode) -> ShadowRoot {
        self.inner
            .shadow_root
            .borrow_mut()
            .get_or_insert_with(|| ShadowRoot::new(self.inner.id, mode))
            .clone()
    }

    /// Open shadow root, if any. Closed roots are only reachable through
    /// the handle returned by `attach_shadow`.
    pub fn shadow_root(&self) -> Option<ShadowRoot> {
        self.inner
            .shadow_root
            .borrow()
            .as_ref()
            .filter(|root| root.mode() == ShadowRootMode::Open)
            .cloned()
    }

    /// Attached shadow root in either mode
    pub(crate) fn attached_shadow(&self) -> Option<ShadowRoot> {
        self.inner.shadow_root.borrow().clone()
    }

    pub fn is_connected(&self) -> bool {
        self.inner.connected.get()
    }

    pub fn owner_document(&self) -> DocumentId {
        self.inner.owner_document.get()
    }

    pub fn custom_state(&self) -> CustomElementState {
        self.inner.custom_state.get()
    }

    pub(crate) fn set_connected(&self, connected: bool) {
        self.inner.connected.set(connected);
    }

    pub(crate) fn set_owner_document(&self, document: DocumentId) {
        self.inner.owner_document.set(document);
    }

    pub(crate) fn set_custom_state(&self, state: CustomElementState) {
        self.inner.custom_state.set(state);
    }

    pub(crate) fn instance(&self) -> Option<Rc<dyn Any>> {
        self.inner.instance.borrow().clone()
    }

    pub(crate) fn set_instance(&self, instance: Rc<dyn Any>) {
        *self.inner.instance.borrow_mut() = Some(instance);
    }

    fn attribute_changed(&self, name: &str, old_value: Option<&str>, new_value: Option<&str>) {
        if let Some(registry) = self.inner.registry.upgrade() {
            registry.attribute_changed(self, name, old_value, new_value);
        }
    }
}

impl PartialEq for Element {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }
}

impl Eq for Element {}

impl fmt::Debug for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Element")
            .field("id", &self.inner.id)
            .field("tag_name", &self.inner.tag_name)
            .field("connected", &self.inner.connected.get())
            .finish()
    }
}
