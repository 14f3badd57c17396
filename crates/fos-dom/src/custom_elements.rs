//! Custom Elements
//!
//! Custom element registry and lifecycle reactions.

use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

use crate::{CustomElementState, DocumentId, Element};

/// Reactions invoked by the host for elements of a defined tag
pub trait CustomElementCallbacks {
    /// Runs once per element, when it is upgraded
    fn construct(&self, _element: &Element) {}

    fn connected(&self, _element: &Element) {}

    fn disconnected(&self, _element: &Element) {}

    fn adopted(&self, _element: &Element, _old_document: DocumentId, _new_document: DocumentId) {}

    fn attribute_changed(
        &self,
        _element: &Element,
        _name: &str,
        _old_value: Option<&str>,
        _new_value: Option<&str>,
    ) {
    }
}

/// Custom element definition
pub struct CustomElementDefinition {
    pub name: String,
    /// Fixed when the definition is created
    pub observed_attributes: Vec<String>,
    callbacks: Rc<dyn CustomElementCallbacks>,
}

impl CustomElementDefinition {
    pub fn observes(&self, attribute: &str) -> bool {
        self.observed_attributes.iter().any(|a| a == attribute)
    }
}

impl fmt::Debug for CustomElementDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CustomElementDefinition")
            .field("name", &self.name)
            .field("observed_attributes", &self.observed_attributes)
            .finish_non_exhaustive()
    }
}

/// Custom elements registry
#[derive(Debug, Default)]
pub struct CustomElementRegistry {
    definitions: RefCell<HashMap<String, Rc<CustomElementDefinition>>>,
}

impl CustomElementRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Define a custom element. A name can only be defined once.
    pub fn define(
        &self,
        name: &str,
        observed_attributes: Vec<String>,
        callbacks: Rc<dyn CustomElementCallbacks>,
    ) -> Result<Rc<CustomElementDefinition>, CustomElementError> {
        if !Self::is_valid_name(name) {
            return Err(CustomElementError::InvalidName(name.to_string()));
        }

        let mut definitions = self.definitions.borrow_mut();
        if definitions.contains_key(name) {
            return Err(CustomElementError::AlreadyDefined(name.to_string()));
        }

        let definition = Rc::new(CustomElementDefinition {
            name: name.to_string(),
            observed_attributes,
            callbacks,
        });
        definitions.insert(name.to_string(), definition.clone());
        tracing::debug!(tag = name, "custom element defined");

        Ok(definition)
    }

    /// Get element definition
    pub fn get(&self, name: &str) -> Option<Rc<CustomElementDefinition>> {
        self.definitions.borrow().get(name).cloned()
    }

    /// Check if element is defined
    pub fn is_defined(&self, name: &str) -> bool {
        self.definitions.borrow().contains_key(name)
    }

    /// Defined tag names, sorted
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<_> = self.definitions.borrow().keys().cloned().collect();
        names.sort();
        names
    }

    /// Upgrade an element if its tag is defined and it was not upgraded yet.
    ///
    /// After `construct`, every observed attribute the element already
    /// carries is replayed as a change from `None`, in attribute order.
    pub fn upgrade(&self, element: &Element) -> bool {
        if element.custom_state() == CustomElementState::Custom {
            return false;
        }
        let Some(definition) = self.get(element.tag_name()) else {
            return false;
        };
        // Mark first so reactions triggered from construct see a custom element
        element.set_custom_state(CustomElementState::Custom);
        definition.callbacks.construct(element);

        for name in element.attribute_names() {
            if !definition.observes(&name) {
                continue;
            }
            if let Some(value) = element.get_attribute(&name) {
                definition
                    .callbacks
                    .attribute_changed(element, &name, None, Some(&value));
            }
        }
        true
    }

    pub(crate) fn connected(&self, element: &Element) {
        self.upgrade(element);
        if let Some(definition) = self.definition_for(element) {
            definition.callbacks.connected(element);
        }
    }

    pub(crate) fn disconnected(&self, element: &Element) {
        if let Some(definition) = self.definition_for(element) {
            definition.callbacks.disconnected(element);
        }
    }

    pub(crate) fn adopted(&self, element: &Element, old_document: DocumentId, new_document: DocumentId) {
        if let Some(definition) = self.definition_for(element) {
            definition.callbacks.adopted(element, old_document, new_document);
        }
    }

    pub(crate) fn attribute_changed(
        &self,
        element: &Element,
        name: &str,
        old_value: Option<&str>,
        new_value: Option<&str>,
    ) {
        if let Some(definition) = self.definition_for(element) {
            if definition.observes(name) {
                definition
                    .callbacks
                    .attribute_changed(element, name, old_value, new_value);
            }
        }
    }

    fn definition_for(&self, element: &Element) -> Option<Rc<CustomElementDefinition>> {
        if element.custom_state() != CustomElementState::Custom {
            return None;
        }
        self.get(element.tag_name())
    }

    /// Validate custom element name
    fn is_valid_name(name: &str) -> bool {
        // Must contain hyphen
        if !name.contains('-') {
            return false;
        }

        // Must start with lowercase letter
        if !name.starts_with(|c: char| c.is_ascii_lowercase()) {
            return false;
        }

        if name.chars().any(|c| c.is_ascii_uppercase() || c.is_whitespace()) {
            return false;
        }

        // Reserved names
        let reserved = [
            "annotation-xml",
            "color-profile",
            "font-face",
            "font-face-src",
            "font-face-uri",
            "font-face-format",
            "font-face-name",
            "missing-glyph",
        ];
        !reserved.contains(&name)
    }
}

/// Custom element errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CustomElementError {
    #[error("Invalid custom element name: {0}")]
    InvalidName(String),

    #[error("Element already defined: {0}")]
    AlreadyDefined(String),
}
