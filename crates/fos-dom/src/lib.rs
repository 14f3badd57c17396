//! fOS DOM - Element host and component lifecycle
//!
//! A small, single-threaded element host: documents, shadow roots,
//! attributes, event targets and a custom element registry. On top of it,
//! [`component`] adapts setup-style component definitions into custom
//! elements whose listeners are torn down on disconnect.

mod abort;
mod attributes;
pub mod component;
mod custom_elements;
mod document;
mod dom_events;
mod element;
mod scope;
mod shadow;
mod style_sheets;

use std::sync::atomic::{AtomicU32, Ordering};

pub use abort::{AbortController, AbortSignal};
pub use attributes::{Attr, NamedNodeMap};
pub use component::{
    AttributeChange, ComponentContext, ComponentDefinition, HookResult, Hooks, RegisterOptions,
    register_custom_tag,
};
pub use custom_elements::{
    CustomElementCallbacks, CustomElementDefinition, CustomElementError, CustomElementRegistry,
};
pub use document::Document;
pub use dom_events::{
    ATTRIBUTE_CHANGED_EVENT, CONNECTED_EVENT, Event, EventDetail, EventTarget, ListenerId,
    ListenerOptions, ListenerOptionsArg,
};
pub use element::{CustomElementState, Element};
pub use scope::CancellationScope;
pub use shadow::{ShadowRoot, ShadowRootMode};
pub use style_sheets::{AdoptedStyleSheets, SheetId, StyleOwner, StyleSheetOwner};

static NEXT_NODE_ID: AtomicU32 = AtomicU32::new(1);
static NEXT_DOCUMENT_ID: AtomicU32 = AtomicU32::new(1);
static NEXT_SHADOW_ROOT_ID: AtomicU32 = AtomicU32::new(1);

/// Element identifier, unique for the lifetime of the process
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(crate) u32);

impl NodeId {
    pub(crate) fn next() -> Self {
        Self(NEXT_NODE_ID.fetch_add(1, Ordering::Relaxed))
    }
}

/// Document identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DocumentId(pub(crate) u32);

impl DocumentId {
    pub(crate) fn next() -> Self {
        Self(NEXT_DOCUMENT_ID.fetch_add(1, Ordering::Relaxed))
    }
}

/// Shadow root identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ShadowRootId(pub(crate) u32);

impl ShadowRootId {
    pub(crate) fn next() -> Self {
        Self(NEXT_SHADOW_ROOT_ID.fetch_add(1, Ordering::Relaxed))
    }
}
