//! Shadow DOM
//!
//! Shadow roots with their own adopted stylesheet list and event target.

use std::fmt;
use std::rc::Rc;

use crate::{AdoptedStyleSheets, EventTarget, NodeId, ShadowRootId, StyleOwner, StyleSheetOwner};

/// Shadow root mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ShadowRootMode {
    #[default]
    Open,
    Closed,
}

/// Shadow root handle. Clones refer to the same root.
#[derive(Clone)]
pub struct ShadowRoot {
    inner: Rc<ShadowRootData>,
}

struct ShadowRootData {
    id: ShadowRootId,
    host: NodeId,
    mode: ShadowRootMode,
    adopted: AdoptedStyleSheets,
    events: EventTarget,
}

impl ShadowRoot {
    /// Create a new shadow root
    pub(crate) fn new(host: NodeId, mode: ShadowRootMode) -> Self {
        Self {
            inner: Rc::new(ShadowRootData {
                id: ShadowRootId::next(),
                host,
                mode,
                adopted: AdoptedStyleSheets::new(),
                events: EventTarget::new(),
            }),
        }
    }

    pub fn id(&self) -> ShadowRootId {
        self.inner.id
    }

    /// Host element
    pub fn host(&self) -> NodeId {
        self.inner.host
    }

    pub fn mode(&self) -> ShadowRootMode {
        self.inner.mode
    }

    pub fn event_target(&self) -> &EventTarget {
        &self.inner.events
    }
}

impl StyleSheetOwner for ShadowRoot {
    fn style_owner(&self) -> StyleOwner {
        StyleOwner::Shadow(self.inner.id)
    }

    fn adopted_style_sheets(&self) -> &AdoptedStyleSheets {
        &self.inner.adopted
    }
}

impl PartialEq for ShadowRoot {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }
}

impl fmt::Debug for ShadowRoot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ShadowRoot")
            .field("id", &self.inner.id)
            .field("host", &self.inner.host)
            .field("mode", &self.inner.mode)
            .finish()
    }
}
