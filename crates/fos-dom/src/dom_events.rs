//! DOM Events
//!
//! Event targets, listener options and synchronous dispatch.

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Rc;

use crate::AbortSignal;

/// Event emitted after a component's `connected` hook ran
pub const CONNECTED_EVENT: &str = "connected";

/// Event emitted after a component's `attribute_changed` hook ran
pub const ATTRIBUTE_CHANGED_EVENT: &str = "attribute-changed";

/// Extra payload carried by an event
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum EventDetail {
    #[default]
    None,
    /// Attribute mutation triple
    AttributeChanged {
        name: String,
        old_value: Option<String>,
        new_value: Option<String>,
    },
    /// Free-form text payload
    Text(String),
}

/// DOM event
#[derive(Debug, Clone)]
pub struct Event {
    pub event_type: String,
    pub detail: EventDetail,
    pub cancelable: bool,
    default_prevented: Cell<bool>,
    in_passive_listener: Cell<bool>,
}

impl Event {
    /// Create a plain event
    pub fn new(event_type: impl Into<String>) -> Self {
        Self::with_detail(event_type, EventDetail::None)
    }

    /// Create an event carrying a detail payload
    pub fn with_detail(event_type: impl Into<String>, detail: EventDetail) -> Self {
        Self {
            event_type: event_type.into(),
            detail,
            cancelable: false,
            default_prevented: Cell::new(false),
            in_passive_listener: Cell::new(false),
        }
    }

    /// Make the event cancelable
    pub fn cancelable(mut self) -> Self {
        self.cancelable = true;
        self
    }

    /// Create the component "connected" notification
    pub fn connected() -> Self {
        Self::new(CONNECTED_EVENT)
    }

    /// Create the component "attribute-changed" notification
    pub fn attribute_changed(name: &str, old_value: Option<&str>, new_value: Option<&str>) -> Self {
        Self::with_detail(
            ATTRIBUTE_CHANGED_EVENT,
            EventDetail::AttributeChanged {
                name: name.to_string(),
                old_value: old_value.map(|s| s.to_string()),
                new_value: new_value.map(|s| s.to_string()),
            },
        )
    }

    /// Prevent default action. Ignored inside passive listeners.
    pub fn prevent_default(&self) {
        if self.cancelable && !self.in_passive_listener.get() {
            self.default_prevented.set(true);
        }
    }

    /// Check if default was prevented
    pub fn is_default_prevented(&self) -> bool {
        self.default_prevented.get()
    }
}

/// Listener registration options
#[derive(Debug, Clone, Default)]
pub struct ListenerOptions {
    pub capture: bool,
    pub once: bool,
    pub passive: bool,
    /// Listener is dropped when this signal aborts
    pub signal: Option<AbortSignal>,
}

/// Either the legacy capture flag or a full options object
#[derive(Debug, Clone)]
pub enum ListenerOptionsArg {
    Capture(bool),
    Options(ListenerOptions),
}

impl ListenerOptionsArg {
    pub fn into_options(self) -> ListenerOptions {
        match self {
            Self::Capture(capture) => ListenerOptions {
                capture,
                ..Default::default()
            },
            Self::Options(options) => options,
        }
    }
}

impl Default for ListenerOptionsArg {
    fn default() -> Self {
        Self::Options(ListenerOptions::default())
    }
}

impl From<bool> for ListenerOptionsArg {
    fn from(capture: bool) -> Self {
        Self::Capture(capture)
    }
}

impl From<ListenerOptions> for ListenerOptionsArg {
    fn from(options: ListenerOptions) -> Self {
        Self::Options(options)
    }
}

/// Listener handle returned by `EventTarget::add_event_listener`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u32);

type Handler = Rc<RefCell<dyn FnMut(&Event)>>;

struct Listener {
    id: ListenerId,
    event_type: String,
    capture: bool,
    once: bool,
    passive: bool,
    signal: Option<AbortSignal>,
    handler: Handler,
}

impl Listener {
    fn is_live(&self) -> bool {
        !self.signal.as_ref().is_some_and(|s| s.is_aborted())
    }
}

#[derive(Default)]
struct ListenerTable {
    next_id: u32,
    listeners: Vec<Listener>,
}

/// Shared listener table. Clones refer to the same target.
#[derive(Clone, Default)]
pub struct EventTarget {
    inner: Rc<RefCell<ListenerTable>>,
}

impl EventTarget {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a listener. Returns `None` when the options carry an
    /// already-aborted signal.
    pub fn add_event_listener<F>(
        &self,
        event_type: &str,
        handler: F,
        options: impl Into<ListenerOptionsArg>,
    ) -> Option<ListenerId>
    where
        F: FnMut(&Event) + 'static,
    {
        let options = options.into().into_options();
        if options.signal.as_ref().is_some_and(|s| s.is_aborted()) {
            return None;
        }

        let mut table = self.inner.borrow_mut();
        let id = ListenerId(table.next_id);
        table.next_id += 1;
        table.listeners.push(Listener {
            id,
            event_type: event_type.to_string(),
            capture: options.capture,
            once: options.once,
            passive: options.passive,
            signal: options.signal,
            handler: Rc::new(RefCell::new(handler)),
        });
        Some(id)
    }

    /// Remove a listener by id
    pub fn remove_event_listener(&self, id: ListenerId) -> bool {
        let mut table = self.inner.borrow_mut();
        let before = table.listeners.len();
        table.listeners.retain(|l| l.id != id);
        table.listeners.len() != before
    }

    /// Dispatch an event to every live listener of its type, capture
    /// listeners first. Returns how many handlers ran.
    pub fn dispatch_event(&self, event: &Event) -> usize {
        self.prune_aborted();

        let mut order: Vec<(ListenerId, bool)> = self
            .inner
            .borrow()
            .listeners
            .iter()
            .filter(|l| l.event_type == event.event_type)
            .map(|l| (l.id, l.capture))
            .collect();
        order.sort_by_key(|&(_, capture)| !capture);

        let mut invoked = 0;
        for (id, _) in order {
            // Earlier handlers may have removed or aborted this one
            let (handler, passive) = {
                let mut table = self.inner.borrow_mut();
                let Some(pos) = table.listeners.iter().position(|l| l.id == id) else {
                    continue;
                };
                if !table.listeners[pos].is_live() {
                    table.listeners.remove(pos);
                    continue;
                }
                let listener = &table.listeners[pos];
                let found = (listener.handler.clone(), listener.passive);
                if listener.once {
                    table.listeners.remove(pos);
                }
                found
            };

            let Ok(mut handler) = handler.try_borrow_mut() else {
                tracing::warn!(event = %event.event_type, "skipping re-entrant listener");
                continue;
            };
            event.in_passive_listener.set(passive);
            (&mut *handler)(event);
            event.in_passive_listener.set(false);
            invoked += 1;
        }
        invoked
    }

    /// Number of live listeners
    pub fn listener_count(&self) -> usize {
        self.inner.borrow().listeners.iter().filter(|l| l.is_live()).count()
    }

    /// Whether any live listener is registered for `event_type`
    pub fn has_listeners(&self, event_type: &str) -> bool {
        self.inner
            .borrow()
            .listeners
            .iter()
            .any(|l| l.event_type == event_type && l.is_live())
    }

    /// Whether both handles point at the same target
    pub fn ptr_eq(&self, other: &EventTarget) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }

    fn prune_aborted(&self) {
        self.inner.borrow_mut().listeners.retain(|l| l.is_live());
    }
}

impl fmt::Debug for EventTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventTarget")
            .field("listeners", &self.inner.borrow().listeners.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::AbortController;

    fn counter() -> (Rc<Cell<u32>>, impl FnMut(&Event) + 'static) {
        let hits = Rc::new(Cell::new(0));
        let inner = hits.clone();
        (hits, move |_: &Event| inner.set(inner.get() + 1))
    }

    #[test]
    fn test_dispatch_by_type() {
        let target = EventTarget::new();
        let (clicks, on_click) = counter();
        target.add_event_listener("click", on_click, false);

        assert_eq!(target.dispatch_event(&Event::new("click")), 1);
        assert_eq!(target.dispatch_event(&Event::new("keydown")), 0);
        assert_eq!(clicks.get(), 1);
    }

    #[test]
    fn test_remove_listener() {
        let target = EventTarget::new();
        let (hits, handler) = counter();
        let id = target.add_event_listener("click", handler, false).unwrap();

        assert!(target.remove_event_listener(id));
        assert!(!target.remove_event_listener(id));
        target.dispatch_event(&Event::new("click"));
        assert_eq!(hits.get(), 0);
    }

    #[test]
    fn test_once_listener() {
        let target = EventTarget::new();
        let (hits, handler) = counter();
        target.add_event_listener(
            "click",
            handler,
            ListenerOptions {
                once: true,
                ..Default::default()
            },
        );

        target.dispatch_event(&Event::new("click"));
        target.dispatch_event(&Event::new("click"));
        assert_eq!(hits.get(), 1);
        assert_eq!(target.listener_count(), 0);
    }

    #[test]
    fn test_signal_removes_listener() {
        let target = EventTarget::new();
        let controller = AbortController::new();
        let (hits, handler) = counter();
        target.add_event_listener(
            "click",
            handler,
            ListenerOptions {
                signal: Some(controller.signal().clone()),
                ..Default::default()
            },
        );

        controller.abort(None);
        assert_eq!(target.dispatch_event(&Event::new("click")), 0);
        assert_eq!(hits.get(), 0);
        assert_eq!(target.listener_count(), 0);
    }

    #[test]
    fn test_aborted_signal_rejects_registration() {
        let target = EventTarget::new();
        let (_, handler) = counter();
        let id = target.add_event_listener(
            "click",
            handler,
            ListenerOptions {
                signal: Some(AbortSignal::aborted(None)),
                ..Default::default()
            },
        );
        assert!(id.is_none());
        assert!(!target.has_listeners("click"));
    }

    #[test]
    fn test_capture_runs_first() {
        let target = EventTarget::new();
        let order = Rc::new(RefCell::new(Vec::new()));

        let log = order.clone();
        target.add_event_listener("click", move |_: &Event| log.borrow_mut().push("bubble"), false);
        let log = order.clone();
        target.add_event_listener("click", move |_: &Event| log.borrow_mut().push("capture"), true);

        target.dispatch_event(&Event::new("click"));
        assert_eq!(*order.borrow(), vec!["capture", "bubble"]);
    }

    #[test]
    fn test_passive_listener_cannot_prevent_default() {
        let target = EventTarget::new();
        target.add_event_listener(
            "wheel",
            |e: &Event| e.prevent_default(),
            ListenerOptions {
                passive: true,
                ..Default::default()
            },
        );

        let event = Event::new("wheel").cancelable();
        target.dispatch_event(&event);
        assert!(!event.is_default_prevented());
    }

    #[test]
    fn test_attribute_changed_detail() {
        let event = Event::attribute_changed("class", Some("old"), Some("new"));

        assert_eq!(event.event_type, ATTRIBUTE_CHANGED_EVENT);
        assert_eq!(
            event.detail,
            EventDetail::AttributeChanged {
                name: "class".to_string(),
                old_value: Some("old".to_string()),
                new_value: Some("new".to_string()),
            }
        );
    }
}
