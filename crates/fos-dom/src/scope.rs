//! Cancellation scope
//!
//! Owns a set of listener registrations and severs all of them at once.

use std::cell::{Cell, RefCell};

use crate::{AbortController, AbortSignal, Event, EventTarget, ListenerId, ListenerOptionsArg};

struct Registration {
    target: EventTarget,
    listener: ListenerId,
}

/// Listener registrations that live until `release` (or drop)
#[derive(Default)]
pub struct CancellationScope {
    controller: AbortController,
    registrations: RefCell<Vec<Registration>>,
    released: Cell<bool>,
}

impl CancellationScope {
    pub fn new() -> Self {
        Self::default()
    }

    /// Signal aborted on release
    pub fn signal(&self) -> &AbortSignal {
        self.controller.signal()
    }

    /// Register a listener owned by this scope. A caller-supplied signal
    /// still applies alongside the scope's own. Returns `None` once the
    /// scope is released.
    pub fn listen<F>(
        &self,
        target: &EventTarget,
        event_type: &str,
        handler: F,
        options: impl Into<ListenerOptionsArg>,
    ) -> Option<ListenerId>
    where
        F: FnMut(&Event) + 'static,
    {
        if self.released.get() {
            tracing::debug!(event = event_type, "listen on released scope ignored");
            return None;
        }

        let mut options = options.into().into_options();
        options.signal = Some(match options.signal.take() {
            Some(own) => AbortSignal::any(&[own, self.signal().clone()]),
            None => self.signal().clone(),
        });

        let listener = target.add_event_listener(event_type, handler, options)?;
        self.registrations.borrow_mut().push(Registration {
            target: target.clone(),
            listener,
        });
        Some(listener)
    }

    /// Remove every registration. Returns `true` only on the first call.
    pub fn release(&self) -> bool {
        if self.released.replace(true) {
            return false;
        }
        self.controller.abort(Some("scope released"));
        let registrations = self.registrations.take();
        let count = registrations.len();
        for registration in registrations {
            registration.target.remove_event_listener(registration.listener);
        }
        tracing::trace!(listeners = count, "cancellation scope released");
        true
    }

    pub fn is_released(&self) -> bool {
        self.released.get()
    }

    /// Registrations still held
    pub fn len(&self) -> usize {
        self.registrations.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.registrations.borrow().is_empty()
    }
}

impl Drop for CancellationScope {
    fn drop(&mut self) {
        self.release();
    }
}

impl std::fmt::Debug for CancellationScope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CancellationScope")
            .field("registrations", &self.len())
            .field("released", &self.released.get())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ListenerOptions;
    use std::rc::Rc;

    #[test]
    fn test_release_removes_listeners() {
        let scope = CancellationScope::new();
        let target = EventTarget::new();
        let hits = Rc::new(Cell::new(0));

        let h = hits.clone();
        scope.listen(&target, "click", move |_: &Event| h.set(h.get() + 1), false);
        target.dispatch_event(&Event::new("click"));
        assert_eq!(hits.get(), 1);

        assert!(scope.release());
        assert_eq!(target.listener_count(), 0);
        target.dispatch_event(&Event::new("click"));
        assert_eq!(hits.get(), 1);
    }

    #[test]
    fn test_release_is_idempotent() {
        let scope = CancellationScope::new();
        assert!(scope.release());
        assert!(!scope.release());
        assert!(scope.is_released());
        assert!(scope.signal().is_aborted());
    }

    #[test]
    fn test_listen_after_release_is_ignored() {
        let scope = CancellationScope::new();
        let target = EventTarget::new();
        scope.release();

        assert!(scope.listen(&target, "click", |_: &Event| {}, false).is_none());
        assert_eq!(target.listener_count(), 0);
    }

    #[test]
    fn test_caller_signal_still_applies() {
        let scope = CancellationScope::new();
        let target = EventTarget::new();
        let own = AbortController::new();

        scope.listen(
            &target,
            "input",
            |_: &Event| {},
            ListenerOptions {
                signal: Some(own.signal().clone()),
                ..Default::default()
            },
        );
        assert!(target.has_listeners("input"));

        own.abort(None);
        assert!(!target.has_listeners("input"));
        assert!(!scope.is_released());
    }

    #[test]
    fn test_drop_releases() {
        let target = EventTarget::new();
        {
            let scope = CancellationScope::new();
            scope.listen(&target, "keydown", |_: &Event| {}, true);
            assert_eq!(target.listener_count(), 1);
        }
        assert_eq!(target.listener_count(), 0);
    }
}
