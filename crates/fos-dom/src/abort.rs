//! AbortController and AbortSignal
//!
//! Cancellation tokens for event listener registrations.

use std::cell::RefCell;
use std::rc::Rc;

/// AbortController - cancellation controller
#[derive(Debug, Clone, Default)]
pub struct AbortController {
    signal: AbortSignal,
}

/// AbortSignal - cancellation state
#[derive(Debug, Clone, Default)]
pub struct AbortSignal {
    inner: Rc<RefCell<AbortSignalInner>>,
}

#[derive(Debug, Default)]
struct AbortSignalInner {
    aborted: bool,
    reason: Option<String>,
    /// Signals this one follows (see `AbortSignal::any`)
    sources: Vec<AbortSignal>,
}

impl AbortController {
    /// Create a new abort controller
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the associated signal
    pub fn signal(&self) -> &AbortSignal {
        &self.signal
    }

    /// Abort with optional reason. Returns `false` if already aborted.
    pub fn abort(&self, reason: Option<&str>) -> bool {
        self.signal.abort(reason)
    }
}

impl AbortSignal {
    /// Create an already-aborted signal
    pub fn aborted(reason: Option<&str>) -> Self {
        let signal = Self::default();
        signal.abort(reason);
        signal
    }

    /// Signal that reads as aborted once any of `signals` is aborted
    pub fn any(signals: &[AbortSignal]) -> Self {
        let signal = Self::default();
        signal.inner.borrow_mut().sources = signals.to_vec();
        signal
    }

    /// Check if aborted
    pub fn is_aborted(&self) -> bool {
        let inner = self.inner.borrow();
        inner.aborted || inner.sources.iter().any(|s| s.is_aborted())
    }

    /// Get abort reason
    pub fn reason(&self) -> Option<String> {
        let inner = self.inner.borrow();
        if inner.aborted {
            return inner.reason.clone();
        }
        inner
            .sources
            .iter()
            .find(|s| s.is_aborted())
            .and_then(|s| s.reason())
    }

    /// Whether both handles point at the same signal
    pub fn ptr_eq(&self, other: &AbortSignal) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }

    fn abort(&self, reason: Option<&str>) -> bool {
        let mut inner = self.inner.borrow_mut();
        if inner.aborted {
            return false;
        }
        inner.aborted = true;
        inner.reason = reason.map(|s| s.to_string());
        true
    }
}
