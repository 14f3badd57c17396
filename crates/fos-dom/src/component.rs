//! Component adapter
//!
//! Wraps a setup function into a custom element class. Every instance owns
//! a [`CancellationScope`]; listeners registered through
//! [`ComponentContext::listen`] are severed when the instance disconnects.
//!
//! Registration is first-wins: once a tag name is defined, later
//! registrations for it are ignored.

use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::rc::Rc;

use crate::{
    AbortSignal, CancellationScope, CustomElementCallbacks, CustomElementDefinition,
    CustomElementRegistry, DocumentId, Element, Event, EventTarget, ListenerId,
    ListenerOptionsArg,
};

/// Result returned by lifecycle hooks. Errors are logged, never propagated.
pub type HookResult = anyhow::Result<()>;

type SetupFn = dyn Fn(&ComponentContext) -> Hooks;
type LifecycleHook = Box<dyn FnMut(&ComponentContext) -> HookResult>;
type AdoptedHook = Box<dyn FnMut(&ComponentContext, DocumentId, DocumentId) -> HookResult>;
type AttributeHook = Box<dyn FnMut(&ComponentContext, &AttributeChange) -> HookResult>;

/// Component definition: observed attributes plus a setup function that
/// runs once per element instance.
#[derive(Clone)]
pub struct ComponentDefinition {
    attrs: Vec<String>,
    setup: Rc<SetupFn>,
}

impl ComponentDefinition {
    pub fn new<F>(setup: F) -> Self
    where
        F: Fn(&ComponentContext) -> Hooks + 'static,
    {
        Self {
            attrs: Vec::new(),
            setup: Rc::new(setup),
        }
    }

    /// Attributes whose changes reach `attribute_changed`
    pub fn with_attrs<I, S>(mut self, attrs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.attrs = attrs.into_iter().map(Into::into).collect();
        self
    }

    pub fn attrs(&self) -> &[String] {
        &self.attrs
    }
}

/// Lifecycle hooks returned by setup
#[derive(Default)]
pub struct Hooks {
    connected: Option<LifecycleHook>,
    disconnected: Option<LifecycleHook>,
    adopted: Option<AdoptedHook>,
    attribute_changed: Option<AttributeHook>,
}

impl Hooks {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn connected<F>(mut self, hook: F) -> Self
    where
        F: FnMut(&ComponentContext) -> HookResult + 'static,
    {
        self.connected = Some(Box::new(hook));
        self
    }

    pub fn disconnected<F>(mut self, hook: F) -> Self
    where
        F: FnMut(&ComponentContext) -> HookResult + 'static,
    {
        self.disconnected = Some(Box::new(hook));
        self
    }

    pub fn adopted<F>(mut self, hook: F) -> Self
    where
        F: FnMut(&ComponentContext, DocumentId, DocumentId) -> HookResult + 'static,
    {
        self.adopted = Some(Box::new(hook));
        self
    }

    pub fn attribute_changed<F>(mut self, hook: F) -> Self
    where
        F: FnMut(&ComponentContext, &AttributeChange) -> HookResult + 'static,
    {
        self.attribute_changed = Some(Box::new(hook));
        self
    }
}

/// Observed attribute mutation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttributeChange {
    pub name: String,
    pub old_value: Option<String>,
    pub new_value: Option<String>,
}

/// Registration options
#[derive(Debug, Clone, Copy, Default)]
pub struct RegisterOptions {
    /// Also dispatch `connected` / `attribute-changed` events on the element
    pub emit_events: bool,
}

/// Per-instance handle given to setup and every hook
#[derive(Clone)]
pub struct ComponentContext {
    element: Element,
    scope: SharedScope,
}

type SharedScope = Rc<RefCell<Rc<CancellationScope>>>;

impl ComponentContext {
    pub fn element(&self) -> &Element {
        &self.element
    }

    /// Register a listener that lives until the instance disconnects
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
        self.current_scope().listen(target, event_type, handler, options)
    }

    /// Signal of the current cancellation scope
    pub fn signal(&self) -> AbortSignal {
        self.current_scope().signal().clone()
    }

    fn current_scope(&self) -> Rc<CancellationScope> {
        self.scope.borrow().clone()
    }

    /// Reconnecting instances get a fresh scope
    fn renew_scope(&self) {
        let mut scope = self.scope.borrow_mut();
        if scope.is_released() {
            *scope = Rc::new(CancellationScope::new());
        }
    }
}

/// Hooks bound to one instance. Each slot is borrowed separately so one
/// hook may trigger another.
struct BoundHooks {
    connected: RefCell<Option<LifecycleHook>>,
    disconnected: RefCell<Option<LifecycleHook>>,
    adopted: RefCell<Option<AdoptedHook>>,
    attribute_changed: RefCell<Option<AttributeHook>>,
}

impl From<Hooks> for BoundHooks {
    fn from(hooks: Hooks) -> Self {
        Self {
            connected: RefCell::new(hooks.connected),
            disconnected: RefCell::new(hooks.disconnected),
            adopted: RefCell::new(hooks.adopted),
            attribute_changed: RefCell::new(hooks.attribute_changed),
        }
    }
}

/// Instance state, stored on the element itself. It holds no strong
/// reference back to the element, so dropping the last element handle
/// drops the hooks and the scope.
struct ElementInstance {
    scope: SharedScope,
    hooks: BoundHooks,
    /// Attribute changes waiting for the hook
    pending: RefCell<VecDeque<AttributeChange>>,
    delivering: Cell<bool>,
}

impl ElementInstance {
    fn context(&self, element: &Element) -> ComponentContext {
        ComponentContext {
            element: element.clone(),
            scope: self.scope.clone(),
        }
    }
}

/// Releases the scope when dropped, including during unwinding
struct ReleaseOnDrop(Rc<CancellationScope>);

impl Drop for ReleaseOnDrop {
    fn drop(&mut self) {
        self.0.release();
    }
}

/// Clears the delivering flag, including during unwinding
struct Delivering<'a>(&'a Cell<bool>);

impl Drop for Delivering<'_> {
    fn drop(&mut self) {
        self.0.set(false);
    }
}

fn run_hook<H>(
    tag: &str,
    hook_name: &'static str,
    slot: &RefCell<Option<H>>,
    call: impl FnOnce(&mut H) -> HookResult,
) {
    let Ok(mut guard) = slot.try_borrow_mut() else {
        tracing::warn!(tag, hook = hook_name, "hook re-entered itself; skipped");
        return;
    };
    let Some(hook) = guard.as_mut() else {
        return;
    };
    if let Err(err) = call(hook) {
        tracing::warn!(tag, hook = hook_name, error = %err, "component hook failed");
    }
}

/// Element class produced by `register_custom_tag`
struct ComponentClass {
    tag: String,
    setup: Rc<SetupFn>,
    emit_events: bool,
}

impl ComponentClass {
    fn instance(&self, element: &Element) -> Option<Rc<ElementInstance>> {
        element.instance()?.downcast::<ElementInstance>().ok()
    }
}

impl CustomElementCallbacks for ComponentClass {
    fn construct(&self, element: &Element) {
        let scope: SharedScope = Rc::new(RefCell::new(Rc::new(CancellationScope::new())));
        let context = ComponentContext {
            element: element.clone(),
            scope: scope.clone(),
        };
        let hooks = (self.setup)(&context);
        element.set_instance(Rc::new(ElementInstance {
            scope,
            hooks: hooks.into(),
            pending: RefCell::new(VecDeque::new()),
            delivering: Cell::new(false),
        }));
    }

    fn connected(&self, element: &Element) {
        let Some(instance) = self.instance(element) else {
            return;
        };
        let context = instance.context(element);
        context.renew_scope();
        run_hook(&self.tag, "connected", &instance.hooks.connected, |hook| hook(&context));
        if self.emit_events {
            element.dispatch_event(&Event::connected());
        }
    }

    fn disconnected(&self, element: &Element) {
        let Some(instance) = self.instance(element) else {
            return;
        };
        let context = instance.context(element);
        let _release = ReleaseOnDrop(context.current_scope());
        run_hook(&self.tag, "disconnected", &instance.hooks.disconnected, |hook| hook(&context));
    }

    fn adopted(&self, element: &Element, old_document: DocumentId, new_document: DocumentId) {
        let Some(instance) = self.instance(element) else {
            return;
        };
        let context = instance.context(element);
        run_hook(&self.tag, "adopted", &instance.hooks.adopted, |hook| {
            hook(&context, old_document, new_document)
        });
    }

    /// Changes are delivered in mutation order. A change made while the
    /// hook runs is queued and delivered after it returns.
    fn attribute_changed(
        &self,
        element: &Element,
        name: &str,
        old_value: Option<&str>,
        new_value: Option<&str>,
    ) {
        // Changes made during setup arrive before the instance exists
        let Some(instance) = self.instance(element) else {
            return;
        };
        instance.pending.borrow_mut().push_back(AttributeChange {
            name: name.to_string(),
            old_value: old_value.map(|s| s.to_string()),
            new_value: new_value.map(|s| s.to_string()),
        });
        if instance.delivering.replace(true) {
            return;
        }
        let _delivering = Delivering(&instance.delivering);

        let context = instance.context(element);
        loop {
            let next = instance.pending.borrow_mut().pop_front();
            let Some(change) = next else {
                break;
            };
            run_hook(&self.tag, "attribute_changed", &instance.hooks.attribute_changed, |hook| {
                hook(&context, &change)
            });
            if self.emit_events {
                element.dispatch_event(&Event::attribute_changed(
                    &change.name,
                    change.old_value.as_deref(),
                    change.new_value.as_deref(),
                ));
            }
        }
    }
}

/// Register a component under `tag_name`.
///
/// Returns the new definition, or `None` when the name is already defined
/// (the first definition stays in effect) or is not a valid custom element
/// name. The observed attribute list is copied now; later edits to the
/// definition have no effect on the registered tag.
pub fn register_custom_tag(
    registry: &CustomElementRegistry,
    tag_name: &str,
    definition: ComponentDefinition,
    options: RegisterOptions,
) -> Option<Rc<CustomElementDefinition>> {
    if registry.is_defined(tag_name) {
        tracing::debug!(tag = tag_name, "custom tag already registered; keeping first definition");
        return None;
    }

    let class = ComponentClass {
        tag: tag_name.to_string(),
        setup: definition.setup.clone(),
        emit_events: options.emit_events,
    };

    match registry.define(tag_name, definition.attrs.clone(), Rc::new(class)) {
        Ok(defined) => Some(defined),
        Err(err) => {
            tracing::warn!(tag = tag_name, error = %err, "custom tag not registered");
            None
        }
    }
}
