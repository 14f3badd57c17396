//! Integration tests - Components from registration to teardown
//!
//! Tests the complete workflow: register → create → connect → disconnect,
//! plus styled element creation through the runtime.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use fos_components::css::{AttrValue, STYLES_KEY_ATTR, ShadowSource, StyleKey, StyledTagsOptions, StylesValue};
use fos_components::dom::{
    ComponentDefinition, CustomElementState, Event, Hooks, ShadowRootMode, StyleSheetOwner,
};
use fos_components::{Config, Runtime};

// ============================================================================
// LIFECYCLE
// ============================================================================

#[test]
fn test_hi_bye_scenario() {
    let runtime = Runtime::default();
    let log = Rc::new(RefCell::new(Vec::<String>::new()));

    let definition = {
        let log = log.clone();
        ComponentDefinition::new(move |_| {
            let log = log.clone();
            Hooks::new()
                .connected(|cx| {
                    cx.element().set_text_content("hi");
                    Ok(())
                })
                .disconnected(move |_| {
                    log.borrow_mut().push("bye".to_string());
                    Ok(())
                })
        })
    };
    assert!(runtime.register_custom_tag("x-greeting", definition).is_some());

    let mut doc = runtime.create_document();
    let el = doc.create_element("x-greeting");
    doc.append_child(&el);
    assert_eq!(el.text_content(), "hi");

    doc.remove_child(&el);
    assert_eq!(*log.borrow(), vec!["bye"]);

    doc.remove_child(&el);
    assert_eq!(*log.borrow(), vec!["bye"]);
}

#[test]
fn test_first_definition_wins() {
    let runtime = Runtime::default();
    let first = Rc::new(Cell::new(0));
    let second = Rc::new(Cell::new(0));

    let counting = |counter: &Rc<Cell<u32>>| {
        let counter = counter.clone();
        ComponentDefinition::new(move |_| {
            let counter = counter.clone();
            Hooks::new().connected(move |_| {
                counter.set(counter.get() + 1);
                Ok(())
            })
        })
    };

    assert!(runtime.register_custom_tag("foo-bar", counting(&first)).is_some());
    assert!(runtime.register_custom_tag("foo-bar", counting(&second)).is_none());

    let mut doc = runtime.create_document();
    for _ in 0..3 {
        let el = doc.create_element("foo-bar");
        doc.append_child(&el);
    }

    assert_eq!(first.get(), 3);
    assert_eq!(second.get(), 0);
}

#[test]
fn test_disconnect_silences_scoped_listeners() {
    let runtime = Runtime::default();
    let mut doc = runtime.create_document();
    let bus = doc.create_element("div");
    let hits = Rc::new(Cell::new(0));

    let definition = {
        let bus = bus.clone();
        let hits = hits.clone();
        ComponentDefinition::new(move |cx| {
            for event in ["alpha", "beta", "gamma"] {
                let hits = hits.clone();
                cx.listen(bus.event_target(), event, move |_| hits.set(hits.get() + 1), false);
            }
            Hooks::new()
        })
    };
    runtime.register_custom_tag("x-listener", definition);

    let el = doc.create_element("x-listener");
    doc.append_child(&el);
    for event in ["alpha", "beta", "gamma"] {
        bus.dispatch_event(&Event::new(event));
    }
    assert_eq!(hits.get(), 3);

    doc.remove_child(&el);
    for event in ["alpha", "beta", "gamma"] {
        assert_eq!(bus.dispatch_event(&Event::new(event)), 0);
    }
    assert_eq!(hits.get(), 3);
    assert_eq!(bus.event_target().listener_count(), 0);
}

#[test]
fn test_late_definition_upgrades_on_connect() {
    let runtime = Runtime::default();
    let mut doc = runtime.create_document();
    let el = doc.create_element("x-late");
    assert_eq!(el.custom_state(), CustomElementState::Undefined);

    let connected = Rc::new(Cell::new(false));
    let flag = connected.clone();
    runtime.register_custom_tag(
        "x-late",
        ComponentDefinition::new(move |_| {
            let flag = flag.clone();
            Hooks::new().connected(move |_| {
                flag.set(true);
                Ok(())
            })
        }),
    );

    doc.append_child(&el);
    assert_eq!(el.custom_state(), CustomElementState::Custom);
    assert!(connected.get());
}

#[test]
fn test_moving_between_documents() {
    let runtime = Runtime::new(Config {
        emit_lifecycle_events: true,
        ..Config::default()
    });
    let moves = Rc::new(Cell::new(0));
    let counter = moves.clone();
    runtime.register_custom_tag(
        "x-move",
        ComponentDefinition::new(move |_| {
            let counter = counter.clone();
            Hooks::new().adopted(move |_, old, new| {
                assert_ne!(old, new);
                counter.set(counter.get() + 1);
                Ok(())
            })
        }),
    );

    let mut a = runtime.create_document();
    let mut b = runtime.create_document();
    let el = a.create_element("x-move");
    a.append_child(&el);

    b.adopt_node(&el, &mut a);
    b.append_child(&el);

    assert_eq!(moves.get(), 1);
    assert!(b.contains(&el));
    assert!(!a.contains(&el));
}

// ============================================================================
// STYLED ELEMENTS
// ============================================================================

#[test]
fn test_styled_component_end_to_end() {
    let mut runtime = Runtime::default();
    let doc = runtime.create_document();
    let tags = runtime.use_styled_tags(StyledTagsOptions::default());
    let css = "& { color: red; } & .child { color: blue; }";

    let a = runtime.create_element(&tags, &doc, "div", [("styles", AttrValue::from(css))]);
    let b = runtime.create_element(&tags, &doc, "div", [("styles", AttrValue::from(css))]);

    let key = StyleKey::from_css(css);
    assert_eq!(a.get_attribute(STYLES_KEY_ATTR), b.get_attribute(STYLES_KEY_ATTR));
    assert_eq!(a.get_attribute(STYLES_KEY_ATTR).as_deref(), Some(key.as_str()));
    assert_eq!(doc.adopted_style_sheets().len(), 1);
    assert_eq!(
        runtime.styles().css_text(&doc),
        format!("[styles-key=\"{key}\"] {{ color: red; }}\n[styles-key=\"{key}\"] .child {{ color: blue; }}")
    );
}

#[test]
fn test_component_styles_its_shadow_root() {
    let mut runtime = Runtime::default();
    let mut doc = runtime.create_document();
    runtime.register_custom_tag("x-card", ComponentDefinition::new(|_| Hooks::new()));

    let card = doc.create_element("x-card");
    doc.append_child(&card);
    let root = card.attach_shadow(ShadowRootMode::Open);

    let tags = runtime.use_styled_tags(StyledTagsOptions {
        shadow: Some(ShadowSource::resolver({
            let card = card.clone();
            move || card.shadow_root()
        })),
        ..Default::default()
    });
    let title = runtime.create_element(
        &tags,
        &doc,
        "h2",
        [
            ("styles", AttrValue::from(StylesValue::keyed("card-title", "& { font-weight: bold; }"))),
            ("hidden", AttrValue::from(false)),
        ],
    );

    assert_eq!(title.get_attribute(STYLES_KEY_ATTR).as_deref(), Some("card-title"));
    assert!(!title.has_attribute("hidden"));
    assert_eq!(root.adopted_style_sheets().len(), 1);
    assert!(doc.adopted_style_sheets().is_empty());
}

#[test]
fn test_explicit_sheets_and_close() {
    let mut runtime = Runtime::default();
    let doc = runtime.create_document();

    let theme = runtime.create_style_sheet(&doc, "theme");
    assert_eq!(runtime.create_style_sheet(&doc, "theme"), theme);
    runtime.styles_mut().insert_rules(theme, ":root { --accent: teal; }");
    assert_eq!(runtime.styles().css_text(&doc), ":root { --accent: teal; }");

    runtime.close_document(doc);
    assert!(runtime.styles().is_empty());
    assert!(runtime.styles().sheet(theme).is_none());
}
