#![cfg(target_arch = "wasm32")]
use js_sys::{Function, Object, Reflect};
use wasm_bindgen::JsValue;
use wasm_bindgen_test::*;

use scrollcue_orchestrator_wasm::{abi_version, ScrollCue};

fn host_object(select: Function, bounds: Function) -> JsValue {
    let host = Object::new();
    Reflect::set(&host, &JsValue::from_str("select"), &select).unwrap();
    Reflect::set(&host, &JsValue::from_str("bounds"), &bounds).unwrap();
    host.into()
}

fn page_host() -> JsValue {
    let select = Function::new_with_args(
        "root, selector",
        "if (selector === '#about') return ['about'];
         if (selector === '.card') return ['card-0', 'card-1'];
         return [];",
    );
    let bounds = Function::new_with_args(
        "handle",
        "return handle === 'about' ? { x: 0, y: 900, width: 1280, height: 1200 } : null;",
    );
    host_object(select, bounds)
}

fn engine() -> ScrollCue {
    ScrollCue::new(JsValue::UNDEFINED, page_host(), Some(1280.0), Some(900.0)).unwrap()
}

const CARDS: &str = r##"{
    "trigger": { "element": "#about", "start": "top 80%" },
    "policy": "play none none reverse",
    "motion": { "tween": {
        "targets": ".card",
        "props": [{ "property": "opacity", "from": 0, "to": 1 }],
        "duration": 0.5,
        "stagger": 0.1
    } }
}"##;

#[wasm_bindgen_test]
fn abi_is_1() {
    assert_eq!(abi_version(), 1);
}

#[wasm_bindgen_test]
fn register_scroll_and_tick() {
    let mut cue = engine();
    let scope = cue.mount("about".into(), Some("about".into()));
    let reg = cue.register(scope, JsValue::from_str(CARDS)).unwrap();
    assert_eq!(cue.state(reg).unwrap().as_string().as_deref(), Some("idle"));

    cue.on_scroll(400.0);
    assert_eq!(cue.state(reg).unwrap().as_string().as_deref(), Some("playing"));

    let frame = Object::from(cue.tick(0.016).unwrap());
    for key in ["epoch", "dt", "writes", "events"] {
        assert!(Reflect::has(&frame, &JsValue::from_str(key)).unwrap());
    }
}

#[wasm_bindgen_test]
fn viewport_at_construction_matches_a_later_resize() {
    let mut sized = engine();
    let mut resized = ScrollCue::new(JsValue::UNDEFINED, page_host(), None, None).unwrap();
    resized.on_resize(1280.0, 900.0);
    for cue in [&mut sized, &mut resized] {
        let scope = cue.mount("about".into(), Some("about".into()));
        let reg = cue.register(scope, JsValue::from_str(CARDS)).unwrap();
        cue.on_scroll(150.0);
        assert_eq!(cue.state(reg).unwrap().as_string().as_deref(), Some("idle"));
        cue.on_scroll(200.0);
        assert_eq!(cue.state(reg).unwrap().as_string().as_deref(), Some("playing"));
    }
}

#[wasm_bindgen_test]
fn partial_or_degenerate_viewport_is_rejected() {
    assert!(ScrollCue::new(JsValue::NULL, page_host(), Some(1280.0), None).is_err());
    assert!(ScrollCue::new(JsValue::NULL, page_host(), Some(0.0), Some(900.0)).is_err());
    assert!(ScrollCue::new(JsValue::NULL, page_host(), Some(f32::NAN), Some(900.0)).is_err());
}

#[wasm_bindgen_test]
fn host_needs_select_and_bounds() {
    assert!(ScrollCue::new(JsValue::NULL, JsValue::NULL, None, None).is_err());
    assert!(ScrollCue::new(JsValue::NULL, Object::new().into(), None, None).is_err());
}

#[wasm_bindgen_test]
fn bad_spec_is_a_js_error() {
    let mut cue = engine();
    let scope = cue.mount("about".into(), None);
    assert!(cue.register(scope, JsValue::NULL).is_err());
    assert!(cue.register(scope, JsValue::from_str("{ \"motion\": 1 }")).is_err());
}

#[wasm_bindgen_test]
fn throwing_host_callbacks_are_ignored() {
    let select = Function::new_with_args("root, selector", "throw new Error('boom');");
    let bounds = Function::new_with_args("handle", "throw new Error('boom');");
    let mut cue = ScrollCue::new(JsValue::NULL, host_object(select, bounds), None, None).unwrap();
    let scope = cue.mount("about".into(), None);
    let reg = cue.register(scope, JsValue::from_str(CARDS)).unwrap();
    cue.on_scroll(400.0);
    assert!(cue.tick(0.016).is_ok());
    assert_eq!(cue.progress(reg), Some(0.0));
    assert!(cue.pointer_move("about".into(), 10.0, 10.0).unwrap().is_null());
}

#[wasm_bindgen_test]
fn unmount_reports_disposal() {
    let mut cue = engine();
    let scope = cue.mount("about".into(), Some("about".into()));
    cue.register(scope, JsValue::from_str(CARDS)).unwrap();
    let disposal = cue.unmount(scope).unwrap();
    let registrations = Reflect::get(&disposal, &JsValue::from_str("registrations")).unwrap();
    assert_eq!(registrations.as_f64(), Some(1.0));
    assert!(cue.fire(0).is_err());
}
