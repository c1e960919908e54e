//! Browser-side tests for the JS bridge; run with `wasm-pack test --headless`

#![cfg(target_arch = "wasm32")]

use doc_address::WasmSession;
use wasm_bindgen::prelude::*;
use wasm_bindgen_test::*;

wasm_bindgen_test_configure!(run_in_browser);

const SNAPSHOT: &str = r#"{"type":"BODY_SECTION","children":[
    {"type":"PARAGRAPH","children":[{"type":"TEXT","text":"alpha"}]},
    {"type":"PARAGRAPH","children":[{"type":"TEXT","text":"beta"}]}
]}"#;

fn session() -> WasmSession {
    let mut session = WasmSession::new("doc", "dana", "dana@example.org");
    session.load_document(SNAPSHOT).unwrap();
    session
}

#[wasm_bindgen_test]
fn resolves_cursor() {
    let position = session()
        .resolve_position(r#"{"cursor":{"node":4,"offset":2}}"#)
        .unwrap();
    assert_eq!(position.as_deref(), Some(r#"{"paragraphIndex":1,"offset":2}"#));
}

#[wasm_bindgen_test]
fn bad_snapshot_is_js_error() {
    let mut session = WasmSession::new("doc", "dana", "dana@example.org");
    let err = session.load_document("not json").unwrap_err();
    assert!(err.as_string().is_some());
}

#[wasm_bindgen_test]
fn dispatches_to_handler_methods() {
    let handler = js_sys::Object::new();
    let calls = js_sys::Array::new();
    let record = {
        let calls = calls.clone();
        Closure::<dyn Fn(JsValue, JsValue, JsValue)>::new(
            move |p: JsValue, o: JsValue, e: JsValue| {
                calls.push(&js_sys::Array::of3(&p, &o, &e));
            },
        )
    };
    js_sys::Reflect::set(&handler, &"highlightText".into(), record.as_ref()).unwrap();

    let body = r#"{"actions":[
        {"action":"highlightText","paragraph_index":1,"offset":0,"end_offset":3},
        {"action":"showSidebar","html":"<p/>"}
    ]}"#;
    let awaiting = session().process_response(body, &handler).unwrap();

    assert!(!awaiting);
    assert_eq!(calls.length(), 1);
    let args: js_sys::Array = calls.get(0).dyn_into().unwrap();
    assert_eq!(args.get(0).as_f64(), Some(1.0));
    assert_eq!(args.get(2).as_f64(), Some(3.0));
}

#[wasm_bindgen_test]
fn progress_asks_for_more() {
    let handler = js_sys::Object::new();
    let body = r#"{"actions":[{"action":"updateProgress","progress":"10"}]}"#;
    assert!(session().process_response(body, &handler).unwrap());
}
