//! External resource loading
//!
//! Scripts are inserted before the first `<script>` on the page and awaited;
//! stylesheets are inserted before the first `<link>` and not awaited.
//! A script load resolves to an error on the element's `error` event or after
//! the optional timeout, so a dead CDN cannot stall the view forever.

use std::cell::RefCell;
use std::collections::{HashMap, HashSet};
use std::rc::Rc;

use js_sys::{Function, Promise};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;
use web_sys::{Document, HtmlLinkElement, HtmlScriptElement, Node};

use crate::error::{js_error_message, LoadError};

const TIMEOUT_REASON: &str = "timeout";

thread_local! {
    static PAGE_RESOURCES: Rc<ResourceLoader> = Rc::new(ResourceLoader::new());
}

/// The loader shared by every render on this page
pub fn page_resources() -> Rc<ResourceLoader> {
    PAGE_RESOURCES.with(Rc::clone)
}

/// Loads each URL at most once and remembers what is ready
///
/// Concurrent loads of one script share a single `<script>` element.
#[derive(Debug, Default)]
pub struct ResourceLoader {
    loaded: RefCell<HashSet<String>>,
    pending: RefCell<HashMap<String, Promise>>,
}

impl ResourceLoader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether `url` has finished loading through this loader
    pub fn is_loaded(&self, url: &str) -> bool {
        self.loaded.borrow().contains(url)
    }

    pub async fn load_script(&self, url: &str, timeout_ms: Option<u32>) -> Result<(), LoadError> {
        if self.is_loaded(url) {
            return Ok(());
        }

        let in_flight = self.pending.borrow().get(url).cloned();
        let promise = match in_flight {
            Some(promise) => promise,
            None => {
                let promise = insert_script(url, timeout_ms)?;
                self.pending.borrow_mut().insert(url.to_string(), promise.clone());
                promise
            }
        };

        let result = settle_script(url, promise, timeout_ms).await;
        self.pending.borrow_mut().remove(url);
        if result.is_ok() {
            self.loaded.borrow_mut().insert(url.to_string());
        }
        result
    }

    /// Load a script that defines `global`, unless the page already has it
    pub async fn load_library(
        &self,
        url: &str,
        global: &str,
        timeout_ms: Option<u32>,
    ) -> Result<(), LoadError> {
        if global_defined(global) {
            self.loaded.borrow_mut().insert(url.to_string());
            return Ok(());
        }
        self.load_script(url, timeout_ms).await
    }

    pub fn load_stylesheet(&self, url: &str) -> Result<(), LoadError> {
        if self.is_loaded(url) {
            return Ok(());
        }
        load_stylesheet(url)?;
        self.loaded.borrow_mut().insert(url.to_string());
        Ok(())
    }
}

fn global_defined(name: &str) -> bool {
    js_sys::Reflect::get(&js_sys::global(), &JsValue::from_str(name))
        .map(|v| !v.is_undefined() && !v.is_null())
        .unwrap_or(false)
}

fn current_document(url: &str) -> Result<Document, LoadError> {
    web_sys::window()
        .and_then(|w| w.document())
        .ok_or_else(|| LoadError::NoDocument { url: url.to_string() })
}

fn dom_error(url: &str) -> impl Fn(JsValue) -> LoadError + '_ {
    move |e| LoadError::Dom {
        url: url.to_string(),
        message: js_error_message(&e),
    }
}

/// Insert `node` before the first `anchor_tag` element, or into `<head>`
fn insert_near_first(document: &Document, anchor_tag: &str, node: &Node) -> Result<(), JsValue> {
    let anchor = document.get_elements_by_tag_name(anchor_tag).item(0);
    if let Some((parent, anchor)) = anchor.and_then(|a| a.parent_node().map(|p| (p, a))) {
        let anchor: &Node = &anchor;
        parent.insert_before(node, Some(anchor))?;
        return Ok(());
    }

    let parent: Node = match document.head() {
        Some(head) => head.into(),
        None => document
            .document_element()
            .ok_or_else(|| JsValue::from_str("document has no root element"))?
            .into(),
    };
    parent.append_child(node)?;
    Ok(())
}

/// Insert the `<script>` element; the promise settles on load, error or timeout
fn insert_script(url: &str, timeout_ms: Option<u32>) -> Result<Promise, LoadError> {
    let document = current_document(url)?;
    let script: HtmlScriptElement = document
        .create_element("script")
        .map_err(dom_error(url))?
        .dyn_into()
        .map_err(|_| LoadError::Dom {
            url: url.to_string(),
            message: "created element is not a script".to_string(),
        })?;
    script.set_type("text/javascript");
    script.set_async(true);
    script.set_src(url);

    let promise = Promise::new(&mut |resolve, reject| {
        let on_load = Closure::once_into_js(move || {
            let _ = resolve.call0(&JsValue::UNDEFINED);
        });
        script.set_onload(Some(on_load.unchecked_ref()));

        let reject_timeout = reject.clone();
        let on_error = Closure::once_into_js(move || {
            let _ = reject.call1(&JsValue::UNDEFINED, &JsValue::from_str("error"));
        });
        script.set_onerror(Some(on_error.unchecked_ref()));

        if let (Some(ms), Some(window)) = (timeout_ms, web_sys::window()) {
            let on_timeout = Closure::once_into_js(move || {
                let reason = JsValue::from_str(TIMEOUT_REASON);
                let _ = reject_timeout.call1(&JsValue::UNDEFINED, &reason);
            });
            let delay = i32::try_from(ms).unwrap_or(i32::MAX);
            let armed = window.set_timeout_with_callback_and_timeout_and_arguments_0(
                on_timeout.unchecked_ref::<Function>(),
                delay,
            );
            if let Err(e) = armed {
                log::warn!("could not arm load timeout for {}: {}", url, js_error_message(&e));
            }
        }
    });

    insert_near_first(&document, "script", &script).map_err(dom_error(url))?;
    log::debug!("loading script {}", url);
    Ok(promise)
}

async fn settle_script(
    url: &str,
    promise: Promise,
    timeout_ms: Option<u32>,
) -> Result<(), LoadError> {
    match JsFuture::from(promise).await {
        Ok(_) => {
            log::info!("loaded script {}", url);
            Ok(())
        }
        Err(reason) if reason.as_string().as_deref() == Some(TIMEOUT_REASON) => {
            Err(LoadError::Timeout {
                url: url.to_string(),
                timeout_ms: timeout_ms.unwrap_or_default(),
            })
        }
        Err(_) => Err(LoadError::Failed { url: url.to_string() }),
    }
}

/// Insert a stylesheet link; there is no completion signal
pub fn load_stylesheet(url: &str) -> Result<(), LoadError> {
    let document = current_document(url)?;
    let link: HtmlLinkElement = document
        .create_element("link")
        .map_err(dom_error(url))?
        .dyn_into()
        .map_err(|_| LoadError::Dom {
            url: url.to_string(),
            message: "created element is not a link".to_string(),
        })?;
    link.set_rel("stylesheet");
    link.set_type("text/css");
    link.set_href(url);

    insert_near_first(&document, "link", &link).map_err(dom_error(url))?;
    log::debug!("loading stylesheet {}", url);
    Ok(())
}

/// Resolve once the document has been parsed
pub async fn document_ready(document: &Document) -> Result<(), LoadError> {
    if document.ready_state() != "loading" {
        return Ok(());
    }

    let promise = Promise::new(&mut |resolve, _reject| {
        let on_ready = Closure::once_into_js(move || {
            let _ = resolve.call0(&JsValue::UNDEFINED);
        });
        let listening =
            document.add_event_listener_with_callback("DOMContentLoaded", on_ready.unchecked_ref());
        if let Err(e) = listening {
            log::warn!("could not wait for DOMContentLoaded: {}", js_error_message(&e));
        }
    });

    JsFuture::from(promise).await.map(|_| ()).map_err(|e| LoadError::Dom {
        url: document.url().unwrap_or_default(),
        message: js_error_message(&e),
    })
}
