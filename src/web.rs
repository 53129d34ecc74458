//! Browser host bindings.
//!
//! Hover anchors and page scrolling are read from the DOM and delivered to the
//! scene as [`SceneEvent`]s. Anchors that are missing from the page are
//! skipped with a warning; the rest of the scene keeps working without them.

use wasm_bindgen::{JsCast, prelude::*};

use crate::{
    config::{AnchorConfig, SceneConfig},
    error::BindingError,
    flow::{EventSink, HostBinder, run},
    material::VariantTable,
    scene::{DogScene, HoverEvent, SceneEvent},
    timeline::ScrollBounds,
};

/// Binds hover enter/leave on the variant anchors, pointer moves over the
/// document and the page scroll.
pub fn dom_binder<S: 'static>(
    anchors: AnchorConfig,
    variants: VariantTable,
) -> HostBinder<S, SceneEvent> {
    Box::new(move |sink: EventSink<S, SceneEvent>| {
        let Some(window) = web_sys::window() else {
            log::warn!("no browser window, host bindings skipped");
            return;
        };
        let Some(document) = window.document() else {
            log::warn!("no document, host bindings skipped");
            return;
        };

        for (name, _) in variants.iter() {
            let enter = SceneEvent::Hover(HoverEvent::Enter(name.to_string()));
            if let Err(e) = bind_first(
                &document,
                &anchors.hover_anchor(name),
                "mouseenter",
                sink.clone(),
                enter,
            ) {
                log::warn!("{}", e);
            }
        }
        if let Err(e) = bind_all(
            &document,
            &anchors.hover_selector,
            "mouseleave",
            sink.clone(),
            SceneEvent::Hover(HoverEvent::Leave),
        ) {
            log::warn!("{}", e);
        }
        if let Err(e) = bind_pointer(&window, &document, sink.clone()) {
            log::warn!("{}", e);
        }
        if let Err(e) = bind_scroll(&window, &document, &anchors, sink) {
            log::warn!("{}", e);
        }
    })
}

fn listen(
    target: &web_sys::EventTarget,
    selector: &str,
    event: &str,
    handler: Closure<dyn FnMut(web_sys::Event)>,
) -> Result<(), BindingError> {
    target
        .add_event_listener_with_callback(event, handler.as_ref().unchecked_ref())
        .map_err(|_| BindingError::ListenerRejected {
            selector: selector.to_string(),
            event: event.to_string(),
        })?;
    // Listeners live as long as the page
    handler.forget();
    Ok(())
}

fn send_on<S: 'static>(sink: EventSink<S, SceneEvent>, event: SceneEvent) -> Closure<dyn FnMut(web_sys::Event)> {
    Closure::new(move |_: web_sys::Event| {
        sink.send(event.clone());
    })
}

fn bind_first<S: 'static>(
    document: &web_sys::Document,
    selector: &str,
    event_name: &str,
    sink: EventSink<S, SceneEvent>,
    event: SceneEvent,
) -> Result<(), BindingError> {
    let element = document
        .query_selector(selector)
        .ok()
        .flatten()
        .ok_or_else(|| BindingError::MissingAnchor {
            selector: selector.to_string(),
        })?;
    listen(&element, selector, event_name, send_on(sink, event))
}

fn bind_all<S: 'static>(
    document: &web_sys::Document,
    selector: &str,
    event_name: &str,
    sink: EventSink<S, SceneEvent>,
    event: SceneEvent,
) -> Result<(), BindingError> {
    let missing = || BindingError::MissingAnchor {
        selector: selector.to_string(),
    };
    let nodes = document.query_selector_all(selector).map_err(|_| missing())?;
    if nodes.length() == 0 {
        return Err(missing());
    }
    for i in 0..nodes.length() {
        if let Some(node) = nodes.item(i) {
            listen(&node, selector, event_name, send_on(sink.clone(), event.clone()))?;
        }
    }
    Ok(())
}

/// Pointer position in CSS pixels, with the window's inner size as viewport.
fn bind_pointer<S: 'static>(
    window: &web_sys::Window,
    document: &web_sys::Document,
    sink: EventSink<S, SceneEvent>,
) -> Result<(), BindingError> {
    let win = window.clone();
    let handler = Closure::new(move |event: web_sys::Event| {
        let Some(mouse) = event.dyn_ref::<web_sys::MouseEvent>() else {
            return;
        };
        let size = |v: Result<JsValue, JsValue>| v.ok().and_then(|v| v.as_f64());
        let (Some(width), Some(height)) = (size(win.inner_width()), size(win.inner_height()))
        else {
            return;
        };
        sink.send(SceneEvent::PointerMoved {
            x: mouse.client_x() as f32,
            y: mouse.client_y() as f32,
            viewport_w: width as f32,
            viewport_h: height as f32,
        });
    });
    listen(document, "document", "mousemove", handler)
}

/// Progress between the top of `start` at the viewport top and the bottom of
/// `end` at the viewport bottom.
fn scroll_progress(window: &web_sys::Window, start: &str, end: &str) -> Option<f32> {
    let document = window.document()?;
    let scroll = window.scroll_y().ok()? as f32;
    let viewport = window.inner_height().ok()?.as_f64()? as f32;
    let start_top = document
        .query_selector(start)
        .ok()??
        .get_bounding_client_rect()
        .top() as f32
        + scroll;
    let end_bottom = document
        .query_selector(end)
        .ok()??
        .get_bounding_client_rect()
        .bottom() as f32
        + scroll;
    Some(ScrollBounds::from_anchors(start_top, end_bottom, viewport).progress(scroll))
}

fn bind_scroll<S: 'static>(
    window: &web_sys::Window,
    document: &web_sys::Document,
    anchors: &AnchorConfig,
    sink: EventSink<S, SceneEvent>,
) -> Result<(), BindingError> {
    for selector in [&anchors.scroll_start, &anchors.scroll_end] {
        if document.query_selector(selector).ok().flatten().is_none() {
            return Err(BindingError::MissingAnchor {
                selector: selector.clone(),
            });
        }
    }

    if let Some(progress) = scroll_progress(window, &anchors.scroll_start, &anchors.scroll_end) {
        sink.send(SceneEvent::ScrollProgress(progress));
    }

    for event in ["scroll", "resize"] {
        let win = window.clone();
        let start = anchors.scroll_start.clone();
        let end = anchors.scroll_end.clone();
        let sink = sink.clone();
        let handler = Closure::new(move |_: web_sys::Event| {
            if let Some(progress) = scroll_progress(&win, &start, &end) {
                sink.send(SceneEvent::ScrollProgress(progress));
            }
        });
        listen(window, "window", event, handler)?;
    }
    Ok(())
}

#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    let config = SceneConfig::default();
    let binder = dom_binder(config.anchors.clone(), config.variants.clone());
    run::<(), SceneEvent>(vec![DogScene::constructor(config)], vec![binder])
        .map_err(|e| JsValue::from_str(&format!("{:#}", e)))
}
