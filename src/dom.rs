use crate::core::backing_store_px;
use wasm_bindgen::JsCast;
use web_sys as web;

#[inline]
pub fn window_document() -> Option<web::Document> {
    web::window().and_then(|w| w.document())
}

#[inline]
pub fn add_listener<E: JsCast + 'static>(
    target: &web::EventTarget,
    event: &str,
    mut handler: impl FnMut(E) + 'static,
) {
    let closure = wasm_bindgen::closure::Closure::wrap(Box::new(move |ev: web::Event| {
        if let Ok(ev) = ev.dyn_into::<E>() {
            handler(ev);
        }
    }) as Box<dyn FnMut(web::Event)>);
    _ = target.add_event_listener_with_callback(event, closure.as_ref().unchecked_ref());
    closure.forget();
}

#[inline]
pub fn add_click_listener(
    document: &web::Document,
    element_id: &str,
    mut handler: impl FnMut() + 'static,
) {
    if let Some(el) = document.get_element_by_id(element_id) {
        add_listener::<web::Event>(&el, "click", move |_| handler());
    } else {
        log::debug!("no #{} element; skipping click wiring", element_id);
    }
}

/// Stretch the canvas over the window and return the backing-store size it
/// should have: the window's inner size times devicePixelRatio.
pub fn fit_canvas_to_window(canvas: &web::HtmlCanvasElement) -> Option<(f64, f64)> {
    let w = web::window()?;
    let inner_w = w.inner_width().ok()?.as_f64()?;
    let inner_h = w.inner_height().ok()?.as_f64()?;
    let style = canvas.style();
    _ = style.set_property("width", &format!("{inner_w}px"));
    _ = style.set_property("height", &format!("{inner_h}px"));
    Some(backing_store_px(inner_w, inner_h, w.device_pixel_ratio()))
}
