use super::controls::{report_load, with_binding};
use crate::audio::GestureLatch;
use crate::core::PlaybackState;
use crate::dom;
use crate::keys::action_for_key;
use crate::overlay;
use crate::WebVisualizer;
use std::cell::RefCell;
use std::rc::Rc;
use web_sys as web;

fn is_text_entry(ev: &web::KeyboardEvent) -> bool {
    ev.target()
        .and_then(|t| wasm_bindgen::JsCast::dyn_into::<web::Element>(t).ok())
        .map(|el| matches!(el.tag_name().as_str(), "INPUT" | "TEXTAREA"))
        .unwrap_or(false)
}

pub fn handle_global_keydown(
    ev: &web::KeyboardEvent,
    visualizer: &Rc<RefCell<WebVisualizer>>,
    gesture: &GestureLatch,
) {
    // Every key press counts as the gesture that unlocks audio.
    gesture.mark();
    if let Ok(v) = visualizer.try_borrow() {
        v.analyzer().factory().resume();
    }
    // Typing into a search box must not toggle playback.
    let action = if is_text_entry(ev) {
        None
    } else {
        action_for_key(&ev.key())
    };

    let retrying = visualizer
        .try_borrow()
        .map(|v| v.has_pending_source())
        .unwrap_or(false);
    let result = with_binding(visualizer, |v| v.on_key(action));
    if retrying {
        report_load(visualizer, &result);
    } else if let Err(e) = &result {
        log::debug!("[keys] {:?}: {}", action, e);
    }
    let playing = visualizer
        .try_borrow()
        .map(|v| v.playback_state() == PlaybackState::Playing)
        .unwrap_or(false);
    if let Some(doc) = dom::window_document() {
        overlay::set_playing(&doc, playing);
    }
    if action.is_some() {
        ev.prevent_default();
    }
}

pub fn wire_global_keydown(visualizer: &Rc<RefCell<WebVisualizer>>, gesture: GestureLatch) {
    if let Some(window) = web::window() {
        let vis = visualizer.clone();
        dom::add_listener::<web::KeyboardEvent>(&window, "keydown", move |ev| {
            handle_global_keydown(&ev, &vis, &gesture);
        });
    }
}
