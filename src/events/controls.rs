use super::media::wire_media_events;
use crate::audio::GestureLatch;
use crate::constants::{FILE_INPUT_ID, PAUSE_BUTTON_ID, PLAY_BUTTON_ID};
use crate::core::{MediaInput, PlaybackState};
use crate::dom;
use crate::error::{Result, VisualizerError};
use crate::overlay;
use crate::WebVisualizer;
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::JsCast;
use web_sys as web;

/// Run `f` against the visualizer and wire media events on any element it
/// newly bound, even when the call failed after binding (e.g. play rejected).
pub(crate) fn with_binding<R>(
    visualizer: &Rc<RefCell<WebVisualizer>>,
    f: impl FnOnce(&mut WebVisualizer) -> Result<R>,
) -> Result<R> {
    let (result, bound) = {
        let mut v = visualizer
            .try_borrow_mut()
            .map_err(|_| VisualizerError::Platform("visualizer busy".into()))?;
        let before = v.current_element().cloned();
        let result = f(&mut *v);
        let after = v.current_element().cloned();
        (result, after.filter(|el| Some(el) != before.as_ref()))
    };
    if let Some(element) = bound {
        wire_media_events(visualizer, &element);
    }
    result
}

/// Reflect a bind attempt on the page.
pub(crate) fn report_load<R>(visualizer: &Rc<RefCell<WebVisualizer>>, result: &Result<R>) {
    let Some(doc) = dom::window_document() else {
        return;
    };
    match result {
        Ok(_) => {
            overlay::clear_status(&doc);
            let playing = visualizer
                .try_borrow()
                .map(|v| v.playback_state() == PlaybackState::Playing)
                .unwrap_or(false);
            overlay::set_playing(&doc, playing);
        }
        Err(VisualizerError::AudioContextUnavailable) => {
            log::info!("[binding] audio locked; waiting for a gesture");
            overlay::show_status(&doc, "Click or press a key to enable audio");
        }
        Err(e) => {
            log::warn!("[binding] {}", e);
            overlay::show_status(&doc, &e.to_string());
        }
    }
}

/// Bind a source coming from the page. URLs handed over by collaborators start
/// playing immediately; picked files wait for the play button. A source hit by
/// locked audio is kept by the visualizer and retried on the next gesture.
pub fn load_source(
    visualizer: &Rc<RefCell<WebVisualizer>>,
    input: MediaInput<web::File>,
) -> Result<()> {
    let result = with_binding(visualizer, |v| match input {
        MediaInput::Url(url) => v.set_audio_source(&url).map(|_| ()),
        file @ MediaInput::File(_) => v.attach_source(file).map(|_| ()),
    });
    report_load(visualizer, &result);
    result
}

pub fn wire_resize(visualizer: &Rc<RefCell<WebVisualizer>>, canvas: &web::HtmlCanvasElement) {
    let resize = {
        let vis = visualizer.clone();
        let canvas = canvas.clone();
        move || {
            if let Some((w, h)) = dom::fit_canvas_to_window(&canvas) {
                if let Ok(mut v) = vis.try_borrow_mut() {
                    // Rejected sizes keep the previous geometry.
                    _ = v.resize(w, h);
                }
            }
        }
    };
    resize();
    if let Some(window) = web::window() {
        dom::add_listener::<web::Event>(&window, "resize", move |_| resize());
    }
}

/// Unlock audio on the first pointer press and retry a source that was
/// waiting for it. Key presses are handled by the global keydown listener.
pub fn wire_gesture_unlock(visualizer: &Rc<RefCell<WebVisualizer>>, gesture: GestureLatch) {
    let Some(window) = web::window() else {
        return;
    };
    let vis = visualizer.clone();
    dom::add_listener::<web::Event>(&window, "pointerdown", move |_| {
        gesture.mark();
        if let Ok(v) = vis.try_borrow() {
            v.analyzer().factory().resume();
        }
        let pending = vis.try_borrow().map(|v| v.has_pending_source()).unwrap_or(false);
        if pending {
            let result = with_binding(&vis, |v| v.retry_pending().transpose());
            report_load(&vis, &result);
        }
    });
}

/// Play/pause buttons and the file picker.
pub fn wire_controls(visualizer: &Rc<RefCell<WebVisualizer>>, document: &web::Document) {
    {
        let vis = visualizer.clone();
        let doc = document.clone();
        dom::add_click_listener(document, PLAY_BUTTON_ID, move || {
            let result = match vis.try_borrow_mut() {
                Ok(mut v) => v.play(),
                Err(_) => return,
            };
            match result {
                Ok(()) => overlay::set_playing(&doc, true),
                // No source yet; the button does nothing.
                Err(VisualizerError::NotAttached) => {}
                Err(e) => overlay::show_status(&doc, &e.to_string()),
            }
        });
    }
    {
        let vis = visualizer.clone();
        let doc = document.clone();
        dom::add_click_listener(document, PAUSE_BUTTON_ID, move || {
            if let Ok(mut v) = vis.try_borrow_mut() {
                v.pause();
            }
            overlay::set_playing(&doc, false);
        });
    }

    let Some(input_el) = document
        .get_element_by_id(FILE_INPUT_ID)
        .and_then(|el| el.dyn_into::<web::HtmlInputElement>().ok())
    else {
        log::debug!("no #{} element; file picker disabled", FILE_INPUT_ID);
        return;
    };
    let vis = visualizer.clone();
    let picker = input_el.clone();
    dom::add_listener::<web::Event>(&input_el, "change", move |_| {
        let Some(file) = picker.files().and_then(|files| files.get(0)) else {
            return;
        };
        _ = load_source(&vis, MediaInput::File(file));
    });
}
