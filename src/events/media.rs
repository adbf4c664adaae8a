use crate::constants::PLAY_REJECTED_EVENT;
use crate::dom;
use crate::overlay;
use crate::WebVisualizer;
use std::cell::RefCell;
use std::rc::Rc;
use web_sys as web;

fn media_error_detail(element: &web::HtmlAudioElement) -> String {
    match element.error() {
        Some(err) => {
            let kind = match err.code() {
                web::MediaError::MEDIA_ERR_ABORTED => "aborted",
                web::MediaError::MEDIA_ERR_NETWORK => "network error",
                web::MediaError::MEDIA_ERR_DECODE => "could not decode",
                web::MediaError::MEDIA_ERR_SRC_NOT_SUPPORTED => "format not supported",
                _ => "unknown error",
            };
            let message = err.message();
            if message.is_empty() {
                kind.to_string()
            } else {
                format!("{kind}: {message}")
            }
        }
        None => "unknown error".to_string(),
    }
}

/// Listen for progress, end, decode errors and rejected playback on a freshly
/// bound element.
/// Events from elements that are no longer bound are ignored by the visualizer.
pub fn wire_media_events(visualizer: &Rc<RefCell<WebVisualizer>>, element: &web::HtmlAudioElement) {
    {
        let vis = visualizer.clone();
        let el = element.clone();
        dom::add_listener::<web::Event>(element, "timeupdate", move |_| {
            if let Ok(mut v) = vis.try_borrow_mut() {
                v.on_time_update(&el, el.current_time(), el.duration());
            }
        });
    }
    {
        let vis = visualizer.clone();
        let el = element.clone();
        dom::add_listener::<web::Event>(element, "ended", move |_| {
            if let Ok(mut v) = vis.try_borrow_mut() {
                v.on_media_ended(&el);
            }
            if let Some(doc) = dom::window_document() {
                overlay::set_playing(&doc, false);
            }
        });
    }
    {
        let vis = visualizer.clone();
        let el = element.clone();
        dom::add_listener::<web::Event>(element, "error", move |_| {
            let detail = media_error_detail(&el);
            let reported = match vis.try_borrow_mut() {
                Ok(mut v) => v.on_media_error(&el, &detail),
                Err(_) => None,
            };
            if let (Some(err), Some(doc)) = (reported, dom::window_document()) {
                overlay::show_status(&doc, &err.to_string());
                overlay::set_playing(&doc, false);
            }
        });
    }
    {
        let vis = visualizer.clone();
        let el = element.clone();
        dom::add_listener::<web::Event>(element, PLAY_REJECTED_EVENT, move |_| {
            let reported = match vis.try_borrow_mut() {
                Ok(mut v) => v.on_play_rejected(&el, "blocked by the browser"),
                Err(_) => None,
            };
            if let (Some(_), Some(doc)) = (reported, dom::window_document()) {
                overlay::show_status(&doc, "Playback was blocked; press play to start");
                overlay::set_playing(&doc, false);
            }
        });
    }
}
