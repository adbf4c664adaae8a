use web_sys as web;

/// Show a one-line status message (errors, audio unlock hints) if the page
/// has a `#status` element.
pub fn show_status(document: &web::Document, text: &str) {
    if let Some(el) = document.get_element_by_id(crate::constants::STATUS_ID) {
        el.set_text_content(Some(text));
        _ = el.class_list().remove_1("hidden");
    }
}

pub fn clear_status(document: &web::Document) {
    if let Some(el) = document.get_element_by_id(crate::constants::STATUS_ID) {
        el.set_text_content(None);
        _ = el.class_list().add_1("hidden");
    }
}

/// Reflect playback state on the page root so CSS can style the controls.
pub fn set_playing(document: &web::Document, playing: bool) {
    if let Some(root) = document.document_element() {
        let cl = root.class_list();
        if playing {
            _ = cl.add_1("playing");
        } else {
            _ = cl.remove_1("playing");
        }
    }
}
