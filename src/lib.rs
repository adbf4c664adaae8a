//! Browser music visualizer: WebAudio analysis rendered to a 2D canvas.
//!
//! Everything under [`core`] is platform independent and runs on the host;
//! the browser bindings are compiled for `wasm32` only.

pub mod config;
pub mod constants;
pub mod core;
pub mod error;
pub mod keys;

pub use config::VisualizerConfig;
pub use error::{Result, VisualizerError};

#[cfg(target_arch = "wasm32")]
mod audio;
#[cfg(target_arch = "wasm32")]
mod canvas;
#[cfg(target_arch = "wasm32")]
mod dom;
#[cfg(target_arch = "wasm32")]
mod events;
#[cfg(target_arch = "wasm32")]
mod frame;
#[cfg(target_arch = "wasm32")]
mod overlay;

#[cfg(target_arch = "wasm32")]
pub use web_entry::*;

#[cfg(target_arch = "wasm32")]
pub(crate) type WebVisualizer = crate::core::Visualizer<
    audio::WebAudio,
    audio::WebMedia,
    canvas::CanvasTarget,
    frame::RafScheduler,
>;

#[cfg(target_arch = "wasm32")]
mod web_entry {
    use super::*;
    use crate::audio::{GestureLatch, WebAudio, WebMedia};
    use crate::canvas::CanvasTarget;
    use crate::constants::CANVAS_ID;
    use crate::core::{MediaInput, Visualizer};
    use crate::frame::RafScheduler;
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use wasm_bindgen::JsCast;
    use web_sys as web;

    struct Instance {
        visualizer: Rc<RefCell<WebVisualizer>>,
    }

    // The page hosts a single visualizer; the exported functions reach it here.
    thread_local! {
        static INSTANCE: RefCell<Option<Instance>> = const { RefCell::new(None) };
    }

    fn to_js(e: VisualizerError) -> JsValue {
        js_sys::Error::new(&e.to_string()).into()
    }

    fn with_instance<R>(
        f: impl FnOnce(&Rc<RefCell<WebVisualizer>>) -> Result<R>,
    ) -> std::result::Result<R, JsValue> {
        INSTANCE.with(|slot| {
            let slot = slot.borrow();
            let inst = slot
                .as_ref()
                .ok_or_else(|| JsValue::from(js_sys::Error::new("visualizer not initialised")))?;
            f(&inst.visualizer).map_err(to_js)
        })
    }

    #[wasm_bindgen(start)]
    pub fn start() -> std::result::Result<(), JsValue> {
        console_error_panic_hook::set_once();
        let query = web::window()
            .and_then(|w| w.location().search().ok())
            .unwrap_or_default();
        let config = VisualizerConfig::from_query(&query);
        console_log::init_with_level(config.log_level()).ok();
        log::info!("synesthesia starting ({:?})", config.mode);

        if let Err(e) = init(&config) {
            log::error!("init error: {:?}", e);
        }
        Ok(())
    }

    fn init(config: &VisualizerConfig) -> anyhow::Result<()> {
        let window = web::window().ok_or_else(|| anyhow::anyhow!("no window"))?;
        let document = window
            .document()
            .ok_or_else(|| anyhow::anyhow!("no document"))?;
        let canvas: web::HtmlCanvasElement = document
            .get_element_by_id(CANVAS_ID)
            .ok_or_else(|| anyhow::anyhow!("missing #{}", CANVAS_ID))?
            .dyn_into::<web::HtmlCanvasElement>()
            .map_err(|e| anyhow::anyhow!(format!("{:?}", e)))?;

        let gesture = GestureLatch::default();
        let scheduler = RafScheduler::default();
        let visualizer = Visualizer::new(
            config,
            WebAudio::new(gesture.clone()),
            WebMedia::default(),
            CanvasTarget::new(canvas.clone())?,
            scheduler.clone(),
        )?;
        let visualizer = Rc::new(RefCell::new(visualizer));

        frame::install_tick(&scheduler, visualizer.clone());
        events::wire_resize(&visualizer, &canvas);
        events::wire_gesture_unlock(&visualizer, gesture.clone());
        events::wire_controls(&visualizer, &document);
        events::wire_global_keydown(&visualizer, gesture);

        INSTANCE.with(|slot| {
            *slot.borrow_mut() = Some(Instance { visualizer })
        });
        Ok(())
    }

    /// Load `url` into the visualizer and start playing it. Called by the
    /// search collaborators when the user picks a track.
    #[wasm_bindgen(js_name = setAudioSource)]
    pub fn set_audio_source(url: &str) -> std::result::Result<(), JsValue> {
        with_instance(|vis| events::load_source(vis, MediaInput::Url(url.into())))
    }

    #[wasm_bindgen(js_name = playVisualizer)]
    pub fn play_visualizer() -> std::result::Result<(), JsValue> {
        with_instance(|vis| vis.borrow_mut().play())
    }

    #[wasm_bindgen(js_name = pauseVisualizer)]
    pub fn pause_visualizer() -> std::result::Result<(), JsValue> {
        with_instance(|vis| {
            vis.borrow_mut().pause();
            Ok(())
        })
    }

    /// Index of the lyric line to highlight for `line_count` evenly spread lines.
    #[wasm_bindgen(js_name = lyricLineIndex)]
    pub fn lyric_line_index(line_count: usize) -> Option<usize> {
        INSTANCE.with(|slot| {
            slot.borrow()
                .as_ref()
                .and_then(|inst| inst.visualizer.try_borrow().ok()?.lyric_line_index(line_count))
        })
    }
}
