use crate::core::FrameScheduler;
use crate::WebVisualizer;
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys as web;

type TickSlot = Rc<RefCell<Option<Closure<dyn FnMut()>>>>;

/// `requestAnimationFrame` scheduler. The tick closure lives in a shared slot
/// filled by [`install_tick`]; requests before that are ignored.
#[derive(Clone, Default)]
pub struct RafScheduler {
    tick: TickSlot,
}

impl FrameScheduler for RafScheduler {
    fn request_frame(&mut self) {
        let tick = self.tick.borrow();
        let (Some(w), Some(cb)) = (web::window(), tick.as_ref()) else {
            log::warn!("[loop] no tick installed; frame dropped");
            return;
        };
        _ = w.request_animation_frame(cb.as_ref().unchecked_ref());
    }
}

/// Install the per-frame callback. Each tick runs one frame; the visualizer
/// requests the next tick only while playback continues.
pub fn install_tick(scheduler: &RafScheduler, visualizer: Rc<RefCell<WebVisualizer>>) {
    let mut retry = scheduler.clone();
    *scheduler.tick.borrow_mut() = Some(Closure::wrap(Box::new(move || {
        match visualizer.try_borrow_mut() {
            Ok(mut v) => v.frame(),
            // Keep the chain alive; this frame is dropped, not queued.
            Err(_) => retry.request_frame(),
        }
    }) as Box<dyn FnMut()>));
}
