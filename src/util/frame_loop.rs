//! Self-rescheduling `requestAnimationFrame` loop.

use std::cell::RefCell;
use std::rc::Rc;

use wasm_bindgen::JsCast;
use wasm_bindgen::closure::Closure;

type FrameSlot = Rc<RefCell<Option<Closure<dyn FnMut(f64)>>>>;

/// Call `step` once per display frame until it returns `false`.
///
/// The callback keeps itself alive through a shared slot and releases it
/// when the loop ends or the browser refuses a request.
pub fn run<F>(mut step: F)
where
    F: FnMut(f64) -> bool + 'static,
{
    let slot: FrameSlot = Rc::new(RefCell::new(None));
    let slot_for_cb = Rc::clone(&slot);
    let cb = Closure::wrap(Box::new(move |ts: f64| {
        if step(ts) && request(&slot_for_cb) {
            return;
        }
        slot_for_cb.borrow_mut().take();
    }) as Box<dyn FnMut(f64)>);

    *slot.borrow_mut() = Some(cb);
    if !request(&slot) {
        slot.borrow_mut().take();
    }
}

fn request(slot: &FrameSlot) -> bool {
    let Some(window) = web_sys::window() else {
        return false;
    };
    let guard = slot.borrow();
    let Some(cb) = guard.as_ref() else {
        return false;
    };
    match window.request_animation_frame(cb.as_ref().unchecked_ref()) {
        Ok(_) => true,
        Err(err) => {
            log::warn!("frame loop: requestAnimationFrame failed: {err:?}");
            false
        }
    }
}
