use ringfield_core::frame::{FrameCallback, FrameHandle, FrameScheduler};
use ringfield_core::{FieldError, Result};
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;

/// `requestAnimationFrame` on the page window.
pub struct AnimationFrameScheduler {
    window: web_sys::Window,
}

impl AnimationFrameScheduler {
    pub fn new(window: web_sys::Window) -> Self {
        Self { window }
    }
}

impl FrameScheduler for AnimationFrameScheduler {
    fn request_frame(&self, callback: FrameCallback) -> Result<FrameHandle> {
        // One-shot closure: wasm-bindgen frees it after the browser calls it.
        // A request cancelled before it fires is never called, so its closure
        // leaks. That happens at most once per loop, on stop.
        let closure = Closure::once_into_js(move |timestamp_ms: f64| callback(timestamp_ms));
        let id = self
            .window
            .request_animation_frame(closure.unchecked_ref())
            .map_err(|e| FieldError::Scheduler(format!("{e:?}")))?;
        Ok(FrameHandle(id as u64))
    }

    fn cancel(&self, handle: FrameHandle) {
        if let Err(e) = self.window.cancel_animation_frame(handle.0 as i32) {
            web_sys::console::warn_2(&"cancelAnimationFrame failed:".into(), &e);
        }
    }
}
