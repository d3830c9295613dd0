use ringfield_core::blob::{Blob, BlobConfig};
use ringfield_core::camera::Viewport;
use ringfield_core::config::particle_count;
use ringfield_core::field::{Field, FieldParams};
use ringfield_core::frame_loop::FrameLoop;
use ringfield_core::layout::RingLayout;
use ringfield_core::FieldError;
use std::rc::Rc;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;

mod logger;
mod scheduler;
mod surface;

use scheduler::AnimationFrameScheduler;
use surface::GpuBufferSurface;

fn to_js(err: FieldError) -> JsValue {
    JsValue::from_str(&err.to_string())
}

fn unavailable(what: &str) -> JsValue {
    to_js(FieldError::SurfaceUnavailable(what.to_string()))
}

#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();
    logger::init(log::LevelFilter::Info);
}

/// Fresh layout seed for every page load.
fn random_seed() -> Result<u64, JsValue> {
    let mut bytes = [0u8; 8];
    getrandom::getrandom(&mut bytes)
        .map_err(|e| JsValue::from_str(&format!("no entropy source: {e}")))?;
    Ok(u64::from_le_bytes(bytes))
}

/// The particle ring background, driven by `requestAnimationFrame`.
#[wasm_bindgen]
pub struct RingField {
    frame_loop: FrameLoop<AnimationFrameScheduler, GpuBufferSurface>,
}

#[wasm_bindgen]
impl RingField {
    /// Attach to the canvas with id `canvas_id`.
    ///
    /// `on_frame(ptr, byte_length, rotation)` is called after every tick with
    /// a view of the particle buffer in wasm memory. It runs while the loop
    /// holds its state: calling back into this object from it throws, except
    /// for `stop()` and `is_running()`. Fails if the canvas is missing or
    /// `count` is not positive.
    #[wasm_bindgen(constructor)]
    pub fn new(canvas_id: &str, count: i32, on_frame: js_sys::Function) -> Result<RingField, JsValue> {
        let count = particle_count(count as i64).map_err(to_js)?.get();

        let window = web_sys::window().ok_or_else(|| unavailable("no window object"))?;
        let document = window.document().ok_or_else(|| unavailable("no document"))?;
        let canvas: web_sys::HtmlCanvasElement = document
            .get_element_by_id(canvas_id)
            .ok_or_else(|| unavailable(&format!("canvas '{canvas_id}' not found")))?
            .dyn_into()
            .map_err(|_| unavailable(&format!("'{canvas_id}' is not a canvas")))?;

        let viewport = Viewport::new(canvas.client_width() as f32, canvas.client_height() as f32);
        let params = FieldParams {
            viewport,
            seed: random_seed()?,
            ..FieldParams::default()
        };
        let field = Field::create(count, &RingLayout::default(), params).map_err(to_js)?;

        log::info!("WASM RingField created: {count} particles");

        let frame_loop = FrameLoop::new(
            field,
            GpuBufferSurface::new(count, on_frame),
            Rc::new(AnimationFrameScheduler::new(window)),
            viewport,
        );
        Ok(RingField { frame_loop })
    }

    #[wasm_bindgen]
    pub fn start(&self) -> Result<(), JsValue> {
        self.frame_loop.start().map_err(to_js)
    }

    /// Cancel the pending frame. Later calls into this object do nothing.
    #[wasm_bindgen]
    pub fn stop(&self) {
        self.frame_loop.cancel();
    }

    #[wasm_bindgen]
    pub fn is_running(&self) -> bool {
        self.frame_loop.is_live()
    }

    #[wasm_bindgen]
    pub fn pointer_moved(&self, x: f32, y: f32) -> Result<(), JsValue> {
        self.frame_loop.pointer_moved(x, y).map_err(to_js)
    }

    #[wasm_bindgen]
    pub fn resize(&self, width: f32, height: f32) -> Result<(), JsValue> {
        self.frame_loop.resize(Viewport::new(width, height)).map_err(to_js)
    }

    #[wasm_bindgen]
    pub fn set_theme(&self, is_dark: bool) -> Result<(), JsValue> {
        self.frame_loop.theme_changed(is_dark).map_err(to_js)
    }

    #[wasm_bindgen]
    pub fn particle_count(&self) -> Result<usize, JsValue> {
        self.frame_loop.with_field(|f| f.len()).map_err(to_js)
    }

    #[wasm_bindgen]
    pub fn get_gpu_buffer_ptr(&self) -> Result<*const f32, JsValue> {
        self.frame_loop.with_surface(|s| s.ptr()).map_err(to_js)
    }

    #[wasm_bindgen]
    pub fn get_gpu_buffer_byte_length(&self) -> Result<usize, JsValue> {
        self.frame_loop.with_surface(|s| s.byte_length()).map_err(to_js)
    }

    /// Column-major view-projection matrix for the current viewport.
    #[wasm_bindgen]
    pub fn view_projection(&self) -> Result<Vec<f32>, JsValue> {
        self.frame_loop
            .with_field(|f| f.camera().view_projection().to_cols_array().to_vec())
            .map_err(to_js)
    }
}

/// The liquid blob drawn behind the about section. The page drives
/// `update()` from its own animation loop and strokes the outline.
#[wasm_bindgen]
pub struct LiquidBlob {
    blob: Blob,
    /// `[control.x, control.y, end.x, end.y]` per segment.
    outline: Vec<[f32; 4]>,
}

#[wasm_bindgen]
impl LiquidBlob {
    #[wasm_bindgen(constructor)]
    pub fn new(width: f32, height: f32) -> Result<LiquidBlob, JsValue> {
        let blob = Blob::new(BlobConfig::default(), Viewport::new(width, height)).map_err(to_js)?;
        let mut this = LiquidBlob {
            outline: Vec::with_capacity(blob.positions().len()),
            blob,
        };
        this.write_outline();
        Ok(this)
    }

    #[wasm_bindgen]
    pub fn pointer_moved(&mut self, x: f32, y: f32) {
        self.blob.pointer_moved(x, y);
    }

    #[wasm_bindgen]
    pub fn resize(&mut self, width: f32, height: f32) {
        self.blob.resize(Viewport::new(width, height));
    }

    #[wasm_bindgen]
    pub fn update(&mut self) {
        self.blob.update();
        self.write_outline();
    }

    #[wasm_bindgen]
    pub fn start_x(&self) -> f32 {
        self.blob.outline_start().x
    }

    #[wasm_bindgen]
    pub fn start_y(&self) -> f32 {
        self.blob.outline_start().y
    }

    #[wasm_bindgen]
    pub fn segment_count(&self) -> usize {
        self.outline.len()
    }

    #[wasm_bindgen]
    pub fn get_outline_ptr(&self) -> *const f32 {
        bytemuck::cast_slice::<[f32; 4], f32>(&self.outline).as_ptr()
    }
}

impl LiquidBlob {
    fn write_outline(&mut self) {
        self.outline.clear();
        self.outline.extend(
            self.blob
                .outline()
                .into_iter()
                .map(|seg| [seg.control.x, seg.control.y, seg.end.x, seg.end.y]),
        );
    }
}
