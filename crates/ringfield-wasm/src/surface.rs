use ringfield_core::frame::{RenderFrame, RenderSurface};
use wasm_bindgen::JsValue;

/// GPU-compatible particle struct: 32 bytes, matches the vertex layout the
/// page's point shader reads.
#[repr(C)]
#[derive(Clone, Copy, Default, bytemuck::Pod, bytemuck::Zeroable)]
pub struct GpuParticle {
    pub position: [f32; 3], // 12 bytes
    pub size: f32,          //  4 bytes
    pub color: [f32; 3],    // 12 bytes
    pub _pad: f32,          //  4 bytes
}

/// Copies each frame into a flat buffer and hands it to a JS callback as
/// `(ptr, byte_length, rotation)`.
pub struct GpuBufferSurface {
    buffer: Vec<GpuParticle>,
    on_frame: js_sys::Function,
}

impl GpuBufferSurface {
    pub fn new(count: usize, on_frame: js_sys::Function) -> Self {
        Self {
            buffer: vec![GpuParticle::default(); count],
            on_frame,
        }
    }

    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.buffer)
    }

    pub fn ptr(&self) -> *const f32 {
        self.buffer.as_ptr() as *const f32
    }

    pub fn byte_length(&self) -> usize {
        self.as_bytes().len()
    }

    pub fn write(&mut self, frame: &RenderFrame<'_>) {
        for (((out, pos), color), size) in self
            .buffer
            .iter_mut()
            .zip(frame.positions)
            .zip(frame.colors)
            .zip(frame.sizes)
        {
            *out = GpuParticle {
                position: pos.to_array(),
                size: *size,
                color: bytemuck::cast(*color),
                _pad: 0.0,
            };
        }
    }
}

impl RenderSurface for GpuBufferSurface {
    fn submit(&mut self, frame: &RenderFrame<'_>) {
        self.write(frame);
        let result = self.on_frame.call3(
            &JsValue::NULL,
            &JsValue::from(self.ptr() as usize as u32),
            &JsValue::from(self.byte_length() as u32),
            &JsValue::from(frame.rotation as f64),
        );
        if let Err(e) = result {
            web_sys::console::error_2(&"ring field frame callback failed:".into(), &e);
        }
    }
}
