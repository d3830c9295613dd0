use crate::error::Result;
use crate::palette::Rgb;
use glam::{Mat4, Vec3};
use std::cell::{Cell, RefCell};
use std::collections::VecDeque;

/// Immutable per-tick input, built by whoever drives the loop.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FrameContext {
    /// Pointer target in field space.
    pub pointer_target: Vec3,
    /// Number of ticks granted before this one.
    pub frame: u64,
    /// Host timestamp of the frame in milliseconds. Informational only: the
    /// integrator always takes one fixed step.
    pub timestamp_ms: f64,
}

impl FrameContext {
    pub fn with_target(pointer_target: Vec3) -> Self {
        Self {
            pointer_target,
            frame: 0,
            timestamp_ms: 0.0,
        }
    }
}

/// Identifies one outstanding frame request.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct FrameHandle(pub u64);

/// Run once before the next repaint, with the frame timestamp in ms.
pub type FrameCallback = Box<dyn FnOnce(f64)>;

/// "Call me back before the next repaint."
///
/// Implementations must not hold any internal borrow while invoking a
/// callback: callbacks routinely request the following frame.
pub trait FrameScheduler {
    fn request_frame(&self, callback: FrameCallback) -> Result<FrameHandle>;

    /// Drop a pending request. Unknown or already-fired handles are ignored.
    fn cancel(&self, handle: FrameHandle);
}

/// Deterministic scheduler that fires frames only when told to.
#[derive(Default)]
pub struct ManualScheduler {
    queue: RefCell<VecDeque<(FrameHandle, FrameCallback)>>,
    next_id: Cell<u64>,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pending(&self) -> usize {
        self.queue.borrow().len()
    }

    /// Fire the oldest pending request. Returns `false` if nothing was queued.
    pub fn fire_next(&self, timestamp_ms: f64) -> bool {
        let next = self.queue.borrow_mut().pop_front();
        match next {
            Some((_, callback)) => {
                callback(timestamp_ms);
                true
            }
            None => false,
        }
    }

    /// Fire up to `frames` requests at a steady 60 Hz cadence starting at
    /// `start_ms`. Returns how many actually fired.
    pub fn run_frames(&self, frames: usize, start_ms: f64) -> usize {
        let mut fired = 0;
        for i in 0..frames {
            if !self.fire_next(start_ms + i as f64 * (1000.0 / 60.0)) {
                break;
            }
            fired += 1;
        }
        fired
    }

    /// Take every queued callback out of the scheduler without running it,
    /// as a host that has already dispatched them would.
    pub fn drain(&self) -> Vec<FrameCallback> {
        self.queue.borrow_mut().drain(..).map(|(_, cb)| cb).collect()
    }
}

impl FrameScheduler for ManualScheduler {
    fn request_frame(&self, callback: FrameCallback) -> Result<FrameHandle> {
        let handle = FrameHandle(self.next_id.get());
        self.next_id.set(handle.0 + 1);
        self.queue.borrow_mut().push_back((handle, callback));
        Ok(handle)
    }

    fn cancel(&self, handle: FrameHandle) {
        self.queue.borrow_mut().retain(|(h, _)| *h != handle);
    }
}

/// Read-only view of one frame, handed to the renderer.
pub struct RenderFrame<'a> {
    pub positions: &'a [Vec3],
    pub colors: &'a [Rgb],
    pub sizes: &'a [f32],
    /// Whole-ring rotation about Z in radians; applied by the renderer, never
    /// to particle state.
    pub rotation: f32,
    /// `rotation` as a matrix.
    pub model: Mat4,
    pub view_projection: Mat4,
    /// Ticks applied so far, so the tick built from `FrameContext { frame: n, .. }`
    /// is submitted as `n + 1`.
    pub frame: u64,
    /// `FrameContext::timestamp_ms` of the latest tick, 0 before the first.
    pub timestamp_ms: f64,
}

/// Something that can draw a fixed-topology point set each frame.
pub trait RenderSurface {
    fn submit(&mut self, frame: &RenderFrame<'_>);
}
