use crate::camera::Viewport;
use crate::error::{FieldError, Result};
use crate::field::Field;
use crate::forces::pointer::PointerState;
use crate::frame::{FrameContext, FrameHandle, FrameScheduler, RenderSurface};
use crate::palette::Theme;
use std::cell::{Cell, Ref, RefCell, RefMut};
use std::rc::{Rc, Weak};

struct LoopState<R> {
    field: Field,
    surface: R,
    pointer: PointerState,
    viewport: Viewport,
    pending: Option<FrameHandle>,
}

/// Liveness and frame count. Kept outside the `RefCell` so they can be read
/// and the loop cancelled while a frame holds the state.
#[derive(Default)]
struct LoopStatus {
    live: Cell<bool>,
    frames: Cell<u64>,
}

fn busy() -> FieldError {
    FieldError::Busy("loop state is held by the current frame".into())
}

/// Drives a [`Field`] one tick per granted frame and submits the result.
///
/// The loop owns the field and the surface. Host events go through the
/// handler methods, which become no-ops once the loop is cancelled. At most
/// one frame request is outstanding at any time. Calls that need the loop
/// state fail with [`FieldError::Busy`] when made from inside
/// [`RenderSurface::submit`].
pub struct FrameLoop<S: FrameScheduler + 'static, R: RenderSurface + 'static> {
    state: Rc<RefCell<LoopState<R>>>,
    status: Rc<LoopStatus>,
    scheduler: Rc<S>,
}

impl<S: FrameScheduler + 'static, R: RenderSurface + 'static> FrameLoop<S, R> {
    pub fn new(mut field: Field, surface: R, scheduler: Rc<S>, viewport: Viewport) -> Self {
        field.on_resize(viewport);
        let pointer = PointerState {
            pixel: viewport.center(),
        };
        let status = LoopStatus::default();
        status.live.set(true);
        Self {
            state: Rc::new(RefCell::new(LoopState {
                field,
                surface,
                pointer,
                viewport,
                pending: None,
            })),
            status: Rc::new(status),
            scheduler,
        }
    }

    fn state(&self) -> Result<Ref<'_, LoopState<R>>> {
        self.state.try_borrow().map_err(|_| busy())
    }

    fn state_mut(&self) -> Result<RefMut<'_, LoopState<R>>> {
        self.state.try_borrow_mut().map_err(|_| busy())
    }

    /// Request the first frame. Calling it again while a frame is pending, or
    /// after [`FrameLoop::cancel`], does nothing.
    pub fn start(&self) -> Result<()> {
        if !self.status.live.get() {
            return Ok(());
        }
        {
            let state = self.state()?;
            if state.pending.is_some() {
                return Ok(());
            }
            log::info!("frame loop started: {} particles", state.field.len());
        }
        schedule(&self.state, &self.status, &self.scheduler)
    }

    /// Stop the loop. Idempotent, and safe to call from inside a frame.
    pub fn cancel(&self) {
        if !self.status.live.replace(false) {
            return;
        }
        // If the state is held elsewhere, any pending callback finds the loop
        // dead when it fires and neither ticks nor reschedules.
        let pending = self.state.try_borrow_mut().ok().and_then(|mut s| s.pending.take());
        if let Some(handle) = pending {
            self.scheduler.cancel(handle);
        }
        log::info!("frame loop cancelled after {} frames", self.frames());
    }

    pub fn is_live(&self) -> bool {
        self.status.live.get()
    }

    /// Frames ticked so far.
    pub fn frames(&self) -> u64 {
        self.status.frames.get()
    }

    pub fn pointer_moved(&self, x: f32, y: f32) -> Result<()> {
        if !self.is_live() {
            log::trace!("pointer move after cancel ignored");
            return Ok(());
        }
        if !self.state_mut()?.pointer.moved(x, y) {
            log::trace!("non-finite pointer move ({x}, {y}) dropped");
        }
        Ok(())
    }

    pub fn resize(&self, viewport: Viewport) -> Result<()> {
        if !self.is_live() {
            log::trace!("resize after cancel ignored");
            return Ok(());
        }
        let mut state = self.state_mut()?;
        state.viewport = viewport;
        state.field.on_resize(viewport);
        Ok(())
    }

    pub fn theme_changed(&self, is_dark: bool) -> Result<()> {
        if !self.is_live() {
            log::trace!("theme change after cancel ignored");
            return Ok(());
        }
        self.state_mut()?
            .field
            .on_theme_change(Theme::from_is_dark(is_dark));
        Ok(())
    }

    pub fn with_field<T>(&self, f: impl FnOnce(&Field) -> T) -> Result<T> {
        let state = self.state()?;
        Ok(f(&state.field))
    }

    pub fn with_surface<T>(&self, f: impl FnOnce(&R) -> T) -> Result<T> {
        let state = self.state()?;
        Ok(f(&state.surface))
    }
}

impl<S: FrameScheduler + 'static, R: RenderSurface + 'static> Drop for FrameLoop<S, R> {
    fn drop(&mut self) {
        self.cancel();
    }
}

fn schedule<S, R>(
    state: &Rc<RefCell<LoopState<R>>>,
    status: &Rc<LoopStatus>,
    scheduler: &Rc<S>,
) -> Result<()>
where
    S: FrameScheduler + 'static,
    R: RenderSurface + 'static,
{
    let weak_state = Rc::downgrade(state);
    let weak_status = Rc::downgrade(status);
    let weak_scheduler = Rc::downgrade(scheduler);
    let handle = scheduler.request_frame(Box::new(move |timestamp_ms| {
        on_frame(weak_state, weak_status, weak_scheduler, timestamp_ms);
    }))?;
    match state.try_borrow_mut() {
        Ok(mut state) => {
            state.pending = Some(handle);
            Ok(())
        }
        Err(_) => {
            scheduler.cancel(handle);
            Err(busy())
        }
    }
}

fn on_frame<S, R>(
    state: Weak<RefCell<LoopState<R>>>,
    status: Weak<LoopStatus>,
    scheduler: Weak<S>,
    timestamp_ms: f64,
) where
    S: FrameScheduler + 'static,
    R: RenderSurface + 'static,
{
    // Any upgrade failing means the loop was dropped.
    let (Some(state), Some(status), Some(scheduler)) =
        (state.upgrade(), status.upgrade(), scheduler.upgrade())
    else {
        return;
    };
    if !tick(&state, &status, timestamp_ms) {
        return;
    }
    // The surface may have cancelled the loop while submitting.
    if !status.live.get() {
        return;
    }
    if let Err(err) = schedule(&state, &status, &scheduler) {
        log::error!("frame loop stopped after {} frames: {err}", status.frames.get());
        status.live.set(false);
    }
}

/// Run one frame. Returns `false` if nothing was ticked.
fn tick<R: RenderSurface>(state: &RefCell<LoopState<R>>, status: &LoopStatus, timestamp_ms: f64) -> bool {
    let Ok(mut guard) = state.try_borrow_mut() else {
        log::error!("frame at {timestamp_ms}ms found the loop state held; stopping");
        status.live.set(false);
        return false;
    };
    let state = &mut *guard;
    state.pending = None;
    if !status.live.get() {
        log::trace!("frame at {timestamp_ms}ms after cancel ignored");
        return false;
    }

    let ctx = FrameContext {
        pointer_target: state
            .pointer
            .target(state.viewport, state.field.config().pointer_scale),
        frame: status.frames.get(),
        timestamp_ms,
    };
    state.field.advance(&ctx);
    state.surface.submit(&state.field.render_frame());
    status.frames.set(ctx.frame + 1);
    true
}
