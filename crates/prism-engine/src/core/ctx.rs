use winit::window::Window;

use crate::device::Gpu;
use crate::input::InputState;
use crate::window::RuntimeCtx;

/// Per-frame context passed to `core::App::on_frame`.
///
/// Lifetimes:
/// - `'a` is the duration of the callback invocation
/// - `'w` is the window-borrow lifetime carried by `Gpu<'w>`
pub struct FrameCtx<'a, 'w> {
    pub window: &'a Window,
    pub gpu: &'a Gpu<'w>,
    pub input: &'a InputState,
    /// Zero for the first frame, incremented once per redraw.
    pub frame_index: u64,
    pub runtime: &'a mut RuntimeCtx,
}
