use anyhow::{anyhow, Context, Result};
use ouroboros::self_referencing;

use winit::application::ApplicationHandler;
use winit::dpi::PhysicalSize;
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::window::{Window, WindowId};

use crate::core::{App, AppControl, FrameCtx};
use crate::device::{Gpu, GpuInit};
use crate::input::{translate_window_event, InputState};

/// Window/runtime configuration.
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub title: String,
    /// Output size in physical pixels. Fixed for the whole run.
    pub size: PhysicalSize<u32>,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            title: "prism".to_string(),
            size: PhysicalSize::new(1920, 1080),
        }
    }
}

/// Runtime context passed to the application.
///
/// Requests are applied after the current callback returns.
#[derive(Default)]
pub struct RuntimeCtx {
    exit: bool,
}

impl RuntimeCtx {
    pub fn exit(&mut self) {
        self.exit = true;
    }
}

/// Entry point for the runtime.
pub struct Runtime;

impl Runtime {
    /// Opens the window, creates the device context, builds the app with
    /// `init` and drives it until exit.
    ///
    /// Startup failures (window, device, `init`) and frame errors end the
    /// loop and are returned here.
    pub fn run<A, F>(config: RuntimeConfig, gpu_init: GpuInit, init: F) -> Result<()>
    where
        A: App + 'static,
        F: FnOnce(&Gpu<'_>) -> Result<A>,
    {
        let event_loop = EventLoop::new().context("failed to create winit EventLoop")?;
        let mut state = AppState {
            config,
            gpu_init,
            init: Some(init),
            app: None,
            entry: None,
            error: None,
        };

        event_loop
            .run_app(&mut state)
            .context("winit event loop terminated with error")?;

        match state.error {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

#[self_referencing]
struct WindowEntry {
    input_state: InputState,
    frame_index: u64,

    window: Window,

    #[borrows(window)]
    #[covariant]
    gpu: Gpu<'this>,
}

struct AppState<A, F> {
    config: RuntimeConfig,
    gpu_init: GpuInit,
    init: Option<F>,

    // Declared before `entry`: the app drops before the window it renders to.
    app: Option<A>,
    entry: Option<WindowEntry>,

    error: Option<anyhow::Error>,
}

impl<A, F> AppState<A, F>
where
    A: App + 'static,
    F: FnOnce(&Gpu<'_>) -> Result<A>,
{
    fn fail(&mut self, event_loop: &ActiveEventLoop, err: anyhow::Error) {
        log::debug!("runtime stopping: {err}");
        self.error.get_or_insert(err);
        event_loop.exit();
    }

    fn start(&mut self, event_loop: &ActiveEventLoop) -> Result<()> {
        let attrs = Window::default_attributes()
            .with_title(self.config.title.clone())
            .with_inner_size(self.config.size)
            .with_resizable(false);

        let window = event_loop
            .create_window(attrs)
            .context("failed to create window")?;

        let gpu_init = self.gpu_init.clone();
        let entry = WindowEntryTryBuilder {
            input_state: InputState::default(),
            frame_index: 0,
            window,
            gpu_builder: |w| pollster::block_on(Gpu::new(w, gpu_init)),
        }
        .try_build()
        .context("GPU initialization failed")?;

        let init = self
            .init
            .take()
            .ok_or_else(|| anyhow!("application already initialized"))?;
        let app = entry.with_gpu(|gpu| init(gpu)).context("application startup failed")?;

        entry.with_window(|w| w.request_redraw());
        self.app = Some(app);
        self.entry = Some(entry);
        Ok(())
    }

    fn redraw(&mut self) -> Result<AppControl> {
        let (Some(app), Some(entry)) = (self.app.as_mut(), self.entry.as_mut()) else {
            return Ok(AppControl::Continue);
        };

        let mut runtime = RuntimeCtx::default();
        let control = entry.with_mut(|fields| {
            let mut ctx = FrameCtx {
                window: fields.window,
                gpu: fields.gpu,
                input: fields.input_state,
                frame_index: *fields.frame_index,
                runtime: &mut runtime,
            };
            let control = app.on_frame(&mut ctx);
            *fields.frame_index += 1;
            control
        })?;

        if runtime.exit {
            return Ok(AppControl::Exit);
        }
        Ok(control)
    }
}

impl<A, F> ApplicationHandler for AppState<A, F>
where
    A: App + 'static,
    F: FnOnce(&Gpu<'_>) -> Result<A>,
{
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.entry.is_some() || self.error.is_some() {
            return;
        }

        if let Err(err) = self.start(event_loop) {
            self.fail(event_loop, err);
        }
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        event_loop.set_control_flow(ControlFlow::Wait);

        // Continuous redraw.
        if let Some(entry) = &self.entry {
            entry.with_window(|w| w.request_redraw());
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _window_id: WindowId, event: WindowEvent) {
        let Some(entry) = self.entry.as_mut() else {
            return;
        };

        if let Some(ev) = translate_window_event(&event) {
            entry.with_input_state_mut(|input| input.apply_event(&ev));
        }

        if let Some(app) = self.app.as_mut() {
            if app.on_window_event(&event) == AppControl::Exit {
                event_loop.exit();
                return;
            }
        }

        match event {
            WindowEvent::CloseRequested => event_loop.exit(),

            WindowEvent::RedrawRequested => match self.redraw() {
                Ok(AppControl::Continue) => {}
                Ok(AppControl::Exit) => event_loop.exit(),
                Err(err) => self.fail(event_loop, err),
            },

            _ => {}
        }
    }
}
