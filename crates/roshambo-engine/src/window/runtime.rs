use anyhow::{Context, Result};
use ouroboros::self_referencing;

use winit::application::ApplicationHandler;
use winit::dpi::PhysicalSize;
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::window::{Window, WindowId};

use crate::coords::AspectLock;
use crate::core::{App as CoreApp, AppControl, FrameCtx, WindowCtx};
use crate::device::{Gpu, GpuInit};
use crate::input::InputFrame;
use crate::input::platform::translate_window_event;
use crate::time::{FrameClock, FrameTime};

/// Window/runtime configuration.
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub title: String,
    pub initial_size: PhysicalSize<u32>,
    /// Resizes are snapped to this lock when set.
    pub aspect_lock: Option<AspectLock>,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            title: "Roshambo".to_string(),
            initial_size: PhysicalSize::new(640, 360),
            aspect_lock: None,
        }
    }
}

/// Entry point for the runtime.
pub struct Runtime;

impl Runtime {
    /// Opens the window and drives `app` until it exits or the window closes.
    pub fn run<A>(config: RuntimeConfig, gpu_init: GpuInit, app: A) -> Result<()>
    where
        A: 'static + CoreApp,
    {
        let event_loop = EventLoop::new().context("failed to create winit EventLoop")?;
        let mut state = AppState::new(config, gpu_init, app);

        event_loop
            .run_app(&mut state)
            .context("winit event loop terminated with error")?;

        match state.fatal.take() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

#[self_referencing]
struct WindowEntry {
    input_frame: InputFrame,
    clock: FrameClock,

    window: Window,

    #[borrows(window)]
    #[covariant]
    gpu: Gpu<'this>,
}

struct AppState<A>
where
    A: CoreApp + 'static,
{
    config: RuntimeConfig,
    gpu_init: GpuInit,
    app: A,

    window: Option<WindowEntry>,
    exit_requested: bool,
    fatal: Option<anyhow::Error>,
}

impl<A> AppState<A>
where
    A: CoreApp + 'static,
{
    fn new(config: RuntimeConfig, gpu_init: GpuInit, app: A) -> Self {
        Self {
            config,
            gpu_init,
            app,
            window: None,
            exit_requested: false,
            fatal: None,
        }
    }

    fn create_window_entry(&mut self, event_loop: &ActiveEventLoop) -> Result<WindowEntry> {
        let mut attrs = Window::default_attributes()
            .with_title(self.config.title.clone())
            .with_inner_size(self.config.initial_size)
            .with_resizable(true);

        if let Some(lock) = self.config.aspect_lock {
            attrs = attrs
                .with_min_inner_size(PhysicalSize::new(lock.min_w, lock.min_h))
                .with_max_inner_size(PhysicalSize::new(lock.max_w, lock.max_h));
        }

        let window = event_loop
            .create_window(attrs)
            .context("failed to create window")?;

        let gpu_init = self.gpu_init.clone();

        WindowEntryTryBuilder {
            input_frame: InputFrame::default(),
            clock: FrameClock::default(),
            window,
            gpu_builder: |w| pollster::block_on(Gpu::new(w, gpu_init)),
        }
        .try_build()
        .context("GPU initialization failed")
    }

    fn handle_resize(&mut self, requested: PhysicalSize<u32>) {
        let Some(entry) = self.window.as_mut() else { return };

        let mut actual = requested;
        if let Some(lock) = self.config.aspect_lock {
            let (w, h) = lock.constrain(requested.width, requested.height);
            if (w, h) != (requested.width, requested.height) {
                log::debug!("resize {}x{} constrained to {w}x{h}", requested.width, requested.height);
                // Some platforms apply the request synchronously; others send another Resized.
                if let Some(applied) = entry.with_window(|win| win.request_inner_size(PhysicalSize::new(w, h))) {
                    actual = applied;
                }
            }
        }

        entry.with_gpu_mut(|gpu| gpu.resize(actual));
        let size = entry.with_gpu(|gpu| gpu.size());
        self.app.on_resize(size.width, size.height);
        entry.with_window(|w| w.request_redraw());
    }

    fn redraw(&mut self, window_id: WindowId) {
        let (app, window) = (&mut self.app, &mut self.window);
        let Some(entry) = window.as_mut() else { return };

        let mut control = AppControl::Continue;
        entry.with_mut(|fields| {
            let ft: FrameTime = fields.clock.tick();
            {
                let mut ctx = FrameCtx {
                    window: WindowCtx {
                        id: window_id,
                        window: fields.window,
                    },
                    gpu: fields.gpu,
                    input_frame: fields.input_frame,
                    time: ft,
                };
                control = app.on_frame(&mut ctx);
            }
            fields.input_frame.clear();
        });

        if control == AppControl::Exit {
            self.exit_requested = true;
            if let Some(err) = self.app.take_error() {
                self.fatal = Some(err);
            }
        }
    }
}

impl<A> ApplicationHandler for AppState<A>
where
    A: CoreApp + 'static,
{
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if let Some(entry) = self.window.as_mut() {
            entry.with_clock_mut(|c| c.reset());
            return;
        }

        match self.create_window_entry(event_loop) {
            Ok(entry) => {
                let size = entry.with_gpu(|gpu| gpu.size());
                log::info!("window ready at {}x{}", size.width, size.height);
                entry.with_window(|w| w.request_redraw());
                self.window = Some(entry);
                self.app.on_resize(size.width, size.height);
            }
            Err(e) => {
                log::error!("failed to create window: {e:#}");
                self.fatal = Some(e);
                self.exit_requested = true;
                event_loop.exit();
            }
        }
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        if self.exit_requested {
            event_loop.exit();
            return;
        }

        event_loop.set_control_flow(ControlFlow::Poll);
        if let Some(entry) = self.window.as_ref() {
            entry.with_window(|w| w.request_redraw());
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, window_id: WindowId, event: WindowEvent) {
        if self.exit_requested {
            event_loop.exit();
            return;
        }

        if let (Some(entry), Some(ev)) = (self.window.as_mut(), translate_window_event(&event)) {
            entry.with_input_frame_mut(|frame| frame.push_event(ev));
        }

        match event {
            WindowEvent::CloseRequested => {
                log::info!("window closed");
                self.window = None;
                self.exit_requested = true;
            }

            WindowEvent::Resized(new_size) => self.handle_resize(new_size),

            WindowEvent::ScaleFactorChanged { .. } => {
                if let Some(size) = self.window.as_ref().map(|e| e.with_window(|w| w.inner_size())) {
                    self.handle_resize(size);
                }
            }

            WindowEvent::RedrawRequested => self.redraw(window_id),

            _ => {}
        }

        if self.exit_requested {
            event_loop.exit();
        }
    }
}
