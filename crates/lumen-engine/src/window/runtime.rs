use anyhow::{Context, Result};
use ouroboros::self_referencing;

use winit::application::ApplicationHandler;
use winit::dpi::PhysicalSize;
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::window::{Window, WindowId};

use crate::core::{App as CoreApp, AppControl, FrameCtx};
use crate::device::{Gpu, GpuInit};
use crate::input::platform::translate_window_event;
use crate::input::{InputEvent, InputState, Key};
use crate::time::{FrameClock, FrameTime};

use super::LoopState;

/// Window/runtime configuration.
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub title: String,
    /// Inner size in physical pixels.
    pub size: PhysicalSize<u32>,
    pub resizable: bool,
    /// Any fresh press of one of these requests close.
    pub exit_keys: Vec<Key>,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            title: "lumen".to_string(),
            size: PhysicalSize::new(500, 500),
            resizable: false,
            exit_keys: vec![Key::Q, Key::Escape],
        }
    }
}

/// Entry point for the runtime.
pub struct Runtime;

impl Runtime {
    /// Opens the window, creates the GPU context, and drives `app` until the
    /// loop terminates.
    ///
    /// Window/GPU creation errors and errors from [`CoreApp::on_init`] end
    /// the loop and are returned here.
    pub fn run<A>(config: RuntimeConfig, gpu_init: GpuInit, app: A) -> Result<()>
    where
        A: 'static + CoreApp,
    {
        let event_loop = EventLoop::new().context("failed to create winit EventLoop")?;
        let mut state = AppState::new(config, gpu_init, app);

        event_loop
            .run_app(&mut state)
            .context("winit event loop terminated with error")?;

        // GPU context before window.
        drop(state.entry.take());
        log::info!("render loop finished ({:?})", state.loop_state);

        match state.error.take() {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }
}

#[self_referencing]
struct WindowEntry {
    input_state: InputState,
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

    entry: Option<WindowEntry>,
    loop_state: LoopState,

    /// First fatal setup error; returned from `Runtime::run`.
    error: Option<anyhow::Error>,
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
            entry: None,
            loop_state: LoopState::Running,
            error: None,
        }
    }

    /// Records a setup failure and skips straight to `Terminated`.
    fn fail(&mut self, event_loop: &ActiveEventLoop, err: anyhow::Error) {
        log::error!("{err:#}");
        self.error.get_or_insert(err);
        self.loop_state = LoopState::Terminated;
        event_loop.exit();
    }

    fn create_window_entry(&mut self, event_loop: &ActiveEventLoop) -> Result<WindowEntry> {
        let attrs = Window::default_attributes()
            .with_title(self.config.title.clone())
            .with_inner_size(self.config.size)
            .with_resizable(self.config.resizable);

        let window = event_loop
            .create_window(attrs)
            .context("failed to create window")?;

        log::info!(
            "created window '{}' ({}x{})",
            self.config.title,
            self.config.size.width,
            self.config.size.height
        );

        let gpu_init = self.gpu_init.clone();

        let mut entry = WindowEntryTryBuilder {
            input_state: InputState::default(),
            clock: FrameClock::default(),
            window,
            gpu_builder: |w| {
                pollster::block_on(Gpu::new(w, gpu_init))
                    .context("GPU initialization failed for window")
            },
        }
        .try_build()?;

        let app = &mut self.app;
        entry
            .with_gpu(|gpu| app.on_init(gpu))
            .context("application setup failed")?;

        // Animation time starts at the first frame, not at process start.
        entry.with_clock_mut(|clock| clock.reset());
        Ok(entry)
    }
}

impl<A> ApplicationHandler for AppState<A>
where
    A: CoreApp + 'static,
{
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.entry.is_some() || self.loop_state.is_terminated() {
            return;
        }

        match self.create_window_entry(event_loop) {
            Ok(entry) => {
                entry.with_window(|w| w.request_redraw());
                self.entry = Some(entry);
            }
            Err(e) => self.fail(event_loop, e),
        }
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        if self.loop_state.is_terminated() {
            event_loop.exit();
            return;
        }

        event_loop.set_control_flow(ControlFlow::Wait);

        // Continuous redraw; presentation is vsync-paced.
        if let Some(entry) = &self.entry {
            entry.with_window(|w| w.request_redraw());
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        if self.loop_state.is_terminated() {
            event_loop.exit();
            return;
        }

        // Split borrows to avoid `self` capture inside `ouroboros` closures.
        let (app, loop_state, exit_keys) =
            (&mut self.app, &mut self.loop_state, &self.config.exit_keys);

        let Some(entry) = self.entry.as_mut() else {
            return;
        };

        if let Some(ev) = translate_window_event(&event) {
            entry.with_input_state_mut(|input| input.apply_event(&ev));
            if let InputEvent::Key(key) = &ev {
                loop_state.on_key(key, exit_keys);
            }
        }

        if app.on_window_event(&event) == AppControl::Exit {
            loop_state.request_close();
        }

        match &event {
            WindowEvent::CloseRequested => loop_state.request_close(),

            WindowEvent::Resized(new_size) => {
                entry.with_gpu_mut(|gpu| gpu.resize(*new_size));
                entry.with_window(|w| w.request_redraw());
            }

            WindowEvent::ScaleFactorChanged { .. } => {
                let new_size = entry.with_window(|w| w.inner_size());
                entry.with_gpu_mut(|gpu| gpu.resize(new_size));
            }

            WindowEvent::RedrawRequested => {
                let mut app_control = AppControl::Continue;

                entry.with_mut(|fields| {
                    let ft: FrameTime = fields.clock.tick();
                    let mut ctx = FrameCtx {
                        window: fields.window,
                        gpu: fields.gpu,
                        input: fields.input_state,
                        time: ft,
                    };
                    app_control = app.on_frame(&mut ctx);
                });

                if app_control == AppControl::Exit {
                    loop_state.request_close();
                }
                loop_state.finish_iteration();
            }

            _ => {}
        }

        if self.loop_state.is_terminated() {
            event_loop.exit();
        }
    }
}
