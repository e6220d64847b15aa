use std::time::Instant;

use anyhow::{Context, Result};
use ouroboros::self_referencing;
use winit::application::ApplicationHandler;
use winit::dpi::LogicalSize;
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::window::{Fullscreen, Window, WindowId};

use crate::core::{App, AppControl, EventCtx, FrameCtx, Schedule, WindowCtx};
use crate::device::{Gpu, GpuInit};
use crate::input::platform::winit::translate_window_event;
use crate::input::{InputFrame, InputState};
use crate::time::FrameClock;

/// Window configuration.
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub title: String,
    pub initial_size: LogicalSize<f64>,
    pub min_size: Option<LogicalSize<f64>>,
    pub start_fullscreen: bool,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            title: "flipclock".to_owned(),
            initial_size: LogicalSize::new(640.0, 480.0),
            min_size: Some(LogicalSize::new(240.0, 180.0)),
            start_fullscreen: false,
        }
    }
}

/// Commands an app can queue from a callback; applied once it returns.
#[derive(Default)]
pub struct RuntimeCtx {
    commands: Vec<Command>,
}

impl RuntimeCtx {
    pub fn exit(&mut self) {
        self.commands.push(Command::Exit);
    }

    pub fn request_redraw(&mut self) {
        self.commands.push(Command::RequestRedraw);
    }
}

enum Command {
    Exit,
    RequestRedraw,
}

/// Entry point for the runtime.
pub struct Runtime;

impl Runtime {
    /// Opens the window and runs `app` until it exits or the window closes.
    ///
    /// Fails if the event loop, the window or the GPU cannot be created.
    pub fn run<A>(config: RuntimeConfig, gpu_init: GpuInit, app: A) -> Result<()>
    where
        A: App + 'static,
    {
        let event_loop = EventLoop::new().context("failed to create winit EventLoop")?;
        let mut state = AppState::new(config, gpu_init, app);

        event_loop
            .run_app(&mut state)
            .context("winit event loop terminated with error")?;

        match state.startup_error {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

#[self_referencing]
struct WindowEntry {
    input_state: InputState,
    input_frame: InputFrame,
    clock: FrameClock,

    window: Window,

    #[borrows(window)]
    #[covariant]
    gpu: Gpu<'this>,
}

struct AppState<A: App + 'static> {
    config: RuntimeConfig,
    gpu_init: GpuInit,
    app: A,

    entry: Option<WindowEntry>,
    exit_requested: bool,
    startup_error: Option<anyhow::Error>,
}

impl<A: App + 'static> AppState<A> {
    fn new(config: RuntimeConfig, gpu_init: GpuInit, app: A) -> Self {
        Self {
            config,
            gpu_init,
            app,
            entry: None,
            exit_requested: false,
            startup_error: None,
        }
    }

    fn create_entry(&self, event_loop: &ActiveEventLoop) -> Result<WindowEntry> {
        let mut attrs = Window::default_attributes()
            .with_title(self.config.title.clone())
            .with_inner_size(self.config.initial_size);
        if let Some(min) = self.config.min_size {
            attrs = attrs.with_min_inner_size(min);
        }
        if self.config.start_fullscreen {
            attrs = attrs.with_fullscreen(Some(Fullscreen::Borderless(None)));
        }

        let window = event_loop
            .create_window(attrs)
            .context("failed to create window")?;
        let gpu_init = self.gpu_init.clone();

        WindowEntryTryBuilder {
            input_state: InputState::default(),
            input_frame: InputFrame::default(),
            clock: FrameClock::default(),
            window,
            gpu_builder: |w| pollster::block_on(Gpu::new(w, gpu_init)),
        }
        .try_build()
        .context("GPU initialization failed")
    }

    /// Runs `f` with an `EventCtx` for the window, then applies queued
    /// commands. Returns `None` when there is no window.
    fn dispatch<R>(
        &mut self,
        event_loop: &ActiveEventLoop,
        f: impl FnOnce(&mut A, &mut EventCtx<'_>) -> R,
    ) -> Option<R> {
        let mut runtime = RuntimeCtx::default();
        let (app, entry) = (&mut self.app, self.entry.as_mut()?);

        let out = entry.with_mut(|fields| {
            let mut ctx = EventCtx {
                window: WindowCtx {
                    window: fields.window,
                },
                input: fields.input_state,
                now: Instant::now(),
                runtime: &mut runtime,
            };
            f(app, &mut ctx)
        });

        self.apply_commands(event_loop, runtime);
        Some(out)
    }

    fn apply_commands(&mut self, event_loop: &ActiveEventLoop, mut ctx: RuntimeCtx) {
        for cmd in ctx.commands.drain(..) {
            match cmd {
                Command::Exit => self.exit_requested = true,
                Command::RequestRedraw => {
                    if let Some(entry) = &self.entry {
                        entry.with_window(|w| w.request_redraw());
                    }
                }
            }
        }
        if self.exit_requested {
            self.shutdown(event_loop);
        }
    }

    fn handle_control(&mut self, event_loop: &ActiveEventLoop, control: Option<AppControl>) {
        if control == Some(AppControl::Exit) {
            self.exit_requested = true;
            self.shutdown(event_loop);
        }
    }

    fn shutdown(&mut self, event_loop: &ActiveEventLoop) {
        if self.entry.take().is_some() {
            self.app.on_exit();
            log::debug!("window closed");
        }
        event_loop.exit();
    }

    fn redraw(&mut self, event_loop: &ActiveEventLoop) {
        let mut runtime = RuntimeCtx::default();
        let (app, Some(entry)) = (&mut self.app, self.entry.as_mut()) else {
            return;
        };

        let control = entry.with_mut(|fields| {
            let time = fields.clock.tick(Instant::now());
            let control = {
                let mut ctx = FrameCtx {
                    window: WindowCtx {
                        window: fields.window,
                    },
                    gpu: fields.gpu,
                    input: fields.input_state,
                    input_frame: fields.input_frame,
                    time,
                    runtime: &mut runtime,
                };
                app.on_frame(&mut ctx)
            };
            fields.input_frame.clear();
            control
        });

        self.apply_commands(event_loop, runtime);
        self.handle_control(event_loop, Some(control));
    }
}

impl<A: App + 'static> ApplicationHandler for AppState<A> {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.entry.is_some() || self.exit_requested {
            return;
        }

        match self.create_entry(event_loop) {
            Ok(entry) => {
                log::info!("window created");
                self.entry = Some(entry);
            }
            Err(err) => {
                log::error!("{err:#}");
                self.startup_error = Some(err);
                self.exit_requested = true;
                event_loop.exit();
                return;
            }
        }

        let control = self.dispatch(event_loop, |app, ctx| {
            ctx.window.request_redraw();
            app.on_start(ctx)
        });
        self.handle_control(event_loop, control);
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        if self.exit_requested {
            event_loop.exit();
            return;
        }

        let Some(schedule) = self.dispatch(event_loop, |app, ctx| app.on_wake(ctx)) else {
            return;
        };
        if self.exit_requested {
            return;
        }

        let flow = match schedule {
            Schedule::Idle => ControlFlow::Wait,
            Schedule::At(deadline) => ControlFlow::WaitUntil(deadline),
            Schedule::Animate => {
                if let Some(entry) = &self.entry {
                    entry.with_window(|w| w.request_redraw());
                }
                ControlFlow::Wait
            }
        };
        event_loop.set_control_flow(flow);
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        if self.exit_requested {
            return;
        }

        let input = self.entry.as_mut().and_then(|entry| {
            entry.with_mut(|fields| {
                let ev = translate_window_event(
                    fields.window.scale_factor(),
                    fields.input_state,
                    &event,
                )?;
                fields.input_state.apply_event(fields.input_frame, ev.clone());
                Some(ev)
            })
        });

        if let Some(ev) = input {
            let control = self.dispatch(event_loop, |app, ctx| app.on_input(ctx, &ev));
            self.handle_control(event_loop, control);
        }

        let control = self.dispatch(event_loop, |app, ctx| app.on_window_event(ctx, &event));
        self.handle_control(event_loop, control);
        if self.exit_requested {
            return;
        }

        match &event {
            WindowEvent::CloseRequested => {
                log::info!("close requested");
                self.exit_requested = true;
                self.shutdown(event_loop);
            }

            WindowEvent::Resized(new_size) => {
                if let Some(entry) = self.entry.as_mut() {
                    entry.with_gpu_mut(|gpu| gpu.resize(*new_size));
                    entry.with_window(|w| w.request_redraw());
                }
            }

            WindowEvent::ScaleFactorChanged { .. } => {
                if let Some(entry) = self.entry.as_mut() {
                    let size = entry.with_window(|w| w.inner_size());
                    entry.with_gpu_mut(|gpu| gpu.resize(size));
                    entry.with_window(|w| w.request_redraw());
                }
            }

            WindowEvent::RedrawRequested => self.redraw(event_loop),

            _ => {}
        }
    }
}
