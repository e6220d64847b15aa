use flipclock_core::{ClockModel, PreferenceBackend, WallClock};
use flipclock_engine::coords::Vec2;
use flipclock_engine::core::{App, AppControl, EventCtx, FrameCtx, Schedule};
use flipclock_engine::input::InputEvent;
use flipclock_engine::paint::Color;
use flipclock_engine::render::SceneRenderer;
use flipclock_engine::scene::DrawList;
use flipclock_engine::text::{FontId, FontSystem};

use crate::input::{Action, action_for};
use crate::painters::{self, ControlsLayout, Overlay, Painter};
use crate::surface::WindowSurface;

/// Engine-facing side of the clock: forwards input and wake-ups to the
/// model, paints its display state each frame.
pub struct ClockApp<C, B> {
    title: String,
    model: ClockModel<C, B>,

    draw_list: DrawList,
    fonts: FontSystem,
    font: Option<FontId>,
    renderer: SceneRenderer,

    /// Window background, following the palette cross-fade.
    clear: Color,
}

impl<C: WallClock, B: PreferenceBackend> ClockApp<C, B> {
    pub fn new(
        title: String,
        model: ClockModel<C, B>,
        fonts: FontSystem,
        font: Option<FontId>,
    ) -> Self {
        Self {
            title,
            model,
            draw_list: DrawList::new(),
            fonts,
            font,
            renderer: SceneRenderer::new(),
            clear: Color::BLACK,
        }
    }
}

impl<C: WallClock, B: PreferenceBackend> App for ClockApp<C, B> {
    fn on_start(&mut self, ctx: &mut EventCtx<'_>) -> AppControl {
        let mut surface = WindowSurface::new(&ctx.window, &mut self.clear, &self.title);
        self.model.start(ctx.now, &mut surface);
        AppControl::Continue
    }

    fn on_input(&mut self, ctx: &mut EventCtx<'_>, event: &InputEvent) -> AppControl {
        let controls = ControlsLayout::new(ctx.window.viewport());
        let Some(action) = action_for(event, &controls, self.model.controls_visible()) else {
            return AppControl::Continue;
        };

        match action {
            Action::Quit => {
                log::info!("quit requested");
                AppControl::Exit
            }
            Action::Clock(command) => {
                let mut surface = WindowSurface::new(&ctx.window, &mut self.clear, &self.title);
                self.model.handle(command, ctx.now, &mut surface);
                ctx.window.request_redraw();
                AppControl::Continue
            }
        }
    }

    fn on_wake(&mut self, ctx: &mut EventCtx<'_>) -> Schedule {
        let mut surface = WindowSurface::new(&ctx.window, &mut self.clear, &self.title);
        if self.model.advance(ctx.now, &mut surface) {
            ctx.window.request_redraw();
        }

        if self.model.is_animating(ctx.now) {
            return Schedule::Animate;
        }
        match self.model.next_deadline() {
            Some(at) => Schedule::At(at),
            None => Schedule::Idle,
        }
    }

    fn on_frame(&mut self, ctx: &mut FrameCtx<'_, '_>) -> AppControl {
        let state = self.model.display_state(ctx.time.now);
        self.clear = painters::rgb(state.palette.background);
        let overlay = Overlay {
            pointer: ctx.input.pointer_pos.map(|(x, y)| Vec2::new(x, y)),
            fullscreen: ctx.window.is_fullscreen(),
        };

        self.draw_list.clear();
        {
            let mut painter = Painter::new(
                &mut self.draw_list,
                &self.fonts,
                self.font,
                ctx.window.scale_factor(),
            );
            painters::paint_clock(&mut painter, &state, ctx.window.viewport(), overlay);
        }

        let draw_list = &mut self.draw_list;
        let fonts = &self.fonts;
        let renderer = &mut self.renderer;
        ctx.render(self.clear, |rctx, target| {
            renderer.render(rctx, target, draw_list, fonts);
        })
    }

    fn on_exit(&mut self) {
        self.model.stop();
    }
}
