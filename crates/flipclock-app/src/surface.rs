//! The winit window as seen by the clock model.

use flipclock_core::{PlatformError, PlatformSurface, Theme};
use flipclock_engine::core::WindowCtx;
use flipclock_engine::paint::Color;

use crate::painters::rgb;

/// Palette goes to the clear colour, fullscreen to borderless fullscreen,
/// announcements to the window title.
pub struct WindowSurface<'a> {
    window: &'a WindowCtx<'a>,
    clear: &'a mut Color,
    title: &'a str,
}

impl<'a> WindowSurface<'a> {
    pub fn new(window: &'a WindowCtx<'a>, clear: &'a mut Color, title: &'a str) -> Self {
        Self { window, clear, title }
    }
}

impl PlatformSurface for WindowSurface<'_> {
    fn apply_palette(&mut self, theme: &Theme) {
        *self.clear = rgb(theme.palette.background);
        self.window.request_redraw();
    }

    fn is_fullscreen(&self) -> bool {
        self.window.is_fullscreen()
    }

    fn request_fullscreen(&mut self) -> Result<(), PlatformError> {
        if self.window.enter_fullscreen() {
            Ok(())
        } else {
            Err(PlatformError::FullscreenUnsupported)
        }
    }

    fn exit_fullscreen(&mut self) -> Result<(), PlatformError> {
        self.window.exit_fullscreen();
        Ok(())
    }

    fn announce(&mut self, text: &str) {
        log::debug!("announce: {text}");
        self.window.set_title(&announced_title(self.title, text));
    }
}

pub fn announced_title(base: &str, text: &str) -> String {
    if text.is_empty() {
        base.to_string()
    } else {
        format!("{base} · {text}")
    }
}
