//! Host services the model drives: palette, fullscreen, announcements.

use thiserror::Error;

use crate::theme::Theme;

#[derive(Debug, Error)]
pub enum PlatformError {
    #[error("fullscreen is not supported here")]
    FullscreenUnsupported,

    #[error("fullscreen request was rejected: {0}")]
    FullscreenRejected(String),

    #[error("no window is available")]
    NoWindow,
}

/// The window (or a test double) the clock renders into.
pub trait PlatformSurface {
    /// Applies the theme's palette to everything outside the painted clock.
    fn apply_palette(&mut self, theme: &Theme);

    fn is_fullscreen(&self) -> bool;

    fn request_fullscreen(&mut self) -> Result<(), PlatformError>;

    fn exit_fullscreen(&mut self) -> Result<(), PlatformError>;

    /// Publishes text for assistive technology.
    fn announce(&mut self, text: &str);
}
