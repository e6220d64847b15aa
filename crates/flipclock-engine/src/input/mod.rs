//! Input subsystem.
//!
//! The public API does not expose winit types; `platform::winit` translates
//! window events into [`InputEvent`]s.

mod frame;
mod state;
mod types;

pub mod platform;

pub use frame::InputFrame;
pub use state::InputState;
pub use types::{
    InputEvent, Key, KeyState, Modifiers, MouseButton, MouseButtonState, PointerButtonEvent,
    PointerMoveEvent,
};
