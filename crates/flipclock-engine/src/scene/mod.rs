//! Renderer-agnostic draw stream.
//!
//! Painters record commands with a z-index; renderers consume them in
//! paint order (z, then insertion order). Shape payloads and their push
//! helpers live under `scene::shapes`.

mod cmd;
mod key;
mod list;
mod z_index;

pub mod shapes;

pub use cmd::DrawCmd;
pub use key::SortKey;
pub use list::{DrawItem, DrawList};
pub use shapes::{Border, CircleCmd, QuadCmd, RoundedRectCmd, TextCmd};
pub use z_index::ZIndex;
