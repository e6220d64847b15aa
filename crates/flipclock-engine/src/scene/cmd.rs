use super::shapes::{CircleCmd, QuadCmd, RoundedRectCmd, TextCmd};

/// One recorded draw command.
///
/// Each variant has a matching batch renderer under `render::shapes`.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCmd {
    Quad(QuadCmd),
    RoundedRect(RoundedRectCmd),
    Circle(CircleCmd),
    Text(TextCmd),
}

impl DrawCmd {
    pub fn kind_name(&self) -> &'static str {
        match self {
            DrawCmd::Quad(_) => "quad",
            DrawCmd::RoundedRect(_) => "rounded_rect",
            DrawCmd::Circle(_) => "circle",
            DrawCmd::Text(_) => "text",
        }
    }
}
