//! Built-in colour themes.

use std::fmt;

/// 8-bit sRGB colour.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct Rgb8 {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb8 {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// From `0xRRGGBB`.
    pub const fn from_hex(hex: u32) -> Self {
        Self {
            r: ((hex >> 16) & 0xff) as u8,
            g: ((hex >> 8) & 0xff) as u8,
            b: (hex & 0xff) as u8,
        }
    }

    /// Channel-wise blend toward `to`; `t` is clamped to `[0, 1]`.
    pub fn lerp(self, to: Rgb8, t: f32) -> Rgb8 {
        let t = t.clamp(0.0, 1.0);
        let mix = |a: u8, b: u8| (f32::from(a) + (f32::from(b) - f32::from(a)) * t).round() as u8;
        Rgb8::new(mix(self.r, to.r), mix(self.g, to.g), mix(self.b, to.b))
    }
}

impl fmt::Display for Rgb8 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct Palette {
    /// Window clear colour.
    pub background: Rgb8,
    /// Clock face and flip cards.
    pub surface: Rgb8,
    /// Second hand and highlighted text.
    pub accent: Rgb8,
    /// Hour/minute hands, tick marks and secondary text.
    pub muted: Rgb8,
}

impl Palette {
    pub fn lerp(self, to: Palette, t: f32) -> Palette {
        Palette {
            background: self.background.lerp(to.background, t),
            surface: self.surface.lerp(to.surface, t),
            accent: self.accent.lerp(to.accent, t),
            muted: self.muted.lerp(to.muted, t),
        }
    }
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct Theme {
    pub name: &'static str,
    pub palette: Palette,
}

const fn theme(name: &'static str, bg: u32, surface: u32, accent: u32, muted: u32) -> Theme {
    Theme {
        name,
        palette: Palette {
            background: Rgb8::from_hex(bg),
            surface: Rgb8::from_hex(surface),
            accent: Rgb8::from_hex(accent),
            muted: Rgb8::from_hex(muted),
        },
    }
}

pub const BUILTIN_THEMES: [Theme; 5] = [
    theme("Dark", 0x000000, 0x1c1c1c, 0x9bd3ff, 0x9aa7b0),
    theme("Light", 0xf6f7f8, 0xffffff, 0x2b6ea3, 0x6b7280),
    theme("Calm Blue", 0x071124, 0x0f1f36, 0x6fb3ff, 0x98b6d6),
    theme("Warm Sunset", 0x1b0b05, 0x2b1a12, 0xffb27a, 0xd4a38e),
    theme("Mint Green", 0x08120d, 0x0f2620, 0x7fe7b1, 0x9bd6c0),
];

/// Ordered, non-empty list of themes.
#[derive(Debug, Clone)]
pub struct ThemeRegistry {
    themes: Vec<Theme>,
}

impl Default for ThemeRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}

impl ThemeRegistry {
    pub fn builtin() -> Self {
        Self {
            themes: BUILTIN_THEMES.to_vec(),
        }
    }

    /// Returns `None` for an empty list.
    pub fn new(themes: Vec<Theme>) -> Option<Self> {
        (!themes.is_empty()).then_some(Self { themes })
    }

    pub fn len(&self) -> usize {
        self.themes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.themes.is_empty()
    }

    /// Clamps an index into range; anything out of range maps to `0`.
    pub fn resolve(&self, index: usize) -> usize {
        if index < self.themes.len() { index } else { 0 }
    }

    pub fn get(&self, index: usize) -> &Theme {
        &self.themes[self.resolve(index)]
    }

    pub fn next_index(&self, index: usize) -> usize {
        (self.resolve(index) + 1) % self.themes.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Theme> {
        self.themes.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_order_and_colours() {
        let r = ThemeRegistry::builtin();
        let names: Vec<_> = r.iter().map(|t| t.name).collect();
        assert_eq!(names, ["Dark", "Light", "Calm Blue", "Warm Sunset", "Mint Green"]);
        assert_eq!(r.get(2).palette.accent, Rgb8::new(0x6f, 0xb3, 0xff));
        assert_eq!(r.get(1).palette.background.to_string(), "#f6f7f8");
    }

    #[test]
    fn cycling_wraps() {
        let r = ThemeRegistry::builtin();
        assert_eq!(r.next_index(0), 1);
        assert_eq!(r.next_index(4), 0);
    }

    #[test]
    fn out_of_range_falls_back_to_first() {
        let r = ThemeRegistry::builtin();
        assert_eq!(r.resolve(5), 0);
        assert_eq!(r.get(99).name, "Dark");
        assert_eq!(r.next_index(99), 1);
    }

    #[test]
    fn empty_registry_is_rejected() {
        assert!(ThemeRegistry::new(Vec::new()).is_none());
    }

    #[test]
    fn blending_hits_both_ends_and_the_middle() {
        let black = Rgb8::new(0, 0, 0);
        let white = Rgb8::new(255, 255, 255);
        assert_eq!(black.lerp(white, 0.0), black);
        assert_eq!(black.lerp(white, 1.0), white);
        assert_eq!(black.lerp(white, 0.5), Rgb8::new(128, 128, 128));
        assert_eq!(white.lerp(black, 2.0), black);
    }
}
