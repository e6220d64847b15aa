/// Premultiplied RGBA colour, channels in `[0, 1]`.
///
/// Invariant: `r`, `g` and `b` are already multiplied by `a`.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    pub const TRANSPARENT: Color = Color::from_premul(0.0, 0.0, 0.0, 0.0);
    pub const BLACK: Color = Color::from_premul(0.0, 0.0, 0.0, 1.0);
    pub const WHITE: Color = Color::from_premul(1.0, 1.0, 1.0, 1.0);

    /// From straight-alpha sRGB bytes, as found in hex literals.
    #[inline]
    pub fn from_srgb_u8(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self::from_straight(
            f32::from(r) / 255.0,
            f32::from(g) / 255.0,
            f32::from(b) / 255.0,
            f32::from(a) / 255.0,
        )
    }

    /// Opaque colour from a `0xRRGGBB` literal.
    #[inline]
    pub fn from_rgb_hex(hex: u32) -> Self {
        Self::from_srgb_u8((hex >> 16) as u8, (hex >> 8) as u8, hex as u8, 0xff)
    }

    #[inline]
    pub const fn from_premul(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    #[inline]
    pub fn from_straight(r: f32, g: f32, b: f32, a: f32) -> Self {
        let a = a.clamp(0.0, 1.0);
        Self {
            r: r.clamp(0.0, 1.0) * a,
            g: g.clamp(0.0, 1.0) * a,
            b: b.clamp(0.0, 1.0) * a,
            a,
        }
    }

    /// Straight-alpha components; RGB is zero when `a == 0`.
    #[inline]
    pub fn to_straight(self) -> (f32, f32, f32, f32) {
        if self.a <= 0.0 {
            (0.0, 0.0, 0.0, 0.0)
        } else {
            let inv = 1.0 / self.a;
            (self.r * inv, self.g * inv, self.b * inv, self.a)
        }
    }

    /// Scales the whole colour by `opacity`, keeping premultiplication.
    #[inline]
    pub fn faded(self, opacity: f32) -> Self {
        let k = opacity.clamp(0.0, 1.0);
        Self::from_premul(self.r * k, self.g * k, self.b * k, self.a * k)
    }

    /// Same hue with straight alpha replaced by `a`.
    #[inline]
    pub fn with_alpha(self, a: f32) -> Self {
        let (r, g, b, _) = self.to_straight();
        Self::from_straight(r, g, b, a)
    }

    /// Straight-alpha linear interpolation towards `other`.
    #[inline]
    pub fn lerp(self, other: Color, t: f32) -> Self {
        let t = t.clamp(0.0, 1.0);
        let (r0, g0, b0, a0) = self.to_straight();
        let (r1, g1, b1, a1) = other.to_straight();
        Self::from_straight(
            r0 + (r1 - r0) * t,
            g0 + (g1 - g0) * t,
            b0 + (b1 - b0) * t,
            a0 + (a1 - a0) * t,
        )
    }

    #[inline]
    pub fn is_finite(self) -> bool {
        self.r.is_finite() && self.g.is_finite() && self.b.is_finite() && self.a.is_finite()
    }

    #[inline]
    pub fn is_transparent(self) -> bool {
        self.a <= 0.0
    }

    #[inline]
    pub fn to_array(self) -> [f32; 4] {
        [self.r, self.g, self.b, self.a]
    }

    #[inline]
    pub fn to_wgpu(self) -> wgpu::Color {
        wgpu::Color {
            r: f64::from(self.r),
            g: f64::from(self.g),
            b: f64::from(self.b),
            a: f64::from(self.a),
        }
    }

    #[inline]
    pub fn debug_assert_premul(self) {
        debug_assert!(
            self.r <= self.a + f32::EPSILON
                && self.g <= self.a + f32::EPSILON
                && self.b <= self.a + f32::EPSILON,
            "straight-alpha colour passed as premultiplied: {self:?}"
        );
    }
}
