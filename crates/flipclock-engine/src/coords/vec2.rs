use core::ops::{Add, Mul, Neg, Sub};

/// 2D vector in logical pixels.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl Vec2 {
    pub const ZERO: Vec2 = Vec2::new(0.0, 0.0);

    #[inline]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    #[inline]
    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }

    #[inline]
    pub fn length(self) -> f32 {
        self.x.hypot(self.y)
    }

    /// Point on a circle of `radius` around `self`, at `deg` degrees
    /// clockwise from 12 o'clock (y-down screen space).
    #[inline]
    pub fn polar(self, radius: f32, deg: f32) -> Vec2 {
        let (s, c) = deg.to_radians().sin_cos();
        Vec2::new(self.x + radius * s, self.y - radius * c)
    }
}

impl Add for Vec2 {
    type Output = Vec2;
    #[inline]
    fn add(self, rhs: Vec2) -> Vec2 {
        Vec2::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Vec2 {
    type Output = Vec2;
    #[inline]
    fn sub(self, rhs: Vec2) -> Vec2 {
        Vec2::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Mul<f32> for Vec2 {
    type Output = Vec2;
    #[inline]
    fn mul(self, rhs: f32) -> Vec2 {
        Vec2::new(self.x * rhs, self.y * rhs)
    }
}

impl Neg for Vec2 {
    type Output = Vec2;
    #[inline]
    fn neg(self) -> Vec2 {
        Vec2::new(-self.x, -self.y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: Vec2, b: Vec2) -> bool {
        (a - b).length() < 1e-4
    }

    #[test]
    fn polar_zero_points_up() {
        let c = Vec2::new(50.0, 50.0);
        assert!(close(c.polar(10.0, 0.0), Vec2::new(50.0, 40.0)));
    }

    #[test]
    fn polar_runs_clockwise() {
        let c = Vec2::new(50.0, 50.0);
        assert!(close(c.polar(10.0, 90.0), Vec2::new(60.0, 50.0)));
        assert!(close(c.polar(10.0, 180.0), Vec2::new(50.0, 60.0)));
        assert!(close(c.polar(10.0, 270.0), Vec2::new(40.0, 50.0)));
    }
}
