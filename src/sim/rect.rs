//! Integer axis-aligned rectangles
//!
//! Authoritative positions are kept in floating point; a `Rect` is the
//! rounded placement used for collision tests and rendering.

use serde::{Deserialize, Serialize};

/// Axis-aligned rectangle in whole pixels (top-left origin, y grows downward)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub w: i32,
    pub h: i32,
}

impl Rect {
    pub const fn new(x: i32, y: i32, w: i32, h: i32) -> Self {
        Self { x, y, w, h }
    }

    /// Place a rectangle from sub-pixel coordinates, rounding to the nearest
    /// pixel (halves go to the even pixel)
    pub fn from_f32(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self::new(
            x.round_ties_even() as i32,
            y.round_ties_even() as i32,
            w.round_ties_even() as i32,
            h.round_ties_even() as i32,
        )
    }

    #[inline]
    pub fn left(&self) -> i32 {
        self.x
    }

    #[inline]
    pub fn right(&self) -> i32 {
        self.x + self.w
    }

    #[inline]
    pub fn top(&self) -> i32 {
        self.y
    }

    #[inline]
    pub fn bottom(&self) -> i32 {
        self.y + self.h
    }

    /// Horizontal center (may be fractional for odd widths)
    #[inline]
    pub fn center_x(&self) -> f32 {
        self.x as f32 + self.w as f32 / 2.0
    }

    #[inline]
    pub fn center_y(&self) -> f32 {
        self.y as f32 + self.h as f32 / 2.0
    }

    /// True when the two rectangles share interior area.
    ///
    /// Touching edges do not count, and empty rectangles never overlap.
    pub fn overlaps(&self, other: &Rect) -> bool {
        if self.w <= 0 || self.h <= 0 || other.w <= 0 || other.h <= 0 {
            return false;
        }
        self.x < other.right()
            && other.x < self.right()
            && self.y < other.bottom()
            && other.y < self.bottom()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_edges() {
        let r = Rect::new(10, 20, 30, 40);
        assert_eq!(r.left(), 10);
        assert_eq!(r.right(), 40);
        assert_eq!(r.top(), 20);
        assert_eq!(r.bottom(), 60);
        assert_eq!(r.center_x(), 25.0);
        assert_eq!(r.center_y(), 40.0);
    }

    #[test]
    fn test_from_f32_rounds() {
        let r = Rect::from_f32(10.6, 19.4, 10.0, 10.0);
        assert_eq!(r, Rect::new(11, 19, 10, 10));
    }

    #[test]
    fn test_from_f32_halves_round_to_even() {
        let r = Rect::from_f32(2.5, 3.5, 120.5, -0.5);
        assert_eq!(r, Rect::new(2, 4, 120, 0));
    }

    #[test]
    fn test_overlap() {
        let a = Rect::new(0, 0, 10, 10);
        assert!(a.overlaps(&Rect::new(5, 5, 10, 10)));
        assert!(a.overlaps(&Rect::new(-5, -5, 100, 100)));
        // Shared edge only
        assert!(!a.overlaps(&Rect::new(10, 0, 10, 10)));
        assert!(!a.overlaps(&Rect::new(0, 10, 10, 10)));
        // Degenerate
        assert!(!a.overlaps(&Rect::new(2, 2, 0, 5)));
    }
}
