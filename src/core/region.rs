//! Screen-region geometry
//!
//! Regions are axis-aligned rectangles in logical screen coordinates,
//! normalized on construction so `left <= right` and `top <= bottom`.

use rand::Rng;

/// An axis-aligned screen rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Region {
    pub left: i32,
    pub top: i32,
    pub right: i32,
    pub bottom: i32,
}

impl Region {
    /// Create a region from two opposite corners, in any order.
    pub fn new(x1: i32, y1: i32, x2: i32, y2: i32) -> Self {
        Self {
            left: x1.min(x2),
            top: y1.min(y2),
            right: x1.max(x2),
            bottom: y1.max(y2),
        }
    }

    /// Create a region from two floating-point corner positions.
    pub fn from_points(ax: f32, ay: f32, bx: f32, by: f32) -> Self {
        Self::new(
            ax.round() as i32,
            ay.round() as i32,
            bx.round() as i32,
            by.round() as i32,
        )
    }

    pub fn width(&self) -> i32 {
        self.right - self.left
    }

    pub fn height(&self) -> i32 {
        self.bottom - self.top
    }

    /// A region with zero width or zero height captures nothing and cannot
    /// be clicked.
    pub fn is_degenerate(&self) -> bool {
        self.width() == 0 || self.height() == 0
    }

    pub fn center(&self) -> (i32, i32) {
        (
            (self.left + self.right) / 2,
            (self.top + self.bottom) / 2,
        )
    }

    /// Pick a uniformly random point strictly inside the region, inset by
    /// `inset` on every side to stay clear of edge artifacts. Regions too
    /// small for the inset fall back to their center point; degenerate
    /// regions yield no point at all.
    pub fn random_point_inside(&self, inset: i32, rng: &mut impl Rng) -> Option<(i32, i32)> {
        if self.is_degenerate() {
            return None;
        }
        let left = self.left + inset;
        let right = self.right - inset;
        let top = self.top + inset;
        let bottom = self.bottom - inset;
        if left >= right || top >= bottom {
            return Some(self.center());
        }
        Some((rng.gen_range(left..right), rng.gen_range(top..bottom)))
    }
}

/// The two regions picked by the operator at startup.
#[derive(Debug, Clone, Copy)]
pub struct SelectedRegions {
    /// The refresh/search button to click each cycle.
    pub button: Region,
    /// The result text to capture and recognize each cycle.
    pub message: Region,
}
