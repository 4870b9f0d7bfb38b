//! Axis-aligned bounding boxes in page coordinates (top-left origin).

/// A rectangular region on a page. `top < bottom` in page coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BBox {
    pub x0: f64,
    pub top: f64,
    pub x1: f64,
    pub bottom: f64,
}

impl BBox {
    pub fn new(x0: f64, top: f64, x1: f64, bottom: f64) -> Self {
        Self {
            x0,
            top,
            x1,
            bottom,
        }
    }

    pub fn width(&self) -> f64 {
        self.x1 - self.x0
    }

    pub fn height(&self) -> f64 {
        self.bottom - self.top
    }

    pub fn center(&self) -> (f64, f64) {
        ((self.x0 + self.x1) / 2.0, (self.top + self.bottom) / 2.0)
    }

    /// Whether a point lies inside the box. Points on the border count.
    pub fn contains_point(&self, x: f64, y: f64) -> bool {
        x >= self.x0 && x <= self.x1 && y >= self.top && y <= self.bottom
    }

    /// Geometric intersection of two boxes. A shared edge or corner yields
    /// a degenerate zero-area box, which still counts as an intersection.
    pub fn intersection(&self, other: &BBox) -> Option<BBox> {
        let x0 = self.x0.max(other.x0);
        let top = self.top.max(other.top);
        let x1 = self.x1.min(other.x1);
        let bottom = self.bottom.min(other.bottom);

        if x0 <= x1 && top <= bottom {
            Some(BBox::new(x0, top, x1, bottom))
        } else {
            None
        }
    }

    /// Non-null intersection test used to separate table glyphs from prose.
    pub fn overlaps(&self, other: &BBox) -> bool {
        self.intersection(other).is_some()
    }
}
