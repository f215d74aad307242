use serde::{Deserialize, Serialize};

/// Axis-aligned box in screen space (y grows downward), anchored at its
/// top-left corner.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Aabb {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Aabb {
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Box of the given size centered on `(cx, cy)`.
    pub fn centered(cx: f32, cy: f32, width: f32, height: f32) -> Self {
        Self::new(cx - width / 2.0, cy - height / 2.0, width, height)
    }

    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    /// Strict overlap: boxes that only share an edge do not overlap.
    pub fn overlaps(&self, other: &Aabb) -> bool {
        self.right() > other.x
            && self.x < other.right()
            && self.bottom() > other.y
            && self.y < other.bottom()
    }

    /// Horizontal spans overlap (strictly).
    pub fn overlaps_horizontally(&self, other: &Aabb) -> bool {
        self.right() > other.x && self.x < other.right()
    }

    pub fn center(&self) -> (f32, f32) {
        (self.x + self.width / 2.0, self.y + self.height / 2.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn overlapping_boxes() {
        let a = Aabb::new(0.0, 0.0, 10.0, 10.0);
        let b = Aabb::new(5.0, 5.0, 10.0, 10.0);
        assert!(a.overlaps(&b));
        assert!(b.overlaps(&a));
    }

    #[test]
    fn touching_edges_do_not_overlap() {
        let a = Aabb::new(0.0, 0.0, 10.0, 10.0);
        let b = Aabb::new(10.0, 0.0, 10.0, 10.0);
        assert!(!a.overlaps(&b));
        assert!(!a.overlaps_horizontally(&b));
    }

    #[test]
    fn centered_box() {
        let b = Aabb::centered(100.0, 50.0, 20.0, 10.0);
        assert_eq!(b.x, 90.0);
        assert_eq!(b.y, 45.0);
        assert_eq!(b.center(), (100.0, 50.0));
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn overlap_is_symmetric(
                ax in -500.0f32..500.0, ay in -500.0f32..500.0,
                aw in 1.0f32..200.0, ah in 1.0f32..200.0,
                bx in -500.0f32..500.0, by in -500.0f32..500.0,
                bw in 1.0f32..200.0, bh in 1.0f32..200.0,
            ) {
                let a = Aabb::new(ax, ay, aw, ah);
                let b = Aabb::new(bx, by, bw, bh);
                prop_assert_eq!(a.overlaps(&b), b.overlaps(&a));
            }
        }
    }
}
