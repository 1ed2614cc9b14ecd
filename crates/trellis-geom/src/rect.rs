use super::{Point, Size};

/// A rectangle with a signed origin and unsigned size.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, Default)]
pub struct Rect {
    /// Top-left corner.
    pub tl: Point,
    /// Width.
    pub w: u32,
    /// Height.
    pub h: u32,
}

/// Clamp a wide intermediate back into the `i32` coordinate space.
fn clamp_i32(v: i64) -> i32 {
    v.clamp(i64::from(i32::MIN), i64::from(i32::MAX)) as i32
}

impl Rect {
    /// Construct a rectangle from coordinates and size.
    pub fn new(x: i32, y: i32, w: u32, h: u32) -> Self {
        Self {
            tl: Point { x, y },
            w,
            h,
        }
    }

    /// Construct a rectangle from an origin and a size.
    pub fn from_parts(tl: Point, size: Size) -> Self {
        Self {
            tl,
            w: size.w,
            h: size.h,
        }
    }

    /// Does this rect have a zero size?
    pub fn is_zero(&self) -> bool {
        self.w == 0 || self.h == 0
    }

    /// The size of this rectangle.
    pub fn size(&self) -> Size {
        Size::new(self.w, self.h)
    }

    /// Return a copy of this rectangle moved to `tl`.
    pub fn at(&self, tl: Point) -> Self {
        Self { tl, ..*self }
    }

    /// Return a copy of this rectangle shifted by `offset`.
    pub fn translate(&self, offset: Point) -> Self {
        self.at(self.tl + offset)
    }

    /// Left edge (inclusive).
    pub fn left(&self) -> i32 {
        self.tl.x
    }

    /// Top edge (inclusive).
    pub fn top(&self) -> i32 {
        self.tl.y
    }

    /// Right edge (exclusive).
    pub fn right(&self) -> i32 {
        clamp_i32(i64::from(self.tl.x) + i64::from(self.w))
    }

    /// Bottom edge (exclusive).
    pub fn bottom(&self) -> i32 {
        clamp_i32(i64::from(self.tl.y) + i64::from(self.h))
    }

    /// Centre point, rounded towards the top-left.
    pub fn center(&self) -> (i32, i32) {
        (
            clamp_i32(i64::from(self.tl.x) + i64::from(self.w / 2)),
            clamp_i32(i64::from(self.tl.y) + i64::from(self.h / 2)),
        )
    }

    /// Does this rectangle contain the point? Right and bottom edges are
    /// exclusive, so a zero-sized rectangle contains nothing.
    pub fn contains_point(&self, p: Point) -> bool {
        p.x >= self.left() && p.x < self.right() && p.y >= self.top() && p.y < self.bottom()
    }

    /// Do the vertical spans of the two rectangles overlap?
    pub fn overlaps_vertical(&self, other: Self) -> bool {
        self.top() < other.bottom() && other.top() < self.bottom()
    }

    /// Do the horizontal spans of the two rectangles overlap?
    pub fn overlaps_horizontal(&self, other: Self) -> bool {
        self.left() < other.right() && other.left() < self.right()
    }

    /// Intersect two rectangles, returning `None` when they do not overlap.
    pub fn intersect(&self, other: &Self) -> Option<Self> {
        let left = self.left().max(other.left());
        let top = self.top().max(other.top());
        let right = self.right().min(other.right());
        let bottom = self.bottom().min(other.bottom());
        if right <= left || bottom <= top {
            return None;
        }
        Some(Self::new(
            left,
            top,
            (i64::from(right) - i64::from(left)) as u32,
            (i64::from(bottom) - i64::from(top)) as u32,
        ))
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    #[test]
    fn contains_point_edges() {
        let r = Rect::new(10, 10, 5, 5);
        assert!(r.contains_point(Point::new(10, 10)));
        assert!(r.contains_point(Point::new(14, 14)));
        assert!(!r.contains_point(Point::new(15, 10)));
        assert!(!r.contains_point(Point::new(10, 15)));
        assert!(!r.contains_point(Point::new(-1, 12)));
        assert!(!Rect::new(0, 0, 0, 10).contains_point(Point::zero()));
    }

    #[test]
    fn negative_origin() {
        let r = Rect::new(-4, -4, 8, 8);
        assert!(r.contains_point(Point::new(-4, -4)));
        assert!(r.contains_point(Point::new(3, 3)));
        assert_eq!(r.center(), (0, 0));
    }

    #[test]
    fn overlaps() {
        let a = Rect::new(0, 0, 10, 10);
        assert!(a.overlaps_vertical(Rect::new(50, 5, 10, 10)));
        assert!(!a.overlaps_vertical(Rect::new(0, 10, 10, 10)));
        assert!(a.overlaps_horizontal(Rect::new(9, 50, 10, 10)));
        assert!(!a.overlaps_horizontal(Rect::new(10, 0, 10, 10)));
    }

    #[test]
    fn intersect() {
        let a = Rect::new(0, 0, 10, 10);
        assert_eq!(
            a.intersect(&Rect::new(5, -5, 10, 10)),
            Some(Rect::new(5, 0, 5, 5))
        );
        assert_eq!(a.intersect(&Rect::new(10, 0, 5, 5)), None);
    }

    proptest! {
        #[test]
        fn intersection_points_lie_in_both(
            ax in -100i32..100, ay in -100i32..100, aw in 0u32..50, ah in 0u32..50,
            bx in -100i32..100, by in -100i32..100, bw in 0u32..50, bh in 0u32..50,
            px in -150i32..150, py in -150i32..150,
        ) {
            let a = Rect::new(ax, ay, aw, ah);
            let b = Rect::new(bx, by, bw, bh);
            let p = Point::new(px, py);
            let in_both = a.contains_point(p) && b.contains_point(p);
            let in_isect = a.intersect(&b).is_some_and(|r| r.contains_point(p));
            prop_assert_eq!(in_both, in_isect);
        }
    }
}
