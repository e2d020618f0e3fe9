// src/selection.rs
// Pure geometry, no GUI types here so it can be tested headless.

/// 屏幕坐标点（窗口内逻辑坐标）
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const ZERO: Point = Point { x: 0.0, y: 0.0 };

    pub fn new(x: f64, y: f64) -> Self {
        Point { x, y }
    }
}

/// Size of the capture surface, fixed when the overlay is laid out.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub width: f64,
    pub height: f64,
}

impl Bounds {
    pub fn new(width: f64, height: f64) -> Self {
        Bounds { width, height }
    }
}

/// 矩形选区：两个角点，未必已经规范化
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SelectionRect {
    pub begin: Point,
    pub end: Point,
}

impl SelectionRect {
    pub const EMPTY: SelectionRect = SelectionRect {
        begin: Point::ZERO,
        end: Point::ZERO,
    };

    pub fn new(x0: f64, y0: f64, x1: f64, y1: f64) -> Self {
        SelectionRect {
            begin: Point::new(x0, y0),
            end: Point::new(x1, y1),
        }
    }

    /// Both corners on the same point.
    pub fn at(p: Point) -> Self {
        SelectionRect { begin: p, end: p }
    }

    /// Swaps corner components so that `begin <= end` on each axis.
    pub fn normalize(&mut self) {
        if self.begin.x > self.end.x {
            std::mem::swap(&mut self.begin.x, &mut self.end.x);
        }
        if self.begin.y > self.end.y {
            std::mem::swap(&mut self.begin.y, &mut self.end.y);
        }
    }

    pub fn normalized(mut self) -> Self {
        self.normalize();
        self
    }

    pub fn width(&self) -> f64 {
        (self.end.x - self.begin.x).abs()
    }

    pub fn height(&self) -> f64 {
        (self.end.y - self.begin.y).abs()
    }

    pub fn is_empty(&self) -> bool {
        self.width() <= 0.0 || self.height() <= 0.0
    }

    /// Edge-inclusive. Only meaningful on a normalized rectangle.
    pub fn contains(&self, p: Point) -> bool {
        p.x >= self.begin.x && p.x <= self.end.x && p.y >= self.begin.y && p.y <= self.end.y
    }

    pub fn translate(&mut self, dx: f64, dy: f64) {
        self.begin.x += dx;
        self.begin.y += dy;
        self.end.x += dx;
        self.end.y += dy;
    }

    /// Pushes a normalized rectangle back inside `bounds` without changing its size.
    /// A rectangle larger than the bounds ends up pinned to the top/left edge.
    pub fn clamp_within(&mut self, bounds: Bounds) {
        let (w, h) = (self.width(), self.height());

        if self.end.x > bounds.width {
            self.end.x = bounds.width;
            self.begin.x = bounds.width - w;
        }
        if self.begin.x < 0.0 {
            self.begin.x = 0.0;
            self.end.x = w;
        }

        if self.end.y > bounds.height {
            self.end.y = bounds.height;
            self.begin.y = bounds.height - h;
        }
        if self.begin.y < 0.0 {
            self.begin.y = 0.0;
            self.end.y = h;
        }
    }

    /// Intersection with the surface. Unlike `clamp_within` this may shrink the rectangle.
    pub fn intersect(self, bounds: Bounds) -> SelectionRect {
        let r = self.normalized();
        SelectionRect::new(
            r.begin.x.clamp(0.0, bounds.width),
            r.begin.y.clamp(0.0, bounds.height),
            r.end.x.clamp(0.0, bounds.width),
            r.end.y.clamp(0.0, bounds.height),
        )
    }

    /// Integer region to grab, or `None` for a zero-area selection.
    pub fn capture_region(&self, bounds: Bounds) -> Option<CaptureRegion> {
        let r = self.intersect(bounds);
        let x0 = r.begin.x.round();
        let y0 = r.begin.y.round();
        let x1 = r.end.x.round();
        let y1 = r.end.y.round();
        if x1 - x0 < 1.0 || y1 - y0 < 1.0 {
            return None;
        }
        Some(CaptureRegion {
            x: x0 as u32,
            y: y0 as u32,
            width: (x1 - x0) as u32,
            height: (y1 - y0) as u32,
        })
    }

    /// Grows the rectangle by `by` on every side.
    pub fn inflate(self, by: f64) -> SelectionRect {
        let r = self.normalized();
        SelectionRect::new(r.begin.x - by, r.begin.y - by, r.end.x + by, r.end.y + by)
    }

    pub fn union(self, other: SelectionRect) -> SelectionRect {
        let a = self.normalized();
        let b = other.normalized();
        SelectionRect::new(
            a.begin.x.min(b.begin.x),
            a.begin.y.min(b.begin.y),
            a.end.x.max(b.end.x),
            a.end.y.max(b.end.y),
        )
    }
}

/// A region of the screen in whole units, origin top-left.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CaptureRegion {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl CaptureRegion {
    /// Maps a surface region onto an image `scale_x`/`scale_y` times denser and
    /// clips it to `limit` (image width, height).
    pub fn to_pixels(self, scale_x: f64, scale_y: f64, limit: (u32, u32)) -> Option<CaptureRegion> {
        let x0 = ((self.x as f64 * scale_x).round() as u32).min(limit.0);
        let y0 = ((self.y as f64 * scale_y).round() as u32).min(limit.1);
        let x1 = ((f64::from(self.x + self.width) * scale_x).round() as u32).min(limit.0);
        let y1 = ((f64::from(self.y + self.height) * scale_y).round() as u32).min(limit.1);
        if x1 <= x0 || y1 <= y0 {
            return None;
        }
        Some(CaptureRegion {
            x: x0,
            y: y0,
            width: x1 - x0,
            height: y1 - y0,
        })
    }
}

/// 遮罩区域：选区上、下、左、右四条
pub fn mask_bands(bounds: Bounds, selection: SelectionRect) -> [SelectionRect; 4] {
    let r = selection.intersect(bounds);
    [
        SelectionRect::new(0.0, 0.0, bounds.width, r.begin.y),
        SelectionRect::new(0.0, r.end.y, bounds.width, bounds.height),
        SelectionRect::new(0.0, r.begin.y, r.begin.x, r.end.y),
        SelectionRect::new(r.end.x, r.begin.y, bounds.width, r.end.y),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn screen() -> Bounds {
        Bounds::new(1920.0, 1080.0)
    }

    #[test]
    fn normalize_orders_corners_for_every_drag_direction() {
        let corners = [
            (10.0, 10.0, 50.0, 80.0),
            (50.0, 80.0, 10.0, 10.0),
            (50.0, 10.0, 10.0, 80.0),
            (10.0, 80.0, 50.0, 10.0),
        ];
        for (x0, y0, x1, y1) in corners {
            let r = SelectionRect::new(x0, y0, x1, y1).normalized();
            assert!(r.begin.x <= r.end.x);
            assert!(r.begin.y <= r.end.y);
            assert_eq!(r, SelectionRect::new(10.0, 10.0, 50.0, 80.0));
        }
    }

    #[test]
    fn contains_is_edge_inclusive() {
        let r = SelectionRect::new(100.0, 100.0, 300.0, 250.0);
        assert!(r.contains(Point::new(100.0, 100.0)));
        assert!(r.contains(Point::new(300.0, 250.0)));
        assert!(!r.contains(Point::new(99.9, 150.0)));
        assert!(!r.contains(Point::new(150.0, 250.1)));
    }

    #[test]
    fn clamp_pins_left_edge_and_keeps_size() {
        let mut r = SelectionRect::new(-30.0, 200.0, 70.0, 300.0);
        r.clamp_within(screen());
        assert_eq!(r, SelectionRect::new(0.0, 200.0, 100.0, 300.0));
    }

    #[test]
    fn clamp_pins_bottom_right_and_keeps_size() {
        let mut r = SelectionRect::new(1870.0, 1000.0, 1970.0, 1100.0);
        r.clamp_within(screen());
        assert_eq!(r, SelectionRect::new(1820.0, 980.0, 1920.0, 1080.0));
    }

    #[test]
    fn clamp_leaves_inside_rect_alone() {
        let mut r = SelectionRect::new(10.0, 20.0, 30.0, 40.0);
        r.clamp_within(screen());
        assert_eq!(r, SelectionRect::new(10.0, 20.0, 30.0, 40.0));
    }

    #[test]
    fn oversized_rect_pins_to_top_left() {
        let mut r = SelectionRect::new(-10.0, -10.0, 2000.0, 1200.0);
        r.clamp_within(screen());
        assert_eq!(r.begin, Point::ZERO);
        assert_eq!(r.width(), 2010.0);
    }

    #[test]
    fn capture_region_from_reversed_corners() {
        let r = SelectionRect::new(300.0, 250.0, 100.0, 100.0);
        assert_eq!(
            r.capture_region(screen()),
            Some(CaptureRegion { x: 100, y: 100, width: 200, height: 150 })
        );
    }

    #[test]
    fn zero_area_has_no_capture_region() {
        let r = SelectionRect::at(Point::new(5.0, 5.0));
        assert_eq!(r.capture_region(screen()), None);
        let flat = SelectionRect::new(5.0, 5.0, 200.0, 5.0);
        assert_eq!(flat.capture_region(screen()), None);
    }

    #[test]
    fn capture_region_is_clipped_to_bounds() {
        let r = SelectionRect::new(1900.0, -20.0, 2000.0, 50.0);
        assert_eq!(
            r.capture_region(screen()),
            Some(CaptureRegion { x: 1900, y: 0, width: 20, height: 50 })
        );
        let outside = SelectionRect::new(2000.0, 0.0, 2100.0, 50.0);
        assert_eq!(outside.capture_region(screen()), None);
    }

    #[test]
    fn to_pixels_scales_and_clips() {
        let region = CaptureRegion { x: 100, y: 50, width: 200, height: 100 };
        assert_eq!(
            region.to_pixels(2.0, 2.0, (3840, 2160)),
            Some(CaptureRegion { x: 200, y: 100, width: 400, height: 200 })
        );
        assert_eq!(
            region.to_pixels(1.0, 1.0, (250, 120)),
            Some(CaptureRegion { x: 100, y: 50, width: 150, height: 70 })
        );
        assert_eq!(region.to_pixels(1.0, 1.0, (80, 40)), None);
    }

    #[test]
    fn mask_bands_surround_the_selection() {
        let bounds = Bounds::new(100.0, 100.0);
        let [top, bottom, left, right] = mask_bands(bounds, SelectionRect::new(60.0, 70.0, 20.0, 10.0));
        assert_eq!(top, SelectionRect::new(0.0, 0.0, 100.0, 10.0));
        assert_eq!(bottom, SelectionRect::new(0.0, 70.0, 100.0, 100.0));
        assert_eq!(left, SelectionRect::new(0.0, 10.0, 20.0, 70.0));
        assert_eq!(right, SelectionRect::new(60.0, 10.0, 100.0, 70.0));
    }

    #[test]
    fn union_and_inflate_cover_both() {
        let a = SelectionRect::new(10.0, 10.0, 20.0, 20.0);
        let b = SelectionRect::new(40.0, 5.0, 30.0, 15.0);
        assert_eq!(a.union(b).inflate(2.0), SelectionRect::new(8.0, 3.0, 42.0, 22.0));
    }
}
