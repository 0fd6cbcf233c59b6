// input.rs - Pointer mapping and tap tracking
//
// Client (CSS pixel, viewport-relative) coordinates in, canvas logical
// coordinates out. Events that carry no usable coordinates map to None
// and are dropped by the caller.

/// Taps further apart than this never count as a double tap
const DOUBLE_TAP_SLOP: f64 = 30.0;

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn dist(self, o: Point) -> f64 {
        (self.x - o.x).hypot(self.y - o.y)
    }
}

/// Snapshot of the canvas geometry taken when an event arrives.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CanvasMetrics {
    // Bounding client rect
    pub left: f64,
    pub top: f64,
    pub css_width: f64,
    pub css_height: f64,

    // Backing store
    pub backing_width: f64,
    pub backing_height: f64,

    pub dpr: f64,
}

impl CanvasMetrics {
    pub fn map(&self, client: Option<(f64, f64)>) -> Option<Point> {
        let (cx, cy) = client?;
        if !cx.is_finite() || !cy.is_finite() { return None; }
        if self.css_width <= 0.0 || self.css_height <= 0.0 || self.dpr <= 0.0 { return None; }

        let sx = self.backing_width / self.css_width;
        let sy = self.backing_height / self.css_height;
        Some(Point {
            x: (cx - self.left) * sx / self.dpr,
            y: (cy - self.top) * sy / self.dpr,
        })
    }
}

/// Detects double taps from successive pointer-down events.
#[derive(Clone, Debug)]
pub struct TapTracker {
    window_ms: f64,
    last: Option<(f64, Point)>,
}

impl TapTracker {
    pub fn new(window_ms: f64) -> Self {
        Self { window_ms, last: None }
    }

    /// Record a tap; true when it completes a double tap.
    /// A completed double tap clears the history so a third tap starts over.
    pub fn tap(&mut self, now_ms: f64, at: Point) -> bool {
        if let Some((t, p)) = self.last {
            let dt = now_ms - t;
            if (0.0..=self.window_ms).contains(&dt) && p.dist(at) <= DOUBLE_TAP_SLOP {
                self.last = None;
                return true;
            }
        }
        self.last = Some((now_ms, at));
        false
    }

    pub fn clear(&mut self) {
        self.last = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn metrics() -> CanvasMetrics {
        CanvasMetrics {
            left: 10.0,
            top: 20.0,
            css_width: 400.0,
            css_height: 300.0,
            backing_width: 800.0,
            backing_height: 600.0,
            dpr: 2.0,
        }
    }

    #[test]
    fn maps_with_offset_and_dpr() {
        let p = metrics().map(Some((110.0, 70.0))).unwrap();
        assert_eq!(p, Point::new(100.0, 50.0));
    }

    #[test]
    fn stretched_canvas_scales() {
        // CSS box squashed to half width: backing/css ratio is 4, dpr 2
        let m = CanvasMetrics { css_width: 200.0, ..metrics() };
        let p = m.map(Some((60.0, 20.0))).unwrap();
        assert_eq!(p, Point::new(100.0, 0.0));
    }

    #[test]
    fn missing_or_bad_coords() {
        assert_eq!(metrics().map(None), None);
        assert_eq!(metrics().map(Some((f64::NAN, 1.0))), None);
        let empty = CanvasMetrics { css_width: 0.0, ..metrics() };
        assert_eq!(empty.map(Some((1.0, 1.0))), None);
    }

    #[test]
    fn double_tap_window() {
        let mut t = TapTracker::new(300.0);
        let p = Point::new(50.0, 50.0);
        assert!(!t.tap(0.0, p));
        assert!(t.tap(250.0, p));
        // history cleared after a double
        assert!(!t.tap(400.0, p));
        assert!(!t.tap(800.0, p));
    }

    #[test]
    fn far_taps_are_not_double() {
        let mut t = TapTracker::new(300.0);
        assert!(!t.tap(0.0, Point::new(0.0, 0.0)));
        assert!(!t.tap(100.0, Point::new(200.0, 0.0)));
        assert!(t.tap(200.0, Point::new(210.0, 5.0)));
    }
}
