// drag.rs - Pointer drag and release fling

use super::Plane;
use crate::input::Point;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Drag {
    pub index: usize,
    // Pointer position minus plane position at grab time
    offset: Point,
    // Plane position at grab time
    start: Point,
    start_ms: f64,
    moved: bool,
}

impl Drag {
    pub fn grab(index: usize, plane: &Plane, at: Point, now_ms: f64) -> Self {
        Self {
            index,
            offset: Point::new(at.x - plane.x, at.y - plane.y),
            start: Point::new(plane.x, plane.y),
            start_ms: now_ms,
            moved: false,
        }
    }

    /// Where the dragged plane's corner goes for a pointer at `at`
    pub fn follow(&mut self, at: Point) -> Point {
        self.moved = true;
        Point::new(at.x - self.offset.x, at.y - self.offset.y)
    }

    pub fn moved(&self) -> bool {
        self.moved
    }

    /// Release velocity for a plane now at `pos`
    pub fn release(&self, pos: Point, now_ms: f64, max_speed: f64) -> (f64, f64) {
        let dt = (now_ms - self.start_ms) / 1000.0;
        fling_velocity(pos.x - self.start.x, pos.y - self.start.y, dt, max_speed)
    }
}

/// Displacement over time, scaled down to `max_speed` when faster.
/// Zero displacement or a non-positive interval yields zero.
pub fn fling_velocity(dx: f64, dy: f64, dt: f64, max_speed: f64) -> (f64, f64) {
    if dt <= 0.0 || !dt.is_finite() { return (0.0, 0.0); }

    let (vx, vy) = (dx / dt, dy / dt);
    let speed = vx.hypot(vy);
    if speed > max_speed && speed > 0.0 {
        let k = max_speed / speed;
        (vx * k, vy * k)
    } else {
        (vx, vy)
    }
}
