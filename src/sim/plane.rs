// plane.rs - Paper airplane sprite
//
// Folding lifecycle is a tagged enum: each state carries only the motion
// data it needs. Blank -> Paper -> Crumpled, Paper may relaunch.
//
// Position (x, y) is the top-left corner in canvas logical pixels.

use crate::color::Rgb;
use crate::config::Config;
use crate::input::Point;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FoldKind {
    Blank,
    Paper,
    Crumpled,
}

impl FoldKind {
    pub fn file_name(self) -> &'static str {
        match self {
            FoldKind::Blank => "1blank.svg",
            FoldKind::Paper => "2paper.svg",
            FoldKind::Crumpled => "3crump.svg",
        }
    }
}

/// Looping flight: translation plus an expanding orbit around a moving center
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Flight {
    pub vx: f64,
    pub vy: f64,
    pub center_x: f64,
    pub center_y: f64,
    pub angle: f64,
    pub radius: f64,
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Fall {
    pub vx: f64,
    pub vy: f64,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Fold {
    Blank,
    Paper(Flight),
    Crumpled(Fall),
}

impl Fold {
    pub fn kind(&self) -> FoldKind {
        match self {
            Fold::Blank => FoldKind::Blank,
            Fold::Paper(_) => FoldKind::Paper,
            Fold::Crumpled(_) => FoldKind::Crumpled,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Plane {
    pub x: f64,
    pub y: f64,
    pub w: f64,
    pub h: f64,
    pub fold: Fold,
    pub color: Rgb,
    pub rotation: f64,
    /// Last fold whose image was actually drawn
    pub shown: Option<FoldKind>,
}

impl Plane {
    /// New blank plane centered on the tap
    pub fn spawn(at: Point, size: f64, color: Rgb) -> Self {
        Self {
            x: at.x - size / 2.0,
            y: at.y - size / 2.0,
            w: size,
            h: size,
            fold: Fold::Blank,
            color,
            rotation: 0.0,
            shown: None,
        }
    }

    pub fn kind(&self) -> FoldKind {
        self.fold.kind()
    }

    pub fn center(&self) -> Point {
        Point::new(self.x + self.w / 2.0, self.y + self.h / 2.0)
    }

    /// Hit test, edges inclusive
    pub fn contains(&self, p: Point) -> bool {
        p.x >= self.x && p.x <= self.x + self.w && p.y >= self.y && p.y <= self.y + self.h
    }

    /// Strict AABB overlap
    pub fn overlaps(&self, o: &Plane) -> bool {
        self.x < o.x + o.w && self.x + self.w > o.x && self.y < o.y + o.h && self.y + self.h > o.y
    }

    pub fn velocity(&self) -> (f64, f64) {
        match self.fold {
            Fold::Blank => (0.0, 0.0),
            Fold::Paper(f) => (f.vx, f.vy),
            Fold::Crumpled(f) => (f.vx, f.vy),
        }
    }

    /// Start (or restart) looping flight heading along `angle`.
    /// Crumpled planes stay crumpled.
    pub fn launch(&mut self, angle: f64, cfg: &Config) -> bool {
        if matches!(self.fold, Fold::Crumpled(_)) { return false; }

        self.fold = Fold::Paper(Flight {
            vx: angle.cos() * cfg.plane_speed,
            vy: angle.sin() * cfg.plane_speed,
            center_x: self.x,
            center_y: self.y,
            angle: 0.0,
            radius: cfg.loop_radius,
        });
        true
    }

    /// Advance along the loop. Returns true once the plane touches or
    /// crosses a canvas edge.
    pub fn fly(&mut self, dt: f64, cfg: &Config, (width, height): (f64, f64)) -> bool {
        let Fold::Paper(mut f) = self.fold else { return false; };

        f.angle += cfg.loop_speed;
        let (sin, cos) = f.angle.sin_cos();

        self.x = f.center_x + cos * f.radius + f.vx * dt;
        self.y = f.center_y + sin * f.radius + f.vy * dt;

        f.radius += cfg.expansion_rate;
        f.center_x += f.vx * dt;
        f.center_y += f.vy * dt;

        // Heading = translation + orbital tangent
        self.rotation = (f.vy + cos * cfg.loop_speed * f.radius)
            .atan2(f.vx - sin * cfg.loop_speed * f.radius);

        self.fold = Fold::Paper(f);

        self.x <= 0.0 || self.x + self.w >= width || self.y <= 0.0 || self.y + self.h >= height
    }

    /// Paper -> Crumpled. No-op for other states.
    pub fn crumple(&mut self, keep_momentum: bool) -> bool {
        let Fold::Paper(f) = self.fold else { return false; };

        self.fold = Fold::Crumpled(if keep_momentum {
            Fall { vx: f.vx, vy: f.vy }
        } else {
            Fall::default()
        });
        true
    }

    /// Pull the plane back inside the canvas.
    pub fn settle(&mut self, (width, height): (f64, f64)) {
        self.x = self.x.clamp(0.0, (width - self.w).max(0.0));
        self.y = self.y.clamp(0.0, (height - self.h).max(0.0));
    }

    /// Gravity, walls, stacking on earlier crumpled planes, floor.
    ///
    /// Landing is swept: a support is hit if its top lies between this
    /// plane's top before the step and its bottom after it, so a fast
    /// fall cannot skip through a pile.
    pub fn fall(&mut self, dt: f64, cfg: &Config, (width, height): (f64, f64), earlier: &[Plane]) {
        let Fold::Crumpled(mut f) = self.fold else { return; };
        let top = self.y;

        f.vy += cfg.gravity;
        self.x += f.vx * dt;
        self.y += f.vy * dt;

        // Walls
        if self.x < 0.0 {
            self.x = 0.0;
            f.vx = 0.0;
        } else if self.x + self.w > width {
            self.x = (width - self.w).max(0.0);
            f.vx = 0.0;
        }

        // Ceiling
        if self.y < 0.0 {
            self.y = 0.0;
            f.vy = f.vy.max(0.0);
        }

        // Land on the highest crumpled plane crossed on the way down
        if f.vy >= 0.0 {
            let bottom = self.y + self.h;
            let support = earlier
                .iter()
                .filter(|o| matches!(o.fold, Fold::Crumpled(_)))
                .filter(|o| self.x < o.x + o.w && self.x + self.w > o.x)
                .filter(|o| o.y > top && o.y < bottom)
                .map(|o| o.y)
                .reduce(f64::min);
            if let Some(support_y) = support {
                self.y = support_y - self.h;
                f.vx = 0.0;
                f.vy = 0.0;
            }
        }

        // Floor
        if self.y + self.h > height {
            self.y = height - self.h;
            f.vx = 0.0;
            f.vy = 0.0;
        }

        self.fold = Fold::Crumpled(f);
    }

    /// Apply a release velocity from a drag.
    pub fn fling(&mut self, vx: f64, vy: f64) {
        match &mut self.fold {
            Fold::Blank => {}
            Fold::Paper(f) => {
                f.vx = vx;
                f.vy = vy;
            }
            Fold::Crumpled(f) => {
                f.vx = vx;
                f.vy = vy;
            }
        }
        self.reanchor();
    }

    /// Move the loop center so flight continues from where the plane is
    /// now instead of snapping back. Only Paper planes have a loop.
    pub fn reanchor(&mut self) {
        if let Fold::Paper(f) = &mut self.fold {
            f.center_x = self.x - f.angle.cos() * f.radius;
            f.center_y = self.y - f.angle.sin() * f.radius;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BOUNDS: (f64, f64) = (800.0, 600.0);

    fn plane_at(x: f64, y: f64) -> Plane {
        Plane::spawn(Point::new(x, y), 50.0, Rgb::GREY)
    }

    fn crumpled_at(x: f64, y: f64) -> Plane {
        let mut p = plane_at(x, y);
        p.fold = Fold::Crumpled(Fall::default());
        p
    }

    #[test]
    fn spawn_is_centered_and_still() {
        let p = plane_at(100.0, 200.0);
        assert_eq!((p.x, p.y), (75.0, 175.0));
        assert_eq!(p.center(), Point::new(100.0, 200.0));
        assert_eq!(p.kind(), FoldKind::Blank);
        assert_eq!(p.velocity(), (0.0, 0.0));
    }

    #[test]
    fn hit_test_edges() {
        let p = plane_at(100.0, 100.0);
        assert!(p.contains(Point::new(75.0, 75.0)));
        assert!(p.contains(Point::new(125.0, 125.0)));
        assert!(!p.contains(Point::new(126.0, 100.0)));
    }

    #[test]
    fn launch_sets_flight_from_position() {
        let cfg = Config::default();
        let mut p = plane_at(400.0, 300.0);
        assert!(p.launch(0.0, &cfg));

        let Fold::Paper(f) = p.fold else { panic!("not flying") };
        assert_eq!((f.vx, f.vy), (cfg.plane_speed, 0.0));
        assert_eq!((f.center_x, f.center_y), (p.x, p.y));
        assert_eq!(f.radius, cfg.loop_radius);
        assert_eq!(f.angle, 0.0);
    }

    #[test]
    fn crumpled_cannot_launch() {
        let mut p = crumpled_at(400.0, 300.0);
        assert!(!p.launch(1.0, &Config::default()));
        assert_eq!(p.kind(), FoldKind::Crumpled);
    }

    #[test]
    fn flight_spirals_outward() {
        let cfg = Config::default();
        let mut p = plane_at(400.0, 300.0);
        p.launch(0.0, &cfg);

        let mut last = 0.0;
        for _ in 0..20 {
            assert!(!p.fly(1.0 / 60.0, &cfg, BOUNDS));
            let Fold::Paper(f) = p.fold else { unreachable!() };
            assert!(f.radius > last);
            last = f.radius;
        }
        assert_eq!(last, cfg.loop_radius + 20.0 * cfg.expansion_rate);
    }

    #[test]
    fn flight_reports_edge() {
        let cfg = Config::default();
        let mut p = plane_at(770.0, 300.0);
        p.launch(0.0, &cfg);
        // First loop step pushes the plane radius-far to the right
        assert!(p.fly(1.0 / 60.0, &cfg, BOUNDS));
    }

    #[test]
    fn crumple_momentum() {
        let cfg = Config::default();
        let mut keep = plane_at(400.0, 300.0);
        keep.launch(0.0, &cfg);
        let mut still = keep.clone();

        assert!(keep.crumple(true));
        assert_eq!(keep.velocity(), (cfg.plane_speed, 0.0));
        assert!(still.crumple(false));
        assert_eq!(still.velocity(), (0.0, 0.0));

        // only from Paper
        assert!(!keep.crumple(true));
    }

    #[test]
    fn falls_to_floor() {
        let cfg = Config::default();
        let mut p = crumpled_at(400.0, 100.0);
        for _ in 0..600 {
            p.fall(1.0 / 60.0, &cfg, BOUNDS, &[]);
            assert!(p.y <= BOUNDS.1 - p.h);
        }
        assert_eq!(p.y, BOUNDS.1 - p.h);
        assert_eq!(p.velocity(), (0.0, 0.0));
    }

    #[test]
    fn stacks_on_crumpled() {
        let cfg = Config::default();
        let below = crumpled_at(400.0, 575.0);
        let mut p = crumpled_at(410.0, 400.0);
        for _ in 0..600 {
            p.fall(1.0 / 60.0, &cfg, BOUNDS, std::slice::from_ref(&below));
        }
        assert_eq!(p.y, below.y - p.h);
    }

    #[test]
    fn fast_fall_lands_on_pile() {
        let cfg = Config::default();
        let below = crumpled_at(400.0, 575.0);
        let mut p = crumpled_at(405.0, 300.0);
        // ~167px per step, more than the two heights combined
        p.fling(0.0, 10_000.0);
        for _ in 0..10 {
            p.fall(1.0 / 60.0, &cfg, BOUNDS, std::slice::from_ref(&below));
        }
        assert_eq!(p.y, below.y - p.h);
        assert!(!p.overlaps(&below));
    }

    #[test]
    fn lands_on_highest_support() {
        let cfg = Config::default();
        let floor = crumpled_at(400.0, 575.0);
        let stacked = crumpled_at(400.0, 525.0);
        let pile = [floor, stacked];

        let mut p = crumpled_at(400.0, 300.0);
        p.fling(0.0, 10_000.0);
        for _ in 0..10 {
            p.fall(1.0 / 60.0, &cfg, BOUNDS, &pile);
        }
        assert_eq!(p.y, pile[1].y - p.h);
    }

    #[test]
    fn ignores_blank_below() {
        let cfg = Config::default();
        let blank = plane_at(400.0, 575.0);
        let mut p = crumpled_at(400.0, 400.0);
        for _ in 0..600 {
            p.fall(1.0 / 60.0, &cfg, BOUNDS, std::slice::from_ref(&blank));
        }
        assert_eq!(p.y, BOUNDS.1 - p.h);
    }

    #[test]
    fn walls_clamp_sideways_fall() {
        let cfg = Config::default();
        let mut p = crumpled_at(400.0, 100.0);
        p.fling(-100_000.0, 0.0);
        p.fall(1.0 / 60.0, &cfg, BOUNDS, &[]);
        assert_eq!(p.x, 0.0);
        assert_eq!(p.velocity().0, 0.0);
    }

    #[test]
    fn settle_pulls_inside() {
        let mut p = plane_at(790.0, -10.0);
        p.settle(BOUNDS);
        assert_eq!((p.x, p.y), (750.0, 0.0));
    }

    #[test]
    fn fling_reanchors_loop() {
        let cfg = Config::default();
        let mut p = plane_at(400.0, 300.0);
        p.launch(0.0, &cfg);
        p.fly(1.0 / 60.0, &cfg, BOUNDS);
        p.x = 200.0;
        p.y = 150.0;
        p.fling(30.0, -40.0);

        let Fold::Paper(f) = p.fold else { unreachable!() };
        assert_eq!((f.vx, f.vy), (30.0, -40.0));
        let lx = f.center_x + f.angle.cos() * f.radius;
        let ly = f.center_y + f.angle.sin() * f.radius;
        assert!((lx - 200.0).abs() < 1e-9 && (ly - 150.0).abs() < 1e-9);
    }

    #[test]
    fn reanchor_keeps_velocity() {
        let cfg = Config::default();
        let mut p = plane_at(400.0, 300.0);
        p.launch(1.0, &cfg);
        let v = p.velocity();
        p.x = 600.0;
        p.reanchor();
        assert_eq!(p.velocity(), v);

        p.fly(1.0 / 60.0, &cfg, BOUNDS);
        assert!((p.x - 600.0).abs() < 1.0, "snapped back to x = {}", p.x);
    }

    #[test]
    fn fling_ignored_when_blank() {
        let mut p = plane_at(400.0, 300.0);
        p.fling(10.0, 10.0);
        assert_eq!(p.fold, Fold::Blank);
    }
}
