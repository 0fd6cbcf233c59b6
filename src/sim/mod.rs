// sim/ - Paper airplane session
//
// World owns everything a session needs: the plane store, drag state,
// tap history, splash flag, tint and RNG. Pointer events mutate it
// directly; the frame loop calls frame() then hands it to the encoder.

mod drag;
mod plane;

pub use drag::{Drag, fling_velocity};
pub use plane::{Fall, Flight, Fold, FoldKind, Plane};

use std::f64::consts::TAU;

use crate::color::Rgb;
use crate::config::{Config, Mode};
use crate::input::{Point, TapTracker};

const DEFAULT_SEED: u32 = 0xDEADBEEF;

/// xorshift32
#[derive(Clone, Debug)]
pub struct Rng(u32);

impl Rng {
    pub fn new(seed: u32) -> Self {
        // xorshift is stuck at zero
        Self(if seed == 0 { DEFAULT_SEED } else { seed })
    }

    /// Uniform in [0, 1)
    #[inline(always)]
    pub fn rand(&mut self) -> f64 {
        self.0 ^= self.0 << 13;
        self.0 ^= self.0 >> 17;
        self.0 ^= self.0 << 5;
        (self.0 >> 8) as f64 * (1.0 / 16777216.0)
    }

    pub fn byte(&mut self) -> u8 {
        (self.rand() * 256.0) as u8
    }

    pub fn angle(&mut self) -> f64 {
        self.rand() * TAU
    }
}

/// What a pointer-down did
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PointerDown {
    Created(usize),
    Launched(usize),
    Grabbed(usize),
    Reset,
}

pub struct World {
    config: Config,
    width: f64,
    height: f64,

    planes: Vec<Plane>,
    drag: Option<Drag>,
    taps: TapTracker,

    splash: bool,
    color: Rgb,
    rng: Rng,
    last_frame_ms: Option<f64>,
    // Bumped on every reset
    session: u32,
}

impl World {
    pub fn new(config: Config, width: f64, height: f64) -> Self {
        let mut rng = Rng::new(config.seed.unwrap_or(DEFAULT_SEED));
        let color = Rgb::random(&mut rng);
        Self {
            taps: TapTracker::new(config.double_tap_ms),
            config,
            width,
            height,
            planes: Vec::new(),
            drag: None,
            splash: true,
            color,
            rng,
            last_frame_ms: None,
            session: 0,
        }
    }

    pub fn config(&self) -> &Config { &self.config }
    pub fn planes(&self) -> &[Plane] { &self.planes }
    pub fn planes_mut(&mut self) -> &mut [Plane] { &mut self.planes }
    pub fn size(&self) -> (f64, f64) { (self.width, self.height) }
    pub fn splash_visible(&self) -> bool { self.splash }
    pub fn dragging(&self) -> Option<usize> { self.drag.map(|d| d.index) }
    pub fn session(&self) -> u32 { self.session }

    pub fn resize(&mut self, width: f64, height: f64) {
        self.width = width;
        self.height = height;
    }

    /// Back to the splash: no planes, no drag, fresh tint, timing restarted.
    pub fn reset(&mut self) {
        self.planes.clear();
        self.drag = None;
        self.taps.clear();
        self.splash = true;
        self.color = Rgb::random(&mut self.rng);
        self.last_frame_ms = None;
        self.session = self.session.wrapping_add(1);
        log::info!("session reset");
    }

    pub fn pointer_down(&mut self, at: Point, now_ms: f64) -> PointerDown {
        if self.taps.tap(now_ms, at) {
            self.reset();
            return PointerDown::Reset;
        }
        self.splash = false;

        // Topmost (last drawn) plane wins
        if let Some(i) = self.planes.iter().rposition(|p| p.contains(at)) {
            let angle = self.rng.angle();
            let plane = &mut self.planes[i];
            let launched = plane.launch(angle, &self.config);
            self.drag = Some(Drag::grab(i, plane, at, now_ms));
            if launched {
                log::debug!("plane {i} launched");
                return PointerDown::Launched(i);
            }
            return PointerDown::Grabbed(i);
        }

        if self.config.mode == Mode::Single {
            self.planes.clear();
        } else {
            self.color = Rgb::random(&mut self.rng);
        }
        self.planes.push(Plane::spawn(at, self.config.plane_size, self.color));
        self.drag = None;
        PointerDown::Created(self.planes.len() - 1)
    }

    pub fn pointer_move(&mut self, at: Point) {
        let Some(drag) = self.drag.as_mut() else { return; };
        let Some(plane) = self.planes.get_mut(drag.index) else { return; };
        let to = drag.follow(at);
        plane.x = to.x;
        plane.y = to.y;
    }

    /// End a drag. Returns the fling velocity applied, if the plane moved.
    pub fn pointer_up(&mut self, now_ms: f64) -> Option<(f64, f64)> {
        let drag = self.drag.take()?;
        if !drag.moved() { return None; }

        let plane = self.planes.get_mut(drag.index)?;
        let (vx, vy) = drag.release(Point::new(plane.x, plane.y), now_ms, self.config.max_fling_speed);
        plane.fling(vx, vy);
        log::debug!("plane {} flung at ({vx:.0}, {vy:.0})", drag.index);
        Some((vx, vy))
    }

    /// Drop the drag where it is, no fling.
    pub fn pointer_cancel(&mut self) {
        let Some(drag) = self.drag.take() else { return; };
        if let Some(plane) = self.planes.get_mut(drag.index) {
            plane.reanchor();
        }
    }

    /// Advance from an animation-frame timestamp (ms).
    pub fn frame(&mut self, timestamp_ms: f64) {
        let dt = match self.last_frame_ms {
            Some(last) => ((timestamp_ms - last) / 1000.0).max(0.0).min(self.config.max_frame_dt),
            None => 0.0,
        };
        self.last_frame_ms = Some(timestamp_ms);
        self.tick(dt);
    }

    pub fn tick(&mut self, dt: f64) {
        let bounds = (self.width, self.height);
        let held = self.dragging();

        for i in 0..self.planes.len() {
            if held == Some(i) { continue; }

            let (earlier, rest) = self.planes.split_at_mut(i);
            let plane = &mut rest[0];
            match plane.kind() {
                FoldKind::Blank => {}
                FoldKind::Paper => {
                    if plane.fly(dt, &self.config, bounds) {
                        plane.crumple(self.config.keeps_momentum());
                        plane.settle(bounds);
                        log::debug!("plane {i} crumpled");
                    }
                }
                FoldKind::Crumpled => plane.fall(dt, &self.config, bounds, earlier),
            }
        }
    }
}
