// render.rs - Encode world state into a draw list
//
// One Clear, then one Sprite per plane in store order. The backend
// (canvas 2d in the browser, a raster in the replay tool) paints it.
//
// Image choice per plane:
//   1. skin for its current fold, if ready (remembered as shown)
//   2. skin for the last fold it was shown with (stale)
//   3. none: backend draws a placeholder in the plane's color

use crate::color::Rgb;
use crate::sim::{FoldKind, World};
use crate::skin::{SkinKey, Skins};

#[derive(Clone, Debug, PartialEq)]
pub struct Sprite<H> {
    pub image: Option<H>,
    pub kind: FoldKind,
    pub color: Rgb,
    // Center
    pub x: f64,
    pub y: f64,
    pub w: f64,
    pub h: f64,
    pub rotation: f64,
}

#[derive(Clone, Debug, PartialEq)]
pub enum DrawCmd<H> {
    Clear { width: f64, height: f64 },
    Sprite(Sprite<H>),
}

pub struct Encoder<H> {
    cmds: Vec<DrawCmd<H>>,
    // World session the skin table was built for
    session: Option<u32>,
}

impl<H: Clone> Default for Encoder<H> {
    fn default() -> Self {
        Self { cmds: Vec::new(), session: None }
    }
}

impl<H: Clone> Encoder<H> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn commands(&self) -> &[DrawCmd<H>] {
        &self.cmds
    }

    /// Rebuild the draw list. Registers a load for any skin not seen yet.
    /// After a reset the previous session's skins are dropped.
    pub fn encode(&mut self, world: &mut World, skins: &mut Skins<H>) -> &[DrawCmd<H>] {
        self.cmds.clear();

        if self.session != Some(world.session()) {
            if self.session.is_some() && !skins.is_empty() {
                log::debug!("dropping {} skins from the last session", skins.len());
                skins.clear();
            }
            self.session = Some(world.session());
        }

        let (width, height) = world.size();
        self.cmds.push(DrawCmd::Clear { width, height });

        let tinted = world.config().tinted();
        let rotates = world.config().rotates();

        for plane in world.planes_mut() {
            let tint = tinted.then_some(plane.color);
            let key = SkinKey::new(plane.kind(), tint);
            skins.request(key);

            let image = match skins.ready(key) {
                Some(img) => {
                    plane.shown = Some(key.kind);
                    Some(img.clone())
                }
                None => plane
                    .shown
                    .and_then(|kind| skins.ready(SkinKey::new(kind, tint)))
                    .cloned(),
            };

            let c = plane.center();
            self.cmds.push(DrawCmd::Sprite(Sprite {
                image,
                kind: key.kind,
                color: plane.color,
                x: c.x,
                y: c.y,
                w: plane.w,
                h: plane.h,
                rotation: if rotates { plane.rotation } else { 0.0 },
            }));
        }

        &self.cmds
    }
}
