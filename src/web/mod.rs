// web/ - Browser binding
//
// Owns the DOM side of a session: the canvas surface, the splash overlay,
// the skin table and the requestAnimationFrame loop. All state sits in one
// Rc<RefCell<App>> shared by the frame callback and the event listeners.

mod assets;
mod canvas;
mod events;

use std::cell::RefCell;
use std::rc::Rc;

use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{HtmlCanvasElement, HtmlElement, HtmlImageElement};

use crate::config::Config;
use crate::error::{FlyupError, Result};
use crate::render::Encoder;
use crate::sim::World;
use crate::skin::Skins;
use assets::{Loader, SharedSkins};
use canvas::Surface;

pub struct App {
    world: World,
    surface: Surface,
    encoder: Encoder<HtmlImageElement>,
    skins: SharedSkins,
    loader: Loader,
    splash: HtmlElement,
    splash_shown: Option<bool>,
}

impl App {
    fn pointer_down(&mut self, client: Option<(f64, f64)>, now_ms: f64) {
        let Some(at) = self.surface.metrics().map(client) else { return; };
        self.world.pointer_down(at, now_ms);
        self.sync_splash();
    }

    fn pointer_move(&mut self, client: Option<(f64, f64)>) {
        let Some(at) = self.surface.metrics().map(client) else { return; };
        self.world.pointer_move(at);
    }

    fn pointer_up(&mut self, now_ms: f64) {
        self.world.pointer_up(now_ms);
    }

    fn pointer_cancel(&mut self) {
        self.world.pointer_cancel();
    }

    fn resize(&mut self) -> Result<()> {
        let window = web_sys::window().ok_or(FlyupError::NoWindow)?;
        let (w, h) = self.surface.fit_window(&window)?;
        self.world.resize(w, h);
        log::info!("canvas {w}x{h} @{}x", window.device_pixel_ratio());
        Ok(())
    }

    /// update -> encode -> paint -> start queued loads
    fn frame(&mut self, timestamp_ms: f64) -> Result<()> {
        self.world.frame(timestamp_ms);
        {
            let mut skins = self.skins.borrow_mut();
            let cmds = self.encoder.encode(&mut self.world, &mut skins);
            self.surface.paint(cmds)?;
        }
        self.loader.pump(&self.skins);
        Ok(())
    }

    fn sync_splash(&mut self) {
        let visible = self.world.splash_visible();
        if self.splash_shown == Some(visible) { return; }

        let display = if visible { "flex" } else { "none" };
        match self.splash.style().set_property("display", display) {
            Ok(()) => self.splash_shown = Some(visible),
            Err(err) => log::warn!("splash toggle failed: {}", FlyupError::from(err)),
        }
    }
}

/// Wire up the page and start the loop.
pub fn start(canvas_id: &str, splash_id: &str, mut config: Config) -> Result<()> {
    let window = web_sys::window().ok_or(FlyupError::NoWindow)?;
    let document = window.document().ok_or(FlyupError::NoWindow)?;

    let canvas = document
        .get_element_by_id(canvas_id)
        .and_then(|el| el.dyn_into::<HtmlCanvasElement>().ok())
        .ok_or_else(|| FlyupError::MissingElement(canvas_id.to_string()))?;
    let splash = document
        .get_element_by_id(splash_id)
        .and_then(|el| el.dyn_into::<HtmlElement>().ok())
        .ok_or_else(|| FlyupError::MissingElement(splash_id.to_string()))?;

    if config.seed.is_none() {
        config.seed = Some((js_sys::Math::random() * u32::MAX as f64) as u32);
    }

    let loader = Loader::new(&config.asset_base);
    let app = Rc::new(RefCell::new(App {
        world: World::new(config, 0.0, 0.0),
        surface: Surface::new(canvas)?,
        encoder: Encoder::new(),
        skins: Rc::new(RefCell::new(Skins::new())),
        loader,
        splash,
        splash_shown: None,
    }));

    {
        let mut app = app.borrow_mut();
        app.resize()?;
        app.sync_splash();
    }
    events::attach(&app)?;
    run_loop(app)?;

    log::info!("flyup started on #{canvas_id}");
    Ok(())
}

fn run_loop(app: Rc<RefCell<App>>) -> Result<()> {
    let f: Rc<RefCell<Option<Closure<dyn FnMut(f64)>>>> = Rc::new(RefCell::new(None));
    let g = f.clone();

    *g.borrow_mut() = Some(Closure::wrap(Box::new(move |ts: f64| {
        if let Err(err) = app.borrow_mut().frame(ts) {
            log::warn!("frame failed: {err}");
        }
        if let Some(cb) = f.borrow().as_ref() {
            if let Err(err) = request_frame(cb) {
                log::error!("loop stopped: {err}");
            }
        }
    }) as Box<dyn FnMut(f64)>));

    match g.borrow().as_ref() {
        Some(cb) => request_frame(cb).map(|_| ()),
        None => Ok(()),
    }
}

fn request_frame(cb: &Closure<dyn FnMut(f64)>) -> Result<i32> {
    let window = web_sys::window().ok_or(FlyupError::NoWindow)?;
    Ok(window.request_animation_frame(cb.as_ref().unchecked_ref())?)
}
