// assets.rs - Async skin loading
//
// Each queued skin becomes a spawned future: fetch the fold's SVG (once,
// then cached as text), tint it, wrap it in a data URI, decode it into an
// image element and resolve the slot. Nothing here blocks the frame loop.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use wasm_bindgen::JsCast;
use wasm_bindgen_futures::{JsFuture, spawn_local};
use web_sys::{HtmlImageElement, Response};

use crate::error::{FlyupError, Result};
use crate::sim::FoldKind;
use crate::skin::{SVG_DATA_URI, SkinKey, Skins, asset_path, tint_svg};

pub type SharedSkins = Rc<RefCell<Skins<HtmlImageElement>>>;

#[derive(Clone)]
pub struct Loader {
    base: Rc<str>,
    svgs: Rc<RefCell<HashMap<FoldKind, Rc<str>>>>,
}

impl Loader {
    pub fn new(base: &str) -> Self {
        Self { base: base.into(), svgs: Rc::default() }
    }

    /// Start every load the encoder queued since the last call.
    pub fn pump(&self, skins: &SharedSkins) {
        let keys = skins.borrow_mut().take_requests();
        for key in keys {
            let loader = self.clone();
            let skins = skins.clone();
            spawn_local(async move {
                let image = match loader.load(key).await {
                    Ok(img) => Some(img),
                    Err(err) => {
                        log::warn!("skin {:?} unavailable: {err}", key.kind);
                        None
                    }
                };
                skins.borrow_mut().finish(key, image);
            });
        }
    }

    async fn load(&self, key: SkinKey) -> Result<HtmlImageElement> {
        let path = asset_path(&self.base, key.kind);
        let src = match key.tint {
            None => path.clone(),
            Some(color) => {
                let svg = self.svg(key.kind, &path).await?;
                let tinted = tint_svg(&svg, color);
                let window = web_sys::window().ok_or(FlyupError::NoWindow)?;
                format!("{SVG_DATA_URI}{}", window.btoa(&tinted)?)
            }
        };
        decode(&src).await.map_err(|e| FlyupError::Asset { path, reason: e.to_string() })
    }

    async fn svg(&self, kind: FoldKind, path: &str) -> Result<Rc<str>> {
        if let Some(svg) = self.svgs.borrow().get(&kind) {
            return Ok(svg.clone());
        }
        let text: Rc<str> = fetch_text(path).await?.into();
        self.svgs.borrow_mut().insert(kind, text.clone());
        Ok(text)
    }
}

async fn fetch_text(path: &str) -> Result<String> {
    let window = web_sys::window().ok_or(FlyupError::NoWindow)?;
    let resp: Response = JsFuture::from(window.fetch_with_str(path)).await?.dyn_into()?;
    if !resp.ok() {
        return Err(FlyupError::Asset { path: path.to_string(), reason: format!("HTTP {}", resp.status()) });
    }
    let text = JsFuture::from(resp.text()?).await?;
    text.as_string()
        .ok_or_else(|| FlyupError::Asset { path: path.to_string(), reason: "body is not text".into() })
}

async fn decode(src: &str) -> Result<HtmlImageElement> {
    let img = HtmlImageElement::new()?;
    img.set_src(src);
    JsFuture::from(img.decode()).await?;
    Ok(img)
}
