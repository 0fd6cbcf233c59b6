// canvas.rs - Canvas 2d surface
//
// Backing store is CSS size x devicePixelRatio; the context transform is
// reset to scale(dpr) on every resize so drawing stays in logical pixels.

use wasm_bindgen::JsCast;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, HtmlImageElement, Window};

use crate::error::{FlyupError, Result};
use crate::input::CanvasMetrics;
use crate::render::{DrawCmd, Sprite};
use crate::sim::FoldKind;

const PLACEHOLDER_ALPHA: f64 = 0.5;

pub struct Surface {
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
    dpr: f64,
}

impl Surface {
    pub fn new(canvas: HtmlCanvasElement) -> Result<Self> {
        let ctx = canvas
            .get_context("2d")?
            .ok_or(FlyupError::NoContext)?
            .dyn_into::<CanvasRenderingContext2d>()
            .map_err(|_| FlyupError::NoContext)?;
        Ok(Self { canvas, ctx, dpr: 1.0 })
    }

    pub fn canvas(&self) -> &HtmlCanvasElement {
        &self.canvas
    }

    /// Match the window. Returns the logical size.
    pub fn fit_window(&mut self, window: &Window) -> Result<(f64, f64)> {
        let w = window.inner_width()?.as_f64().unwrap_or(0.0);
        let h = window.inner_height()?.as_f64().unwrap_or(0.0);
        let dpr = window.device_pixel_ratio();
        self.dpr = if dpr > 0.0 { dpr } else { 1.0 };

        self.canvas.set_width((w * self.dpr) as u32);
        self.canvas.set_height((h * self.dpr) as u32);
        let style = self.canvas.style();
        style.set_property("width", &format!("{w}px"))?;
        style.set_property("height", &format!("{h}px"))?;

        // Setting width/height already reset the transform; set, don't scale
        self.ctx.set_transform(self.dpr, 0.0, 0.0, self.dpr, 0.0, 0.0)?;
        Ok((w, h))
    }

    pub fn metrics(&self) -> CanvasMetrics {
        let rect = self.canvas.get_bounding_client_rect();
        CanvasMetrics {
            left: rect.left(),
            top: rect.top(),
            css_width: rect.width(),
            css_height: rect.height(),
            backing_width: self.canvas.width() as f64,
            backing_height: self.canvas.height() as f64,
            dpr: self.dpr,
        }
    }

    pub fn paint(&self, cmds: &[DrawCmd<HtmlImageElement>]) -> Result<()> {
        for cmd in cmds {
            match cmd {
                DrawCmd::Clear { width, height } => self.ctx.clear_rect(0.0, 0.0, *width, *height),
                DrawCmd::Sprite(s) => self.sprite(s)?,
            }
        }
        Ok(())
    }

    fn sprite(&self, s: &Sprite<HtmlImageElement>) -> Result<()> {
        // No-rotation path draws straight into place
        let (ox, oy) = if s.rotation == 0.0 {
            (s.x - s.w / 2.0, s.y - s.h / 2.0)
        } else {
            self.ctx.save();
            self.ctx.translate(s.x, s.y)?;
            self.ctx.rotate(s.rotation)?;
            (-s.w / 2.0, -s.h / 2.0)
        };

        let drawn = match &s.image {
            Some(img) => self.ctx.draw_image_with_html_image_element_and_dw_and_dh(img, ox, oy, s.w, s.h),
            None => {
                self.placeholder(s, ox, oy);
                Ok(())
            }
        };

        if s.rotation != 0.0 {
            self.ctx.restore();
        }
        drawn.map_err(FlyupError::from)
    }

    fn placeholder(&self, s: &Sprite<HtmlImageElement>, ox: f64, oy: f64) {
        let css = s.color.to_string();
        self.ctx.set_global_alpha(PLACEHOLDER_ALPHA);
        match s.kind {
            FoldKind::Blank => {
                self.ctx.set_stroke_style_str(&css);
                self.ctx.stroke_rect(ox, oy, s.w, s.h);
            }
            FoldKind::Paper | FoldKind::Crumpled => {
                self.ctx.set_fill_style_str(&css);
                self.ctx.fill_rect(ox, oy, s.w, s.h);
            }
        }
        self.ctx.set_global_alpha(1.0);
    }
}
