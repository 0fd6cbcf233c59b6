// raster.rs - Paint a draw list into an RGBA image
//
// No SVG decoding here: every sprite is its rotated box in the plane's
// color. Blank is outlined, Paper filled, Crumpled filled and darker.

use flyup_engine::render::{DrawCmd, Sprite};
use flyup_engine::sim::FoldKind;
use image::{Rgba, RgbaImage};

const BACKGROUND: Rgba<u8> = Rgba([250, 250, 245, 255]);
const OUTLINE: f64 = 2.0;

pub fn rasterize<H>(cmds: &[DrawCmd<H>]) -> RgbaImage {
    let mut img = RgbaImage::new(1, 1);
    for cmd in cmds {
        match cmd {
            DrawCmd::Clear { width, height } => {
                img = RgbaImage::from_pixel((*width as u32).max(1), (*height as u32).max(1), BACKGROUND);
            }
            DrawCmd::Sprite(s) => sprite(&mut img, s),
        }
    }
    img
}

fn sprite<H>(img: &mut RgbaImage, s: &Sprite<H>) {
    let color = match s.kind {
        FoldKind::Crumpled => s.color.scale(0.6),
        _ => s.color,
    };
    let px = Rgba(color.to_rgba());

    let (sin, cos) = s.rotation.sin_cos();
    let (hw, hh) = (s.w / 2.0, s.h / 2.0);

    // Bounding box of the rotated rect
    let ex = hw * cos.abs() + hh * sin.abs();
    let ey = hw * sin.abs() + hh * cos.abs();
    let x0 = (s.x - ex).floor().max(0.0) as u32;
    let y0 = (s.y - ey).floor().max(0.0) as u32;
    let x1 = ((s.x + ex).ceil().max(0.0) as u32).min(img.width());
    let y1 = ((s.y + ey).ceil().max(0.0) as u32).min(img.height());

    for y in y0..y1 {
        for x in x0..x1 {
            // Pixel center into the sprite's frame
            let dx = x as f64 + 0.5 - s.x;
            let dy = y as f64 + 0.5 - s.y;
            let lx = (dx * cos + dy * sin).abs();
            let ly = (-dx * sin + dy * cos).abs();
            if lx > hw || ly > hh { continue; }

            let edge = lx > hw - OUTLINE || ly > hh - OUTLINE;
            if s.kind == FoldKind::Blank && !edge { continue; }
            img.put_pixel(x, y, px);
        }
    }
}
