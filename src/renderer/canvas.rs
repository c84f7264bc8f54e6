//! Canvas 2D backed [`Surface`]

use glam::Vec2;
use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, HtmlImageElement};

use super::{Color, Sprite, Surface};
use crate::sim::Rect;

/// Draws onto the overlay canvas
pub struct CanvasSurface {
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
    face: HtmlImageElement,
    alarmed_face: HtmlImageElement,
}

impl CanvasSurface {
    /// Grab the 2D context and start loading both face bitmaps
    pub fn new(
        canvas: HtmlCanvasElement,
        face_src: &str,
        alarmed_face_src: &str,
    ) -> Result<Self, JsValue> {
        let ctx = canvas
            .get_context("2d")?
            .ok_or_else(|| JsValue::from_str("2D context not available"))?
            .dyn_into::<CanvasRenderingContext2d>()?;

        Ok(Self {
            canvas,
            ctx,
            face: load_image(face_src)?,
            alarmed_face: load_image(alarmed_face_src)?,
        })
    }

    /// Match the canvas backing store to the viewport
    pub fn resize(&self, width: u32, height: u32) {
        self.canvas.set_width(width);
        self.canvas.set_height(height);
    }

    fn image(&self, sprite: Sprite) -> &HtmlImageElement {
        match sprite {
            Sprite::Face => &self.face,
            Sprite::AlarmedFace => &self.alarmed_face,
        }
    }
}

fn load_image(src: &str) -> Result<HtmlImageElement, JsValue> {
    let img = HtmlImageElement::new()?;
    img.set_src(src);
    Ok(img)
}

impl Surface for CanvasSurface {
    fn size(&self) -> Vec2 {
        Vec2::new(self.canvas.width() as f32, self.canvas.height() as f32)
    }

    fn clear(&mut self) {
        let size = self.size();
        self.ctx.clear_rect(0.0, 0.0, size.x as f64, size.y as f64);
    }

    fn fill_rect(&mut self, rect: Rect, color: Color, alpha: f32) {
        self.ctx.set_fill_style_str(&color.css(1.0));
        self.ctx.set_global_alpha(alpha.clamp(0.0, 1.0) as f64);
        self.ctx.fill_rect(
            rect.left() as f64,
            rect.top() as f64,
            rect.size.x as f64,
            rect.size.y as f64,
        );
        self.ctx.set_global_alpha(1.0);
    }

    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Color, alpha: f32) {
        if radius <= 0.0 {
            return;
        }
        self.ctx.begin_path();
        if self
            .ctx
            .arc(
                center.x as f64,
                center.y as f64,
                radius as f64,
                0.0,
                std::f64::consts::TAU,
            )
            .is_err()
        {
            return;
        }
        self.ctx.set_fill_style_str(&color.css(alpha));
        self.ctx.fill();
    }

    fn draw_sprite(&mut self, sprite: Sprite, center: Vec2, size: f32, angle: f32) -> bool {
        let img = self.image(sprite);
        if !img.complete() || img.natural_width() == 0 {
            return false;
        }

        let ctx = &self.ctx;
        ctx.set_image_smoothing_enabled(false);
        ctx.save();
        let half = (size / 2.0) as f64;
        let drawn = ctx
            .translate(center.x as f64, center.y as f64)
            .and_then(|_| ctx.rotate(angle as f64))
            .and_then(|_| {
                ctx.draw_image_with_html_image_element_and_dw_and_dh(
                    img,
                    -half,
                    -half,
                    size as f64,
                    size as f64,
                )
            })
            .is_ok();
        ctx.restore();
        drawn
    }
}
