use crate::core::{DrawTarget, Glow, Rect, Rgba};
use crate::error::Result;
use glam::Vec2;
use wasm_bindgen::JsCast;
use web_sys as web;

/// 2D canvas backing a [`crate::core::RenderSurface`].
pub struct CanvasTarget {
    canvas: web::HtmlCanvasElement,
    ctx: web::CanvasRenderingContext2d,
}

impl CanvasTarget {
    pub fn new(canvas: web::HtmlCanvasElement) -> anyhow::Result<Self> {
        let ctx = canvas
            .get_context("2d")
            .map_err(|e| anyhow::anyhow!("getContext error: {:?}", e))?
            .ok_or_else(|| anyhow::anyhow!("2d context unavailable"))?
            .dyn_into::<web::CanvasRenderingContext2d>()
            .map_err(|e| anyhow::anyhow!(format!("{:?}", e)))?;
        Ok(Self { canvas, ctx })
    }

    fn set_glow(&self, glow: Option<Glow>) {
        match glow {
            Some(g) => {
                self.ctx.set_shadow_blur(g.blur as f64);
                self.ctx.set_shadow_color(&g.color.css());
            }
            None => self.ctx.set_shadow_blur(0.0),
        }
    }
}

impl DrawTarget for CanvasTarget {
    fn set_size(&mut self, width: u32, height: u32) -> Result<()> {
        self.canvas.set_width(width);
        self.canvas.set_height(height);
        Ok(())
    }

    fn fill(&mut self, color: Rgba) -> Result<()> {
        let w = self.canvas.width() as f64;
        let h = self.canvas.height() as f64;
        if color.is_transparent() {
            self.ctx.clear_rect(0.0, 0.0, w, h);
        } else {
            self.set_glow(None);
            self.ctx.set_fill_style_str(&color.css());
            self.ctx.fill_rect(0.0, 0.0, w, h);
        }
        Ok(())
    }

    fn fill_rect(&mut self, rect: Rect, color: Rgba, glow: Option<Glow>) -> Result<()> {
        self.set_glow(glow);
        self.ctx.set_fill_style_str(&color.css());
        self.ctx.fill_rect(
            rect.x as f64,
            rect.y as f64,
            rect.width as f64,
            rect.height as f64,
        );
        Ok(())
    }

    fn stroke_polyline(&mut self, points: &[Vec2], color: Rgba, line_width: f32) -> Result<()> {
        let Some((first, rest)) = points.split_first() else {
            return Ok(());
        };
        self.set_glow(None);
        self.ctx.set_stroke_style_str(&color.css());
        self.ctx.set_line_width(line_width as f64);
        self.ctx.begin_path();
        self.ctx.move_to(first.x as f64, first.y as f64);
        for p in rest {
            self.ctx.line_to(p.x as f64, p.y as f64);
        }
        self.ctx.stroke();
        Ok(())
    }
}
