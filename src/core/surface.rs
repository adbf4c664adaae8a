use crate::error::{Result, VisualizerError};
use glam::Vec2;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    pub const TRANSPARENT: Rgba = Rgba::new(0, 0, 0, 0);

    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self::new(r, g, b, 255)
    }

    pub const fn from_rgb(c: [u8; 3]) -> Self {
        Self::rgb(c[0], c[1], c[2])
    }

    pub fn is_transparent(&self) -> bool {
        self.a == 0
    }

    /// CSS colour string, e.g. `rgba(50,255,133,1)`.
    pub fn css(&self) -> String {
        format!(
            "rgba({},{},{},{})",
            self.r,
            self.g,
            self.b,
            self.a as f32 / 255.0
        )
    }
}

/// Blurred halo drawn behind a filled shape.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Glow {
    pub color: Rgba,
    pub blur: f32,
}

/// Axis-aligned rectangle in surface pixels, y growing downwards.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ViewportGeometry {
    pub width: u32,
    pub height: u32,
}

impl ViewportGeometry {
    /// Validate raw viewport pixels. Non-positive or non-finite sizes are rejected.
    pub fn from_pixels(width: f64, height: f64) -> Result<Self> {
        let w = width.round();
        let h = height.round();
        let max = u32::MAX as f64;
        if !(w.is_finite() && h.is_finite() && (1.0..=max).contains(&w) && (1.0..=max).contains(&h))
        {
            return Err(VisualizerError::GeometryInvalid { width, height });
        }
        Ok(Self {
            width: w as u32,
            height: h as u32,
        })
    }
}

/// Backing-store pixels for a viewport of `css_width` x `css_height` CSS
/// pixels. Only the window size feeds this, never the canvas's own size, so
/// repeated resizes cannot compound. A bogus ratio counts as 1.
pub fn backing_store_px(css_width: f64, css_height: f64, device_pixel_ratio: f64) -> (f64, f64) {
    let dpr = if device_pixel_ratio.is_finite() && device_pixel_ratio > 0.0 {
        device_pixel_ratio
    } else {
        1.0
    };
    (css_width * dpr, css_height * dpr)
}

impl Default for ViewportGeometry {
    fn default() -> Self {
        Self {
            width: 1,
            height: 1,
        }
    }
}

/// Platform drawing primitives backing a [`RenderSurface`].
pub trait DrawTarget {
    fn set_size(&mut self, width: u32, height: u32) -> Result<()>;
    fn fill(&mut self, color: Rgba) -> Result<()>;
    fn fill_rect(&mut self, rect: Rect, color: Rgba, glow: Option<Glow>) -> Result<()>;
    fn stroke_polyline(&mut self, points: &[Vec2], color: Rgba, line_width: f32) -> Result<()>;
}

pub struct RenderSurface<T: DrawTarget> {
    target: T,
    geometry: ViewportGeometry,
}

impl<T: DrawTarget> RenderSurface<T> {
    pub fn new(target: T) -> Self {
        Self {
            target,
            geometry: ViewportGeometry::default(),
        }
    }

    /// Match the backing store to the viewport. Invalid sizes keep the previous geometry.
    pub fn resize(&mut self, width: f64, height: f64) -> Result<()> {
        let geometry = match ViewportGeometry::from_pixels(width, height) {
            Ok(g) => g,
            Err(e) => {
                log::warn!("[surface] rejected resize {}x{}", width, height);
                return Err(e);
            }
        };
        self.target.set_size(geometry.width, geometry.height)?;
        self.geometry = geometry;
        log::debug!("[surface] {}x{}", geometry.width, geometry.height);
        Ok(())
    }

    pub fn clear(&mut self, color: Rgba) -> Result<()> {
        self.target.fill(color)
    }

    /// Filled bar anchored at the bottom edge; `height` is clamped to the surface.
    pub fn draw_bar(
        &mut self,
        x: f32,
        width: f32,
        height: f32,
        color: Rgba,
        glow: Option<Glow>,
    ) -> Result<()> {
        let surface_h = self.height();
        let h = height.clamp(0.0, surface_h);
        let rect = Rect {
            x,
            y: surface_h - h,
            width,
            height: h,
        };
        self.target.fill_rect(rect, color, glow)
    }

    pub fn draw_polyline(&mut self, points: &[Vec2], color: Rgba, line_width: f32) -> Result<()> {
        if points.len() < 2 {
            return Ok(());
        }
        self.target.stroke_polyline(points, color, line_width)
    }

    pub fn geometry(&self) -> ViewportGeometry {
        self.geometry
    }

    pub fn width(&self) -> f32 {
        self.geometry.width as f32
    }

    pub fn height(&self) -> f32 {
        self.geometry.height as f32
    }
}
