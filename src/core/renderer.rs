//! Mapping of analysis snapshots to draw calls.
//!
//! Two mappings share the [`Visualization`] interface: a bar spectrum fed by
//! frequency bins and an oscilloscope line fed by time-domain samples.

use super::analysis::SampleMode;
use super::surface::{DrawTarget, Glow, RenderSurface, Rgba};
use crate::constants::*;
use crate::error::Result;
use glam::Vec2;
use std::str::FromStr;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum RenderMode {
    #[default]
    Bars,
    Oscilloscope,
}

impl RenderMode {
    /// Transform size each mapping was tuned for.
    pub fn default_transform_size(self) -> u32 {
        match self {
            RenderMode::Bars => BARS_TRANSFORM_SIZE,
            RenderMode::Oscilloscope => SCOPE_TRANSFORM_SIZE,
        }
    }

    pub fn sample_mode(self) -> SampleMode {
        match self {
            RenderMode::Bars => SampleMode::Frequency,
            RenderMode::Oscilloscope => SampleMode::TimeDomain,
        }
    }
}

impl FromStr for RenderMode {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "bars" | "bar" | "spectrum" => Ok(RenderMode::Bars),
            "scope" | "oscilloscope" | "wave" | "waveform" => Ok(RenderMode::Oscilloscope),
            other => Err(format!("unknown render mode '{other}'")),
        }
    }
}

pub trait Visualization {
    fn sample_mode(&self) -> SampleMode;
    fn draw<T: DrawTarget>(&mut self, data: &[u8], surface: &mut RenderSurface<T>) -> Result<()>;
}

/// Energy-reactive bar colour: red grows with the bin value.
#[inline]
pub fn bar_color(value: u8) -> Rgba {
    let r = (BAR_RED_BASE + BAR_RED_GAIN * value as u32).min(255) as u8;
    Rgba::rgb(r, BAR_GREEN, BAR_BLUE)
}

/// Left edge and width of each of `count` slots across `width` pixels.
///
/// Edges are rounded to whole pixels so the widths sum to `width` exactly.
pub fn bar_slots(width: u32, count: usize) -> impl Iterator<Item = (f32, f32)> {
    let w = width as f64;
    let n = count.max(1) as f64;
    let edge = move |i: usize| (i as f64 * w / n).round() as f32;
    (0..count).map(move |i| {
        let x0 = edge(i);
        (x0, edge(i + 1) - x0)
    })
}

/// Vertical offset in [-1, 1] of a time-domain byte around the midline.
///
/// 128 maps to 0 and the two extremes 0 and 255 map to -1 and +1.
#[inline]
pub fn scope_offset(value: u8) -> f32 {
    let mid = TIME_DOMAIN_MIDPOINT as f32;
    let v = value as f32;
    if v >= mid {
        (v - mid) / (255.0 - mid)
    } else {
        (v - mid) / mid
    }
}

/// Surface y of a time-domain byte; larger values are drawn higher.
#[inline]
pub fn scope_y(value: u8, height: f32) -> f32 {
    let half = height * 0.5;
    half - scope_offset(value) * half
}

/// One bar per bin. `gap` insets each bar inside its slot and is capped at
/// [`BAR_MAX_GAP_PX`], so drawn widths sum to the surface width within a
/// pixel per bar.
#[derive(Clone, Debug, PartialEq)]
pub struct BarSpectrum {
    pub gap: f32,
    pub glow_blur: f32,
}

impl Default for BarSpectrum {
    fn default() -> Self {
        Self {
            gap: BAR_GAP_PX,
            glow_blur: BAR_GLOW_BLUR_PX,
        }
    }
}

impl Visualization for BarSpectrum {
    fn sample_mode(&self) -> SampleMode {
        SampleMode::Frequency
    }

    fn draw<T: DrawTarget>(&mut self, data: &[u8], surface: &mut RenderSurface<T>) -> Result<()> {
        if data.is_empty() {
            return Ok(());
        }
        surface.clear(Rgba::TRANSPARENT)?;
        let width = surface.geometry().width;
        let height = surface.height();
        let gap = self.gap.clamp(0.0, BAR_MAX_GAP_PX);
        for (&value, (x, slot)) in data.iter().zip(bar_slots(width, data.len())) {
            let bar_h = value as f32 / 255.0 * height;
            let bar_w = (slot - gap).max(BAR_MIN_WIDTH_PX);
            let color = bar_color(value);
            let glow = Glow {
                color,
                blur: self.glow_blur,
            };
            surface.draw_bar(x, bar_w, bar_h, color, Some(glow))?;
        }
        Ok(())
    }
}

#[derive(Clone, Debug)]
pub struct Oscilloscope {
    pub background: Rgba,
    pub line_color: Rgba,
    pub line_width: f32,
    points: Vec<Vec2>,
}

impl Default for Oscilloscope {
    fn default() -> Self {
        Self {
            background: Rgba::from_rgb(SCOPE_BACKGROUND),
            line_color: Rgba::from_rgb(SCOPE_LINE_COLOR),
            line_width: SCOPE_LINE_WIDTH_PX,
            points: Vec::new(),
        }
    }
}

impl Oscilloscope {
    /// Fill `points` with one vertex per sample spanning the full width.
    pub fn trace(data: &[u8], width: f32, height: f32, points: &mut Vec<Vec2>) {
        points.clear();
        match data.len() {
            0 => {}
            1 => {
                let y = scope_y(data[0], height);
                points.push(Vec2::new(0.0, y));
                points.push(Vec2::new(width, y));
            }
            n => {
                let step = width / (n - 1) as f32;
                points.extend(
                    data.iter()
                        .enumerate()
                        .map(|(i, &v)| Vec2::new(i as f32 * step, scope_y(v, height))),
                );
            }
        }
    }
}

impl Visualization for Oscilloscope {
    fn sample_mode(&self) -> SampleMode {
        SampleMode::TimeDomain
    }

    fn draw<T: DrawTarget>(&mut self, data: &[u8], surface: &mut RenderSurface<T>) -> Result<()> {
        if data.is_empty() {
            return Ok(());
        }
        surface.clear(self.background)?;
        // Vertex buffer is reused between frames.
        Self::trace(data, surface.width(), surface.height(), &mut self.points);
        surface.draw_polyline(&self.points, self.line_color, self.line_width)
    }
}

/// The configured visual mapping.
#[derive(Clone, Debug)]
pub enum Renderer {
    Bars(BarSpectrum),
    Oscilloscope(Oscilloscope),
}

impl Renderer {
    pub fn for_mode(mode: RenderMode) -> Self {
        match mode {
            RenderMode::Bars => Renderer::Bars(BarSpectrum::default()),
            RenderMode::Oscilloscope => Renderer::Oscilloscope(Oscilloscope::default()),
        }
    }

    pub fn bars_with_gap(gap: f32) -> Self {
        Renderer::Bars(BarSpectrum {
            gap: gap.clamp(0.0, BAR_MAX_GAP_PX),
            ..BarSpectrum::default()
        })
    }

    pub fn mode(&self) -> RenderMode {
        match self {
            Renderer::Bars(_) => RenderMode::Bars,
            Renderer::Oscilloscope(_) => RenderMode::Oscilloscope,
        }
    }
}

impl Visualization for Renderer {
    fn sample_mode(&self) -> SampleMode {
        match self {
            Renderer::Bars(r) => r.sample_mode(),
            Renderer::Oscilloscope(r) => r.sample_mode(),
        }
    }

    fn draw<T: DrawTarget>(&mut self, data: &[u8], surface: &mut RenderSurface<T>) -> Result<()> {
        match self {
            Renderer::Bars(r) => r.draw(data, surface),
            Renderer::Oscilloscope(r) => r.draw(data, surface),
        }
    }
}
