//! Page-level configuration, read from the URL query string.
//!
//! `?mode=scope&fft=512&gap=0.5&debug` selects the oscilloscope at a 512-sample
//! transform, half-pixel bar gaps and debug logging. Unknown keys are ignored and
//! invalid values fall back to defaults with a warning.

use crate::constants::{BAR_GAP_PX, BAR_MAX_GAP_PX};
use crate::core::analysis::is_valid_transform_size;
use crate::core::RenderMode;

#[derive(Clone, Debug, PartialEq)]
pub struct VisualizerConfig {
    pub mode: RenderMode,
    pub transform_size: u32,
    pub bar_gap: f32,
    pub debug: bool,
}

impl Default for VisualizerConfig {
    fn default() -> Self {
        Self::for_mode(RenderMode::default())
    }
}

impl VisualizerConfig {
    pub fn for_mode(mode: RenderMode) -> Self {
        Self {
            mode,
            transform_size: mode.default_transform_size(),
            bar_gap: BAR_GAP_PX,
            debug: false,
        }
    }

    pub fn from_query(query: &str) -> Self {
        let pairs: Vec<(&str, &str)> = query
            .trim_start_matches('?')
            .split('&')
            .filter(|p| !p.is_empty())
            .map(|p| p.split_once('=').unwrap_or((p, "")))
            .collect();

        let mode = pairs
            .iter()
            .find(|(k, _)| *k == "mode")
            .and_then(|(_, v)| match v.parse::<RenderMode>() {
                Ok(m) => Some(m),
                Err(e) => {
                    log::warn!("[config] {}", e);
                    None
                }
            })
            .unwrap_or_default();
        let mut config = Self::for_mode(mode);

        for (key, value) in pairs {
            match key {
                "fft" => match value.parse::<u32>() {
                    Ok(n) if is_valid_transform_size(n) => config.transform_size = n,
                    _ => log::warn!("[config] ignoring fft={}", value),
                },
                "gap" => match value.parse::<f32>() {
                    Ok(g) if (0.0..=BAR_MAX_GAP_PX).contains(&g) => config.bar_gap = g,
                    _ => log::warn!("[config] ignoring gap={}", value),
                },
                "debug" => config.debug = value != "0" && value != "false",
                _ => {}
            }
        }
        config
    }

    pub fn log_level(&self) -> log::Level {
        if self.debug {
            log::Level::Debug
        } else {
            log::Level::Info
        }
    }
}
