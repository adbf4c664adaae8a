pub mod analysis;
pub mod binding;
pub mod playback;
pub mod renderer;
pub mod surface;
pub mod visualizer;

pub use analysis::{AnalysisBuffer, AudioGraph, FrequencyAnalyzer, GraphFactory, SampleMode};
pub use binding::{FileInfo, MediaHost, MediaInput, SourceBinding};
pub use playback::{FrameScheduler, LoopState, PlaybackLoop, PlaybackState};
pub use renderer::{BarSpectrum, Oscilloscope, RenderMode, Renderer, Visualization};
pub use surface::{backing_store_px, DrawTarget, Glow, Rect, RenderSurface, Rgba, ViewportGeometry};
pub use visualizer::Visualizer;
