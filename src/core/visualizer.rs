//! The visualizer context: one object owning the whole audio-to-canvas
//! pipeline, with one entry point per external event.

use super::analysis::{FrequencyAnalyzer, GraphFactory};
use super::binding::{MediaHost, MediaInput, SourceBinding};
use super::playback::{FrameScheduler, PlaybackLoop, PlaybackState};
use super::renderer::{RenderMode, Renderer, Visualization};
use super::surface::{DrawTarget, RenderSurface};
use crate::config::VisualizerConfig;
use crate::error::{Result, VisualizerError};
use crate::keys::KeyAction;

pub struct Visualizer<F, M, T, S>
where
    F: GraphFactory<Source = M::Element>,
    M: MediaHost,
    T: DrawTarget,
    S: FrameScheduler,
{
    analyzer: FrequencyAnalyzer<F>,
    binding: SourceBinding<M>,
    surface: RenderSurface<T>,
    renderer: Renderer,
    playback: PlaybackLoop,
    scheduler: S,
    progress: f64,
    pending: Option<(MediaInput<M::File>, bool)>,
}

impl<F, M, T, S> Visualizer<F, M, T, S>
where
    F: GraphFactory<Source = M::Element>,
    M: MediaHost,
    T: DrawTarget,
    S: FrameScheduler,
{
    pub fn new(
        config: &VisualizerConfig,
        factory: F,
        host: M,
        target: T,
        scheduler: S,
    ) -> Result<Self> {
        let renderer = match config.mode {
            RenderMode::Bars => Renderer::bars_with_gap(config.bar_gap),
            RenderMode::Oscilloscope => Renderer::for_mode(RenderMode::Oscilloscope),
        };
        let analyzer =
            FrequencyAnalyzer::new(factory, config.transform_size, renderer.sample_mode())?;
        log::info!(
            "[visualizer] mode={:?} transform={}",
            config.mode,
            config.transform_size
        );
        Ok(Self {
            analyzer,
            binding: SourceBinding::new(host),
            surface: RenderSurface::new(target),
            renderer,
            playback: PlaybackLoop::new(),
            scheduler,
            progress: 0.0,
            pending: None,
        })
    }

    pub fn resize(&mut self, width: f64, height: f64) -> Result<()> {
        self.surface.resize(width, height)
    }

    /// Bind a new source. Once bound, playback is stopped and the caller decides
    /// when to play.
    pub fn attach_source(&mut self, input: MediaInput<M::File>) -> Result<M::Element> {
        self.load(input, false)
    }

    /// Bind `url` and start playing it.
    pub fn set_audio_source(&mut self, url: &str) -> Result<M::Element> {
        self.load(MediaInput::Url(url.to_string()), true)
    }

    fn load(&mut self, input: MediaInput<M::File>, autoplay: bool) -> Result<M::Element> {
        let before = self.binding.current().cloned();
        let retry = input.clone();
        let element = match self.binding.bind(&mut self.analyzer, input) {
            Ok(el) => el,
            Err(e) => {
                // Failures before teardown leave the old source playing.
                if self.binding.current() != before.as_ref() {
                    self.playback.set_stopped();
                    self.progress = 0.0;
                }
                if e == VisualizerError::AudioContextUnavailable {
                    self.pending = Some((retry, autoplay));
                }
                return Err(e);
            }
        };
        self.pending = None;
        self.playback.set_stopped();
        self.progress = 0.0;
        if autoplay {
            self.play()?;
        }
        Ok(element)
    }

    /// Whether a source is waiting for audio to be unlocked.
    pub fn has_pending_source(&self) -> bool {
        self.pending.is_some()
    }

    /// Retry a source that failed because audio was still locked. Called on
    /// user gestures; `None` when nothing was waiting.
    pub fn retry_pending(&mut self) -> Option<Result<M::Element>> {
        let (input, autoplay) = self.pending.take()?;
        log::info!("[visualizer] retrying source after user gesture");
        Some(self.load(input, autoplay))
    }

    /// A key press. It is also a user gesture: a source waiting for audio is
    /// retried and the key's own action is skipped, so the press that unlocks
    /// audio does not immediately toggle it off again.
    pub fn on_key(&mut self, action: Option<KeyAction>) -> Result<Option<M::Element>> {
        if let Some(retried) = self.retry_pending() {
            return retried.map(Some);
        }
        match action {
            Some(KeyAction::Toggle) => self.toggle()?,
            Some(KeyAction::Play) => self.play()?,
            Some(KeyAction::Pause) => self.pause(),
            None => {}
        }
        Ok(None)
    }

    pub fn play(&mut self) -> Result<()> {
        let element = self
            .binding
            .current()
            .cloned()
            .ok_or(VisualizerError::NotAttached)?;
        self.binding.host_mut().play(&element)?;
        self.playback.set_playing();
        if self.playback.start(self.analyzer.is_attached()) {
            self.scheduler.request_frame();
        }
        Ok(())
    }

    pub fn pause(&mut self) {
        if let Some(element) = self.binding.current().cloned() {
            self.binding.host_mut().pause(&element);
        }
        self.playback.set_stopped();
    }

    pub fn toggle(&mut self) -> Result<()> {
        match self.playback.playback_state() {
            PlaybackState::Playing => {
                self.pause();
                Ok(())
            }
            PlaybackState::Stopped => self.play(),
        }
    }

    /// One display refresh tick.
    pub fn frame(&mut self) {
        if !self.playback.begin_frame() {
            return;
        }
        let outcome = self.draw_frame();
        if self.playback.end_frame(outcome) {
            self.scheduler.request_frame();
        }
    }

    fn draw_frame(&mut self) -> Result<()> {
        let buffer = self.analyzer.sample()?;
        self.renderer.draw(buffer.as_slice(), &mut self.surface)
    }

    pub fn on_time_update(&mut self, element: &M::Element, current: f64, duration: f64) {
        if !self.binding.is_current(element) {
            return;
        }
        if duration.is_finite() && duration > 0.0 && current.is_finite() {
            self.progress = (current / duration).clamp(0.0, 1.0);
            if current >= duration {
                self.on_media_ended(element);
            }
        }
    }

    /// The platform refused to start playback (autoplay policy). Playback
    /// stops so the loop does not keep drawing a silent source.
    pub fn on_play_rejected(
        &mut self,
        element: &M::Element,
        detail: &str,
    ) -> Option<VisualizerError> {
        let playing = self.playback.playback_state() == PlaybackState::Playing;
        if !playing || !self.binding.is_current(element) {
            return None;
        }
        log::warn!("[visualizer] play rejected: {}", detail);
        self.playback.set_stopped();
        Some(VisualizerError::Platform(format!("play rejected: {detail}")))
    }

    pub fn on_media_ended(&mut self, element: &M::Element) {
        if !self.binding.is_current(element) {
            return;
        }
        if self.playback.playback_state() == PlaybackState::Playing {
            log::info!("[visualizer] playback ended");
        }
        self.progress = 1.0;
        self.playback.set_stopped();
    }

    /// Decode failure reported asynchronously by the platform. The source is
    /// unbound and the error handed back for the caller to surface.
    pub fn on_media_error(&mut self, element: &M::Element, detail: &str) -> Option<VisualizerError> {
        if !self.binding.is_current(element) {
            return None;
        }
        log::warn!("[visualizer] media error: {}", detail);
        self.playback.set_stopped();
        self.binding.unbind(&mut self.analyzer);
        self.progress = 0.0;
        Some(VisualizerError::UnsupportedMedia(detail.to_string()))
    }

    /// Fraction of the current track played, in [0, 1].
    pub fn progress(&self) -> f64 {
        self.progress
    }

    /// Index of the line to highlight when `line_count` lines are spread
    /// evenly over the track.
    pub fn lyric_line_index(&self, line_count: usize) -> Option<usize> {
        if line_count == 0 {
            return None;
        }
        let idx = (self.progress * line_count as f64).floor() as usize;
        Some(idx.min(line_count - 1))
    }

    pub fn playback_state(&self) -> PlaybackState {
        self.playback.playback_state()
    }

    pub fn is_running(&self) -> bool {
        self.playback.is_running()
    }

    pub fn last_error(&self) -> Option<&VisualizerError> {
        self.playback.last_error()
    }

    pub fn current_element(&self) -> Option<&M::Element> {
        self.binding.current()
    }

    pub fn mode(&self) -> RenderMode {
        self.renderer.mode()
    }

    pub fn analyzer(&self) -> &FrequencyAnalyzer<F> {
        &self.analyzer
    }

    pub fn surface(&self) -> &RenderSurface<T> {
        &self.surface
    }
}
