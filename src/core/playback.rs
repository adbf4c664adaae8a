//! Frame loop state machine.
//!
//! The loop is cooperative: `stop` only raises a flag, and the next scheduled
//! callback observes it in `begin_frame` and exits without rescheduling.

use crate::constants::FRAME_STATS_INTERVAL;
use crate::error::VisualizerError;
use instant::Instant;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum PlaybackState {
    #[default]
    Stopped,
    Playing,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum LoopState {
    #[default]
    Idle,
    Running,
}

/// Requests a callback on the next display refresh.
pub trait FrameScheduler {
    fn request_frame(&mut self);
}

#[derive(Debug)]
struct FrameStats {
    frames: u64,
    window_start: Option<Instant>,
}

impl FrameStats {
    fn new() -> Self {
        Self {
            frames: 0,
            window_start: None,
        }
    }

    fn record(&mut self) {
        let now = Instant::now();
        let start = *self.window_start.get_or_insert(now);
        self.frames += 1;
        if self.frames % FRAME_STATS_INTERVAL == 0 {
            let elapsed = now.duration_since(start).as_secs_f64();
            let mean_ms = elapsed * 1000.0 / FRAME_STATS_INTERVAL as f64;
            log::debug!("[loop] {} frames, mean interval {:.2} ms", self.frames, mean_ms);
            self.window_start = Some(now);
        }
    }
}

#[derive(Debug)]
pub struct PlaybackLoop {
    playback: PlaybackState,
    state: LoopState,
    stop_requested: bool,
    last_error: Option<VisualizerError>,
    stats: FrameStats,
}

impl Default for PlaybackLoop {
    fn default() -> Self {
        Self::new()
    }
}

impl PlaybackLoop {
    pub fn new() -> Self {
        Self {
            playback: PlaybackState::Stopped,
            state: LoopState::Idle,
            stop_requested: false,
            last_error: None,
            stats: FrameStats::new(),
        }
    }

    /// Returns true when the caller must schedule the first frame.
    ///
    /// A running loop is left alone; a stop that has not been observed yet is
    /// withdrawn so the existing chain keeps going.
    pub fn start(&mut self, attached: bool) -> bool {
        if !attached || self.playback != PlaybackState::Playing {
            return false;
        }
        match self.state {
            LoopState::Running => {
                self.stop_requested = false;
                false
            }
            LoopState::Idle => {
                self.state = LoopState::Running;
                self.stop_requested = false;
                self.last_error = None;
                log::debug!("[loop] running");
                true
            }
        }
    }

    pub fn stop(&mut self) {
        if self.state == LoopState::Running {
            self.stop_requested = true;
        }
    }

    /// Gate at the top of every callback. False means exit without drawing.
    pub fn begin_frame(&mut self) -> bool {
        if self.state != LoopState::Running {
            return false;
        }
        if self.stop_requested || self.playback != PlaybackState::Playing {
            self.state = LoopState::Idle;
            self.stop_requested = false;
            log::debug!("[loop] idle after {} frames", self.stats.frames);
            return false;
        }
        true
    }

    /// Returns whether to reschedule. A failed frame stops the loop and is
    /// reported once.
    pub fn end_frame(&mut self, outcome: Result<(), VisualizerError>) -> bool {
        match outcome {
            Ok(()) => {
                self.stats.record();
                true
            }
            Err(e) => {
                log::error!("[loop] frame failed, stopping: {}", e);
                self.last_error = Some(e);
                self.state = LoopState::Idle;
                self.stop_requested = false;
                false
            }
        }
    }

    pub fn set_playing(&mut self) {
        self.playback = PlaybackState::Playing;
    }

    pub fn set_stopped(&mut self) {
        self.playback = PlaybackState::Stopped;
        self.stop();
    }

    pub fn playback_state(&self) -> PlaybackState {
        self.playback
    }

    pub fn loop_state(&self) -> LoopState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        self.state == LoopState::Running
    }

    pub fn last_error(&self) -> Option<&VisualizerError> {
        self.last_error.as_ref()
    }

    pub fn frames_rendered(&self) -> u64 {
        self.stats.frames
    }
}
