// Fakes shared by the host-side tests: a counting graph factory, a media host,
// a draw target that records every call and a manually pumped scheduler.

#![allow(dead_code)]

use glam::Vec2;
use std::cell::{Cell, RefCell};
use std::rc::Rc;
use synesthesia::core::*;
use synesthesia::error::{Result, VisualizerError};
use synesthesia::VisualizerConfig;

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Signal {
    Silent,
    Level(u8),
    Ramp,
}

#[derive(Clone, Debug, PartialEq)]
pub struct FakeSource {
    pub id: u32,
    pub signal: Signal,
}

impl FakeSource {
    pub fn new(id: u32, signal: Signal) -> Self {
        Self { id, signal }
    }
}

#[derive(Clone, Default)]
pub struct GraphLog {
    pub attached: Rc<Cell<u32>>,
    pub detached: Rc<Cell<u32>>,
    pub fft_sizes: Rc<RefCell<Vec<u32>>>,
}

impl GraphLog {
    pub fn live(&self) -> u32 {
        self.attached.get() - self.detached.get()
    }
}

pub struct FakeGraph {
    signal: Signal,
    log: GraphLog,
    connected: bool,
}

fn ramp(out: &mut [u8]) {
    let last = out.len().saturating_sub(1).max(1);
    for (i, o) in out.iter_mut().enumerate() {
        *o = (i * 255 / last) as u8;
    }
}

impl AudioGraph for FakeGraph {
    fn set_fft_size(&mut self, transform_size: u32) {
        self.log.fft_sizes.borrow_mut().push(transform_size);
    }

    fn read_frequency(&self, out: &mut [u8]) {
        match self.signal {
            Signal::Silent => out.fill(0),
            Signal::Level(v) => out.fill(v),
            Signal::Ramp => ramp(out),
        }
    }

    fn read_time_domain(&self, out: &mut [u8]) {
        match self.signal {
            Signal::Silent => out.fill(128),
            Signal::Level(v) => out.fill(v),
            Signal::Ramp => ramp(out),
        }
    }

    fn disconnect(&mut self) {
        if self.connected {
            self.connected = false;
            self.log.detached.set(self.log.detached.get() + 1);
        }
    }
}

#[derive(Clone, Default)]
pub struct FakeFactory {
    pub log: GraphLog,
    pub locked: Rc<Cell<bool>>,
}

impl GraphFactory for FakeFactory {
    type Source = FakeSource;
    type Graph = FakeGraph;

    fn connect(&mut self, source: &FakeSource, transform_size: u32) -> Result<FakeGraph> {
        if self.locked.get() {
            return Err(VisualizerError::AudioContextUnavailable);
        }
        self.log.attached.set(self.log.attached.get() + 1);
        self.log.fft_sizes.borrow_mut().push(transform_size);
        Ok(FakeGraph {
            signal: source.signal,
            log: self.log.clone(),
            connected: true,
        })
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct FakeFile {
    pub mime: String,
    pub name: String,
    pub signal: Signal,
}

impl FakeFile {
    pub fn new(mime: &str, name: &str) -> Self {
        Self {
            mime: mime.into(),
            name: name.into(),
            signal: Signal::Level(180),
        }
    }
}

#[derive(Clone, Default)]
pub struct MediaLog {
    pub created: Rc<Cell<u32>>,
    pub played: Rc<Cell<u32>>,
    pub paused: Rc<RefCell<Vec<u32>>>,
    pub released: Rc<RefCell<Vec<u32>>>,
    pub fail_play: Rc<Cell<bool>>,
}

#[derive(Clone, Default)]
pub struct FakeMedia {
    pub log: MediaLog,
}

impl MediaHost for FakeMedia {
    type Element = FakeSource;
    type File = FakeFile;

    fn file_info(&self, file: &FakeFile) -> FileInfo {
        FileInfo {
            mime: file.mime.clone(),
            name: file.name.clone(),
        }
    }

    fn create(&mut self, input: &MediaInput<FakeFile>) -> Result<FakeSource> {
        let signal = match input {
            MediaInput::Url(url) if url.contains("undecodable") => {
                return Err(VisualizerError::UnsupportedMedia(url.clone()))
            }
            MediaInput::Url(url) if url.contains("broken") => {
                return Err(VisualizerError::Platform("createObjectURL failed".into()))
            }
            MediaInput::Url(url) if url.contains("silent") => Signal::Silent,
            MediaInput::Url(url) if url.contains("ramp") => Signal::Ramp,
            MediaInput::Url(_) => Signal::Level(200),
            MediaInput::File(f) => f.signal,
        };
        let id = self.log.created.get() + 1;
        self.log.created.set(id);
        Ok(FakeSource::new(id, signal))
    }

    fn play(&mut self, _element: &FakeSource) -> Result<()> {
        if self.log.fail_play.get() {
            return Err(VisualizerError::Platform("play rejected".into()));
        }
        self.log.played.set(self.log.played.get() + 1);
        Ok(())
    }

    fn pause(&mut self, element: &FakeSource) {
        self.log.paused.borrow_mut().push(element.id);
    }

    fn release(&mut self, element: &FakeSource) {
        self.log.released.borrow_mut().push(element.id);
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum DrawOp {
    Resize(u32, u32),
    Fill(Rgba),
    Bar(Rect, Rgba, Option<Glow>),
    Polyline(Vec<Vec2>, Rgba, f32),
}

#[derive(Clone, Default)]
pub struct RecordingTarget {
    pub ops: Rc<RefCell<Vec<DrawOp>>>,
    pub fail_draws: Rc<Cell<bool>>,
}

impl RecordingTarget {
    /// Draw calls only; resizes are not drawing.
    pub fn draw_calls(&self) -> Vec<DrawOp> {
        self.ops
            .borrow()
            .iter()
            .filter(|op| !matches!(op, DrawOp::Resize(..)))
            .cloned()
            .collect()
    }

    pub fn bars(&self) -> Vec<(Rect, Rgba, Option<Glow>)> {
        self.ops
            .borrow()
            .iter()
            .filter_map(|op| match op {
                DrawOp::Bar(r, c, g) => Some((*r, *c, *g)),
                _ => None,
            })
            .collect()
    }

    pub fn polylines(&self) -> Vec<Vec<Vec2>> {
        self.ops
            .borrow()
            .iter()
            .filter_map(|op| match op {
                DrawOp::Polyline(p, _, _) => Some(p.clone()),
                _ => None,
            })
            .collect()
    }

    pub fn clear(&self) {
        self.ops.borrow_mut().clear();
    }
}

impl DrawTarget for RecordingTarget {
    fn set_size(&mut self, width: u32, height: u32) -> Result<()> {
        self.ops.borrow_mut().push(DrawOp::Resize(width, height));
        Ok(())
    }

    fn fill(&mut self, color: Rgba) -> Result<()> {
        self.ops.borrow_mut().push(DrawOp::Fill(color));
        Ok(())
    }

    fn fill_rect(&mut self, rect: Rect, color: Rgba, glow: Option<Glow>) -> Result<()> {
        if self.fail_draws.get() {
            return Err(VisualizerError::Draw("context lost".into()));
        }
        self.ops.borrow_mut().push(DrawOp::Bar(rect, color, glow));
        Ok(())
    }

    fn stroke_polyline(&mut self, points: &[Vec2], color: Rgba, line_width: f32) -> Result<()> {
        if self.fail_draws.get() {
            return Err(VisualizerError::Draw("context lost".into()));
        }
        self.ops
            .borrow_mut()
            .push(DrawOp::Polyline(points.to_vec(), color, line_width));
        Ok(())
    }
}

#[derive(Clone, Default)]
pub struct ManualScheduler {
    pub pending: Rc<Cell<u32>>,
    pub total: Rc<Cell<u32>>,
}

impl ManualScheduler {
    pub fn take(&self) -> bool {
        let n = self.pending.get();
        if n == 0 {
            return false;
        }
        self.pending.set(n - 1);
        true
    }
}

impl FrameScheduler for ManualScheduler {
    fn request_frame(&mut self) {
        self.pending.set(self.pending.get() + 1);
        self.total.set(self.total.get() + 1);
    }
}

pub type TestVisualizer = Visualizer<FakeFactory, FakeMedia, RecordingTarget, ManualScheduler>;

pub struct Harness {
    pub vis: TestVisualizer,
    pub graphs: GraphLog,
    pub locked: Rc<Cell<bool>>,
    pub media: MediaLog,
    pub target: RecordingTarget,
    pub scheduler: ManualScheduler,
}

impl Harness {
    pub fn new(config: VisualizerConfig) -> Self {
        let factory = FakeFactory::default();
        let media = FakeMedia::default();
        let target = RecordingTarget::default();
        let scheduler = ManualScheduler::default();
        let mut vis = Visualizer::new(
            &config,
            factory.clone(),
            media.clone(),
            target.clone(),
            scheduler.clone(),
        )
        .expect("valid config");
        vis.resize(800.0, 400.0).expect("valid size");
        Self {
            vis,
            graphs: factory.log,
            locked: factory.locked,
            media: media.log,
            target,
            scheduler,
        }
    }

    /// Run scheduled frames, at most `max`. Returns how many ran.
    pub fn pump(&mut self, max: u32) -> u32 {
        let mut ran = 0;
        while ran < max && self.scheduler.take() {
            self.vis.frame();
            ran += 1;
        }
        ran
    }
}
