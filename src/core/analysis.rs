//! Frequency analysis over a platform analysis node.
//!
//! The actual transform runs inside the platform node; this module owns its
//! configuration and the byte buffer that each frame is copied into.

use crate::constants::{MAX_TRANSFORM_SIZE, MIN_TRANSFORM_SIZE};
use crate::error::{Result, VisualizerError};

/// Which snapshot the analysis node should produce.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SampleMode {
    /// Energy per frequency bin.
    Frequency,
    /// Raw waveform bytes centred on 128.
    TimeDomain,
}

/// A live source -> analysis node -> output chain.
pub trait AudioGraph {
    fn set_fft_size(&mut self, transform_size: u32);
    fn read_frequency(&self, out: &mut [u8]);
    fn read_time_domain(&self, out: &mut [u8]);
    /// Remove the chain from the output. The graph is not reused afterwards.
    fn disconnect(&mut self);
}

/// Builds audio graphs for playable sources.
pub trait GraphFactory {
    type Source;
    type Graph: AudioGraph;

    fn connect(&mut self, source: &Self::Source, transform_size: u32) -> Result<Self::Graph>;
}

/// Fixed-length snapshot of the analysis node, `transform_size / 2` bytes.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AnalysisBuffer {
    data: Vec<u8>,
}

impl AnalysisBuffer {
    pub fn new(len: usize) -> Self {
        Self { data: vec![0; len] }
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.data
    }

    fn as_mut_slice(&mut self) -> &mut [u8] {
        &mut self.data
    }

    fn reset(&mut self) {
        self.data.fill(0);
    }
}

pub fn is_valid_transform_size(transform_size: u32) -> bool {
    transform_size.is_power_of_two()
        && (MIN_TRANSFORM_SIZE..=MAX_TRANSFORM_SIZE).contains(&transform_size)
}

pub struct FrequencyAnalyzer<F: GraphFactory> {
    factory: F,
    graph: Option<F::Graph>,
    transform_size: u32,
    mode: SampleMode,
    buffer: AnalysisBuffer,
}

impl<F: GraphFactory> FrequencyAnalyzer<F> {
    pub fn new(factory: F, transform_size: u32, mode: SampleMode) -> Result<Self> {
        let mut analyzer = Self {
            factory,
            graph: None,
            transform_size: 0,
            mode,
            buffer: AnalysisBuffer::default(),
        };
        analyzer.configure(transform_size)?;
        Ok(analyzer)
    }

    /// Set the transform resolution and reallocate the buffer to half of it.
    pub fn configure(&mut self, transform_size: u32) -> Result<()> {
        if !is_valid_transform_size(transform_size) {
            return Err(VisualizerError::InvalidTransformSize(transform_size));
        }
        self.transform_size = transform_size;
        self.buffer = AnalysisBuffer::new((transform_size / 2) as usize);
        if let Some(graph) = &mut self.graph {
            graph.set_fft_size(transform_size);
        }
        log::debug!(
            "[analyzer] transform size {} ({} bins)",
            transform_size,
            self.buffer.len()
        );
        Ok(())
    }

    /// Route `source` through a fresh analysis node, discarding any previous graph.
    pub fn attach(&mut self, source: &F::Source) -> Result<()> {
        self.detach();
        let graph = self.factory.connect(source, self.transform_size)?;
        self.graph = Some(graph);
        self.buffer.reset();
        log::info!("[analyzer] attached ({:?})", self.mode);
        Ok(())
    }

    pub fn detach(&mut self) {
        if let Some(mut graph) = self.graph.take() {
            graph.disconnect();
            log::debug!("[analyzer] detached");
        }
    }

    /// Copy the current snapshot into the pre-allocated buffer.
    pub fn sample(&mut self) -> Result<&AnalysisBuffer> {
        let graph = self.graph.as_ref().ok_or(VisualizerError::NotAttached)?;
        let out = self.buffer.as_mut_slice();
        match self.mode {
            SampleMode::Frequency => graph.read_frequency(out),
            SampleMode::TimeDomain => graph.read_time_domain(out),
        }
        Ok(&self.buffer)
    }

    pub fn is_attached(&self) -> bool {
        self.graph.is_some()
    }

    pub fn transform_size(&self) -> u32 {
        self.transform_size
    }

    pub fn sample_mode(&self) -> SampleMode {
        self.mode
    }

    pub fn set_sample_mode(&mut self, mode: SampleMode) {
        self.mode = mode;
    }

    pub fn buffer(&self) -> &AnalysisBuffer {
        &self.buffer
    }

    pub fn factory(&self) -> &F {
        &self.factory
    }

    pub fn factory_mut(&mut self) -> &mut F {
        &mut self.factory
    }
}
