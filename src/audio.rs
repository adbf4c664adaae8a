use crate::constants::PLAY_REJECTED_EVENT;
use crate::core::{AudioGraph, FileInfo, GraphFactory, MediaHost, MediaInput};
use crate::error::{Result, VisualizerError};
use std::cell::Cell;
use std::rc::Rc;
use wasm_bindgen_futures::JsFuture;
use web_sys as web;

fn platform(label: &str, e: wasm_bindgen::JsValue) -> VisualizerError {
    log::error!("{} error: {:?}", label, e);
    VisualizerError::Platform(format!("{label}: {e:?}"))
}

/// Set once the page has seen a user gesture; browsers keep audio locked until then.
#[derive(Clone, Default)]
pub struct GestureLatch(Rc<Cell<bool>>);

impl GestureLatch {
    pub fn mark(&self) {
        self.0.set(true);
    }

    pub fn is_set(&self) -> bool {
        self.0.get()
    }
}

/// Lazily created audio context shared by every graph of the session.
pub struct WebAudio {
    ctx: Option<web::AudioContext>,
    gesture: GestureLatch,
}

impl WebAudio {
    pub fn new(gesture: GestureLatch) -> Self {
        Self { ctx: None, gesture }
    }

    fn context(&mut self) -> Result<web::AudioContext> {
        if let Some(ctx) = &self.ctx {
            self.resume();
            return Ok(ctx.clone());
        }
        if !self.gesture.is_set() {
            return Err(VisualizerError::AudioContextUnavailable);
        }
        let ctx = web::AudioContext::new().map_err(|e| {
            log::error!("AudioContext error: {:?}", e);
            VisualizerError::AudioContextUnavailable
        })?;
        _ = ctx.resume();
        log::info!("[audio] context created at {} Hz", ctx.sample_rate());
        self.ctx = Some(ctx.clone());
        Ok(ctx)
    }

    /// Resume a context the browser suspended before the first gesture.
    pub fn resume(&self) {
        if let Some(ctx) = &self.ctx {
            if ctx.state() == web::AudioContextState::Suspended {
                _ = ctx.resume();
            }
        }
    }
}

pub struct WebGraph {
    source: web::MediaElementAudioSourceNode,
    analyser: web::AnalyserNode,
}

impl AudioGraph for WebGraph {
    fn set_fft_size(&mut self, transform_size: u32) {
        self.analyser.set_fft_size(transform_size);
    }

    fn read_frequency(&self, out: &mut [u8]) {
        self.analyser.get_byte_frequency_data(out);
    }

    fn read_time_domain(&self, out: &mut [u8]) {
        self.analyser.get_byte_time_domain_data(out);
    }

    fn disconnect(&mut self) {
        _ = self.source.disconnect();
        _ = self.analyser.disconnect();
    }
}

impl GraphFactory for WebAudio {
    type Source = web::HtmlAudioElement;
    type Graph = WebGraph;

    // element -> analyser -> destination
    fn connect(&mut self, source: &Self::Source, transform_size: u32) -> Result<WebGraph> {
        let ctx = self.context()?;
        let analyser = web::AnalyserNode::new(&ctx).map_err(|e| platform("AnalyserNode", e))?;
        analyser.set_fft_size(transform_size);
        let node = ctx
            .create_media_element_source(source)
            .map_err(|e| platform("MediaElementAudioSourceNode", e))?;
        node.connect_with_audio_node(&analyser)
            .map_err(|e| platform("connect source", e))?;
        analyser
            .connect_with_audio_node(&ctx.destination())
            .map_err(|e| platform("connect analyser", e))?;
        Ok(WebGraph {
            source: node,
            analyser,
        })
    }
}

/// `<audio>` elements created per source. Object URLs minted for local files
/// are revoked when their element is released.
#[derive(Default)]
pub struct WebMedia {
    object_urls: Vec<(web::HtmlAudioElement, String)>,
}

impl MediaHost for WebMedia {
    type Element = web::HtmlAudioElement;
    type File = web::File;

    fn file_info(&self, file: &web::File) -> FileInfo {
        FileInfo {
            mime: file.type_(),
            name: file.name(),
        }
    }

    fn create(&mut self, input: &MediaInput<web::File>) -> Result<web::HtmlAudioElement> {
        let element = web::HtmlAudioElement::new().map_err(|e| platform("HtmlAudioElement", e))?;
        match input {
            MediaInput::Url(url) => {
                // Remote audio is only analysable when fetched with CORS.
                if !url.starts_with("data:") && !url.starts_with("blob:") {
                    element.set_cross_origin(Some("anonymous"));
                }
                element.set_src(url);
            }
            MediaInput::File(file) => {
                let mime = file.type_();
                if !mime.is_empty() && element.can_play_type(&mime).is_empty() {
                    return Err(VisualizerError::UnsupportedMedia(format!(
                        "{} ({mime})",
                        file.name()
                    )));
                }
                let url = web::Url::create_object_url_with_blob(file)
                    .map_err(|e| platform("createObjectURL", e))?;
                element.set_src(&url);
                self.object_urls.push((element.clone(), url));
            }
        }
        element.set_preload("auto");
        Ok(element)
    }

    fn play(&mut self, element: &web::HtmlAudioElement) -> Result<()> {
        let promise = element.play().map_err(|e| platform("play", e))?;
        let element = element.clone();
        wasm_bindgen_futures::spawn_local(async move {
            if let Err(e) = JsFuture::from(promise).await {
                log::warn!("[media] play() rejected: {:?}", e);
                // Hand the rejection back to the visualizer through the element.
                if let Ok(ev) = web::Event::new(PLAY_REJECTED_EVENT) {
                    _ = element.dispatch_event(&ev);
                }
            }
        });
        Ok(())
    }

    fn pause(&mut self, element: &web::HtmlAudioElement) {
        _ = element.pause();
    }

    fn release(&mut self, element: &web::HtmlAudioElement) {
        _ = element.remove_attribute("src");
        element.load();
        if let Some(pos) = self.object_urls.iter().position(|(el, _)| el == element) {
            let (_, url) = self.object_urls.swap_remove(pos);
            _ = web::Url::revoke_object_url(&url);
        }
    }
}
