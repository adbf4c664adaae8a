use super::analysis::{FrequencyAnalyzer, GraphFactory};
use crate::error::{Result, VisualizerError};

/// A playable source selected by the user or handed over by a collaborator.
#[derive(Clone, Debug, PartialEq)]
pub enum MediaInput<F> {
    Url(String),
    File(F),
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FileInfo {
    pub mime: String,
    pub name: String,
}

/// Creates and controls playable media elements.
pub trait MediaHost {
    type Element: Clone + PartialEq;
    type File: Clone;

    fn file_info(&self, file: &Self::File) -> FileInfo;
    fn create(&mut self, input: &MediaInput<Self::File>) -> Result<Self::Element>;
    fn play(&mut self, element: &Self::Element) -> Result<()>;
    fn pause(&mut self, element: &Self::Element);
    /// Drop the element's media resource. It is never played again.
    fn release(&mut self, element: &Self::Element);
}

const AUDIO_EXTENSIONS: &[&str] = &[
    "mp3", "wav", "wave", "ogg", "oga", "opus", "flac", "aac", "m4a", "mp4", "webm", "weba",
];

// Extensions that are certainly not decodable audio.
const NON_AUDIO_EXTENSIONS: &[&str] = &[
    "png", "jpg", "jpeg", "gif", "bmp", "svg", "webp", "ico", "txt", "pdf", "doc", "docx", "html",
    "htm", "json", "xml", "csv", "zip", "gz", "tar", "rar", "7z", "exe", "js", "css",
];

// Containers that commonly carry an audio track.
const AUDIO_CONTAINER_MIMES: &[&str] = &["video/mp4", "video/webm", "video/ogg", "application/ogg"];

fn extension(path: &str) -> Option<String> {
    let last = path.rsplit('/').next().unwrap_or(path);
    let (_, ext) = last.rsplit_once('.')?;
    if ext.is_empty() {
        return None;
    }
    Some(ext.to_ascii_lowercase())
}

/// Check a local file by MIME type, falling back to its extension when the
/// browser reports no type.
pub fn check_file(info: &FileInfo) -> Result<()> {
    let mime = info.mime.to_ascii_lowercase();
    if mime.starts_with("audio/") || AUDIO_CONTAINER_MIMES.contains(&mime.as_str()) {
        return Ok(());
    }
    let by_name = extension(&info.name)
        .map(|ext| AUDIO_EXTENSIONS.contains(&ext.as_str()))
        .unwrap_or(false);
    if mime.is_empty() && by_name {
        return Ok(());
    }
    Err(VisualizerError::UnsupportedMedia(format!(
        "{} ({})",
        info.name,
        if mime.is_empty() { "unknown type" } else { &mime }
    )))
}

/// Check a URL. Preview URLs often carry no extension and are accepted; only
/// extensions known to be non-audio are rejected.
pub fn check_url(url: &str) -> Result<()> {
    let trimmed = url.trim();
    if trimmed.is_empty() {
        return Err(VisualizerError::UnsupportedMedia("empty url".into()));
    }
    if let Some(rest) = trimmed.strip_prefix("data:") {
        let mime = rest.split([';', ',']).next().unwrap_or("");
        return check_file(&FileInfo {
            mime: mime.to_string(),
            name: String::new(),
        });
    }
    let path = trimmed.split(['?', '#']).next().unwrap_or(trimmed);
    match extension(path) {
        Some(ext) if NON_AUDIO_EXTENSIONS.contains(&ext.as_str()) => Err(
            VisualizerError::UnsupportedMedia(format!("{trimmed} (.{ext})")),
        ),
        _ => Ok(()),
    }
}

/// Owns the currently bound media element and rebuilds the analysis graph
/// whenever the source changes.
pub struct SourceBinding<M: MediaHost> {
    host: M,
    current: Option<M::Element>,
}

impl<M: MediaHost> SourceBinding<M> {
    pub fn new(host: M) -> Self {
        Self {
            host,
            current: None,
        }
    }

    /// Validate `input`, tear down the previous element and graph, and attach
    /// the new element to `analyzer`.
    ///
    /// A rejected input leaves the current binding untouched.
    pub fn bind<F>(
        &mut self,
        analyzer: &mut FrequencyAnalyzer<F>,
        input: MediaInput<M::File>,
    ) -> Result<M::Element>
    where
        F: GraphFactory<Source = M::Element>,
    {
        match &input {
            MediaInput::Url(url) => check_url(url)?,
            MediaInput::File(file) => check_file(&self.host.file_info(file))?,
        }
        let element = self.host.create(&input)?;

        self.unbind(analyzer);

        if let Err(e) = analyzer.attach(&element) {
            log::warn!("[binding] attach failed: {}", e);
            self.host.release(&element);
            return Err(e);
        }
        log::info!("[binding] bound {}", describe(&input, &self.host));
        self.current = Some(element.clone());
        Ok(element)
    }

    /// Stop analysis and release the current element, if any.
    pub fn unbind<F>(&mut self, analyzer: &mut FrequencyAnalyzer<F>)
    where
        F: GraphFactory<Source = M::Element>,
    {
        analyzer.detach();
        if let Some(prev) = self.current.take() {
            self.host.pause(&prev);
            self.host.release(&prev);
        }
    }

    pub fn current(&self) -> Option<&M::Element> {
        self.current.as_ref()
    }

    pub fn is_current(&self, element: &M::Element) -> bool {
        self.current.as_ref() == Some(element)
    }

    pub fn host_mut(&mut self) -> &mut M {
        &mut self.host
    }
}

fn describe<M: MediaHost>(input: &MediaInput<M::File>, host: &M) -> String {
    match input {
        MediaInput::Url(url) if url.starts_with("data:") => "data url".to_string(),
        MediaInput::Url(url) => url.clone(),
        MediaInput::File(file) => host.file_info(file).name,
    }
}
