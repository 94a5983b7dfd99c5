//! Whole-stream merge pipeline.
//!
//! Runs a complete event stream through the [`SkeletonWriter`] and collects the rebuilt
//! document, in memory or on disk. Optionally the stream is simplified first, which is how a
//! consumer that writes one event at a time would see it.
//!
//! For event-by-event control, drive [`SkeletonWriter`] (and [`SkeletonSimplifier`]) directly.

use crate::encoder::EncoderOptions;
use crate::error::{SimplifyError, WriterError};
use crate::model::Event;
use crate::simplifier::SkeletonSimplifier;
use crate::writer::{OutputOptions, SkeletonWriter};
use std::borrow::Cow;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum MergeError {
    #[error(transparent)]
    Writer(#[from] WriterError),
    #[error(transparent)]
    Simplify(#[from] SimplifyError),
    #[error("cannot write {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Specifies how to merge an event stream.
///
/// ```ignore
/// let spec = MergeSpec::new(&events, OutputOptions::new(LocaleId::new("fr")))
///     .simplified()
///     .with_output_path("out.html");
/// ```
#[derive(Debug)]
pub struct MergeSpec<'a> {
    pub events: &'a [Event],
    pub options: OutputOptions,
    /// Run the stream through the simplifier before writing.
    pub simplify: bool,
    /// Write the document here instead of returning it.
    pub output: Option<PathBuf>,
}

impl<'a> MergeSpec<'a> {
    pub fn new(events: &'a [Event], options: OutputOptions) -> Self {
        Self {
            events,
            options,
            simplify: false,
            output: None,
        }
    }

    pub fn simplified(mut self) -> Self {
        self.simplify = true;
        self
    }

    pub fn with_output_path(mut self, path: impl AsRef<Path>) -> Self {
        self.output = Some(path.as_ref().to_path_buf());
        self
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum MergeArtifact {
    InMemory(String),
    File(PathBuf),
}

#[derive(Debug, Clone, PartialEq)]
pub struct MergeResult {
    pub artifact: MergeArtifact,
    /// Number of events the writer received.
    pub events: usize,
}

/// Rebuilds the document described by `spec.events`.
///
/// # Errors
///
/// Returns [`MergeError`] on a writer or simplifier contract error, or when the output file
/// cannot be written. Unresolvable markers are not errors: they show up as tokens in the text.
pub fn merge(spec: MergeSpec<'_>) -> Result<MergeResult, MergeError> {
    let events: Cow<'_, [Event]> = if spec.simplify {
        let mut simplifier =
            SkeletonSimplifier::new(spec.options.locale.clone(), spec.options.encoding.clone())
                .with_referent_copies(spec.options.referent_copies);
        if let Some(encoders) = spec.options.encoders.clone() {
            simplifier = simplifier.with_encoders(encoders);
        }
        Cow::Owned(simplifier.simplify_all(spec.events.iter().cloned())?)
    } else {
        Cow::Borrowed(spec.events)
    };

    let mut writer = SkeletonWriter::new(spec.options);
    let mut text = String::new();
    for event in events.iter() {
        text.push_str(&writer.process(event)?);
    }
    log::debug!("merged {} event(s) into {} byte(s)", events.len(), text.len());

    let artifact = match spec.output {
        Some(path) => {
            let bytes = to_output_bytes(&text, writer.output_encoding());
            fs::write(&path, bytes).map_err(|source| MergeError::Io {
                path: path.clone(),
                source,
            })?;
            MergeArtifact::File(path)
        }
        None => MergeArtifact::InMemory(text),
    };
    Ok(MergeResult {
        artifact,
        events: events.len(),
    })
}

/// Single-byte encodings are written byte per character, anything else as UTF-8.
fn to_output_bytes(text: &str, encoding: &str) -> Vec<u8> {
    let options = EncoderOptions {
        encoding: encoding.to_string(),
        ..EncoderOptions::default()
    };
    match options.max_code_point() {
        None => text.as_bytes().to_vec(),
        Some(max) => text
            .chars()
            .map(|ch| if ch as u32 <= max { ch as u32 as u8 } else { b'?' })
            .collect(),
    }
}
