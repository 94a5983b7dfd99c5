//! Skeleton reconstruction for localization filters
//!
//!     A filter that extracts translatable text from a document keeps everything else (markup,
//!     whitespace, property values, binary wrappers) as a skeleton: an ordered template with
//!     embedded reference markers. This crate owns that template model and the algorithms that
//!     turn a stream of filter events back into a byte-faithful document with translated content
//!     substituted in.
//!
//!     This is a pure lib, that is, it powers the tkit-cli but is shell agnostic: no code here
//!     prints, reads env vars or touches files, except the explicit output path of [`merge`].
//!
//! Architecture
//!
//!     Events flow one at a time from a filter into the [`SkeletonWriter`]. Resources flagged as
//!     referents are not written at their own position but parked in a referent cache, to be
//!     pulled in later by a marker inside some other skeleton. Whole nested scopes (groups,
//!     sub-filtered regions) that must be pulled in later are materialized in group buffers first.
//!
//!     The [`SkeletonSimplifier`] is the offline counterpart: it rewrites an event whose skeleton
//!     points at other resources into a flat sequence of self-contained events, so a consumer that
//!     only ever sees one event at a time can still write the document.
//!
//!     The file structure :
//!     .
//!     ├── error.rs                # Contract errors and the visible resolution error tokens
//!     ├── locale.rs               # Normalized locale identifiers
//!     ├── model                   # Resources, events and text containers
//!     ├── skeleton                # Skeleton parts, the marker grammar and the part classifier
//!     ├── encoder.rs              # Per MIME type output encoders
//!     ├── layer.rs                # Bilingual layer provider
//!     ├── writer                  # The streaming skeleton writer
//!     │   ├── referents.rs        # Referent cache
//!     │   ├── storage.rs          # Group buffers
//!     │   ├── content.rs          # Marker resolution and content rendering
//!     │   └── subfilter.rs        # Nested writer for sub-filtered regions
//!     ├── simplifier.rs           # Flattens cross references into independent events
//!     └── merge.rs                # Whole-stream driver writing to memory or disk
//!
//! Marker grammar
//!
//!     A reference marker is `[#$` + id + optional (`@%` + property name) + `]`. The id `$self$`
//!     points at the resource owning the skeleton part; the property name `$segment$` turns the
//!     marker into a reference to one segment of that resource. See [`skeleton::marker`].
//!
//! Testing
//!     tests
//!     ├── lib.rs
//!     ├── writer
//!     └── simplifier
//!
//!     Rust does not by default discover tests in subdirectories, so tests/lib.rs includes them.

pub mod encoder;
pub mod error;
pub mod layer;
pub mod locale;
pub mod merge;
pub mod model;
pub mod simplifier;
pub mod skeleton;
pub mod writer;

pub use encoder::{Encoder, EncoderContext, EncoderManager};
pub use error::{ResolveError, SimplifyError, WriterError};
pub use layer::{BilingualLayer, LayerProvider};
pub use locale::LocaleId;
pub use merge::{merge, MergeArtifact, MergeError, MergeResult, MergeSpec};
pub use model::{
    DocumentPart, Ending, Event, Properties, ResourceRef, StartDocument, StartGroup,
    StartSubDocument, TextContainer, TextFragment, TextUnit,
};
pub use simplifier::{simplify_events, SkeletonSimplifier};
pub use skeleton::{Skeleton, SkeletonPart};
pub use writer::{OutputOptions, SkeletonWriter};
