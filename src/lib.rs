#![forbid(unsafe_code)]

pub mod config;
pub mod error;
pub mod formats;
pub mod grouper;
pub mod ingest;
pub mod merge;
pub mod model;
pub mod overlap;
pub mod playback;
pub mod sanitize;
pub mod scroll;
pub mod session;

pub use error::{CaptionError, CaptionResult};
pub use grouper::{GroupingPolicy, SegmentGrouper};
pub use model::{DisplaySegment, RawCaptionSegment, Transcript};
pub use playback::{ActiveSegmentChange, PlaybackIndex, SeekRequest};
pub use scroll::ScrollGuard;
pub use session::{SessionObserver, SyncSession};
