use serde::{Deserialize, Serialize};

/// One caption unit as delivered upstream. Times are seconds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawCaptionSegment {
    pub start: f64,
    pub duration: f64,
    pub text: String,
}

impl RawCaptionSegment {
    pub fn new(start: f64, duration: f64, text: impl Into<String>) -> Self {
        Self {
            start,
            duration,
            text: text.into(),
        }
    }

    pub fn end(&self) -> f64 {
        self.start + self.duration
    }
}

/// A deduplicated, merged caption ready for reading and playback sync.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DisplaySegment {
    pub start: f64,
    pub duration: f64,
    pub text: String,
    /// Indices into the raw stream that were folded into this segment.
    pub source_segments: Vec<usize>,
}

impl DisplaySegment {
    pub fn end(&self) -> f64 {
        self.start + self.duration
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transcript {
    pub segments: Vec<DisplaySegment>,
    #[serde(default)]
    pub meta: Meta,
}

impl Transcript {
    pub fn new(segments: Vec<DisplaySegment>) -> Self {
        Self {
            segments,
            meta: Meta::default(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn duration_secs(&self) -> f64 {
        self.segments
            .iter()
            .map(DisplaySegment::end)
            .fold(0.0, f64::max)
    }

    pub fn plain_text(&self) -> String {
        self.segments
            .iter()
            .map(|s| s.text.as_str())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Meta {
    pub source: Option<String>,
    pub language: Option<String>,
    /// Raw items dropped at ingestion.
    #[serde(default)]
    pub skipped: usize,
}
