//! Active-segment tracking against a playback clock.

use crate::{
    error::{CaptionError, CaptionResult},
    model::DisplaySegment,
};

/// Activation targets within this many seconds of a known start are accepted.
const START_TOLERANCE_SECS: f64 = 0.001;

#[derive(Debug, Clone, PartialEq)]
pub struct ActiveSegmentChange {
    pub previous: Option<usize>,
    pub index: Option<usize>,
    /// The newly active segment, `None` when playback is before the first one.
    pub segment: Option<DisplaySegment>,
}

/// Where the player should seek after a validated segment activation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SeekRequest {
    pub index: usize,
    pub start: f64,
}

#[derive(Debug, Clone, Default)]
pub struct PlaybackIndex {
    segments: Vec<DisplaySegment>,
    current_time: f64,
    active: Option<usize>,
}

impl PlaybackIndex {
    pub fn new(segments: Vec<DisplaySegment>) -> Self {
        let mut index = Self::default();
        index.replace(segments);
        index
    }

    pub fn segments(&self) -> &[DisplaySegment] {
        &self.segments
    }

    pub fn active(&self) -> Option<usize> {
        self.active
    }

    pub fn active_segment(&self) -> Option<&DisplaySegment> {
        self.active.and_then(|i| self.segments.get(i))
    }

    pub fn current_time(&self) -> f64 {
        self.current_time
    }

    /// Swap in a new transcript and resolve the active segment from scratch.
    ///
    /// A change is reported whenever a segment is active afterwards, even at
    /// the same index, since its content may differ from the old transcript.
    pub fn replace(&mut self, segments: Vec<DisplaySegment>) -> Option<ActiveSegmentChange> {
        self.segments = segments;
        let previous = self.active.take();
        let resolved = self.locate(self.current_time);
        tracing::debug!(
            segments = self.segments.len(),
            t = self.current_time,
            active = ?resolved,
            "playback index replaced"
        );
        self.active = resolved;
        if previous.is_none() && resolved.is_none() {
            return None;
        }
        Some(self.change(previous))
    }

    pub fn on_time_update(&mut self, t: f64) -> Option<ActiveSegmentChange> {
        if !t.is_finite() {
            tracing::warn!(t, "ignoring non-finite playback time");
            return None;
        }
        self.current_time = t;

        let resolved = match self.active {
            Some(i) if self.covers(i, t) => Some(i),
            Some(i) if self.covers(i + 1, t) => Some(i + 1),
            _ => self.locate(t),
        };
        self.apply(self.active, resolved)
    }

    /// Binary search for the last segment whose start is `<= t`.
    pub fn locate(&self, t: f64) -> Option<usize> {
        self.segments
            .partition_point(|s| s.start <= t)
            .checked_sub(1)
    }

    /// Validate a user activation (e.g. a click) against the known starts.
    pub fn resolve_activation(&self, start: f64) -> CaptionResult<SeekRequest> {
        let idx = self
            .segments
            .partition_point(|s| s.start < start - START_TOLERANCE_SECS);
        match self.segments.get(idx) {
            Some(seg) if (seg.start - start).abs() <= START_TOLERANCE_SECS => Ok(SeekRequest {
                index: idx,
                start: seg.start,
            }),
            _ => Err(CaptionError::UnknownSegmentStart { start }),
        }
    }

    fn covers(&self, i: usize, t: f64) -> bool {
        let Some(seg) = self.segments.get(i) else {
            return false;
        };
        let next_start = self.segments.get(i + 1).map_or(f64::INFINITY, |n| n.start);
        seg.start <= t && t < next_start
    }

    fn apply(
        &mut self,
        previous: Option<usize>,
        resolved: Option<usize>,
    ) -> Option<ActiveSegmentChange> {
        self.active = resolved;
        if previous == resolved {
            return None;
        }
        Some(self.change(previous))
    }

    fn change(&self, previous: Option<usize>) -> ActiveSegmentChange {
        ActiveSegmentChange {
            previous,
            index: self.active,
            segment: self.active_segment().cloned(),
        }
    }
}
