//! Wiring between the playback index, the scroll guard and the UI collaborators.
//!
//! The session owns no player. Time ticks, manual-scroll signals and
//! activation clicks are pushed in; highlight, scroll and seek requests go out
//! through a [`SessionObserver`].

use std::time::Duration;

use crate::{
    error::CaptionResult,
    grouper::SegmentGrouper,
    model::{DisplaySegment, RawCaptionSegment},
    playback::{ActiveSegmentChange, PlaybackIndex, SeekRequest},
    scroll::{Clock, ScrollGuard, SystemClock},
};

pub trait SessionObserver {
    /// Every active-segment change, including a change to "none".
    fn highlight(&mut self, _change: &ActiveSegmentChange) {}

    /// Bring the active segment into view. Skipped while the user is scrolling.
    fn scroll_to(&mut self, _index: usize, _segment: &DisplaySegment) {}

    /// Forward a validated activation to the player.
    fn seek(&mut self, _request: SeekRequest) {}
}

pub struct SyncSession<O, C: Clock = SystemClock> {
    grouper: SegmentGrouper,
    index: PlaybackIndex,
    guard: ScrollGuard<C>,
    observer: O,
}

impl<O: SessionObserver> SyncSession<O, SystemClock> {
    pub fn new(grouper: SegmentGrouper, observer: O) -> Self {
        Self::with_clock(grouper, observer, SystemClock, crate::scroll::DEFAULT_COOLDOWN)
    }
}

impl<O: SessionObserver, C: Clock> SyncSession<O, C> {
    pub fn with_clock(grouper: SegmentGrouper, observer: O, clock: C, cooldown: Duration) -> Self {
        Self {
            grouper,
            index: PlaybackIndex::default(),
            guard: ScrollGuard::new(clock, cooldown),
            observer,
        }
    }

    /// Regroup a full raw stream and resync the active segment.
    pub fn load(&mut self, raw: &[RawCaptionSegment]) -> &[DisplaySegment] {
        let segments = self.grouper.group(raw);
        tracing::info!(raw = raw.len(), segments = segments.len(), "transcript loaded");
        if let Some(change) = self.index.replace(segments) {
            self.dispatch(&change);
        }
        self.index.segments()
    }

    pub fn tick(&mut self, t: f64) -> Option<ActiveSegmentChange> {
        let change = self.index.on_time_update(t)?;
        self.dispatch(&change);
        Some(change)
    }

    pub fn manual_scroll(&mut self) {
        self.guard.notify_manual_scroll();
    }

    pub fn activate(&mut self, start: f64) -> CaptionResult<SeekRequest> {
        let request = self.index.resolve_activation(start)?;
        self.observer.seek(request);
        Ok(request)
    }

    pub fn segments(&self) -> &[DisplaySegment] {
        self.index.segments()
    }

    pub fn index(&self) -> &PlaybackIndex {
        &self.index
    }

    pub fn guard(&self) -> &ScrollGuard<C> {
        &self.guard
    }

    pub fn observer(&self) -> &O {
        &self.observer
    }

    pub fn into_observer(self) -> O {
        self.observer
    }

    fn dispatch(&mut self, change: &ActiveSegmentChange) {
        self.observer.highlight(change);

        let (Some(index), Some(segment)) = (change.index, change.segment.as_ref()) else {
            return;
        };
        if self.guard.is_suppressed() {
            tracing::debug!(
                index,
                remaining_ms = self.guard.remaining().as_millis() as u64,
                "auto-scroll suppressed"
            );
            return;
        }
        self.observer.scroll_to(index, segment);
    }
}
