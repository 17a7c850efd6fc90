//! Raw caption stream to display segments.
//!
//! Rolling auto-captions repeat the tail of the previous window in every new
//! segment. [`SegmentGrouper`] makes a single forward pass, dropping pure
//! repeats, stitching continuations onto the open group and starting a new
//! group on a time gap or a change of content.

use serde::{Deserialize, Serialize};

use crate::{
    merge::{collapse_self_repeat, combine_with},
    model::{DisplaySegment, RawCaptionSegment},
    overlap::OverlapPolicy,
    sanitize::{is_timestamp_only, sanitize},
};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GroupingPolicy {
    /// Silence longer than this between raw segments always splits.
    pub max_gap_secs: f64,
    /// Suffix/prefix overlap must exceed this many chars to stitch.
    pub min_stitch_len: usize,
    pub overlap: OverlapPolicy,
}

impl Default for GroupingPolicy {
    fn default() -> Self {
        Self {
            max_gap_secs: 2.0,
            min_stitch_len: 3,
            overlap: OverlapPolicy::default(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct GroupingStats {
    pub raw: usize,
    pub discarded_empty: usize,
    pub discarded_timestamp: usize,
    pub duplicates: usize,
    pub merged: usize,
    pub groups: usize,
}

#[derive(Debug, Clone, Default)]
pub struct SegmentGrouper {
    policy: GroupingPolicy,
}

impl SegmentGrouper {
    pub fn new(policy: GroupingPolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> &GroupingPolicy {
        &self.policy
    }

    pub fn group(&self, raw: &[RawCaptionSegment]) -> Vec<DisplaySegment> {
        self.group_with_stats(raw).0
    }

    pub fn group_with_stats(
        &self,
        raw: &[RawCaptionSegment],
    ) -> (Vec<DisplaySegment>, GroupingStats) {
        let mut order: Vec<usize> = (0..raw.len()).collect();
        if raw.windows(2).any(|w| w[1].start < w[0].start) {
            tracing::warn!("raw captions are not ordered by start; re-sorting");
            order.sort_by(|&a, &b| raw[a].start.total_cmp(&raw[b].start));
        }

        let mut pass = GroupingPass::new(&self.policy);
        for idx in order {
            pass.push(idx, &raw[idx]);
        }
        pass.finish()
    }
}

fn absorb_duration(group: &mut DisplaySegment, s: &RawCaptionSegment) {
    let covered = s.end() - group.start;
    if covered > group.duration {
        group.duration = covered;
    }
}

/// State of one grouping run: the open group and the last text kept.
struct GroupingPass<'p> {
    policy: &'p GroupingPolicy,
    current: Option<DisplaySegment>,
    last_unique_text: String,
    last_end: Option<f64>,
    out: Vec<DisplaySegment>,
    stats: GroupingStats,
}

impl<'p> GroupingPass<'p> {
    fn new(policy: &'p GroupingPolicy) -> Self {
        Self {
            policy,
            current: None,
            last_unique_text: String::new(),
            last_end: None,
            out: Vec::new(),
            stats: GroupingStats::default(),
        }
    }

    fn push(&mut self, idx: usize, s: &RawCaptionSegment) {
        self.stats.raw += 1;

        let text = sanitize(&s.text);
        if text.is_empty() {
            self.stats.discarded_empty += 1;
            return;
        }
        if is_timestamp_only(&text) {
            tracing::debug!(idx, text = text.as_str(), "dropping timestamp-only caption");
            self.stats.discarded_timestamp += 1;
            return;
        }

        let gap = self.last_end.map(|end| s.start - end);
        self.last_end = Some(self.last_end.map_or(s.end(), |end| end.max(s.end())));

        if let Some(group) = self.current.as_mut() {
            let repeated = text == self.last_unique_text
                || (!self.last_unique_text.is_empty() && self.last_unique_text.contains(&text));
            if repeated {
                absorb_duration(group, s);
                group.source_segments.push(idx);
                self.stats.duplicates += 1;
                return;
            }
        }

        let same_instant = self
            .current
            .as_ref()
            .is_some_and(|g| s.start <= g.start);
        let split = match &self.current {
            None => true,
            Some(_) if same_instant => false,
            Some(_) => {
                gap.is_some_and(|g| g > self.policy.max_gap_secs)
                    || !self
                        .policy
                        .overlap
                        .has_significant_overlap(&text, &self.last_unique_text)
            }
        };

        if split {
            self.close();
            tracing::debug!(idx, start = s.start, "opening display segment");
            self.last_unique_text.clone_from(&text);
            self.current = Some(DisplaySegment {
                start: s.start,
                duration: s.duration,
                text,
                source_segments: vec![idx],
            });
            return;
        }

        let Some(group) = self.current.as_mut() else {
            return;
        };
        let combined = combine_with(&group.text, &text, self.policy.min_stitch_len);
        group.source_segments.push(idx);
        if combined == group.text {
            absorb_duration(group, s);
            self.stats.duplicates += 1;
            return;
        }

        group.duration = (s.end() - group.start).max(group.duration);
        self.last_unique_text.clone_from(&combined);
        group.text = combined;
        self.stats.merged += 1;
    }

    fn close(&mut self) {
        if let Some(mut segment) = self.current.take() {
            let collapsed = collapse_self_repeat(&segment.text);
            if collapsed.len() != segment.text.len() {
                segment.text = collapsed.to_string();
            }
            self.out.push(segment);
        }
    }

    fn finish(mut self) -> (Vec<DisplaySegment>, GroupingStats) {
        self.close();
        self.stats.groups = self.out.len();
        tracing::debug!(
            raw = self.stats.raw,
            groups = self.stats.groups,
            duplicates = self.stats.duplicates,
            merged = self.stats.merged,
            "grouping finished"
        );
        (self.out, self.stats)
    }
}

/// Group with the default policy.
pub fn group_segments(raw: &[RawCaptionSegment]) -> Vec<DisplaySegment> {
    SegmentGrouper::default().group(raw)
}
