use std::collections::HashMap;
use std::time::Duration;

use capsync::{
    DisplaySegment, PlaybackIndex, RawCaptionSegment, ScrollGuard, SegmentGrouper,
    grouper::group_segments, ingest, sanitize::sanitize, scroll::ManualClock,
};

fn raw(start: f64, duration: f64, text: &str) -> RawCaptionSegment {
    RawCaptionSegment::new(start, duration, text)
}

/// Rolling auto-caption windows: each segment repeats the tail of the last.
fn rolling_stream() -> Vec<RawCaptionSegment> {
    let sentences = [
        "welcome back everyone to another episode of the show",
        "today we are looking at how borrow checking works in practice",
        "and why lifetimes are less scary than they first appear",
    ];
    let mut out = Vec::new();
    let mut t = 0.0;
    for sentence in sentences {
        let words: Vec<&str> = sentence.split(' ').collect();
        for end in (3..=words.len()).step_by(2) {
            let text = format!("<c>{}</c>", words[..end].join(" "));
            out.push(raw(t, 1.8, &text));
            t += 0.9;
        }
        out.push(raw(t, 0.4, "1:23"));
        out.push(raw(t + 0.1, 0.4, "   "));
        t += 4.0;
    }
    out
}

#[test]
fn grouping_is_idempotent() {
    let stream = rolling_stream();
    let a = serde_json::to_string(&group_segments(&stream)).unwrap();
    let b = serde_json::to_string(&group_segments(&stream)).unwrap();
    assert_eq!(a, b);
}

#[test]
fn output_is_strictly_ordered_and_non_empty() {
    let out = group_segments(&rolling_stream());
    assert_eq!(out.len(), 3);
    assert!(out.windows(2).all(|w| w[0].start < w[1].start));
    assert!(out.iter().all(|d| !d.text.is_empty()));
    assert_eq!(
        out[1].text,
        "today we are looking at how borrow checking works in practice"
    );
}

#[test]
fn every_contentful_raw_segment_is_referenced_once() {
    let stream = rolling_stream();
    let out = group_segments(&stream);

    let mut seen: HashMap<usize, usize> = HashMap::new();
    for d in &out {
        for &i in &d.source_segments {
            *seen.entry(i).or_default() += 1;
        }
    }
    for (i, s) in stream.iter().enumerate() {
        let text = sanitize(&s.text);
        let contentful = !text.is_empty() && !capsync::sanitize::is_timestamp_only(&text);
        let count = seen.get(&i).copied().unwrap_or(0);
        assert_eq!(count, usize::from(contentful), "raw segment {i}: {:?}", s.text);
    }
}

#[test]
fn durations_cover_their_sources() {
    let stream = rolling_stream();
    for d in group_segments(&stream) {
        for &i in &d.source_segments {
            assert!(stream[i].start >= d.start);
            assert!(stream[i].end() <= d.end() + 1e-9);
        }
    }
}

#[test]
fn duplicate_suppression_example() {
    let out = group_segments(&[
        raw(0.0, 2.0, "hello world"),
        raw(1.0, 2.0, "hello world"),
        raw(3.0, 2.0, "world wide"),
    ]);
    assert_eq!(out.len(), 2);
    assert_eq!((out[0].start, out[0].text.as_str()), (0.0, "hello world"));
    assert_eq!(out[1].start, 3.0);
    assert!(out[1].text.ends_with("wide"));
    assert!(out.iter().all(|d| !d.text.contains("hello world hello world")));
}

#[test]
fn timestamp_only_segments_are_never_sources() {
    let out = group_segments(&[
        raw(0.0, 1.0, "1:23"),
        raw(0.5, 1.0, "some caption text"),
        raw(1.0, 1.0, "[01:23:45]"),
    ]);
    let sources: Vec<usize> = out.iter().flat_map(|d| d.source_segments.clone()).collect();
    assert_eq!(sources, vec![1]);
}

#[test]
fn ingest_then_group_skips_bad_items() {
    let ingested = ingest::parse_json(
        r#"{"segments": [
            {"start": 0.0, "duration": 1.5, "text": "first caption here"},
            {"start": "x", "duration": 1.0, "text": "broken"},
            {"start": 0.8, "duration": 1.5, "text": "first caption here and more"}
        ]}"#,
    )
    .unwrap();
    assert_eq!(ingested.diagnostics.len(), 1);

    let out = SegmentGrouper::default().group(&ingested.segments);
    assert_eq!(out.len(), 1);
    assert_eq!(out[0].text, "first caption here and more");
}

#[test]
fn playback_follows_grouped_transcript() {
    let segments: Vec<DisplaySegment> = group_segments(&rolling_stream());
    let starts: Vec<f64> = segments.iter().map(|s| s.start).collect();
    let mut index = PlaybackIndex::new(segments);

    index.on_time_update(starts[1] + 0.5);
    assert_eq!(index.active(), Some(1));
    index.on_time_update(1_000.0);
    assert_eq!(index.active(), Some(2));
    index.on_time_update(0.0);
    assert_eq!(index.active(), Some(0));
}

#[test]
fn scroll_guard_recovers_after_cooldown() {
    let clock = ManualClock::default();
    let mut guard = ScrollGuard::new(clock.clone(), Duration::from_secs(4));
    guard.notify_manual_scroll();
    assert!(guard.is_suppressed());
    clock.advance(Duration::from_secs(4));
    assert!(!guard.is_suppressed());
}
