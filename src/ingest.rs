//! Typed ingestion of raw caption streams.
//!
//! Each item is validated on its own. A malformed item becomes an
//! [`IngestDiagnostic`] and the rest of the stream is still read.

use serde::Serialize;
use serde_json::{Map, Value};

use crate::{
    error::{CaptionError, CaptionResult},
    formats::time::parse_time_to_ms,
    model::RawCaptionSegment,
};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IngestDiagnostic {
    pub index: usize,
    pub reason: String,
}

#[derive(Debug, Clone, Default)]
pub struct Ingested {
    pub segments: Vec<RawCaptionSegment>,
    pub diagnostics: Vec<IngestDiagnostic>,
    /// Track language declared by a wrapped document (`language` or `lang`).
    pub language: Option<String>,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum SubtitleKind {
    Srt,
    Vtt,
}

const ARRAY_KEYS: &[&str] = &["segments", "captions", "transcript", "cues"];

pub fn parse_json(input: &str) -> CaptionResult<Ingested> {
    let v: Value = serde_json::from_str(input)?;

    if let Some(items) = v.as_array() {
        return Ok(ingest_items(items));
    }

    for key in ARRAY_KEYS {
        if let Some(items) = v.get(key).and_then(Value::as_array) {
            let mut out = ingest_items(items);
            out.language = ["language", "lang"]
                .iter()
                .find_map(|k| v.get(*k).and_then(Value::as_str))
                .map(str::to_owned);
            return Ok(out);
        }
    }

    Err(CaptionError::UnrecognizedShape(
        "expected an array of captions or an object with a `segments` array".to_string(),
    ))
}

fn ingest_items(items: &[Value]) -> Ingested {
    let mut out = Ingested {
        segments: Vec::with_capacity(items.len()),
        ..Ingested::default()
    };

    for (index, item) in items.iter().enumerate() {
        match parse_item(item) {
            Ok(seg) => out.segments.push(seg),
            Err(reason) => {
                tracing::warn!(index, reason = reason.as_str(), "skipping malformed caption");
                out.diagnostics.push(IngestDiagnostic { index, reason });
            }
        }
    }

    out
}

fn parse_item(item: &Value) -> Result<RawCaptionSegment, String> {
    let obj = item
        .as_object()
        .ok_or_else(|| "caption must be an object".to_string())?;

    let start = required_time(obj, "start")?;
    let duration = match (field(obj, &["duration", "dur"]), obj.get("end")) {
        (Some(d), _) => decode_seconds(d).map_err(|e| format!("bad duration: {e}"))?,
        (None, Some(end)) => decode_seconds(end).map_err(|e| format!("bad end: {e}"))? - start,
        (None, None) => return Err("missing duration".to_string()),
    };
    if !duration.is_finite() || duration < 0.0 {
        return Err(format!("duration must be >= 0, got {duration}"));
    }

    let text = obj
        .get("text")
        .ok_or_else(|| "missing text".to_string())?
        .as_str()
        .ok_or_else(|| "text must be a string".to_string())?;

    Ok(RawCaptionSegment::new(start, duration, text))
}

fn field<'a>(obj: &'a Map<String, Value>, names: &[&str]) -> Option<&'a Value> {
    names.iter().find_map(|n| obj.get(*n))
}

fn required_time(obj: &Map<String, Value>, name: &str) -> Result<f64, String> {
    let v = obj.get(name).ok_or_else(|| format!("missing {name}"))?;
    let secs = decode_seconds(v).map_err(|e| format!("bad {name}: {e}"))?;
    if !secs.is_finite() || secs < 0.0 {
        return Err(format!("{name} must be >= 0, got {secs}"));
    }
    Ok(secs)
}

/// Numbers are seconds; strings may be numeric or `HH:MM:SS.mmm`.
fn decode_seconds(v: &Value) -> Result<f64, String> {
    match v {
        Value::Number(n) => n.as_f64().ok_or_else(|| "bad numeric time".to_string()),
        Value::String(s) => {
            let trimmed = s.trim();
            if let Ok(f) = trimmed.parse::<f64>() {
                return Ok(f);
            }
            parse_time_to_ms(trimmed)
                .map(|ms| ms as f64 / 1000.0)
                .map_err(|e| e.to_string())
        }
        _ => Err("unsupported time type".to_string()),
    }
}

pub fn parse_subtitles(raw: &str, kind: SubtitleKind) -> CaptionResult<Ingested> {
    let plain = match kind {
        SubtitleKind::Vtt => parse_vtt(raw).or_else(|| parse_srt(raw)),
        SubtitleKind::Srt => parse_srt(raw).or_else(|| parse_vtt(raw)),
    }
    .ok_or_else(|| CaptionError::Subtitle("SRT or VTT".to_string()))?;

    let segments = plain
        .events()
        .iter()
        .map(|e| {
            let start = moment_to_secs(&e.start);
            let end = moment_to_secs(&e.end);
            RawCaptionSegment::new(start, (end - start).max(0.0), e.text.clone())
        })
        .collect();

    Ok(Ingested {
        segments,
        ..Ingested::default()
    })
}

fn parse_vtt(raw: &str) -> Option<aspasia::PlainSubtitle> {
    let vtt = raw.parse::<aspasia::WebVttSubtitle>().ok()?;
    tracing::debug!("parsed as VTT via aspasia");
    Some(aspasia::PlainSubtitle::from(&vtt))
}

fn parse_srt(raw: &str) -> Option<aspasia::PlainSubtitle> {
    let srt = raw.parse::<aspasia::SubRipSubtitle>().ok()?;
    tracing::debug!("parsed as SRT via aspasia");
    Some(aspasia::PlainSubtitle::from(&srt))
}

fn moment_to_secs(m: &aspasia::Moment) -> f64 {
    let ms = ((m.hours() * 60 + m.minutes()) * 60 + m.seconds()) * 1000 + m.ms();
    ms as f64 / 1000.0
}
