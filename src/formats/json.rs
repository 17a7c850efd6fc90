use serde::Serialize;

use crate::{
    config::JsonCfg,
    error::CaptionResult,
    model::{DisplaySegment, Transcript},
};

pub const SCHEMA: &str = "capsync.display_segments";

#[derive(Debug, Serialize)]
struct WrappedJson<'a> {
    schema: &'static str,
    version: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    source: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    language: Option<&'a str>,
    skipped: usize,
    segments: Vec<JsonSegment<'a>>,
}

#[derive(Debug, Serialize)]
struct JsonSegment<'a> {
    start: f64,
    duration: f64,
    end: f64,
    text: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    source_segments: Option<&'a [usize]>,
}

impl<'a> JsonSegment<'a> {
    fn new(s: &'a DisplaySegment, include_sources: bool) -> Self {
        Self {
            start: s.start,
            duration: s.duration,
            end: s.end(),
            text: &s.text,
            source_segments: include_sources.then_some(s.source_segments.as_slice()),
        }
    }
}

pub fn write_json(t: &Transcript, cfg: &JsonCfg) -> CaptionResult<String> {
    let segments: Vec<JsonSegment<'_>> = t
        .segments
        .iter()
        .map(|s| JsonSegment::new(s, cfg.include_sources))
        .collect();

    if cfg.wrapped {
        let w = WrappedJson {
            schema: SCHEMA,
            version: 1,
            source: t.meta.source.as_deref(),
            language: t.meta.language.as_deref(),
            skipped: t.meta.skipped,
            segments,
        };
        Ok(serde_json::to_string_pretty(&w)?)
    } else {
        Ok(serde_json::to_string_pretty(&segments)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;

    fn transcript() -> Transcript {
        Transcript::new(vec![DisplaySegment {
            start: 1.0,
            duration: 2.5,
            text: "hello world".to_owned(),
            source_segments: vec![0, 1],
        }])
    }

    #[test]
    fn wrapped_output_carries_schema() {
        let out = write_json(&transcript(), &JsonCfg::default()).unwrap();
        let v: Value = serde_json::from_str(&out).unwrap();
        assert_eq!(v["schema"], SCHEMA);
        assert_eq!(v["segments"][0]["end"], 3.5);
        assert_eq!(v["segments"][0]["source_segments"][1], 1);
        assert!(v.get("language").is_none());

        let mut t = transcript();
        t.meta.language = Some("de".to_owned());
        let v: Value =
            serde_json::from_str(&write_json(&t, &JsonCfg::default()).unwrap()).unwrap();
        assert_eq!(v["language"], "de");
    }

    #[test]
    fn bare_output_without_sources() {
        let cfg = JsonCfg {
            wrapped: false,
            include_sources: false,
        };
        let v: Value = serde_json::from_str(&write_json(&transcript(), &cfg).unwrap()).unwrap();
        assert!(v.is_array());
        assert!(v[0].get("source_segments").is_none());
    }
}
