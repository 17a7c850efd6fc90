//! Caption text cleanup.
//!
//! Auto-generated captions (YouTube's rolling VTT in particular) carry inline
//! word timings like `<00:00:01.234>`, styling tags such as `<c.colorE5E5E5>` and
//! HTML entities. [`sanitize`] reduces all of that to plain, single-spaced text.

use once_cell::sync::Lazy;
use regex::Regex;

static TIMING_MARKER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"<\d{1,2}:\d{2}:\d{2}(?:\.\d{1,3})?>").expect("timing marker regex"));

static MARKUP_TAG: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"</?[A-Za-z][A-Za-z0-9]*(?:\.[^\s<>]*)?(?:\s[^<>]*)?/?>").expect("markup tag regex")
});

static ANGLE_SPAN: Lazy<Regex> = Lazy::new(|| Regex::new(r"<[^<>]*>").expect("angle span regex"));

static WHITESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("whitespace regex"));

static TIMESTAMP_ONLY: Lazy<Regex> = Lazy::new(|| {
    let t = r"(?:\d{1,2}:[0-5]\d:[0-5]\d|\d{1,3}:[0-5]\d)";
    Regex::new(&format!(r"^(?:{t}|\[\s*{t}\s*\]|\(\s*{t}\s*\))$")).expect("timestamp regex")
});

const ENTITIES: &[(&str, &str)] = &[
    ("&nbsp;", " "),
    ("&lt;", "<"),
    ("&gt;", ">"),
    ("&quot;", "\""),
    ("&#39;", "'"),
    ("&apos;", "'"),
    ("&amp;", "&"),
];

/// Strip markup and timing artifacts, decode entities, collapse whitespace.
pub fn sanitize(raw: &str) -> String {
    let s = TIMING_MARKER.replace_all(raw, "");
    let s = MARKUP_TAG.replace_all(&s, "");
    let s = ANGLE_SPAN.replace_all(&s, "");
    let s = decode_entities(&s);
    WHITESPACE.replace_all(&s, " ").trim().to_string()
}

/// True for captions that are nothing but a rendered clock (`1:23`, `[01:23:45]`, `(0:05)`).
pub fn is_timestamp_only(text: &str) -> bool {
    TIMESTAMP_ONLY.is_match(text.trim())
}

fn decode_entities(s: &str) -> String {
    if !s.contains('&') {
        return s.to_string();
    }
    // &amp; is last so "&amp;lt;" decodes to "&lt;", not "<".
    ENTITIES
        .iter()
        .fold(s.to_string(), |acc, (from, to)| acc.replace(from, to))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_inline_timing_and_styling() {
        let raw = "so<00:00:01.120><c> today</c><00:00:01.480><c> we're</c>";
        assert_eq!(sanitize(raw), "so today we're");
    }

    #[test]
    fn strips_tags_with_attributes() {
        assert_eq!(
            sanitize(r##"<font color="#ffffff">hello</font>   <i>there</i>"##),
            "hello there"
        );
        assert_eq!(sanitize("<c.colorE5E5E5>grey</c>"), "grey");
    }

    #[test]
    fn removes_leftover_angle_spans() {
        assert_eq!(sanitize("a <123 weird> b"), "a b");
    }

    #[test]
    fn malformed_markup_is_left_partially() {
        assert_eq!(sanitize("unclosed <b text"), "unclosed <b text");
    }

    #[test]
    fn collapses_whitespace_and_trims() {
        assert_eq!(sanitize("  one\n\ttwo   three  "), "one two three");
        assert_eq!(sanitize("   "), "");
    }

    #[test]
    fn decodes_common_entities() {
        assert_eq!(sanitize("it&#39;s rock &amp; roll"), "it's rock & roll");
        assert_eq!(sanitize("&amp;lt;"), "&lt;");
    }

    #[test]
    fn timestamp_only_renderings() {
        for t in ["1:23", "12:05", "1:02:03", "[01:23:45]", "(0:05)", " [ 3:10 ] "] {
            assert!(is_timestamp_only(t), "{t}");
        }
        for t in ["1:23 intro", "1:75", "hello", "[music]", "", "1:2"] {
            assert!(!is_timestamp_only(t), "{t}");
        }
    }
}
