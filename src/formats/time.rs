use crate::error::{CaptionError, CaptionResult};

pub fn secs_to_ms(secs: f64) -> i64 {
    (secs * 1000.0).round() as i64
}

pub fn format_srt_timestamp(ms: i64) -> String {
    format_timestamp(ms, ',')
}

pub fn format_vtt_timestamp(ms: i64) -> String {
    format_timestamp(ms, '.')
}

fn format_timestamp(ms_in: i64, ms_sep: char) -> String {
    let ms = ms_in.max(0);

    let total_seconds = ms / 1000;
    let milli = ms % 1000;

    let sec = total_seconds % 60;
    let total_minutes = total_seconds / 60;
    let min = total_minutes % 60;
    let hour = total_minutes / 60;

    format!("{hour:02}:{min:02}:{sec:02}{ms_sep}{milli:03}")
}

/// Reader-facing clock: `M:SS` under an hour, `H:MM:SS` above.
pub fn format_clock(secs: f64) -> String {
    let total = if secs.is_finite() {
        secs.max(0.0).floor() as i64
    } else {
        0
    };
    let (h, m, s) = (total / 3600, (total / 60) % 60, total % 60);
    if h > 0 {
        format!("{h}:{m:02}:{s:02}")
    } else {
        format!("{m}:{s:02}")
    }
}

pub fn parse_time_to_ms(s: &str) -> CaptionResult<i64> {
    let t = s.trim();
    let bad = || CaptionError::InvalidTime(t.to_string());

    if let Ok(v) = t.parse::<i64>() {
        return Ok(v);
    }

    let (hms, milli) = match t.split_once(',').or_else(|| t.split_once('.')) {
        Some((a, b)) => (a, Some(b)),
        None => (t, None),
    };

    let parts: Vec<&str> = hms.split(':').collect();
    let (h, m, s2) = match parts.as_slice() {
        [h, m, s] => (*h, *m, *s),
        [m, s] => ("0", *m, *s),
        _ => return Err(bad()),
    };

    let field = |v: &str| v.parse::<i64>().map_err(|_| bad());
    let (h, m, s2) = (field(h)?, field(m)?, field(s2)?);

    let whole = h
        .checked_mul(60)
        .and_then(|v| v.checked_add(m))
        .and_then(|v| v.checked_mul(60))
        .and_then(|v| v.checked_add(s2))
        .and_then(|v| v.checked_mul(1000))
        .ok_or_else(bad)?;

    let milli = match milli {
        Some(frac) => parse_millis(frac.trim()).ok_or_else(bad)?,
        None => 0,
    };

    whole.checked_add(milli).ok_or_else(bad)
}

/// Fraction digits after the separator, read as milliseconds.
fn parse_millis(frac: &str) -> Option<i64> {
    if !frac.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let digits: String = frac.chars().take(3).collect();
    if digits.is_empty() {
        return Some(0);
    }
    let scale = 10_i64.pow(3 - digits.len() as u32);
    digits.parse::<i64>().ok().map(|v| v * scale)
}
