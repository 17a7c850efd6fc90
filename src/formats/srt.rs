use crate::{
    config::SrtCfg,
    formats::time::{format_srt_timestamp, secs_to_ms},
    model::Transcript,
};
use textwrap::wrap;

pub fn write_srt(t: &Transcript, cfg: &SrtCfg) -> String {
    let mut out = String::new();

    for (i, seg) in t.segments.iter().enumerate() {
        out.push_str(&(i + 1).to_string());
        out.push('\n');

        // Cue ends are clipped to the next start so players never show two at once.
        let end = t
            .segments
            .get(i + 1)
            .map_or(seg.end(), |next| seg.end().min(next.start));
        out.push_str(&format!(
            "{} --> {}\n",
            format_srt_timestamp(secs_to_ms(seg.start)),
            format_srt_timestamp(secs_to_ms(end))
        ));

        for line in wrap(&seg.text, cfg.wrap_width.max(1)) {
            out.push_str(&line);
            out.push('\n');
        }

        out.push('\n');
    }

    out
}
