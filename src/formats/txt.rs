use textwrap::fill;

use crate::{config::TxtCfg, formats::time::format_clock, model::Transcript};

pub fn write_txt(t: &Transcript, cfg: &TxtCfg) -> String {
    let mode = cfg.mode.to_lowercase();

    if mode == "paragraph" {
        let mut out = fill(&t.plain_text(), 80);
        out.push('\n');
        return out;
    }

    let mut out = String::new();
    for seg in &t.segments {
        if mode != "text_only" {
            out.push_str(&format!("[{}] ", format_clock(seg.start)));
        }
        out.push_str(&seg.text);
        out.push('\n');
    }
    out
}
