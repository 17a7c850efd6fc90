use csv::WriterBuilder;

use crate::{
    config::TsvCfg,
    error::{CaptionError, CaptionResult},
    formats::time::{format_vtt_timestamp, secs_to_ms},
    model::{DisplaySegment, Transcript},
};

pub fn write_tsv(t: &Transcript, cfg: &TsvCfg) -> CaptionResult<String> {
    let mut wtr = WriterBuilder::new().delimiter(b'\t').from_writer(vec![]);

    wtr.write_record(&cfg.columns)?;

    for seg in &t.segments {
        let row: Vec<String> = cfg
            .columns
            .iter()
            .map(|c| value_for_column(c, seg, cfg))
            .collect();
        wtr.write_record(&row)?;
    }

    let data = wtr.into_inner().map_err(|e| render_err(e.to_string()))?;
    String::from_utf8(data).map_err(|e| render_err(e.to_string()))
}

fn render_err(reason: String) -> CaptionError {
    CaptionError::Render {
        format: "tsv",
        reason,
    }
}

fn value_for_column(col: &str, seg: &DisplaySegment, cfg: &TsvCfg) -> String {
    match col {
        "start" => fmt_time(seg.start, cfg),
        "end" => fmt_time(seg.end(), cfg),
        "duration" => fmt_time(seg.duration, cfg),
        "text" => seg.text.clone(),
        "sources" => seg
            .source_segments
            .iter()
            .map(usize::to_string)
            .collect::<Vec<_>>()
            .join(","),
        _ => String::new(),
    }
}

fn fmt_time(secs: f64, cfg: &TsvCfg) -> String {
    match cfg.time_units.as_str() {
        "ms" => secs_to_ms(secs).to_string(),
        "timestamp" => format_vtt_timestamp(secs_to_ms(secs)),
        _ => format!("{secs:.3}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn writes_configured_columns() {
        let t = Transcript::new(vec![DisplaySegment {
            start: 1.5,
            duration: 2.0,
            text: "hi there".to_owned(),
            source_segments: vec![3, 4],
        }]);
        let out = write_tsv(&t, &TsvCfg::default()).unwrap();
        assert_eq!(out, "start\tend\ttext\tsources\n1.500\t3.500\thi there\t3,4\n");

        let cfg = TsvCfg {
            time_units: "ms".to_owned(),
            columns: vec!["start".to_owned(), "duration".to_owned()],
        };
        assert_eq!(write_tsv(&t, &cfg).unwrap(), "start\tduration\n1500\t2000\n");
    }
}
