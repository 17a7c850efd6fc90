use anyhow::{Context, Result, anyhow};
use std::{fs, path::Path, time::Duration};

use capsync::{
    ActiveSegmentChange, DisplaySegment, SeekRequest, SegmentGrouper, SessionObserver,
    SyncSession, Transcript,
    config::Config,
    formats::{self, time::format_clock},
    ingest::{self, Ingested, SubtitleKind},
    scroll::ManualClock,
};

use crate::cli::{GroupCmd, InputFormat, OutputFormat, ReplayCmd};

pub fn run_group(cmd: GroupCmd, cfg: &Config) -> Result<()> {
    let span = tracing::info_span!("group", input = cmd.input.as_str(), to = ?cmd.to);
    let _g = span.enter();

    let ingested = load_input(&cmd.input, cmd.from)?;
    let transcript = build_transcript(&ingested, &cmd.input, cfg);

    log_transcript_summary(&transcript, cfg);

    let rendered = render_any(&transcript, cmd.to, cfg)?;

    if cmd.stdout {
        print!("{rendered}");
        tracing::info!(mode = "stdout", "wrote output");
        return Ok(());
    }

    let out_path = derive_output_path(&cmd)?;
    write_output(&out_path, &rendered, cmd.overwrite)?;
    tracing::info!(path = out_path.as_str(), "wrote output file");

    Ok(())
}

pub fn run_replay(cmd: ReplayCmd, cfg: &Config) -> Result<()> {
    let span = tracing::info_span!("replay", input = cmd.input.as_str(), ticks = cmd.times.len());
    let _g = span.enter();

    let ingested = load_input(&cmd.input, cmd.from)?;
    let clock = ManualClock::default();
    let mut session = SyncSession::with_clock(
        SegmentGrouper::new(cfg.grouping.clone()),
        PrintObserver,
        clock.clone(),
        cfg.playback.scroll_cooldown(),
    );
    session.load(&ingested.segments);

    let step = Duration::from_millis(cfg.playback.tick_interval_ms);
    for (i, &t) in cmd.times.iter().enumerate() {
        if cmd.scroll_at.contains(&i) {
            println!("manual scroll");
            session.manual_scroll();
        }
        println!("tick {t:.3}");
        session.tick(t);
        clock.advance(step);
    }

    for &start in &cmd.activate {
        if let Err(e) = session.activate(start) {
            println!("activate {start:.3} rejected: {e}");
        }
    }

    Ok(())
}

struct PrintObserver;

impl SessionObserver for PrintObserver {
    fn highlight(&mut self, change: &ActiveSegmentChange) {
        match (&change.index, &change.segment) {
            (Some(i), Some(seg)) => {
                println!("active {i} [{}] {}", format_clock(seg.start), seg.text);
            }
            _ => println!("active none"),
        }
    }

    fn scroll_to(&mut self, index: usize, _segment: &DisplaySegment) {
        println!("scroll {index}");
    }

    fn seek(&mut self, request: SeekRequest) {
        println!("seek {:.3} (segment {})", request.start, request.index);
    }
}

fn load_input(input: &str, from: Option<InputFormat>) -> Result<Ingested> {
    let input_format = from.unwrap_or_else(|| infer_format_from_path_or_dash(input));
    tracing::info!(?input_format, "input format selected");

    let raw = read_input_to_string(input)?;
    tracing::info!(bytes = raw.len(), "read input");

    let ingested = parse_any(&raw, input_format)
        .with_context(|| format!("failed parsing input as {:?}", input_format))?;
    if !ingested.diagnostics.is_empty() {
        tracing::warn!(
            skipped = ingested.diagnostics.len(),
            kept = ingested.segments.len(),
            "some raw captions were malformed"
        );
    }
    Ok(ingested)
}

fn infer_format_from_path_or_dash(input: &str) -> InputFormat {
    if input == "-" {
        return InputFormat::Json;
    }
    let p = Path::new(input);
    match p
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase()
        .as_str()
    {
        "srt" => InputFormat::Srt,
        "vtt" => InputFormat::Vtt,
        _ => InputFormat::Json,
    }
}

fn read_input_to_string(input: &str) -> Result<String> {
    if input == "-" {
        use std::io::Read;
        let mut buf = String::new();
        std::io::stdin().read_to_string(&mut buf)?;
        Ok(buf)
    } else {
        fs::read_to_string(input).with_context(|| format!("failed reading input: {input}"))
    }
}

fn parse_any(raw: &str, fmt: InputFormat) -> Result<Ingested> {
    let ingested = match fmt {
        InputFormat::Json => ingest::parse_json(raw)?,
        InputFormat::Srt => ingest::parse_subtitles(raw, SubtitleKind::Srt)?,
        InputFormat::Vtt => ingest::parse_subtitles(raw, SubtitleKind::Vtt)?,
    };
    Ok(ingested)
}

fn build_transcript(ingested: &Ingested, input: &str, cfg: &Config) -> Transcript {
    let grouper = SegmentGrouper::new(cfg.grouping.clone());
    let (segments, stats) = grouper.group_with_stats(&ingested.segments);
    tracing::info!(
        raw = stats.raw,
        groups = stats.groups,
        duplicates = stats.duplicates,
        merged = stats.merged,
        discarded = stats.discarded_empty + stats.discarded_timestamp,
        max_gap_secs = grouper.policy().max_gap_secs,
        "grouped captions"
    );

    let mut transcript = Transcript::new(segments);
    transcript.meta.source = (input != "-").then(|| input.to_string());
    transcript.meta.language.clone_from(&ingested.language);
    transcript.meta.skipped = ingested.diagnostics.len();
    transcript
}

fn log_transcript_summary(t: &Transcript, cfg: &Config) {
    tracing::info!(
        segments = t.segments.len(),
        duration_secs = t.duration_secs(),
        "transcript summary"
    );

    if tracing::enabled!(tracing::Level::DEBUG) {
        let n = cfg.logging.debug_segment_samples.min(t.segments.len());
        for (i, s) in t.segments.iter().take(n).enumerate() {
            tracing::debug!(
                idx = i,
                start = s.start,
                duration = s.duration,
                sources = s.source_segments.len(),
                chars = s.text.chars().count(),
                "segment sample"
            );
        }
    }
}

fn render_any(t: &Transcript, fmt: OutputFormat, cfg: &Config) -> Result<String> {
    match fmt {
        OutputFormat::Srt => Ok(formats::srt::write_srt(t, &cfg.formats.srt)),
        OutputFormat::Txt => Ok(formats::txt::write_txt(t, &cfg.formats.txt)),
        OutputFormat::Tsv => Ok(formats::tsv::write_tsv(t, &cfg.formats.tsv)?),
        OutputFormat::Json => Ok(formats::json::write_json(t, &cfg.formats.json)?),
    }
}

fn derive_output_path(cmd: &GroupCmd) -> Result<String> {
    if let Some(o) = &cmd.output {
        return Ok(o.clone());
    }

    if cmd.input == "-" {
        return Err(anyhow!(
            "output path required when input is stdin and --stdout is not set"
        ));
    }

    let p = Path::new(&cmd.input);
    let stem = p
        .file_stem()
        .and_then(|s| s.to_str())
        .ok_or_else(|| anyhow!("bad input filename"))?;

    let parent = p.parent().unwrap_or_else(|| Path::new("."));
    let out = parent.join(format!("{stem}.display.{}", cmd.to.extension()));
    Ok(out.to_string_lossy().to_string())
}

fn write_output(path: &str, data: &str, overwrite: bool) -> Result<()> {
    if Path::new(path).exists() && !overwrite {
        return Err(anyhow!(
            "refusing to overwrite existing file (pass --overwrite): {path}"
        ));
    }
    fs::write(path, data).with_context(|| format!("failed writing output: {path}"))?;
    Ok(())
}
