use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

#[derive(Debug, Parser)]
#[command(name = "capsync")]
#[command(about = "Deduplicate rolling auto-captions and replay them against a playback clock.")]
pub struct Args {
    /// Path to config TOML (defaults to ./capsync.toml if present)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Override log level (trace, debug, info, warn, error)
    #[arg(long)]
    pub log_level: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Group raw captions into display segments
    Group(GroupCmd),
    /// Group, then feed playback times through a sync session
    Replay(ReplayCmd),
    /// Print the effective default config as TOML and exit
    PrintDefaultConfig,
}

#[derive(Debug, Parser)]
pub struct GroupCmd {
    /// Input file path, or '-' for stdin
    pub input: String,

    /// Output file path (optional)
    #[arg(short, long)]
    pub output: Option<String>,

    /// Target format
    #[arg(long, value_enum, default_value = "json")]
    pub to: OutputFormat,

    /// Force input format (otherwise inferred from extension or content)
    #[arg(long, value_enum)]
    pub from: Option<InputFormat>,

    /// Write to stdout instead of a file
    #[arg(long)]
    pub stdout: bool,

    /// Allow overwriting output file
    #[arg(long)]
    pub overwrite: bool,
}

#[derive(Debug, Parser)]
pub struct ReplayCmd {
    /// Input file path, or '-' for stdin
    pub input: String,

    /// Force input format (otherwise inferred from extension or content)
    #[arg(long, value_enum)]
    pub from: Option<InputFormat>,

    /// Playback times in seconds, in the order the player reports them
    #[arg(long, value_delimiter = ',', required = true, allow_negative_numbers = true)]
    pub times: Vec<f64>,

    /// Tick positions (0-based) at which a manual scroll arrives before the tick
    #[arg(long, value_delimiter = ',')]
    pub scroll_at: Vec<usize>,

    /// Segment starts to activate (as if clicked) after the ticks
    #[arg(long, value_delimiter = ',')]
    pub activate: Vec<f64>,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, ValueEnum)]
pub enum InputFormat {
    Json,
    Srt,
    Vtt,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, ValueEnum)]
pub enum OutputFormat {
    Json,
    Srt,
    Txt,
    Tsv,
}

impl OutputFormat {
    pub fn extension(self) -> &'static str {
        match self {
            OutputFormat::Json => "json",
            OutputFormat::Srt => "srt",
            OutputFormat::Txt => "txt",
            OutputFormat::Tsv => "tsv",
        }
    }
}
