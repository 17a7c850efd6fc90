use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::{fs, path::Path, time::Duration};

use crate::grouper::GroupingPolicy;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub logging: Logging,
    pub grouping: GroupingPolicy,
    pub playback: Playback,
    pub formats: Formats,
}

impl Config {
    pub fn load(path_opt: Option<&Path>) -> Result<Self> {
        let default_path = Path::new("capsync.toml");
        let path = if let Some(p) = path_opt {
            Some(p)
        } else if default_path.exists() {
            Some(default_path)
        } else {
            None
        };

        let Some(path) = path else {
            return Ok(Config::default());
        };

        let raw = fs::read_to_string(path)
            .with_context(|| format!("failed reading config file: {}", path.display()))?;
        Self::from_toml(&raw)
            .with_context(|| format!("failed parsing TOML config: {}", path.display()))
    }

    pub fn from_toml(raw: &str) -> Result<Self> {
        Ok(toml::from_str(raw)?)
    }

    pub fn to_toml_pretty(&self) -> Result<String> {
        let s = toml::to_string_pretty(self).context("failed serializing config as TOML")?;
        Ok(s)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Logging {
    pub level: String,
    pub format: String,
    pub debug_segment_samples: usize,
}

impl Default for Logging {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
            debug_segment_samples: 20,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Playback {
    pub scroll_cooldown_secs: f64,
    /// Simulated wall-clock time between replayed ticks.
    pub tick_interval_ms: u64,
}

impl Default for Playback {
    fn default() -> Self {
        Self {
            scroll_cooldown_secs: 4.0,
            tick_interval_ms: 250,
        }
    }
}

impl Playback {
    pub fn scroll_cooldown(&self) -> Duration {
        Duration::try_from_secs_f64(self.scroll_cooldown_secs).unwrap_or_default()
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Formats {
    pub srt: SrtCfg,
    pub txt: TxtCfg,
    pub tsv: TsvCfg,
    pub json: JsonCfg,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SrtCfg {
    pub wrap_width: usize,
}

impl Default for SrtCfg {
    fn default() -> Self {
        Self { wrap_width: 42 }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TxtCfg {
    /// `clock` prefixes each line with `[M:SS]`; `text_only` prints text alone;
    /// `paragraph` joins everything into one block.
    pub mode: String,
}

impl Default for TxtCfg {
    fn default() -> Self {
        Self {
            mode: "clock".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TsvCfg {
    pub time_units: String,
    pub columns: Vec<String>,
}

impl Default for TsvCfg {
    fn default() -> Self {
        Self {
            time_units: "seconds".to_string(),
            columns: vec![
                "start".to_string(),
                "end".to_string(),
                "text".to_string(),
                "sources".to_string(),
            ],
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct JsonCfg {
    pub wrapped: bool,
    pub include_sources: bool,
}

impl Default for JsonCfg {
    fn default() -> Self {
        Self {
            wrapped: true,
            include_sources: true,
        }
    }
}

pub fn init_tracing(logging: &Logging, cli_override_level: Option<&str>) -> Result<()> {
    use tracing_subscriber::{EnvFilter, fmt};

    let level = cli_override_level.unwrap_or(logging.level.as_str());
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    let is_json = logging.format.eq_ignore_ascii_case("json");

    let builder = fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true);

    let installed = if is_json {
        builder.event_format(fmt::format().json()).try_init()
    } else {
        builder.pretty().try_init()
    };
    if let Err(e) = installed {
        anyhow::bail!("failed to install tracing subscriber: {e}");
    }

    tracing::info!(
        level = level,
        format = logging.format.as_str(),
        "logging initialized"
    );

    Ok(())
}
