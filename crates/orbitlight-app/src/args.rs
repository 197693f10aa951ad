//! Command-line options and configuration loading.

use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

use anyhow::{bail, Context, Result};

use orbitlight_core::config::OrbitConfig;

/// Wall-clock run time when `--duration-ms` is not given.
pub const DEFAULT_DURATION_MS: u64 = 2_000;

#[derive(Debug, Clone, PartialEq)]
pub struct RunOptions {
    pub config_path: Option<PathBuf>,
    pub duration: Duration,
    pub max_frames: Option<u64>,
    pub print_config: bool,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            config_path: None,
            duration: Duration::from_millis(DEFAULT_DURATION_MS),
            max_frames: None,
            print_config: false,
        }
    }
}

impl RunOptions {
    /// Parse a full argument list whose first entry is the program name.
    /// An empty list is accepted and yields the defaults.
    pub fn from_args<I>(args: I) -> Result<Self>
    where
        I: IntoIterator<Item = String>,
    {
        let flags: Vec<String> = args.into_iter().skip(1).collect();
        Self::parse(&flags)
    }

    /// Parse flags (program name already stripped).
    pub fn parse(args: &[String]) -> Result<Self> {
        let mut options = Self::default();
        let mut iter = args.iter();

        while let Some(flag) = iter.next() {
            match flag.as_str() {
                "--config" => {
                    options.config_path = Some(PathBuf::from(value_for(flag, iter.next())?));
                }
                "--duration-ms" => {
                    let ms: u64 = parse_value(flag, iter.next())?;
                    options.duration = Duration::from_millis(ms);
                }
                "--max-frames" => {
                    options.max_frames = Some(parse_value(flag, iter.next())?);
                }
                "--print-config" => options.print_config = true,
                other => bail!("Unknown argument: {other}"),
            }
        }

        Ok(options)
    }
}

fn value_for<'a>(flag: &str, value: Option<&'a String>) -> Result<&'a str> {
    match value {
        Some(v) => Ok(v.as_str()),
        None => bail!("{flag} requires a value"),
    }
}

fn parse_value<T>(flag: &str, value: Option<&String>) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    let raw = value_for(flag, value)?;
    raw.parse()
        .with_context(|| format!("invalid value for {flag}: {raw}"))
}

/// Load and validate a configuration file, or use the defaults.
pub fn load_config(path: Option<&Path>) -> Result<OrbitConfig> {
    let Some(path) = path else {
        return Ok(OrbitConfig::default());
    };

    let json = std::fs::read_to_string(path)
        .with_context(|| format!("reading orbit config {}", path.display()))?;
    let config = OrbitConfig::from_json_str(&json)
        .with_context(|| format!("loading orbit config {}", path.display()))?;
    log::debug!("loaded orbit config from {}: {config:?}", path.display());
    Ok(config)
}
