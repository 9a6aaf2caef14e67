use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{bail, Context, Result};
use clap::{Parser, ValueEnum};
use reportgen_engine::{ApiSettings, FixedDelayPacing, ImageAttachment, ReportOptions};
use reportgen_logging::{LevelFilter, LogDestination, DEFAULT_LOG_FILE};
use serde::Deserialize;

pub const DEFAULT_API_URL: &str = "http://localhost:5000/api";
pub const DEFAULT_OUTPUT_DIR: &str = "reports";
const MAX_DELAY_MS: u64 = 60_000;

#[derive(Debug, Parser, Clone)]
#[command(
    name = "reportgen",
    version,
    about = "Turn Excel survey spreadsheets into Word reports through the report backend"
)]
pub struct Cli {
    /// Spreadsheets to convert and save, then exit. Omit for the interactive console.
    pub files: Vec<PathBuf>,

    /// RON configuration file
    #[arg(short = 'c', long = "config")]
    pub config: Option<PathBuf>,

    /// Base URL of the report backend
    #[arg(long = "api-url", env = "REPORTGEN_API_URL")]
    pub api_url: Option<String>,

    /// Directory generated documents are saved into
    #[arg(short = 'o', long = "out")]
    pub out: Option<PathBuf>,

    /// Pause between two uploads, in milliseconds
    #[arg(long = "delay-ms")]
    pub delay_ms: Option<u64>,

    /// Per-request timeout in seconds (no timeout when unset)
    #[arg(long = "timeout-secs")]
    pub timeout_secs: Option<u64>,

    /// Unit name printed in the generated reports
    #[arg(long = "unit-name")]
    pub unit_name: Option<String>,

    /// Header image (png, jpg, jpeg) attached to every report
    #[arg(long = "header-image")]
    pub header_image: Option<PathBuf>,

    /// Footer image (png, jpg, jpeg) attached to every report
    #[arg(long = "footer-image")]
    pub footer_image: Option<PathBuf>,

    /// Where log output goes
    #[arg(long = "log", value_enum, default_value_t = LogTarget::File)]
    pub log: LogTarget,

    /// Log at debug level
    #[arg(short = 'v', long = "verbose")]
    pub verbose: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogTarget {
    File,
    Terminal,
    Both,
}

/// Settings read from the optional config file, before CLI overrides.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AppConfig {
    pub api_url: String,
    pub output_dir: PathBuf,
    pub delay_ms: u64,
    pub timeout_secs: Option<u64>,
    pub unit_name: Option<String>,
    pub header_image: Option<PathBuf>,
    pub footer_image: Option<PathBuf>,
    pub log_file: PathBuf,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            delay_ms: FixedDelayPacing::DEFAULT_DELAY.as_millis() as u64,
            timeout_secs: None,
            unit_name: None,
            header_image: None,
            footer_image: None,
            log_file: PathBuf::from(DEFAULT_LOG_FILE),
        }
    }
}

impl AppConfig {
    /// Config file (when given) with command line flags applied on top.
    pub fn load(cli: &Cli) -> Result<Self> {
        let mut config = match &cli.config {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        config.apply_cli(cli);
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("reading config file {}", path.display()))?;
        Self::parse(&text).with_context(|| format!("parsing config file {}", path.display()))
    }

    pub fn parse(text: &str) -> Result<Self> {
        Ok(ron::from_str(text)?)
    }

    fn apply_cli(&mut self, cli: &Cli) {
        if let Some(url) = &cli.api_url {
            self.api_url = url.clone();
        }
        if let Some(out) = &cli.out {
            self.output_dir = out.clone();
        }
        if let Some(delay) = cli.delay_ms {
            self.delay_ms = delay;
        }
        if cli.timeout_secs.is_some() {
            self.timeout_secs = cli.timeout_secs;
        }
        if cli.unit_name.is_some() {
            self.unit_name = cli.unit_name.clone();
        }
        if cli.header_image.is_some() {
            self.header_image = cli.header_image.clone();
        }
        if cli.footer_image.is_some() {
            self.footer_image = cli.footer_image.clone();
        }
    }

    pub fn validate(&self) -> Result<()> {
        ApiSettings::new(&self.api_url)
            .with_context(|| format!("invalid backend URL {:?}", self.api_url))?;
        if self.delay_ms > MAX_DELAY_MS {
            bail!(
                "delay of {} ms is above the {} ms maximum",
                self.delay_ms,
                MAX_DELAY_MS
            );
        }
        if self.timeout_secs == Some(0) {
            bail!("timeout must be at least one second");
        }
        for image in [&self.header_image, &self.footer_image].into_iter().flatten() {
            ImageAttachment::new(file_name_of(image), Vec::new())
                .with_context(|| format!("unsupported image {}", image.display()))?;
        }
        Ok(())
    }

    pub fn delay(&self) -> Duration {
        Duration::from_millis(self.delay_ms)
    }

    /// Client settings; the report images are read from disk here.
    pub fn api_settings(&self) -> Result<ApiSettings> {
        let mut settings = ApiSettings::new(&self.api_url)?;
        settings.request_timeout = self.timeout_secs.map(Duration::from_secs);
        settings.options = ReportOptions {
            unit_name: self.unit_name.clone().filter(|name| !name.trim().is_empty()),
            header_image: self.header_image.as_deref().map(load_image).transpose()?,
            footer_image: self.footer_image.as_deref().map(load_image).transpose()?,
        };
        Ok(settings)
    }

    pub fn log_destination(&self, target: LogTarget) -> LogDestination {
        match target {
            LogTarget::File => LogDestination::File(self.log_file.clone()),
            LogTarget::Terminal => LogDestination::Terminal,
            LogTarget::Both => LogDestination::Both(self.log_file.clone()),
        }
    }
}

pub fn log_level(verbose: bool) -> LevelFilter {
    if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    }
}

fn load_image(path: &Path) -> Result<ImageAttachment> {
    let content =
        fs::read(path).with_context(|| format!("reading image {}", path.display()))?;
    Ok(ImageAttachment::new(file_name_of(path), content)?)
}

fn file_name_of(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default()
}
