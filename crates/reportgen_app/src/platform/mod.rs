mod app;
mod config;
mod console;
mod effects;
mod ui;

use std::io;
use std::process::ExitCode;
use std::sync::{mpsc, Arc};

use anyhow::{Context, Result};
use reportgen_engine::{EngineHandle, FixedDelayPacing, ReqwestReportApi};
use reportgen_logging::report_info;

pub use config::Cli;

use app::AppController;
use config::{log_level, AppConfig};
use effects::{EffectRunner, EventBridge};
use ui::surface::ConsoleSurface;

pub fn run(cli: Cli) -> Result<ExitCode> {
    let config = AppConfig::load(&cli)?;
    reportgen_logging::initialize(config.log_destination(cli.log), log_level(cli.verbose));
    report_info!(
        "reportgen starting: api={} out={:?} delay_ms={}",
        config.api_url,
        config.output_dir,
        config.delay_ms
    );

    let api = ReqwestReportApi::new(config.api_settings()?).context("building HTTP client")?;
    let (event_tx, event_rx) = mpsc::channel();
    let engine = EngineHandle::spawn(
        Arc::new(api),
        Arc::new(FixedDelayPacing::new(config.delay())),
        Box::new(EventBridge::new(event_tx.clone())),
    )
    .context("starting engine worker")?;

    let effects = EffectRunner::new(engine, config.output_dir.clone(), event_tx.clone());
    let controller = AppController::new(effects, ConsoleSurface::new(io::stdout()));

    if cli.files.is_empty() {
        console::spawn_stdin_reader(event_tx).context("starting console input")?;
        controller.run_interactive(event_rx)
    } else {
        drop(event_tx);
        let outcome = controller.run_batch(&cli.files, event_rx)?;
        Ok(outcome.exit_code())
    }
}
