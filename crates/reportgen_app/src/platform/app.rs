use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::mpsc;

use anyhow::{bail, Result};
use reportgen_core::{update, AppState, HealthPurpose, Msg, Severity};
use reportgen_logging::{report_info, report_warn};

use super::console::{load_selection, ConsoleCommand};
use super::effects::EffectRunner;
use super::ui::render::{render, UiCommand};
use super::ui::surface::ConsoleSurface;

/// Result of a non-interactive run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BatchOutcome {
    pub generated: usize,
    pub failed: usize,
}

impl BatchOutcome {
    pub fn exit_code(&self) -> ExitCode {
        if self.generated > 0 && self.failed == 0 {
            ExitCode::SUCCESS
        } else {
            ExitCode::FAILURE
        }
    }
}

/// Everything the controller reacts to, in arrival order.
#[derive(Debug)]
pub enum AppEvent {
    Msg(Msg),
    Console(ConsoleCommand),
    InputError(String),
    InputClosed,
}

/// Owns the state and is the only place `update` is called from.
pub struct AppController<W: Write> {
    state: AppState,
    effects: EffectRunner,
    surface: ConsoleSurface<W>,
    quit_requested: bool,
}

impl<W: Write> AppController<W> {
    pub fn new(effects: EffectRunner, surface: ConsoleSurface<W>) -> Self {
        Self {
            state: AppState::new(),
            effects,
            surface,
            quit_requested: false,
        }
    }

    pub fn run_interactive(mut self, events: mpsc::Receiver<AppEvent>) -> Result<ExitCode> {
        self.surface.show_help()?;
        self.render_full()?;
        self.dispatch(Msg::AppStarted)?;

        while let Ok(event) = events.recv() {
            match event {
                AppEvent::Msg(msg) => self.dispatch(msg)?,
                AppEvent::Console(command) => self.handle_command(command)?,
                AppEvent::InputError(message) => self.notify(Severity::Warning, message)?,
                AppEvent::InputClosed => self.quit_requested = true,
            }
            if self.quit_requested && self.state.is_idle() {
                break;
            }
        }
        report_info!("Console session ended");
        Ok(ExitCode::SUCCESS)
    }

    /// Select `paths`, submit them, save every generated document, stop.
    pub fn run_batch(
        mut self,
        paths: &[PathBuf],
        events: mpsc::Receiver<AppEvent>,
    ) -> Result<BatchOutcome> {
        self.select(paths)?;
        self.dispatch(Msg::SubmitClicked)?;

        while !self.state.is_idle() {
            match events.recv() {
                Ok(AppEvent::Msg(msg)) => self.dispatch(msg)?,
                Ok(_) => {}
                Err(_) => bail!("engine stopped before the batch finished"),
            }
        }

        let generated = self.state.artifacts().len();
        for index in 0..generated {
            self.dispatch(Msg::DownloadClicked(index))?;
        }

        let failed = self.state.failure_count();
        report_info!("Batch mode done: {} generated, {} failed", generated, failed);
        Ok(BatchOutcome { generated, failed })
    }

    fn handle_command(&mut self, command: ConsoleCommand) -> io::Result<()> {
        if command.mutates_selection() && !self.state.is_idle() {
            return self.notify(
                Severity::Warning,
                "The selection cannot change while reports are being generated",
            );
        }

        match command {
            ConsoleCommand::Add(paths) => self.select(&paths),
            ConsoleCommand::Remove(index) if index >= self.state.selection_len() => {
                self.notify(Severity::Warning, format!("There is no file {}", index + 1))
            }
            ConsoleCommand::Remove(index) => self.dispatch(Msg::RemoveFileClicked(index)),
            ConsoleCommand::List => self.render_full(),
            ConsoleCommand::Submit => self.dispatch(Msg::SubmitClicked),
            ConsoleCommand::Download(index) => self.dispatch(Msg::DownloadClicked(index)),
            ConsoleCommand::DownloadAll => {
                // An empty list still goes through the core so the user gets its notice.
                let count = self.state.artifacts().len().max(1);
                for index in 0..count {
                    self.dispatch(Msg::DownloadClicked(index))?;
                }
                Ok(())
            }
            ConsoleCommand::Validate(index) => self.dispatch(Msg::ValidateClicked(index)),
            ConsoleCommand::Clear => self.dispatch(Msg::ClearClicked),
            ConsoleCommand::Health => self.dispatch(Msg::HealthRequested),
            ConsoleCommand::Help => self.surface.show_help(),
            ConsoleCommand::Quit => {
                self.quit_requested = true;
                if self.state.is_idle() {
                    Ok(())
                } else {
                    self.surface
                        .show_line("Waiting for the current batch to finish...")
                }
            }
        }
    }

    fn select(&mut self, paths: &[PathBuf]) -> io::Result<()> {
        let (files, warnings) = load_selection(paths);
        for warning in warnings {
            self.notify(Severity::Warning, warning)?;
        }
        if files.is_empty() {
            return self.notify(Severity::Warning, "No Excel file was added");
        }
        self.dispatch(Msg::FilesSelected(files))
    }

    fn dispatch(&mut self, msg: Msg) -> io::Result<()> {
        let health_notice = match &msg {
            Msg::HealthChecked {
                purpose: HealthPurpose::Informational,
                healthy,
            } => Some(*healthy),
            _ => None,
        };

        let state = std::mem::take(&mut self.state);
        let (mut state, effects) = update(state, msg);
        let was_dirty = state.consume_dirty();
        self.state = state;

        if was_dirty {
            self.surface.execute(render(&self.state.view()))?;
        }
        let commands = self.effects.run(effects);
        self.surface.execute(commands)?;

        match health_notice {
            Some(true) => self.notify(Severity::Info, "Backend is online"),
            Some(false) => {
                report_warn!("Backend health check failed");
                self.notify(Severity::Warning, "The backend server is not available")
            }
            None => Ok(()),
        }
    }

    fn render_full(&mut self) -> io::Result<()> {
        self.surface.invalidate();
        self.surface.execute(render(&self.state.view()))
    }

    fn notify(&mut self, severity: Severity, message: impl Into<String>) -> io::Result<()> {
        self.surface.execute(vec![UiCommand::Notify {
            severity,
            message: message.into(),
        }])
    }
}
