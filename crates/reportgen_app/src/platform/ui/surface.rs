use std::io::{self, Write};

use reportgen_core::{BackendStatus, FileStatus, Severity};

use super::render::UiCommand;

const HELP: &str = "\
Commands:
  add <path>...    select Excel files (replaces the current selection)
  rm <n>           remove file n from the selection
  list             show files and generated documents
  submit           generate one report per selected file
  download <n>     save document n (`download all` saves every document)
  validate <n>     ask the backend to check file n
  clear            remove all files and documents
  health           check whether the backend is reachable
  help             show this text
  quit             exit";

/// Prints frames and messages to a terminal-like writer.
///
/// A frame is only printed where it differs from the previous one, so a
/// single row update shows up as a single line.
pub struct ConsoleSurface<W: Write> {
    out: W,
    last_frame: Vec<String>,
}

impl<W: Write> ConsoleSurface<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            last_frame: Vec::new(),
        }
    }

    pub fn execute(&mut self, commands: Vec<UiCommand>) -> io::Result<()> {
        let mut frame = FrameBuilder::default();
        let mut has_frame = false;

        for command in commands {
            if command.is_frame() {
                has_frame = true;
                frame.apply(command);
                continue;
            }
            match command {
                UiCommand::Notify { severity, message } => {
                    writeln!(self.out, "{} {}", severity_prefix(severity), message)?;
                }
                UiCommand::ArtifactSaved { path } => {
                    writeln!(self.out, "saved {}", path.display())?;
                }
                _ => {}
            }
        }

        if has_frame {
            self.present(frame.finish())?;
        }
        self.out.flush()
    }

    /// Next frame is printed in full.
    pub fn invalidate(&mut self) {
        self.last_frame.clear();
    }

    pub fn show_help(&mut self) -> io::Result<()> {
        writeln!(self.out, "{HELP}")?;
        self.out.flush()
    }

    pub fn show_line(&mut self, line: &str) -> io::Result<()> {
        writeln!(self.out, "{line}")?;
        self.out.flush()
    }

    #[cfg(test)]
    pub fn into_inner(self) -> W {
        self.out
    }

    fn present(&mut self, frame: Vec<String>) -> io::Result<()> {
        let full = self.last_frame.len() != frame.len();
        for (i, line) in frame.iter().enumerate() {
            if full || self.last_frame.get(i) != Some(line) {
                writeln!(self.out, "{line}")?;
            }
        }
        self.last_frame = frame;
        Ok(())
    }
}

#[derive(Default)]
struct FrameBuilder {
    backend: Option<BackendStatus>,
    submit_enabled: bool,
    busy: bool,
    lines: Vec<String>,
}

impl FrameBuilder {
    fn apply(&mut self, command: UiCommand) {
        match command {
            UiCommand::SetBackendStatus(status) => self.backend = Some(status),
            UiCommand::SetSubmitEnabled(enabled) => self.submit_enabled = enabled,
            UiCommand::SetBusy(busy) => self.busy = busy,
            UiCommand::SectionHeader { title, count_label } => {
                self.lines.push(format!("== {title} ({count_label})"));
            }
            UiCommand::EmptyState(empty) => {
                self.lines
                    .push(format!("   {} {} ({})", empty.icon, empty.text, empty.hint));
            }
            UiCommand::FileRow {
                number,
                name,
                full_name,
                meta,
                status,
            } => {
                self.lines.push(format!(
                    "  {number:>2}. {marker} {name}  [{meta}]",
                    marker = status_marker(status)
                ));
                self.push_full_name(full_name);
            }
            UiCommand::ArtifactRow {
                number,
                filename,
                full_name,
                original_name,
                size_label,
            } => {
                self.lines.push(format!(
                    "  {number:>2}. {filename}  [{size_label}] from {original_name}"
                ));
                self.push_full_name(full_name);
            }
            UiCommand::Notify { .. } | UiCommand::ArtifactSaved { .. } => {}
        }
    }

    fn push_full_name(&mut self, full_name: Option<String>) {
        if let Some(full_name) = full_name {
            self.lines.push(format!("        {full_name}"));
        }
    }

    fn finish(self) -> Vec<String> {
        let backend = match self.backend {
            Some(BackendStatus::Healthy) => "online",
            Some(BackendStatus::Unavailable) => "unavailable",
            Some(BackendStatus::Unknown) | None => "unknown",
        };
        let action = if self.busy {
            "generating reports..."
        } else if self.submit_enabled {
            "ready to submit"
        } else {
            "waiting for files"
        };
        let mut lines = Vec::with_capacity(self.lines.len() + 1);
        lines.push(format!("-- backend: {backend} | {action}"));
        lines.extend(self.lines);
        lines
    }
}

fn status_marker(status: FileStatus) -> &'static str {
    match status {
        FileStatus::Ready => " ",
        FileStatus::Processing => "~",
        FileStatus::Completed => "+",
        FileStatus::Error => "!",
    }
}

fn severity_prefix(severity: Severity) -> &'static str {
    match severity {
        Severity::Info => "[info]",
        Severity::Warning => "[warning]",
        Severity::Error => "[error]",
    }
}
