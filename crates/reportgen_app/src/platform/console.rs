use std::fs;
use std::io::{self, BufRead};
use std::path::{Path, PathBuf};
use std::sync::mpsc;
use std::thread;

use reportgen_core::SelectedFile;
use reportgen_engine::is_spreadsheet_name;
use reportgen_logging::{report_debug, report_warn};

use super::app::AppEvent;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConsoleCommand {
    Add(Vec<PathBuf>),
    /// Indices are 0-based from here on.
    Remove(usize),
    List,
    Submit,
    Download(usize),
    DownloadAll,
    Validate(usize),
    Clear,
    Health,
    Help,
    Quit,
}

impl ConsoleCommand {
    pub fn mutates_selection(&self) -> bool {
        matches!(
            self,
            ConsoleCommand::Add(_) | ConsoleCommand::Remove(_) | ConsoleCommand::Clear
        )
    }
}

/// Parses one input line. Blank lines yield `Ok(None)`.
pub fn parse_command(line: &str) -> Result<Option<ConsoleCommand>, String> {
    let mut words = split_args(line)?.into_iter();
    let Some(verb) = words.next() else {
        return Ok(None);
    };
    let args: Vec<String> = words.collect();

    let command = match verb.to_ascii_lowercase().as_str() {
        "add" | "open" => {
            if args.is_empty() {
                return Err("`add` needs at least one file path".to_string());
            }
            ConsoleCommand::Add(args.into_iter().map(PathBuf::from).collect())
        }
        "rm" | "remove" => ConsoleCommand::Remove(single_index(&verb, &args)?),
        "list" | "ls" => ConsoleCommand::List,
        "submit" | "generate" => ConsoleCommand::Submit,
        "download" | "save" => match args.as_slice() {
            [all] if all.eq_ignore_ascii_case("all") => ConsoleCommand::DownloadAll,
            _ => ConsoleCommand::Download(single_index(&verb, &args)?),
        },
        "validate" => ConsoleCommand::Validate(single_index(&verb, &args)?),
        "clear" => ConsoleCommand::Clear,
        "health" => ConsoleCommand::Health,
        "help" | "?" => ConsoleCommand::Help,
        "quit" | "exit" | "q" => ConsoleCommand::Quit,
        other => return Err(format!("Unknown command `{other}`. Type `help` for a list.")),
    };
    Ok(Some(command))
}

fn single_index(verb: &str, args: &[String]) -> Result<usize, String> {
    let [arg] = args else {
        return Err(format!("`{verb}` needs exactly one number"));
    };
    match arg.parse::<usize>() {
        Ok(0) => Err("Numbers start at 1".to_string()),
        Ok(number) => Ok(number - 1),
        Err(_) => Err(format!("`{arg}` is not a number")),
    }
}

/// Whitespace-separated words; double quotes keep spaces inside one word.
fn split_args(line: &str) -> Result<Vec<String>, String> {
    let mut words = Vec::new();
    let mut current = String::new();
    let mut in_word = false;
    let mut quoted = false;

    for c in line.chars() {
        match c {
            '"' => {
                quoted = !quoted;
                in_word = true;
            }
            c if c.is_whitespace() && !quoted => {
                if in_word {
                    words.push(std::mem::take(&mut current));
                    in_word = false;
                }
            }
            c => {
                current.push(c);
                in_word = true;
            }
        }
    }
    if quoted {
        return Err("Unclosed quote".to_string());
    }
    if in_word {
        words.push(current);
    }
    Ok(words)
}

/// Reads the given paths into memory. Anything that is not a readable
/// `.xlsx`/`.xls` file is skipped and reported in the returned warnings.
pub fn load_selection(paths: &[PathBuf]) -> (Vec<SelectedFile>, Vec<String>) {
    let mut files = Vec::with_capacity(paths.len());
    let mut warnings = Vec::new();

    for path in paths {
        match load_file(path) {
            Ok(file) => {
                report_debug!("Selected {} ({} bytes)", file.name, file.size);
                files.push(file);
            }
            Err(reason) => {
                report_warn!("Skipping {}: {}", path.display(), reason);
                warnings.push(format!("Skipping {}: {}", path.display(), reason));
            }
        }
    }
    (files, warnings)
}

fn load_file(path: &Path) -> Result<SelectedFile, String> {
    let name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .ok_or_else(|| "not a file".to_string())?;
    if !is_spreadsheet_name(&name) {
        return Err("only .xlsx and .xls files are accepted".to_string());
    }
    let content = fs::read(path).map_err(|err| err.to_string())?;
    Ok(SelectedFile::new(name, content))
}

/// Forwards stdin lines to the controller until input closes.
pub fn spawn_stdin_reader(tx: mpsc::Sender<AppEvent>) -> io::Result<()> {
    thread::Builder::new()
        .name("reportgen-console".to_string())
        .spawn(move || {
            let stdin = io::stdin();
            for line in stdin.lock().lines() {
                let event = match line {
                    Ok(line) => match parse_command(&line) {
                        Ok(Some(command)) => AppEvent::Console(command),
                        Ok(None) => continue,
                        Err(message) => AppEvent::InputError(message),
                    },
                    Err(err) => {
                        report_warn!("Reading stdin failed: {}", err);
                        break;
                    }
                };
                if tx.send(event).is_err() {
                    return;
                }
            }
            let _ = tx.send(AppEvent::InputClosed);
        })?;
    Ok(())
}
