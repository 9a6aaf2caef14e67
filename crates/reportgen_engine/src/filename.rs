use crate::disposition::filename_from_disposition;

const REPORT_PREFIX: &str = "informe";
const REPORT_EXTENSION: &str = "docx";
const SPREADSHEET_EXTENSIONS: [&str; 2] = ["xlsx", "xls"];

/// Output name for a generated report: the server's suggestion when the
/// disposition header carries one, otherwise [`synthesize_report_filename`].
pub fn derive_output_filename(disposition: Option<&str>, input_name: &str) -> String {
    disposition
        .and_then(filename_from_disposition)
        .unwrap_or_else(|| synthesize_report_filename(input_name))
}

/// `reporte_mensual_2024.xlsx` -> `informe Reporte Mensual 2024.docx`.
pub fn synthesize_report_filename(input_name: &str) -> String {
    let base = strip_spreadsheet_extension(input_name).replace('_', " ");
    let title = base
        .split(' ')
        .map(capitalize)
        .collect::<Vec<_>>()
        .join(" ");
    format!("{REPORT_PREFIX} {title}.{REPORT_EXTENSION}")
}

/// Whether `name` ends in one of the spreadsheet extensions the backend accepts.
pub fn is_spreadsheet_name(name: &str) -> bool {
    strip_spreadsheet_extension(name).len() != name.len()
}

fn strip_spreadsheet_extension(name: &str) -> &str {
    if let Some((stem, ext)) = name.rsplit_once('.') {
        if SPREADSHEET_EXTENSIONS
            .iter()
            .any(|allowed| allowed.eq_ignore_ascii_case(ext))
        {
            return stem;
        }
    }
    name
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(char::to_lowercase))
            .collect(),
        None => String::new(),
    }
}

/// Makes a server-supplied name safe to use as a single path component.
pub fn sanitize_filename(input: &str) -> String {
    let mut cleaned: String = input
        .chars()
        .map(|c| if is_forbidden(c) { '_' } else { c })
        .collect();
    cleaned = cleaned.trim_matches(&['_', ' ', '.'][..]).to_string();
    if cleaned.is_empty() {
        cleaned = format!("{REPORT_PREFIX}.{REPORT_EXTENSION}");
    }
    if is_reserved_windows_name(stem_of(&cleaned)) {
        cleaned.insert(0, '_');
    }
    cleaned
}

fn stem_of(name: &str) -> &str {
    name.split_once('.').map_or(name, |(stem, _)| stem)
}

fn is_forbidden(c: char) -> bool {
    matches!(c,
        '\\' | '/' | ':' | '*' | '?' | '"' | '<' | '>' | '|' | '\0'..='\u{1F}'
    )
}

fn is_reserved_windows_name(name: &str) -> bool {
    const RESERVED: &[&str] = &[
        "CON", "PRN", "AUX", "NUL", "COM1", "COM2", "COM3", "COM4", "COM5", "COM6", "COM7", "COM8",
        "COM9", "LPT1", "LPT2", "LPT3", "LPT4", "LPT5", "LPT6", "LPT7", "LPT8", "LPT9",
    ];
    RESERVED.iter().any(|r| r.eq_ignore_ascii_case(name))
}
