//! `Content-Disposition` filename extraction.

const KEY: &str = "filename";

/// Extracts the suggested filename from a `Content-Disposition` value.
///
/// Accepts `filename="x.docx"`, `filename='x.docx'` and `filename=x.docx`. Any
/// characters between the key and `=` are skipped, so `filename*=` is read like a
/// bare value. Quote characters are stripped from the result; an empty value
/// yields `None`.
pub fn filename_from_disposition(header: &str) -> Option<String> {
    header
        .match_indices(KEY)
        .find_map(|(start, _)| value_after_key(&header[start + KEY.len()..]))
        .map(|raw| raw.replace(['"', '\''], ""))
        .filter(|name| !name.is_empty())
}

fn value_after_key(rest: &str) -> Option<&str> {
    let eq = rest.find(['=', ';', '\n'])?;
    if !rest[eq..].starts_with('=') {
        return None;
    }
    let value = &rest[eq + 1..];

    if let Some(quote) = value.chars().next().filter(|c| *c == '"' || *c == '\'') {
        let inner = &value[1..];
        let line = &inner[..inner.find('\n').unwrap_or(inner.len())];
        if let Some(close) = line.find(quote) {
            return Some(&value[..close + 2]);
        }
    }
    let end = value.find([';', '\n']).unwrap_or(value.len());
    Some(&value[..end])
}
