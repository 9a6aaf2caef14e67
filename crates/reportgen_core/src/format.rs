const SIZE_UNITS: [&str; 4] = ["Bytes", "KB", "MB", "GB"];

/// Longest name shown in a list row before it is cut with an ellipsis.
pub const NAME_DISPLAY_WIDTH: usize = 40;

/// Human-readable size with up to two decimals: `1024 -> "1 KB"`, `1500000 -> "1.43 MB"`.
pub fn format_file_size(bytes: u64) -> String {
    if bytes == 0 {
        return "0 Bytes".to_string();
    }
    let mut unit = 0;
    while unit + 1 < SIZE_UNITS.len() && bytes >= 1024u64.pow(unit as u32 + 1) {
        unit += 1;
    }
    let scaled = bytes as f64 / 1024f64.powi(unit as i32);
    let rounded = (scaled * 100.0).round() / 100.0;
    format!("{rounded} {}", SIZE_UNITS[unit])
}

/// `"1 file"`, `"3 files"`.
pub fn count_label(count: usize, singular: &str, plural: &str) -> String {
    if count == 1 {
        format!("{count} {singular}")
    } else {
        format!("{count} {plural}")
    }
}

pub fn truncate_display_name(name: &str) -> String {
    if name.chars().count() <= NAME_DISPLAY_WIDTH {
        return name.to_string();
    }
    let mut cut: String = name.chars().take(NAME_DISPLAY_WIDTH - 1).collect();
    cut.push('…');
    cut
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sizes_follow_binary_units() {
        assert_eq!(format_file_size(0), "0 Bytes");
        assert_eq!(format_file_size(512), "512 Bytes");
        assert_eq!(format_file_size(1024), "1 KB");
        assert_eq!(format_file_size(1536), "1.5 KB");
        assert_eq!(format_file_size(1_500_000), "1.43 MB");
        assert_eq!(format_file_size(3 * 1024 * 1024 * 1024), "3 GB");
    }

    #[test]
    fn sizes_beyond_gigabytes_stay_in_gigabytes() {
        assert_eq!(format_file_size(2 * 1024u64.pow(4)), "2048 GB");
    }

    #[test]
    fn count_label_pluralizes() {
        assert_eq!(count_label(0, "file", "files"), "0 files");
        assert_eq!(count_label(1, "file", "files"), "1 file");
        assert_eq!(count_label(2, "document", "documents"), "2 documents");
    }

    #[test]
    fn long_names_are_cut_on_char_boundaries() {
        let short = "ventas.xlsx";
        assert_eq!(truncate_display_name(short), short);

        let long = "ñ".repeat(NAME_DISPLAY_WIDTH + 5);
        let cut = truncate_display_name(&long);
        assert_eq!(cut.chars().count(), NAME_DISPLAY_WIDTH);
        assert!(cut.ends_with('…'));
    }
}
