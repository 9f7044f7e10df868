//! Common utilities and helpers

pub mod logging;
pub mod path;

/// Format a byte count for display: "512 B", "12.3 KB", "4.0 MB"
pub fn format_file_size(size: u64) -> String {
    const UNITS: &[&str] = &["B", "KB", "MB", "GB", "TB"];
    let mut value = size as f64;
    let mut unit_index = 0;

    while value >= 1024.0 && unit_index < UNITS.len() - 1 {
        value /= 1024.0;
        unit_index += 1;
    }

    if unit_index == 0 {
        format!("{} {}", size, UNITS[unit_index])
    } else {
        format!("{:.1} {}", value, UNITS[unit_index])
    }
}

/// Optional size, `?` when unknown
pub fn format_optional_size(size: Option<u64>) -> String {
    size.map(format_file_size).unwrap_or_else(|| "?".to_string())
}
