//! Human-readable sizes and ratios for progress and summary lines.

/// Format file size in human-readable format
///
/// # Arguments
/// * `bytes` - Size in bytes
///
/// # Returns
/// * Human-readable size string (e.g., "1.2 MB", "512 B")
pub fn format_file_size(bytes: u64) -> String {
    const UNITS: &[&str] = &["B", "KB", "MB", "GB", "TB"];
    const THRESHOLD: f64 = 1024.0;

    if bytes == 0 {
        return "0 B".to_string();
    }

    let mut size = bytes as f64;
    let mut unit_index = 0;

    while size >= THRESHOLD && unit_index < UNITS.len() - 1 {
        size /= THRESHOLD;
        unit_index += 1;
    }

    if unit_index == 0 {
        format!("{} {}", bytes, UNITS[unit_index])
    } else {
        format!("{:.1} {}", size, UNITS[unit_index])
    }
}

/// Calculate compression ratio as a percentage
///
/// Positive means the file shrank, negative means it grew.
pub fn calculate_compression_ratio(original_size: u64, compressed_size: u64) -> f64 {
    if original_size == 0 {
        return 0.0;
    }
    ((original_size as f64 - compressed_size as f64) / original_size as f64) * 100.0
}

/// One-line description of a size change, e.g. "1.5 KB -> 512 B (66.7% smaller)".
pub fn describe_size_change(original_size: u64, compressed_size: u64) -> String {
    let ratio = calculate_compression_ratio(original_size, compressed_size);
    let direction = if ratio >= 0.0 {
        format!("{:.1}% smaller", ratio)
    } else {
        format!("{:.1}% larger", ratio.abs())
    };
    format!(
        "{} -> {} ({})",
        format_file_size(original_size),
        format_file_size(compressed_size),
        direction
    )
}
