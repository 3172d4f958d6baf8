/// Formats a share volume compactly: `1.2M`, `850k`, or the plain count
/// below a thousand.
pub fn format_volume(volume: f64) -> String {
    if volume >= 1_000_000.0 {
        format!("{:.1}M", volume / 1_000_000.0)
    } else if volume >= 1_000.0 {
        format!("{:.0}k", volume / 1_000.0)
    } else {
        format!("{}", volume as i64)
    }
}

/// Formats a fractional return as a percentage string with one decimal.
pub fn format_return(value: f64) -> String {
    format!("{:.1}%", value * 100.0)
}
