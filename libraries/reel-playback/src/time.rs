//! Time display helpers

/// Format seconds as `m:ss`
///
/// Fractions are floored to whole seconds. Negative or non-finite input
/// renders as `0:00`.
pub fn format_time(secs: f64) -> String {
    if !secs.is_finite() || secs < 0.0 {
        return "0:00".to_string();
    }

    let total = secs.floor() as u64;
    format!("{}:{:02}", total / 60, total % 60)
}

/// Progress through the media as a ratio in `[0, 1]`
///
/// Returns 0 while the duration is unknown or zero.
pub fn progress_ratio(position_secs: f64, duration_secs: Option<f64>) -> f64 {
    match duration_secs {
        Some(duration) if duration > 0.0 && position_secs.is_finite() => {
            (position_secs / duration).clamp(0.0, 1.0)
        }
        _ => 0.0,
    }
}
