//! Display helpers for watch progress.

use crate::watch::ProgressRecord;

/// Elapsed time as "1h 5m", or "5m" under an hour.
pub fn format_watch_time(seconds: u64) -> String {
    let hours = seconds / 3600;
    let minutes = (seconds % 3600) / 60;
    if hours > 0 {
        format!("{}h {}m", hours, minutes)
    } else {
        format!("{}m", minutes)
    }
}

/// Playback position as "m:ss". Minutes are not wrapped into hours.
pub fn format_playback_position(seconds: u64) -> String {
    format!("{}:{:02}", seconds / 60, seconds % 60)
}

/// Play overlay text such as "12:05 / 2h 16m".
pub fn playback_status(current_time: u64, duration: u64) -> String {
    let minutes = duration / 60;
    format!(
        "{} / {}h {}m",
        format_playback_position(current_time),
        minutes / 60,
        minutes % 60
    )
}

/// One-line summary such as "1h 5m watched • 54% complete".
pub fn watch_summary(record: &ProgressRecord) -> String {
    format!(
        "{} watched • {}",
        format_watch_time(record.current_time),
        record.percent_label()
    )
}
