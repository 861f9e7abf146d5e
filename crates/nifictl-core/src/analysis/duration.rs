// Human-readable processing times.

use crate::model::ProcessorTimingInfo;

const NANOS_PER_MILLI: u64 = 1_000_000;

/// Format a nanosecond duration the way operators read it on a dashboard.
///
/// Under a second shows whole milliseconds, under a minute shows seconds
/// with two decimals, under an hour shows minutes and seconds, and anything
/// longer shows hours and minutes.
#[allow(clippy::cast_precision_loss, clippy::as_conversions)]
pub fn format_nanos(nanos: u64) -> String {
    if nanos == 0 {
        return "0 ms".to_owned();
    }
    let millis = nanos / NANOS_PER_MILLI;
    if millis < 1000 {
        return format!("{millis} ms");
    }
    let seconds = millis / 1000;
    if seconds < 60 {
        return format!("{:.2} seconds", millis as f64 / 1000.0);
    }
    let minutes = seconds / 60;
    if minutes < 60 {
        return format!("{minutes} minutes {} seconds", seconds % 60);
    }
    format!("{} hours {} minutes", minutes / 60, minutes % 60)
}

/// Timing block for one processor.
#[allow(clippy::cast_precision_loss, clippy::as_conversions)]
pub fn timing(tasks_duration_nanos: u64, task_count: u64) -> ProcessorTimingInfo {
    let average_task_duration_ms = if task_count == 0 {
        0.0
    } else {
        tasks_duration_nanos as f64 / NANOS_PER_MILLI as f64 / task_count as f64
    };
    ProcessorTimingInfo {
        tasks_duration_nanos,
        formatted_processing_time: format_nanos(tasks_duration_nanos),
        processing_time_seconds: tasks_duration_nanos as f64 / 1e9,
        task_count,
        average_task_duration_ms,
    }
}
