use chrono::Local;
use std::fmt;
use tracing_subscriber::fmt::format::Writer;
use tracing_subscriber::fmt::time::FormatTime;

/// Full local timestamp for log files (YYYY-MM-DD HH:MM:SS.mmm+00:00)
pub struct LocalDateTime;

impl FormatTime for LocalDateTime {
    fn format_time(&self, w: &mut Writer<'_>) -> fmt::Result {
        write!(w, "{}", Local::now().format("%Y-%m-%d %H:%M:%S%.3f%:z"))
    }
}

/// Local time of day for the console (HH:MM:SS.mmm)
pub struct LocalTimeOnly;

impl FormatTime for LocalTimeOnly {
    fn format_time(&self, w: &mut Writer<'_>) -> fmt::Result {
        write!(w, "{}", Local::now().format("%H:%M:%S%.3f"))
    }
}
