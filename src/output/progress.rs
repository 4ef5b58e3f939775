use indicatif::{ProgressState, ProgressStyle};

/// Progress bar style for scan jobs: spinner, label, elapsed with
/// milliseconds, bar and completed/total candidates.
pub fn get_progress_style() -> ProgressStyle {
    let style = ProgressStyle::default_bar()
        .template("{spinner:.green} {msg} [{elapsed_ms}] [{bar:40.cyan/blue}] {pos}/{len} ({per_sec})");

    let style = match style {
        Ok(s) => s,
        Err(_) => ProgressStyle::default_bar(),
    };

    style
        .with_key("elapsed_ms", elapsed_ms)
        .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", "✓"])
        .progress_chars("#>-")
}

/// Elapsed time as MM:SS.mmm
fn elapsed_ms(state: &ProgressState, writer: &mut dyn std::fmt::Write) {
    let elapsed = state.elapsed();
    let secs = elapsed.as_secs();
    let _ = write!(
        writer,
        "{:02}:{:02}.{:03}",
        secs / 60,
        secs % 60,
        elapsed.subsec_millis()
    );
}
