use crate::models::TestRecord;

/// Compact duration text shared by the terminal viewer and clipboard output.
///
/// Rounds half up, like the browser script, so both show the same numbers.
pub fn format_duration(ms: u64) -> String {
    if ms < 1_000 {
        return format!("{}ms", ms);
    }
    if ms < 60_000 {
        let tenths = (ms + 50) / 100;
        return format!("{}.{}s", tenths / 10, tenths % 10);
    }
    let minutes = ms / 60_000;
    let seconds = (ms % 60_000 + 500) / 1_000;
    format!("{}m {}s", minutes, seconds)
}

/// The plain-text block placed on the clipboard for a single test.
pub fn test_info(record: &TestRecord) -> String {
    format!(
        "Test: {}\nStatus: {}\nDuration: {}\nLocation: {}\nProject: {}",
        record.title,
        record.status,
        format_duration(record.duration_ms),
        record.location,
        record.project_name
    )
}
