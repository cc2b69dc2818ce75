use std::borrow::Cow;
use std::path::Path;

use chrono::{DateTime, Local};

pub const TITLE_PLACEHOLDER: &str = "{{TITLE}}";
pub const TIMESTAMP_PLACEHOLDER: &str = "{{TIMESTAMP}}";
pub const DATA_PLACEHOLDER: &str = "{{REPORT_DATA}}";

/// Used when no template file is available. Carries every element the
/// client script looks up, without the decorative markup.
pub const BUILTIN_TEMPLATE: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{{TITLE}}</title>
    <link rel="stylesheet" href="assets/styles.css">
</head>
<body>
    <header>
        <h1>{{TITLE}}</h1>
        <p class="generated">Generated {{TIMESTAMP}} · <span id="duration"></span></p>
        <button id="theme-toggle" title="Toggle theme"><i></i></button>
        <button id="export-btn">Export JSON</button>
    </header>
    <section class="summary">
        <div class="summary-card">Total <strong id="total-tests">0</strong></div>
        <div class="summary-card">Passed <strong id="passed-tests">0</strong></div>
        <div class="summary-card">Failed <strong id="failed-tests">0</strong></div>
        <div class="summary-card">Skipped <strong id="skipped-tests">0</strong></div>
        <div class="summary-card">Pass rate <strong id="pass-rate">0%</strong></div>
        <div class="progress"><div id="progress-bar"></div></div>
    </section>
    <nav class="filters">
        <button class="filter-btn active" data-filter="all">All</button>
        <button class="filter-btn" data-filter="passed">Passed</button>
        <button class="filter-btn" data-filter="failed">Failed</button>
        <button class="filter-btn" data-filter="skipped">Skipped</button>
        <button class="filter-btn" data-filter="timedOut">Timed out</button>
        <button class="filter-btn" data-filter="interrupted">Interrupted</button>
        <input id="search-input" type="search" placeholder="Search tests...">
        <button id="search-btn">Search</button>
    </nav>
    <main id="test-results"></main>
    <script>
        window.reportData = {{REPORT_DATA}};
    </script>
    <script src="assets/app.js"></script>
</body>
</html>
"#;

/// Read the template at `path`, falling back to [`BUILTIN_TEMPLATE`].
pub fn load(path: Option<&Path>) -> Cow<'static, str> {
    let Some(path) = path else {
        return Cow::Borrowed(BUILTIN_TEMPLATE);
    };
    match std::fs::read_to_string(path) {
        Ok(content) => Cow::Owned(content),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!(path = %path.display(), "no custom template, using built-in");
            Cow::Borrowed(BUILTIN_TEMPLATE)
        }
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "unreadable template, using built-in");
            Cow::Borrowed(BUILTIN_TEMPLATE)
        }
    }
}

/// Substitute the placeholders.
///
/// Title and timestamp are replaced everywhere; the data placeholder only
/// once, and last, so payload text is never itself substituted.
pub fn fill(template: &str, title: &str, timestamp: &str, data_json: &str) -> String {
    if !template.contains(DATA_PLACEHOLDER) {
        tracing::warn!("template has no {} placeholder; report data will not be embedded", DATA_PLACEHOLDER);
    }
    template
        .replace(TITLE_PLACEHOLDER, &escape_html(title))
        .replace(TIMESTAMP_PLACEHOLDER, &escape_html(timestamp))
        .replacen(DATA_PLACEHOLDER, &escape_script(data_json), 1)
}

/// Human-readable render time, e.g. `3/14/2025, 9:05:07 PM`.
pub fn format_timestamp(at: &DateTime<Local>) -> String {
    at.format("%-m/%-d/%Y, %-I:%M:%S %p").to_string()
}

/// Make serialized JSON inert inside a `<script>` element.
///
/// `<`, `>` and `&` only occur inside JSON strings, where their `\uXXXX`
/// forms decode to the same text, so neither `</script>` nor `<!--` can
/// survive into the markup.
fn escape_script(json: &str) -> String {
    let mut out = String::with_capacity(json.len());
    for c in json.chars() {
        match c {
            '<' => out.push_str("\\u003c"),
            '>' => out.push_str("\\u003e"),
            '&' => out.push_str("\\u0026"),
            '\u{2028}' => out.push_str("\\u2028"),
            '\u{2029}' => out.push_str("\\u2029"),
            c => out.push(c),
        }
    }
    out
}

/// Escape HTML special characters.
fn escape_html(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}
