//! Free-text header blocks.
//!
//! The editable header box holds one `Name: Value` pair per line.

use std::collections::BTreeMap;

use tracing::debug;

/// Parse a newline-delimited `Name: Value` block.
///
/// Lines are split on the first colon and both halves are trimmed, so values
/// may themselves contain colons. Blank lines, lines without a colon and lines
/// with an empty name are skipped. A repeated name keeps its last value.
pub fn parse_headers(text: &str) -> BTreeMap<String, String> {
    let mut headers = BTreeMap::new();

    for line in text.lines() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let Some((name, value)) = line.split_once(':') else {
            debug!(line, "skipping header line without a colon");
            continue;
        };

        let name = name.trim();
        if name.is_empty() {
            debug!(line, "skipping header line without a name");
            continue;
        }

        headers.insert(name.to_string(), value.trim().to_string());
    }

    headers
}

/// Render headers as a block `parse_headers` reads back.
pub fn format_headers<'a, I>(headers: I) -> String
where
    I: IntoIterator<Item = (&'a String, &'a String)>,
{
    headers
        .into_iter()
        .map(|(name, value)| format!("{}: {}\n", name, value))
        .collect()
}
