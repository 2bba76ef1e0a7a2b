//! Labeled section extraction from usage texts.

use regex::RegexBuilder;

/// Return every block of `text` introduced by a line containing `label`.
///
/// A block is the labeled line plus all directly following lines that start
/// with a space or tab. Matching is case-insensitive; each block is trimmed.
/// A missing label yields an empty list.
pub fn extract_section(label: &str, text: &str) -> Vec<String> {
    let pattern = format!(
        r"^([^\n]*{}[^\n]*\n?(?:[ \t].*?(?:\n|$))*)",
        regex::escape(label)
    );
    let Ok(section) = RegexBuilder::new(&pattern)
        .case_insensitive(true)
        .multi_line(true)
        .build()
    else {
        return Vec::new();
    };

    section
        .find_iter(text)
        .map(|m| m.as_str().trim().to_string())
        .collect()
}
