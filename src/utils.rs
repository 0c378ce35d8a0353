/// Split raw input into trimmed, non-empty lines.
///
/// `\r\n` and `\n` line endings are treated the same.
pub fn normalize_lines(text: &str) -> Vec<&str> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect()
}

/// Strip leading/trailing commas and whitespace from an extracted field
#[inline]
pub fn trim_field(field: &str) -> &str {
    field.trim_matches(|c: char| c == ',' || c.is_whitespace())
}

#[inline]
pub fn has_digit(s: &str) -> bool {
    s.chars().any(|c| c.is_ascii_digit())
}

/// Split on commas, dropping segments that are empty after trimming.
pub fn comma_segments(text: &str) -> Vec<&str> {
    text.split(',')
        .map(trim_field)
        .filter(|segment| !segment.is_empty())
        .collect()
}

/// Split text into blocks separated by one or more blank lines.
pub fn blank_line_blocks(text: &str) -> Vec<String> {
    let mut blocks = Vec::new();
    let mut current: Vec<&str> = Vec::new();
    for line in text.lines() {
        if line.trim().is_empty() {
            if !current.is_empty() {
                blocks.push(current.join("\n"));
                current.clear();
            }
        } else {
            current.push(line);
        }
    }
    if !current.is_empty() {
        blocks.push(current.join("\n"));
    }
    blocks
}

/// Round to two decimal places.
#[inline]
pub fn round_cents(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
