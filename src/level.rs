//! Difficulty level parsing and display.
//!
//! Sheet authors mix notations ("★★★", "3", "Nivel 3", "3/5"), so the level
//! cell is parsed leniently into a 0..=5 scale.

use regex::Regex;
use std::sync::LazyLock;

/// Glyph used for star-notation levels
pub const STAR: char = '★';

pub const MAX_LEVEL: u8 = 5;

/// Shown when a song has no level
pub const NO_LEVEL_PLACEHOLDER: &str = "—";

static FIRST_DIGITS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[0-9]+").expect("Hardcode regex pattern"));

/// Parse a free-form level cell into `0..=5`.
///
/// Star counting takes precedence over digits; otherwise the first digit
/// run is used. Anything else is level 0.
pub fn parse_level(raw: &str) -> u8 {
    let s = raw.trim();
    if s.is_empty() {
        return 0;
    }

    if s.contains(STAR) {
        let stars = s.chars().filter(|&c| c == STAR).count();
        return stars.min(MAX_LEVEL as usize) as u8;
    }

    FIRST_DIGITS
        .find(s)
        .map(|m| clamp_digits(m.as_str()))
        .unwrap_or(0)
}

/// Clamp a digit run to the level scale without overflowing on long runs
fn clamp_digits(digits: &str) -> u8 {
    digits
        .parse::<u64>()
        .map(|n| n.min(MAX_LEVEL as u64) as u8)
        .unwrap_or(MAX_LEVEL)
}

/// Display string for a level: original star text if the sheet used stars,
/// otherwise one star per level, or a placeholder for level 0
pub fn level_display(level_raw: &str, level_numeric: u8) -> String {
    let raw = level_raw.trim();
    if raw.contains(STAR) {
        return raw.to_string();
    }

    match level_numeric.min(MAX_LEVEL) {
        0 => NO_LEVEL_PLACEHOLDER.to_string(),
        n => STAR.to_string().repeat(n as usize),
    }
}
