//! Display formatting helpers used when building view models.

/// Titles longer than this are cut and suffixed with `...`.
pub const TITLE_MAX_CHARS: usize = 50;

/// Number of stars in a rating display.
pub const STAR_SLOTS: u8 = 5;

/// Cut `text` to `max_chars` characters, appending `...` when shortened.
#[must_use]
pub fn truncate_text(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let kept: String = text.chars().take(max_chars).collect();
    format!("{kept}...")
}

/// Shopper-facing name for an API category.
///
/// Clothing categories collapse into "Fashion"; both spellings of jewelry
/// map to "Jewelry". Unknown categories are capitalized.
#[must_use]
pub fn format_category(category: &str) -> String {
    match category.to_lowercase().as_str() {
        "electronics" => "Electronics".to_string(),
        "men's clothing" | "women's clothing" => "Fashion".to_string(),
        "jewelery" | "jewelry" => "Jewelry".to_string(),
        _ => capitalize(category),
    }
}

fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    chars.next().map_or_else(String::new, |first| {
        first.to_uppercase().chain(chars).collect()
    })
}

/// Number of filled stars for a rating: the whole part, capped at five.
#[must_use]
pub fn full_stars(rating: f32) -> u8 {
    if rating.is_nan() || rating <= 0.0 {
        return 0;
    }
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let whole = rating.floor().min(f32::from(STAR_SLOTS)) as u8;
    whole
}

/// Compact counter for headline stats: `1.2M+`, `50K+`, or the number.
#[must_use]
pub fn format_stat(value: u64) -> String {
    #[allow(clippy::cast_precision_loss)]
    let as_float = value as f64;
    if value >= 1_000_000 {
        format!("{:.1}M+", as_float / 1_000_000.0)
    } else if value >= 1_000 {
        format!("{:.0}K+", as_float / 1_000.0)
    } else {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_text() {
        assert_eq!(truncate_text("short", 50), "short");
        assert_eq!(truncate_text("abcdef", 3), "abc...");
        assert_eq!(truncate_text("abc", 3), "abc");
        assert_eq!(truncate_text("ñandú grande", 5), "ñandú...");
    }

    #[test]
    fn test_format_category() {
        assert_eq!(format_category("electronics"), "Electronics");
        assert_eq!(format_category("men's clothing"), "Fashion");
        assert_eq!(format_category("Women's Clothing"), "Fashion");
        assert_eq!(format_category("jewelery"), "Jewelry");
        assert_eq!(format_category("jewelry"), "Jewelry");
        assert_eq!(format_category("home goods"), "Home goods");
        assert_eq!(format_category(""), "");
    }

    #[test]
    fn test_full_stars() {
        assert_eq!(full_stars(3.9), 3);
        assert_eq!(full_stars(5.0), 5);
        assert_eq!(full_stars(7.2), 5);
        assert_eq!(full_stars(0.4), 0);
        assert_eq!(full_stars(-1.0), 0);
        assert_eq!(full_stars(f32::NAN), 0);
    }

    #[test]
    fn test_format_stat() {
        assert_eq!(format_stat(999), "999");
        assert_eq!(format_stat(50_000), "50K+");
        assert_eq!(format_stat(1_200_000), "1.2M+");
    }
}
